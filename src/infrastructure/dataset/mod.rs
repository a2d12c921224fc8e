//! Dataset catalog persistence

mod json_file_store;

pub use json_file_store::JsonFileConfigStore;
