//! Iris data acquisition and model persistence

mod acquisition;
mod model;

pub use acquisition::{parse_csv, read_zip_csv, write_csv, LocalCsvSource, RemoteZipSource};
pub use model::{IrisModel, ModelArtifact};

#[cfg(test)]
pub(crate) use acquisition::test_support;
