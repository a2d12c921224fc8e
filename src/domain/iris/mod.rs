//! Iris domain - tabular data, cleaning and the train/test split

mod cleaning;
mod split;
mod table;

pub use cleaning::{clean, COLUMN_RENAMES, LABEL_COLUMN, SPECIES_PREFIX};
pub use split::{train_test_split, Split, DEFAULT_SEED, DEFAULT_TEST_FRACTION};
pub use table::{FeatureFrame, Table};
pub(crate) use table::parse_cell;
