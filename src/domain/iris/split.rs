//! Deterministic train/test partition

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde_json::Value;

use super::{FeatureFrame, Table, LABEL_COLUMN};
use crate::domain::DomainError;

/// Share of rows held out for testing
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Seed of the row permutation
pub const DEFAULT_SEED: u64 = 42;

/// Train and test partitions of a cleaned table
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub x_train: FeatureFrame,
    pub x_test: FeatureFrame,
    pub y_train: Vec<String>,
    pub y_test: Vec<String>,
}

/// Partition `table` into features and labels for training and testing.
///
/// The label column is `species`; every other column is a feature. The test
/// partition holds `ceil(n * test_fraction)` rows picked by a permutation
/// seeded with `seed`, so equal inputs always give equal partitions.
pub fn train_test_split(table: &Table, test_fraction: f64, seed: u64) -> Result<Split, DomainError> {
    let label_index = table.column_index(LABEL_COLUMN).ok_or_else(|| {
        DomainError::schema(format!("Label column '{}' is missing", LABEL_COLUMN))
    })?;

    if !(0.0..1.0).contains(&test_fraction) {
        return Err(DomainError::validation(format!(
            "test_fraction must be in [0, 1), got {}",
            test_fraction
        )));
    }

    let feature_columns: Vec<String> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != label_index)
        .map(|(_, c)| c.clone())
        .collect();

    let total = table.len();
    let test_size = (total as f64 * test_fraction).ceil() as usize;

    let mut order: Vec<usize> = (0..total).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let (test_rows, train_rows) = order.split_at(test_size.min(total));

    let features = |indices: &[usize]| FeatureFrame {
        columns: feature_columns.clone(),
        rows: indices
            .iter()
            .map(|&i| {
                table.rows()[i]
                    .iter()
                    .enumerate()
                    .filter(|(c, _)| *c != label_index)
                    .map(|(_, v)| v.clone())
                    .collect()
            })
            .collect(),
    };

    let labels = |indices: &[usize]| -> Vec<String> {
        indices
            .iter()
            .map(|&i| label_text(&table.rows()[i][label_index]))
            .collect()
    };

    Ok(Split {
        x_train: features(train_rows),
        x_test: features(test_rows),
        y_train: labels(train_rows),
        y_test: labels(test_rows),
    })
}

fn label_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
