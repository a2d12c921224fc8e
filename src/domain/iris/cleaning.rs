//! Column and label normalization for the Iris dataset

use serde_json::Value;

use super::Table;

/// Source column name to canonical snake_case name
pub const COLUMN_RENAMES: [(&str, &str); 6] = [
    ("Id", "id"),
    ("SepalLengthCm", "sepal_length"),
    ("SepalWidthCm", "sepal_width"),
    ("PetalLengthCm", "petal_length"),
    ("PetalWidthCm", "petal_width"),
    ("Species", "species"),
];

/// Canonical label column
pub const LABEL_COLUMN: &str = "species";

/// Literal prefix stripped from species labels
pub const SPECIES_PREFIX: &str = "Iris-";

/// Rename known columns and strip the species prefix.
///
/// Unknown columns pass through untouched. Applying it twice yields the same
/// table as applying it once.
pub fn clean(mut table: Table) -> Table {
    for column in table.columns_mut().iter_mut() {
        if let Some((_, canonical)) = COLUMN_RENAMES.iter().find(|(source, _)| *source == column.as_str()) {
            *column = canonical.to_string();
        }
    }

    if let Some(index) = table.column_index(LABEL_COLUMN) {
        for row in table.rows_mut().iter_mut() {
            if let Some(Value::String(label)) = row.get_mut(index) {
                let stripped = label.trim_start_matches(SPECIES_PREFIX);
                if stripped.len() != label.len() {
                    *label = stripped.to_string();
                }
            }
        }
    }

    table
}
