//! Minimal column-oriented table used by the pipeline

use serde_json::{Map, Value};

use crate::domain::DomainError;

/// Rows of scalar cells under named columns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table; every row must have one cell per column
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, DomainError> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(DomainError::data_unavailable(format!(
                "Row {} has {} cells, expected {}",
                index,
                row.len(),
                columns.len()
            )));
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub(crate) fn columns_mut(&mut self) -> &mut Vec<String> {
        &mut self.columns
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Vec<Value>> {
        &mut self.rows
    }

    /// Render as a list of `{column: value}` records
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        records(&self.columns, &self.rows)
    }
}

/// Feature columns of one partition
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureFrame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl FeatureFrame {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        records(&self.columns, &self.rows)
    }

    /// Numeric view of the features, row-major
    pub fn to_matrix(&self) -> Result<Vec<Vec<f64>>, DomainError> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&self.columns)
                    .map(|(cell, column)| numeric_cell(cell, column))
                    .collect::<Result<Vec<f64>, DomainError>>()
            })
            .collect()
    }
}

fn numeric_cell(cell: &Value, column: &str) -> Result<f64, DomainError> {
    let value = match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };

    value.ok_or_else(|| {
        DomainError::schema(format!(
            "Feature column '{}' holds a non-numeric value: {}",
            column, cell
        ))
    })
}

fn records(columns: &[String], rows: &[Vec<Value>]) -> Vec<Map<String, Value>> {
    rows.iter()
        .map(|row| {
            columns
                .iter()
                .cloned()
                .zip(row.iter().cloned())
                .collect::<Map<String, Value>>()
        })
        .collect()
}

/// Interpret a raw CSV field as the narrowest JSON scalar
pub(crate) fn parse_cell(raw: &str) -> Value {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Value::Null;
    }

    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::from(int);
    }

    if let Ok(float) = trimmed.parse::<f64>() {
        if float.is_finite() {
            return Value::from(float);
        }
    }

    Value::String(raw.to_string())
}
