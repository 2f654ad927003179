//! Minimal row table used as the tabular input boundary.

use std::collections::BTreeMap;

use ahash::AHashSet;
use serde_json::{Map, Value};

use crate::errors::NetworkDataError;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Result<Self, NetworkDataError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        ensure_unique(&columns)?;
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Builds a table from JSON objects. Columns appear in first-seen order and
    /// cells missing from a record are `null`.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Map<String, Value>>,
    {
        let records: Vec<Map<String, Value>> = records.into_iter().collect();
        let mut columns: Vec<String> = Vec::new();
        let mut seen = AHashSet::new();
        for record in &records {
            for key in record.keys() {
                if seen.insert(key.clone()) {
                    columns.push(key.clone());
                }
            }
        }
        let rows = records
            .into_iter()
            .map(|mut record| {
                columns
                    .iter()
                    .map(|col| record.remove(col).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    /// Parses a JSON array of objects.
    pub fn from_json_str(raw: &str) -> Result<Self, NetworkDataError> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Array(items) = value else {
            return Err(NetworkDataError::invalid_input(
                "table json must be an array of objects",
            ));
        };
        let mut records = Vec::with_capacity(items.len());
        for (idx, item) in items.into_iter().enumerate() {
            match item {
                Value::Object(map) => records.push(map),
                other => {
                    return Err(NetworkDataError::invalid_input(format!(
                        "table row {idx} is not an object: {other}"
                    )));
                }
            }
        }
        Ok(Self::from_records(records))
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), NetworkDataError> {
        if row.len() != self.columns.len() {
            return Err(NetworkDataError::invalid_input(format!(
                "row has {} cells, table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn with_row(mut self, row: Vec<Value>) -> Result<Self, NetworkDataError> {
        self.push_row(row)?;
        Ok(self)
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(|row| row.as_slice())
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|cells| cells.get(col))
    }

    /// Returns a copy with columns renamed per `map` (old name -> new name).
    /// Keys naming absent columns are ignored.
    pub fn renamed(&self, map: &BTreeMap<String, String>) -> Result<Self, NetworkDataError> {
        if map.is_empty() {
            return Ok(self.clone());
        }
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|col| map.get(col).cloned().unwrap_or_else(|| col.clone()))
            .collect();
        ensure_unique(&columns)?;
        Ok(Self {
            columns,
            rows: self.rows.clone(),
        })
    }
}

fn ensure_unique(columns: &[String]) -> Result<(), NetworkDataError> {
    let mut seen = AHashSet::new();
    for col in columns {
        if !seen.insert(col.as_str()) {
            return Err(NetworkDataError::invalid_input(format!(
                "duplicate column name '{col}'"
            )));
        }
    }
    Ok(())
}
