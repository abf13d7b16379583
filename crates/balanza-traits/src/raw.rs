//! Provider-neutral raw payloads.
//!
//! A [`RawTable`] is what a [`DataProvider`](crate::DataProvider) hands to the
//! pipeline: column labels exactly as the backend spelled them and one row of
//! JSON values per period or per trading day. Nothing is coerced here.

use serde_json::{Map, Value};

use crate::error::{BalanzaError, Result};

/// Rows of untyped cells keyed by provider column labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<Value>>>,
}

impl RawTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a list of JSON objects.
    ///
    /// Columns appear in the order they are first seen while iterating the
    /// records. A key missing from a record is stored as absent, which is
    /// distinct from an explicit `null`.
    #[must_use]
    pub fn from_records(records: Vec<Map<String, Value>>) -> Self {
        let mut table = Self::new();
        for record in records {
            table.push_record(record);
        }
        table
    }

    /// Build a table from JSON text holding an array of objects.
    ///
    /// Only strict JSON is accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or not an array of objects.
    pub fn from_json_records(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json_value(value)
    }

    /// Build a table from a parsed JSON array of objects.
    ///
    /// A JSON string holding such an array (a double-encoded payload) is
    /// decoded once more.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an array of objects.
    pub fn from_json_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => {
                let mut records = Vec::with_capacity(items.len());
                for (i, item) in items.into_iter().enumerate() {
                    match item {
                        Value::Object(map) => records.push(map),
                        other => {
                            return Err(BalanzaError::InvalidData(format!(
                                "record {i} is not an object: {other}"
                            )));
                        }
                    }
                }
                Ok(Self::from_records(records))
            }
            Value::String(text) => Self::from_json_records(&text),
            other => Err(BalanzaError::InvalidData(format!(
                "expected an array of records, got {}",
                kind_of(&other)
            ))),
        }
    }

    /// Build a table from column-major arrays.
    ///
    /// # Errors
    ///
    /// Returns an error if the columns have different lengths.
    pub fn from_columns(columns: Vec<(String, Vec<Value>)>) -> Result<Self> {
        let height = columns.first().map_or(0, |(_, values)| values.len());
        if let Some((name, values)) = columns.iter().find(|(_, v)| v.len() != height) {
            return Err(BalanzaError::InvalidData(format!(
                "column {name} has {} values, expected {height}",
                values.len()
            )));
        }

        let mut rows: Vec<Vec<Option<Value>>> = vec![Vec::with_capacity(columns.len()); height];
        let mut names = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            names.push(name);
            for (row, value) in rows.iter_mut().zip(values) {
                row.push(Some(value));
            }
        }

        Ok(Self {
            columns: names,
            rows,
        })
    }

    /// Append one JSON object as a row.
    pub fn push_record(&mut self, record: Map<String, Value>) {
        let mut row = vec![None; self.columns.len()];
        for (key, value) in record {
            match self.position(&key) {
                Some(i) => row[i] = Some(value),
                None => {
                    self.columns.push(key);
                    for existing in &mut self.rows {
                        existing.push(None);
                    }
                    row.push(Some(value));
                }
            }
        }
        self.rows.push(row);
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column labels in order.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Whether a column with this exact label exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Row at `index`.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<RawRow<'_>> {
        self.rows.get(index).map(|cells| RawRow {
            index,
            columns: &self.columns,
            cells,
        })
    }

    /// Iterate rows in input order.
    pub fn rows(&self) -> impl Iterator<Item = RawRow<'_>> + '_ {
        self.rows.iter().enumerate().map(|(index, cells)| RawRow {
            index,
            columns: &self.columns,
            cells,
        })
    }

    /// Left join `other` onto `self` on equal, non-null `key` cells.
    ///
    /// Columns of `other` that `self` already has are not overwritten. When
    /// several rows of `other` share a key, the first one is used.
    #[must_use]
    pub fn left_join(&self, other: &Self, key: &str) -> Self {
        let Some(other_key) = other.position(key) else {
            return self.clone();
        };
        let Some(self_key) = self.position(key) else {
            return self.clone();
        };

        let added: Vec<usize> = other
            .columns
            .iter()
            .enumerate()
            .filter(|(_, name)| !self.has_column(name))
            .map(|(i, _)| i)
            .collect();

        let mut columns = self.columns.clone();
        columns.extend(added.iter().map(|&i| other.columns[i].clone()));

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let matched = row[self_key].as_ref().filter(|v| !v.is_null()).and_then(|k| {
                    other
                        .rows
                        .iter()
                        .find(|candidate| candidate[other_key].as_ref() == Some(k))
                });
                let mut joined = row.clone();
                joined.extend(
                    added
                        .iter()
                        .map(|&i| matched.and_then(|candidate| candidate[i].clone())),
                );
                joined
            })
            .collect();

        Self { columns, rows }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Borrowed view of one row of a [`RawTable`].
#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    index: usize,
    columns: &'a [String],
    cells: &'a [Option<Value>],
}

impl<'a> RawRow<'a> {
    /// Zero-based position of the row in its table.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Cell under `column`, `None` when the row has no such cell.
    ///
    /// A present `null` or `0` is returned as `Some`.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        let cells = self.cells;
        let columns = self.columns;
        columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| cells[i].as_ref())
    }

    /// Iterate present `(label, value)` cells.
    pub fn cells(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        let cells = self.cells;
        let columns = self.columns;
        columns
            .iter()
            .zip(cells)
            .filter_map(|(name, cell)| cell.as_ref().map(|v| (name.as_str(), v)))
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
