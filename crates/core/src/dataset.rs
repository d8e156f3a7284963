//! Read-only view over a historical transaction table.

use serde_json::{Map, Number, Value};
use sha2::{Digest, Sha256};

use crate::errors::EngineError;

#[derive(Clone, Debug, PartialEq)]
pub struct HistoricalDataset {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl HistoricalDataset {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, EngineError> {
        for (position, column) in columns.iter().enumerate() {
            if columns[..position].contains(column) {
                return Err(EngineError::MalformedDataset(format!(
                    "column `{column}` appears more than once"
                )));
            }
        }

        for (index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(EngineError::MalformedDataset(format!(
                    "row {index} has {} values but the dataset has {} columns",
                    row.len(),
                    columns.len()
                )));
            }
            if let Some(position) = row.iter().position(|value| !value.is_finite()) {
                return Err(EngineError::MalformedDataset(format!(
                    "row {index} has a non-finite value in column `{}`",
                    columns[position]
                )));
            }
        }

        Ok(Self { columns, rows })
    }

    /// Parses a JSON array of flat records. Values must be numbers or booleans and every
    /// record must carry the same keys as the first one.
    pub fn from_json(raw: &str) -> Result<Self, EngineError> {
        let records: Vec<Map<String, Value>> = serde_json::from_str(raw)
            .map_err(|error| EngineError::MalformedDataset(error.to_string()))?;

        let Some(first) = records.first() else {
            return Self::new(Vec::new(), Vec::new());
        };
        let columns: Vec<String> = first.keys().cloned().collect();

        let mut rows = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            if record.len() != columns.len() {
                return Err(EngineError::MalformedDataset(format!(
                    "record {index} has {} fields, expected {}",
                    record.len(),
                    columns.len()
                )));
            }

            let row = columns
                .iter()
                .map(|column| match record.get(column) {
                    Some(Value::Number(number)) => number.as_f64().ok_or_else(|| {
                        EngineError::MalformedDataset(format!(
                            "record {index} field `{column}` is not representable as f64"
                        ))
                    }),
                    Some(Value::Bool(flag)) => Ok(if *flag { 1.0 } else { 0.0 }),
                    Some(other) => Err(EngineError::MalformedDataset(format!(
                        "record {index} field `{column}` must be a number or boolean, got {other}"
                    ))),
                    None => Err(EngineError::MalformedDataset(format!(
                        "record {index} is missing field `{column}`"
                    ))),
                })
                .collect::<Result<Vec<f64>, EngineError>>()?;
            rows.push(row);
        }

        Self::new(columns, rows)
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        let records = self
            .rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(column, value)| {
                        let number = Number::from_f64(*value).ok_or_else(|| {
                            EngineError::MalformedDataset(format!(
                                "column `{column}` holds a non-finite value"
                            ))
                        })?;
                        Ok((column.clone(), Value::Number(number)))
                    })
                    .collect::<Result<Map<String, Value>, EngineError>>()
                    .map(Value::Object)
            })
            .collect::<Result<Vec<Value>, EngineError>>()?;

        serde_json::to_string_pretty(&records)
            .map_err(|error| EngineError::MalformedDataset(error.to_string()))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[index]).collect())
    }

    /// Content address of the table: column names and every cell, in order.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for column in &self.columns {
            hasher.update(column.as_bytes());
            hasher.update([0u8]);
        }
        for row in &self.rows {
            for value in row {
                hasher.update(value.to_le_bytes());
            }
        }
        format!("sha256:{:x}", hasher.finalize())
    }
}
