use thiserror::Error;

/// Problems binding a parsed table to the well schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row}: missing required field '{column}'")]
    MissingValue { row: usize, column: String },

    #[error("row {row}: field '{column}' is not numeric (got '{value}')")]
    NotNumeric {
        row: usize,
        column: String,
        value: String,
    },

    #[error("worksheet is empty")]
    EmptySheet,
}
