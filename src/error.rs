use thiserror::Error;

use crate::relation::DataType;

/// Errors raised by the relational layer, the store and the projection engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Type mismatch in column {column}: expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        found: String,
    },

    #[error("Invalid operand for {op}: {found}")]
    InvalidOperand { op: String, found: String },

    #[error("Row {row} has {found} values but the schema has {expected} columns")]
    RowArity {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Table already exists: {0}")]
    TableExists(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Invalid table name: {0:?}")]
    InvalidTableName(String),

    #[error("Unknown model type {model_type:?} for sector {sector} in {geography}")]
    UnknownModelType {
        geography: String,
        sector: String,
        model_type: String,
    },

    #[error("Invalid years {invalid:?}; available years are {available:?}")]
    InvalidYears {
        invalid: Vec<i64>,
        available: Vec<String>,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] validator::ValidationErrors),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
