use crate::models::Column;

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("missing column: {column}")]
    MissingColumn { column: String },
    #[error("column {column} holds {found} values, expected {expected}")]
    TypeMismatch {
        column: Column,
        expected: &'static str,
        found: &'static str,
    },
    #[error("row {row}: column {column} has value {value:?} that is not a finite number")]
    CellTypeMismatch {
        column: String,
        row: u64,
        value: String,
    },
    #[error("cannot average {column} over zero rows")]
    EmptyInput { column: Column },
    #[error("invalid option: {0}")]
    InvalidOption(String),
    #[error("failed to read records: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to open records file: {0}")]
    Io(#[from] std::io::Error),
}
