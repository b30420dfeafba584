use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid number format for {field}: {value:?}")]
    InvalidNumberFormat {
        field: &'static str,
        value: String,
    },

    #[error("Negative quantity {value} on lot {reference_id}")]
    NegativeQuantity {
        reference_id: String,
        value: String,
    },

    #[error("Remaining quantity {value} outside 0..=quantity on lot {reference_id}")]
    RemainingOutOfRange {
        reference_id: String,
        value: String,
    },

    #[error("Empty lot set: no buy or sell lots supplied")]
    EmptyLotSet,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid export row: {0}")]
    InvalidRow(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
