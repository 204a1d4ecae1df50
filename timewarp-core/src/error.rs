use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WarpError {
    #[error("Unknown warp period: {0:?}")]
    UnknownPeriod(String),

    #[error("Invalid {field}: {value}")]
    InvalidAmount { field: &'static str, value: f64 },
}
