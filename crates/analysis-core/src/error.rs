use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum AnalysisError {
    /// Not enough historical bars or periods for the requested window.
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    /// Mathematically undefined computation; more history would not fix it.
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// A required field is absent from a raw statement record.
    #[error("Missing field '{field}' for period {period}")]
    MissingField { field: String, period: NaiveDate },

    /// Fetch failure surfaced by a market-data provider implementation.
    #[error("Provider error: {0}")]
    Provider(String),
}
