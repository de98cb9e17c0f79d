//! Error taxonomy for price analysis and the services it talks to.

use thiserror::Error;

/// Errors raised while turning provider data into a report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("No price data returned for {0}")]
    EmptyData(String),
    #[error("Moving average window must be greater than zero")]
    InvalidWindow,
    #[error("At least two price points are required, got {0}")]
    InsufficientData(usize),
    #[error("CAGR is undefined: first and last prices fall in the same year ({0})")]
    UndefinedCagr(i32),
    #[error("Inconsistent report inputs: {0}")]
    Assembly(String),
    #[error("External service error: {0}")]
    ExternalService(String),
    #[error("Malformed price data: {0}")]
    MalformedData(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Arithmetic overflow while computing {0}")]
    ArithmeticOverflow(&'static str),
}

impl AnalysisError {
    /// Message shown to the user at the presentation boundary.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::EmptyData(ticker) => format!(
                "No data found for {ticker} in the selected period. Try another ticker or date range."
            ),
            AnalysisError::InsufficientData(_) => {
                "The selected period has too few trading days to compute a return. Widen the date range."
                    .to_string()
            }
            AnalysisError::UndefinedCagr(year) => format!(
                "The selected period lies entirely within {year}; CAGR needs at least one full calendar year."
            ),
            AnalysisError::ExternalService(msg) => {
                format!("Could not reach the data service: {msg}. Please try again.")
            }
            AnalysisError::InvalidParameter(msg) => format!("Invalid input: {msg}"),
            AnalysisError::ArithmeticOverflow(what) => format!(
                "The {what} is too large to compute. Try a smaller amount or fewer projection years."
            ),
            AnalysisError::InvalidWindow
            | AnalysisError::Assembly(_)
            | AnalysisError::MalformedData(_) => format!("Internal error: {self}"),
        }
    }

    /// Whether the user can fix the problem by changing their inputs.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            AnalysisError::EmptyData(_)
                | AnalysisError::InsufficientData(_)
                | AnalysisError::UndefinedCagr(_)
                | AnalysisError::InvalidParameter(_)
                | AnalysisError::ArithmeticOverflow(_)
        )
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AnalysisError::ExternalService(format!("request timed out: {err}"))
        } else {
            AnalysisError::ExternalService(err.to_string())
        }
    }
}
