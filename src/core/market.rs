//! Abstractions over the external services: price history, company
//! fundamentals and feedback collection.

use super::error::AnalysisError;
use super::series::RawPriceTable;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Company metrics. Any of them may be missing from the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    pub symbol: String,
    pub short_name: Option<String>,
    pub trailing_pe: Option<f64>,
    /// Fraction, e.g. 0.005 for 0.5%.
    pub dividend_yield: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub profit_margins: Option<f64>,
}

impl Fundamentals {
    /// Dividend yield in percent; a missing yield counts as zero.
    pub fn dividend_yield_percent(&self) -> f64 {
        self.dividend_yield.unwrap_or(0.0) * 100.0
    }

    pub fn return_on_equity_percent(&self) -> Option<f64> {
        self.return_on_equity.map(|v| v * 100.0)
    }

    pub fn profit_margins_percent(&self) -> Option<f64> {
        self.profit_margins.map(|v| v * 100.0)
    }

    /// Web search link for the company, by short name when known.
    pub fn search_url(&self) -> String {
        let query = self.short_name.as_deref().unwrap_or(&self.symbol);
        reqwest::Url::parse_with_params("https://www.google.com/search", &[("q", query)])
            .map(|url| url.to_string())
            .unwrap_or_else(|_| format!("https://www.google.com/search?q={}", self.symbol))
    }
}

/// A feedback form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub feedback: String,
}

impl Feedback {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("feedback", &self.feedback),
        ] {
            if value.trim().is_empty() {
                return Err(AnalysisError::InvalidParameter(format!(
                    "{field} must not be empty"
                )));
            }
        }
        if !self.email.contains('@') {
            return Err(AnalysisError::InvalidParameter(format!(
                "'{}' is not an email address",
                self.email
            )));
        }
        Ok(())
    }
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily bars for `ticker` from `start` (inclusive) to `end` (exclusive).
    async fn fetch_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawPriceTable>;
}

#[async_trait]
pub trait FundamentalsProvider: Send + Sync {
    async fn fetch_fundamentals(&self, ticker: &str) -> Result<Fundamentals>;
}

#[async_trait]
pub trait FeedbackSink: Send + Sync {
    async fn submit(&self, feedback: &Feedback) -> Result<()>;
}
