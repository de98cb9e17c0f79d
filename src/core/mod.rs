//! Core business logic: price series, indicators, returns and the service
//! abstractions they are fed from.

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod error;
pub mod indicators;
pub mod investment;
pub mod log;
pub mod market;
pub mod report;
pub mod series;

// Re-export main types for cleaner imports
pub use analysis::{AnalysisRequest, PriceOverlay, analyze, price_overlay};
pub use error::AnalysisError;
pub use indicators::{MovingAverageSeries, compute_sma};
pub use investment::{InvestmentParameters, InvestmentResult, compute_return};
pub use market::{Feedback, FeedbackSink, Fundamentals, FundamentalsProvider, MarketDataProvider};
pub use report::{Report, assemble};
pub use series::{ColumnKey, PricePoint, PriceSeries, RawPriceTable, normalize};
