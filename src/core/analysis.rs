//! One linear pass from a raw provider table to a finished report.

use super::error::AnalysisError;
use super::indicators::{MovingAverageSeries, compute_sma};
use super::investment::{InvestmentParameters, InvestmentResult, compute_return};
use super::report::{Report, assemble};
use super::series::{PriceSeries, RawPriceTable, normalize};
use serde::Serialize;

pub const DEFAULT_SHORT_WINDOW: usize = 20;
pub const DEFAULT_LONG_WINDOW: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub params: InvestmentParameters,
    pub short_window: usize,
    pub long_window: usize,
}

impl AnalysisRequest {
    pub fn new(params: InvestmentParameters) -> Self {
        Self {
            params,
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
        }
    }

    pub fn with_windows(mut self, short_window: usize, long_window: usize) -> Self {
        self.short_window = short_window;
        self.long_window = long_window;
        self
    }
}

/// Closing prices with both moving averages, before any investment maths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceOverlay {
    pub prices: PriceSeries,
    pub short_sma: MovingAverageSeries,
    pub long_sma: MovingAverageSeries,
}

impl PriceOverlay {
    pub fn into_report(self, investment: InvestmentResult) -> Result<Report, AnalysisError> {
        assemble(self.prices, self.short_sma, self.long_sma, investment)
    }
}

/// Normalizes `raw` and computes both moving averages.
pub fn price_overlay(
    raw: &RawPriceTable,
    request: &AnalysisRequest,
) -> Result<PriceOverlay, AnalysisError> {
    let prices = normalize(raw)?;
    let short_sma = compute_sma(&prices, request.short_window)?;
    let long_sma = compute_sma(&prices, request.long_window)?;
    Ok(PriceOverlay {
        prices,
        short_sma,
        long_sma,
    })
}

/// Normalizes `raw`, overlays both moving averages, computes the investment
/// result and assembles the report. Stops at the first error.
pub fn analyze(raw: &RawPriceTable, request: &AnalysisRequest) -> Result<Report, AnalysisError> {
    let overlay = price_overlay(raw, request)?;
    let investment = compute_return(&overlay.prices, &request.params)?;
    overlay.into_report(investment)
}
