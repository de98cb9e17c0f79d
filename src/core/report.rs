//! Packages the computed pieces into a single report for presentation.

use super::error::AnalysisError;
use super::indicators::MovingAverageSeries;
use super::investment::InvestmentResult;
use super::series::PriceSeries;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub prices: PriceSeries,
    pub short_sma: MovingAverageSeries,
    pub long_sma: MovingAverageSeries,
    pub investment: InvestmentResult,
}

fn check_alignment(
    prices: &PriceSeries,
    sma: &MovingAverageSeries,
    label: &str,
) -> Result<(), AnalysisError> {
    if sma.len() != prices.len() {
        return Err(AnalysisError::Assembly(format!(
            "{label} SMA({}) has {} points, price series has {}",
            sma.window,
            sma.len(),
            prices.len()
        )));
    }
    if let Some((date, _)) = sma
        .values
        .iter()
        .zip(prices.dates())
        .map(|((sma_date, _), price_date)| (*sma_date, price_date))
        .find(|(sma_date, price_date)| sma_date != price_date)
    {
        return Err(AnalysisError::Assembly(format!(
            "{label} SMA({}) is not aligned with the price series at {date}",
            sma.window
        )));
    }
    Ok(())
}

/// Assembles a report. No computation happens here; inputs are only checked
/// for consistency with the price series.
pub fn assemble(
    prices: PriceSeries,
    short_sma: MovingAverageSeries,
    long_sma: MovingAverageSeries,
    investment: InvestmentResult,
) -> Result<Report, AnalysisError> {
    check_alignment(&prices, &short_sma, "short")?;
    check_alignment(&prices, &long_sma, "long")?;

    let ends = prices.first().zip(prices.last()).map(|(f, l)| (f.date, l.date));
    if ends != Some((investment.first_date, investment.last_date)) {
        return Err(AnalysisError::Assembly(format!(
            "investment period {} to {} does not match the price series",
            investment.first_date, investment.last_date
        )));
    }

    Ok(Report {
        prices,
        short_sma,
        long_sma,
        investment,
    })
}
