//! Buy-and-hold return, CAGR and projection for a single price series.
use super::error::AnalysisError;
use super::series::PriceSeries;
use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, MathematicalOps};
use rust_finprim::rate::cagr;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// User inputs for the return calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentParameters {
    pub invested_amount: Decimal,
    pub projection_years: u32,
}

impl InvestmentParameters {
    pub fn new(invested_amount: Decimal, projection_years: u32) -> Result<Self, AnalysisError> {
        let params = Self {
            invested_amount,
            projection_years,
        };
        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> Result<(), AnalysisError> {
        if self.invested_amount <= Decimal::ZERO {
            return Err(AnalysisError::InvalidParameter(format!(
                "invested amount must be positive, got {}",
                self.invested_amount
            )));
        }
        Ok(())
    }
}

/// Outcome of buying at the first close and holding until the last one.
///
/// Values are kept at full precision; rounding is left to the presentation
/// layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvestmentResult {
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub elapsed_years: i32,
    pub invested_amount: Decimal,
    pub projection_years: u32,
    pub initial_price: Decimal,
    pub final_price: Decimal,
    pub shares_purchased: Decimal,
    pub final_value: Decimal,
    pub profit: Decimal,
    pub profit_percent: Decimal,
    /// Annual growth rate as a fraction, e.g. 0.1447 for 14.47%.
    pub cagr: Decimal,
    pub projected_value: Decimal,
}

impl InvestmentResult {
    pub fn cagr_percent(&self) -> Decimal {
        self.cagr * Decimal::ONE_HUNDRED
    }
}

/// Computes the buy-and-hold result for `params` over `series`.
///
/// Elapsed time is counted in whole calendar years between the first and last
/// dates; a series within a single year has no defined CAGR.
pub fn compute_return(
    series: &PriceSeries,
    params: &InvestmentParameters,
) -> Result<InvestmentResult, AnalysisError> {
    params.validate()?;

    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() >= 2 => (first, last),
        _ => return Err(AnalysisError::InsufficientData(series.len())),
    };

    let invested = params.invested_amount;
    let shares_purchased = invested
        .checked_div(first.close)
        .ok_or(AnalysisError::ArithmeticOverflow("shares purchased"))?;
    let final_value = shares_purchased
        .checked_mul(last.close)
        .ok_or(AnalysisError::ArithmeticOverflow("final value"))?;
    let profit = final_value
        .checked_sub(invested)
        .ok_or(AnalysisError::ArithmeticOverflow("profit"))?;
    let profit_percent = profit
        .checked_div(invested)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or(AnalysisError::ArithmeticOverflow("profit percent"))?;

    let elapsed_years = last.date.year() - first.date.year();
    if elapsed_years <= 0 {
        return Err(AnalysisError::UndefinedCagr(first.date.year()));
    }

    let rate = cagr(first.close, last.close, Decimal::from(elapsed_years));
    let projected_value = (Decimal::ONE + rate)
        .checked_powi(i64::from(params.projection_years))
        .and_then(|growth| invested.checked_mul(growth))
        .ok_or(AnalysisError::ArithmeticOverflow("projected value"))?;

    debug!(
        "return: {invested} at {} -> {}, {elapsed_years}yrs, cagr {rate}, projected {projected_value}",
        first.close, last.close
    );

    Ok(InvestmentResult {
        first_date: first.date,
        last_date: last.date,
        elapsed_years,
        invested_amount: invested,
        projection_years: params.projection_years,
        initial_price: first.close,
        final_price: last.close,
        shares_purchased,
        final_value,
        profit,
        profit_percent,
        cagr: rate,
        projected_value,
    })
}
