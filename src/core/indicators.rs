//! Trailing moving averages over a price series.

use super::error::AnalysisError;
use super::series::PriceSeries;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Moving average aligned with its source series. The first `window - 1`
/// entries have no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovingAverageSeries {
    pub window: usize,
    pub values: Vec<(NaiveDate, Option<Decimal>)>,
}

impl MovingAverageSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn latest(&self) -> Option<Decimal> {
        self.values.last().and_then(|(_, v)| *v)
    }
}

/// Simple moving average of closing prices over `window` points.
///
/// Keeps a running sum, adding the newest close and subtracting the one that
/// falls out of the window.
pub fn compute_sma(
    series: &PriceSeries,
    window: usize,
) -> Result<MovingAverageSeries, AnalysisError> {
    if window == 0 {
        return Err(AnalysisError::InvalidWindow);
    }

    let points = series.points();
    let divisor = Decimal::from(window);
    let values = points
        .iter()
        .enumerate()
        .scan(Decimal::ZERO, |sum, (i, point)| {
            *sum += point.close;
            if i >= window {
                *sum -= points[i - window].close;
            }
            let avg = (i + 1 >= window).then(|| *sum / divisor);
            Some((point.date, avg))
        })
        .collect();

    Ok(MovingAverageSeries { window, values })
}
