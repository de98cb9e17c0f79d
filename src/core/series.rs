//! Price series types and normalization of raw provider tables.

use super::error::AnalysisError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// A single closing price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: Decimal,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: Decimal) -> Self {
        Self { date, close }
    }
}

/// Closing prices ordered by strictly increasing date.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series, rejecting unordered dates and non-positive closes.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, AnalysisError> {
        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(AnalysisError::MalformedData(format!(
                    "dates must be strictly increasing: {} followed by {}",
                    pair[0].date, pair[1].date
                )));
            }
        }
        if let Some(bad) = points.iter().find(|p| p.close <= Decimal::ZERO) {
            return Err(AnalysisError::MalformedData(format!(
                "non-positive close {} on {}",
                bad.close, bad.date
            )));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }
}

/// Column identifier of a raw table. `instrument` is the optional grouping
/// level some providers wrap single-ticker tables in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnKey {
    pub field: String,
    pub instrument: Option<String>,
}

impl ColumnKey {
    pub fn flat(field: &str) -> Self {
        Self {
            field: field.to_string(),
            instrument: None,
        }
    }

    pub fn grouped(field: &str, instrument: &str) -> Self {
        Self {
            field: field.to_string(),
            instrument: Some(instrument.to_string()),
        }
    }
}

/// Daily OHLC table as returned by a market-data provider.
#[derive(Debug, Clone, Default)]
pub struct RawPriceTable {
    symbol: String,
    index: Vec<NaiveDate>,
    columns: Vec<(ColumnKey, Vec<Option<f64>>)>,
}

impl RawPriceTable {
    pub fn new(symbol: &str, index: Vec<NaiveDate>) -> Self {
        Self {
            symbol: symbol.to_string(),
            index,
            columns: Vec::new(),
        }
    }

    /// Appends a column; its length must match the date index.
    pub fn push_column(
        &mut self,
        key: ColumnKey,
        values: Vec<Option<f64>>,
    ) -> Result<(), AnalysisError> {
        if values.len() != self.index.len() {
            return Err(AnalysisError::MalformedData(format!(
                "column {} has {} values for {} dates",
                key.field,
                values.len(),
                self.index.len()
            )));
        }
        self.columns.push((key, values));
        Ok(())
    }

    pub fn with_column(
        mut self,
        key: ColumnKey,
        values: Vec<Option<f64>>,
    ) -> Result<Self, AnalysisError> {
        self.push_column(key, values)?;
        Ok(self)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn columns(&self) -> impl Iterator<Item = &ColumnKey> {
        self.columns.iter().map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Drops the instrument grouping level when the table holds a single
/// instrument, returning `(field, values)` pairs.
fn flatten_columns(raw: &RawPriceTable) -> Result<Vec<(&str, &[Option<f64>])>, AnalysisError> {
    let instruments: BTreeSet<&str> = raw
        .columns
        .iter()
        .filter_map(|(key, _)| key.instrument.as_deref())
        .collect();

    if instruments.len() > 1 {
        let names: Vec<&str> = instruments.into_iter().collect();
        return Err(AnalysisError::MalformedData(format!(
            "expected a single instrument, found {}",
            names.join(", ")
        )));
    }

    Ok(raw
        .columns
        .iter()
        .map(|(key, values)| (key.field.as_str(), values.as_slice()))
        .collect())
}

/// Reduces a raw provider table to an ascending, date-unique close series.
///
/// Rows without a close are dropped. When a date appears more than once the
/// last observation wins.
pub fn normalize(raw: &RawPriceTable) -> Result<PriceSeries, AnalysisError> {
    if raw.is_empty() {
        return Err(AnalysisError::EmptyData(raw.symbol.clone()));
    }

    let columns = flatten_columns(raw)?;
    let (_, closes) = columns
        .iter()
        .find(|(field, _)| field.eq_ignore_ascii_case("close"))
        .ok_or_else(|| AnalysisError::MalformedData("missing Close column".to_string()))?;

    let mut rows: Vec<(NaiveDate, f64)> = raw
        .index
        .iter()
        .zip(closes.iter())
        .filter_map(|(date, close)| close.map(|c| (*date, c)))
        .collect();

    let dropped = raw.len() - rows.len();
    if dropped > 0 {
        debug!(symbol = %raw.symbol, dropped, "Dropped rows without a close price");
    }
    if rows.is_empty() {
        return Err(AnalysisError::EmptyData(raw.symbol.clone()));
    }

    rows.sort_by_key(|(date, _)| *date);

    let mut points: Vec<PricePoint> = Vec::with_capacity(rows.len());
    for (date, close) in rows {
        let close = Decimal::from_f64(close).ok_or_else(|| {
            AnalysisError::MalformedData(format!("close {close} on {date} is not a finite number"))
        })?;
        let point = PricePoint::new(date, close);
        match points.last_mut() {
            Some(last) if last.date == date => *last = point,
            _ => points.push(point),
        }
    }

    debug!(symbol = %raw.symbol, points = points.len(), "Normalized price series");
    PriceSeries::new(points)
}
