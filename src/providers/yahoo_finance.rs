use super::util::{date_to_timestamp, http_client, timestamp_to_date};
use crate::core::market::Result;
use crate::core::{
    AnalysisError, ColumnKey, Fundamentals, FundamentalsProvider, MarketDataProvider,
    RawPriceTable,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, instrument};

/// Price history and company data from the Yahoo Finance HTTP API.
pub struct YahooFinanceProvider {
    base_url: String,
    client: reqwest::Client,
}

impl YahooFinanceProvider {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        Ok(YahooFinanceProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client(timeout_secs)?,
        })
    }

    /// `{base}/{segments..}/{ticker}` with the ticker escaped as one path
    /// segment.
    fn endpoint(&self, segments: &[&str], ticker: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            AnalysisError::InvalidParameter(format!("invalid base url {}: {e}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                AnalysisError::InvalidParameter(format!(
                    "base url {} cannot take a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments)
            .push(ticker);
        Ok(url)
    }

    async fn get_text(&self, url: Url, ticker: &str) -> Result<(StatusCode, String)> {
        debug!("Requesting {}", url);
        let response = self.client.get(url).send().await.map_err(|e| {
            let kind = if e.is_timeout() { "Request timed out" } else { "Request error" };
            AnalysisError::ExternalService(format!("{kind}: {e} for symbol: {ticker}"))
        })?;
        let status = response.status();
        debug!(%status, "Received Yahoo response");
        let text = response.text().await?;
        Ok((status, text))
    }
}

#[derive(Deserialize, Debug)]
struct YahooChartResponse {
    chart: ChartEnvelope,
}

#[derive(Deserialize, Debug)]
struct ChartEnvelope {
    result: Option<Vec<ChartItem>>,
    error: Option<YahooApiError>,
}

#[derive(Deserialize, Debug)]
struct YahooApiError {
    code: String,
    description: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ChartItem {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Deserialize, Debug)]
struct ChartMeta {
    symbol: Option<String>,
    #[serde(alias = "gmtoffset", default)]
    gmt_offset: i64,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Deserialize, Debug, Default)]
struct Quote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<f64>>>,
}

#[derive(Deserialize, Debug)]
struct AdjClose {
    adjclose: Option<Vec<Option<f64>>>,
}

/// Lays the chart item out as an OHLC table with every column grouped under
/// the instrument symbol.
fn build_table(ticker: &str, item: ChartItem) -> Result<RawPriceTable> {
    let timestamps = match item.timestamp {
        Some(ts) if !ts.is_empty() => ts,
        _ => return Err(AnalysisError::EmptyData(ticker.to_string())),
    };
    let instrument = item.meta.symbol.unwrap_or_else(|| ticker.to_string());

    let index = timestamps
        .iter()
        .map(|ts| {
            timestamp_to_date(ts + item.meta.gmt_offset).ok_or_else(|| {
                AnalysisError::MalformedData(format!("invalid timestamp {ts} for {ticker}"))
            })
        })
        .collect::<Result<Vec<NaiveDate>>>()?;

    let mut indicators = item.indicators.unwrap_or(Indicators {
        quote: Vec::new(),
        adjclose: Vec::new(),
    });
    let quote = if indicators.quote.is_empty() {
        Quote::default()
    } else {
        indicators.quote.swap_remove(0)
    };
    let adj_close = indicators
        .adjclose
        .into_iter()
        .next()
        .and_then(|a| a.adjclose);

    let mut table = RawPriceTable::new(ticker, index);
    for (field, values) in [
        ("Open", quote.open),
        ("High", quote.high),
        ("Low", quote.low),
        ("Close", quote.close),
        ("Adj Close", adj_close),
        ("Volume", quote.volume),
    ] {
        if let Some(values) = values {
            table.push_column(ColumnKey::grouped(field, &instrument), values)?;
        }
    }

    debug!(rows = table.len(), "Built price table for {}", ticker);
    Ok(table)
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    #[instrument(
        name = "YahooHistoryFetch",
        skip(self),
        fields(symbol = %ticker)
    )]
    async fn fetch_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawPriceTable> {
        if end <= start {
            return Err(AnalysisError::InvalidParameter(format!(
                "end date {end} must be after start date {start}"
            )));
        }

        let mut url = self.endpoint(&["v8", "finance", "chart"], ticker)?;
        url.query_pairs_mut()
            .append_pair("period1", &date_to_timestamp(start).to_string())
            .append_pair("period2", &date_to_timestamp(end).to_string())
            .append_pair("interval", "1d")
            .append_pair("events", "history");
        let (status, text) = self.get_text(url, ticker).await?;

        let data: YahooChartResponse = serde_json::from_str(&text).map_err(|e| {
            if status.is_success() {
                AnalysisError::ExternalService(format!(
                    "Failed to parse chart response for {ticker}: {e}"
                ))
            } else {
                AnalysisError::ExternalService(format!("HTTP error: {status} for symbol: {ticker}"))
            }
        })?;

        if let Some(err) = data.chart.error {
            debug!(code = %err.code, description = ?err.description, "Yahoo chart error");
            return Err(if status == StatusCode::NOT_FOUND || err.code == "Not Found" {
                AnalysisError::EmptyData(ticker.to_string())
            } else {
                AnalysisError::ExternalService(format!(
                    "{}: {} for symbol: {ticker}",
                    err.code,
                    err.description.unwrap_or_default()
                ))
            });
        }
        if !status.is_success() {
            return Err(AnalysisError::ExternalService(format!(
                "HTTP error: {status} for symbol: {ticker}"
            )));
        }

        let item = data
            .chart
            .result
            .and_then(|items| items.into_iter().next())
            .ok_or_else(|| AnalysisError::EmptyData(ticker.to_string()))?;

        build_table(ticker, item)
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummaryEnvelope,
}

#[derive(Deserialize, Debug)]
struct QuoteSummaryEnvelope {
    result: Option<Vec<QuoteSummaryItem>>,
    error: Option<YahooApiError>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryItem {
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(default)]
    summary_detail: Option<SummaryDetail>,
    #[serde(default)]
    financial_data: Option<FinancialData>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    short_name: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawValue>,
    dividend_yield: Option<RawValue>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct FinancialData {
    return_on_equity: Option<RawValue>,
    profit_margins: Option<RawValue>,
}

/// Yahoo wraps numbers as `{"raw": 1.23, "fmt": "1.23"}`; either may be
/// missing.
#[derive(Deserialize, Debug)]
struct RawValue {
    raw: Option<f64>,
}

fn raw(value: Option<RawValue>) -> Option<f64> {
    value.and_then(|v| v.raw).filter(|v| v.is_finite())
}

#[async_trait]
impl FundamentalsProvider for YahooFinanceProvider {
    #[instrument(
        name = "YahooFundamentalsFetch",
        skip(self),
        fields(symbol = %ticker)
    )]
    async fn fetch_fundamentals(&self, ticker: &str) -> Result<Fundamentals> {
        let mut url = self.endpoint(&["v10", "finance", "quoteSummary"], ticker)?;
        url.query_pairs_mut()
            .append_pair("modules", "price,summaryDetail,financialData");
        let (status, text) = self.get_text(url, ticker).await?;

        if !status.is_success() {
            return Err(AnalysisError::ExternalService(format!(
                "HTTP error: {status} for symbol: {ticker}"
            )));
        }

        let data: QuoteSummaryResponse = serde_json::from_str(&text).map_err(|e| {
            AnalysisError::ExternalService(format!(
                "Failed to parse fundamentals response for {ticker}: {e}"
            ))
        })?;

        if let Some(err) = data.quote_summary.error {
            return Err(AnalysisError::ExternalService(format!(
                "{}: {} for symbol: {ticker}",
                err.code,
                err.description.unwrap_or_default()
            )));
        }

        let item = data
            .quote_summary
            .result
            .and_then(|items| items.into_iter().next())
            .ok_or_else(|| AnalysisError::EmptyData(ticker.to_string()))?;

        let (trailing_pe, dividend_yield) = item
            .summary_detail
            .map_or((None, None), |s| (raw(s.trailing_pe), raw(s.dividend_yield)));
        let (return_on_equity, profit_margins) = item
            .financial_data
            .map_or((None, None), |f| (raw(f.return_on_equity), raw(f.profit_margins)));

        Ok(Fundamentals {
            symbol: ticker.to_uppercase(),
            short_name: item.price.and_then(|p| p.short_name),
            trailing_pe,
            dividend_yield,
            return_on_equity,
            profit_margins,
        })
    }
}
