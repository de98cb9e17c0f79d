use super::{error_text, fundamentals, report_error, ui};
use crate::core::catalog::TickerCatalog;
use crate::core::config::DefaultsConfig;
use crate::core::{
    AnalysisError, AnalysisRequest, Fundamentals, FundamentalsProvider, InvestmentParameters,
    InvestmentResult, MarketDataProvider, MovingAverageSeries, PriceOverlay, PriceSeries,
    RawPriceTable, Report, compute_return, price_overlay,
};
use chrono::NaiveDate;
use comfy_table::{Attribute, Cell};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

/// Inputs from the command line; unset fields fall back to the configured
/// defaults.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub ticker: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub years: Option<u32>,
    pub rows: usize,
    pub json: bool,
}

/// Fully resolved inputs for one analysis pass.
#[derive(Debug, Clone)]
pub struct AnalysisInputs {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub request: AnalysisRequest,
}

impl AnalyzeOptions {
    pub fn resolve(&self, defaults: &DefaultsConfig) -> Result<AnalysisInputs, AnalysisError> {
        let ticker = self
            .ticker
            .as_deref()
            .unwrap_or(&defaults.ticker)
            .trim()
            .to_uppercase();
        if ticker.is_empty() {
            return Err(AnalysisError::InvalidParameter(
                "ticker must not be empty".to_string(),
            ));
        }

        let start = self.start.unwrap_or(defaults.start_date);
        let end = self.end.unwrap_or(defaults.end_date);
        if end <= start {
            return Err(AnalysisError::InvalidParameter(format!(
                "end date {end} must be after start date {start}"
            )));
        }

        let params = InvestmentParameters::new(
            self.amount.unwrap_or(defaults.invested_amount),
            self.years.unwrap_or(defaults.projection_years),
        )?;
        let request = AnalysisRequest::new(params)
            .with_windows(defaults.short_window, defaults.long_window);

        Ok(AnalysisInputs {
            ticker,
            start,
            end,
            request,
        })
    }
}

/// Price section of a dashboard, with or without the investment simulation.
/// The moving averages never depend on the investment maths succeeding.
#[derive(Debug)]
pub enum Analysis {
    Complete(Report),
    PricesOnly {
        overlay: PriceOverlay,
        investment_error: AnalysisError,
    },
}

impl Analysis {
    pub fn run(raw: &RawPriceTable, request: &AnalysisRequest) -> Result<Self, AnalysisError> {
        let overlay = price_overlay(raw, request)?;
        match compute_return(&overlay.prices, &request.params) {
            Ok(investment) => Ok(Analysis::Complete(overlay.into_report(investment)?)),
            Err(investment_error) => {
                warn!(error = %investment_error, "Investment simulation failed");
                Ok(Analysis::PricesOnly {
                    overlay,
                    investment_error,
                })
            }
        }
    }

    pub fn prices(&self) -> &PriceSeries {
        match self {
            Analysis::Complete(report) => &report.prices,
            Analysis::PricesOnly { overlay, .. } => &overlay.prices,
        }
    }

    pub fn moving_averages(&self) -> (&MovingAverageSeries, &MovingAverageSeries) {
        match self {
            Analysis::Complete(report) => (&report.short_sma, &report.long_sma),
            Analysis::PricesOnly { overlay, .. } => (&overlay.short_sma, &overlay.long_sma),
        }
    }

    pub fn investment(&self) -> Result<&InvestmentResult, &AnalysisError> {
        match self {
            Analysis::Complete(report) => Ok(&report.investment),
            Analysis::PricesOnly {
                investment_error, ..
            } => Err(investment_error),
        }
    }
}

/// Everything shown for one ticker. Fundamentals are optional: a failure
/// there never hides the price report.
#[derive(Debug)]
pub struct Dashboard {
    pub ticker: String,
    pub name: String,
    pub analysis: Analysis,
    pub fundamentals: Result<Fundamentals, AnalysisError>,
}

#[derive(Serialize)]
struct DashboardJson<'a> {
    ticker: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a Report>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prices: Option<&'a PriceOverlay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    investment_error: Option<String>,
    fundamentals: Option<&'a Fundamentals>,
    fundamentals_error: Option<String>,
}

impl Dashboard {
    pub fn to_json(&self) -> serde_json::Result<String> {
        let (report, prices, investment_error) = match &self.analysis {
            Analysis::Complete(report) => (Some(report), None, None),
            Analysis::PricesOnly {
                overlay,
                investment_error,
            } => (None, Some(overlay), Some(investment_error.to_string())),
        };
        serde_json::to_string_pretty(&DashboardJson {
            ticker: &self.ticker,
            name: &self.name,
            report,
            prices,
            investment_error,
            fundamentals: self.fundamentals.as_ref().ok(),
            fundamentals_error: self.fundamentals.as_ref().err().map(|e| e.to_string()),
        })
    }

    pub fn display(&self, rows: usize) -> String {
        let prices = self.analysis.prices();
        let (short_sma, long_sma) = self.analysis.moving_averages();
        let period = prices
            .first()
            .zip(prices.last())
            .map(|(first, last)| format!("{} to {}, ", first.date, last.date))
            .unwrap_or_default();
        let mut out = format!(
            "{}\n{}\n\n",
            ui::style_text(
                &format!("Stock analysis: {} ({})", self.name, self.ticker),
                ui::StyleType::Title
            ),
            ui::style_text(
                &format!("{period}{} trading days", prices.len()),
                ui::StyleType::Subtle
            ),
        );

        out.push_str(&price_table(prices, short_sma, long_sma, rows));
        out.push('\n');
        if let Some(trend) = trend_line(short_sma, long_sma) {
            out.push_str(&trend);
            out.push('\n');
        }

        out.push_str(&format!(
            "\n{}\n",
            ui::style_text("Investment simulation", ui::StyleType::TotalLabel)
        ));
        match self.analysis.investment() {
            Ok(investment) => out.push_str(&investment_table(investment)),
            Err(e) => out.push_str(&ui::style_text(&error_text(e), ui::StyleType::Error)),
        }
        out.push('\n');

        out.push_str(&format!(
            "\n{}\n",
            ui::style_text("Fundamentals", ui::StyleType::TotalLabel)
        ));
        match &self.fundamentals {
            Ok(f) => {
                out.push_str(&fundamentals::fundamentals_table(f));
                out.push_str(&format!("\nSearch: {}\n", f.search_url()));
            }
            Err(e) => out.push_str(&format!(
                "{}\n",
                ui::style_text(
                    &format!("Fundamentals unavailable: {}", e.user_message()),
                    ui::StyleType::Error
                )
            )),
        }
        out
    }
}

/// Latest `rows` closes with both moving averages.
pub fn price_table(
    prices: &PriceSeries,
    short_sma: &MovingAverageSeries,
    long_sma: &MovingAverageSeries,
    rows: usize,
) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Close"),
        ui::header_cell(&format!("SMA {}", short_sma.window)),
        ui::header_cell(&format!("SMA {}", long_sma.window)),
    ]);

    let points = prices.points();
    let skip = points.len().saturating_sub(rows);
    for (i, point) in points.iter().enumerate().skip(skip) {
        let short = short_sma.values.get(i).and_then(|(_, v)| *v);
        let long = long_sma.values.get(i).and_then(|(_, v)| *v);
        table.add_row(vec![
            Cell::new(point.date.to_string()),
            ui::amount_cell(point.close),
            ui::format_optional_cell(short, |v| ui::format_decimal(v, 2)),
            ui::format_optional_cell(long, |v| ui::format_decimal(v, 2)),
        ]);
    }

    table.to_string()
}

/// Describes where the short average sits relative to the long one.
pub fn trend_line(short_sma: &MovingAverageSeries, long_sma: &MovingAverageSeries) -> Option<String> {
    let short = short_sma.latest()?;
    let long = long_sma.latest()?;
    let (relation, hint) = if short > long {
        ("above", "upward trend")
    } else if short < long {
        ("below", "downward trend")
    } else {
        ("equal to", "no clear trend")
    };
    Some(format!(
        "Trend: SMA {} is {relation} SMA {} ({hint})",
        short_sma.window, long_sma.window
    ))
}

pub fn investment_table(result: &InvestmentResult) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Metric"), ui::header_cell("Value")]);

    let rows = vec![
        ("Invested amount", ui::amount_cell(result.invested_amount)),
        ("Initial price", ui::amount_cell(result.initial_price)),
        ("Final price", ui::amount_cell(result.final_price)),
        (
            "Shares purchased",
            Cell::new(ui::format_decimal(result.shares_purchased, 4))
                .set_alignment(comfy_table::CellAlignment::Right),
        ),
        ("Final value", ui::amount_cell(result.final_value)),
        ("Profit", ui::change_cell(result.profit, "")),
        ("Return", ui::change_cell(result.profit_percent, "%")),
        (
            "CAGR",
            ui::change_cell(result.cagr_percent(), "%"),
        ),
    ];
    for (label, cell) in rows {
        table.add_row(vec![Cell::new(label), cell]);
    }
    table.add_row(vec![
        Cell::new(format!(
            "Projected value in {} years",
            result.projection_years
        ))
        .add_attribute(Attribute::Bold),
        ui::amount_cell(result.projected_value).add_attribute(Attribute::Bold),
    ]);

    table.to_string()
}

/// Fetches prices and fundamentals concurrently and assembles the dashboard.
pub async fn build_dashboard(
    inputs: &AnalysisInputs,
    market: &dyn MarketDataProvider,
    fundamentals_provider: &dyn FundamentalsProvider,
    catalog: &TickerCatalog,
) -> Result<Dashboard, AnalysisError> {
    let (history, company) = futures::join!(
        market.fetch_history(&inputs.ticker, inputs.start, inputs.end),
        fundamentals_provider.fetch_fundamentals(&inputs.ticker)
    );

    let analysis = Analysis::run(&history?, &inputs.request)?;
    if let Err(e) = &company {
        warn!(error = %e, "Fundamentals unavailable for {}", inputs.ticker);
    }

    let name = match &company {
        Ok(Fundamentals {
            short_name: Some(short_name),
            ..
        }) if !catalog.contains(&inputs.ticker) => short_name.clone(),
        _ => catalog.display_name(&inputs.ticker),
    };

    Ok(Dashboard {
        ticker: inputs.ticker.clone(),
        name,
        analysis,
        fundamentals: company,
    })
}

pub async fn run(
    options: &AnalyzeOptions,
    defaults: &DefaultsConfig,
    catalog: &TickerCatalog,
    market: &dyn MarketDataProvider,
    fundamentals_provider: &dyn FundamentalsProvider,
) -> anyhow::Result<()> {
    let inputs = match options.resolve(defaults) {
        Ok(inputs) => inputs,
        Err(e) => {
            report_error(&e);
            return Ok(());
        }
    };
    info!(
        "Analyzing {} from {} to {}",
        inputs.ticker, inputs.start, inputs.end
    );

    let pb = ui::new_spinner(&format!("Fetching {}...", inputs.ticker));
    let result = build_dashboard(&inputs, market, fundamentals_provider, catalog).await;
    pb.finish_and_clear();

    match result {
        Ok(dashboard) if options.json => println!("{}", dashboard.to_json()?),
        Ok(dashboard) => println!("{}", dashboard.display(options.rows)),
        Err(e) => report_error(&e),
    }
    Ok(())
}
