//! Interactive what-if loop over a fetched price history.

use super::analyze::{AnalysisInputs, AnalyzeOptions, investment_table};
use super::{report_error, ui};
use crate::core::catalog::TickerCatalog;
use crate::core::config::DefaultsConfig;
use crate::core::{
    AnalysisError, InvestmentParameters, MarketDataProvider, PriceSeries, compute_return,
    normalize,
};
use console::Term;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, info};

pub fn is_quit(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "q" | "quit" | "exit")
}

/// Applies one round of user input to `current`. Blank answers keep the
/// previous value.
pub fn next_params(
    current: &InvestmentParameters,
    amount: &str,
    years: &str,
) -> Result<InvestmentParameters, AnalysisError> {
    let amount = match amount.trim() {
        "" => current.invested_amount,
        s => Decimal::from_str(s).map_err(|_| {
            AnalysisError::InvalidParameter(format!("'{s}' is not a valid amount"))
        })?,
    };
    let years = match years.trim() {
        "" => current.projection_years,
        s => s.parse::<u32>().map_err(|_| {
            AnalysisError::InvalidParameter(format!("'{s}' is not a valid number of years"))
        })?,
    };
    InvestmentParameters::new(amount, years)
}

/// Outcome of recomputing the simulation for one set of parameters.
#[derive(Debug)]
pub enum Round {
    /// Rendered investment table.
    Shown(String),
    /// These parameters cannot be simulated; earlier ones still can.
    Rejected(AnalysisError),
    /// The series itself cannot be simulated.
    Finished(AnalysisError),
}

pub fn recompute(series: &PriceSeries, params: &InvestmentParameters) -> Round {
    match compute_return(series, params) {
        Ok(result) => Round::Shown(investment_table(&result)),
        Err(e @ (AnalysisError::InsufficientData(_) | AnalysisError::UndefinedCagr(_))) => {
            Round::Finished(e)
        }
        Err(e) => Round::Rejected(e),
    }
}

fn prompt(term: &Term, label: &str, current: &str) -> std::io::Result<String> {
    term.write_str(&format!("{label} [{current}] (q to quit): "))?;
    term.read_line()
}

async fn load_series(
    inputs: &AnalysisInputs,
    market: &dyn MarketDataProvider,
) -> Result<PriceSeries, AnalysisError> {
    let raw = market
        .fetch_history(&inputs.ticker, inputs.start, inputs.end)
        .await?;
    normalize(&raw)
}

pub async fn run(
    options: &AnalyzeOptions,
    defaults: &DefaultsConfig,
    catalog: &TickerCatalog,
    market: &dyn MarketDataProvider,
) -> anyhow::Result<()> {
    let inputs = match options.resolve(defaults) {
        Ok(inputs) => inputs,
        Err(e) => {
            report_error(&e);
            return Ok(());
        }
    };
    info!("Exploring {}", inputs.ticker);

    let pb = ui::new_spinner(&format!("Fetching {}...", inputs.ticker));
    let series = load_series(&inputs, market).await;
    pb.finish_and_clear();
    let series = match series {
        Ok(series) => series,
        Err(e) => {
            report_error(&e);
            return Ok(());
        }
    };

    println!(
        "{}",
        ui::style_text(
            &format!(
                "{} ({}): {} trading days",
                catalog.display_name(&inputs.ticker),
                inputs.ticker,
                series.len()
            ),
            ui::StyleType::Title
        )
    );

    let term = Term::stdout();
    let mut params = inputs.request.params;
    let mut last_good = params;
    loop {
        match recompute(&series, &params) {
            Round::Shown(table) => {
                println!("{table}");
                last_good = params;
            }
            Round::Rejected(e) => {
                report_error(&e);
                params = last_good;
            }
            Round::Finished(e) => {
                report_error(&e);
                return Ok(());
            }
        }

        let amount = prompt(
            &term,
            "Invested amount",
            &ui::format_decimal(params.invested_amount, 2),
        )?;
        if is_quit(&amount) {
            break;
        }
        let years = prompt(
            &term,
            "Projection years",
            &params.projection_years.to_string(),
        )?;
        if is_quit(&years) {
            break;
        }

        match next_params(&params, &amount, &years) {
            Ok(next) => {
                debug!(?next, "Updated parameters");
                params = next;
            }
            Err(e) => report_error(&e),
        }
        ui::print_separator();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PricePoint;
    use chrono::NaiveDate;

    fn series(points: &[((i32, u32, u32), i64)]) -> PriceSeries {
        PriceSeries::new(
            points
                .iter()
                .map(|((y, m, d), close)| {
                    PricePoint::new(NaiveDate::from_ymd_opt(*y, *m, *d).unwrap(), Decimal::from(*close))
                })
                .collect(),
        )
        .unwrap()
    }

    fn current() -> InvestmentParameters {
        InvestmentParameters::new(Decimal::from(1000), 5).unwrap()
    }

    #[test]
    fn test_blank_input_keeps_previous_values() {
        assert_eq!(next_params(&current(), "", "  ").unwrap(), current());
    }

    #[test]
    fn test_new_values_replace_previous() {
        let next = next_params(&current(), "2500.50", "10").unwrap();
        assert_eq!(next.invested_amount, Decimal::from_str("2500.50").unwrap());
        assert_eq!(next.projection_years, 10);

        let only_years = next_params(&current(), "", "3").unwrap();
        assert_eq!(only_years.invested_amount, Decimal::from(1000));
        assert_eq!(only_years.projection_years, 3);
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        assert!(matches!(
            next_params(&current(), "abc", ""),
            Err(AnalysisError::InvalidParameter(_))
        ));
        assert!(matches!(
            next_params(&current(), "", "-2"),
            Err(AnalysisError::InvalidParameter(_))
        ));
        assert!(matches!(
            next_params(&current(), "0", ""),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_quit_words() {
        assert!(is_quit("q"));
        assert!(is_quit(" Quit\n"));
        assert!(!is_quit(""));
        assert!(!is_quit("100"));
    }

    #[test]
    fn test_recompute_shows_table() {
        let doubled = series(&[((2020, 1, 2), 100), ((2021, 12, 31), 200)]);
        match recompute(&doubled, &current()) {
            Round::Shown(table) => assert!(table.contains("Projected value in 5 years")),
            other => panic!("unexpected round: {other:?}"),
        }
    }

    #[test]
    fn test_overflowing_projection_is_rejected_not_finished() {
        let doubled = series(&[((2020, 1, 2), 100), ((2021, 12, 31), 200)]);
        let huge = next_params(&current(), "", "1000").unwrap();

        match recompute(&doubled, &huge) {
            Round::Rejected(e) => {
                assert_eq!(e, AnalysisError::ArithmeticOverflow("projected value"));
                assert!(e.is_user_correctable());
            }
            other => panic!("unexpected round: {other:?}"),
        }
        // the previous parameters still work on the same series
        assert!(matches!(recompute(&doubled, &current()), Round::Shown(_)));
    }

    #[test]
    fn test_same_year_series_finishes() {
        let same_year = series(&[((2022, 1, 3), 100), ((2022, 6, 1), 120)]);
        assert!(matches!(
            recompute(&same_year, &current()),
            Round::Finished(AnalysisError::UndefinedCagr(2022))
        ));
    }
}
