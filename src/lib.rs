pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::analyze::AnalyzeOptions;
use crate::core::Feedback;
use crate::core::config::AppConfig;
use crate::providers::{FormFeedbackSink, YahooFinanceProvider};
use anyhow::{Context, Result};
use tracing::{debug, info};

/// Commands that need a loaded configuration.
#[derive(Debug, Clone)]
pub enum AppCommand {
    Tickers,
    Analyze(AnalyzeOptions),
    Explore(AnalyzeOptions),
    Fundamentals(Option<String>),
    Feedback(Feedback),
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("tickerdash starting...");
    let config = load_config(config_path)?;

    let yahoo = config.yahoo();
    let market = || YahooFinanceProvider::new(&yahoo.base_url, yahoo.timeout_secs);

    match command {
        AppCommand::Tickers => {
            cli::tickers::run(&config.tickers);
            Ok(())
        }
        AppCommand::Analyze(options) => {
            let provider = market()?;
            cli::analyze::run(
                &options,
                &config.defaults,
                &config.tickers,
                &provider,
                &provider,
            )
            .await
        }
        AppCommand::Explore(options) => {
            let provider = market()?;
            cli::explore::run(&options, &config.defaults, &config.tickers, &provider).await
        }
        AppCommand::Fundamentals(ticker) => {
            let provider = market()?;
            let ticker = ticker.unwrap_or_else(|| config.defaults.ticker.clone());
            cli::fundamentals::run(&ticker, &config.tickers, &provider).await
        }
        AppCommand::Feedback(feedback) => {
            let endpoint = config
                .feedback
                .endpoint
                .as_deref()
                .context("No feedback endpoint configured; set feedback.endpoint in the config")?;
            let sink = FormFeedbackSink::new(endpoint, config.feedback.timeout_secs)?;
            cli::feedback::run(&sink, &feedback).await
        }
    }
}
