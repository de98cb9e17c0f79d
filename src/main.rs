use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, CommandFactory, Parser, Subcommand};
use rust_decimal::Decimal;
use tickerdash::cli::analyze::AnalyzeOptions;
use tickerdash::core::Feedback;
use tickerdash::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Ticker symbol, e.g. AAPL or PETR4.SA
    #[arg(short, long)]
    ticker: Option<String>,

    /// First day of the period (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Day after the last day of the period (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Amount invested on the first day
    #[arg(short, long)]
    amount: Option<Decimal>,

    /// Years to project forward at the historical CAGR
    #[arg(short, long)]
    years: Option<u32>,

    /// Number of most recent prices to show
    #[arg(long, default_value_t = 20)]
    rows: usize,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl From<AnalyzeArgs> for AnalyzeOptions {
    fn from(args: AnalyzeArgs) -> Self {
        AnalyzeOptions {
            ticker: args.ticker,
            start: args.start,
            end: args.end,
            amount: args.amount,
            years: args.years,
            rows: args.rows,
            json: args.json,
        }
    }
}

#[derive(Args)]
struct FeedbackArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    email: String,

    /// Optional phone or other contact
    #[arg(long, default_value = "")]
    contact: String,

    /// The feedback message
    message: String,
}

impl From<Commands> for tickerdash::AppCommand {
    fn from(cmd: Commands) -> tickerdash::AppCommand {
        match cmd {
            Commands::Tickers => tickerdash::AppCommand::Tickers,
            Commands::Analyze(args) => tickerdash::AppCommand::Analyze(args.into()),
            Commands::Explore(args) => tickerdash::AppCommand::Explore(args.into()),
            Commands::Fundamentals { ticker } => tickerdash::AppCommand::Fundamentals(ticker),
            Commands::Feedback(args) => tickerdash::AppCommand::Feedback(Feedback {
                name: args.name,
                email: args.email,
                contact: args.contact,
                feedback: args.message,
            }),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List known tickers
    Tickers,
    /// Show prices, moving averages, investment return and fundamentals
    Analyze(AnalyzeArgs),
    /// Interactively try different investment amounts and horizons
    Explore(AnalyzeArgs),
    /// Show key ratios for a ticker
    Fundamentals {
        /// Ticker symbol; defaults to the configured ticker
        ticker: Option<String>,
    },
    /// Send feedback to the configured endpoint
    Feedback(FeedbackArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => tickerdash::cli::setup::setup(),
        Some(cmd) => tickerdash::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
