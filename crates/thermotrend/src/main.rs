mod config;
mod report;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use thermotrend_core::outputs::{trend_frame, write_parquet};
use thermotrend_core::{AnalysisOutcome, AnalysisPipeline, Timeframe};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use report::{render_table, ReportView};

#[derive(Parser, Debug)]
#[command(author, version, about = "CPU temperature trend analysis", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a temperature log and fit its trend
    Analyze(AnalyzeArgs),
    /// Print the effective configuration
    CheckConfig(ConfigArgs),
}

#[derive(Args, Debug, Default)]
struct ConfigArgs {
    /// Config file (defaults to ./thermotrend.toml when present)
    #[arg(long, env = "THERMOTREND_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Temperature log: a header row, then `datetime,value` rows
    #[arg(long, env = "THERMOTREND_INPUT")]
    input: Option<PathBuf>,

    /// Inclusive lower time bound
    #[arg(long, env = "THERMOTREND_START")]
    start: Option<String>,

    /// Inclusive upper time bound
    #[arg(long, env = "THERMOTREND_END")]
    end: Option<String>,

    /// Write the per-sample trend table to this Parquet file
    #[arg(long, env = "THERMOTREND_OUTPUT")]
    output: Option<PathBuf>,

    /// Leave the trend column out of the exported table
    #[arg(long)]
    no_trend: bool,

    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::CheckConfig(args) => {
            let config = AppConfig::load(args.config.as_deref())?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn handle_analyze(args: AnalyzeArgs) -> Result<()> {
    let mut config = AppConfig::load(args.config.config.as_deref())?;
    if args.input.is_some() {
        config.input = args.input;
    }
    if args.start.is_some() {
        config.start = args.start;
    }
    if args.end.is_some() {
        config.end = args.end;
    }
    if args.output.is_some() {
        config.output = args.output;
    }
    if args.no_trend {
        config.trendline = false;
    }

    let input = config
        .input
        .as_ref()
        .context("no input log given (use --input, THERMOTREND_INPUT or the config file)")?;
    let content = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let timeframe = Timeframe::parse(config.start.as_deref(), config.end.as_deref())?;
    let pipeline = AnalysisPipeline::new(config.solver);
    info!(input = %input.display(), timeframe = %timeframe, "starting analysis");

    let report = match pipeline.run_content(&content, &timeframe)? {
        AnalysisOutcome::Completed(report) => report,
        AnalysisOutcome::NoData {
            total_records,
            timeframe,
        } => {
            println!("No data found in timeframe {timeframe} ({total_records} records read).");
            return Ok(());
        }
    };

    match args.format {
        Format::Table => println!("{}", render_table(&report)),
        Format::Json => println!(
            "{}",
            serde_json::to_string_pretty(&ReportView::from(report.as_ref()))?
        ),
    }

    if let Some(path) = &config.output {
        let df = trend_frame(&report, config.trendline).context("failed to build trend table")?;
        write_parquet(&df, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), rows = df.height(), "wrote trend table");
    }

    Ok(())
}
