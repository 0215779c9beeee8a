use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use case_trend::{
    analysis::{FitWindow, TrendModel},
    config::ReportConfig,
    io::{self, ProjectionWriter},
    pipeline::{fit_report, run_report},
    visualization::{print_projection_table, print_series_summary, thousands, Viewer},
};

#[derive(Parser)]
#[command(
    name = "case-trend",
    about = "Case Trend - fit exponential and linear trends to cumulative case counts",
    version,
    author
)]
struct Cli {
    /// Defaults to `render` with the built-in settings
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit every window and write the interactive HTML chart
    Render {
        #[command(flatten)]
        common: CommonArgs,

        /// Path of the HTML chart to write
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the terminal summary
        #[arg(short, long)]
        quiet: bool,

        /// Open the chart once it is written
        #[arg(long)]
        open: bool,

        /// Viewer used by --open: system or none
        #[arg(long, env = "CASE_TREND_VIEWER", default_value = "system")]
        viewer: Viewer,
    },

    /// Display a quick summary of the case table
    Summary {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Fit every window and export the projections as CSV or JSON
    Export {
        #[command(flatten)]
        common: CommonArgs,

        /// Output file path (.csv or .json)
        #[arg(short, long)]
        output: PathBuf,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Args, Default)]
struct CommonArgs {
    /// TOML config file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the case table (CSV)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Population ceiling for projected totals
    #[arg(long)]
    population: Option<f64>,

    /// Projections stop the day before this date (YYYY-MM-DD)
    #[arg(long)]
    horizon: Option<NaiveDate>,

    /// Fit window as DAYS[:MODEL], e.g. 21:exponential or 7:linear (repeatable)
    #[arg(short, long = "window", value_parser = parse_window)]
    windows: Vec<FitWindow>,
}

fn parse_window(s: &str) -> Result<FitWindow, String> {
    let (days, model) = match s.split_once(':') {
        Some((days, model)) => {
            let model = model.parse::<TrendModel>().map_err(|e| e.to_string())?;
            (days, model)
        }
        None => (s, TrendModel::Exponential),
    };
    let days: usize = days
        .trim()
        .parse()
        .map_err(|_| format!("invalid window length '{days}'"))?;
    if days < 2 {
        return Err("a fit window needs at least 2 days".to_string());
    }
    Ok(FitWindow::trailing(days, model))
}

fn load_config(common: CommonArgs) -> Result<ReportConfig> {
    let mut config = match &common.config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::default(),
    };
    if let Some(input) = common.input {
        config.input = input;
    }
    if let Some(population) = common.population {
        config.population = population;
    }
    if let Some(horizon) = common.horizon {
        config.horizon = horizon;
    }
    if !common.windows.is_empty() {
        config.windows = common.windows;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Render {
        common: CommonArgs::default(),
        output: None,
        quiet: false,
        open: false,
        viewer: Viewer::System,
    });

    match command {
        Commands::Render {
            common,
            output,
            quiet,
            open,
            viewer,
        } => {
            let mut config = load_config(common)?;
            if let Some(output) = output {
                config.output = output;
            }

            let run = run_report(&config)?;

            if !quiet {
                println!(
                    "\n{}",
                    format!("{}: {}", config.title, config.input.display())
                        .bold()
                        .cyan()
                );
                print_series_summary(&run.series);
                print_projection_table(&run.projections);
            }
            println!(
                "{} Chart written to {}",
                "Success:".green().bold(),
                config.output.display()
            );
            if open && viewer.open(&config.output)? {
                println!("Opened {} in the {} viewer", config.output.display(), viewer);
            }
        }

        Commands::Summary { common } => {
            let config = load_config(common)?;
            let series = io::read_csv(&config.input, config.year)?;

            println!("\n{}", "Quick Summary".bold().cyan());
            println!("{}", "=".repeat(40));
            println!("  Source:         {}", config.input.display());
            println!("  Observations:   {}", series.len());
            println!("  First date:     {}", series.first_date().format("%b-%d"));
            println!("  Last date:      {}", series.last_date().format("%b-%d"));
            println!("  Latest total:   {}", thousands(series.latest_cases() as f64));
            println!(
                "  % population:   {:.4}%",
                config
                    .projection_settings()
                    .percent_of_population(series.latest_cases() as f64)
            );
        }

        Commands::Export {
            common,
            output,
            pretty,
        } => {
            let config = load_config(common)?;
            let writer = io::writer_for_path(&output, pretty)?;
            let (_, projections) = fit_report(&config)?;
            writer.write(&projections, &output)?;

            println!(
                "{} Exported {} projections -> {}",
                "Success:".green().bold(),
                projections.len(),
                output.display()
            );
        }
    }

    Ok(())
}
