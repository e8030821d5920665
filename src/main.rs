use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use puppy_growth::{
    io::{CsvFormat, JsonFormat, ObservationReader, PredictionWriter},
    models::{BreedCategory, Sex, WeightObservation},
    visualization::{
        print_breed_table, print_prediction_summary, print_prediction_table, print_weight_chart,
    },
    GrowthConfig, GrowthEngine,
};

#[derive(Parser)]
#[command(
    name = "growth-predictor",
    about = "Puppy Growth Predictor - Gompertz growth curves from weight logs",
    version,
    author
)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit a growth curve to a weight log and forecast adult weight
    Predict {
        /// Path to weight log (CSV or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Date of birth (YYYY-MM-DD)
        #[arg(short, long)]
        birth_date: NaiveDate,

        /// Breed size category; estimated from the latest weight when omitted
        #[arg(short, long)]
        category: Option<BreedCategory>,

        /// Sex of the animal (male or female)
        #[arg(short, long, default_value = "male")]
        sex: Sex,

        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the full prediction to a file (.csv or .json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Show the weight curve chart
        #[arg(long)]
        chart: bool,

        /// Show every timeline point
        #[arg(long)]
        table: bool,
    },

    /// Show the growth phase of a breed category at a given date
    Phase {
        /// Date of birth (YYYY-MM-DD)
        #[arg(short, long)]
        birth_date: NaiveDate,

        /// Date to classify (YYYY-MM-DD)
        #[arg(long)]
        on: NaiveDate,

        /// Breed size category
        #[arg(short, long)]
        category: BreedCategory,

        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the breed size categories
    Breeds {
        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn load_observations(path: &Path) -> Result<Vec<WeightObservation>> {
    let reader: Box<dyn ObservationReader> = match extension(path).as_str() {
        "csv" => Box::new(CsvFormat),
        "json" => Box::new(JsonFormat::default()),
        ext => anyhow::bail!("Unsupported file format: .{ext}. Use .csv or .json"),
    };
    reader
        .read(path)
        .with_context(|| format!("Failed to read {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<GrowthConfig> {
    match path {
        Some(path) => GrowthConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(GrowthConfig::default()),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Predict {
            input,
            birth_date,
            category,
            sex,
            config,
            output,
            pretty,
            chart,
            table,
        } => {
            let config = load_config(config.as_deref())?;
            let observations = load_observations(&input)?;
            debug!(count = observations.len(), "loaded observations");

            println!(
                "\n{}",
                format!("Growth Prediction: {}", input.display()).bold().cyan()
            );
            println!("  Loaded {} weight observations", observations.len());

            let breed = category.map(|c| config.breeds.profile(c));
            let engine = GrowthEngine::new(&config);
            let result = engine.predict(&observations, birth_date, breed.as_ref(), sex)?;

            print_prediction_summary(&result);
            if table {
                print_prediction_table(&result);
            }
            if chart {
                print_weight_chart(&result);
            }

            if let Some(output) = output {
                let writer: Box<dyn PredictionWriter> = match extension(&output).as_str() {
                    "csv" => Box::new(CsvFormat),
                    "json" => Box::new(JsonFormat { pretty }),
                    ext => anyhow::bail!("Unsupported output format: .{ext}"),
                };
                writer.write(&result, &output)?;
                println!(
                    "\n{} Prediction written to {}",
                    "Success:".green().bold(),
                    output.display()
                );
            }
        }

        Commands::Phase {
            birth_date,
            on,
            category,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let age = (on - birth_date).num_days();
            if age < 0 {
                anyhow::bail!("Date {on} is before the birth date {birth_date}");
            }
            let profile = config.breeds.profile(category);
            let phase = GrowthEngine::new(&config).classify(age as f64, &profile);

            println!("\n{}", "Growth Phase".bold().cyan());
            println!("{}", "=".repeat(40));
            println!("  Category:       {category}");
            println!("  Age:            {age} days ({:.1} weeks)", age as f64 / 7.0);
            println!("  Phase:          {phase}");
        }

        Commands::Breeds { config } => {
            let config = load_config(config.as_deref())?;
            print_breed_table(&config.breeds);
        }
    }

    Ok(())
}
