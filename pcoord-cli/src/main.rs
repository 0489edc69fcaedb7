use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod error;
mod loader;

use config::{Config, OutputFormat};
use error::CliError;

#[derive(Parser)]
#[command(name = "pcoord")]
#[command(about = "pcoord - parallel-coordinates queries over cinema databases")]
#[command(version)]
#[command(long_about = "
pcoord loads a cinema database (a directory with data.csv, or an entry of a
databases.json listing), brushes its axes, runs similarity queries and pages
through the results.

Examples:
  pcoord info sphere.cdb
  pcoord list databases.json
  pcoord select databases.json --name Sphere --brush 'time=0:5' --brush 'phi=a,b'
  pcoord similar sphere.cdb --target time=2.5 --target theta=40 --tolerance 20
  pcoord paths sphere.cdb --order theta,phi,time --smooth
  pcoord config --example > pcoord.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format for listings
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Database directory, data.csv file, or databases.json listing
    pub db: PathBuf,

    /// Database to use from a listing (defaults to the first entry)
    #[arg(long)]
    pub name: Option<String>,

    /// Regex over column names marking file references
    #[arg(long)]
    pub file_pattern: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ResultArgs {
    /// Dimension to sort results by
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort in descending order
    #[arg(long)]
    pub descending: bool,

    /// Results per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Page to show, starting at 1
    #[arg(long)]
    pub page: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Describe the dimensions of a database
    Info {
        #[command(flatten)]
        db: DatabaseArgs,
    },

    /// List the databases of a databases.json listing
    List {
        /// Listing file
        listing: PathBuf,
    },

    /// Brush axes and list the selected rows
    Select {
        #[command(flatten)]
        db: DatabaseArgs,

        /// Brush as dim=lo:hi (numeric) or dim=a,b (categorical); repeatable
        #[arg(short, long)]
        brush: Vec<String>,

        #[command(flatten)]
        results: ResultArgs,
    },

    /// Find rows similar to a query path
    Similar {
        #[command(flatten)]
        db: DatabaseArgs,

        /// Query target as dim=value; repeatable
        #[arg(short, long)]
        target: Vec<String>,

        /// Query target as dim=position on a 0-100 slider; repeatable
        #[arg(long)]
        slider: Vec<String>,

        /// Tolerance percentage shared by all targets (0-100)
        #[arg(long)]
        tolerance: Option<f64>,

        #[command(flatten)]
        results: ResultArgs,
    },

    /// Project selected rows and query overlays to chart coordinates (JSON)
    Paths {
        #[command(flatten)]
        db: DatabaseArgs,

        /// Brush as dim=lo:hi or dim=a,b; repeatable
        #[arg(short, long)]
        brush: Vec<String>,

        /// Query target as dim=value; repeatable
        #[arg(short, long)]
        target: Vec<String>,

        /// Axis order as comma-separated dimension names
        #[arg(long)]
        order: Option<String>,

        /// JSON file of named axis orderings
        #[arg(long, requires = "ordering")]
        orderings: Option<PathBuf>,

        /// Named ordering to apply from --orderings
        #[arg(long, requires = "orderings")]
        ordering: Option<String>,

        /// Draw paths as smooth curves
        #[arg(long)]
        smooth: bool,

        /// Chart width in pixels
        #[arg(long)]
        width: Option<f64>,

        /// Chart height in pixels
        #[arg(long)]
        height: Option<f64>,

        /// Maximum number of row paths to emit
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show every value and file of one row
    Show {
        #[command(flatten)]
        db: DatabaseArgs,

        /// Row index
        #[arg(long)]
        row: usize,
    },

    /// Print or write configuration
    Config {
        /// Print an example configuration
        #[arg(long)]
        example: bool,

        /// Write the effective configuration to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Error
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_secs()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let format = cli.format.unwrap_or(config.output.format);

    match cli.command {
        Commands::Info { db } => {
            commands::info::execute(&config, db, format)?;
        }

        Commands::List { listing } => {
            commands::list::execute(&listing, format)?;
        }

        Commands::Select { db, brush, results } => {
            commands::select::execute(&config, db, brush, results, format)?;
        }

        Commands::Similar {
            db,
            target,
            slider,
            tolerance,
            results,
        } => {
            let query = commands::similar::QueryArgs {
                targets: target,
                sliders: slider,
                tolerance,
            };
            commands::similar::execute(&config, db, query, results, format)?;
        }

        Commands::Paths {
            db,
            brush,
            target,
            order,
            orderings,
            ordering,
            smooth,
            width,
            height,
            limit,
        } => {
            let args = commands::paths::PathArgs {
                brushes: brush,
                targets: target,
                order,
                orderings,
                ordering,
                smooth,
                width,
                height,
                limit,
            };
            commands::paths::execute(&config, db, args)?;
        }

        Commands::Show { db, row } => {
            commands::show::execute(&config, db, row, format)?;
        }

        Commands::Config { example, output } => {
            if example {
                print!("{}", Config::example_toml()?);
            } else if let Some(path) = output {
                config.save_to_file(&path)?;
                log::info!("Configuration written to {}", path.display());
            } else {
                print!("{}", toml::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            error::print_error_and_exit(cli_err);
        }
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
