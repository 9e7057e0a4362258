//! Command implementations for WQM CLI.
//!
//! Provides one-shot subcommands that print view descriptions as JSON, and
//! `serve`, which adapts a line-oriented view host to the selection resolver.

use clap::{Args, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use wqm_core::loader::{SourcePaths, DEFAULT_DATA_DIR};

pub mod query;
pub mod session;

/// Where to find the three input CSVs.
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Directory holding Monitoring_Sites.csv, Results.csv and Analytical_Methods.csv
    #[arg(short = 'd', long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Override path of the monitoring sites CSV
    #[arg(long)]
    pub sites: Option<PathBuf>,

    /// Override path of the lab results CSV
    #[arg(long)]
    pub results: Option<PathBuf>,

    /// Override path of the analytical methods CSV
    #[arg(long)]
    pub methods: Option<PathBuf>,
}

impl DataArgs {
    pub fn source_paths(&self) -> SourcePaths {
        let defaults = SourcePaths::from_dir(&self.data_dir);
        SourcePaths {
            sites: self.sites.clone().unwrap_or(defaults.sites),
            results: self.results.clone().unwrap_or(defaults.results),
            methods: self.methods.clone().unwrap_or(defaults.methods),
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Print row counts, known parameters and why rows were dropped
    Summary,

    /// List the dates that have E. coli readings, most recent first
    Dates,

    /// Print the sites map for a date
    Map {
        /// Date in YYYY-MM-DD format (defaults to the most recent E. coli date)
        #[arg(long)]
        date: Option<String>,
    },

    /// Print the time-series chart for a site
    Chart {
        /// Site name, as shown on map markers
        #[arg(short = 's', long)]
        site: String,

        /// Parameter to plot; repeat for several (defaults to all known parameters)
        #[arg(short = 'p', long = "parameter")]
        parameters: Vec<String>,

        /// Date of the reference marker in YYYY-MM-DD format
        #[arg(long)]
        date: Option<String>,
    },

    /// Read JSON-lines events on stdin and write the resulting views on stdout
    Serve,
}

pub fn run(command: Command, paths: &SourcePaths) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match command {
        Command::Summary => query::run_summary(paths, &mut out),
        Command::Dates => query::run_dates(paths, &mut out),
        Command::Map { date } => query::run_map(paths, date.as_deref(), &mut out),
        Command::Chart {
            site,
            parameters,
            date,
        } => query::run_chart(paths, &site, parameters, date.as_deref(), &mut out),
        Command::Serve => {
            let stdin = std::io::stdin();
            let mut host = session::Session::open(paths.clone())?;
            host.run(stdin.lock(), &mut out)
        }
    }?;
    out.flush()?;
    Ok(())
}
