//! WQM CLI - Command line tool for exploring water quality monitoring results.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "wqm-cli",
    version,
    about = "Water quality monitoring: E. coli severity maps and time-series charts"
)]
struct Cli {
    #[command(flatten)]
    data: wqm_cmd::DataArgs,

    #[command(subcommand)]
    command: wqm_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let paths = cli.data.source_paths();
    log::debug!("Using sources {:?}", paths);
    wqm_cmd::run(cli.command, &paths)
}
