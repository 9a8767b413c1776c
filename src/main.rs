//! bagstat - report per-topic size and message rate of a ROS 2 bag
//!
//! ```text
//! bagstat -f <bag>          # topics of mebibyte scale and above
//! bagstat -f <bag> -v       # all topics
//! bagstat -f <bag> -c       # sort by message count
//! ```

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

use bagstat::analysis::timed_scan;
use bagstat::parsers::Bag;
use bagstat::report::Report;
use bagstat::settings::UserSettings;

#[derive(Parser)]
#[command(name = "bagstat")]
#[command(about = "Per-topic size and rate statistics for a ROS 2 bag", long_about = None)]
struct Cli {
    /// Bag directory or .mcap file to be processed
    #[arg(short, long)]
    file: PathBuf,

    /// Output all topics, including those below one mebibyte
    #[arg(short, long)]
    verbose: bool,

    /// Sort by message count instead of size
    #[arg(short, long)]
    count: bool,

    /// Show the declared message type of each topic
    #[arg(short, long)]
    types: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Settings file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug diagnostics on stderr
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::WARN })
        .with_target(cli.debug)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = match &cli.config {
        Some(path) => UserSettings::load_from(path)?,
        None => UserSettings::load(),
    };
    let options = settings.report_options(cli.verbose, cli.count, cli.types);
    tracing::debug!("Report options: {:?}", options);

    let bag = Bag::open(&cli.file)
        .with_context(|| format!("Failed to open bag {}", cli.file.display()))?;
    let summary = timed_scan(&bag)
        .with_context(|| format!("Failed to read bag {}", cli.file.display()))?;
    let report = Report::build(&summary, bag.list_channels(), &options);
    bag.close();

    let mut stdout = std::io::stdout().lock();
    if cli.json {
        writeln!(stdout, "{}", report.to_json()?)?;
    } else {
        write!(stdout, "{}", report)?;
    }
    stdout.flush()?;
    Ok(())
}
