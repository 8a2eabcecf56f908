mod commands;
mod output;

use clap::Parser;
use commands::Commands;
use longmem::{detect_identity, Config, Error, MemoryStore};
use output::{print_json, ErrorResponse};
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// longmem - Per-user long-term semantic memory
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Identity whose memories to use (defaults to LONGMEM_USER, then the OS user)
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            if cli.json {
                print_json(&ErrorResponse {
                    error: e.to_string(),
                });
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, Error> {
    if matches!(cli.command, Commands::Version) {
        return commands::handle_version(cli.json);
    }

    let config = Config::load()?;
    config.ensure_directories()?;

    let identity = detect_identity(cli.user.as_deref());
    let mut store = MemoryStore::open(&config)?;

    commands::execute(&cli.command, &mut store, &identity, cli.json)
}

/// Log to stderr so stdout stays machine-readable. `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
