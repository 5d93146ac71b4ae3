pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "primavent",
    about = "Prima Vent storefront bot operator CLI",
    long_about = "Inspect configuration, check runtime readiness, dump the catalog, and run an offline checkout smoke test.",
    after_help = "Examples:\n  primavent doctor --json\n  primavent config\n  primavent catalog --path catalog.toml\n  primavent smoke"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, bot token shape, and catalog readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Print the product catalog as JSON (built-in unless a file is given)")]
    Catalog {
        #[arg(long, help = "TOML catalog file to load instead of the built-in assortment")]
        path: Option<PathBuf>,
    },
    #[command(about = "Drive a scripted checkout through the dialogue router with per-check timing")]
    Smoke,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Catalog { path } => commands::catalog::run(path.as_deref()),
        Command::Smoke => commands::smoke::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
