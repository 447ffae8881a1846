//! # Takeoff CLI Application
//!
//! Terminal front end for the `takeoff_core` estimation engine.
//!
//! ## Layout
//! ```text
//! main.rs
//!   ├── cli.rs       (argument definitions)
//!   └── commands.rs  (command execution)
//! ```
//!
//! Logging goes to stderr and is filtered by `TAKEOFF_LOG`
//! (e.g. `TAKEOFF_LOG=takeoff_core=debug`); the default level is `warn`.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use takeoff_core::errors::CalcError;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_env("TAKEOFF_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report_error(err: &anyhow::Error, json: bool) {
    if json {
        if let Some(calc) = err.downcast_ref::<CalcError>() {
            match serde_json::to_string_pretty(calc) {
                Ok(body) => println!("{}", body),
                Err(e) => tracing::error!("could not serialize error: {}", e),
            }
        }
    }
    eprintln!("Error: {:#}", err);
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = commands::run(cli) {
        report_error(&e, json);
        std::process::exit(1);
    }
}
