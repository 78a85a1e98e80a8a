//! Vaxboard Command-Line Client
//!
//! Prints dashboard reports from a vaccination database.

mod commands;
mod config;
mod demo;
mod error;
mod formatter;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Args;
use formatter::create_formatter;

fn main() {
    // Logs go to stderr so reports on stdout stay machine-readable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vaxboard=info,vaxboard_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let format = args.format;

    if let Err(e) = commands::run(args) {
        eprintln!("{}", create_formatter(format).format_error(&e.to_string()));
        std::process::exit(1);
    }
}
