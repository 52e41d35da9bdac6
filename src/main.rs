//! combine-prs binary

mod cli;

use clap::Parser;
use cli::Cli;
use cli::style::Stylize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli::run::run_combine_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            anstream::eprintln!("{} {e:#}", "error:".failure());
            // Surface the failure in the workflow run when running as an action
            if std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true") {
                println!("::error::{e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
