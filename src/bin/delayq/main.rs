// src/bin/delayq/main.rs
use std::process;

use anyhow::Result;
use clap::{value_parser, Arg, Command};
use delayq::Config;

mod commands;
use commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let app = Command::new("delayq")
        .version(env!("CARGO_PKG_VERSION"))
        .about("delayq - delayed jobs on a Redis sorted set")
        .subcommand(
            Command::new("enqueue")
                .about("Enqueue a job")
                .arg(Arg::new("payload")
                    .value_name("PAYLOAD")
                    .help("Job payload (\"fail\" makes the built-in executor fail)")
                    .default_value(delayq::utils::constants::DEFAULT_PAYLOAD))
                .arg(Arg::new("delay")
                    .value_name("SECONDS")
                    .help("Delay before the job is due (defaults to JOB_DELAY)")
                    .value_parser(value_parser!(u64)))
                .arg(Arg::new("max_retry")
                    .short('r')
                    .long("max-retry")
                    .value_name("NUMBER")
                    .help("Retry budget (defaults to JOB_MAX_RETRY)")
                    .value_parser(value_parser!(u32)))
                .arg(Arg::new("id")
                    .long("id")
                    .value_name("ID")
                    .help("Job id (generated when omitted)"))
        )
        .subcommand(
            Command::new("work")
                .about("Run the worker until SIGINT or SIGTERM")
        )
        .subcommand(
            Command::new("status")
                .about("Show pending and ready job counts")
        );

    let matches = app.get_matches();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    delayq::telemetry::init(&log_level)?;
    let config = Config::from_env()?;

    match matches.subcommand() {
        Some(("enqueue", sub_matches)) => enqueue_command(&config, sub_matches).await,
        Some(("work", _)) => work_command(&config).await,
        Some(("status", _)) => status_command(&config).await,
        _ => {
            println!("No command specified. Use --help for usage information.");
            process::exit(1);
        }
    }
}
