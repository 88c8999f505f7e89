// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod commands;


use clap::Parser;
use commands::{Command, execute};
use examsched_persistence::{Persistence, PersistenceError};
use std::process::ExitCode;
use time::OffsetDateTime;
use tracing::{error, info};

/// Exam scheduler - schedule exams and manage their grading configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Log filter used when `RUST_LOG` is unset
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Accept exams whose date differs from the start instant's calendar date
    #[arg(long)]
    allow_date_mismatch: bool,

    #[command(subcommand)]
    command: Command,
}

fn open_persistence(database: Option<&str>) -> Result<Persistence, PersistenceError> {
    if let Some(db_path) = database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()
    }
}

fn main() -> ExitCode {
    let args: Args = Args::parse();

    // Logs go to stderr; stdout carries the JSON results.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let persistence: Persistence = match open_persistence(args.database.as_deref()) {
        Ok(persistence) => persistence,
        Err(err) => {
            error!(error = %err, "Failed to open database");
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();

    match execute(
        args.command,
        persistence,
        !args.allow_date_mismatch,
        &mut stdin,
        &mut stdout,
        OffsetDateTime::now_utc(),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Command failed");
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
