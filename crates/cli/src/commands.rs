// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Subcommands and their execution against a store.
//!
//! Exam payloads for `create` and `update` are read as JSON from the input
//! stream. Every successful command writes one JSON document to the output.

use clap::Subcommand;
use examsched::{
    CoreError, CreateExamRequest, ErrorKind, ExamScheduler, SchedulerOptions, UpdateExamRequest,
};
use examsched_domain::{Exam, ExamId, ExamStatus, Reference, ReferenceId, ReferenceKind, UserId};
use examsched_persistence::{Persistence, PersistenceError};
use serde::Serialize;
use std::io::{Read, Write};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage classes, subjects, batches and categories
    #[command(subcommand)]
    Reference(ReferenceCommand),
    /// Schedule and maintain exams
    #[command(subcommand)]
    Exam(ExamCommand),
}

#[derive(Subcommand, Debug)]
pub enum ReferenceCommand {
    /// Register an entity, or rename an existing one
    Add {
        /// One of: class, subject, batch, category
        #[arg(long)]
        kind: ReferenceKind,
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
    },
    /// List registered entities of one kind
    List {
        #[arg(long)]
        kind: ReferenceKind,
    },
    /// Remove an entity
    Remove {
        #[arg(long)]
        kind: ReferenceKind,
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExamCommand {
    /// Create an exam from a JSON request on stdin
    Create,
    /// Apply a JSON partial update from stdin
    Update {
        #[arg(long)]
        id: i64,
    },
    /// Show one exam with its current status
    Show {
        #[arg(long)]
        id: i64,
    },
    /// List all exams with their current status
    List,
    /// Set the status; only `cancelled` is kept, others are derived from time
    Status {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        status: ExamStatus,
        #[arg(long)]
        by: String,
    },
    /// Turn the active flag on or off
    SetActive {
        #[arg(long)]
        id: i64,
        #[arg(long, action = clap::ArgAction::Set)]
        active: bool,
        #[arg(long)]
        by: String,
    },
    /// Permanently delete an exam
    Delete {
        #[arg(long)]
        id: i64,
    },
}

/// Errors surfaced by the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Scheduler(#[from] CoreError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("Invalid JSON input: {0}")]
    Input(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code: 2 for rejected requests, 1 for everything else.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Scheduler(err) => match err.kind() {
                ErrorKind::Repository => 1,
                _ => 2,
            },
            Self::Input(_) => 2,
            Self::Persistence(_) | Self::Io(_) => 1,
        }
    }
}

#[derive(Debug, Serialize)]
struct Deleted {
    deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    exam_id: Option<ExamId>,
}

fn write_json<W: Write, T: Serialize>(output: &mut W, value: &T) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *output, value)?;
    writeln!(output)?;
    Ok(())
}

fn read_json<R: Read, T: serde::de::DeserializeOwned>(input: &mut R) -> Result<T, CliError> {
    let mut buffer: String = String::new();
    input.read_to_string(&mut buffer)?;
    Ok(serde_json::from_str(&buffer)?)
}

/// Runs one command against `persistence`.
///
/// # Errors
///
/// Returns the scheduler's rejection, a store failure, or malformed input.
pub fn execute<R: Read, W: Write>(
    command: Command,
    persistence: Persistence,
    require_exam_date_matches_start: bool,
    input: &mut R,
    output: &mut W,
    now: OffsetDateTime,
) -> Result<(), CliError> {
    let options: SchedulerOptions = SchedulerOptions {
        require_exam_date_matches_start,
    };
    let mut scheduler: ExamScheduler<Persistence> = ExamScheduler::new(persistence, options);

    match command {
        Command::Reference(command) => execute_reference(command, scheduler.store_mut(), output),
        Command::Exam(command) => execute_exam(command, &mut scheduler, input, output, now),
    }
}

fn execute_reference<W: Write>(
    command: ReferenceCommand,
    persistence: &mut Persistence,
    output: &mut W,
) -> Result<(), CliError> {
    match command {
        ReferenceCommand::Add { kind, id, name } => {
            let id: ReferenceId = ReferenceId::new(id);
            persistence.register_reference(kind, &id, &name)?;
            write_json(output, &Reference::Resolved {
                id,
                display_name: name,
            })
        }
        ReferenceCommand::List { kind } => {
            let references: Vec<Reference> = persistence.list_references(kind)?;
            write_json(output, &references)
        }
        ReferenceCommand::Remove { kind, id } => {
            let removed: bool = persistence.remove_reference(kind, &ReferenceId::new(id))?;
            write_json(output, &Deleted {
                deleted: removed,
                exam_id: None,
            })
        }
    }
}

fn execute_exam<R: Read, W: Write>(
    command: ExamCommand,
    scheduler: &mut ExamScheduler<Persistence>,
    input: &mut R,
    output: &mut W,
    now: OffsetDateTime,
) -> Result<(), CliError> {
    match command {
        ExamCommand::Create => {
            let request: CreateExamRequest = read_json(input)?;
            debug!(name = %request.name, "Read create request");
            let exam: Exam = scheduler.create(request, now)?;
            write_json(output, &exam)
        }
        ExamCommand::Update { id } => {
            let request: UpdateExamRequest = read_json(input)?;
            let exam: Exam = scheduler.update(ExamId::new(id), request, now)?;
            write_json(output, &exam)
        }
        ExamCommand::Show { id } => {
            let exam: Exam = scheduler.get(ExamId::new(id), now)?;
            write_json(output, &exam)
        }
        ExamCommand::List => {
            let exams: Vec<Exam> = scheduler.list(now)?;
            write_json(output, &exams)
        }
        ExamCommand::Status { id, status, by } => {
            let exam: Exam = scheduler.update_status(ExamId::new(id), status, UserId::new(by), now)?;
            write_json(output, &exam)
        }
        ExamCommand::SetActive { id, active, by } => {
            let exam: Exam = scheduler.set_active(ExamId::new(id), active, UserId::new(by), now)?;
            write_json(output, &exam)
        }
        ExamCommand::Delete { id } => {
            let exam_id: ExamId = ExamId::new(id);
            scheduler.delete(exam_id)?;
            write_json(output, &Deleted {
                deleted: true,
                exam_id: Some(exam_id),
            })
        }
    }
}
