// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the exam scheduler.
//!
//! This crate stores exams and the reference entities they point at in
//! `SQLite` through Diesel, and implements both collaborator traits the
//! scheduler consumes: `ExamRepository` and `ReferenceValidator`.
//!
//! ## Schema
//!
//! - `reference_entities`: classes, subjects, batches and categories by id
//! - `exams`: one row per exam, grading data as JSON columns
//! - `exam_batches`: ordered batch assignments, cascading on exam delete
//!
//! A unique index on `(name, class_id, subject_id)` backs the scheduler's
//! duplicate-name check.
//!
//! ## Write serialization
//!
//! `atomically` opens a `BEGIN IMMEDIATE` transaction, so the scheduler's
//! duplicate and overlap checks and the write that follows hold the database
//! write lock together. Writers on other connections wait (`busy_timeout`).
//!
//! ## Reference resolution
//!
//! Exams store reference ids only. Every read resolves them against
//! `reference_entities`; ids without a registered entity read back as
//! `Reference::Unresolved`.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use examsched::{CoreError, ExamRepository, ExamSummary, ReferenceValidator};
use examsched_domain::{Exam, ExamDetails, ExamId, Reference, ReferenceId, ReferenceKind};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;
use tracing::warn;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// `SQLite`-backed exam store.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives its own shared-cache database, so adapters never
    /// see each other's data.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_exam_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Reference entities
    // ========================================================================

    /// Registers a class, subject, batch or category, or renames an existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn register_reference(
        &mut self,
        kind: ReferenceKind,
        id: &ReferenceId,
        display_name: &str,
    ) -> Result<(), PersistenceError> {
        mutations::references::upsert_reference(&mut self.conn, kind, id, display_name)
    }

    /// Removes a reference entity. Returns `false` if it was not registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn remove_reference(
        &mut self,
        kind: ReferenceKind,
        id: &ReferenceId,
    ) -> Result<bool, PersistenceError> {
        mutations::references::delete_reference(&mut self.conn, kind, id)
    }

    /// Lists registered references of one kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_references(
        &mut self,
        kind: ReferenceKind,
    ) -> Result<Vec<Reference>, PersistenceError> {
        queries::references::list_references(&mut self.conn, kind)
    }

    fn load_written(&mut self, exam_id: i64) -> Result<Exam, PersistenceError> {
        queries::exams::find_exam(&mut self.conn, exam_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("exam {exam_id}")))
    }
}

impl ReferenceValidator for Persistence {
    type Error = PersistenceError;

    fn exists(&mut self, kind: ReferenceKind, id: &ReferenceId) -> Result<bool, Self::Error> {
        queries::references::reference_exists(&mut self.conn, kind, id)
    }
}

impl ExamRepository for Persistence {
    type Error = PersistenceError;

    fn find_conflicting(
        &mut self,
        exclude_id: Option<ExamId>,
        batch_ids: &[ReferenceId],
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<ExamSummary>, Self::Error> {
        queries::exams::find_conflict_candidates(&mut self.conn, exclude_id, batch_ids, start, end)
    }

    fn find_duplicate_name(
        &mut self,
        name: &str,
        class_id: &ReferenceId,
        subject_id: &ReferenceId,
        exclude_id: Option<ExamId>,
    ) -> Result<Option<Exam>, Self::Error> {
        queries::exams::find_exam_by_name(&mut self.conn, name, class_id, subject_id, exclude_id)
    }

    fn insert(&mut self, details: &ExamDetails) -> Result<Exam, Self::Error> {
        let exam_id: i64 = mutations::exams::insert_exam(&mut self.conn, details)?;
        self.load_written(exam_id)
    }

    fn update(&mut self, id: ExamId, details: &ExamDetails) -> Result<Exam, Self::Error> {
        mutations::exams::update_exam(&mut self.conn, id.value(), details)?;
        self.load_written(id.value())
    }

    fn find_by_id(&mut self, id: ExamId) -> Result<Option<Exam>, Self::Error> {
        queries::exams::find_exam(&mut self.conn, id.value())
    }

    fn list(&mut self) -> Result<Vec<Exam>, Self::Error> {
        queries::exams::list_exams(&mut self.conn)
    }

    fn delete(&mut self, id: ExamId) -> Result<bool, Self::Error> {
        mutations::exams::delete_exam(&mut self.conn, id.value())
    }

    fn atomically<T, F>(&mut self, work: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut Self) -> Result<T, CoreError>,
    {
        backend::sqlite::begin_immediate(&mut self.conn).map_err(CoreError::repository)?;

        match work(self) {
            Ok(value) => {
                backend::sqlite::commit(&mut self.conn).map_err(CoreError::repository)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = backend::sqlite::rollback(&mut self.conn) {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                Err(err)
            }
        }
    }
}
