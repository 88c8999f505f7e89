// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Collaborator interfaces consumed by the scheduler.
//!
//! Storage and reference lookups are owned by other subsystems. The
//! scheduler only needs the narrow operations below, and every one of them
//! may block.

use crate::error::CoreError;
use examsched_domain::{
    Exam, ExamDetails, ExamId, ExamStatus, ReferenceId, ReferenceKind,
};
use time::OffsetDateTime;

/// Confirms that foreign identifiers exist.
pub trait ReferenceValidator {
    /// The collaborator's own failure type.
    type Error: std::error::Error;

    /// Returns whether an entity of `kind` with identifier `id` exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup itself fails.
    fn exists(&mut self, kind: ReferenceKind, id: &ReferenceId) -> Result<bool, Self::Error>;
}

/// The fields of an exam needed to decide whether it collides with another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamSummary {
    pub id: ExamId,
    pub status: ExamStatus,
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
    pub batch_ids: Vec<ReferenceId>,
}

/// Persistent storage for exams.
pub trait ExamRepository {
    /// The collaborator's own failure type.
    type Error: std::error::Error;

    /// Returns exams that may collide with the given window on the given batches.
    ///
    /// Implementations may over-approximate; the caller re-applies the
    /// exact conflict rule to every returned summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn find_conflicting(
        &mut self,
        exclude_id: Option<ExamId>,
        batch_ids: &[ReferenceId],
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<ExamSummary>, Self::Error>;

    /// Returns an exam with the same name, class and subject, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn find_duplicate_name(
        &mut self,
        name: &str,
        class_id: &ReferenceId,
        subject_id: &ReferenceId,
        exclude_id: Option<ExamId>,
    ) -> Result<Option<Exam>, Self::Error>;

    /// Stores a new exam and returns it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn insert(&mut self, details: &ExamDetails) -> Result<Exam, Self::Error>;

    /// Replaces the stored content of an existing exam.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or the exam does not exist.
    fn update(&mut self, id: ExamId, details: &ExamDetails) -> Result<Exam, Self::Error>;

    /// Loads an exam by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn find_by_id(&mut self, id: ExamId) -> Result<Option<Exam>, Self::Error>;

    /// Loads every exam, earliest start first, ties broken by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list(&mut self) -> Result<Vec<Exam>, Self::Error>;

    /// Removes an exam. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn delete(&mut self, id: ExamId) -> Result<bool, Self::Error>;

    /// Runs `work` so that no other writer can interleave with it.
    ///
    /// The scheduler performs every check-then-write sequence (duplicate
    /// name, overlap, then insert or update) inside this scope. When `work`
    /// fails, nothing it wrote may remain visible.
    ///
    /// # Errors
    ///
    /// Returns the error from `work`, or `CoreError::Repository` if the
    /// scope itself cannot be opened or committed.
    fn atomically<T, F>(&mut self, work: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut Self) -> Result<T, CoreError>;
}
