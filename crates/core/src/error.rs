// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use examsched_domain::{DomainError, ExamId, ReferenceId, ReferenceKind};
use thiserror::Error;

/// Errors returned by the exam scheduler.
///
/// The scheduler stops at the first failing step and returns its error
/// unchanged. No variant implies a partial write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Malformed input on a single field.
    #[error("Validation failed: {0}")]
    Validation(DomainError),
    /// The grading scheme is missing pieces, overlapping, or incomplete.
    #[error("{0}")]
    GradingConfig(DomainError),
    /// A referenced class, subject, batch or category does not exist.
    #[error("Referenced {kind} '{id}' does not exist")]
    ReferenceNotFound {
        /// The kind of the missing reference.
        kind: ReferenceKind,
        /// The identifier that was not found.
        id: ReferenceId,
    },
    /// The name is already used for the same class and subject.
    #[error(
        "An exam named '{name}' already exists for class '{class_id}' and subject '{subject_id}'"
    )]
    DuplicateExam {
        /// The duplicated exam name.
        name: String,
        /// The class identifier.
        class_id: ReferenceId,
        /// The subject identifier.
        subject_id: ReferenceId,
    },
    /// The time window collides with a non-cancelled exam on a shared batch.
    #[error("Time window conflicts with exam {conflicting_exam_id} on a shared batch")]
    OverlapConflict {
        /// The first conflicting exam found.
        conflicting_exam_id: ExamId,
    },
    /// No exam exists with the given identifier.
    #[error("Exam {0} not found")]
    NotFound(ExamId),
    /// A collaborator failed.
    #[error("Repository error: {0}")]
    Repository(String),
}

/// The kind of a `CoreError`, without its payload.
///
/// Transport layers map kinds onto their own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    GradingConfig,
    ReferenceNotFound,
    DuplicateExam,
    OverlapConflict,
    NotFound,
    Repository,
}

impl CoreError {
    /// Wraps a collaborator failure.
    pub fn repository(err: impl std::fmt::Display) -> Self {
        Self::Repository(err.to_string())
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::GradingConfig(_) => ErrorKind::GradingConfig,
            Self::ReferenceNotFound { .. } => ErrorKind::ReferenceNotFound,
            Self::DuplicateExam { .. } => ErrorKind::DuplicateExam,
            Self::OverlapConflict { .. } => ErrorKind::OverlapConflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Repository(_) => ErrorKind::Repository,
        }
    }
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        if err.is_grading_config() {
            Self::GradingConfig(err)
        } else {
            Self::Validation(err)
        }
    }
}
