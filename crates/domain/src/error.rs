// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;
use time::{Date, OffsetDateTime};

/// Errors that can occur during domain validation.
///
/// Every variant except `GradingConfig` describes malformed input on a
/// single field. `GradingConfig` describes a grading scheme that is
/// internally inconsistent as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Exam name is empty or invalid.
    #[error("Invalid name: {0}")]
    InvalidName(String),
    /// Exam topic is empty or invalid.
    #[error("Invalid topic: {0}")]
    InvalidTopic(String),
    /// An exam must be assigned to at least one batch.
    #[error("An exam must be assigned to at least one batch")]
    EmptyBatchSet,
    /// The time window does not start strictly before it ends.
    #[error("Invalid time window: start {start} must be before end {end}")]
    InvalidTimeWindow {
        /// The window start.
        start: OffsetDateTime,
        /// The window end.
        end: OffsetDateTime,
    },
    /// The exam date does not match the calendar date of the start time.
    #[error("Exam date {exam_date} does not match the start time date {start_date}")]
    ExamDateMismatch {
        /// The declared exam date.
        exam_date: Date,
        /// The calendar date of the start instant.
        start_date: Date,
    },
    /// A marks breakdown component is malformed.
    #[error("Invalid mark component '{title}': {reason}")]
    InvalidMarkComponent {
        /// The component title.
        title: String,
        /// Why the component was rejected.
        reason: String,
    },
    /// The marks breakdown sums past the representable range.
    #[error("Mark components sum to more than {max} marks", max = u32::MAX)]
    MarksOverflow,
    /// The grading scheme is missing pieces, overlapping, or incomplete.
    #[error("Invalid grading configuration: {reason}")]
    GradingConfig {
        /// Why the grading scheme was rejected.
        reason: String,
    },
    /// Exam status string is not recognized.
    #[error("Invalid exam status: {0}")]
    InvalidStatus(String),
    /// Reference kind string is not recognized.
    #[error("Invalid reference kind: {0}")]
    InvalidReferenceKind(String),
}

impl DomainError {
    /// Creates a grading configuration error.
    #[must_use]
    pub fn grading(reason: impl Into<String>) -> Self {
        Self::GradingConfig {
            reason: reason.into(),
        }
    }

    /// Returns true if this error rejects a grading scheme rather than a single field.
    #[must_use]
    pub const fn is_grading_config(&self) -> bool {
        matches!(self, Self::GradingConfig { .. })
    }
}
