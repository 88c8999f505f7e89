// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Exam lifecycle states and their derivation from time.
//!
//! Status is derived from the exam's time window and the current instant.
//! `Cancelled` is the only state an operator can set, and once set it is
//! never overridden by time.

use crate::error::DomainError;
use crate::window::TimeWindow;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Lifecycle states of an exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExamStatus {
    /// Placeholder before a time window has been resolved.
    #[default]
    Draft,
    /// The exam has not started yet.
    Scheduled,
    /// The exam is in progress.
    Ongoing,
    /// The exam window has closed.
    Completed,
    /// The exam was called off. Terminal and sticky.
    Cancelled,
}

impl ExamStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Scheduled => "scheduled",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true if time can no longer change this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl FromStr for ExamStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "scheduled" => Ok(Self::Scheduled),
            "ongoing" => Ok(Self::Ongoing),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ExamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derives an exam's status from its time window and the current instant.
///
/// - `Cancelled` stays `Cancelled`
/// - before the start: `Scheduled`
/// - from start through end, inclusive: `Ongoing`
/// - after the end: `Completed`
///
/// Any other `current` value, `Draft` included, is superseded. The function
/// is pure: identical arguments always produce the same status.
#[must_use]
pub fn resolve_status(
    current: ExamStatus,
    window: &TimeWindow,
    now: OffsetDateTime,
) -> ExamStatus {
    if current.is_terminal() {
        return current;
    }

    if window.start() > now {
        ExamStatus::Scheduled
    } else if now <= window.end() {
        ExamStatus::Ongoing
    } else {
        ExamStatus::Completed
    }
}
