// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::status::ExamStatus;
use crate::window::TimeWindow;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Identifier assigned to an exam by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExamId(i64);

impl ExamId {
    /// Wraps a persisted exam identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ExamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of an entity owned by another subsystem
/// (class, subject, batch or category).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceId(String);

impl ReferenceId {
    /// Creates a new reference identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the operator who created or last changed a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new user identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kinds of foreign entity an exam refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Class,
    Subject,
    Batch,
    Category,
}

impl ReferenceKind {
    /// Returns the string representation used for persistence and field names.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Subject => "subject",
            Self::Batch => "batch",
            Self::Category => "category",
        }
    }
}

impl FromStr for ReferenceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "class" => Ok(Self::Class),
            "subject" => Ok(Self::Subject),
            "batch" => Ok(Self::Batch),
            "category" => Ok(Self::Category),
            _ => Err(DomainError::InvalidReferenceKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to a foreign entity.
///
/// Whether display fields are attached is decided once, where the record is
/// loaded. Writes only ever carry the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Reference {
    /// Only the identifier is known.
    Unresolved {
        /// The referenced identifier.
        id: ReferenceId,
    },
    /// The identifier together with the entity's display name.
    Resolved {
        /// The referenced identifier.
        id: ReferenceId,
        /// Human-readable name of the referenced entity.
        display_name: String,
    },
}

impl Reference {
    /// Creates an unresolved reference.
    #[must_use]
    pub const fn unresolved(id: ReferenceId) -> Self {
        Self::Unresolved { id }
    }

    /// Returns the referenced identifier.
    #[must_use]
    pub const fn id(&self) -> &ReferenceId {
        match self {
            Self::Unresolved { id } | Self::Resolved { id, .. } => id,
        }
    }

    /// Returns the display name if the reference has been resolved.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::Unresolved { .. } => None,
            Self::Resolved { display_name, .. } => Some(display_name),
        }
    }
}

impl From<ReferenceId> for Reference {
    fn from(id: ReferenceId) -> Self {
        Self::unresolved(id)
    }
}

/// One line of an exam's itemized marks breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkComponent {
    /// Component title (e.g. "MCQ", "Written").
    pub title: String,
    /// Marks available for this component.
    pub marks: u32,
    /// Marks required to pass this component, if it has its own threshold.
    #[serde(default)]
    pub pass_marks: Option<u32>,
}

impl MarkComponent {
    /// Creates a component without its own pass threshold.
    #[must_use]
    pub fn new(title: impl Into<String>, marks: u32) -> Self {
        Self {
            title: title.into(),
            marks,
            pass_marks: None,
        }
    }
}

/// A labelled percentage band of a grading scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBand {
    /// Grade label (e.g. "A").
    pub label: String,
    /// Optional free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Lowest percentage (inclusive) earning this grade.
    pub min_percentage: f64,
    /// Highest percentage (inclusive) earning this grade.
    pub max_percentage: f64,
}

impl GradeBand {
    /// Creates a band without a description.
    #[must_use]
    pub fn new(label: impl Into<String>, min_percentage: f64, max_percentage: f64) -> Self {
        Self {
            label: label.into(),
            description: None,
            min_percentage,
            max_percentage,
        }
    }
}

/// The validated content of an exam, without its persisted identity.
///
/// This is the candidate state that the scheduler builds, validates and
/// hands to the repository.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamDetails {
    pub name: String,
    pub topic: String,
    pub class: Reference,
    pub subject: Reference,
    pub category: Reference,
    /// Assigned batches, deduplicated, in first-seen order.
    pub batches: Vec<Reference>,
    pub window: TimeWindow,
    /// Total marks. Equal to the component sum whenever components exist.
    pub total_marks: u32,
    pub mark_components: Vec<MarkComponent>,
    pub grading_enabled: bool,
    /// Bands in ascending `min_percentage` order when grading is enabled.
    pub grade_bands: Vec<GradeBand>,
    pub pass_marks_percentage: Option<f64>,
    pub status: ExamStatus,
    pub is_active: bool,
    pub created_by: UserId,
    pub updated_by: Option<UserId>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl ExamDetails {
    /// Returns the identifiers of the assigned batches.
    #[must_use]
    pub fn batch_ids(&self) -> Vec<ReferenceId> {
        self.batches.iter().map(|b| b.id().clone()).collect()
    }
}

/// A persisted exam.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exam {
    pub id: ExamId,
    #[serde(flatten)]
    pub details: ExamDetails,
}

impl Exam {
    /// Pairs validated details with a persisted identifier.
    #[must_use]
    pub const fn new(id: ExamId, details: ExamDetails) -> Self {
        Self { id, details }
    }
}
