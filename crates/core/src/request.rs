// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use examsched_domain::{
    DomainError, ExamDetails, ExamStatus, GradeBand, MarkComponent, Reference, ReferenceId,
    TimeWindow, UserId, dedup_batch_ids,
};
use serde::Deserialize;
use time::{Date, OffsetDateTime};

const fn default_active() -> bool {
    true
}

/// A request to schedule a new exam.
///
/// Requests carry intent as data only. Status is not part of a create
/// request; it is always derived.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateExamRequest {
    pub name: String,
    pub topic: String,
    pub class_id: ReferenceId,
    pub subject_id: ReferenceId,
    pub category_id: ReferenceId,
    pub batch_ids: Vec<ReferenceId>,
    pub exam_date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    /// Ignored whenever `mark_components` is non-empty.
    #[serde(default)]
    pub total_marks: u32,
    #[serde(default)]
    pub mark_components: Vec<MarkComponent>,
    #[serde(default)]
    pub grading_enabled: bool,
    #[serde(default)]
    pub grade_bands: Vec<GradeBand>,
    #[serde(default)]
    pub pass_marks_percentage: Option<f64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_by: UserId,
}

impl CreateExamRequest {
    /// Builds the unvalidated candidate for this request.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimeWindow` if the start is not before the end.
    pub(crate) fn into_details(self, now: OffsetDateTime) -> Result<ExamDetails, DomainError> {
        let window: TimeWindow = TimeWindow::new(self.exam_date, self.start_time, self.end_time)?;

        Ok(ExamDetails {
            name: self.name,
            topic: self.topic,
            class: Reference::unresolved(self.class_id),
            subject: Reference::unresolved(self.subject_id),
            category: Reference::unresolved(self.category_id),
            batches: dedup_batch_ids(self.batch_ids)
                .into_iter()
                .map(Reference::unresolved)
                .collect(),
            window,
            total_marks: self.total_marks,
            mark_components: self.mark_components,
            grading_enabled: self.grading_enabled,
            grade_bands: self.grade_bands,
            pass_marks_percentage: self.pass_marks_percentage,
            status: ExamStatus::Draft,
            is_active: self.is_active,
            created_by: self.created_by,
            updated_by: None,
            created_at: now,
            updated_at: now,
        })
    }
}

/// A partial update of an existing exam.
///
/// Absent fields keep their stored value. The merged result is validated
/// as a whole.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateExamRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub class_id: Option<ReferenceId>,
    #[serde(default)]
    pub subject_id: Option<ReferenceId>,
    #[serde(default)]
    pub category_id: Option<ReferenceId>,
    #[serde(default)]
    pub batch_ids: Option<Vec<ReferenceId>>,
    #[serde(default)]
    pub exam_date: Option<Date>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_time: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
    #[serde(default)]
    pub total_marks: Option<u32>,
    #[serde(default)]
    pub mark_components: Option<Vec<MarkComponent>>,
    #[serde(default)]
    pub grading_enabled: Option<bool>,
    #[serde(default)]
    pub grade_bands: Option<Vec<GradeBand>>,
    #[serde(default)]
    pub pass_marks_percentage: Option<f64>,
    /// Only `Cancelled` is honored; any other value is recomputed from time.
    #[serde(default)]
    pub status: Option<ExamStatus>,
    #[serde(default)]
    pub is_active: Option<bool>,
    pub updated_by: UserId,
}

impl UpdateExamRequest {
    /// Creates an update that changes nothing but the audit fields.
    #[must_use]
    pub const fn new(updated_by: UserId) -> Self {
        Self {
            name: None,
            topic: None,
            class_id: None,
            subject_id: None,
            category_id: None,
            batch_ids: None,
            exam_date: None,
            start_time: None,
            end_time: None,
            total_marks: None,
            mark_components: None,
            grading_enabled: None,
            grade_bands: None,
            pass_marks_percentage: None,
            status: None,
            is_active: None,
            updated_by,
        }
    }

    /// Merges this request onto the stored exam, producing the candidate state.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimeWindow` if the merged window does not
    /// start before it ends.
    pub(crate) fn merge_onto(
        self,
        existing: &ExamDetails,
        now: OffsetDateTime,
    ) -> Result<ExamDetails, DomainError> {
        let window: TimeWindow = TimeWindow::new(
            self.exam_date.unwrap_or_else(|| existing.window.exam_date()),
            self.start_time.unwrap_or_else(|| existing.window.start()),
            self.end_time.unwrap_or_else(|| existing.window.end()),
        )?;

        let batches: Vec<Reference> = match self.batch_ids {
            Some(ids) => dedup_batch_ids(ids)
                .into_iter()
                .map(Reference::unresolved)
                .collect(),
            None => existing.batches.clone(),
        };

        let status: ExamStatus = if self.status == Some(ExamStatus::Cancelled) {
            ExamStatus::Cancelled
        } else {
            existing.status
        };

        Ok(ExamDetails {
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            topic: self.topic.unwrap_or_else(|| existing.topic.clone()),
            class: merge_reference(self.class_id, &existing.class),
            subject: merge_reference(self.subject_id, &existing.subject),
            category: merge_reference(self.category_id, &existing.category),
            batches,
            window,
            total_marks: self.total_marks.unwrap_or(existing.total_marks),
            mark_components: self
                .mark_components
                .unwrap_or_else(|| existing.mark_components.clone()),
            grading_enabled: self.grading_enabled.unwrap_or(existing.grading_enabled),
            grade_bands: self
                .grade_bands
                .unwrap_or_else(|| existing.grade_bands.clone()),
            pass_marks_percentage: self
                .pass_marks_percentage
                .or(existing.pass_marks_percentage),
            status,
            is_active: self.is_active.unwrap_or(existing.is_active),
            created_by: existing.created_by.clone(),
            updated_by: Some(self.updated_by),
            created_at: existing.created_at,
            updated_at: now,
        })
    }
}

fn merge_reference(requested: Option<ReferenceId>, existing: &Reference) -> Reference {
    match requested {
        Some(id) if &id != existing.id() => Reference::unresolved(id),
        _ => existing.clone(),
    }
}
