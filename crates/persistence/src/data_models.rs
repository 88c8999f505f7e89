// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row-level representations of exams.
//!
//! Instants are stored as RFC 3339 text so the caller's offset survives a
//! round trip. Mark components and grade bands are stored as JSON arrays.

use diesel::prelude::*;
use examsched_domain::{
    DomainError, ExamDetails, ExamStatus, GradeBand, MarkComponent, Reference, ReferenceId,
    ReferenceKind, TimeWindow, UserId,
};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::diesel_schema::exams;
use crate::error::PersistenceError;

/// Writable exam columns, shared by insert and update.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = exams, treat_none_as_null = true)]
pub struct ExamRecord {
    pub name: String,
    pub topic: String,
    pub class_id: String,
    pub subject_id: String,
    pub category_id: String,
    pub exam_date: String,
    pub start_time: String,
    pub end_time: String,
    pub start_epoch: i64,
    pub end_epoch: i64,
    pub total_marks: i64,
    pub mark_components_json: String,
    pub grading_enabled: i32,
    pub grade_bands_json: String,
    pub pass_marks_percentage: Option<f64>,
    pub status: String,
    pub is_active: i32,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ExamRecord {
    /// Encodes an exam for storage. Only reference ids are written.
    ///
    /// # Errors
    ///
    /// Returns an error if a timestamp or JSON column cannot be encoded.
    pub fn from_details(details: &ExamDetails) -> Result<Self, PersistenceError> {
        let window: &TimeWindow = &details.window;

        Ok(Self {
            name: details.name.clone(),
            topic: details.topic.clone(),
            class_id: details.class.id().value().to_string(),
            subject_id: details.subject.id().value().to_string(),
            category_id: details.category.id().value().to_string(),
            exam_date: format_date(window.exam_date())?,
            start_time: window.start().format(&Rfc3339)?,
            end_time: window.end().format(&Rfc3339)?,
            start_epoch: floor_epoch(window.start()),
            end_epoch: ceil_epoch(window.end()),
            total_marks: i64::from(details.total_marks),
            mark_components_json: serde_json::to_string(&details.mark_components)?,
            grading_enabled: i32::from(details.grading_enabled),
            grade_bands_json: serde_json::to_string(&details.grade_bands)?,
            pass_marks_percentage: details.pass_marks_percentage,
            status: details.status.as_str().to_string(),
            is_active: i32::from(details.is_active),
            created_by: details.created_by.value().to_string(),
            updated_by: details
                .updated_by
                .as_ref()
                .map(|user| user.value().to_string()),
            created_at: details.created_at.format(&Rfc3339)?,
            updated_at: details.updated_at.format(&Rfc3339)?,
        })
    }
}

/// An exam row as read back, before reference resolution.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = exams)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExamRow {
    pub exam_id: i64,
    pub name: String,
    pub topic: String,
    pub class_id: String,
    pub subject_id: String,
    pub category_id: String,
    pub exam_date: String,
    pub start_time: String,
    pub end_time: String,
    pub total_marks: i64,
    pub mark_components_json: String,
    pub grading_enabled: i32,
    pub grade_bands_json: String,
    pub pass_marks_percentage: Option<f64>,
    pub status: String,
    pub is_active: i32,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ExamRow {
    /// Decodes the row into exam details.
    ///
    /// `resolve` turns each stored reference id into a `Reference`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::SerializationError` if a stored value is
    /// not valid for the domain.
    pub fn into_details<F>(
        self,
        batch_ids: Vec<String>,
        mut resolve: F,
    ) -> Result<ExamDetails, PersistenceError>
    where
        F: FnMut(ReferenceKind, ReferenceId) -> Result<Reference, PersistenceError>,
    {
        let window: TimeWindow = TimeWindow::new(
            parse_date(&self.exam_date)?,
            OffsetDateTime::parse(&self.start_time, &Rfc3339)?,
            OffsetDateTime::parse(&self.end_time, &Rfc3339)?,
        )
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;

        let total_marks: u32 = u32::try_from(self.total_marks).map_err(|_| {
            PersistenceError::SerializationError(format!(
                "total_marks {} out of range",
                self.total_marks
            ))
        })?;
        let mark_components: Vec<MarkComponent> =
            serde_json::from_str(&self.mark_components_json)?;
        let grade_bands: Vec<GradeBand> = serde_json::from_str(&self.grade_bands_json)?;
        let status: ExamStatus = self
            .status
            .parse()
            .map_err(|e: DomainError| PersistenceError::SerializationError(e.to_string()))?;

        let batches: Vec<Reference> = batch_ids
            .into_iter()
            .map(|id| resolve(ReferenceKind::Batch, ReferenceId::new(id)))
            .collect::<Result<_, _>>()?;

        Ok(ExamDetails {
            name: self.name,
            topic: self.topic,
            class: resolve(ReferenceKind::Class, ReferenceId::new(self.class_id))?,
            subject: resolve(ReferenceKind::Subject, ReferenceId::new(self.subject_id))?,
            category: resolve(ReferenceKind::Category, ReferenceId::new(self.category_id))?,
            batches,
            window,
            total_marks,
            mark_components,
            grading_enabled: self.grading_enabled != 0,
            grade_bands,
            pass_marks_percentage: self.pass_marks_percentage,
            status,
            is_active: self.is_active != 0,
            created_by: UserId::new(self.created_by),
            updated_by: self.updated_by.map(UserId::new),
            created_at: OffsetDateTime::parse(&self.created_at, &Rfc3339)?,
            updated_at: OffsetDateTime::parse(&self.updated_at, &Rfc3339)?,
        })
    }
}

fn format_date(date: Date) -> Result<String, PersistenceError> {
    Ok(date.format(format_description!("[year]-[month]-[day]"))?)
}

fn parse_date(value: &str) -> Result<Date, PersistenceError> {
    Ok(Date::parse(value, format_description!("[year]-[month]-[day]"))?)
}

/// Whole seconds at or before `instant`.
pub const fn floor_epoch(instant: OffsetDateTime) -> i64 {
    instant.unix_timestamp()
}

/// Whole seconds at or after `instant`.
pub const fn ceil_epoch(instant: OffsetDateTime) -> i64 {
    if instant.nanosecond() > 0 {
        instant.unix_timestamp() + 1
    } else {
        instant.unix_timestamp()
    }
}
