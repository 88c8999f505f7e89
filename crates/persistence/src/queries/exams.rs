// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Exam queries.
//!
//! Every exam returned here has its references resolved against the
//! reference table at read time.

use diesel::SqliteConnection;
use diesel::prelude::*;
use examsched::ExamSummary;
use examsched_domain::{DomainError, Exam, ExamDetails, ExamId, ExamStatus, ReferenceId};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::debug;

use crate::data_models::{ExamRow, ceil_epoch, floor_epoch};
use crate::diesel_schema::{exam_batches, exams};
use crate::error::PersistenceError;
use crate::queries::references::resolve_reference;

/// Loads the batch identifiers of an exam in their stored order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn load_batch_ids(
    conn: &mut SqliteConnection,
    exam_id: i64,
) -> Result<Vec<String>, PersistenceError> {
    Ok(exam_batches::table
        .filter(exam_batches::exam_id.eq(exam_id))
        .order(exam_batches::position.asc())
        .select(exam_batches::batch_id)
        .load(conn)?)
}

fn hydrate(conn: &mut SqliteConnection, row: ExamRow) -> Result<Exam, PersistenceError> {
    let exam_id: i64 = row.exam_id;
    let batch_ids: Vec<String> = load_batch_ids(conn, exam_id)?;
    let details: ExamDetails =
        row.into_details(batch_ids, |kind, id| resolve_reference(conn, kind, id))?;
    Ok(Exam::new(ExamId::new(exam_id), details))
}

/// Loads an exam by identifier.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value cannot
/// be decoded. Returns `Ok(None)` if the exam does not exist.
pub fn find_exam(
    conn: &mut SqliteConnection,
    exam_id: i64,
) -> Result<Option<Exam>, PersistenceError> {
    debug!(exam_id, "Loading exam");

    let row: Option<ExamRow> = exams::table
        .filter(exams::exam_id.eq(exam_id))
        .select(ExamRow::as_select())
        .first(conn)
        .optional()?;

    row.map(|row| hydrate(conn, row)).transpose()
}

/// Lists every exam ordered by start time, then identifier.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value cannot
/// be decoded.
pub fn list_exams(conn: &mut SqliteConnection) -> Result<Vec<Exam>, PersistenceError> {
    let rows: Vec<ExamRow> = exams::table
        .order((exams::start_epoch.asc(), exams::exam_id.asc()))
        .select(ExamRow::as_select())
        .load(conn)?;

    rows.into_iter().map(|row| hydrate(conn, row)).collect()
}

/// Finds an exam with the same name, class and subject.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_exam_by_name(
    conn: &mut SqliteConnection,
    name: &str,
    class_id: &ReferenceId,
    subject_id: &ReferenceId,
    exclude_id: Option<ExamId>,
) -> Result<Option<Exam>, PersistenceError> {
    let mut query = exams::table
        .filter(exams::name.eq(name))
        .filter(exams::class_id.eq(class_id.value()))
        .filter(exams::subject_id.eq(subject_id.value()))
        .select(ExamRow::as_select())
        .into_boxed();
    if let Some(excluded) = exclude_id {
        query = query.filter(exams::exam_id.ne(excluded.value()));
    }

    let row: Option<ExamRow> = query.first(conn).optional()?;
    row.map(|row| hydrate(conn, row)).transpose()
}

/// Returns non-cancelled exams on any of `batch_ids` whose whole-second
/// bounds intersect `[start, end)`.
///
/// The second-granularity prefilter may include exams that only touch the
/// window; callers apply the exact rule.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value cannot
/// be decoded.
pub fn find_conflict_candidates(
    conn: &mut SqliteConnection,
    exclude_id: Option<ExamId>,
    batch_ids: &[ReferenceId],
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<Vec<ExamSummary>, PersistenceError> {
    let batch_values: Vec<&str> = batch_ids.iter().map(ReferenceId::value).collect();

    let mut query = exams::table
        .inner_join(exam_batches::table)
        .filter(exam_batches::batch_id.eq_any(batch_values))
        .filter(exams::status.ne(ExamStatus::Cancelled.as_str()))
        .filter(exams::start_epoch.lt(ceil_epoch(end)))
        .filter(exams::end_epoch.gt(floor_epoch(start)))
        .select(exams::exam_id)
        .distinct()
        .into_boxed();
    if let Some(excluded) = exclude_id {
        query = query.filter(exams::exam_id.ne(excluded.value()));
    }

    let exam_ids: Vec<i64> = query.order(exams::exam_id.asc()).load(conn)?;
    debug!(candidates = exam_ids.len(), "Loaded overlap candidates");

    exam_ids
        .into_iter()
        .map(|exam_id| load_summary(conn, exam_id))
        .collect()
}

fn load_summary(
    conn: &mut SqliteConnection,
    exam_id: i64,
) -> Result<ExamSummary, PersistenceError> {
    let (status, start_time, end_time): (String, String, String) = exams::table
        .filter(exams::exam_id.eq(exam_id))
        .select((exams::status, exams::start_time, exams::end_time))
        .first(conn)?;

    let status: ExamStatus = status
        .parse()
        .map_err(|e: DomainError| PersistenceError::SerializationError(e.to_string()))?;
    let batch_ids: Vec<ReferenceId> = load_batch_ids(conn, exam_id)?
        .into_iter()
        .map(ReferenceId::new)
        .collect();

    Ok(ExamSummary {
        id: ExamId::new(exam_id),
        status,
        start: OffsetDateTime::parse(&start_time, &Rfc3339)?,
        end: OffsetDateTime::parse(&end_time, &Rfc3339)?,
        batch_ids,
    })
}
