// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use examsched_domain::{ExamDetails, ReferenceId};
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::ExamRecord;
use crate::diesel_schema::{exam_batches, exams};
use crate::error::PersistenceError;

fn insert_batches(
    conn: &mut SqliteConnection,
    exam_id: i64,
    batch_ids: &[ReferenceId],
) -> Result<(), PersistenceError> {
    for (position, batch_id) in (0_i32..).zip(batch_ids) {
        diesel::insert_into(exam_batches::table)
            .values((
                exam_batches::exam_id.eq(exam_id),
                exam_batches::batch_id.eq(batch_id.value()),
                exam_batches::position.eq(position),
            ))
            .execute(conn)?;
    }
    Ok(())
}

/// Inserts a new exam with its batch assignments.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `details` - The validated exam content
///
/// # Returns
///
/// The identifier assigned to the exam.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the name is already used
/// for the same class and subject, or another error if the write fails.
pub fn insert_exam(
    conn: &mut SqliteConnection,
    details: &ExamDetails,
) -> Result<i64, PersistenceError> {
    let record: ExamRecord = ExamRecord::from_details(details)?;

    conn.transaction(|conn| {
        diesel::insert_into(exams::table)
            .values(&record)
            .execute(conn)?;

        let exam_id: i64 = get_last_insert_rowid(conn)?;
        insert_batches(conn, exam_id, &details.batch_ids())?;

        info!(exam_id, name = %details.name, "Inserted exam");
        Ok(exam_id)
    })
}

/// Replaces the stored content and batch assignments of an exam.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no exam has `exam_id`, or another
/// error if the write fails.
pub fn update_exam(
    conn: &mut SqliteConnection,
    exam_id: i64,
    details: &ExamDetails,
) -> Result<(), PersistenceError> {
    let record: ExamRecord = ExamRecord::from_details(details)?;

    conn.transaction(|conn| {
        let updated: usize = diesel::update(exams::table.filter(exams::exam_id.eq(exam_id)))
            .set(&record)
            .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::NotFound(format!("exam {exam_id}")));
        }

        diesel::delete(exam_batches::table.filter(exam_batches::exam_id.eq(exam_id)))
            .execute(conn)?;
        insert_batches(conn, exam_id, &details.batch_ids())?;

        info!(exam_id, status = %details.status, "Updated exam");
        Ok(())
    })
}

/// Deletes an exam. Batch assignments cascade.
///
/// # Returns
///
/// `false` if no exam had `exam_id`.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_exam(conn: &mut SqliteConnection, exam_id: i64) -> Result<bool, PersistenceError> {
    let deleted: usize =
        diesel::delete(exams::table.filter(exams::exam_id.eq(exam_id))).execute(conn)?;
    debug!(exam_id, deleted, "Deleted exam");
    Ok(deleted > 0)
}
