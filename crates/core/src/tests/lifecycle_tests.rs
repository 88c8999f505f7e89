// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{MemoryStore, create_test_request, create_test_scheduler, early_now};
use crate::{CoreError, CreateExamRequest, ExamScheduler};
use examsched_domain::{Exam, ExamId, ExamStatus, ReferenceId, UserId};
use time::macros::{date, datetime};
use time::{Duration, OffsetDateTime};

fn staff() -> UserId {
    UserId::new("staff")
}

#[test]
fn test_get_resolves_stale_status_without_writing() {
    let now: OffsetDateTime = datetime!(2024-12-25 18:00 UTC);
    let mut scheduler: ExamScheduler<MemoryStore> = create_test_scheduler();
    let mut request: CreateExamRequest = create_test_request("Past");
    request.start_time = now - Duration::hours(2);
    request.end_time = now - Duration::hours(1);

    // Created before its window, so stored as Scheduled.
    let exam: Exam = scheduler.create(request, early_now()).unwrap();
    assert_eq!(exam.details.status, ExamStatus::Scheduled);

    let fetched: Exam = scheduler.get(exam.id, now).unwrap();

    assert_eq!(fetched.details.status, ExamStatus::Completed);
    assert_eq!(
        scheduler.store_mut().exams[&exam.id].status,
        ExamStatus::Scheduled
    );
}

#[test]
fn test_list_orders_by_start_and_derives_status() {
    let mut scheduler: ExamScheduler<MemoryStore> = create_test_scheduler();
    let later: Exam = scheduler
        .create(create_test_request("Later"), early_now())
        .unwrap();
    let mut request: CreateExamRequest = create_test_request("Earlier");
    request.batch_ids = vec![ReferenceId::new("batch-b")];
    request.exam_date = date!(2024 - 12 - 20);
    request.start_time = datetime!(2024-12-20 09:00 UTC);
    request.end_time = datetime!(2024-12-20 12:00 UTC);
    let earlier: Exam = scheduler.create(request, early_now()).unwrap();
    scheduler
        .update_status(later.id, ExamStatus::Cancelled, staff(), early_now())
        .unwrap();

    let listed: Vec<Exam> = scheduler.list(datetime!(2024-12-26 08:00 UTC)).unwrap();

    let ids: Vec<ExamId> = listed.iter().map(|exam| exam.id).collect();
    assert_eq!(ids, vec![earlier.id, later.id]);
    assert_eq!(listed[0].details.status, ExamStatus::Completed);
    assert_eq!(listed[1].details.status, ExamStatus::Cancelled);
    assert_eq!(
        scheduler.store_mut().exams[&earlier.id].status,
        ExamStatus::Scheduled
    );
}

#[test]
fn test_get_unknown_exam_is_not_found() {
    let mut scheduler: ExamScheduler<MemoryStore> = create_test_scheduler();

    let err: CoreError = scheduler.get(ExamId::new(7), early_now()).unwrap_err();

    assert_eq!(err, CoreError::NotFound(ExamId::new(7)));
}

#[test]
fn test_cancel_is_stored_and_sticky() {
    let mut scheduler: ExamScheduler<MemoryStore> = create_test_scheduler();
    let exam: Exam = scheduler
        .create(create_test_request("Midterm"), early_now())
        .unwrap();

    let cancelled: Exam = scheduler
        .update_status(exam.id, ExamStatus::Cancelled, staff(), early_now())
        .unwrap();
    assert_eq!(cancelled.details.status, ExamStatus::Cancelled);
    assert_eq!(cancelled.details.updated_by, Some(staff()));

    let after_window: Exam = scheduler
        .get(exam.id, datetime!(2024-12-26 00:00 UTC))
        .unwrap();
    assert_eq!(after_window.details.status, ExamStatus::Cancelled);
}

#[test]
fn test_cancelled_exam_cannot_be_reopened_by_status() {
    let mut scheduler: ExamScheduler<MemoryStore> = create_test_scheduler();
    let exam: Exam = scheduler
        .create(create_test_request("Midterm"), early_now())
        .unwrap();
    scheduler
        .update_status(exam.id, ExamStatus::Cancelled, staff(), early_now())
        .unwrap();

    let reopened: Exam = scheduler
        .update_status(exam.id, ExamStatus::Scheduled, staff(), early_now())
        .unwrap();

    assert_eq!(reopened.details.status, ExamStatus::Cancelled);
}

#[test]
fn test_non_cancel_status_is_derived_from_time() {
    let mut scheduler: ExamScheduler<MemoryStore> = create_test_scheduler();
    let exam: Exam = scheduler
        .create(create_test_request("Midterm"), early_now())
        .unwrap();

    let during: Exam = scheduler
        .update_status(
            exam.id,
            ExamStatus::Completed,
            staff(),
            datetime!(2024-12-25 10:00 UTC),
        )
        .unwrap();

    assert_eq!(during.details.status, ExamStatus::Ongoing);
    assert_eq!(
        scheduler.store_mut().exams[&exam.id].status,
        ExamStatus::Ongoing
    );
}

#[test]
fn test_update_status_of_unknown_exam_is_not_found() {
    let mut scheduler: ExamScheduler<MemoryStore> = create_test_scheduler();

    let err: CoreError = scheduler
        .update_status(ExamId::new(3), ExamStatus::Cancelled, staff(), early_now())
        .unwrap_err();

    assert_eq!(err, CoreError::NotFound(ExamId::new(3)));
}

#[test]
fn test_set_active_is_independent_of_status() {
    let mut scheduler: ExamScheduler<MemoryStore> = create_test_scheduler();
    let exam: Exam = scheduler
        .create(create_test_request("Midterm"), early_now())
        .unwrap();
    assert!(exam.details.is_active);

    let inactive: Exam = scheduler
        .set_active(exam.id, false, staff(), early_now())
        .unwrap();

    assert!(!inactive.details.is_active);
    assert_eq!(inactive.details.status, ExamStatus::Scheduled);
    assert_eq!(inactive.details.updated_by, Some(staff()));
}

#[test]
fn test_inactive_exam_still_blocks_its_batches() {
    let mut scheduler: ExamScheduler<MemoryStore> = create_test_scheduler();
    let exam: Exam = scheduler
        .create(create_test_request("E1"), early_now())
        .unwrap();
    scheduler
        .set_active(exam.id, false, staff(), early_now())
        .unwrap();

    let err: CoreError = scheduler
        .create(create_test_request("E2"), early_now())
        .unwrap_err();

    assert_eq!(
        err,
        CoreError::OverlapConflict {
            conflicting_exam_id: exam.id
        }
    );
}

#[test]
fn test_delete_removes_exam_and_frees_window() {
    let mut scheduler: ExamScheduler<MemoryStore> = create_test_scheduler();
    let exam: Exam = scheduler
        .create(create_test_request("E1"), early_now())
        .unwrap();

    scheduler.delete(exam.id).unwrap();

    assert!(scheduler.store_mut().exams.is_empty());
    assert!(scheduler.create(create_test_request("E1"), early_now()).is_ok());
}

#[test]
fn test_delete_unknown_exam_is_not_found() {
    let mut scheduler: ExamScheduler<MemoryStore> = create_test_scheduler();

    let err: CoreError = scheduler.delete(ExamId::new(9)).unwrap_err();

    assert_eq!(err, CoreError::NotFound(ExamId::new(9)));
}
