// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Exam scheduling orchestration.
//!
//! Every write follows the same pipeline, stopping at the first failure:
//!
//! 1. field validation of the candidate
//! 2. reference existence (all on create, changed ones on update)
//! 3. duplicate name within the class and subject
//! 4. marks reconciliation
//! 5. grading scheme validation (when enabled)
//! 6. overlap detection against other non-cancelled exams
//! 7. status derivation from the window and `now`
//! 8. a single repository write
//!
//! Steps 2 through 8 run inside `ExamRepository::atomically`, so the checks
//! and the write cannot interleave with another writer.

use crate::error::CoreError;
use crate::overlap::find_conflict;
use crate::repository::{ExamRepository, ReferenceValidator};
use crate::request::{CreateExamRequest, UpdateExamRequest};
use examsched_domain::{
    Exam, ExamDetails, ExamId, ExamStatus, ReferenceId, ReferenceKind, UserId,
    reconcile_total_marks, resolve_status, validate_exam_fields, validate_grading_scheme,
};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Scheduler behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerOptions {
    /// Require the exam date to be the calendar date of the start instant.
    pub require_exam_date_matches_start: bool,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            require_exam_date_matches_start: true,
        }
    }
}

/// Creates, updates and reads exams against a store that provides both
/// persistence and reference lookups.
///
/// "Now" is always an argument, never read from the clock here.
pub struct ExamScheduler<S> {
    store: S,
    options: SchedulerOptions,
}

impl<S> ExamScheduler<S> {
    /// Creates a scheduler over `store`.
    #[must_use]
    pub const fn new(store: S, options: SchedulerOptions) -> Self {
        Self { store, options }
    }

    /// Direct access to the store, for operations outside scheduling.
    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

impl<S> ExamScheduler<S>
where
    S: ExamRepository + ReferenceValidator,
{
    /// Schedules a new exam.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error:
    /// - `Validation` for malformed fields
    /// - `ReferenceNotFound` naming the missing class/subject/category/batch
    /// - `DuplicateExam` if the name is taken for the class and subject
    /// - `GradingConfig` for an inconsistent grading scheme
    /// - `OverlapConflict` if a shared batch is already booked
    /// - `Repository` if a collaborator fails
    pub fn create(
        &mut self,
        request: CreateExamRequest,
        now: OffsetDateTime,
    ) -> Result<Exam, CoreError> {
        let options: SchedulerOptions = self.options;

        let result: Result<Exam, CoreError> = request
            .into_details(now)
            .map_err(CoreError::from)
            .and_then(|candidate| {
                validate_exam_fields(&candidate, options.require_exam_date_matches_start)?;

                self.store.atomically(|store| {
                    check_references(store, &references_of(&candidate))?;
                    ensure_unique_name(store, &candidate, None)?;
                    let candidate: ExamDetails = finalize_candidate(store, candidate, None, now)?;
                    store.insert(&candidate).map_err(CoreError::repository)
                })
            });

        match &result {
            Ok(exam) => info!(
                exam_id = exam.id.value(),
                name = %exam.details.name,
                status = %exam.details.status,
                "Exam created"
            ),
            Err(err) => warn!(kind = ?err.kind(), error = %err, "Exam creation rejected"),
        }

        result
    }

    /// Applies a partial update to an exam.
    ///
    /// The request is merged onto the stored record and the merged state is
    /// validated as a whole; the overlap check excludes the exam itself.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no exam has `id`, otherwise the same errors as
    /// [`ExamScheduler::create`].
    pub fn update(
        &mut self,
        id: ExamId,
        request: UpdateExamRequest,
        now: OffsetDateTime,
    ) -> Result<Exam, CoreError> {
        let options: SchedulerOptions = self.options;

        let result: Result<Exam, CoreError> = self.store.atomically(|store| {
            let existing: Exam = load(store, id)?;
            let candidate: ExamDetails = request.merge_onto(&existing.details, now)?;
            validate_exam_fields(&candidate, options.require_exam_date_matches_start)?;

            let previous: Vec<(ReferenceKind, ReferenceId)> = references_of(&existing.details);
            let changed: Vec<(ReferenceKind, ReferenceId)> = references_of(&candidate)
                .into_iter()
                .filter(|reference| !previous.contains(reference))
                .collect();
            check_references(store, &changed)?;

            if name_key_changed(&existing.details, &candidate) {
                ensure_unique_name(store, &candidate, Some(id))?;
            }

            let candidate: ExamDetails = finalize_candidate(store, candidate, Some(id), now)?;
            store.update(id, &candidate).map_err(CoreError::repository)
        });

        match &result {
            Ok(exam) => info!(
                exam_id = id.value(),
                status = %exam.details.status,
                "Exam updated"
            ),
            Err(err) => warn!(
                exam_id = id.value(),
                kind = ?err.kind(),
                error = %err,
                "Exam update rejected"
            ),
        }

        result
    }

    /// Loads an exam with its status derived for `now`.
    ///
    /// Nothing is written; the stored status catches up on the next write.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no exam has `id`.
    pub fn get(&mut self, id: ExamId, now: OffsetDateTime) -> Result<Exam, CoreError> {
        let mut exam: Exam = load(&mut self.store, id)?;
        exam.details.status = resolve_status(exam.details.status, &exam.details.window, now);
        Ok(exam)
    }

    /// Loads every exam with its status derived for `now`, earliest start
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `Repository` if the store fails.
    pub fn list(&mut self, now: OffsetDateTime) -> Result<Vec<Exam>, CoreError> {
        let mut exams: Vec<Exam> = self.store.list().map_err(CoreError::repository)?;
        for exam in &mut exams {
            exam.details.status = resolve_status(exam.details.status, &exam.details.window, now);
        }
        Ok(exams)
    }

    /// Sets an exam's status.
    ///
    /// `Cancelled` is stored and stays. Any other requested status is
    /// advisory: the stored status is recomputed from the time window, and
    /// a cancelled exam stays cancelled.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no exam has `id`.
    pub fn update_status(
        &mut self,
        id: ExamId,
        status: ExamStatus,
        updated_by: UserId,
        now: OffsetDateTime,
    ) -> Result<Exam, CoreError> {
        self.store.atomically(|store| {
            let mut details: ExamDetails = load(store, id)?.details;

            if status == ExamStatus::Cancelled {
                details.status = ExamStatus::Cancelled;
            } else {
                debug!(
                    exam_id = id.value(),
                    requested = %status,
                    "Requested status is advisory; deriving from time"
                );
            }
            details.status = resolve_status(details.status, &details.window, now);
            details.updated_by = Some(updated_by);
            details.updated_at = now;

            let exam: Exam = store.update(id, &details).map_err(CoreError::repository)?;
            info!(exam_id = id.value(), status = %exam.details.status, "Exam status set");
            Ok(exam)
        })
    }

    /// Turns the exam's active flag on or off.
    ///
    /// The flag is independent of status. No scheduling rule is re-run.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no exam has `id`.
    pub fn set_active(
        &mut self,
        id: ExamId,
        active: bool,
        updated_by: UserId,
        now: OffsetDateTime,
    ) -> Result<Exam, CoreError> {
        self.store.atomically(|store| {
            let mut details: ExamDetails = load(store, id)?.details;
            details.is_active = active;
            details.status = resolve_status(details.status, &details.window, now);
            details.updated_by = Some(updated_by);
            details.updated_at = now;

            let exam: Exam = store.update(id, &details).map_err(CoreError::repository)?;
            info!(exam_id = id.value(), active, "Exam active flag set");
            Ok(exam)
        })
    }

    /// Permanently removes an exam.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no exam has `id`.
    pub fn delete(&mut self, id: ExamId) -> Result<(), CoreError> {
        self.store.atomically(|store| {
            if store.delete(id).map_err(CoreError::repository)? {
                info!(exam_id = id.value(), "Exam deleted");
                Ok(())
            } else {
                Err(CoreError::NotFound(id))
            }
        })
    }
}

fn load<S: ExamRepository>(store: &mut S, id: ExamId) -> Result<Exam, CoreError> {
    store
        .find_by_id(id)
        .map_err(CoreError::repository)?
        .ok_or(CoreError::NotFound(id))
}

/// Every foreign reference of an exam, in the order they are checked.
fn references_of(details: &ExamDetails) -> Vec<(ReferenceKind, ReferenceId)> {
    let mut references: Vec<(ReferenceKind, ReferenceId)> = vec![
        (ReferenceKind::Class, details.class.id().clone()),
        (ReferenceKind::Subject, details.subject.id().clone()),
        (ReferenceKind::Category, details.category.id().clone()),
    ];
    references.extend(
        details
            .batch_ids()
            .into_iter()
            .map(|id| (ReferenceKind::Batch, id)),
    );
    references
}

fn check_references<S: ReferenceValidator>(
    store: &mut S,
    references: &[(ReferenceKind, ReferenceId)],
) -> Result<(), CoreError> {
    for (kind, id) in references {
        let exists: bool = store.exists(*kind, id).map_err(CoreError::repository)?;
        if !exists {
            return Err(CoreError::ReferenceNotFound {
                kind: *kind,
                id: id.clone(),
            });
        }
    }
    Ok(())
}

fn name_key_changed(existing: &ExamDetails, candidate: &ExamDetails) -> bool {
    existing.name != candidate.name
        || existing.class.id() != candidate.class.id()
        || existing.subject.id() != candidate.subject.id()
}

fn ensure_unique_name<S: ExamRepository>(
    store: &mut S,
    candidate: &ExamDetails,
    exclude_id: Option<ExamId>,
) -> Result<(), CoreError> {
    let duplicate: Option<Exam> = store
        .find_duplicate_name(
            &candidate.name,
            candidate.class.id(),
            candidate.subject.id(),
            exclude_id,
        )
        .map_err(CoreError::repository)?;

    if duplicate.is_some() {
        return Err(CoreError::DuplicateExam {
            name: candidate.name.clone(),
            class_id: candidate.class.id().clone(),
            subject_id: candidate.subject.id().clone(),
        });
    }
    Ok(())
}

/// Marks, grading, overlap and status: the steps shared by create and update.
fn finalize_candidate<S: ExamRepository>(
    store: &mut S,
    mut candidate: ExamDetails,
    exclude_id: Option<ExamId>,
    now: OffsetDateTime,
) -> Result<ExamDetails, CoreError> {
    candidate.total_marks =
        reconcile_total_marks(candidate.total_marks, &candidate.mark_components)?;

    if candidate.grading_enabled {
        candidate.grade_bands =
            validate_grading_scheme(&candidate.grade_bands, candidate.pass_marks_percentage)?;
    } else {
        candidate.grade_bands.clear();
        candidate.pass_marks_percentage = None;
    }

    // A cancelled exam books nothing, so it cannot collide.
    if candidate.status != ExamStatus::Cancelled
        && let Some(conflicting_exam_id) = find_conflict(
            store,
            exclude_id,
            &candidate.batch_ids(),
            candidate.window.start(),
            candidate.window.end(),
        )?
    {
        return Err(CoreError::OverlapConflict {
            conflicting_exam_id,
        });
    }

    candidate.status = resolve_status(candidate.status, &candidate.window, now);
    Ok(candidate)
}
