// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    CoreError, CreateExamRequest, ExamRepository, ExamScheduler, ExamSummary,
    ReferenceValidator, SchedulerOptions,
};
use examsched_domain::{
    Exam, ExamDetails, ExamId, GradeBand, MarkComponent, ReferenceId, ReferenceKind, UserId,
};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use time::OffsetDateTime;
use time::macros::{date, datetime};

#[derive(Debug)]
pub struct StoreFailure(&'static str);

impl fmt::Display for StoreFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store failure: {}", self.0)
    }
}

impl std::error::Error for StoreFailure {}

/// In-memory store implementing both collaborator traits.
///
/// `atomically` restores the exam map when the work fails, so tests can
/// observe that rejected writes leave nothing behind.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub exams: BTreeMap<ExamId, ExamDetails>,
    next_id: i64,
    references: HashSet<(ReferenceKind, ReferenceId)>,
    pub fail_reference_lookups: bool,
    pub fail_inserts: bool,
}

impl MemoryStore {
    pub fn with_reference(mut self, kind: ReferenceKind, id: &str) -> Self {
        self.references.insert((kind, ReferenceId::new(id)));
        self
    }

    pub fn add_reference(&mut self, kind: ReferenceKind, id: &str) {
        self.references.insert((kind, ReferenceId::new(id)));
    }

    pub fn remove_reference(&mut self, kind: ReferenceKind, id: &str) {
        self.references.remove(&(kind, ReferenceId::new(id)));
    }
}

impl ReferenceValidator for MemoryStore {
    type Error = StoreFailure;

    fn exists(&mut self, kind: ReferenceKind, id: &ReferenceId) -> Result<bool, Self::Error> {
        if self.fail_reference_lookups {
            return Err(StoreFailure("reference lookup"));
        }
        Ok(self.references.contains(&(kind, id.clone())))
    }
}

impl ExamRepository for MemoryStore {
    type Error = StoreFailure;

    fn find_conflicting(
        &mut self,
        _exclude_id: Option<ExamId>,
        batch_ids: &[ReferenceId],
        _start: OffsetDateTime,
        _end: OffsetDateTime,
    ) -> Result<Vec<ExamSummary>, Self::Error> {
        // Over-approximates on purpose: every exam sharing a batch.
        Ok(self
            .exams
            .iter()
            .filter(|(_, details)| {
                details
                    .batch_ids()
                    .iter()
                    .any(|batch| batch_ids.contains(batch))
            })
            .map(|(id, details)| ExamSummary {
                id: *id,
                status: details.status,
                start: details.window.start(),
                end: details.window.end(),
                batch_ids: details.batch_ids(),
            })
            .collect())
    }

    fn find_duplicate_name(
        &mut self,
        name: &str,
        class_id: &ReferenceId,
        subject_id: &ReferenceId,
        exclude_id: Option<ExamId>,
    ) -> Result<Option<Exam>, Self::Error> {
        Ok(self
            .exams
            .iter()
            .find(|(id, details)| {
                Some(**id) != exclude_id
                    && details.name == name
                    && details.class.id() == class_id
                    && details.subject.id() == subject_id
            })
            .map(|(id, details)| Exam::new(*id, details.clone())))
    }

    fn insert(&mut self, details: &ExamDetails) -> Result<Exam, Self::Error> {
        if self.fail_inserts {
            return Err(StoreFailure("insert"));
        }
        self.next_id += 1;
        let id: ExamId = ExamId::new(self.next_id);
        self.exams.insert(id, details.clone());
        Ok(Exam::new(id, details.clone()))
    }

    fn update(&mut self, id: ExamId, details: &ExamDetails) -> Result<Exam, Self::Error> {
        let slot: &mut ExamDetails = self
            .exams
            .get_mut(&id)
            .ok_or(StoreFailure("update of missing exam"))?;
        *slot = details.clone();
        Ok(Exam::new(id, details.clone()))
    }

    fn find_by_id(&mut self, id: ExamId) -> Result<Option<Exam>, Self::Error> {
        Ok(self
            .exams
            .get(&id)
            .map(|details| Exam::new(id, details.clone())))
    }

    fn list(&mut self) -> Result<Vec<Exam>, Self::Error> {
        let mut exams: Vec<Exam> = self
            .exams
            .iter()
            .map(|(id, details)| Exam::new(*id, details.clone()))
            .collect();
        exams.sort_by_key(|exam| (exam.details.window.start(), exam.id));
        Ok(exams)
    }

    fn delete(&mut self, id: ExamId) -> Result<bool, Self::Error> {
        Ok(self.exams.remove(&id).is_some())
    }

    fn atomically<T, F>(&mut self, work: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut Self) -> Result<T, CoreError>,
    {
        let snapshot: BTreeMap<ExamId, ExamDetails> = self.exams.clone();
        let next_id: i64 = self.next_id;
        let result: Result<T, CoreError> = work(self);
        if result.is_err() {
            self.exams = snapshot;
            self.next_id = next_id;
        }
        result
    }
}

/// A store knowing class-10, math, written and batches a, b and c.
pub fn create_test_store() -> MemoryStore {
    MemoryStore::default()
        .with_reference(ReferenceKind::Class, "class-10")
        .with_reference(ReferenceKind::Subject, "math")
        .with_reference(ReferenceKind::Category, "written")
        .with_reference(ReferenceKind::Batch, "batch-a")
        .with_reference(ReferenceKind::Batch, "batch-b")
        .with_reference(ReferenceKind::Batch, "batch-c")
}

pub fn create_test_scheduler() -> ExamScheduler<MemoryStore> {
    ExamScheduler::new(create_test_store(), SchedulerOptions::default())
}

/// A request for 2024-12-25 09:00-12:00 UTC on batch-a.
pub fn create_test_request(name: &str) -> CreateExamRequest {
    CreateExamRequest {
        name: String::from(name),
        topic: String::from("Algebra"),
        class_id: ReferenceId::new("class-10"),
        subject_id: ReferenceId::new("math"),
        category_id: ReferenceId::new("written"),
        batch_ids: vec![ReferenceId::new("batch-a")],
        exam_date: date!(2024 - 12 - 25),
        start_time: datetime!(2024-12-25 09:00 UTC),
        end_time: datetime!(2024-12-25 12:00 UTC),
        total_marks: 100,
        mark_components: Vec::new(),
        grading_enabled: false,
        grade_bands: Vec::new(),
        pass_marks_percentage: None,
        is_active: true,
        created_by: UserId::new("admin"),
    }
}

pub fn create_test_bands() -> Vec<GradeBand> {
    vec![
        GradeBand::new("A", 80.0, 100.0),
        GradeBand::new("C", 0.0, 49.0),
        GradeBand::new("B", 50.0, 79.0),
    ]
}

pub fn create_test_components() -> Vec<MarkComponent> {
    vec![MarkComponent::new("MCQ", 20), MarkComponent::new("Written", 30)]
}

/// A moment well before every test window.
pub fn early_now() -> OffsetDateTime {
    datetime!(2024-12-01 08:00 UTC)
}
