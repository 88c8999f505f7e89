// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use crate::Persistence;
use examsched::CreateExamRequest;
use examsched_domain::{
    ExamDetails, ExamStatus, MarkComponent, Reference, ReferenceId, ReferenceKind, TimeWindow,
    UserId,
};
use time::macros::{date, datetime};

/// A fresh in-memory store with class-10, math, written and batches a-c.
pub fn create_test_persistence() -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().expect("in-memory database");
    register_test_references(&mut persistence);
    persistence
}

pub fn register_test_references(persistence: &mut Persistence) {
    for (kind, id, name) in [
        (ReferenceKind::Class, "class-10", "Class 10"),
        (ReferenceKind::Subject, "math", "Mathematics"),
        (ReferenceKind::Category, "written", "Written"),
        (ReferenceKind::Batch, "batch-a", "Batch A"),
        (ReferenceKind::Batch, "batch-b", "Batch B"),
        (ReferenceKind::Batch, "batch-c", "Batch C"),
    ] {
        persistence
            .register_reference(kind, &ReferenceId::new(id), name)
            .expect("register reference");
    }
}

/// Exam content for 2024-12-25 09:00-12:00 UTC on batch-a.
pub fn create_test_details(name: &str) -> ExamDetails {
    let created_at = datetime!(2024-12-01 08:00 UTC);
    ExamDetails {
        name: String::from(name),
        topic: String::from("Algebra"),
        class: Reference::unresolved(ReferenceId::new("class-10")),
        subject: Reference::unresolved(ReferenceId::new("math")),
        category: Reference::unresolved(ReferenceId::new("written")),
        batches: vec![Reference::unresolved(ReferenceId::new("batch-a"))],
        window: TimeWindow::new(
            date!(2024 - 12 - 25),
            datetime!(2024-12-25 09:00 UTC),
            datetime!(2024-12-25 12:00 UTC),
        )
        .expect("valid window"),
        total_marks: 50,
        mark_components: vec![
            MarkComponent::new("MCQ", 20),
            MarkComponent::new("Written", 30),
        ],
        grading_enabled: false,
        grade_bands: Vec::new(),
        pass_marks_percentage: None,
        status: ExamStatus::Scheduled,
        is_active: true,
        created_by: UserId::new("admin"),
        updated_by: None,
        created_at,
        updated_at: created_at,
    }
}

/// A create request matching `create_test_details`.
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
