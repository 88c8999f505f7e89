// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use crate::{
    ExamDetails, ExamStatus, MarkComponent, Reference, ReferenceId, TimeWindow, UserId,
};
use time::macros::{date, datetime};

pub fn create_test_window() -> TimeWindow {
    TimeWindow::new(
        date!(2024 - 12 - 25),
        datetime!(2024-12-25 09:00 UTC),
        datetime!(2024-12-25 12:00 UTC),
    )
    .expect("valid test window")
}

pub fn create_test_details() -> ExamDetails {
    let created_at = datetime!(2024-12-01 08:00 UTC);
    ExamDetails {
        name: String::from("Midterm"),
        topic: String::from("Algebra"),
        class: Reference::unresolved(ReferenceId::new("class-10")),
        subject: Reference::unresolved(ReferenceId::new("math")),
        category: Reference::unresolved(ReferenceId::new("written")),
        batches: vec![Reference::unresolved(ReferenceId::new("batch-a"))],
        window: create_test_window(),
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
