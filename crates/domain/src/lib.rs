// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod grading;
mod marks;
mod status;
mod types;
mod validation;
mod window;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use grading::validate_grading_scheme;
pub use marks::reconcile_total_marks;
pub use status::{ExamStatus, resolve_status};
pub use types::{
    Exam, ExamDetails, ExamId, GradeBand, MarkComponent, Reference, ReferenceId, ReferenceKind,
    UserId,
};
pub use validation::{dedup_batch_ids, validate_exam_fields, validate_mark_components};
pub use window::{TimeWindow, intervals_overlap};
