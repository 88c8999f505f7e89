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
mod overlap;
mod repository;
mod request;
mod scheduler;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use error::{CoreError, ErrorKind};
pub use overlap::{collides, find_conflict};
pub use repository::{ExamRepository, ExamSummary, ReferenceValidator};
pub use request::{CreateExamRequest, UpdateExamRequest};
pub use scheduler::{ExamScheduler, SchedulerOptions};
