// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CoreError, ErrorKind};
use examsched_domain::{DomainError, ExamId, ReferenceId, ReferenceKind};

#[test]
fn test_grading_domain_errors_map_to_grading_kind() {
    let err: CoreError = CoreError::from(DomainError::grading("incomplete coverage"));

    assert_eq!(err.kind(), ErrorKind::GradingConfig);
    assert_eq!(
        err.to_string(),
        "Invalid grading configuration: incomplete coverage"
    );
}

#[test]
fn test_field_domain_errors_map_to_validation_kind() {
    let err: CoreError = CoreError::from(DomainError::EmptyBatchSet);

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(
        err.to_string(),
        "Validation failed: An exam must be assigned to at least one batch"
    );
}

#[test]
fn test_marks_overflow_is_a_validation_error() {
    let err: CoreError = CoreError::from(DomainError::MarksOverflow);

    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_reference_not_found_names_kind_and_identifier() {
    let err: CoreError = CoreError::ReferenceNotFound {
        kind: ReferenceKind::Batch,
        id: ReferenceId::new("batch-z"),
    };

    assert_eq!(err.to_string(), "Referenced batch 'batch-z' does not exist");
}

#[test]
fn test_overlap_conflict_names_conflicting_exam() {
    let err: CoreError = CoreError::OverlapConflict {
        conflicting_exam_id: ExamId::new(12),
    };

    assert_eq!(err.kind(), ErrorKind::OverlapConflict);
    assert!(err.to_string().contains("exam 12"));
}

#[test]
fn test_repository_wraps_display_text() {
    let err: CoreError = CoreError::repository("disk full");

    assert_eq!(err, CoreError::Repository(String::from("disk full")));
    assert_eq!(err.to_string(), "Repository error: disk full");
}
