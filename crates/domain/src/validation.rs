// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{ExamDetails, MarkComponent, ReferenceId};
use std::collections::HashSet;

/// Validates an exam's field-level constraints.
///
/// This function checks that required fields are present and well formed.
/// It does NOT check that references exist, that the name is unique, or
/// that the window is free (those require context).
///
/// # Arguments
///
/// * `details` - The candidate exam
/// * `require_date_match` - Whether the exam date must equal the start date
///
/// # Errors
///
/// Returns an error if:
/// - The name or topic is empty
/// - No batch is assigned
/// - The exam date differs from the start date (when required)
/// - A mark component is malformed
pub fn validate_exam_fields(
    details: &ExamDetails,
    require_date_match: bool,
) -> Result<(), DomainError> {
    // Rule: name must not be empty
    if details.name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }

    // Rule: topic must not be empty
    if details.topic.trim().is_empty() {
        return Err(DomainError::InvalidTopic(String::from(
            "Topic cannot be empty",
        )));
    }

    // Rule: at least one batch
    if details.batches.is_empty() {
        return Err(DomainError::EmptyBatchSet);
    }

    // start < end is guaranteed by TimeWindow::new
    if require_date_match {
        details.window.ensure_date_matches_start()?;
    }

    validate_mark_components(&details.mark_components)
}

/// Validates the entries of a marks breakdown.
///
/// # Errors
///
/// Returns `DomainError::InvalidMarkComponent` if a component has an empty
/// title or a pass threshold above its marks.
pub fn validate_mark_components(components: &[MarkComponent]) -> Result<(), DomainError> {
    for component in components {
        if component.title.trim().is_empty() {
            return Err(DomainError::InvalidMarkComponent {
                title: component.title.clone(),
                reason: String::from("title cannot be empty"),
            });
        }

        if let Some(pass_marks) = component.pass_marks
            && pass_marks > component.marks
        {
            return Err(DomainError::InvalidMarkComponent {
                title: component.title.clone(),
                reason: format!(
                    "pass marks {pass_marks} exceed available marks {}",
                    component.marks
                ),
            });
        }
    }
    Ok(())
}

/// Removes repeated batch identifiers, keeping the first occurrence of each.
///
/// Batch membership is a set; repeating an id carries no meaning.
#[must_use]
pub fn dedup_batch_ids(batch_ids: Vec<ReferenceId>) -> Vec<ReferenceId> {
    let mut seen: HashSet<ReferenceId> = HashSet::with_capacity(batch_ids.len());
    batch_ids
        .into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
