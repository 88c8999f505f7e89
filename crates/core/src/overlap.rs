// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::repository::{ExamRepository, ExamSummary};
use examsched_domain::{ExamId, ExamStatus, ReferenceId, intervals_overlap};
use time::OffsetDateTime;
use tracing::debug;

/// Finds an exam whose window collides with `[start, end)` on a shared batch.
///
/// An exam collides when it is not cancelled, is not `exclude_id`, shares
/// at least one batch, and its window strictly overlaps the proposed one.
/// Only existence matters, so the first collision found is returned.
///
/// # Errors
///
/// Returns `CoreError::Repository` if the repository query fails.
pub fn find_conflict<R>(
    repository: &mut R,
    exclude_id: Option<ExamId>,
    batch_ids: &[ReferenceId],
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<Option<ExamId>, CoreError>
where
    R: ExamRepository,
{
    let candidates: Vec<ExamSummary> = repository
        .find_conflicting(exclude_id, batch_ids, start, end)
        .map_err(CoreError::repository)?;

    debug!(
        candidates = candidates.len(),
        batches = batch_ids.len(),
        "Checking exam window for conflicts"
    );

    Ok(candidates
        .iter()
        .find(|summary| collides(summary, exclude_id, batch_ids, start, end))
        .map(|summary| summary.id))
}

/// The exact conflict rule between a stored exam and a proposed window.
#[must_use]
pub fn collides(
    summary: &ExamSummary,
    exclude_id: Option<ExamId>,
    batch_ids: &[ReferenceId],
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> bool {
    summary.status != ExamStatus::Cancelled
        && exclude_id != Some(summary.id)
        && summary.batch_ids.iter().any(|b| batch_ids.contains(b))
        && intervals_overlap(summary.start, summary.end, start, end)
}
