// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::MarkComponent;

/// Reconciles an exam's declared total marks against its marks breakdown.
///
/// With no components the declared total is kept as-is. With at least one
/// component the total is the component sum, and the declared value is
/// discarded.
///
/// # Errors
///
/// Returns `DomainError::MarksOverflow` if the component sum does not fit
/// in a `u32`.
pub fn reconcile_total_marks(
    total_marks: u32,
    components: &[MarkComponent],
) -> Result<u32, DomainError> {
    if components.is_empty() {
        return Ok(total_marks);
    }

    components
        .iter()
        .try_fold(0_u32, |sum, component| sum.checked_add(component.marks))
        .ok_or(DomainError::MarksOverflow)
}
