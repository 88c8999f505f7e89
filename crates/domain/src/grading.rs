// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Grading scheme validation.
//!
//! ## Invariants
//!
//! An accepted scheme has:
//! - at least one band and a pass percentage
//! - every bound a finite percentage in `0..=100`
//! - `min_percentage <= max_percentage` within each band
//! - strictly increasing bands once sorted: `bands[i].max < bands[i + 1].min`
//! - coverage from exactly 0 at the lowest band to exactly 100 at the highest
//!
//! The sorted order is the canonical stored order.

use crate::error::DomainError;
use crate::types::GradeBand;

/// Validates a grading scheme and returns its bands in canonical order.
///
/// Only called when grading is enabled. The input is not modified; the
/// returned bands are a copy sorted by ascending `min_percentage`.
///
/// # Errors
///
/// Returns `DomainError::GradingConfig` if:
/// - no bands are supplied
/// - the pass percentage is missing or outside 0-100
/// - a band bound is outside 0-100 or its minimum exceeds its maximum
/// - two bands overlap
/// - the bands do not start at 0 and end at 100
#[allow(clippy::float_cmp)]
pub fn validate_grading_scheme(
    bands: &[GradeBand],
    pass_marks_percentage: Option<f64>,
) -> Result<Vec<GradeBand>, DomainError> {
    if bands.is_empty() {
        return Err(DomainError::grading("bands required"));
    }

    let Some(pass_percentage) = pass_marks_percentage else {
        return Err(DomainError::grading("pass percentage required"));
    };
    if !is_percentage(pass_percentage) {
        return Err(DomainError::grading(format!(
            "pass percentage {pass_percentage} must be between 0 and 100"
        )));
    }

    let mut sorted: Vec<GradeBand> = bands.to_vec();
    sorted.sort_by(|a, b| a.min_percentage.total_cmp(&b.min_percentage));

    for band in &sorted {
        if !is_percentage(band.min_percentage) || !is_percentage(band.max_percentage) {
            return Err(DomainError::grading(format!(
                "band '{}' must lie between 0 and 100",
                band.label
            )));
        }
        if band.min_percentage > band.max_percentage {
            return Err(DomainError::grading(format!(
                "band '{}' has minimum {} above maximum {}",
                band.label, band.min_percentage, band.max_percentage
            )));
        }
    }

    for pair in sorted.windows(2) {
        if pair[0].max_percentage >= pair[1].min_percentage {
            return Err(DomainError::grading(format!(
                "overlapping bands '{}' and '{}'",
                pair[0].label, pair[1].label
            )));
        }
    }

    let covers_floor = sorted.first().is_some_and(|b| b.min_percentage == 0.0);
    let covers_ceiling = sorted.last().is_some_and(|b| b.max_percentage == 100.0);
    if !covers_floor || !covers_ceiling {
        return Err(DomainError::grading("incomplete coverage"));
    }

    Ok(sorted)
}

fn is_percentage(value: f64) -> bool {
    value.is_finite() && (0.0..=100.0).contains(&value)
}
