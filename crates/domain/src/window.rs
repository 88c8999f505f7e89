// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Exam time windows and the interval overlap rule.
//!
//! ## Invariants
//!
//! - A window always starts strictly before it ends
//! - Windows are compared as half-open ranges `[start, end)`, so two
//!   windows that only touch at an endpoint do not overlap

use crate::error::DomainError;
use serde::Serialize;
use time::{Date, OffsetDateTime};

/// The calendar date and the instants bounding an exam sitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    exam_date: Date,
    #[serde(with = "time::serde::rfc3339")]
    start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    end: OffsetDateTime,
}

impl TimeWindow {
    /// Creates a time window.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimeWindow` if `start` is not strictly
    /// before `end`.
    pub fn new(
        exam_date: Date,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        if start >= end {
            return Err(DomainError::InvalidTimeWindow { start, end });
        }
        Ok(Self {
            exam_date,
            start,
            end,
        })
    }

    #[must_use]
    pub const fn exam_date(&self) -> Date {
        self.exam_date
    }

    #[must_use]
    pub const fn start(&self) -> OffsetDateTime {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> OffsetDateTime {
        self.end
    }

    /// Checks that the exam date is the calendar date of the start instant.
    ///
    /// The start instant's own offset decides the calendar date.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ExamDateMismatch` if the dates differ.
    pub fn ensure_date_matches_start(&self) -> Result<(), DomainError> {
        let start_date: Date = self.start.date();
        if start_date != self.exam_date {
            return Err(DomainError::ExamDateMismatch {
                exam_date: self.exam_date,
                start_date,
            });
        }
        Ok(())
    }

    /// Returns true if this window overlaps `other`.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        intervals_overlap(self.start, self.end, other.start, other.end)
    }
}

/// Strict overlap test for two half-open ranges `[s1, e1)` and `[s2, e2)`.
///
/// The ranges conflict iff `s1 < e2 && s2 < e1`. Touching endpoints do not
/// conflict, and the result is symmetric in its two ranges.
#[must_use]
pub fn intervals_overlap(
    s1: OffsetDateTime,
    e1: OffsetDateTime,
    s2: OffsetDateTime,
    e2: OffsetDateTime,
) -> bool {
    s1 < e2 && s2 < e1
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn window(start: OffsetDateTime, end: OffsetDateTime) -> TimeWindow {
        TimeWindow::new(start.date(), start, end).unwrap()
    }

    #[test]
    fn test_new_rejects_start_equal_to_end() {
        let at = datetime!(2024-12-25 09:00 UTC);
        let result = TimeWindow::new(date!(2024 - 12 - 25), at, at);
        assert!(matches!(
            result,
            Err(DomainError::InvalidTimeWindow { .. })
        ));
    }

    #[test]
    fn test_new_rejects_start_after_end() {
        let result = TimeWindow::new(
            date!(2024 - 12 - 25),
            datetime!(2024-12-25 12:00 UTC),
            datetime!(2024-12-25 09:00 UTC),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_touching_windows_do_not_overlap() {
        let first = window(
            datetime!(2024-12-25 10:00 UTC),
            datetime!(2024-12-25 11:00 UTC),
        );
        let second = window(
            datetime!(2024-12-25 11:00 UTC),
            datetime!(2024-12-25 12:00 UTC),
        );
        assert!(!first.overlaps(&second));
        assert!(!second.overlaps(&first));
    }

    #[test]
    fn test_one_minute_overlap_conflicts() {
        let first = window(
            datetime!(2024-12-25 10:00 UTC),
            datetime!(2024-12-25 11:00 UTC),
        );
        let second = window(
            datetime!(2024-12-25 10:59 UTC),
            datetime!(2024-12-25 12:00 UTC),
        );
        assert!(first.overlaps(&second));
        assert!(second.overlaps(&first));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = window(
            datetime!(2024-12-25 08:00 UTC),
            datetime!(2024-12-25 17:00 UTC),
        );
        let inner = window(
            datetime!(2024-12-25 10:00 UTC),
            datetime!(2024-12-25 11:00 UTC),
        );
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_overlap_is_symmetric_over_offsets() {
        let base_start = datetime!(2024-12-25 10:00 UTC);
        let base_end = datetime!(2024-12-25 11:00 UTC);
        let base = window(base_start, base_end);

        for start_offset in -120_i64..=120 {
            for length in [1_i64, 30, 60, 90] {
                let start = base_start + time::Duration::minutes(start_offset);
                let end = start + time::Duration::minutes(length);
                let other = window(start, end);
                assert_eq!(
                    base.overlaps(&other),
                    other.overlaps(&base),
                    "asymmetric for offset {start_offset} length {length}"
                );
            }
        }
    }

    #[test]
    fn test_overlap_compares_instants_across_offsets() {
        let utc = window(
            datetime!(2024-12-25 10:00 UTC),
            datetime!(2024-12-25 11:00 UTC),
        );
        // 11:30 +01:00 is 10:30 UTC
        let shifted = window(
            datetime!(2024-12-25 11:30 +1),
            datetime!(2024-12-25 12:30 +1),
        );
        assert!(utc.overlaps(&shifted));
    }

    #[test]
    fn test_date_must_match_start() {
        let result = TimeWindow::new(
            date!(2024 - 12 - 24),
            datetime!(2024-12-25 09:00 UTC),
            datetime!(2024-12-25 12:00 UTC),
        )
        .unwrap();
        assert!(matches!(
            result.ensure_date_matches_start(),
            Err(DomainError::ExamDateMismatch { .. })
        ));

        let ok = window(
            datetime!(2024-12-25 09:00 UTC),
            datetime!(2024-12-25 12:00 UTC),
        );
        assert!(ok.ensure_date_matches_start().is_ok());
    }
}
