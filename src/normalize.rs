// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Canonical-form normalizer.
//!
//! A [`CommonTime`](crate::CommonTime) is stored as
//! `(day, msod, frac_ms)`.  After any field-wise update the triple may be
//! out of range in either direction; [`normalize`] folds it back:
//!
//! ```text
//! frac_ms ──floor──▶ msod ──div_euclid(86 400 000)──▶ day
//! ```
//!
//! Carries into `msod` and `day` are integer operations, so only the
//! sub-millisecond fraction ever carries floating-point error.

use crate::error::{RangeError, TimeField};
use crate::instant::{DAY_RANGE, MAX_DAY, MS_PER_DAY};

/// Bring `(day, msod, frac_ms)` into canonical form.
///
/// Fails only when the resulting day falls outside `[0, MAX_DAY]`.
pub(crate) fn normalize(day: i64, msod: i64, frac_ms: f64) -> Result<(i64, i64, f64), RangeError> {
    let mut msod = msod;
    let mut frac = frac_ms;

    if !(0.0..1.0).contains(&frac) {
        let carry = frac.floor();
        msod += carry as i64;
        frac -= carry;
        // -1e-17 floors to -1 and leaves 1.0 - 1e-17 == 1.0
        if frac >= 1.0 {
            msod += 1;
            frac -= 1.0;
        }
    }

    let day = day + msod.div_euclid(MS_PER_DAY);
    let msod = msod.rem_euclid(MS_PER_DAY);

    if !(0..=MAX_DAY).contains(&day) {
        return Err(RangeError::new(TimeField::Day, day as f64, DAY_RANGE));
    }

    // canonical +0.0
    Ok((day, msod, frac + 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_input_is_untouched() {
        assert_eq!(normalize(10, 1_000, 0.25).unwrap(), (10, 1_000, 0.25));
    }

    #[test]
    fn fraction_overflow_carries_into_msod() {
        let (day, msod, frac) = normalize(10, 999, 2.5).unwrap();
        assert_eq!((day, msod), (10, 1_001));
        assert!((frac - 0.5).abs() < 1e-15);
    }

    #[test]
    fn fraction_underflow_borrows_from_msod() {
        let (day, msod, frac) = normalize(10, 10_000, -0.25).unwrap();
        assert_eq!((day, msod), (10, 9_999));
        assert!((frac - 0.75).abs() < 1e-15);
    }

    #[test]
    fn tiny_negative_fraction_does_not_leave_one() {
        let (day, msod, frac) = normalize(10, 10_000, -1e-17).unwrap();
        assert_eq!((day, msod), (10, 10_000));
        assert_eq!(frac, 0.0);
    }

    #[test]
    fn msod_overflow_carries_into_day() {
        assert_eq!(
            normalize(10, 2 * MS_PER_DAY + 5, 0.0).unwrap(),
            (12, 5, 0.0)
        );
    }

    #[test]
    fn msod_underflow_borrows_from_day() {
        assert_eq!(normalize(10, -1_000, 0.0).unwrap(), (9, MS_PER_DAY - 1_000, 0.0));
        assert_eq!(
            normalize(10, -MS_PER_DAY - 1, 0.0).unwrap(),
            (8, MS_PER_DAY - 1, 0.0)
        );
    }

    #[test]
    fn fraction_borrow_cascades_to_day() {
        let (day, msod, frac) = normalize(10, 0, -0.5).unwrap();
        assert_eq!((day, msod), (9, MS_PER_DAY - 1));
        assert!((frac - 0.5).abs() < 1e-15);
    }

    #[test]
    fn negative_zero_is_canonicalised() {
        let (_, _, frac) = normalize(1, 0, -0.0).unwrap();
        assert!(frac.is_sign_positive());
    }

    #[test]
    fn out_of_range_day_is_rejected() {
        let err = normalize(0, -1, 0.0).unwrap_err();
        assert_eq!(err.field, TimeField::Day);
        assert_eq!(err.value, -1.0);

        let err = normalize(MAX_DAY, MS_PER_DAY, 0.0).unwrap_err();
        assert_eq!(err.field, TimeField::Day);
        assert_eq!(err.value, (MAX_DAY + 1) as f64);
    }
}
