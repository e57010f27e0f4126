// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Additive arithmetic on [`CommonTime`].
//!
//! Offsets are split into whole days, whole milliseconds and a
//! sub-millisecond remainder before being added field-wise; the result is
//! then folded back by the normalizer.  The `add_*` methods and
//! [`CommonTime::checked_add_seconds`] are fallible and leave the value
//! untouched on error.  The operators (`+`, `-`, `+=`, `-=`) accept `f64`,
//! `i64` and [`Seconds`] and, like `std::time::Instant`, panic when the
//! result leaves the representable range.

use qtty::Seconds;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::error::{Error, RangeError, TimeField};
use crate::instant::{CommonTime, DAY_RANGE, MAX_DAY, MS_PER_DAY, MS_PER_SEC, SEC_PER_DAY};
use crate::normalize::normalize;

/// Largest offset magnitude (seconds) that can possibly stay in range.
const MAX_OFFSET_S: f64 = ((MAX_DAY + 1) * SEC_PER_DAY) as f64;

impl CommonTime {
    /// Field-wise offset followed by normalization.
    fn offset(self, days: i64, ms: i64, frac_ms: f64) -> Result<Self, Error> {
        let (day, msod, frac_ms) = normalize(self.day + days, self.msod + ms, self.frac_ms + frac_ms)?;
        Ok(Self::from_raw(day, msod, frac_ms, self.system))
    }

    /// `self + seconds`, without mutating `self`.
    pub fn checked_add_seconds(self, seconds: f64) -> Result<Self, Error> {
        if !seconds.is_finite() || seconds.abs() > MAX_OFFSET_S {
            return Err(RangeError::new(TimeField::Offset, seconds, "(-2.974e11, 2.974e11) s").into());
        }

        let days = (seconds / SEC_PER_DAY as f64).trunc();
        let ms = (seconds - days * SEC_PER_DAY as f64) * MS_PER_SEC as f64;
        let whole_ms = ms.trunc();
        self.offset(days as i64, whole_ms as i64, ms - whole_ms)
    }

    /// Add a (possibly fractional, possibly negative) number of seconds.
    pub fn add_seconds(&mut self, seconds: f64) -> Result<&mut Self, Error> {
        *self = self.checked_add_seconds(seconds)?;
        Ok(self)
    }

    /// Add a whole number of seconds.  Exact.
    pub fn add_whole_seconds(&mut self, seconds: i64) -> Result<&mut Self, Error> {
        let days = seconds / SEC_PER_DAY;
        let ms = (seconds % SEC_PER_DAY) * MS_PER_SEC;
        *self = self.shift_days(days)?.offset(0, ms, 0.0)?;
        Ok(self)
    }

    /// Add a whole number of milliseconds, carrying into the day count.
    pub fn add_milliseconds(&mut self, ms: i64) -> Result<&mut Self, Error> {
        *self = self.shift_days(ms / MS_PER_DAY)?.offset(0, ms % MS_PER_DAY, 0.0)?;
        Ok(self)
    }

    /// Add whole days.  The sub-day fields are not touched.
    pub fn add_days(&mut self, days: i64) -> Result<&mut Self, Error> {
        *self = self.shift_days(days)?;
        Ok(self)
    }

    fn shift_days(self, days: i64) -> Result<Self, Error> {
        match self.day.checked_add(days) {
            Some(day) if (0..=MAX_DAY).contains(&day) => Ok(Self { day, ..self }),
            _ => Err(RangeError::new(TimeField::Day, self.day as f64 + days as f64, DAY_RANGE).into()),
        }
    }

    /// `self − other` in seconds.
    ///
    /// The whole-millisecond and sub-millisecond parts are accumulated
    /// separately, so the fractional part is not swamped by a large day
    /// difference.  The time-system tags are ignored; see
    /// [`CommonTime::checked_difference`].
    pub fn difference(&self, other: &Self) -> Seconds {
        let ms = (self.day - other.day) * MS_PER_DAY + (self.msod - other.msod);
        let frac = self.frac_ms - other.frac_ms;
        Seconds::new(ms as f64 / MS_PER_SEC as f64 + frac / MS_PER_SEC as f64)
    }

    /// `self − other` in seconds, provided both lie on compatible time
    /// systems.
    pub fn checked_difference(&self, other: &Self) -> Result<Seconds, Error> {
        if !self.system.is_compatible(&other.system) {
            return Err(Error::IncompatibleTimeSystems {
                lhs: self.system,
                rhs: other.system,
            });
        }
        Ok(self.difference(other))
    }
}

// ── Operators ─────────────────────────────────────────────────────────────

/// Generate `+`, `-`, `+=`, `-=` for an offset type, given how to add and
/// how to subtract it.
macro_rules! impl_offset_ops {
    ($rhs:ty, |$t:ident, $v:ident| add: $add:expr, sub: $sub:expr) => {
        impl AddAssign<$rhs> for CommonTime {
            #[inline]
            fn add_assign(&mut self, rhs: $rhs) {
                let ($t, $v) = (&mut *self, rhs);
                if let Err(e) = $add {
                    panic!("overflow when adding to CommonTime: {e}");
                }
            }
        }

        impl SubAssign<$rhs> for CommonTime {
            #[inline]
            fn sub_assign(&mut self, rhs: $rhs) {
                let ($t, $v) = (&mut *self, rhs);
                if let Err(e) = $sub {
                    panic!("overflow when subtracting from CommonTime: {e}");
                }
            }
        }

        impl Add<$rhs> for CommonTime {
            type Output = Self;
            #[inline]
            fn add(mut self, rhs: $rhs) -> Self::Output {
                self += rhs;
                self
            }
        }

        impl Sub<$rhs> for CommonTime {
            type Output = Self;
            #[inline]
            fn sub(mut self, rhs: $rhs) -> Self::Output {
                self -= rhs;
                self
            }
        }
    };
}

impl_offset_ops!(f64, |t, v| add: t.add_seconds(v), sub: t.add_seconds(-v));
impl_offset_ops!(i64, |t, v| add: t.add_whole_seconds(v), sub: t.add_whole_seconds(v.saturating_neg()));
impl_offset_ops!(Seconds, |t, v| add: t.add_seconds(v.value()), sub: t.add_seconds(-v.value()));

impl Sub for CommonTime {
    type Output = Seconds;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.difference(&rhs)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
