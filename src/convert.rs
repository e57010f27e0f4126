// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time-system conversion port.
//!
//! The core never hard-codes the offsets between time systems.  It asks a
//! [`TimeSystemConverter`] for the additive offset valid at a given
//! instant and applies it with the ordinary arithmetic:
//!
//! ```text
//! t(to) = t(from) + converter.offset(from, to, t)
//! ```
//!
//! [`BasicTimeSystemConverter`](crate::BasicTimeSystemConverter) provides
//! the leap-second table driven implementation; closures can be used for
//! anything else (broadcast polynomials, fixed test offsets, ...).

use log::debug;
use qtty::Seconds;

use crate::error::{ConversionError, Error};
use crate::instant::CommonTime;
use crate::scales::TimeSystem;

/// Source of additive offsets between time systems.
///
/// Implementations must be deterministic for a fixed `(from, to, instant)`
/// triple.  The instant is expressed in `from`.
pub trait TimeSystemConverter {
    /// Seconds to add to an instant on `from` to express it on `to`.
    fn offset(
        &self,
        from: TimeSystem,
        to: TimeSystem,
        instant: &CommonTime,
    ) -> Result<Seconds, ConversionError>;
}

impl<F> TimeSystemConverter for F
where
    F: Fn(TimeSystem, TimeSystem, &CommonTime) -> Result<Seconds, ConversionError>,
{
    #[inline]
    fn offset(
        &self,
        from: TimeSystem,
        to: TimeSystem,
        instant: &CommonTime,
    ) -> Result<Seconds, ConversionError> {
        self(from, to, instant)
    }
}

impl CommonTime {
    /// Re-express this instant on `target`.
    ///
    /// Converting to the current time system is a no-op and does not
    /// consult the converter.  On any failure (no offset available, or the
    /// shifted instant out of range) the value is left exactly as it was.
    pub fn change_time_system<C>(&mut self, target: TimeSystem, converter: &C) -> Result<(), Error>
    where
        C: TimeSystemConverter + ?Sized,
    {
        if target == self.system {
            return Ok(());
        }

        let offset = converter.offset(self.system, target, self)?;
        let mut shifted = self.checked_add_seconds(offset.value())?;
        shifted.system = target;

        debug!("{} -> {}: {} ({} s)", self.system, target, shifted, offset.value());
        *self = shifted;
        Ok(())
    }

    /// Non-mutating [`change_time_system`](Self::change_time_system).
    pub fn to_time_system<C>(&self, target: TimeSystem, converter: &C) -> Result<Self, Error>
    where
        C: TimeSystemConverter + ?Sized,
    {
        let mut t = *self;
        t.change_time_system(target, converter)?;
        Ok(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RangeError, TimeField};
    use std::cell::Cell;

    fn fixed(
        seconds: f64,
    ) -> impl Fn(TimeSystem, TimeSystem, &CommonTime) -> Result<Seconds, ConversionError> {
        move |_, _, _| Ok(Seconds::new(seconds))
    }

    #[test]
    fn applies_offset_and_retags() {
        let mut t = CommonTime::from_day_sod(2_450_000, 100, 0.5, TimeSystem::UTC).unwrap();
        t.change_time_system(TimeSystem::GPS, &fixed(13.0)).unwrap();
        assert_eq!(t.time_system(), TimeSystem::GPS);
        let (day, sod, fsod) = t.get();
        assert_eq!((day, sod), (2_450_000, 113));
        assert!((fsod - 0.5).abs() < 1e-11);
    }

    #[test]
    fn same_system_is_a_noop_without_calling_the_converter() {
        let calls = Cell::new(0);
        let counting = |_: TimeSystem, _: TimeSystem, _: &CommonTime| -> Result<Seconds, ConversionError> {
            calls.set(calls.get() + 1);
            Ok(Seconds::new(1.0))
        };
        let mut t = CommonTime::from_day_sod(2_450_000, 0, 0.0, TimeSystem::GLO).unwrap();
        t.change_time_system(TimeSystem::GLO, &counting).unwrap();
        assert_eq!(calls.get(), 0);
        assert_eq!(t.get_internal(), (2_450_000, 0, 0.0));
    }

    #[test]
    fn converter_failure_leaves_value_untouched() {
        let failing = |_: TimeSystem, to: TimeSystem, _: &CommonTime| -> Result<Seconds, ConversionError> {
            Err(ConversionError::UnsupportedTimeSystem(to))
        };
        let mut t = CommonTime::from_day_sod(2_450_000, 10, 0.25, TimeSystem::GPS).unwrap();
        let before = t;
        let err = t.change_time_system(TimeSystem::TDB, &failing).unwrap_err();
        assert_eq!(
            err,
            Error::Conversion(ConversionError::UnsupportedTimeSystem(TimeSystem::TDB))
        );
        assert_eq!(t.get_internal(), before.get_internal());
        assert_eq!(t.time_system(), TimeSystem::GPS);
    }

    #[test]
    fn out_of_range_result_leaves_value_untouched() {
        let mut t = CommonTime::from_day_sod(0, 5, 0.0, TimeSystem::GPS).unwrap();
        let err = t.change_time_system(TimeSystem::UTC, &fixed(-18.0)).unwrap_err();
        assert!(matches!(err, Error::Range(RangeError { field: TimeField::Day, .. })));
        assert_eq!(t.get_internal(), (0, 5_000, 0.0));
        assert_eq!(t.time_system(), TimeSystem::GPS);
    }

    #[test]
    fn works_through_a_trait_object() {
        let boxed: Box<dyn TimeSystemConverter> = Box::new(fixed(-19.0));
        let t = CommonTime::from_day_sod(2_450_000, 100, 0.0, TimeSystem::TAI).unwrap();
        let gps = t.to_time_system(TimeSystem::GPS, boxed.as_ref()).unwrap();
        assert_eq!(gps.get(), (2_450_000, 81, 0.0));
        assert_eq!(t.time_system(), TimeSystem::TAI);
    }
}
