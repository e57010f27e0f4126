// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Composite, time-system tagged instant.
//!
//! [`CommonTime`] is the core type of the crate.  It stores an instant as
//! three fields kept in a single canonical form:
//!
//! | Field | Meaning | Range |
//! |-------|---------|-------|
//! | `day` | Julian Day Number | `[0, MAX_DAY]` |
//! | `msod` | millisecond of day | `[0, 86 400 000)` |
//! | `frac_ms` | fraction of the millisecond | `[0.0, 1.0)` |
//!
//! plus a [`TimeSystem`] tag.  Day `d` starts at Julian Date `d − 0.5`,
//! i.e. at midnight.  Whole days and whole milliseconds are integers; only
//! the sub-millisecond part is a float, which keeps sub-nanosecond
//! resolution across the whole multi-millennium range.
//!
//! Arithmetic ([`CommonTime::add_seconds`], the operators), scale changes
//! ([`CommonTime::change_time_system`]) and the chrono bridge
//! ([`CommonTime::from_ymd_hms`], [`CommonTime::format`]) live in their own
//! modules as further `impl CommonTime` blocks.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{Error, RangeError, TimeField};
use crate::normalize::normalize;
use crate::scales::TimeSystem;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Largest representable Julian Day Number (year 4713 CE).
pub const MAX_DAY: i64 = 3_442_448;

/// Seconds per day.
pub const SEC_PER_DAY: i64 = 86_400;

/// Milliseconds per second.
pub const MS_PER_SEC: i64 = 1_000;

/// Milliseconds per day.
pub const MS_PER_DAY: i64 = SEC_PER_DAY * MS_PER_SEC;

pub(crate) const DAY_RANGE: &str = "[0, 3442448]";

// ═══════════════════════════════════════════════════════════════════════════
// CommonTime
// ═══════════════════════════════════════════════════════════════════════════

/// A point in time on a tagged [`TimeSystem`].
///
/// `CommonTime` is `Copy`, owns no resources and is mutated only through
/// the setters, the `add_*` family/operators and
/// [`change_time_system`](CommonTime::change_time_system).
///
/// Comparison honours the time-system tag: values on incompatible systems
/// are neither equal nor ordered (see [`TimeSystem::is_compatible`]).
#[derive(Debug, Copy, Clone, Default)]
pub struct CommonTime {
    pub(crate) day: i64,
    pub(crate) msod: i64,
    pub(crate) frac_ms: f64,
    pub(crate) system: TimeSystem,
}

impl CommonTime {
    /// Earliest representable instant, tagged [`TimeSystem::Any`].
    pub const BEGINNING_OF_TIME: Self = Self::from_raw(0, 0, 0.0, TimeSystem::Any);

    /// Latest representable instant, tagged [`TimeSystem::Any`].
    pub const END_OF_TIME: Self = Self::from_raw(MAX_DAY, 0, 0.0, TimeSystem::Any);

    // ── constructors ──────────────────────────────────────────────────

    /// Zeroed instant on [`TimeSystem::Unknown`].
    #[inline]
    pub const fn new() -> Self {
        Self::from_raw(0, 0, 0.0, TimeSystem::Unknown)
    }

    /// Build directly from fields already known to be canonical.
    #[inline]
    pub(crate) const fn from_raw(day: i64, msod: i64, frac_ms: f64, system: TimeSystem) -> Self {
        Self {
            day,
            msod,
            frac_ms,
            system,
        }
    }

    /// Build from day, whole second of day and fractional second.
    ///
    /// Shorthand for [`CommonTime::new`] followed by [`CommonTime::set`].
    pub fn from_day_sod(day: i64, sod: i64, fsod: f64, system: TimeSystem) -> Result<Self, Error> {
        let mut t = Self::new();
        t.set(day, sod, fsod, system)?;
        Ok(t)
    }

    /// Build from the internal `(day, msod, frac_ms)` representation.
    pub fn from_internal(
        day: i64,
        msod: i64,
        frac_ms: f64,
        system: TimeSystem,
    ) -> Result<Self, Error> {
        let mut t = Self::new();
        t.set_internal(day, msod, frac_ms, system)?;
        Ok(t)
    }

    // ── setters ───────────────────────────────────────────────────────

    /// Set from a Julian day number, a whole second of day
    /// (`0 ≤ sod ≤ 86 400`) and a fractional second (`0 ≤ fsod < 1`).
    ///
    /// Every field is validated before anything is stored; on error
    /// `self` is unchanged.
    pub fn set(&mut self, day: i64, sod: i64, fsod: f64, system: TimeSystem) -> Result<&mut Self, Error> {
        check_day(day)?;
        if !(0..=SEC_PER_DAY).contains(&sod) {
            return Err(RangeError::new(TimeField::SecondOfDay, sod as f64, "[0, 86400]").into());
        }
        if !(0.0..1.0).contains(&fsod) {
            return Err(RangeError::new(TimeField::FractionalSecond, fsod, "[0, 1)").into());
        }

        let ms = fsod * MS_PER_SEC as f64;
        let whole_ms = ms.trunc();
        let msod = sod * MS_PER_SEC + whole_ms as i64;
        self.store(day, msod, ms - whole_ms, system)
    }

    /// Set from a Julian day number and a real second of day
    /// (`0 ≤ sod ≤ 86 400`).
    pub fn set_seconds(&mut self, day: i64, sod: f64, system: TimeSystem) -> Result<&mut Self, Error> {
        check_day(day)?;
        if !(0.0..=SEC_PER_DAY as f64).contains(&sod) {
            return Err(RangeError::new(TimeField::SecondOfDay, sod, "[0, 86400]").into());
        }
        let whole = sod.trunc();
        self.set(day, whole as i64, sod - whole, system)
    }

    /// Set from a fractional Julian day count.
    ///
    /// The day count is split into a whole day and a real second of day.
    /// Precision is limited by the `f64` input (≈ 10 µs at current epochs).
    pub fn set_days(&mut self, days: f64, system: TimeSystem) -> Result<&mut Self, Error> {
        if !(0.0..(MAX_DAY + 1) as f64).contains(&days) {
            return Err(RangeError::new(TimeField::Day, days, DAY_RANGE).into());
        }
        let day = days.trunc();
        let sod = (days - day) * SEC_PER_DAY as f64;
        self.set_seconds(day as i64, sod, system)
    }

    /// Set from the internal representation: day, millisecond of day
    /// (`0 ≤ msod ≤ 86 400 000`) and fraction of millisecond
    /// (`0 ≤ frac_ms < 1`).
    pub fn set_internal(
        &mut self,
        day: i64,
        msod: i64,
        frac_ms: f64,
        system: TimeSystem,
    ) -> Result<&mut Self, Error> {
        check_day(day)?;
        if !(0..=MS_PER_DAY).contains(&msod) {
            return Err(RangeError::new(TimeField::MillisecondOfDay, msod as f64, "[0, 86400000]").into());
        }
        if !(0.0..1.0).contains(&frac_ms) {
            return Err(RangeError::new(TimeField::FractionOfMillisecond, frac_ms, "[0, 1)").into());
        }
        self.store(day, msod, frac_ms, system)
    }

    /// Restore the zeroed, [`TimeSystem::Unknown`] state.
    #[inline]
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::new();
        self
    }

    /// Retag without touching the instant fields.
    #[inline]
    pub fn set_time_system(&mut self, system: TimeSystem) -> &mut Self {
        self.system = system;
        self
    }

    /// Normalize, then commit.  `self` is untouched on error.
    fn store(&mut self, day: i64, msod: i64, frac_ms: f64, system: TimeSystem) -> Result<&mut Self, Error> {
        let (day, msod, frac_ms) = normalize(day, msod, frac_ms)?;
        *self = Self::from_raw(day, msod, frac_ms, system);
        Ok(self)
    }

    // ── accessors ─────────────────────────────────────────────────────

    /// Julian day number.
    #[inline]
    pub const fn day(&self) -> i64 {
        self.day
    }

    /// Millisecond of day.
    #[inline]
    pub const fn msod(&self) -> i64 {
        self.msod
    }

    /// Fraction of the current millisecond, `[0, 1)`.
    #[inline]
    pub const fn frac_ms(&self) -> f64 {
        self.frac_ms
    }

    /// Time-system tag.
    #[inline]
    pub const fn time_system(&self) -> TimeSystem {
        self.system
    }

    /// `(day, whole second of day, fractional second)`.
    #[inline]
    pub fn get(&self) -> (i64, i64, f64) {
        let sod = self.msod / MS_PER_SEC;
        let fsod = (self.msod % MS_PER_SEC) as f64 / MS_PER_SEC as f64 + self.frac_ms / MS_PER_SEC as f64;
        (self.day, sod, fsod)
    }

    /// `(day, msod, frac_ms)`.
    #[inline]
    pub const fn get_internal(&self) -> (i64, i64, f64) {
        (self.day, self.msod, self.frac_ms)
    }

    /// `(day, real second of day)`.
    #[inline]
    pub fn get_day_and_sod(&self) -> (i64, f64) {
        (self.day, self.second_of_day())
    }

    /// Real second of day.
    #[inline]
    pub fn second_of_day(&self) -> f64 {
        (self.msod as f64 + self.frac_ms) / MS_PER_SEC as f64
    }

    /// Fractional Julian day count (`day` plus fraction of day).
    #[inline]
    pub fn days(&self) -> f64 {
        self.day as f64 + (self.msod as f64 + self.frac_ms) / MS_PER_DAY as f64
    }

    /// Fixed diagnostic rendering: `"DDDDDDD MMMMMMMM 0.fffffffffffffff SYS"`.
    ///
    /// Same output as the [`Display`](fmt::Display) implementation.
    pub fn as_string(&self) -> String {
        self.to_string()
    }

    /// Compare the instant fields only, ignoring the time-system tags.
    #[inline]
    pub(crate) fn cmp_instant(&self, other: &Self) -> Option<Ordering> {
        match self.day.cmp(&other.day).then(self.msod.cmp(&other.msod)) {
            Ordering::Equal => self.frac_ms.partial_cmp(&other.frac_ms),
            ord => Some(ord),
        }
    }
}

#[inline]
fn check_day(day: i64) -> Result<(), RangeError> {
    if (0..=MAX_DAY).contains(&day) {
        Ok(())
    } else {
        Err(RangeError::new(TimeField::Day, day as f64, DAY_RANGE))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Comparison
// ═══════════════════════════════════════════════════════════════════════════

impl PartialEq for CommonTime {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for CommonTime {
    /// `None` when the time systems are incompatible, so that every
    /// relational operator is `false` across scales.
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !self.system.is_compatible(&other.system) {
            return None;
        }
        self.cmp_instant(other)
    }
}

// ── Display ───────────────────────────────────────────────────────────────

impl fmt::Display for CommonTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:07} {:08} {:.15} {}",
            self.day,
            self.msod,
            self.frac_ms / MS_PER_SEC as f64,
            self.system
        )
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl Serialize for CommonTime {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("CommonTime", 4)?;
        s.serialize_field("day", &self.day)?;
        s.serialize_field("msod", &self.msod)?;
        s.serialize_field("frac_ms", &self.frac_ms)?;
        s.serialize_field("system", &self.system)?;
        s.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for CommonTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename = "CommonTime")]
        struct Raw {
            day: i64,
            msod: i64,
            frac_ms: f64,
            system: TimeSystem,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::from_internal(raw.day, raw.msod, raw.frac_ms, raw.system)
            .map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EPS: f64 = 1e-11;

    fn gps(day: i64, sod: i64, fsod: f64) -> CommonTime {
        CommonTime::from_day_sod(day, sod, fsod, TimeSystem::GPS).unwrap()
    }

    #[test]
    fn default_is_zeroed_unknown() {
        let t = CommonTime::default();
        assert_eq!(t.get_internal(), (0, 0, 0.0));
        assert_eq!(t.time_system(), TimeSystem::Unknown);
        assert_eq!(CommonTime::new().get_internal(), t.get_internal());
    }

    #[test]
    fn set_splits_fractional_second() {
        let t = gps(1_234_567, 24_000, 0.2111);
        assert_eq!(t.day(), 1_234_567);
        assert_eq!(t.msod(), 24_000_211);
        assert!((t.frac_ms() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn input_routes_agree() {
        let mut a = CommonTime::new();
        let mut b = CommonTime::new();
        let mut c = CommonTime::new();
        a.set(700_001, 1, 0.1, TimeSystem::Unknown).unwrap();
        b.set_seconds(700_001, 1.1, TimeSystem::Unknown).unwrap();
        c.set_internal(700_001, 1_100, 0.0, TimeSystem::Unknown).unwrap();

        let (d1, s1, f1) = a.get();
        for other in [b, c] {
            let (d2, s2, f2) = other.get();
            assert_eq!(d1, d2);
            assert_eq!(s1, s2);
            assert!((f1 - f2).abs() < EPS);
        }
    }

    #[test]
    fn set_days_matches_set_for_small_day_counts() {
        let mut a = CommonTime::new();
        let mut b = CommonTime::new();
        a.set(1, 1, 0.1, TimeSystem::Unknown).unwrap();
        b.set_days(1.0 + 1.1 / 86_400.0, TimeSystem::Unknown).unwrap();
        let (d1, s1, f1) = a.get();
        let (d2, s2, f2) = b.get();
        assert_eq!((d1, s1), (d2, s2));
        assert!((f1 - f2).abs() < 1e-10);
    }

    #[test]
    fn set_days_loses_precision_at_large_day_counts() {
        let mut a = CommonTime::new();
        let mut b = CommonTime::new();
        a.set(700_001, 1, 0.1, TimeSystem::Unknown).unwrap();
        b.set_days(700_001.0 + 1.1 / 86_400.0, TimeSystem::Unknown).unwrap();
        let (d1, s1, f1) = a.get();
        let (d2, s2, f2) = b.get();
        assert_eq!((d1, s1), (d2, s2));
        assert!((f1 - f2).abs() < 1e-4);
    }

    #[rstest]
    #[case::negative_day(-1, 0, 0.0, TimeField::Day)]
    #[case::too_many_days(MAX_DAY + 1, 0, 0.0, TimeField::Day)]
    #[case::negative_sod(700_000, -1, 0.0, TimeField::SecondOfDay)]
    #[case::too_many_sod(700_000, SEC_PER_DAY + 1, 0.0, TimeField::SecondOfDay)]
    #[case::negative_fsod(700_000, 0, -1.0, TimeField::FractionalSecond)]
    #[case::too_large_fsod(700_000, 0, 2.0, TimeField::FractionalSecond)]
    #[case::nan_fsod(700_000, 0, f64::NAN, TimeField::FractionalSecond)]
    fn set_rejects_out_of_range(
        #[case] day: i64,
        #[case] sod: i64,
        #[case] fsod: f64,
        #[case] field: TimeField,
    ) {
        let mut t = CommonTime::new();
        t.set(700_000, 0, 0.0, TimeSystem::GPS).unwrap();
        let before = t;

        match t.set(day, sod, fsod, TimeSystem::UTC) {
            Err(Error::Range(e)) => assert_eq!(e.field, field),
            other => panic!("expected range error, got {other:?}"),
        }
        assert_eq!(t.get_internal(), before.get_internal());
        assert_eq!(t.time_system(), TimeSystem::GPS);
    }

    #[rstest]
    #[case::negative_day(-1, 0, 0.0, TimeField::Day)]
    #[case::too_many_days(MAX_DAY + 1, 0, 0.0, TimeField::Day)]
    #[case::negative_msod(700_000, -1, 0.0, TimeField::MillisecondOfDay)]
    #[case::too_many_msod(700_000, MS_PER_DAY + 1, 0.0, TimeField::MillisecondOfDay)]
    #[case::negative_frac(700_000, 1_001, -1.0, TimeField::FractionOfMillisecond)]
    #[case::too_large_frac(700_000, 1_001, 1_001.0, TimeField::FractionOfMillisecond)]
    fn set_internal_rejects_out_of_range(
        #[case] day: i64,
        #[case] msod: i64,
        #[case] frac: f64,
        #[case] field: TimeField,
    ) {
        let mut t = CommonTime::new();
        t.set_internal(700_000, 5, 0.5, TimeSystem::GPS).unwrap();

        match t.set_internal(day, msod, frac, TimeSystem::UTC) {
            Err(Error::Range(e)) => assert_eq!(e.field, field),
            other => panic!("expected range error, got {other:?}"),
        }
        assert_eq!(t.get_internal(), (700_000, 5, 0.5));
    }

    #[test]
    fn full_day_of_seconds_rolls_into_next_day() {
        let t = gps(700_000, SEC_PER_DAY, 0.0);
        assert_eq!(t.get_internal(), (700_001, 0, 0.0));

        let err = CommonTime::from_day_sod(MAX_DAY, SEC_PER_DAY, 0.0, TimeSystem::GPS).unwrap_err();
        assert!(matches!(err, Error::Range(RangeError { field: TimeField::Day, .. })));
    }

    #[test]
    fn reset_restores_default() {
        let mut t = gps(1_000, 200, 0.2);
        t.reset();
        assert_eq!(t.time_system(), TimeSystem::Unknown);
        assert_eq!(t.get(), (0, 0, 0.0));
        t.reset();
        assert_eq!(t.get_internal(), (0, 0, 0.0));
    }

    #[test]
    fn accessors() {
        let t = gps(700_000, 1, 0.1);
        let (day, sod) = t.get_day_and_sod();
        assert_eq!(day, 700_000);
        assert!((sod - 1.1).abs() < EPS);
        assert!((t.second_of_day() - 1.1).abs() < EPS);
        assert!((t.days() - (700_000.0 + 1.1 / 86_400.0)).abs() < 1e-9);
    }

    #[test]
    fn comparison_operators() {
        let compare = gps(1_000, 200, 0.2);
        let less_day = gps(100, 200, 0.2);
        let less_sod = gps(1_000, 20, 0.2);
        let less_fsod = gps(1_000, 200, 0.1);
        let copy = compare;

        assert!(compare == copy);
        assert!(compare != less_day);
        assert!(compare != less_sod);
        assert!(compare != less_fsod);

        for lesser in [less_day, less_sod, less_fsod] {
            assert!(lesser < compare);
            assert!(!(compare < lesser));
            assert!(compare > lesser);
            assert!(!(lesser > compare));
            assert!(lesser <= compare);
            assert!(!(compare <= lesser));
            assert!(compare >= lesser);
            assert!(!(lesser >= compare));
        }

        assert!(!(compare < copy));
        assert!(!(compare > copy));
        assert!(compare <= copy);
        assert!(compare >= copy);
    }

    #[test]
    fn time_system_aware_comparison() {
        let at = |system| CommonTime::from_day_sod(1_000, 200, 0.2, system).unwrap();
        let gps1 = at(TimeSystem::GPS);
        let gps2 = CommonTime::from_day_sod(100, 200, 0.2, TimeSystem::GPS).unwrap();
        let utc1 = at(TimeSystem::UTC);
        let mut unknown = at(TimeSystem::Unknown);
        let any = at(TimeSystem::Any);

        assert!(gps1 != gps2);
        assert_eq!(gps1.time_system(), gps2.time_system());

        assert!(gps1 != utc1);
        assert!(gps1 != unknown);
        assert!(!(gps1 < utc1) && !(gps1 > utc1) && !(gps1 <= utc1) && !(gps1 >= utc1));
        assert_eq!(gps1.partial_cmp(&unknown), None);

        assert!(gps1 == any);
        assert!(utc1 == any);
        assert!(unknown == any);
        assert!(gps2 != any && gps2 < any);

        assert!(unknown == at(TimeSystem::Unknown));

        unknown.set_time_system(TimeSystem::GPS);
        assert_eq!(unknown.time_system(), TimeSystem::GPS);
        assert!(unknown == gps1);
    }

    #[test]
    fn diagnostic_string() {
        let gps1 = gps(1_234_567, 24_000, 0.2111);
        let utc1 = CommonTime::from_day_sod(1_000, 200, 0.2, TimeSystem::UTC).unwrap();
        assert_eq!(gps1.as_string(), "1234567 24000211 0.000100000000000 GPS");
        assert_eq!(utc1.to_string(), "0001000 00200200 0.000000000000000 UTC");
        assert_eq!(
            CommonTime::BEGINNING_OF_TIME.as_string(),
            "0000000 00000000 0.000000000000000 Any"
        );
        assert_eq!(
            CommonTime::END_OF_TIME.as_string(),
            "3442448 00000000 0.000000000000000 Any"
        );
    }

    #[test]
    fn sentinels_bracket_every_value() {
        let t = gps(700_000, 1, 0.5);
        assert!(CommonTime::BEGINNING_OF_TIME < t);
        assert!(t < CommonTime::END_OF_TIME);
    }

    #[test]
    fn copies_are_independent() {
        let a = gps(700_000, 0, 0.0);
        let mut b = a;
        b.set(700_001, 0, 0.0, TimeSystem::UTC).unwrap();
        assert_eq!(a.day(), 700_000);
        assert_eq!(a.time_system(), TimeSystem::GPS);
    }

    #[test]
    fn value_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CommonTime>();
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip_revalidates() {
        let t = gps(700_000, 1, 0.25);
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("\"system\":\"GPS\""));
        let back: CommonTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get_internal(), t.get_internal());
        assert_eq!(back.time_system(), TimeSystem::GPS);

        let bad = r#"{"day":-5,"msod":0,"frac_ms":0.0,"system":"UTC"}"#;
        assert!(serde_json::from_str::<CommonTime>(bad).is_err());
    }
}
