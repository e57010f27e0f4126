// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Calendar bridge: chrono, Julian Date and Modified Julian Date.
//!
//! [`CommonTime`] never decomposes itself into calendar fields; the
//! proleptic Gregorian calendar is delegated to `chrono`.  The bridge only
//! maps chrono's day count onto the Julian Day Number:
//!
//! ```text
//! JDN = days_from_ce + 1 721 425      (2000-01-01 → 2 451 545)
//! MJD = JDN − 2 400 001 + msod / 86 400 000
//! ```
//!
//! Projections are tag-agnostic except [`CommonTime::to_utc`], which only
//! applies to instants on UTC (or `Any`).

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use qtty::Days;
use std::fmt::Write;

use crate::error::{Error, RangeError, TimeField};
use crate::instant::{CommonTime, DAY_RANGE, MS_PER_DAY, MS_PER_SEC, SEC_PER_DAY};
use crate::scales::TimeSystem;

/// JDN of 0000-12-31 (chrono day 0 from the common era).
const JDN_CE_OFFSET: i64 = 1_721_425;

/// JDN of the day containing MJD 0 (1858-11-17).
const JDN_MJD_OFFSET: i64 = 2_400_001;

impl CommonTime {
    /// Build from a calendar date and time of day on `system`.
    ///
    /// `second` may carry a fraction.  Impossible dates (30 February,
    /// hour 24, ...) fail with [`Error::InvalidDate`].
    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: f64,
        system: TimeSystem,
    ) -> Result<Self, Error> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(Error::InvalidDate)?;
        if hour >= 24 || minute >= 60 {
            return Err(Error::InvalidDate);
        }
        let sod = f64::from(hour * 3_600 + minute * 60) + second;

        let mut t = Self::new();
        t.set_seconds(jdn_of(date), sod, system)?;
        Ok(t)
    }

    /// Build from a naive calendar timestamp interpreted on `system`.
    ///
    /// A chrono leap second (`23:59:60.x`) rolls into the next day.
    pub fn from_naive_datetime(datetime: NaiveDateTime, system: TimeSystem) -> Result<Self, Error> {
        let time = datetime.time();
        let nanos = i64::from(time.nanosecond());
        let msod = i64::from(time.num_seconds_from_midnight()) * MS_PER_SEC + nanos / 1_000_000;
        let frac_ms = (nanos % 1_000_000) as f64 / 1e6;

        let mut t = Self::from_internal(jdn_of(datetime.date()), 0, frac_ms, system)?;
        t.add_milliseconds(msod)?;
        Ok(t)
    }

    /// Build from a UTC timestamp; the result is tagged [`TimeSystem::UTC`].
    pub fn from_utc(datetime: DateTime<Utc>) -> Result<Self, Error> {
        Self::from_naive_datetime(datetime.naive_utc(), TimeSystem::UTC)
    }

    /// Calendar projection, to the nearest nanosecond.
    ///
    /// `None` if chrono cannot represent the date.
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        let days_from_ce = i32::try_from(self.day - JDN_CE_OFFSET).ok()?;
        let date = NaiveDate::from_num_days_from_ce_opt(days_from_ce)?;

        let secs = (self.msod / MS_PER_SEC) as u32;
        let sub_ms = (self.frac_ms * 1e6).round().min(999_999.0) as u32;
        let nanos = (self.msod % MS_PER_SEC) as u32 * 1_000_000 + sub_ms;
        let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)?;
        Some(date.and_time(time))
    }

    /// UTC projection.
    ///
    /// `None` unless the instant is on [`TimeSystem::UTC`] or
    /// [`TimeSystem::Any`]; convert with
    /// [`change_time_system`](Self::change_time_system) first.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        if !self.system.is_compatible(&TimeSystem::UTC) {
            return None;
        }
        self.to_naive_datetime().map(|dt| dt.and_utc())
    }

    /// Julian Date on the instant's own time system.
    pub fn julian_date(&self) -> Days {
        Days::new(self.day as f64 - 0.5 + self.day_fraction())
    }

    /// Modified Julian Date (`JD − 2 400 000.5`).
    pub fn modified_julian_date(&self) -> Days {
        Days::new((self.day - JDN_MJD_OFFSET) as f64 + self.day_fraction())
    }

    /// Build from a Julian Date.  Precision is that of the `f64` input.
    pub fn from_julian_date(jd: Days, system: TimeSystem) -> Result<Self, Error> {
        let mut t = Self::new();
        t.set_days(jd.value() + 0.5, system)?;
        Ok(t)
    }

    /// Build from a Modified Julian Date.
    pub fn from_mjd(mjd: Days, system: TimeSystem) -> Result<Self, Error> {
        let mjd = mjd.value();
        if !mjd.is_finite() {
            return Err(RangeError::new(TimeField::Day, mjd, DAY_RANGE).into());
        }
        let whole = mjd.floor();
        let sod = (mjd - whole) * SEC_PER_DAY as f64;

        let mut t = Self::new();
        t.set_seconds(whole as i64 + JDN_MJD_OFFSET, sod, system)?;
        Ok(t)
    }

    /// Render with a chrono `strftime` pattern (`%Y-%m-%d %H:%M:%S%.f`,
    /// `%j`, `%a`, `%U`, ...).
    ///
    /// `None` if the pattern is invalid, uses time-zone tokens, or the
    /// instant cannot be projected onto the calendar.
    pub fn format(&self, pattern: &str) -> Option<String> {
        let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
        if items.contains(&Item::Error) {
            return None;
        }
        let datetime = self.to_naive_datetime()?;

        let mut out = String::new();
        write!(out, "{}", datetime.format_with_items(items.iter())).ok()?;
        Some(out)
    }

    /// Day of year (1-based) of the calendar projection.
    pub fn day_of_year(&self) -> Option<u32> {
        self.to_naive_datetime().map(|dt| dt.ordinal())
    }

    #[inline]
    fn day_fraction(&self) -> f64 {
        (self.msod as f64 + self.frac_ms) / MS_PER_DAY as f64
    }
}

#[inline]
fn jdn_of(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) + JDN_CE_OFFSET
}
