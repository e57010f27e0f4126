// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Table-driven [`TimeSystemConverter`].
//!
//! Every supported system is placed on the TAI axis:
//!
//! | System                 | System − TAI                        |
//! |------------------------|-------------------------------------|
//! | `TAI`                  | 0                                   |
//! | `UTC`, `GLO`           | −(TAI − UTC), from the leap table   |
//! | `GPS`, `GAL`, `QZS`, `IRN` | −19 s                           |
//! | `BDT`                  | −33 s                               |
//! | `TT`                   | +32.184 s                           |
//! | `TDB`                  | +32.184 s + (TDB − TT)              |
//!
//! and `offset(from, to) = (to − TAI) − (from − TAI)`.
//!
//! GLONASS time is UTC(SU) + 3 h; the three hours are a presentation
//! matter and [`CommonTime`] carries GLO on the UTC axis.
//!
//! The leap-second lookup needs the instant on the UTC axis.  When the
//! source system is UTC-based it is read directly; otherwise it is first
//! estimated with the TAI − UTC valid at the TAI date, then refined once
//! with the value valid at the estimate.

use qtty::Seconds;

use crate::convert::TimeSystemConverter;
use crate::error::ConversionError;
use crate::instant::CommonTime;
use crate::leap_seconds::LeapSecondTable;
use crate::scales::TimeSystem;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// GPS − TAI (also Galileo, QZSS and NavIC system time).
const GPS_MINUS_TAI: f64 = -19.0;
/// BDT − TAI; BDT started on 2006-01-01 with TAI − UTC = 33 s.
const BDT_MINUS_TAI: f64 = -33.0;
/// TT − TAI.
const TT_MINUS_TAI: f64 = 32.184;

/// TDB − TT in seconds, Fairhead & Bretagnon (1990) largest terms.
///
/// Accuracy is better than 30 μs for |t| < 100 centuries.  The argument is
/// an MJD on the TT axis; a few minutes' error in it changes the result by
/// well under a nanosecond.
///
/// ## References
/// * Fairhead & Bretagnon (1990), A&A 229, 240
/// * USNO Circular 179, eq. 2.6
pub(crate) fn tdb_minus_tt(mjd_tt: f64) -> f64 {
    // Julian centuries from J2000.0
    let t = (mjd_tt - 51_544.5) / 36_525.0;

    let m_e = (357.5291092 + 35999.0502909 * t).to_radians();
    let m_j = (246.4512 + 3035.2335 * t).to_radians();
    let d = (297.8502042 + 445267.1115168 * t).to_radians();
    let om = (125.0445550 - 1934.1362091 * t).to_radians();

    0.001_657 * (m_e + 0.01671 * m_e.sin()).sin()
        + 0.000_022 * (d - m_e).sin()
        + 0.000_014 * (2.0 * d).sin()
        + 0.000_005 * m_j.sin()
        + 0.000_005 * om.sin()
}

#[inline]
const fn is_utc_based(system: TimeSystem) -> bool {
    matches!(system, TimeSystem::UTC | TimeSystem::GLO)
}

/// Converter between every concrete [`TimeSystem`], driven by a
/// [`LeapSecondTable`].
#[derive(Debug, Clone, Default)]
pub struct BasicTimeSystemConverter {
    table: LeapSecondTable,
}

impl BasicTimeSystemConverter {
    /// Converter using the built-in leap-second history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Converter using a caller-supplied table, e.g. a freshly downloaded
    /// `leap-seconds.list`.
    pub fn with_table(table: LeapSecondTable) -> Self {
        Self { table }
    }

    /// The leap-second table in use.
    #[inline]
    pub fn table(&self) -> &LeapSecondTable {
        &self.table
    }

    /// `system − TAI` in seconds.
    ///
    /// `tai_minus_utc` is only read for UTC-based systems.
    fn minus_tai(
        system: TimeSystem,
        tai_minus_utc: f64,
        mjd: f64,
    ) -> Result<f64, ConversionError> {
        use TimeSystem::*;
        match system {
            TAI => Ok(0.0),
            UTC | GLO => Ok(-tai_minus_utc),
            GPS | GAL | QZS | IRN => Ok(GPS_MINUS_TAI),
            BDT => Ok(BDT_MINUS_TAI),
            TT => Ok(TT_MINUS_TAI),
            TDB => Ok(TT_MINUS_TAI + tdb_minus_tt(mjd)),
            Unknown | Any => Err(ConversionError::UnsupportedTimeSystem(system)),
        }
    }

    /// MJD of `instant` (tagged `from`) on the UTC axis.
    fn utc_mjd(&self, from: TimeSystem, mjd: f64) -> Result<f64, ConversionError> {
        if is_utc_based(from) {
            return Ok(mjd);
        }
        let mjd_tai = mjd - Self::minus_tai(from, 0.0, mjd)? / SECONDS_PER_DAY;
        let estimate = mjd_tai - self.table.tai_minus_utc(mjd_tai)?.value() / SECONDS_PER_DAY;
        Ok(mjd_tai - self.table.tai_minus_utc(estimate)?.value() / SECONDS_PER_DAY)
    }
}

impl TimeSystemConverter for BasicTimeSystemConverter {
    fn offset(
        &self,
        from: TimeSystem,
        to: TimeSystem,
        instant: &CommonTime,
    ) -> Result<Seconds, ConversionError> {
        for system in [from, to] {
            if !system.is_concrete() {
                return Err(ConversionError::UnsupportedTimeSystem(system));
            }
        }
        if from == to {
            return Ok(Seconds::new(0.0));
        }

        let mjd = instant.modified_julian_date().value();
        let leap = if is_utc_based(from) || is_utc_based(to) {
            let mjd_utc = self.utc_mjd(from, mjd)?;
            self.table.tai_minus_utc(mjd_utc)?.value()
        } else {
            0.0
        };

        let to_k = Self::minus_tai(to, leap, mjd)?;
        let from_k = Self::minus_tai(from, leap, mjd)?;
        Ok(Seconds::new(to_k - from_k))
    }
}
