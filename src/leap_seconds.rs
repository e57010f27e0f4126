// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! TAI − UTC history.
//!
//! A [`LeapSecondTable`] is an ordered list of [`LeapSegment`]s.  Within a
//! segment
//!
//! ```text
//! TAI − UTC = offset + (MJD − ref_mjd) × drift
//! ```
//!
//! where `MJD` is the Modified Julian Date on the UTC axis.  From 1961 to
//! 1971 UTC was steered by small steps *and* a frequency offset, hence the
//! drift term; since 1972-01-01 every segment is an integer number of
//! seconds with zero drift.
//!
//! The built-in table ([`LeapSecondTable::builtin`]) covers 1961-01-01
//! through the 2017-01-01 leap second with no expiry.  A newer table can be
//! loaded at runtime from the IERS/NTP `leap-seconds.list` file, in which
//! case lookups past the file's expiry date fail.
//!
//! ## References
//! * IERS Bulletin C (leap second announcements)
//! * USNO `tai-utc.dat` (1961–1971 drift coefficients)

use log::{debug, warn};
use qtty::Seconds;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ConversionError, TableError};

/// MJD of the NTP epoch, 1900-01-01T00:00:00 UTC.
const NTP_EPOCH_MJD: f64 = 15_020.0;

/// One piece of the TAI − UTC history.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LeapSegment {
    /// First UTC MJD (00:00) the segment applies to.
    pub start_mjd: f64,
    /// TAI − UTC at `ref_mjd`, in seconds.
    pub offset: f64,
    /// Reference MJD of the drift term.
    pub ref_mjd: f64,
    /// Drift in seconds per day.
    pub drift: f64,
}

impl LeapSegment {
    /// Integer-second segment starting at `start_mjd`.
    pub const fn step(start_mjd: f64, offset: f64) -> Self {
        Self {
            start_mjd,
            offset,
            ref_mjd: start_mjd,
            drift: 0.0,
        }
    }

    const fn drifting(start_mjd: f64, offset: f64, ref_mjd: f64, drift: f64) -> Self {
        Self {
            start_mjd,
            offset,
            ref_mjd,
            drift,
        }
    }

    /// TAI − UTC (seconds) at `mjd_utc`.
    #[inline]
    pub fn tai_minus_utc(&self, mjd_utc: f64) -> f64 {
        self.offset + (mjd_utc - self.ref_mjd) * self.drift
    }
}

/// 1961–1971: rubber-second era.
#[rustfmt::skip]
const DRIFTING: [LeapSegment; 13] = [
    LeapSegment::drifting(37_300.0, 1.422_818_0, 37_300.0, 0.001_296),  // 1961-01-01
    LeapSegment::drifting(37_512.0, 1.372_818_0, 37_300.0, 0.001_296),  // 1961-08-01
    LeapSegment::drifting(37_665.0, 1.845_858_0, 37_665.0, 0.001_123_2), // 1962-01-01
    LeapSegment::drifting(38_334.0, 1.945_858_0, 37_665.0, 0.001_123_2), // 1963-11-01
    LeapSegment::drifting(38_395.0, 3.240_130_0, 38_761.0, 0.001_296),  // 1964-01-01
    LeapSegment::drifting(38_486.0, 3.340_130_0, 38_761.0, 0.001_296),  // 1964-04-01
    LeapSegment::drifting(38_639.0, 3.440_130_0, 38_761.0, 0.001_296),  // 1964-09-01
    LeapSegment::drifting(38_761.0, 3.540_130_0, 38_761.0, 0.001_296),  // 1965-01-01
    LeapSegment::drifting(38_820.0, 3.640_130_0, 38_761.0, 0.001_296),  // 1965-03-01
    LeapSegment::drifting(38_942.0, 3.740_130_0, 38_761.0, 0.001_296),  // 1965-07-01
    LeapSegment::drifting(39_004.0, 3.840_130_0, 38_761.0, 0.001_296),  // 1965-09-01
    LeapSegment::drifting(39_126.0, 4.313_170_0, 39_126.0, 0.002_592),  // 1966-01-01
    LeapSegment::drifting(39_887.0, 4.213_170_0, 39_126.0, 0.002_592),  // 1968-02-01
];

/// 1972 onwards: integer leap seconds (IERS Bulletin C).
#[rustfmt::skip]
const STEPS: [LeapSegment; 28] = [
    LeapSegment::step(41_317.0, 10.0), // 1972-01-01
    LeapSegment::step(41_499.0, 11.0), // 1972-07-01
    LeapSegment::step(41_683.0, 12.0), // 1973-01-01
    LeapSegment::step(42_048.0, 13.0), // 1974-01-01
    LeapSegment::step(42_413.0, 14.0), // 1975-01-01
    LeapSegment::step(42_778.0, 15.0), // 1976-01-01
    LeapSegment::step(43_144.0, 16.0), // 1977-01-01
    LeapSegment::step(43_509.0, 17.0), // 1978-01-01
    LeapSegment::step(43_874.0, 18.0), // 1979-01-01
    LeapSegment::step(44_239.0, 19.0), // 1980-01-01
    LeapSegment::step(44_786.0, 20.0), // 1981-07-01
    LeapSegment::step(45_151.0, 21.0), // 1982-07-01
    LeapSegment::step(45_516.0, 22.0), // 1983-07-01
    LeapSegment::step(46_247.0, 23.0), // 1985-07-01
    LeapSegment::step(47_161.0, 24.0), // 1988-01-01
    LeapSegment::step(47_892.0, 25.0), // 1990-01-01
    LeapSegment::step(48_257.0, 26.0), // 1991-01-01
    LeapSegment::step(48_804.0, 27.0), // 1992-07-01
    LeapSegment::step(49_169.0, 28.0), // 1993-07-01
    LeapSegment::step(49_534.0, 29.0), // 1994-07-01
    LeapSegment::step(50_083.0, 30.0), // 1996-01-01
    LeapSegment::step(50_630.0, 31.0), // 1997-07-01
    LeapSegment::step(51_179.0, 32.0), // 1999-01-01
    LeapSegment::step(53_736.0, 33.0), // 2006-01-01
    LeapSegment::step(54_832.0, 34.0), // 2009-01-01
    LeapSegment::step(56_109.0, 35.0), // 2012-07-01
    LeapSegment::step(57_204.0, 36.0), // 2015-07-01
    LeapSegment::step(57_754.0, 37.0), // 2017-01-01
];

/// Last segment starting at or before `mjd_utc`.
fn lookup(segments: &[LeapSegment], mjd_utc: f64) -> Option<&LeapSegment> {
    let idx = segments.partition_point(|s| s.start_mjd <= mjd_utc);
    idx.checked_sub(1).map(|i| &segments[i])
}

/// TAI − UTC at `mjd_utc` from the built-in table.
///
/// Fails before 1961-01-01 (MJD 37 300).
pub fn tai_minus_utc(mjd_utc: f64) -> Result<Seconds, ConversionError> {
    let segment = if mjd_utc >= STEPS[0].start_mjd {
        lookup(&STEPS, mjd_utc)
    } else {
        lookup(&DRIFTING, mjd_utc)
    };
    segment
        .map(|s| Seconds::new(s.tai_minus_utc(mjd_utc)))
        .ok_or(ConversionError::OutOfCoverage { mjd: mjd_utc })
}

/// Ordered TAI − UTC history, optionally with an expiry date.
#[derive(Debug, Clone, PartialEq)]
pub struct LeapSecondTable {
    segments: Vec<LeapSegment>,
    expires_mjd: Option<f64>,
}

impl Default for LeapSecondTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LeapSecondTable {
    /// Compiled-in history (1961-01-01 … 2017-01-01, no expiry).
    pub fn builtin() -> Self {
        Self {
            segments: DRIFTING.iter().chain(STEPS.iter()).copied().collect(),
            expires_mjd: None,
        }
    }

    /// Parse an IERS/NTP `leap-seconds.list` file.
    ///
    /// Data lines are `<NTP seconds> <TAI−UTC> [# comment]`; the `#@` line
    /// carries the expiry as NTP seconds; every other `#` line is ignored.
    /// The integer steps read from the file replace the built-in ones,
    /// while the built-in 1961–1971 drifting segments are kept in front.
    pub fn parse(text: &str) -> Result<Self, TableError> {
        let mut steps: Vec<LeapSegment> = Vec::new();
        let mut expires_mjd = None;

        for (i, raw) in text.lines().enumerate() {
            let line = i + 1;
            let raw = raw.trim();

            if let Some(expiry) = raw.strip_prefix("#@") {
                let ntp: u64 = expiry.trim().parse().map_err(|_| TableError::Malformed {
                    line,
                    reason: "invalid expiry timestamp",
                })?;
                expires_mjd = Some(ntp_to_mjd(ntp));
                continue;
            }

            let data = raw.split('#').next().unwrap_or_default().trim();
            if data.is_empty() {
                continue;
            }

            let mut fields = data.split_whitespace();
            let ntp: u64 = fields
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or(TableError::Malformed {
                    line,
                    reason: "invalid NTP timestamp",
                })?;
            let offset: f64 = fields
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or(TableError::Malformed {
                    line,
                    reason: "invalid TAI-UTC offset",
                })?;

            let segment = LeapSegment::step(ntp_to_mjd(ntp), offset);
            if steps.last().is_some_and(|last| segment.start_mjd <= last.start_mjd) {
                return Err(TableError::Malformed {
                    line,
                    reason: "entries are not in chronological order",
                });
            }
            steps.push(segment);
        }

        let first = steps.first().ok_or(TableError::Empty)?.start_mjd;
        let mut segments: Vec<LeapSegment> = DRIFTING
            .iter()
            .copied()
            .filter(|s| s.start_mjd < first)
            .collect();
        segments.extend(steps);

        debug!(
            "loaded leap-second table: {} segments, expires {:?}",
            segments.len(),
            expires_mjd
        );
        Ok(Self {
            segments,
            expires_mjd,
        })
    }

    /// Read and [`parse`](Self::parse) a `leap-seconds.list` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Segments, in chronological order.
    #[inline]
    pub fn segments(&self) -> &[LeapSegment] {
        &self.segments
    }

    /// UTC MJD after which the table is no longer valid, if any.
    #[inline]
    pub fn expires(&self) -> Option<f64> {
        self.expires_mjd
    }

    /// TAI − UTC at `mjd_utc`.
    ///
    /// Fails before the first segment or past the expiry date.
    pub fn tai_minus_utc(&self, mjd_utc: f64) -> Result<Seconds, ConversionError> {
        let expired = self.expires_mjd.is_some_and(|exp| mjd_utc >= exp);
        match lookup(&self.segments, mjd_utc) {
            Some(segment) if !expired => Ok(Seconds::new(segment.tai_minus_utc(mjd_utc))),
            _ => {
                warn!("MJD {mjd_utc} is outside the leap-second table coverage");
                Err(ConversionError::OutOfCoverage { mjd: mjd_utc })
            }
        }
    }
}

impl FromStr for LeapSecondTable {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[inline]
fn ntp_to_mjd(ntp: u64) -> f64 {
    NTP_EPOCH_MJD + (ntp / 86_400) as f64 + (ntp % 86_400) as f64 / 86_400.0
}
