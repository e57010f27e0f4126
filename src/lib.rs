// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! GNSS time handling
//!
//! This crate provides a composite, time-system tagged instant for GNSS
//! processing, together with the arithmetic, comparison and time-system
//! conversion built around it.
//!
//! # Core types
//!
//! - [`CommonTime`] — `(day, msod, frac_ms)` instant tagged with a [`TimeSystem`].
//! - [`TimeSystem`] — closed set of time-system tags.
//! - [`TimeSystemConverter`] — port supplying offsets between time systems.
//! - [`BasicTimeSystemConverter`] — leap-second table driven converter.
//! - [`LeapSecondTable`] — TAI − UTC history, built in or loaded from
//!   `leap-seconds.list`.
//!
//! # Time systems
//!
//! | Tag | System |
//! |-----|--------|
//! | `GPS` | GPS system time |
//! | `GLO` | GLONASS system time (carried on the UTC axis) |
//! | `GAL` | Galileo system time |
//! | `QZS` | QZSS system time |
//! | `BDT` | BeiDou system time |
//! | `IRN` | NavIC (IRNSS) system time |
//! | `UTC` | Coordinated Universal Time |
//! | `TAI` | International Atomic Time |
//! | `TT` | Terrestrial Time |
//! | `TDB` | Barycentric Dynamical Time |
//! | `Any` | wildcard, compatible with every tag |
//! | `Unknown` | untagged; compatible only with itself or `Any` |
//!
//! # Example
//!
//! ```
//! use gnsstime::{BasicTimeSystemConverter, CommonTime, TimeSystem};
//!
//! let mut t = CommonTime::from_ymd_hms(2020, 1, 1, 0, 0, 0.0, TimeSystem::GPS).unwrap();
//! t.change_time_system(TimeSystem::UTC, &BasicTimeSystemConverter::new()).unwrap();
//! assert_eq!(t.format("%Y-%m-%d %H:%M:%S").unwrap(), "2019-12-31 23:59:42");
//! ```

mod arithmetic;
mod basic_converter;
mod calendar;
mod convert;
mod error;
pub(crate) mod instant;
pub mod leap_seconds;
mod normalize;
pub(crate) mod scales;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use basic_converter::BasicTimeSystemConverter;
pub use convert::TimeSystemConverter;
pub use error::{ConversionError, Error, RangeError, TableError, TimeField};
pub use instant::{CommonTime, MAX_DAY, MS_PER_DAY, MS_PER_SEC, SEC_PER_DAY};
pub use leap_seconds::{LeapSecondTable, LeapSegment};
pub use scales::TimeSystem;

pub use qtty::{Days, Seconds};
