// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types.
//!
//! Validation failures ([`RangeError`]) are always reported before any
//! field of a [`CommonTime`](crate::CommonTime) is touched; conversion
//! failures ([`ConversionError`]) leave the value on its current scale.

use std::fmt;
use thiserror::Error;

use crate::scales::TimeSystem;

/// The field of a [`CommonTime`](crate::CommonTime) input that was rejected.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimeField {
    /// Julian day number.
    Day,
    /// Whole or real second of day.
    SecondOfDay,
    /// Fractional second, `[0, 1)`.
    FractionalSecond,
    /// Millisecond of day.
    MillisecondOfDay,
    /// Fraction of the current millisecond, `[0, 1)`.
    FractionOfMillisecond,
    /// An additive offset (must be finite).
    Offset,
}

impl TimeField {
    /// Human-readable field name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::SecondOfDay => "second of day",
            Self::FractionalSecond => "fractional second",
            Self::MillisecondOfDay => "millisecond of day",
            Self::FractionOfMillisecond => "fraction of millisecond",
            Self::Offset => "offset",
        }
    }
}

impl fmt::Display for TimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An input field fell outside its legal range.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field} {value} is outside the valid range {range}")]
pub struct RangeError {
    /// Offending field.
    pub field: TimeField,
    /// Offending value.
    pub value: f64,
    /// Valid range, in interval notation.
    pub range: &'static str,
}

impl RangeError {
    pub(crate) const fn new(field: TimeField, value: f64, range: &'static str) -> Self {
        Self {
            field,
            value,
            range,
        }
    }
}

/// A time-system offset could not be resolved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// The converter has no relation for this time system.
    #[error("no conversion available for time system {0}")]
    UnsupportedTimeSystem(TimeSystem),

    /// The requested instant lies outside the offset table.
    #[error("MJD {mjd} is outside the leap-second table coverage")]
    OutOfCoverage {
        /// Modified Julian Date (UTC) that was looked up.
        mjd: f64,
    },
}

/// Failure while loading a leap-second table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read leap-second table: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed leap-second table at line {line}: {reason}")]
    Malformed { line: usize, reason: &'static str },

    #[error("leap-second table has no entries")]
    Empty,
}

/// Crate-level error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// The operation needs both operands on compatible time systems.
    #[error("time systems {lhs} and {rhs} are not compatible")]
    IncompatibleTimeSystems { lhs: TimeSystem, rhs: TimeSystem },

    #[error("unknown time system \"{0}\"")]
    UnknownTimeSystem(String),

    /// A calendar date/time that does not exist.
    #[error("invalid calendar date or time")]
    InvalidDate,
}
