// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time-system tags.
//!
//! Every [`CommonTime`](crate::CommonTime) carries a [`TimeSystem`] that
//! names the scale its fields are counted in.  Two of the variants are not
//! scales at all:
//!
//! * [`TimeSystem::Unknown`] — the default tag of a freshly built value.
//! * [`TimeSystem::Any`] — a wildcard that matches every other tag when
//!   comparing instants.
//!
//! # GNSS system times
//!
//! | Variant | Scale | Relation |
//! |---------|-------|----------|
//! | [`GPS`](TimeSystem::GPS) | GPS Time | TAI − 19 s |
//! | [`GAL`](TimeSystem::GAL) | Galileo System Time | = GPS |
//! | [`QZS`](TimeSystem::QZS) | QZSS Time | = GPS |
//! | [`IRN`](TimeSystem::IRN) | NavIC / IRNSS Time | = GPS |
//! | [`BDT`](TimeSystem::BDT) | BeiDou Time | GPS − 14 s |
//! | [`GLO`](TimeSystem::GLO) | GLONASS Time | UTC (leap seconds applied) |
//!
//! # Reference scales
//!
//! | Variant | Scale |
//! |---------|-------|
//! | [`UTC`](TimeSystem::UTC) | Coordinated Universal Time |
//! | [`TAI`](TimeSystem::TAI) | International Atomic Time |
//! | [`TT`](TimeSystem::TT)   | Terrestrial Time, TAI + 32.184 s |
//! | [`TDB`](TimeSystem::TDB) | Barycentric Dynamical Time |

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Time system (scale) tag of an instant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimeSystem {
    /// Scale not set.
    #[default]
    Unknown,
    /// Wildcard, compatible with every tag.
    Any,
    GPS,
    GLO,
    GAL,
    QZS,
    BDT,
    IRN,
    UTC,
    TAI,
    TT,
    TDB,
}

impl TimeSystem {
    /// Every variant, in declaration order.
    pub const ALL: [TimeSystem; 12] = [
        Self::Unknown,
        Self::Any,
        Self::GPS,
        Self::GLO,
        Self::GAL,
        Self::QZS,
        Self::BDT,
        Self::IRN,
        Self::UTC,
        Self::TAI,
        Self::TT,
        Self::TDB,
    ];

    /// Canonical name, as printed by the diagnostic format.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Any => "Any",
            Self::GPS => "GPS",
            Self::GLO => "GLO",
            Self::GAL => "GAL",
            Self::QZS => "QZS",
            Self::BDT => "BDT",
            Self::IRN => "IRN",
            Self::UTC => "UTC",
            Self::TAI => "TAI",
            Self::TT => "TT",
            Self::TDB => "TDB",
        }
    }

    /// `true` for tags that name an actual scale (not `Unknown`/`Any`).
    #[inline]
    pub const fn is_concrete(&self) -> bool {
        !matches!(self, Self::Unknown | Self::Any)
    }

    /// Whether instants tagged `self` and `other` may be compared.
    ///
    /// `Any` on either side always matches.  Otherwise the tags must be
    /// identical, so `Unknown` only matches `Unknown`.
    #[inline]
    pub const fn is_compatible(&self, other: &Self) -> bool {
        matches!(self, Self::Any) || matches!(other, Self::Any) || *self as u8 == *other as u8
    }
}

impl fmt::Display for TimeSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimeSystem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|ts| ts.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownTimeSystem(s.to_string()))
    }
}
