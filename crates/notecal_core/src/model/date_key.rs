//! Calendar day and month keys.
//!
//! # Responsibility
//! - Provide the canonical `DD.MM.YYYY` identifier for one calendar day.
//! - Derive the `MM.YYYY` month bucket used by activity statistics.
//!
//! # Invariants
//! - A `DateKey` always denotes a real calendar date in years `0..=9999`.
//! - Text form is zero-padded and round-trips through `FromStr`.
//! - Ordering is chronological, not lexical.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Years whose four-digit text form parses back.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 0..=9999;

static DATE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2})\.(\d{2})\.(\d{4})$").expect("valid date key regex"));

/// Date key parse/construction error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateKeyError {
    /// Text does not have the `DD.MM.YYYY` shape.
    Malformed(String),
    /// Components do not form a calendar date within years `0..=9999`.
    OutOfRange { day: u32, month: u32, year: i32 },
}

impl Display for DateKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(value) => {
                write!(f, "date key `{value}` must have the form DD.MM.YYYY")
            }
            Self::OutOfRange { day, month, year } => {
                write!(f, "{day:02}.{month:02}.{year} is not a supported calendar date")
            }
        }
    }
}

impl Error for DateKeyError {}

/// Canonical identifier of one calendar day (`DD.MM.YYYY`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Builds a key from a day, a 1-based month and a year.
    pub fn new(day: u32, month: u32, year: i32) -> Result<Self, DateKeyError> {
        if !YEAR_RANGE.contains(&year) {
            return Err(DateKeyError::OutOfRange { day, month, year });
        }
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(DateKeyError::OutOfRange { day, month, year })
    }

    /// Builds a key from a 0-based month index, as used by calendar views
    /// that navigate months as `0..=11`.
    pub fn from_month_index(day: u32, month_index: u32, year: i32) -> Result<Self, DateKeyError> {
        Self::new(day, month_index.saturating_add(1), year)
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// 1-based month.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month bucket this day belongs to.
    pub fn month_key(&self) -> MonthKey {
        MonthKey {
            year: self.year(),
            month: self.month(),
        }
    }

    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }
}

impl TryFrom<NaiveDate> for DateKey {
    type Error = DateKeyError;

    fn try_from(value: NaiveDate) -> Result<Self, Self::Error> {
        Self::new(value.day(), value.month(), value.year())
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}.{:02}.{:04}", self.day(), self.month(), self.year())
    }
}

impl FromStr for DateKey {
    type Err = DateKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let caps = DATE_KEY_RE
            .captures(value)
            .ok_or_else(|| DateKeyError::Malformed(value.to_string()))?;
        // Regex guarantees ASCII digits of bounded width.
        let part = |idx: usize| caps[idx].parse::<u32>();
        let (Ok(day), Ok(month), Ok(year)) = (part(1), part(2), part(3)) else {
            return Err(DateKeyError::Malformed(value.to_string()));
        };
        Self::new(day, month, year as i32)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Month bucket (`MM.YYYY`) for activity statistics.
///
/// Field order makes the derived ordering chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    /// 1-based month.
    pub month: u32,
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}.{:04}", self.month, self.year)
    }
}
