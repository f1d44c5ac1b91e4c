//! Calendar month cursor and the month keys that partition the ledger.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{LedgerError, LedgerResult};

pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Direction for single-step month navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthDirection {
    Prev,
    Next,
}

/// A calendar month with a 1-indexed `month`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> LedgerResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::validation(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(LedgerError::validation(format!(
                "year must be between {MIN_YEAR} and {MAX_YEAR}, got {year}"
            )));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn key(&self) -> MonthKey {
        MonthKey(*self)
    }

    /// Shifts by one month, rolling the year over at the boundaries.
    pub fn step(&self, direction: MonthDirection) -> Self {
        match direction {
            MonthDirection::Prev if self.month == 1 => Self {
                year: self.year - 1,
                month: 12,
            },
            MonthDirection::Prev => Self {
                year: self.year,
                month: self.month - 1,
            },
            MonthDirection::Next if self.month == 12 => Self {
                year: self.year + 1,
                month: 1,
            },
            MonthDirection::Next => Self {
                year: self.year,
                month: self.month + 1,
            },
        }
    }

    pub fn previous(&self) -> Self {
        self.step(MonthDirection::Prev)
    }

    pub fn next(&self) -> Self {
        self.step(MonthDirection::Next)
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Partition key of the ledger, rendered as `YYYY-MM`.
///
/// The month is always zero-padded so keys sort chronologically as strings. Parsing
/// also accepts the legacy unpadded form (`2024-3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(YearMonth);

impl MonthKey {
    pub fn year_month(&self) -> YearMonth {
        self.0
    }

    pub fn previous(&self) -> MonthKey {
        MonthKey(self.0.previous())
    }

    /// Returns `true` when `raw` parses but is not in canonical padded form.
    pub fn is_legacy(raw: &str) -> bool {
        raw.parse::<MonthKey>()
            .map(|key| key.to_string() != raw)
            .unwrap_or(false)
    }
}

impl From<YearMonth> for MonthKey {
    fn from(value: YearMonth) -> Self {
        MonthKey(value)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for MonthKey {
    type Err = LedgerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::validation(format!("invalid month key `{raw}`"));
        let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month).map(MonthKey)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
