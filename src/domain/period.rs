use std::{convert::TryFrom, fmt};

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

/// Calendar month used to select and label a reporting period.
///
/// Always a valid month: construction and deserialization both go through
/// [`MonthSelector::new`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "RawMonth", into = "RawMonth")]
pub struct MonthSelector {
    first: NaiveDate,
}

/// Wire shape of a [`MonthSelector`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawMonth {
    year: i32,
    month: u32,
}

impl TryFrom<RawMonth> for MonthSelector {
    type Error = LedgerError;

    fn try_from(raw: RawMonth) -> Result<Self> {
        Self::new(raw.year, raw.month)
    }
}

impl From<MonthSelector> for RawMonth {
    fn from(month: MonthSelector) -> Self {
        Self {
            year: month.year(),
            month: month.month(),
        }
    }
}

impl MonthSelector {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::validation(format!(
                "month {} is outside 1..=12",
                month
            )));
        }
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            LedgerError::validation(format!("year {} is out of range", year))
        })?;
        Ok(Self { first })
    }

    pub fn containing(date: NaiveDate) -> Self {
        let first = date
            .checked_sub_days(Days::new(u64::from(date.day0())))
            .unwrap_or(date);
        Self { first }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// First calendar day of the month; the cutoff for the prior balance.
    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Matches on year and month only; the day is ignored.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Moves forward or backward by whole months, wrapping across years.
    /// Stays put if the target falls outside the supported calendar range.
    pub fn shift(&self, months: i32) -> Self {
        let index = i64::from(self.year()) * 12 + i64::from(self.month()) - 1 + i64::from(months);
        let target = i32::try_from(index.div_euclid(12))
            .ok()
            .and_then(|year| Self::new(year, index.rem_euclid(12) as u32 + 1).ok());
        target.unwrap_or(*self)
    }

    pub fn next(&self) -> Self {
        self.shift(1)
    }

    pub fn previous(&self) -> Self {
        self.shift(-1)
    }

    /// Human label such as `March 2024`.
    pub fn label(&self) -> String {
        self.first.format("%B %Y").to_string()
    }
}

impl fmt::Display for MonthSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}
