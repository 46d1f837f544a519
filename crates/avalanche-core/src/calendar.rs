use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::AvalancheError;
use crate::AvalancheResult;

/// A calendar month, the unit of simulated time.
///
/// Month 1 of a run is the month containing the invocation date; every
/// later label is derived by integer offset from it, never by re-parsing
/// formatted dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthStamp {
    year: i32,
    month: u32,
}

impl MonthStamp {
    pub fn new(year: i32, month: u32) -> AvalancheResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(AvalancheError::DateError(format!(
                "month must be within 1..=12, got {month}"
            )));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The current local calendar month.
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Shift by a signed number of months.
    pub fn offset(&self, months: i64) -> Self {
        let zero_based = self.ordinal() + months;
        Self {
            year: zero_based.div_euclid(12) as i32,
            month: (zero_based.rem_euclid(12) + 1) as u32,
        }
    }

    /// The 1-based simulation month index of `target` for a run starting
    /// at `self`: `(y - y0) * 12 + (m - m0) + 1`.
    pub fn index_of(&self, target: MonthStamp) -> i64 {
        target.ordinal() - self.ordinal() + 1
    }

    /// The calendar month of 1-based simulation month `index`.
    pub fn month_at(&self, index: i64) -> Self {
        self.offset(index - 1)
    }

    fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }
}

impl fmt::Display for MonthStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthStamp {
    type Err = AvalancheError;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (y, m) = trimmed
            .split_once('-')
            .ok_or_else(|| AvalancheError::DateError(format!("expected YYYY-MM, got '{s}'")))?;
        if y.len() != 4 || m.len() != 2 {
            return Err(AvalancheError::DateError(format!(
                "expected YYYY-MM, got '{s}'"
            )));
        }
        let year: i32 = y
            .parse()
            .map_err(|_| AvalancheError::DateError(format!("invalid year in '{s}'")))?;
        let month: u32 = m
            .parse()
            .map_err(|_| AvalancheError::DateError(format!("invalid month in '{s}'")))?;
        MonthStamp::new(year, month)
    }
}

impl TryFrom<String> for MonthStamp {
    type Error = AvalancheError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthStamp> for String {
    fn from(value: MonthStamp) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(y: i32, m: u32) -> MonthStamp {
        MonthStamp::new(y, m).unwrap()
    }

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(ym(2026, 3).to_string(), "2026-03");
        assert_eq!(ym(987, 11).to_string(), "0987-11");
    }

    #[test]
    fn test_offset_crosses_year_boundaries() {
        assert_eq!(ym(2026, 11).offset(1), ym(2026, 12));
        assert_eq!(ym(2026, 11).offset(2), ym(2027, 1));
        assert_eq!(ym(2026, 1).offset(-1), ym(2025, 12));
        assert_eq!(ym(2026, 10).offset(600), ym(2076, 10));
    }

    #[test]
    fn test_index_of_start_is_one() {
        let start = ym(2026, 10);
        assert_eq!(start.index_of(start), 1);
        assert_eq!(start.index_of(ym(2026, 12)), 3);
        assert_eq!(start.index_of(ym(2027, 1)), 4);
        assert_eq!(start.index_of(ym(2026, 9)), 0);
    }

    #[test]
    fn test_month_at_inverts_index_of() {
        let start = ym(2025, 7);
        for idx in 1..40 {
            assert_eq!(start.index_of(start.month_at(idx)), idx);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("2027-02".parse::<MonthStamp>().unwrap(), ym(2027, 2));
        assert!("2027-13".parse::<MonthStamp>().is_err());
        assert!("2027/02".parse::<MonthStamp>().is_err());
        assert!("27-02".parse::<MonthStamp>().is_err());
    }

    #[test]
    fn test_from_date() {
        let d = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(MonthStamp::from_date(d), ym(2026, 10));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&ym(2026, 4)).unwrap();
        assert_eq!(json, "\"2026-04\"");
        let back: MonthStamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ym(2026, 4));
    }
}
