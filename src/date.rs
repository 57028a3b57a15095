use std::convert::TryFrom;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{Date, Duration, Month};

use crate::errors::DateError;

const CANONICAL_LENGTH: usize = 10;
const SEPARATOR: u8 = b'-';

/// A calendar date with no time of day, written as `YYYY-MM-DD`.
///
/// Every instance is a real Gregorian date. The only ways to build one
/// are [`BirthDate::from_ymd`], parsing, and conversion from a
/// [`time::Date`], all of which reject impossible dates.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct BirthDate(Date);

/// The date that ages and upcoming windows are computed against.
pub type ReferenceDate = BirthDate;

impl BirthDate {
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Result<Self, DateError> {
        let month = Month::try_from(month).map_err(|_| DateError::InvalidDate { year, month, day })?;

        Date::from_calendar_date(year, month, day)
            .map(BirthDate)
            .map_err(|_| DateError::InvalidDate {
                year,
                month: u8::from(month),
                day,
            })
    }

    /// Parses the canonical `YYYY-MM-DD` form. Anything else, including
    /// surrounding whitespace, is a [`DateError::Format`].
    pub fn parse(text: &str) -> Result<Self, DateError> {
        let (year, month, day) = split_canonical(text).ok_or_else(|| DateError::Format {
            text: text.to_owned(),
        })?;

        Self::from_ymd(year, month, day)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u8 {
        u8::from(self.0.month())
    }

    pub fn day(&self) -> u8 {
        self.0.day()
    }

    /// The `(month, day)` pair, ordered the way birthdays compare within
    /// a year.
    pub fn month_day(&self) -> (u8, u8) {
        (self.month(), self.day())
    }

    pub fn is_leap_day(&self) -> bool {
        self.month_day() == (2, 29)
    }

    /// Returns the anniversary of this date in `year`.
    ///
    /// A Feb 29 date falls on Feb 28 in years that have no Feb 29.
    /// Returns `None` only when `year` is outside the supported range.
    pub fn occurrence_in(&self, year: i32) -> Option<BirthDate> {
        let day = if self.is_leap_day() && !time::util::is_leap_year(year) {
            28
        } else {
            self.day()
        };

        Date::from_calendar_date(year, self.0.month(), day)
            .ok()
            .map(BirthDate)
    }

    /// Whole days from `self` to `later`. Negative when `later` comes
    /// first.
    pub fn days_until(&self, later: BirthDate) -> i64 {
        (later.0 - self.0).whole_days()
    }

    pub fn checked_add_days(&self, days: i64) -> Option<BirthDate> {
        self.0.checked_add(Duration::days(days)).map(BirthDate)
    }
}

/// Splits `DDDD-DD-DD` into numbers without checking the calendar.
fn split_canonical(text: &str) -> Option<(i32, u8, u8)> {
    let bytes = text.as_bytes();

    if bytes.len() != CANONICAL_LENGTH || bytes[4] != SEPARATOR || bytes[7] != SEPARATOR {
        return None;
    }

    let number = |range: Range<usize>| -> Option<u16> {
        bytes[range].iter().try_fold(0u16, |acc, &b| {
            if b.is_ascii_digit() {
                Some(acc * 10 + u16::from(b - b'0'))
            } else {
                None
            }
        })
    };

    let year = number(0..4)?;
    let month = number(5..7)?;
    let day = number(8..10)?;

    // two digits always fit in a u8
    Some((i32::from(year), month as u8, day as u8))
}

impl From<Date> for BirthDate {
    fn from(date: Date) -> Self {
        BirthDate(date)
    }
}

impl FromStr for BirthDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BirthDate::parse(s)
    }
}

impl fmt::Display for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }
}

impl Serialize for BirthDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BirthDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: Deserializer<'de> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::BirthDate;
    use crate::errors::DateError;

    fn date(text: &str) -> BirthDate {
        text.parse().expect("parse test date")
    }

    #[test]
    fn parses_canonical_dates() {
        let parsed = date("1996-02-27");

        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (1996, 2, 27));
        assert_eq!(date("0000-01-01").year(), 0);
        assert_eq!(date("9999-12-31").month_day(), (12, 31));
    }

    #[test]
    fn rejects_other_shapes() {
        for text in &[
            "2021/02/30",
            "2021-2-03",
            "21-02-03",
            " 2021-02-03",
            "2021-02-03 ",
            "2021-02-03T00:00:00",
            "２０２１-02-03",
            "+021-02-03",
            "2021-0a-03",
            "",
        ] {
            match BirthDate::parse(text) {
                Err(DateError::Format { text: t }) => assert_eq!(t, *text),
                other => panic!("{:?} should be a format error, got {:?}", text, other),
            }
        }
    }

    #[test]
    fn rejects_impossible_dates() {
        for text in &[
            "2021-02-30",
            "2021-02-29",
            "1900-02-29",
            "2021-04-31",
            "2021-13-01",
            "2021-00-10",
            "2021-01-00",
            "2021-01-32",
        ] {
            assert!(
                matches!(BirthDate::parse(text), Err(DateError::InvalidDate { .. })),
                "{:?} should be an invalid date",
                text
            );
        }
    }

    #[test]
    fn accepts_leap_days_in_leap_years() {
        assert!(date("2000-02-29").is_leap_day());
        assert!(date("2024-02-29").is_leap_day());
        assert!(!date("2024-02-28").is_leap_day());
    }

    #[test]
    fn leap_day_falls_back_to_february_28() {
        let leap = date("2000-02-29");

        assert_eq!(leap.occurrence_in(2023), Some(date("2023-02-28")));
        assert_eq!(leap.occurrence_in(2024), Some(date("2024-02-29")));
        assert_eq!(leap.occurrence_in(2100), Some(date("2100-02-28")));
    }

    #[test]
    fn occurrence_outside_supported_years_is_none() {
        assert_eq!(date("2000-06-06").occurrence_in(10_000), None);
    }

    #[test]
    fn counts_days_across_boundaries() {
        assert_eq!(date("2023-12-31").days_until(date("2024-01-01")), 1);
        assert_eq!(date("2024-02-28").days_until(date("2024-03-01")), 2);
        assert_eq!(date("2023-02-28").days_until(date("2023-03-01")), 1);
        assert_eq!(date("2024-03-01").days_until(date("2024-02-28")), -2);
        assert_eq!(date("2024-01-01").days_until(date("2025-01-01")), 366);
    }

    #[test]
    fn serializes_as_canonical_text() {
        let json = serde_json::to_string(&date("2000-08-13")).expect("serialize date");
        assert_eq!(json, "\"2000-08-13\"");

        let back: BirthDate = serde_json::from_str(&json).expect("deserialize date");
        assert_eq!(back, date("2000-08-13"));

        assert!(serde_json::from_str::<BirthDate>("\"2021-02-30\"").is_err());
    }

    proptest! {
        #[test]
        fn canonical_text_round_trips(year in 0i32..=9999, month in 1u8..=12, day in 1u8..=31) {
            let text = format!("{:04}-{:02}-{:02}", year, month, day);

            if let Ok(parsed) = BirthDate::parse(&text) {
                prop_assert_eq!(parsed.to_string(), text);
            }
        }

        #[test]
        fn adding_days_agrees_with_counting_them(year in 1900i32..2100, month in 1u8..=12, day in 1u8..=28, offset in -800i64..800) {
            let start = BirthDate::from_ymd(year, month, day).expect("build start date");
            let end = start.checked_add_days(offset).expect("add days");

            prop_assert_eq!(start.days_until(end), offset);
        }
    }
}
