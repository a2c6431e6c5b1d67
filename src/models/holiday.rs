use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use crate::constants::{HARDCODED_HOLIDAY, HARDCODED_HOLIDAY_NAME};

/// A declared public holiday
///
/// Matches the entries returned by the public holiday API and the bundled
/// fallback files. Fields other than `date` are informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
}

impl Holiday {
    #[must_use]
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
            kind: "Public".to_string(),
        }
    }
}

/// Parse a holiday list
///
/// # Errors
///
/// Returns an error if the JSON is not a list of holidays with ISO dates
pub fn parse_holidays(json: &str) -> Result<Vec<Holiday>, String> {
    serde_json::from_str(json).map_err(|e| format!("Failed to parse holidays: {e}"))
}

/// Holiday lists per calendar year, as far as they have been loaded
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    years: HashMap<i32, Vec<Holiday>>,
}

impl HolidayCalendar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has_year(&self, year: i32) -> bool {
        self.years.contains_key(&year)
    }

    pub fn insert_year(&mut self, year: i32, holidays: Vec<Holiday>) {
        self.years.insert(year, holidays);
    }

    #[must_use]
    pub fn holidays(&self, year: i32) -> &[Holiday] {
        self.years.get(&year).map_or(&[], Vec::as_slice)
    }

    /// Whether `date` changes the timetable
    ///
    /// True for listed dates and the hardcoded exception, except on Fridays,
    /// which keep their own timetable. Years that were never loaded only match
    /// the hardcoded exception.
    #[must_use]
    pub fn is_public_holiday(&self, date: NaiveDate) -> bool {
        is_public_holiday(date, self.holidays(date.year()))
    }

    /// Name of the holiday on `date`, if any
    #[must_use]
    pub fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        if let Some(holiday) = self.holidays(date.year()).iter().find(|h| h.date == date) {
            return Some(holiday.name.as_str());
        }
        (date == HARDCODED_HOLIDAY).then_some(HARDCODED_HOLIDAY_NAME)
    }
}

/// Whether `date` is a timetable-changing public holiday given that year's list
#[must_use]
pub fn is_public_holiday(date: NaiveDate, holidays: &[Holiday]) -> bool {
    if date.weekday() == Weekday::Fri {
        return false;
    }
    date == HARDCODED_HOLIDAY || holidays.iter().any(|holiday| holiday.date == date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_parse_api_response() {
        let json = r#"[
            {"date": "2025-02-21", "localName": "Shaheed Dibosh", "name": "Language Martyrs' Day",
             "countryCode": "BD", "types": ["Public"]},
            {"date": "2025-03-26", "name": "Independence Day", "type": "Public"}
        ]"#;
        let holidays = parse_holidays(json).expect("should parse");
        assert_eq!(holidays.len(), 2);
        assert_eq!(holidays[0].date, date(2025, 2, 21));
        assert_eq!(holidays[0].kind, "");
        assert_eq!(holidays[1].kind, "Public");
    }

    #[test]
    fn test_parse_rejects_bad_dates() {
        assert!(parse_holidays(r#"[{"date": "21/02/2025"}]"#).is_err());
    }

    #[test]
    fn test_listed_weekday_is_holiday() {
        // 2025-03-26 is a Wednesday
        let holidays = vec![Holiday::new(date(2025, 3, 26), "Independence Day")];
        assert!(is_public_holiday(date(2025, 3, 26), &holidays));
        assert!(!is_public_holiday(date(2025, 3, 27), &holidays));
    }

    #[test]
    fn test_friday_is_never_a_holiday() {
        // 2025-03-28 is a Friday
        let holidays = vec![Holiday::new(date(2025, 3, 28), "Jumatul Bidah")];
        assert!(!is_public_holiday(date(2025, 3, 28), &holidays));
    }

    #[test]
    fn test_hardcoded_holiday_without_list() {
        assert!(is_public_holiday(HARDCODED_HOLIDAY, &[]));
        let calendar = HolidayCalendar::new();
        assert!(calendar.is_public_holiday(HARDCODED_HOLIDAY));
        assert_eq!(calendar.holiday_name(HARDCODED_HOLIDAY), Some(HARDCODED_HOLIDAY_NAME));
    }

    #[test]
    fn test_calendar_per_year() {
        let mut calendar = HolidayCalendar::new();
        assert!(!calendar.has_year(2025));
        calendar.insert_year(2025, vec![Holiday::new(date(2025, 12, 16), "Victory Day")]);

        assert!(calendar.has_year(2025));
        assert!(calendar.is_public_holiday(date(2025, 12, 16)));
        assert!(!calendar.is_public_holiday(date(2026, 12, 16)));
        assert_eq!(calendar.holiday_name(date(2025, 12, 16)), Some("Victory Day"));
        assert_eq!(calendar.holiday_name(date(2025, 12, 17)), None);
    }
}
