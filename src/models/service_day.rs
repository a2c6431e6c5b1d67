use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Timetable variant in force on a calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ServiceDay {
    #[default]
    Weekday,
    Friday,
    Saturday,
}

impl ServiceDay {
    pub const ALL: [ServiceDay; 3] = [ServiceDay::Weekday, ServiceDay::Friday, ServiceDay::Saturday];

    /// Pick the timetable for a date
    ///
    /// Friday always runs the Friday timetable. Saturdays and public holidays on
    /// any other day run the Saturday timetable.
    #[must_use]
    pub fn resolve(date: NaiveDate, is_holiday: bool) -> Self {
        match date.weekday() {
            Weekday::Fri => ServiceDay::Friday,
            Weekday::Sat => ServiceDay::Saturday,
            _ if is_holiday => ServiceDay::Saturday,
            _ => ServiceDay::Weekday,
        }
    }

    /// Timetable resource for this service day
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            ServiceDay::Weekday => "mrt-6.json",
            ServiceDay::Friday => "mrt-6-fri.json",
            ServiceDay::Saturday => "mrt-6-sat.json",
        }
    }

    #[must_use]
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|day| day.file_name() == file_name)
    }

    /// Get a human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ServiceDay::Weekday => "Weekdays (Sun-Thu)",
            ServiceDay::Friday => "Friday",
            ServiceDay::Saturday => "Saturday",
        }
    }

    /// Key of the section describing this day in the generator config
    #[must_use]
    pub const fn config_key(self) -> &'static str {
        match self {
            ServiceDay::Weekday => "weekdays",
            ServiceDay::Friday => "friday",
            ServiceDay::Saturday => "saturday",
        }
    }
}

/// Get day name for a weekday
#[must_use]
pub const fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_resolve_regular_days() {
        // 2025-06-01 is a Sunday
        assert_eq!(ServiceDay::resolve(date(2025, 6, 1), false), ServiceDay::Weekday);
        assert_eq!(ServiceDay::resolve(date(2025, 6, 5), false), ServiceDay::Weekday);
        assert_eq!(ServiceDay::resolve(date(2025, 6, 6), false), ServiceDay::Friday);
        assert_eq!(ServiceDay::resolve(date(2025, 6, 7), false), ServiceDay::Saturday);
    }

    #[test]
    fn test_resolve_holiday_uses_saturday_schedule() {
        // 2025-04-01 is a Tuesday
        assert_eq!(ServiceDay::resolve(date(2025, 4, 1), true), ServiceDay::Saturday);
    }

    #[test]
    fn test_resolve_friday_holiday_keeps_friday_schedule() {
        // 2025-03-28 is a Friday
        assert_eq!(ServiceDay::resolve(date(2025, 3, 28), true), ServiceDay::Friday);
        assert_eq!(ServiceDay::resolve(date(2025, 3, 28), false), ServiceDay::Friday);
    }

    #[test]
    fn test_resolve_saturday_holiday() {
        assert_eq!(ServiceDay::resolve(date(2025, 6, 7), true), ServiceDay::Saturday);
    }

    #[test]
    fn test_file_names_round_trip() {
        for day in ServiceDay::ALL {
            assert_eq!(ServiceDay::from_file_name(day.file_name()), Some(day));
        }
        assert_eq!(ServiceDay::from_file_name("mrt-5.json"), None);
    }

    #[test]
    fn test_day_names() {
        assert_eq!(day_name(Weekday::Fri), "Friday");
        assert_eq!(day_name(Weekday::Sun), "Sunday");
    }
}
