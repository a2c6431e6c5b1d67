use chrono::{NaiveTime, Timelike};

/// Parse a time of day in `HH:MM:SS` or `HH:MM` format
///
/// # Errors
///
/// Returns the error of the `HH:MM` attempt if the string matches neither format.
pub fn parse_clock_time(s: &str) -> Result<NaiveTime, chrono::ParseError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S").or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
}

/// Minute of the day (0..1440), ignoring seconds
///
/// Board classification compares times at this granularity.
#[must_use]
pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Fractional minutes since midnight, including seconds
#[must_use]
pub fn minutes_since_midnight(time: NaiveTime) -> f64 {
    f64::from(time.hour()) * 60.0 + f64::from(time.minute()) + f64::from(time.second()) / 60.0
}

/// Format as `HH:MM`
#[must_use]
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Format as `HH:MM:SS`
#[must_use]
pub fn format_hms(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).expect("valid time")
    }

    #[test]
    fn test_parse_clock_time_with_seconds() {
        let time = parse_clock_time("08:30:45").expect("should parse");
        assert_eq!(time, hms(8, 30, 45));
    }

    #[test]
    fn test_parse_clock_time_without_seconds() {
        let time = parse_clock_time("06:10").expect("should parse");
        assert_eq!(time, hms(6, 10, 0));
    }

    #[test]
    fn test_parse_clock_time_trims_whitespace() {
        let time = parse_clock_time(" 21:05 ").expect("should parse");
        assert_eq!(time, hms(21, 5, 0));
    }

    #[test]
    fn test_parse_clock_time_invalid_hour() {
        assert!(parse_clock_time("25:00").is_err());
    }

    #[test]
    fn test_parse_clock_time_invalid_minute() {
        assert!(parse_clock_time("12:60:00").is_err());
    }

    #[test]
    fn test_parse_clock_time_garbage() {
        assert!(parse_clock_time("").is_err());
        assert!(parse_clock_time("noon").is_err());
        assert!(parse_clock_time("0830").is_err());
    }

    #[test]
    fn test_minute_of_day_ignores_seconds() {
        assert_eq!(minute_of_day(hms(0, 0, 0)), 0);
        assert_eq!(minute_of_day(hms(6, 9, 59)), 369);
        assert_eq!(minute_of_day(hms(23, 59, 0)), 1439);
    }

    #[test]
    fn test_minutes_since_midnight_with_seconds() {
        assert_eq!(minutes_since_midnight(hms(6, 1, 30)), 361.5);
        assert_eq!(minutes_since_midnight(hms(12, 0, 0)), 720.0);
    }

    #[test]
    fn test_format_hhmm_drops_seconds() {
        assert_eq!(format_hhmm(hms(6, 3, 50)), "06:03");
        assert_eq!(format_hms(hms(6, 3, 50)), "06:03:50");
    }
}
