use chrono::NaiveTime;
use super::{Direction, ServiceDay, Station};
use crate::time::{format_hhmm, parse_clock_time};

/// Everything needed to rebuild one train's journey on the detail page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JourneyLink {
    pub station: Station,
    pub time: NaiveTime,
    pub direction: Direction,
    pub service_day: ServiceDay,
}

impl JourneyLink {
    /// Encode as `station=..&time=..&direction=..&file=..`
    #[must_use]
    pub fn to_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("station", self.station.name())
            .append_pair("time", &format_hhmm(self.time))
            .append_pair("direction", self.direction.name())
            .append_pair("file", self.service_day.file_name())
            .finish()
    }

    /// Decode a query string, with or without the leading `?`
    ///
    /// A missing `file` means the weekday timetable.
    ///
    /// # Errors
    ///
    /// Returns an error if station, time or direction is missing or unknown,
    /// or if `file` names a timetable that does not exist.
    pub fn from_query(query: &str) -> Result<Self, String> {
        let query = query.strip_prefix('?').unwrap_or(query);

        let mut station = None;
        let mut time = None;
        let mut direction = None;
        let mut file = None;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "station" => station = Some(value.into_owned()),
                "time" => time = Some(value.into_owned()),
                "direction" => direction = Some(value.into_owned()),
                "file" => file = Some(value.into_owned()),
                _ => {}
            }
        }

        let (Some(station), Some(time), Some(direction)) = (station, time, direction) else {
            return Err("Missing journey details".to_string());
        };

        let station: Station = station.parse()?;
        let time = parse_clock_time(&time).map_err(|e| format!("Invalid time {time}: {e}"))?;
        let direction =
            Direction::from_name(&direction).ok_or_else(|| format!("Unknown direction: {direction}"))?;
        let service_day = match file {
            Some(file) => ServiceDay::from_file_name(&file).ok_or_else(|| format!("Unknown timetable: {file}"))?,
            None => ServiceDay::Weekday,
        };

        Ok(Self {
            station,
            time,
            direction,
            service_day,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link() -> JourneyLink {
        JourneyLink {
            station: Station::UttaraNorth,
            time: NaiveTime::from_hms_opt(6, 0, 0).expect("valid time"),
            direction: Direction::Motijheel,
            service_day: ServiceDay::Friday,
        }
    }

    #[test]
    fn test_to_query() {
        assert_eq!(
            link().to_query(),
            "station=Uttara+North&time=06%3A00&direction=Motijheel&file=mrt-6-fri.json"
        );
    }

    #[test]
    fn test_from_query_accepts_browser_encoding() {
        let parsed = JourneyLink::from_query(
            "?station=Uttara%20North&time=06:00&direction=Motijheel&file=mrt-6-fri.json",
        )
        .expect("should parse");
        assert_eq!(parsed, link());
    }

    #[test]
    fn test_from_query_round_trip() {
        let original = JourneyLink {
            station: Station::DhakaUniversity,
            time: NaiveTime::from_hms_opt(18, 45, 0).expect("valid time"),
            direction: Direction::UttaraNorth,
            service_day: ServiceDay::Saturday,
        };
        assert_eq!(JourneyLink::from_query(&original.to_query()), Ok(original));
    }

    #[test]
    fn test_from_query_defaults_to_weekday_file() {
        let parsed = JourneyLink::from_query("station=Pallabi&time=08:00&direction=Uttara+North")
            .expect("should parse");
        assert_eq!(parsed.service_day, ServiceDay::Weekday);
        assert_eq!(parsed.direction, Direction::UttaraNorth);
    }

    #[test]
    fn test_from_query_errors() {
        assert_eq!(
            JourneyLink::from_query("station=Pallabi&time=08:00"),
            Err("Missing journey details".to_string())
        );
        assert!(JourneyLink::from_query("station=Gulshan&time=08:00&direction=Motijheel").is_err());
        assert!(JourneyLink::from_query("station=Pallabi&time=8am&direction=Motijheel").is_err());
        assert!(JourneyLink::from_query("station=Pallabi&time=08:00&direction=North").is_err());
        assert!(
            JourneyLink::from_query("station=Pallabi&time=08:00&direction=Motijheel&file=other.json").is_err()
        );
    }
}
