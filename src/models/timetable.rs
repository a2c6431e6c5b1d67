use chrono::NaiveTime;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use super::{Direction, Station};
use crate::time::{format_hms, parse_clock_time};

/// Scheduled times at one station, per direction, ascending
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationSchedule {
    pub motijheel: Vec<NaiveTime>,
    pub uttara_north: Vec<NaiveTime>,
}

impl StationSchedule {
    #[must_use]
    pub fn times(&self, direction: Direction) -> &[NaiveTime] {
        match direction {
            Direction::Motijheel => &self.motijheel,
            Direction::UttaraNorth => &self.uttara_north,
        }
    }

    pub fn times_mut(&mut self, direction: Direction) -> &mut Vec<NaiveTime> {
        match direction {
            Direction::Motijheel => &mut self.motijheel,
            Direction::UttaraNorth => &mut self.uttara_north,
        }
    }
}

/// One service day's timetable for the whole line
///
/// For a given direction the i-th time at every station belongs to the same
/// physical train; there is no explicit train id. Stations served by fewer
/// trains (short turns) simply have shorter lists, so every indexed access
/// goes through bounds-checked lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timetable {
    stations: BTreeMap<Station, StationSchedule>,
}

impl Timetable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a timetable resource
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, names an unknown station or
    /// direction, contains a time that is not `HH:MM` or `HH:MM:SS`, or lists a
    /// direction's times out of order.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let raw: HashMap<String, HashMap<String, Vec<String>>> =
            serde_json::from_str(json).map_err(|e| format!("Failed to parse timetable: {e}"))?;

        let mut timetable = Self::new();
        for (station_name, directions) in raw {
            let station: Station = station_name.parse()?;
            let mut schedule = StationSchedule::default();

            for (direction_name, times) in directions {
                let direction = Direction::from_name(&direction_name)
                    .ok_or_else(|| format!("Unknown direction at {station_name}: {direction_name}"))?;
                *schedule.times_mut(direction) = parse_time_list(&times)
                    .map_err(|e| format!("{station_name} towards {direction_name}: {e}"))?;
            }

            timetable.stations.insert(station, schedule);
        }

        Ok(timetable)
    }

    /// Serialize in line order with `HH:MM:SS` times
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_json_pretty(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("Failed to serialize timetable: {e}"))
    }

    pub fn insert(&mut self, station: Station, schedule: StationSchedule) {
        self.stations.insert(station, schedule);
    }

    #[must_use]
    pub fn schedule(&self, station: Station) -> Option<&StationSchedule> {
        self.stations.get(&station)
    }

    /// Times at a station for one direction, `None` if the station is absent
    #[must_use]
    pub fn times(&self, station: Station, direction: Direction) -> Option<&[NaiveTime]> {
        self.stations.get(&station).map(|schedule| schedule.times(direction))
    }

    /// The `index`-th train's time at a station, if that station serves it
    #[must_use]
    pub fn time_at(&self, station: Station, direction: Direction, index: usize) -> Option<NaiveTime> {
        self.times(station, direction)?.get(index).copied()
    }

    /// Stations present in the timetable, in line order
    pub fn stations(&self) -> impl Iterator<Item = Station> + '_ {
        self.stations.keys().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Number of trains starting from the direction's origin station
    #[must_use]
    pub fn train_count(&self, direction: Direction) -> usize {
        self.times(direction.origin(), direction).map_or(0, <[NaiveTime]>::len)
    }
}

fn parse_time_list(times: &[String]) -> Result<Vec<NaiveTime>, String> {
    let mut parsed: Vec<NaiveTime> = Vec::with_capacity(times.len());
    for raw in times {
        let time = parse_clock_time(raw).map_err(|e| format!("invalid time {raw:?}: {e}"))?;
        if let Some(previous) = parsed.last() {
            if time < *previous {
                return Err(format!("time {raw} is earlier than the one before it"));
            }
        }
        parsed.push(time);
    }
    Ok(parsed)
}

impl Serialize for Timetable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.stations.len()))?;
        for (station, schedule) in &self.stations {
            map.serialize_entry(station, &ScheduleJson(schedule))?;
        }
        map.end()
    }
}

struct ScheduleJson<'a>(&'a StationSchedule);

impl Serialize for ScheduleJson<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(Direction::ALL.len()))?;
        for direction in Direction::ALL {
            let times: Vec<String> = self.0.times(direction).iter().map(|t| format_hms(*t)).collect();
            map.serialize_entry(direction.name(), &times)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
    }

    #[test]
    fn test_from_json_basic() {
        let json = r#"{
            "Uttara North": {"Motijheel": ["06:00", "06:10"], "Uttara North": []},
            "Uttara Center": {"Motijheel": ["06:03:20"], "Uttara North": ["07:00"]}
        }"#;
        let timetable = Timetable::from_json(json).expect("should parse");

        assert_eq!(
            timetable.times(Station::UttaraNorth, Direction::Motijheel),
            Some(&[hm(6, 0), hm(6, 10)][..])
        );
        assert_eq!(
            timetable.time_at(Station::UttaraCenter, Direction::Motijheel, 0),
            NaiveTime::from_hms_opt(6, 3, 20)
        );
        assert_eq!(timetable.time_at(Station::UttaraCenter, Direction::Motijheel, 1), None);
        assert_eq!(timetable.times(Station::Motijheel, Direction::Motijheel), None);
        assert_eq!(timetable.train_count(Direction::Motijheel), 2);
        assert_eq!(timetable.train_count(Direction::UttaraNorth), 0);
    }

    #[test]
    fn test_stations_in_line_order() {
        let json = r#"{
            "Motijheel": {"Motijheel": [], "Uttara North": []},
            "Uttara North": {"Motijheel": [], "Uttara North": []},
            "Farmgate": {"Motijheel": [], "Uttara North": []}
        }"#;
        let timetable = Timetable::from_json(json).expect("should parse");
        let stations: Vec<Station> = timetable.stations().collect();
        assert_eq!(stations, vec![Station::UttaraNorth, Station::Farmgate, Station::Motijheel]);
    }

    #[test]
    fn test_missing_direction_is_empty() {
        let json = r#"{"Pallabi": {"Motijheel": ["08:00"]}}"#;
        let timetable = Timetable::from_json(json).expect("should parse");
        assert_eq!(timetable.times(Station::Pallabi, Direction::UttaraNorth), Some(&[][..]));
    }

    #[test]
    fn test_rejects_unknown_station() {
        let err = Timetable::from_json(r#"{"Kamalapur": {"Motijheel": []}}"#).expect_err("should fail");
        assert!(err.contains("Unknown station"));
    }

    #[test]
    fn test_rejects_unknown_direction() {
        let err = Timetable::from_json(r#"{"Pallabi": {"Gazipur": []}}"#).expect_err("should fail");
        assert!(err.contains("Unknown direction"));
    }

    #[test]
    fn test_rejects_bad_time() {
        let err = Timetable::from_json(r#"{"Pallabi": {"Motijheel": ["6 am"]}}"#).expect_err("should fail");
        assert!(err.contains("invalid time"));
    }

    #[test]
    fn test_rejects_descending_times() {
        let err = Timetable::from_json(r#"{"Pallabi": {"Motijheel": ["08:10", "08:00"]}}"#)
            .expect_err("should fail");
        assert!(err.contains("earlier"));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(Timetable::from_json("{\"Pallabi\": [").is_err());
        assert!(Timetable::from_json("[]").is_err());
    }

    #[test]
    fn test_to_json_pretty_uses_line_order_and_seconds() {
        let mut timetable = Timetable::new();
        timetable.insert(
            Station::Motijheel,
            StationSchedule { motijheel: vec![hm(7, 0)], uttara_north: vec![] },
        );
        timetable.insert(
            Station::UttaraNorth,
            StationSchedule { motijheel: vec![hm(6, 30)], uttara_north: vec![hm(7, 40)] },
        );

        let json = timetable.to_json_pretty().expect("serialization should succeed");
        let north = json.find("\"Uttara North\": {").expect("north present");
        let south = json.find("\"Motijheel\": {").expect("south present");
        assert!(north < south);
        assert!(json.contains("\"06:30:00\""));

        let reparsed = Timetable::from_json(&json).expect("should reparse");
        assert_eq!(reparsed, timetable);
    }
}
