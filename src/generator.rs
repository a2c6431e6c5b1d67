//! Timetable generation from headway slots
//!
//! Departures from each origin are produced from `START | END | HEADWAY`
//! slots; every other station's time is the origin departure plus the
//! cumulative run time and the dwell at each intermediate station.

use chrono::{NaiveTime, Timelike};
use std::collections::BTreeMap;
use crate::log_warn;
use crate::models::{Direction, ServiceDay, Station, StationSchedule, Timetable};
use crate::time::format_hms;

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// Rush headways alternate between these two values, in seconds
pub const RUSH_HEADWAYS: [u32; 2] = [360, 330];
pub const OFFPEAK_HEADWAY: u32 = 480;

/// Run times in seconds from the previous station, Motijheel-bound
const RUN_TIMES_TO_MOTIJHEEL: [(Station, u32); 16] = [
    (Station::UttaraNorth, 0),
    (Station::UttaraCenter, 100),
    (Station::UttaraSouth, 110),
    (Station::Pallabi, 170),
    (Station::Mirpur11, 70),
    (Station::Mirpur10, 90),
    (Station::Kazipara, 80),
    (Station::Sewrapara, 80),
    (Station::Agargoan, 100),
    (Station::BijoySarani, 110),
    (Station::Farmgate, 110),
    (Station::KarwanBazar, 110),
    (Station::Shahbag, 120),
    (Station::DhakaUniversity, 120),
    (Station::BangladeshSecretariat, 180),
    (Station::Motijheel, 180),
];

/// Run times in seconds from the previous station, Uttara-bound
const RUN_TIMES_TO_UTTARA: [(Station, u32); 16] = [
    (Station::Motijheel, 0),
    (Station::BangladeshSecretariat, 180),
    (Station::DhakaUniversity, 180),
    (Station::Shahbag, 120),
    (Station::KarwanBazar, 120),
    (Station::Farmgate, 110),
    (Station::BijoySarani, 110),
    (Station::Agargoan, 110),
    (Station::Sewrapara, 100),
    (Station::Kazipara, 80),
    (Station::Mirpur10, 80),
    (Station::Mirpur11, 90),
    (Station::Pallabi, 70),
    (Station::UttaraSouth, 170),
    (Station::UttaraCenter, 110),
    (Station::UttaraNorth, 100),
];

/// Dwell time category at a station
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dwell {
    Low,
    Medium,
    High,
}

impl Dwell {
    #[must_use]
    pub const fn seconds(self) -> u32 {
        match self {
            Dwell::Low => 30,
            Dwell::Medium => 45,
            Dwell::High => 60,
        }
    }
}

/// Service period a departure belongs to, selecting the dwell overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Period {
    Rush,
    Offpeak,
    Custom,
}

impl Period {
    /// Dwell at `station` during this period
    #[must_use]
    pub fn dwell(self, station: Station) -> Dwell {
        use Station::{Agargoan, Kazipara, Mirpur10, Mirpur11, Sewrapara, UttaraCenter, UttaraSouth};
        match (self, station) {
            (Period::Rush, Kazipara | Sewrapara | Agargoan) => Dwell::High,
            (Period::Offpeak, UttaraCenter | UttaraSouth | Mirpur11 | Kazipara | Sewrapara) => Dwell::Low,
            (Period::Offpeak, Mirpur10) => Dwell::Medium,
            (Period::Custom, UttaraCenter | UttaraSouth | Mirpur11 | Mirpur10 | Kazipara | Sewrapara) => Dwell::Low,
            _ => Dwell::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Headway {
    /// Alternates through `RUSH_HEADWAYS`
    Rush,
    Fixed(u32),
}

impl Headway {
    /// Parse `rush`, `offpeak`, `MM:SS` or plain minutes
    ///
    /// # Errors
    ///
    /// Returns an error for anything else, or a zero headway
    pub fn parse(input: &str) -> Result<(Self, Period), String> {
        let input = input.trim().to_lowercase();
        let (headway, period) = match input.as_str() {
            "rush" => (Headway::Rush, Period::Rush),
            "offpeak" => (Headway::Fixed(OFFPEAK_HEADWAY), Period::Offpeak),
            other => {
                let seconds = match other.split_once(':') {
                    Some((minutes, seconds)) => parse_number(minutes)? * 60 + parse_number(seconds)?,
                    None => parse_number(other)? * 60,
                };
                (Headway::Fixed(seconds), Period::Custom)
            }
        };
        if headway == Headway::Fixed(0) {
            return Err(format!("Headway must be positive: {input}"));
        }
        Ok((headway, period))
    }
}

fn parse_number(input: &str) -> Result<u32, String> {
    input
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: {input}"))
}

/// Parse a slot boundary: `HH:MM:SS`, `HH:MM`, `HHMM`, `HMM` or 12-hour `HH:MM AM`
///
/// # Errors
///
/// Returns an error if none of the formats match
pub fn parse_slot_time(input: &str) -> Result<NaiveTime, String> {
    let input = input.trim();
    let (clock, meridiem) = match input.split_once(char::is_whitespace) {
        Some((clock, rest)) => (clock, Some(rest.trim())),
        None => (input, None),
    };

    let clock = if clock.contains(':') {
        clock.to_string()
    } else if clock.len() == 3 || clock.len() == 4 {
        let (hours, minutes) = clock.split_at(clock.len() - 2);
        format!("{hours}:{minutes}")
    } else {
        clock.to_string()
    };

    let parsed = match meridiem {
        Some(meridiem) => NaiveTime::parse_from_str(&format!("{clock} {meridiem}"), "%I:%M %p"),
        None => NaiveTime::parse_from_str(&clock, "%H:%M:%S").or_else(|_| NaiveTime::parse_from_str(&clock, "%H:%M")),
    };
    parsed.map_err(|_| format!("Invalid time format: {input}. Use HH:MM, HH:MM:SS, HHMM, or HH:MM AM/PM"))
}

/// One `START | END | HEADWAY` line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub headway: Headway,
    pub period: Period,
}

impl Slot {
    /// Parse a config line, `None` if it is not a slot line
    ///
    /// # Errors
    ///
    /// Returns an error if the line has three fields but one is invalid
    pub fn parse_line(line: &str) -> Result<Option<Self>, String> {
        let parts: Vec<&str> = line.split('|').map(str::trim).collect();
        let [start, end, headway] = parts.as_slice() else {
            return Ok(None);
        };
        let (headway, period) = Headway::parse(headway)?;
        Ok(Some(Self {
            start: parse_slot_time(start)?,
            end: parse_slot_time(end)?,
            headway,
            period,
        }))
    }

    /// Departures from `start` up to but excluding `end`
    ///
    /// Equal boundaries give exactly one departure. An end at or before the
    /// start is taken to be on the next day.
    #[must_use]
    pub fn departures(&self) -> Vec<NaiveTime> {
        let start = self.start.num_seconds_from_midnight();
        let mut end = self.end.num_seconds_from_midnight();
        if start == end {
            return vec![self.start];
        }
        if end < start {
            end += SECONDS_PER_DAY;
        }

        let mut departures = Vec::new();
        let mut current = start;
        let mut rush_toggle = 0;
        while current < end {
            departures.push(time_from_seconds(current));
            current += match self.headway {
                Headway::Rush => {
                    let interval = RUSH_HEADWAYS[rush_toggle];
                    rush_toggle = 1 - rush_toggle;
                    interval
                }
                Headway::Fixed(seconds) => seconds,
            };
        }
        departures
    }
}

fn time_from_seconds(seconds: u32) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt(seconds % SECONDS_PER_DAY, 0).unwrap_or(NaiveTime::MIN)
}

/// Slots for both origins of one service day
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySlots {
    pub motijheel: Vec<Slot>,
    pub uttara: Vec<Slot>,
}

/// Read every service day section of a markdown config
///
/// Sections are `## weekdays`, `## friday` and `## saturday` headers, each
/// with a `MOTIJHEEL_SLOTS:` block followed by an `UTTARA_SLOTS:` block.
/// Missing sections and invalid slot lines are skipped with a warning.
#[must_use]
pub fn parse_config(content: &str) -> BTreeMap<ServiceDay, DaySlots> {
    let mut schedules = BTreeMap::new();
    for day in ServiceDay::ALL {
        let Some(section) = find_section(content, day.config_key()) else {
            log_warn!("{} schedule section not found in config file", day.config_key());
            continue;
        };

        let upper = section.to_ascii_uppercase();
        let (Some(motijheel_at), Some(uttara_at)) = (upper.find("MOTIJHEEL_SLOTS:"), upper.find("UTTARA_SLOTS:")) else {
            log_warn!("{} schedule is missing a slots block", day.config_key());
            continue;
        };
        if uttara_at < motijheel_at {
            log_warn!("{} schedule lists UTTARA_SLOTS before MOTIJHEEL_SLOTS", day.config_key());
            continue;
        }

        let motijheel_block = &section[motijheel_at + "MOTIJHEEL_SLOTS:".len()..uttara_at];
        let uttara_block = &section[uttara_at + "UTTARA_SLOTS:".len()..];
        schedules.insert(
            day,
            DaySlots {
                motijheel: parse_slots(motijheel_block),
                uttara: parse_slots(uttara_block),
            },
        );
    }
    schedules
}

fn find_section<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    let mut start = None;
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if let Some(title) = section_title(line) {
            if let Some(begin) = start {
                return Some(&content[begin..offset]);
            }
            if title.to_lowercase().starts_with(key) {
                start = Some(offset + line.len());
            }
        }
        offset += line.len();
    }
    start.map(|begin| &content[begin..])
}

fn section_title(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("##")?;
    rest.starts_with(char::is_whitespace).then(|| rest.trim())
}

fn parse_slots(block: &str) -> Vec<Slot> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with("```"))
        .filter_map(|line| match Slot::parse_line(line) {
            Ok(slot) => slot,
            Err(e) => {
                log_warn!("Skipping invalid line: {line} ({e})");
                None
            }
        })
        .collect()
}

/// Seconds after the origin departure at which a train reaches each station
///
/// Dwell is added at intermediate stations only.
#[must_use]
pub fn station_offsets(direction: Direction, period: Period) -> Vec<(Station, u32)> {
    let run_times: &[(Station, u32)] = match direction {
        Direction::Motijheel => &RUN_TIMES_TO_MOTIJHEEL,
        Direction::UttaraNorth => &RUN_TIMES_TO_UTTARA,
    };
    let last = run_times.len() - 1;

    let mut cumulative = 0;
    run_times
        .iter()
        .enumerate()
        .map(|(idx, (station, run))| {
            cumulative += run;
            let arrival = cumulative;
            if idx > 0 && idx < last {
                cumulative += period.dwell(*station).seconds();
            }
            (*station, arrival)
        })
        .collect()
}

/// Departures from one origin, deduplicated with the first slot's period winning
#[must_use]
pub fn origin_departures(slots: &[Slot]) -> Vec<(NaiveTime, Period)> {
    let mut seen: BTreeMap<NaiveTime, Period> = BTreeMap::new();
    for slot in slots {
        for departure in slot.departures() {
            seen.entry(departure).or_insert(slot.period);
        }
    }
    seen.into_iter().collect()
}

/// Build the full timetable for one service day
///
/// # Errors
///
/// Returns an error if a train would reach a station before the train ahead
/// of it, e.g. a short custom headway right after a rush-hour train, or if
/// the schedule runs past midnight. The loader rejects such files.
pub fn generate_timetable(slots: &DaySlots) -> Result<Timetable, String> {
    let mut schedules: BTreeMap<Station, StationSchedule> = BTreeMap::new();

    for (direction, direction_slots) in [
        (Direction::Motijheel, &slots.motijheel),
        (Direction::UttaraNorth, &slots.uttara),
    ] {
        for (departure, period) in origin_departures(direction_slots) {
            for (station, offset) in station_offsets(direction, period) {
                let time = time_from_seconds(departure.num_seconds_from_midnight() + offset);
                let times = schedules.entry(station).or_default().times_mut(direction);
                if let Some(previous) = times.last() {
                    if time < *previous {
                        return Err(format!(
                            "{} towards {}: train leaving at {} reaches it at {} before the one ahead ({})",
                            station.name(),
                            direction.name(),
                            format_hms(departure),
                            format_hms(time),
                            format_hms(*previous)
                        ));
                    }
                }
                times.push(time);
            }
        }
    }

    let mut timetable = Timetable::new();
    for station in Station::ALL {
        timetable.insert(station, schedules.remove(&station).unwrap_or_default());
    }
    Ok(timetable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).expect("valid time")
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        hms(h, m, 0)
    }

    #[test]
    fn test_parse_headway() {
        assert_eq!(Headway::parse("rush"), Ok((Headway::Rush, Period::Rush)));
        assert_eq!(Headway::parse(" OffPeak "), Ok((Headway::Fixed(480), Period::Offpeak)));
        assert_eq!(Headway::parse("5:30"), Ok((Headway::Fixed(330), Period::Custom)));
        assert_eq!(Headway::parse("10"), Ok((Headway::Fixed(600), Period::Custom)));
        assert!(Headway::parse("often").is_err());
        assert!(Headway::parse("0").is_err());
    }

    #[test]
    fn test_parse_slot_time_formats() {
        assert_eq!(parse_slot_time("07:10"), Ok(hm(7, 10)));
        assert_eq!(parse_slot_time("07:10:30"), Ok(hms(7, 10, 30)));
        assert_eq!(parse_slot_time("730"), Ok(hm(7, 30)));
        assert_eq!(parse_slot_time("2130"), Ok(hm(21, 30)));
        assert_eq!(parse_slot_time("09:15 PM"), Ok(hm(21, 15)));
        assert_eq!(parse_slot_time("730 AM"), Ok(hm(7, 30)));
        assert!(parse_slot_time("7.30").is_err());
    }

    #[test]
    fn test_slot_excludes_end() {
        let slot = Slot::parse_line("7:10 | 7:30 | 10").expect("valid").expect("slot line");
        assert_eq!(slot.departures(), vec![hm(7, 10), hm(7, 20)]);
    }

    #[test]
    fn test_slot_equal_bounds_gives_one_train() {
        let slot = Slot::parse_line("21:40 | 21:40 | offpeak").expect("valid").expect("slot line");
        assert_eq!(slot.departures(), vec![hm(21, 40)]);
    }

    #[test]
    fn test_rush_alternates() {
        let slot = Slot::parse_line("07:00 | 07:30 | rush").expect("valid").expect("slot line");
        assert_eq!(
            slot.departures(),
            vec![hm(7, 0), hm(7, 6), hms(7, 11, 30), hms(7, 17, 30), hm(7, 23), hm(7, 29)]
        );
    }

    #[test]
    fn test_slot_crossing_midnight() {
        let slot = Slot::parse_line("23:50 | 00:10 | 10").expect("valid").expect("slot line");
        assert_eq!(slot.departures(), vec![hm(23, 50), hm(0, 0)]);
    }

    #[test]
    fn test_non_slot_lines() {
        assert_eq!(Slot::parse_line("just text"), Ok(None));
        assert!(Slot::parse_line("7:00 | 8:00 | sometimes").is_err());
    }

    #[test]
    fn test_station_offsets_add_dwell_at_intermediate_stops() {
        let offsets = station_offsets(Direction::Motijheel, Period::Custom);
        assert_eq!(offsets[0], (Station::UttaraNorth, 0));
        assert_eq!(offsets[1], (Station::UttaraCenter, 100));
        // 100 run + 30 dwell at Uttara Center + 110 run
        assert_eq!(offsets[2], (Station::UttaraSouth, 240));

        let total_run: u32 = RUN_TIMES_TO_MOTIJHEEL.iter().map(|(_, run)| run).sum();
        let total_dwell: u32 = RUN_TIMES_TO_MOTIJHEEL[1..15]
            .iter()
            .map(|(station, _)| Period::Custom.dwell(*station).seconds())
            .sum();
        assert_eq!(offsets[15], (Station::Motijheel, total_run + total_dwell));
    }

    #[test]
    fn test_period_dwell_overrides() {
        assert_eq!(Period::Rush.dwell(Station::Kazipara), Dwell::High);
        assert_eq!(Period::Rush.dwell(Station::Farmgate), Dwell::Medium);
        assert_eq!(Period::Offpeak.dwell(Station::Mirpur10), Dwell::Medium);
        assert_eq!(Period::Offpeak.dwell(Station::Sewrapara), Dwell::Low);
        assert_eq!(Period::Custom.dwell(Station::Mirpur10), Dwell::Low);
        assert_eq!(Period::Custom.dwell(Station::Shahbag), Dwell::Medium);
    }

    #[test]
    fn test_dedupe_keeps_first_period() {
        let slots = vec![
            Slot::parse_line("07:00 | 07:12 | rush").expect("valid").expect("slot line"),
            Slot::parse_line("07:06 | 07:10 | 4").expect("valid").expect("slot line"),
        ];
        let departures = origin_departures(&slots);
        assert_eq!(
            departures,
            vec![(hm(7, 0), Period::Rush), (hm(7, 6), Period::Rush), (hms(7, 11, 30), Period::Rush)]
        );
    }

    const CONFIG: &str = "# Timetable config

## Weekdays (Sun-Thu)

```
MOTIJHEEL_SLOTS:
# start | end | headway
07:10 | 07:30 | 10
UTTARA_SLOTS:
07:30 | 07:30 | offpeak
bogus | 07:30 | 10
```

### Notes are not sections

## Friday

MOTIJHEEL_SLOTS:
15:00 | 15:16 | offpeak
UTTARA_SLOTS:
";

    #[test]
    fn test_parse_config_sections() {
        let schedules = parse_config(CONFIG);
        assert_eq!(schedules.len(), 2);

        let weekdays = schedules.get(&ServiceDay::Weekday).expect("weekday section");
        assert_eq!(weekdays.motijheel.len(), 1);
        assert_eq!(weekdays.uttara.len(), 1);

        let friday = schedules.get(&ServiceDay::Friday).expect("friday section");
        assert_eq!(friday.motijheel[0].headway, Headway::Fixed(480));
        assert!(friday.uttara.is_empty());
        assert!(!schedules.contains_key(&ServiceDay::Saturday));
    }

    #[test]
    fn test_generate_timetable_keeps_index_alignment() {
        let schedules = parse_config(CONFIG);
        let timetable = generate_timetable(schedules.get(&ServiceDay::Weekday).expect("weekday section"))
            .expect("ordered timetable");

        assert_eq!(timetable.stations().count(), 16);
        assert_eq!(
            timetable.times(Station::UttaraNorth, Direction::Motijheel),
            Some(&[hm(7, 10), hm(7, 20)][..])
        );
        assert_eq!(
            timetable.times(Station::UttaraCenter, Direction::Motijheel),
            Some(&[hms(7, 11, 40), hms(7, 21, 40)][..])
        );
        for station in Station::ALL {
            assert_eq!(timetable.times(station, Direction::Motijheel).map(<[NaiveTime]>::len), Some(2));
            assert_eq!(timetable.times(station, Direction::UttaraNorth).map(<[NaiveTime]>::len), Some(1));
        }
        assert_eq!(
            timetable.time_at(Station::Motijheel, Direction::UttaraNorth, 0),
            Some(hm(7, 30))
        );

        let json = timetable.to_json_pretty().expect("serialization should succeed");
        assert_eq!(Timetable::from_json(&json), Ok(timetable));
    }

    #[test]
    fn test_overtaking_train_is_rejected() {
        let slots = DaySlots {
            motijheel: vec![
                Slot::parse_line("07:00 | 07:01 | rush").expect("valid").expect("slot line"),
                Slot::parse_line("07:02 | 07:10 | 2").expect("valid").expect("slot line"),
            ],
            uttara: Vec::new(),
        };
        let err = generate_timetable(&slots).expect_err("second train overtakes the first");
        assert!(err.contains("towards Motijheel"), "{err}");
    }

    #[test]
    fn test_generated_timetable_reloads() {
        let slots = DaySlots {
            motijheel: vec![
                Slot::parse_line("07:00 | 07:01 | rush").expect("valid").expect("slot line"),
                Slot::parse_line("07:05 | 07:30 | 5").expect("valid").expect("slot line"),
            ],
            uttara: vec![Slot::parse_line("07:00 | 07:30 | offpeak").expect("valid").expect("slot line")],
        };
        let timetable = generate_timetable(&slots).expect("ordered timetable");
        let json = timetable.to_json_pretty().expect("serialization should succeed");
        assert_eq!(Timetable::from_json(&json), Ok(timetable));
    }
}
