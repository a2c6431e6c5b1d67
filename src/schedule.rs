//! Departure board queries over a timetable and a clock value
//!
//! All comparisons are made at minute granularity: a train scheduled at
//! `06:10` (or `06:10:40`) is "now" for the whole of the 06:10 minute.

use chrono::{NaiveTime, Timelike};
use std::fmt;
use crate::constants::{ARRIVING_LEAD_MINUTES, DEFAULT_UPCOMING_LIMIT, LEAVING_WINDOW_SECONDS};
use crate::models::{generate_time_id, Direction, Station, Timetable, VerifiedSet};
use crate::time::{format_hhmm, minute_of_day};

const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// List every future train and the past ones too
    pub show_all: bool,
    /// Future trains shown when `show_all` is off
    pub upcoming_limit: usize,
    /// Most recent past trains kept when `show_all` is on, `None` for all
    pub past_limit: Option<usize>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            show_all: false,
            upcoming_limit: DEFAULT_UPCOMING_LIMIT,
            past_limit: None,
        }
    }
}

impl QueryOptions {
    #[must_use]
    pub fn show_all() -> Self {
        Self {
            show_all: true,
            ..Self::default()
        }
    }
}

/// Trains of one direction at one station, split around now
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NextTrains {
    pub past: Vec<NaiveTime>,
    /// Scheduled this minute, within the leaving window
    pub current: Vec<NaiveTime>,
    /// Scheduled the minute after now
    pub arriving: Vec<NaiveTime>,
    pub upcoming: Vec<NaiveTime>,
}

/// True while a train scheduled at `time` is leaving the platform
#[must_use]
pub fn is_leaving(time: NaiveTime, now: NaiveTime) -> bool {
    minute_of_day(time) == minute_of_day(now) && now.second() < LEAVING_WINDOW_SECONDS
}

/// True during the minute before a train scheduled at `time` comes in
#[must_use]
pub fn is_arriving(time: NaiveTime, now: NaiveTime) -> bool {
    minute_of_day(time) == arriving_minute(now)
}

fn arriving_minute(now: NaiveTime) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lead = ARRIVING_LEAD_MINUTES as u32;
    (minute_of_day(now) + lead) % MINUTES_PER_DAY
}

/// Split an ascending list of times around `now`
#[must_use]
pub fn split_times(times: &[NaiveTime], now: NaiveTime, options: &QueryOptions) -> NextTrains {
    let now_minute = minute_of_day(now);
    let split = times.partition_point(|time| minute_of_day(*time) < now_minute);
    let (past, future) = times.split_at(split);

    let current = future.iter().copied().filter(|t| is_leaving(*t, now)).collect();
    let arriving = times.iter().copied().filter(|t| is_arriving(*t, now)).collect();

    let (past, upcoming) = if options.show_all {
        let keep_from = options.past_limit.map_or(0, |limit| past.len().saturating_sub(limit));
        (past[keep_from..].to_vec(), future.to_vec())
    } else {
        (Vec::new(), future.iter().take(options.upcoming_limit).copied().collect())
    };

    NextTrains {
        past,
        current,
        arriving,
        upcoming,
    }
}

/// Split one station's trains in one direction around `now`
///
/// A station missing from the timetable yields an empty result.
#[must_use]
pub fn next_trains(
    timetable: &Timetable,
    station: Station,
    direction: Direction,
    now: NaiveTime,
    options: &QueryOptions,
) -> NextTrains {
    timetable
        .times(station, direction)
        .map(|times| split_times(times, now, options))
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainStatus {
    Past,
    Leaving,
    Arriving,
    /// One of the next few trains
    Upcoming,
    /// Further ahead, only listed in show-all mode
    Later,
}

impl TrainStatus {
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            TrainStatus::Past => "past-train",
            TrainStatus::Leaving => "current-train",
            TrainStatus::Arriving => "arriving-train",
            TrainStatus::Upcoming => "upcoming-train",
            TrainStatus::Later => "future-train",
        }
    }
}

/// One row of a platform's list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardEntry {
    pub time: NaiveTime,
    pub time_id: String,
    pub verified: bool,
    pub status: TrainStatus,
}

impl BoardEntry {
    #[must_use]
    pub fn label(&self) -> String {
        format_hhmm(self.time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Announcement {
    Arriving { platform: u8 },
    Leaving { platform: u8 },
}

impl fmt::Display for Announcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Announcement::Arriving { platform } => write!(f, "Train is arriving at Platform {platform}"),
            Announcement::Leaving { platform } => write!(f, "Train is leaving Platform {platform}"),
        }
    }
}

/// What a platform shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformBoard {
    pub direction: Direction,
    pub trains: NextTrains,
    pub entries: Vec<BoardEntry>,
}

impl PlatformBoard {
    fn build(
        station: Station,
        direction: Direction,
        trains: NextTrains,
        verified: &VerifiedSet,
        classify: impl Fn(usize, NaiveTime) -> TrainStatus,
    ) -> Self {
        let entry = |time: NaiveTime, status: TrainStatus| {
            let time_id = generate_time_id(station, direction, time);
            BoardEntry {
                verified: verified.contains(&time_id),
                time,
                time_id,
                status,
            }
        };

        let mut entries: Vec<BoardEntry> = trains.past.iter().map(|t| entry(*t, TrainStatus::Past)).collect();
        entries.extend(
            trains
                .upcoming
                .iter()
                .enumerate()
                .map(|(idx, time)| entry(*time, classify(idx, *time))),
        );

        Self {
            direction,
            trains,
            entries,
        }
    }

    #[must_use]
    pub fn platform(&self) -> u8 {
        self.direction.platform()
    }

    /// Arriving takes precedence over leaving
    #[must_use]
    pub fn announcement(&self) -> Option<Announcement> {
        let platform = self.platform();
        if !self.trains.arriving.is_empty() {
            Some(Announcement::Arriving { platform })
        } else if !self.trains.current.is_empty() {
            Some(Announcement::Leaving { platform })
        } else {
            None
        }
    }
}

/// Both platforms of a station
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationBoard {
    pub station: Station,
    pub platforms: Vec<PlatformBoard>,
}

impl StationBoard {
    /// Live board for a station at `now`
    #[must_use]
    pub fn build(
        timetable: &Timetable,
        station: Station,
        now: NaiveTime,
        options: &QueryOptions,
        verified: &VerifiedSet,
    ) -> Self {
        let platforms = Direction::ALL
            .iter()
            .map(|direction| {
                let trains = next_trains(timetable, station, *direction, now, options);
                PlatformBoard::build(station, *direction, trains, verified, |idx, time| {
                    if is_leaving(time, now) {
                        TrainStatus::Leaving
                    } else if is_arriving(time, now) {
                        TrainStatus::Arriving
                    } else if idx < options.upcoming_limit {
                        TrainStatus::Upcoming
                    } else {
                        TrainStatus::Later
                    }
                })
            })
            .collect();
        Self { station, platforms }
    }

    /// Each platform's first train of the day, ignoring the clock
    #[must_use]
    pub fn first_trains(timetable: &Timetable, station: Station, verified: &VerifiedSet) -> Self {
        Self::single_train(timetable, station, verified, |times| times.first().copied())
    }

    /// Each platform's last train of the day, ignoring the clock
    #[must_use]
    pub fn last_trains(timetable: &Timetable, station: Station, verified: &VerifiedSet) -> Self {
        Self::single_train(timetable, station, verified, |times| times.last().copied())
    }

    fn single_train(
        timetable: &Timetable,
        station: Station,
        verified: &VerifiedSet,
        pick: impl Fn(&[NaiveTime]) -> Option<NaiveTime>,
    ) -> Self {
        let platforms = Direction::ALL
            .iter()
            .map(|direction| {
                let upcoming: Vec<NaiveTime> = timetable
                    .times(station, *direction)
                    .and_then(&pick)
                    .into_iter()
                    .collect();
                let trains = NextTrains {
                    upcoming,
                    ..NextTrains::default()
                };
                PlatformBoard::build(station, *direction, trains, verified, |_, _| TrainStatus::Upcoming)
            })
            .collect();
        Self { station, platforms }
    }

    #[must_use]
    pub fn platform(&self, direction: Direction) -> Option<&PlatformBoard> {
        self.platforms.iter().find(|board| board.direction == direction)
    }

    /// Announcements for every platform that has one, platform 1 first
    #[must_use]
    pub fn announcements(&self) -> Vec<Announcement> {
        self.platforms.iter().filter_map(PlatformBoard::announcement).collect()
    }
}

/// First and last train of a station in one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSpan {
    pub direction: Direction,
    pub first_last: Option<(NaiveTime, NaiveTime)>,
}

impl ServiceSpan {
    #[must_use]
    pub fn describe(&self) -> String {
        match self.first_last {
            Some((first, last)) => format!("{} - {}", format_hhmm(first), format_hhmm(last)),
            None => "No service".to_string(),
        }
    }
}

/// Operating hours per direction for the station details panel
#[must_use]
pub fn station_summary(timetable: &Timetable, station: Station) -> Vec<ServiceSpan> {
    Direction::ALL
        .iter()
        .map(|direction| {
            let first_last = timetable
                .times(station, *direction)
                .and_then(|times| Some((*times.first()?, *times.last()?)));
            ServiceSpan {
                direction: *direction,
                first_last,
            }
        })
        .collect()
}

const DETAILS_DEPARTED_SHOWN: usize = 3;
const DETAILS_TOTAL_SHOWN: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartureStatus {
    Departed,
    NextTrain,
    Coming,
}

impl DepartureStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            DepartureStatus::Departed => "Departed",
            DepartureStatus::NextTrain => "Next Train",
            DepartureStatus::Coming => "Coming",
        }
    }
}

/// A window of a station's departures around now for the map's station panel
///
/// The last three departed trains, then the following ones up to fifteen rows.
/// Trains in the current minute count as departed.
#[must_use]
pub fn station_departures(
    timetable: &Timetable,
    station: Station,
    direction: Direction,
    now: NaiveTime,
) -> Vec<(NaiveTime, Option<DepartureStatus>)> {
    let Some(times) = timetable.times(station, direction) else {
        return Vec::new();
    };
    let now_minute = minute_of_day(now);
    let departed = times.partition_point(|time| minute_of_day(*time) <= now_minute);
    let start = departed.saturating_sub(DETAILS_DEPARTED_SHOWN);

    times
        .iter()
        .enumerate()
        .skip(start)
        .take(DETAILS_TOTAL_SHOWN)
        .map(|(idx, time)| {
            let status = if minute_of_day(*time) < now_minute {
                Some(DepartureStatus::Departed)
            } else if idx == departed {
                Some(DepartureStatus::NextTrain)
            } else if idx == departed + 1 {
                Some(DepartureStatus::Coming)
            } else {
                None
            };
            (*time, status)
        })
        .collect()
}
