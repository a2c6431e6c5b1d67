use chrono::NaiveTime;
use crate::constants::{MAP_ARRIVAL_WINDOW_MINUTES, MAP_DEPARTURE_WINDOW_MINUTES};
use crate::models::{Direction, Station, Timetable};
use crate::time::{minute_of_day, minutes_since_midnight};

/// One scheduled call of a train
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JourneyStop {
    pub station: Station,
    pub time: NaiveTime,
    /// Fractional minutes since midnight
    pub minutes: f64,
    /// Position of the station in line order, for drawing
    pub position_index: usize,
}

impl JourneyStop {
    fn new(station: Station, time: NaiveTime) -> Self {
        Self {
            station,
            time,
            minutes: minutes_since_midnight(time),
            position_index: station.index(),
        }
    }
}

/// Where a running train is between two stops
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentPosition {
    pub segment_index: usize,
    /// In `[0, 1)`
    pub progress: f64,
}

/// Derived state of a train at some instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrainState {
    NotYetDeparted,
    /// Just after its scheduled time at a stop
    Departing { stop_index: usize },
    InTransit { segment_index: usize, progress: f64 },
    /// In the last minute before a stop
    Arriving { stop_index: usize },
    /// At or past the terminus time
    Arrived,
}

/// Status of a stop on the journey detail timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopStatus {
    StartsHere,
    Departed,
    CurrentLocation,
    Arrived,
    Expected,
}

impl StopStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            StopStatus::StartsHere => "Starts Here",
            StopStatus::Departed => "Departed",
            StopStatus::CurrentLocation => "Current Location",
            StopStatus::Arrived => "Arrived",
            StopStatus::Expected => "Expected",
        }
    }

    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            StopStatus::Departed | StopStatus::Arrived => "completed",
            StopStatus::CurrentLocation => "current",
            StopStatus::StartsHere | StopStatus::Expected => "upcoming",
        }
    }
}

/// One physical train's run, reconstructed by following a timetable index
#[derive(Debug, Clone, PartialEq)]
pub struct TrainJourney {
    pub direction: Direction,
    pub train_index: usize,
    pub stops: Vec<JourneyStop>,
}

impl TrainJourney {
    /// Rebuild the journey of the train leaving `origin` at `selected_time`
    ///
    /// An exact time match is preferred; otherwise the first train in the same
    /// minute is used so links written as `HH:MM` resolve against `HH:MM:SS` data.
    ///
    /// # Errors
    ///
    /// Returns an error if the station has no trains in that direction, the
    /// time is not one of them, or the train cannot be followed from the
    /// start of the line as far as `origin`.
    pub fn trace(
        timetable: &Timetable,
        origin: Station,
        direction: Direction,
        selected_time: NaiveTime,
    ) -> Result<Self, String> {
        let times = timetable
            .times(origin, direction)
            .ok_or_else(|| "Station or direction not found in schedule".to_string())?;

        let index = times
            .iter()
            .position(|time| *time == selected_time)
            .or_else(|| {
                times
                    .iter()
                    .position(|time| minute_of_day(*time) == minute_of_day(selected_time))
            })
            .ok_or_else(|| "Selected time not found in schedule".to_string())?;

        let journey = Self::from_index(timetable, direction, index);
        if journey.stops.iter().any(|stop| stop.station == origin) {
            Ok(journey)
        } else {
            Err("Selected time not found in schedule".to_string())
        }
    }

    /// Follow `train_index` through every station in travel order
    ///
    /// Stops at the first station that has no entry for the index.
    #[must_use]
    pub fn from_index(timetable: &Timetable, direction: Direction, train_index: usize) -> Self {
        let stops = direction
            .travel_order()
            .into_iter()
            .map_while(|station| {
                timetable
                    .time_at(station, direction, train_index)
                    .map(|time| JourneyStop::new(station, time))
            })
            .collect();

        Self {
            direction,
            train_index,
            stops,
        }
    }

    #[must_use]
    pub fn first_stop(&self) -> Option<&JourneyStop> {
        self.stops.first()
    }

    #[must_use]
    pub fn last_stop(&self) -> Option<&JourneyStop> {
        self.stops.last()
    }

    /// Interpolated position, `None` before the first stop, at or after the last,
    /// or when the journey has fewer than two stops
    #[must_use]
    pub fn position_at(&self, now: NaiveTime) -> Option<SegmentPosition> {
        self.position_at_minutes(minutes_since_midnight(now))
    }

    fn position_at_minutes(&self, now: f64) -> Option<SegmentPosition> {
        self.stops
            .windows(2)
            .position(|pair| pair[0].minutes <= now && now < pair[1].minutes)
            .map(|segment_index| {
                let from = &self.stops[segment_index];
                let to = &self.stops[segment_index + 1];
                SegmentPosition {
                    segment_index,
                    progress: (now - from.minutes) / (to.minutes - from.minutes),
                }
            })
    }

    /// State at `now` with the live map's arrival and departure windows
    #[must_use]
    pub fn state_at(&self, now: NaiveTime) -> TrainState {
        let now = minutes_since_midnight(now);
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return TrainState::NotYetDeparted;
        };

        if now < first.minutes {
            return TrainState::NotYetDeparted;
        }
        if now >= last.minutes {
            return TrainState::Arrived;
        }

        let Some(position) = self.position_at_minutes(now) else {
            return TrainState::NotYetDeparted;
        };
        let from = &self.stops[position.segment_index];
        let to = &self.stops[position.segment_index + 1];

        if now < from.minutes + MAP_DEPARTURE_WINDOW_MINUTES {
            TrainState::Departing {
                stop_index: position.segment_index,
            }
        } else if now >= to.minutes - MAP_ARRIVAL_WINDOW_MINUTES {
            TrainState::Arriving {
                stop_index: position.segment_index + 1,
            }
        } else {
            TrainState::InTransit {
                segment_index: position.segment_index,
                progress: position.progress,
            }
        }
    }

    /// Whether the live map shows this train at `now`
    ///
    /// From its first stop until shortly after it reaches the terminus.
    #[must_use]
    pub fn is_running(&self, now: NaiveTime) -> bool {
        let now = minutes_since_midnight(now);
        match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) if self.stops.len() >= 2 => {
                now >= first.minutes && now <= last.minutes + MAP_DEPARTURE_WINDOW_MINUTES
            }
            _ => false,
        }
    }

    /// Per-stop status for the detail timeline, compared at minute granularity
    #[must_use]
    pub fn timeline(&self, now: NaiveTime) -> Vec<StopStatus> {
        let now_minute = minute_of_day(now);
        let current = self
            .stops
            .iter()
            .take_while(|stop| minute_of_day(stop.time) <= now_minute)
            .count()
            .checked_sub(1);
        let last_index = self.stops.len().saturating_sub(1);

        (0..self.stops.len())
            .map(|idx| match current {
                None if idx == 0 => StopStatus::StartsHere,
                Some(cur) if idx < cur => StopStatus::Departed,
                Some(cur) if idx == cur && idx == last_index => StopStatus::Arrived,
                Some(cur) if idx == cur => StopStatus::CurrentLocation,
                _ => StopStatus::Expected,
            })
            .collect()
    }
}

/// A train on the live map
#[derive(Debug, Clone, PartialEq)]
pub struct LiveTrain {
    pub journey: TrainJourney,
    pub state: TrainState,
}

impl LiveTrain {
    /// The stop the train is at or heading to
    #[must_use]
    pub fn next_stop(&self) -> Option<&JourneyStop> {
        match self.state {
            TrainState::Departing { stop_index } | TrainState::Arriving { stop_index } => {
                self.journey.stops.get(stop_index)
            }
            TrainState::InTransit { segment_index, .. } => self.journey.stops.get(segment_index + 1),
            TrainState::Arrived => self.journey.last_stop(),
            TrainState::NotYetDeparted => self.journey.first_stop(),
        }
    }

    /// Progress towards `next_stop`, 1.0 when at a station
    #[must_use]
    pub fn progress(&self) -> f64 {
        match self.state {
            TrainState::InTransit { progress, .. } => progress,
            TrainState::NotYetDeparted => 0.0,
            TrainState::Departing { .. } | TrainState::Arriving { .. } | TrainState::Arrived => 1.0,
        }
    }
}

/// Every running train of one direction at `now`
///
/// Trains are enumerated from the direction's origin station; journeys with
/// fewer than two stops cannot be placed and are skipped.
#[must_use]
pub fn live_trains(timetable: &Timetable, direction: Direction, now: NaiveTime) -> Vec<LiveTrain> {
    (0..timetable.train_count(direction))
        .map(|index| TrainJourney::from_index(timetable, direction, index))
        .filter(|journey| journey.is_running(now))
        .map(|journey| LiveTrain {
            state: journey.state_at(now),
            journey,
        })
        .collect()
}
