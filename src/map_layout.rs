use crate::models::{Direction, Station};
use crate::train_journey::{LiveTrain, TrainState};

/// Vertical distance between Uttara North and Motijheel on the schematic
pub const TRACK_HEIGHT: f64 = 620.0;

/// Padding below the last drawn stop
pub const TRACK_BOTTOM_PADDING: f64 = 40.0;

/// Stop drawn after Motijheel that has no service yet
pub const CONSTRUCTION_STOP: &str = "Kamalapur";

/// Canvas position of the track line and the first stop
pub const TRACK_X: f64 = 60.0;
pub const TOP_MARGIN: f64 = 30.0;

/// Horizontal offset of each direction's markers from the track
pub const TRAIN_OFFSET: f64 = 14.0;
pub const TRAIN_RADIUS: f64 = 8.0;
pub const STATION_RADIUS: f64 = 6.0;

/// Clicks within this distance of a marker select it
const HIT_RADIUS: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapStop {
    Station(Station),
    UnderConstruction(&'static str),
}

impl MapStop {
    #[must_use]
    pub fn label(self) -> String {
        match self {
            MapStop::Station(station) => station.name().to_string(),
            MapStop::UnderConstruction(name) => format!("{name} (Construction)"),
        }
    }
}

/// Every stop on the schematic, top to bottom
#[must_use]
pub fn display_stops() -> Vec<MapStop> {
    Station::ALL
        .iter()
        .copied()
        .map(MapStop::Station)
        .chain(std::iter::once(MapStop::UnderConstruction(CONSTRUCTION_STOP)))
        .collect()
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn station_spacing() -> f64 {
    TRACK_HEIGHT / (Station::ALL.len() - 1) as f64
}

/// Y offset of the stop at `index` in display order
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn station_y(index: usize) -> f64 {
    index as f64 * station_spacing()
}

/// Height needed to draw every display stop
#[must_use]
pub fn total_height() -> f64 {
    station_y(display_stops().len() - 1) + TRACK_BOTTOM_PADDING
}

/// Y offset of a live train's marker
///
/// Trains in transit are interpolated between their segment's stations; trains
/// arriving at, departing from or standing at a stop are drawn on it.
#[must_use]
pub fn train_y(train: &LiveTrain) -> Option<f64> {
    let stops = &train.journey.stops;
    match train.state {
        TrainState::InTransit { segment_index, progress } => {
            let from = station_y(stops.get(segment_index)?.position_index);
            let to = station_y(stops.get(segment_index + 1)?.position_index);
            Some(from + (to - from) * progress)
        }
        TrainState::Departing { stop_index } | TrainState::Arriving { stop_index } => {
            Some(station_y(stops.get(stop_index)?.position_index))
        }
        TrainState::Arrived => Some(station_y(stops.last()?.position_index)),
        TrainState::NotYetDeparted => None,
    }
}

/// Canvas position of the stop at `index`
#[must_use]
pub fn stop_point(index: usize) -> (f64, f64) {
    (TRACK_X, TOP_MARGIN + station_y(index))
}

/// Motijheel-bound trains run left of the track, Uttara-bound right
#[must_use]
pub fn train_x(direction: Direction) -> f64 {
    match direction {
        Direction::Motijheel => TRACK_X - TRAIN_OFFSET,
        Direction::UttaraNorth => TRACK_X + TRAIN_OFFSET,
    }
}

/// Canvas position of a live train's marker
#[must_use]
pub fn train_point(train: &LiveTrain) -> Option<(f64, f64)> {
    Some((train_x(train.journey.direction), TOP_MARGIN + train_y(train)?))
}

/// What a click on the map landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapHit {
    /// Index into the drawn trains
    Train(usize),
    /// Index into `display_stops`
    Stop(usize),
}

/// Trains are drawn over stations, so they win ties
#[must_use]
pub fn hit_test(x: f64, y: f64, trains: &[LiveTrain]) -> Option<MapHit> {
    let near = |(px, py): (f64, f64)| (px - x).hypot(py - y) <= HIT_RADIUS;

    if let Some(idx) = trains.iter().position(|train| train_point(train).is_some_and(near)) {
        return Some(MapHit::Train(idx));
    }
    (0..display_stops().len())
        .find(|idx| near(stop_point(*idx)))
        .map(MapHit::Stop)
}
