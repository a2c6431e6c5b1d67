use serde::{Deserialize, Serialize};
use std::fmt;
use super::Station;

/// The terminus a train is heading toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "Motijheel")]
    Motijheel,
    #[serde(rename = "Uttara North")]
    UttaraNorth,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Motijheel, Direction::UttaraNorth];

    /// Name as written in the timetable files
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Direction::Motijheel => "Motijheel",
            Direction::UttaraNorth => "Uttara North",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|direction| direction.name() == name)
    }

    /// Platform number trains in this direction leave from
    #[must_use]
    pub const fn platform(self) -> u8 {
        match self {
            Direction::Motijheel => 1,
            Direction::UttaraNorth => 2,
        }
    }

    /// Platform token used inside verification ids
    #[must_use]
    pub const fn platform_token(self) -> &'static str {
        match self {
            Direction::Motijheel => "Platform1",
            Direction::UttaraNorth => "Platform2",
        }
    }

    /// Direction token used inside verification ids
    #[must_use]
    pub const fn id_token(self) -> &'static str {
        match self {
            Direction::Motijheel => "Motijheel",
            Direction::UttaraNorth => "UttaraNorth",
        }
    }

    /// Stations in the order a train in this direction calls at them
    #[must_use]
    pub fn travel_order(self) -> Vec<Station> {
        match self {
            Direction::Motijheel => Station::ALL.to_vec(),
            Direction::UttaraNorth => Station::ALL.iter().rev().copied().collect(),
        }
    }

    /// First station of a full run
    #[must_use]
    pub const fn origin(self) -> Station {
        match self {
            Direction::Motijheel => Station::UttaraNorth,
            Direction::UttaraNorth => Station::Motijheel,
        }
    }

    #[must_use]
    pub const fn terminus(self) -> Station {
        match self {
            Direction::Motijheel => Station::Motijheel,
            Direction::UttaraNorth => Station::UttaraNorth,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which directions the live map shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectionFilter {
    #[default]
    All,
    Only(Direction),
}

impl DirectionFilter {
    #[must_use]
    pub fn includes(self, direction: Direction) -> bool {
        match self {
            DirectionFilter::All => true,
            DirectionFilter::Only(only) => only == direction,
        }
    }

    /// Selecting the active filter again clears it
    #[must_use]
    pub fn toggle(self, direction: Direction) -> Self {
        if self == DirectionFilter::Only(direction) {
            DirectionFilter::All
        } else {
            DirectionFilter::Only(direction)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platforms() {
        assert_eq!(Direction::Motijheel.platform(), 1);
        assert_eq!(Direction::UttaraNorth.platform(), 2);
        assert_eq!(Direction::UttaraNorth.platform_token(), "Platform2");
        assert_eq!(Direction::UttaraNorth.id_token(), "UttaraNorth");
    }

    #[test]
    fn test_travel_order() {
        let southbound = Direction::Motijheel.travel_order();
        assert_eq!(southbound.first(), Some(&Station::UttaraNorth));
        assert_eq!(southbound.last(), Some(&Station::Motijheel));

        let northbound = Direction::UttaraNorth.travel_order();
        assert_eq!(northbound.first(), Some(&Station::Motijheel));
        assert_eq!(northbound.last(), Some(&Station::UttaraNorth));
        assert_eq!(northbound.len(), 16);
    }

    #[test]
    fn test_origin_and_terminus() {
        for direction in Direction::ALL {
            let order = direction.travel_order();
            assert_eq!(order.first(), Some(&direction.origin()));
            assert_eq!(order.last(), Some(&direction.terminus()));
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Direction::UttaraNorth).expect("serialization should succeed");
        assert_eq!(json, "\"Uttara North\"");
        assert_eq!(Direction::from_name("Motijheel"), Some(Direction::Motijheel));
        assert_eq!(Direction::from_name("Uttara"), None);
    }

    #[test]
    fn test_filter_toggle() {
        let filter = DirectionFilter::All.toggle(Direction::Motijheel);
        assert_eq!(filter, DirectionFilter::Only(Direction::Motijheel));
        assert!(filter.includes(Direction::Motijheel));
        assert!(!filter.includes(Direction::UttaraNorth));
        assert_eq!(filter.toggle(Direction::Motijheel), DirectionFilter::All);
        assert_eq!(
            filter.toggle(Direction::UttaraNorth),
            DirectionFilter::Only(Direction::UttaraNorth)
        );
    }
}
