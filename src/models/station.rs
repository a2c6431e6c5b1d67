use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A stop on MRT Line 6, in physical line order from Uttara North to Motijheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Station {
    UttaraNorth,
    UttaraCenter,
    UttaraSouth,
    Pallabi,
    Mirpur11,
    Mirpur10,
    Kazipara,
    Sewrapara,
    Agargoan,
    BijoySarani,
    Farmgate,
    KarwanBazar,
    Shahbag,
    DhakaUniversity,
    BangladeshSecretariat,
    Motijheel,
}

impl Station {
    /// Every station in line order
    pub const ALL: [Station; 16] = [
        Station::UttaraNorth,
        Station::UttaraCenter,
        Station::UttaraSouth,
        Station::Pallabi,
        Station::Mirpur11,
        Station::Mirpur10,
        Station::Kazipara,
        Station::Sewrapara,
        Station::Agargoan,
        Station::BijoySarani,
        Station::Farmgate,
        Station::KarwanBazar,
        Station::Shahbag,
        Station::DhakaUniversity,
        Station::BangladeshSecretariat,
        Station::Motijheel,
    ];

    /// Name as written in the timetable files
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Station::UttaraNorth => "Uttara North",
            Station::UttaraCenter => "Uttara Center",
            Station::UttaraSouth => "Uttara South",
            Station::Pallabi => "Pallabi",
            Station::Mirpur11 => "Mirpur 11",
            Station::Mirpur10 => "Mirpur 10",
            Station::Kazipara => "Kazipara",
            Station::Sewrapara => "Sewrapara",
            Station::Agargoan => "Agargoan",
            Station::BijoySarani => "Bijoy Sarani",
            Station::Farmgate => "Farmgate",
            Station::KarwanBazar => "Karwan Bazar",
            Station::Shahbag => "Shahbag",
            Station::DhakaUniversity => "Dhaka University",
            Station::BangladeshSecretariat => "Bangladesh Secretariat",
            Station::Motijheel => "Motijheel",
        }
    }

    /// Position in line order (0 = Uttara North)
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|station| station.name() == name)
    }

    /// Latitude and longitude of the station entrance
    #[must_use]
    pub const fn coordinates(self) -> (f64, f64) {
        match self {
            Station::UttaraNorth => (23.8759, 90.3795),
            Station::UttaraCenter => (23.8689, 90.3822),
            Station::UttaraSouth => (23.8628, 90.3869),
            Station::Pallabi => (23.8282, 90.3655),
            Station::Mirpur11 => (23.8175, 90.3589),
            Station::Mirpur10 => (23.8069, 90.3684),
            Station::Kazipara => (23.7977, 90.3710),
            Station::Sewrapara => (23.7903, 90.3750),
            Station::Agargoan => (23.7783, 90.3794),
            Station::BijoySarani => (23.7652, 90.3881),
            Station::Farmgate => (23.7581, 90.3897),
            Station::KarwanBazar => (23.7507, 90.3919),
            Station::Shahbag => (23.7388, 90.3953),
            Station::DhakaUniversity => (23.7356, 90.3969),
            Station::BangladeshSecretariat => (23.7268, 90.4024),
            Station::Motijheel => (23.7330, 90.4172),
        }
    }

    /// Google Maps search link for the station
    #[must_use]
    pub fn maps_url(self) -> String {
        let (lat, lon) = self.coordinates();
        format!("https://www.google.com/maps/search/?api=1&query={lat},{lon}")
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Station {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("Unknown station: {s}"))
    }
}

// Serialized by display name so stations can key the timetable JSON objects
impl Serialize for Station {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Station {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Self::from_name(&name).ok_or_else(|| serde::de::Error::custom(format!("Unknown station: {name}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_order() {
        assert_eq!(Station::ALL.len(), 16);
        assert_eq!(Station::ALL[0], Station::UttaraNorth);
        assert_eq!(Station::ALL[15], Station::Motijheel);
        for (idx, station) in Station::ALL.iter().enumerate() {
            assert_eq!(station.index(), idx);
            assert_eq!(Station::from_index(idx), Some(*station));
        }
        assert_eq!(Station::from_index(16), None);
    }

    #[test]
    fn test_name_round_trip() {
        for station in Station::ALL {
            assert_eq!(Station::from_name(station.name()), Some(station));
        }
        assert_eq!(Station::from_name("Kamalapur"), None);
    }

    #[test]
    fn test_from_str_error_message() {
        let err = "Gulshan".parse::<Station>().expect_err("unknown station");
        assert_eq!(err, "Unknown station: Gulshan");
    }

    #[test]
    fn test_serialize_as_name() {
        let json = serde_json::to_string(&Station::BijoySarani).expect("serialization should succeed");
        assert_eq!(json, "\"Bijoy Sarani\"");
        let back: Station = serde_json::from_str(&json).expect("deserialization should succeed");
        assert_eq!(back, Station::BijoySarani);
    }

    #[test]
    fn test_deserialize_unknown_station_fails() {
        let result: Result<Station, _> = serde_json::from_str("\"Nowhere\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_maps_url() {
        assert_eq!(
            Station::Motijheel.maps_url(),
            "https://www.google.com/maps/search/?api=1&query=23.733,90.4172"
        );
    }
}
