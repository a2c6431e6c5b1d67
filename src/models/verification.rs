use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use super::{Direction, Station};
use crate::time::format_hhmm;

/// Deterministic id of one scheduled departure
///
/// `{station}-{platform}-{direction}-{time}` with every character outside
/// `[A-Za-z0-9-]` removed, so "Mirpur 10" at 08:15 towards Motijheel becomes
/// `Mirpur10-Platform1-Motijheel-0815`.
#[must_use]
pub fn generate_time_id(station: Station, direction: Direction, time: NaiveTime) -> String {
    format!(
        "{}-{}-{}-{}",
        station.name(),
        direction.platform_token(),
        direction.id_token(),
        format_hhmm(time)
    )
    .chars()
    .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
    .collect()
}

/// A user's confirmation that a scheduled time matched reality
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRecord {
    pub time_id: String,
    pub time: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub direction: String,
    pub verified_at: DateTime<Utc>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub station: String,
}

fn default_status() -> String {
    "correct".to_string()
}

impl VerificationRecord {
    #[must_use]
    pub fn correct(station: Station, direction: Direction, time: NaiveTime, verified_at: DateTime<Utc>) -> Self {
        Self {
            time_id: generate_time_id(station, direction, time),
            time: format_hhmm(time),
            platform: direction.platform().to_string(),
            direction: format!("To {}", direction.name()),
            verified_at,
            status: default_status(),
            station: station.name().to_string(),
        }
    }
}

/// The central verification file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedTimesFile {
    #[serde(default)]
    pub verified_times: BTreeMap<String, VerificationRecord>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub version: u64,
}

impl VerifiedTimesFile {
    /// Parse the central file
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not have the verification file shape
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse verified times: {e}"))
    }
}

/// A record that could not be submitted and is kept locally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingVerification {
    #[serde(flatten)]
    pub record: VerificationRecord,
    pub fallback_timestamp: DateTime<Utc>,
}

/// Locally stored pending records keyed by time id
pub type PendingVerifications = BTreeMap<String, PendingVerification>;

/// Parse pending records from local storage, treating garbage as empty
#[must_use]
pub fn parse_pending(json: Option<&str>) -> PendingVerifications {
    json.and_then(|raw| serde_json::from_str(raw).ok()).unwrap_or_default()
}

/// Add a record that failed to submit; a later record for the same id replaces it
pub fn add_pending(pending: &mut PendingVerifications, record: VerificationRecord, now: DateTime<Utc>) {
    pending.insert(
        record.time_id.clone(),
        PendingVerification {
            record,
            fallback_timestamp: now,
        },
    );
}

/// Body of the repository dispatch that updates the central file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchRequest {
    pub event_type: String,
    pub client_payload: DispatchPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DispatchPayload {
    Verification {
        verification: VerificationRecord,
        timestamp: DateTime<Utc>,
        source: String,
    },
    ClearAll {
        #[serde(rename = "type")]
        kind: String,
        timestamp: DateTime<Utc>,
        admin_action: bool,
    },
}

impl DispatchPayload {
    #[must_use]
    pub fn verification(record: VerificationRecord, timestamp: DateTime<Utc>) -> Self {
        DispatchPayload::Verification {
            verification: record,
            timestamp,
            source: "user-feedback".to_string(),
        }
    }

    #[must_use]
    pub fn clear_all(timestamp: DateTime<Utc>) -> Self {
        DispatchPayload::ClearAll {
            kind: "clear_all_verifications".to_string(),
            timestamp,
            admin_action: true,
        }
    }
}

/// Ids known to be verified, from the central file and local pending records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifiedSet {
    ids: HashSet<String>,
}

impl VerifiedSet {
    #[must_use]
    pub fn new(file: &VerifiedTimesFile, pending: &PendingVerifications) -> Self {
        let ids = file
            .verified_times
            .keys()
            .chain(pending.keys())
            .cloned()
            .collect();
        Self { ids }
    }

    #[must_use]
    pub fn contains(&self, time_id: &str) -> bool {
        self.ids.contains(time_id)
    }

    pub fn insert(&mut self, time_id: String) {
        self.ids.insert(time_id);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
