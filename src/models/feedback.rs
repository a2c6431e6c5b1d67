use chrono::{DateTime, NaiveTime, Utc};
use serde::Serialize;
use super::{Direction, Station};
use crate::time::format_hhmm;

pub const FEEDBACK_TYPE: &str = "Train Time Accuracy Report";

/// Address sent with anonymous reports
pub const FEEDBACK_EMAIL: &str = "user@feedback.system";

/// A user's report that a train ran late
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayReport {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub time: String,
    pub platform: String,
    pub direction: String,
    pub delay: i32,
    pub station: String,
    pub submitted_at: DateTime<Utc>,
}

impl DelayReport {
    #[must_use]
    pub fn new(station: Station, direction: Direction, time: NaiveTime, delay: i32, submitted_at: DateTime<Utc>) -> Self {
        Self {
            kind: "train_time_feedback",
            time: format_hhmm(time),
            platform: direction.platform().to_string(),
            direction: format!("To {}", direction.name()),
            delay,
            station: station.name().to_string(),
            submitted_at,
        }
    }

    /// Form fields accepted by the feedback relay
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be serialized
    pub fn form_fields(&self) -> Result<Vec<(&'static str, String)>, String> {
        let details = serde_json::to_string_pretty(self).map_err(|e| format!("Failed to serialize report: {e}"))?;
        Ok(vec![
            ("feedback_type", FEEDBACK_TYPE.to_string()),
            ("details", details),
            ("email", FEEDBACK_EMAIL.to_string()),
        ])
    }
}

/// Parse the delay field of the feedback form
///
/// # Errors
///
/// Returns a user-facing message if the input is not a whole number
pub fn parse_delay_minutes(input: &str) -> Result<i32, String> {
    input
        .trim()
        .parse()
        .map_err(|_| "Please enter a valid number for delay minutes.".to_string())
}
