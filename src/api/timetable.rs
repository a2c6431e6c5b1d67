use crate::config::AppConfig;
use crate::models::{ServiceDay, Timetable};
use super::fetch_text;

/// Fetch and validate the timetable for a service day
///
/// # Errors
///
/// Returns an error if the resource cannot be retrieved or is not a valid timetable
pub async fn load_timetable(config: &AppConfig, day: ServiceDay) -> Result<Timetable, String> {
    let json = fetch_text(&config.data_url(day.file_name())).await?;
    Timetable::from_json(&json).map_err(|e| format!("{}: {e}", day.file_name()))
}
