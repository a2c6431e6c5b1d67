use chrono::{DateTime, Utc};
use crate::config::AppConfig;
use crate::constants::{VERIFICATION_EVENT_TYPE, VERIFIED_TIMES_FILE};
use crate::models::{DispatchPayload, DispatchRequest, VerificationRecord, VerifiedTimesFile};
use crate::storage::{store_pending, Storage};
use crate::{log, log_error, log_warn};
use super::fetch_text;

/// Result of sending a verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The central file will be updated
    Submitted,
    /// The trigger failed; the record is kept on this device
    StoredLocally,
    /// The trigger failed and the record could not be kept either
    Lost,
}

/// URL of the central file with a cache-busting timestamp
#[must_use]
pub fn verified_times_url(config: &AppConfig, now: DateTime<Utc>) -> String {
    format!("{}?t={}", config.data_url(VERIFIED_TIMES_FILE), now.timestamp_millis())
}

/// Fetch the central verification file, bypassing caches
///
/// # Errors
///
/// Returns an error if the file cannot be retrieved or parsed
pub async fn load_verified_times(config: &AppConfig) -> Result<VerifiedTimesFile, String> {
    let file = VerifiedTimesFile::from_json(&fetch_text(&verified_times_url(config, Utc::now())).await?)?;
    log!("Loaded {} verified times", file.verified_times.len());
    Ok(file)
}

async fn dispatch(config: &AppConfig, payload: DispatchPayload) -> Result<(), String> {
    let request = DispatchRequest {
        event_type: VERIFICATION_EVENT_TYPE.to_string(),
        client_payload: payload,
    };
    reqwest::Client::new()
        .post(config.dispatch_url())
        .header("Accept", "application/vnd.github.v3+json")
        .json(&request)
        .send()
        .await
        .map_err(|e| format!("Request failed: {e}"))?
        .error_for_status()
        .map_err(|e| format!("Failed to submit verification: {e}"))?;
    Ok(())
}

/// Submit a verification, keeping it locally when the trigger fails
pub async fn submit_verification(config: &AppConfig, storage: &impl Storage, record: VerificationRecord) -> SubmitOutcome {
    let now = Utc::now();
    match dispatch(config, DispatchPayload::verification(record.clone(), now)).await {
        Ok(()) => {
            log!("Verification {} submitted", record.time_id);
            SubmitOutcome::Submitted
        }
        Err(e) => {
            log_warn!("Error submitting verification: {e}");
            match store_pending(storage, record, now) {
                Ok(_) => SubmitOutcome::StoredLocally,
                Err(e) => {
                    log_error!("Failed to store verification locally: {e}");
                    SubmitOutcome::Lost
                }
            }
        }
    }
}

/// Ask the automation to empty the central file
///
/// # Errors
///
/// Returns an error if the trigger fails
pub async fn clear_all_verifications(config: &AppConfig) -> Result<(), String> {
    dispatch(config, DispatchPayload::clear_all(Utc::now())).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_verified_times_url_is_cache_busted() {
        let config = AppConfig::default().with_origin("https://mrt.example.com");
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).single().expect("valid instant");
        assert_eq!(
            verified_times_url(&config, at),
            format!("https://mrt.example.com/verified-times.json?t={}", at.timestamp_millis())
        );
    }
}
