use crate::config::AppConfig;
use crate::models::DelayReport;

/// Send a delay report to the feedback relay
///
/// # Errors
///
/// Returns an error if the report cannot be encoded or the relay rejects it
pub async fn submit_delay_report(config: &AppConfig, report: &DelayReport) -> Result<(), String> {
    let fields = report.form_fields()?;
    reqwest::Client::new()
        .post(&config.feedback_endpoint)
        .form(&fields)
        .send()
        .await
        .map_err(|e| format!("Request failed: {e}"))?
        .error_for_status()
        .map_err(|e| format!("Feedback rejected: {e}"))?;
    Ok(())
}
