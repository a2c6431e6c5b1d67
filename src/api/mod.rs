//! Network access for data served with the app and the two write endpoints
//!
//! Every loader returns `Result<_, String>` and leaves the fallback policy to
//! the caller, except holidays, which degrade to an empty list.

pub mod config;
pub mod feedback;
pub mod holidays;
pub mod timetable;
pub mod verification;

/// GET a URL and return the body, failing on non-success status
///
/// # Errors
///
/// Returns an error if the request fails or the status is not 2xx
pub async fn fetch_text(url: &str) -> Result<String, String> {
    reqwest::get(url)
        .await
        .map_err(|e| format!("Request failed: {e}"))?
        .error_for_status()
        .map_err(|e| format!("Request failed: {e}"))?
        .text()
        .await
        .map_err(|e| format!("Failed to read response: {e}"))
}
