use std::future::Future;
use crate::config::AppConfig;
use crate::models::{parse_holidays, Holiday};
use crate::storage::{load_cached_holidays, save_cached_holidays, Storage};
use crate::{log, log_warn};
use super::fetch_text;

/// Public holidays for `year`
///
/// Tries the local cache, then the holiday API, then the list bundled with
/// the app. A year that cannot be loaded from anywhere yields an empty list,
/// which is not cached so the next visit retries.
pub async fn load_holidays(config: &AppConfig, storage: &impl Storage, year: i32) -> Vec<Holiday> {
    load_holidays_with(config, storage, year, |url| async move { fetch_text(&url).await }).await
}

/// [`load_holidays`] with the HTTP GET supplied by the caller
pub async fn load_holidays_with<F, Fut>(config: &AppConfig, storage: &impl Storage, year: i32, fetch: F) -> Vec<Holiday>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<String, String>>,
{
    if let Some(cached) = load_cached_holidays(storage, year) {
        log!("Using cached holidays for {year}");
        return cached;
    }

    let from_api = match fetch(config.holiday_api_url(year)).await {
        Ok(body) => parse_holidays(&body),
        Err(e) => Err(e),
    };
    let holidays = match from_api {
        Ok(holidays) => holidays,
        Err(e) => {
            log_warn!("Holiday API unavailable for {year}: {e}");
            let fallback = match fetch(config.fallback_holidays_url(year)).await {
                Ok(body) => parse_holidays(&body),
                Err(e) => Err(e),
            };
            match fallback {
                Ok(holidays) => holidays,
                Err(e) => {
                    log_warn!("No holiday data for {year}, assuming none: {e}");
                    return Vec::new();
                }
            }
        }
    };

    log!("Loaded {} holidays for {year}", holidays.len());
    if let Err(e) = save_cached_holidays(storage, year, &holidays) {
        log_warn!("Failed to cache holidays: {e}");
    }
    holidays
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{holiday_cache_key, MemoryStorage};
    use chrono::NaiveDate;
    use std::cell::RefCell;

    const FALLBACK_2025: &str = r#"[{"date": "2025-03-26", "name": "Independence Day", "type": "Public"}]"#;

    fn config() -> AppConfig {
        AppConfig::default().with_origin("https://mrt.example.com")
    }

    #[tokio::test]
    async fn test_all_sources_failing_means_no_holidays() {
        let storage = MemoryStorage::new();
        let requested = RefCell::new(Vec::new());

        let holidays = load_holidays_with(&config(), &storage, 2025, |url| {
            requested.borrow_mut().push(url);
            async { Err("offline".to_string()) }
        })
        .await;

        assert!(holidays.is_empty());
        assert_eq!(requested.borrow().len(), 2);
        assert_eq!(storage.get(&holiday_cache_key(2025)).expect("readable"), None);
    }

    #[tokio::test]
    async fn test_fallback_file_used_and_cached() {
        let storage = MemoryStorage::new();
        let fallback_url = config().fallback_holidays_url(2025);

        let holidays = load_holidays_with(&config(), &storage, 2025, |url| {
            let body = if url == fallback_url {
                Ok(FALLBACK_2025.to_string())
            } else {
                Err("503 Service Unavailable".to_string())
            };
            async move { body }
        })
        .await;

        let expected = NaiveDate::from_ymd_opt(2025, 3, 26).expect("valid date");
        assert_eq!(holidays.len(), 1);
        assert_eq!(holidays[0].date, expected);
        assert_eq!(load_cached_holidays(&storage, 2025), Some(holidays));
    }

    #[tokio::test]
    async fn test_malformed_api_response_falls_back() {
        let storage = MemoryStorage::new();
        let holidays = load_holidays_with(&config(), &storage, 2025, |url| {
            let body = if url.contains("date.nager.at") {
                "<html>busy</html>".to_string()
            } else {
                FALLBACK_2025.to_string()
            };
            async move { Ok(body) }
        })
        .await;
        assert_eq!(holidays.len(), 1);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let storage = MemoryStorage::new();
        let cached = vec![Holiday::new(
            NaiveDate::from_ymd_opt(2025, 2, 21).expect("valid date"),
            "Language Martyrs' Day",
        )];
        save_cached_holidays(&storage, 2025, &cached).expect("write should succeed");
        let requested = RefCell::new(0);

        let holidays = load_holidays_with(&config(), &storage, 2025, |_| {
            *requested.borrow_mut() += 1;
            async { Err("offline".to_string()) }
        })
        .await;

        assert_eq!(holidays, cached);
        assert_eq!(*requested.borrow(), 0);
    }
}
