mod memory;

#[cfg(target_arch = "wasm32")]
mod browser;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserStorage;
pub use memory::MemoryStorage;

/// Storage backing this build: `localStorage` in the browser, memory elsewhere
#[cfg(target_arch = "wasm32")]
pub type DeviceStorage = BrowserStorage;
#[cfg(not(target_arch = "wasm32"))]
pub type DeviceStorage = MemoryStorage;

use chrono::{DateTime, Utc};
use crate::constants::{HOLIDAY_CACHE_PREFIX, PENDING_VERIFICATIONS_KEY};
use crate::models::{add_pending, parse_holidays, parse_pending, Holiday, PendingVerifications, VerificationRecord};

/// Key-value store for the small amount of state kept on the device
pub trait Storage {
    /// Read a value, `None` if the key was never written
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable
    fn get(&self, key: &str) -> Result<Option<String>, String>;

    /// Write a value, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable or full
    fn set(&self, key: &str, value: &str) -> Result<(), String>;

    /// Remove a key; removing a missing key is not an error
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable
    fn remove(&self, key: &str) -> Result<(), String>;
}

#[must_use]
pub fn holiday_cache_key(year: i32) -> String {
    format!("{HOLIDAY_CACHE_PREFIX}{year}")
}

/// Holidays cached for `year`, `None` if absent or unreadable
pub fn load_cached_holidays(storage: &impl Storage, year: i32) -> Option<Vec<Holiday>> {
    let raw = storage.get(&holiday_cache_key(year)).ok()??;
    parse_holidays(&raw).ok()
}

/// Cache a year's holiday list
///
/// # Errors
///
/// Returns an error if the list cannot be serialized or written
pub fn save_cached_holidays(storage: &impl Storage, year: i32, holidays: &[Holiday]) -> Result<(), String> {
    let json = serde_json::to_string(holidays).map_err(|e| format!("Failed to serialize holidays: {e}"))?;
    storage.set(&holiday_cache_key(year), &json)
}

/// Verifications that have not reached the central file yet
#[must_use]
pub fn load_pending(storage: &impl Storage) -> PendingVerifications {
    parse_pending(storage.get(PENDING_VERIFICATIONS_KEY).ok().flatten().as_deref())
}

/// Keep a record that failed to submit
///
/// # Errors
///
/// Returns an error if the updated list cannot be written
pub fn store_pending(storage: &impl Storage, record: VerificationRecord, now: DateTime<Utc>) -> Result<PendingVerifications, String> {
    let mut pending = load_pending(storage);
    add_pending(&mut pending, record, now);
    let json = serde_json::to_string(&pending).map_err(|e| format!("Failed to serialize pending verifications: {e}"))?;
    storage.set(PENDING_VERIFICATIONS_KEY, &json)?;
    Ok(pending)
}

/// Drop every locally pending record
///
/// # Errors
///
/// Returns an error if the backend is unavailable
pub fn clear_pending(storage: &impl Storage) -> Result<(), String> {
    storage.remove(PENDING_VERIFICATIONS_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, Station};
    use chrono::{NaiveDate, NaiveTime, TimeZone};

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 3, 0, 0).single().expect("valid instant")
    }

    #[test]
    fn test_holiday_cache_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(load_cached_holidays(&storage, 2025), None);

        let holidays = vec![Holiday::new(
            NaiveDate::from_ymd_opt(2025, 2, 21).expect("valid date"),
            "Language Martyrs' Day",
        )];
        save_cached_holidays(&storage, 2025, &holidays).expect("write should succeed");

        assert_eq!(load_cached_holidays(&storage, 2025), Some(holidays));
        assert_eq!(load_cached_holidays(&storage, 2026), None);
        assert!(storage.get("bd_holidays_2025").expect("readable").is_some());
    }

    #[test]
    fn test_corrupt_holiday_cache_is_ignored() {
        let storage = MemoryStorage::new();
        storage.set("bd_holidays_2025", "not json").expect("write should succeed");
        assert_eq!(load_cached_holidays(&storage, 2025), None);
    }

    #[test]
    fn test_pending_accumulates_and_clears() {
        let storage = MemoryStorage::new();
        let time = NaiveTime::from_hms_opt(8, 15, 0).expect("valid time");

        let first = VerificationRecord::correct(Station::Mirpur10, Direction::Motijheel, time, instant());
        let second = VerificationRecord::correct(Station::Farmgate, Direction::UttaraNorth, time, instant());
        store_pending(&storage, first, instant()).expect("write should succeed");
        let pending = store_pending(&storage, second, instant()).expect("write should succeed");

        assert_eq!(pending.len(), 2);
        assert_eq!(load_pending(&storage), pending);
        assert!(pending.contains_key("Mirpur10-Platform1-Motijheel-0815"));

        clear_pending(&storage).expect("remove should succeed");
        assert!(load_pending(&storage).is_empty());
    }
}
