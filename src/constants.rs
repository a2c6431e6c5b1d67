use chrono::NaiveDate;
use chrono_tz::Tz;

/// Wall-clock zone the timetable is published in
pub const LOCAL_TZ: Tz = chrono_tz::Asia::Dhaka;

/// Number of trains shown per platform in the default board view
pub const DEFAULT_UPCOMING_LIMIT: usize = 3;

/// Seconds after a train's scheduled minute begins during which it is shown as leaving
pub const LEAVING_WINDOW_SECONDS: u32 = 30;

/// Minutes ahead of now at which a train is announced as arriving
pub const ARRIVING_LEAD_MINUTES: i64 = 1;

/// Live map: minutes before a stop's scheduled time in which a train is arriving
pub const MAP_ARRIVAL_WINDOW_MINUTES: f64 = 1.0;

/// Live map: minutes after a stop's scheduled time in which a train is departing (~15s)
pub const MAP_DEPARTURE_WINDOW_MINUTES: f64 = 0.25;

/// Clock tick period
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Minimum age of the cached map timetable before it is fetched again
pub const MAP_REFETCH_INTERVAL_MS: u64 = 60_000;

/// Date treated as a public holiday regardless of what the holiday source reports
pub const HARDCODED_HOLIDAY: NaiveDate = match NaiveDate::from_ymd_opt(2025, 4, 1) {
    Some(date) => date,
    None => panic!("Invalid hardcoded holiday"),
};

/// Name reported for `HARDCODED_HOLIDAY` when it is merged into a holiday list
pub const HARDCODED_HOLIDAY_NAME: &str = "Eid ul-Fitr Holiday";

/// Local storage key under which verifications that failed to submit are kept
pub const PENDING_VERIFICATIONS_KEY: &str = "pendingVerifications";

/// Local storage key prefix for the per-year holiday cache
pub const HOLIDAY_CACHE_PREFIX: &str = "bd_holidays_";

/// Central verification file served next to the app
pub const VERIFIED_TIMES_FILE: &str = "verified-times.json";

/// Repository dispatch event that appends to the verification file
pub const VERIFICATION_EVENT_TYPE: &str = "update-verified-times";
