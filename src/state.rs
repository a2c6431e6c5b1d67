use chrono::{Datelike, NaiveDateTime};
use leptos::{
    create_rw_signal, expect_context, provide_context, spawn_local, store_value, RwSignal, SignalGet,
    SignalGetUntracked, SignalSet, SignalUpdate, SignalWith, SignalWithUntracked, StoredValue,
};
use std::cell::Cell;
use std::rc::Rc;
use crate::api;
use crate::clock::{system_now, Clock};
use crate::components::toast::Toast;
use crate::config::AppConfig;
use crate::models::{
    HolidayCalendar, PendingVerifications, ServiceDay, Timetable, VerifiedSet, VerifiedTimesFile,
};
use crate::storage::{load_pending, DeviceStorage};
use crate::{log, log_warn};

const TOAST_DURATION_MS: u32 = 3000;

/// Tags fetches so that only the most recently started one is applied
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: Cell<u64>,
}

impl RequestSequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request, superseding every earlier one
    pub fn begin(&self) -> u64 {
        let ticket = self.latest.get() + 1;
        self.latest.set(ticket);
        ticket
    }

    #[must_use]
    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest.get() == ticket
    }
}

/// Shared UI state, provided as context at the app root
#[derive(Clone, Copy)]
pub struct AppState {
    pub config: RwSignal<AppConfig>,
    pub clock: RwSignal<Clock>,
    /// Last system time sampled by the tick
    pub system_now: RwSignal<NaiveDateTime>,
    pub holidays: RwSignal<HolidayCalendar>,
    /// Last successfully loaded timetable and the day it belongs to
    pub timetable: RwSignal<Option<(ServiceDay, Rc<Timetable>)>>,
    pub verified_file: RwSignal<VerifiedTimesFile>,
    pub pending: RwSignal<PendingVerifications>,
    pub show_all: RwSignal<bool>,
    pub admin_unlocked: RwSignal<bool>,
    pub toast: RwSignal<Toast>,
    timetable_requests: StoredValue<RequestSequence>,
    toast_requests: StoredValue<RequestSequence>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: create_rw_signal(config),
            clock: create_rw_signal(Clock::new()),
            system_now: create_rw_signal(system_now()),
            holidays: create_rw_signal(HolidayCalendar::new()),
            timetable: create_rw_signal(None),
            verified_file: create_rw_signal(VerifiedTimesFile::default()),
            pending: create_rw_signal(PendingVerifications::new()),
            show_all: create_rw_signal(false),
            admin_unlocked: create_rw_signal(false),
            toast: create_rw_signal(Toast::default()),
            timetable_requests: store_value(RequestSequence::new()),
            toast_requests: store_value(RequestSequence::new()),
        }
    }

    /// The effective "now", honouring any admin override
    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        let system_now = self.system_now.get();
        self.clock.with(|clock| clock.now(system_now))
    }

    pub fn tick(&self) {
        self.system_now.set(system_now());
    }

    /// Timetable variant for the effective date
    #[must_use]
    pub fn service_day(&self) -> ServiceDay {
        let date = self.now().date();
        let is_holiday = self.holidays.with(|calendar| calendar.is_public_holiday(date));
        ServiceDay::resolve(date, is_holiday)
    }

    #[must_use]
    pub fn current_timetable(&self) -> Option<Rc<Timetable>> {
        self.timetable.with(|loaded| loaded.as_ref().map(|(_, timetable)| Rc::clone(timetable)))
    }

    /// Day of the timetable currently shown, which lags `service_day` while a fetch runs
    #[must_use]
    pub fn loaded_day(&self) -> Option<ServiceDay> {
        self.timetable.with(|loaded| loaded.as_ref().map(|(day, _)| *day))
    }

    #[must_use]
    pub fn verified(&self) -> VerifiedSet {
        let pending = self.pending.get();
        self.verified_file.with(|file| VerifiedSet::new(file, &pending))
    }

    /// Fetch the timetable for `day`
    ///
    /// On failure the previous timetable stays in place. A fetch that
    /// completes after a newer one was started is discarded.
    pub fn refresh_timetable(&self, day: ServiceDay) {
        let ticket = self.timetable_requests.with_value(RequestSequence::begin);
        let state = *self;
        spawn_local(async move {
            let config = state.config.get_untracked();
            let result = api::timetable::load_timetable(&config, day).await;
            let mut loaded = state.timetable.get_untracked();
            let applied = state
                .timetable_requests
                .with_value(|requests| apply_timetable_result(&mut loaded, requests, ticket, day, result));
            if applied {
                state.timetable.set(loaded);
            }
        });
    }

    /// Load the holiday list for the effective year if it is not known yet
    pub fn ensure_holidays(&self) {
        let year = self.now().year();
        if self.holidays.with_untracked(|calendar| calendar.has_year(year)) {
            return;
        }
        // Mark the year as known so ticks do not start more fetches while this one runs
        self.holidays.update(|calendar| calendar.insert_year(year, Vec::new()));

        let state = *self;
        spawn_local(async move {
            let config = state.config.get_untracked();
            let holidays = api::holidays::load_holidays(&config, &DeviceStorage::new(), year).await;
            state.holidays.update(|calendar| calendar.insert_year(year, holidays));
        });
    }

    pub fn refresh_verified_times(&self) {
        let state = *self;
        spawn_local(async move {
            let config = state.config.get_untracked();
            match api::verification::load_verified_times(&config).await {
                Ok(file) => state.verified_file.set(file),
                Err(e) => log_warn!("Verified times unavailable: {e}"),
            }
        });
        self.reload_pending();
    }

    pub fn reload_pending(&self) {
        self.pending.set(load_pending(&DeviceStorage::new()));
    }

    /// Show a message at the bottom of the screen for a few seconds
    pub fn show_toast(&self, message: impl Into<String>) {
        let ticket = self.toast_requests.with_value(RequestSequence::begin);
        self.toast.set(Toast::new(message.into()));

        let state = *self;
        spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(TOAST_DURATION_MS).await;
            if state.toast_requests.with_value(|requests| requests.is_current(ticket)) {
                state.toast.update(|toast| toast.visible = false);
            }
        });
    }
}

/// Fold a finished timetable fetch into the loaded snapshot
///
/// Returns whether `loaded` changed. Results of superseded requests and
/// failed fetches leave it untouched.
pub fn apply_timetable_result(
    loaded: &mut Option<(ServiceDay, Rc<Timetable>)>,
    requests: &RequestSequence,
    ticket: u64,
    day: ServiceDay,
    result: Result<Timetable, String>,
) -> bool {
    if !requests.is_current(ticket) {
        log!("Discarding superseded timetable fetch for {}", day.file_name());
        return false;
    }
    match result {
        Ok(timetable) => {
            log!("Loaded {} ({} stations)", day.file_name(), timetable.stations().count());
            *loaded = Some((day, Rc::new(timetable)));
            true
        }
        Err(e) => {
            log_warn!("Timetable unavailable, keeping previous data: {e}");
            false
        }
    }
}

pub fn provide_app_state(config: AppConfig) -> AppState {
    let state = AppState::new(config);
    provide_context(state);
    state
}

#[must_use]
pub fn use_app_state() -> AppState {
    expect_context::<AppState>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_request_supersedes_earlier() {
        let requests = RequestSequence::new();
        let first = requests.begin();
        assert!(requests.is_current(first));

        let second = requests.begin();
        assert!(!requests.is_current(first));
        assert!(requests.is_current(second));
    }

    fn timetable(json: &str) -> Timetable {
        Timetable::from_json(json).expect("valid timetable")
    }

    #[test]
    fn test_successful_fetch_replaces_snapshot() {
        let requests = RequestSequence::new();
        let ticket = requests.begin();
        let mut loaded = None;

        let fetched = timetable(r#"{"Uttara North": {"Motijheel": ["06:00"]}}"#);
        assert!(apply_timetable_result(&mut loaded, &requests, ticket, ServiceDay::Friday, Ok(fetched.clone())));

        let (day, snapshot) = loaded.expect("snapshot loaded");
        assert_eq!(day, ServiceDay::Friday);
        assert_eq!(*snapshot, fetched);
    }

    #[test]
    fn test_failed_fetch_keeps_previous_timetable() {
        let requests = RequestSequence::new();
        let previous = Rc::new(timetable(r#"{"Uttara North": {"Motijheel": ["06:00"]}}"#));
        let mut loaded = Some((ServiceDay::Weekday, Rc::clone(&previous)));

        let ticket = requests.begin();
        let applied = apply_timetable_result(
            &mut loaded,
            &requests,
            ticket,
            ServiceDay::Saturday,
            Err("Request failed: 404".to_string()),
        );

        assert!(!applied);
        let (day, snapshot) = loaded.expect("previous snapshot kept");
        assert_eq!(day, ServiceDay::Weekday);
        assert!(Rc::ptr_eq(&snapshot, &previous));
    }

    #[test]
    fn test_superseded_fetch_is_discarded() {
        let requests = RequestSequence::new();
        let mut loaded = None;

        let slow = requests.begin();
        let fast = requests.begin();
        let newer = timetable(r#"{"Motijheel": {"Uttara North": ["07:30"]}}"#);
        assert!(apply_timetable_result(&mut loaded, &requests, fast, ServiceDay::Saturday, Ok(newer.clone())));

        let older = timetable(r#"{"Uttara North": {"Motijheel": ["06:00"]}}"#);
        assert!(!apply_timetable_result(&mut loaded, &requests, slow, ServiceDay::Weekday, Ok(older)));

        let (day, snapshot) = loaded.expect("newer snapshot kept");
        assert_eq!(day, ServiceDay::Saturday);
        assert_eq!(*snapshot, newer);
    }
}
