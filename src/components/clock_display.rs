use chrono::Datelike;
use leptos::{component, view, IntoView, SignalWith};
use crate::models::day_name;
use crate::state::use_app_state;
use crate::time::format_hms;

#[component]
#[must_use]
pub fn ClockDisplay() -> impl IntoView {
    let state = use_app_state();

    let badge = move || {
        state.clock.with(|clock| {
            if clock.is_paused() {
                Some("Paused")
            } else if clock.is_overridden() {
                Some("Admin time")
            } else {
                None
            }
        })
    };

    let holiday = move || {
        let date = state.now().date();
        state
            .holidays
            .with(|calendar| calendar.holiday_name(date).map(str::to_string))
    };

    view! {
        <div class="clock">
            <div class="clock-time">
                {move || format_hms(state.now().time())}
                {move || badge().map(|text| view! { <span class="clock-badge">{text}</span> })}
            </div>
            <div class="clock-date">
                {move || {
                    let now = state.now();
                    format!("{}, {}", day_name(now.weekday()), now.format("%-d %B %Y"))
                }}
            </div>
            <div class="clock-schedule">
                {move || format!("{} schedule", state.service_day().label())}
                {move || holiday().map(|name| view! { <span class="holiday-name">{format!(" ({name})")}</span> })}
            </div>
        </div>
    }
}
