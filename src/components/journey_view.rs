use leptos::{
    component, create_local_resource, create_memo, view, IntoView, SignalGet, SignalGetUntracked, SignalWith,
};
use leptos_router::{use_location, A};
use std::rc::Rc;
use crate::api::timetable::load_timetable;
use crate::models::{JourneyLink, Timetable};
use crate::state::use_app_state;
use crate::time::format_hhmm;
use crate::train_journey::TrainJourney;
use crate::log_warn;

/// Detail page for one train, opened from a departure board link
#[component]
#[must_use]
pub fn JourneyView() -> impl IntoView {
    let state = use_app_state();
    let location = use_location();
    let link = create_memo(move |_| JourneyLink::from_query(&location.search.get()));

    let timetable = create_local_resource(
        move || link.with(|link| link.as_ref().ok().map(|link| link.service_day)),
        move |day| async move {
            let day = day?;
            let config = state.config.get_untracked();
            match load_timetable(&config, day).await {
                Ok(timetable) => Some(Rc::new(timetable)),
                Err(e) => {
                    log_warn!("Timetable unavailable: {e}");
                    None
                }
            }
        },
    );

    let journey = create_memo(move |_| -> Option<Result<TrainJourney, String>> {
        let link = match link.get() {
            Ok(link) => link,
            Err(e) => return Some(Err(format!("Error: {e}."))),
        };
        let timetable: Rc<Timetable> = match timetable.get()? {
            Some(timetable) => timetable,
            None => return Some(Err("Schedule could not be loaded.".to_string())),
        };
        Some(
            TrainJourney::trace(&timetable, link.station, link.direction, link.time)
                .map_err(|e| format!("{e}.")),
        )
    });

    view! {
        <div class="journey-view">
            <A href="/" class="back-link">"← Back"</A>
            {move || link.get().ok().map(|link| view! {
                <h1>{format!("Train to {}", link.direction.name())}</h1>
                <p class="journey-subtitle">
                    {format!("Selected from {} at {}", link.station.name(), format_hhmm(link.time))}
                </p>
            })}
            {move || journey.with(|journey| match journey {
                None => view! { <p class="journey-loading">"Loading schedule..."</p> }.into_view(),
                Some(Err(message)) => view! { <p class="journey-error">{message.clone()}</p> }.into_view(),
                Some(Ok(journey)) => {
                    let journey = journey.clone();
                    view! {
                        <ol class="journey-timeline">
                            {move || {
                                let statuses = journey.timeline(state.now().time());
                                journey.stops.iter().zip(statuses).map(|(stop, status)| view! {
                                    <li class=format!("timeline-stop {}", status.css_class())>
                                        <span class="stop-time">{format_hhmm(stop.time)}</span>
                                        <span class="stop-name">{stop.station.name()}</span>
                                        <span class="stop-status">{status.label()}</span>
                                    </li>
                                }).collect::<Vec<_>>()
                            }}
                        </ol>
                    }.into_view()
                }
            })}
        </div>
    }
}
