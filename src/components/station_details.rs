use leptos::{component, view, IntoView};
use std::rc::Rc;
use crate::models::{Direction, Station, Timetable};
use crate::schedule::{station_departures, station_summary};
use crate::time::format_hhmm;

/// Operating hours, location and nearby departures of one station
#[component]
#[must_use]
pub fn StationDetails(station: Station, timetable: Rc<Timetable>, now: chrono::NaiveTime) -> impl IntoView {
    let summary = station_summary(&timetable, station);

    view! {
        <div class="station-details">
            <ul class="service-hours">
                {summary.into_iter().map(|span| view! {
                    <li>
                        <span class="service-direction">{format!("To {}", span.direction.name())}</span>
                        <span class="service-span">{span.describe()}</span>
                    </li>
                }).collect::<Vec<_>>()}
            </ul>
            <a class="maps-link" href=station.maps_url() target="_blank" rel="noopener">"Open in Google Maps"</a>
            <div class="station-departures">
                {Direction::ALL.iter().map(|direction| {
                    let rows = station_departures(&timetable, station, *direction, now);
                    view! {
                        <div class="departure-column">
                            <h4>{format!("To {}", direction.name())}</h4>
                            {if rows.is_empty() {
                                view! { <p class="no-trains">"No service"</p> }.into_view()
                            } else {
                                view! {
                                    <ul>
                                        {rows.into_iter().map(|(time, status)| view! {
                                            <li class=status.map_or("departure", |_| "departure labelled")>
                                                <span>{format_hhmm(time)}</span>
                                                {status.map(|status| view! {
                                                    <span class="departure-status">{status.label()}</span>
                                                })}
                                            </li>
                                        }).collect::<Vec<_>>()}
                                    </ul>
                                }.into_view()
                            }}
                        </div>
                    }
                }).collect::<Vec<_>>()}
            </div>
        </div>
    }
}
