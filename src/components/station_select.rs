use leptos::{component, event_target_value, view, IntoView, Signal, SignalGet, WriteSignal, SignalSet};
use crate::models::Station;

#[component]
#[must_use]
pub fn StationSelect(
    #[prop(into)] selected: Signal<Option<Station>>,
    set_selected: WriteSignal<Option<Station>>,
) -> impl IntoView {
    view! {
        <div class="station-select">
            <label for="station-select">"Select a station"</label>
            <select
                id="station-select"
                prop:value=move || selected.get().map_or("", Station::name)
                on:change=move |ev| set_selected.set(event_target_value(&ev).parse().ok())
            >
                <option value="">"Select a station"</option>
                {Station::ALL.iter().map(|station| view! {
                    <option value=station.name()>{station.name()}</option>
                }).collect::<Vec<_>>()}
            </select>
        </div>
    }
}
