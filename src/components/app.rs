use leptos::{
    component, create_effect, create_memo, create_signal, spawn_local, view, IntoView, SignalGet, SignalSet,
    SignalWith,
};
use leptos_meta::{provide_meta_context, Stylesheet, Title};
use leptos_router::{Route, Router, Routes, A};
use leptos_use::use_interval_fn;
use crate::api::config::load_app_config;
use crate::components::{
    admin_panel::AdminPanel, clock_display::ClockDisplay, departure_board::DepartureBoard,
    journey_view::JourneyView, station_select::StationSelect, toast::ToastNotification, train_map::TrainMap,
};
use crate::config::AppConfig;
use crate::constants::TICK_INTERVAL_MS;
use crate::models::Station;
use crate::state::{provide_app_state, use_app_state};

fn page_origin() -> String {
    web_sys::window()
        .and_then(|window| window.location().origin().ok())
        .unwrap_or_default()
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let origin = page_origin();
    let state = provide_app_state(AppConfig::default().with_origin(&origin));

    spawn_local(async move {
        let config = load_app_config(&origin).await;
        state.config.set(config);
    });

    let _ = use_interval_fn(
        move || {
            state.tick();
            state.ensure_holidays();
        },
        TICK_INTERVAL_MS,
    );
    state.ensure_holidays();

    // Reload whenever the effective day's timetable variant or the data source changes
    let service_day = create_memo(move |_| state.service_day());
    create_effect(move |_| {
        state.config.with(|_| ());
        state.refresh_timetable(service_day.get());
    });

    let verified_interval = create_memo(move |_| state.config.with(|config| config.verified_refresh_interval_ms));
    create_effect(move |_| {
        state.config.with(|_| ());
        state.refresh_verified_times();
    });
    let _ = use_interval_fn(move || state.refresh_verified_times(), verified_interval);

    view! {
        <Stylesheet id="leptos" href="/pkg/mrt_timetable.css"/>
        <Title text="Dhaka MRT Line 6 Timetable"/>

        <Router>
            <div class="app">
                <header class="app-header">
                    <h1>"Dhaka MRT Line 6"</h1>
                    <nav>
                        <A href="/" exact=true>"Timetable"</A>
                        <A href="/map">"Live map"</A>
                    </nav>
                    <ClockDisplay />
                </header>
                <main>
                    <Routes>
                        <Route path="/" view=HomePage />
                        <Route path="/journey" view=JourneyView />
                        <Route path="/map" view=TrainMap />
                    </Routes>
                </main>
                <ToastNotification toast=state.toast />
            </div>
        </Router>
    }
}

#[component]
fn HomePage() -> impl IntoView {
    let state = use_app_state();
    let (station, set_station) = create_signal(None::<Station>);

    view! {
        <div class="home">
            <StationSelect selected=station set_selected=set_station />
            {move || state.show_all.get().then(|| view! {
                <p class="show-all-note">"Showing all trains"</p>
            })}
            <DepartureBoard station=station />
            <AdminPanel />
        </div>
    }
}
