use leptos::{
    component, create_effect, create_memo, create_node_ref, create_signal, html::Canvas, view, IntoView, Memo,
    Signal, SignalGet, SignalGetUntracked, SignalSet, SignalWith, SignalWithUntracked,
};
use leptos_use::use_interval_fn;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, MouseEvent};
use crate::components::modal_overlay::ModalOverlay;
use crate::components::station_details::StationDetails;
use crate::constants::MAP_REFETCH_INTERVAL_MS;
use crate::map_layout::{
    display_stops, hit_test, stop_point, total_height, train_point, MapHit, MapStop, STATION_RADIUS, TOP_MARGIN,
    TRACK_X, TRAIN_RADIUS,
};
use crate::models::{Direction, DirectionFilter, Station};
use crate::state::use_app_state;
use crate::time::format_hhmm;
use crate::train_journey::{live_trains, LiveTrain};

const CANVAS_WIDTH: f64 = 320.0;
const TRACK_COLOR: &str = "#1a7f37";
const TRACK_WIDTH: f64 = 6.0;
const CONSTRUCTION_COLOR: &str = "#9ca3af";
const STATION_FILL: &str = "#fff";
const LABEL_COLOR: &str = "#1f2937";
const LABEL_FONT: &str = "13px sans-serif";
const LABEL_OFFSET: f64 = 32.0;
const TO_MOTIJHEEL_COLOR: &str = "#dc2626";
const TO_UTTARA_COLOR: &str = "#2563eb";

const fn direction_color(direction: Direction) -> &'static str {
    match direction {
        Direction::Motijheel => TO_MOTIJHEEL_COLOR,
        Direction::UttaraNorth => TO_UTTARA_COLOR,
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Selection {
    Train(LiveTrain),
    Station(Station),
}

/// Schematic of the line with every running train
#[component]
#[must_use]
pub fn TrainMap() -> impl IntoView {
    let state = use_app_state();
    let (filter, set_filter) = create_signal(DirectionFilter::All);
    let (selection, set_selection) = create_signal(None::<Selection>);
    let canvas_ref = create_node_ref::<Canvas>();

    let _ = use_interval_fn(move || state.refresh_timetable(state.service_day()), MAP_REFETCH_INTERVAL_MS);

    let trains = create_memo(move |_| {
        let Some(timetable) = state.current_timetable() else {
            return Vec::new();
        };
        let now = state.now().time();
        let filter = filter.get();
        Direction::ALL
            .iter()
            .filter(|direction| filter.includes(**direction))
            .flat_map(|direction| live_trains(&timetable, *direction, now))
            .collect::<Vec<_>>()
    });

    create_effect(move |_| {
        trains.with(|trains| {
            if let Some(canvas) = canvas_ref.get() {
                draw_map(&canvas, trains);
            }
        });
    });

    let on_click = move |ev: MouseEvent| {
        let x = f64::from(ev.offset_x());
        let y = f64::from(ev.offset_y());
        let hit = trains.with_untracked(|trains| {
            hit_test(x, y, trains).and_then(|hit| match hit {
                MapHit::Train(idx) => trains.get(idx).cloned().map(Selection::Train),
                MapHit::Stop(idx) => match display_stops().get(idx) {
                    Some(MapStop::Station(station)) => Some(Selection::Station(*station)),
                    _ => None,
                },
            })
        });
        if hit.is_some() {
            set_selection.set(hit);
        }
    };

    let filter_button = move |target: DirectionFilter, label: &'static str| {
        view! {
            <button
                class=move || if filter.get() == target { "filter-button active" } else { "filter-button" }
                on:click=move |_| set_filter.set(match target {
                    DirectionFilter::All => DirectionFilter::All,
                    DirectionFilter::Only(direction) => filter.get_untracked().toggle(direction),
                })
            >
                {label}
            </button>
        }
    };

    view! {
        <div class="train-map">
            <div class="map-filters">
                {filter_button(DirectionFilter::All, "All trains")}
                {filter_button(DirectionFilter::Only(Direction::Motijheel), "To Motijheel")}
                {filter_button(DirectionFilter::Only(Direction::UttaraNorth), "To Uttara North")}
            </div>
            <p class="map-count">{move || format!("{} trains running", trains.with(Vec::len))}</p>
            <canvas
                node_ref=canvas_ref
                width=CANVAS_WIDTH
                height=total_height() + TOP_MARGIN
                on:click=on_click
            ></canvas>
            <SelectionModal selection=selection on_close=move |()| set_selection.set(None) trains=trains />
        </div>
    }
}

#[component]
fn SelectionModal(
    selection: leptos::ReadSignal<Option<Selection>>,
    #[prop(into)] on_close: leptos::Callback<()>,
    trains: Memo<Vec<LiveTrain>>,
) -> impl IntoView {
    let state = use_app_state();

    let title = Signal::derive(move || match selection.get() {
        Some(Selection::Train(train)) => format!("Train to {}", train.journey.direction.name()),
        Some(Selection::Station(station)) => station.name().to_string(),
        None => String::new(),
    });

    // Follow the selected train as the clock moves
    let live_selection = move || {
        selection.get().map(|selected| match selected {
            Selection::Train(train) => trains
                .with(|trains| {
                    trains
                        .iter()
                        .find(|t| t.journey.direction == train.journey.direction && t.journey.train_index == train.journey.train_index)
                        .cloned()
                })
                .map_or(Selection::Train(train), Selection::Train),
            station @ Selection::Station(_) => station,
        })
    };

    view! {
        <ModalOverlay is_open=Signal::derive(move || selection.get().is_some()) title=title on_close=on_close>
            {move || match live_selection() {
                Some(Selection::Train(train)) => {
                    let next = train.next_stop().copied();
                    view! {
                        <dl class="train-details">
                            <dt>"Direction"</dt>
                            <dd>{format!("To {}", train.journey.direction.name())}</dd>
                            <dt>"Next station"</dt>
                            <dd>{next.map_or_else(|| "-".to_string(), |stop| stop.station.name().to_string())}</dd>
                            <dt>"Arrival"</dt>
                            <dd>{next.map_or_else(|| "-".to_string(), |stop| format_hhmm(stop.time))}</dd>
                            <dt>"Progress"</dt>
                            <dd>{format!("{:.0}%", train.progress() * 100.0)}</dd>
                        </dl>
                    }.into_view()
                }
                Some(Selection::Station(station)) => state.current_timetable().map_or_else(
                    || view! { <p>"Schedule not loaded"</p> }.into_view(),
                    |timetable| view! {
                        <StationDetails station=station timetable=timetable now=state.now().time() />
                    }.into_view(),
                ),
                None => ().into_view(),
            }}
        </ModalOverlay>
    }
}

fn draw_map(canvas: &web_sys::HtmlCanvasElement, trains: &[LiveTrain]) {
    let Some(ctx) = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
    else {
        return;
    };

    ctx.clear_rect(0.0, 0.0, f64::from(canvas.width()), f64::from(canvas.height()));

    let stops = display_stops();
    let last_station = stops.iter().rposition(|stop| matches!(stop, MapStop::Station(_))).unwrap_or(0);

    // Operating track, then the dashed extension under construction
    let (_, top) = stop_point(0);
    let (_, operating_end) = stop_point(last_station);
    let (_, construction_end) = stop_point(stops.len() - 1);
    ctx.set_line_width(TRACK_WIDTH);
    ctx.set_stroke_style_str(TRACK_COLOR);
    ctx.begin_path();
    ctx.move_to(TRACK_X, top);
    ctx.line_to(TRACK_X, operating_end);
    ctx.stroke();

    ctx.set_stroke_style_str(CONSTRUCTION_COLOR);
    let _ = ctx.set_line_dash(&js_sys::Array::of2(&6.0.into(), &6.0.into()));
    ctx.begin_path();
    ctx.move_to(TRACK_X, operating_end);
    ctx.line_to(TRACK_X, construction_end);
    ctx.stroke();
    let _ = ctx.set_line_dash(&js_sys::Array::new());

    ctx.set_font(LABEL_FONT);
    ctx.set_line_width(2.0);
    for (idx, stop) in stops.iter().enumerate() {
        let (x, y) = stop_point(idx);
        let outline = match stop {
            MapStop::Station(_) => TRACK_COLOR,
            MapStop::UnderConstruction(_) => CONSTRUCTION_COLOR,
        };
        ctx.set_fill_style_str(STATION_FILL);
        ctx.set_stroke_style_str(outline);
        ctx.begin_path();
        let _ = ctx.arc(x, y, STATION_RADIUS, 0.0, std::f64::consts::PI * 2.0);
        ctx.fill();
        ctx.stroke();

        ctx.set_fill_style_str(LABEL_COLOR);
        let _ = ctx.fill_text(&stop.label(), x + LABEL_OFFSET, y + 4.0);
    }

    for train in trains {
        let Some((x, y)) = train_point(train) else { continue };
        ctx.set_fill_style_str(direction_color(train.journey.direction));
        ctx.set_stroke_style_str(STATION_FILL);
        ctx.begin_path();
        let _ = ctx.arc(x, y, TRAIN_RADIUS, 0.0, std::f64::consts::PI * 2.0);
        ctx.fill();
        ctx.stroke();
    }
}
