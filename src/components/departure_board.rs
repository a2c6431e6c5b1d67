use leptos::{
    component, create_memo, create_signal, view, IntoView, Signal, SignalGet, SignalSet, SignalWith, WriteSignal,
};
use crate::components::feedback_modal::{FeedbackContext, FeedbackModal};
use crate::models::{JourneyLink, Station};
use crate::schedule::{BoardEntry, PlatformBoard, QueryOptions, StationBoard};
use crate::state::use_app_state;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum BoardMode {
    #[default]
    Live,
    FirstTrains,
    LastTrains,
}

#[component]
#[must_use]
pub fn DepartureBoard(#[prop(into)] station: Signal<Option<Station>>) -> impl IntoView {
    let state = use_app_state();
    let (mode, set_mode) = create_signal(BoardMode::Live);
    let (feedback, set_feedback) = create_signal(None::<FeedbackContext>);

    let board = create_memo(move |_| {
        let station = station.get()?;
        let timetable = state.current_timetable()?;
        let verified = state.verified();
        Some(match mode.get() {
            BoardMode::Live => {
                let options = if state.show_all.get() {
                    QueryOptions::show_all()
                } else {
                    QueryOptions::default()
                };
                StationBoard::build(&timetable, station, state.now().time(), &options, &verified)
            }
            BoardMode::FirstTrains => StationBoard::first_trains(&timetable, station, &verified),
            BoardMode::LastTrains => StationBoard::last_trains(&timetable, station, &verified),
        })
    });

    let mode_button = move |target: BoardMode, label: &'static str| {
        view! {
            <button
                class=move || if mode.get() == target { "mode-button active" } else { "mode-button" }
                on:click=move |_| set_mode.set(if mode.get() == target { BoardMode::Live } else { target })
            >
                {label}
            </button>
        }
    };

    view! {
        <div class="departure-board">
            <div class="board-modes">
                {mode_button(BoardMode::FirstTrains, "First Train")}
                {mode_button(BoardMode::LastTrains, "Last Train")}
            </div>
            {move || board.with(|board| match board {
                None if station.get().is_none() => view! {
                    <p class="board-empty">"Select a station to see upcoming trains"</p>
                }.into_view(),
                None => view! { <p class="board-empty">"Loading timetable..."</p> }.into_view(),
                Some(board) => {
                    let announcements = board.announcements();
                    view! {
                        <div class="announcements">
                            {announcements.into_iter().map(|announcement| view! {
                                <div class="announcement">{announcement.to_string()}</div>
                            }).collect::<Vec<_>>()}
                        </div>
                        <div class="platforms">
                            {board.platforms.iter().map(|platform| view! {
                                <PlatformColumn
                                    station=board.station
                                    platform=platform.clone()
                                    set_feedback=set_feedback
                                />
                            }).collect::<Vec<_>>()}
                        </div>
                    }.into_view()
                }
            })}
            <FeedbackModal context=feedback set_context=set_feedback />
        </div>
    }
}

#[component]
fn PlatformColumn(
    station: Station,
    platform: PlatformBoard,
    set_feedback: WriteSignal<Option<FeedbackContext>>,
) -> impl IntoView {
    let state = use_app_state();
    let direction = platform.direction;
    let service_day = state.loaded_day().unwrap_or_default();
    let rows = platform.entries.into_iter().map(|entry| {
        let label = entry.label();
        let BoardEntry { time, verified, status, .. } = entry;
        let link = JourneyLink {
            station,
            time,
            direction,
            service_day,
        };
        let class = if verified {
            format!("{} verified-time", status.css_class())
        } else {
            status.css_class().to_string()
        };
        view! {
            <li class=class>
                <a class="train-time" href=format!("/journey?{}", link.to_query())>{label}</a>
                {verified.then(|| view! { <span class="verified-badge" title="Verified by riders">"✓"</span> })}
                <button
                    class="feedback-button"
                    title="Was this time accurate?"
                    on:click=move |_| set_feedback.set(Some(FeedbackContext { station, direction, time }))
                >
                    "?"
                </button>
            </li>
        }
    }).collect::<Vec<_>>();

    view! {
        <div class="platform">
            <h3>{format!("Platform {}", direction.platform())}</h3>
            <p class="platform-direction">{format!("To {}", direction.name())}</p>
            {if rows.is_empty() {
                view! { <p class="no-trains">"No more trains today"</p> }.into_view()
            } else {
                view! { <ul class="train-list">{rows}</ul> }.into_view()
            }}
        </div>
    }
}
