use chrono::{NaiveTime, Utc};
use leptos::{
    component, create_node_ref, create_signal, html::Input, spawn_local, view, IntoView, ReadSignal, Signal,
    SignalGet, SignalGetUntracked, SignalSet, SignalUpdate, WriteSignal,
};
use crate::api::feedback::submit_delay_report;
use crate::api::verification::{submit_verification, SubmitOutcome};
use crate::components::modal_overlay::ModalOverlay;
use crate::models::{parse_delay_minutes, DelayReport, Direction, Station, VerificationRecord};
use crate::state::{use_app_state, AppState};
use crate::storage::DeviceStorage;
use crate::time::format_hhmm;
use crate::log_warn;

const CORRECT_CLOSE_DELAY_MS: u32 = 2000;
const DELAY_CLOSE_DELAY_MS: u32 = 3000;

/// The scheduled departure a rider is giving feedback on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackContext {
    pub station: Station,
    pub direction: Direction,
    pub time: NaiveTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Ask,
    Delay,
    Done,
}

#[component]
#[must_use]
pub fn FeedbackModal(
    context: ReadSignal<Option<FeedbackContext>>,
    set_context: WriteSignal<Option<FeedbackContext>>,
) -> impl IntoView {
    let state = use_app_state();
    let (step, set_step) = create_signal(Step::Ask);
    let (error, set_error) = create_signal(None::<String>);
    let delay_ref = create_node_ref::<Input>();

    let close = move |()| {
        set_context.set(None);
        set_step.set(Step::Ask);
        set_error.set(None);
    };

    let close_after = move |delay_ms: u32| {
        let shown = context.get_untracked();
        spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(delay_ms).await;
            if context.get_untracked() == shown {
                close(());
            }
        });
    };

    let on_correct = move |_| {
        let Some(ctx) = context.get_untracked() else { return };
        confirm_time(state, ctx);
        set_step.set(Step::Done);
        close_after(CORRECT_CLOSE_DELAY_MS);
    };

    let on_submit_delay = move |_| {
        let Some(ctx) = context.get_untracked() else { return };
        let Some(input) = delay_ref.get_untracked() else { return };
        match parse_delay_minutes(&input.value()) {
            Ok(delay) => {
                set_error.set(None);
                report_delay(state, ctx, delay);
                set_step.set(Step::Done);
                close_after(DELAY_CLOSE_DELAY_MS);
            }
            Err(message) => set_error.set(Some(message)),
        }
    };

    let title = Signal::derive(move || {
        context.get().map_or_else(String::new, |ctx| {
            format!("{} at {} (To {})", format_hhmm(ctx.time), ctx.station.name(), ctx.direction.name())
        })
    });

    view! {
        <ModalOverlay
            is_open=Signal::derive(move || context.get().is_some())
            title=title
            on_close=close
        >
            {move || match step.get() {
                Step::Ask => view! {
                    <p>"Did this train run on time?"</p>
                    <div class="feedback-actions">
                        <button class="feedback-correct" on:click=on_correct>"Yes, on time"</button>
                        <button class="feedback-incorrect" on:click=move |_| set_step.set(Step::Delay)>
                            "No, it was late"
                        </button>
                    </div>
                }.into_view(),
                Step::Delay => view! {
                    <label for="delay-minutes">"How many minutes late?"</label>
                    <input id="delay-minutes" type="number" min="0" node_ref=delay_ref />
                    {move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}
                    <button class="feedback-submit" on:click=on_submit_delay>"Submit"</button>
                }.into_view(),
                Step::Done => view! {
                    <p class="feedback-success">"Thanks for your feedback!"</p>
                }.into_view(),
            }}
        </ModalOverlay>
    }
}

fn confirm_time(state: AppState, ctx: FeedbackContext) {
    let record = VerificationRecord::correct(ctx.station, ctx.direction, ctx.time, Utc::now());
    state.verified_file.update(|file| {
        file.verified_times.insert(record.time_id.clone(), record.clone());
    });

    spawn_local(async move {
        let config = state.config.get_untracked();
        match submit_verification(&config, &DeviceStorage::new(), record).await {
            SubmitOutcome::Submitted => state.show_toast("Thanks! Verification submitted"),
            SubmitOutcome::StoredLocally => {
                state.reload_pending();
                state.show_toast("Saved on this device; it will be shared later");
            }
            SubmitOutcome::Lost => state.show_toast("Could not save verification"),
        }
    });
}

fn report_delay(state: AppState, ctx: FeedbackContext, delay: i32) {
    let report = DelayReport::new(ctx.station, ctx.direction, ctx.time, delay, Utc::now());
    spawn_local(async move {
        let config = state.config.get_untracked();
        if let Err(e) = submit_delay_report(&config, &report).await {
            log_warn!("Error submitting feedback: {e}");
        }
    });
}
