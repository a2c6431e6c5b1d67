use chrono::NaiveTime;
use leptos::{
    component, create_node_ref, create_signal, event_target_checked, html::Input, spawn_local, view, IntoView,
    SignalGet, SignalGetUntracked, SignalSet, SignalUpdate, SignalWith, SignalWithUntracked,
};
use crate::api::verification::clear_all_verifications;
use crate::clock::system_now;
use crate::state::use_app_state;
use crate::storage::{clear_pending, DeviceStorage};
use crate::time::format_hhmm;
use crate::log_warn;

/// Quick jumps for checking the board at typical times of day
const PRESET_TIMES: [(u32, u32); 5] = [(6, 0), (8, 30), (12, 0), (17, 30), (21, 0)];

#[component]
#[must_use]
pub fn AdminPanel() -> impl IntoView {
    let state = use_app_state();
    let (expanded, set_expanded) = create_signal(false);

    view! {
        <div class="admin-panel">
            <button class="admin-toggle" on:click=move |_| set_expanded.update(|open| *open = !*open)>
                {move || if expanded.get() { "Hide admin" } else { "Admin" }}
            </button>
            {move || expanded.get().then(|| if state.admin_unlocked.get() {
                view! { <AdminControls /> }.into_view()
            } else {
                view! { <PasswordGate /> }.into_view()
            })}
        </div>
    }
}

#[component]
fn PasswordGate() -> impl IntoView {
    let state = use_app_state();
    let password_ref = create_node_ref::<Input>();
    let (error, set_error) = create_signal(None::<&'static str>);

    let unlock = move || {
        let Some(input) = password_ref.get_untracked() else { return };
        if state.config.with_untracked(|config| config.check_admin_password(&input.value())) {
            set_error.set(None);
            state.admin_unlocked.set(true);
        } else {
            set_error.set(Some("Incorrect password"));
            input.set_value("");
        }
    };

    view! {
        <div class="admin-login">
            <input
                type="password"
                placeholder="Admin password"
                node_ref=password_ref
                on:keydown=move |ev| if ev.key() == "Enter" { unlock() }
            />
            <button on:click=move |_| unlock()>"Unlock"</button>
            {move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}
        </div>
    }
}

#[component]
fn AdminControls() -> impl IntoView {
    let state = use_app_state();
    let time_ref = create_node_ref::<Input>();
    let (error, set_error) = create_signal(None::<String>);

    let apply_time = move || {
        let Some(input) = time_ref.get_untracked() else { return };
        let mut clock = state.clock.get_untracked();
        match clock.set_override(&input.value(), system_now()) {
            Ok(()) => {
                state.tick();
                state.clock.set(clock);
                set_error.set(None);
            }
            Err(message) => set_error.set(Some(message)),
        }
    };

    let jump_to = move |time: NaiveTime| {
        state.tick();
        state.clock.update(|clock| clock.set_override_time(time, system_now()));
        set_error.set(None);
    };

    let clear_local = move |_| {
        match clear_pending(&DeviceStorage::new()) {
            Ok(()) => state.show_toast("Cleared verifications stored on this device"),
            Err(e) => log_warn!("Failed to clear pending verifications: {e}"),
        }
        state.reload_pending();
    };

    let clear_all = move |_| {
        spawn_local(async move {
            let config = state.config.get_untracked();
            match clear_all_verifications(&config).await {
                Ok(()) => state.show_toast("Requested removal of all verifications"),
                Err(e) => {
                    log_warn!("Failed to clear verifications: {e}");
                    state.show_toast("Could not clear verifications");
                }
            }
        });
    };

    let presets = PRESET_TIMES
        .iter()
        .filter_map(|(h, m)| NaiveTime::from_hms_opt(*h, *m, 0))
        .map(|time| view! {
            <button class="preset-time-btn" on:click=move |_| jump_to(time)>{format_hhmm(time)}</button>
        })
        .collect::<Vec<_>>();

    view! {
        <div class="admin-controls">
            <div class="admin-row">
                <input
                    type="text"
                    placeholder="HH:MM or HH:MM:SS"
                    node_ref=time_ref
                    on:keydown=move |ev| if ev.key() == "Enter" { apply_time() }
                />
                <button on:click=move |_| apply_time()>"Set time"</button>
            </div>
            {move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}
            <div class="admin-row presets">{presets}</div>
            <div class="admin-row">
                <button on:click=move |_| state.clock.update(|clock| clock.toggle_pause(system_now()))>
                    {move || if state.clock.with(|clock| clock.is_paused()) { "Resume" } else { "Pause" }}
                </button>
                <button on:click=move |_| state.clock.update(|clock| clock.reset())>"Reset to real time"</button>
            </div>
            <label class="admin-row">
                <input
                    type="checkbox"
                    prop:checked=move || state.show_all.get()
                    on:change=move |ev| state.show_all.set(event_target_checked(&ev))
                />
                "Show all trains"
            </label>
            <div class="admin-row verification-stats">
                <span>{move || format!("{} verified times", state.verified().len())}</span>
                <button on:click=move |_| state.refresh_verified_times()>"Refresh"</button>
                <button on:click=clear_local>"Clear local"</button>
                <button on:click=clear_all>"Clear all"</button>
            </div>
        </div>
    }
}
