#![warn(clippy::complexity)]
#![warn(clippy::perf)]
#![warn(clippy::style)]
#![warn(clippy::suspicious)]
use mrt_timetable::App;

fn register_service_worker() {
    let Some(window) = web_sys::window() else { return };
    let _ = window.navigator().service_worker().register("/service_worker.js");
}

fn main() {
    console_error_panic_hook::set_once();
    register_service_worker();
    leptos::mount_to_body(App);
}
