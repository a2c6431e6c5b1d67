#![allow(clippy::implicit_hasher)]
#![allow(unknown_lints)]

pub mod logging;
pub mod api;
pub mod clock;
pub mod components;
pub mod config;
pub mod constants;
pub mod generator;
pub mod map_layout;
pub mod models;
pub mod schedule;
pub mod state;
pub mod storage;
pub mod time;
pub mod train_journey;

pub use components::app::App;
