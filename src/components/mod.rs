#![allow(clippy::needless_pass_by_value)]

pub mod admin_panel;
pub mod app;
pub mod clock_display;
pub mod departure_board;
pub mod feedback_modal;
pub mod journey_view;
pub mod modal_overlay;
pub mod station_details;
pub mod station_select;
pub mod toast;
pub mod train_map;
