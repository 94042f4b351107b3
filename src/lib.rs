//! Laundry-done notifications for Discord, driven by a light sensor on a
//! washing machine's indicator.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
