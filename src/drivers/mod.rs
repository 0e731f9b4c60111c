//! Platform helpers for driver threads.

pub mod task_pin;
