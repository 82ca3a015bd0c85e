//! Weekly shift scheduling: two-hour slots, per-worker hour budgets,
//! weekday contiguity rules and a greedy randomized auto-fill.

pub mod config;
pub mod display;
pub mod error;
pub mod parser;
pub mod schedule;
pub mod web;

pub use config::EngineConfig;
pub use error::ScheduleError;
pub use schedule::ScheduleEngine;
