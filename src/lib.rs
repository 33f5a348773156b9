//! Weekly class timetable generation.
//!
//! [`schedule::build_period_grid`] turns a school day into an ordered list of
//! period and break slots, and [`schedule::allocate`] greedily fills those slots
//! for every working day from per-subject theory/practical targets, producing a
//! class grid plus one grid per teacher. Everything else in the crate is input
//! and output around that engine.

pub mod error;
pub mod schedule;
pub mod config;
pub mod parser;
pub mod display;
pub mod store;
pub mod web;

pub use error::{ConfigError, InvalidRangeError, ParseTimeError, PeriodGridError};
pub use config::{load_config, CapacityReport, TimetableConfig};
pub use schedule::{allocate, build_period_grid, generate_versions, Timetable, TimetableVersion};
