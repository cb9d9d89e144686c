//! High-level operations.
//!
//! This module contains the implementation of hdlflow commands that are
//! not flows.

pub mod doctor;
pub mod hdlflow_init;

pub use doctor::{doctor, format_report, CheckResult, DoctorReport};
pub use hdlflow_init::{default_name, init_project};
