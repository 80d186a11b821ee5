//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules of the press timer: the
//! message types exchanged between tasks and the [`PressTimer`](service::PressTimer)
//! service that drives the state machine.  All interaction with hardware
//! happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without real peripherals.

pub mod actions;
pub mod commands;
pub mod ports;
pub mod service;
