//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the HomeLight agent:
//! pairing-command dispatch and per-tick orchestration of the link,
//! connectivity, and control-channel components. All interaction with
//! hardware happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod router;
pub mod service;
