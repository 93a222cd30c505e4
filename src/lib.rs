//! HomeLight agent library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod connectivity;
pub mod light;
pub mod link;
pub mod protocol;
pub mod registry;

pub mod error;

// ESP-IDF adapters; each file carries a host-side simulation arm so
// the crate compiles and tests off-target.
pub mod adapters;
