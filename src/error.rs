//! Unified error types for the HomeLight firmware.
//!
//! The dispatch core itself never returns errors to the pairing channel
//! (only the `success` boolean travels on the wire), so these types live
//! at the adapter boundary: peripheral bring-up failures funnel into
//! `anyhow` at the `main` entry point. Transport operations after
//! bring-up report plain booleans — the connectivity manager retries,
//! it does not propagate.

use core::fmt;

/// Every fallible bring-up operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The local pairing link could not be initialised.
    Link(LinkError),
    /// The WiFi driver could not be initialised.
    Network(NetworkError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Network(e) => write!(f, "network: {e}"),
        }
    }
}

impl core::error::Error for Error {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    InitFailed,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitFailed => write!(f, "serial link init failed"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkError {
    DriverInitFailed,
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DriverInitFailed => write!(f, "WiFi driver init failed"),
        }
    }
}

impl From<NetworkError> for Error {
    fn from(e: NetworkError) -> Self {
        Self::Network(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
