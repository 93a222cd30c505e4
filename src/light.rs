//! Light peripheral controller.
//!
//! The minimal two-state machine for the controlled light. It owns the
//! on/off flag exclusively; the physical pin is driven through
//! [`LightPort`](crate::app::ports::LightPort) so host tests can record
//! output writes instead of toggling GPIO.
//!
//! Status reporting is pulled, not pushed: the service asks for a
//! [`StatusUpdate`] snapshot whenever a command changed the state and on
//! the periodic publication tick.

use log::info;

use crate::app::ports::LightPort;
use crate::protocol::{StatusUpdate, CMD_TURN_OFF, CMD_TURN_ON};

/// On/off controller for the light peripheral. Starts Off.
pub struct LightController {
    on: bool,
}

impl Default for LightController {
    fn default() -> Self {
        Self::new()
    }
}

impl LightController {
    pub fn new() -> Self {
        Self { on: false }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Drive the light on. Returns true when the state actually changed.
    pub fn turn_on(&mut self, pin: &mut impl LightPort) -> bool {
        pin.set_on(true);
        let changed = !self.on;
        self.on = true;
        if changed {
            info!("light: on");
        }
        changed
    }

    /// Drive the light off. Returns true when the state actually changed.
    pub fn turn_off(&mut self, pin: &mut impl LightPort) -> bool {
        pin.set_on(false);
        let changed = self.on;
        self.on = false;
        if changed {
            info!("light: off");
        }
        changed
    }

    /// Apply a command verb from the control channel.
    ///
    /// Unknown verbs are ignored (returns false — nothing changed).
    pub fn apply_command(&mut self, verb: &str, pin: &mut impl LightPort) -> bool {
        match verb {
            CMD_TURN_ON => self.turn_on(pin),
            CMD_TURN_OFF => self.turn_off(pin),
            other => {
                info!("light: ignoring unknown command '{other}'");
                false
            }
        }
    }

    /// Current state as a one-field status payload.
    pub fn status_snapshot(&self, device_id: &str) -> StatusUpdate {
        StatusUpdate {
            device_id: device_id.to_owned(),
            field_name: "on".into(),
            field_value: if self.on { "true".into() } else { "false".into() },
        }
    }
}
