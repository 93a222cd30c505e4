//! Fuzz target: pairing-channel decode path
//!
//! Any frame the assembler can deliver ends up in the soft-fail decoders.
//! Asserts total decoding: no panic for any input, and the degraded
//! record is always usable.
//!
//! cargo fuzz run fuzz_pairing_decode

#![no_main]

use homelight::protocol::{LightCommand, PairingRequest};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let req = PairingRequest::decode(data);
    let _ = req.action();
    let _ = req.req_id.as_deref();

    let cmd = LightCommand::decode(data);
    let _ = (cmd.device_id.as_str(), cmd.command.as_str());
});
