//! Fuzz target for session script parsing and replay.
//!
//! Any script that parses must replay without panicking.

#![no_main]

use annorect::script::{from_script_slice, replay};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    if let Ok(script) = from_script_slice(data) {
        let _ = replay(&script);
    }
});
