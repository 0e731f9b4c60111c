//! Fuzz target: `Command::raw`
//!
//! Arbitrary operator text must either be refused with a typed error or
//! framed into a single CR-LF delimited line that fits the command buffer.
//!
//! cargo fuzz run fuzz_command_format

#![no_main]

use grovewifi::at::command::{COMMAND_CAPACITY, Command};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };

    if let Ok(cmd) = Command::raw(text) {
        let wire = cmd.wire();
        assert!(wire.len() <= COMMAND_CAPACITY);
        assert!(wire.starts_with(b"\r\n") && wire.ends_with(b"\r\n"));

        // Exactly one line: no control bytes inside the framing.
        let body = cmd.text();
        assert!(!body.is_empty());
        assert!(!body.iter().any(u8::is_ascii_control));
    }
});
