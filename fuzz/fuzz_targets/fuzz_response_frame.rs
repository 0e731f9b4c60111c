//! Fuzz target: `ResponseFrame::append` + `classify`
//!
//! Splits arbitrary input into chunks at fuzzer-chosen points, feeds them
//! to a response frame, and classifies after every chunk.  The frame must
//! never overrun, must keep its terminating zero, and must hold exactly
//! the leading bytes that fit.
//!
//! cargo fuzz run fuzz_response_frame

#![no_main]

use grovewifi::at::classify::{Verdict, classify};
use grovewifi::at::frame::{RESPONSE_CAPACITY, ResponseFrame};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&split, payload)) = data.split_first() else {
        return;
    };
    let step = usize::from(split).max(1);

    let mut frame: ResponseFrame = ResponseFrame::new();
    let mut seen_success = false;

    for chunk in payload.chunks(step) {
        frame.append(chunk);
        assert!(frame.len() < RESPONSE_CAPACITY, "frame overran its buffer");
        assert_eq!(frame.as_bytes_with_sentinel()[frame.len()], 0);

        // Once the frame holds OK it can only keep holding it.
        let v = classify(frame.as_bytes());
        if seen_success {
            assert_eq!(v, Verdict::Success, "success verdict regressed");
        }
        seen_success |= v == Verdict::Success;
    }

    let kept = payload.len().min(RESPONSE_CAPACITY - 1);
    assert_eq!(frame.as_bytes(), &payload[..kept]);

    frame.reset();
    assert!(frame.is_empty());
});
