//! Integration tests for the attach-time setup sequence.

use crate::mock_port::{ERROR, OK, Rig, answer_all, config_with_timeout};

use grovewifi::TransactionError;
use grovewifi::at::command::Builtin;
use grovewifi::at::init::{INIT_SEQUENCE, initialize, initialize_with};
use std::time::Duration;

const FIVE: [Builtin; 5] = [
    Builtin::Test,
    Builtin::NoEcho,
    Builtin::DisableSleep,
    Builtin::SetUart,
    Builtin::StationMode,
];

#[test]
fn full_sequence_sends_every_step_in_order() {
    let rig = Rig::new(&config_with_timeout(2_000), answer_all(OK));

    assert_eq!(initialize(&*rig.session), Ok(()));
    let expected: Vec<&str> = INIT_SEQUENCE.iter().map(|b| b.name()).collect();
    assert_eq!(rig.sent(), expected);
}

#[test]
fn third_step_failing_stops_after_three_writes() {
    let rig = Rig::new(
        &config_with_timeout(2_000),
        Box::new(|line: &str| {
            let reply = if line == "AT+SLEEP=0" { ERROR } else { OK };
            Some((Duration::ZERO, reply))
        }),
    );

    let err = initialize_with(&*rig.session, &FIVE).unwrap_err();

    assert_eq!(err.step, 2);
    assert_eq!(err.command, Builtin::DisableSleep);
    assert_eq!(err.cause, TransactionError::ProtocolFailure);
    assert_eq!(rig.sent(), ["AT", "ATE0", "AT+SLEEP=0"]);
}

#[test]
fn third_step_timing_out_stops_after_three_writes() {
    let rig = Rig::new(
        &config_with_timeout(150),
        Box::new(|line: &str| (line != "AT+SLEEP=0").then_some((Duration::ZERO, OK))),
    );

    let err = initialize_with(&*rig.session, &FIVE).unwrap_err();

    assert_eq!(err.step, 2);
    assert_eq!(err.cause, TransactionError::Timeout);
    assert_eq!(rig.sent().len(), 3);
}

#[test]
fn first_step_failure_sends_nothing_else() {
    let rig = Rig::new(&config_with_timeout(2_000), answer_all(ERROR));

    let err = initialize(&*rig.session).unwrap_err();
    assert_eq!(err.step, 0);
    assert_eq!(rig.sent(), ["AT"]);
}
