//! Integration tests for the operator attribute directory.

use crate::mock_port::{OK, Rig, answer_after, answer_all, config_with_timeout, silent};

use grovewifi::admin::attrs::{AdminDirectory, AttrError, MSG_FAILURE, MSG_PENDING, MSG_SUCCESS};
use grovewifi::admin::inject::submit;
use grovewifi::at::command::Command;
use grovewifi::{Error, TransactionError};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn directory(rig: &Rig) -> AdminDirectory<crate::mock_port::MockPort> {
    AdminDirectory::new(Arc::clone(&rig.session))
}

// ── Unanswered command ────────────────────────────────────────

#[test]
fn unanswered_command_reports_io_error_then_failure_text() {
    let rig = Rig::new(&config_with_timeout(200), silent());
    let dir = directory(&rig);

    let err = dir.store("cmd_cli", b"AT+GMR").unwrap_err();
    assert_eq!(err, AttrError::Io);
    assert_eq!(err.errno(), -5);

    assert_eq!(dir.read("response_cli").unwrap(), MSG_FAILURE);
    assert_eq!(rig.session.injected_command(), None);
}

// ── Answered command ──────────────────────────────────────────

#[test]
fn answered_command_reads_back_success() {
    let rig = Rig::new(&config_with_timeout(2_000), answer_all(OK));
    let dir = directory(&rig);

    assert_eq!(dir.store("cmd_cli", b"AT+GMR\n"), Ok(7));
    assert_eq!(dir.read("response_cli").unwrap(), MSG_SUCCESS);
    assert_eq!(rig.sent(), ["AT+GMR"]);
}

#[test]
fn submit_clears_injected_slot_after_success() {
    let rig = Rig::new(&config_with_timeout(2_000), answer_all(OK));

    assert_eq!(submit(&*rig.session, "AT+CWLAP"), Ok(()));
    assert_eq!(rig.session.injected_command(), None);
}

#[test]
fn in_flight_command_is_visible_and_pending() {
    let rig = Rig::new(
        &config_with_timeout(2_000),
        answer_after(Duration::from_millis(300), OK),
    );
    let dir = directory(&rig);

    let writer = {
        let dir = directory(&rig);
        std::thread::spawn(move || dir.store("cmd_cli", b"AT+GMR"))
    };

    let deadline = Instant::now() + Duration::from_secs(1);
    while rig.session.injected_command().is_none() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }

    assert_eq!(
        rig.session.injected_command(),
        Some(Command::raw("AT+GMR").unwrap())
    );
    assert_eq!(dir.read("response_cli").unwrap(), MSG_PENDING);

    assert_eq!(writer.join().unwrap(), Ok(6));
    assert_eq!(rig.session.injected_command(), None);
    assert_eq!(dir.read("response_cli").unwrap(), MSG_SUCCESS);
}

// ── Contention ────────────────────────────────────────────────

#[test]
fn second_writer_gets_busy_while_first_in_flight() {
    let rig = Rig::new(
        &config_with_timeout(2_000),
        answer_after(Duration::from_millis(300), OK),
    );

    let writer = {
        let dir = directory(&rig);
        std::thread::spawn(move || dir.store("cmd_cli", b"AT+GMR"))
    };

    let deadline = Instant::now() + Duration::from_secs(1);
    while !rig.session.is_busy() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }

    let err = directory(&rig).store("cmd_cli", b"AT+CWLAP").unwrap_err();
    assert_eq!(err, AttrError::Busy);
    assert_eq!(err.errno(), -16);

    assert!(writer.join().unwrap().is_ok());
    assert_eq!(rig.sent(), ["AT+GMR"]);
}

// ── Input validation ──────────────────────────────────────────

#[test]
fn oversized_command_is_rejected_before_the_wire() {
    let rig = Rig::new(&config_with_timeout(2_000), answer_all(OK));
    let long = format!("AT+{}", "X".repeat(80));

    assert!(matches!(
        submit(&*rig.session, &long),
        Err(Error::Command(_))
    ));
    assert_eq!(
        directory(&rig).store("cmd_cli", long.as_bytes()),
        Err(AttrError::Invalid)
    );
    assert!(rig.sent().is_empty());
}

#[test]
fn error_mapping_from_driver_errors() {
    assert_eq!(
        AttrError::from(Error::Transaction(TransactionError::Timeout)),
        AttrError::Io
    );
    assert_eq!(
        AttrError::from(Error::Transaction(TransactionError::Busy)),
        AttrError::Busy
    );
}
