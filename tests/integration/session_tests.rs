//! Integration tests for the command/response transaction engine.

use crate::mock_port::{ERROR, OK, Rig, answer_after, answer_all, config_with_timeout, silent};

use grovewifi::TransactionError;
use grovewifi::at::classify::{Verdict, WakePolicy};
use grovewifi::at::command::{Builtin, Command};
use grovewifi::at::session::Phase;
use grovewifi::config::DriverConfig;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

// ── Happy path ────────────────────────────────────────────────

#[test]
fn ok_reply_completes_well_under_deadline() {
    let rig = Rig::new(&config_with_timeout(5_000), answer_all(OK));

    let start = Instant::now();
    assert_eq!(rig.session.run(&Builtin::Test.into()), Ok(()));

    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(rig.session.outcome(), Verdict::Success);
    assert_eq!(rig.session.phase(), Phase::Completed);
    assert_eq!(rig.sent(), ["AT"]);
}

#[test]
fn last_response_holds_reply_bytes() {
    let rig = Rig::new(&config_with_timeout(2_000), answer_all(OK));
    rig.session.run(&Builtin::Test.into()).unwrap();
    assert_eq!(rig.session.last_response().as_slice(), OK);
}

// ── Failure markers ───────────────────────────────────────────

#[test]
fn error_reply_is_protocol_failure() {
    let rig = Rig::new(&config_with_timeout(2_000), answer_all(ERROR));

    let start = Instant::now();
    assert_eq!(
        rig.session.run(&Builtin::Test.into()),
        Err(TransactionError::ProtocolFailure)
    );
    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(rig.session.outcome(), Verdict::Failure);
}

#[test]
fn success_only_policy_waits_out_failure_markers() {
    let cfg = DriverConfig {
        response_timeout_ms: 150,
        wake_policy: WakePolicy::SuccessOnly,
        ..DriverConfig::default()
    };
    let rig = Rig::new(&cfg, answer_all(b"\r\nFAIL\r\n"));

    assert_eq!(
        rig.session.run(&Builtin::Test.into()),
        Err(TransactionError::Timeout)
    );
    assert_eq!(rig.session.outcome(), Verdict::Failure);
}

// ── Timeouts ──────────────────────────────────────────────────

#[test]
fn silence_times_out_near_deadline() {
    let rig = Rig::new(&config_with_timeout(200), silent());

    let start = Instant::now();
    let r = rig.session.run(&Builtin::Test.into());
    let elapsed = start.elapsed();

    assert_eq!(r, Err(TransactionError::Timeout));
    assert!(elapsed >= Duration::from_millis(190), "woke early: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(2), "woke late: {elapsed:?}");
    assert_eq!(rig.session.phase(), Phase::TimedOut);
    assert_eq!(rig.session.outcome(), Verdict::Failure);
}

#[test]
fn session_is_reusable_after_timeout() {
    let answering = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&answering);
    let rig = Rig::new(
        &config_with_timeout(150),
        Box::new(move |_: &str| flag.load(Ordering::SeqCst).then_some((Duration::ZERO, OK))),
    );

    assert_eq!(
        rig.session.run(&Builtin::Test.into()),
        Err(TransactionError::Timeout)
    );

    answering.store(true, Ordering::SeqCst);
    let start = Instant::now();
    assert_eq!(rig.session.run(&Builtin::Test.into()), Ok(()));
    assert!(start.elapsed() < Duration::from_millis(140));
}

#[test]
fn late_reply_does_not_resurrect_timed_out_transaction() {
    let rig = Rig::new(
        &config_with_timeout(100),
        answer_after(Duration::from_millis(250), OK),
    );

    assert_eq!(
        rig.session.run(&Builtin::Test.into()),
        Err(TransactionError::Timeout)
    );
    std::thread::sleep(Duration::from_millis(350));

    assert_eq!(rig.session.phase(), Phase::TimedOut);
    assert_eq!(rig.session.outcome(), Verdict::Failure);
}

// ── Concurrency ───────────────────────────────────────────────

#[test]
fn concurrent_caller_is_rejected_with_busy() {
    let rig = Rig::new(
        &config_with_timeout(2_000),
        answer_after(Duration::from_millis(300), OK),
    );

    let session = Arc::clone(&rig.session);
    let first = std::thread::spawn(move || session.run(&Builtin::Test.into()));

    let deadline = Instant::now() + Duration::from_secs(1);
    while !rig.session.is_busy() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }

    let cmd = Command::raw("AT+GMR").unwrap();
    assert_eq!(rig.session.run(&cmd), Err(TransactionError::Busy));

    assert_eq!(first.join().unwrap(), Ok(()));
    assert_eq!(rig.sent(), ["AT"]);
    assert_eq!(rig.session.outcome(), Verdict::Success);
}

#[test]
fn detach_cancels_blocked_caller() {
    let rig = Rig::new(&config_with_timeout(10_000), silent());

    let session = Arc::clone(&rig.session);
    let waiter = std::thread::spawn(move || session.run(&Builtin::Test.into()));

    std::thread::sleep(Duration::from_millis(100));
    let start = Instant::now();
    rig.session.detach();

    assert_eq!(waiter.join().unwrap(), Err(TransactionError::Detached));
    assert!(start.elapsed() < Duration::from_secs(2));
    assert_eq!(rig.session.outcome(), Verdict::Failure);
}
