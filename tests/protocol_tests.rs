//! Tests for the serial command protocol
//!
//! Parsing, response formatting and dispatch against a mocked jammer.
//! Run with: cargo test --no-default-features --features std --test protocol_tests

mod common;

use common::{all_present, jammer, MockRadio};
use jammer_firmware::protocol::{dispatch, CommandInbox, CommandParser, HostCommand, Response};
use jammer_firmware::radio::jammer::{JammerCommand, SelfTestReport, SelfTestResult, TransitionError};
use jammer_firmware::types::{Activity, JammingMode, PowerLevel, RadioSlot};

fn parse(input: &str) -> Vec<HostCommand> {
    let mut parser = CommandParser::new();
    parser.feed_all::<8>(input.as_bytes()).into_iter().collect()
}

fn parse_one(input: &str) -> HostCommand {
    let commands = parse(input);
    assert_eq!(commands.len(), 1, "expected one command from {:?}", input);
    commands.into_iter().next().unwrap()
}

fn run(j: &mut common::TestJammer, input: &str) -> String {
    let mut response = Response::new();
    dispatch(j, &parse_one(input), &mut response);
    response.as_str().to_string()
}

// ============================================================================
// Parser Tests
// ============================================================================

#[test]
fn parse_control_commands() {
    let cases = [
        ("START;", JammerCommand::Start),
        ("STOP;", JammerCommand::Stop),
        ("PAUSE;", JammerCommand::Pause),
        ("RESUME;", JammerCommand::Resume),
        ("MODE;", JammerCommand::CycleMode),
        ("RESTART;", JammerCommand::Restart),
        ("FORCE;", JammerCommand::ForceRestart),
        ("PWRMAX;", JammerCommand::SetMaxPower),
        ("PWRCYC;", JammerCommand::CyclePowerLevel),
        ("TURBO;", JammerCommand::TurboBoost),
        ("TEST;", JammerCommand::SelfTest),
    ];
    for (input, expected) in cases {
        assert_eq!(parse_one(input), HostCommand::Control(expected), "{}", input);
    }
}

#[test]
fn parse_queries() {
    assert_eq!(parse_one("MODE?;"), HostCommand::ReadMode);
    assert_eq!(parse_one("PWR?;"), HostCommand::ReadPower);
    assert_eq!(parse_one("ST?;"), HostCommand::ReadStatus);
}

#[test]
fn parse_retry_slot() {
    assert_eq!(
        parse_one("RETRY2;"),
        HostCommand::Control(JammerCommand::RetryRadio(RadioSlot::Two))
    );
    assert!(matches!(parse_one("RETRY4;"), HostCommand::Unknown(_)));
    assert!(matches!(parse_one("RETRY;"), HostCommand::Unknown(_)));
}

#[test]
fn parse_is_case_insensitive_and_ignores_whitespace() {
    assert_eq!(parse_one("st art;\r\n"), HostCommand::Control(JammerCommand::Start));
    assert_eq!(parse_one("pwr?;"), HostCommand::ReadPower);
}

#[test]
fn parse_multiple_commands() {
    assert_eq!(
        parse("START;PWRMAX;ST?;"),
        vec![
            HostCommand::Control(JammerCommand::Start),
            HostCommand::Control(JammerCommand::SetMaxPower),
            HostCommand::ReadStatus,
        ]
    );
}

#[test]
fn parse_byte_at_a_time() {
    let mut parser = CommandParser::new();
    let mut result = None;
    for &b in b"PAUSE;" {
        if let Some(cmd) = parser.feed(b) {
            result = Some(cmd);
        }
    }
    assert_eq!(result, Some(HostCommand::Control(JammerCommand::Pause)));
}

#[test]
fn parse_incomplete_returns_nothing() {
    assert!(parse("START").is_empty());
}

#[test]
fn parse_empty_command_ignored() {
    assert!(parse(";;").is_empty());
}

#[test]
fn parse_unknown_keeps_prefix() {
    match parse_one("FREQUENCY123;") {
        HostCommand::Unknown(text) => assert_eq!(text.as_str(), "FREQUENC"),
        other => panic!("expected unknown, got {:?}", other),
    }
}

#[test]
fn parse_overlong_input_discarded() {
    let mut input = "X".repeat(40);
    input.push_str(";STOP;");
    assert_eq!(parse(&input), vec![HostCommand::Control(JammerCommand::Stop)]);
}

#[test]
fn parse_overlong_line_tail_is_not_run() {
    // The buffer fills inside "STOP", so the whole line is dropped
    let mut input = "X".repeat(31);
    input.push_str("STOP;START;");
    assert_eq!(parse(&input), vec![HostCommand::Control(JammerCommand::Start)]);

    let mut input = "X".repeat(32);
    input.push_str("STOP;");
    assert!(parse(&input).is_empty());
}

#[test]
fn parser_clear_ends_discarding() {
    let mut parser = CommandParser::new();
    for _ in 0..40 {
        parser.feed(b'X');
    }
    parser.clear();
    let commands = parser.feed_all::<4>(b"STOP;");
    assert_eq!(commands[0], HostCommand::Control(JammerCommand::Stop));
}

#[test]
fn parser_clear() {
    let mut parser = CommandParser::new();
    for &b in b"STA" {
        parser.feed(b);
    }
    parser.clear();
    let commands = parser.feed_all::<4>(b"STOP;");
    assert_eq!(commands[0], HostCommand::Control(JammerCommand::Stop));
}

// ============================================================================
// Command Inbox Tests
// ============================================================================

#[test]
fn inbox_queues_in_order() {
    let mut inbox = CommandInbox::new();
    inbox.push_bytes(b"PWR?;MO");
    inbox.push_bytes(b"DE;");

    assert_eq!(inbox.len(), 2);
    assert_eq!(inbox.next_command(), Some(HostCommand::ReadPower));
    assert_eq!(
        inbox.next_command(),
        Some(HostCommand::Control(JammerCommand::CycleMode))
    );
    assert_eq!(inbox.next_command(), None);
}

#[test]
fn inbox_cancel_follows_queued_stop_or_pause() {
    let mut inbox = CommandInbox::new();
    inbox.push_bytes(b"ST?;");
    assert!(!inbox.cancel_pending());

    inbox.push_bytes(b"PAUSE;");
    assert!(inbox.cancel_pending());

    inbox.next_command();
    assert!(inbox.cancel_pending());
    inbox.next_command();
    assert!(!inbox.cancel_pending());
    assert!(inbox.is_empty());
}

#[test]
fn inbox_full_keeps_stop() {
    let mut inbox = CommandInbox::new();
    inbox.push_bytes(b"PWR?;PWR?;PWR?;PWR?;");
    inbox.push_bytes(b"MODE?;");
    assert_eq!(inbox.len(), 4);
    assert!(!inbox.cancel_pending());

    inbox.push_bytes(b"STOP;");
    assert_eq!(inbox.len(), 4);
    assert!(inbox.cancel_pending());

    let drained: Vec<HostCommand> = std::iter::from_fn(|| inbox.next_command()).collect();
    assert_eq!(drained.last(), Some(&HostCommand::Control(JammerCommand::Stop)));
    assert!(!drained.contains(&HostCommand::ReadMode));
}

#[test]
fn inbox_discard_partial_keeps_queue() {
    let mut inbox = CommandInbox::new();
    inbox.push_bytes(b"START;ST");
    inbox.discard_partial();
    inbox.push_bytes(b"OP;");

    assert_eq!(
        inbox.next_command(),
        Some(HostCommand::Control(JammerCommand::Start))
    );
    // "OP" alone is not a command
    assert!(matches!(inbox.next_command(), Some(HostCommand::Unknown(_))));
}

// ============================================================================
// Response Tests
// ============================================================================

#[test]
fn response_formats() {
    let mut r = Response::new();

    r.ok();
    assert_eq!(r.as_str(), "OK;");

    r.unknown();
    assert_eq!(r.as_str(), "?;");

    r.mode(JammingMode::ClassicBluetooth);
    assert_eq!(r.as_str(), "MODEBluetooth;");

    r.power(PowerLevel::Max);
    assert_eq!(r.as_str(), "PWRMAX;");

    r.resumed(2);
    assert_eq!(r.as_str(), "RS2;");

    r.retry_queued(RadioSlot::Three);
    assert_eq!(r.as_str(), "RETRY3;");

    r.clear();
    assert!(r.as_bytes().is_empty());
}

#[test]
fn response_error() {
    let mut r = Response::new();
    r.error(&TransitionError::InvalidState {
        command: "pause",
        from: Activity::Inactive,
    });
    assert_eq!(r.as_str(), "ER:cannot pause while Inactive;");

    r.error(&TransitionError::RadioAlreadyActive(RadioSlot::One));
    assert_eq!(r.as_str(), "ER:Radio 1 is already active;");
}

#[test]
fn response_self_test() {
    let mut r = Response::new();
    let report = SelfTestReport {
        results: [
            SelfTestResult::Passed,
            SelfTestResult::Skipped,
            SelfTestResult::Disconnected,
        ],
    };
    r.self_test(&report);
    assert_eq!(r.as_str(), "TESTP-D;");
}

// ============================================================================
// Dispatch Tests
// ============================================================================

#[test]
fn dispatch_start_and_status() {
    let mut j = jammer([MockRadio::present(1), MockRadio::absent(2), MockRadio::present(3)]);

    assert_eq!(run(&mut j, "ST?;"), "STI,BLE,HIGH,000,0,0;");
    assert_eq!(run(&mut j, "START;"), "UP2;");
    assert_eq!(run(&mut j, "ST?;"), "STA,BLE,HIGH,101,0,0;");
}

#[test]
fn dispatch_power_commands() {
    let mut j = jammer(all_present());
    run(&mut j, "START;");

    assert_eq!(run(&mut j, "PWR?;"), "PWRHIGH;");
    assert_eq!(run(&mut j, "PWRCYC;"), "PWRMAX;");
    assert_eq!(run(&mut j, "PWRCYC;"), "PWRLOW;");
    assert_eq!(run(&mut j, "TURBO;"), "PWRMAX;");
    assert_eq!(run(&mut j, "ST?;"), "STA,BLE,MAX,111,1,0;");
}

#[test]
fn dispatch_pause_resume() {
    let mut j = jammer(all_present());

    assert_eq!(run(&mut j, "PAUSE;"), "ER:cannot pause while Inactive;");
    run(&mut j, "START;");
    assert_eq!(run(&mut j, "PAUSE;"), "OK;");
    assert!(run(&mut j, "ST?;").starts_with("STP,"));
    assert_eq!(run(&mut j, "RESUME;"), "RS3;");
}

#[test]
fn dispatch_mode() {
    let mut j = jammer(all_present());
    assert_eq!(run(&mut j, "MODE?;"), "MODEBLE;");
    assert_eq!(run(&mut j, "MODE;"), "MODEBluetooth;");
    assert_eq!(run(&mut j, "MODE;"), "MODEALL;");
    assert_eq!(run(&mut j, "MODE?;"), "MODEALL;");
}

#[test]
fn dispatch_retry_and_self_test() {
    let mut j = jammer([MockRadio::present(1), MockRadio::absent(2), MockRadio::present(3)]);
    run(&mut j, "START;");

    assert_eq!(run(&mut j, "RETRY2;"), "RETRY2;");
    assert_eq!(run(&mut j, "RETRY1;"), "ER:Radio 1 is already active;");
    assert_eq!(run(&mut j, "TEST;"), "TESTP-P;");
}

#[test]
fn dispatch_stop_and_restart() {
    let mut j = jammer(all_present());
    run(&mut j, "START;");
    assert_eq!(run(&mut j, "STOP;"), "OK;");
    assert_eq!(run(&mut j, "RESTART;"), "UP3;");
    assert_eq!(run(&mut j, "FORCE;"), "UP3;");
}

#[test]
fn dispatch_unknown() {
    let mut j = jammer(all_present());
    assert_eq!(run(&mut j, "HELLO;"), "?;");
    assert_eq!(j.activity(), Activity::Inactive);
}
