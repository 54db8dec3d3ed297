//! Retry behavior of the remote executor against a scripted transport.

use probex::error::{Error, Result};
use probex::exec::{CommandSpec, ExecOutcome, RemoteExecutor, RemoteTarget, RetryPolicy};
use probex::transport::{CommandOutput, Transport};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// What one scripted attempt should produce.
#[derive(Clone, Copy)]
enum Attempt {
    /// The command ran and produced this exit code and stdout
    Runs(i32, &'static str),
    /// The target could not be reached
    Unreachable(&'static str),
}

/// Transport that answers calls from a fixed script, repeating the last
/// entry once the script is exhausted, and records every command it gets.
struct ScriptedTransport {
    script: Vec<Attempt>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn new(script: Vec<Attempt>) -> Self {
        assert!(!script.is_empty());
        Self {
            script,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn call_count(&self) -> u32 {
        self.calls.lock().unwrap().len() as u32
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, _target: &RemoteTarget, command: &str) -> Result<CommandOutput> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(command.to_string());
        let index = (calls.len() - 1).min(self.script.len() - 1);
        match self.script[index] {
            Attempt::Runs(exit_code, stdout) => Ok(CommandOutput {
                stdout: stdout.to_string(),
                stderr: String::new(),
                exit_code,
            }),
            Attempt::Unreachable(message) => Err(Error::Transport(message.to_string())),
        }
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

fn target() -> RemoteTarget {
    RemoteTarget::new("test-target")
}

#[test]
fn test_always_failing_transport_consumes_every_attempt() {
    for attempts in 1..=5 {
        let transport = ScriptedTransport::new(vec![Attempt::Unreachable("connection refused")]);
        let executor = RemoteExecutor::new(&transport);
        let result = executor.run(
            &target(),
            &CommandSpec::new("uptime"),
            &RetryPolicy::new(attempts, Duration::ZERO),
        );

        assert_eq!(result.outcome, ExecOutcome::Failed);
        assert_eq!(result.attempts_used, attempts);
        assert_eq!(transport.call_count(), attempts);
        assert!(result.output.contains("connection refused"));
    }
}

#[test]
fn test_success_on_attempt_k_stops_retrying() {
    for k in 1..=3u32 {
        let mut script = vec![Attempt::Unreachable("connection refused"); (k - 1) as usize];
        script.push(Attempt::Runs(0, "hi\n"));

        let transport = ScriptedTransport::new(script);
        let executor = RemoteExecutor::new(&transport);
        let result = executor.run(
            &target(),
            &CommandSpec::new("echo hi"),
            &RetryPolicy::new(5, Duration::ZERO),
        );

        assert_eq!(result.outcome, ExecOutcome::Success);
        assert_eq!(result.attempts_used, k);
        assert_eq!(transport.call_count(), k);
        assert_eq!(result.output, "hi\n");
    }
}

#[test]
fn test_same_command_is_sent_on_every_attempt() {
    let transport = ScriptedTransport::new(vec![Attempt::Unreachable("timed out")]);
    RemoteExecutor::new(&transport).run(
        &target(),
        &CommandSpec::new("systemctl is-active app"),
        &RetryPolicy::new(3, Duration::ZERO),
    );
    assert_eq!(
        transport.calls(),
        vec![
            "systemctl is-active app",
            "systemctl is-active app",
            "systemctl is-active app"
        ]
    );
}

#[test]
fn test_delays_happen_only_between_attempts() {
    // Two failures then a success with a 40ms delay: exactly two pauses.
    let transport = ScriptedTransport::new(vec![
        Attempt::Unreachable("connection refused"),
        Attempt::Unreachable("connection refused"),
        Attempt::Runs(0, "hi\n"),
    ]);
    let start = Instant::now();
    let result = RemoteExecutor::new(&transport).run(
        &target(),
        &CommandSpec::new("echo hi"),
        &RetryPolicy::new(3, Duration::from_millis(40)),
    );
    let elapsed = start.elapsed();

    assert!(result.is_success());
    assert_eq!(result.attempts_used, 3);
    assert!(elapsed >= Duration::from_millis(80), "elapsed {:?}", elapsed);
}

#[test]
fn test_no_delay_after_the_final_attempt() {
    // A large delay must not be paid after the last failure.
    let transport = ScriptedTransport::new(vec![Attempt::Unreachable("connection refused")]);
    let start = Instant::now();
    let result = RemoteExecutor::new(&transport).run(
        &target(),
        &CommandSpec::new("uptime"),
        &RetryPolicy::new(1, Duration::from_secs(30)),
    );
    assert_eq!(result.outcome, ExecOutcome::Failed);
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_no_delay_before_the_first_attempt() {
    let transport = ScriptedTransport::new(vec![Attempt::Runs(0, "ok\n")]);
    let start = Instant::now();
    let result = RemoteExecutor::new(&transport).run(
        &target(),
        &CommandSpec::new("true"),
        &RetryPolicy::new(3, Duration::from_secs(30)),
    );
    assert!(result.is_success());
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_zero_delay_retries_immediately() {
    let transport = ScriptedTransport::new(vec![Attempt::Unreachable("timed out")]);
    let start = Instant::now();
    let result = RemoteExecutor::new(&transport).run(
        &target(),
        &CommandSpec::new("uptime"),
        &RetryPolicy::new(4, Duration::ZERO),
    );
    assert_eq!(result.attempts_used, 4);
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_rejected_output_is_retried_like_a_failure() {
    let transport = ScriptedTransport::new(vec![Attempt::Runs(1, "inactive\n")]);
    let result = RemoteExecutor::new(&transport).run(
        &target(),
        &CommandSpec::new("systemctl is-active app"),
        &RetryPolicy::new(3, Duration::ZERO),
    );

    assert_eq!(result.outcome, ExecOutcome::Failed);
    assert_eq!(result.attempts_used, 3);
    assert_eq!(transport.call_count(), 3);
    assert_eq!(result.output, "inactive\n");
}

#[test]
fn test_substring_predicate_gates_success() {
    let transport = ScriptedTransport::new(vec![
        Attempt::Runs(0, "starting\n"),
        Attempt::Runs(0, "service ready\n"),
    ]);
    let result = RemoteExecutor::new(&transport).run(
        &target(),
        &CommandSpec::new("check-state").with_expected_substring("ready"),
        &RetryPolicy::new(5, Duration::ZERO),
    );

    assert!(result.is_success());
    assert_eq!(result.attempts_used, 2);
    assert_eq!(result.output, "service ready\n");
}

#[test]
fn test_expected_exit_code_accepts_a_failing_command() {
    let transport = ScriptedTransport::new(vec![Attempt::Runs(7, "")]);
    let result = RemoteExecutor::new(&transport).run(
        &target(),
        &CommandSpec::new("check-drained").with_expected_exit_code(7),
        &RetryPolicy::new(3, Duration::ZERO),
    );
    assert!(result.is_success());
    assert_eq!(result.attempts_used, 1);
}

#[test]
fn test_expected_exit_code_rejects_exit_zero() {
    let transport = ScriptedTransport::new(vec![Attempt::Runs(0, "still serving\n")]);
    let result = RemoteExecutor::new(&transport).run(
        &target(),
        &CommandSpec::new("check-drained").with_expected_exit_code(7),
        &RetryPolicy::new(2, Duration::ZERO),
    );
    assert_eq!(result.outcome, ExecOutcome::Failed);
    assert_eq!(result.attempts_used, 2);
}

#[test]
fn test_identical_runs_yield_identical_outcomes() {
    for _ in 0..2 {
        let transport = ScriptedTransport::new(vec![Attempt::Unreachable("no route to host")]);
        let result = RemoteExecutor::new(&transport).run(
            &target(),
            &CommandSpec::new("uptime"),
            &RetryPolicy::new(3, Duration::ZERO),
        );
        assert_eq!(result.outcome, ExecOutcome::Failed);
        assert_eq!(result.attempts_used, 3);
    }
}

#[test]
fn test_two_refusals_then_success_scenario() {
    // Policy of 3 attempts with a short delay: two refusals, then "hi".
    let transport = ScriptedTransport::new(vec![
        Attempt::Unreachable("connection refused"),
        Attempt::Unreachable("connection refused"),
        Attempt::Runs(0, "hi\n"),
    ]);
    let start = Instant::now();
    let result = RemoteExecutor::new(&transport).run(
        &target(),
        &CommandSpec::new("echo hi"),
        &RetryPolicy::new(3, Duration::from_millis(30)),
    );

    assert!(result.is_success());
    assert_eq!(result.output, "hi\n");
    assert_eq!(result.attempts_used, 3);
    assert!(start.elapsed() >= Duration::from_millis(60));
}
