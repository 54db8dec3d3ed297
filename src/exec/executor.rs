//! Bounded-retry execution of commands on remote targets.
//!
//! On the first try, a transient failure (tunnel negotiation still in
//! flight, sshd not yet accepting, an agent that has not booted) looks
//! identical to a persistent one. The executor re-runs the same command a
//! bounded number of times with a fixed pause and reports the outcome as a
//! value, so "still failing" stays an expected state rather than a fault.

use log::{debug, error, info, warn};
use serde::Serialize;
use std::thread;
use std::time::Duration;

use crate::exec::command::CommandSpec;
use crate::exec::target::RemoteTarget;
use crate::transport::{diagnostics, CommandOutput, Transport};

/// Retry bounds for a single `run` call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, counting the first (must be at least 1)
    pub max_attempts: u32,
    /// Fixed pause before each retry; zero retries immediately
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(20),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given attempt count and inter-attempt delay.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// A single attempt with no delay.
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }
}

/// Outcome tag of an execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExecOutcome {
    Success,
    Failed,
}

/// Result of running one command with retry.
///
/// Produced fresh per invocation; the executor keeps no state between calls.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub outcome: ExecOutcome,
    /// Stdout of the last run, or the transport error text when the target
    /// could not be reached at all
    pub output: String,
    /// Attempts consumed, counting from 1
    pub attempts_used: u32,
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        self.outcome == ExecOutcome::Success
    }
}

enum AttemptFailure {
    /// The command could not be run at all
    Unreachable(String),
    /// The command ran but its output failed the success predicate
    Rejected(CommandOutput),
}

/// Runs commands on remote targets through a transport, retrying on failure.
///
/// Attempts are strictly sequential on the calling thread; sessions through
/// a tunnel are stateful and must never race.
pub struct RemoteExecutor<'a> {
    transport: &'a dyn Transport,
}

impl<'a> RemoteExecutor<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    /// Executes `command` on `target`, retrying up to `policy.max_attempts`
    /// times with `policy.delay` between attempts.
    ///
    /// The first attempt whose output satisfies the command's predicate wins
    /// and no further attempts are made. Exhausting every attempt yields
    /// [`ExecOutcome::Failed`] as an ordinary value; an advisory diagnosis of
    /// the last failure goes to the log, not into the result.
    ///
    /// # Panics
    ///
    /// Panics if `policy.max_attempts` is zero.
    pub fn run(
        &self,
        target: &RemoteTarget,
        command: &CommandSpec,
        policy: &RetryPolicy,
    ) -> ExecutionResult {
        assert!(
            policy.max_attempts >= 1,
            "RetryPolicy::max_attempts must be at least 1"
        );

        let mut last_captured = String::new();
        let mut last_failure = None;

        for attempt in 1..=policy.max_attempts {
            info!(
                "Executing on {} (attempt {}/{}): {}",
                target.qualified_name(),
                attempt,
                policy.max_attempts,
                command.command
            );

            match self.transport.execute(target, &command.command) {
                Ok(output) if command.accepts(&output) => {
                    debug!(
                        "Attempt {} accepted with exit code {}",
                        attempt, output.exit_code
                    );
                    return ExecutionResult {
                        outcome: ExecOutcome::Success,
                        output: output.stdout,
                        attempts_used: attempt,
                    };
                }
                Ok(output) => {
                    debug!(
                        "Attempt {} ran but was rejected (exit code {}, expected {})",
                        attempt, output.exit_code, command.expect_exit_code
                    );
                    last_captured = output.stdout.clone();
                    last_failure = Some(AttemptFailure::Rejected(output));
                }
                Err(e) => {
                    debug!("Attempt {} could not reach the target: {}", attempt, e);
                    last_captured = e.to_string();
                    last_failure = Some(AttemptFailure::Unreachable(e.to_string()));
                }
            }

            if attempt < policy.max_attempts {
                warn!(
                    "Attempt {}/{} on {} failed, retrying in {:?}",
                    attempt,
                    policy.max_attempts,
                    target.qualified_name(),
                    policy.delay
                );
                thread::sleep(policy.delay);
            }
        }

        if let Some(failure) = &last_failure {
            let hint = match failure {
                AttemptFailure::Unreachable(text) => {
                    diagnostics::diagnose_transport_failure(text, target, &self.transport.describe())
                }
                AttemptFailure::Rejected(output) => {
                    diagnostics::diagnose_command_failure(output, &command.command, target)
                }
            };
            error!(
                "Command failed on {} after {} attempt(s)\n{}",
                target.qualified_name(),
                policy.max_attempts,
                hint
            );
        }

        ExecutionResult {
            outcome: ExecOutcome::Failed,
            output: last_captured,
            attempts_used: policy.max_attempts,
        }
    }
}
