//! Readiness polling for asynchronously-converging resources.
//!
//! Network convergence has no fixed completion time: a managed instance
//! group, a DNS record, or a freshly attached load balancer becomes ready
//! "eventually". Instead of guessing with an unconditional sleep, callers
//! describe a cheap probe and a time budget, and the poller re-evaluates the
//! probe on a fixed interval until it reports ready or the budget is spent.

pub mod http;
pub mod tcp;

pub use http::HttpProbe;
pub use tcp::TcpProbe;

use log::{debug, info};
use serde::Serialize;
use std::thread;
use std::time::{Duration, Instant};

/// One probe evaluation, with whatever text the probe captured along the
/// way (a body excerpt, a status line, an error message).
#[derive(Debug, Clone)]
pub enum ProbeOutcome {
    /// The condition is observably true
    Ready(Option<String>),
    /// Not yet; keep polling
    Pending(Option<String>),
}

impl ProbeOutcome {
    pub fn ready() -> Self {
        Self::Ready(None)
    }

    pub fn ready_with(captured: impl Into<String>) -> Self {
        Self::Ready(Some(captured.into()))
    }

    pub fn pending() -> Self {
        Self::Pending(None)
    }

    pub fn pending_with(captured: impl Into<String>) -> Self {
        Self::Pending(Some(captured.into()))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Poll cadence and budget for a single `wait_for` call.
#[derive(Debug, Clone)]
pub struct PollSpec {
    /// Pause between evaluations (must be non-zero)
    pub interval: Duration,
    /// Total time budget; zero means a single immediate evaluation
    pub deadline: Duration,
}

impl Default for PollSpec {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            deadline: Duration::from_secs(120),
        }
    }
}

impl PollSpec {
    pub fn new(interval: Duration, deadline: Duration) -> Self {
        Self { interval, deadline }
    }
}

/// Outcome tag of a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PollOutcome {
    Ready,
    TimedOut,
}

/// Result of polling a probe until ready or out of budget.
#[derive(Debug, Clone, Serialize)]
pub struct PollResult {
    pub outcome: PollOutcome,
    /// Time spent polling, measured from the first evaluation
    pub elapsed: Duration,
    /// Captured text from the most recent evaluation
    pub captured: Option<String>,
}

impl PollResult {
    pub fn is_ready(&self) -> bool {
        self.outcome == PollOutcome::Ready
    }
}

/// Polls `probe` until it reports ready or `spec.deadline` elapses.
///
/// The probe is evaluated immediately, then once per interval. The deadline
/// is checked after each evaluation, so a probe that comes back ready
/// exactly at the boundary still wins, and a zero deadline performs exactly
/// one evaluation. Timing out is an ordinary result, not a fault; the caller
/// decides whether to proceed anyway or abort.
///
/// # Panics
///
/// Panics if `spec.interval` is zero.
pub fn wait_for<F>(mut probe: F, spec: &PollSpec) -> PollResult
where
    F: FnMut() -> ProbeOutcome,
{
    assert!(
        spec.interval > Duration::ZERO,
        "PollSpec::interval must be non-zero"
    );

    let start = Instant::now();

    loop {
        let outcome = probe();
        let elapsed = start.elapsed();

        match outcome {
            ProbeOutcome::Ready(captured) => {
                info!("Probe ready after {:.1}s", elapsed.as_secs_f64());
                return PollResult {
                    outcome: PollOutcome::Ready,
                    elapsed,
                    captured,
                };
            }
            ProbeOutcome::Pending(captured) => {
                if elapsed >= spec.deadline {
                    info!(
                        "Probe still pending after {:.1}s, budget of {:?} spent",
                        elapsed.as_secs_f64(),
                        spec.deadline
                    );
                    return PollResult {
                        outcome: PollOutcome::TimedOut,
                        elapsed,
                        captured,
                    };
                }
                debug!(
                    "Probe pending after {:.1}s of {:?}, next check in {:?}",
                    elapsed.as_secs_f64(),
                    spec.deadline,
                    spec.interval
                );
                thread::sleep(spec.interval);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_probe_returns_immediately() {
        let mut evals = 0;
        let result = wait_for(
            || {
                evals += 1;
                ProbeOutcome::ready_with("up")
            },
            &PollSpec::new(Duration::from_secs(5), Duration::from_secs(60)),
        );
        assert!(result.is_ready());
        assert_eq!(evals, 1);
        assert_eq!(result.captured.as_deref(), Some("up"));
        assert!(result.elapsed < Duration::from_secs(1));
    }

    #[test]
    fn test_zero_deadline_evaluates_exactly_once() {
        let mut evals = 0;
        let result = wait_for(
            || {
                evals += 1;
                ProbeOutcome::pending()
            },
            &PollSpec::new(Duration::from_secs(5), Duration::ZERO),
        );
        assert_eq!(result.outcome, PollOutcome::TimedOut);
        assert_eq!(evals, 1);
    }

    #[test]
    fn test_zero_deadline_ready_probe_still_wins() {
        let result = wait_for(
            || ProbeOutcome::ready(),
            &PollSpec::new(Duration::from_secs(5), Duration::ZERO),
        );
        assert!(result.is_ready());
    }

    #[test]
    #[should_panic(expected = "interval")]
    fn test_zero_interval_panics() {
        wait_for(
            || ProbeOutcome::ready(),
            &PollSpec::new(Duration::ZERO, Duration::from_secs(1)),
        );
    }

    #[test]
    fn test_default_spec() {
        let spec = PollSpec::default();
        assert_eq!(spec.interval, Duration::from_secs(5));
        assert_eq!(spec.deadline, Duration::from_secs(120));
    }
}
