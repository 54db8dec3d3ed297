//! Remote command execution with bounded retry.
//!
//! The executor masks transient failures (a tunnel that is still coming up,
//! an agent that has not finished booting) by re-running the same command a
//! bounded number of times with a fixed pause in between. Exhaustion is
//! reported as a value, not an error, so callers choose what it means.

pub mod command;
pub mod executor;
pub mod target;

pub use command::CommandSpec;
pub use executor::{ExecOutcome, ExecutionResult, RemoteExecutor, RetryPolicy};
pub use target::RemoteTarget;
