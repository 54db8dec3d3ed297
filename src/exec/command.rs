//! Command specification and its success predicate.

use serde::Serialize;

use crate::transport::CommandOutput;

/// A command to run on a remote target, with the predicate that decides
/// whether one run of it counts as success.
///
/// By default a run succeeds when the command exits 0. An expected substring
/// additionally requires a marker on stdout, which catches commands that
/// exit 0 without doing their job. An expected exit code other than 0
/// expresses checks of the "this must still fail" kind.
#[derive(Debug, Clone, Serialize)]
pub struct CommandSpec {
    /// Command text, identical on every attempt
    pub command: String,
    /// Substring that must appear on stdout for a run to be accepted
    pub expect_substring: Option<String>,
    /// Exit code that counts as success
    pub expect_exit_code: i32,
}

impl CommandSpec {
    /// Creates a spec that succeeds on exit code 0.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            expect_substring: None,
            expect_exit_code: 0,
        }
    }

    /// Builder method to require `marker` on stdout.
    pub fn with_expected_substring(mut self, marker: impl Into<String>) -> Self {
        self.expect_substring = Some(marker.into());
        self
    }

    /// Builder method to change the exit code that counts as success.
    pub fn with_expected_exit_code(mut self, code: i32) -> Self {
        self.expect_exit_code = code;
        self
    }

    /// Decides whether a completed run satisfies this spec.
    pub fn accepts(&self, output: &CommandOutput) -> bool {
        if output.exit_code != self.expect_exit_code {
            return false;
        }
        match &self.expect_substring {
            Some(marker) => output.stdout.contains(marker.as_str()),
            None => true,
        }
    }
}
