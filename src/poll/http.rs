//! HTTP readiness probe.
//!
//! A short-timeout GET against a URL, judged ready when the response is
//! successful and, when configured, the body carries an expected marker.
//! The marker distinguishes "the load balancer answers" from "the load
//! balancer serves the right page".

use log::debug;
use reqwest::blocking::Client;
use std::time::Duration;

use crate::error::Result;
use crate::poll::ProbeOutcome;

/// Longest excerpt of a response body kept as captured text.
const CAPTURE_LIMIT: usize = 200;

pub struct HttpProbe {
    url: String,
    marker: Option<String>,
    client: Client,
}

impl HttpProbe {
    /// Creates a probe for `url` with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            marker: None,
            client,
        })
    }

    /// Builder method to require `marker` in the response body.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Performs one evaluation.
    ///
    /// An unreachable endpoint is pending with nothing captured; a reachable
    /// endpoint that is not yet serving the expected content captures its
    /// status or a body excerpt so the caller can see how far along it is.
    pub fn check(&self) -> ProbeOutcome {
        match self.client.get(&self.url).send() {
            Ok(response) => {
                let status = response.status();
                let body = response.text().unwrap_or_default();
                if !status.is_success() {
                    debug!("GET {} -> {}", self.url, status);
                    return ProbeOutcome::pending_with(format!("HTTP {}", status));
                }
                match &self.marker {
                    Some(marker) if !body.contains(marker.as_str()) => {
                        debug!(
                            "GET {} -> {} but marker {:?} not present yet",
                            self.url, status, marker
                        );
                        ProbeOutcome::pending_with(excerpt(&body))
                    }
                    _ => {
                        debug!("GET {} -> {}", self.url, status);
                        if body.trim().is_empty() {
                            ProbeOutcome::ready()
                        } else {
                            ProbeOutcome::ready_with(excerpt(&body))
                        }
                    }
                }
            }
            Err(e) => {
                debug!("GET {} unreachable: {}", self.url, e);
                ProbeOutcome::pending()
            }
        }
    }
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= CAPTURE_LIMIT {
        trimmed.to_string()
    } else {
        trimmed.chars().take(CAPTURE_LIMIT).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_keeps_short_bodies() {
        assert_eq!(excerpt("  healthy\n"), "healthy");
    }

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        let body = "x".repeat(CAPTURE_LIMIT * 3);
        assert_eq!(excerpt(&body).chars().count(), CAPTURE_LIMIT);
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let body = "é".repeat(CAPTURE_LIMIT + 50);
        assert_eq!(excerpt(&body).chars().count(), CAPTURE_LIMIT);
    }

    #[test]
    fn test_builder_sets_marker() {
        let probe = HttpProbe::new("http://127.0.0.1:1/health", Duration::from_secs(1))
            .unwrap()
            .with_marker("serving");
        assert_eq!(probe.marker.as_deref(), Some("serving"));
    }
}
