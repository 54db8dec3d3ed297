//! TCP reachability probe.
//!
//! Readiness of a freshly created network path often shows up first as "the
//! port accepts connections". The address is resolved on every evaluation so
//! that DNS propagation can converge while the poll is running.

use log::debug;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::poll::ProbeOutcome;

pub struct TcpProbe {
    addr: String,
    timeout: Duration,
}

impl TcpProbe {
    /// Creates a probe for `addr` (a `host:port` string) with the given
    /// per-connection timeout.
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
        }
    }

    /// Performs one evaluation: resolve, then attempt a connection.
    pub fn check(&self) -> ProbeOutcome {
        let mut addrs = match self.addr.to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                debug!("{} does not resolve yet: {}", self.addr, e);
                return ProbeOutcome::pending_with(format!("resolution failed: {}", e));
            }
        };
        let addr = match addrs.next() {
            Some(addr) => addr,
            None => {
                return ProbeOutcome::pending_with(format!("no addresses for {}", self.addr));
            }
        };
        match TcpStream::connect_timeout(&addr, self.timeout) {
            Ok(_) => ProbeOutcome::ready_with(format!("{} accepts connections", addr)),
            Err(e) => {
                debug!("{} not accepting connections: {}", addr, e);
                ProbeOutcome::pending()
            }
        }
    }
}
