// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fire-and-forget usage ping
//!
//! Sent after a successful export on a detached thread. A failing ping is
//! logged and otherwise ignored; it never delays or fails the export.

use std::sync::Arc;
use std::thread::JoinHandle;

/// What a ping reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingEvent {
    /// Output format, `"ifc"` or `"ifcx"`
    pub format: &'static str,
    pub entity_count: usize,
    pub version: &'static str,
}

/// Destination for usage pings
pub trait UsagePing: Send + Sync {
    fn send(&self, event: &PingEvent) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Ping that only writes a log line
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPing;

impl UsagePing for LogPing {
    fn send(&self, event: &PingEvent) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        log::info!(
            "usage: {} export of {} entities (ifc-export {})",
            event.format,
            event.entity_count,
            event.version
        );
        Ok(())
    }
}

/// Send `event` on its own thread
///
/// The handle is only returned so tests can wait for delivery; callers drop it.
pub fn spawn(ping: Arc<dyn UsagePing>, event: PingEvent) -> Option<JoinHandle<()>> {
    let spawned = std::thread::Builder::new()
        .name("usage-ping".to_string())
        .spawn(move || {
            if let Err(e) = ping.send(&event) {
                log::warn!("Usage ping failed: {}", e);
            }
        });

    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::warn!("Usage ping not sent: {}", e);
            None
        }
    }
}
