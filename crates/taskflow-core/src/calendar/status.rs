//! Connection and sync flags for one user.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of `GET /calendar/status/{user_id}`.
///
/// Sync cannot be on without a connection; values from the backend are
/// normalized on the way in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireSyncStatus")]
pub struct SyncStatus {
    pub google_connected: bool,
    pub calendar_sync: bool,
}

#[derive(Deserialize)]
struct WireSyncStatus {
    #[serde(default)]
    google_connected: bool,
    #[serde(default)]
    calendar_sync: bool,
}

impl From<WireSyncStatus> for SyncStatus {
    fn from(wire: WireSyncStatus) -> Self {
        SyncStatus::new(wire.google_connected, wire.calendar_sync)
    }
}

impl SyncStatus {
    pub fn new(google_connected: bool, calendar_sync: bool) -> Self {
        Self {
            google_connected,
            calendar_sync: google_connected && calendar_sync,
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }
}

/// Three-way view derived from [`SyncStatus`] and whether an auth request
/// is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    pub fn derive(status: &SyncStatus, auth_pending: bool) -> Self {
        if status.google_connected {
            ConnectionState::Connected
        } else if auth_pending {
            ConnectionState::Connecting
        } else {
            ConnectionState::Disconnected
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "Not connected",
            ConnectionState::Connecting => "Connecting...",
            ConnectionState::Connected => "Connected",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reply to the callback and sync toggle endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncAck {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub sync_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_without_connection_is_normalized() {
        let status: SyncStatus =
            serde_json::from_str(r#"{"calendar_sync": true, "google_connected": false}"#).unwrap();
        assert_eq!(status, SyncStatus::disconnected());
    }

    #[test]
    fn connected_status_keeps_flags() {
        let status: SyncStatus =
            serde_json::from_str(r#"{"calendar_sync": true, "google_connected": true}"#).unwrap();
        assert!(status.calendar_sync);
        assert_eq!(ConnectionState::derive(&status, true), ConnectionState::Connected);
    }

    #[test]
    fn pending_auth_reads_as_connecting() {
        let status = SyncStatus::disconnected();
        assert_eq!(ConnectionState::derive(&status, true), ConnectionState::Connecting);
        assert_eq!(ConnectionState::derive(&status, false), ConnectionState::Disconnected);
    }
}
