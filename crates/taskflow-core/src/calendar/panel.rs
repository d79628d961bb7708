//! Which controls the calendar settings panel shows.

use super::status::{ConnectionState, SyncStatus};
use super::sync::CalendarSync;
use crate::api::CalendarBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelControl {
    Connect { enabled: bool },
    SyncToggle { on: bool, enabled: bool },
    Disconnect { enabled: bool, requires_confirmation: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarPanel {
    pub state: ConnectionState,
    pub controls: Vec<PanelControl>,
    /// Shown while waiting for the browser round trip.
    pub hint: Option<&'static str>,
    pub error: Option<String>,
}

impl CalendarPanel {
    pub fn from_state(
        status: &SyncStatus,
        auth_pending: bool,
        loading: bool,
        error: Option<&str>,
    ) -> Self {
        let state = ConnectionState::derive(status, auth_pending);
        let enabled = !loading;
        let (controls, hint) = match state {
            ConnectionState::Disconnected => (vec![PanelControl::Connect { enabled }], None),
            ConnectionState::Connecting => (
                vec![PanelControl::Connect { enabled: false }],
                Some("Complete authentication in your browser"),
            ),
            ConnectionState::Connected => (
                vec![
                    PanelControl::SyncToggle {
                        on: status.calendar_sync,
                        enabled,
                    },
                    PanelControl::Disconnect {
                        enabled,
                        requires_confirmation: true,
                    },
                ],
                None,
            ),
        };
        Self {
            state,
            controls,
            hint,
            error: error.map(str::to_string),
        }
    }

    pub fn of<B: CalendarBackend>(sync: &CalendarSync<B>) -> Self {
        Self::from_state(
            &sync.status(),
            sync.is_awaiting_callback(),
            sync.is_loading(),
            sync.error(),
        )
    }

    pub fn exposes_toggle(&self) -> bool {
        self.controls
            .iter()
            .any(|c| matches!(c, PanelControl::SyncToggle { .. }))
    }
}
