//! Google Calendar integration: connection status, the sync state machine,
//! the OAuth redirect handshake and the settings panel view.

pub mod callback;
pub mod panel;
pub mod status;
pub mod sync;

pub use callback::{CallbackHandshake, CallbackParams, CallbackPhase, DEFAULT_REDIRECT_DELAY};
pub use panel::{CalendarPanel, PanelControl};
pub use status::{ConnectionState, SyncAck, SyncStatus};
pub use sync::CalendarSync;
