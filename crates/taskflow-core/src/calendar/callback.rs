//! The OAuth redirect handshake.
//!
//! Google sends the browser back to the app with `code`, `error` and `state`
//! query parameters. The handshake checks them in a fixed order, performs the
//! code exchange at most once per distinct redirect and reports a phase the
//! callback view can render.

use std::time::Duration;
use tracing::{debug, info};
use url::{form_urlencoded, Url};

use super::sync::CalendarSync;
use crate::api::CalendarBackend;
use crate::auth::UserId;
use crate::error::{CallbackError, ValidationError};

/// Pause on the success screen before returning to the app.
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(2000);

/// Query parameters of the redirect. Empty values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
    pub state: Option<String>,
    raw: Vec<(String, String)>,
}

impl CallbackParams {
    /// Accepts a full redirect URL or just its query string.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        if input.contains("://") {
            let url = Url::parse(input)
                .map_err(|e| ValidationError::invalid("url", format!("Invalid redirect URL: {e}")))?;
            Ok(Self::from_query(url.query().unwrap_or_default()))
        } else {
            Ok(Self::from_query(input))
        }
    }

    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let raw: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let take = |name: &str| {
            raw.iter()
                .find(|(k, v)| k == name && !v.is_empty())
                .map(|(_, v)| v.clone())
        };
        Self {
            code: take("code"),
            error: take("error"),
            state: take("state"),
            raw,
        }
    }

    /// Everything received, re-encoded, for diagnostics.
    pub fn raw_query(&self) -> String {
        if self.raw.is_empty() {
            return "none".to_string();
        }
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.raw.iter())
            .finish()
    }
}

/// What the callback view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackPhase {
    Processing,
    Succeeded {
        message: String,
        redirect_after: Duration,
    },
    Failed(CallbackError),
}

impl CallbackPhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CallbackPhase::Processing)
    }
}

type RunKey = (CallbackParams, Option<UserId>);

/// One-shot driver for a redirect.
///
/// Running again with the same parameters and user returns the stored
/// outcome instead of exchanging the code a second time.
#[derive(Debug)]
pub struct CallbackHandshake {
    redirect_delay: Duration,
    last: Option<(RunKey, CallbackPhase)>,
}

impl Default for CallbackHandshake {
    fn default() -> Self {
        Self::new(DEFAULT_REDIRECT_DELAY)
    }
}

impl CallbackHandshake {
    pub fn new(redirect_delay: Duration) -> Self {
        Self {
            redirect_delay,
            last: None,
        }
    }

    pub fn phase(&self) -> CallbackPhase {
        self.last
            .as_ref()
            .map(|(_, phase)| phase.clone())
            .unwrap_or(CallbackPhase::Processing)
    }

    pub async fn run<B: CalendarBackend>(
        &mut self,
        params: &CallbackParams,
        user_id: Option<UserId>,
        sync: &mut CalendarSync<B>,
    ) -> CallbackPhase {
        let key = (params.clone(), user_id);
        if let Some((seen, phase)) = &self.last {
            if *seen == key {
                debug!("callback already handled; returning stored outcome");
                return phase.clone();
            }
        }

        let phase = self.process(params, user_id, sync).await;
        self.last = Some((key, phase.clone()));
        phase
    }

    async fn process<B: CalendarBackend>(
        &self,
        params: &CallbackParams,
        user_id: Option<UserId>,
        sync: &mut CalendarSync<B>,
    ) -> CallbackPhase {
        if let Some(error) = &params.error {
            return fail(
                sync,
                CallbackError::ProviderDenied {
                    error: error.clone(),
                    state: params.state.clone(),
                },
            );
        }
        let Some(code) = &params.code else {
            return fail(
                sync,
                CallbackError::MissingCode {
                    received: params.raw_query(),
                },
            );
        };
        if user_id.is_none() {
            return fail(sync, CallbackError::MissingUser);
        }

        match sync.handle_google_callback(code, user_id).await {
            Ok(ack) => {
                info!("calendar callback succeeded");
                let message = if ack.message.is_empty() {
                    "Google Calendar connected successfully".to_string()
                } else {
                    ack.message
                };
                CallbackPhase::Succeeded {
                    message,
                    redirect_after: self.redirect_delay,
                }
            }
            Err(err) => CallbackPhase::Failed(err),
        }
    }

    /// Hold the success screen for the configured delay. Returns at once for
    /// any other phase.
    pub async fn await_redirect(&self, phase: &CallbackPhase) {
        if let CallbackPhase::Succeeded { redirect_after, .. } = phase {
            tokio::time::sleep(*redirect_after).await;
        }
    }
}

fn fail<B: CalendarBackend>(sync: &mut CalendarSync<B>, err: CallbackError) -> CallbackPhase {
    sync.fail_callback(&err);
    CallbackPhase::Failed(err)
}
