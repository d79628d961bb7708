//! Calendar connection flow end to end against a mocked backend.

use std::sync::Arc;

use mockito::{Matcher, Server};
use taskflow_core::auth::{MemorySessionStore, Session, User};
use taskflow_core::calendar::{CalendarPanel, CallbackParams, CallbackPhase, ConnectionState};
use taskflow_core::{AppContext, CallbackError, Config, ConfirmDialog};

fn context(server: &Server) -> AppContext {
    let mut config = Config::default();
    config.api.base_url = server.url();
    config.calendar.redirect_delay_ms = 0;
    let sessions = MemorySessionStore::with_session(Session {
        token: "tok".to_string(),
        user: User {
            id: 7,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            created_at: None,
            updated_at: None,
        },
    });
    AppContext::new(config, Arc::new(sessions)).unwrap()
}

fn status_body(connected: bool, sync: bool) -> String {
    format!(r#"{{"calendar_sync": {sync}, "google_connected": {connected}}}"#)
}

#[tokio::test]
async fn disconnected_panel_hides_toggle() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/calendar/status/7")
        .with_status(200)
        .with_body(status_body(false, false))
        .create_async()
        .await;

    let ctx = context(&server);
    let sync = ctx.calendar().await.unwrap();
    let panel = CalendarPanel::of(&sync);

    assert_eq!(panel.state, ConnectionState::Disconnected);
    assert!(!panel.exposes_toggle());
}

#[tokio::test]
async fn provider_error_never_exchanges() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/calendar/status/7")
        .with_status(200)
        .with_body(status_body(false, false))
        .create_async()
        .await;
    let exchange = server
        .mock("POST", "/calendar/callback")
        .expect(0)
        .create_async()
        .await;

    let ctx = context(&server);
    let mut sync = ctx.calendar().await.unwrap();
    let mut handshake = ctx.callback_handshake();
    let params =
        CallbackParams::parse("http://localhost:3000/calendar/callback?error=access_denied&state=user_7").unwrap();
    let phase = handshake.run(&params, Some(7), &mut sync).await;

    exchange.assert_async().await;
    assert!(matches!(
        phase,
        CallbackPhase::Failed(CallbackError::ProviderDenied { ref error, .. }) if error == "access_denied"
    ));
    assert_eq!(ctx.notifier().len(), 1);
}

#[tokio::test]
async fn valid_code_connects_and_refreshes_once() {
    let mut server = Server::new_async().await;
    let exchange = server
        .mock("POST", "/calendar/callback")
        .match_header("authorization", "Bearer tok")
        .match_body(Matcher::Json(serde_json::json!({"code": "4/abc", "user_id": 7})))
        .with_status(200)
        .with_body(r#"{"message": "Google Calendar connected successfully", "sync_enabled": true}"#)
        .expect(1)
        .create_async()
        .await;
    let status = server
        .mock("GET", "/calendar/status/7")
        .with_status(200)
        .with_body(status_body(true, true))
        .expect(1)
        .create_async()
        .await;

    let ctx = context(&server);
    // Built directly so the only status fetch is the one after the exchange.
    let mut sync = taskflow_core::CalendarSync::new(ctx.api().clone(), ctx.notifier().clone(), Some(7));
    let mut handshake = ctx.callback_handshake();
    let params = CallbackParams::from_query("code=4%2Fabc&state=user_7");

    let phase = handshake.run(&params, Some(7), &mut sync).await;
    // Re-running the same redirect must not exchange again.
    let again = handshake.run(&params, Some(7), &mut sync).await;

    exchange.assert_async().await;
    status.assert_async().await;
    assert_eq!(phase, again);
    match &phase {
        CallbackPhase::Succeeded { message, .. } => {
            assert_eq!(message, "Google Calendar connected successfully")
        }
        other => panic!("unexpected phase: {other:?}"),
    }
    assert!(CalendarPanel::of(&sync).exposes_toggle());
    handshake.await_redirect(&phase).await;
}

#[tokio::test]
async fn failed_exchange_reports_backend_reason() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/calendar/callback")
        .with_status(500)
        .with_body(r#"{"error": "Failed to exchange code for token"}"#)
        .create_async()
        .await;
    let status = server
        .mock("GET", "/calendar/status/7")
        .expect(0)
        .create_async()
        .await;

    let ctx = context(&server);
    let mut sync = taskflow_core::CalendarSync::new(ctx.api().clone(), ctx.notifier().clone(), Some(7));
    let phase = ctx
        .callback_handshake()
        .run(&CallbackParams::from_query("code=abc"), Some(7), &mut sync)
        .await;

    status.assert_async().await;
    assert_eq!(
        phase,
        CallbackPhase::Failed(CallbackError::Exchange {
            reason: "Failed to exchange code for token".to_string()
        })
    );
    assert_eq!(sync.connection_state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn disconnect_requires_confirmation_and_refreshes() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/calendar/status/7")
        .with_status(200)
        .with_body(status_body(true, true))
        .expect(1)
        .create_async()
        .await;

    let ctx = context(&server);
    let mut sync = ctx.calendar().await.unwrap();
    assert_eq!(sync.connection_state(), ConnectionState::Connected);

    server.reset_async().await;
    server
        .mock("POST", "/calendar/disconnect/7")
        .with_status(200)
        .with_body(r#"{"message": "Google Calendar disconnected successfully"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/calendar/status/7")
        .with_status(200)
        .with_body(status_body(false, false))
        .create_async()
        .await;

    let confirmed = ConfirmDialog::disconnect_google().accept();
    sync.disconnect_google(confirmed).await.unwrap();
    assert_eq!(sync.connection_state(), ConnectionState::Disconnected);
    assert!(!sync.status().calendar_sync);
}
