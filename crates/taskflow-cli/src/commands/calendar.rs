//! Google Calendar integration commands.

use clap::{Subcommand, ValueEnum};
use taskflow_core::calendar::{CalendarPanel, CallbackParams, CallbackPhase, PanelControl};
use taskflow_core::ConfirmDialog;

use super::{confirm, context, flush, CmdResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

#[derive(Subcommand)]
pub enum CalendarAction {
    /// Show connection and sync status
    Status,
    /// Start the Google authorization flow
    Connect {
        /// Print the URL without opening a browser
        #[arg(long)]
        no_browser: bool,
    },
    /// Complete authorization with the URL Google redirected to
    Callback {
        /// Full redirect URL or its query string
        url: String,
    },
    /// Turn task syncing on or off
    Sync { state: Switch },
    /// Disconnect Google Calendar
    Disconnect {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

pub async fn run(action: CalendarAction) -> CmdResult {
    let ctx = context()?;
    let mut sync = ctx.calendar().await?;

    match action {
        CalendarAction::Status => print_panel(&CalendarPanel::of(&sync)),
        CalendarAction::Connect { no_browser } => {
            let url = sync.init_google_auth().await;
            flush(ctx.notifier());
            let Some(url) = url else {
                return Err("could not start Google authorization".into());
            };
            println!("{url}");
            if !no_browser {
                if let Err(e) = open::that(&url) {
                    tracing::warn!(error = %e, "failed to open browser");
                }
            }
            print_panel(&CalendarPanel::of(&sync));
            println!("Then run: taskflow calendar callback '<redirect URL>'");
        }
        CalendarAction::Callback { url } => {
            let params = CallbackParams::parse(&url)?;
            let user_id = ctx.current_user()?.map(|u| u.id);
            let mut handshake = ctx.callback_handshake();
            println!("Connecting to Google Calendar...");
            let phase = handshake.run(&params, user_id, &mut sync).await;
            ctx.notifier().clear();
            match &phase {
                CallbackPhase::Succeeded { message, .. } => {
                    println!("{message}");
                    handshake.await_redirect(&phase).await;
                    print_panel(&CalendarPanel::of(&sync));
                }
                CallbackPhase::Failed(err) => return Err(err.clone().into()),
                CallbackPhase::Processing => {}
            }
        }
        CalendarAction::Sync { state } => {
            if !CalendarPanel::of(&sync).exposes_toggle() {
                return Err("Google Calendar is not connected; run `taskflow calendar connect` first".into());
            }
            let result = sync.toggle_calendar_sync(matches!(state, Switch::On)).await;
            flush(ctx.notifier());
            result?;
            print_panel(&CalendarPanel::of(&sync));
        }
        CalendarAction::Disconnect { yes } => {
            let Some(confirmed) = confirm(ConfirmDialog::disconnect_google(), yes)? else {
                println!("Still connected");
                return Ok(());
            };
            let result = sync.disconnect_google(confirmed).await;
            flush(ctx.notifier());
            result?;
            print_panel(&CalendarPanel::of(&sync));
        }
    }
    Ok(())
}

fn print_panel(panel: &CalendarPanel) {
    println!("Google Calendar: {}", panel.state.label());
    for control in &panel.controls {
        let line = match control {
            PanelControl::Connect { enabled } => format!("connect{}", disabled(*enabled)),
            PanelControl::SyncToggle { on, enabled } => {
                format!("sync: {}{}", if *on { "on" } else { "off" }, disabled(*enabled))
            }
            PanelControl::Disconnect { enabled, .. } => format!("disconnect{}", disabled(*enabled)),
        };
        println!("  - {line}");
    }
    if let Some(hint) = panel.hint {
        println!("{hint}");
    }
    if let Some(err) = &panel.error {
        println!("Last error: {err}");
    }
}

fn disabled(enabled: bool) -> &'static str {
    if enabled {
        ""
    } else {
        " (disabled)"
    }
}
