use std::sync::Arc;

use stockdesk_client::{AlertFeed, AlertPoller, HttpAlertFeed};
use stockdesk_core::domain::alert::{Alert, AlertId};
use tracing::info;

use crate::commands::{with_session, CommandResult, EXIT_RUNTIME};

pub fn run(watch: bool, mark_read: Option<String>) -> CommandResult {
    with_session("alerts", |config, context| async move {
        let feed = Arc::new(HttpAlertFeed::new(context.api()));

        if let Some(id) = mark_read {
            return execute_mark_read(feed.as_ref(), &AlertId(id)).await;
        }
        if !watch {
            return execute_list(feed.as_ref()).await;
        }

        let handle = AlertPoller::new(feed, config.inventory.alert_poll_interval()).start();
        let mut updates = handle.subscribe();
        info!(
            event_name = "cli.alerts.watch_started",
            interval_secs = config.inventory.alert_poll_interval_secs,
            "watching alerts; press Ctrl-C to stop"
        );

        loop {
            tokio::select! {
                signal = tokio::signal::ctrl_c() => {
                    handle.stop().await;
                    return match signal {
                        Ok(()) => CommandResult::success("alerts", "alert watch stopped"),
                        Err(error) => CommandResult::failure(
                            "alerts",
                            "signal",
                            format!("failed to listen for Ctrl-C: {error}"),
                            EXIT_RUNTIME,
                        ),
                    };
                }
                changed = updates.changed() => {
                    if changed.is_err() {
                        return CommandResult::failure(
                            "alerts",
                            "poller_stopped",
                            "alert poller ended unexpectedly",
                            EXIT_RUNTIME,
                        );
                    }
                    let alerts = updates.borrow_and_update().clone();
                    println!("{}", CommandResult::success("alerts", render_alerts(&alerts)).output);
                }
            }
        }
    })
}

pub async fn execute_list(feed: &dyn AlertFeed) -> CommandResult {
    match feed.unread_alerts().await {
        Ok(alerts) => CommandResult::success("alerts", render_alerts(&alerts)),
        Err(error) => CommandResult::from_client_error("alerts", &error),
    }
}

pub async fn execute_mark_read(feed: &dyn AlertFeed, id: &AlertId) -> CommandResult {
    match feed.mark_read(id).await {
        Ok(()) => CommandResult::success("alerts", format!("alert {id} marked as read")),
        Err(error) => CommandResult::from_client_error("alerts", &error),
    }
}

pub fn render_alerts(alerts: &[Alert]) -> String {
    if alerts.is_empty() {
        return "no unread alerts".to_string();
    }

    let mut lines = vec![format!("{} unread alert(s):", alerts.len())];
    lines.extend(alerts.iter().map(|alert| {
        format!(
            "- [{}] {} ({}, {})",
            alert.kind.badge(),
            alert.message,
            alert.id,
            alert.created_at.format("%Y-%m-%d %H:%M UTC"),
        )
    }));
    lines.join("\n")
}
