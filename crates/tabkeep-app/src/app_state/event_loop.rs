//! The single-owner loop.
//!
//! Everything that mutates the host is serialized here. Surface callbacks
//! and the stdin reader only send messages; timer deadlines come from the
//! host and are awaited with `sleep_until`.

use tabkeep_common::Event;
use tabkeep_config::TabkeepConfig;
use tabkeep_webview::WebViewEvent;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::Instant;

use super::core::TabkeepApp;

fn now() -> std::time::Instant {
    Instant::now().into_std()
}

async fn sleep_until(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

async fn next_config(rx: &mut Option<watch::Receiver<TabkeepConfig>>) -> Option<TabkeepConfig> {
    let rx = rx.as_mut()?;
    rx.changed().await.ok()?;
    let config = rx.borrow_and_update().clone();
    Some(config)
}

impl TabkeepApp {
    /// Initialise the host and process input until `quit`, end of input, or
    /// Ctrl-C. The host is shut down before returning.
    ///
    /// Replies and notices are written through `print`.
    pub async fn run(
        &mut self,
        mut commands: mpsc::UnboundedReceiver<String>,
        mut webview_rx: mpsc::UnboundedReceiver<WebViewEvent>,
        mut config_rx: Option<watch::Receiver<TabkeepConfig>>,
        mut print: impl FnMut(&str),
    ) -> tabkeep_common::Result<()> {
        let mut host_events = self.host.subscribe();
        self.host.init(now())?;
        tracing::info!(tabs = self.host.tabs().len(), "Entering event loop");

        let mut watching = config_rx.is_some();
        loop {
            let deadline = self.host.next_deadline();
            tokio::select! {
                line = commands.recv() => {
                    let Some(line) = line else {
                        tracing::info!("Input closed");
                        break;
                    };
                    let reply = self.handle_line(&line, now());
                    for text in &reply.lines {
                        print(text);
                    }
                    if reply.quit {
                        break;
                    }
                }
                Some(event) = webview_rx.recv() => {
                    self.host.handle_webview_event(event, now());
                }
                config = next_config(&mut config_rx), if watching => match config {
                    Some(config) => self.host.apply_config(config, now()),
                    None => {
                        tracing::warn!("Config reload channel closed");
                        watching = false;
                    }
                },
                () = sleep_until(deadline) => {
                    self.host.fire_due(now());
                }
                event = host_events.recv() => match event {
                    Ok(Event::Notice(text)) => print(&format!("! {text}")),
                    Ok(Event::ServiceStarted) => print("! keep-alive service started"),
                    Ok(Event::ServiceStopped) => print("! keep-alive service stopped"),
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("host event stream lagged by {n} events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupted");
                    break;
                }
            }
        }

        self.host.shutdown();
        Ok(())
    }
}
