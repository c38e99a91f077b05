//! Command execution against the host.

use std::time::Instant;

use tabkeep_core::BackOutcome;
use tabkeep_webview::ActivityBridge;

use super::commands::{Command, HELP};
use super::core::TabkeepApp;

/// Output of one command.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Reply {
    fn line(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
            quit: false,
        }
    }

    fn quit(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
            quit: true,
        }
    }
}

impl TabkeepApp {
    /// Parse and execute one stdin line.
    pub fn handle_line(&mut self, line: &str, now: Instant) -> Reply {
        if line.trim().is_empty() {
            return Reply::default();
        }
        match line.parse::<Command>() {
            Ok(command) => {
                tracing::debug!(?command, "Command");
                self.execute(command, now)
            }
            Err(e) => Reply::line(e.to_string()),
        }
    }

    pub fn execute(&mut self, command: Command, now: Instant) -> Reply {
        match command {
            Command::New(url) => match self.host.new_tab(url.as_deref(), now) {
                Ok(id) => {
                    if let Some(surface) = self.surface_of(&id) {
                        let url = self.host.tabs().get(&id).map(|t| t.url.clone());
                        self.emit_page_load(surface, url.as_deref().unwrap_or_default());
                    }
                    Reply::line(format!("opened {id}"))
                }
                Err(e) => Reply::line(format!("failed to open tab: {e}")),
            },
            Command::Close(tab_ref) => {
                let Some(id) = self.resolve_tab(&tab_ref) else {
                    return no_such_tab(&tab_ref);
                };
                match self.host.close_tab(&id, now) {
                    Ok(_) => Reply::line(format!("closed {id}")),
                    Err(e) => Reply::line(format!("failed to close tab: {e}")),
                }
            }
            Command::Switch(tab_ref) => {
                let Some(id) = self.resolve_tab(&tab_ref) else {
                    return no_such_tab(&tab_ref);
                };
                self.host.switch_to(&id, now);
                Reply::line(format!("switched to {id}"))
            }
            Command::List => Reply {
                lines: self.list_lines(),
                quit: false,
            },
            Command::Acquire(tab_ref) => self.signal(&tab_ref, true),
            Command::Release(tab_ref) => self.signal(&tab_ref, false),
            Command::Screen(false) => match self.host.on_screen_off(now) {
                Some(deadline) => Reply::line(format!(
                    "screen off, holds released in {}s",
                    deadline.saturating_duration_since(now).as_secs()
                )),
                None => Reply::line("screen off, force release disabled"),
            },
            Command::Screen(true) => {
                self.host.on_screen_on();
                Reply::line("screen on")
            }
            Command::Back => match self.host.on_back_pressed(now) {
                BackOutcome::WentBack => Reply::line("went back"),
                BackOutcome::Blocked { remaining } => {
                    Reply::line(format!("back blocked, {remaining} more"))
                }
                BackOutcome::Exit => Reply::quit("nothing to go back to, exiting"),
            },
            Command::Load(tab_ref, url) => {
                let Some(id) = self.resolve_tab(&tab_ref) else {
                    return no_such_tab(&tab_ref);
                };
                if !self.host.navigate(&id, &url, now) {
                    return no_such_tab(&tab_ref);
                }
                if let Some(surface) = self.surface_of(&id) {
                    self.emit_page_load(surface, &url);
                }
                Reply::line(format!("loading {url}"))
            }
            Command::Bookmark(tab_ref) => {
                let Some(id) = self.resolve_tab(&tab_ref) else {
                    return no_such_tab(&tab_ref);
                };
                match self.host.bookmark_tab(&id) {
                    Ok(Some(b)) => Reply::line(format!("bookmarked {}", b.url)),
                    Ok(None) => no_such_tab(&tab_ref),
                    Err(e) => Reply::line(format!("failed to save bookmark: {e}")),
                }
            }
            Command::Bookmarks => {
                let lines: Vec<String> = self
                    .host
                    .bookmarks()
                    .list()
                    .into_iter()
                    .map(|b| format!("{} | {}", b.name, b.url))
                    .collect();
                if lines.is_empty() {
                    Reply::line("no bookmarks")
                } else {
                    Reply { lines, quit: false }
                }
            }
            Command::Log => match self.host.diagnostic_log() {
                Some(log) => Reply {
                    lines: log.read().lines().map(str::to_string).collect(),
                    quit: false,
                },
                None => Reply::line("keep-alive log unavailable"),
            },
            Command::ClearLog => match self.host.diagnostic_log().map(|log| log.clear()) {
                Some(Ok(())) => Reply::line("log cleared"),
                Some(Err(e)) => Reply::line(format!("failed to clear log: {e}")),
                None => Reply::line("keep-alive log unavailable"),
            },
            Command::Help => Reply {
                lines: HELP.lines().map(str::to_string).collect(),
                quit: false,
            },
            Command::Quit => Reply::quit("bye"),
        }
    }

    /// Post a bridge signal for `tab_ref`, as page script would.
    fn signal(&self, tab_ref: &str, acquire: bool) -> Reply {
        let Some(surface) = self
            .resolve_tab(tab_ref)
            .and_then(|id| self.surface_of(&id))
        else {
            return no_such_tab(tab_ref);
        };
        let bridge = ActivityBridge::new(surface, self.sink.clone());
        if acquire {
            bridge.acquire();
        } else {
            bridge.release();
        }
        Reply::line(format!(
            "{} sent to {surface}",
            if acquire { "acquire" } else { "release" }
        ))
    }

    fn list_lines(&self) -> Vec<String> {
        let tabs = self.host.tabs();
        let service = if self.host.keep_alive().is_service_active() {
            "on"
        } else {
            "off"
        };
        let mut lines: Vec<String> = tabs
            .tabs()
            .iter()
            .enumerate()
            .map(|(i, tab)| {
                let marker = if tabs.is_current(tab.id()) { '*' } else { ' ' };
                let mut flags = String::new();
                if tab.is_background_paused() {
                    flags.push_str(" [paused]");
                }
                if tab.is_keep_alive_active() {
                    flags.push_str(" [keep-alive]");
                }
                let short: String = tab.id().as_str().chars().take(8).collect();
                format!("{marker} {} {short} {} | {}{flags}", i + 1, tab.title, tab.url)
            })
            .collect();
        lines.push(format!(
            "keep-alive service: {service}, holders: {}",
            self.host.keep_alive().holder_count()
        ));
        lines
    }
}

fn no_such_tab(tab_ref: &str) -> Reply {
    Reply::line(format!("no such tab: {tab_ref}"))
}
