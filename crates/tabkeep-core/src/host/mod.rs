//! The shell controller.
//!
//! `Host` is constructed explicitly and owns the tab manager, the
//! keep-alive coordinator, the screen observer, the back guard and the
//! timer table. Nothing here is global, so tests build isolated hosts from
//! in-memory parts. All methods take the current time; the host never
//! reads a clock itself.

mod navigation;
mod page;
mod tabs;

#[cfg(test)]
mod tests;

use std::rc::Rc;
use std::time::Instant;

use tabkeep_common::{Event, EventBus};
use tabkeep_config::TabkeepConfig;
use tabkeep_webview::SurfaceFactory;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::back_guard::BackGuard;
use crate::bookmarks::BookmarkStore;
use crate::diagnostics::DiagnosticLog;
use crate::keep_alive::{ForegroundService, KeepAliveCoordinator};
use crate::manager::TabManager;
use crate::screen::ScreenStateObserver;
use crate::store::{keys, KeyValueStore};
use crate::timers::{TimerKey, Timers};

pub use navigation::BackOutcome;

const FORCE_RELEASE_LOG: &str = "Force releasing all keep-alive holds due to screen off timeout";
const FORCE_RELEASE_NOTICE: &str = "Background work stopped to save battery";

pub struct Host<S: ForegroundService> {
    config: TabkeepConfig,
    blocked_domains: Vec<String>,
    store: Rc<dyn KeyValueStore>,
    factory: Box<dyn SurfaceFactory>,
    tabs: TabManager,
    keep_alive: KeepAliveCoordinator<S>,
    screen: ScreenStateObserver,
    back_guard: BackGuard,
    timers: Timers,
    log: Option<DiagnosticLog>,
    bookmarks: BookmarkStore,
    events: EventBus,
    shut_down: bool,
}

impl<S: ForegroundService> Host<S> {
    pub fn new(
        config: TabkeepConfig,
        store: Rc<dyn KeyValueStore>,
        factory: Box<dyn SurfaceFactory>,
        service: S,
        mut log: Option<DiagnosticLog>,
    ) -> Self {
        if let Some(log) = log.as_mut() {
            log.set_enabled(config.keep_alive.enable_wakelock_log);
        }
        Self {
            blocked_domains: config.back_guard.domains(),
            tabs: TabManager::new(Rc::clone(&store), config.tabs.inactivity_threshold()),
            keep_alive: KeepAliveCoordinator::new(
                service,
                config.keep_alive.grace_period(),
                config.keep_alive.request_battery_exemption,
            ),
            bookmarks: BookmarkStore::new(Rc::clone(&store)),
            screen: ScreenStateObserver::new(),
            back_guard: BackGuard::new(),
            timers: Timers::new(),
            events: EventBus::default(),
            shut_down: false,
            config,
            store,
            factory,
            log,
        }
    }

    /// Restore saved tabs, guarantee one open tab, and start the sweep.
    pub fn init(&mut self, now: Instant) -> tabkeep_common::Result<()> {
        if self.config.browser.restore_tabs {
            match self.tabs.restore_tabs(&mut *self.factory, now) {
                Ok(0) => {}
                Ok(count) => {
                    info!(count, "Session restored");
                    self.publish_tabs_changed();
                    if let Some(id) = self.tabs.current_id().cloned() {
                        self.events.publish(Event::TabSwitched(id));
                    }
                }
                Err(e) => warn!(error = %e, "Tab restore abandoned, starting fresh"),
            }
        }
        if self.tabs.is_empty() {
            let url = self.initial_url();
            self.new_tab(Some(&url), now)?;
        }
        self.schedule_sweep(now);
        Ok(())
    }

    /// Page for the first tab of a fresh session.
    fn initial_url(&self) -> String {
        if self.config.browser.restore_last_page {
            match self.store.get(keys::LAST_URL) {
                Ok(Some(url)) if !url.is_empty() => return url,
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Failed to read last url"),
            }
        }
        self.config.browser.home_page.clone()
    }

    // -- Timers ----------------------------------------------------------------

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Run every timer due at `now`.
    pub fn fire_due(&mut self, now: Instant) {
        for key in self.timers.take_due(now) {
            match key {
                TimerKey::Sweep => {
                    let report = self.tabs.sweep(now);
                    if report.paused > 0 {
                        info!(paused = report.paused, held = report.held, "Background sweep");
                    }
                    if self.tabs.is_empty() {
                        if let Err(e) = self.new_tab(None, now) {
                            warn!(error = %e, "Failed to replace missing tab");
                        }
                    }
                    self.schedule_sweep(now);
                }
                TimerKey::KeepAliveStop => {
                    if self.keep_alive.on_stop_timer() {
                        info!("Keep-alive grace period elapsed, service stopped");
                        self.events.publish(Event::ServiceStopped);
                    }
                }
                TimerKey::ScreenOffRelease => self.force_release_all(),
            }
        }
    }

    fn schedule_sweep(&mut self, now: Instant) {
        self.timers
            .schedule(TimerKey::Sweep, now + self.config.tabs.sweep_interval());
    }

    // -- Screen ----------------------------------------------------------------

    pub fn on_screen_off(&mut self, now: Instant) -> Option<Instant> {
        let timeout = self.config.keep_alive.screen_off_timeout();
        self.screen.on_screen_off(timeout, &mut self.timers, now)
    }

    pub fn on_screen_on(&mut self) {
        self.screen.on_screen_on(&mut self.timers);
    }

    /// Drop every hold and stop the service immediately.
    pub fn force_release_all(&mut self) {
        let was_active = self.keep_alive.is_service_active();
        let cleared = self
            .keep_alive
            .force_release_all(&mut self.tabs, &mut self.timers);
        if cleared == 0 && !was_active {
            return;
        }
        warn!(cleared, "{FORCE_RELEASE_LOG}");
        self.diagnostic(FORCE_RELEASE_LOG);
        if was_active {
            self.events.publish(Event::ServiceStopped);
        }
        self.notice(FORCE_RELEASE_NOTICE);
    }

    // -- Config ----------------------------------------------------------------

    /// Adopt a reloaded config. A new sweep interval reschedules the sweep;
    /// a new screen-off timeout applies from the next screen-off.
    pub fn apply_config(&mut self, config: TabkeepConfig, now: Instant) {
        self.tabs
            .set_inactivity_threshold(config.tabs.inactivity_threshold());
        self.keep_alive.set_grace(config.keep_alive.grace_period());
        self.keep_alive
            .set_request_exemption(config.keep_alive.request_battery_exemption);
        if let Some(log) = self.log.as_mut() {
            log.set_enabled(config.keep_alive.enable_wakelock_log);
        }
        self.blocked_domains = config.back_guard.domains();

        let sweep_changed = config.tabs.sweep_interval() != self.config.tabs.sweep_interval();
        self.config = config;
        if sweep_changed && self.timers.is_pending(TimerKey::Sweep) {
            self.schedule_sweep(now);
        }
        info!("Config applied");
        self.events.publish(Event::ConfigReloaded);
    }

    // -- Teardown --------------------------------------------------------------

    /// Cancel timers, stop the service, save and destroy every tab.
    /// Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.timers.cancel_all();

        let was_active = self.keep_alive.is_service_active();
        self.keep_alive.shutdown();
        if was_active {
            self.events.publish(Event::ServiceStopped);
        }

        self.tabs.persist();
        let destroyed = self.tabs.destroy_all();
        info!(destroyed, "Host shut down");
        self.events.publish(Event::Shutdown);
    }

    // -- Accessors -------------------------------------------------------------

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub fn config(&self) -> &TabkeepConfig {
        &self.config
    }

    pub fn tabs(&self) -> &TabManager {
        &self.tabs
    }

    pub fn keep_alive(&self) -> &KeepAliveCoordinator<S> {
        &self.keep_alive
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn is_screen_on(&self) -> bool {
        self.screen.is_screen_on()
    }

    pub fn bookmarks(&self) -> &BookmarkStore {
        &self.bookmarks
    }

    pub fn diagnostic_log(&self) -> Option<&DiagnosticLog> {
        self.log.as_ref()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    // -- Internal helpers ------------------------------------------------------

    fn diagnostic(&self, message: &str) {
        if let Some(log) = &self.log {
            log.log(message);
        }
    }

    fn notice(&self, message: impl Into<String>) {
        self.events.publish(Event::Notice(message.into()));
    }

    fn publish_tabs_changed(&self) {
        self.events
            .publish(Event::TabsChanged(self.tabs.generation()));
    }
}
