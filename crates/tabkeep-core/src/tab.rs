//! One browsing context and the surface it owns.

use std::time::Instant;

use tabkeep_common::{SurfaceId, TabId};
use tabkeep_webview::navigation::BLANK_PAGE;
use tabkeep_webview::scripts::injection_scripts;
use tabkeep_webview::RenderSurface;
use tracing::{debug, warn};

pub const DEFAULT_TITLE: &str = "New Tab";

pub struct Tab {
    id: TabId,
    surface: Box<dyn RenderSurface>,
    pub url: String,
    pub title: String,
    last_active: Instant,
    background_paused: bool,
    keep_alive: bool,
}

impl Tab {
    pub fn new(surface: Box<dyn RenderSurface>, now: Instant) -> Self {
        Self::restored(TabId::new(), surface, String::new(), DEFAULT_TITLE.into(), now)
    }

    /// Rebuild a tab from persisted identity and page info.
    pub fn restored(
        id: TabId,
        surface: Box<dyn RenderSurface>,
        url: String,
        title: String,
        now: Instant,
    ) -> Self {
        Self {
            id,
            surface,
            url,
            title,
            last_active: now,
            background_paused: false,
            keep_alive: false,
        }
    }

    pub fn id(&self) -> &TabId {
        &self.id
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.surface.id()
    }

    pub fn surface(&self) -> &dyn RenderSurface {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> &mut dyn RenderSurface {
        self.surface.as_mut()
    }

    pub fn last_active(&self) -> Instant {
        self.last_active
    }

    pub fn is_background_paused(&self) -> bool {
        self.background_paused
    }

    pub fn is_keep_alive_active(&self) -> bool {
        self.keep_alive
    }

    /// Record activity at `now`. A paused tab is un-paused before anything
    /// else happens to it.
    pub fn mark_active(&mut self, now: Instant) {
        if self.background_paused {
            self.background_paused = false;
            if let Err(e) = self.surface.resume() {
                warn!(tab = %self.id, error = %e, "Failed to resume surface");
            }
            debug!(tab = %self.id, "Tab resumed");
        }
        self.last_active = now;
    }

    /// Refresh the activity timestamp without touching pause state.
    pub(crate) fn touch(&mut self, now: Instant) {
        self.last_active = now;
    }

    /// Set the keep-alive flag. Acquiring also counts as activity.
    pub(crate) fn set_keep_alive(&mut self, active: bool, now: Instant) {
        if active {
            self.mark_active(now);
        }
        self.keep_alive = active;
    }

    pub(crate) fn clear_keep_alive(&mut self) {
        self.keep_alive = false;
    }

    /// Pause the surface. Refused while keep-alive is held.
    pub(crate) fn pause(&mut self) -> bool {
        if self.keep_alive || self.background_paused {
            return false;
        }
        self.background_paused = true;
        if let Err(e) = self.surface.pause() {
            warn!(tab = %self.id, error = %e, "Failed to pause surface");
        }
        true
    }

    pub fn load_url(&mut self, url: &str) {
        if let Err(e) = self.surface.load_url(url) {
            warn!(tab = %self.id, url, error = %e, "Navigation failed");
        }
    }

    /// Evaluate the IPC shim and activity tracker in the current document.
    pub fn inject_scripts(&mut self) {
        for script in injection_scripts() {
            if let Err(e) = self.surface.evaluate_script(&script) {
                warn!(tab = %self.id, error = %e, "Script injection failed");
            }
        }
    }

    /// Tear the tab down: blank the page, drop history, destroy the surface.
    pub(crate) fn destroy(mut self) {
        if let Err(e) = self.surface.load_url(BLANK_PAGE) {
            debug!(tab = %self.id, error = %e, "Blanking surface before destroy failed");
        }
        if let Err(e) = self.surface.clear_history() {
            debug!(tab = %self.id, error = %e, "Clearing history before destroy failed");
        }
        self.surface.destroy();
    }
}

impl std::fmt::Debug for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tab")
            .field("id", &self.id)
            .field("surface", &self.surface.id())
            .field("url", &self.url)
            .field("title", &self.title)
            .field("background_paused", &self.background_paused)
            .field("keep_alive", &self.keep_alive)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tabkeep_webview::MemorySurface;

    fn tab() -> (Tab, tabkeep_webview::SurfaceProbe, Instant) {
        let (surface, probe) = MemorySurface::new();
        let now = Instant::now();
        (Tab::new(Box::new(surface), now), probe, now)
    }

    #[test]
    fn new_tab_defaults() {
        let (tab, probe, now) = tab();
        assert_eq!(tab.title, DEFAULT_TITLE);
        assert!(tab.url.is_empty());
        assert_eq!(tab.last_active(), now);
        assert_eq!(tab.surface_id(), probe.id());
        assert!(!tab.is_background_paused());
        assert!(!tab.is_keep_alive_active());
    }

    #[test]
    fn activity_unpauses_before_refreshing() {
        let (mut tab, probe, now) = tab();
        assert!(tab.pause());
        assert!(probe.is_paused());

        tab.mark_active(now + Duration::from_secs(5));
        assert!(!tab.is_background_paused());
        assert!(!probe.is_paused());
        assert_eq!(probe.resume_calls(), 1);
        assert_eq!(tab.last_active(), now + Duration::from_secs(5));
    }

    #[test]
    fn keep_alive_refuses_pause() {
        let (mut tab, probe, now) = tab();
        tab.set_keep_alive(true, now);
        assert!(!tab.pause());
        assert_eq!(probe.pause_calls(), 0);
    }

    #[test]
    fn acquiring_on_paused_tab_resumes_it() {
        let (mut tab, probe, now) = tab();
        tab.pause();
        tab.set_keep_alive(true, now);
        assert!(!tab.is_background_paused());
        assert!(!probe.is_paused());
    }

    #[test]
    fn destroy_blanks_and_clears_history() {
        let (mut tab, probe, _) = tab();
        tab.load_url("https://a.example");
        tab.load_url("https://b.example");
        tab.destroy();

        assert_eq!(probe.history(), vec![BLANK_PAGE.to_string()]);
        assert_eq!(probe.destroy_count(), 1);
    }

    #[test]
    fn inject_scripts_evaluates_both() {
        let (mut tab, probe, _) = tab();
        tab.inject_scripts();
        assert_eq!(probe.scripts_evaluated(), 2);
    }
}
