//! Structural tab operations with event publication and list healing.

use std::time::Instant;

use tabkeep_common::{Event, TabId};
use tracing::info;

use super::Host;
use crate::bookmarks::Bookmark;
use crate::keep_alive::ForegroundService;
use crate::tab::Tab;

impl<S: ForegroundService> Host<S> {
    /// Open a tab at `url` (the home page when `None`) and make it current.
    pub fn new_tab(&mut self, url: Option<&str>, now: Instant) -> tabkeep_common::Result<TabId> {
        let surface = self.factory.create()?;
        let mut tab = Tab::new(surface, now);
        let url = url
            .unwrap_or(self.config.browser.home_page.as_str())
            .to_string();
        tab.load_url(&url);
        tab.url = url;

        let id = self.tabs.add_tab(tab, now);
        self.events.publish(Event::TabOpened(id.clone()));
        self.events.publish(Event::TabSwitched(id.clone()));
        self.publish_tabs_changed();
        Ok(id)
    }

    /// Close `id`. An emptied list is refilled with a fresh tab before
    /// returning, and holds owned by the closed surface are dropped.
    pub fn close_tab(&mut self, id: &TabId, now: Instant) -> tabkeep_common::Result<bool> {
        let previous = self.tabs.current_id().cloned();
        if !self.tabs.close_tab(id, now) {
            return Ok(false);
        }
        self.events.publish(Event::TabClosed(id.clone()));
        self.publish_tabs_changed();

        let live = self.tabs.surface_ids();
        self.keep_alive.reconcile(&live, &mut self.timers, now);

        if self.tabs.is_empty() {
            info!("Last tab closed, opening a replacement");
            self.new_tab(None, now)?;
        } else if self.tabs.current_id() != previous.as_ref() {
            if let Some(current) = self.tabs.current_id().cloned() {
                self.events.publish(Event::TabSwitched(current));
            }
        }
        Ok(true)
    }

    pub fn switch_to(&mut self, id: &TabId, now: Instant) -> bool {
        if !self.tabs.switch_to(id, now) {
            return false;
        }
        self.events.publish(Event::TabSwitched(id.clone()));
        true
    }

    /// Load `url` in tab `id` as a user navigation.
    pub fn navigate(&mut self, id: &TabId, url: &str, now: Instant) -> bool {
        let Some(tab) = self.tabs.get_mut(id) else {
            return false;
        };
        tab.load_url(url);
        tab.mark_active(now);
        true
    }

    /// Bookmark the page shown in tab `id`.
    pub fn bookmark_tab(&mut self, id: &TabId) -> tabkeep_common::Result<Option<Bookmark>> {
        let Some(tab) = self.tabs.get(id) else {
            return Ok(None);
        };
        let added = self.bookmarks.add(&tab.title, &tab.url)?;
        self.notice("Bookmark saved");
        Ok(Some(added))
    }
}
