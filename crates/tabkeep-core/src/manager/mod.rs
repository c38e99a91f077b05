//! Ordered tab collection, current-tab selection, and the idle sweep.
//!
//! Every structural change (add, close, switch) bumps the list generation
//! and persists the tab set. The manager never creates tabs on its own: an
//! empty list after [`TabManager::close_tab`] is healed by the host.

mod persistence;
mod sweep;


pub use persistence::SavedTab;
pub use sweep::SweepReport;

use std::collections::HashSet;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tabkeep_common::{SurfaceId, TabId};
use tracing::{debug, info, warn};

use crate::store::KeyValueStore;
use crate::tab::Tab;

pub struct TabManager {
    tabs: Vec<Tab>,
    current: Option<TabId>,
    generation: u64,
    inactivity_threshold: Duration,
    store: Rc<dyn KeyValueStore>,
}

impl TabManager {
    pub fn new(store: Rc<dyn KeyValueStore>, inactivity_threshold: Duration) -> Self {
        Self {
            tabs: Vec::new(),
            current: None,
            generation: 0,
            inactivity_threshold,
            store,
        }
    }

    pub fn set_inactivity_threshold(&mut self, threshold: Duration) {
        self.inactivity_threshold = threshold;
    }

    pub fn inactivity_threshold(&self) -> Duration {
        self.inactivity_threshold
    }

    // -- Structural operations ------------------------------------------------

    /// Append `tab`, make it current, and persist.
    pub fn add_tab(&mut self, tab: Tab, now: Instant) -> TabId {
        let id = tab.id().clone();
        info!(tab = %id, surface = %tab.surface_id(), "Tab added");
        self.tabs.push(tab);
        self.select(&id, now);
        self.changed();
        id
    }

    /// Close `id`. Returns `false` when no such tab exists.
    ///
    /// When the closed tab was current, the tab now at the same index
    /// becomes current, else the new last tab. An empty list leaves no
    /// current tab.
    pub fn close_tab(&mut self, id: &TabId, now: Instant) -> bool {
        let Some(index) = self.index_of(id) else {
            debug!(tab = %id, "close_tab: no such tab");
            return false;
        };

        let tab = self.tabs.remove(index);
        tab.destroy();
        info!(tab = %id, remaining = self.tabs.len(), "Tab closed");

        if self.current.as_ref() == Some(id) {
            self.current = None;
            let replacement = self
                .tabs
                .get(index)
                .or_else(|| self.tabs.last())
                .map(|t| t.id().clone());
            if let Some(next) = replacement {
                self.select(&next, now);
            }
        }

        self.changed();
        true
    }

    /// Make `id` current. Returns `false` when no such tab exists.
    pub fn switch_to(&mut self, id: &TabId, now: Instant) -> bool {
        if self.index_of(id).is_none() {
            debug!(tab = %id, "switch_to: no such tab");
            return false;
        }
        self.select(id, now);
        self.persist();
        true
    }

    /// Destroy every tab. Used at shutdown after the final save.
    pub fn destroy_all(&mut self) -> usize {
        let count = self.tabs.len();
        for tab in self.tabs.drain(..) {
            tab.destroy();
        }
        self.current = None;
        count
    }

    fn select(&mut self, id: &TabId, now: Instant) {
        if let Some(tab) = self.get_mut(id) {
            tab.mark_active(now);
            self.current = Some(id.clone());
        }
    }

    fn changed(&mut self) {
        self.generation += 1;
        self.persist();
    }

    /// Save the tab set, logging instead of failing.
    pub fn persist(&self) {
        if let Err(e) = self.save_tabs() {
            warn!(error = %e, "Failed to persist tabs");
        }
    }

    // -- Lookups ---------------------------------------------------------------

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub(crate) fn tabs_mut(&mut self) -> impl Iterator<Item = &mut Tab> {
        self.tabs.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Incremented on every structural change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn index_of(&self, id: &TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id() == id)
    }

    pub fn get(&self, id: &TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id() == id)
    }

    pub fn get_mut(&mut self, id: &TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id() == id)
    }

    pub fn by_surface(&self, surface: SurfaceId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.surface_id() == surface)
    }

    pub fn by_surface_mut(&mut self, surface: SurfaceId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.surface_id() == surface)
    }

    pub fn current_id(&self) -> Option<&TabId> {
        self.current.as_ref()
    }

    pub fn current(&self) -> Option<&Tab> {
        self.current.as_ref().and_then(|id| self.get(id))
    }

    pub fn current_mut(&mut self) -> Option<&mut Tab> {
        let id = self.current.clone()?;
        self.get_mut(&id)
    }

    pub fn is_current(&self, id: &TabId) -> bool {
        self.current.as_ref() == Some(id)
    }

    /// Surfaces of every live tab.
    pub fn surface_ids(&self) -> HashSet<SurfaceId> {
        self.tabs.iter().map(Tab::surface_id).collect()
    }
}
