//! In-memory rendering surface.
//!
//! Used by the headless shell and by tests. Every call is recorded on a
//! shared [`SurfaceProbe`] that stays readable after the surface itself has
//! been moved into a tab or destroyed.

use std::cell::RefCell;
use std::rc::Rc;

use tabkeep_common::{SurfaceError, SurfaceId};

use crate::navigation::is_navigation_allowed;
use crate::surface::{RenderSurface, SurfaceFactory};

#[derive(Debug, Default)]
pub struct SurfaceState {
    pub history: Vec<String>,
    pub scripts: Vec<String>,
    pub paused: bool,
    pub pause_calls: u32,
    pub resume_calls: u32,
    pub destroyed: u32,
}

/// Shared read handle on a [`MemorySurface`]'s recorded state.
#[derive(Debug, Clone)]
pub struct SurfaceProbe {
    id: SurfaceId,
    state: Rc<RefCell<SurfaceState>>,
}

impl SurfaceProbe {
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn url(&self) -> Option<String> {
        self.state.borrow().history.last().cloned()
    }

    pub fn history(&self) -> Vec<String> {
        self.state.borrow().history.clone()
    }

    pub fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }

    pub fn pause_calls(&self) -> u32 {
        self.state.borrow().pause_calls
    }

    pub fn resume_calls(&self) -> u32 {
        self.state.borrow().resume_calls
    }

    pub fn scripts_evaluated(&self) -> usize {
        self.state.borrow().scripts.len()
    }

    pub fn destroy_count(&self) -> u32 {
        self.state.borrow().destroyed
    }
}

#[derive(Debug)]
pub struct MemorySurface {
    id: SurfaceId,
    state: Rc<RefCell<SurfaceState>>,
}

impl MemorySurface {
    pub fn new() -> (Self, SurfaceProbe) {
        let id = SurfaceId::next();
        let state = Rc::new(RefCell::new(SurfaceState::default()));
        let probe = SurfaceProbe {
            id,
            state: Rc::clone(&state),
        };
        (Self { id, state }, probe)
    }

    fn live(&self) -> Result<std::cell::RefMut<'_, SurfaceState>, SurfaceError> {
        let state = self.state.borrow_mut();
        if state.destroyed > 0 {
            return Err(SurfaceError::Destroyed(self.id.0));
        }
        Ok(state)
    }
}

impl RenderSurface for MemorySurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn current_url(&self) -> Option<String> {
        self.state.borrow().history.last().cloned()
    }

    fn load_url(&mut self, url: &str) -> Result<(), SurfaceError> {
        if !is_navigation_allowed(url) {
            return Err(SurfaceError::Navigation(format!("blocked url: {url}")));
        }
        self.live()?.history.push(url.to_string());
        Ok(())
    }

    fn clear_history(&mut self) -> Result<(), SurfaceError> {
        let mut state = self.live()?;
        let current = state.history.pop();
        state.history.clear();
        state.history.extend(current);
        Ok(())
    }

    fn can_go_back(&self) -> bool {
        self.state.borrow().history.len() > 1
    }

    fn go_back(&mut self) -> Result<(), SurfaceError> {
        let mut state = self.live()?;
        if state.history.len() > 1 {
            state.history.pop();
        }
        Ok(())
    }

    fn evaluate_script(&mut self, js: &str) -> Result<(), SurfaceError> {
        self.live()?.scripts.push(js.to_string());
        Ok(())
    }

    fn pause(&mut self) -> Result<(), SurfaceError> {
        let mut state = self.live()?;
        state.paused = true;
        state.pause_calls += 1;
        Ok(())
    }

    fn resume(&mut self) -> Result<(), SurfaceError> {
        let mut state = self.live()?;
        state.paused = false;
        state.resume_calls += 1;
        Ok(())
    }

    fn destroy(self: Box<Self>) {
        self.state.borrow_mut().destroyed += 1;
    }
}

/// Factory that hands out [`MemorySurface`]s and keeps their probes.
#[derive(Debug, Clone, Default)]
pub struct MemorySurfaceFactory {
    probes: Rc<RefCell<Vec<SurfaceProbe>>>,
}

impl MemorySurfaceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probes for every surface created so far, in creation order.
    pub fn probes(&self) -> Vec<SurfaceProbe> {
        self.probes.borrow().clone()
    }

    pub fn probe(&self, id: SurfaceId) -> Option<SurfaceProbe> {
        self.probes.borrow().iter().find(|p| p.id == id).cloned()
    }
}

impl SurfaceFactory for MemorySurfaceFactory {
    fn create(&mut self) -> Result<Box<dyn RenderSurface>, SurfaceError> {
        let (surface, probe) = MemorySurface::new();
        self.probes.borrow_mut().push(probe);
        Ok(Box::new(surface))
    }
}
