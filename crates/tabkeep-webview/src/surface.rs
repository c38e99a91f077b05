//! The rendering surface a tab exclusively owns.

use tabkeep_common::{SurfaceError, SurfaceId};

/// One embedded web content view.
///
/// A surface is owned by exactly one tab and is torn down through
/// [`RenderSurface::destroy`], which consumes it so it cannot be destroyed
/// twice.
pub trait RenderSurface {
    fn id(&self) -> SurfaceId;

    /// Last URL the surface reported, if any.
    fn current_url(&self) -> Option<String>;

    fn load_url(&mut self, url: &str) -> Result<(), SurfaceError>;

    /// Drop the back-stack.
    fn clear_history(&mut self) -> Result<(), SurfaceError>;

    fn can_go_back(&self) -> bool;

    fn go_back(&mut self) -> Result<(), SurfaceError>;

    fn evaluate_script(&mut self, js: &str) -> Result<(), SurfaceError>;

    /// Per-surface "not visible" hint; lowers the page's priority.
    ///
    /// Must not touch process-wide script timers, which would freeze the
    /// foreground tab as well.
    fn pause(&mut self) -> Result<(), SurfaceError>;

    /// Undo [`RenderSurface::pause`] and resume the page's timers.
    fn resume(&mut self) -> Result<(), SurfaceError>;

    fn destroy(self: Box<Self>);
}

/// Creates fresh surfaces for new and restored tabs.
pub trait SurfaceFactory {
    fn create(&mut self) -> Result<Box<dyn RenderSurface>, SurfaceError>;
}

impl<F> SurfaceFactory for F
where
    F: FnMut() -> Result<Box<dyn RenderSurface>, SurfaceError>,
{
    fn create(&mut self) -> Result<Box<dyn RenderSurface>, SurfaceError> {
        self()
    }
}
