//! In-memory parts for building isolated hosts in tests and headless runs.

use std::rc::Rc;

pub use tabkeep_webview::{MemorySurface, MemorySurfaceFactory, SurfaceProbe};

pub use crate::keep_alive::RecordingService;
pub use crate::store::MemoryStore;

use tabkeep_config::TabkeepConfig;

use crate::diagnostics::DiagnosticLog;
use crate::host::Host;

/// A host wired to in-memory surfaces, store and service, with handles
/// kept for inspection.
pub struct TestHost {
    pub host: Host<RecordingService>,
    pub factory: MemorySurfaceFactory,
    pub service: RecordingService,
    pub store: Rc<MemoryStore>,
}

impl TestHost {
    pub fn new(config: TabkeepConfig) -> Self {
        Self::with_parts(config, Rc::new(MemoryStore::new()), None)
    }

    /// Build over an existing store, e.g. to simulate a restart.
    pub fn with_parts(
        config: TabkeepConfig,
        store: Rc<MemoryStore>,
        log: Option<DiagnosticLog>,
    ) -> Self {
        let factory = MemorySurfaceFactory::new();
        let service = RecordingService::new();
        let host = Host::new(
            config,
            store.clone(),
            Box::new(factory.clone()),
            service.clone(),
            log,
        );
        Self {
            host,
            factory,
            service,
            store,
        }
    }

    /// Probe for the surface behind the current tab.
    pub fn current_probe(&self) -> Option<SurfaceProbe> {
        let surface = self.host.tabs().current()?.surface_id();
        self.factory.probe(surface)
    }
}
