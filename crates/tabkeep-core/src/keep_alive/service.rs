//! The single "don't suspend me" slot the platform grants a process.

use std::cell::Cell;
use std::rc::Rc;

use tabkeep_common::ServiceError;
use tracing::info;

pub trait ForegroundService {
    /// Ask the platform to start the service. May be denied.
    fn start(&mut self) -> Result<(), ServiceError>;

    fn stop(&mut self);

    /// Whether the process is already exempt from battery optimizations.
    fn is_battery_exempt(&self) -> bool {
        false
    }

    fn request_battery_exemption(&mut self) -> Result<(), ServiceError>;
}

#[derive(Debug, Default)]
struct Counters {
    starts: Cell<u32>,
    stops: Cell<u32>,
    exemption_requests: Cell<u32>,
    deny_start: Cell<bool>,
}

/// Service stand-in that logs and counts every request.
///
/// Clones share counters, so a test can keep one handle while the host
/// owns the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingService {
    counters: Rc<Counters>,
}

impl RecordingService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `start` calls fail.
    pub fn deny_start(&self, deny: bool) {
        self.counters.deny_start.set(deny);
    }

    pub fn starts(&self) -> u32 {
        self.counters.starts.get()
    }

    pub fn stops(&self) -> u32 {
        self.counters.stops.get()
    }

    pub fn exemption_requests(&self) -> u32 {
        self.counters.exemption_requests.get()
    }
}

impl ForegroundService for RecordingService {
    fn start(&mut self) -> Result<(), ServiceError> {
        if self.counters.deny_start.get() {
            return Err(ServiceError::StartDenied("start refused".into()));
        }
        self.counters.starts.set(self.starts() + 1);
        info!("Keep-alive service started");
        Ok(())
    }

    fn stop(&mut self) {
        self.counters.stops.set(self.stops() + 1);
        info!("Keep-alive service stopped");
    }

    fn request_battery_exemption(&mut self) -> Result<(), ServiceError> {
        self.counters
            .exemption_requests
            .set(self.exemption_requests() + 1);
        Ok(())
    }
}
