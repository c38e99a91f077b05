use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use tabkeep_common::SurfaceId;
use tracing::{debug, info, warn};

use super::service::ForegroundService;
use crate::manager::TabManager;
use crate::timers::{TimerKey, Timers};

/// Decides when the foreground service runs.
///
/// The holder map is the single source of truth: a surface is a holder
/// while its acquires outnumber its releases, and the service stop that a
/// release schedules re-checks that the map is empty when it fires.
pub struct KeepAliveCoordinator<S: ForegroundService> {
    service: S,
    holders: HashMap<SurfaceId, u32>,
    service_active: bool,
    grace: Duration,
    request_exemption: bool,
    exemption_attempted: bool,
}

impl<S: ForegroundService> KeepAliveCoordinator<S> {
    pub fn new(service: S, grace: Duration, request_exemption: bool) -> Self {
        Self {
            service,
            holders: HashMap::new(),
            service_active: false,
            grace,
            request_exemption,
            exemption_attempted: false,
        }
    }

    pub fn set_grace(&mut self, grace: Duration) {
        self.grace = grace;
    }

    pub fn set_request_exemption(&mut self, enabled: bool) {
        self.request_exemption = enabled;
    }

    pub fn is_service_active(&self) -> bool {
        self.service_active
    }

    pub fn holder_count(&self) -> usize {
        self.holders.len()
    }

    /// Outstanding holds for `surface`.
    pub fn holds(&self, surface: SurfaceId) -> u32 {
        self.holders.get(&surface).copied().unwrap_or(0)
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Record one hold for `surface`. Returns `true` when the surface just
    /// became a holder. Signals for surfaces without a tab are ignored.
    pub fn acquire(
        &mut self,
        surface: SurfaceId,
        tabs: &mut TabManager,
        timers: &mut Timers,
        now: Instant,
    ) -> bool {
        let Some(tab) = tabs.by_surface_mut(surface) else {
            debug!(%surface, "acquire for unknown surface dropped");
            return false;
        };

        let count = self.holders.entry(surface).or_insert(0);
        *count += 1;
        let first = *count == 1;
        tab.set_keep_alive(true, now);

        if timers.cancel(TimerKey::KeepAliveStop) {
            debug!("Pending service stop cancelled");
        }
        if !self.service_active {
            self.start_service();
        }
        first
    }

    /// Drop one hold for `surface`. Returns `true` when the surface stopped
    /// being a holder. Unmatched releases are no-ops.
    pub fn release(
        &mut self,
        surface: SurfaceId,
        tabs: &mut TabManager,
        timers: &mut Timers,
        now: Instant,
    ) -> bool {
        let Some(tab) = tabs.by_surface_mut(surface) else {
            debug!(%surface, "release for unknown surface dropped");
            return false;
        };
        let Some(count) = self.holders.get_mut(&surface) else {
            debug!(%surface, "unmatched release ignored");
            return false;
        };

        *count -= 1;
        if *count > 0 {
            return false;
        }
        self.holders.remove(&surface);
        tab.set_keep_alive(false, now);
        self.schedule_stop_if_idle(timers, now);
        true
    }

    /// Drop every hold owned by `surface` at once, as when its page
    /// context is replaced. Returns whether it held anything.
    pub fn release_surface(
        &mut self,
        surface: SurfaceId,
        tabs: &mut TabManager,
        timers: &mut Timers,
        now: Instant,
    ) -> bool {
        if self.holders.remove(&surface).is_none() {
            return false;
        }
        if let Some(tab) = tabs.by_surface_mut(surface) {
            tab.set_keep_alive(false, now);
        }
        self.schedule_stop_if_idle(timers, now);
        true
    }

    /// Drop holders whose surface is no longer in `live`. Returns how many
    /// were dropped.
    pub fn reconcile(
        &mut self,
        live: &HashSet<SurfaceId>,
        timers: &mut Timers,
        now: Instant,
    ) -> usize {
        let before = self.holders.len();
        self.holders.retain(|surface, _| live.contains(surface));
        let dropped = before - self.holders.len();
        if dropped > 0 {
            info!(dropped, "Dropped stale keep-alive holders");
            self.schedule_stop_if_idle(timers, now);
        }
        dropped
    }

    /// Clear every hold and stop the service now, skipping the grace
    /// period. Returns how many holders were cleared.
    pub fn force_release_all(&mut self, tabs: &mut TabManager, timers: &mut Timers) -> usize {
        let cleared = self.holders.len();
        self.holders.clear();
        for tab in tabs.tabs_mut() {
            tab.clear_keep_alive();
        }
        timers.cancel(TimerKey::KeepAliveStop);
        self.stop_service();
        cleared
    }

    /// Grace timer fired. Stops the service only if no holder appeared in
    /// the meantime. Returns whether the service was stopped.
    pub fn on_stop_timer(&mut self) -> bool {
        if !self.holders.is_empty() {
            debug!(holders = self.holders.len(), "Service stop skipped, holders present");
            return false;
        }
        self.stop_service()
    }

    /// Clear holders and stop the service for host teardown.
    pub fn shutdown(&mut self) {
        self.holders.clear();
        self.stop_service();
    }

    fn schedule_stop_if_idle(&mut self, timers: &mut Timers, now: Instant) {
        if self.holders.is_empty() {
            timers.schedule(TimerKey::KeepAliveStop, now + self.grace);
            debug!(grace_secs = self.grace.as_secs(), "Service stop scheduled");
        }
    }

    fn start_service(&mut self) {
        match self.service.start() {
            Ok(()) => self.service_active = true,
            Err(e) => warn!(error = %e, "Failed to start keep-alive service"),
        }

        if self.request_exemption && !self.exemption_attempted && !self.service.is_battery_exempt()
        {
            self.exemption_attempted = true;
            if let Err(e) = self.service.request_battery_exemption() {
                warn!(error = %e, "Battery optimization exemption request failed");
            }
        }
    }

    fn stop_service(&mut self) -> bool {
        if !self.service_active {
            return false;
        }
        self.service.stop();
        self.service_active = false;
        true
    }
}
