// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Tracks every deferred region and its gate in one place.
//!
//! The coordinator mints [`RegionId`]s, wires each region to the host's
//! [`ViewportObserver`] with the tier-adjusted margin, routes visibility
//! reports to the right gate, and sweeps forced-mount deadlines on
//! [`tick_at`](MountCoordinator::tick_at). Observations are released as
//! soon as a region mounts so the host never keeps watching dead targets.

use crate::gate::{GateConfig, GatePhase, MountCause, MountGate};
use skopos_core::platform::ViewportObserver;
use skopos_core::profile::RenderProfile;
use skopos_core::region::RegionId;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Owns the mount gates for all deferred regions.
pub struct MountCoordinator {
    observer: Option<Arc<dyn ViewportObserver>>,
    gates: HashMap<RegionId, MountGate>,
}

impl MountCoordinator {
    /// Creates a coordinator. Without an observer every added region
    /// mounts immediately.
    pub fn new(observer: Option<Arc<dyn ViewportObserver>>) -> Self {
        Self {
            observer,
            gates: HashMap::new(),
        }
    }

    /// Registers a region at `now` and arms its gate. The observation
    /// margin is the larger of the config's request and the profile's
    /// tier floor.
    pub fn add_region_at(
        &mut self,
        now: Instant,
        config: GateConfig,
        profile: &RenderProfile,
    ) -> RegionId {
        let region = RegionId::new();
        let margin = config.effective_margin(profile);
        let observed = self
            .observer
            .as_ref()
            .map_or(false, |observer| observer.observe(region, margin));

        let mut gate = MountGate::new(config);
        if gate.arm_at(now, observed) {
            log::debug!("region {region:?} mounted on arm (no viewport observer)");
        } else {
            log::debug!("region {region:?} observing with {margin}px margin");
        }
        self.gates.insert(region, gate);
        region
    }

    /// Registers a region right now. See
    /// [`add_region_at`](MountCoordinator::add_region_at).
    pub fn add_region(&mut self, config: GateConfig, profile: &RenderProfile) -> RegionId {
        self.add_region_at(Instant::now(), config, profile)
    }

    /// Routes a visibility report to the region's gate. Unknown regions
    /// are ignored.
    pub fn on_visibility(&mut self, region: RegionId, intersecting: bool) {
        let Some(gate) = self.gates.get_mut(&region) else {
            log::debug!("visibility report for unknown region {region:?}");
            return;
        };
        let was_mounted = gate.has_mounted();
        if gate.on_visibility(intersecting) && !was_mounted {
            log::debug!("region {region:?} mounted ({:?})", gate.mount_cause());
            if let Some(observer) = &self.observer {
                observer.unobserve(region);
            }
        }
    }

    /// Sweeps forced-mount deadlines at `now` and returns how many
    /// regions mounted during the sweep.
    pub fn tick_at(&mut self, now: Instant, throttled: bool) -> usize {
        let mut mounted = 0;
        for (region, gate) in &mut self.gates {
            if gate.phase() != GatePhase::Observing {
                continue;
            }
            if gate.poll_at(now, throttled) {
                mounted += 1;
                log::debug!("region {region:?} mounted ({:?})", gate.mount_cause());
                if let Some(observer) = &self.observer {
                    observer.unobserve(*region);
                }
            }
        }
        mounted
    }

    /// Sweeps forced-mount deadlines right now. See
    /// [`tick_at`](MountCoordinator::tick_at).
    pub fn tick(&mut self, throttled: bool) -> usize {
        self.tick_at(Instant::now(), throttled)
    }

    /// Whether a region's content should be rendered. Unknown regions
    /// read as mounted so a stale id degrades to rendering content, never
    /// to hiding it.
    pub fn has_mounted(&self, region: RegionId) -> bool {
        self.gates.get(&region).map_or(true, MountGate::has_mounted)
    }

    /// Why a region mounted, if it is known and has mounted.
    pub fn mount_cause(&self, region: RegionId) -> Option<MountCause> {
        self.gates.get(&region).and_then(MountGate::mount_cause)
    }

    /// Forgets a region, releasing its observation if it never mounted.
    pub fn remove_region(&mut self, region: RegionId) {
        let Some(gate) = self.gates.remove(&region) else {
            return;
        };
        if !gate.has_mounted() {
            if let Some(observer) = &self.observer {
                observer.unobserve(region);
            }
        }
    }

    /// Number of registered regions.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Whether no regions are registered.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Number of registered regions still waiting to mount.
    pub fn pending(&self) -> usize {
        self.gates.values().filter(|gate| !gate.has_mounted()).count()
    }
}

impl Drop for MountCoordinator {
    fn drop(&mut self) {
        let Some(observer) = &self.observer else {
            return;
        };
        let mut released = 0;
        for (region, gate) in &self.gates {
            if !gate.has_mounted() {
                observer.unobserve(*region);
                released += 1;
            }
        }
        if released > 0 {
            log::debug!("released {released} observations on shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skopos_core::tier::PerformanceTier;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingObserver {
        supported: bool,
        observed: Mutex<Vec<(RegionId, u32)>>,
        unobserved: Mutex<Vec<RegionId>>,
    }

    impl RecordingObserver {
        fn supported() -> Arc<Self> {
            Arc::new(Self {
                supported: true,
                ..Self::default()
            })
        }

        fn unsupported() -> Arc<Self> {
            Arc::new(Self::default())
        }

        fn unobserved(&self) -> Vec<RegionId> {
            self.unobserved.lock().unwrap().clone()
        }
    }

    impl ViewportObserver for RecordingObserver {
        fn observe(&self, region: RegionId, margin_px: u32) -> bool {
            self.observed.lock().unwrap().push((region, margin_px));
            self.supported
        }

        fn unobserve(&self, region: RegionId) {
            self.unobserved.lock().unwrap().push(region);
        }
    }

    fn coordinator_with(observer: &Arc<RecordingObserver>) -> MountCoordinator {
        MountCoordinator::new(Some(Arc::clone(observer) as Arc<dyn ViewportObserver>))
    }

    fn deadline_config(millis: u64) -> GateConfig {
        GateConfig {
            mount_after: Some(Duration::from_millis(millis)),
            ..GateConfig::default()
        }
    }

    #[test]
    fn regions_are_observed_with_the_tier_margin() {
        let observer = RecordingObserver::supported();
        let mut coordinator = coordinator_with(&observer);
        let profile = RenderProfile::for_tier(PerformanceTier::PowerSaver);

        let region = coordinator.add_region(GateConfig::default(), &profile);

        assert_eq!(*observer.observed.lock().unwrap(), vec![(region, 200)]);
        assert!(!coordinator.has_mounted(region));
    }

    #[test]
    fn a_visible_region_mounts_and_is_released() {
        let observer = RecordingObserver::supported();
        let mut coordinator = coordinator_with(&observer);
        let profile = RenderProfile::default();

        let region = coordinator.add_region(GateConfig::default(), &profile);
        coordinator.on_visibility(region, true);

        assert!(coordinator.has_mounted(region));
        assert_eq!(coordinator.mount_cause(region), Some(MountCause::Visible));
        assert_eq!(observer.unobserved(), vec![region]);
    }

    #[test]
    fn the_sweep_mounts_overdue_regions_and_counts_them() {
        let observer = RecordingObserver::supported();
        let mut coordinator = coordinator_with(&observer);
        let profile = RenderProfile::default();
        let start = Instant::now();

        let quick = coordinator.add_region_at(start, deadline_config(100), &profile);
        let slow = coordinator.add_region_at(start, deadline_config(5000), &profile);

        assert_eq!(coordinator.tick_at(start + Duration::from_millis(50), false), 0);
        assert_eq!(coordinator.tick_at(start + Duration::from_millis(100), false), 1);
        assert!(coordinator.has_mounted(quick));
        assert!(!coordinator.has_mounted(slow));
        assert_eq!(
            coordinator.mount_cause(quick),
            Some(MountCause::DeadlineElapsed)
        );
        assert_eq!(observer.unobserved(), vec![quick]);
        assert_eq!(coordinator.pending(), 1);
    }

    #[test]
    fn without_an_observer_regions_mount_immediately() {
        let mut coordinator = MountCoordinator::new(None);
        let profile = RenderProfile::default();

        let region = coordinator.add_region(GateConfig::default(), &profile);

        assert!(coordinator.has_mounted(region));
        assert_eq!(
            coordinator.mount_cause(region),
            Some(MountCause::ObserverUnavailable)
        );
    }

    #[test]
    fn an_unsupported_observer_also_mounts_immediately() {
        let observer = RecordingObserver::unsupported();
        let mut coordinator = coordinator_with(&observer);
        let profile = RenderProfile::default();

        let region = coordinator.add_region(GateConfig::default(), &profile);

        assert!(coordinator.has_mounted(region));
        // Observation never took hold, so there is nothing to release.
        assert!(observer.unobserved().is_empty());
    }

    #[test]
    fn unknown_regions_read_as_mounted() {
        let coordinator = MountCoordinator::new(None);
        assert!(coordinator.has_mounted(RegionId::new()));
        assert_eq!(coordinator.mount_cause(RegionId::new()), None);
    }

    #[test]
    fn visibility_for_an_unknown_region_is_ignored() {
        let observer = RecordingObserver::supported();
        let mut coordinator = coordinator_with(&observer);
        coordinator.on_visibility(RegionId::new(), true);
        assert!(observer.unobserved().is_empty());
    }

    #[test]
    fn removing_an_unmounted_region_releases_its_observation() {
        let observer = RecordingObserver::supported();
        let mut coordinator = coordinator_with(&observer);
        let profile = RenderProfile::default();

        let region = coordinator.add_region(GateConfig::default(), &profile);
        coordinator.remove_region(region);

        assert_eq!(observer.unobserved(), vec![region]);
        assert!(coordinator.is_empty());
    }

    #[test]
    fn dropping_the_coordinator_releases_pending_observations() {
        let observer = RecordingObserver::supported();
        let profile = RenderProfile::default();

        let (mounted, waiting) = {
            let mut coordinator = coordinator_with(&observer);
            let mounted = coordinator.add_region(GateConfig::default(), &profile);
            let waiting = coordinator.add_region(GateConfig::default(), &profile);
            coordinator.on_visibility(mounted, true);
            (mounted, waiting)
        };

        let unobserved = observer.unobserved();
        assert_eq!(unobserved.len(), 2);
        assert_eq!(unobserved[0], mounted);
        assert!(unobserved.contains(&waiting));
    }
}
