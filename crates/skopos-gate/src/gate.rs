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

//! The per-region mount gate.
//!
//! A gate defers mounting a render region until it is either about to
//! become visible or a deadline forces it, whichever happens first.
//! Mounting is one-way: once a gate reaches [`GatePhase::Mounted`] no
//! later visibility change or poll moves it back.

use skopos_core::profile::RenderProfile;
use std::time::{Duration, Instant};

/// Ceiling on any forced-mount delay. No region waits longer than this
/// after arming, throttled host or not.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(8);

/// How much a throttled host stretches the forced-mount delay.
pub const DEFAULT_THROTTLE_DELAY_FACTOR: f64 = 2.0;

/// Tuning for a single mount gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateConfig {
    /// Pre-visibility margin in pixels requested by the caller. The tier
    /// profile's [`lazy_margin_px`](RenderProfile::lazy_margin_px) acts as
    /// a floor underneath this.
    pub margin_px: u32,
    /// Forced-mount delay measured from arming. `None` leaves only the
    /// [`max_wait`](GateConfig::max_wait) backstop.
    pub mount_after: Option<Duration>,
    /// Upper bound on the forced-mount delay, throttled or not.
    pub max_wait: Duration,
    /// Multiplier applied to `mount_after` while the host is throttled.
    /// Values below 1.0 are treated as 1.0 so throttling never shortens
    /// the delay.
    pub throttle_delay_factor: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            margin_px: 0,
            mount_after: None,
            max_wait: DEFAULT_MAX_WAIT,
            throttle_delay_factor: DEFAULT_THROTTLE_DELAY_FACTOR,
        }
    }
}

impl GateConfig {
    /// The observation margin actually used: the caller's request or the
    /// tier floor, whichever is larger.
    pub fn effective_margin(&self, profile: &RenderProfile) -> u32 {
        self.margin_px.max(profile.lazy_margin_px)
    }

    /// The instant at which an unmounted gate armed at `armed_at` is
    /// force-mounted.
    pub fn forced_deadline(&self, armed_at: Instant, throttled: bool) -> Instant {
        let delay = match self.mount_after {
            Some(delay) if throttled => delay.mul_f64(self.throttle_delay_factor.max(1.0)),
            Some(delay) => delay,
            None => self.max_wait,
        };
        armed_at + delay.min(self.max_wait)
    }
}

/// Where a gate is in its life cycle. Phases only ever advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    /// Not armed yet; nothing is observed.
    Unmounted,
    /// Armed and waiting on visibility or the deadline.
    Observing,
    /// Mounted. Terminal.
    Mounted,
}

/// Why a gate mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountCause {
    /// The region intersected the viewport (within its margin).
    Visible,
    /// The forced-mount deadline elapsed first.
    DeadlineElapsed,
    /// No usable viewport observer, so deferral was impossible.
    ObserverUnavailable,
}

/// State machine guarding one deferred region.
#[derive(Debug)]
pub struct MountGate {
    config: GateConfig,
    phase: GatePhase,
    armed_at: Option<Instant>,
    intersecting: bool,
    cause: Option<MountCause>,
}

impl MountGate {
    /// Creates an unarmed gate.
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            phase: GatePhase::Unmounted,
            armed_at: None,
            intersecting: false,
            cause: None,
        }
    }

    /// Arms the gate at `now`. `observed` reports whether a viewport
    /// observer is actually watching the region; without one the gate
    /// mounts immediately, since deferral would otherwise strand the
    /// region forever.
    ///
    /// Returns whether the gate is mounted afterwards. Re-arming an armed
    /// gate changes nothing, so the deadline stays anchored to the first
    /// arm.
    pub fn arm_at(&mut self, now: Instant, observed: bool) -> bool {
        if self.phase != GatePhase::Unmounted {
            return self.has_mounted();
        }
        if !observed {
            self.mount(MountCause::ObserverUnavailable);
            return true;
        }
        self.phase = GatePhase::Observing;
        self.armed_at = Some(now);
        if self.intersecting {
            // A visibility report that arrived before arming still counts.
            self.mount(MountCause::Visible);
        }
        self.has_mounted()
    }

    /// Records a visibility change. An intersecting report mounts an
    /// observing gate; anything after mounting is ignored.
    ///
    /// Returns whether the gate is mounted afterwards.
    pub fn on_visibility(&mut self, intersecting: bool) -> bool {
        if self.phase == GatePhase::Mounted {
            return true;
        }
        self.intersecting = intersecting;
        if self.phase == GatePhase::Observing && intersecting {
            self.mount(MountCause::Visible);
        }
        self.has_mounted()
    }

    /// Checks the forced-mount deadline at `now` and mounts if it has
    /// elapsed. Returns whether the gate is mounted afterwards.
    pub fn poll_at(&mut self, now: Instant, throttled: bool) -> bool {
        if self.phase != GatePhase::Observing {
            return self.has_mounted();
        }
        let Some(armed_at) = self.armed_at else {
            return false;
        };
        if now >= self.config.forced_deadline(armed_at, throttled) {
            self.mount(MountCause::DeadlineElapsed);
        }
        self.has_mounted()
    }

    fn mount(&mut self, cause: MountCause) {
        self.phase = GatePhase::Mounted;
        self.cause = Some(cause);
    }

    /// Whether the gate has reached its terminal phase.
    pub fn has_mounted(&self) -> bool {
        self.phase == GatePhase::Mounted
    }

    /// Current phase.
    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    /// Why the gate mounted, once it has.
    pub fn mount_cause(&self) -> Option<MountCause> {
        self.cause
    }

    /// Last reported intersection state.
    pub fn is_intersecting(&self) -> bool {
        self.intersecting
    }

    /// The gate's configuration.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }
}
