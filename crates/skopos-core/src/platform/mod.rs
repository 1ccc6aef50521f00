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

//! Host-facility contracts.
//!
//! Everything the adaptive pipeline needs from its host is a trait here, so
//! selection and gating stay testable with stub hosts and portable across
//! windowing stacks. Capability absence is modeled as data ([`Probed`]),
//! not as errors: only genuinely fallible I/O (the preference store)
//! returns `Result`.

use crate::capability::{DeviceProfile, GpuClass, NetworkClass, Probed};
use crate::region::RegionId;
use crate::sample::HeapUsage;
use crate::tier::TierMode;

/// Heap introspection, where the host runtime exposes any.
pub trait HeapProbe: Send {
    /// Samples current heap usage. `Unknown` when the facility is missing;
    /// implementations must never fail louder than that.
    fn heap_usage(&mut self) -> Probed<HeapUsage>;
}

/// The startup battery of capability checks.
///
/// Each check answers with a typed [`Probed`] value. The provided
/// [`snapshot`](DeviceProbe::snapshot) assembles the one-time immutable
/// [`DeviceProfile`] and cannot fail: a check the host has no answer for
/// simply reads `Unknown`.
pub trait DeviceProbe {
    /// Logical CPU core count.
    fn logical_cores(&self) -> Probed<u32>;

    /// Total physical memory in gigabytes.
    fn memory_gb(&self) -> Probed<f32>;

    /// Coarse GPU classification.
    fn gpu_class(&self) -> Probed<GpuClass>;

    /// Coarse network link quality.
    fn network_class(&self) -> Probed<NetworkClass>;

    /// Whether the user prefers reduced motion.
    fn reduced_motion(&self) -> Probed<bool>;

    /// Whether the user asked to conserve data.
    fn save_data(&self) -> Probed<bool>;

    /// Assembles the device snapshot from the individual checks.
    fn snapshot(&self) -> DeviceProfile {
        DeviceProfile {
            logical_cores: self.logical_cores(),
            memory_gb: self.memory_gb(),
            gpu: self.gpu_class(),
            network: self.network_class(),
            reduced_motion: self.reduced_motion(),
            save_data: self.save_data(),
        }
    }
}

/// Visibility facility for deferred-mount regions.
///
/// The host wires this to whatever can tell when a region nears the
/// viewport. A return of `false` from [`observe`](ViewportObserver::observe)
/// means the region cannot be watched, and the caller must mount it
/// immediately rather than wait for callbacks that will never come.
pub trait ViewportObserver: Send + Sync {
    /// Starts watching a region, firing visibility callbacks once it comes
    /// within `margin_px` of the viewport.
    fn observe(&self, region: RegionId, margin_px: u32) -> bool;

    /// Stops watching a region. Must be idempotent; called again after a
    /// region mounted or was removed.
    fn unobserve(&self, region: RegionId);
}

/// Durable storage for the last explicit tier choice.
///
/// The stored [`TierMode`] is the only durable state the pipeline owns.
/// Callers treat failures as a missing preference, never as fatal.
pub trait PreferenceStore: Send + Sync {
    /// Loads the stored mode. `Ok(None)` when nothing was ever saved.
    fn load(&self) -> anyhow::Result<Option<TierMode>>;

    /// Persists an explicit mode change.
    fn save(&self, mode: TierMode) -> anyhow::Result<()>;
}
