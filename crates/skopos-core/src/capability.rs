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

//! The one-time device capability snapshot.
//!
//! Every capability check runs once at startup and resolves to a typed
//! [`Probed`] value. A facility the host cannot answer for is `Unknown`,
//! which is a plain state, never an error: no probe failure can fail
//! snapshot construction, and no consumer performs existence checks at
//! read time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Core count below which a device contributes a low-end signal.
const LOW_END_CORE_COUNT: u32 = 4;
/// Memory, in gigabytes, below which a device contributes a low-end signal.
const LOW_END_MEMORY_GB: f32 = 4.0;

/// Outcome of a capability check that may be unanswerable on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Probed<T> {
    /// The check ran and produced a value.
    Known(T),
    /// The facility is missing or the check failed.
    Unknown,
}

impl<T> Probed<T> {
    /// The value, if the check answered.
    pub fn known(self) -> Option<T> {
        match self {
            Probed::Known(value) => Some(value),
            Probed::Unknown => None,
        }
    }

    /// The value, or `default` when the check could not answer.
    pub fn known_or(self, default: T) -> T {
        match self {
            Probed::Known(value) => value,
            Probed::Unknown => default,
        }
    }

    /// Whether the check failed to answer.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Probed::Unknown)
    }
}

impl<T> Default for Probed<T> {
    fn default() -> Self {
        Probed::Unknown
    }
}

impl<T> From<Option<T>> for Probed<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Probed::Known(value),
            None => Probed::Unknown,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Probed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Probed::Known(value) => value.fmt(f),
            Probed::Unknown => f.write_str("unknown"),
        }
    }
}

/// Coarse classification of the GPU the host exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GpuClass {
    /// Dedicated graphics hardware.
    Discrete,
    /// A GPU sharing package and memory with the CPU.
    Integrated,
    /// A software rasterizer. Treated as no usable GPU.
    Software,
}

impl fmt::Display for GpuClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GpuClass::Discrete => "discrete",
            GpuClass::Integrated => "integrated",
            GpuClass::Software => "software",
        })
    }
}

/// Coarse network link quality, where the host can report one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkClass {
    /// Broadband-grade link.
    Fast,
    /// Usable but constrained link.
    Moderate,
    /// A link slow enough to change rendering decisions.
    Slow,
}

impl fmt::Display for NetworkClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NetworkClass::Fast => "fast",
            NetworkClass::Moderate => "moderate",
            NetworkClass::Slow => "slow",
        })
    }
}

/// Immutable snapshot of device capabilities, taken once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Logical CPU core count.
    pub logical_cores: Probed<u32>,
    /// Total physical memory in gigabytes.
    pub memory_gb: Probed<f32>,
    /// GPU classification from the startup probe.
    pub gpu: Probed<GpuClass>,
    /// Network link quality.
    pub network: Probed<NetworkClass>,
    /// Whether the user asked for reduced motion.
    pub reduced_motion: Probed<bool>,
    /// Whether the user asked to conserve data.
    pub save_data: Probed<bool>,
}

impl DeviceProfile {
    /// Counts the low-end signals this snapshot carries.
    ///
    /// One signal each for: few cores, little memory, no usable GPU, a slow
    /// network, and a reduced-motion preference. A GPU probe that could not
    /// classify anything counts the same as a software rasterizer: nothing
    /// usable was found.
    pub fn low_end_signals(&self) -> u32 {
        let mut signals = 0;
        if matches!(self.logical_cores, Probed::Known(cores) if cores < LOW_END_CORE_COUNT) {
            signals += 1;
        }
        if matches!(self.memory_gb, Probed::Known(gb) if gb < LOW_END_MEMORY_GB) {
            signals += 1;
        }
        if matches!(self.gpu, Probed::Known(GpuClass::Software) | Probed::Unknown) {
            signals += 1;
        }
        if matches!(self.network, Probed::Known(NetworkClass::Slow)) {
            signals += 1;
        }
        if matches!(self.reduced_motion, Probed::Known(true)) {
            signals += 1;
        }
        signals
    }
}

impl fmt::Display for DeviceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cores={} memory={:.1}GB gpu={} network={} reduced-motion={} save-data={}",
            self.logical_cores,
            self.memory_gb,
            self.gpu,
            self.network,
            self.reduced_motion,
            self.save_data
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capable_device() -> DeviceProfile {
        DeviceProfile {
            logical_cores: Probed::Known(8),
            memory_gb: Probed::Known(16.0),
            gpu: Probed::Known(GpuClass::Discrete),
            network: Probed::Known(NetworkClass::Fast),
            reduced_motion: Probed::Known(false),
            save_data: Probed::Known(false),
        }
    }

    #[test]
    fn probed_accessors() {
        assert_eq!(Probed::Known(3).known(), Some(3));
        assert_eq!(Probed::<u32>::Unknown.known(), None);
        assert_eq!(Probed::Unknown.known_or(7), 7);
        assert!(Probed::<bool>::Unknown.is_unknown());
        assert_eq!(Probed::from(Some(1)), Probed::Known(1));
        assert_eq!(Probed::<u32>::from(None), Probed::Unknown);
    }

    #[test]
    fn capable_device_scores_zero() {
        assert_eq!(capable_device().low_end_signals(), 0);
    }

    #[test]
    fn each_weakness_contributes_one_signal() {
        let mut device = capable_device();
        device.logical_cores = Probed::Known(2);
        assert_eq!(device.low_end_signals(), 1);

        device.memory_gb = Probed::Known(3.5);
        assert_eq!(device.low_end_signals(), 2);

        device.gpu = Probed::Known(GpuClass::Software);
        assert_eq!(device.low_end_signals(), 3);

        device.network = Probed::Known(NetworkClass::Slow);
        assert_eq!(device.low_end_signals(), 4);

        device.reduced_motion = Probed::Known(true);
        assert_eq!(device.low_end_signals(), 5);
    }

    #[test]
    fn unclassified_gpu_counts_as_no_gpu() {
        let mut device = capable_device();
        device.gpu = Probed::Unknown;
        assert_eq!(device.low_end_signals(), 1);
    }

    #[test]
    fn boundary_values_are_not_low_end() {
        let mut device = capable_device();
        device.logical_cores = Probed::Known(4);
        device.memory_gb = Probed::Known(4.0);
        device.network = Probed::Known(NetworkClass::Moderate);
        assert_eq!(device.low_end_signals(), 0);
    }

    #[test]
    fn blank_snapshot_only_flags_the_gpu() {
        // With every probe unanswered, only the missing GPU counts.
        assert_eq!(DeviceProfile::default().low_end_signals(), 1);
    }

    #[test]
    fn snapshot_serializes() {
        let device = capable_device();
        let json = serde_json::to_string(&device).expect("serialize");
        let back: DeviceProfile = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, device);
    }

    #[test]
    fn display_reads_as_a_summary_line() {
        let text = capable_device().to_string();
        assert!(text.contains("cores=8"));
        assert!(text.contains("memory=16.0GB"));
        assert!(text.contains("gpu=discrete"));

        let blank = DeviceProfile::default().to_string();
        assert!(blank.contains("gpu=unknown"));
    }
}
