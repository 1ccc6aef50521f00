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

//! Automatic tier selection.
//!
//! A pure decision procedure over three inputs: the rolling FPS history,
//! the standing memory-pressure flag, and the startup device snapshot.
//! There is no hysteresis beyond the history window itself; selection may
//! move the tier at every flush, in both directions.

use crate::config::SelectorConfig;
use skopos_core::capability::DeviceProfile;
use skopos_core::history::FpsHistory;
use skopos_core::tier::PerformanceTier;
use std::fmt;

/// The rule that produced a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionCause {
    /// No samples yet and nothing suggests a weak device.
    ColdStart,
    /// No samples yet, but the device snapshot scored low-end.
    ColdStartLowEnd,
    /// Average FPS under the power-saver floor.
    LowAverageFps,
    /// Average FPS under the balanced floor.
    ModerateAverageFps,
    /// Average FPS cleared every floor.
    HighAverageFps,
    /// Heap pressure overrode the FPS-derived tier.
    MemoryPressure,
}

impl fmt::Display for SelectionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SelectionCause::ColdStart => "cold start",
            SelectionCause::ColdStartLowEnd => "cold start on a low-end device",
            SelectionCause::LowAverageFps => "low average fps",
            SelectionCause::ModerateAverageFps => "moderate average fps",
            SelectionCause::HighAverageFps => "high average fps",
            SelectionCause::MemoryPressure => "memory pressure",
        })
    }
}

/// One selection outcome, with the evidence that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierDecision {
    /// The tier to apply.
    pub tier: PerformanceTier,
    /// The rule that won.
    pub cause: SelectionCause,
    /// Average FPS the decision saw, when any samples existed.
    pub average_fps: Option<f32>,
}

/// Stateless tier selection over sampled evidence.
#[derive(Debug, Clone, Copy, Default)]
pub struct TierSelector {
    config: SelectorConfig,
}

impl TierSelector {
    /// Creates a selector with the given thresholds.
    pub fn new(config: SelectorConfig) -> Self {
        Self { config }
    }

    /// The thresholds in force.
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Picks the tier the evidence supports.
    ///
    /// Rules, in order:
    /// 1. With samples, the history mean is cut at the two FPS floors.
    /// 2. Without samples, performance, unless the snapshot scores enough
    ///    low-end signals to start in power-saver.
    /// 3. Memory pressure forces power-saver over whatever 1 or 2 said.
    pub fn select(
        &self,
        history: &FpsHistory,
        memory_pressured: bool,
        device: &DeviceProfile,
    ) -> TierDecision {
        let average_fps = history.average();

        let (tier, cause) = match average_fps {
            Some(avg) if avg < self.config.power_saver_below_fps => {
                (PerformanceTier::PowerSaver, SelectionCause::LowAverageFps)
            }
            Some(avg) if avg < self.config.balanced_below_fps => {
                (PerformanceTier::Balanced, SelectionCause::ModerateAverageFps)
            }
            Some(_) => (PerformanceTier::Performance, SelectionCause::HighAverageFps),
            None if device.low_end_signals() >= self.config.low_end_signal_threshold => {
                (PerformanceTier::PowerSaver, SelectionCause::ColdStartLowEnd)
            }
            None => (PerformanceTier::Performance, SelectionCause::ColdStart),
        };

        if memory_pressured && tier != PerformanceTier::PowerSaver {
            return TierDecision {
                tier: PerformanceTier::PowerSaver,
                cause: SelectionCause::MemoryPressure,
                average_fps,
            };
        }

        TierDecision {
            tier,
            cause,
            average_fps,
        }
    }

    /// Whether sampled FPS is low enough to count the host as throttled.
    /// An empty history is not throttled.
    pub fn is_throttled(&self, history: &FpsHistory) -> bool {
        history
            .average()
            .map_or(false, |avg| avg < self.config.critical_fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use skopos_core::capability::{GpuClass, NetworkClass, Probed};

    fn history_of(samples: &[f32]) -> FpsHistory {
        let mut history = FpsHistory::new();
        for &fps in samples {
            history.push(fps);
        }
        history
    }

    fn strong_device() -> DeviceProfile {
        DeviceProfile {
            logical_cores: Probed::Known(12),
            memory_gb: Probed::Known(32.0),
            gpu: Probed::Known(GpuClass::Discrete),
            network: Probed::Known(NetworkClass::Fast),
            reduced_motion: Probed::Known(false),
            save_data: Probed::Known(false),
        }
    }

    fn weak_device() -> DeviceProfile {
        DeviceProfile {
            logical_cores: Probed::Known(2),
            memory_gb: Probed::Known(2.0),
            gpu: Probed::Known(GpuClass::Software),
            network: Probed::Known(NetworkClass::Slow),
            reduced_motion: Probed::Known(true),
            save_data: Probed::Known(true),
        }
    }

    fn select(history: &FpsHistory, pressured: bool, device: &DeviceProfile) -> TierDecision {
        TierSelector::default().select(history, pressured, device)
    }

    // --- FPS floors ---

    #[test]
    fn low_average_selects_power_saver() {
        for samples in [&[10.0f32][..], &[23.9], &[30.0, 10.0, 20.0]] {
            let decision = select(&history_of(samples), false, &strong_device());
            assert_eq!(decision.tier, PerformanceTier::PowerSaver);
            assert_eq!(decision.cause, SelectionCause::LowAverageFps);
        }
    }

    #[test]
    fn the_reference_trace_lands_in_power_saver() {
        // Ten flushed windows averaging exactly 20 fps.
        let history = history_of(&[20.0, 18.0, 22.0, 19.0, 21.0, 20.0, 23.0, 19.0, 18.0, 20.0]);
        let decision = select(&history, false, &strong_device());
        assert_relative_eq!(decision.average_fps.unwrap(), 20.0);
        assert_eq!(decision.tier, PerformanceTier::PowerSaver);
    }

    #[test]
    fn moderate_average_selects_balanced() {
        for samples in [&[24.0f32][..], &[30.0], &[44.9]] {
            let decision = select(&history_of(samples), false, &strong_device());
            assert_eq!(decision.tier, PerformanceTier::Balanced);
            assert_eq!(decision.cause, SelectionCause::ModerateAverageFps);
        }
    }

    #[test]
    fn high_average_selects_performance() {
        for samples in [&[45.0f32][..], &[60.0], &[120.0, 90.0]] {
            let decision = select(&history_of(samples), false, &strong_device());
            assert_eq!(decision.tier, PerformanceTier::Performance);
            assert_eq!(decision.cause, SelectionCause::HighAverageFps);
        }
    }

    // --- Cold start ---

    #[test]
    fn empty_history_defaults_to_performance() {
        let decision = select(&FpsHistory::new(), false, &strong_device());
        assert_eq!(decision.tier, PerformanceTier::Performance);
        assert_eq!(decision.cause, SelectionCause::ColdStart);
        assert_eq!(decision.average_fps, None);
    }

    #[test]
    fn weak_devices_cold_start_in_power_saver() {
        let decision = select(&FpsHistory::new(), false, &weak_device());
        assert_eq!(decision.tier, PerformanceTier::PowerSaver);
        assert_eq!(decision.cause, SelectionCause::ColdStartLowEnd);
    }

    #[test]
    fn two_signals_are_enough_for_the_cold_start_bias() {
        let mut device = strong_device();
        device.logical_cores = Probed::Known(2);
        device.memory_gb = Probed::Known(3.0);
        let decision = select(&FpsHistory::new(), false, &device);
        assert_eq!(decision.tier, PerformanceTier::PowerSaver);

        // One signal alone is not.
        let mut device = strong_device();
        device.logical_cores = Probed::Known(2);
        let decision = select(&FpsHistory::new(), false, &device);
        assert_eq!(decision.tier, PerformanceTier::Performance);
    }

    #[test]
    fn samples_beat_the_cold_start_bias() {
        // Once evidence exists, a weak snapshot no longer pins the tier.
        let decision = select(&history_of(&[90.0, 88.0]), false, &weak_device());
        assert_eq!(decision.tier, PerformanceTier::Performance);
    }

    // --- Memory pressure ---

    #[test]
    fn pressure_forces_power_saver_over_good_fps() {
        let decision = select(&history_of(&[60.0, 58.0]), true, &strong_device());
        assert_eq!(decision.tier, PerformanceTier::PowerSaver);
        assert_eq!(decision.cause, SelectionCause::MemoryPressure);
        assert!(decision.average_fps.is_some());
    }

    #[test]
    fn pressure_keeps_the_fps_cause_when_already_in_power_saver() {
        let decision = select(&history_of(&[10.0]), true, &strong_device());
        assert_eq!(decision.tier, PerformanceTier::PowerSaver);
        assert_eq!(decision.cause, SelectionCause::LowAverageFps);
    }

    #[test]
    fn pressure_applies_on_cold_start_too() {
        let decision = select(&FpsHistory::new(), true, &strong_device());
        assert_eq!(decision.tier, PerformanceTier::PowerSaver);
        assert_eq!(decision.cause, SelectionCause::MemoryPressure);
    }

    // --- Throttle flag ---

    #[test]
    fn throttle_needs_samples_below_the_critical_floor() {
        let selector = TierSelector::default();
        assert!(!selector.is_throttled(&FpsHistory::new()));
        assert!(!selector.is_throttled(&history_of(&[20.0])));
        assert!(selector.is_throttled(&history_of(&[10.0, 12.0])));
    }

    #[test]
    fn custom_thresholds_move_the_floors() {
        let selector = TierSelector::new(SelectorConfig {
            power_saver_below_fps: 40.0,
            balanced_below_fps: 80.0,
            ..SelectorConfig::default()
        });
        let decision = selector.select(&history_of(&[50.0]), false, &strong_device());
        assert_eq!(decision.tier, PerformanceTier::Balanced);
    }
}
