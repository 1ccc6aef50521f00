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

//! Tunables for tier selection and the control service.
//!
//! Every threshold here is plain configuration. The defaults reproduce the
//! shipped behavior; none of them is a contract other code may assume.

/// Thresholds steering automatic tier selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectorConfig {
    /// Average FPS below which the host drops to power-saver.
    pub power_saver_below_fps: f32,
    /// Average FPS below which the host drops to balanced.
    pub balanced_below_fps: f32,
    /// Low-end signal count at or above which a cold start begins in
    /// power-saver instead of performance.
    pub low_end_signal_threshold: u32,
    /// Average FPS below which the host counts as throttled, which defers
    /// forced mounts.
    pub critical_fps: f32,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            power_saver_below_fps: 24.0,
            balanced_below_fps: 45.0,
            low_end_signal_threshold: 2,
            critical_fps: 15.0,
        }
    }
}

/// Assembly-level knobs for the control service.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlConfig {
    /// Selection thresholds.
    pub selector: SelectorConfig,
    /// Capacity of the inbound override-request channel. Zero falls back
    /// to the default.
    pub request_buffer: usize,
}

impl ControlConfig {
    /// Default capacity of the override-request channel.
    pub const DEFAULT_REQUEST_BUFFER: usize = 32;

    /// The request-channel capacity to actually allocate.
    pub fn request_buffer_or_default(&self) -> usize {
        if self.request_buffer == 0 {
            Self::DEFAULT_REQUEST_BUFFER
        } else {
            self.request_buffer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reproduce_the_shipped_thresholds() {
        let config = SelectorConfig::default();
        assert_eq!(config.power_saver_below_fps, 24.0);
        assert_eq!(config.balanced_below_fps, 45.0);
        assert_eq!(config.low_end_signal_threshold, 2);
        assert_eq!(config.critical_fps, 15.0);
    }

    #[test]
    fn zero_request_buffer_falls_back() {
        let config = ControlConfig::default();
        assert_eq!(
            config.request_buffer_or_default(),
            ControlConfig::DEFAULT_REQUEST_BUFFER
        );

        let sized = ControlConfig {
            request_buffer: 4,
            ..ControlConfig::default()
        };
        assert_eq!(sized.request_buffer_or_default(), 4);
    }
}
