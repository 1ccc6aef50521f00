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

//! Render profiles: the concrete settings bundle each tier resolves to.
//!
//! [`RenderProfile::for_tier`] is a pure, total function. It allocates
//! nothing, touches no shared state, and returns the same bundle for the
//! same tier every time, so callers may resolve on every frame and compare
//! bundles by value to detect changes.

use crate::tier::PerformanceTier;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Quality level for raster assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ImageQuality {
    /// Smallest variants, visibly compressed.
    Low,
    /// Mid-size variants.
    Medium,
    /// Full-size variants.
    High,
}

/// The bundle of rendering switches a tier resolves to.
///
/// Consumers receive this by value and read it; nothing mutates a profile in
/// place. A tier change is delivered as a whole new bundle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderProfile {
    /// Whether animated transitions run at all.
    pub animations: bool,
    /// Parallax scrolling layers.
    pub parallax: bool,
    /// Backdrop blur effects.
    pub blur: bool,
    /// Decorative gradient fills.
    pub gradients: bool,
    /// Drop shadows on elevated surfaces.
    pub shadows: bool,
    /// Quality level for raster assets.
    pub image_quality: ImageQuality,
    /// Floor, in pixels, for the deferred-mount observation margin. Low
    /// tiers widen the margin so content is ready earlier on slow devices;
    /// callers asking for a larger margin still get theirs.
    pub lazy_margin_px: u32,
    /// Scale applied to offscreen render targets (1.0 = native).
    pub render_scale: f32,
    /// Upper bound on the presented frame rate.
    pub max_fps: u32,
    /// Whether 3D embellishments are constructed at all.
    pub three_d: bool,
    /// Whether long lists render through a windowing layer.
    pub virtualization: bool,
}

impl RenderProfile {
    /// Resolves the settings bundle for a tier.
    ///
    /// Total over its input: every [`PerformanceTier`] maps to exactly one
    /// bundle, and the "automatic" mode cannot reach this function because
    /// [`TierMode`](crate::tier::TierMode) is a different type.
    pub const fn for_tier(tier: PerformanceTier) -> Self {
        match tier {
            PerformanceTier::PowerSaver => Self {
                animations: false,
                parallax: false,
                blur: false,
                gradients: false,
                shadows: false,
                image_quality: ImageQuality::Low,
                lazy_margin_px: 200,
                render_scale: 0.75,
                max_fps: 30,
                three_d: false,
                virtualization: true,
            },
            PerformanceTier::Balanced => Self {
                animations: true,
                parallax: false,
                blur: false,
                gradients: true,
                shadows: true,
                image_quality: ImageQuality::Medium,
                lazy_margin_px: 100,
                render_scale: 0.9,
                max_fps: 60,
                three_d: false,
                virtualization: true,
            },
            PerformanceTier::Performance => Self {
                animations: true,
                parallax: true,
                blur: true,
                gradients: true,
                shadows: true,
                image_quality: ImageQuality::High,
                lazy_margin_px: 0,
                render_scale: 1.0,
                max_fps: 120,
                three_d: true,
                virtualization: false,
            },
        }
    }

    /// Time budget for one frame under this profile's FPS cap.
    pub fn frame_budget(&self) -> Duration {
        if self.max_fps == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(1.0 / self.max_fps as f64)
    }
}

impl Default for RenderProfile {
    /// The bundle of the default tier.
    fn default() -> Self {
        Self::for_tier(PerformanceTier::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn resolution_is_pure_and_idempotent() {
        for tier in PerformanceTier::ALL {
            let first = RenderProfile::for_tier(tier);
            let second = RenderProfile::for_tier(tier);
            assert_eq!(first, second, "{tier} must resolve identically");
        }
    }

    #[test]
    fn tiers_resolve_to_distinct_bundles() {
        let power_saver = RenderProfile::for_tier(PerformanceTier::PowerSaver);
        let balanced = RenderProfile::for_tier(PerformanceTier::Balanced);
        let performance = RenderProfile::for_tier(PerformanceTier::Performance);
        assert_ne!(power_saver, balanced);
        assert_ne!(balanced, performance);
        assert_ne!(power_saver, performance);
    }

    #[test]
    fn effects_are_monotonic_across_tiers() {
        // Anything enabled at a weak tier stays enabled at every stronger one.
        let flags = |profile: RenderProfile| {
            [
                profile.animations,
                profile.parallax,
                profile.blur,
                profile.gradients,
                profile.shadows,
                profile.three_d,
            ]
        };
        let mut previous: Option<[bool; 6]> = None;
        for tier in PerformanceTier::ALL {
            let current = flags(RenderProfile::for_tier(tier));
            if let Some(weaker) = previous {
                for (&on_weaker, &on_current) in weaker.iter().zip(current.iter()) {
                    assert!(!on_weaker || on_current, "effect regressed at {tier}");
                }
            }
            previous = Some(current);
        }
    }

    #[test]
    fn margins_and_scale_follow_capability() {
        let power_saver = RenderProfile::for_tier(PerformanceTier::PowerSaver);
        let balanced = RenderProfile::for_tier(PerformanceTier::Balanced);
        let performance = RenderProfile::for_tier(PerformanceTier::Performance);

        assert!(power_saver.lazy_margin_px > balanced.lazy_margin_px);
        assert!(balanced.lazy_margin_px > performance.lazy_margin_px);
        assert!(power_saver.render_scale < balanced.render_scale);
        assert!(balanced.render_scale < performance.render_scale);
        assert!(power_saver.image_quality < balanced.image_quality);
        assert!(balanced.image_quality < performance.image_quality);
    }

    #[test]
    fn frame_budget_matches_the_cap() {
        let balanced = RenderProfile::for_tier(PerformanceTier::Balanced);
        assert_relative_eq!(
            balanced.frame_budget().as_secs_f64(),
            1.0 / 60.0,
            epsilon = 1e-9
        );

        let uncapped = RenderProfile {
            max_fps: 0,
            ..RenderProfile::default()
        };
        assert_eq!(uncapped.frame_budget(), Duration::ZERO);
    }
}
