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

//! Performance tiers and the selection mode.
//!
//! A [`PerformanceTier`] is always one of three terminal levels. The
//! "automatic" choice users see in a settings menu is not a fourth tier: it
//! is a [`TierMode`], and only ever resolves *to* one of the three. Keeping
//! the two as separate types means no downstream code can receive an
//! unresolved tier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A terminal rendering tier.
///
/// Ordering follows capability: `PowerSaver < Balanced < Performance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PerformanceTier {
    /// Minimal effects, reduced render scale, aggressive deferral.
    PowerSaver,
    /// Core effects on, expensive embellishments off.
    Balanced,
    /// Everything enabled.
    Performance,
}

impl PerformanceTier {
    /// All tiers, weakest first.
    pub const ALL: [PerformanceTier; 3] = [
        PerformanceTier::PowerSaver,
        PerformanceTier::Balanced,
        PerformanceTier::Performance,
    ];

    /// Stable lowercase name, used in logs and the preference file.
    pub fn name(&self) -> &'static str {
        match self {
            PerformanceTier::PowerSaver => "power-saver",
            PerformanceTier::Balanced => "balanced",
            PerformanceTier::Performance => "performance",
        }
    }
}

impl Default for PerformanceTier {
    /// The tier assumed before any evidence arrives.
    fn default() -> Self {
        PerformanceTier::Performance
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error produced when a tier name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTierError(String);

impl fmt::Display for ParseTierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown tier '{}', expected power-saver, balanced, or performance",
            self.0
        )
    }
}

impl std::error::Error for ParseTierError {}

impl FromStr for PerformanceTier {
    type Err = ParseTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "power-saver" | "powersaver" | "power_saver" => Ok(PerformanceTier::PowerSaver),
            "balanced" => Ok(PerformanceTier::Balanced),
            "performance" => Ok(PerformanceTier::Performance),
            other => Err(ParseTierError(other.to_string())),
        }
    }
}

/// How the active tier is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TierMode {
    /// Continuous reselection from live samples.
    Auto,
    /// A pinned tier; reselection is suspended until auto is reselected.
    Manual(PerformanceTier),
}

impl TierMode {
    /// The pinned tier, if any.
    pub fn manual_tier(&self) -> Option<PerformanceTier> {
        match self {
            TierMode::Auto => None,
            TierMode::Manual(tier) => Some(*tier),
        }
    }

    /// Whether automatic reselection is active.
    pub fn is_auto(&self) -> bool {
        matches!(self, TierMode::Auto)
    }
}

impl Default for TierMode {
    fn default() -> Self {
        TierMode::Auto
    }
}

impl fmt::Display for TierMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TierMode::Auto => f.write_str("auto"),
            TierMode::Manual(tier) => write!(f, "manual ({tier})"),
        }
    }
}
