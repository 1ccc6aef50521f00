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

//! # Skopos Core
//!
//! Foundational crate containing traits, core types, and interface contracts
//! that define the adaptive rendering pipeline: performance tiers, render
//! profiles, the device capability snapshot, sample types, and the host
//! facilities everything else is built against.

#![warn(missing_docs)]

pub mod capability;
pub mod event;
pub mod history;
pub mod platform;
pub mod profile;
pub mod region;
pub mod sample;
pub mod tier;

pub use capability::{DeviceProfile, GpuClass, NetworkClass, Probed};
pub use history::{FpsHistory, RingBuffer};
pub use profile::{ImageQuality, RenderProfile};
pub use region::RegionId;
pub use tier::{PerformanceTier, TierMode};
