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

//! # Skopos Control
//!
//! Tier selection for the adaptive rendering controller: the pure
//! [`TierSelector`] that maps sampled telemetry to a performance tier, and
//! the [`ControlService`] that owns the resulting state, applies manual
//! overrides, and publishes changes.

#![warn(missing_docs)]

pub mod config;
pub mod selector;
pub mod service;

pub use config::{ControlConfig, SelectorConfig};
pub use selector::{SelectionCause, TierDecision, TierSelector};
pub use service::{ControlEvent, ControlService, TierChangeCause, TierHandle, TierRequest};
