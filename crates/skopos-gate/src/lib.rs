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

//! # Skopos Gate
//!
//! Deferred mounting for render regions. Each region sits behind a
//! [`MountGate`] that waits for visibility or a forced deadline, and the
//! [`MountCoordinator`] wires gates to the host's viewport observer and
//! sweeps their deadlines.

#![warn(missing_docs)]

pub mod coordinator;
pub mod gate;

pub use coordinator::MountCoordinator;
pub use gate::{
    GateConfig, GatePhase, MountCause, MountGate, DEFAULT_MAX_WAIT, DEFAULT_THROTTLE_DELAY_FACTOR,
};
