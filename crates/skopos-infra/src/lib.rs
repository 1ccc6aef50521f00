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

//! # Skopos Infra
//!
//! Concrete host integrations for the adaptive rendering controller:
//! sysinfo-backed device and heap probes, a wgpu adapter classifier, and
//! file-backed preference persistence.

#![warn(missing_docs)]

pub mod platform;
pub mod storage;

pub use platform::{classify_gpu, NativeDeviceProbe, SysinfoHeapProbe};
pub use storage::JsonPreferenceStore;
