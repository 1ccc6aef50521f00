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

//! Sample types flowing out of the capability sampler.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// One flushed frame-rate aggregation window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FpsSample {
    /// Frames per second over the window: frames divided by the window's
    /// actual wall-clock span.
    pub fps: f32,
    /// Raw frames counted in the window.
    pub frames: u32,
    /// Actual wall-clock span of the window. At least the configured
    /// window length, longer when the host loop stalled.
    pub window: Duration,
}

/// One memory poll, derived from a [`HeapUsage`] reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemorySample {
    /// Heap in use, in megabytes.
    pub used_mb: f32,
    /// Heap ceiling, in megabytes, where the host reports one.
    pub limit_mb: Option<f32>,
    /// Whether usage crossed the pressure ratio. Always `false` when the
    /// ceiling is unknown.
    pub pressured: bool,
}

/// Raw heap numbers reported by a [`HeapProbe`](crate::platform::HeapProbe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapUsage {
    /// Bytes currently in use.
    pub used_bytes: u64,
    /// Byte ceiling, where the host reports one.
    pub limit_bytes: Option<u64>,
}

impl HeapUsage {
    /// Heap in use, in megabytes.
    pub fn used_mb(&self) -> f32 {
        (self.used_bytes as f64 / BYTES_PER_MB) as f32
    }

    /// Heap ceiling, in megabytes, where one exists.
    pub fn limit_mb(&self) -> Option<f32> {
        self.limit_bytes
            .map(|bytes| (bytes as f64 / BYTES_PER_MB) as f32)
    }

    /// Used fraction of the ceiling, where one exists.
    pub fn usage_ratio(&self) -> Option<f64> {
        self.limit_bytes
            .filter(|limit| *limit > 0)
            .map(|limit| self.used_bytes as f64 / limit as f64)
    }
}
