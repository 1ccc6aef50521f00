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

//! Heap polling and the memory-pressure flag.
//!
//! A [`MemoryMonitor`] consults a [`HeapProbe`] on a fixed interval and
//! derives one boolean the tier selector cares about: is the heap close
//! enough to its ceiling that quality should drop. A host without heap
//! introspection degrades to "never pressured"; that is a capability state,
//! not an error.

use skopos_core::capability::Probed;
use skopos_core::platform::HeapProbe;
use skopos_core::sample::MemorySample;
use std::time::{Duration, Instant};

/// Default interval between heap polls.
pub const MEMORY_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Default used/limit ratio above which the host counts as pressured.
pub const MEMORY_PRESSURE_RATIO: f64 = 0.8;

/// Polls a heap probe on an interval and tracks the pressure flag.
pub struct MemoryMonitor {
    probe: Box<dyn HeapProbe>,
    interval: Duration,
    pressure_ratio: f64,
    last_poll: Option<Instant>,
    last_sample: Option<MemorySample>,
    reported_unavailable: bool,
}

impl MemoryMonitor {
    /// Creates a monitor with the default interval and pressure ratio.
    pub fn new(probe: Box<dyn HeapProbe>) -> Self {
        Self {
            probe,
            interval: MEMORY_POLL_INTERVAL,
            pressure_ratio: MEMORY_PRESSURE_RATIO,
            last_poll: None,
            last_sample: None,
            reported_unavailable: false,
        }
    }

    /// Overrides the poll interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Overrides the pressure ratio.
    pub fn with_pressure_ratio(mut self, ratio: f64) -> Self {
        self.pressure_ratio = ratio;
        self
    }

    /// Polls against the wall clock.
    pub fn poll(&mut self) -> Option<MemorySample> {
        self.poll_at(Instant::now())
    }

    /// Polls the probe if the interval has elapsed (the first call always
    /// polls). Returns the fresh sample when one was taken.
    pub fn poll_at(&mut self, now: Instant) -> Option<MemorySample> {
        let due = match self.last_poll {
            None => true,
            Some(last) => now.duration_since(last) >= self.interval,
        };
        if !due {
            return None;
        }
        self.last_poll = Some(now);

        match self.probe.heap_usage() {
            Probed::Known(usage) => {
                let pressured = usage
                    .usage_ratio()
                    .map_or(false, |ratio| ratio > self.pressure_ratio);
                let sample = MemorySample {
                    used_mb: usage.used_mb(),
                    limit_mb: usage.limit_mb(),
                    pressured,
                };

                let was_pressured = self.pressured();
                if pressured && !was_pressured {
                    log::warn!(
                        "memory pressure: {:.1}MB of {:.1}MB in use",
                        sample.used_mb,
                        sample.limit_mb.unwrap_or(0.0)
                    );
                } else if !pressured && was_pressured {
                    log::info!("memory pressure cleared ({:.1}MB in use)", sample.used_mb);
                }

                self.last_sample = Some(sample);
                Some(sample)
            }
            Probed::Unknown => {
                if !self.reported_unavailable {
                    log::debug!("heap probe unavailable; memory pressure stays off");
                    self.reported_unavailable = true;
                }
                None
            }
        }
    }

    /// The standing pressure flag. `false` until a poll says otherwise and
    /// always `false` on hosts without heap introspection.
    pub fn pressured(&self) -> bool {
        self.last_sample.map_or(false, |sample| sample.pressured)
    }

    /// The most recent sample, if any poll has succeeded.
    pub fn last_sample(&self) -> Option<MemorySample> {
        self.last_sample
    }
}
