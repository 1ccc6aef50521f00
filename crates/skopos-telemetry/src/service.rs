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

//! The capability sampler.
//!
//! One service owns every live measurement the pipeline takes: the frame
//! meter, the memory monitor, and the startup device snapshot. The host
//! calls [`SamplerService::tick`] once per presented frame; everything else
//! reads the accessors. The service holds no timers and spawns nothing, so
//! dropping it releases the probes and stops all measurement.

use crate::frame::FrameMeter;
use crate::memory::MemoryMonitor;
use skopos_core::capability::DeviceProfile;
use skopos_core::history::FpsHistory;
use skopos_core::platform::{DeviceProbe, HeapProbe};
use skopos_core::sample::{FpsSample, MemorySample};
use std::time::Instant;

/// What a single sampler tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SamplerTick {
    /// The FPS figure flushed at this tick, if the window closed.
    pub fps: Option<FpsSample>,
    /// The memory sample taken at this tick, if the poll came due.
    pub memory: Option<MemorySample>,
}

impl SamplerTick {
    /// Whether this tick flushed an FPS figure, meaning the rolling history
    /// changed and a reselection is worth running.
    pub fn flushed(&self) -> bool {
        self.fps.is_some()
    }
}

/// Owns frame metering, memory polling, and the device snapshot.
pub struct SamplerService {
    meter: FrameMeter,
    monitor: MemoryMonitor,
    device: DeviceProfile,
}

impl SamplerService {
    /// Builds the sampler: takes the one-time device snapshot from
    /// `device_probe` (which is only borrowed and can be dropped after) and
    /// keeps `heap_probe` for periodic polling.
    pub fn new(device_probe: &dyn DeviceProbe, heap_probe: Box<dyn HeapProbe>) -> Self {
        let device = device_probe.snapshot();
        log::info!("device snapshot: {device}");
        Self::from_parts(device, FrameMeter::new(), MemoryMonitor::new(heap_probe))
    }

    /// Assembles a sampler from preconfigured parts.
    pub fn from_parts(device: DeviceProfile, meter: FrameMeter, monitor: MemoryMonitor) -> Self {
        Self {
            meter,
            monitor,
            device,
        }
    }

    /// Advances the sampler against the wall clock.
    pub fn tick(&mut self) -> SamplerTick {
        self.tick_at(Instant::now())
    }

    /// Counts the frame at `now` and runs any due memory poll.
    pub fn tick_at(&mut self, now: Instant) -> SamplerTick {
        SamplerTick {
            fps: self.meter.on_frame_at(now),
            memory: self.monitor.poll_at(now),
        }
    }

    /// The rolling FPS history, oldest first.
    pub fn fps_history(&self) -> &FpsHistory {
        self.meter.history()
    }

    /// Mean FPS over the rolling history.
    pub fn average_fps(&self) -> Option<f32> {
        self.meter.average_fps()
    }

    /// The most recently flushed FPS figure.
    pub fn latest_fps(&self) -> Option<f32> {
        self.meter.latest_fps()
    }

    /// The standing memory-pressure flag.
    pub fn memory_pressured(&self) -> bool {
        self.monitor.pressured()
    }

    /// The most recent memory sample, if any poll has succeeded.
    pub fn last_memory(&self) -> Option<MemorySample> {
        self.monitor.last_sample()
    }

    /// The startup device snapshot.
    pub fn device(&self) -> &DeviceProfile {
        &self.device
    }
}
