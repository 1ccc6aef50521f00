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

//! sysinfo-based implementation of the DeviceProbe trait.

use crate::platform::gpu_probe::classify_gpu;
use skopos_core::capability::{GpuClass, NetworkClass, Probed};
use skopos_core::platform::DeviceProbe;
use sysinfo::System;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// A device probe that reads host capabilities through `sysinfo` and wgpu.
///
/// Everything is probed once at construction; device capabilities do not
/// change while the process runs, and the wgpu adapter request is too
/// expensive to repeat.
pub struct NativeDeviceProbe {
    logical_cores: Probed<u32>,
    memory_gb: Probed<f32>,
    gpu: Probed<GpuClass>,
}

impl NativeDeviceProbe {
    /// Probes the host.
    pub fn new() -> Self {
        let mut system = System::new_all();
        system.refresh_all();

        let cores = system.cpus().len();
        let logical_cores = if cores == 0 {
            Probed::Unknown
        } else {
            Probed::Known(cores as u32)
        };

        let total = system.total_memory();
        let memory_gb = if total == 0 {
            Probed::Unknown
        } else {
            Probed::Known((total as f64 / BYTES_PER_GIB) as f32)
        };

        log::debug!("device probe: cores={logical_cores} memory={memory_gb}GB");

        Self {
            logical_cores,
            memory_gb,
            gpu: classify_gpu(),
        }
    }
}

impl DeviceProbe for NativeDeviceProbe {
    fn logical_cores(&self) -> Probed<u32> {
        self.logical_cores
    }

    fn memory_gb(&self) -> Probed<f32> {
        self.memory_gb
    }

    fn gpu_class(&self) -> Probed<GpuClass> {
        self.gpu
    }

    // Desktop hosts expose no portable equivalents for the remaining
    // checks; Unknown keeps them out of scoring rather than guessing.

    fn network_class(&self) -> Probed<NetworkClass> {
        Probed::Unknown
    }

    fn reduced_motion(&self) -> Probed<bool> {
        Probed::Unknown
    }

    fn save_data(&self) -> Probed<bool> {
        Probed::Unknown
    }
}

impl Default for NativeDeviceProbe {
    fn default() -> Self {
        Self::new()
    }
}
