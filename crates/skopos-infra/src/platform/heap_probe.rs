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

//! sysinfo-based implementation of the HeapProbe trait.

use skopos_core::capability::Probed;
use skopos_core::platform::HeapProbe;
use skopos_core::sample::HeapUsage;
use sysinfo::{Pid, ProcessesToUpdate, System};

/// A heap probe that reads this process's resident memory through the
/// `sysinfo` crate, with total system memory as the limit.
pub struct SysinfoHeapProbe {
    system: System,
    pid: Option<Pid>,
}

impl SysinfoHeapProbe {
    /// Creates a new SysinfoHeapProbe.
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(error) => {
                log::warn!("cannot resolve current pid: {error}");
                None
            }
        };
        Self {
            system: System::new(),
            pid,
        }
    }
}

impl HeapProbe for SysinfoHeapProbe {
    fn heap_usage(&mut self) -> Probed<HeapUsage> {
        let Some(pid) = self.pid else {
            return Probed::Unknown;
        };
        self.system.refresh_memory();
        self.system
            .refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        let Some(process) = self.system.process(pid) else {
            return Probed::Unknown;
        };
        let limit = self.system.total_memory();
        Probed::Known(HeapUsage {
            used_bytes: process.memory(),
            limit_bytes: (limit > 0).then_some(limit),
        })
    }
}

impl Default for SysinfoHeapProbe {
    fn default() -> Self {
        Self::new()
    }
}
