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

// Skopos Showcase
// Drives the whole pipeline through a scripted session: a healthy start,
// a long frame-rate collapse, a manual override, and a recovery. Time is
// synthetic so the run is deterministic and finishes instantly; the device
// and heap probes are the real ones.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use skopos_control::{ControlConfig, ControlEvent, ControlService};
use skopos_core::platform::ViewportObserver;
use skopos_core::region::RegionId;
use skopos_core::tier::PerformanceTier;
use skopos_gate::{GateConfig, MountCoordinator};
use skopos_infra::{JsonPreferenceStore, NativeDeviceProbe, SysinfoHeapProbe};
use skopos_telemetry::SamplerService;

/// Stand-in for a host compositor's visibility plumbing. It accepts every
/// observation; the script injects the actual visibility reports.
struct ScriptedViewport;

impl ViewportObserver for ScriptedViewport {
    fn observe(&self, region: RegionId, margin_px: u32) -> bool {
        log::info!("viewport: observing {region:?} with {margin_px}px margin");
        true
    }

    fn unobserve(&self, region: RegionId) {
        log::info!("viewport: released {region:?}");
    }
}

struct Showcase {
    now: Instant,
    sampler: SamplerService,
    control: ControlService,
    coordinator: MountCoordinator,
}

impl Showcase {
    /// Runs `seconds` of synthetic time at a fixed frame rate, ticking the
    /// sampler every frame and the control service and mount sweep on
    /// every flushed window.
    fn run_phase(&mut self, name: &str, seconds: u64, fps: u32) {
        log::info!("--- {name}: {fps} fps for {seconds}s ---");
        let frame = Duration::from_nanos(1_000_000_000 / u64::from(fps));
        let end = self.now + Duration::from_secs(seconds);

        while self.now < end {
            self.now += frame;
            let tick = self.sampler.tick_at(self.now);
            if !tick.flushed() {
                continue;
            }

            let profile = self
                .control
                .tick(self.sampler.fps_history(), self.sampler.memory_pressured());
            let throttled = self.control.is_throttled(self.sampler.fps_history());
            self.coordinator.tick_at(self.now, throttled);
            self.drain_events();

            log::info!(
                "window: avg {:.1} fps, tier {}, budget {:?}, {} region(s) pending",
                self.sampler.average_fps().unwrap_or(0.0),
                self.control.tier(),
                profile.frame_budget(),
                self.coordinator.pending(),
            );
        }
    }

    fn drain_events(&mut self) {
        for event in self.control.events().receiver().try_iter() {
            match event {
                ControlEvent::TierChanged {
                    previous,
                    current,
                    cause,
                    ..
                } => log::info!("event: tier {previous} -> {current} ({cause})"),
                ControlEvent::ModeChanged { mode } => log::info!("event: mode -> {mode}"),
            }
        }
    }

    fn report_region(&self, name: &str, region: RegionId) {
        match self.coordinator.mount_cause(region) {
            Some(cause) => log::info!("region {name}: mounted ({cause:?})"),
            None => log::info!("region {name}: still waiting"),
        }
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("wgpu_hal", log::LevelFilter::Error)
        .init();

    // --- Step 1: Probe the host ---
    let device_probe = NativeDeviceProbe::new();
    let sampler = SamplerService::new(&device_probe, Box::new(SysinfoHeapProbe::new()));
    let device = sampler.device().clone();

    // --- Step 2: Control service with a durable preference ---
    let prefs_path = std::env::temp_dir().join("skopos-showcase").join("tier.json");
    log::info!("tier preference file: {}", prefs_path.display());
    let store = JsonPreferenceStore::new(prefs_path);
    let control = ControlService::with_store(ControlConfig::default(), device, Box::new(store));
    let handle = control.handle();

    // --- Step 3: Deferred regions behind their gates ---
    let coordinator = MountCoordinator::new(Some(Arc::new(ScriptedViewport)));
    let mut show = Showcase {
        now: Instant::now(),
        sampler,
        control,
        coordinator,
    };

    let profile = show.control.profile();
    let hero = show.coordinator.add_region_at(
        show.now,
        GateConfig {
            mount_after: Some(Duration::from_millis(1500)),
            ..GateConfig::default()
        },
        &profile,
    );
    let gallery = show.coordinator.add_region_at(
        show.now,
        GateConfig {
            margin_px: 150,
            mount_after: Some(Duration::from_secs(4)),
            ..GateConfig::default()
        },
        &profile,
    );
    let archive = show
        .coordinator
        .add_region_at(show.now, GateConfig::default(), &profile);

    // --- Step 4: Scripted session ---
    // A healthy start; the hero region is force-mounted by its deadline.
    show.run_phase("warm-up", 3, 60);

    // The user scrolls the gallery into view.
    show.coordinator.on_visibility(gallery, true);

    // A long collapse drags the rolling average down tier by tier. The
    // archive region's eight-second backstop fires along the way.
    show.run_phase("load spike", 12, 8);

    // A region registered while frames are this slow waits longer: its
    // forced mount is deferred until the host stops looking throttled.
    let late = show.coordinator.add_region_at(
        show.now,
        GateConfig {
            mount_after: Some(Duration::from_secs(2)),
            ..GateConfig::default()
        },
        &show.control.profile(),
    );

    // The user pins a tier; sampling keeps running but stops mattering.
    let pinned = std::env::var("SKOPOS_TIER")
        .ok()
        .and_then(|raw| raw.parse::<PerformanceTier>().ok())
        .unwrap_or(PerformanceTier::Performance);
    log::info!("pinning tier: {pinned}");
    handle.request_override(pinned);
    show.run_phase("override", 2, 8);

    // Back to automatic selection; the average recovers window by window.
    handle.request_auto();
    show.run_phase("recovery", 8, 60);

    // --- Step 5: Final report ---
    let profile = show.control.profile();
    log::info!(
        "final: mode {}, tier {}, quality {:?}, scale {}, {} fps cap, budget {:?}",
        show.control.mode(),
        show.control.tier(),
        profile.image_quality,
        profile.render_scale,
        profile.max_fps,
        profile.frame_budget(),
    );
    if let Some(memory) = show.sampler.last_memory() {
        log::info!(
            "memory: {:.1} MB used, pressured: {}",
            memory.used_mb,
            memory.pressured
        );
    }
    show.report_region("hero", hero);
    show.report_region("gallery", gallery);
    show.report_region("archive", archive);
    show.report_region("late", late);

    Ok(())
}
