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

//! The single-writer control service.
//!
//! All cross-cutting tier state lives here: the selection mode, the
//! resolved tier, and the profile it maps to. The service is the only
//! writer. Readers take cheap copies from the accessors; writers go through
//! cloneable [`TierHandle`]s whose requests are queued and applied inside
//! [`ControlService::tick`], so manual overrides and automatic reselection
//! are serialized through one code path and cannot race.

use crate::config::ControlConfig;
use crate::selector::{SelectionCause, TierDecision, TierSelector};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use skopos_core::capability::DeviceProfile;
use skopos_core::event::EventBus;
use skopos_core::history::FpsHistory;
use skopos_core::platform::PreferenceStore;
use skopos_core::profile::RenderProfile;
use skopos_core::tier::{PerformanceTier, TierMode};
use std::fmt;

/// A request to change how the tier is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierRequest {
    /// Pin a tier and suspend automatic selection.
    Override(PerformanceTier),
    /// Resume automatic selection.
    Auto,
}

/// What moved the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierChangeCause {
    /// Automatic selection, with the rule that won.
    Selected(SelectionCause),
    /// An explicit override request.
    Override,
}

impl fmt::Display for TierChangeCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TierChangeCause::Selected(cause) => cause.fmt(f),
            TierChangeCause::Override => f.write_str("override"),
        }
    }
}

/// Events published on the control service's bus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    /// The resolved tier changed.
    TierChanged {
        /// Tier before the change.
        previous: PerformanceTier,
        /// Tier now in force.
        current: PerformanceTier,
        /// Mode after the change.
        mode: TierMode,
        /// What produced the change.
        cause: TierChangeCause,
    },
    /// The selection mode changed without moving the tier.
    ModeChanged {
        /// Mode now in force.
        mode: TierMode,
    },
}

/// Cloneable write accessor for the control service.
///
/// Requests never block and never fail loudly: a full queue drops the
/// request with a warning, and a gone service turns requests into no-ops.
#[derive(Debug, Clone)]
pub struct TierHandle {
    sender: Sender<TierRequest>,
}

impl TierHandle {
    /// Requests a manual tier override.
    pub fn request_override(&self, tier: PerformanceTier) {
        self.send(TierRequest::Override(tier));
    }

    /// Requests a return to automatic selection.
    pub fn request_auto(&self) {
        self.send(TierRequest::Auto);
    }

    fn send(&self, request: TierRequest) {
        match self.sender.try_send(request) {
            Ok(()) => {}
            Err(TrySendError::Full(request)) => {
                log::warn!("tier request queue full, dropping {request:?}");
            }
            Err(TrySendError::Disconnected(_)) => {
                log::debug!("tier request after control service shutdown");
            }
        }
    }
}

/// Owns the tier state and applies every change to it.
pub struct ControlService {
    selector: TierSelector,
    device: DeviceProfile,
    mode: TierMode,
    tier: PerformanceTier,
    profile: RenderProfile,
    request_tx: Sender<TierRequest>,
    request_rx: Receiver<TierRequest>,
    events: EventBus<ControlEvent>,
    store: Option<Box<dyn PreferenceStore>>,
}

impl ControlService {
    /// Creates a service with no durable preference.
    pub fn new(config: ControlConfig, device: DeviceProfile) -> Self {
        Self::build(config, device, None)
    }

    /// Creates a service that rehydrates the last explicit mode from
    /// `store` and saves every explicit change back to it.
    pub fn with_store(
        config: ControlConfig,
        device: DeviceProfile,
        store: Box<dyn PreferenceStore>,
    ) -> Self {
        Self::build(config, device, Some(store))
    }

    fn build(
        config: ControlConfig,
        device: DeviceProfile,
        store: Option<Box<dyn PreferenceStore>>,
    ) -> Self {
        let (request_tx, request_rx) = bounded(config.request_buffer_or_default());
        let selector = TierSelector::new(config.selector);

        let mode = match &store {
            Some(store) => match store.load() {
                Ok(Some(mode)) => {
                    log::info!("restored tier preference: {mode}");
                    mode
                }
                Ok(None) => TierMode::Auto,
                Err(error) => {
                    log::warn!("tier preference unavailable: {error:#}");
                    TierMode::Auto
                }
            },
            None => TierMode::Auto,
        };

        // The pre-sampling tier: a pinned preference wins; otherwise the
        // cold-start rules decide from the device snapshot alone.
        let tier = match mode {
            TierMode::Manual(tier) => tier,
            TierMode::Auto => selector.select(&FpsHistory::new(), false, &device).tier,
        };
        log::info!("control service starting: mode={mode}, tier={tier}");

        Self {
            selector,
            device,
            mode,
            tier,
            profile: RenderProfile::for_tier(tier),
            request_tx,
            request_rx,
            events: EventBus::new(),
            store,
        }
    }

    /// A new write accessor.
    pub fn handle(&self) -> TierHandle {
        TierHandle {
            sender: self.request_tx.clone(),
        }
    }

    /// The event bus carrying [`ControlEvent`]s.
    pub fn events(&self) -> &EventBus<ControlEvent> {
        &self.events
    }

    /// The selection mode in force.
    pub fn mode(&self) -> TierMode {
        self.mode
    }

    /// The resolved tier in force.
    pub fn tier(&self) -> PerformanceTier {
        self.tier
    }

    /// The settings bundle in force.
    pub fn profile(&self) -> RenderProfile {
        self.profile
    }

    /// Whether sampled FPS counts the host as throttled, which defers
    /// forced mounts.
    pub fn is_throttled(&self, history: &FpsHistory) -> bool {
        self.selector.is_throttled(history)
    }

    /// Applies pending requests, then reselects when in auto mode.
    ///
    /// The host is expected to call this once per sampler flush; calling
    /// more often is harmless since selection is pure over its inputs.
    /// Returns the profile in force afterwards.
    pub fn tick(&mut self, history: &FpsHistory, memory_pressured: bool) -> RenderProfile {
        // 1. Drain the write path. Later requests supersede earlier ones.
        while let Ok(request) = self.request_rx.try_recv() {
            self.apply_request(request);
        }

        // 2. Reselect. A pinned mode suspends this entirely.
        if self.mode.is_auto() {
            let decision = self.selector.select(history, memory_pressured, &self.device);
            log::trace!("selection: {decision:?}");
            self.apply_decision(decision);
        }

        self.profile
    }

    fn apply_request(&mut self, request: TierRequest) {
        match request {
            TierRequest::Override(tier) => {
                let mode = TierMode::Manual(tier);
                if self.mode == mode {
                    return;
                }
                self.mode = mode;
                self.persist(mode);
                if tier == self.tier {
                    log::info!("tier pinned at {tier}");
                    self.events.publish(ControlEvent::ModeChanged { mode });
                } else {
                    self.transition(tier, TierChangeCause::Override);
                }
            }
            TierRequest::Auto => {
                if self.mode.is_auto() {
                    return;
                }
                self.mode = TierMode::Auto;
                self.persist(TierMode::Auto);
                log::info!("automatic tier selection resumed");
                self.events.publish(ControlEvent::ModeChanged {
                    mode: TierMode::Auto,
                });
            }
        }
    }

    fn apply_decision(&mut self, decision: TierDecision) {
        self.transition(decision.tier, TierChangeCause::Selected(decision.cause));
    }

    fn transition(&mut self, tier: PerformanceTier, cause: TierChangeCause) {
        if tier == self.tier {
            return;
        }
        let previous = self.tier;
        self.tier = tier;
        self.profile = RenderProfile::for_tier(tier);
        log::info!("tier {previous} -> {tier} ({cause})");
        self.events.publish(ControlEvent::TierChanged {
            previous,
            current: tier,
            mode: self.mode,
            cause,
        });
    }

    fn persist(&self, mode: TierMode) {
        if let Some(store) = &self.store {
            if let Err(error) = store.save(mode) {
                log::warn!("failed to persist tier preference: {error:#}");
            }
        }
    }
}
