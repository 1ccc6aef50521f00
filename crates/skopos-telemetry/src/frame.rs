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

//! Frame-rate metering.
//!
//! The host calls [`FrameMeter::on_frame`] once per presented frame. Frames
//! are counted into an aggregation window; when the window's wall-clock span
//! has elapsed the meter flushes one FPS figure into the rolling history and
//! starts the next window. Consumers of the history only ever see fully
//! flushed figures, never a half-counted window.
//!
//! Every entry point has an `_at` variant taking an explicit [`Instant`] so
//! tests (and replay tooling) can drive the meter on a synthetic clock.

use skopos_core::history::FpsHistory;
use skopos_core::sample::FpsSample;
use std::time::{Duration, Instant};

/// Default wall-clock span of one aggregation window.
pub const FPS_WINDOW: Duration = Duration::from_millis(1000);

/// Counts frames and flushes per-window FPS figures into a rolling history.
#[derive(Debug, Clone)]
pub struct FrameMeter {
    window: Duration,
    window_start: Option<Instant>,
    frames: u32,
    history: FpsHistory,
}

impl FrameMeter {
    /// Creates a meter with the default window.
    pub fn new() -> Self {
        Self::with_window(FPS_WINDOW)
    }

    /// Creates a meter flushing every `window` of wall time.
    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            window_start: None,
            frames: 0,
            history: FpsHistory::new(),
        }
    }

    /// Records one frame against the wall clock.
    pub fn on_frame(&mut self) -> Option<FpsSample> {
        self.on_frame_at(Instant::now())
    }

    /// Records one frame at `now`.
    ///
    /// The first call opens the window. A call at or past the window
    /// boundary counts its frame into the closing window, flushes
    /// `frames / elapsed` into the history, and opens the next window at
    /// `now`. The figure uses the window's actual span, so a stalled loop
    /// reports the low rate it really delivered.
    pub fn on_frame_at(&mut self, now: Instant) -> Option<FpsSample> {
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;

        let elapsed = now.duration_since(start);
        if elapsed < self.window {
            return None;
        }

        let seconds = elapsed.as_secs_f32();
        let fps = if seconds > 0.0 {
            self.frames as f32 / seconds
        } else {
            0.0
        };

        let sample = FpsSample {
            fps,
            frames: self.frames,
            window: elapsed,
        };
        self.history.push(fps);
        log::trace!(
            "fps window flushed: {:.1} ({} frames over {:?})",
            fps,
            self.frames,
            elapsed
        );

        self.frames = 0;
        self.window_start = Some(now);
        Some(sample)
    }

    /// The rolling history of flushed figures, oldest first.
    pub fn history(&self) -> &FpsHistory {
        &self.history
    }

    /// Mean of the flushed figures, once any exist.
    pub fn average_fps(&self) -> Option<f32> {
        self.history.average()
    }

    /// The most recently flushed figure.
    pub fn latest_fps(&self) -> Option<f32> {
        self.history.latest()
    }
}

impl Default for FrameMeter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Runs `frames` evenly spaced frames across `span`, the last one
    /// exactly at `start + span`, returning any samples flushed.
    fn run_even_frames(
        meter: &mut FrameMeter,
        start: Instant,
        frames: u32,
        span: Duration,
    ) -> Vec<FpsSample> {
        let step = span / frames;
        let mut flushed: Vec<FpsSample> = (1..frames)
            .filter_map(|i| meter.on_frame_at(start + step * i))
            .collect();
        flushed.extend(meter.on_frame_at(start + span));
        flushed
    }

    #[test]
    fn no_flush_before_the_window_closes() {
        let mut meter = FrameMeter::new();
        let t0 = Instant::now();
        for ms in [0u64, 250, 500, 750, 999] {
            assert_eq!(meter.on_frame_at(t0 + Duration::from_millis(ms)), None);
        }
        assert!(meter.history().is_empty());
        assert_eq!(meter.average_fps(), None);
    }

    #[test]
    fn flushes_sixty_fps_for_sixty_even_frames() {
        let mut meter = FrameMeter::new();
        let t0 = Instant::now();
        // Frame one opens the window at t0; sixty more land every ~16.67ms,
        // the last at t0 + 1s exactly.
        assert_eq!(meter.on_frame_at(t0), None);
        let flushed = run_even_frames(&mut meter, t0, 60, Duration::from_secs(1));
        assert_eq!(flushed.len(), 1);
        let sample = flushed[0];
        assert_eq!(sample.frames, 61);
        assert_relative_eq!(sample.fps, 61.0, epsilon = 1e-3);
        assert_eq!(sample.window, Duration::from_secs(1));
        assert_eq!(meter.latest_fps(), Some(sample.fps));
    }

    #[test]
    fn stalled_windows_report_their_actual_span() {
        let mut meter = FrameMeter::new();
        let t0 = Instant::now();
        meter.on_frame_at(t0);
        for ms in [100u64, 200, 300] {
            meter.on_frame_at(t0 + Duration::from_millis(ms));
        }
        // The loop stalls; the next frame lands at 2s. Five frames over two
        // seconds is 2.5 fps, not five.
        let sample = meter
            .on_frame_at(t0 + Duration::from_secs(2))
            .expect("window closed");
        assert_eq!(sample.frames, 5);
        assert_relative_eq!(sample.fps, 2.5, epsilon = 0.01);
        assert_eq!(sample.window, Duration::from_secs(2));
    }

    #[test]
    fn each_window_counts_its_own_frames() {
        let mut meter = FrameMeter::new();
        let t0 = Instant::now();
        meter.on_frame_at(t0);

        let first = run_even_frames(&mut meter, t0, 30, Duration::from_secs(1));
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].frames, 31);

        let t1 = t0 + Duration::from_secs(1);
        let second = run_even_frames(&mut meter, t1, 10, Duration::from_secs(1));
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].frames, 10);
        assert_relative_eq!(second[0].fps, 10.0, epsilon = 0.1);

        assert_eq!(meter.history().len(), 2);
    }

    #[test]
    fn history_keeps_the_last_ten_windows() {
        let mut meter = FrameMeter::new();
        let t0 = Instant::now();
        meter.on_frame_at(t0);
        for window in 0..12u32 {
            let start = t0 + Duration::from_secs(window as u64);
            // One frame per second: each window flushes ~1 fps.
            meter.on_frame_at(start + Duration::from_secs(1));
        }
        assert_eq!(meter.history().len(), 10);
        assert!(meter.history().is_full());
    }

    #[test]
    fn average_follows_the_history() {
        let mut meter = FrameMeter::with_window(Duration::from_millis(100));
        let t0 = Instant::now();
        meter.on_frame_at(t0);
        // Two windows: 10 frames then 20 frames, each over 100ms.
        run_even_frames(&mut meter, t0, 10, Duration::from_millis(100));
        run_even_frames(
            &mut meter,
            t0 + Duration::from_millis(100),
            20,
            Duration::from_millis(100),
        );
        // Windows flushed at 110 and 200 fps.
        let average = meter.average_fps().expect("two windows flushed");
        assert_relative_eq!(average, 155.0, epsilon = 0.5);
    }
}
