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

//! Bounded rolling histories of sampled values.
//!
//! Fixed-capacity, allocation-free, oldest-out-first. The FPS history the
//! tier selector reads is a [`RingBuffer`] of the last few flushed
//! frame-rate figures; anything older has aged out and no longer influences
//! selection.

/// Samples retained in the rolling FPS history.
pub const FPS_HISTORY_LEN: usize = 10;

/// The rolling history of flushed FPS figures, most recent ten.
pub type FpsHistory = RingBuffer<f32, FPS_HISTORY_LEN>;

/// A fixed-capacity circular buffer that evicts its oldest entry when full.
#[derive(Debug, Clone, Copy)]
pub struct RingBuffer<T, const N: usize> {
    data: [T; N],
    /// Next write position; when full, also the oldest entry.
    index: usize,
    count: usize,
}

impl<T: Copy + Default, const N: usize> RingBuffer<T, N> {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self {
            data: [T::default(); N],
            index: 0,
            count: 0,
        }
    }

    /// Appends a value, evicting the oldest entry once capacity is reached.
    pub fn push(&mut self, value: T) {
        self.data[self.index] = value;
        self.index = (self.index + 1) % N;
        if self.count < N {
            self.count += 1;
        }
    }

    /// Number of values currently held.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether nothing has been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether the next push will evict.
    pub fn is_full(&self) -> bool {
        self.count == N
    }

    /// Maximum number of values held at once.
    pub fn capacity(&self) -> usize {
        N
    }

    /// Forgets all values.
    pub fn clear(&mut self) {
        self.index = 0;
        self.count = 0;
    }

    /// The most recently pushed value.
    pub fn latest(&self) -> Option<T> {
        if self.count == 0 {
            return None;
        }
        Some(self.data[(self.index + N - 1) % N])
    }

    /// Iterates oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (wrapped, linear) = if self.count < N {
            // Not yet wrapped: everything sits in order at the front.
            (&self.data[..0], &self.data[..self.count])
        } else {
            // Wrapped: the write index points at the oldest entry.
            let (newest, oldest) = self.data.split_at(self.index);
            (oldest, newest)
        };
        wrapped.iter().chain(linear.iter())
    }
}

impl<T: Copy + Default, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RingBuffer<f32, N> {
    /// Arithmetic mean of the held values.
    pub fn average(&self) -> Option<f32> {
        if self.count == 0 {
            return None;
        }
        Some(self.iter().sum::<f32>() / self.count as f32)
    }

    /// Smallest held value.
    pub fn min(&self) -> Option<f32> {
        self.iter().copied().reduce(f32::min)
    }

    /// Largest held value.
    pub fn max(&self) -> Option<f32> {
        self.iter().copied().reduce(f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fills_in_order_until_capacity() {
        let mut buffer: RingBuffer<f32, 3> = RingBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 3);

        buffer.push(1.0);
        buffer.push(2.0);
        assert_eq!(buffer.len(), 2);
        assert!(!buffer.is_full());
        let values: Vec<f32> = buffer.iter().copied().collect();
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn evicts_oldest_first_after_wrapping() {
        let mut buffer: RingBuffer<f32, 3> = RingBuffer::new();
        for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
            buffer.push(value);
        }
        assert!(buffer.is_full());
        let values: Vec<f32> = buffer.iter().copied().collect();
        assert_eq!(values, vec![3.0, 4.0, 5.0]);
        assert_eq!(buffer.latest(), Some(5.0));
    }

    #[test]
    fn average_tracks_only_held_values() {
        let mut buffer: RingBuffer<f32, 3> = RingBuffer::new();
        assert_eq!(buffer.average(), None);

        buffer.push(10.0);
        buffer.push(20.0);
        assert_relative_eq!(buffer.average().unwrap(), 15.0);

        buffer.push(30.0);
        buffer.push(40.0); // evicts 10.0
        assert_relative_eq!(buffer.average().unwrap(), 30.0);
    }

    #[test]
    fn min_and_max_span_the_window() {
        let mut buffer: RingBuffer<f32, 4> = RingBuffer::new();
        for value in [22.0, 18.0, 25.0, 21.0] {
            buffer.push(value);
        }
        assert_eq!(buffer.min(), Some(18.0));
        assert_eq!(buffer.max(), Some(25.0));

        buffer.push(30.0); // evicts 22.0
        buffer.push(31.0); // evicts 18.0
        assert_eq!(buffer.min(), Some(21.0));
        assert_eq!(buffer.max(), Some(31.0));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut buffer: RingBuffer<f32, 2> = RingBuffer::new();
        buffer.push(1.0);
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.latest(), None);
        assert_eq!(buffer.average(), None);
    }

    #[test]
    fn fps_history_holds_ten_samples() {
        let mut history = FpsHistory::new();
        for fps in 0..15 {
            history.push(fps as f32);
        }
        assert_eq!(history.len(), FPS_HISTORY_LEN);
        let values: Vec<f32> = history.iter().copied().collect();
        assert_eq!(values.first(), Some(&5.0));
        assert_eq!(values.last(), Some(&14.0));
    }
}
