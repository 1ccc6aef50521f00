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

use log;

/// A generic, thread-safe event channel with one consuming end.
///
/// The bus owns both halves of an unbounded channel. Producers take cheap
/// sender clones; the owner drains the single receiver. Publishing never
/// blocks and never panics: a disconnected receiver is logged and the event
/// dropped, because notification is an amenity of this pipeline, not a
/// load-bearing path.
#[derive(Debug)]
pub struct EventBus<T: Clone + Send + Sync + 'static> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> EventBus<T> {
    /// Creates a bus with an unbounded channel for one event type.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }

    /// Sends an event, logging instead of failing when nobody listens.
    pub fn publish(&self, event: T) {
        if let Err(error) = self.sender.send(event) {
            log::error!("event dropped, receiver disconnected: {error}");
        }
    }

    /// A sender clone for producers elsewhere in the system.
    pub fn sender(&self) -> flume::Sender<T> {
        self.sender.clone()
    }

    /// The consuming end. Intended for the owner; poll with `try_iter` to
    /// drain without blocking.
    pub fn receiver(&self) -> &flume::Receiver<T> {
        &self.receiver
    }
}

impl<T: Clone + Send + Sync + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}
