use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::core::event_log::EventLog;
use crate::queue::bounded::BoundedQueue;
use crate::queue::item::Item;
use crate::source::DataSource;

// Pause between draws when the source has nothing to deliver.
const NO_DATA_BACKOFF: Duration = Duration::from_micros(10);

/// Feeds the shared queue from an external byte source.
///
/// Each iteration draws a payload, stamps it with a process-unique
/// correlation id, and `put`s it. Blocking inside `put` while the queue is
/// full is intended backpressure. The loop exits once the queue is closed.
pub struct Producer<S> {
    queue: Arc<BoundedQueue<Item>>,
    source: S,
    sequence: Arc<AtomicU64>,
    events: Arc<EventLog>,
    producer_id: u32,
    max_item_bytes: usize,
}

impl<S: DataSource> Producer<S> {
    pub(crate) fn new(
        queue: Arc<BoundedQueue<Item>>,
        source: S,
        sequence: Arc<AtomicU64>,
        events: Arc<EventLog>,
        producer_id: u32,
        max_item_bytes: usize,
    ) -> Self {
        Self {
            queue,
            source,
            sequence,
            events,
            producer_id,
            max_item_bytes,
        }
    }

    pub fn run(mut self) {
        self.events.log(format!("producer-{} started", self.producer_id));

        loop {
            let Some(payload) = self.source.fetch(self.max_item_bytes) else {
                if self.queue.is_closed() {
                    break;
                }
                thread::sleep(NO_DATA_BACKOFF);
                continue;
            };
            if payload.is_empty() {
                // A zero-length draw is a failed read; it never enters the queue.
                continue;
            }

            let item = Item::new(
                payload,
                self.producer_id as u64,
                self.sequence.fetch_add(1, Ordering::Relaxed),
            );
            if self.queue.put(item).is_err() {
                break;
            }
        }

        self.events.log(format!("producer-{} stopped", self.producer_id));
    }
}
