use std::sync::Arc;

use crate::core::event_log::EventLog;
use crate::queue::bounded::{BoundedQueue, Take};
use crate::queue::item::Item;
use crate::sink::DataSink;

/// Drains the shared queue and dispatches payloads to an external sink.
///
/// The item is dropped as soon as the sink returns; after `take`, no other
/// thread holds a reference to it. The loop exits once the queue is closed
/// and drained.
pub struct Consumer<K> {
    queue: Arc<BoundedQueue<Item>>,
    sink: Arc<K>,
    events: Arc<EventLog>,
    consumer_id: u32,
}

impl<K: DataSink> Consumer<K> {
    pub(crate) fn new(
        queue: Arc<BoundedQueue<Item>>,
        sink: Arc<K>,
        events: Arc<EventLog>,
        consumer_id: u32,
    ) -> Self {
        Self {
            queue,
            sink,
            events,
            consumer_id,
        }
    }

    pub fn run(self) {
        self.events.log(format!("consumer-{} started", self.consumer_id));

        loop {
            match self.queue.take() {
                Take::Item(item) => self.sink.consume(&item.payload),
                Take::Empty => {
                    // Lost-wakeup anomaly surfaced by the queue; skip it.
                    self.events
                        .log(format!("consumer-{}: woken on empty queue", self.consumer_id));
                }
                Take::TimedOut | Take::Closed => break,
            }
        }

        self.events.log(format!("consumer-{} stopped", self.consumer_id));
    }
}
