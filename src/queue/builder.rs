use std::io;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::core::event_log::EventLog;
use crate::queue::bounded::BoundedQueue;
use crate::queue::consumer::Consumer;
use crate::queue::item::Item;
use crate::queue::producer::Producer;
use crate::sink::DataSink;
use crate::source::DataSource;

pub const DEFAULT_PRODUCER_COUNT: usize = 20;
pub const DEFAULT_CONSUMER_COUNT: usize = 10;
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;
pub const DEFAULT_ITEM_BUFFER_BYTES: usize = 1024;

/// Configures and assembles a [`Pipeline`].
pub struct PipelineBuilder {
    producer_count: usize,
    consumer_count: usize,
    queue_capacity: usize,
    item_buffer_bytes: usize,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            producer_count: DEFAULT_PRODUCER_COUNT,
            consumer_count: DEFAULT_CONSUMER_COUNT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            item_buffer_bytes: DEFAULT_ITEM_BUFFER_BYTES,
        }
    }
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_producers(mut self, count: usize) -> Self {
        self.producer_count = count;
        self
    }

    pub fn with_consumers(mut self, count: usize) -> Self {
        self.consumer_count = count;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_item_buffer_bytes(mut self, bytes: usize) -> Self {
        self.item_buffer_bytes = bytes;
        self
    }

    /// Builds the queue and spawns every worker thread.
    ///
    /// `make_source` is called once per producer with the producer's id, so
    /// each loop owns its source. The sink is shared by all consumers.
    ///
    /// The queue is fully constructed before the first worker starts. If any
    /// spawn fails, the queue is closed and the already-started workers are
    /// joined before the error is returned; a partially-assembled pipeline is
    /// never handed to the caller.
    pub fn build<S, F, K>(
        self,
        mut make_source: F,
        sink: Arc<K>,
        events: Arc<EventLog>,
    ) -> io::Result<Pipeline>
    where
        F: FnMut(u32) -> S,
        S: DataSource + Send + 'static,
        K: DataSink + Send + Sync + 'static,
    {
        if self.producer_count == 0 || self.consumer_count == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "producer and consumer counts must be greater than zero",
            ));
        }
        if self.queue_capacity == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "queue capacity must be greater than zero",
            ));
        }
        if self.item_buffer_bytes == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "item buffer size must be greater than zero",
            ));
        }

        let queue = Arc::new(BoundedQueue::new(self.queue_capacity));
        let sequence = Arc::new(AtomicU64::new(0));
        events.log(format!(
            "queue initialized (capacity {})",
            self.queue_capacity
        ));

        let mut workers = Vec::with_capacity(self.producer_count + self.consumer_count);

        for id in 0..self.producer_count as u32 {
            let producer = Producer::new(
                Arc::clone(&queue),
                make_source(id),
                Arc::clone(&sequence),
                Arc::clone(&events),
                id,
                self.item_buffer_bytes,
            );
            let spawned = thread::Builder::new()
                .name(format!("producer-{id}"))
                .spawn(move || producer.run());
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    abort(&queue, workers);
                    return Err(e);
                }
            }
        }

        for id in 0..self.consumer_count as u32 {
            let consumer = Consumer::new(
                Arc::clone(&queue),
                Arc::clone(&sink),
                Arc::clone(&events),
                id,
            );
            let spawned = thread::Builder::new()
                .name(format!("consumer-{id}"))
                .spawn(move || consumer.run());
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    abort(&queue, workers);
                    return Err(e);
                }
            }
        }

        Ok(Pipeline {
            queue,
            workers,
            events,
        })
    }
}

fn abort(queue: &Arc<BoundedQueue<Item>>, workers: Vec<JoinHandle<()>>) {
    queue.close();
    for handle in workers {
        let _ = handle.join();
    }
}

/// A running set of producer and consumer threads around one shared queue.
pub struct Pipeline {
    queue: Arc<BoundedQueue<Item>>,
    workers: Vec<JoinHandle<()>>,
    events: Arc<EventLog>,
}

impl Pipeline {
    /// Shared handle to the queue, e.g. for a signal handler.
    pub fn queue(&self) -> &Arc<BoundedQueue<Item>> {
        &self.queue
    }

    /// Requests cooperative shutdown: closes the queue, waking every blocked
    /// worker. Buffered items are still drained by consumers.
    pub fn shutdown(&self) {
        self.events.log("shutdown requested");
        self.queue.close();
    }

    /// Waits for every worker to exit. Call [`Pipeline::shutdown`] first;
    /// workers run until the queue is closed.
    pub fn join(self) {
        for handle in self.workers {
            if handle.join().is_err() {
                tracing::error!("worker thread panicked");
            }
        }
        self.events.log("pipeline stopped");
    }
}
