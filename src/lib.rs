//! A bounded, thread-safe work queue decoupling data acquisition from data
//! processing under backpressure.
//!
//! Many producer threads draw payloads from a [`DataSource`] and `put` them
//! into one shared [`BoundedQueue`]; many consumer threads `take` them and
//! hand them to a [`DataSink`]. Producers suspend while the queue is full and
//! consumers suspend while it is empty. The [`Pipeline`] wires the workers
//! together and owns cooperative shutdown.

pub mod core;
pub mod queue;
pub mod sink;
pub mod source;
pub mod trace;

pub use queue::{BoundedQueue, Item, Pipeline, PipelineBuilder, PutError, Take}; // re-export for stable path
pub use sink::{DataSink, NullSink, PrintSink};
pub use source::{DataSource, SimSource};
