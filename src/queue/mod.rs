mod bounded;
mod builder;
mod consumer;
mod item;
mod producer;

pub use bounded::{BoundedQueue, PutError, Take};
pub use builder::{
    Pipeline, PipelineBuilder, DEFAULT_CONSUMER_COUNT, DEFAULT_ITEM_BUFFER_BYTES,
    DEFAULT_PRODUCER_COUNT, DEFAULT_QUEUE_CAPACITY,
};
pub use consumer::Consumer;
pub use item::Item;
pub use producer::Producer;
