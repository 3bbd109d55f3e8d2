pub mod event_log;
pub mod sync;

pub use event_log::EventLog; // re-export for stable path
pub use sync::{AcquireError, Semaphore};
