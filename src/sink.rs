// External processing side of the pipeline.

/// Disposes of a delivered payload.
///
/// Implementations must not retain the buffer beyond the call; the consumer
/// loop drops the item as soon as `consume` returns.
pub trait DataSink {
    fn consume(&self, payload: &[u8]);
}

/// Prints each payload with the handling thread's name.
pub struct PrintSink;

impl DataSink for PrintSink {
    fn consume(&self, payload: &[u8]) {
        let thread = std::thread::current();
        println!(
            "{} - {}",
            thread.name().unwrap_or("consumer"),
            String::from_utf8_lossy(payload)
        );
    }
}

/// Discards payloads. Useful for throughput runs and shutdown tests.
pub struct NullSink;

impl DataSink for NullSink {
    fn consume(&self, _payload: &[u8]) {}
}
