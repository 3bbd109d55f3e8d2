/// Unit of work flowing from producers to consumers.
///
/// Ownership moves with the item: a producer builds it, the queue holds it,
/// and exactly one consumer receives it and drops the payload after use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    /// Raw bytes drawn from the external source.
    pub payload: Vec<u8>,
    /// Identifier of the producing loop.
    pub event_id: u64,
    /// Process-unique sequence number stamped at creation.
    pub correlation_id: u64,
}

impl Item {
    pub fn new(payload: Vec<u8>, event_id: u64, correlation_id: u64) -> Self {
        Self {
            payload,
            event_id,
            correlation_id,
        }
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// A zero-length payload is a failed draw and must never be enqueued.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}
