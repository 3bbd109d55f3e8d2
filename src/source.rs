// External acquisition side of the pipeline.

use sha2::{Digest, Sha256};

/// Supplies raw bytes to a producer loop.
///
/// `None` means "no data available right now"; the producer retries without
/// enqueuing anything.
pub trait DataSource {
    fn fetch(&mut self, max_bytes: usize) -> Option<Vec<u8>>;
}

/// Simulated acquisition feed.
///
/// Each draw hashes an incrementing counter and serves a random-length slice
/// of the hex digest, up to `max_bytes`. A zero-length draw is reported as
/// `None`, modeling an upstream with intermittently nothing to deliver.
pub struct SimSource {
    rng: fastrand::Rng,
    counter: u64,
}

impl SimSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            counter: 0,
        }
    }
}

impl DataSource for SimSource {
    fn fetch(&mut self, max_bytes: usize) -> Option<Vec<u8>> {
        let len = self.rng.usize(..max_bytes.max(1));
        if len == 0 {
            return None;
        }

        let mut hasher = Sha256::new();
        hasher.update(self.counter.to_le_bytes());
        self.counter = self.counter.wrapping_add(1);
        let hex = format!("{:x}", hasher.finalize());

        let mut payload = Vec::with_capacity(len);
        while payload.len() < len {
            let chunk = (len - payload.len()).min(hex.len());
            payload.extend_from_slice(&hex.as_bytes()[..chunk]);
        }
        Some(payload)
    }
}
