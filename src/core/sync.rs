// Counting semaphore used by the bounded queue to track slot availability.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Why an `acquire` call returned without a permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireError {
    /// The semaphore was closed and no permits remain.
    Closed,
    /// The wait expired before a permit became available.
    TimedOut,
}

struct State {
    permits: usize,
    closed: bool,
}

/// A closable counting semaphore.
///
/// Tracks a non-negative count of available permits. `acquire` blocks while
/// the count is zero; `release` adds a permit and wakes one waiter.
///
/// Closing wakes every waiter. Permits that were already released are still
/// granted after close, so a consumer-side semaphore drains naturally; only
/// once the count reaches zero does `acquire` report [`AcquireError::Closed`].
pub struct Semaphore {
    state: Mutex<State>,
    available: Condvar,
}

impl Semaphore {
    pub fn new(permits: usize) -> Self {
        Self {
            state: Mutex::new(State {
                permits,
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Takes one permit, blocking until one is available.
    pub fn acquire(&self) -> Result<(), AcquireError> {
        let mut state = self.state.lock();
        loop {
            if state.permits > 0 {
                state.permits -= 1;
                return Ok(());
            }
            if state.closed {
                return Err(AcquireError::Closed);
            }
            self.available.wait(&mut state);
        }
    }

    /// Takes one permit if one is immediately available.
    pub fn try_acquire(&self) -> bool {
        let mut state = self.state.lock();
        if state.permits > 0 {
            state.permits -= 1;
            true
        } else {
            false
        }
    }

    /// Takes one permit, waiting at most `timeout`.
    pub fn acquire_timeout(&self, timeout: Duration) -> Result<(), AcquireError> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            // A timeout too large to represent is an unbounded wait.
            return self.acquire();
        };

        let mut state = self.state.lock();
        loop {
            if state.permits > 0 {
                state.permits -= 1;
                return Ok(());
            }
            if state.closed {
                return Err(AcquireError::Closed);
            }
            if self.available.wait_until(&mut state, deadline).timed_out() {
                // One final look; the permit may have arrived with the wakeup.
                if state.permits > 0 {
                    state.permits -= 1;
                    return Ok(());
                }
                if state.closed {
                    return Err(AcquireError::Closed);
                }
                return Err(AcquireError::TimedOut);
            }
        }
    }

    /// Returns one permit and wakes a waiter.
    pub fn release(&self) {
        let mut state = self.state.lock();
        state.permits += 1;
        drop(state);
        self.available.notify_one();
    }

    /// Closes the semaphore and wakes every waiter. Idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        drop(state);
        self.available.notify_all();
    }

    /// Current permit count.
    pub fn permits(&self) -> usize {
        self.state.lock().permits
    }
}
