// Bounded FIFO connecting producer and consumer threads.
//
// Synchronization layout: one semaphore counts free slots (starts at
// capacity), one counts occupied slots (starts at zero), and a mutex guards
// the deque itself. `put` and `take` both acquire their counting signal
// first, then the mutex, and release the mutex before signaling the
// counterpart. The mutex is held only across the structural mutation.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use crossbeam_utils::CachePadded;
use parking_lot::Mutex;

use crate::core::sync::{AcquireError, Semaphore};

/// Outcome of a `take` call.
#[derive(Debug, PartialEq, Eq)]
pub enum Take<T> {
    /// The then-current head item, owned by the caller.
    Item(T),
    /// Woken with an occupancy permit but nothing was buffered. A
    /// lost-wakeup defense; reported as an anomaly, never a fabricated item.
    Empty,
    /// The wait expired before an item arrived.
    TimedOut,
    /// The queue was closed and fully drained.
    Closed,
}

impl<T> Take<T> {
    /// Returns the item, if one was taken.
    pub fn into_item(self) -> Option<T> {
        match self {
            Take::Item(item) => Some(item),
            _ => None,
        }
    }
}

/// Why a `put` call did not enqueue; the item is handed back to the caller.
#[derive(Debug, PartialEq, Eq)]
pub enum PutError<T> {
    /// The queue was at capacity (non-blocking variant only).
    Full(T),
    /// The wait expired before a slot freed up.
    TimedOut(T),
    /// The queue has been closed.
    Closed(T),
}

impl<T> PutError<T> {
    /// Returns the item that was not enqueued.
    #[must_use]
    pub fn into_inner(self) -> T {
        match self {
            PutError::Full(item) | PutError::TimedOut(item) | PutError::Closed(item) => item,
        }
    }
}

impl<T> fmt::Display for PutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PutError::Full(_) => f.write_str("queue is full"),
            PutError::TimedOut(_) => f.write_str("timed out waiting for queue capacity"),
            PutError::Closed(_) => f.write_str("queue is closed"),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for PutError<T> {}

struct Inner<T> {
    buf: VecDeque<T>,
    closed: bool,
}

/// Fixed-capacity, thread-safe FIFO with blocking `put` and `take`.
///
/// Producers suspend while the queue is full and consumers suspend while it
/// is empty; that backpressure is the intended behavior, not a fault. Items
/// are delivered in exact append order, each to exactly one taker.
///
/// `close` is the cooperative cancellation point: it wakes every blocked
/// waiter, fails new `put`s fast, and lets `take` drain what was already
/// buffered before reporting [`Take::Closed`].
pub struct BoundedQueue<T> {
    // Padded so producer-side and consumer-side waiting do not false-share.
    slots: CachePadded<Semaphore>,
    items: CachePadded<Semaphore>,
    inner: Mutex<Inner<T>>,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Creates a queue holding at most `capacity` items.
    ///
    /// The backing storage is allocated up front; the enqueue path never
    /// allocates.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "BoundedQueue capacity must be greater than zero");
        Self {
            slots: CachePadded::new(Semaphore::new(capacity)),
            items: CachePadded::new(Semaphore::new(0)),
            inner: Mutex::new(Inner {
                buf: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            capacity,
        }
    }

    /// Appends `item` at the tail, blocking while the queue is full.
    pub fn put(&self, item: T) -> Result<(), PutError<T>> {
        match self.slots.acquire() {
            Ok(()) => self.commit_put(item),
            Err(_) => Err(PutError::Closed(item)),
        }
    }

    /// Appends `item` at the tail, waiting at most `timeout` for a free slot.
    pub fn put_timeout(&self, item: T, timeout: Duration) -> Result<(), PutError<T>> {
        match self.slots.acquire_timeout(timeout) {
            Ok(()) => self.commit_put(item),
            Err(AcquireError::Closed) => Err(PutError::Closed(item)),
            Err(AcquireError::TimedOut) => Err(PutError::TimedOut(item)),
        }
    }

    /// Appends `item` without blocking.
    pub fn try_put(&self, item: T) -> Result<(), PutError<T>> {
        if self.slots.try_acquire() {
            self.commit_put(item)
        } else if self.is_closed() {
            Err(PutError::Closed(item))
        } else {
            Err(PutError::Full(item))
        }
    }

    // Holds a free-slot permit on entry. Mutates under the lock, then
    // signals occupancy with the lock released.
    fn commit_put(&self, item: T) -> Result<(), PutError<T>> {
        let mut inner = self.inner.lock();
        if inner.closed {
            drop(inner);
            self.slots.release();
            return Err(PutError::Closed(item));
        }
        debug_assert!(inner.buf.len() < self.capacity);
        inner.buf.push_back(item);
        drop(inner);
        self.items.release();
        Ok(())
    }

    /// Removes the head item, blocking while the queue is empty.
    pub fn take(&self) -> Take<T> {
        match self.items.acquire() {
            Ok(()) => self.commit_take(),
            Err(_) => Take::Closed,
        }
    }

    /// Removes the head item, waiting at most `timeout` for one to arrive.
    pub fn take_timeout(&self, timeout: Duration) -> Take<T> {
        match self.items.acquire_timeout(timeout) {
            Ok(()) => self.commit_take(),
            Err(AcquireError::Closed) => Take::Closed,
            Err(AcquireError::TimedOut) => Take::TimedOut,
        }
    }

    /// Removes the head item without blocking.
    pub fn try_take(&self) -> Option<T> {
        if self.items.try_acquire() {
            self.commit_take().into_item()
        } else {
            None
        }
    }

    // Holds an occupancy permit on entry.
    fn commit_take(&self) -> Take<T> {
        let mut inner = self.inner.lock();
        match inner.buf.pop_front() {
            Some(item) => {
                drop(inner);
                self.slots.release();
                Take::Item(item)
            }
            None => {
                drop(inner);
                // An occupancy permit with nothing buffered means a signal
                // was raised without a matching append. Surface it instead
                // of blocking forever or inventing a payload.
                tracing::warn!("occupancy signal on empty queue");
                Take::Empty
            }
        }
    }

    /// Closes the queue and wakes every blocked `put` and `take`. Idempotent.
    ///
    /// Items already buffered remain takeable; once they drain, `take`
    /// reports [`Take::Closed`].
    pub fn close(&self) {
        {
            let mut inner = self.inner.lock();
            if inner.closed {
                return;
            }
            inner.closed = true;
        }
        self.slots.close();
        self.items.close();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    /// Current occupancy.
    pub fn len(&self) -> usize {
        self.inner.lock().buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        let inner = self.inner.lock();
        inner.buf.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
