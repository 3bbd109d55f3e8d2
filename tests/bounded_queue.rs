use packetflow::{BoundedQueue, PutError, Take};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn fifo_order_is_preserved() {
    let queue = BoundedQueue::new(16);
    for i in 0..16u64 {
        queue.put(i).unwrap();
    }
    for i in 0..16u64 {
        assert_eq!(queue.take(), Take::Item(i));
    }
}

#[test]
fn occupancy_is_capped_at_capacity() {
    let queue = BoundedQueue::new(4);
    for i in 0..4u64 {
        queue.put(i).unwrap();
    }
    assert_eq!(queue.len(), 4);
    assert!(queue.is_full());

    match queue.try_put(99) {
        Err(PutError::Full(item)) => assert_eq!(item, 99),
        other => panic!("expected full error, got {other:?}"),
    }
    assert_eq!(queue.len(), 4);

    // Freeing one slot makes exactly one put possible again.
    assert_eq!(queue.take(), Take::Item(0));
    queue.put(99).unwrap();
    assert!(matches!(queue.try_put(100), Err(PutError::Full(_))));
}

// Capacity 1: Y's put must not complete before X's take begins.
#[test]
fn boundary_capacity_one() {
    let queue = Arc::new(BoundedQueue::new(1));
    queue.put('X').unwrap();

    let second_put_done = Arc::new(AtomicBool::new(false));
    let producer = {
        let queue = Arc::clone(&queue);
        let second_put_done = Arc::clone(&second_put_done);
        thread::spawn(move || {
            queue.put('Y').unwrap();
            second_put_done.store(true, Ordering::SeqCst);
        })
    };

    thread::sleep(Duration::from_millis(20));
    assert!(
        !second_put_done.load(Ordering::SeqCst),
        "put must block while the queue is full"
    );

    assert_eq!(queue.take(), Take::Item('X'));
    producer.join().unwrap();
    assert!(second_put_done.load(Ordering::SeqCst));
    assert_eq!(queue.take(), Take::Item('Y'));
}

#[test]
fn blocked_take_waits_for_put() {
    let queue = Arc::new(BoundedQueue::new(4));

    let took = Arc::new(AtomicBool::new(false));
    let consumer = {
        let queue = Arc::clone(&queue);
        let took = Arc::clone(&took);
        thread::spawn(move || {
            let outcome = queue.take();
            took.store(true, Ordering::SeqCst);
            outcome
        })
    };

    thread::sleep(Duration::from_millis(20));
    assert!(!took.load(Ordering::SeqCst), "take must block while empty");

    queue.put(42u64).unwrap();
    assert_eq!(consumer.join().unwrap(), Take::Item(42));
}

#[test]
fn timeout_variants_expire() {
    let queue = BoundedQueue::new(1);

    assert_eq!(
        queue.take_timeout(Duration::from_millis(10)),
        Take::TimedOut
    );

    queue.put(1u64).unwrap();
    match queue.put_timeout(2, Duration::from_millis(10)) {
        Err(PutError::TimedOut(item)) => assert_eq!(item, 2),
        other => panic!("expected timeout error, got {other:?}"),
    }

    // The slot frees up and the timed put succeeds.
    assert_eq!(queue.take(), Take::Item(1));
    queue.put_timeout(2, Duration::from_millis(10)).unwrap();
    assert_eq!(queue.take(), Take::Item(2));
}

#[test]
fn close_unblocks_blocked_puts() {
    let queue = Arc::new(BoundedQueue::new(1));
    queue.put(0u64).unwrap();

    let mut producers = Vec::new();
    for i in 1..=3u64 {
        let queue = Arc::clone(&queue);
        producers.push(thread::spawn(move || queue.put(i)));
    }

    thread::sleep(Duration::from_millis(20));
    queue.close();

    for handle in producers {
        match handle.join().unwrap() {
            Err(PutError::Closed(item)) => assert!((1..=3).contains(&item)),
            other => panic!("expected closed error, got {other:?}"),
        }
    }
}

#[test]
fn close_unblocks_blocked_takes() {
    let queue = Arc::new(BoundedQueue::<u64>::new(4));

    let mut consumers = Vec::new();
    for _ in 0..2 {
        let queue = Arc::clone(&queue);
        consumers.push(thread::spawn(move || queue.take()));
    }

    thread::sleep(Duration::from_millis(20));
    queue.close();

    for handle in consumers {
        assert_eq!(handle.join().unwrap(), Take::Closed);
    }
}

#[test]
fn close_drains_buffered_items_first() {
    let queue = BoundedQueue::new(8);
    for i in 0..3u64 {
        queue.put(i).unwrap();
    }
    queue.close();

    match queue.put(9) {
        Err(PutError::Closed(item)) => assert_eq!(item, 9),
        other => panic!("expected closed error, got {other:?}"),
    }

    for i in 0..3u64 {
        assert_eq!(queue.take(), Take::Item(i));
    }
    assert_eq!(queue.take(), Take::Closed);
    assert!(queue.try_take().is_none());
}

// 20 producers x 1000 unique ids against 10 consumers and capacity 100.
// Every id must come out exactly once.
#[test]
#[serial_test::serial]
fn mpmc_no_loss_no_duplication() {
    let queue = Arc::new(BoundedQueue::new(100));
    let producers = 20u64;
    let per_producer = 1000u64;
    let total = (producers * per_producer) as usize;

    let mut producer_handles = Vec::new();
    for id in 0..producers {
        let queue = Arc::clone(&queue);
        producer_handles.push(thread::spawn(move || {
            for n in 0..per_producer {
                queue.put((id << 32) | n).unwrap();
            }
        }));
    }

    let mut consumer_handles = Vec::new();
    for _ in 0..10 {
        let queue = Arc::clone(&queue);
        consumer_handles.push(thread::spawn(move || {
            let mut received = Vec::new();
            loop {
                match queue.take() {
                    Take::Item(id) => {
                        assert!(queue.len() <= queue.capacity());
                        received.push(id);
                    }
                    Take::Empty => continue,
                    Take::TimedOut | Take::Closed => break,
                }
            }
            received
        }));
    }

    for handle in producer_handles {
        handle.join().unwrap();
    }
    // Producers are done; closing lets the consumers drain and exit.
    queue.close();

    let mut seen = HashSet::new();
    let mut count = 0usize;
    for handle in consumer_handles {
        for id in handle.join().unwrap() {
            count += 1;
            assert!(seen.insert(id), "duplicate delivery of id {id:#x}");
        }
    }

    assert_eq!(count, total);
    assert_eq!(seen.len(), total);
}

// With a single producer, FIFO order survives concurrent takers: every
// consumer's local sequence of ids must be strictly increasing.
#[test]
#[serial_test::serial]
fn fifo_holds_across_concurrent_takers() {
    let queue = Arc::new(BoundedQueue::new(32));
    let total = 10_000u64;

    let producer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            for n in 0..total {
                queue.put(n).unwrap();
            }
        })
    };

    let mut consumer_handles = Vec::new();
    for _ in 0..4 {
        let queue = Arc::clone(&queue);
        consumer_handles.push(thread::spawn(move || {
            let mut last: Option<u64> = None;
            let mut count = 0usize;
            loop {
                match queue.take() {
                    Take::Item(n) => {
                        if let Some(prev) = last {
                            assert!(n > prev, "takes went backwards: {prev} then {n}");
                        }
                        last = Some(n);
                        count += 1;
                    }
                    Take::Empty => continue,
                    Take::TimedOut | Take::Closed => break,
                }
            }
            count
        }));
    }

    producer.join().unwrap();
    queue.close();

    let count: usize = consumer_handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .sum();
    assert_eq!(count, total as usize);
}
