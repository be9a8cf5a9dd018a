//! Bounded single-producer/single-consumer event hand-off.
//!
//! The network thread pushes, the audio thread drains once per processing
//! cycle. Neither side ever blocks: a full queue drops the incoming event
//! and counts it. Control messages are idempotent or superseded by later
//! ones, so occasional loss is the accepted trade against stalling the
//! audio thread.

use crate::event::Event;
use crossbeam::queue::ArrayQueue;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Create the two halves of a bounded FIFO event queue.
///
/// Capacity is fixed for the queue's lifetime. The producer half belongs
/// to the network-thread handler, the consumer half to the audio thread.
pub fn event_queue(capacity: usize) -> (EventProducer, EventConsumer) {
    let queue = Arc::new(ArrayQueue::new(capacity));
    let dropped = Arc::new(AtomicU64::new(0));
    (
        EventProducer {
            queue: Arc::clone(&queue),
            dropped: Arc::clone(&dropped),
        },
        EventConsumer { queue, dropped },
    )
}

/// Producer half of the event queue.
pub struct EventProducer {
    queue: Arc<ArrayQueue<Event>>,
    dropped: Arc<AtomicU64>,
}

impl EventProducer {
    /// Enqueue an event. Completes in bounded time, never blocks.
    ///
    /// Returns `false` when the queue is full; the event is dropped and
    /// counted.
    pub fn push(&self, event: Event) -> bool {
        match self.queue.push(event) {
            Ok(()) => true,
            Err(event) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("event queue full, dropping {:?}", event);
                false
            }
        }
    }

    /// Number of events dropped to overflow so far.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Consumer half of the event queue.
pub struct EventConsumer {
    queue: Arc<ArrayQueue<Event>>,
    dropped: Arc<AtomicU64>,
}

impl EventConsumer {
    /// Pop the oldest pending event. Lock-free, allocation-free.
    pub fn pop(&self) -> Option<Event> {
        self.queue.pop()
    }

    /// Drain everything accumulated since the last call, in arrival order.
    ///
    /// The iterator pops lazily and allocates nothing; safe to call from
    /// the audio thread every cycle.
    pub fn drain(&self) -> Drain<'_> {
        Drain { queue: &self.queue }
    }

    /// Number of events dropped to overflow so far.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Draining iterator over pending events.
pub struct Drain<'a> {
    queue: &'a ArrayQueue<Event>,
}

impl Iterator for Drain<'_> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        self.queue.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // Only a lower bound of 0 is guaranteed: the producer may push
        // while we drain.
        (0, Some(self.queue.capacity()))
    }
}
