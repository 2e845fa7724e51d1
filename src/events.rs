//! Events flowing from the interrupt side into the control loop.
//!
//! The queue is single producer, single consumer: the producer half belongs to
//! whatever reacts to hardware (timer, converter), the consumer half to the
//! control loop. Overflow is never silent, the producer counts every event it
//! had to drop and the loop reports the count.
use heapless::spsc::{Consumer, Producer, Queue};
use portable_atomic::{AtomicU32, Ordering};

use crate::input::Button;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// One pass of the control loop with nothing else pending
    Idle,
    /// The analog converter finished the requested channel
    ConversionComplete,
    /// Periodic tick gating the current sensor polling
    TimerTick,
    ButtonPressed(Button),
    ButtonReleased(Button),
}

/// Backing storage for the event queue. Holds `N - 1` events.
pub struct EventQueue<const N: usize> {
    queue: Queue<Event, N>,
    dropped: AtomicU32,
}

impl<const N: usize> EventQueue<N> {
    pub const fn new() -> Self {
        Self {
            queue: Queue::new(),
            dropped: AtomicU32::new(0),
        }
    }

    pub fn split(&mut self) -> (EventProducer<'_, N>, EventConsumer<'_, N>) {
        let dropped = &self.dropped;
        let (producer, consumer) = self.queue.split();
        (
            EventProducer {
                inner: producer,
                dropped,
            },
            EventConsumer {
                inner: consumer,
                dropped,
            },
        )
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EventProducer<'a, const N: usize> {
    inner: Producer<'a, Event, N>,
    dropped: &'a AtomicU32,
}

impl<const N: usize> EventProducer<'_, N> {
    /// Enqueues an event. Returns `false` and counts the loss if the queue is full.
    pub fn push(&mut self, event: Event) -> bool {
        match self.inner.enqueue(event) {
            Ok(()) => true,
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }
}

pub struct EventConsumer<'a, const N: usize> {
    inner: Consumer<'a, Event, N>,
    dropped: &'a AtomicU32,
}

impl<const N: usize> EventConsumer<'_, N> {
    pub fn dequeue(&mut self) -> Option<Event> {
        self.inner.dequeue()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }

    /// Returns the number of events lost since the last call and resets it.
    pub fn take_dropped(&self) -> u32 {
        self.dropped.swap(0, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_are_fifo() {
        let mut queue = EventQueue::<4>::new();
        let (mut producer, mut consumer) = queue.split();
        assert!(producer.push(Event::TimerTick));
        assert!(producer.push(Event::ButtonPressed(Button::Up)));
        assert_eq!(consumer.len(), 2);
        assert_eq!(consumer.dequeue(), Some(Event::TimerTick));
        assert_eq!(consumer.dequeue(), Some(Event::ButtonPressed(Button::Up)));
        assert_eq!(consumer.dequeue(), None);
        assert!(consumer.is_empty());
    }

    #[test]
    fn test_overflow_is_counted() {
        let mut queue = EventQueue::<4>::new();
        let (mut producer, mut consumer) = queue.split();
        for _ in 0..3 {
            assert!(producer.push(Event::ConversionComplete));
        }
        assert!(!producer.push(Event::TimerTick));
        assert!(!producer.push(Event::TimerTick));

        assert_eq!(consumer.take_dropped(), 2);
        assert_eq!(consumer.take_dropped(), 0);
        while consumer.dequeue().is_some() {}
        assert!(producer.push(Event::TimerTick));
    }
}
