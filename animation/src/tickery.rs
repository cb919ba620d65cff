use std::{
    mem,
    sync::{
        Arc, Weak,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;

use crate::time::Instant;

/// Distributes frame ticks to everything that wants them.
///
/// Receivers are referenced weakly. They are forgotten when they are dropped or when they answer
/// a tick with [`TickResponse::Stop`]. No lock is held while a receiver is ticked, so receivers
/// may subscribe others or query the tickery from their `tick`.
#[derive(Debug, Default)]
pub struct Tickery {
    receivers: Mutex<Vec<Weak<dyn ReceivesTicks>>>,
    /// Receivers subscribed while a tick was being delivered. They join on the next tick.
    pending: Mutex<Vec<Weak<dyn ReceivesTicks>>>,
    /// The number of receivers taken out of `receivers` by a running tick.
    delivering: AtomicUsize,
    latest_tick: Mutex<Option<Instant>>,
}

impl Tickery {
    pub fn subscribe<R: ReceivesTicks + 'static>(&self, receiver: &Arc<R>) {
        let receiver: Arc<dyn ReceivesTicks> = receiver.clone();
        self.pending.lock().push(Arc::downgrade(&receiver));
    }

    /// Tick at `instant`, delivering the time passed since the previous tick.
    ///
    /// The first tick delivers [`Duration::ZERO`].
    pub fn tick(&self, instant: Instant) {
        let delta = {
            let mut latest = self.latest_tick.lock();
            let delta = latest
                .map(|latest| instant.saturating_duration_since(latest))
                .unwrap_or_default();
            *latest = Some(instant);
            delta
        };
        self.advance(delta);
    }

    /// Tick with an explicit elapsed duration.
    pub fn advance(&self, delta: Duration) {
        let mut receivers = mem::take(&mut *self.receivers.lock());
        receivers.append(&mut self.pending.lock());
        let delivered = receivers.len();
        self.delivering.fetch_add(delivered, Ordering::SeqCst);

        receivers.retain(|registration| match registration.upgrade() {
            Some(receiver) => matches!(receiver.tick(delta), TickResponse::Continue),
            None => false,
        });

        let mut registered = self.receivers.lock();
        self.delivering.fetch_sub(delivered, Ordering::SeqCst);
        receivers.append(&mut registered);
        *registered = receivers;
    }

    pub fn wants_ticks(&self) -> bool {
        self.receiver_count() > 0
    }

    /// The number of registrations, including receivers that were dropped since the last tick.
    pub fn receiver_count(&self) -> usize {
        let registered = self.receivers.lock().len() + self.delivering.load(Ordering::SeqCst);
        registered + self.pending.lock().len()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickResponse {
    Continue,
    Stop,
}

pub trait ReceivesTicks: Send + Sync {
    #[must_use]
    fn tick(&self, delta: Duration) -> TickResponse;
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    #[derive(Debug, Default)]
    struct Clock {
        elapsed_ms: AtomicU64,
        stop_after_ms: Option<u64>,
    }

    impl ReceivesTicks for Clock {
        fn tick(&self, delta: Duration) -> TickResponse {
            let elapsed = self
                .elapsed_ms
                .fetch_add(delta.as_millis() as u64, Ordering::SeqCst)
                + delta.as_millis() as u64;
            match self.stop_after_ms {
                Some(limit) if elapsed >= limit => TickResponse::Stop,
                _ => TickResponse::Continue,
            }
        }
    }

    impl Clock {
        fn elapsed(&self) -> u64 {
            self.elapsed_ms.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn advance_reaches_all_receivers() {
        let tickery = Tickery::default();
        let a = Arc::new(Clock::default());
        let b = Arc::new(Clock::default());
        tickery.subscribe(&a);
        tickery.subscribe(&b);

        tickery.advance(Duration::from_millis(16));
        tickery.advance(Duration::from_millis(16));
        assert_eq!(a.elapsed(), 32);
        assert_eq!(b.elapsed(), 32);
    }

    #[test]
    fn stopping_and_dropped_receivers_are_removed() {
        let tickery = Tickery::default();
        let stopping = Arc::new(Clock {
            stop_after_ms: Some(20),
            ..Default::default()
        });
        let dropped = Arc::new(Clock::default());
        tickery.subscribe(&stopping);
        tickery.subscribe(&dropped);
        drop(dropped);
        assert_eq!(tickery.receiver_count(), 2);

        tickery.advance(Duration::from_millis(10));
        assert_eq!(tickery.receiver_count(), 1);

        tickery.advance(Duration::from_millis(10));
        tickery.advance(Duration::from_millis(10));
        assert_eq!(stopping.elapsed(), 20);
        assert!(!tickery.wants_ticks());
    }

    #[test]
    fn instants_are_turned_into_deltas() {
        let tickery = Tickery::default();
        let clock = Arc::new(Clock::default());
        tickery.subscribe(&clock);

        let start = Instant::now();
        tickery.tick(start);
        assert_eq!(clock.elapsed(), 0);

        tickery.tick(start + Duration::from_millis(40));
        tickery.tick(start + Duration::from_millis(50));
        assert_eq!(clock.elapsed(), 50);
    }

    #[derive(Debug)]
    struct Subscriber {
        tickery: Arc<Tickery>,
        late: Arc<Clock>,
    }

    impl ReceivesTicks for Subscriber {
        fn tick(&self, _delta: Duration) -> TickResponse {
            self.tickery.subscribe(&self.late);
            TickResponse::Stop
        }
    }

    #[test]
    fn subscribing_during_a_tick_joins_the_next_tick() {
        let tickery = Arc::new(Tickery::default());
        let late = Arc::new(Clock::default());
        let subscriber = Arc::new(Subscriber {
            tickery: tickery.clone(),
            late: late.clone(),
        });
        tickery.subscribe(&subscriber);

        tickery.advance(Duration::from_millis(5));
        assert_eq!(late.elapsed(), 0);

        tickery.advance(Duration::from_millis(5));
        assert_eq!(late.elapsed(), 5);
    }

    #[derive(Debug)]
    struct Census {
        tickery: Arc<Tickery>,
        counted: AtomicU64,
    }

    impl ReceivesTicks for Census {
        fn tick(&self, _delta: Duration) -> TickResponse {
            assert!(self.tickery.wants_ticks());
            let count = self.tickery.receiver_count() as u64;
            self.counted.store(count, Ordering::SeqCst);
            TickResponse::Continue
        }
    }

    #[test]
    fn receivers_can_query_the_tickery_while_ticked() {
        let tickery = Arc::new(Tickery::default());
        let census = Arc::new(Census {
            tickery: tickery.clone(),
            counted: AtomicU64::new(0),
        });
        let clock = Arc::new(Clock::default());
        tickery.subscribe(&census);
        tickery.subscribe(&clock);

        tickery.advance(Duration::from_millis(5));
        assert_eq!(census.counted.load(Ordering::SeqCst), 2);
        assert_eq!(tickery.receiver_count(), 2);

        tickery.advance(Duration::from_millis(5));
        assert_eq!(census.counted.load(Ordering::SeqCst), 2);
        assert_eq!(clock.elapsed(), 10);
    }
}
