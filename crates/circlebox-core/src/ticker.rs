//! Periodic tick driver
//!
//! [`Ticker`] owns a timer handle while active and nothing while inactive.
//! The timer itself comes from a [`TimerSource`]; [`IntervalTimer`] is the
//! tokio-backed source used by the binary.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Something that can fire on a fixed period until cancelled
pub trait TimerSource {
    type Handle;

    fn schedule(&mut self, period: Duration) -> Self::Handle;
    fn cancel(&mut self, handle: Self::Handle);
}

/// Idempotent start/stop wrapper over a timer source
pub struct Ticker<S: TimerSource> {
    source: S,
    period: Duration,
    /// Present exactly while active
    handle: Option<S::Handle>,
}

impl<S: TimerSource> Ticker<S> {
    pub fn new(source: S, period: Duration) -> Self {
        Self {
            source,
            period,
            handle: None,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn handle(&self) -> Option<&S::Handle> {
        self.handle.as_ref()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Schedule the timer unless it is already running
    ///
    /// Returns true when this call started it.
    pub fn start(&mut self) -> bool {
        if self.handle.is_some() {
            return false;
        }
        self.handle = Some(self.source.schedule(self.period));
        debug!(period_ms = self.period.as_millis() as u64, "Ticker started");
        true
    }

    /// Cancel the timer if it is running
    ///
    /// Returns true when this call stopped it.
    pub fn stop(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                self.source.cancel(handle);
                debug!("Ticker stopped");
                true
            }
            None => false,
        }
    }
}

impl<S: TimerSource> Drop for Ticker<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Tick delivered by [`IntervalTimer`], tagged with the timer that fired it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickEvent {
    pub timer: u64,
}

/// Handle to a running [`IntervalTimer`] task
#[derive(Debug)]
pub struct TimerHandle {
    id: u64,
    task: JoinHandle<()>,
}

impl TimerHandle {
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Timer source backed by a tokio interval task per schedule
///
/// Ticks arrive on the receiver returned by [`IntervalTimer::new`]. A tick
/// already queued when its timer is cancelled still arrives; compare its
/// `timer` id against the live handle to discard it.
///
/// `schedule` must be called from within a tokio runtime.
#[derive(Debug)]
pub struct IntervalTimer {
    tx: mpsc::UnboundedSender<TickEvent>,
    next_id: u64,
}

impl IntervalTimer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TickEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, next_id: 1 }, rx)
    }
}

impl TimerSource for IntervalTimer {
    type Handle = TimerHandle;

    fn schedule(&mut self, period: Duration) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        let tx = self.tx.clone();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // Skip the first tick (fires immediately)
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(TickEvent { timer: id }).is_err() {
                    break;
                }
            }
        });

        TimerHandle { id, task }
    }

    fn cancel(&mut self, handle: TimerHandle) {
        handle.task.abort();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Timer source that only counts calls
    #[derive(Debug, Default)]
    pub(crate) struct ManualTimer {
        pub scheduled: usize,
        pub cancelled: usize,
        pub last_period: Option<Duration>,
    }

    impl TimerSource for ManualTimer {
        type Handle = usize;

        fn schedule(&mut self, period: Duration) -> usize {
            self.scheduled += 1;
            self.last_period = Some(period);
            self.scheduled
        }

        fn cancel(&mut self, _handle: usize) {
            self.cancelled += 1;
        }
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut ticker = Ticker::new(ManualTimer::default(), Duration::from_millis(50));
        assert!(ticker.start());
        assert!(!ticker.start());
        assert!(ticker.is_active());
        assert_eq!(ticker.source().scheduled, 1);
        assert_eq!(ticker.source().last_period, Some(Duration::from_millis(50)));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut ticker = Ticker::new(ManualTimer::default(), Duration::from_millis(50));
        assert!(!ticker.stop());
        ticker.start();
        assert!(ticker.stop());
        assert!(!ticker.stop());
        assert!(!ticker.is_active());
        assert!(ticker.handle().is_none());
        assert_eq!(ticker.source().cancelled, 1);
    }

    #[test]
    fn test_restart_gets_fresh_handle() {
        let mut ticker = Ticker::new(ManualTimer::default(), Duration::from_millis(50));
        ticker.start();
        ticker.stop();
        ticker.start();
        assert_eq!(ticker.handle(), Some(&2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_timer_delivers_tagged_ticks() {
        let (timer, mut rx) = IntervalTimer::new();
        let mut ticker = Ticker::new(timer, Duration::from_millis(50));
        let started = tokio::time::Instant::now();

        assert!(ticker.start());
        let live = ticker.handle().map(TimerHandle::id);

        let first = rx.recv().await.unwrap();
        assert_eq!(Some(first.timer), live);
        assert!(started.elapsed() >= Duration::from_millis(50));

        let second = rx.recv().await.unwrap();
        assert_eq!(second, first);
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_timer_stops_on_cancel() {
        let (timer, mut rx) = IntervalTimer::new();
        let mut ticker = Ticker::new(timer, Duration::from_millis(50));

        ticker.start();
        rx.recv().await.unwrap();
        ticker.stop();

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
    }
}
