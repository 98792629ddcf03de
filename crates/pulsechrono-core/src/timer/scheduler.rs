//! Tick scheduling.
//!
//! Engines never read the wall clock. They ask a [`TickScheduler`] for a
//! repeating tick and trust only the number of ticks delivered back to them
//! through `tick(handle)`. Two schedulers are provided:
//!
//! - [`ManualScheduler`]: a virtual clock advanced explicitly. Deterministic,
//!   used by tests and by `pulsechrono simulate`.
//! - [`IntervalScheduler`]: backed by `tokio::time::interval` tasks that
//!   report firings over an mpsc channel. Must be used inside a tokio runtime.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Identifies one scheduled repeating tick.
///
/// Handles are never reused by a scheduler, so a tick delivered for a
/// cancelled handle can always be told apart from a live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Clock collaborator consumed by the engines.
pub trait TickScheduler {
    /// Schedule a tick every `interval_ms` milliseconds, first firing one
    /// interval from now.
    fn schedule_repeating(&mut self, interval_ms: u64) -> TickHandle;

    /// Stop a scheduled tick. Cancelling an unknown handle is a no-op.
    fn cancel(&mut self, handle: TickHandle);
}

// ── Manual (virtual) clock ───────────────────────────────────────────

#[derive(Debug, Clone)]
struct PendingTick {
    interval_ms: u64,
    next_due_ms: u64,
}

/// Virtual clock. Time only moves inside [`ManualScheduler::advance`].
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    next_id: u64,
    pending: BTreeMap<TickHandle, PendingTick>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of ticks currently scheduled.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_scheduled(&self, handle: TickHandle) -> bool {
        self.pending.contains_key(&handle)
    }

    /// Move the clock forward by `ms`, firing every due tick in time order.
    ///
    /// Ties fire in handle order. The callback receives the scheduler so it
    /// can cancel or schedule ticks mid-advance; a tick cancelled by an
    /// earlier firing does not fire again.
    pub fn advance<F>(&mut self, ms: u64, mut on_fire: F)
    where
        F: FnMut(TickHandle, &mut Self),
    {
        let target = self.now_ms.saturating_add(ms);
        while let Some(handle) = self.pop_due(target) {
            on_fire(handle, self);
        }
        self.now_ms = target;
    }

    fn pop_due(&mut self, target: u64) -> Option<TickHandle> {
        let (&handle, tick) = self
            .pending
            .iter_mut()
            .filter(|(_, t)| t.next_due_ms <= target)
            .min_by_key(|(h, t)| (t.next_due_ms, **h))?;
        self.now_ms = tick.next_due_ms;
        tick.next_due_ms = tick.next_due_ms.saturating_add(tick.interval_ms);
        Some(handle)
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule_repeating(&mut self, interval_ms: u64) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        let interval_ms = interval_ms.max(1);
        self.pending.insert(
            handle,
            PendingTick {
                interval_ms,
                next_due_ms: self.now_ms.saturating_add(interval_ms),
            },
        );
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.pending.remove(&handle);
    }
}

// ── tokio-backed clock ───────────────────────────────────────────────

/// Real-time scheduler built on `tokio::time::interval`.
///
/// Each scheduled tick runs as its own task and sends its handle on the
/// channel returned by [`IntervalScheduler::new`]. Cancelling aborts the
/// task; a firing already queued in the channel is rejected by the engine's
/// handle check.
#[derive(Debug)]
pub struct IntervalScheduler {
    next_id: u64,
    tasks: HashMap<TickHandle, JoinHandle<()>>,
    tx: mpsc::UnboundedSender<TickHandle>,
}

impl IntervalScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TickHandle>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            next_id: 0,
            tasks: HashMap::new(),
            tx,
        };
        (scheduler, rx)
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }
}

impl TickScheduler for IntervalScheduler {
    fn schedule_repeating(&mut self, interval_ms: u64) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        let period = Duration::from_millis(interval_ms.max(1));
        let tx = self.tx.clone();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(handle).is_err() {
                    break;
                }
            }
        });

        tracing::trace!(handle = handle.id(), interval_ms, "tick scheduled");
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
            tracing::trace!(handle = handle.id(), "tick cancelled");
        }
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_fires_in_time_order() {
        let mut clock = ManualScheduler::new();
        let fast = clock.schedule_repeating(10);
        let slow = clock.schedule_repeating(25);

        let mut fired = Vec::new();
        clock.advance(50, |h, c| fired.push((c.now_ms(), h)));

        assert_eq!(
            fired,
            vec![
                (10, fast),
                (20, fast),
                (25, slow),
                (30, fast),
                (40, fast),
                (50, fast),
                (50, slow),
            ]
        );
        assert_eq!(clock.now_ms(), 50);
    }

    #[test]
    fn cancel_inside_callback_stops_further_firings() {
        let mut clock = ManualScheduler::new();
        let handle = clock.schedule_repeating(10);

        let mut count = 0;
        clock.advance(100, |h, c| {
            count += 1;
            if count == 3 {
                c.cancel(h);
            }
        });

        assert_eq!(count, 3);
        assert_eq!(clock.pending(), 0);
        assert!(!clock.is_scheduled(handle));
    }

    #[test]
    fn handles_are_never_reused() {
        let mut clock = ManualScheduler::new();
        let a = clock.schedule_repeating(10);
        clock.cancel(a);
        let b = clock.schedule_repeating(10);
        assert_ne!(a, b);
        assert!(!clock.is_scheduled(a));
        assert!(clock.is_scheduled(b));
    }

    #[test]
    fn zero_interval_is_clamped() {
        let mut clock = ManualScheduler::new();
        clock.schedule_repeating(0);
        let mut count = 0;
        clock.advance(5, |_, _| count += 1);
        assert_eq!(count, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_scheduler_delivers_and_cancels() {
        let (mut scheduler, mut rx) = IntervalScheduler::new();
        let handle = scheduler.schedule_repeating(10);

        for _ in 0..3 {
            assert_eq!(rx.recv().await, Some(handle));
        }

        scheduler.cancel(handle);
        assert_eq!(scheduler.pending(), 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());
    }
}
