//! Delayed events.
//!
//! Every timed phase of a lift ends with a [TimerEvent] being delivered back to the owner of the
//! lift set. The core only needs the [Scheduler] capability. Two implementations live here:
//! [TimerQueue], a virtual clock used by the simulation and the tests, and [TokioScheduler], which
//! sleeps for real inside the tokio runtime.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::world_view::{Floor, LiftId};


/// What happens to a lift when its timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiftEvent {
    /// A direct move reached `floor`.
    Arrived {
        /// Destination of the move
        floor: Floor,
    },
    /// A single queue-policy step reached `floor`.
    Stepped {
        /// Floor reached by the step
        floor: Floor,
    },
    /// The doors have been open long enough and start closing.
    CloseDoors,
    /// The doors are shut, the door cycle is over.
    DoorsClosed,
}

/// A [LiftEvent] addressed to one lift of one building generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEvent {
    /// Building generation the timer was scheduled in
    pub generation: u64,
    /// Lift the event belongs to
    pub lift_id: LiftId,
    /// The event itself
    pub kind: LiftEvent,
}

/// Delayed-callback capability the dispatch core depends on.
pub trait Scheduler {
    /// Delivers `event` back to the dispatcher once `delay` has passed.
    fn schedule_after(&mut self, delay: Duration, event: TimerEvent);
}


#[derive(Debug)]
struct Pending {
    due: Duration,
    seq: u64,
    event: TimerEvent,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// Virtual clock with a queue of pending events.
///
/// Events fire in due order; events due at the same instant fire in the order they were scheduled.
/// Time only moves when an event is popped or [TimerQueue::advance_to] is called.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    seq: u64,
    heap: BinaryHeap<Reverse<Pending>>,
}

impl TimerQueue {
    /// Creates an empty queue at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// `true` when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// When the next event is due, if any.
    pub fn next_due(&self) -> Option<Duration> {
        self.heap.peek().map(|Reverse(p)| p.due)
    }

    /// Pops the next event and moves the clock to its due time.
    pub fn pop_next(&mut self) -> Option<TimerEvent> {
        let Reverse(pending) = self.heap.pop()?;
        self.now = self.now.max(pending.due);
        Some(pending.event)
    }

    /// Pops the next event only if it is due at or before `deadline`.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<TimerEvent> {
        match self.next_due() {
            Some(due) if due <= deadline => self.pop_next(),
            _ => None,
        }
    }

    /// Moves the clock forward without firing anything. Never moves it backwards.
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }

    /// Drops every pending event.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

impl Scheduler for TimerQueue {
    fn schedule_after(&mut self, delay: Duration, event: TimerEvent) {
        let pending = Pending { due: self.now + delay, seq: self.seq, event };
        self.seq += 1;
        self.heap.push(Reverse(pending));
    }
}


/// Scheduler sleeping on the tokio runtime.
///
/// Each timer is its own task which sends the event on `tx` after the delay. A lift never has more
/// than one timer outstanding, so per-lift order holds even though tasks are independent.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TokioScheduler {
    /// Creates the scheduler and the receiver the events arrive on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_after(&mut self, delay: Duration, event: TimerEvent) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            sleep(delay).await;
            // Receiver gone means the building task has ended
            let _ = tx.send(event);
        });
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn ev(lift_id: LiftId, kind: LiftEvent) -> TimerEvent {
        TimerEvent { generation: 0, lift_id, kind }
    }

    #[test]
    fn test_events_fire_in_due_order() {
        let mut q = TimerQueue::new();
        q.schedule_after(Duration::from_millis(300), ev(0, LiftEvent::DoorsClosed));
        q.schedule_after(Duration::from_millis(100), ev(1, LiftEvent::CloseDoors));

        assert_eq!(q.pop_next(), Some(ev(1, LiftEvent::CloseDoors)));
        assert_eq!(q.now(), Duration::from_millis(100));
        assert_eq!(q.pop_next(), Some(ev(0, LiftEvent::DoorsClosed)));
        assert_eq!(q.now(), Duration::from_millis(300));
        assert!(q.pop_next().is_none());
    }

    #[test]
    fn test_same_instant_keeps_schedule_order() {
        let mut q = TimerQueue::new();
        q.schedule_after(Duration::from_millis(50), ev(2, LiftEvent::Arrived { floor: 1 }));
        q.schedule_after(Duration::from_millis(50), ev(0, LiftEvent::Arrived { floor: 2 }));
        q.schedule_after(Duration::from_millis(50), ev(1, LiftEvent::Arrived { floor: 3 }));

        let order: Vec<LiftId> = std::iter::from_fn(|| q.pop_next()).map(|e| e.lift_id).collect();
        assert_eq!(order, vec![2, 0, 1]);
    }

    #[test]
    fn test_pop_due_respects_deadline() {
        let mut q = TimerQueue::new();
        q.schedule_after(Duration::from_secs(3), ev(0, LiftEvent::CloseDoors));

        assert!(q.pop_due(Duration::from_secs(2)).is_none());
        assert_eq!(q.now(), Duration::ZERO);
        assert!(q.pop_due(Duration::from_secs(3)).is_some());
    }

    #[test]
    fn test_delay_is_relative_to_current_time() {
        let mut q = TimerQueue::new();
        q.advance_to(Duration::from_secs(10));
        q.schedule_after(Duration::from_secs(2), ev(0, LiftEvent::DoorsClosed));
        assert_eq!(q.next_due(), Some(Duration::from_secs(12)));

        q.advance_to(Duration::from_secs(5));
        assert_eq!(q.now(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_delivers_after_delay() {
        let (mut sched, mut rx) = TokioScheduler::channel();
        let start = tokio::time::Instant::now();
        sched.schedule_after(Duration::from_millis(2500), ev(0, LiftEvent::CloseDoors));

        let got = rx.recv().await.unwrap();
        assert_eq!(got.kind, LiftEvent::CloseDoors);
        assert!(start.elapsed() >= Duration::from_millis(2500));
    }
}
