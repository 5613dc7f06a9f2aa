use std::fmt;

use fable_core::NodeId;

/// Identifier of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// What happens when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Only signal completion.
    Notify,
    /// Remove this node (an overlay panel), then signal completion.
    RemoveNode(NodeId),
}

/// A pending timer.
#[derive(Debug, Clone)]
pub struct Timer {
    /// Identifier handed back to the scheduler.
    pub id: TimerId,
    /// Virtual time at which it fires.
    pub due_ms: u64,
    /// Scene generation it was scheduled under.
    pub generation: u64,
    /// Effect on firing.
    pub action: TimerAction,
}

/// Timers ordered by due time, ties broken by scheduling order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    timers: Vec<Timer>,
    next_id: u64,
}

impl TimerQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a timer and return its ID.
    pub fn schedule(&mut self, due_ms: u64, generation: u64, action: TimerAction) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let at = self
            .timers
            .partition_point(|t| (t.due_ms, t.id) <= (due_ms, id));
        self.timers.insert(
            at,
            Timer {
                id,
                due_ms,
                generation,
                action,
            },
        );
        id
    }

    /// Remove and return every timer due at or before `now_ms`, in firing order.
    pub fn pop_due(&mut self, now_ms: u64) -> Vec<Timer> {
        let split = self.timers.partition_point(|t| t.due_ms <= now_ms);
        self.timers.drain(..split).collect()
    }

    /// Number of timers still waiting.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Whether a timer is still waiting.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }
}
