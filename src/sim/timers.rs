//! Real-time deferred actions
//!
//! Deadlines are measured on the wall clock the host feeds into `tick`, which
//! keeps running while the simulation is paused. Each task carries a token so
//! its target can tell a stale firing from a current one.

use serde::{Deserialize, Serialize};

use super::body::EntityId;

/// Deferred state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimedAction {
    /// Drop the machine gun barrage fire-rate override
    EndBarrage { player: EntityId },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// Wall-clock deadline (seconds)
    pub due: f64,
    pub token: u64,
    pub action: TimedAction,
}

/// Pending deferred tasks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timers {
    tasks: Vec<ScheduledTask>,
    next_token: u64,
}

impl Timers {
    /// Schedule `action` at `due`; returns the task token
    pub fn schedule(&mut self, due: f64, action: TimedAction) -> u64 {
        self.next_token += 1;
        let token = self.next_token;
        self.tasks.push(ScheduledTask { due, token, action });
        token
    }

    /// Drop a pending task. Returns whether it was still pending.
    pub fn cancel(&mut self, token: u64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.token != token);
        self.tasks.len() != before
    }

    /// Remove and return every task due at `now`, earliest first
    pub fn take_due(&mut self, now: f64) -> Vec<ScheduledTask> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|t| t.due <= now);
        self.tasks = pending;
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.token.cmp(&b.token)));
        due
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_only_when_due() {
        let mut timers = Timers::default();
        let token = timers.schedule(3.0, TimedAction::EndBarrage { player: 1 });
        assert!(timers.take_due(2.99).is_empty());
        let fired = timers.take_due(3.0);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].token, token);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_due_tasks_come_out_in_order() {
        let mut timers = Timers::default();
        let late = timers.schedule(5.0, TimedAction::EndBarrage { player: 1 });
        let early = timers.schedule(1.0, TimedAction::EndBarrage { player: 1 });
        let fired: Vec<u64> = timers.take_due(10.0).iter().map(|t| t.token).collect();
        assert_eq!(fired, vec![early, late]);
    }

    #[test]
    fn test_cancel() {
        let mut timers = Timers::default();
        let token = timers.schedule(1.0, TimedAction::EndBarrage { player: 1 });
        assert!(timers.cancel(token));
        assert!(!timers.cancel(token));
        assert!(timers.take_due(2.0).is_empty());
    }
}
