//! A single-threaded timer queue.
//!
//! Delayed actions (an AI "thinking" pause, revealing the result of a round) are queued with a
//! delay and a `CancellationToken`. The owner feeds elapsed time in with `advance_clock` and
//! drains due actions with `pop_due`. A task whose token was cancelled is dropped instead of
//! being returned, so a queued action can never reach state that has since been reset.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Shared flag marking a group of scheduled tasks as void.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Identifies one scheduled task.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct TaskId(u64);

#[derive(Debug)]
struct ScheduledTask<A> {
    id: TaskId,
    due: Duration,
    token: CancellationToken,
    action: A,
}

/// Queue of actions waiting for their delay to pass.
#[derive(Debug)]
pub struct Scheduler<A> {
    now: Duration,
    next_id: u64,
    tasks: Vec<ScheduledTask<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            tasks: Vec::new(),
        }
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the scheduler was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queues `action` to become due after `delay`. Cancelling `token` voids it.
    pub fn schedule(&mut self, delay: Duration, token: &CancellationToken, action: A) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            id,
            due: self.now + delay,
            token: token.clone(),
            action,
        });
        id
    }

    /// Removes a single task. Returns `false` if it already ran or was never scheduled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    /// Drops every pending task.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Number of tasks that are queued and not cancelled.
    pub fn pending(&self) -> usize {
        self.tasks
            .iter()
            .filter(|task| !task.token.is_cancelled())
            .count()
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    /// Moves the clock forward.
    pub fn advance_clock(&mut self, elapsed: Duration) {
        self.now += elapsed;
    }

    /// Removes and returns the earliest due action, skipping cancelled tasks.
    ///
    /// Tasks due at the same instant come out in the order they were scheduled.
    pub fn pop_due(&mut self) -> Option<A> {
        self.tasks.retain(|task| !task.token.is_cancelled());

        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due <= self.now)
            .min_by_key(|(_, task)| (task.due, task.id.0))
            .map(|(index, _)| index)?;

        Some(self.tasks.remove(index).action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn action_becomes_due_after_its_delay() {
        // arrange
        let mut scheduler = Scheduler::new();
        let token = CancellationToken::new();
        scheduler.schedule(500 * MS, &token, "think");

        // act + assert
        scheduler.advance_clock(499 * MS);
        assert_eq!(scheduler.pop_due(), None);
        scheduler.advance_clock(MS);
        assert_eq!(scheduler.pop_due(), Some("think"));
        assert!(scheduler.is_idle());
    }

    #[test]
    fn due_actions_come_out_in_time_order() {
        let mut scheduler = Scheduler::new();
        let token = CancellationToken::new();
        scheduler.schedule(30 * MS, &token, 3);
        scheduler.schedule(10 * MS, &token, 1);
        scheduler.schedule(10 * MS, &token, 2);

        scheduler.advance_clock(100 * MS);

        assert_eq!(scheduler.pop_due(), Some(1));
        assert_eq!(scheduler.pop_due(), Some(2));
        assert_eq!(scheduler.pop_due(), Some(3));
        assert_eq!(scheduler.pop_due(), None);
    }

    #[test]
    fn cancelled_token_voids_its_tasks_only() {
        let mut scheduler = Scheduler::new();
        let round = CancellationToken::new();
        let other = CancellationToken::new();
        scheduler.schedule(MS, &round, "stale");
        scheduler.schedule(MS, &other, "live");

        round.cancel();
        scheduler.advance_clock(10 * MS);

        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.pop_due(), Some("live"));
        assert_eq!(scheduler.pop_due(), None);
    }

    #[test]
    fn single_task_can_be_cancelled() {
        let mut scheduler = Scheduler::new();
        let token = CancellationToken::new();
        let id = scheduler.schedule(MS, &token, ());

        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        scheduler.advance_clock(MS);
        assert_eq!(scheduler.pop_due(), None);
    }

    #[test]
    fn delay_is_measured_from_when_it_was_scheduled() {
        let mut scheduler = Scheduler::new();
        let token = CancellationToken::new();
        scheduler.advance_clock(1000 * MS);
        scheduler.schedule(200 * MS, &token, "late");

        scheduler.advance_clock(100 * MS);
        assert_eq!(scheduler.pop_due(), None);
        scheduler.advance_clock(100 * MS);
        assert_eq!(scheduler.pop_due(), Some("late"));
        assert_eq!(scheduler.now(), 1200 * MS);
    }
}
