use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug)]
struct ScheduledTask<T> {
    id: TaskId,
    due: Instant,
    task: T,
}

/// One-shot delayed tasks, driven by whoever owns the clock.
///
/// Nothing here sleeps: callers ask for `next_deadline` to size their event
/// poll and hand `now` to `take_due`. Tasks due at the same instant come
/// out in the order they were scheduled.
#[derive(Debug)]
pub struct Scheduler<T> {
    tasks: Vec<ScheduledTask<T>>,
    next_id: u64,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 0,
        }
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            id,
            due: now + delay,
            task,
        });
        id
    }

    /// Returns false if the task already ran or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    #[cfg(test)]
    fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks.iter().map(|t| t.due).min()
    }

    pub fn take_due(&mut self, now: Instant) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|t| t.due <= now);
        self.tasks = pending;
        due.sort_by_key(|t| (t.due, t.id.0));
        due.into_iter().map(|t| t.task).collect()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.tasks.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-slot restartable timer on top of a `Scheduler`.
#[derive(Debug, Default)]
pub struct Debounce {
    slot: Option<TaskId>,
}

impl Debounce {
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Cancel whatever is pending and schedule `task` afresh.
    pub fn restart<T>(
        &mut self,
        scheduler: &mut Scheduler<T>,
        now: Instant,
        delay: Duration,
        task: T,
    ) {
        self.cancel(scheduler);
        self.slot = Some(scheduler.schedule(now, delay, task));
    }

    pub fn cancel<T>(&mut self, scheduler: &mut Scheduler<T>) {
        if let Some(id) = self.slot.take() {
            scheduler.cancel(id);
        }
    }

    #[cfg(test)]
    fn is_armed<T>(&self, scheduler: &Scheduler<T>) -> bool {
        self.slot.is_some_and(|id| scheduler.is_pending(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_due_respects_deadline() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(start, Duration::from_secs(1), "a");
        scheduler.schedule(start, Duration::from_secs(3), "b");

        assert!(scheduler.take_due(start).is_empty());
        assert_eq!(scheduler.take_due(start + Duration::from_secs(2)), vec!["a"]);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.next_deadline(), Some(start + Duration::from_secs(3)));
        assert_eq!(scheduler.take_due(start + Duration::from_secs(3)), vec!["b"]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_take_due_orders_by_deadline_then_insertion() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(start, Duration::from_secs(2), "late");
        scheduler.schedule(start, Duration::from_secs(1), "first");
        scheduler.schedule(start, Duration::from_secs(1), "second");

        assert_eq!(
            scheduler.take_due(start + Duration::from_secs(5)),
            vec!["first", "second", "late"]
        );
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(start, Duration::from_secs(1), 1);
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.take_due(start + Duration::from_secs(2)).is_empty());
    }

    #[test]
    fn test_debounce_restart_keeps_single_task() {
        let start = Instant::now();
        let delay = Duration::from_secs(5);
        let mut scheduler = Scheduler::new();
        let mut debounce = Debounce::new();

        debounce.restart(&mut scheduler, start, delay, "save");
        debounce.restart(&mut scheduler, start + Duration::from_secs(1), delay, "save");
        assert_eq!(scheduler.len(), 1);
        assert!(debounce.is_armed(&scheduler));

        assert!(scheduler.take_due(start + Duration::from_secs(5)).is_empty());
        assert_eq!(scheduler.take_due(start + Duration::from_secs(6)), vec!["save"]);
        assert!(!debounce.is_armed(&scheduler));
    }
}
