use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

/// Work the sky can be asked to do at some point in the future.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Task {
    /// One pass of the render loop. Reschedules itself while fireworks remain.
    Frame,
    /// Launch firework `slot` of a batch of `of`.
    Spawn { slot: usize, of: usize },
    /// One step of the dissolving finale, belonging to finale `epoch`.
    Dissolve { epoch: u64, level: f32 },
    /// Full clear closing finale `epoch`.
    Clear { epoch: u64 },
}

#[derive(Debug)]
struct Entry {
    due: Duration,
    seq: u64,
    task: Task,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// Virtual clock plus the queue of pending tasks. Tasks due at the same
/// instant come out in the order they were scheduled.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    seq: u64,
    queue: BinaryHeap<Reverse<Entry>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, task: Task) {
        let entry = Entry {
            due: self.now + delay,
            seq: self.seq,
            task,
        };
        self.seq += 1;
        self.queue.push(Reverse(entry));
    }

    /// Pops the earliest task due at or before `deadline`, moving the clock
    /// to its due time.
    pub fn next_due(&mut self, deadline: Duration) -> Option<Task> {
        let Reverse(head) = self.queue.peek()?;
        if head.due > deadline {
            return None;
        }
        let Reverse(entry) = self.queue.pop()?;
        self.now = self.now.max(entry.due);
        Some(entry.task)
    }

    /// Moves the clock to `to` once every task due by then has run.
    pub fn settle(&mut self, to: Duration) {
        self.now = self.now.max(to);
    }

    pub fn pending(&self, filter: impl Fn(&Task) -> bool) -> usize {
        self.queue.iter().filter(|Reverse(e)| filter(&e.task)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn pops_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule(ms(300), Task::Spawn { slot: 1, of: 2 });
        s.schedule(ms(0), Task::Spawn { slot: 0, of: 2 });
        s.schedule(ms(16), Task::Frame);

        assert_eq!(s.next_due(ms(100)), Some(Task::Spawn { slot: 0, of: 2 }));
        assert_eq!(s.next_due(ms(100)), Some(Task::Frame));
        assert_eq!(s.now(), ms(16));
        assert_eq!(s.next_due(ms(100)), None);
        s.settle(ms(100));
        assert_eq!(s.now(), ms(100));

        assert_eq!(s.next_due(ms(400)), Some(Task::Spawn { slot: 1, of: 2 }));
        assert!(s.is_empty());
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut s = Scheduler::new();
        s.schedule(ms(5), Task::Frame);
        s.schedule(ms(5), Task::Clear { epoch: 3 });
        s.schedule(ms(5), Task::Spawn { slot: 0, of: 1 });

        assert_eq!(s.next_due(ms(5)), Some(Task::Frame));
        assert_eq!(s.next_due(ms(5)), Some(Task::Clear { epoch: 3 }));
        assert_eq!(s.next_due(ms(5)), Some(Task::Spawn { slot: 0, of: 1 }));
    }

    #[test]
    fn delays_are_relative_to_the_clock() {
        let mut s = Scheduler::new();
        s.settle(ms(1000));
        s.schedule(ms(30), Task::Frame);
        assert_eq!(s.next_due(ms(1029)), None);
        assert_eq!(s.pending(|t| matches!(t, Task::Frame)), 1);
        assert_eq!(s.next_due(ms(1030)), Some(Task::Frame));
        assert_eq!(s.pending(|t| matches!(t, Task::Frame)), 0);
    }
}
