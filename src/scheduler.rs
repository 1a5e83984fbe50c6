//! Virtual-time task queue for staggered reveals
//!
//! Every reveal is queued at an absolute due time computed from its index
//! (`origin + index * delay`), never from the clock at the previous tick, so
//! execution order always equals index order. Tasks carry the generation they
//! were scheduled under; starting a new generation purges all older tasks from
//! the queue. A task that still carries an old token when it comes due is
//! dropped instead of running.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::time::Duration;

/// Token identifying the reveals of one loaded sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}

/// A reveal that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledReveal {
    pub generation: Generation,
    pub index: usize,
    pub due: Duration,
}

// Field order gives the heap ordering: due time, then insertion order
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct QueueEntry {
    due: Duration,
    seq: u64,
    generation: Generation,
    index: usize,
}

#[derive(Debug, Default)]
pub struct Timeline {
    now: Duration,
    current: Generation,
    queue: BinaryHeap<Reverse<QueueEntry>>,
    next_seq: u64,
    stale_dropped: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn current_generation(&self) -> Generation {
        self.current
    }

    /// Invalidate every task scheduled so far and return the new token
    pub fn begin_generation(&mut self) -> Generation {
        let previous = self.current;
        let current = previous.next();
        self.current = current;

        let queued = self.queue.len();
        self.queue.retain(|Reverse(entry)| entry.generation == current);
        let purged = queued - self.queue.len();
        self.stale_dropped += purged as u64;

        log::debug!(
            "Timeline: {} replaces {} ({} pending task(s) purged)",
            current,
            previous,
            purged
        );
        current
    }

    /// Queue one reveal at an absolute due time
    pub fn schedule(&mut self, generation: Generation, index: usize, due: Duration) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(QueueEntry {
            due,
            seq,
            generation,
            index,
        }));
    }

    /// Queue `count` reveals at `now + i * delay` and return the last due time
    pub fn schedule_reveals(
        &mut self,
        generation: Generation,
        count: usize,
        delay: Duration,
    ) -> Option<Duration> {
        let origin = self.now;
        let mut last = None;
        for index in 0..count {
            let steps = u32::try_from(index).unwrap_or(u32::MAX);
            let due = origin.saturating_add(delay.saturating_mul(steps));
            self.schedule(generation, index, due);
            last = Some(due);
        }
        last
    }

    /// Pop the earliest task due at or before `until`
    ///
    /// Tasks from an invalidated generation are discarded here and never
    /// returned. The clock moves to the due time of the returned task.
    pub fn pop_due(&mut self, until: Duration) -> Option<ScheduledReveal> {
        loop {
            let due = match self.queue.peek() {
                Some(Reverse(entry)) if entry.due <= until => entry.due,
                _ => return None,
            };
            let Reverse(entry) = self.queue.pop()?;
            self.now = self.now.max(due);

            if entry.generation != self.current {
                self.stale_dropped += 1;
                log::trace!(
                    "Timeline: dropped stale reveal {} of {} at {:?}",
                    entry.index,
                    entry.generation,
                    entry.due
                );
                continue;
            }

            return Some(ScheduledReveal {
                generation: entry.generation,
                index: entry.index,
                due: entry.due,
            });
        }
    }

    /// Move the clock forward without firing anything
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Earliest due time among tasks of the current generation
    pub fn next_due(&self) -> Option<Duration> {
        self.current_entries().map(|entry| entry.due).min()
    }

    /// Latest due time among tasks of the current generation
    pub fn last_due(&self) -> Option<Duration> {
        self.current_entries().map(|entry| entry.due).max()
    }

    /// Tasks of the current generation still waiting
    pub fn pending(&self) -> usize {
        self.current_entries().count()
    }

    /// Tasks in the queue, whatever their generation
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Stale tasks discarded so far, purged or dropped when due
    pub fn stale_dropped(&self) -> u64 {
        self.stale_dropped
    }

    fn current_entries(&self) -> impl Iterator<Item = &QueueEntry> {
        let current = self.current;
        self.queue
            .iter()
            .map(|Reverse(entry)| entry)
            .filter(move |entry| entry.generation == current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(100);

    #[test]
    fn test_reveals_fire_in_index_order_at_index_times_delay() {
        let mut timeline = Timeline::new();
        let generation = timeline.begin_generation();
        let last = timeline.schedule_reveals(generation, 4, DELAY);
        assert_eq!(last, Some(Duration::from_millis(300)));
        assert_eq!(timeline.pending(), 4);

        let mut fired = Vec::new();
        while let Some(task) = timeline.pop_due(Duration::from_secs(10)) {
            fired.push((task.index, task.due));
        }

        assert_eq!(
            fired,
            vec![
                (0, Duration::ZERO),
                (1, Duration::from_millis(100)),
                (2, Duration::from_millis(200)),
                (3, Duration::from_millis(300)),
            ]
        );
        assert_eq!(timeline.now(), Duration::from_millis(300));
    }

    #[test]
    fn test_pop_due_respects_until() {
        let mut timeline = Timeline::new();
        let generation = timeline.begin_generation();
        timeline.schedule_reveals(generation, 3, DELAY);

        assert_eq!(timeline.pop_due(Duration::from_millis(150)).map(|t| t.index), Some(0));
        assert_eq!(timeline.pop_due(Duration::from_millis(150)).map(|t| t.index), Some(1));
        assert_eq!(timeline.pop_due(Duration::from_millis(150)), None);
        assert_eq!(timeline.next_due(), Some(Duration::from_millis(200)));
    }

    #[test]
    fn test_new_generation_discards_pending_tasks() {
        let mut timeline = Timeline::new();
        let first = timeline.begin_generation();
        timeline.schedule_reveals(first, 5, DELAY);
        assert_eq!(timeline.pop_due(Duration::ZERO).map(|t| t.index), Some(0));

        timeline.advance_to(Duration::from_millis(50));
        let second = timeline.begin_generation();
        assert_ne!(first, second);
        assert_eq!(timeline.pending(), 0);
        assert_eq!(timeline.queued(), 0, "old tasks should leave the queue");
        assert_eq!(timeline.stale_dropped(), 4);
        timeline.schedule_reveals(second, 2, DELAY);

        let mut fired = Vec::new();
        while let Some(task) = timeline.pop_due(Duration::from_secs(1)) {
            assert_eq!(task.generation, second, "stale task leaked");
            fired.push(task.index);
        }
        assert_eq!(fired, vec![0, 1]);
        assert_eq!(timeline.stale_dropped(), 4);
    }

    #[test]
    fn test_repeated_cancellation_keeps_queue_bounded() {
        let mut timeline = Timeline::new();
        for _ in 0..20 {
            let generation = timeline.begin_generation();
            timeline.schedule_reveals(generation, 20_000, DELAY);
            let interrupted_at = timeline.now() + DELAY;
            while timeline.pop_due(interrupted_at).is_some() {}
            assert_eq!(timeline.queued(), 19_998);
        }

        let last = timeline.begin_generation();
        assert_eq!(timeline.queued(), 0);
        timeline.schedule_reveals(last, 3, DELAY);
        assert_eq!(timeline.queued(), 3);
        assert_eq!(timeline.last_due(), Some(timeline.now() + DELAY * 2));
    }

    #[test]
    fn test_task_scheduled_under_old_token_is_dropped_when_due() {
        let mut timeline = Timeline::new();
        let first = timeline.begin_generation();
        let second = timeline.begin_generation();
        timeline.schedule(first, 0, Duration::ZERO);
        timeline.schedule(second, 1, Duration::ZERO);

        assert_eq!(timeline.pop_due(Duration::ZERO).map(|t| t.index), Some(1));
        assert_eq!(timeline.pop_due(Duration::ZERO), None);
        assert_eq!(timeline.stale_dropped(), 1);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut timeline = Timeline::new();
        let generation = timeline.begin_generation();
        timeline.schedule(generation, 7, Duration::from_millis(10));
        timeline.schedule(generation, 3, Duration::from_millis(10));

        assert_eq!(timeline.pop_due(Duration::from_millis(10)).map(|t| t.index), Some(7));
        assert_eq!(timeline.pop_due(Duration::from_millis(10)).map(|t| t.index), Some(3));
    }

    #[test]
    fn test_zero_reveals_schedule_nothing() {
        let mut timeline = Timeline::new();
        let generation = timeline.begin_generation();
        assert_eq!(timeline.schedule_reveals(generation, 0, DELAY), None);
        assert_eq!(timeline.next_due(), None);
        assert_eq!(timeline.last_due(), None);
    }
}
