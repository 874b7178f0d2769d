//! Virtual-clock job queue
//!
//! The engine's only source of time. Jobs come out one at a time in
//! deadline order (ties in scheduling order), so a cancel made while
//! handling one job is seen before the next one is popped.

use std::collections::BTreeMap;

/// Work the engine defers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    /// One second of countdown
    CountdownTick,
    /// Play the level-cleared cue
    SuccessCue,
    /// Move on to the next level
    AdvanceLevel,
}

/// Identifies a scheduled job so it can be cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone, Copy)]
struct Entry {
    seq: u64,
    job: Job,
    interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_seq: u64,
    /// Keyed by (deadline, order)
    queue: BTreeMap<(u64, u64), Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn schedule_once(&mut self, delay_ms: u64, job: Job) -> TaskHandle {
        self.insert(delay_ms, job, None)
    }

    /// First run is one interval from now
    pub fn schedule_repeating(&mut self, interval_ms: u64, job: Job) -> TaskHandle {
        let interval_ms = interval_ms.max(1);
        self.insert(interval_ms, job, Some(interval_ms))
    }

    fn insert(&mut self, delay_ms: u64, job: Job, interval_ms: Option<u64>) -> TaskHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert(
            (self.now_ms.saturating_add(delay_ms), seq),
            Entry {
                seq,
                job,
                interval_ms,
            },
        );
        TaskHandle(seq)
    }

    /// Returns true if the job was still pending
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.queue.len();
        self.queue.retain(|_, e| e.seq != handle.0);
        self.queue.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.queue.clear();
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.queue.values().any(|e| e.seq == handle.0)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pop the earliest job due at or before `until_ms`, moving the clock to
    /// its deadline. Repeating jobs are re-armed under the same handle.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TaskHandle, Job)> {
        let (&(deadline, _), _) = self.queue.first_key_value()?;
        if deadline > until_ms {
            return None;
        }
        let ((deadline, _), entry) = self.queue.pop_first()?;
        self.now_ms = self.now_ms.max(deadline);
        if let Some(interval) = entry.interval_ms {
            // Re-armed entries queue behind anything already due at the same time
            let order = self.next_seq;
            self.next_seq += 1;
            self.queue.insert((deadline + interval, order), entry);
        }
        Some((TaskHandle(entry.seq), entry.job))
    }

    /// Move the clock forward without running anything
    pub fn advance_to(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler, until: u64) -> Vec<(u64, Job)> {
        let mut out = Vec::new();
        while let Some((_, job)) = s.pop_due(until) {
            out.push((s.now_ms(), job));
        }
        s.advance_to(until);
        out
    }

    #[test]
    fn test_jobs_run_in_deadline_order() {
        let mut s = Scheduler::new();
        s.schedule_once(750, Job::AdvanceLevel);
        s.schedule_once(250, Job::SuccessCue);
        assert!(drain(&mut s, 100).is_empty());
        assert_eq!(
            drain(&mut s, 1000),
            vec![(250, Job::SuccessCue), (750, Job::AdvanceLevel)]
        );
        assert_eq!(s.now_ms(), 1000);
        assert!(s.is_empty());
    }

    #[test]
    fn test_ties_keep_scheduling_order() {
        let mut s = Scheduler::new();
        s.schedule_once(500, Job::AdvanceLevel);
        s.schedule_once(500, Job::SuccessCue);
        let jobs: Vec<Job> = drain(&mut s, 500).into_iter().map(|(_, j)| j).collect();
        assert_eq!(jobs, vec![Job::AdvanceLevel, Job::SuccessCue]);
    }

    #[test]
    fn test_repeating_rearms_until_cancelled() {
        let mut s = Scheduler::new();
        let tick = s.schedule_repeating(1000, Job::CountdownTick);
        let ran = drain(&mut s, 3500);
        assert_eq!(
            ran,
            vec![
                (1000, Job::CountdownTick),
                (2000, Job::CountdownTick),
                (3000, Job::CountdownTick)
            ]
        );
        assert!(s.is_pending(tick));
        assert!(s.cancel(tick));
        assert!(!s.cancel(tick));
        assert!(drain(&mut s, 10_000).is_empty());
    }

    #[test]
    fn test_cancel_between_pops_is_observed() {
        let mut s = Scheduler::new();
        let tick = s.schedule_repeating(1000, Job::CountdownTick);
        s.schedule_once(1000, Job::AdvanceLevel);
        // Both due at 1000; cancelling the tick after the first pop stops the re-armed copy
        let (_, first) = s.pop_due(5000).unwrap();
        assert_eq!(first, Job::CountdownTick);
        s.cancel(tick);
        let (_, second) = s.pop_due(5000).unwrap();
        assert_eq!(second, Job::AdvanceLevel);
        assert!(s.pop_due(5000).is_none());
    }

    #[test]
    fn test_delays_are_relative_to_clock() {
        let mut s = Scheduler::new();
        s.advance_to(9_900);
        s.schedule_once(750, Job::AdvanceLevel);
        assert!(s.pop_due(10_000).is_none());
        assert_eq!(s.pop_due(10_650).map(|(_, j)| j), Some(Job::AdvanceLevel));
    }
}
