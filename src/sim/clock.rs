//! Cooperative scheduler for periodic processes
//!
//! All periodic processes (spawner, press-and-hold resize) are timers
//! multiplexed onto one logical clock. The host never hands us wall time
//! directly; it advances the clock and we pop due ticks one at a time, so
//! every tick runs to completion before the next one is looked at.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::consts::Millis;

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(u32);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer<K> {
    kind: K,
    interval: Millis,
    next_due: Millis,
}

/// A due tick handed back by [`Scheduler::pop_due`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Due<K> {
    pub timer: TimerId,
    pub kind: K,
    /// Logical time the tick was due at (not the time it was popped)
    pub at: Millis,
}

/// Repeating timers keyed by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduler<K> {
    timers: BTreeMap<TimerId, Timer<K>>,
    next_id: u32,
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Self {
            timers: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<K: Copy> Scheduler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a repeating timer whose first tick is one interval after `now`
    pub fn schedule_repeating(&mut self, kind: K, interval: Millis, now: Millis) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let interval = interval.max(1);
        self.timers.insert(
            id,
            Timer {
                kind,
                interval,
                next_due: now + interval,
            },
        );
        id
    }

    /// Cancel a timer. Returns false if it was never scheduled or already gone.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// Earliest pending due time, if any
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.values().map(|t| t.next_due).min()
    }

    /// Pop the earliest tick due at or before `until`.
    ///
    /// Ties are broken by timer id (creation order). The popped timer is
    /// rescheduled one interval after its previous due time, never relative
    /// to `until`, so late frames do not shift the cadence.
    pub fn pop_due(&mut self, until: Millis) -> Option<Due<K>> {
        let (&id, timer) = self
            .timers
            .iter_mut()
            .filter(|(_, t)| t.next_due <= until)
            .min_by_key(|(id, t)| (t.next_due, **id))?;

        let at = timer.next_due;
        timer.next_due += timer.interval;
        Some(Due {
            timer: id,
            kind: timer.kind,
            at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        Fast,
        Slow,
    }

    fn drain(scheduler: &mut Scheduler<Kind>, until: Millis) -> Vec<(Kind, Millis)> {
        let mut out = Vec::new();
        while let Some(due) = scheduler.pop_due(until) {
            out.push((due.kind, due.at));
        }
        out
    }

    #[test]
    fn test_ticks_come_out_in_time_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_repeating(Kind::Slow, 80, 0);
        scheduler.schedule_repeating(Kind::Fast, 50, 0);

        let ticks = drain(&mut scheduler, 160);
        assert_eq!(
            ticks,
            vec![
                (Kind::Fast, 50),
                (Kind::Slow, 80),
                (Kind::Fast, 100),
                (Kind::Fast, 150),
                (Kind::Slow, 160),
            ]
        );
    }

    #[test]
    fn test_nothing_due_before_first_interval() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_repeating(Kind::Fast, 50, 100);
        assert!(scheduler.pop_due(149).is_none());
        assert_eq!(scheduler.next_deadline(), Some(150));
        assert_eq!(scheduler.pop_due(150).map(|d| d.at), Some(150));
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut scheduler = Scheduler::new();
        let fast = scheduler.schedule_repeating(Kind::Fast, 50, 0);
        let slow = scheduler.schedule_repeating(Kind::Slow, 50, 0);

        // First tick is the fast timer; its handler cancels the slow one
        let due = scheduler.pop_due(100).expect("tick due");
        assert_eq!(due.timer, fast);
        assert!(scheduler.cancel(slow));

        let rest = drain(&mut scheduler, 100);
        assert_eq!(rest, vec![(Kind::Fast, 100)]);
        assert!(!scheduler.is_active(slow));
    }

    #[test]
    fn test_cancel_unknown_timer_is_noop() {
        let mut scheduler: Scheduler<Kind> = Scheduler::new();
        let id = scheduler.schedule_repeating(Kind::Fast, 10, 0);
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        scheduler.cancel_all();
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn test_late_pop_keeps_cadence() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_repeating(Kind::Slow, 800, 0);
        // Host stalls and only advances at 1000
        assert_eq!(drain(&mut scheduler, 1000), vec![(Kind::Slow, 800)]);
        assert_eq!(scheduler.next_deadline(), Some(1600));
    }
}
