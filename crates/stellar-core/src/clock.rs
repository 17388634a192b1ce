//! Timers and wall-clock time.
//!
//! The [`Scheduler`] replaces self-rearming callbacks: timers are plain data
//! advanced by the engine's `update`. A fired timer is removed; the engine
//! re-arms its successor after the firing body has run, so every timer fires
//! at most once per update and can never re-enter itself.

use std::cell::Cell;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use stellar_logic::sectors::Sector;

/// Cancellation group for timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerScope {
    /// Lives while the sector is active.
    Sector(Sector),
    /// Lives for the whole session.
    Session,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    Spawn,
    DroneVolley,
    Autosave,
    IncomeAccrual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy)]
struct Timer {
    handle: TimerHandle,
    kind: TimerKind,
    scope: TimerScope,
    remaining_ms: f64,
}

/// A due timer popped from the scheduler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fired {
    pub handle: TimerHandle,
    pub kind: TimerKind,
    pub scope: TimerScope,
    /// How far past due the timer was (>= 0).
    pub overdue_ms: f64,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    timers: Vec<Timer>,
    next_handle: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, kind: TimerKind, scope: TimerScope, delay_ms: f64) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        let remaining_ms = if delay_ms.is_finite() { delay_ms.max(0.0) } else { 0.0 };
        self.timers.push(Timer {
            handle,
            kind,
            scope,
            remaining_ms,
        });
        handle
    }

    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    /// Cancel every timer in `scope`. Returns how many were removed.
    pub fn cancel_scope(&mut self, scope: TimerScope) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.scope != scope);
        before - self.timers.len()
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn advance(&mut self, delta_ms: f64) {
        if !delta_ms.is_finite() || delta_ms <= 0.0 {
            return;
        }
        for timer in &mut self.timers {
            timer.remaining_ms -= delta_ms;
        }
    }

    /// Remove and return every due timer, most overdue first, ties in arming order.
    pub fn pop_due(&mut self) -> Vec<Fired> {
        let mut due = Vec::new();
        self.timers.retain(|t| {
            if t.remaining_ms <= 0.0 {
                due.push(*t);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| {
            a.remaining_ms
                .total_cmp(&b.remaining_ms)
                .then(a.handle.cmp(&b.handle))
        });
        due.into_iter()
            .map(|t| Fired {
                handle: t.handle,
                kind: t.kind,
                scope: t.scope,
                overdue_ms: -t.remaining_ms,
            })
            .collect()
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.timers.iter().any(|t| t.kind == kind)
    }

    pub fn remaining_ms(&self, kind: TimerKind) -> Option<f64> {
        self.timers
            .iter()
            .find(|t| t.kind == kind)
            .map(|t| t.remaining_ms)
    }

    pub fn armed_in(&self, scope: TimerScope) -> usize {
        self.timers.iter().filter(|t| t.scope == scope).count()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

/// Source of wall-clock time for save stamps and offline catch-up.
pub trait WallClock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-driven clock for tests and scripted runs.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance_ms(&self, ms: i64) {
        self.now.set(self.now.get() + Duration::milliseconds(ms));
    }
}

impl WallClock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTER: TimerScope = TimerScope::Sector(Sector::Outer);

    #[test]
    fn test_timer_fires_once_when_due() {
        let mut s = Scheduler::new();
        s.arm(TimerKind::Spawn, OUTER, 100.0);
        s.advance(60.0);
        assert!(s.pop_due().is_empty());
        s.advance(60.0);
        let fired = s.pop_due();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].kind, TimerKind::Spawn);
        assert!((fired[0].overdue_ms - 20.0).abs() < 1e-9);
        assert!(s.is_empty());
    }

    #[test]
    fn test_due_order_is_most_overdue_first() {
        let mut s = Scheduler::new();
        let a = s.arm(TimerKind::Autosave, TimerScope::Session, 50.0);
        let b = s.arm(TimerKind::Spawn, OUTER, 10.0);
        let c = s.arm(TimerKind::DroneVolley, OUTER, 10.0);
        s.advance(100.0);
        let order: Vec<_> = s.pop_due().into_iter().map(|f| f.handle).collect();
        assert_eq!(order, vec![b, c, a]);
    }

    #[test]
    fn test_cancel_scope() {
        let mut s = Scheduler::new();
        s.arm(TimerKind::Spawn, OUTER, 10.0);
        s.arm(TimerKind::DroneVolley, OUTER, 10.0);
        s.arm(TimerKind::Autosave, TimerScope::Session, 10.0);
        assert_eq!(s.cancel_scope(OUTER), 2);
        assert_eq!(s.armed_in(TimerScope::Session), 1);
        assert!(!s.is_armed(TimerKind::Spawn));
    }

    #[test]
    fn test_cancel_handle() {
        let mut s = Scheduler::new();
        let h = s.arm(TimerKind::IncomeAccrual, TimerScope::Session, 1000.0);
        assert!(s.cancel(h));
        assert!(!s.cancel(h));
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(DateTime::<Utc>::default());
        clock.advance_ms(1500);
        assert_eq!(clock.now().timestamp_millis(), 1500);
    }
}
