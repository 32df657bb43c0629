//! # Timers
//!
//! The delayed-render controller never sleeps. It hands one-shot callbacks to
//! a [`Scheduler`] and keeps the returned [`TimerHandle`] so it can cancel them
//! later.
//!
//! [`TimerQueue`] is the single-threaded implementation used by hosts and
//! tests. It does not spawn anything: the host calls [`TimerQueue::run_due`]
//! once per frame (or after sleeping until [`TimerQueue::next_deadline`]).
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use tarry_core::*;
//! use web_time::Duration;
//!
//! let (timers, clock) = TimerQueue::manual();
//! let hits = Rc::new(Cell::new(0));
//! let h = hits.clone();
//! timers.schedule(Duration::from_millis(10), Box::new(move || h.set(h.get() + 1)));
//!
//! clock.advance(Duration::from_millis(10));
//! assert_eq!(timers.run_due(), 1);
//! assert_eq!(hits.get(), 1);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::SlotMap;
use web_time::{Duration, Instant};

use crate::clock::{Clock, GlobalClock, ManualClock};

slotmap::new_key_type! {
    /// Handle to a pending one-shot timer. Generational: a handle to a fired or
    /// cancelled timer never refers to a later one.
    pub struct TimerHandle;
}

pub trait Scheduler {
    /// Run `callback` once, `delay` from now.
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle;

    /// Returns `true` if a pending timer was removed. Unknown, fired and
    /// already-cancelled handles return `false`.
    fn cancel(&self, handle: TimerHandle) -> bool;
}

struct Entry {
    deadline: Instant,
    seq: u64,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct Queue {
    timers: SlotMap<TimerHandle, Entry>,
    next_seq: u64,
}

pub struct TimerQueue {
    clock: Box<dyn Clock>,
    manual: Option<ManualClock>,
    queue: RefCell<Queue>,
}

impl TimerQueue {
    pub fn new(clock: impl Clock) -> Self {
        Self {
            clock: Box::new(clock),
            manual: None,
            queue: RefCell::new(Queue::default()),
        }
    }

    /// Queue driven by the globally installed clock (see [`crate::set_clock`]).
    pub fn global() -> Self {
        Self::new(GlobalClock)
    }

    /// Queue on a fresh [`ManualClock`]; the clock is returned so callers can drive it.
    pub fn manual() -> (Rc<Self>, ManualClock) {
        let clock = ManualClock::default();
        let q = Self {
            clock: Box::new(clock.clone()),
            manual: Some(clock.clone()),
            queue: RefCell::new(Queue::default()),
        };
        (Rc::new(q), clock)
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Fires every timer whose deadline has passed, earliest first (ties in
    /// scheduling order). Callbacks run with no borrow held, so they may
    /// schedule or cancel. Timers they schedule that are already due fire in
    /// this same call.
    pub fn run_due(&self) -> usize {
        let mut fired = 0;
        loop {
            let now = self.clock.now();
            let next = {
                let mut q = self.queue.borrow_mut();
                let due = q
                    .timers
                    .iter()
                    .filter(|(_, e)| e.deadline <= now)
                    .min_by_key(|(_, e)| (e.deadline, e.seq))
                    .map(|(k, _)| k);
                due.and_then(|k| q.timers.remove(k).map(|e| (k, e)))
            };
            let Some((handle, entry)) = next else {
                break;
            };
            log::trace!("timer {handle:?} fired");
            (entry.callback)();
            fired += 1;
        }
        fired
    }

    /// Advances the manual clock by `by`, then runs whatever became due.
    pub fn advance(&self, by: Duration) -> usize {
        match &self.manual {
            Some(clock) => clock.advance(by),
            None => log::warn!("TimerQueue::advance on a queue without a manual clock"),
        }
        self.run_due()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().timers.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.queue.borrow().timers.contains_key(handle)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.borrow().timers.values().map(|e| e.deadline).min()
    }

    /// Drops every pending timer without firing it.
    pub fn clear(&self) {
        // drain keeps slot versions, so old handles stay dead
        let dropped: Vec<Entry> = self.queue.borrow_mut().timers.drain().map(|(_, e)| e).collect();
        log::debug!("timer queue cleared ({} pending)", dropped.len());
        // callbacks may own Rc's whose drop touches this queue
        drop(dropped);
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let deadline = self.clock.now() + delay;
        let mut q = self.queue.borrow_mut();
        let seq = q.next_seq;
        q.next_seq += 1;
        let handle = q.timers.insert(Entry {
            deadline,
            seq,
            callback,
        });
        log::trace!("timer {handle:?} scheduled in {delay:?}");
        handle
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        let removed = self.queue.borrow_mut().timers.remove(handle);
        match removed {
            Some(entry) => {
                log::trace!("timer {handle:?} cancelled");
                drop(entry);
                true
            }
            None => false,
        }
    }
}

thread_local! {
    static DEFAULT_TIMERS: Rc<TimerQueue> = Rc::new(TimerQueue::global());
}

/// Per-thread queue used when no scheduler was provided to the composition.
/// Hosts relying on it must call `default_timers().run_due()` every frame.
pub fn default_timers() -> Rc<TimerQueue> {
    DEFAULT_TIMERS.with(|t| t.clone())
}
