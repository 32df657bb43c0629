//! # Delayed mount / render
//!
//! [`DelayedRender`] splits "should this element exist" (`mounted`) from
//! "has its entry transition settled" (`rendered`). Each flag follows the
//! `active` input through its own cancelable delay:
//!
//! | `active` goes | synchronously          | after delay                      |
//! |---------------|------------------------|----------------------------------|
//! | `true`        | `mounted = true`, exit timer cancelled | `rendered = true` (`enter_delay`) |
//! | `false`       | `rendered = false`, enter timer cancelled | `mounted = false` (`exit_delay`) |
//!
//! A zero delay applies the delayed half synchronously too. Reaction is
//! edge-triggered: `set_active` with the value already recorded does nothing.
//!
//! ```rust
//! use tarry_core::*;
//! use web_time::Duration;
//!
//! let (timers, _clock) = TimerQueue::manual();
//! let cfg = DelayConfig::new()
//!     .enter_delay(Duration::from_millis(50))
//!     .exit_delay(Duration::from_millis(200));
//! let dr = DelayedRender::new(timers.clone(), false, cfg);
//!
//! dr.set_active(true);
//! assert_eq!(dr.read(), (true, false));
//! timers.advance(Duration::from_millis(50));
//! assert_eq!(dr.read(), (true, true));
//!
//! dr.set_active(false);
//! assert_eq!(dr.read(), (true, false)); // still mounted for the exit animation
//! timers.advance(Duration::from_millis(200));
//! assert_eq!(dr.read(), (false, false));
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::config::DelayConfig;
use crate::effects::Dispose;
use crate::propagation::Propagation;
use crate::scheduler::{Scheduler, TimerHandle};
use crate::scope::Scope;

/// Resting states of the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// not mounted, not rendered
    Hidden,
    /// mounted, waiting for the enter delay
    Entering,
    /// mounted and rendered
    Shown,
    /// mounted, waiting for the exit delay
    Exiting,
}

#[derive(Clone, Copy, Debug)]
enum Edge {
    Enter,
    Exit,
}

struct State {
    // last input reacted to
    active: bool,
    mounted: bool,
    rendered: bool,
    enter_timer: Option<TimerHandle>,
    exit_timer: Option<TimerHandle>,
    config: DelayConfig,
    propagation: Propagation,
    disposed: bool,
}

/// Owns one mount/render state machine. Dropping it disposes it.
pub struct DelayedRender {
    state: Rc<RefCell<State>>,
    scheduler: Rc<dyn Scheduler>,
}

impl DelayedRender {
    pub fn new(scheduler: Rc<dyn Scheduler>, initial_active: bool, config: DelayConfig) -> Self {
        Self::with_propagation(scheduler, initial_active, config, Propagation::Silent)
    }

    /// Starting active mounts right away and runs the enter delay from here.
    pub fn with_propagation(
        scheduler: Rc<dyn Scheduler>,
        initial_active: bool,
        config: DelayConfig,
        propagation: Propagation,
    ) -> Self {
        let dr = Self {
            state: Rc::new(RefCell::new(State {
                active: false,
                mounted: false,
                rendered: false,
                enter_timer: None,
                exit_timer: None,
                config,
                propagation,
                disposed: false,
            })),
            scheduler,
        };
        dr.set_active(initial_active);
        dr
    }

    pub fn set_active(&self, next: bool) {
        {
            let mut s = self.state.borrow_mut();
            if s.disposed || s.active == next {
                return;
            }
            s.active = next;
        }
        if next { self.enter() } else { self.exit() }
    }

    /// `(mounted, rendered)`
    pub fn read(&self) -> (bool, bool) {
        let s = self.state.borrow();
        (s.mounted, s.rendered)
    }

    pub fn mounted(&self) -> bool {
        self.state.borrow().mounted
    }

    pub fn rendered(&self) -> bool {
        self.state.borrow().rendered
    }

    pub fn is_active(&self) -> bool {
        self.state.borrow().active
    }

    pub fn phase(&self) -> Phase {
        let s = self.state.borrow();
        match (s.mounted, s.rendered) {
            (false, _) => Phase::Hidden,
            (true, true) => Phase::Shown,
            (true, false) if s.active => Phase::Entering,
            (true, false) => Phase::Exiting,
        }
    }

    pub fn config(&self) -> DelayConfig {
        self.state.borrow().config
    }

    /// Applies to timers scheduled from now on; pending ones keep their deadline.
    pub fn set_config(&self, config: DelayConfig) {
        self.state.borrow_mut().config = config;
    }

    pub fn set_propagation(&self, propagation: Propagation) {
        self.state.borrow_mut().propagation = propagation;
    }

    /// Cancels pending timers and freezes the current snapshot. Idempotent.
    pub fn dispose(&self) {
        dispose_state(&self.state, self.scheduler.as_ref());
    }

    pub fn is_disposed(&self) -> bool {
        self.state.borrow().disposed
    }

    /// A guard that disposes this controller when run. It does not keep the
    /// controller alive.
    pub fn dispose_guard(&self) -> Dispose {
        let state = Rc::downgrade(&self.state);
        let scheduler = self.scheduler.clone();
        Dispose::new(move || {
            if let Some(state) = state.upgrade() {
                dispose_state(&state, scheduler.as_ref());
            }
        })
    }

    /// Dispose together with `scope`.
    pub fn bind_scope(&self, scope: &Scope) {
        let guard = self.dispose_guard();
        scope.add_disposer(move || guard.run());
    }

    fn enter(&self) {
        let (stale_exit, delay, schedule) = {
            let mut s = self.state.borrow_mut();
            s.mounted = true;
            let delay = s.config.enter_delay;
            if delay.is_zero() {
                s.rendered = true;
            }
            let schedule = !delay.is_zero() && s.enter_timer.is_none();
            (s.exit_timer.take(), delay, schedule)
        };
        log::trace!("delayed_render: enter (delay {delay:?})");

        if let Some(h) = stale_exit {
            self.scheduler.cancel(h);
        }
        if schedule {
            let h = self.schedule(Edge::Enter, delay);
            self.state.borrow_mut().enter_timer = Some(h);
        }
    }

    fn exit(&self) {
        let (stale_enter, delay, schedule) = {
            let mut s = self.state.borrow_mut();
            s.rendered = false;
            let delay = s.config.exit_delay;
            if delay.is_zero() {
                s.mounted = false;
            }
            let schedule = !delay.is_zero() && s.exit_timer.is_none();
            (s.enter_timer.take(), delay, schedule)
        };
        log::trace!("delayed_render: exit (delay {delay:?})");

        // A pending enter must not set rendered after we went inactive.
        if let Some(h) = stale_enter {
            self.scheduler.cancel(h);
        }
        if schedule {
            let h = self.schedule(Edge::Exit, delay);
            self.state.borrow_mut().exit_timer = Some(h);
        }
    }

    fn schedule(&self, edge: Edge, delay: web_time::Duration) -> TimerHandle {
        let weak = Rc::downgrade(&self.state);
        self.scheduler
            .schedule(delay, Box::new(move || on_timer(&weak, edge)))
    }
}

fn on_timer(state: &Weak<RefCell<State>>, edge: Edge) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let propagation = {
        let mut s = state.borrow_mut();
        if s.disposed {
            return;
        }
        match edge {
            Edge::Enter => {
                debug_assert!(s.active, "enter timer fired while inactive");
                s.enter_timer = None;
                s.rendered = true;
            }
            Edge::Exit => {
                debug_assert!(!s.active, "exit timer fired while active");
                s.exit_timer = None;
                s.mounted = false;
            }
        }
        log::trace!(
            "delayed_render: {edge:?} timer applied -> ({}, {})",
            s.mounted,
            s.rendered
        );
        s.propagation.clone()
    };
    propagation.changed();
}

fn dispose_state(state: &RefCell<State>, scheduler: &dyn Scheduler) {
    let timers = {
        let mut s = state.borrow_mut();
        if s.disposed {
            return;
        }
        s.disposed = true;
        [s.enter_timer.take(), s.exit_timer.take()]
    };
    let cancelled = timers
        .into_iter()
        .flatten()
        .filter(|h| scheduler.cancel(*h))
        .count();
    log::debug!("delayed_render: disposed ({cancelled} pending timers cancelled)");
}

impl Drop for DelayedRender {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for DelayedRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.state.borrow();
        f.debug_struct("DelayedRender")
            .field("active", &s.active)
            .field("mounted", &s.mounted)
            .field("rendered", &s.rendered)
            .field("config", &s.config)
            .field("disposed", &s.disposed)
            .finish()
    }
}
