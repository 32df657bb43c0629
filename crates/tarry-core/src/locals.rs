//! # Composition locals
//!
//! Tarry uses thread‑local “composition locals” for things every delayed
//! element in a subtree shares. Today that is the timer [`Scheduler`]:
//!
//! ```rust
//! use tarry_core::*;
//!
//! let (timers, _clock) = TimerQueue::manual();
//! with_scheduler(timers.clone(), || {
//!     // controllers created here schedule on `timers`
//!     let _s = scheduler();
//! });
//! ```
//!
//! Without a provided scheduler, [`scheduler()`] falls back to the per-thread
//! [`default_timers`] queue.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::scheduler::{Scheduler, default_timers};

thread_local! {
    static LOCALS_STACK: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> = RefCell::new(Vec::new());
}

#[derive(Clone)]
struct SchedulerLocal(Rc<dyn Scheduler>);

fn with_locals_frame<R>(f: impl FnOnce() -> R) -> R {
    // Non-panicking frame guard (ensures pop on unwind)
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            LOCALS_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    LOCALS_STACK.with(|st| st.borrow_mut().push(HashMap::new()));
    let _guard = Guard;
    f()
}

// Only called inside `with_locals_frame`, so a top frame always exists.
fn set_local_boxed(t: TypeId, v: Box<dyn Any>) {
    LOCALS_STACK.with(|st| {
        if let Some(top) = st.borrow_mut().last_mut() {
            top.insert(t, v);
        }
    });
}

pub fn with_scheduler<R>(scheduler: Rc<dyn Scheduler>, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<SchedulerLocal>(), Box::new(SchedulerLocal(scheduler)));
        f()
    })
}

pub fn scheduler() -> Rc<dyn Scheduler> {
    let provided = LOCALS_STACK.with(|st| {
        for frame in st.borrow().iter().rev() {
            if let Some(v) = frame.get(&TypeId::of::<SchedulerLocal>())
                && let Some(s) = v.downcast_ref::<SchedulerLocal>()
            {
                return Some(s.0.clone());
            }
        }
        None
    });
    provided.unwrap_or_else(|| {
        log::warn!("scheduler(): none provided; using the per-thread default timer queue");
        let timers: Rc<dyn Scheduler> = default_timers();
        timers
    })
}
