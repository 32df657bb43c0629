use std::fmt;
use std::rc::Rc;

use crate::Signal;

/// Asks the host to re-evaluate output, e.g. request a redraw.
#[derive(Clone)]
pub struct Trigger(Rc<dyn Fn()>);

impl Trigger {
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Bumps `rev` on every notification; hosts subscribe to the signal.
    pub fn revision(rev: &Signal<u64>) -> Self {
        let rev = rev.clone();
        Self::new(move || rev.update(|v| *v = v.wrapping_add(1)))
    }

    pub fn notify_changed(&self) {
        (self.0)()
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Trigger(..)")
    }
}

/// How a consumer learns that a timer changed the controller's output.
#[derive(Clone, Debug, Default)]
pub enum Propagation {
    /// Nothing is signalled; the consumer re-reads on its own next frame.
    #[default]
    Silent,
    /// The trigger fires after every timer-driven change.
    NotifyOnChange(Trigger),
}

impl Propagation {
    pub fn notify(trigger: Trigger) -> Self {
        Propagation::NotifyOnChange(trigger)
    }

    pub(crate) fn changed(&self) {
        if let Propagation::NotifyOnChange(t) = self {
            t.notify_changed();
        }
    }
}
