use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use web_time::{Duration, Instant};

pub(crate) fn now() -> Instant {
    CLOCK.get().map(|c| c.now()).unwrap_or_else(Instant::now)
}

// Timer clock
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

/// Reads whatever clock was installed with [`set_clock`], falling back to the wall clock.
pub struct GlobalClock;
impl Clock for GlobalClock {
    fn now(&self) -> Instant {
        now()
    }
}

static CLOCK: OnceLock<Box<dyn Clock>> = OnceLock::new();

/// Install a global clock. First install wins; later calls are ignored.
pub fn set_clock(clock: Box<dyn Clock>) {
    if CLOCK.set(clock).is_err() {
        log::debug!("set_clock: a clock is already installed; keeping it");
    }
}

/// A clock you can drive deterministically. Clones share the same instant.
#[derive(Clone)]
pub struct ManualClock {
    t: Arc<Mutex<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl ManualClock {
    pub fn new(start: Instant) -> Self {
        Self {
            t: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut t = self.t.lock();
        *t += by;
    }

    pub fn set(&self, t: Instant) {
        *self.t.lock() = t;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.t.lock()
    }
}
