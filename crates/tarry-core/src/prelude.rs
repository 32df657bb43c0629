pub use crate::clock::{Clock, GlobalClock, ManualClock, set_clock};
pub use crate::config::DelayConfig;
pub use crate::delayed_render::{DelayedRender, Phase};
pub use crate::effects::{Dispose, attach_to_scope};
pub use crate::error::ConfigError;
pub use crate::locals::{scheduler, with_scheduler};
pub use crate::propagation::{Propagation, Trigger};
pub use crate::runtime::{ComposeGuard, compose, forget_key, peek_key, remember_with_key};
pub use crate::scheduler::{Scheduler, TimerHandle, TimerQueue, default_timers};
pub use crate::scope::{Scope, current_scope};
pub use crate::signal::{Signal, signal};
