//! # Timers, Scopes, and Delayed Rendering
//!
//! Tarry is a small runtime for UI elements whose presence and whose
//! "settled" look lag behind the state that drives them. The pieces:
//!
//! - `Scheduler` / `TimerQueue` — cancelable one-shot timers on a `Clock`.
//! - `DelayedRender` — the mount/render state machine.
//! - `Scope` / `Dispose` — teardown, so pending timers die with their owner.
//! - `Signal<T>` / `Trigger` — how a host hears that a timer changed output.
//!
//! ## Mounted vs rendered
//!
//! A fading panel has to stay in the tree while it fades out, and it should
//! not be drawn in its final style until its fade-in had a chance to start.
//! `DelayedRender` tracks both flags separately:
//!
//! ```rust
//! use tarry_core::*;
//! use web_time::Duration;
//!
//! let (timers, _clock) = TimerQueue::manual();
//! let panel = DelayedRender::new(
//!     timers.clone(),
//!     false,
//!     DelayConfig::new().exit_delay(Duration::from_millis(300)),
//! );
//!
//! panel.set_active(true);
//! timers.advance(Duration::from_millis(1));
//! assert_eq!(panel.phase(), Phase::Shown);
//!
//! panel.set_active(false);
//! assert_eq!(panel.phase(), Phase::Exiting);
//! ```
//!
//! ## Propagation
//!
//! Timers fire outside of composition. With `Propagation::Silent` the host
//! just composes again on its next frame and sees the new flags then. With
//! `Propagation::NotifyOnChange` the controller calls a `Trigger` after each
//! timer-driven change, typically bumping a `Signal<u64>` the host watches to
//! request a redraw:
//!
//! ```rust
//! use tarry_core::*;
//! use web_time::Duration;
//!
//! let (timers, _clock) = TimerQueue::manual();
//! let redraws = signal(0u64);
//! let dr = DelayedRender::with_propagation(
//!     timers.clone(),
//!     true,
//!     DelayConfig::new().enter_delay(Duration::from_millis(16)),
//!     Propagation::notify(Trigger::revision(&redraws)),
//! );
//!
//! timers.advance(Duration::from_millis(16));
//! assert_eq!(redraws.get(), 1);
//! assert!(dr.rendered());
//! ```
//!
//! ## Teardown
//!
//! Dropping a `DelayedRender` disposes it. To tie it to something longer
//! lived, bind it to a `Scope`; disposing the scope cancels its timers.

pub mod clock;
pub mod config;
pub mod delayed_render;
pub mod effects;
pub mod error;
pub mod locals;
pub mod prelude;
pub mod propagation;
pub mod runtime;
pub mod scheduler;
pub mod scope;
pub mod signal;

pub use clock::*;
pub use config::*;
pub use delayed_render::*;
pub use effects::*;
pub use error::*;
pub use locals::*;
pub use propagation::*;
pub use runtime::*;
pub use scheduler::*;
pub use scope::*;
pub use signal::*;
