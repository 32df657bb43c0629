//! Composition helpers built on `tarry-core`.

pub mod delayed;

pub use delayed::{delayed_phase, delayed_render, forget_delayed};
