//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and windows, wires each window to its GPU, and
//! paces redraws per window.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
