//! Time subsystem.
//!
//! Frame timing and redraw pacing, decoupled from the runtime so both can be
//! tested without a window:
//! - one `FrameClock` per window; `tick()` once per drawn frame
//! - one `FramePacer` per window; `poll()` once per event-loop iteration

mod frame_clock;
mod pacer;

pub use frame_clock::{FrameClock, FrameTime};
pub use pacer::{frame_interval, FramePacer, RedrawMode};
