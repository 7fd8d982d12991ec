//! Linework engine crate.
//!
//! Platform runtime, GPU device plumbing and the line renderer used by the
//! viewer.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
