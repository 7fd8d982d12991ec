//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers) and record their
//! own passes. The only renderer today draws single line segments; see
//! [`line`].

pub mod line;
