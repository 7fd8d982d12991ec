//! Coordinate and color types shared by the line renderer and the viewer.
//!
//! Line geometry lives in normalized device coordinates: x and y in [-1, 1],
//! +Y up. Viewports are in physical pixels of the drawable.

mod color;
mod vec2;
mod viewport;

pub use color::ColorRgba;
pub use vec2::Vec2;
pub use viewport::Viewport;
