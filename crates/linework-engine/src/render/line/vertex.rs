use bytemuck::{Pod, Zeroable};

use crate::coords::{ColorRgba, Vec2};

/// One line endpoint as the vertex shader reads it.
///
/// Layout matches the WGSL `VertexIn` struct in uniform address space:
/// `vec2<f32>` at 0, `vec4<f32>` at 16 (16-byte aligned), 32 bytes total.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 2],
    pub _pad: [f32; 2],
    pub color: [f32; 4],
}

impl LineVertex {
    pub const fn new(position: Vec2, color: ColorRgba) -> Self {
        Self {
            position: position.to_array(),
            _pad: [0.0; 2],
            color: color.to_array(),
        }
    }
}

/// The two endpoints of a line segment.
///
/// Order matters: `start` is vertex index 0 of the line-strip draw, `end` is
/// vertex index 1.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LinePayload {
    pub start: LineVertex,
    pub end: LineVertex,
}

impl LinePayload {
    pub const fn new(start: LineVertex, end: LineVertex) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Rotation angle uniform, in degrees.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct AngleUniform {
    pub degrees: f32,
    pub _pad: [f32; 3], // 16-byte uniform block
}

impl AngleUniform {
    pub const fn new(degrees: f32) -> Self {
        Self {
            degrees,
            _pad: [0.0; 3],
        }
    }
}

/// Bottom-left to top-right diagonal, yellow to green.
pub const STATIC_LINE: LinePayload = LinePayload::new(
    LineVertex::new(Vec2::new(-1.0, -1.0), ColorRgba::YELLOW),
    LineVertex::new(Vec2::new(1.0, 1.0), ColorRgba::GREEN),
);

/// Horizontal line through the origin; the shader rotates it.
pub const ROTATING_LINE: LinePayload = LinePayload::new(
    LineVertex::new(Vec2::new(-1.0, 0.0), ColorRgba::YELLOW),
    LineVertex::new(Vec2::new(1.0, 0.0), ColorRgba::GREEN),
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpu_layout_sizes() {
        assert_eq!(std::mem::size_of::<LineVertex>(), 32);
        assert_eq!(std::mem::size_of::<LinePayload>(), 64);
        assert_eq!(std::mem::size_of::<AngleUniform>(), 16);
    }

    #[test]
    fn color_starts_at_offset_16() {
        let bytes = bytemuck::bytes_of(&STATIC_LINE.start);
        let color: &[f32] = bytemuck::cast_slice(&bytes[16..32]);
        assert_eq!(color, &[1.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn start_precedes_end_in_payload() {
        let floats: &[f32] = bytemuck::cast_slice(STATIC_LINE.as_bytes());
        assert_eq!(&floats[0..2], &[-1.0, -1.0]);
        assert_eq!(&floats[8..10], &[1.0, 1.0]);
    }
}
