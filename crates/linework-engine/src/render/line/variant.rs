use super::binding::BufferRole;
use super::vertex::{LinePayload, ROTATING_LINE, STATIC_LINE};

/// Which of the two line views a context is built for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LineVariant {
    /// Constant diagonal line, payload re-uploaded every frame.
    Static,
    /// Horizontal line rotated by an angle uniform; payload uploaded once.
    Animated,
}

impl LineVariant {
    pub fn name(self) -> &'static str {
        match self {
            LineVariant::Static => "static line",
            LineVariant::Animated => "rotating line",
        }
    }

    pub fn vertex_entry(self) -> &'static str {
        match self {
            LineVariant::Static => "vs_line",
            LineVariant::Animated => "vs_line_rotate",
        }
    }

    pub fn fragment_entry(self) -> &'static str {
        match self {
            LineVariant::Static => "fs_line",
            LineVariant::Animated => "fs_line_rotate",
        }
    }

    /// Buffers the shader reads, in binding-slot order.
    pub fn slots(self) -> &'static [BufferRole] {
        match self {
            LineVariant::Static => &[BufferRole::Payload],
            LineVariant::Animated => &[BufferRole::Payload, BufferRole::Angle],
        }
    }

    pub fn binding_count(self) -> usize {
        self.slots().len()
    }

    pub fn line(self) -> LinePayload {
        match self {
            LineVariant::Static => STATIC_LINE,
            LineVariant::Animated => ROTATING_LINE,
        }
    }

    /// Whether the payload is rewritten each frame (otherwise once at construction).
    pub fn uploads_payload_per_frame(self) -> bool {
        self == LineVariant::Static
    }
}
