use crate::time::RedrawMode;

/// Initial animation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    /// Starting angle, degrees.
    pub initial_angle: f32,
    /// Multiplier applied to `increment` each frame.
    pub speed: f32,
    /// Degrees advanced per frame at speed 1.0.
    pub increment: f32,
    pub animating: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            initial_angle: 0.0,
            speed: 1.0,
            increment: 1.0,
            animating: true,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AnimationMode {
    /// Continuous redraw; the angle advances every frame.
    Running,
    /// Redraw on invalidation only; the angle is frozen.
    Paused,
}

impl AnimationMode {
    pub fn redraw_mode(self) -> RedrawMode {
        match self {
            AnimationMode::Running => RedrawMode::Continuous,
            AnimationMode::Paused => RedrawMode::OnDemand,
        }
    }
}

/// Rotation state owned by one animated view.
///
/// The angle is uploaded, then advanced after the frame is presented, so the
/// frame on screen always shows the angle from before the latest advance.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    angle: f32,
    speed: f32,
    increment: f32,
    animating: bool,
}

impl AnimationState {
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            angle: wrap_degrees(config.initial_angle),
            speed: config.speed,
            increment: config.increment,
            animating: config.animating,
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn mode(&self) -> AnimationMode {
        if self.animating {
            AnimationMode::Running
        } else {
            AnimationMode::Paused
        }
    }

    /// Speed is taken as-is; range limits belong to the control that sets it.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Applies the toggle. Returns the new mode if it changed.
    pub fn set_animating(&mut self, animating: bool) -> Option<AnimationMode> {
        if self.animating == animating {
            return None;
        }
        self.animating = animating;
        Some(self.mode())
    }

    /// Advances by `speed × increment` when running; wraps into [0, 360).
    pub fn advance(&mut self) {
        if self.animating {
            self.angle = wrap_degrees(self.angle + self.speed * self.increment);
        }
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new(AnimationConfig::default())
    }
}

fn wrap_degrees(deg: f32) -> f32 {
    deg.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(speed: f32) -> AnimationState {
        AnimationState::new(AnimationConfig {
            speed,
            ..AnimationConfig::default()
        })
    }

    #[test]
    fn advances_by_speed_times_increment() {
        let mut a = running(2.5);
        for _ in 0..30 {
            a.advance();
        }
        assert_eq!(a.angle(), 75.0);
    }

    #[test]
    fn wraps_at_full_turn() {
        let mut a = running(10.0);
        for _ in 0..40 {
            a.advance();
        }
        assert_eq!(a.angle(), 40.0);
    }

    #[test]
    fn paused_angle_never_changes() {
        let mut a = running(3.0);
        a.advance();
        a.set_animating(false);
        for _ in 0..1000 {
            a.advance();
        }
        assert_eq!(a.angle(), 3.0);
    }

    #[test]
    fn toggle_reports_only_changes() {
        let mut a = running(1.0);
        assert_eq!(a.set_animating(true), None);
        assert_eq!(a.set_animating(false), Some(AnimationMode::Paused));
        assert_eq!(a.set_animating(false), None);
        assert_eq!(a.set_animating(true), Some(AnimationMode::Running));
    }

    #[test]
    fn speed_is_not_validated() {
        let mut a = running(1.0);
        a.set_speed(25.0);
        a.advance();
        assert_eq!(a.angle(), 25.0);
    }

    #[test]
    fn modes_map_to_redraw_policy() {
        assert_eq!(AnimationMode::Running.redraw_mode(), RedrawMode::Continuous);
        assert_eq!(AnimationMode::Paused.redraw_mode(), RedrawMode::OnDemand);
    }

    #[test]
    fn negative_initial_angle_is_wrapped() {
        let a = AnimationState::new(AnimationConfig {
            initial_angle: -90.0,
            ..AnimationConfig::default()
        });
        assert_eq!(a.angle(), 270.0);
    }
}
