use winit::keyboard::{KeyCode, PhysicalKey};

/// Stepped speed value, the keyboard stand-in for a slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedControl {
    min: f32,
    max: f32,
    step: f32,
    /// Current value (clamped to [min, max]).
    value: f32,
}

impl SpeedControl {
    pub fn new() -> Self {
        Self {
            min: 1.0,
            max: 10.0,
            step: 0.5,
            value: 1.0,
        }
    }

    pub fn value(mut self, v: f32) -> Self {
        self.value = v.clamp(self.min, self.max);
        self
    }

    pub fn get(&self) -> f32 {
        self.value
    }

    /// Moves one step up. Returns `true` if the value changed.
    pub fn increase(&mut self) -> bool {
        self.set(self.value + self.step)
    }

    /// Moves one step down. Returns `true` if the value changed.
    pub fn decrease(&mut self) -> bool {
        self.set(self.value - self.step)
    }

    fn set(&mut self, v: f32) -> bool {
        let snapped = if self.step > 0.0 {
            self.min + ((v - self.min) / self.step).round() * self.step
        } else {
            v
        };
        let next = snapped.clamp(self.min, self.max);
        let changed = next != self.value;
        self.value = next;
        changed
    }
}

impl Default for SpeedControl { fn default() -> Self { Self::new() } }

/// What a key press asks the viewer to do.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ControlAction {
    ToggleAnimation,
    SpeedUp,
    SpeedDown,
    Exit,
}

impl ControlAction {
    pub fn from_key(key: PhysicalKey) -> Option<Self> {
        match key {
            PhysicalKey::Code(KeyCode::Space) => Some(ControlAction::ToggleAnimation),
            PhysicalKey::Code(KeyCode::ArrowUp) => Some(ControlAction::SpeedUp),
            PhysicalKey::Code(KeyCode::ArrowDown) => Some(ControlAction::SpeedDown),
            PhysicalKey::Code(KeyCode::Escape) => Some(ControlAction::Exit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range_is_one_to_ten_in_halves() {
        let mut s = SpeedControl::default();
        assert_eq!(s.get(), 1.0);
        assert!(s.increase());
        assert_eq!(s.get(), 1.5);
        for _ in 0..100 {
            s.increase();
        }
        assert_eq!(s.get(), 10.0);
        assert!(!s.increase());
    }

    #[test]
    fn decrease_stops_at_min() {
        let mut s = SpeedControl::new().value(2.0);
        assert!(s.decrease());
        assert!(s.decrease());
        assert_eq!(s.get(), 1.0);
        assert!(!s.decrease());
    }

    #[test]
    fn off_grid_value_snaps_on_step() {
        let mut s = SpeedControl::new().value(2.2);
        s.increase();
        assert_eq!(s.get(), 2.5);
    }

    #[test]
    fn initial_value_is_clamped() {
        assert_eq!(SpeedControl::new().value(42.0).get(), 10.0);
        assert_eq!(SpeedControl::new().value(-1.0).get(), 1.0);
    }

    #[test]
    fn key_mapping() {
        let code = |c| ControlAction::from_key(PhysicalKey::Code(c));
        assert_eq!(code(KeyCode::Space), Some(ControlAction::ToggleAnimation));
        assert_eq!(code(KeyCode::ArrowUp), Some(ControlAction::SpeedUp));
        assert_eq!(code(KeyCode::ArrowDown), Some(ControlAction::SpeedDown));
        assert_eq!(code(KeyCode::Escape), Some(ControlAction::Exit));
        assert_eq!(code(KeyCode::KeyA), None);
    }
}
