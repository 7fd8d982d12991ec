use std::time::{Duration, Instant};

/// How a surface schedules its redraws.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum RedrawMode {
    /// Redraw every loop iteration, paced by presentation.
    #[default]
    Continuous,
    /// Redraw only after an explicit invalidation.
    OnDemand,
}

/// Refresh rate assumed when the monitor does not report one.
const FALLBACK_REFRESH_MILLIHERTZ: u32 = 60_000;

/// One display refresh period.
pub fn frame_interval(refresh_millihertz: Option<u32>) -> Duration {
    let mhz = refresh_millihertz
        .filter(|&mhz| mhz > 0)
        .unwrap_or(FALLBACK_REFRESH_MILLIHERTZ);
    Duration::from_secs_f64(1000.0 / f64::from(mhz))
}

/// Decides, once per event-loop iteration, whether a surface needs a frame.
///
/// Switching from `Continuous` to `OnDemand` invalidates once, so the last
/// frame drawn reflects whatever state caused the switch.
///
/// Continuous redraws are normally paced by presentation blocking on vsync.
/// A frame that presents nothing does not block, so the runtime throttles the
/// next continuous redraw to a deadline instead.
#[derive(Debug, Clone, Default)]
pub struct FramePacer {
    mode: RedrawMode,
    pending: bool,
    throttled_until: Option<Instant>,
}

impl FramePacer {
    pub fn new(mode: RedrawMode) -> Self {
        Self {
            mode,
            pending: mode == RedrawMode::OnDemand,
            throttled_until: None,
        }
    }

    pub fn mode(&self) -> RedrawMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RedrawMode) {
        if self.mode == RedrawMode::Continuous && mode == RedrawMode::OnDemand {
            self.pending = true;
        }
        self.mode = mode;
        self.throttled_until = None;
    }

    /// Requests one redraw as soon as possible.
    ///
    /// In `OnDemand` mode this sets the pending flag; in `Continuous` mode it
    /// lifts any throttle.
    pub fn invalidate(&mut self) {
        match self.mode {
            RedrawMode::OnDemand => self.pending = true,
            RedrawMode::Continuous => self.throttled_until = None,
        }
    }

    /// Holds continuous redraws back until `until`. No-op in `OnDemand` mode.
    pub fn throttle(&mut self, until: Instant) {
        if self.mode == RedrawMode::Continuous {
            self.throttled_until = Some(until);
        }
    }

    /// The instant a throttled surface next wants a frame.
    pub fn deadline(&self) -> Option<Instant> {
        match self.mode {
            RedrawMode::Continuous => self.throttled_until,
            RedrawMode::OnDemand => None,
        }
    }

    /// Returns `true` if a redraw should be requested now, consuming any
    /// pending invalidation.
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> bool {
        match self.mode {
            RedrawMode::Continuous => match self.throttled_until {
                Some(until) if now < until => false,
                _ => {
                    self.throttled_until = None;
                    true
                }
            },
            RedrawMode::OnDemand => std::mem::take(&mut self.pending),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polls(p: &mut FramePacer, n: usize) -> usize {
        (0..n).filter(|_| p.poll()).count()
    }

    #[test]
    fn continuous_always_redraws() {
        let mut p = FramePacer::new(RedrawMode::Continuous);
        assert_eq!(polls(&mut p, 10), 10);
    }

    #[test]
    fn on_demand_draws_initial_frame_once() {
        let mut p = FramePacer::new(RedrawMode::OnDemand);
        assert_eq!(polls(&mut p, 10), 1);
    }

    #[test]
    fn pausing_requests_exactly_one_redraw() {
        let mut p = FramePacer::new(RedrawMode::Continuous);
        p.set_mode(RedrawMode::OnDemand);
        assert_eq!(polls(&mut p, 100), 1);
    }

    #[test]
    fn invalidations_coalesce() {
        let mut p = FramePacer::new(RedrawMode::OnDemand);
        p.poll();
        p.invalidate();
        p.invalidate();
        assert_eq!(polls(&mut p, 5), 1);
    }

    #[test]
    fn setting_same_mode_does_not_invalidate() {
        let mut p = FramePacer::new(RedrawMode::OnDemand);
        p.poll();
        p.set_mode(RedrawMode::OnDemand);
        assert!(!p.poll());
    }

    #[test]
    fn resuming_returns_to_continuous() {
        let mut p = FramePacer::new(RedrawMode::Continuous);
        p.set_mode(RedrawMode::OnDemand);
        p.poll();
        p.set_mode(RedrawMode::Continuous);
        assert_eq!(polls(&mut p, 3), 3);
    }

    #[test]
    fn throttled_continuous_waits_for_deadline() {
        let mut p = FramePacer::new(RedrawMode::Continuous);
        let now = Instant::now();
        let until = now + Duration::from_millis(16);
        p.throttle(until);

        assert_eq!(p.deadline(), Some(until));
        assert!(!p.poll_at(now));
        assert!(!p.poll_at(now + Duration::from_millis(10)));
        assert!(p.poll_at(until));
        assert_eq!(p.deadline(), None);
        assert!(p.poll_at(until));
    }

    #[test]
    fn invalidate_lifts_throttle() {
        let mut p = FramePacer::new(RedrawMode::Continuous);
        let now = Instant::now();
        p.throttle(now + Duration::from_secs(1));
        p.invalidate();
        assert!(p.poll_at(now));
    }

    #[test]
    fn on_demand_ignores_throttle() {
        let mut p = FramePacer::new(RedrawMode::OnDemand);
        p.throttle(Instant::now() + Duration::from_secs(1));
        assert_eq!(p.deadline(), None);
        assert!(p.poll());
    }

    #[test]
    fn frame_interval_follows_refresh_rate() {
        assert_eq!(frame_interval(Some(120_000)), Duration::from_secs_f64(1.0 / 120.0));
        assert_eq!(frame_interval(None), Duration::from_secs_f64(1.0 / 60.0));
        assert_eq!(frame_interval(Some(0)), frame_interval(None));
    }
}
