use super::animation::{AnimationConfig, AnimationState};
use super::backend::{LineBackend, PassDesc};
use super::context::GpuContext;
use super::frame::{render_frame, FrameOutcome, SkipReason};
use super::shader::ShaderLibrary;
use super::variant::LineVariant;

/// One drawing surface's line renderer: its GPU context plus, for the
/// animated variant, the rotation state.
///
/// A view is driven by a single frame callback and is never shared.
pub struct LineView<B: LineBackend> {
    variant: LineVariant,
    context: GpuContext<B>,
    animation: Option<AnimationState>,
    /// Reason the previous frame was skipped, if it was.
    last_skip: Option<SkipReason>,
}

impl<B: LineBackend> LineView<B> {
    pub fn new_static(backend: Option<B>, library: &ShaderLibrary) -> Self {
        Self {
            variant: LineVariant::Static,
            context: GpuContext::new(backend, LineVariant::Static, library),
            animation: None,
            last_skip: None,
        }
    }

    pub fn new_animated(backend: Option<B>, library: &ShaderLibrary, config: AnimationConfig) -> Self {
        Self {
            variant: LineVariant::Animated,
            context: GpuContext::new(backend, LineVariant::Animated, library),
            animation: Some(AnimationState::new(config)),
            last_skip: None,
        }
    }

    pub fn context(&self) -> &GpuContext<B> {
        &self.context
    }

    pub fn animation(&self) -> Option<&AnimationState> {
        self.animation.as_ref()
    }

    pub fn animation_mut(&mut self) -> Option<&mut AnimationState> {
        self.animation.as_mut()
    }

    /// Handles one frame request.
    ///
    /// Checks, in order: drawable, pass description, context readiness. Any
    /// miss skips the frame; the next request tries again. A skip reason is
    /// warned about when it first appears, not on every repeat.
    pub fn draw(&mut self, drawable: Option<B::Drawable>, pass: Option<&PassDesc>) -> FrameOutcome {
        let outcome = self.try_draw(drawable, pass);

        if self.note_outcome(&outcome) {
            match &outcome {
                FrameOutcome::Skipped(reason) => {
                    log::warn!("{}: frame skipped: {reason}", self.variant.name());
                }
                FrameOutcome::Presented => log::info!("{}: rendering resumed", self.variant.name()),
            }
        }

        if outcome.reached_encoding() {
            if let Some(animation) = self.animation.as_mut() {
                animation.advance();
            }
        }

        outcome
    }

    /// Records `outcome`; returns `true` if it differs from the previous one
    /// in a way worth logging.
    fn note_outcome(&mut self, outcome: &FrameOutcome) -> bool {
        let skip = match outcome {
            FrameOutcome::Presented => None,
            FrameOutcome::Skipped(reason) => Some(reason.clone()),
        };
        let changed = skip != self.last_skip;
        self.last_skip = skip;
        changed
    }

    fn try_draw(&mut self, drawable: Option<B::Drawable>, pass: Option<&PassDesc>) -> FrameOutcome {
        let Some(drawable) = drawable else {
            return FrameOutcome::Skipped(SkipReason::NoDrawable);
        };
        let Some(pass) = pass else {
            return FrameOutcome::Skipped(SkipReason::NoPassDescription);
        };
        let resources = match &mut self.context {
            GpuContext::Ready(r) => r,
            GpuContext::Degraded(reason) => {
                return FrameOutcome::Skipped(SkipReason::Degraded(reason.clone()));
            }
        };

        let angle = self.animation.as_ref().map(AnimationState::angle);
        render_frame(resources, drawable, pass, angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::line::mock::{MockBackend, MockDrawable, SharedLog};

    fn animated(config: AnimationConfig) -> (LineView<MockBackend>, SharedLog) {
        let (backend, log) = MockBackend::new();
        let view = LineView::new_animated(Some(backend), &ShaderLibrary::default_library(), config);
        (view, log)
    }

    fn frame(view: &mut LineView<MockBackend>) -> FrameOutcome {
        view.draw(Some(MockDrawable::new(8, 8)), Some(&PassDesc::default()))
    }

    fn uploaded_angles(log: &SharedLog) -> Vec<f32> {
        log.borrow()
            .writes_to("line angle")
            .map(|b| bytemuck::pod_read_unaligned::<f32>(&b[..4]))
            .collect()
    }

    #[test]
    fn angle_after_n_frames() {
        let (mut view, _log) = animated(AnimationConfig {
            speed: 4.0,
            ..AnimationConfig::default()
        });
        for _ in 0..20 {
            assert!(frame(&mut view).is_presented());
        }
        assert_eq!(view.animation().unwrap().angle(), 80.0);
    }

    #[test]
    fn displayed_angle_trails_by_one_frame() {
        let (mut view, log) = animated(AnimationConfig::default());
        for _ in 0..3 {
            frame(&mut view);
        }
        assert_eq!(uploaded_angles(&log), vec![0.0, 1.0, 2.0]);
        assert_eq!(view.animation().unwrap().angle(), 3.0);
    }

    #[test]
    fn paused_view_keeps_uploading_the_same_angle() {
        let (mut view, log) = animated(AnimationConfig {
            animating: false,
            initial_angle: 30.0,
            ..AnimationConfig::default()
        });
        for _ in 0..5 {
            frame(&mut view);
        }
        assert!(uploaded_angles(&log).iter().all(|a| *a == 30.0));
    }

    #[test]
    fn missing_drawable_skips_and_retries() {
        let (mut view, log) = animated(AnimationConfig::default());
        let out = view.draw(None, Some(&PassDesc::default()));
        assert_eq!(out, FrameOutcome::Skipped(SkipReason::NoDrawable));
        assert_eq!(view.animation().unwrap().angle(), 0.0);
        assert_eq!(log.borrow().submissions, 0);

        assert!(frame(&mut view).is_presented());
        assert_eq!(log.borrow().submissions, 1);
    }

    #[test]
    fn missing_pass_description_skips() {
        let (mut view, log) = animated(AnimationConfig::default());
        let out = view.draw(Some(MockDrawable::new(8, 8)), None);
        assert_eq!(out, FrameOutcome::Skipped(SkipReason::NoPassDescription));
        assert_eq!(log.borrow().presentations, 0);
    }

    #[test]
    fn degraded_view_never_submits() {
        let (backend, log) = MockBackend::new();
        let mut view = LineView::new_static(
            Some(backend.failing_pipeline()),
            &ShaderLibrary::default_library(),
        );
        for _ in 0..3 {
            let out = frame(&mut view);
            assert!(matches!(out, FrameOutcome::Skipped(SkipReason::Degraded(_))));
        }
        let log = log.borrow();
        assert_eq!((log.submissions, log.presentations), (0, 0));
    }

    #[test]
    fn no_device_view_is_inert() {
        let mut view: LineView<MockBackend> = LineView::new_animated(
            None,
            &ShaderLibrary::default_library(),
            AnimationConfig::default(),
        );
        let out = frame(&mut view);
        assert!(!out.is_presented());
        assert_eq!(view.animation().unwrap().angle(), 0.0);
    }

    #[test]
    fn repeated_skip_is_reported_once() {
        let mut view: LineView<MockBackend> =
            LineView::new_static(None, &ShaderLibrary::default_library());
        let reports: Vec<bool> = (0..4)
            .map(|_| {
                let out = view.try_draw(Some(MockDrawable::new(8, 8)), Some(&PassDesc::default()));
                view.note_outcome(&out)
            })
            .collect();
        assert_eq!(reports, vec![true, false, false, false]);
    }

    #[test]
    fn recovery_and_new_reason_are_reported() {
        let (mut view, _log) = animated(AnimationConfig::default());
        assert!(!view.note_outcome(&FrameOutcome::Presented));
        assert!(view.note_outcome(&FrameOutcome::Skipped(SkipReason::NoDrawable)));
        assert!(view.note_outcome(&FrameOutcome::Skipped(SkipReason::EmptyDrawable)));
        assert!(view.note_outcome(&FrameOutcome::Presented));
        assert!(!view.note_outcome(&FrameOutcome::Presented));
    }

    #[test]
    fn encoder_failure_does_not_advance() {
        let (mut view, log) = animated(AnimationConfig::default());
        log.borrow_mut().fail_pass = true;
        frame(&mut view);
        assert_eq!(view.animation().unwrap().angle(), 0.0);

        log.borrow_mut().fail_pass = false;
        frame(&mut view);
        assert_eq!(view.animation().unwrap().angle(), 1.0);
    }
}
