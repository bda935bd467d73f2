use glam::Vec2;

use super::physics::{rubber_band, smooth_damp};
use crate::style::{ScrollDirection, ScrollStyle};
use crate::transition::{
    RunResult, ScrollAxis, ScrollTransition, ScrollTransitionPlugin, TransitionFrame,
};

/// Distance under which an elastic overshoot snaps onto its bound.
const SNAP_DISTANCE: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovementMode {
    /// Offsets never leave `0..=max`.
    Clamped,
    /// Offsets may overshoot while interacting and spring back afterwards.
    Elastic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollPhase {
    Idle,
    Animating,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct DragState {
    /// Where the content would be without edge resistance.
    unconstrained: Vec2,
}

/// Scroll position, extents and scroll animation of one scroll container.
///
/// Offsets are y-down: `scroll_top` grows as the content moves up.
#[derive(Debug)]
pub struct ScrollViewport {
    offset: Vec2,
    client_size: Vec2,
    content_size: Vec2,
    direction: ScrollDirection,
    sensitivity: f32,
    elasticity: f32,
    smoothness: f32,
    transitions: ScrollTransitionPlugin,
    velocity: Vec2,
    drag: Option<DragState>,
}

impl Default for ScrollViewport {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollViewport {
    pub fn new() -> Self {
        let style = ScrollStyle::default();
        Self {
            offset: Vec2::ZERO,
            client_size: Vec2::ZERO,
            content_size: Vec2::ZERO,
            direction: style.direction,
            sensitivity: style.sensitivity,
            elasticity: style.elasticity,
            smoothness: style.smoothness,
            transitions: ScrollTransitionPlugin::new(),
            velocity: Vec2::ZERO,
            drag: None,
        }
    }

    pub fn scroll_left(&self) -> f32 {
        self.offset.x
    }

    pub fn scroll_top(&self) -> f32 {
        self.offset.y
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn client_width(&self) -> f32 {
        self.client_size.x
    }

    pub fn client_height(&self) -> f32 {
        self.client_size.y
    }

    pub fn scroll_width(&self) -> f32 {
        self.content_size.x
    }

    pub fn scroll_height(&self) -> f32 {
        self.content_size.y
    }

    pub fn client_size(&self) -> Vec2 {
        self.client_size
    }

    pub fn content_size(&self) -> Vec2 {
        self.content_size
    }

    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    pub fn elasticity(&self) -> f32 {
        self.elasticity
    }

    pub fn smoothness(&self) -> f32 {
        self.smoothness
    }

    pub fn movement_mode(&self) -> MovementMode {
        if self.elasticity > 0.0 {
            MovementMode::Elastic
        } else {
            MovementMode::Clamped
        }
    }

    pub fn phase(&self) -> ScrollPhase {
        if self.transitions.is_idle() {
            ScrollPhase::Idle
        } else {
            ScrollPhase::Animating
        }
    }

    /// Destination of the in-flight animation on `axis`, if any.
    pub fn animation_target(&self, axis: ScrollAxis) -> Option<f32> {
        self.transitions.target(axis)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Largest in-range offset on each axis.
    pub fn max_offset(&self) -> Vec2 {
        (self.content_size - self.client_size).max(Vec2::ZERO)
    }

    pub fn overflows(&self, axis: ScrollAxis) -> bool {
        axis.pick(self.content_size.x, self.content_size.y)
            > axis.pick(self.client_size.x, self.client_size.y)
    }

    pub fn apply_style(&mut self, style: &ScrollStyle) {
        let previous_mode = self.movement_mode();
        self.direction = style.direction;
        self.sensitivity = sanitize(style.sensitivity);
        self.elasticity = sanitize(style.elasticity);
        self.smoothness = sanitize(style.smoothness);

        for axis in ScrollAxis::ALL {
            if !self.direction.allows(axis) && self.transitions.cancel_track(axis) {
                tracing::debug!(?axis, "scroll animation dropped: axis disabled");
            }
        }

        let mode = self.movement_mode();
        if mode != previous_mode {
            tracing::debug!(?previous_mode, ?mode, "scroll movement mode changed");
            if mode == MovementMode::Clamped {
                self.velocity = Vec2::ZERO;
                self.offset = self.clamp_to_bounds(self.offset);
            }
        }
    }

    /// Takes the extents from a layout pass. In clamped mode the current
    /// offset is pulled back into the new range straight away.
    pub fn apply_layout(&mut self, client_size: Vec2, content_size: Vec2) {
        self.client_size = client_size.max(Vec2::ZERO);
        self.content_size = content_size.max(Vec2::ZERO);
        if self.movement_mode() == MovementMode::Clamped {
            self.offset = self.clamp_to_bounds(self.offset);
        }
    }

    /// Hard clamp into `0..=max` regardless of movement mode.
    pub fn clamp_to_bounds(&self, value: Vec2) -> Vec2 {
        value.clamp(Vec2::ZERO, self.max_offset())
    }

    /// Clamp according to the movement mode: elastic scrolling lets the
    /// value through and corrects it on later frames.
    pub fn clamp(&self, axis: ScrollAxis, value: f32) -> f32 {
        match self.movement_mode() {
            MovementMode::Clamped => {
                let max = axis.pick(self.max_offset().x, self.max_offset().y);
                value.clamp(0.0, max)
            }
            MovementMode::Elastic => value,
        }
    }

    pub fn set_scroll_left(&mut self, value: f32) {
        self.scroll_axis_to(ScrollAxis::X, value, Some(0.0));
    }

    pub fn set_scroll_top(&mut self, value: f32) {
        self.scroll_axis_to(ScrollAxis::Y, value, Some(0.0));
    }

    /// `duration` of `None` uses the configured smoothness.
    pub fn scroll_to(&mut self, x: f32, y: f32, duration: Option<f32>) {
        self.scroll_axis_to(ScrollAxis::X, x, duration);
        self.scroll_axis_to(ScrollAxis::Y, y, duration);
    }

    /// Relative to the current offset, not to a pending animation target.
    pub fn scroll_by(&mut self, dx: f32, dy: f32, duration: Option<f32>) {
        self.scroll_axis_to(ScrollAxis::X, self.offset.x + dx, duration);
        self.scroll_axis_to(ScrollAxis::Y, self.offset.y + dy, duration);
    }

    pub fn scroll_axis_to(&mut self, axis: ScrollAxis, value: f32, duration: Option<f32>) {
        if !self.direction.allows(axis) || !value.is_finite() {
            return;
        }
        let target = self.clamp(axis, value);
        let duration = duration
            .filter(|duration| duration.is_finite())
            .unwrap_or(self.smoothness)
            .max(0.0);
        let transition = ScrollTransition::new(duration);
        let current = self.axis_offset(axis);

        if transition.is_immediate() {
            if self.transitions.cancel_track(axis) {
                tracing::debug!(?axis, "scroll animation superseded by jump");
            }
            self.set_axis_velocity(axis, 0.0);
            self.set_axis_offset(axis, target);
            return;
        }

        if (target - current).abs() <= f32::EPSILON && !self.transitions.is_running(axis) {
            return;
        }
        let retargeted = self
            .transitions
            .start_scroll_track(axis, current, target, transition);
        self.set_axis_velocity(axis, 0.0);
        tracing::debug!(?axis, from = current, to = target, duration, retargeted, "scroll animation");
    }

    /// Direct manipulation starts; any running animation is dropped.
    pub fn begin_drag(&mut self) {
        self.transitions.cancel_all();
        self.velocity = Vec2::ZERO;
        self.drag = Some(DragState {
            unconstrained: self.offset,
        });
    }

    /// Moves the content by `delta` under the finger. Beyond the range the
    /// movement is clamped, or rubber-banded in elastic mode.
    pub fn drag_by(&mut self, delta: Vec2) {
        if self.drag.is_none() {
            self.begin_drag();
        }
        let mode = self.movement_mode();
        let max = self.max_offset();
        let Some(drag) = self.drag.as_mut() else {
            return;
        };

        for axis in ScrollAxis::ALL {
            if !self.direction.allows(axis) {
                continue;
            }
            let raw = axis.pick(drag.unconstrained.x, drag.unconstrained.y) + axis.pick(delta.x, delta.y);
            let upper = axis.pick(max.x, max.y);
            let bound = raw.clamp(0.0, upper);
            let value = match mode {
                MovementMode::Clamped => bound,
                MovementMode::Elastic => {
                    let view = axis.pick(self.client_size.x, self.client_size.y);
                    bound + rubber_band(raw - bound, view)
                }
            };
            match axis {
                ScrollAxis::X => {
                    drag.unconstrained.x = if mode == MovementMode::Clamped { bound } else { raw };
                    self.offset.x = value;
                }
                ScrollAxis::Y => {
                    drag.unconstrained.y = if mode == MovementMode::Clamped { bound } else { raw };
                    self.offset.y = value;
                }
            }
        }
    }

    /// Releases direct manipulation; an elastic overshoot springs back on the
    /// following frames.
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// One frame: steps the eased animation, then, in elastic mode, pulls any
    /// out-of-range axis toward its nearest bound.
    pub fn advance(&mut self, dt_seconds: f32) -> RunResult {
        let dt = if dt_seconds.is_finite() {
            dt_seconds.max(0.0)
        } else {
            0.0
        };
        let was_animating = !self.transitions.is_idle();
        let mut result = self.transitions.run_tracks(TransitionFrame::new(dt));
        let mut animated = Vec::with_capacity(2);
        for sample in self.transitions.take_samples() {
            let value = self.clamp(sample.axis, sample.value);
            self.set_axis_offset(sample.axis, value);
            animated.push(sample.axis);
        }
        if was_animating && self.transitions.is_idle() {
            tracing::debug!(offset = ?self.offset, "scroll animation finished");
        }

        if self.movement_mode() == MovementMode::Elastic && self.drag.is_none() {
            result = result.merge(self.settle_elastic(dt, &animated));
        }
        result
    }

    /// Axes moved by an animation this frame hold their value until the next.
    fn settle_elastic(&mut self, dt: f32, animated: &[ScrollAxis]) -> RunResult {
        let mut result = RunResult::none();
        let bounds = self.clamp_to_bounds(self.offset);
        for axis in ScrollAxis::ALL {
            if animated.contains(&axis) {
                continue;
            }
            let current = self.axis_offset(axis);
            let bound = axis.pick(bounds.x, bounds.y);
            if current == bound {
                continue;
            }
            let mut velocity = self.axis_velocity(axis);
            let mut next = smooth_damp(current, bound, &mut velocity, self.elasticity, dt);
            if (next - bound).abs() <= SNAP_DISTANCE {
                next = bound;
                velocity = 0.0;
            }
            self.set_axis_offset(axis, next);
            self.set_axis_velocity(axis, velocity);
            result.needs_paint = true;
            result.keep_running |= next != bound;
        }
        result
    }

    fn axis_offset(&self, axis: ScrollAxis) -> f32 {
        axis.pick(self.offset.x, self.offset.y)
    }

    fn set_axis_offset(&mut self, axis: ScrollAxis, value: f32) {
        match axis {
            ScrollAxis::X => self.offset.x = value,
            ScrollAxis::Y => self.offset.y = value,
        }
    }

    fn axis_velocity(&self, axis: ScrollAxis) -> f32 {
        axis.pick(self.velocity.x, self.velocity.y)
    }

    fn set_axis_velocity(&mut self, axis: ScrollAxis, value: f32) {
        match axis {
            ScrollAxis::X => self.velocity.x = value,
            ScrollAxis::Y => self.velocity.y = value,
        }
    }
}

fn sanitize(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::ScrollStyle;

    fn viewport(content: Vec2) -> ScrollViewport {
        let mut viewport = ScrollViewport::new();
        viewport.apply_layout(Vec2::splat(200.0), content);
        viewport
    }

    fn run_for(viewport: &mut ScrollViewport, seconds: f32) {
        let frame = 1.0 / 60.0;
        let mut elapsed = 0.0;
        while elapsed < seconds {
            viewport.advance(frame);
            elapsed += frame;
        }
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() <= 1.0,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn setters_clamp_to_content() {
        let mut viewport = viewport(Vec2::new(400.0, 420.0));
        viewport.set_scroll_top(100.0);
        viewport.set_scroll_left(70.0);
        assert_eq!(viewport.offset(), Vec2::new(70.0, 100.0));

        viewport.set_scroll_top(320.0);
        viewport.set_scroll_left(360.0);
        assert_eq!(viewport.scroll_left(), 200.0);
        assert_eq!(viewport.scroll_top(), 220.0);

        viewport.set_scroll_left(-50.0);
        assert_eq!(viewport.scroll_left(), 0.0);
    }

    #[test]
    fn immediate_scroll_to_and_by_compose() {
        let mut viewport = viewport(Vec2::new(400.0, 420.0));
        viewport.scroll_to(120.0, 140.0, Some(0.0));
        assert_eq!(viewport.offset(), Vec2::new(120.0, 140.0));
        viewport.scroll_by(10.0, 30.0, Some(0.0));
        assert_eq!(viewport.offset(), Vec2::new(130.0, 170.0));
        assert_eq!(viewport.phase(), ScrollPhase::Idle);
    }

    #[test]
    fn smooth_scroll_by_converges_on_clamped_target() {
        let mut viewport = viewport(Vec2::new(400.0, 420.0));
        viewport.scroll_to(130.0, 170.0, Some(0.0));
        viewport.apply_style(&ScrollStyle::new().smoothness(0.4));

        viewport.scroll_by(-100.0, -150.0, None);
        assert_eq!(viewport.phase(), ScrollPhase::Animating);
        run_for(&mut viewport, 0.45);

        assert_close(viewport.scroll_left(), 30.0);
        assert_close(viewport.scroll_top(), 20.0);
        assert_eq!(viewport.phase(), ScrollPhase::Idle);
    }

    #[test]
    fn new_scroll_to_retargets_running_animation() {
        let mut viewport = viewport(Vec2::new(400.0, 420.0));
        viewport.scroll_to(200.0, 200.0, Some(1.0));
        run_for(&mut viewport, 0.2);
        let midway = viewport.offset();
        assert!(midway.x > 0.0 && midway.x < 200.0);

        viewport.scroll_to(10.0, 20.0, Some(0.3));
        assert_eq!(viewport.animation_target(ScrollAxis::X), Some(10.0));
        run_for(&mut viewport, 1.5);
        assert_eq!(viewport.offset(), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn immediate_set_cancels_animation_on_that_axis() {
        let mut viewport = viewport(Vec2::new(400.0, 420.0));
        viewport.scroll_to(200.0, 200.0, Some(1.0));
        viewport.set_scroll_left(5.0);
        assert_eq!(viewport.animation_target(ScrollAxis::X), None);
        assert_eq!(viewport.animation_target(ScrollAxis::Y), Some(200.0));
        run_for(&mut viewport, 1.1);
        assert_eq!(viewport.offset(), Vec2::new(5.0, 200.0));
    }

    #[test]
    fn disabled_axis_ignores_requests() {
        let mut viewport = viewport(Vec2::new(400.0, 420.0));
        viewport.apply_style(&ScrollStyle::new().direction(ScrollDirection::Vertical));
        viewport.scroll_to(100.0, 100.0, Some(0.0));
        assert_eq!(viewport.offset(), Vec2::new(0.0, 100.0));
        viewport.scroll_by(50.0, 0.0, Some(0.0));
        assert_eq!(viewport.scroll_left(), 0.0);

        viewport.apply_style(&ScrollStyle::new().direction(ScrollDirection::None));
        viewport.set_scroll_top(10.0);
        assert_eq!(viewport.scroll_top(), 100.0);
    }

    #[test]
    fn non_finite_targets_are_ignored() {
        let mut viewport = viewport(Vec2::new(400.0, 420.0));
        viewport.scroll_to(f32::NAN, 30.0, Some(0.0));
        assert_eq!(viewport.offset(), Vec2::new(0.0, 30.0));
    }

    #[test]
    fn shrinking_content_reclamps_offset() {
        let mut viewport = viewport(Vec2::new(400.0, 420.0));
        viewport.scroll_to(200.0, 220.0, Some(0.0));
        viewport.apply_layout(Vec2::splat(200.0), Vec2::new(250.0, 100.0));
        assert_eq!(viewport.offset(), Vec2::new(50.0, 0.0));
    }

    #[test]
    fn elastic_overshoot_springs_back() {
        let mut viewport = viewport(Vec2::new(400.0, 420.0));
        viewport.apply_style(&ScrollStyle::new().elasticity(0.1));
        assert_eq!(viewport.movement_mode(), MovementMode::Elastic);

        viewport.set_scroll_top(300.0);
        assert_eq!(viewport.scroll_top(), 300.0);

        let result = viewport.advance(1.0 / 60.0);
        assert!(result.keep_running);
        assert!(viewport.scroll_top() < 300.0);
        run_for(&mut viewport, 2.0);
        assert_eq!(viewport.scroll_top(), 220.0);
    }

    #[test]
    fn elastic_drag_is_rubber_banded_and_released() {
        let mut viewport = viewport(Vec2::new(400.0, 420.0));
        viewport.apply_style(&ScrollStyle::new().elasticity(0.1));
        viewport.begin_drag();
        viewport.drag_by(Vec2::new(0.0, -100.0));
        let overshoot = viewport.scroll_top();
        assert!(overshoot < 0.0 && overshoot > -100.0);

        viewport.advance(0.5);
        assert_eq!(viewport.scroll_top(), overshoot, "held while dragging");

        viewport.end_drag();
        run_for(&mut viewport, 2.0);
        assert_eq!(viewport.scroll_top(), 0.0);
    }

    #[test]
    fn clamped_drag_stops_at_edges() {
        let mut viewport = viewport(Vec2::new(400.0, 420.0));
        viewport.begin_drag();
        viewport.drag_by(Vec2::new(-30.0, 500.0));
        assert_eq!(viewport.offset(), Vec2::new(0.0, 220.0));
        viewport.drag_by(Vec2::new(0.0, -20.0));
        assert_eq!(viewport.scroll_top(), 200.0);
        viewport.end_drag();
    }

    #[test]
    fn switching_back_to_clamped_snaps_into_range() {
        let mut viewport = viewport(Vec2::new(400.0, 420.0));
        viewport.apply_style(&ScrollStyle::new().elasticity(0.5));
        viewport.set_scroll_left(-40.0);
        assert_eq!(viewport.scroll_left(), -40.0);
        viewport.apply_style(&ScrollStyle::new().elasticity(0.0));
        assert_eq!(viewport.movement_mode(), MovementMode::Clamped);
        assert_eq!(viewport.scroll_left(), 0.0);
    }
}
