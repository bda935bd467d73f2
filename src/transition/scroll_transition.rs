use rustc_hash::FxHashMap;

use super::{RunResult, TimeFunction, TransitionFrame, normalized_timeline_progress};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollAxis {
    X,
    Y,
}

impl ScrollAxis {
    pub const ALL: [Self; 2] = [Self::X, Self::Y];

    pub const fn pick<T: Copy>(self, x: T, y: T) -> T {
        match self {
            Self::X => x,
            Self::Y => y,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollTransition {
    pub duration_seconds: f32,
    pub timing: TimeFunction,
}

impl ScrollTransition {
    pub const fn new(duration_seconds: f32) -> Self {
        Self {
            duration_seconds,
            timing: TimeFunction::EaseOut,
        }
    }

    pub const fn timing(mut self, timing: TimeFunction) -> Self {
        self.timing = timing;
        self
    }

    pub fn is_immediate(&self) -> bool {
        self.duration_seconds.is_nan() || self.duration_seconds <= 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollSample {
    pub axis: ScrollAxis,
    pub value: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ScrollTrackState {
    from: f32,
    to: f32,
    elapsed_seconds: f32,
    transition: ScrollTransition,
}

/// Eased scroll tracks, at most one per axis.
///
/// Starting a track on an axis that already has one replaces it: the new
/// track begins at the caller-supplied current value and the old destination
/// is forgotten.
#[derive(Debug, Default)]
pub struct ScrollTransitionPlugin {
    tracks: FxHashMap<ScrollAxis, ScrollTrackState>,
    frame_samples: Vec<ScrollSample>,
}

impl ScrollTransitionPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when an in-flight track was superseded.
    pub fn start_scroll_track(
        &mut self,
        axis: ScrollAxis,
        from: f32,
        to: f32,
        transition: ScrollTransition,
    ) -> bool {
        if let Some(existing) = self.tracks.get(&axis)
            && approx_eq(existing.to, to)
            && approx_eq(existing.transition.duration_seconds, transition.duration_seconds)
        {
            return false;
        }
        self.tracks
            .insert(
                axis,
                ScrollTrackState {
                    from,
                    to,
                    elapsed_seconds: 0.0,
                    transition,
                },
            )
            .is_some()
    }

    pub fn cancel_track(&mut self, axis: ScrollAxis) -> bool {
        self.tracks.remove(&axis).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.tracks.clear();
    }

    pub fn target(&self, axis: ScrollAxis) -> Option<f32> {
        self.tracks.get(&axis).map(|state| state.to)
    }

    pub fn is_running(&self, axis: ScrollAxis) -> bool {
        self.tracks.contains_key(&axis)
    }

    pub fn is_idle(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn take_samples(&mut self) -> Vec<ScrollSample> {
        std::mem::take(&mut self.frame_samples)
    }

    pub fn run_tracks(&mut self, frame: TransitionFrame) -> RunResult {
        self.frame_samples.clear();
        let mut finished = Vec::new();

        for (axis, state) in &mut self.tracks {
            state.elapsed_seconds += frame.dt_seconds.max(0.0);
            let progress = normalized_timeline_progress(
                state.elapsed_seconds,
                state.transition.duration_seconds,
            );
            let eased = state.transition.timing.sample(progress);
            let value = if progress >= 1.0 {
                state.to
            } else {
                state.from + (state.to - state.from) * eased
            };
            self.frame_samples.push(ScrollSample { axis: *axis, value });

            if progress >= 1.0 {
                finished.push(*axis);
            }
        }

        for axis in finished {
            self.tracks.remove(&axis);
        }

        RunResult {
            needs_paint: !self.frame_samples.is_empty(),
            keep_running: !self.tracks.is_empty(),
        }
    }
}

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= 0.001
}
