mod scroll_transition;
mod time_function;
pub use scroll_transition::*;
pub use time_function::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionFrame {
    pub dt_seconds: f32,
}

impl TransitionFrame {
    pub const fn new(dt_seconds: f32) -> Self {
        Self { dt_seconds }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunResult {
    pub needs_paint: bool,
    pub keep_running: bool,
}

impl RunResult {
    pub const fn none() -> Self {
        Self {
            needs_paint: false,
            keep_running: false,
        }
    }

    pub const fn merge(self, rhs: Self) -> Self {
        Self {
            needs_paint: self.needs_paint || rhs.needs_paint,
            keep_running: self.keep_running || rhs.keep_running,
        }
    }
}
