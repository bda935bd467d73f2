#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TimeFunction {
    Linear,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
}

impl TimeFunction {
    pub fn sample(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) * 0.5)
                }
            }
        }
    }
}

pub fn normalized_timeline_progress(elapsed_seconds: f32, duration_seconds: f32) -> f32 {
    if duration_seconds <= f32::EPSILON {
        return 1.0;
    }
    (elapsed_seconds / duration_seconds).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_curve_is_monotonic_and_hits_endpoints() {
        for timing in [
            TimeFunction::Linear,
            TimeFunction::EaseIn,
            TimeFunction::EaseOut,
            TimeFunction::EaseInOut,
        ] {
            assert_eq!(timing.sample(0.0), 0.0);
            assert!((timing.sample(1.0) - 1.0).abs() < 1e-6);
            let mut previous = 0.0;
            for step in 1..=100 {
                let value = timing.sample(step as f32 / 100.0);
                assert!(value >= previous, "{timing:?} dipped at step {step}");
                previous = value;
            }
        }
    }

    #[test]
    fn zero_duration_completes_immediately() {
        assert_eq!(normalized_timeline_progress(0.0, 0.0), 1.0);
        assert_eq!(normalized_timeline_progress(0.2, 0.4), 0.5);
        assert_eq!(normalized_timeline_progress(0.9, 0.4), 1.0);
    }
}
