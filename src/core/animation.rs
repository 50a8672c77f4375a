//! Time-driven progress animation.
//!
//! Hosts feed elapsed time through `advance`; the animation never reads a
//! clock itself, which keeps every frame reproducible in tests.

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Easing curves available to chart animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Easing {
    Linear,
    /// Overshoot-free bounce that settles on the target, matching the
    /// classic "ball drop" interpolator.
    #[default]
    Bounce,
}

impl Easing {
    /// Maps normalized time `t` in `[0, 1]` onto eased progress.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Bounce => bounce(t),
        }
    }
}

fn bounce(t: f64) -> f64 {
    fn drop(t: f64) -> f64 {
        t * t * 8.0
    }

    let t = t * 1.1226;
    if t < 0.3535 {
        drop(t)
    } else if t < 0.7408 {
        drop(t - 0.54719) + 0.7
    } else if t < 0.9644 {
        drop(t - 0.8526) + 0.9
    } else {
        drop(t - 1.0435) + 0.95
    }
}

/// Interpolates a scalar from `from` to `to` over a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressAnimation {
    from: f64,
    to: f64,
    duration_seconds: f64,
    elapsed_seconds: f64,
    easing: Easing,
    running: bool,
}

impl ProgressAnimation {
    pub fn new(from: f64, to: f64, duration_seconds: f64, easing: Easing) -> ChartResult<Self> {
        if !from.is_finite() || !to.is_finite() {
            return Err(ChartError::InvalidData(
                "animation endpoints must be finite".to_owned(),
            ));
        }
        if !duration_seconds.is_finite() || duration_seconds < 0.0 {
            return Err(ChartError::InvalidData(
                "animation duration must be finite and >= 0".to_owned(),
            ));
        }

        Ok(Self {
            from,
            to,
            duration_seconds,
            elapsed_seconds: 0.0,
            easing,
            running: false,
        })
    }

    /// Rewinds to `from` and starts running.
    pub fn start(&mut self) {
        self.elapsed_seconds = 0.0;
        self.running = true;
    }

    pub fn cancel(&mut self) {
        self.running = false;
    }

    #[must_use]
    pub fn is_running(self) -> bool {
        self.running
    }

    #[must_use]
    pub fn easing(self) -> Easing {
        self.easing
    }

    #[must_use]
    pub fn duration_seconds(self) -> f64 {
        self.duration_seconds
    }

    /// Current interpolated value.
    #[must_use]
    pub fn value(self) -> f64 {
        let t = if self.duration_seconds == 0.0 {
            1.0
        } else {
            (self.elapsed_seconds / self.duration_seconds).min(1.0)
        };
        if t >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    /// Advances by `delta_seconds` and returns the new value.
    ///
    /// Returns `None` when the animation is not running. The call that reaches
    /// the end of the duration yields exactly `to` and stops the animation.
    pub fn advance(&mut self, delta_seconds: f64) -> Option<f64> {
        if !self.running {
            return None;
        }

        let delta = if delta_seconds.is_finite() {
            delta_seconds.max(0.0)
        } else {
            0.0
        };
        self.elapsed_seconds += delta;
        if self.elapsed_seconds >= self.duration_seconds {
            self.elapsed_seconds = self.duration_seconds;
            self.running = false;
        }

        Some(self.value())
    }
}
