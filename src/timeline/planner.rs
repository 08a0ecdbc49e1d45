use crate::foundation::error::{ReelError, ReelResult};

/// Stills per video: beginning, middle, end.
pub const IMAGE_COUNT: usize = 3;

/// Default crossfade length at the tail of each non-final image window.
pub const DEFAULT_TRANSITION_SECS: f64 = 0.5;

/// Which stills are visible at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveImages {
    /// Window index of the image being shown.
    pub primary: usize,
    /// Next image while it is fading in.
    pub secondary: Option<usize>,
    /// Weight of `secondary` in `[0, 1]`; `0` whenever `secondary` is `None`.
    pub blend: f32,
}

/// Partitions `[0, duration)` into equal image windows with a trailing crossfade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelinePlanner {
    duration: f64,
    image_count: usize,
    window: f64,
    transition: f64,
}

impl TimelinePlanner {
    /// Planner for `image_count` equal windows over `duration` seconds.
    ///
    /// The transition window is clamped to one image window so that short renders still
    /// produce blend factors within `[0, 1]`.
    pub fn new(duration: f64, image_count: usize, transition_window: f64) -> ReelResult<Self> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(ReelError::validation(
                "timeline duration must be finite and > 0",
            ));
        }
        if image_count == 0 {
            return Err(ReelError::validation("timeline needs at least one image"));
        }
        if !transition_window.is_finite() || transition_window < 0.0 {
            return Err(ReelError::validation(
                "transition window must be finite and >= 0",
            ));
        }
        let window = duration / image_count as f64;
        Ok(Self {
            duration,
            image_count,
            window,
            transition: transition_window.min(window),
        })
    }

    /// Planner with the fixed three-image layout and 0.5s crossfade.
    pub fn three_up(duration: f64) -> ReelResult<Self> {
        Self::new(duration, IMAGE_COUNT, DEFAULT_TRANSITION_SECS)
    }

    /// Timeline length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration
    }

    /// Number of image windows.
    pub fn image_count(&self) -> usize {
        self.image_count
    }

    /// Length of one image window in seconds.
    pub fn window_secs(&self) -> f64 {
        self.window
    }

    /// Effective crossfade length after clamping.
    pub fn transition_secs(&self) -> f64 {
        self.transition
    }

    /// Images active at `t`. Out-of-range instants clamp to the timeline.
    pub fn active_images(&self, t: f64) -> ActiveImages {
        let t = if t.is_nan() {
            0.0
        } else {
            t.clamp(0.0, self.duration)
        };
        let last = self.image_count - 1;
        let primary = ((t / self.window).floor() as usize).min(last);
        let time_in_segment = (t - primary as f64 * self.window).clamp(0.0, self.window);

        let fade_start = self.window - self.transition;
        if primary == last || self.transition <= 0.0 || time_in_segment < fade_start {
            return ActiveImages {
                primary,
                secondary: None,
                blend: 0.0,
            };
        }

        let blend = ((time_in_segment - fade_start) / self.transition).clamp(0.0, 1.0);
        ActiveImages {
            primary,
            secondary: Some(primary + 1),
            blend: blend as f32,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/planner.rs"]
mod tests;
