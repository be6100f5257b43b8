//! Discrete step model mapping slider positions to time offsets.
//!
//! The number of slider positions stays roughly bounded regardless of video
//! length: short clips get half-second steps, long videos get ten-second steps.

/// Step count used while the duration is unknown.
pub const DEFAULT_STEP_COUNT: u32 = 100;

/// Step size used while the duration is unknown.
pub const DEFAULT_STEP_SIZE_SECONDS: f64 = 1.0;

/// Duration bands as `(upper bound in seconds, step size in seconds)`.
/// Durations above the last bound use [`LONGEST_STEP_SECONDS`].
const BANDS: [(f64, f64); 4] = [(120.0, 0.5), (600.0, 1.0), (1800.0, 2.0), (3600.0, 5.0)];

const LONGEST_STEP_SECONDS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepModel {
    step_count: u32,
    step_size_seconds: f64,
}

impl StepModel {
    /// Derive the model from a media duration in seconds.
    ///
    /// NaN, infinite, zero and negative durations count as unknown and yield
    /// [`StepModel::default`].
    pub fn for_duration(duration: f64) -> Self {
        if !is_known_duration(duration) {
            return Self::default();
        }

        let step_size_seconds = BANDS
            .iter()
            .find(|(upper, _)| duration <= *upper)
            .map(|(_, step)| *step)
            .unwrap_or(LONGEST_STEP_SECONDS);

        // Computed as a multiply/divide per band so that e.g. 90s * 2 stays exact.
        let raw_steps = if step_size_seconds < 1.0 {
            duration * (1.0 / step_size_seconds)
        } else {
            duration / step_size_seconds
        };

        Self {
            step_count: (raw_steps.floor() as u32).max(1),
            step_size_seconds,
        }
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    pub fn step_size_seconds(&self) -> f64 {
        self.step_size_seconds
    }

    /// Seconds offset of a step value.
    pub fn seconds_at(&self, step: u32) -> f64 {
        f64::from(step) * self.step_size_seconds
    }

    /// Nearest step for a track-relative fraction, clamped to `[0, step_count]`.
    pub fn step_at_fraction(&self, fraction: f64) -> u32 {
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        (fraction * f64::from(self.step_count)).round() as u32
    }

    /// Position of a step as a fraction of the track length.
    pub fn fraction_of(&self, step: u32) -> f64 {
        f64::from(step) / f64::from(self.step_count)
    }
}

impl Default for StepModel {
    fn default() -> Self {
        Self {
            step_count: DEFAULT_STEP_COUNT,
            step_size_seconds: DEFAULT_STEP_SIZE_SECONDS,
        }
    }
}

pub fn is_known_duration(duration: f64) -> bool {
    duration.is_finite() && duration > 0.0
}
