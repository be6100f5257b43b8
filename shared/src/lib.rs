//! Platform-free core of the range looper: step model, thumb ranges,
//! tooltip formatting, configuration and the error taxonomy.

pub mod config;
pub mod error;
pub mod range;
pub mod step_model;
pub mod time_format;

pub use config::{InsertionStrategy, LogLevel, LooperConfig, Placement};
pub use error::LooperError;
pub use range::{DurationChangePolicy, LoopRange, Thumb, ThumbPair};
pub use step_model::StepModel;
pub use time_format::format_time;

// ===== DOM HOOKS =====

/// Class names of the mounted control. Page stylesheets target these.
pub mod class_names {
    pub const CONTAINER: &str = "yt-loop-controls";
    pub const SLIDER: &str = "yt-range-slider";
    pub const TRACK: &str = "yt-range-track";
    pub const PROGRESS: &str = "yt-range-progress";
    pub const THUMB: &str = "yt-range-thumb";
    pub const THUMB_START: &str = "yt-range-thumb-start";
    pub const THUMB_END: &str = "yt-range-thumb-end";
    pub const TOOLTIP: &str = "yt-range-tooltip";
}

/// Attribute mirroring each thumb's step value.
pub const VALUE_ATTRIBUTE: &str = "data-value";
