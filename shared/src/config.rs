use serde::{Deserialize, Serialize};

use crate::error::LooperError;
use crate::range::DurationChangePolicy;

// ===== CONFIG TYPES =====

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct LooperConfig {
    pub playback: PlaybackSection,
    pub looping: LoopingSection,
    pub mount: MountSection,
    pub logging: LoggingSection,
}

impl LooperConfig {
    pub fn from_toml(source: &str) -> Result<Self, LooperError> {
        Ok(toml::from_str(source)?)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlaybackSection {
    pub video_selector: String,
}

impl Default for PlaybackSection {
    fn default() -> Self {
        Self {
            video_selector: "video".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoopingSection {
    pub check_interval_ms: u32,
    pub duration_change_policy: DurationChangePolicy,
}

impl LoopingSection {
    pub const DEFAULT_CHECK_INTERVAL_MS: u32 = 100;
}

impl Default for LoopingSection {
    fn default() -> Self {
        Self {
            check_interval_ms: Self::DEFAULT_CHECK_INTERVAL_MS,
            duration_change_policy: DurationChangePolicy::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MountSection {
    /// Tried in order; the first one whose region exists wins.
    pub strategies: Vec<InsertionStrategy>,
}

impl Default for MountSection {
    fn default() -> Self {
        Self {
            strategies: vec![
                InsertionStrategy::new("#title", Placement::Before),
                InsertionStrategy::new("ytd-watch-metadata", Placement::FirstChild),
                InsertionStrategy::new("#primary-inner", Placement::Before),
                InsertionStrategy::new("#movie_player", Placement::After),
            ],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InsertionStrategy {
    pub selector: String,
    pub placement: Placement,
}

impl InsertionStrategy {
    pub fn new(selector: &str, placement: Placement) -> Self {
        Self {
            selector: selector.to_string(),
            placement,
        }
    }
}

/// Where the control container goes relative to the anchor element.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Sibling right before the anchor. Needs a parent.
    Before,
    /// First child of the anchor.
    FirstChild,
    /// Sibling right after the anchor. Needs a parent.
    After,
}

impl Placement {
    pub fn needs_parent(self) -> bool {
        !matches!(self, Placement::FirstChild)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingSection {
    pub level: LogLevel,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self { level: LogLevel::Info }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}
