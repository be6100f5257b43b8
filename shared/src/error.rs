/// Everything that can go wrong while attaching to a page.
///
/// None of these are fatal: callers log them and wait for the next host event.
#[derive(Debug, thiserror::Error)]
pub enum LooperError {
    #[error("no insertion point for the loop controls on this page")]
    MissingAnchor,
    #[error("no playback element is attached")]
    MissingHandle,
    #[error("media duration {0} is not usable, falling back to the default step model")]
    MalformedDuration(f64),
    #[error("DOM operation failed: {0}")]
    Dom(String),
    #[error("invalid looper configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl LooperError {
    /// Failures that resolve themselves once the host page settles.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::MissingAnchor | Self::MissingHandle | Self::MalformedDuration(_))
    }
}
