/// Convenience result type used across the overlay engine.
pub type OverlayResult<T> = Result<T, OverlayError>;

/// Top-level error taxonomy.
///
/// `Fetch`, `Decode` and `Alloc` are fatal during startup. `Present` is reported by
/// surfaces and handled best-effort by the presenter. Nothing raised during shutdown
/// escapes teardown.
#[derive(thiserror::Error, Debug)]
pub enum OverlayError {
    /// The asset could not be fetched to a readable local file.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// The asset could not be decoded into at least one frame.
    #[error("decode error: {0}")]
    Decode(String),

    /// The off-screen pixel buffer could not be created.
    #[error("allocation error: {0}")]
    Alloc(String),

    /// The surface rejected a frame submission.
    #[error("present error: {0}")]
    Present(String),

    /// The window host refused an operation (styling, hotkey registration).
    #[error("host error: {0}")]
    Host(String),

    /// Animation state machine misuse.
    #[error("animation error: {0}")]
    Animation(String),

    /// Invalid configuration value.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OverlayError {
    /// Build an [`OverlayError::Fetch`] value.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Build an [`OverlayError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build an [`OverlayError::Alloc`] value.
    pub fn alloc(msg: impl Into<String>) -> Self {
        Self::Alloc(msg.into())
    }

    /// Build an [`OverlayError::Present`] value.
    pub fn present(msg: impl Into<String>) -> Self {
        Self::Present(msg.into())
    }

    /// Build an [`OverlayError::Host`] value.
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    /// Build an [`OverlayError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build an [`OverlayError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for the error kinds that abort startup.
    pub fn is_startup_fatal(&self) -> bool {
        !matches!(self, Self::Present(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
