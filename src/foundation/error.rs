use std::path::PathBuf;

/// Convenience result type used across abstract-reel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by the render APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid caller-provided inputs, rejected before any rendering work starts.
    #[error("validation error: {0}")]
    Validation(String),

    /// A source asset (image or audio) could not be read or decoded.
    #[error("asset error: '{}': {message}", path.display())]
    Asset {
        /// Path of the failing asset.
        path: PathBuf,
        /// Decoder or IO diagnostic.
        message: String,
    },

    /// Errors while compositing or persisting frames.
    #[error("render error: {0}")]
    Render(String),

    /// Errors reported by the external encoder while muxing.
    #[error("encode error: {0}")]
    Encode(String),

    /// The render was stopped through its cancellation token.
    #[error("render cancelled")]
    Cancelled,

    /// Errors when serializing or deserializing timing or config data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::Asset`] value naming the failing asset.
    pub fn asset(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Asset {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Build a [`ReelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ReelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for errors raised by caller-side validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
