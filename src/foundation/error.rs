/// Convenience result type used across the preview engine.
pub type PreviewResult<T> = Result<T, PreviewError>;

/// Errors raised at the crate's IO and validation boundaries.
///
/// Per-tick rendering never returns these; degenerate inputs idle instead.
#[derive(thiserror::Error, Debug)]
pub enum PreviewError {
    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// A sheet image could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Writing a PNG or GIF failed.
    #[error("export error: {0}")]
    Export(String),

    /// Errors when serializing or deserializing the sprite config.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PreviewError {
    /// Build a [`PreviewError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PreviewError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`PreviewError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`PreviewError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
