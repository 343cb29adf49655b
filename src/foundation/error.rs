/// Convenience result type used across imprint.
pub type ImprintResult<T> = Result<T, ImprintError>;

/// Error taxonomy for a composition request: one variant per pipeline stage.
///
/// Every variant is terminal for the request that raised it.
#[derive(thiserror::Error, Debug)]
pub enum ImprintError {
    /// The request failed structural checks before any stage ran.
    #[error("validation error: {0}")]
    Validation(String),

    /// The background image could not be fetched.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// The inline user image (or the fetched background) could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The crop rectangle is not contained in the decoded image.
    #[error("crop error: {0}")]
    Crop(String),

    /// The resize target is degenerate or resampling failed.
    #[error("resize error: {0}")]
    Resize(String),

    /// The vector mask could not be parsed or rasterized.
    #[error("mask error: {0}")]
    Mask(String),

    /// Overlaying or encoding the final image failed.
    #[error("composite error: {0}")]
    Composite(String),

    /// The asset store rejected the upload or could not be reached.
    #[error("publish error: {0}")]
    Publish(String),

    /// Errors when serializing or deserializing request/response data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImprintError {
    /// Build an [`ImprintError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`ImprintError::Fetch`] value.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Build an [`ImprintError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build an [`ImprintError::Crop`] value.
    pub fn crop(msg: impl Into<String>) -> Self {
        Self::Crop(msg.into())
    }

    /// Build an [`ImprintError::Resize`] value.
    pub fn resize(msg: impl Into<String>) -> Self {
        Self::Resize(msg.into())
    }

    /// Build an [`ImprintError::Mask`] value.
    pub fn mask(msg: impl Into<String>) -> Self {
        Self::Mask(msg.into())
    }

    /// Build an [`ImprintError::Composite`] value.
    pub fn composite(msg: impl Into<String>) -> Self {
        Self::Composite(msg.into())
    }

    /// Build an [`ImprintError::Publish`] value.
    pub fn publish(msg: impl Into<String>) -> Self {
        Self::Publish(msg.into())
    }

    /// Build an [`ImprintError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Stable machine-readable code naming the failing stage.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Fetch(_) => "fetch",
            Self::Decode(_) => "decode",
            Self::Crop(_) => "crop",
            Self::Resize(_) => "resize",
            Self::Mask(_) => "mask",
            Self::Composite(_) => "composite",
            Self::Publish(_) => "publish",
            Self::Serde(_) => "serialization",
            Self::Other(_) => "internal",
        }
    }

    /// `true` when the caller sent something the pipeline can never accept.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Serde(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
