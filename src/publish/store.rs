use std::future::Future;

use crate::foundation::error::{ImprintError, ImprintResult};

/// What the asset store reports for a stored composite.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PublishedAsset {
    /// HTTPS URL of the stored image.
    pub secure_url: String,
    /// Size of the stored resource in bytes, as reported by the store.
    pub bytes: u64,
}

/// Remote store that durably hosts finished composites.
pub trait AssetStore: Send + Sync {
    /// Upload an encoded JPEG and return where it lives.
    fn upload(&self, jpeg: &[u8]) -> impl Future<Output = ImprintResult<PublishedAsset>> + Send;
}

/// Placeholder store type for pipelines built without publishing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoStore;

impl AssetStore for NoStore {
    async fn upload(&self, _jpeg: &[u8]) -> ImprintResult<PublishedAsset> {
        Err(ImprintError::publish("no asset store is configured"))
    }
}

/// Result of the optional publish stage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PublishOutcome {
    /// No store configured, so nothing was uploaded.
    #[default]
    Skipped,
    /// Upload succeeded.
    Published(PublishedAsset),
    /// Upload failed and the policy let the request succeed anyway.
    Failed {
        /// Store or transport error message.
        message: String,
    },
}

impl PublishOutcome {
    /// The stored asset, when the upload succeeded.
    pub fn asset(&self) -> Option<&PublishedAsset> {
        match self {
            Self::Published(asset) => Some(asset),
            _ => None,
        }
    }
}
