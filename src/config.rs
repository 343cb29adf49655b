use std::time::Duration;

/// JPEG quality of the final composite. Not configurable per request.
pub const JPEG_QUALITY: u8 = 92;

/// Folder the asset store files composites under unless overridden.
pub const DEFAULT_PUBLISH_FOLDER: &str = "sharp-test";

/// What a failed upload does to an otherwise successful composite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublishPolicy {
    /// Return the composite anyway and report the publish error separately.
    #[default]
    BestEffort,
    /// Fail the whole request with a publish error.
    Required,
}

/// Process-wide options, fixed at startup.
#[derive(Clone, Debug)]
pub struct ImprintOpts {
    /// Timeout for the background fetch, including reading the body.
    pub fetch_timeout: Duration,
    /// Timeout for the upload to the asset store.
    pub upload_timeout: Duration,
    /// Largest background body accepted, in bytes.
    pub max_background_bytes: u64,
    /// Largest accepted canvas or target side, in pixels.
    pub max_canvas_side: u32,
    /// Behaviour when the upload fails.
    pub publish_policy: PublishPolicy,
    /// Folder the asset store files uploads under.
    pub publish_folder: String,
}

impl Default for ImprintOpts {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(30),
            upload_timeout: Duration::from_secs(60),
            max_background_bytes: 25 * 1024 * 1024,
            max_canvas_side: 16_384,
            publish_policy: PublishPolicy::default(),
            publish_folder: DEFAULT_PUBLISH_FOLDER.to_string(),
        }
    }
}
