use std::time::{Duration, SystemTime, UNIX_EPOCH};

use sha2::{Digest as _, Sha256};

use crate::config::ImprintOpts;
use crate::foundation::error::{ImprintError, ImprintResult};
use crate::publish::store::{AssetStore, PublishedAsset};

/// Environment variable holding `cloudinary://<api_key>:<api_secret>@<cloud_name>`.
pub const CLOUDINARY_URL_ENV: &str = "CLOUDINARY_URL";

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

/// Credentials for a Cloudinary account.
#[derive(Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
    /// Account cloud name.
    pub cloud_name: String,
    /// Public API key.
    pub api_key: String,
    /// API secret used to sign uploads.
    pub api_secret: String,
    /// API origin; overridable with the `upload_prefix` query parameter.
    pub api_base: String,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl CloudinaryConfig {
    /// Parse `cloudinary://<api_key>:<api_secret>@<cloud_name>[?upload_prefix=<origin>]`.
    pub fn from_url(raw: &str) -> ImprintResult<Self> {
        let url = reqwest::Url::parse(raw.trim())
            .map_err(|e| ImprintError::validation(format!("invalid {CLOUDINARY_URL_ENV}: {e}")))?;
        if url.scheme() != "cloudinary" {
            return Err(ImprintError::validation(format!(
                "{CLOUDINARY_URL_ENV} must use the cloudinary:// scheme"
            )));
        }
        let cloud_name = url.host_str().unwrap_or_default().to_string();
        let api_key = decode_userinfo(url.username())?;
        let api_secret = decode_userinfo(url.password().unwrap_or_default())?;
        if cloud_name.is_empty() || api_key.is_empty() || api_secret.is_empty() {
            return Err(ImprintError::validation(format!(
                "{CLOUDINARY_URL_ENV} needs api key, api secret and cloud name"
            )));
        }
        let api_base = url
            .query_pairs()
            .find(|(k, _)| k == "upload_prefix")
            .map(|(_, v)| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Ok(Self {
            cloud_name,
            api_key,
            api_secret,
            api_base,
        })
    }

    /// Read [`CLOUDINARY_URL_ENV`]; `Ok(None)` when it is unset or empty.
    pub fn from_env() -> ImprintResult<Option<Self>> {
        match std::env::var(CLOUDINARY_URL_ENV) {
            Ok(v) if !v.trim().is_empty() => Self::from_url(&v).map(Some),
            _ => Ok(None),
        }
    }

    /// Image upload endpoint for this account.
    pub fn upload_endpoint(&self) -> String {
        format!("{}/v1_1/{}/image/upload", self.api_base, self.cloud_name)
    }
}

// `Url` keeps userinfo percent-encoded; signatures need the raw secret.
fn decode_userinfo(raw: &str) -> ImprintResult<String> {
    percent_encoding::percent_decode_str(raw)
        .decode_utf8()
        .map(|v| v.into_owned())
        .map_err(|e| {
            ImprintError::validation(format!("{CLOUDINARY_URL_ENV} credentials are not UTF-8: {e}"))
        })
}

/// Hex SHA-256 request signature: sorted `key=value` pairs joined by `&`, then the secret.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_unstable_by_key(|(k, _)| *k);
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{:x}", Sha256::digest(format!("{joined}{api_secret}")))
}

#[derive(serde::Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    bytes: Option<u64>,
    error: Option<UploadErrorBody>,
}

#[derive(serde::Deserialize)]
struct UploadErrorBody {
    message: String,
}

/// [`AssetStore`] backed by Cloudinary's signed upload API.
#[derive(Clone, Debug)]
pub struct CloudinaryStore {
    config: CloudinaryConfig,
    folder: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl CloudinaryStore {
    /// Build a store that files uploads under `opts.publish_folder`.
    pub fn new(config: CloudinaryConfig, opts: &ImprintOpts) -> ImprintResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(opts.upload_timeout)
            .build()
            .map_err(|e| ImprintError::publish(format!("cannot build HTTP client: {e}")))?;
        Ok(Self::with_client(config, opts, client))
    }

    /// Use a caller-configured client; `opts` still supplies the folder and timeout.
    pub fn with_client(config: CloudinaryConfig, opts: &ImprintOpts, client: reqwest::Client) -> Self {
        Self {
            config,
            folder: opts.publish_folder.clone(),
            client,
            timeout: opts.upload_timeout,
        }
    }

    fn signed_form(&self, jpeg: &[u8], timestamp: u64) -> ImprintResult<reqwest::multipart::Form> {
        let timestamp = timestamp.to_string();
        let signature = sign_params(
            &[
                ("folder", self.folder.as_str()),
                ("format", "jpg"),
                ("timestamp", timestamp.as_str()),
            ],
            &self.config.api_secret,
        );
        let file = reqwest::multipart::Part::bytes(jpeg.to_vec())
            .file_name("composite.jpg")
            .mime_str("image/jpeg")
            .map_err(|e| ImprintError::publish(format!("cannot build upload body: {e}")))?;
        Ok(reqwest::multipart::Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", self.folder.clone())
            .text("format", "jpg")
            .text("signature", signature)
            .text("signature_algorithm", "sha256"))
    }
}

impl AssetStore for CloudinaryStore {
    async fn upload(&self, jpeg: &[u8]) -> ImprintResult<PublishedAsset> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ImprintError::publish(format!("system clock before epoch: {e}")))?
            .as_secs();
        let form = self.signed_form(jpeg, timestamp)?;

        let response = self
            .client
            .post(self.config.upload_endpoint())
            .multipart(form)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ImprintError::publish(format!(
                        "upload timed out after {}s",
                        self.timeout.as_secs_f32()
                    ))
                } else {
                    ImprintError::publish(format!("upload failed: {e}"))
                }
            })?;
        let status = response.status();
        let body: UploadResponse = response.json().await.map_err(|e| {
            ImprintError::publish(format!("unreadable upload response (HTTP {status}): {e}"))
        })?;

        if let Some(err) = body.error {
            return Err(ImprintError::publish(err.message));
        }
        if !status.is_success() {
            return Err(ImprintError::publish(format!(
                "upload rejected with HTTP {}",
                status.as_u16()
            )));
        }
        match (body.secure_url, body.bytes) {
            (Some(secure_url), Some(bytes)) => Ok(PublishedAsset { secure_url, bytes }),
            _ => Err(ImprintError::publish(
                "upload response is missing secure_url or bytes",
            )),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/publish/cloudinary.rs"]
mod tests;
