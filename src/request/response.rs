use crate::foundation::error::{ImprintError, ImprintResult};
use crate::pipeline::runner::CompositionResult;
use crate::publish::store::PublishOutcome;

/// Caller-facing JSON body for one composition request.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResponse {
    /// `true` when `image_base64` holds the composite.
    pub success: bool,
    /// `data:image/jpeg;base64,...` on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
    /// Upload outcome, present when an upload was attempted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish: Option<PublishStatus>,
    /// Failing stage's message on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Failing stage's code on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip)]
    status: u16,
}

/// Publish section of a successful response.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishStatus {
    /// `published` or `failed`.
    pub status: String,
    /// Stored asset URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Stored byte count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    /// Upload error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PublishStatus {
    fn from_outcome(outcome: &PublishOutcome) -> Option<Self> {
        match outcome {
            PublishOutcome::Skipped => None,
            PublishOutcome::Published(asset) => Some(Self {
                status: "published".to_string(),
                url: Some(asset.secure_url.clone()),
                bytes: Some(asset.bytes),
                error: None,
            }),
            PublishOutcome::Failed { message } => Some(Self {
                status: "failed".to_string(),
                url: None,
                bytes: None,
                error: Some(message.clone()),
            }),
        }
    }
}

impl RenderResponse {
    /// Successful response carrying the composite inline.
    pub fn success(result: &CompositionResult) -> Self {
        Self {
            success: true,
            image_base64: Some(result.to_data_uri()),
            publish: PublishStatus::from_outcome(&result.publish),
            error: None,
            code: None,
            status: 200,
        }
    }

    /// Failure response with the stage's message verbatim.
    pub fn failure(err: &ImprintError) -> Self {
        Self {
            success: false,
            image_base64: None,
            publish: None,
            error: Some(err.to_string()),
            code: Some(err.code().to_string()),
            status: if err.is_client_error() { 400 } else { 500 },
        }
    }

    /// Build from a pipeline outcome.
    pub fn from_result(result: &ImprintResult<CompositionResult>) -> Self {
        match result {
            Ok(r) => Self::success(r),
            Err(e) => Self::failure(e),
        }
    }

    /// HTTP status a transport should answer with.
    pub fn status_code(&self) -> u16 {
        self.status
    }

    /// Serialize the body.
    pub fn to_json(&self) -> ImprintResult<String> {
        serde_json::to_string(self).map_err(|e| ImprintError::serde(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/request/response.rs"]
mod tests;
