use std::path::Path;

use anyhow::Context;

use crate::foundation::core::{PixelRect, Size};
use crate::foundation::error::{ImprintError, ImprintResult};

/// Wire-level composition request, as posted by a client.
///
/// Nothing here is trusted yet; [`crate::validate`] turns it into a
/// [`ValidatedRequest`](crate::ValidatedRequest).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionRequest {
    /// Remote background and the canvas size it is fitted to.
    pub background: BackgroundSpec,
    /// Inline user image.
    pub user_image: UserImageSpec,
    /// Region of the decoded user image to keep.
    pub crop: PixelRect,
    /// Placement and size of the user region on the canvas.
    pub target: PixelRect,
    /// Optional silhouette applied to the user region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<MaskSpec>,
    /// Diagnostics only.
    #[serde(default)]
    pub meta: Meta,
}

/// Background reference.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BackgroundSpec {
    /// HTTP(S) URL of the background image.
    pub url: String,
    /// Canvas width the background is cover-fitted to.
    pub width: u32,
    /// Canvas height the background is cover-fitted to.
    pub height: u32,
}

impl BackgroundSpec {
    /// Canvas size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Inline user image payload.
#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserImageSpec {
    /// `data:<mime>;base64,<payload>`.
    pub data_url: String,
    /// Width the client saw before cropping (diagnostics).
    #[serde(default)]
    pub width: u32,
    /// Height the client saw before cropping (diagnostics).
    #[serde(default)]
    pub height: u32,
}

// Data URIs run to megabytes; keep them out of logs.
impl std::fmt::Debug for UserImageSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let head: String = self.data_url.chars().take(32).collect();
        f.debug_struct("UserImageSpec")
            .field("data_url_head", &head)
            .field("data_url_len", &self.data_url.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Mask as sent on the wire; `kind` is free text until validated.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskSpec {
    /// Mask kind: `vector` (alias `svg`) or `none`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Path data in SVG path syntax.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// `min-x min-y width height` the path is authored in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_box: Option<String>,
}

/// Free-form diagnostics attached to a request.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Template identifier chosen by the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Nominal render size; clients send either a number or an object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_size: Option<serde_json::Value>,
}

impl CompositionRequest {
    /// Parse a request from JSON text.
    pub fn from_json_str(s: &str) -> ImprintResult<Self> {
        serde_json::from_str(s).map_err(|e| ImprintError::serde(e.to_string()))
    }

    /// Parse a request from a JSON file.
    pub fn from_path(path: &Path) -> ImprintResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read request '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Mask kind for diagnostics (`none` when absent).
    pub fn mask_kind(&self) -> &str {
        self.mask.as_ref().map_or("none", |m| m.kind.as_str())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/request/model.rs"]
mod tests;
