use crate::config::ImprintOpts;
use crate::foundation::core::{PixelRect, Size};
use crate::foundation::error::{ImprintError, ImprintResult};
use crate::pipeline::mask::{Mask, VectorMask};
use crate::request::model::{CompositionRequest, MaskSpec, Meta};

/// A request whose geometry and mask have been checked and parsed.
///
/// Crop containment is not checked here: it depends on the decoded user image, so the
/// cropper enforces it.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedRequest {
    /// HTTP(S) URL of the background.
    pub background_url: String,
    /// Output canvas size.
    pub canvas: Size,
    /// Inline user image.
    pub user_data_url: String,
    /// User image size the client declared (diagnostics only).
    pub declared_user_size: Size,
    /// Region of the decoded user image to keep.
    pub crop: PixelRect,
    /// Placement and size on the canvas.
    pub target: PixelRect,
    /// Parsed mask.
    pub mask: Mask,
    /// Diagnostics.
    pub meta: Meta,
}

/// Check a wire request before any stage runs.
pub fn validate(req: CompositionRequest, opts: &ImprintOpts) -> ImprintResult<ValidatedRequest> {
    let canvas = req.background.size();
    check_side("background", canvas, opts.max_canvas_side)?;
    check_url(&req.background.url)?;

    if !req.user_image.data_url.starts_with("data:") {
        return Err(ImprintError::validation(
            "userImage.dataUrl must be a data: URI",
        ));
    }

    if req.crop.size().is_empty() {
        return Err(ImprintError::validation(format!(
            "crop must have a positive size, got {}x{}",
            req.crop.width, req.crop.height
        )));
    }

    check_side("target", req.target.size(), opts.max_canvas_side)?;
    if req.target.x >= canvas.width || req.target.y >= canvas.height {
        return Err(ImprintError::validation(format!(
            "target origin ({}, {}) lies outside the {}x{} canvas",
            req.target.x, req.target.y, canvas.width, canvas.height
        )));
    }

    let mask = parse_mask(req.mask.as_ref())?;

    Ok(ValidatedRequest {
        background_url: req.background.url,
        canvas,
        user_data_url: req.user_image.data_url,
        declared_user_size: Size::new(req.user_image.width, req.user_image.height),
        crop: req.crop,
        target: req.target,
        mask,
        meta: req.meta,
    })
}

/// Map the wire mask onto the closed [`Mask`] enum, rejecting unknown kinds.
pub fn parse_mask(spec: Option<&MaskSpec>) -> ImprintResult<Mask> {
    let Some(spec) = spec else {
        return Ok(Mask::None);
    };
    match spec.kind.trim().to_ascii_lowercase().as_str() {
        "" | "none" => Ok(Mask::None),
        "vector" | "svg" => {
            let path = spec
                .path
                .as_deref()
                .ok_or_else(|| ImprintError::validation("vector mask needs a path"))?;
            let view_box = spec
                .view_box
                .as_deref()
                .ok_or_else(|| ImprintError::validation("vector mask needs a viewBox"))?;
            VectorMask::parse(path, view_box)
                .map(Mask::Vector)
                .map_err(|e| ImprintError::validation(format!("mask rejected: {e}")))
        }
        other => Err(ImprintError::validation(format!(
            "unsupported mask type '{other}'"
        ))),
    }
}

fn check_side(what: &str, size: Size, max: u32) -> ImprintResult<()> {
    if size.is_empty() {
        return Err(ImprintError::validation(format!(
            "{what} must have a positive size, got {}x{}",
            size.width, size.height
        )));
    }
    if size.width > max || size.height > max {
        return Err(ImprintError::validation(format!(
            "{what} size {}x{} exceeds the {max}px limit",
            size.width, size.height
        )));
    }
    Ok(())
}

fn check_url(raw: &str) -> ImprintResult<()> {
    let url = reqwest::Url::parse(raw)
        .map_err(|e| ImprintError::validation(format!("invalid background url '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ImprintError::validation(format!(
            "background url '{raw}' uses unsupported scheme '{other}'"
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/request/validate.rs"]
mod tests;
