use base64::{Engine as _, engine::general_purpose};

use crate::foundation::core::Raster;
use crate::foundation::error::{ImprintError, ImprintResult};

/// Split `data:<mime>;base64,<payload>` into its media type and payload.
///
/// The payload is everything after the first comma.
pub fn split_data_uri(uri: &str) -> ImprintResult<(&str, &str)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| ImprintError::decode("user image is not a data URI (missing 'data:')"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImprintError::decode("data URI has no ',' before its payload"))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| ImprintError::decode("data URI is not base64-encoded (missing ';base64')"))?;
    Ok((mime, payload))
}

/// Decode an inline data URI into a premultiplied raster.
#[tracing::instrument(skip(uri), fields(uri_len = uri.len()))]
pub fn decode_data_uri(uri: &str) -> ImprintResult<Raster> {
    let (mime, payload) = split_data_uri(uri)?;
    if !mime.is_empty() && !mime.starts_with("image/") {
        tracing::warn!(mime, "data URI declares a non-image media type; decoding anyway");
    }
    let bytes = general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| ImprintError::decode(format!("invalid base64 payload: {e}")))?;
    let raster = decode_image_bytes(&bytes)?;
    tracing::debug!(
        width = raster.width(),
        height = raster.height(),
        "decoded user image"
    );
    Ok(raster)
}

/// Decode encoded image bytes (PNG, JPEG, ...) and convert to premultiplied RGBA8.
pub fn decode_image_bytes(bytes: &[u8]) -> ImprintResult<Raster> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ImprintError::decode(format!("cannot decode image bytes: {e}")))?;
    Ok(Raster::from_straight(dyn_img.to_rgba8()))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/decode.rs"]
mod tests;
