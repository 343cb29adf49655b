use crate::fetch::ImageFetcher;
use crate::foundation::core::{Raster, Size};
use crate::foundation::error::{ImprintError, ImprintResult};
use crate::pipeline::decode::decode_image_bytes;
use crate::pipeline::resize::cover_fit;

/// Fetch the encoded background; the only I/O the loader performs.
#[tracing::instrument(skip(fetcher))]
pub async fn fetch_background<F: ImageFetcher>(fetcher: &F, url: &str) -> ImprintResult<Vec<u8>> {
    let bytes = fetcher.fetch(url).await?;
    if bytes.is_empty() {
        return Err(ImprintError::fetch(format!(
            "cannot load image: {url} (empty body)"
        )));
    }
    Ok(bytes)
}

/// Decode fetched background bytes and cover-fit them onto the canvas.
pub fn load_background(bytes: &[u8], url: &str, canvas: Size) -> ImprintResult<Raster> {
    let decoded = decode_image_bytes(bytes).map_err(|e| match e {
        ImprintError::Decode(msg) => ImprintError::decode(format!("background {url}: {msg}")),
        other => other,
    })?;
    tracing::debug!(
        src_w = decoded.width(),
        src_h = decoded.height(),
        canvas_w = canvas.width,
        canvas_h = canvas.height,
        "cover-fitting background"
    );
    cover_fit(decoded, canvas)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/background.rs"]
mod tests;
