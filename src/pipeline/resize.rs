use image::imageops::{self, FilterType};

use crate::foundation::core::{PixelRect, Raster, Size};
use crate::foundation::error::{ImprintError, ImprintResult};
use crate::pipeline::crop::crop;

/// Resampling filter used for every scale operation.
pub const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

/// Scale `src` to exactly `target`, ignoring aspect ratio.
#[tracing::instrument(skip(src), fields(src_w = src.width(), src_h = src.height()))]
pub fn resize(src: Raster, target: Size) -> ImprintResult<Raster> {
    if target.is_empty() {
        return Err(ImprintError::resize(format!(
            "resize target must be positive, got {}x{}",
            target.width, target.height
        )));
    }
    if src.size().is_empty() {
        return Err(ImprintError::resize("cannot resize an empty image"));
    }
    if src.size() == target {
        return Ok(src);
    }

    let buf = src.into_image_buffer()?;
    let mut scaled = imageops::resize(&buf, target.width, target.height, RESAMPLE_FILTER);
    // Lanczos ringing can push a premultiplied channel above its alpha.
    for px in scaled.pixels_mut() {
        let a = px.0[3];
        for c in &mut px.0[..3] {
            *c = (*c).min(a);
        }
    }
    Ok(Raster::from_image_buffer(scaled))
}

/// Fill `target` while preserving aspect ratio: center-crop `src` to the target aspect, then
/// scale.
///
/// No intermediate buffer is larger than the source or the target.
#[tracing::instrument(skip(src), fields(src_w = src.width(), src_h = src.height()))]
pub fn cover_fit(src: Raster, target: Size) -> ImprintResult<Raster> {
    if target.is_empty() {
        return Err(ImprintError::resize(format!(
            "cover target must be positive, got {}x{}",
            target.width, target.height
        )));
    }
    let rect = cover_crop_rect(src.size(), target)?;
    let cropped =
        crop(src, rect).map_err(|e| ImprintError::resize(format!("cover crop failed: {e}")))?;
    resize(cropped, target)
}

/// Largest centered region of `src` with the aspect ratio of `target`.
pub fn cover_crop_rect(src: Size, target: Size) -> ImprintResult<PixelRect> {
    if src.is_empty() {
        return Err(ImprintError::resize("cannot cover-fit an empty image"));
    }
    if target.is_empty() {
        return Err(ImprintError::resize(format!(
            "cover target must be positive, got {}x{}",
            target.width, target.height
        )));
    }
    let (sw, sh) = (u128::from(src.width), u128::from(src.height));
    let (tw, th) = (u128::from(target.width), u128::from(target.height));

    let (w, h) = if sw * th > sh * tw {
        // Wider than the target: keep full height.
        (round_div(sh * tw, th).clamp(1, sw), sh)
    } else {
        (sw, round_div(sw * th, tw).clamp(1, sh))
    };
    // Both sides are clamped to the source, so they fit in u32.
    let (w, h) = (w as u32, h as u32);
    Ok(PixelRect::new(
        (src.width - w) / 2,
        (src.height - h) / 2,
        w,
        h,
    ))
}

fn round_div(num: u128, den: u128) -> u128 {
    (2 * num + den) / (2 * den)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/resize.rs"]
mod tests;
