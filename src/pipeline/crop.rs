use crate::foundation::core::{PixelRect, Raster};
use crate::foundation::error::{ImprintError, ImprintResult};

/// Extract `rect` from `src`.
///
/// The rectangle must be non-empty and lie fully inside the source.
#[tracing::instrument(skip(src), fields(src_w = src.width(), src_h = src.height()))]
pub fn crop(src: Raster, rect: PixelRect) -> ImprintResult<Raster> {
    if !rect.fits_within(src.size()) {
        return Err(ImprintError::crop(format!(
            "crop rectangle x={} y={} {}x{} is outside the {}x{} source image",
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            src.width(),
            src.height()
        )));
    }
    if rect == PixelRect::new(0, 0, src.width(), src.height()) {
        return Ok(src);
    }

    let src_stride = src.width() as usize * 4;
    let row_len = rect.width as usize * 4;
    let mut out = Vec::with_capacity(row_len * rect.height as usize);
    let bytes = src.as_bytes();
    for y in rect.y..rect.y + rect.height {
        let start = y as usize * src_stride + rect.x as usize * 4;
        out.extend_from_slice(&bytes[start..start + row_len]);
    }
    Raster::from_premul(rect.width, rect.height, out)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/crop.rs"]
mod tests;
