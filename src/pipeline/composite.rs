use image::ImageEncoder;
use image::codecs::jpeg::JpegEncoder;

use crate::foundation::core::{Raster, mul_div255};
use crate::foundation::error::{ImprintError, ImprintResult};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let inv = 255u16 - u16::from(sa);
            let mut out = [0u8; 4];
            for i in 0..4 {
                out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
            }
            out
        }
    }
}

/// Blend `src` over `dst` with `src`'s top-left at `(x, y)`.
///
/// Whatever falls outside `dst` is clipped.
#[tracing::instrument(skip(dst, src), fields(src_w = src.width(), src_h = src.height()))]
pub fn overlay(mut dst: Raster, src: &Raster, x: u32, y: u32) -> Raster {
    let x0 = x.min(dst.width());
    let y0 = y.min(dst.height());
    let x1 = x.saturating_add(src.width()).min(dst.width());
    let y1 = y.saturating_add(src.height()).min(dst.height());
    if x0 >= x1 || y0 >= y1 {
        tracing::warn!(x, y, "overlay lies entirely outside the canvas");
        return dst;
    }

    let dst_w = dst.width() as usize;
    let src_w = src.width() as usize;
    let span = (x1 - x0) as usize * 4;
    let src_bytes = src.as_bytes();
    let dst_bytes = dst.as_bytes_mut();
    for row in y0..y1 {
        let d_start = (row as usize * dst_w + x0 as usize) * 4;
        let s_start = ((row - y) as usize * src_w) * 4;
        let d_row = &mut dst_bytes[d_start..d_start + span];
        let s_row = &src_bytes[s_start..s_start + span];
        for (d, s) in d_row.chunks_exact_mut(4).zip(s_row.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
    dst
}

/// Flatten over black and encode as baseline JPEG.
pub fn encode_jpeg(raster: &Raster, quality: u8) -> ImprintResult<Vec<u8>> {
    if raster.size().is_empty() {
        return Err(ImprintError::composite("cannot encode an empty image"));
    }
    // Premultiplied colour with alpha dropped is exactly "over black".
    let rgb: Vec<u8> = raster
        .as_bytes()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .write_image(
            &rgb,
            raster.width(),
            raster.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| ImprintError::composite(format!("jpeg encode failed: {e}")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/composite.rs"]
mod tests;
