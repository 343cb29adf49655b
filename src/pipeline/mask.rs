use std::fmt;

use kurbo::BezPath;

use crate::foundation::core::{Raster, Size, mul_div255};
use crate::foundation::error::{ImprintError, ImprintResult};

/// Silhouette applied to the resized user region.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Mask {
    /// Pass the region through unchanged.
    #[default]
    None,
    /// Keep only the pixels inside a vector path.
    Vector(VectorMask),
}

impl Mask {
    /// Kind name used in logs and on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Vector(_) => "vector",
        }
    }
}

/// Coordinate space a mask path is authored in (`min-x min-y width height`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBox {
    /// Left edge.
    pub min_x: f64,
    /// Top edge.
    pub min_y: f64,
    /// Width, strictly positive.
    pub width: f64,
    /// Height, strictly positive.
    pub height: f64,
}

impl ViewBox {
    /// Parse the SVG `viewBox` attribute syntax: four numbers separated by whitespace and/or
    /// commas.
    pub fn parse(s: &str) -> ImprintResult<Self> {
        let nums = s
            .split(|c: char| c.is_ascii_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(|t| {
                t.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| ImprintError::mask(format!("viewBox has a bad number '{t}'")))
            })
            .collect::<ImprintResult<Vec<f64>>>()?;
        let Ok([min_x, min_y, width, height]) = <[f64; 4]>::try_from(nums.as_slice()) else {
            return Err(ImprintError::mask(format!(
                "viewBox needs four numbers, got '{s}'"
            )));
        };
        if width <= 0.0 || height <= 0.0 {
            return Err(ImprintError::mask(format!(
                "viewBox width and height must be positive, got '{s}'"
            )));
        }
        Ok(Self {
            min_x,
            min_y,
            width,
            height,
        })
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.min_x, self.min_y, self.width, self.height
        )
    }
}

/// Parsed vector mask: a filled path in view-box coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorMask {
    /// Shape outline.
    pub path: BezPath,
    /// Coordinate space of `path`.
    pub view_box: ViewBox,
}

impl VectorMask {
    /// Parse path data (SVG path syntax) and a view-box string.
    pub fn parse(path_d: &str, view_box: &str) -> ImprintResult<Self> {
        let path = BezPath::from_svg(path_d.trim())
            .map_err(|e| ImprintError::mask(format!("invalid mask path: {e}")))?;
        if path.elements().is_empty() {
            return Err(ImprintError::mask("mask path is empty"));
        }
        Ok(Self {
            path,
            view_box: ViewBox::parse(view_box)?,
        })
    }

    /// Standalone SVG document drawing the path in white on a transparent `size` canvas.
    ///
    /// The view-box maps onto the canvas with SVG's default `xMidYMid meet`.
    pub fn to_svg_document(&self, size: Size) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="{vb}"><path d="{d}" fill="white"/></svg>"#,
            w = size.width,
            h = size.height,
            vb = self.view_box,
            d = self.path.to_svg(),
        )
    }

    /// Rasterize to one coverage byte per pixel (0 = outside, 255 = inside).
    pub fn rasterize_alpha(&self, size: Size) -> ImprintResult<Vec<u8>> {
        if size.is_empty() {
            return Err(ImprintError::mask("mask canvas must be non-empty"));
        }
        let doc = self.to_svg_document(size);
        let tree = usvg::Tree::from_str(&doc, &usvg::Options::default())
            .map_err(|e| ImprintError::mask(format!("cannot build mask document: {e}")))?;
        let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width, size.height)
            .ok_or_else(|| ImprintError::mask("failed to allocate mask pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );
        Ok(pixmap.data().chunks_exact(4).map(|px| px[3]).collect())
    }
}

/// Apply `mask` to `src`; [`Mask::None`] passes `src` through untouched.
#[tracing::instrument(skip(src, mask), fields(kind = mask.kind(), w = src.width(), h = src.height()))]
pub fn apply_mask(src: Raster, mask: &Mask) -> ImprintResult<Raster> {
    match mask {
        Mask::None => Ok(src),
        Mask::Vector(vector) => {
            let alpha = vector.rasterize_alpha(src.size())?;
            dest_in(src, &alpha)
        }
    }
}

/// Destination-in: keep `dst` colour, scale its coverage by `alpha`.
///
/// On premultiplied pixels that is a uniform multiply of all four channels.
pub fn dest_in(mut dst: Raster, alpha: &[u8]) -> ImprintResult<Raster> {
    let px_count = dst.width() as usize * dst.height() as usize;
    if alpha.len() != px_count {
        return Err(ImprintError::mask(format!(
            "mask has {} pixels, image has {px_count}",
            alpha.len()
        )));
    }
    for (px, &a) in dst.as_bytes_mut().chunks_exact_mut(4).zip(alpha) {
        match a {
            255 => {}
            0 => px.fill(0),
            _ => {
                for c in px.iter_mut() {
                    *c = mul_div255(u16::from(*c), u16::from(a));
                }
            }
        }
    }
    Ok(dst)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/mask.rs"]
mod tests;
