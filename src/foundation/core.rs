use crate::foundation::error::{ImprintError, ImprintResult};

/// Width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Build a size from its two dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `true` when either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis-aligned pixel rectangle (top-left origin, exclusive right/bottom edge).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Build a rectangle from origin and size.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Size of the rectangle.
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// `true` when the rectangle is non-empty and lies fully inside `bounds`.
    pub fn fits_within(self, bounds: Size) -> bool {
        if self.width == 0 || self.height == 0 {
            return false;
        }
        let right = u64::from(self.x) + u64::from(self.width);
        let bottom = u64::from(self.y) + u64::from(self.height);
        right <= u64::from(bounds.width) && bottom <= u64::from(bounds.height)
    }
}

/// Owned raster buffer flowing between pipeline stages.
///
/// Pixels are row-major, tightly packed, premultiplied RGBA8. Each stage takes a `Raster` by
/// value and returns a new one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    rgba8_premul: Vec<u8>,
}

impl Raster {
    /// Wrap premultiplied RGBA8 bytes.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> ImprintResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(4))
            .ok_or_else(|| ImprintError::validation("raster dimensions overflow"))?;
        if rgba8_premul.len() != expected {
            return Err(ImprintError::validation(format!(
                "raster buffer has {} bytes, expected {expected} for {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul,
        })
    }

    /// Convert a straight-alpha RGBA image into a premultiplied raster.
    pub fn from_straight(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let mut rgba8_premul = img.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);
        Self {
            width,
            height,
            rgba8_premul,
        }
    }

    /// Fully transparent raster.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba8_premul: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Raster filled with one premultiplied colour.
    pub fn filled(width: u32, height: u32, px: [u8; 4]) -> Self {
        Self {
            width,
            height,
            rgba8_premul: px.repeat(width as usize * height as usize),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Premultiplied pixel bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.rgba8_premul
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.rgba8_premul
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.rgba8_premul[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Reinterpret as an `image` buffer for resampling; channel values stay premultiplied.
    pub(crate) fn into_image_buffer(self) -> ImprintResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.rgba8_premul)
            .ok_or_else(|| ImprintError::Other(anyhow::anyhow!("raster buffer does not match its size")))
    }

    /// Inverse of [`Raster::into_image_buffer`].
    pub(crate) fn from_image_buffer(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            rgba8_premul: img.into_raw(),
        }
    }

    /// Straight-alpha copy, suitable for encoders that expect unassociated alpha.
    pub fn to_straight(&self) -> ImprintResult<image::RgbaImage> {
        let mut img = self.clone().into_image_buffer()?;
        unpremultiply_rgba8_in_place(&mut img);
        Ok(img)
    }
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u32 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// `x * y / 255`, rounded.
pub(crate) fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
