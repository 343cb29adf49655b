use super::*;

/// Raster whose red channel encodes `x` and green encodes `y`.
fn coords_raster(w: u32, h: u32) -> Raster {
    let mut data = Vec::new();
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[x as u8, y as u8, 0, 255]);
        }
    }
    Raster::from_premul(w, h, data).unwrap()
}

#[test]
fn crop_extracts_exact_region() {
    let out = crop(coords_raster(4, 3), PixelRect::new(1, 1, 2, 2)).unwrap();
    assert_eq!((out.width(), out.height()), (2, 2));
    assert_eq!(out.pixel(0, 0), Some([1, 1, 0, 255]));
    assert_eq!(out.pixel(1, 1), Some([2, 2, 0, 255]));
}

#[test]
fn full_crop_is_identity() {
    let src = coords_raster(4, 3);
    let out = crop(src.clone(), PixelRect::new(0, 0, 4, 3)).unwrap();
    assert_eq!(out, src);
}

#[test]
fn out_of_bounds_is_a_crop_error() {
    for rect in [
        PixelRect::new(3, 0, 2, 1),
        PixelRect::new(0, 2, 1, 2),
        PixelRect::new(0, 0, 0, 1),
        PixelRect::new(0, 0, 1, 0),
        PixelRect::new(u32::MAX, 0, 1, 1),
    ] {
        let err = crop(coords_raster(4, 3), rect).unwrap_err();
        assert!(matches!(err, ImprintError::Crop(_)), "{rect:?}: {err}");
    }
}

#[test]
fn error_message_names_both_rectangles() {
    let err = crop(coords_raster(4, 3), PixelRect::new(2, 0, 5, 1)).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("5x1"));
    assert!(msg.contains("4x3"));
}
