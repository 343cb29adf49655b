use super::*;

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [0, 0, 0, 0];
    assert_eq!(over(dst, src), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_half_alpha_blends() {
    let dst = [0, 0, 255, 255];
    let src = [128, 0, 0, 128];
    assert_eq!(over(dst, src), [128, 0, 127, 255]);
}

#[test]
fn overlay_places_at_offset() {
    let bg = Raster::filled(6, 4, [0, 0, 255, 255]);
    let fg = Raster::filled(2, 2, [255, 0, 0, 255]);
    let out = overlay(bg, &fg, 3, 1);
    assert_eq!(out.pixel(2, 1), Some([0, 0, 255, 255]));
    assert_eq!(out.pixel(3, 1), Some([255, 0, 0, 255]));
    assert_eq!(out.pixel(4, 2), Some([255, 0, 0, 255]));
    assert_eq!(out.pixel(5, 2), Some([0, 0, 255, 255]));
    assert_eq!(out.pixel(3, 3), Some([0, 0, 255, 255]));
}

#[test]
fn overlay_clips_at_canvas_edge() {
    let bg = Raster::filled(4, 4, [0, 0, 255, 255]);
    let fg = Raster::filled(3, 3, [255, 0, 0, 255]);
    let out = overlay(bg, &fg, 2, 2);
    assert_eq!(out.size().width, 4);
    assert_eq!(out.pixel(3, 3), Some([255, 0, 0, 255]));
    assert_eq!(out.pixel(1, 1), Some([0, 0, 255, 255]));
}

#[test]
fn overlay_entirely_outside_is_noop() {
    let bg = Raster::filled(4, 4, [0, 0, 255, 255]);
    let fg = Raster::filled(3, 3, [255, 0, 0, 255]);
    assert_eq!(overlay(bg.clone(), &fg, 4, 0), bg);
}

#[test]
fn transparent_overlay_pixels_leave_background() {
    let bg = Raster::filled(2, 1, [0, 0, 255, 255]);
    let fg = Raster::from_premul(2, 1, vec![255, 0, 0, 255, 0, 0, 0, 0]).unwrap();
    let out = overlay(bg, &fg, 0, 0);
    assert_eq!(out.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(out.pixel(1, 0), Some([0, 0, 255, 255]));
}

#[test]
fn jpeg_has_expected_dimensions_and_magic() {
    let bytes = encode_jpeg(&Raster::filled(16, 8, [40, 80, 120, 255]), 92).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (16, 8));
    let p = decoded.get_pixel(8, 4).0;
    assert!(p[0].abs_diff(40) <= 3 && p[1].abs_diff(80) <= 3 && p[2].abs_diff(120) <= 3);
}

#[test]
fn jpeg_flattens_transparency_over_black() {
    let bytes = encode_jpeg(&Raster::transparent(8, 8), 92).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
    assert!(decoded.pixels().all(|p| p.0.iter().all(|&c| c <= 2)));
}
