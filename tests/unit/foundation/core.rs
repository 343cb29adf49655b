use super::*;

#[test]
fn rect_containment_is_inclusive_of_far_edge() {
    let bounds = Size::new(10, 8);
    assert!(PixelRect::new(0, 0, 10, 8).fits_within(bounds));
    assert!(PixelRect::new(9, 7, 1, 1).fits_within(bounds));
    assert!(!PixelRect::new(9, 7, 2, 1).fits_within(bounds));
    assert!(!PixelRect::new(0, 0, 0, 1).fits_within(bounds));
}

#[test]
fn rect_containment_does_not_overflow() {
    let bounds = Size::new(u32::MAX, u32::MAX);
    assert!(!PixelRect::new(u32::MAX, 0, 2, 1).fits_within(bounds));
}

#[test]
fn from_premul_rejects_wrong_length() {
    assert!(Raster::from_premul(2, 2, vec![0; 15]).is_err());
    let r = Raster::from_premul(2, 2, vec![0; 16]).unwrap();
    assert_eq!(r.size(), Size::new(2, 2));
}

#[test]
fn straight_round_trip_keeps_opaque_pixels() {
    let img = image::RgbaImage::from_raw(2, 1, vec![10, 20, 30, 255, 100, 50, 200, 128]).unwrap();
    let r = Raster::from_straight(img);
    assert_eq!(r.pixel(0, 0), Some([10, 20, 30, 255]));
    assert_eq!(
        r.pixel(1, 0),
        Some([
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ])
    );
    let back = r.to_straight().unwrap();
    assert_eq!(back.get_pixel(0, 0).0, [10, 20, 30, 255]);
    let p = back.get_pixel(1, 0).0;
    assert!(p[0].abs_diff(100) <= 1 && p[1].abs_diff(50) <= 1 && p[2].abs_diff(200) <= 1);
}

#[test]
fn pixel_outside_is_none() {
    let r = Raster::transparent(3, 3);
    assert_eq!(r.pixel(3, 0), None);
    assert_eq!(r.pixel(0, 0), Some([0, 0, 0, 0]));
}

#[test]
fn to_straight_keeps_dimensions_and_clears_transparent_pixels() {
    let r = Raster::from_premul(3, 2, [0, 0, 0, 0].repeat(6)).unwrap();
    let img = r.to_straight().unwrap();
    assert_eq!(img.dimensions(), (3, 2));
    assert!(img.pixels().all(|p| p.0 == [0, 0, 0, 0]));

    let half = Raster::filled(1, 1, [64, 0, 0, 128]);
    assert_eq!(half.to_straight().unwrap().get_pixel(0, 0).0[3], 128);
}
