use super::*;
use crate::request::model::{BackgroundSpec, UserImageSpec};

fn request() -> CompositionRequest {
    CompositionRequest {
        background: BackgroundSpec {
            url: "https://cdn.example.com/bg.jpg".to_string(),
            width: 800,
            height: 600,
        },
        user_image: UserImageSpec {
            data_url: "data:image/png;base64,AAAA".to_string(),
            width: 400,
            height: 400,
        },
        crop: PixelRect::new(0, 0, 400, 400),
        target: PixelRect::new(200, 100, 200, 200),
        mask: None,
        meta: Meta::default(),
    }
}

fn vector(kind: &str) -> MaskSpec {
    MaskSpec {
        kind: kind.to_string(),
        path: Some("M0 0 L10 0 L10 10 Z".to_string()),
        view_box: Some("0 0 10 10".to_string()),
    }
}

fn expect_validation(req: CompositionRequest, needle: &str) {
    let err = validate(req, &ImprintOpts::default()).unwrap_err();
    assert!(matches!(err, ImprintError::Validation(_)), "{err}");
    assert!(err.to_string().contains(needle), "{err}");
}

#[test]
fn valid_request_passes_through() {
    let v = validate(request(), &ImprintOpts::default()).unwrap();
    assert_eq!(v.canvas, Size::new(800, 600));
    assert_eq!(v.target, PixelRect::new(200, 100, 200, 200));
    assert_eq!(v.declared_user_size, Size::new(400, 400));
    assert_eq!(v.mask, Mask::None);
}

#[test]
fn svg_and_vector_kinds_parse_to_the_same_mask() {
    let a = parse_mask(Some(&vector("svg"))).unwrap();
    let b = parse_mask(Some(&vector("Vector"))).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.kind(), "vector");
}

#[test]
fn none_kind_and_absent_mask_mean_no_mask() {
    assert_eq!(parse_mask(None).unwrap(), Mask::None);
    let spec = MaskSpec {
        kind: "none".to_string(),
        path: None,
        view_box: None,
    };
    assert_eq!(parse_mask(Some(&spec)).unwrap(), Mask::None);
}

#[test]
fn unknown_mask_kind_is_rejected() {
    let mut req = request();
    req.mask = Some(vector("raster"));
    expect_validation(req, "unsupported mask type 'raster'");
}

#[test]
fn vector_mask_needs_path_and_viewbox() {
    let mut req = request();
    let mut m = vector("vector");
    m.path = None;
    req.mask = Some(m);
    expect_validation(req, "needs a path");

    let mut req = request();
    let mut m = vector("vector");
    m.view_box = Some("0 0 0 0".to_string());
    req.mask = Some(m);
    expect_validation(req, "mask rejected");
}

#[test]
fn degenerate_geometry_is_rejected() {
    let mut req = request();
    req.background.width = 0;
    expect_validation(req, "background");

    let mut req = request();
    req.crop.height = 0;
    expect_validation(req, "crop");

    let mut req = request();
    req.target.width = 0;
    expect_validation(req, "target");

    let mut req = request();
    req.target.x = 800;
    expect_validation(req, "outside the 800x600 canvas");
}

#[test]
fn target_overflowing_right_edge_is_allowed() {
    let mut req = request();
    req.target = PixelRect::new(700, 500, 200, 200);
    assert!(validate(req, &ImprintOpts::default()).is_ok());
}

#[test]
fn oversized_canvas_is_rejected() {
    let mut req = request();
    req.background.width = 20_000;
    expect_validation(req, "exceeds");
}

#[test]
fn background_url_must_be_http() {
    let mut req = request();
    req.background.url = "file:///etc/passwd".to_string();
    expect_validation(req, "unsupported scheme 'file'");

    let mut req = request();
    req.background.url = "not a url".to_string();
    expect_validation(req, "invalid background url");
}

#[test]
fn user_image_must_be_a_data_uri() {
    let mut req = request();
    req.user_image.data_url = "https://example.com/me.png".to_string();
    expect_validation(req, "data: URI");
}
