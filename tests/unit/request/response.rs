use super::*;
use crate::foundation::core::Size;
use crate::publish::store::PublishedAsset;

fn result(publish: PublishOutcome) -> CompositionResult {
    CompositionResult {
        jpeg: vec![0xFF, 0xD8, 0xFF],
        size: Size::new(1, 1),
        publish,
    }
}

#[test]
fn success_inlines_jpeg_data_uri() {
    let resp = RenderResponse::from_result(&Ok(result(PublishOutcome::Skipped)));
    assert_eq!(resp.status_code(), 200);
    let v: serde_json::Value = serde_json::from_str(&resp.to_json().unwrap()).unwrap();
    assert_eq!(v["success"], true);
    assert_eq!(v["imageBase64"], "data:image/jpeg;base64,/9j/");
    assert!(v.get("publish").is_none());
    assert!(v.get("error").is_none());
}

#[test]
fn success_reports_publish_outcome_separately() {
    let ok = RenderResponse::success(&result(PublishOutcome::Published(PublishedAsset {
        secure_url: "https://res.example.com/a.jpg".to_string(),
        bytes: 3,
    })));
    let p = ok.publish.unwrap();
    assert_eq!(p.status, "published");
    assert_eq!(p.url.as_deref(), Some("https://res.example.com/a.jpg"));

    let failed = RenderResponse::success(&result(PublishOutcome::Failed {
        message: "publish error: quota".to_string(),
    }));
    assert!(failed.success);
    let p = failed.publish.unwrap();
    assert_eq!(p.status, "failed");
    assert_eq!(p.error.as_deref(), Some("publish error: quota"));
}

#[test]
fn failure_carries_message_code_and_status() {
    let resp = RenderResponse::failure(&ImprintError::fetch("cannot load image: http://x/a.png"));
    assert_eq!(resp.status_code(), 500);
    let v: serde_json::Value = serde_json::from_str(&resp.to_json().unwrap()).unwrap();
    assert_eq!(v["success"], false);
    assert_eq!(v["code"], "fetch");
    assert!(v["error"].as_str().unwrap().contains("http://x/a.png"));
    assert!(v.get("imageBase64").is_none());

    let bad = RenderResponse::failure(&ImprintError::validation("nope"));
    assert_eq!(bad.status_code(), 400);
}
