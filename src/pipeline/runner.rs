use base64::{Engine as _, engine::general_purpose};

use crate::config::{ImprintOpts, JPEG_QUALITY, PublishPolicy};
use crate::fetch::ImageFetcher;
use crate::foundation::core::{Raster, Size};
use crate::foundation::error::{ImprintError, ImprintResult};
use crate::pipeline::background::{fetch_background, load_background};
use crate::pipeline::composite::{encode_jpeg, overlay};
use crate::pipeline::crop::crop;
use crate::pipeline::decode::decode_data_uri;
use crate::pipeline::mask::apply_mask;
use crate::pipeline::resize::resize;
use crate::publish::store::{AssetStore, NoStore, PublishOutcome};
use crate::request::model::CompositionRequest;
use crate::request::validate::{ValidatedRequest, validate};

/// Finished composite for one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositionResult {
    /// Encoded JPEG.
    pub jpeg: Vec<u8>,
    /// Output dimensions (the canvas size).
    pub size: Size,
    /// What happened to the upload.
    pub publish: PublishOutcome,
}

impl CompositionResult {
    /// Encoded length in bytes.
    pub fn byte_len(&self) -> usize {
        self.jpeg.len()
    }

    /// `data:image/jpeg;base64,...` form of the composite.
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:image/jpeg;base64,{}",
            general_purpose::STANDARD.encode(&self.jpeg)
        )
    }
}

/// Cut the user region out of the inline image: decode, crop, resize, mask.
pub fn prepare_user_region(req: &ValidatedRequest) -> ImprintResult<Raster> {
    let decoded = decode_data_uri(&req.user_data_url)?;
    if req.declared_user_size != decoded.size() && !req.declared_user_size.is_empty() {
        tracing::debug!(
            declared_w = req.declared_user_size.width,
            declared_h = req.declared_user_size.height,
            decoded_w = decoded.width(),
            decoded_h = decoded.height(),
            "declared user image size differs from decoded size"
        );
    }
    let cropped = crop(decoded, req.crop)?;
    let resized = resize(cropped, req.target.size())?;
    apply_mask(resized, &req.mask)
}

/// Overlay the user region on the background at the target origin and encode.
pub fn compose(background: Raster, region: &Raster, req: &ValidatedRequest) -> ImprintResult<Vec<u8>> {
    let merged = overlay(background, region, req.target.x, req.target.y);
    encode_jpeg(&merged, JPEG_QUALITY)
}

/// All CPU-bound stages, in order, once the background bytes are in hand.
pub fn render_with_background(bg_bytes: &[u8], req: &ValidatedRequest) -> ImprintResult<Vec<u8>> {
    let background = load_background(bg_bytes, &req.background_url, req.canvas)?;
    let region = prepare_user_region(req)?;
    compose(background, &region, req)
}

/// Composition pipeline with its injected collaborators.
///
/// Holds no per-request state, so one instance serves any number of concurrent requests.
#[derive(Clone, Debug)]
pub struct Pipeline<F, S = NoStore> {
    fetcher: F,
    store: Option<S>,
    opts: ImprintOpts,
}

impl<F: ImageFetcher> Pipeline<F, NoStore> {
    /// Pipeline that never publishes.
    pub fn new(fetcher: F, opts: ImprintOpts) -> Self {
        Self {
            fetcher,
            store: None,
            opts,
        }
    }
}

impl<F: ImageFetcher, S: AssetStore> Pipeline<F, S> {
    /// Publish every composite to `store`.
    pub fn with_store<S2: AssetStore>(self, store: S2) -> Pipeline<F, S2> {
        Pipeline {
            fetcher: self.fetcher,
            store: Some(store),
            opts: self.opts,
        }
    }

    /// Options this pipeline was built with.
    pub fn opts(&self) -> &ImprintOpts {
        &self.opts
    }

    /// Validate and run one request end to end.
    pub async fn run(&self, req: CompositionRequest) -> ImprintResult<CompositionResult> {
        tracing::debug!(request = ?req, "composition request received");
        let validated = validate(req, &self.opts)?;
        self.run_validated(validated).await
    }

    /// Run an already validated request.
    ///
    /// Dropping the returned future cancels whichever network call is in flight.
    #[tracing::instrument(
        skip_all,
        fields(template = req.meta.template.as_deref().unwrap_or("-"), mask = req.mask.kind())
    )]
    pub async fn run_validated(&self, req: ValidatedRequest) -> ImprintResult<CompositionResult> {
        let bg_bytes = fetch_background(&self.fetcher, &req.background_url).await?;

        let (jpeg, req) = tokio::task::spawn_blocking(move || {
            render_with_background(&bg_bytes, &req).map(|jpeg| (jpeg, req))
        })
        .await
        .map_err(|e| ImprintError::Other(anyhow::anyhow!("render task failed: {e}")))??;

        let publish = self.publish(&jpeg).await?;

        tracing::info!(
            template = req.meta.template.as_deref().unwrap_or("-"),
            render_size = ?req.meta.render_size,
            user_w = req.declared_user_size.width,
            user_h = req.declared_user_size.height,
            crop = ?req.crop,
            target = ?req.target,
            mask = req.mask.kind(),
            out_w = req.canvas.width,
            out_h = req.canvas.height,
            out_bytes = jpeg.len(),
            "render finished"
        );

        Ok(CompositionResult {
            jpeg,
            size: req.canvas,
            publish,
        })
    }

    async fn publish(&self, jpeg: &[u8]) -> ImprintResult<PublishOutcome> {
        let Some(store) = &self.store else {
            return Ok(PublishOutcome::Skipped);
        };
        match store.upload(jpeg).await {
            Ok(asset) => {
                tracing::info!(url = %asset.secure_url, bytes = asset.bytes, "composite published");
                Ok(PublishOutcome::Published(asset))
            }
            Err(e) => match self.opts.publish_policy {
                PublishPolicy::Required => Err(e),
                PublishPolicy::BestEffort => {
                    tracing::warn!(error = %e, "publish failed; returning composite anyway");
                    Ok(PublishOutcome::Failed {
                        message: e.to_string(),
                    })
                }
            },
        }
    }
}
