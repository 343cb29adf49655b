//! imprint composites a user-supplied image onto a remote background and encodes the result
//! as JPEG, optionally publishing it to an asset store.
//!
//! # Pipeline overview
//!
//! 1. **Validate**: `CompositionRequest -> ValidatedRequest` (geometry, URL, mask kind)
//! 2. **Background**: fetch the URL, decode, cover-fit onto the canvas
//! 3. **Decode**: inline `data:` URI to pixels
//! 4. **Crop** then **Resize** the user image to the target rectangle
//! 5. **Mask** (optional): destination-in with a rasterized vector path
//! 6. **Composite**: source-over at the target origin, JPEG at quality [`JPEG_QUALITY`]
//! 7. **Publish** (optional): upload through an [`AssetStore`]
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Owned buffers**: each stage consumes its input [`Raster`] and returns a new one.
//! - **I/O at the edges**: only the fetch and the upload touch the network; both are injected
//!   ([`ImageFetcher`], [`AssetStore`]) and carry timeouts.
//! - **Premultiplied RGBA8** between stages.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod fetch;
mod foundation;
mod pipeline;
mod publish;
mod request;

pub use config::{DEFAULT_PUBLISH_FOLDER, ImprintOpts, JPEG_QUALITY, PublishPolicy};
pub use fetch::{HttpFetcher, ImageFetcher};
pub use foundation::core::{PixelRect, Raster, Size};
pub use foundation::error::{ImprintError, ImprintResult};
pub use pipeline::background::{fetch_background, load_background};
pub use pipeline::composite::{PremulRgba8, encode_jpeg, over, overlay};
pub use pipeline::crop::crop;
pub use pipeline::decode::{decode_data_uri, decode_image_bytes, split_data_uri};
pub use pipeline::mask::{Mask, VectorMask, ViewBox, apply_mask, dest_in};
pub use pipeline::resize::{RESAMPLE_FILTER, cover_crop_rect, cover_fit, resize};
pub use pipeline::runner::{
    CompositionResult, Pipeline, compose, prepare_user_region, render_with_background,
};
pub use publish::cloudinary::{
    CLOUDINARY_URL_ENV, CloudinaryConfig, CloudinaryStore, sign_params,
};
pub use publish::store::{AssetStore, NoStore, PublishOutcome, PublishedAsset};
pub use request::model::{BackgroundSpec, CompositionRequest, MaskSpec, Meta, UserImageSpec};
pub use request::response::{PublishStatus, RenderResponse};
pub use request::validate::{ValidatedRequest, parse_mask, validate};
