use std::future::Future;
use std::time::Duration;

use crate::config::ImprintOpts;
use crate::foundation::error::{ImprintError, ImprintResult};

/// Source of encoded background images.
///
/// The pipeline only ever calls this once per request; implementations must name the URL in
/// every error they return.
pub trait ImageFetcher: Send + Sync {
    /// Fetch the raw bytes behind `url`.
    fn fetch(&self, url: &str) -> impl Future<Output = ImprintResult<Vec<u8>>> + Send;
}

/// [`ImageFetcher`] over HTTP(S) with a per-call timeout and a body size cap.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
    max_bytes: u64,
}

impl HttpFetcher {
    /// Build a fetcher from process options.
    pub fn new(opts: &ImprintOpts) -> ImprintResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(opts.fetch_timeout)
            .build()
            .map_err(|e| ImprintError::fetch(format!("cannot build HTTP client: {e}")))?;
        Ok(Self::with_client(client, opts))
    }

    /// Use a caller-configured client; `opts` still supplies the timeout and size cap.
    pub fn with_client(client: reqwest::Client, opts: &ImprintOpts) -> Self {
        Self {
            client,
            timeout: opts.fetch_timeout,
            max_bytes: opts.max_background_bytes,
        }
    }

    fn map_reqwest_error(&self, e: reqwest::Error, url: &str) -> ImprintError {
        if e.is_timeout() {
            ImprintError::fetch(format!(
                "cannot load image: {url} (timed out after {}s)",
                self.timeout.as_secs_f32()
            ))
        } else if e.is_connect() {
            ImprintError::fetch(format!("cannot load image: {url} (connection failed: {e})"))
        } else {
            ImprintError::fetch(format!("cannot load image: {url} ({e})"))
        }
    }

    fn too_large(&self, url: &str) -> ImprintError {
        ImprintError::fetch(format!(
            "cannot load image: {url} (body exceeds {} bytes)",
            self.max_bytes
        ))
    }
}

impl ImageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> ImprintResult<Vec<u8>> {
        tracing::debug!(url, "fetching background");
        let mut response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImprintError::fetch(format!(
                "cannot load image: {url} (HTTP {})",
                status.as_u16()
            )));
        }
        if response
            .content_length()
            .is_some_and(|len| len > self.max_bytes)
        {
            return Err(self.too_large(url));
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| self.map_reqwest_error(e, url))?
        {
            if (body.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(self.too_large(url));
            }
            body.extend_from_slice(&chunk);
        }
        tracing::debug!(url, bytes = body.len(), "background fetched");
        Ok(body)
    }
}

#[cfg(test)]
#[path = "../tests/unit/fetch.rs"]
mod tests;
