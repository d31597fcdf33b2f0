//! Fetch-and-decode with placeholder fallback.

use std::sync::Arc;

use image::RgbaImage;
use reqwest::Url;
use thiserror::Error;
use tracing::{debug, warn};

use super::http::{AsyncHttpClient, HttpError};
use super::placeholder::{placeholder_for_size, placeholder_message, render_placeholder};
use super::{DEFAULT_PLACEHOLDER_HEIGHT, DEFAULT_PLACEHOLDER_WIDTH};
use crate::poi::PoiImage;

/// Why a POI image could not be used.
///
/// The display text is what ends up on the placeholder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImageError {
    #[error("Error = {0}")]
    Network(#[from] HttpError),

    #[error("http response code = {0}")]
    Status(u16),

    #[error("image data is nil")]
    EmptyBody,

    #[error("image data is corrupt ({0})")]
    Corrupt(String),
}

/// Resolves POI images, substituting placeholders on failure.
#[derive(Clone)]
pub struct ImageResolver {
    client: Arc<dyn AsyncHttpClient>,
    placeholder_size: (u32, u32),
}

impl ImageResolver {
    /// Create a resolver using default-size placeholders.
    pub fn new(client: Arc<dyn AsyncHttpClient>) -> Self {
        Self {
            client,
            placeholder_size: (DEFAULT_PLACEHOLDER_WIDTH, DEFAULT_PLACEHOLDER_HEIGHT),
        }
    }

    /// Set the placeholder size.
    pub fn with_placeholder_size(mut self, width: u32, height: u32) -> Self {
        self.placeholder_size = (width, height);
        self
    }

    /// Download and decode the image at `url`.
    ///
    /// Success requires status 200 and bytes the `image` crate can decode.
    pub async fn fetch(&self, url: &Url) -> Result<RgbaImage, ImageError> {
        let response = self.client.get(url.as_str()).await?;

        if response.status != 200 {
            return Err(ImageError::Status(response.status));
        }
        if response.body.is_empty() {
            return Err(ImageError::EmptyBody);
        }

        let body = response.body;
        tokio::task::spawn_blocking(move || image::load_from_memory(&body))
            .await
            .map_err(|e| ImageError::Corrupt(e.to_string()))?
            .map(|decoded| decoded.to_rgba8())
            .map_err(|e| ImageError::Corrupt(e.to_string()))
    }

    /// Resolve the image for the POI named `name`.
    ///
    /// Never fails: any [`ImageError`] is turned into a placeholder whose
    /// message names the POI and the error.
    pub async fn resolve(&self, name: &str, url: &Url) -> PoiImage {
        match self.fetch(url).await {
            Ok(bitmap) => {
                debug!(poi = name, url = %url, "Image fetched");
                PoiImage::Fetched(Arc::new(bitmap))
            }
            Err(e) => {
                warn!(poi = name, url = %url, error = %e, "Image unavailable - using placeholder");
                let (width, height) = self.placeholder_size;
                let message = placeholder_message(name, url.as_str(), &e.to_string());
                let bitmap = match render_placeholder(width, height, &message) {
                    Ok(bitmap) => Arc::new(bitmap),
                    Err(e) => {
                        warn!(error = %e, "Placeholder text could not be drawn");
                        placeholder_for_size(width, height)
                    }
                };
                PoiImage::Placeholder { bitmap, message }
            }
        }
    }
}
