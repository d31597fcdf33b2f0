//! Image resolution for points of interest.
//!
//! Every POI carries an image URL. Before a POI is published its image is
//! fetched over HTTP and decoded; on any failure a placeholder bitmap is
//! synthesized instead, carrying the reason in its message so the problem
//! is visible to the user rather than silently dropped.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use trailhistory::imagery::{AsyncReqwestClient, ImageResolver};
//!
//! let client = Arc::new(AsyncReqwestClient::new()?);
//! let resolver = ImageResolver::new(client);
//! let image = resolver.resolve("Settlers Cemetery", &url).await;
//! ```

mod http;
mod placeholder;
mod resolver;

pub use http::{
    AsyncHttpClient, AsyncReqwestClient, HttpError, HttpFuture, HttpResponse, DEFAULT_TIMEOUT_SECS,
};
pub use placeholder::{
    default_placeholder, generate_placeholder, placeholder_message, render_placeholder,
    PlaceholderError, DEFAULT_PLACEHOLDER_HEIGHT, DEFAULT_PLACEHOLDER_WIDTH,
};
pub use resolver::{ImageError, ImageResolver};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
