//! The HTTP seam: how the texture uploader obtains image bytes.
//!
//! The browser host implements [`ImageFetcher`] on top of `fetch`; tests
//! use an in-memory map. Only `GET` of a relative URL is needed.

use thiserror::Error;

/// URL prefix every image is served under.
pub const IMAGE_ROUTE: &str = "/images";

/// Errors produced while retrieving an image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server answered with a non-2xx status.
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// No response was obtained at all (network failure, CORS, aborted body).
    #[error("GET {url} failed: {reason}")]
    Network { url: String, reason: String },
}

#[cfg(test)]
impl FetchError {
    pub(crate) fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Network { .. } => None,
        }
    }
}

/// Retrieves the body of an HTTP `GET` as raw bytes.
///
/// Implementations must return [`FetchError::Status`] for any status
/// outside `200..=299` rather than handing back an error page body.
#[allow(async_fn_in_trait)]
pub trait ImageFetcher {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Builds the request URL for an image path: `/images/{path}`.
pub fn image_url(path: &str) -> String {
    format!("{IMAGE_ROUTE}/{}", path.trim_start_matches('/'))
}

/// Returns true for HTTP success statuses.
pub fn is_success(status: u16) -> bool {
    (200..=299).contains(&status)
}
