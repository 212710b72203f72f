//! Response and error wrappers around the header collection.
use bytes::Bytes;

use crate::collection::NameValueMap;
use crate::log::{debug, warning};

/// Store response surface: status line data, the header collection, and the
/// raw payload.
#[derive(Clone, Debug)]
pub struct StoreResponse {
    status: u16,
    headers: NameValueMap,
    body: Bytes,
}

impl StoreResponse {
    pub fn new(status: u16, headers: NameValueMap, body: Bytes) -> Self {
        debug!("store response: status={status}, headers={}", headers.len());
        Self {
            status,
            headers,
            body,
        }
    }

    #[inline]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The one backing header collection.
    ///
    /// Every view of this response observes mutations done through
    /// [`headers_mut`][StoreResponse::headers_mut]; the accessor never
    /// copies.
    #[inline]
    pub fn headers(&self) -> &NameValueMap {
        &self.headers
    }

    #[inline]
    pub fn headers_mut(&mut self) -> &mut NameValueMap {
        &mut self.headers
    }

    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    #[inline]
    pub fn into_body(self) -> Bytes {
        self.body
    }
}

// ===== ClientError =====

/// Client-facing failure carrying the response headers of the failed call.
#[derive(Clone, Debug)]
pub struct ClientError {
    message: String,
    status: u16,
    headers: NameValueMap,
}

impl ClientError {
    pub fn new(message: impl Into<String>, status: u16) -> Self {
        Self::with_headers(message, status, NameValueMap::new())
    }

    pub fn with_headers(message: impl Into<String>, status: u16, headers: NameValueMap) -> Self {
        let message = message.into();
        warning!("client error: status={status}, {message}");
        Self {
            message,
            status,
            headers,
        }
    }

    #[inline]
    pub fn status(&self) -> u16 {
        self.status
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The headers of the failed response; same one-instance visibility
    /// contract as [`StoreResponse::headers`].
    #[inline]
    pub fn headers(&self) -> &NameValueMap {
        &self.headers
    }

    #[inline]
    pub fn headers_mut(&mut self) -> &mut NameValueMap {
        &mut self.headers
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "status {}: {}", self.status, self.message)
    }
}

impl std::error::Error for ClientError {}
