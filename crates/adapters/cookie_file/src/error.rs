//! Cookie adapter error types.

use palette_domain::error::ConsoleError;

/// Errors specific to the cookie jar adapters.
#[derive(Debug, thiserror::Error)]
pub enum CookieError {
    /// The cookie file could not be read or written.
    #[error("cookie file I/O failed")]
    Io(#[from] std::io::Error),

    /// The cookie file does not hold a valid cookie list.
    #[error("failed to parse cookie file")]
    Json(#[from] serde_json::Error),

    /// The jar lock was poisoned by a panicking writer.
    #[error("cookie jar lock poisoned")]
    Poisoned,
}

impl From<CookieError> for ConsoleError {
    fn from(err: CookieError) -> Self {
        Self::Storage(Box::new(err))
    }
}
