//! Cookie jar port: persistence of the last known status.

use palette_domain::cookie::Cookie;
use palette_domain::error::ConsoleError;

/// Stores cookies by name.
pub trait CookieJar {
    /// Store (or replace) a cookie.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Storage`] when the cookie cannot be persisted.
    fn set(&self, cookie: Cookie) -> Result<(), ConsoleError>;

    /// Look up a cookie that has not expired yet.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Storage`] when the jar cannot be read.
    fn get(&self, name: &str) -> Result<Option<Cookie>, ConsoleError>;
}

impl<T: CookieJar> CookieJar for std::sync::Arc<T> {
    fn set(&self, cookie: Cookie) -> Result<(), ConsoleError> {
        (**self).set(cookie)
    }

    fn get(&self, name: &str) -> Result<Option<Cookie>, ConsoleError> {
        (**self).get(name)
    }
}
