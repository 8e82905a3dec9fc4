//! Volatile cookie jar (session cookies only).

use std::collections::BTreeMap;
use std::sync::Mutex;

use palette_app::ports::CookieJar;
use palette_domain::cookie::Cookie;
use palette_domain::error::ConsoleError;
use palette_domain::time::now;

use crate::error::CookieError;

/// Cookie jar kept in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    cookies: Mutex<BTreeMap<String, Cookie>>,
}

impl MemoryCookieJar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieJar for MemoryCookieJar {
    fn set(&self, cookie: Cookie) -> Result<(), ConsoleError> {
        let mut cookies = self.cookies.lock().map_err(|_| CookieError::Poisoned)?;
        cookies.insert(cookie.name.clone(), cookie);
        Ok(())
    }

    fn get(&self, name: &str) -> Result<Option<Cookie>, ConsoleError> {
        let cookies = self.cookies.lock().map_err(|_| CookieError::Poisoned)?;
        Ok(cookies
            .get(name)
            .filter(|cookie| !cookie.is_expired(now()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use palette_domain::cookie::STATUS_TEXT_COOKIE;

    #[test]
    fn should_return_stored_cookie() {
        let jar = MemoryCookieJar::new();
        jar.set(Cookie::new(STATUS_TEXT_COOKIE, "Running")).unwrap();
        let cookie = jar.get(STATUS_TEXT_COOKIE).unwrap().unwrap();
        assert_eq!(cookie.value(), "Running");
    }

    #[test]
    fn should_return_none_for_unknown_cookie() {
        let jar = MemoryCookieJar::new();
        assert!(jar.get("missing").unwrap().is_none());
    }

    #[test]
    fn should_hide_expired_cookie() {
        let jar = MemoryCookieJar::new();
        let mut cookie = Cookie::new(STATUS_TEXT_COOKIE, "Running");
        cookie.expires = Some(now() - Duration::days(1));
        jar.set(cookie).unwrap();
        assert!(jar.get(STATUS_TEXT_COOKIE).unwrap().is_none());
    }
}
