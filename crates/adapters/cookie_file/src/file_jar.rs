//! Cookie jar persisted as a JSON array of cookies.
//!
//! The whole file is rewritten on every `set`; the jar only ever holds a
//! couple of small cookies.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use palette_app::ports::CookieJar;
use palette_domain::cookie::Cookie;
use palette_domain::error::ConsoleError;
use palette_domain::time::now;

use crate::error::CookieError;

/// Cookie jar backed by a file on disk.
#[derive(Debug)]
pub struct FileCookieJar {
    path: PathBuf,
    cookies: Mutex<BTreeMap<String, Cookie>>,
}

impl FileCookieJar {
    /// Open the jar at `path`, loading any cookie stored by a previous run.
    ///
    /// A missing file is an empty jar; it is created on the first `set`.
    /// Cookies that expired in the meantime are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CookieError`] if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CookieError> {
        let path = path.into();
        let cookies = load(&path)?;
        tracing::debug!(path = %path.display(), count = cookies.len(), "cookie jar opened");
        Ok(Self {
            path,
            cookies: Mutex::new(cookies),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, cookies: &BTreeMap<String, Cookie>) -> Result<(), CookieError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let list: Vec<&Cookie> = cookies.values().collect();
        let content = serde_json::to_string_pretty(&list)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

fn load(path: &Path) -> Result<BTreeMap<String, Cookie>, CookieError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(err) => return Err(CookieError::Io(err)),
    };
    let list: Vec<Cookie> = serde_json::from_str(&content)?;
    let now = now();
    Ok(list
        .into_iter()
        .filter(|cookie| !cookie.is_expired(now))
        .map(|cookie| (cookie.name.clone(), cookie))
        .collect())
}

impl CookieJar for FileCookieJar {
    fn set(&self, cookie: Cookie) -> Result<(), ConsoleError> {
        let mut cookies = self.cookies.lock().map_err(|_| CookieError::Poisoned)?;
        tracing::trace!(%cookie, "storing cookie");
        let mut updated = cookies.clone();
        updated.insert(cookie.name.clone(), cookie);
        self.write(&updated)?;
        *cookies = updated;
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
