//! Cookie jar shared by the HTTP client, the CSRF lookup and the consent banner

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use cookie::time::{Duration, OffsetDateTime};
use cookie::Cookie;
use reqwest::header::HeaderValue;
use reqwest::Url;

use crate::error::Result;

type Cookies = BTreeMap<String, String>;

/// JSON file backing a jar
///
/// Every snapshot carries the generation it was taken at; a write never
/// replaces a newer one, so writes finishing out of order are harmless.
#[derive(Debug)]
struct CookieFile {
    path: PathBuf,
    written: Mutex<u64>,
}

impl CookieFile {
    fn store(&self, generation: u64, cookies: &Cookies) -> Result<()> {
        let mut written = self.written.lock().unwrap_or_else(|e| e.into_inner());
        if generation <= *written {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(cookies)?)?;
        *written = generation;
        Ok(())
    }
}

/// Name/value cookie store, optionally persisted as JSON
///
/// The client talks to a single backend, so cookies are not scoped by
/// domain or path.
#[derive(Debug, Default)]
pub struct CookieJar {
    cookies: RwLock<Cookies>,
    generation: AtomicU64,
    file: Option<Arc<CookieFile>>,
}

impl CookieJar {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens a jar backed by `path`, loading it if the file already exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let cookies: Cookies = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!("Cookie jar aperto: {:?} ({} cookie)", path, cookies.len());

        Ok(Self {
            cookies: RwLock::new(cookies),
            generation: AtomicU64::new(0),
            file: Some(Arc::new(CookieFile {
                path,
                written: Mutex::new(0),
            })),
        })
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.read().get(name).cloned()
    }

    /// Stores a cookie and persists the jar before returning
    pub fn put(&self, name: &str, value: &str) -> Result<()> {
        let changed = self.modify(|cookies| {
            cookies.insert(name.to_string(), value.to_string());
            true
        });
        self.store_now(changed)
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        let changed = self.modify(|cookies| cookies.remove(name).is_some());
        self.store_now(changed)
    }

    /// Writes the current content to the backing file, if any
    pub fn flush(&self) -> Result<()> {
        let Some(file) = &self.file else {
            return Ok(());
        };
        let (generation, snapshot) = {
            let cookies = self.read();
            (self.next_generation(), cookies.clone())
        };
        file.store(generation, &snapshot)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Applies `change` under the write lock; returns the new snapshot when it changed something
    fn modify(&self, change: impl FnOnce(&mut Cookies) -> bool) -> Option<(u64, Cookies)> {
        let mut cookies = self.write();
        if change(&mut cookies) {
            Some((self.next_generation(), cookies.clone()))
        } else {
            None
        }
    }

    fn store_now(&self, changed: Option<(u64, Cookies)>) -> Result<()> {
        match (&self.file, changed) {
            (Some(file), Some((generation, snapshot))) => file.store(generation, &snapshot),
            _ => Ok(()),
        }
    }

    /// Persists off the async worker when called inside a tokio runtime
    fn store_in_background(&self, generation: u64, snapshot: Cookies) {
        let Some(file) = self.file.clone() else {
            return;
        };

        let write = move || {
            if let Err(e) = file.store(generation, &snapshot) {
                tracing::warn!("Impossibile salvare i cookie: {}", e);
            }
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(write);
            }
            Err(_) => write(),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Cookies> {
        self.cookies.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Cookies> {
        self.cookies.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Parses a `Set-Cookie` header into name, value and whether it deletes the cookie
///
/// `Max-Age` wins over `Expires`. A zero or negative max age, or an expiry
/// date already past, is a deletion.
fn parse_set_cookie(header: &str) -> Option<(String, String, bool)> {
    let cookie = Cookie::parse(header).ok()?;
    if cookie.name().is_empty() {
        return None;
    }

    let expired = match cookie.max_age() {
        Some(age) => age <= Duration::ZERO,
        None => cookie
            .expires_datetime()
            .map(|at| at <= OffsetDateTime::now_utc())
            .unwrap_or(false),
    };

    Some((
        cookie.name().to_string(),
        cookie.value_trimmed().to_string(),
        expired,
    ))
}

impl reqwest::cookie::CookieStore for CookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, _url: &Url) {
        let parsed: Vec<_> = cookie_headers
            .filter_map(|header| header.to_str().ok().and_then(parse_set_cookie))
            .collect();
        if parsed.is_empty() {
            return;
        }

        let changed = self.modify(|cookies| {
            let mut changed = false;
            for (name, value, expired) in parsed {
                if expired {
                    changed |= cookies.remove(&name).is_some();
                } else if cookies.get(&name) != Some(&value) {
                    cookies.insert(name, value);
                    changed = true;
                }
            }
            changed
        });

        if let Some((generation, snapshot)) = changed {
            self.store_in_background(generation, snapshot);
        }
    }

    fn cookies(&self, _url: &Url) -> Option<HeaderValue> {
        let cookies = self.read();
        if cookies.is_empty() {
            return None;
        }
        let header = cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");
        HeaderValue::from_str(&header).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::cookie::CookieStore;

    #[test]
    fn test_parse_set_cookie() {
        assert_eq!(
            parse_set_cookie("_xsrf=2|abc|123; Path=/"),
            Some(("_xsrf".to_string(), "2|abc|123".to_string(), false))
        );
        assert_eq!(
            parse_set_cookie("user=\"x\"; Max-Age=0"),
            Some(("user".to_string(), "x".to_string(), true))
        );
        assert_eq!(parse_set_cookie("garbage"), None);
    }

    #[test]
    fn test_expiry_attributes() {
        let (_, _, expired) =
            parse_set_cookie("user=\"\"; expires=Sat, 01 Jan 2000 00:00:00 GMT; Path=/").unwrap();
        assert!(expired);

        let (_, _, expired) = parse_set_cookie("user=abc; Max-Age=-1").unwrap();
        assert!(expired);

        let (_, value, expired) =
            parse_set_cookie("user=abc; expires=Fri, 01 Jan 2100 00:00:00 GMT").unwrap();
        assert_eq!(value, "abc");
        assert!(!expired);

        // Max-Age ha la precedenza su Expires
        let (_, _, expired) =
            parse_set_cookie("user=abc; Max-Age=60; expires=Sat, 01 Jan 2000 00:00:00 GMT")
                .unwrap();
        assert!(!expired);
    }

    #[test]
    fn test_cleared_cookie_is_removed_from_jar() {
        let jar = CookieJar::in_memory();
        let url = Url::parse("http://localhost:4000/logout").unwrap();

        let login = [HeaderValue::from_static("user=abc; Path=/")];
        jar.set_cookies(&mut login.iter(), &url);
        assert_eq!(jar.get("user").as_deref(), Some("abc"));

        let logout = [HeaderValue::from_static(
            "user=\"\"; expires=Sat, 01 Jan 2000 00:00:00 GMT; Path=/",
        )];
        jar.set_cookies(&mut logout.iter(), &url);
        assert!(jar.get("user").is_none());
        assert!(jar.cookies(&url).is_none());
    }

    #[test]
    fn test_store_roundtrip_through_reqwest_trait() {
        let jar = CookieJar::in_memory();
        let url = Url::parse("http://localhost:4000/api/users/me").unwrap();
        assert!(jar.cookies(&url).is_none());

        let headers = [
            HeaderValue::from_static("_xsrf=token; Path=/"),
            HeaderValue::from_static("user=abc"),
        ];
        jar.set_cookies(&mut headers.iter(), &url);

        assert_eq!(jar.get("_xsrf").as_deref(), Some("token"));
        let header = jar.cookies(&url).unwrap();
        assert_eq!(header.to_str().unwrap(), "_xsrf=token; user=abc");

        let delete = [HeaderValue::from_static("user=; Max-Age=0")];
        jar.set_cookies(&mut delete.iter(), &url);
        assert!(jar.get("user").is_none());
        assert_eq!(jar.len(), 1);
    }

    #[test]
    fn test_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("cookies.json");

        let jar = CookieJar::open(&path).unwrap();
        assert!(jar.is_empty());
        jar.put("consent", "true").unwrap();

        let reopened = CookieJar::open(&path).unwrap();
        assert_eq!(reopened.get("consent").as_deref(), Some("true"));

        reopened.remove("consent").unwrap();
        assert!(CookieJar::open(&path).unwrap().get("consent").is_none());
    }

    #[tokio::test]
    async fn test_response_cookies_persist_off_the_worker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        let url = Url::parse("http://localhost:4000/api/users/me").unwrap();

        let jar = CookieJar::open(&path).unwrap();
        let headers = [HeaderValue::from_static("_xsrf=token; Path=/")];
        jar.set_cookies(&mut headers.iter(), &url);
        assert_eq!(jar.get("_xsrf").as_deref(), Some("token"));

        jar.flush().unwrap();
        let reopened = CookieJar::open(&path).unwrap();
        assert_eq!(reopened.get("_xsrf").as_deref(), Some("token"));
    }

    #[test]
    fn test_older_snapshot_never_overwrites_newer() {
        let dir = tempfile::tempdir().unwrap();
        let file = CookieFile {
            path: dir.path().join("cookies.json"),
            written: Mutex::new(0),
        };

        let newer = BTreeMap::from([("user".to_string(), "new".to_string())]);
        let older = BTreeMap::from([("user".to_string(), "old".to_string())]);
        file.store(2, &newer).unwrap();
        file.store(1, &older).unwrap();

        let jar = CookieJar::open(&file.path).unwrap();
        assert_eq!(jar.get("user").as_deref(), Some("new"));
    }
}
