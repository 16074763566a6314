use axum::http::{
    HeaderMap, HeaderValue,
    header::{COOKIE, SET_COOKIE},
};
use std::collections::HashMap;
use tracing::warn;

/// Client-side key/value persistence.
pub trait ClientStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ClientStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// Attributes written with every cookie of a given name.
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    pub max_age_secs: u64,
    pub http_only: bool,
}

const DEFAULT_POLICY: CookiePolicy = CookiePolicy {
    max_age_secs: 60 * 60 * 24 * 365,
    http_only: false,
};

#[derive(Debug, Clone)]
enum CookieChange {
    Set(String),
    Removed,
}

/// Request cookies plus the changes a handler made to them.
///
/// Reads see pending changes, so a handler that logs in and then renders
/// observes the new session without another round trip.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    incoming: HashMap<String, String>,
    changes: Vec<(String, CookieChange)>,
    policies: HashMap<String, CookiePolicy>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut incoming = HashMap::new();
        for value in headers.get_all(COOKIE) {
            let Ok(value) = value.to_str() else {
                continue;
            };
            for cookie in value.split(';') {
                if let Some((key, value)) = cookie.trim().split_once('=') {
                    incoming.insert(key.trim().to_string(), value.trim().to_string());
                }
            }
        }

        Self {
            incoming,
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, name: &str, policy: CookiePolicy) -> Self {
        self.policies.insert(name.to_string(), policy);
        self
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// One `Set-Cookie` value per changed cookie, last change wins.
    pub fn set_cookie_values(&self) -> Vec<String> {
        let mut seen: Vec<&str> = Vec::new();
        let mut values = Vec::new();
        for (name, change) in self.changes.iter().rev() {
            if seen.contains(&name.as_str()) {
                continue;
            }
            seen.push(name);

            let policy = self.policies.get(name).copied().unwrap_or(DEFAULT_POLICY);
            let http_only = if policy.http_only { "; HttpOnly" } else { "" };
            let value = match change {
                CookieChange::Set(value) => format!(
                    "{}={}; Path=/; Max-Age={}{}; SameSite=Lax",
                    name, value, policy.max_age_secs, http_only
                ),
                CookieChange::Removed => {
                    format!("{}=; Path=/; Max-Age=0{}; SameSite=Lax", name, http_only)
                }
            };
            values.push(value);
        }
        values.reverse();
        values
    }

    pub fn into_headers(self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for value in self.set_cookie_values() {
            match HeaderValue::from_str(&value) {
                Ok(value) => {
                    headers.append(SET_COOKIE, value);
                }
                Err(e) => warn!("Dropping unencodable cookie: {}", e),
            }
        }
        headers
    }
}

impl ClientStorage for CookieJar {
    fn get(&self, key: &str) -> Option<String> {
        let pending = self
            .changes
            .iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, change)| change);

        match pending {
            Some(CookieChange::Set(value)) => Some(value.clone()),
            Some(CookieChange::Removed) => None,
            None => self.incoming.get(key).cloned(),
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        self.changes
            .push((key.to_string(), CookieChange::Set(value.to_string())));
    }

    fn remove(&mut self, key: &str) {
        self.changes.push((key.to_string(), CookieChange::Removed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_jar_parses_request_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("photoshare_theme=dark; other = 1"),
        );

        let jar = CookieJar::from_headers(&headers);
        assert_eq!(jar.get("photoshare_theme").as_deref(), Some("dark"));
        assert_eq!(jar.get("other").as_deref(), Some("1"));
        assert_eq!(jar.get("missing"), None);
        assert!(!jar.has_changes());
    }

    #[test]
    fn test_cookie_jar_reads_pending_changes() {
        let mut jar = CookieJar::new();
        jar.set("a", "1");
        assert_eq!(jar.get("a").as_deref(), Some("1"));
        jar.remove("a");
        assert_eq!(jar.get("a"), None);
    }

    #[test]
    fn test_set_cookie_values_keep_last_change_per_name() {
        let mut jar = CookieJar::new().with_policy(
            "session",
            CookiePolicy {
                max_age_secs: 60,
                http_only: true,
            },
        );
        jar.set("session", "first");
        jar.set("theme", "dark");
        jar.remove("session");

        let values = jar.set_cookie_values();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], "theme=dark; Path=/; Max-Age=31536000; SameSite=Lax");
        assert_eq!(values[1], "session=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax");
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        assert!(storage.is_empty());
        storage.set("k", "v");
        assert_eq!(storage.get("k").as_deref(), Some("v"));
        storage.remove("k");
        assert!(storage.is_empty());
    }
}
