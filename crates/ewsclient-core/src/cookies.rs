//! Session cookie store.

use cookie::Cookie;
use cookie::time::Duration;

use crate::transport::HttpResponse;

/// Name/value cookies in the order the server first set them.
///
/// Attributes (domain, path, expiry) are not tracked: a session talks to a
/// single endpoint and lives for one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: Vec<(String, String)>,
}

impl CookieJar {
    /// Creates an empty jar.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cookies: Vec::new(),
        }
    }

    /// Applies one `Set-Cookie` header value. Returns false if the value is
    /// not a cookie.
    pub fn apply(&mut self, set_cookie: &str) -> bool {
        let Ok(cookie) = Cookie::parse(set_cookie) else {
            return false;
        };

        if cookie.max_age().is_some_and(|age| age <= Duration::ZERO) {
            self.cookies.retain(|(name, _)| name != cookie.name());
            return true;
        }

        match self.cookies.iter_mut().find(|(name, _)| name == cookie.name()) {
            Some((_, value)) => cookie.value().clone_into(value),
            None => self
                .cookies
                .push((cookie.name().to_string(), cookie.value().to_string())),
        }
        true
    }

    /// Applies every `Set-Cookie` header of a response and returns the
    /// values that could not be parsed.
    pub fn merge(&mut self, response: &HttpResponse) -> Vec<String> {
        response
            .header_values("set-cookie")
            .filter(|value| !self.apply(value))
            .map(str::to_string)
            .collect()
    }

    /// Looks a cookie up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// `Cookie` request header value, `None` when empty.
    #[must_use]
    pub fn header_value(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Cookies in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cookies.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of cookies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// True when the jar is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_and_header() {
        let mut jar = CookieJar::new();
        assert!(jar.header_value().is_none());
        assert!(jar.apply("exchangecookie=abc123; path=/; HttpOnly"));
        assert!(jar.apply("X-BackEndCookie=xyz; secure"));
        assert_eq!(
            jar.header_value().unwrap(),
            "exchangecookie=abc123; X-BackEndCookie=xyz"
        );
    }

    #[test]
    fn test_later_value_replaces_in_place() {
        let mut jar = CookieJar::new();
        jar.apply("a=1");
        jar.apply("b=2");
        jar.apply("a=3");
        assert_eq!(jar.header_value().unwrap(), "a=3; b=2");
        assert_eq!(jar.len(), 2);
    }

    #[test]
    fn test_zero_max_age_removes() {
        let mut jar = CookieJar::new();
        jar.apply("a=1");
        jar.apply("a=; Max-Age=0");
        assert!(jar.is_empty());
    }

    #[test]
    fn test_garbage_is_rejected() {
        let mut jar = CookieJar::new();
        assert!(!jar.apply("no equals sign"));
        assert!(jar.is_empty());
    }

    #[test]
    fn test_merge_response() {
        let response = HttpResponse {
            headers: vec![
                ("Set-Cookie".into(), "a=1".into()),
                ("Content-Type".into(), "text/xml".into()),
                ("set-cookie".into(), "broken".into()),
            ],
            ..HttpResponse::default()
        };
        let mut jar = CookieJar::new();
        let rejected = jar.merge(&response);
        assert_eq!(rejected, ["broken"]);
        assert_eq!(jar.get("a"), Some("1"));
    }
}
