// ABOUTME: Secure cookie builder and helpers for the OAuth state cookie
// ABOUTME: Cookies are HttpOnly and Secure, scoped to the auth path
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use bridge_core::constants::oauth::{OAUTH_STATE_COOKIE, STATE_COOKIE_MAX_AGE_SECS};
use http::{header, HeaderMap, HeaderValue};
use std::fmt;

/// `SameSite` attribute values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    /// Sent only on same-site requests
    Strict,
    /// Also sent on top-level cross-site navigations (provider redirects)
    Lax,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => f.write_str("Strict"),
            Self::Lax => f.write_str("Lax"),
        }
    }
}

/// Builder for a `Set-Cookie` header value
#[derive(Debug, Clone)]
pub struct SecureCookieConfig {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Lifetime in seconds; zero or negative expires the cookie
    pub max_age: i64,
    /// Hide from scripts
    pub http_only: bool,
    /// Only send over HTTPS
    pub secure: bool,
    /// Cross-site policy
    pub same_site: SameSite,
    /// Path scope
    pub path: String,
}

impl SecureCookieConfig {
    /// Create a cookie with hardened defaults (`HttpOnly`, `Secure`, `SameSite=Strict`, `Path=/`)
    #[must_use]
    pub fn new(name: String, value: String, max_age: i64) -> Self {
        Self {
            name,
            value,
            max_age,
            http_only: true,
            secure: true,
            same_site: SameSite::Strict,
            path: "/".to_owned(),
        }
    }

    /// Override the `SameSite` attribute
    #[must_use]
    pub const fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Override the path scope
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Render the `Set-Cookie` header value
    #[must_use]
    pub fn build(&self) -> String {
        let mut cookie = format!(
            "{}={}; Path={}; Max-Age={}; SameSite={}",
            self.name, self.value, self.path, self.max_age, self.same_site
        );
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    fn append_to(&self, headers: &mut HeaderMap) {
        match HeaderValue::from_str(&self.build()) {
            Ok(value) => {
                headers.append(header::SET_COOKIE, value);
            }
            Err(e) => {
                tracing::error!(cookie = %self.name, error = %e, "Invalid cookie header value");
            }
        }
    }
}

fn oauth_state_cookie(value: &str, path: &str, max_age: i64) -> SecureCookieConfig {
    SecureCookieConfig::new(OAUTH_STATE_COOKIE.to_owned(), value.to_owned(), max_age)
        .with_same_site(SameSite::Lax)
        .with_path(path)
}

/// Set the CSRF state cookie issued at login
pub fn set_oauth_state_cookie(headers: &mut HeaderMap, state: &str, path: &str) {
    oauth_state_cookie(state, path, STATE_COOKIE_MAX_AGE_SECS).append_to(headers);
}

/// Expire the CSRF state cookie once the callback has consumed it
pub fn clear_oauth_state_cookie(headers: &mut HeaderMap, path: &str) {
    oauth_state_cookie("", path, 0).append_to(headers);
}

/// Read a cookie value from the request `Cookie` headers
#[must_use]
pub fn get_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_cookie_defaults() {
        let cookie = SecureCookieConfig::new("test".to_owned(), "value".to_owned(), 3600).build();

        assert!(cookie.starts_with("test=value"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Path=/"));
    }

    #[test]
    fn test_oauth_state_cookie_attributes() {
        let mut headers = HeaderMap::new();
        set_oauth_state_cookie(&mut headers, "abc123", "/auth");

        let cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("oauth_state=abc123"));
        assert!(cookie.contains("Path=/auth"));
        assert!(cookie.contains("Max-Age=600"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
    }

    #[test]
    fn test_clear_oauth_state_cookie_expires_it() {
        let mut headers = HeaderMap::new();
        clear_oauth_state_cookie(&mut headers, "/auth");

        let cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("oauth_state=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_get_cookie_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; oauth_state=xyz; other=1"),
        );

        assert_eq!(get_cookie_value(&headers, "oauth_state").as_deref(), Some("xyz"));
        assert_eq!(get_cookie_value(&headers, "theme").as_deref(), Some("dark"));
        assert_eq!(get_cookie_value(&headers, "missing"), None);
    }
}
