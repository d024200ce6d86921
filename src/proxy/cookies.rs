//! Set-Cookie rewriting.
//!
//! # Responsibilities
//! - Enumerate every Set-Cookie directive on an upstream response
//! - Strip them all, on every path
//! - On the login path, re-emit each one with a fixed attribute policy so
//!   the browser stores it for the relay's own origin
//!
//! # Design Decisions
//! - Only the name/value pair, `Expires` and `Max-Age` survive a rewrite
//! - Attribute names are matched case-insensitively
//! - Flag-style attributes without `=` are ignored when parsing

use std::fmt;

use axum::http::header::{self, HeaderMap, HeaderValue};

/// Attributes appended to every rewritten cookie.
pub const POLICY_ATTRIBUTES: &str = "Path=/; HttpOnly; SameSite=None; Secure";

/// A parsed Set-Cookie line, reduced to the parts the relay keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieDirective {
    pub name_value: String,
    pub expires: Option<String>,
    pub max_age: Option<String>,
}

impl CookieDirective {
    pub fn parse(line: &str) -> Self {
        let mut parts = line.split(';').map(str::trim);
        let name_value = parts.next().unwrap_or_default().to_string();

        let mut expires = None;
        let mut max_age = None;
        for part in parts {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "expires" => expires = Some(value.to_string()),
                "max-age" => max_age = Some(value.to_string()),
                _ => {}
            }
        }

        Self {
            name_value,
            expires,
            max_age,
        }
    }
}

impl fmt::Display for CookieDirective {
    /// `name=value[; Expires=..][; Max-Age=..]; Path=/; HttpOnly; SameSite=None; Secure`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name_value)?;
        if let Some(expires) = &self.expires {
            write!(f, "; Expires={}", expires)?;
        }
        if let Some(max_age) = &self.max_age {
            write!(f, "; Max-Age={}", max_age)?;
        }
        write!(f, "; {}", POLICY_ATTRIBUTES)
    }
}

/// Every Set-Cookie directive in `headers`, in order.
pub fn collect_set_cookies(headers: &HeaderMap) -> Vec<CookieDirective> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| CookieDirective::parse(&String::from_utf8_lossy(value.as_bytes())))
        .collect()
}

/// Decides which responses may carry cookies to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookiePolicy {
    login_path: String,
}

impl CookiePolicy {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Exact, case-sensitive path comparison.
    pub fn forwards_cookies(&self, path: &str) -> bool {
        path == self.login_path
    }

    /// Strip all Set-Cookie headers and, on the login path, re-add the rewritten
    /// directives. Returns how many were re-added.
    pub fn apply(&self, path: &str, headers: &mut HeaderMap) -> usize {
        let directives = collect_set_cookies(headers);
        if directives.is_empty() {
            return 0;
        }

        headers.remove(header::SET_COOKIE);

        if !self.forwards_cookies(path) {
            tracing::debug!(
                path = %path,
                count = directives.len(),
                "Stripped Set-Cookie headers outside login path"
            );
            return 0;
        }

        let mut added = 0;
        for directive in &directives {
            match HeaderValue::from_bytes(directive.to_string().as_bytes()) {
                Ok(value) => {
                    headers.append(header::SET_COOKIE, value);
                    added += 1;
                }
                Err(_) => {
                    tracing::warn!(
                        cookie = %directive.name_value,
                        "Dropped unencodable Set-Cookie"
                    );
                }
            }
        }
        added
    }
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self::new("/secure/auth/login")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_cookies(lines: &[&'static str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for line in lines {
            headers.append(header::SET_COOKIE, HeaderValue::from_static(*line));
        }
        headers
    }

    fn set_cookies(headers: &HeaderMap) -> Vec<String> {
        headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_parse_keeps_only_expiry_attributes() {
        let directive = CookieDirective::parse(
            "sessionid=abc123; Domain=ecsc-expat.sy; Path=/app; Max-Age=3600; Secure; HttpOnly; SameSite=Lax",
        );
        assert_eq!(directive.name_value, "sessionid=abc123");
        assert_eq!(directive.max_age.as_deref(), Some("3600"));
        assert_eq!(directive.expires, None);
    }

    #[test]
    fn test_parse_is_case_insensitive_and_keeps_equals_in_values() {
        let directive = CookieDirective::parse(
            "token=a=b==; expires=Wed, 21 Oct 2026 07:28:00 GMT; MAX-AGE=60",
        );
        assert_eq!(directive.name_value, "token=a=b==");
        assert_eq!(directive.expires.as_deref(), Some("Wed, 21 Oct 2026 07:28:00 GMT"));
        assert_eq!(directive.max_age.as_deref(), Some("60"));
    }

    #[test]
    fn test_render_appends_policy() {
        let directive = CookieDirective::parse(
            "sessionid=abc123; Domain=ecsc-expat.sy; Path=/app; Max-Age=3600",
        );
        assert_eq!(
            directive.to_string(),
            "sessionid=abc123; Max-Age=3600; Path=/; HttpOnly; SameSite=None; Secure"
        );

        let directive = CookieDirective::parse(
            "lang=ar; Expires=Thu, 01 Jan 2027 00:00:00 GMT; Max-Age=10",
        );
        assert_eq!(
            directive.to_string(),
            "lang=ar; Expires=Thu, 01 Jan 2027 00:00:00 GMT; Max-Age=10; Path=/; HttpOnly; SameSite=None; Secure"
        );
    }

    #[test]
    fn test_login_path_rewrites_every_cookie() {
        let policy = CookiePolicy::default();
        let mut headers = with_cookies(&[
            "sessionid=abc123; Domain=ecsc-expat.sy; Path=/app; Max-Age=3600",
            "XSRF-TOKEN=xyz; Path=/; SameSite=Strict",
            "remember=1; Expires=Thu, 01 Jan 2027 00:00:00 GMT; HttpOnly",
        ]);

        let added = policy.apply("/secure/auth/login", &mut headers);

        assert_eq!(added, 3);
        assert_eq!(
            set_cookies(&headers),
            vec![
                "sessionid=abc123; Max-Age=3600; Path=/; HttpOnly; SameSite=None; Secure",
                "XSRF-TOKEN=xyz; Path=/; HttpOnly; SameSite=None; Secure",
                "remember=1; Expires=Thu, 01 Jan 2027 00:00:00 GMT; Path=/; HttpOnly; SameSite=None; Secure",
            ]
        );
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_other_paths_strip_cookies() {
        let policy = CookiePolicy::default();
        for path in ["/secure/auth/logout", "/secure/auth/login/", "/SECURE/AUTH/LOGIN", "/"] {
            let mut headers = with_cookies(&["sessionid=abc123", "other=1"]);
            assert_eq!(policy.apply(path, &mut headers), 0);
            assert!(headers.get(header::SET_COOKIE).is_none(), "path {path}");
            assert!(headers.get(header::CONTENT_TYPE).is_some());
        }
    }

    #[test]
    fn test_no_cookies_leaves_headers_untouched() {
        let policy = CookiePolicy::default();
        let mut headers = with_cookies(&[]);
        let before = headers.clone();
        assert_eq!(policy.apply("/secure/auth/login", &mut headers), 0);
        assert_eq!(headers, before);
    }
}
