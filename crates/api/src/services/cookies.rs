//! Session cookie helper.
//!
//! Builds and reads the HttpOnly cookie that carries the session secret.

use axum::http::{
    header::{COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};

use crate::config::SessionConfig;

/// Cookie helper for the session cookie.
#[derive(Debug, Clone)]
pub struct CookieHelper {
    config: SessionConfig,
}

impl CookieHelper {
    /// Create a new cookie helper with configuration.
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Build a Set-Cookie header value carrying the session secret.
    pub fn build_session_cookie(&self, secret: &str) -> String {
        self.build_cookie(
            &format!("{}={}", self.config.cookie_name, secret),
            &format!("Max-Age={}", self.config.ttl_secs),
        )
    }

    /// Build a Set-Cookie header value that removes the session cookie.
    pub fn build_clear_cookie(&self) -> String {
        self.build_cookie(
            &format!("{}=", self.config.cookie_name),
            "Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
        )
    }

    /// Append the session cookie to a HeaderMap.
    pub fn add_session_cookie(&self, headers: &mut HeaderMap, secret: &str) {
        if let Ok(value) = HeaderValue::from_str(&self.build_session_cookie(secret)) {
            headers.append(SET_COOKIE, value);
        }
    }

    /// Append a clearing cookie to a HeaderMap (for logout).
    pub fn add_clear_cookie(&self, headers: &mut HeaderMap) {
        if let Ok(value) = HeaderValue::from_str(&self.build_clear_cookie()) {
            headers.append(SET_COOKIE, value);
        }
    }

    /// Extract the session secret from request headers.
    pub fn extract_session<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .flat_map(|cookie_header| cookie_header.split(';'))
            .map(|s| s.trim())
            .find_map(|cookie| {
                let (name, value) = cookie.split_once('=')?;
                (name == self.config.cookie_name && !value.is_empty()).then_some(value)
            })
    }

    fn build_cookie(&self, pair: &str, lifetime: &str) -> String {
        let mut cookie = format!("{}; Path=/; {}; HttpOnly", pair, lifetime);

        if self.config.secure {
            cookie.push_str("; Secure");
        }

        cookie.push_str(&format!("; SameSite={}", self.config.same_site));

        if !self.config.domain.is_empty() {
            cookie.push_str(&format!("; Domain={}", self.config.domain));
        }

        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SessionConfig {
        SessionConfig {
            cookie_name: "gossip_session".to_string(),
            ttl_secs: 259_200,
            secure: true,
            same_site: "Lax".to_string(),
            domain: String::new(),
        }
    }

    #[test]
    fn test_build_session_cookie() {
        let helper = CookieHelper::new(test_config());
        let cookie = helper.build_session_cookie("abc123");

        assert!(cookie.starts_with("gossip_session=abc123;"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=259200"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(!cookie.contains("Domain="));
    }

    #[test]
    fn test_build_clear_cookie() {
        let helper = CookieHelper::new(test_config());
        let cookie = helper.build_clear_cookie();

        assert!(cookie.starts_with("gossip_session=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
    }

    #[test]
    fn test_cookie_attributes_follow_config() {
        let mut config = test_config();
        config.secure = false;
        config.domain = "gossip.example".to_string();

        let cookie = CookieHelper::new(config).build_session_cookie("s");
        assert!(!cookie.contains("Secure"));
        assert!(cookie.contains("Domain=gossip.example"));
    }

    #[test]
    fn test_extract_session() {
        let helper = CookieHelper::new(test_config());
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; gossip_session=secret42; other=x"),
        );

        assert_eq!(helper.extract_session(&headers), Some("secret42"));
    }

    #[test]
    fn test_extract_session_missing_or_empty() {
        let helper = CookieHelper::new(test_config());
        let mut headers = HeaderMap::new();
        assert_eq!(helper.extract_session(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("gossip_session="));
        assert_eq!(helper.extract_session(&headers), None);
    }

    #[test]
    fn test_add_cookies_to_headers() {
        let helper = CookieHelper::new(test_config());
        let mut headers = HeaderMap::new();
        helper.add_session_cookie(&mut headers, "abc");
        helper.add_clear_cookie(&mut headers);
        assert_eq!(headers.get_all(SET_COOKIE).iter().count(), 2);
    }
}
