//! API base URL resolution

use url::Url;

use crate::error::Result;

/// Where the API lives when the page was not served by it
pub const LOCAL_FALLBACK: &str = "http://localhost:3000";

/// Base URL every API path is appended to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase {
    base: String,
}

impl ApiBase {
    /// Resolve the base for a page served from `origin`
    ///
    /// An explicit `override_base` always wins. Without one, a page with no
    /// usable origin (absent, the literal `"null"`, or a `file:` URL) talks to
    /// [`LOCAL_FALLBACK`]; anything else is same-origin.
    pub fn resolve(origin: Option<&str>, override_base: Option<&str>) -> Result<Self> {
        if let Some(base) = override_base.filter(|b| !b.trim().is_empty()) {
            return Self::parse(base);
        }

        match origin.map(str::trim) {
            None | Some("") | Some("null") => Self::parse(LOCAL_FALLBACK),
            Some(origin) if origin.starts_with("file:") => Self::parse(LOCAL_FALLBACK),
            Some(origin) => Self::parse(origin),
        }
    }

    /// Use `base` verbatim
    pub fn parse(base: &str) -> Result<Self> {
        let url = Url::parse(base)?;
        Ok(Self {
            base: url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Build `base + path`
    pub fn join(&self, path: &str) -> Result<Url> {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        Ok(Url::parse(&format!("{}{}", self.base, path))?)
    }

    pub fn as_str(&self) -> &str {
        &self.base
    }
}

impl Default for ApiBase {
    fn default() -> Self {
        Self {
            base: LOCAL_FALLBACK.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_without_origin_uses_local_fallback() {
        for origin in [None, Some("null"), Some("file:///home/me/index.html")] {
            let base = ApiBase::resolve(origin, None).unwrap();
            assert_eq!(base.as_str(), LOCAL_FALLBACK);
        }
    }

    #[test]
    fn test_resolve_same_origin() {
        let base = ApiBase::resolve(Some("https://citywatch.example.org"), None).unwrap();
        assert_eq!(base.as_str(), "https://citywatch.example.org");
    }

    #[test]
    fn test_override_wins() {
        let base = ApiBase::resolve(Some("null"), Some("http://10.0.0.5:8080/")).unwrap();
        assert_eq!(base.as_str(), "http://10.0.0.5:8080");
    }

    #[test]
    fn test_join_keeps_query() {
        let base = ApiBase::parse("http://localhost:3000").unwrap();
        let url = base.join("/api/notifications?limit=50").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/notifications?limit=50");
        assert_eq!(url.query(), Some("limit=50"));
    }

    #[test]
    fn test_join_under_prefix() {
        let base = ApiBase::parse("https://example.org/citywatch").unwrap();
        let url = base.join("api/reports").unwrap();
        assert_eq!(url.as_str(), "https://example.org/citywatch/api/reports");
    }
}
