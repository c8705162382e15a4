//! URL shape checks shared by the parser (W004-W006) and the schema
//! constraint stage.

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// Absolute `http`/`https` URL with a host.
    Http,
    /// No scheme; needs a base URL to resolve.
    Relative,
    /// Anything else: unparseable, empty host, or a non-web scheme.
    Malformed,
}

pub fn classify_url(s: &str) -> UrlKind {
    match Url::parse(s.trim()) {
        Ok(u) if is_web(&u) => UrlKind::Http,
        Ok(_) => UrlKind::Malformed,
        Err(url::ParseError::RelativeUrlWithoutBase) => UrlKind::Relative,
        Err(_) => UrlKind::Malformed,
    }
}

pub fn is_http_url(s: &str) -> bool {
    classify_url(s) == UrlKind::Http
}

fn is_web(u: &Url) -> bool {
    matches!(u.scheme(), "http" | "https") && u.host_str().is_some_and(|h| !h.is_empty())
}
