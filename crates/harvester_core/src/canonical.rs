use std::fmt;

use thiserror::Error;
use url::Url;

/// Normalised permalink used as the dedup key of a harvest run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Why a single rendered item produced no URL. Never fatal to a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionFailure {
    #[error("no permalink anchor inside item")]
    NoPermalink,
    #[error("timed out reading permalink href")]
    AttributeTimeout,
    #[error("permalink href is empty")]
    EmptyHref,
    #[error("unsupported href form: {0}")]
    UnsupportedHref(String),
    #[error("driver error: {0}")]
    Driver(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OriginError {
    #[error("invalid base origin: {0}")]
    Parse(#[from] url::ParseError),
    #[error("base origin {0:?} has no host")]
    Opaque(String),
}

/// Scheme + host (+ port) that root-relative hrefs are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseOrigin(String);

impl BaseOrigin {
    pub fn parse(raw: &str) -> Result<Self, OriginError> {
        let url = Url::parse(raw.trim())?;
        let origin = url.origin();
        if !origin.is_tuple() {
            return Err(OriginError::Opaque(raw.to_string()));
        }
        Ok(Self(origin.ascii_serialization()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Turns a raw `href` into its canonical form.
///
/// Absolute http(s) links keep their text minus query and fragment.
/// Root-relative links get the same treatment and are prefixed with `base`.
/// Protocol-relative (`//host/..`), document-relative and non-http hrefs are
/// rejected.
pub fn canonicalize_href(raw: &str, base: &BaseOrigin) -> Result<CanonicalUrl, ExtractionFailure> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ExtractionFailure::EmptyHref);
    }

    let stripped = strip_query(trimmed);

    if let Some(scheme) = scheme_of(stripped) {
        if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") {
            return Ok(CanonicalUrl(stripped.to_string()));
        }
        return Err(ExtractionFailure::UnsupportedHref(trimmed.to_string()));
    }

    if stripped.starts_with('/') && !stripped.starts_with("//") {
        return Ok(CanonicalUrl(format!("{}{}", base.as_str(), stripped)));
    }

    Err(ExtractionFailure::UnsupportedHref(trimmed.to_string()))
}

fn strip_query(href: &str) -> &str {
    let end = href.find(['?', '#']).unwrap_or(href.len());
    &href[..end]
}

/// RFC 3986 scheme: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":".
fn scheme_of(href: &str) -> Option<&str> {
    let (scheme, _) = href.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    chars
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        .then_some(scheme)
}
