use std::fmt;

use url::{ParseError, Url};

/// The result of expanding a template: an absolute URL when the text parses
/// as one, otherwise a relative reference.
///
/// The expanded text is kept verbatim in both cases. The parsed [`Url`] of an
/// absolute reference is normalised (lowercased host, trailing `/` for an
/// empty path, percent-encoded spaces) and only reachable through
/// [`UriRef::as_url`] and [`UriRef::resolve`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UriRef {
    Absolute { text: String, url: Url },
    Relative(String),
}

impl UriRef {
    pub fn new<S>(s: S) -> Self
    where
        S: Into<String>,
    {
        let s = s.into();
        match Url::parse(&s) {
            Ok(url) => UriRef::Absolute { text: s, url },
            Err(ParseError::RelativeUrlWithoutBase) => UriRef::Relative(s),
            Err(e) => {
                tracing::debug!(uri = %s, error = %e, "not an absolute url, keeping as relative");
                UriRef::Relative(s)
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            UriRef::Absolute { text, .. } => text,
            UriRef::Relative(s) => s,
        }
    }

    pub fn is_absolute(&self) -> bool {
        matches!(self, UriRef::Absolute { .. })
    }

    pub fn as_url(&self) -> Option<&Url> {
        match self {
            UriRef::Absolute { url, .. } => Some(url),
            UriRef::Relative(_) => None,
        }
    }

    /// Resolves a relative reference against `base`; absolute URLs are
    /// returned as they are.
    pub fn resolve(&self, base: &Url) -> Result<Url, ParseError> {
        match self {
            UriRef::Absolute { url, .. } => Ok(url.clone()),
            UriRef::Relative(s) => base.join(s),
        }
    }

    pub fn into_string(self) -> String {
        match self {
            UriRef::Absolute { text, .. } => text,
            UriRef::Relative(s) => s,
        }
    }
}

impl AsRef<str> for UriRef {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UriRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<str> for UriRef {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for UriRef {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
