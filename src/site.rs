//! Site key normalization.

use std::fmt;
use url::{Host, Url};

/// Normalized per-site identifier, the message side of the keyed hash.
///
/// An empty key means no site could be determined; it must not be fed to
/// the derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SiteKey(String);

impl SiteKey {
    /// Wraps an already normalized key, e.g. one typed by the user.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Picks the registrable label out of a hostname.
    ///
    /// `maps.google.com` and `www.google.com` both become `google`; a
    /// single-label host such as `localhost` is kept whole. Input that is
    /// not a valid host (spaces, query strings, empty labels) yields an
    /// empty key.
    pub fn from_hostname(hostname: &str) -> Self {
        let host = hostname.trim().to_ascii_lowercase();
        let host = host.strip_suffix('.').unwrap_or(host.as_str());
        if host.is_empty() || host.split('.').any(str::is_empty) {
            return Self::default();
        }

        let host = match Host::parse(host) {
            Ok(parsed) => parsed.to_string(),
            Err(e) => {
                tracing::debug!(error = %e, "invalid hostname");
                return Self::default();
            }
        };
        let host = host.strip_prefix("www.").unwrap_or(host.as_str());

        let labels: Vec<&str> = host.split('.').collect();
        let label = if labels.len() > 2 {
            labels[labels.len() - 2]
        } else {
            labels[0]
        };

        Self(label.to_owned())
    }

    /// Normalizes the host of a full URL.
    ///
    /// Unparsable URLs and URLs without a host yield an empty key.
    pub fn from_url(url: &str) -> Self {
        match Url::parse(url.trim()) {
            Ok(parsed) => match parsed.host_str() {
                Some(host) => Self::from_hostname(host),
                None => {
                    tracing::debug!(scheme = parsed.scheme(), "url has no host");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::debug!(error = %e, "failed to parse url");
                Self::default()
            }
        }
    }

    /// Accepts either a full URL or a bare `host[:port][/path][?query]`.
    pub fn resolve(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return Self::default();
        }
        if input.contains("://") {
            return Self::from_url(input);
        }

        Self::from_url(&format!("http://{input}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SiteKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
