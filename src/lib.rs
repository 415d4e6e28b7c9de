//! Deterministic per-site passwords.
//!
//! A code is `adjust(truncate(encode(HMAC(master, site), mode), length))`:
//! the same master secret, site key, mode and length always give the same
//! code, so nothing per site ever needs storing.

mod code;
mod crypto;
mod error;
pub mod fill;
mod settings;
mod site;
mod storage;

pub use crate::code::{adjust, truncate};
pub use crate::crypto::{EncodingMode, HmacMd5, KeyedHash, encode};
pub use crate::error::{DeriveError, HashError};
pub use crate::settings::{DEFAULT_LENGTH, Settings};
pub use crate::site::SiteKey;
pub use crate::storage::Storage;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fmt;
use zeroize::Zeroizing;

/// A derived password. The buffer is wiped when dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedCode(Zeroizing<String>);

impl DerivedCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for DerivedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DerivedCode").field(&"<redacted>").finish()
    }
}

impl PartialEq<&str> for DerivedCode {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Derives the code for one site.
///
/// Returns `Ok(None)` when `secret` or `site_key` is empty: that is an
/// incomplete input, not a failure, and callers should show nothing.
///
/// # Errors
///
/// [`DeriveError::CollaboratorUnavailable`] if the hasher fails and
/// [`DeriveError::Encoding`] if its digest cannot be re-encoded.
pub fn derive<H>(
    hasher: &H,
    secret: &str,
    site_key: &SiteKey,
    mode: EncodingMode,
    length: usize,
) -> Result<Option<DerivedCode>, DeriveError>
where
    H: KeyedHash + ?Sized,
{
    if secret.is_empty() || site_key.is_empty() {
        tracing::trace!("incomplete input, nothing to derive");
        return Ok(None);
    }

    let digest = Zeroizing::new(hasher.digest(secret, site_key.as_str())?);
    let encoded = Zeroizing::new(encode(&digest, mode)?);
    let truncated = Zeroizing::new(truncate(&encoded, length));
    let code = adjust(&truncated);

    tracing::debug!(
        mode = %mode,
        requested = length,
        available = encoded.chars().count(),
        produced = code.len(),
        "derived code"
    );

    Ok(Some(DerivedCode(Zeroizing::new(code))))
}

/// A keyed hash bound to resolved settings.
#[derive(Debug, Clone)]
pub struct Generator<H = HmacMd5> {
    hasher: H,
    mode: EncodingMode,
    length: usize,
}

impl Generator<HmacMd5> {
    pub fn new(settings: &Settings) -> Self {
        Self::with_hasher(HmacMd5, settings)
    }
}

impl<H: KeyedHash> Generator<H> {
    pub fn with_hasher(hasher: H, settings: &Settings) -> Self {
        Self {
            hasher,
            mode: settings.mode(),
            length: settings.length(),
        }
    }

    pub fn mode(mut self, mode: EncodingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn generate(
        &self,
        secret: &str,
        site_key: &SiteKey,
    ) -> Result<Option<DerivedCode>, DeriveError> {
        derive(&self.hasher, secret, site_key, self.mode, self.length)
    }
}

/// Platform config location of the settings file.
pub fn default_storage() -> Result<Storage> {
    let project_dirs = ProjectDirs::from("", "", "flowerpass")
        .context("could not determine platform directories")?;

    Ok(Storage::new(project_dirs.config_dir().join("settings.json")))
}
