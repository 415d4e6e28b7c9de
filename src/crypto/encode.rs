use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{BASE64_CODE_LEN, DIGEST_HEX_LEN};
use crate::error::DeriveError;

/// Output alphabet applied to the hex digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodingMode {
    /// The digest as-is, `0-9a-f`.
    #[default]
    #[serde(rename = "flower")]
    HexDigest,
    /// Digest bytes in padded standard base64, `A-Za-z0-9+/=`.
    #[serde(rename = "base64")]
    CompactBase64,
}

impl EncodingMode {
    pub fn name(&self) -> &'static str {
        match self {
            EncodingMode::HexDigest => "flower",
            EncodingMode::CompactBase64 => "base64",
        }
    }
}

impl fmt::Display for EncodingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EncodingMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flower" | "hex" => Ok(EncodingMode::HexDigest),
            "base64" => Ok(EncodingMode::CompactBase64),
            other => anyhow::bail!("unknown encoding mode '{other}' (expected flower or base64)"),
        }
    }
}

/// Renders a hex digest in the requested alphabet.
///
/// # Errors
///
/// [`DeriveError::Encoding`] when `mode` is [`EncodingMode::CompactBase64`]
/// and the digest is not an even-length hex string.
pub fn encode(hex_digest: &str, mode: EncodingMode) -> Result<String, DeriveError> {
    match mode {
        EncodingMode::HexDigest => Ok(hex_digest.to_owned()),
        EncodingMode::CompactBase64 => {
            let bytes = hex::decode(hex_digest).map_err(|e| {
                DeriveError::Encoding(format!("{e} (digest length {})", hex_digest.len()))
            })?;
            let code = STANDARD.encode(bytes);
            if hex_digest.len() == DIGEST_HEX_LEN {
                debug_assert_eq!(code.len(), BASE64_CODE_LEN);
            }
            Ok(code)
        }
    }
}
