use hmac::{Hmac, Mac};
use md5::Md5;

use super::DIGEST_HEX_LEN;
use crate::error::HashError;

/// A keyed hash producing a fixed-length lowercase hex digest.
///
/// `secret` is the key and `message` the data. Implementations must not
/// swap them: the derivation is not symmetric.
pub trait KeyedHash: Send + Sync {
    fn digest(&self, secret: &str, message: &str) -> Result<String, HashError>;
}

type HmacMd5Core = Hmac<Md5>;

/// HMAC-MD5, the primitive behind the classic flower password scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacMd5;

impl KeyedHash for HmacMd5 {
    fn digest(&self, secret: &str, message: &str) -> Result<String, HashError> {
        let mut mac = HmacMd5Core::new_from_slice(secret.as_bytes())
            .map_err(|e| HashError::Unavailable(format!("hmac-md5 rejected key: {e}")))?;
        mac.update(message.as_bytes());

        let digest = hex::encode(mac.finalize().into_bytes());
        debug_assert_eq!(digest.len(), DIGEST_HEX_LEN);
        Ok(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hmac_md5_matches_rfc2202_vector() {
        let digest = HmacMd5
            .digest("Jefe", "what do ya want for nothing?")
            .unwrap();
        assert_eq!(digest, "750c783e6ab0b503eaa86e310a5db738");
    }

    #[test]
    fn digest_has_fixed_length() {
        let long = "x".repeat(200);
        for (secret, message) in [("a", ""), ("pw", "google"), (long.as_str(), "k")] {
            let digest = HmacMd5.digest(secret, message).unwrap();
            assert_eq!(digest.len(), DIGEST_HEX_LEN);
            assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn key_and_message_are_not_interchangeable() {
        let a = HmacMd5.digest("master", "github").unwrap();
        let b = HmacMd5.digest("github", "master").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn empty_key_is_accepted() {
        assert!(HmacMd5.digest("", "github").is_ok());
    }
}
