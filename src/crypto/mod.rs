//! Digest side of the derivation: the keyed hash and the output alphabets.

pub mod encode;
pub mod hash;

pub use encode::{EncodingMode, encode};
pub use hash::{HmacMd5, KeyedHash};

/// Hex length of an HMAC-MD5 digest (16 bytes / 128 bits).
pub const DIGEST_HEX_LEN: usize = 32;
/// Length of that digest once rendered in padded base64.
pub const BASE64_CODE_LEN: usize = 24;
