use thiserror::Error;

/// Failure reported by a [`KeyedHash`](crate::KeyedHash) implementation.
#[derive(Debug, Error)]
pub enum HashError {
    /// The primitive cannot be used right now (not loaded, rejected key, ...).
    #[error("keyed hash unavailable: {0}")]
    Unavailable(String),
}

/// Errors that abort a single derivation.
///
/// Missing input is not an error: [`derive`](crate::derive) returns `Ok(None)`
/// for an empty master secret or site key.
#[derive(Debug, Error)]
pub enum DeriveError {
    /// The digest could not be reinterpreted as bytes (odd length or non-hex).
    #[error("cannot encode digest: {0}")]
    Encoding(String),

    /// The keyed hash collaborator failed or is missing.
    #[error("keyed hash collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),
}

impl From<HashError> for DeriveError {
    fn from(err: HashError) -> Self {
        match err {
            HashError::Unavailable(reason) => DeriveError::CollaboratorUnavailable(reason),
        }
    }
}
