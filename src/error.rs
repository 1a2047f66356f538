use thiserror::Error;

/// Failure taxonomy for studio operations.
///
/// `Validation` failures are detected locally and never reach a provider.
/// `Provider` failures carry the upstream error text verbatim so the UI can
/// surface it unchanged. `Decode` covers a malformed image payload and
/// terminates the generate action that hit it.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("{0}")]
    Validation(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("{0}")]
    Provider(String),

    #[error("could not decode image payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

impl StudioError {
    /// True for failures the user can fix locally (missing key, empty
    /// input, disabled toggle) as opposed to upstream or decode failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, StudioError::Validation(_))
    }
}
