//! Errors raised while talking to the remote spreadsheet.

/// Failure of any step of an append: credentials, auth, network or API.
///
/// None of these are retried; the submit that triggered them is aborted.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The credential environment variable is unset or empty.
    #[error("credential variable '{var}' is not set")]
    MissingCredentials {
        /// Name of the environment variable.
        var: String,
    },

    /// The credential blob is not a usable service-account key.
    #[error("malformed service-account credentials: {0}")]
    MalformedCredentials(String),

    /// The token request assertion could not be signed.
    #[error("failed to sign token request: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// Transport-level failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote API answered with a non-success status.
    #[error("remote store returned HTTP {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        message: String,
    },

    /// No spreadsheet with the configured title is visible to the account.
    #[error("spreadsheet not found: {0}")]
    SpreadsheetNotFound(String),

    /// The spreadsheet exists but has no worksheet.
    #[error("spreadsheet '{0}' has no worksheets")]
    NoWorksheet(String),

    /// A configured API base URL cannot be used to build request URLs.
    #[error("invalid endpoint url: {0}")]
    InvalidEndpoint(String),
}

impl StoreError {
    /// Returns `true` for configuration problems with the credential blob,
    /// as opposed to failures of the remote service.
    #[must_use]
    pub const fn is_credentials(&self) -> bool {
        matches!(
            self,
            Self::MissingCredentials { .. } | Self::MalformedCredentials(_)
        )
    }
}
