//! Google service-account credentials and OAuth2 assertion signing.
//!
//! The credential blob is the JSON key file Google issues for a service
//! account. It is read from its [`CredentialSource`] on every use, so a
//! rotated key takes effect without a restart and a missing one fails the
//! submit that needed it.

use std::fmt;

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use super::StoreError;

/// OAuth2 scopes requested for the Sheets and Drive APIs.
pub const SHEETS_SCOPES: &str =
    "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive";

/// Grant type of the JWT bearer token exchange.
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Google's token endpoint, used when the key omits `token_uri`.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Lifetime of a signed assertion (Google's maximum).
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Where the service-account JSON comes from.
#[derive(Clone)]
pub enum CredentialSource {
    /// Read the named environment variable at every use.
    Environment {
        /// Variable name.
        var: String,
    },
    /// A JSON blob held in memory.
    Inline(String),
}

impl CredentialSource {
    /// Source reading the environment variable `var`.
    #[must_use]
    pub fn environment(var: impl Into<String>) -> Self {
        Self::Environment { var: var.into() }
    }

    /// Reads and parses the key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingCredentials`] if the variable is unset or
    /// empty, and [`StoreError::MalformedCredentials`] if its content is not a
    /// service-account key.
    pub fn load(&self) -> Result<ServiceAccountKey, StoreError> {
        match self {
            Self::Environment { var } => {
                let json = std::env::var(var).map_err(|err| match err {
                    std::env::VarError::NotPresent => {
                        StoreError::MissingCredentials { var: var.clone() }
                    }
                    std::env::VarError::NotUnicode(_) => StoreError::MalformedCredentials(
                        format!("variable '{var}' is not valid unicode"),
                    ),
                })?;
                if json.trim().is_empty() {
                    return Err(StoreError::MissingCredentials { var: var.clone() });
                }
                ServiceAccountKey::from_json(&json)
            }
            Self::Inline(json) => ServiceAccountKey::from_json(json),
        }
    }
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment { var } => f.debug_struct("Environment").field("var", var).finish(),
            Self::Inline(_) => f.write_str("Inline(***)"),
        }
    }
}

/// The fields of a service-account key file this service needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Service account e-mail, the assertion issuer.
    pub client_email: String,
    /// PEM-encoded RSA private key.
    private_key: String,
    /// Key identifier, forwarded as the JWT `kid`.
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// Token endpoint the assertion is exchanged at.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

impl ServiceAccountKey {
    /// Parses a key file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MalformedCredentials`] if the JSON is invalid or
    /// lacks `client_email` / `private_key`.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json).map_err(|err| StoreError::MalformedCredentials(err.to_string()))
    }

    /// Signs the RS256 assertion exchanged for an access token.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MalformedCredentials`] if the private key is not
    /// a valid RSA PEM, or [`StoreError::Signing`] if signing fails.
    pub fn sign_assertion(&self, scopes: &str, issued_at: i64) -> Result<String, StoreError> {
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|err| StoreError::MalformedCredentials(format!("private_key: {err}")))?;

        let mut header = Header::new(Algorithm::RS256);
        header.kid.clone_from(&self.private_key_id);

        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: scopes,
            aud: &self.token_uri,
            iat: issued_at,
            exp: issued_at.saturating_add(ASSERTION_LIFETIME_SECS),
        };
        Ok(jsonwebtoken::encode(&header, &claims, &key)?)
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"***")
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// OAuth2 bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}
