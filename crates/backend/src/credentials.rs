//! Reading the access token used to authenticate against the management API.
use std::{fmt, fs, path::Path};

use serde_derive::Deserialize;

use orgsnap_core::{ErrorKind, OrgSnapError, OrgSnapResult};

/// An OAuth access token, as found in a credential file:
///
/// ```json
/// {"access_token": "ya29...", "token_type": "Bearer"}
/// ```
#[derive(Clone, Deserialize)]
pub struct AccessToken {
    /// The token
    access_token: String,
    /// The type of the token; only bearer tokens are supported
    #[serde(default = "AccessToken::bearer")]
    token_type: String,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"***")
            .field("token_type", &self.token_type)
            .finish()
    }
}

impl AccessToken {
    fn bearer() -> String {
        "Bearer".to_string()
    }

    /// Create a bearer token.
    ///
    /// # Errors
    ///
    /// * If the token is empty.
    pub fn new(token: impl Into<String>) -> OrgSnapResult<Self> {
        Self {
            access_token: token.into(),
            token_type: Self::bearer(),
        }
        .validated()
    }

    /// Read the token from a credential file.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the credential file
    ///
    /// # Errors
    ///
    /// * If the file could not be read.
    /// * If the file is not valid JSON or does not contain an `access_token`.
    /// * If the token is empty or not a bearer token.
    pub fn from_file(path: impl AsRef<Path>) -> OrgSnapResult<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|err| {
            OrgSnapError::with_source(
                ErrorKind::Config,
                "Reading the credential file `{path}` failed. Please check the path.",
                err,
            )
            .attach_context("path", path.display().to_string())
        })?;

        let token: Self = serde_json::from_slice(&data).map_err(|err| {
            OrgSnapError::with_source(
                ErrorKind::Config,
                "The credential file `{path}` does not contain an `access_token`.",
                err,
            )
            .attach_context("path", path.display().to_string())
        })?;

        token
            .validated()
            .map_err(|err| err.attach_context("path", path.display().to_string()))
    }

    fn validated(self) -> OrgSnapResult<Self> {
        if self.access_token.trim().is_empty() {
            return Err(OrgSnapError::new(
                ErrorKind::Config,
                "The access token is empty. Please provide a valid token.",
            ));
        }
        if !self.token_type.eq_ignore_ascii_case("bearer") {
            return Err(OrgSnapError::new(
                ErrorKind::Config,
                "Token type `{token_type}` is not supported, only `Bearer` tokens can be used.",
            )
            .attach_context("token_type", self.token_type));
        }
        Ok(self)
    }

    /// The value of the `Authorization` header.
    #[must_use]
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.access_token.trim())
    }
}
