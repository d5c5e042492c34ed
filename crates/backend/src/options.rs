//! This module contains [`ClientOptions`] to create a [`RestClient`].
use derive_setters::Setters;
use serde_derive::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use orgsnap_core::OrgSnapResult;

use crate::{
    credentials::AccessToken,
    rest::{RestClient, constants},
};

/// Options for the client of the management API.
#[serde_as]
#[cfg_attr(feature = "clap", derive(clap::Parser))]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Setters)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
#[setters(into)]
#[non_exhaustive]
pub struct ClientOptions {
    /// Base URL of the management API
    #[cfg_attr(
        feature = "clap",
        clap(long, global = true, env = "ORGSNAP_BASE_URL", default_value = constants::DEFAULT_BASE_URL)
    )]
    pub base_url: String,

    /// Timeout of a single request, e.g. "30s" or "10min"
    #[cfg_attr(
        feature = "clap",
        clap(long, global = true, env = "ORGSNAP_TIMEOUT", default_value = "10min")
    )]
    #[serde_as(as = "DisplayFromStr")]
    pub timeout: humantime::Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_BASE_URL.to_string(),
            timeout: constants::DEFAULT_TIMEOUT.into(),
        }
    }
}

impl ClientOptions {
    /// Create the client.
    ///
    /// # Arguments
    ///
    /// * `token` - The access token to authenticate with
    ///
    /// # Errors
    ///
    /// * If the base URL is invalid.
    /// * If the client could not be built.
    pub fn to_client(&self, token: &AccessToken) -> OrgSnapResult<RestClient> {
        RestClient::new(&self.base_url, token, *self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use pretty_assertions::assert_eq;

    #[test]
    fn default_options() {
        let opts = ClientOptions::default();
        assert_eq!(opts.base_url, "https://apigee.googleapis.com/v1/");
        assert_eq!(*opts.timeout, Duration::from_secs(600));
    }

    #[test]
    fn options_are_read_in_kebab_case() {
        let opts: ClientOptions =
            serde_json::from_str(r#"{"base-url": "http://localhost:8080/", "timeout": "30s"}"#)
                .unwrap();
        assert_eq!(opts.base_url, "http://localhost:8080/");
        assert_eq!(*opts.timeout, Duration::from_secs(30));
    }

    #[test]
    fn unknown_options_are_rejected() {
        assert!(serde_json::from_str::<ClientOptions>(r#"{"retry": 5}"#).is_err());
    }
}
