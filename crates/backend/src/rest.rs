use std::time::Duration;

use log::trace;
use reqwest::{
    Method, Url,
    blocking::{Client, ClientBuilder, Response},
    header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_derive::Deserialize;

use orgsnap_core::{
    ErrorKind, OrgSnapError, OrgSnapResult, ResourceClient,
    wire::{
        AppSummary, Credential, Developer, DeveloperApp, DeveloperSummary, NewApp, NewKey,
        ProductAssociation,
    },
};

use crate::credentials::AccessToken;

/// URL `{0}` cannot be used as base URL
#[derive(thiserror::Error, Clone, Debug, displaydoc::Display)]
pub struct CannotBeABaseError(String);

pub(crate) mod constants {
    use std::time::Duration;

    /// Default base URL of the management API
    pub(crate) const DEFAULT_BASE_URL: &str = "https://apigee.googleapis.com/v1/";

    /// Default timeout for the client
    /// This is set to 10 minutes
    pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);
}

/// Response of the developer list call
#[derive(Deserialize)]
struct DeveloperList {
    #[serde(default)]
    developer: Vec<DeveloperSummary>,
}

/// Response of the app list call
#[derive(Deserialize)]
struct AppList {
    #[serde(default)]
    app: Vec<AppSummary>,
}

/// Turn non-success responses into errors carrying status and body.
fn check_status(response: Response, method: &Method, url: &Url) -> OrgSnapResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(OrgSnapError::new(
        ErrorKind::Client,
        "{method} `{url}` failed with status `{status}`: {body}",
    )
    .attach_context("method", method.as_str())
    .attach_context("url", url.as_str())
    .attach_context("status", status.as_u16().to_string())
    .attach_context("body", body))
}

/// A [`ResourceClient`] talking to the management API over HTTPS.
///
/// Every call is attempted exactly once.
#[derive(Clone, Debug)]
pub struct RestClient {
    /// The base url of the API.
    url: Url,
    /// The client to use.
    client: Client,
}

impl RestClient {
    /// Create a new [`RestClient`].
    ///
    /// # Arguments
    ///
    /// * `url` - The base URL of the API
    /// * `token` - The access token to authenticate with
    /// * `timeout` - The timeout of a single request
    ///
    /// # Errors
    ///
    /// * If the url could not be parsed.
    /// * If the client could not be built.
    pub fn new(url: impl AsRef<str>, token: &AccessToken, timeout: Duration) -> OrgSnapResult<Self> {
        let mut url = url.as_ref().to_string();
        if !url.ends_with('/') {
            url.push('/');
        }

        let url = Url::parse(&url).map_err(|err| {
            OrgSnapError::with_source(ErrorKind::InvalidInput, "URL `{url}` parsing failed", err)
                .attach_context("url", url.clone())
        })?;
        if url.cannot_be_a_base() {
            return Err(OrgSnapError::with_source(
                ErrorKind::InvalidInput,
                "URL `{url}` cannot be used as base URL",
                CannotBeABaseError(url.to_string()),
            )
            .attach_context("url", url.as_str()));
        }

        let mut headers = HeaderMap::new();
        _ = headers.insert(USER_AGENT, HeaderValue::from_static("orgsnap"));
        let mut auth = HeaderValue::from_str(&token.authorization()).map_err(|err| {
            OrgSnapError::with_source(
                ErrorKind::Config,
                "The access token contains characters which are not allowed in a header.",
                err,
            )
        })?;
        auth.set_sensitive(true);
        _ = headers.insert(AUTHORIZATION, auth);

        let client = ClientBuilder::new()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| {
                OrgSnapError::with_source(ErrorKind::Client, "Failed to build HTTP client", err)
            })?;

        Ok(Self { url, client })
    }

    /// Returns the url for the given path segments below the base url.
    ///
    /// Segments are percent-encoded, so emails and names can be used as they are.
    fn url(&self, segments: &[&str]) -> OrgSnapResult<Url> {
        let mut url = self.url.clone();
        _ = url
            .path_segments_mut()
            .map_err(|()| {
                OrgSnapError::with_source(
                    ErrorKind::Internal,
                    "URL `{url}` cannot be used as base URL",
                    CannotBeABaseError(self.url.to_string()),
                )
                .attach_context("url", self.url.as_str())
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn send(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&impl Serialize>,
    ) -> OrgSnapResult<Response> {
        let url = self.url(segments)?;
        trace!("{method} {url}");

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().map_err(|err| {
            OrgSnapError::with_source(ErrorKind::Client, "{method} `{url}` failed.", err)
                .attach_context("method", method.as_str())
                .attach_context("url", url.as_str())
        })?;
        check_status(response, &method, &url)
    }

    fn json<T: DeserializeOwned>(response: Response) -> OrgSnapResult<T> {
        let url = response.url().to_string();
        response.json().map_err(|err| {
            OrgSnapError::with_source(
                ErrorKind::Parsing,
                "The response of `{url}` could not be parsed.",
                err,
            )
            .attach_context("url", url)
        })
    }

    fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> OrgSnapResult<T> {
        Self::json(self.send(Method::GET, segments, None::<&()>)?)
    }

    fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> OrgSnapResult<T> {
        Self::json(self.send(Method::POST, segments, Some(body))?)
    }
}

impl ResourceClient for RestClient {
    fn location(&self) -> String {
        let mut location = "rest:".to_string();
        location.push_str(self.url.as_str());
        location
    }

    fn list_developers(&self, org: &str) -> OrgSnapResult<Vec<DeveloperSummary>> {
        let list: DeveloperList = self.get(&["organizations", org, "developers"])?;
        Ok(list.developer)
    }

    fn get_developer(&self, org: &str, email: &str) -> OrgSnapResult<Developer> {
        self.get(&["organizations", org, "developers", email])
    }

    fn list_apps(&self, org: &str, email: &str) -> OrgSnapResult<Vec<AppSummary>> {
        let list: AppList = self.get(&["organizations", org, "developers", email, "apps"])?;
        Ok(list.app)
    }

    fn get_app(&self, org: &str, email: &str, name: &str) -> OrgSnapResult<DeveloperApp> {
        self.get(&["organizations", org, "developers", email, "apps", name])
    }

    fn create_developer(&self, org: &str, developer: &Developer) -> OrgSnapResult<Developer> {
        self.post(&["organizations", org, "developers"], developer)
    }

    fn create_app(&self, org: &str, email: &str, app: &NewApp) -> OrgSnapResult<DeveloperApp> {
        self.post(&["organizations", org, "developers", email, "apps"], app)
    }

    fn create_key(
        &self,
        org: &str,
        email: &str,
        app_name: &str,
        key: &NewKey,
    ) -> OrgSnapResult<Credential> {
        self.post(
            &["organizations", org, "developers", email, "apps", app_name, "keys"],
            key,
        )
    }

    fn grant_products(
        &self,
        org: &str,
        email: &str,
        app_name: &str,
        consumer_key: &str,
        products: &[String],
    ) -> OrgSnapResult<()> {
        let body = ProductAssociation {
            api_products: products.to_vec(),
        };
        _ = self.send(
            Method::POST,
            &[
                "organizations",
                org,
                "developers",
                email,
                "apps",
                app_name,
                "keys",
                consumer_key,
            ],
            Some(&body),
        )?;
        Ok(())
    }
}
