//! Module for the resource client, i.e. the access to the remote management API.
pub(crate) mod dry_run;
pub mod wire;

use std::{ops::Deref, sync::Arc};

#[cfg(test)]
use mockall::mock;

use crate::error::OrgSnapResult;

use wire::{AppSummary, Developer, DeveloperApp, DeveloperSummary, NewApp, NewKey};

/// Trait for clients of the management API.
///
/// An implementation is constructed once and passed explicitly to everything that talks to
/// the API. All calls are blocking; every call is attempted exactly once.
pub trait ResourceClient: Send + Sync + 'static {
    /// Returns the location of the API this client talks to.
    fn location(&self) -> String;

    /// Lists all developers of an organization.
    ///
    /// # Arguments
    ///
    /// * `org` - The organization
    fn list_developers(&self, org: &str) -> OrgSnapResult<Vec<DeveloperSummary>>;

    /// Gets the details of a developer.
    ///
    /// # Arguments
    ///
    /// * `org` - The organization
    /// * `email` - The email of the developer
    fn get_developer(&self, org: &str, email: &str) -> OrgSnapResult<Developer>;

    /// Lists the apps of a developer. Only summaries are returned.
    ///
    /// # Arguments
    ///
    /// * `org` - The organization
    /// * `email` - The email of the developer
    fn list_apps(&self, org: &str, email: &str) -> OrgSnapResult<Vec<AppSummary>>;

    /// Gets the details of an app including attributes, credentials and product grants.
    ///
    /// # Arguments
    ///
    /// * `org` - The organization
    /// * `email` - The email of the owning developer
    /// * `name` - The name of the app
    fn get_app(&self, org: &str, email: &str, name: &str) -> OrgSnapResult<DeveloperApp>;

    /// Creates a developer.
    ///
    /// # Arguments
    ///
    /// * `org` - The organization
    /// * `developer` - The developer to create
    fn create_developer(&self, org: &str, developer: &Developer) -> OrgSnapResult<Developer>;

    /// Creates an app under a developer.
    ///
    /// # Arguments
    ///
    /// * `org` - The organization
    /// * `email` - The email of the owning developer
    /// * `app` - Name and attributes of the app
    fn create_app(&self, org: &str, email: &str, app: &NewApp) -> OrgSnapResult<DeveloperApp>;

    /// Creates a key/secret pair on an app.
    ///
    /// # Arguments
    ///
    /// * `org` - The organization
    /// * `email` - The email of the owning developer
    /// * `app_name` - The name of the app
    /// * `key` - The consumer key and secret to create
    fn create_key(
        &self,
        org: &str,
        email: &str,
        app_name: &str,
        key: &NewKey,
    ) -> OrgSnapResult<wire::Credential>;

    /// Associates a key with products.
    ///
    /// This cannot be done when creating the key and is a separate request.
    ///
    /// # Arguments
    ///
    /// * `org` - The organization
    /// * `email` - The email of the owning developer
    /// * `app_name` - The name of the app
    /// * `consumer_key` - The key to associate
    /// * `products` - The names of the products
    fn grant_products(
        &self,
        org: &str,
        email: &str,
        app_name: &str,
        consumer_key: &str,
        products: &[String],
    ) -> OrgSnapResult<()>;
}

#[cfg(test)]
mock! {
    pub(crate) Client {}

    impl ResourceClient for Client {
        fn location(&self) -> String;
        fn list_developers(&self, org: &str) -> OrgSnapResult<Vec<DeveloperSummary>>;
        fn get_developer(&self, org: &str, email: &str) -> OrgSnapResult<Developer>;
        fn list_apps(&self, org: &str, email: &str) -> OrgSnapResult<Vec<AppSummary>>;
        fn get_app(&self, org: &str, email: &str, name: &str) -> OrgSnapResult<DeveloperApp>;
        fn create_developer(&self, org: &str, developer: &Developer) -> OrgSnapResult<Developer>;
        fn create_app(&self, org: &str, email: &str, app: &NewApp) -> OrgSnapResult<DeveloperApp>;
        fn create_key(
            &self,
            org: &str,
            email: &str,
            app_name: &str,
            key: &NewKey,
        ) -> OrgSnapResult<wire::Credential>;
        fn grant_products(
            &self,
            org: &str,
            email: &str,
            app_name: &str,
            consumer_key: &str,
            products: &[String],
        ) -> OrgSnapResult<()>;
    }
}

impl ResourceClient for Arc<dyn ResourceClient> {
    fn location(&self) -> String {
        self.deref().location()
    }
    fn list_developers(&self, org: &str) -> OrgSnapResult<Vec<DeveloperSummary>> {
        self.deref().list_developers(org)
    }
    fn get_developer(&self, org: &str, email: &str) -> OrgSnapResult<Developer> {
        self.deref().get_developer(org, email)
    }
    fn list_apps(&self, org: &str, email: &str) -> OrgSnapResult<Vec<AppSummary>> {
        self.deref().list_apps(org, email)
    }
    fn get_app(&self, org: &str, email: &str, name: &str) -> OrgSnapResult<DeveloperApp> {
        self.deref().get_app(org, email, name)
    }
    fn create_developer(&self, org: &str, developer: &Developer) -> OrgSnapResult<Developer> {
        self.deref().create_developer(org, developer)
    }
    fn create_app(&self, org: &str, email: &str, app: &NewApp) -> OrgSnapResult<DeveloperApp> {
        self.deref().create_app(org, email, app)
    }
    fn create_key(
        &self,
        org: &str,
        email: &str,
        app_name: &str,
        key: &NewKey,
    ) -> OrgSnapResult<wire::Credential> {
        self.deref().create_key(org, email, app_name, key)
    }
    fn grant_products(
        &self,
        org: &str,
        email: &str,
        app_name: &str,
        consumer_key: &str,
        products: &[String],
    ) -> OrgSnapResult<()> {
        self.deref()
            .grant_products(org, email, app_name, consumer_key, products)
    }
}
