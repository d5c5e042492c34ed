use log::info;

use crate::{
    client::{
        ResourceClient,
        wire::{self, AppSummary, Developer, DeveloperApp, DeveloperSummary, NewApp, NewKey},
    },
    error::OrgSnapResult,
};

/// A client which does not actually create anything in the target organization.
///
/// Reads are always delegated. If `dry_run` is set, creating calls are only logged and
/// answered with what the API would most likely have returned.
#[derive(Clone, Debug)]
pub struct DryRunClient<C: ResourceClient> {
    /// The client to use.
    client: C,
    /// Whether to skip the creating calls.
    dry_run: bool,
}

impl<C: ResourceClient> DryRunClient<C> {
    /// Create a new [`DryRunClient`].
    ///
    /// # Arguments
    ///
    /// * `client` - The client to use.
    /// * `dry_run` - Whether to skip the creating calls.
    pub const fn new(client: C, dry_run: bool) -> Self {
        Self { client, dry_run }
    }
}

impl<C: ResourceClient> ResourceClient for DryRunClient<C> {
    fn location(&self) -> String {
        self.client.location()
    }

    fn list_developers(&self, org: &str) -> OrgSnapResult<Vec<DeveloperSummary>> {
        self.client.list_developers(org)
    }

    fn get_developer(&self, org: &str, email: &str) -> OrgSnapResult<Developer> {
        self.client.get_developer(org, email)
    }

    fn list_apps(&self, org: &str, email: &str) -> OrgSnapResult<Vec<AppSummary>> {
        self.client.list_apps(org, email)
    }

    fn get_app(&self, org: &str, email: &str, name: &str) -> OrgSnapResult<DeveloperApp> {
        self.client.get_app(org, email, name)
    }

    fn create_developer(&self, org: &str, developer: &Developer) -> OrgSnapResult<Developer> {
        if self.dry_run {
            info!("would create developer `{}` in `{org}`", developer.email);
            Ok(developer.clone())
        } else {
            self.client.create_developer(org, developer)
        }
    }

    fn create_app(&self, org: &str, email: &str, app: &NewApp) -> OrgSnapResult<DeveloperApp> {
        if self.dry_run {
            info!("would create app `{}` of developer `{email}` in `{org}`", app.name);
            Ok(DeveloperApp {
                name: app.name.clone(),
                attributes: app.attributes.clone(),
                status: "approved".to_string(),
                ..Default::default()
            })
        } else {
            self.client.create_app(org, email, app)
        }
    }

    fn create_key(
        &self,
        org: &str,
        email: &str,
        app_name: &str,
        key: &NewKey,
    ) -> OrgSnapResult<wire::Credential> {
        if self.dry_run {
            info!("would create key `{}` for app `{app_name}`", key.consumer_key);
            Ok(wire::Credential {
                consumer_key: key.consumer_key.clone(),
                consumer_secret: key.consumer_secret.clone(),
                expires_at: -1,
                status: "approved".to_string(),
                ..Default::default()
            })
        } else {
            self.client.create_key(org, email, app_name, key)
        }
    }

    fn grant_products(
        &self,
        org: &str,
        email: &str,
        app_name: &str,
        consumer_key: &str,
        products: &[String],
    ) -> OrgSnapResult<()> {
        if self.dry_run {
            info!(
                "would grant products {products:?} to key `{consumer_key}` of app `{app_name}`"
            );
            Ok(())
        } else {
            self.client
                .grant_products(org, email, app_name, consumer_key, products)
        }
    }
}
