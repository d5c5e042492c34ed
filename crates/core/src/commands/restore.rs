//! `restore` command: re-create developers and apps from records.
use std::path::Path;

use derive_setters::Setters;
use log::{debug, error, info, warn};
use serde_derive::{Deserialize, Serialize};

use crate::{
    client::{ResourceClient, wire::NewKey},
    error::{ErrorKind, OrgSnapError, OrgSnapResult},
    progress::ProgressBars,
    record::{AppRecord, Credential, DeveloperRecord},
    store::RecordStore,
};

/// Which product grants of a credential are restored.
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GrantMode {
    /// Only the first backed-up product of each credential is granted again
    #[default]
    First,
    /// All backed-up products of each credential are granted again
    All,
}

impl GrantMode {
    /// The products to grant to `credential`, in backup order.
    #[must_use]
    pub fn products(self, credential: &Credential) -> Vec<String> {
        let grants = credential.api_products.iter();
        match self {
            Self::First => grants.take(1).map(|g| g.api_product.clone()).collect(),
            Self::All => grants.map(|g| g.api_product.clone()).collect(),
        }
    }
}

/// Options for the `restore` command
#[cfg_attr(feature = "clap", derive(clap::Parser))]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
#[setters(into)]
#[non_exhaustive]
pub struct RestoreOptions {
    /// Only show what would be created, don't create anything in the target organization
    #[cfg_attr(feature = "clap", clap(long))]
    pub dry_run: bool,

    /// Which product grants of each credential to restore
    #[cfg_attr(
        feature = "clap",
        clap(long, value_enum, value_name = "MODE", default_value_t)
    )]
    pub grants: GrantMode,
}

/// Restore statistics
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreStats {
    /// Number of resources created
    pub restored: u64,
    /// Number of apps created, but with some keys or grants missing
    pub partial: u64,
    /// Number of resources which could not be created
    pub failed: u64,
    /// Number of record files which could not be read
    pub skipped: u64,
}

/// State of a single credential while restoring an app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialState {
    /// Nothing has been done yet
    Pending,
    /// The key has been created, products have not been granted yet
    Keyed,
    /// The key has been created and the products have been granted
    Granted,
    /// The key has been created; it had no products to grant
    GrantSkipped,
    /// Creating the key failed
    KeyFailed(String),
    /// The key has been created, but granting the products failed
    GrantFailed(String),
}

impl CredentialState {
    /// Whether the key exists in the target organization.
    #[must_use]
    pub const fn is_keyed(&self) -> bool {
        matches!(
            self,
            Self::Keyed | Self::Granted | Self::GrantSkipped | Self::GrantFailed(_)
        )
    }

    /// Whether restoring the credential failed in any step.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::KeyFailed(_) | Self::GrantFailed(_))
    }
}

/// Restore progress of a single credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRestore {
    /// The consumer key
    pub consumer_key: String,
    /// The products to grant
    pub products: Vec<String>,
    /// The current state
    pub state: CredentialState,
}

impl CredentialRestore {
    fn new(credential: &Credential, grants: GrantMode) -> Self {
        Self {
            consumer_key: credential.consumer_key.clone(),
            products: grants.products(credential),
            state: CredentialState::Pending,
        }
    }

    /// `Pending -> Keyed | KeyFailed`
    fn create_key<C: ResourceClient>(
        &mut self,
        client: &C,
        org: &str,
        app: &AppRecord,
        credential: &Credential,
    ) {
        let key = NewKey {
            consumer_key: credential.consumer_key.clone(),
            consumer_secret: credential.consumer_secret.clone(),
        };
        match client.create_key(org, app.developer_email(), &app.name, &key) {
            Ok(_) => {
                info!("created key `{}` for app `{}`", self.consumer_key, app.name);
                self.state = CredentialState::Keyed;
            }
            Err(err) => {
                error!(
                    "creating key `{}` for app `{}` failed: {err}",
                    self.consumer_key, app.name
                );
                self.state = CredentialState::KeyFailed(err.display_guidance());
            }
        }
    }

    /// `Keyed -> Granted | GrantSkipped | GrantFailed`
    fn grant<C: ResourceClient>(&mut self, client: &C, org: &str, app: &AppRecord) {
        if self.state != CredentialState::Keyed {
            return;
        }
        if self.products.is_empty() {
            warn!(
                "key `{}` of app `{}` has no products, not granting any",
                self.consumer_key, app.name
            );
            self.state = CredentialState::GrantSkipped;
            return;
        }
        match client.grant_products(
            org,
            app.developer_email(),
            &app.name,
            &self.consumer_key,
            &self.products,
        ) {
            Ok(()) => {
                info!(
                    "granted {:?} to key `{}` of app `{}`",
                    self.products, self.consumer_key, app.name
                );
                self.state = CredentialState::Granted;
            }
            Err(err) => {
                error!(
                    "granting {:?} to key `{}` of app `{}` failed: {err}",
                    self.products, self.consumer_key, app.name
                );
                self.state = CredentialState::GrantFailed(err.display_guidance());
            }
        }
    }
}

/// Result of restoring a single app: the app has been created; the states of its
/// credentials show which keys and grants could be restored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRestore {
    /// Name of the app
    pub name: String,
    /// Email of the owning developer
    pub developer_email: String,
    /// One entry per credential, in record order
    pub credentials: Vec<CredentialRestore>,
}

impl AppRestore {
    /// Number of keys which exist in the target organization.
    #[must_use]
    pub fn keyed(&self) -> usize {
        self.credentials
            .iter()
            .filter(|c| c.state.is_keyed())
            .count()
    }

    /// Number of credentials whose products were granted.
    #[must_use]
    pub fn granted(&self) -> usize {
        self.credentials
            .iter()
            .filter(|c| c.state == CredentialState::Granted)
            .count()
    }

    /// Whether all credentials were restored without failure.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.credentials.iter().any(|c| c.state.is_failed())
    }
}

/// Restore a single app with its credentials and product grants.
///
/// The app is created first; without it there is nothing to attach keys to, so a failure
/// there is returned as error. Afterwards each credential is created with its backed-up key
/// and secret and then associated with its products. Failures of single credentials are
/// logged and recorded in the returned [`AppRestore`].
///
/// # Errors
///
/// * If the record has no credentials.
/// * If the app could not be created, e.g. because it already exists.
pub(crate) fn restore_app<C: ResourceClient>(
    client: &C,
    org: &str,
    app: &AppRecord,
    opts: RestoreOptions,
) -> OrgSnapResult<AppRestore> {
    if app.credentials.is_empty() {
        return Err(OrgSnapError::new(
            ErrorKind::InvalidInput,
            "App `{app}` has no credentials. Apps without credentials cannot be restored.",
        )
        .attach_context("app", app.name.clone()));
    }

    let email = app.developer_email();
    _ = client
        .create_app(org, email, &app.to_new_app())
        .map_err(|err| {
            OrgSnapError::with_source(
                ErrorKind::Restore,
                "Creating app `{app}` of developer `{developer}` failed. Please check that the developer exists and that the app does not exist yet.",
                err,
            )
            .attach_context("app", app.name.clone())
            .attach_context("developer", email)
        })?;
    info!("created app `{}` of developer `{email}`", app.name);

    let mut restore = AppRestore {
        name: app.name.clone(),
        developer_email: email.to_string(),
        credentials: app
            .credentials
            .iter()
            .map(|credential| CredentialRestore::new(credential, opts.grants))
            .collect(),
    };

    for (state, credential) in restore.credentials.iter_mut().zip(&app.credentials) {
        state.create_key(client, org, app, credential);
        state.grant(client, org, app);
    }

    Ok(restore)
}

/// Restore the app stored in a single record file.
///
/// # Errors
///
/// * If the file could not be read or parsed.
/// * If the app could not be restored, see [`restore_app`].
pub(crate) fn restore_app_file<C: ResourceClient>(
    client: &C,
    org: &str,
    path: &Path,
    opts: RestoreOptions,
) -> OrgSnapResult<AppRestore> {
    let app: AppRecord = RecordStore::read_file(path)?;
    restore_app(client, org, &app, opts)
}

/// Restore all apps of a record store.
///
/// Each record is restored independently; an app which cannot be restored is logged and
/// counted, and the next record is processed.
///
/// # Errors
///
/// * If the store directory could not be listed.
pub(crate) fn restore_apps<P: ProgressBars, C: ResourceClient>(
    client: &C,
    pb: &P,
    org: &str,
    store: &RecordStore,
    opts: RestoreOptions,
) -> OrgSnapResult<RestoreStats> {
    let files = store.list::<AppRecord>()?;
    info!("restoring {} apps from {} to {}", files.len(), store.location(), client.location());

    let p = pb.progress_counter("restoring apps...");
    p.set_length(files.len() as u64);
    let mut stats = RestoreStats::default();
    for path in files {
        match RecordStore::read_file::<AppRecord>(&path) {
            Err(err) => {
                warn!("skipping {}: {err}", path.display());
                stats.skipped += 1;
            }
            Ok(app) => match restore_app(client, org, &app, opts) {
                Ok(restore) if restore.is_complete() => stats.restored += 1,
                Ok(restore) => {
                    warn!(
                        "app `{}` restored partially: {} of {} keys created, {} granted",
                        restore.name,
                        restore.keyed(),
                        restore.credentials.len(),
                        restore.granted()
                    );
                    stats.partial += 1;
                }
                Err(err) => {
                    error!("restoring app `{}` failed: {err}", app.name);
                    stats.failed += 1;
                }
            },
        }
        p.inc(1);
    }
    p.finish();
    Ok(stats)
}

/// Restore all developers of a record store.
///
/// # Errors
///
/// * If the store directory could not be listed.
pub(crate) fn restore_developers<P: ProgressBars, C: ResourceClient>(
    client: &C,
    pb: &P,
    org: &str,
    store: &RecordStore,
) -> OrgSnapResult<RestoreStats> {
    let files = store.list::<DeveloperRecord>()?;
    info!(
        "restoring {} developers from {} to {}",
        files.len(),
        store.location(),
        client.location()
    );

    let p = pb.progress_counter("restoring developers...");
    p.set_length(files.len() as u64);
    let mut stats = RestoreStats::default();
    for path in files {
        match RecordStore::read_file::<DeveloperRecord>(&path) {
            Err(err) => {
                warn!("skipping {}: {err}", path.display());
                stats.skipped += 1;
            }
            Ok(developer) => {
                let payload = developer.to_wire();
                debug!("creating developer {payload:?}");
                match client.create_developer(org, &payload) {
                    Ok(_) => {
                        info!("created developer `{}`", developer.email);
                        stats.restored += 1;
                    }
                    Err(err) => {
                        error!("creating developer `{}` failed: {err}", developer.email);
                        stats.failed += 1;
                    }
                }
            }
        }
        p.inc(1);
    }
    p.finish();
    Ok(stats)
}
