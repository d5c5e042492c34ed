use std::{path::Path, sync::Arc};

use crate::{
    client::{ResourceClient, dry_run::DryRunClient},
    commands::{
        self,
        backup::{AppWalker, BackupStats, DeveloperWalker},
        restore::{AppRestore, RestoreOptions, RestoreStats},
    },
    error::OrgSnapResult,
    progress::{NoProgressBars, ProgressBars},
    record::AppRecord,
    store::RecordStore,
};

/// An organization of the management API, accessed through a [`ResourceClient`].
///
/// This is the entry point for all backup and restore actions. The same client is used for
/// all calls made on behalf of this organization.
#[derive(Clone)]
pub struct Organization<P> {
    /// The name of the organization
    pub name: String,

    /// The client to access the organization
    pub(crate) client: Arc<dyn ResourceClient>,

    /// Handle for progress bars
    pub(crate) pb: P,
}

impl<P: std::fmt::Debug> std::fmt::Debug for Organization<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Organization")
            .field("name", &self.name)
            .field("client", &self.client.location())
            .field("pb", &self.pb)
            .finish()
    }
}

impl Organization<NoProgressBars> {
    /// Create a new organization handle (without progress bars)
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the organization
    /// * `client` - The client to access the organization
    pub fn new(name: impl Into<String>, client: impl ResourceClient) -> Self {
        Self::new_with_progress(name, client, NoProgressBars)
    }
}

impl<P> Organization<P> {
    /// Create a new organization handle with given progress bars
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the organization
    /// * `client` - The client to access the organization
    /// * `pb` - The progress bars to use
    pub fn new_with_progress(name: impl Into<String>, client: impl ResourceClient, pb: P) -> Self {
        Self {
            name: name.into(),
            client: Arc::new(client),
            pb,
        }
    }

    /// Returns the location of the API this organization is accessed through.
    #[must_use]
    pub fn location(&self) -> String {
        self.client.location()
    }

    /// Walk all developers of this organization.
    ///
    /// # Errors
    ///
    /// * If the developers could not be listed.
    pub fn developer_records(&self) -> OrgSnapResult<DeveloperWalker<'_, Arc<dyn ResourceClient>>> {
        DeveloperWalker::new(&self.client, &self.name)
    }

    /// Walk all apps of all developers of this organization.
    ///
    /// # Errors
    ///
    /// * If the developers could not be listed.
    pub fn app_records(&self) -> OrgSnapResult<AppWalker<'_, Arc<dyn ResourceClient>>> {
        AppWalker::new(&self.client, &self.name)
    }

    /// Restore a single app with its credentials and product grants.
    ///
    /// # Arguments
    ///
    /// * `app` - The app to restore
    /// * `opts` - The restore options
    ///
    /// # Errors
    ///
    /// * If the app has no credentials.
    /// * If the app could not be created.
    ///
    /// # Returns
    ///
    /// The restore state of every credential of the app.
    pub fn restore_app(&self, app: &AppRecord, opts: RestoreOptions) -> OrgSnapResult<AppRestore> {
        let client = DryRunClient::new(self.client.clone(), opts.dry_run);
        commands::restore::restore_app(&client, &self.name, app, opts)
    }

    /// Restore the app stored in a single record file.
    ///
    /// # Errors
    ///
    /// * If the file could not be read or parsed.
    /// * If the app has no credentials.
    /// * If the app could not be created.
    pub fn restore_app_file(
        &self,
        path: impl AsRef<Path>,
        opts: RestoreOptions,
    ) -> OrgSnapResult<AppRestore> {
        let client = DryRunClient::new(self.client.clone(), opts.dry_run);
        commands::restore::restore_app_file(&client, &self.name, path.as_ref(), opts)
    }
}

impl<P: ProgressBars> Organization<P> {
    /// Back up all apps of all developers into a record store.
    ///
    /// Apps of developers which cannot be listed and apps which cannot be fetched or written
    /// are logged and skipped.
    ///
    /// # Errors
    ///
    /// * If the developers could not be listed.
    pub fn backup_apps(&self, store: &RecordStore) -> OrgSnapResult<BackupStats> {
        commands::backup::backup_apps(&self.client, &self.pb, &self.name, store)
    }

    /// Back up all developers into a record store.
    ///
    /// # Errors
    ///
    /// * If the developers could not be listed.
    pub fn backup_developers(&self, store: &RecordStore) -> OrgSnapResult<BackupStats> {
        commands::backup::backup_developers(&self.client, &self.pb, &self.name, store)
    }

    /// Restore all apps of a record store.
    ///
    /// # Errors
    ///
    /// * If the store directory could not be listed.
    pub fn restore_apps(
        &self,
        store: &RecordStore,
        opts: RestoreOptions,
    ) -> OrgSnapResult<RestoreStats> {
        let client = DryRunClient::new(self.client.clone(), opts.dry_run);
        commands::restore::restore_apps(&client, &self.pb, &self.name, store, opts)
    }

    /// Restore all developers of a record store.
    ///
    /// # Errors
    ///
    /// * If the store directory could not be listed.
    pub fn restore_developers(
        &self,
        store: &RecordStore,
        opts: RestoreOptions,
    ) -> OrgSnapResult<RestoreStats> {
        let client = DryRunClient::new(self.client.clone(), opts.dry_run);
        commands::restore::restore_developers(&client, &self.pb, &self.name, store)
    }
}
