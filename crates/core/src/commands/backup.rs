//! `backup` command: walk the resources of an organization into a [`RecordStore`].
use std::vec;

use log::{error, info};

use crate::{
    client::{
        ResourceClient,
        wire::{AppSummary, DeveloperSummary},
    },
    error::OrgSnapResult,
    progress::{Progress, ProgressBars},
    record::{AppRecord, DeveloperRecord, Record},
    store::RecordStore,
};

/// Statistics of a backup run
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackupStats {
    /// Number of records written
    pub written: u64,
    /// Number of resources which were skipped because of an error
    pub failed: u64,
}

/// List the developers of an organization. Failing to do so aborts the whole backup.
fn list_developers<C: ResourceClient>(
    client: &C,
    org: &str,
) -> OrgSnapResult<Vec<DeveloperSummary>> {
    client
        .list_developers(org)
        .map_err(|err| err.attach_context("organization", org))
}

/// Walks all developers of an organization, yielding one [`DeveloperRecord`] per developer.
///
/// The developer list is fetched once when creating the walker. Details are fetched lazily,
/// one developer per iteration step; an `Err` item means that developer is skipped.
#[derive(Debug)]
pub struct DeveloperWalker<'a, C> {
    client: &'a C,
    org: &'a str,
    developers: vec::IntoIter<DeveloperSummary>,
}

impl<'a, C: ResourceClient> DeveloperWalker<'a, C> {
    /// Create a new walker.
    ///
    /// # Arguments
    ///
    /// * `client` - The client to use
    /// * `org` - The organization to walk
    ///
    /// # Errors
    ///
    /// * If the developers could not be listed.
    pub fn new(client: &'a C, org: &'a str) -> OrgSnapResult<Self> {
        Ok(Self {
            client,
            org,
            developers: list_developers(client, org)?.into_iter(),
        })
    }
}

impl<C: ResourceClient> Iterator for DeveloperWalker<'_, C> {
    type Item = OrgSnapResult<DeveloperRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let summary = self.developers.next()?;
        Some(
            self.client
                .get_developer(self.org, &summary.email)
                .and_then(DeveloperRecord::from_wire)
                .map_err(|err| err.attach_context("developer", summary.email)),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.developers.size_hint()
    }
}

impl<C: ResourceClient> ExactSizeIterator for DeveloperWalker<'_, C> {}

/// Walks all apps of all developers of an organization, yielding one [`AppRecord`] per app.
///
/// The developer list is fetched once when creating the walker. The apps of a developer are
/// listed when the walk reaches that developer, and the details of each app are fetched one
/// per iteration step. If listing the apps of a developer fails, a single `Err` item is
/// yielded and the walk continues with the next developer.
#[derive(Debug)]
pub struct AppWalker<'a, C> {
    client: &'a C,
    org: &'a str,
    developers: vec::IntoIter<DeveloperSummary>,
    current: Option<(String, vec::IntoIter<AppSummary>)>,
}

impl<'a, C: ResourceClient> AppWalker<'a, C> {
    /// Create a new walker.
    ///
    /// # Arguments
    ///
    /// * `client` - The client to use
    /// * `org` - The organization to walk
    ///
    /// # Errors
    ///
    /// * If the developers could not be listed.
    pub fn new(client: &'a C, org: &'a str) -> OrgSnapResult<Self> {
        Ok(Self {
            client,
            org,
            developers: list_developers(client, org)?.into_iter(),
            current: None,
        })
    }

    /// Number of developers not yet reached by the walk.
    #[must_use]
    pub fn remaining_developers(&self) -> usize {
        self.developers.len()
    }
}

impl<C: ResourceClient> Iterator for AppWalker<'_, C> {
    type Item = OrgSnapResult<AppRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((email, apps)) = &mut self.current {
                if let Some(app) = apps.next() {
                    return Some(
                        self.client
                            .get_app(self.org, email, &app.name)
                            .and_then(|details| AppRecord::from_wire(details, email))
                            .map_err(|err| {
                                err.attach_context("developer", email.clone())
                                    .attach_context("app", app.name)
                            }),
                    );
                }
                self.current = None;
            }

            let developer = self.developers.next()?;
            match self.client.list_apps(self.org, &developer.email) {
                Ok(apps) => self.current = Some((developer.email, apps.into_iter())),
                Err(err) => return Some(Err(err.attach_context("developer", developer.email))),
            }
        }
    }
}

/// Write all records produced by `records` into `store`.
///
/// Errors of single records, from walking as well as from writing, are logged and counted.
pub(crate) fn write_records<R: Record>(
    records: impl Iterator<Item = OrgSnapResult<R>>,
    store: &RecordStore,
    p: &Progress,
) -> BackupStats {
    let mut stats = BackupStats::default();
    for record in records {
        match record.and_then(|record| store.write(&record).map(|path| (record, path))) {
            Ok((record, path)) => {
                info!("backed up {} `{}` to {}", R::KIND, record.key(), path.display());
                stats.written += 1;
            }
            Err(err) => {
                error!("skipping {}: {err}", R::KIND);
                stats.failed += 1;
            }
        }
        p.inc(1);
    }
    p.finish();
    stats
}

/// Back up all apps of all developers of an organization.
///
/// # Errors
///
/// * If the developers could not be listed.
pub(crate) fn backup_apps<P: ProgressBars, C: ResourceClient>(
    client: &C,
    pb: &P,
    org: &str,
    store: &RecordStore,
) -> OrgSnapResult<BackupStats> {
    let walker = AppWalker::new(client, org)?;
    info!(
        "backing up apps of {} developers from {} into {}",
        walker.remaining_developers(),
        client.location(),
        store.location()
    );
    let p = pb.progress_counter("backing up apps...");
    Ok(write_records(walker, store, &p))
}

/// Back up all developers of an organization.
///
/// # Errors
///
/// * If the developers could not be listed.
pub(crate) fn backup_developers<P: ProgressBars, C: ResourceClient>(
    client: &C,
    pb: &P,
    org: &str,
    store: &RecordStore,
) -> OrgSnapResult<BackupStats> {
    let walker = DeveloperWalker::new(client, org)?;
    info!(
        "backing up {} developers from {} into {}",
        walker.len(),
        client.location(),
        store.location()
    );
    let p = pb.progress_counter("backing up developers...");
    p.set_length(walker.len() as u64);
    Ok(write_records(walker, store, &p))
}
