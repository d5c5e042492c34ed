/*!
A library for backing up and restoring the developers, apps and credentials of an organization
of an API management platform.

# Overview

This section gives a brief overview of the primary types in this crate:

The main type is the [`Organization`] type which describes a way to access an organization
through a [`ResourceClient`]. It allows backing up all developers or all apps into a
[`RecordStore`] and restoring them from there, possibly into a different organization.

Resources are saved as records, see the [`record`] module. Records are plain data which
implement [`serde::Serialize`] and [`serde::Deserialize`] and are independent of the wire
format used by the management API, see the [`wire`] module.

Restoring an app is done in steps: the app is created, then each of its credentials is
created with the backed-up key and secret, then each key is associated with its products.
The outcome of each step is reported per credential in an [`AppRestore`].

# Example - back up the apps of an organization and restore them into another one

```rust
    use chrono::Local;
    use orgsnap_core::{Organization, RecordStore, RestoreOptions};
    use orgsnap_testing::{client::InMemoryClient, fixtures};

    // An organization with a developer owning one app
    let source = InMemoryClient::new()
        .with_developer("dev@example.com")
        .with_app("dev@example.com", fixtures::wire_app("myapp", &[("key1", "secret1", &["P1"])]));
    let source = Organization::new("source-org", source);

    // Back up all apps into a new directory
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::create_run(dir.path().join("apps"), Local::now()).unwrap();
    let stats = source.backup_apps(&store).unwrap();
    assert_eq!(stats.written, 1);

    // Restore them into another organization which already has the developer
    let target = InMemoryClient::new().with_developer("dev@example.com");
    let org = Organization::new("target-org", target.clone());
    let stats = org.restore_apps(&store, RestoreOptions::default()).unwrap();
    assert_eq!(stats.restored, 1);

    let app = target.app("dev@example.com", "myapp").unwrap();
    assert_eq!(app.credentials[0].consumer_key, "key1");
    assert_eq!(app.credentials[0].api_products[0].apiproduct, "P1");
```

# Crate features

This crate exposes a few features for controlling dependency usage.

- **cli** - Enables support for CLI features by enabling the `clap` feature.
  *This feature is disabled by default*.

- **clap** - Enables a dependency on the `clap` crate and enables parsing options from
    the commandline. *This feature is disabled by default*.
*/

// Workspace lints don't seem to work for this?
#![allow(clippy::redundant_pub_crate)]

pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod error;
pub(crate) mod organization;
pub(crate) mod progress;
pub mod record;
pub(crate) mod store;

pub use client::wire;

// orgsnap_core Public API
pub use crate::{
    client::{ResourceClient, dry_run::DryRunClient},
    commands::{
        backup::{AppWalker, BackupStats, DeveloperWalker},
        restore::{
            AppRestore, CredentialRestore, CredentialState, GrantMode, RestoreOptions,
            RestoreStats,
        },
    },
    error::{ErrorKind, OrgSnapError, OrgSnapResult},
    organization::Organization,
    progress::{LogProgress, NoProgressBars, Progress, ProgressBars, SnapProgress},
    record::{AppRecord, DeveloperRecord, Record, RecordFormat, RecordKind},
    store::RecordStore,
};
