/*!
A library providing the REST client used by orgsnap to access the management API.

# Overview

The main type is [`RestClient`], an implementation of [`orgsnap_core::ResourceClient`] which
talks to the management API over HTTPS using a bearer access token. It is usually created
from [`ClientOptions`] and an [`AccessToken`] read from a credential file.

# Example

```rust,no_run
    use orgsnap_backend::{AccessToken, ClientOptions};
    use orgsnap_core::{Organization, RecordStore};

    let token = AccessToken::from_file("credentials.json").unwrap();
    let client = ClientOptions::default().to_client(&token).unwrap();

    let org = Organization::new("my-org", client);
    let store = RecordStore::create_run("apps", chrono::Local::now()).unwrap();
    let stats = org.backup_apps(&store).unwrap();
    println!("backed up {} apps", stats.written);
```

# Crate features

This crate exposes a few features for controlling dependency usage:

- **cli** - Enables support for CLI features by enabling the `clap` feature.
  *This feature is disabled by default*.

- **clap** - Enables a dependency on the `clap` crate and enables parsing from
  the commandline. *This feature is disabled by default*.
*/

pub mod credentials;
pub mod options;
pub mod rest;

// orgsnap_backend Public API
pub use crate::{credentials::AccessToken, options::ClientOptions, rest::RestClient};
