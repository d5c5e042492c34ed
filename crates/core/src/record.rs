//! Portable snapshots of organization resources.
//!
//! Records are what gets written to a [`RecordStore`](crate::RecordStore): one file per
//! resource, independent of the wire format of the management API.
use std::error::Error as StdError;

use serde::{Serialize, de::DeserializeOwned};

pub(crate) mod app;
pub(crate) mod developer;

pub use {
    app::{AppRecord, Attribute, Credential, GrantStatus, ProductGrant},
    developer::{DeveloperRecord, DeveloperStatus},
};

/// The kind of resource a record describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RecordKind {
    /// A developer of an organization
    #[display("developer")]
    Developer,
    /// An app owned by a developer
    #[display("app")]
    App,
}

impl RecordKind {
    /// The file format used for records of this kind.
    ///
    /// Apps are stored as YAML and developers as JSON.
    #[must_use]
    pub const fn format(self) -> RecordFormat {
        match self {
            Self::Developer => RecordFormat::Json,
            Self::App => RecordFormat::Yaml,
        }
    }

    /// The file extension used for records of this kind.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        self.format().extension()
    }
}

/// Serialization format of a record file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RecordFormat {
    /// Pretty printed JSON
    #[display("JSON")]
    Json,
    /// YAML
    #[display("YAML")]
    Yaml,
}

impl RecordFormat {
    /// The file extension of this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    pub(crate) fn to_vec<T: Serialize>(
        self,
        value: &T,
    ) -> Result<Vec<u8>, Box<dyn StdError + Send + Sync>> {
        Ok(match self {
            Self::Json => serde_json::to_vec_pretty(value)?,
            Self::Yaml => serde_yaml::to_string(value)?.into_bytes(),
        })
    }

    pub(crate) fn from_slice<T: DeserializeOwned>(
        self,
        data: &[u8],
    ) -> Result<T, Box<dyn StdError + Send + Sync>> {
        Ok(match self {
            Self::Json => serde_json::from_slice(data)?,
            Self::Yaml => serde_yaml::from_slice(data)?,
        })
    }
}

/// Trait for resource snapshots which are stored as files in a record store.
pub trait Record: Serialize + DeserializeOwned + Sized + Send + Sync + 'static {
    /// The [`RecordKind`] associated with the record
    const KIND: RecordKind;

    /// The stable business key of the record.
    ///
    /// This is the developer email for developers and the app name for apps. It is also
    /// used (sanitized) as the file name of the record.
    fn key(&self) -> &str;
}
