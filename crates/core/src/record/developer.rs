use serde_derive::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};

use crate::{
    client::wire,
    error::{ErrorKind, OrgSnapError, OrgSnapResult},
    record::{Record, RecordKind},
};

/// Status of a developer.
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
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeveloperStatus {
    /// The developer may use its apps
    #[default]
    Active,
    /// The developer is deactivated
    Inactive,
}

/// Snapshot of a developer.
///
/// `apps` only lists the names of the apps owned by the developer; the apps themselves are
/// separate [`AppRecord`](crate::record::AppRecord)s.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct DeveloperRecord {
    /// Email of the developer, unique within an organization
    pub email: String,
    /// First name
    #[serde(default)]
    pub first_name: String,
    /// Last name
    #[serde(default)]
    pub last_name: String,
    /// User name
    #[serde(default)]
    pub user_name: String,
    /// Names of the apps owned by this developer
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub apps: Vec<String>,
    /// Id of the developer in the source organization
    #[serde(default)]
    pub developer_id: String,
    /// Name of the source organization
    #[serde(default)]
    pub organization_name: String,
    /// Status of the developer
    #[serde(default)]
    pub status: DeveloperStatus,
    /// Creation time in epoch milliseconds
    #[serde(default)]
    pub created_at: i64,
    /// Last modification time in epoch milliseconds
    #[serde(default)]
    pub last_modified_at: i64,
}

impl DeveloperRecord {
    /// Create a new active developer record with the given email.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Default::default()
        }
    }

    /// Map a developer as returned by the API into a record.
    ///
    /// # Errors
    ///
    /// * If the developer status is not known.
    pub fn from_wire(developer: wire::Developer) -> OrgSnapResult<Self> {
        let status = developer.status.parse().map_err(|err| {
            OrgSnapError::with_source(
                ErrorKind::Record,
                "Developer `{email}` has unknown status `{status}`.",
                err,
            )
            .attach_context("email", developer.email.clone())
            .attach_context("status", developer.status.clone())
        })?;

        Ok(Self {
            email: developer.email,
            first_name: developer.first_name,
            last_name: developer.last_name,
            user_name: developer.user_name,
            apps: developer.apps,
            developer_id: developer.developer_id,
            organization_name: developer.organization_name,
            status,
            created_at: developer.created_at,
            last_modified_at: developer.last_modified_at,
        })
    }

    /// The create request carrying all fields of this record verbatim.
    #[must_use]
    pub fn to_wire(&self) -> wire::Developer {
        wire::Developer {
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            user_name: self.user_name.clone(),
            apps: self.apps.clone(),
            developer_id: self.developer_id.clone(),
            organization_name: self.organization_name.clone(),
            status: self.status.to_string(),
            created_at: self.created_at,
            last_modified_at: self.last_modified_at,
        }
    }
}

impl Record for DeveloperRecord {
    const KIND: RecordKind = RecordKind::Developer;

    fn key(&self) -> &str {
        &self.email
    }
}
