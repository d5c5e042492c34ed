//! Representations of resources as exchanged with the management API.
//!
//! These mirror the JSON of the API (camelCase keys, 64-bit timestamps transported as
//! strings) and are kept separate from the [`record`](crate::record) types written to disk.
#![allow(missing_docs)]
use serde_derive::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, DisplayFromStr, PickFirst, serde_as};

/// A developer as returned by the list call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperSummary {
    /// Email of the developer
    pub email: String,
}

/// An app as returned by the list call. The API reports the app name as `appId`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSummary {
    /// Name of the app
    #[serde(alias = "appId")]
    pub name: String,
}

/// A developer.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Developer {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub apps: Vec<String>,
    pub developer_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub organization_name: String,
    pub status: String,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub created_at: i64,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub last_modified_at: i64,
}

/// A custom attribute of an app.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// A product referenced by a credential.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiProductRef {
    pub apiproduct: String,
    pub status: String,
}

/// A credential (key/secret pair) of an app. A missing `expiresAt` means the key never
/// expires.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Credential {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub api_products: Vec<ApiProductRef>,
    pub consumer_key: String,
    pub consumer_secret: String,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub expires_at: i64,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub issued_at: i64,
    pub status: String,
}

impl Default for Credential {
    fn default() -> Self {
        Self {
            api_products: Vec::new(),
            consumer_key: String::new(),
            consumer_secret: String::new(),
            expires_at: crate::record::Credential::NEVER_EXPIRES,
            issued_at: 0,
            status: String::new(),
        }
    }
}

/// The details of an app.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeveloperApp {
    pub app_id: String,
    pub name: String,
    pub developer_id: String,
    pub status: String,
    pub app_family: String,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub created_at: i64,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub last_modified_at: i64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub attributes: Vec<Attribute>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub credentials: Vec<Credential>,
}

/// Request body to create an app. Credentials cannot be given here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewApp {
    pub name: String,
    pub attributes: Vec<Attribute>,
}

/// Request body to create a key with a given key and secret.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewKey {
    pub consumer_key: String,
    pub consumer_secret: String,
}

/// Request body to associate a key with products.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAssociation {
    pub api_products: Vec<String>,
}
