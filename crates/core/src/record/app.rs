use serde_derive::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};

use crate::{
    client::wire,
    error::{ErrorKind, OrgSnapError, OrgSnapResult},
    record::{Record, RecordKind},
};

/// Status of a product grant on a credential.
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
pub enum GrantStatus {
    /// The credential may call the product
    #[default]
    Approved,
    /// Approval is pending
    Pending,
    /// The grant has been revoked
    Revoked,
}

/// A product a credential has been granted access to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ProductGrant {
    /// Name of the product; a reference, the product itself is not part of the backup
    #[serde(rename = "apiproduct")]
    pub api_product: String,
    /// Status of the grant
    #[serde(default)]
    pub status: GrantStatus,
}

impl ProductGrant {
    /// Create a new grant for the given product.
    #[must_use]
    pub fn new(api_product: impl Into<String>, status: GrantStatus) -> Self {
        Self {
            api_product: api_product.into(),
            status,
        }
    }
}

/// A free-form key/value pair attached to an app.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Attribute {
    /// Name of the attribute
    pub name: String,
    /// Value of the attribute
    #[serde(default)]
    pub value: String,
}

impl Attribute {
    /// Create a new attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A key/secret pair of an app together with its product grants.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Credential {
    /// Products this credential is granted access to, in API order
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub api_products: Vec<ProductGrant>,
    /// The consumer key
    pub consumer_key: String,
    /// The consumer secret
    #[serde(default)]
    pub consumer_secret: String,
    /// Expiry in epoch milliseconds, [`Credential::NEVER_EXPIRES`] if the key never expires
    #[serde(default = "Credential::never_expires")]
    pub expires_at: i64,
    /// Issue time in epoch milliseconds
    #[serde(default)]
    pub issued_at: i64,
    /// Status of the credential
    #[serde(default)]
    pub status: String,
}

impl Credential {
    /// Sentinel value of `expires_at` for credentials which never expire.
    pub const NEVER_EXPIRES: i64 = -1;

    const fn never_expires() -> i64 {
        Self::NEVER_EXPIRES
    }

    /// Create a new approved, never expiring credential.
    #[must_use]
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            api_products: Vec::new(),
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            expires_at: Self::NEVER_EXPIRES,
            issued_at: 0,
            status: "approved".to_string(),
        }
    }

    /// Add a product grant.
    #[must_use]
    pub fn with_grant(mut self, grant: ProductGrant) -> Self {
        self.api_products.push(grant);
        self
    }

    /// Whether this credential never expires.
    #[must_use]
    pub const fn never_expires_at(&self) -> bool {
        self.expires_at == Self::NEVER_EXPIRES
    }

    fn from_wire(credential: wire::Credential) -> OrgSnapResult<Self> {
        let api_products = credential
            .api_products
            .into_iter()
            .map(|product| {
                let status = product.status.parse().map_err(|err| {
                    OrgSnapError::with_source(
                        ErrorKind::Record,
                        "Grant of product `{product}` has unknown status `{status}`.",
                        err,
                    )
                    .attach_context("product", product.apiproduct.clone())
                    .attach_context("status", product.status.clone())
                })?;
                Ok(ProductGrant::new(product.apiproduct, status))
            })
            .collect::<OrgSnapResult<_>>()?;

        Ok(Self {
            api_products,
            consumer_key: credential.consumer_key,
            consumer_secret: credential.consumer_secret,
            expires_at: credential.expires_at,
            issued_at: credential.issued_at,
            status: credential.status,
        })
    }
}

/// Snapshot of an app with all its attributes, credentials and product grants.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct AppRecord {
    /// Id of the app in the source organization
    #[serde(default)]
    pub app_id: String,
    /// Attributes of the app, in API order
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub attributes: Vec<Attribute>,
    /// Creation time in epoch milliseconds
    #[serde(default)]
    pub created_at: i64,
    /// Credentials of the app, in API order
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub credentials: Vec<Credential>,
    /// Email of the owning developer
    pub developer_id: String,
    /// Last modification time in epoch milliseconds
    #[serde(default)]
    pub last_modified_at: i64,
    /// Name of the app, unique per developer
    pub name: String,
    /// Status of the app
    #[serde(default)]
    pub status: String,
    /// App family
    #[serde(default)]
    pub app_family: String,
}

impl AppRecord {
    /// Create a new app record owned by the developer with the given email.
    #[must_use]
    pub fn new(name: impl Into<String>, developer_email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            developer_id: developer_email.into(),
            ..Default::default()
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Add a credential.
    #[must_use]
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credentials.push(credential);
        self
    }

    /// The email of the developer owning this app.
    #[must_use]
    pub fn developer_email(&self) -> &str {
        &self.developer_id
    }

    /// Map app details as returned by the API into a record.
    ///
    /// The owner is recorded by its email, which is the key used to find the developer again
    /// when restoring.
    ///
    /// # Arguments
    ///
    /// * `app` - The app details
    /// * `developer_email` - The email of the developer owning the app
    ///
    /// # Errors
    ///
    /// * If a product grant has an unknown status.
    pub fn from_wire(app: wire::DeveloperApp, developer_email: &str) -> OrgSnapResult<Self> {
        let credentials = app
            .credentials
            .into_iter()
            .map(Credential::from_wire)
            .collect::<OrgSnapResult<_>>()
            .map_err(|err| err.attach_context("app", app.name.clone()))?;

        Ok(Self {
            app_id: app.app_id,
            attributes: app
                .attributes
                .into_iter()
                .map(|attr| Attribute::new(attr.name, attr.value))
                .collect(),
            created_at: app.created_at,
            credentials,
            developer_id: developer_email.to_string(),
            last_modified_at: app.last_modified_at,
            name: app.name,
            status: app.status,
            app_family: app.app_family,
        })
    }

    /// The create request for this app: name and attributes only.
    #[must_use]
    pub fn to_new_app(&self) -> wire::NewApp {
        wire::NewApp {
            name: self.name.clone(),
            attributes: self
                .attributes
                .iter()
                .map(|attr| wire::Attribute {
                    name: attr.name.clone(),
                    value: attr.value.clone(),
                })
                .collect(),
        }
    }
}

impl Record for AppRecord {
    const KIND: RecordKind = RecordKind::App;

    fn key(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn wire_app() -> wire::DeveloperApp {
        wire::DeveloperApp {
            app_id: "a1b2".to_string(),
            name: "myapp".to_string(),
            developer_id: "internal-dev-id".to_string(),
            status: "approved".to_string(),
            app_family: "default".to_string(),
            created_at: 10,
            last_modified_at: 20,
            attributes: vec![
                wire::Attribute {
                    name: "DisplayName".to_string(),
                    value: "My App".to_string(),
                },
                wire::Attribute {
                    name: "Notes".to_string(),
                    value: String::new(),
                },
            ],
            credentials: vec![wire::Credential {
                api_products: vec![
                    wire::ApiProductRef {
                        apiproduct: "P1".to_string(),
                        status: "approved".to_string(),
                    },
                    wire::ApiProductRef {
                        apiproduct: "P2".to_string(),
                        status: "revoked".to_string(),
                    },
                ],
                consumer_key: "key1".to_string(),
                consumer_secret: "secret1".to_string(),
                expires_at: -1,
                issued_at: 15,
                status: "approved".to_string(),
            }],
        }
    }

    #[test]
    fn from_wire_keeps_order_and_owner_email() {
        let record = AppRecord::from_wire(wire_app(), "dev@example.com").unwrap();

        assert_eq!(record.developer_email(), "dev@example.com");
        assert_eq!(record.key(), "myapp");
        assert_eq!(
            record.attributes,
            [
                Attribute::new("DisplayName", "My App"),
                Attribute::new("Notes", "")
            ]
        );
        let credential = &record.credentials[0];
        assert!(credential.never_expires_at());
        assert_eq!(
            credential.api_products,
            [
                ProductGrant::new("P1", GrantStatus::Approved),
                ProductGrant::new("P2", GrantStatus::Revoked)
            ]
        );
    }

    #[test]
    fn from_wire_without_expiry_never_expires() {
        let mut app = wire_app();
        app.credentials = vec![serde_json::from_str(r#"{"consumerKey":"key2"}"#).unwrap()];

        let record = AppRecord::from_wire(app, "dev@example.com").unwrap();
        assert!(record.credentials[0].never_expires_at());
    }

    #[test]
    fn from_wire_rejects_unknown_grant_status() {
        let mut app = wire_app();
        app.credentials[0].api_products[0].status = "unknown".to_string();

        let err = AppRecord::from_wire(app, "dev@example.com").unwrap_err();
        assert!(err.is_kind(ErrorKind::Record));
        assert_eq!(err.context("product"), Some("P1"));
        assert_eq!(err.context("app"), Some("myapp"));
    }

    #[test]
    fn new_app_request_only_has_name_and_attributes() {
        let record = AppRecord::from_wire(wire_app(), "dev@example.com").unwrap();
        let value = serde_json::to_value(record.to_new_app()).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "name": "myapp",
                "attributes": [
                    {"name": "DisplayName", "value": "My App"},
                    {"name": "Notes", "value": ""}
                ]
            })
        );
    }

    #[test]
    fn grant_product_is_stored_under_lowercase_key() {
        let grant = ProductGrant::new("P1", GrantStatus::Pending);
        assert_eq!(
            serde_json::to_value(&grant).unwrap(),
            serde_json::json!({"apiproduct": "P1", "status": "pending"})
        );
    }

    #[test]
    fn missing_expiry_means_never() {
        let json = r#"{"consumerKey":"key1","apiProducts":null}"#;
        let credential: Credential = serde_json::from_str(json).unwrap();
        assert!(credential.never_expires_at());
        assert!(credential.api_products.is_empty());
    }

    fn grant_strategy() -> impl Strategy<Value = ProductGrant> {
        (
            "[A-Za-z0-9_-]{1,12}",
            prop_oneof![
                Just(GrantStatus::Approved),
                Just(GrantStatus::Pending),
                Just(GrantStatus::Revoked)
            ],
        )
            .prop_map(|(product, status)| ProductGrant::new(product, status))
    }

    fn credential_strategy() -> impl Strategy<Value = Credential> {
        (
            "[a-zA-Z0-9]{1,32}",
            "[a-zA-Z0-9]{0,32}",
            any::<i64>(),
            any::<i64>(),
            prop::collection::vec(grant_strategy(), 0..4),
        )
            .prop_map(|(key, secret, issued_at, expires_at, grants)| {
                let mut credential = Credential::new(key, secret);
                credential.issued_at = issued_at;
                credential.expires_at = expires_at;
                credential.api_products = grants;
                credential
            })
    }

    prop_compose! {
        fn app_strategy()(
            name in "[a-zA-Z0-9 ._-]{1,24}",
            email in "[a-z]{1,8}@[a-z]{1,8}\\.com",
            attributes in prop::collection::vec(("\\PC{1,12}", "\\PC{0,24}"), 0..5),
            credentials in prop::collection::vec(credential_strategy(), 0..4),
            created_at in any::<i64>(),
            status in "[a-z]{0,10}",
        ) -> AppRecord {
            let mut app = AppRecord::new(name, email);
            app.attributes = attributes.into_iter().map(|(n, v)| Attribute::new(n, v)).collect();
            app.credentials = credentials;
            app.created_at = created_at;
            app.status = status;
            app
        }
    }

    proptest! {
        #[test]
        fn app_record_json_roundtrip_is_identity(app in app_strategy()) {
            let json = serde_json::to_vec_pretty(&app).unwrap();
            let read: AppRecord = serde_json::from_slice(&json).unwrap();
            prop_assert_eq!(read, app);
        }
    }
}
