use orgsnap_core::wire::{ApiProductRef, Attribute, Credential, DeveloperApp};

/// An app as returned by the management API.
///
/// Each credential is given as `(key, secret, products)`; all grants are approved and no key
/// expires.
#[must_use]
pub fn wire_app(name: &str, credentials: &[(&str, &str, &[&str])]) -> DeveloperApp {
    DeveloperApp {
        name: name.to_string(),
        status: "approved".to_string(),
        credentials: credentials
            .iter()
            .map(|(key, secret, products)| wire_credential(key, secret, products))
            .collect(),
        ..Default::default()
    }
}

/// A credential as returned by the management API.
#[must_use]
pub fn wire_credential(key: &str, secret: &str, products: &[&str]) -> Credential {
    Credential {
        api_products: products
            .iter()
            .map(|product| ApiProductRef {
                apiproduct: (*product).to_string(),
                status: "approved".to_string(),
            })
            .collect(),
        consumer_key: key.to_string(),
        consumer_secret: secret.to_string(),
        expires_at: -1,
        status: "approved".to_string(),
        ..Default::default()
    }
}

/// Add an attribute to an app.
#[must_use]
pub fn with_attribute(mut app: DeveloperApp, name: &str, value: &str) -> DeveloperApp {
    app.attributes.push(Attribute {
        name: name.to_string(),
        value: value.to_string(),
    });
    app
}
