/// In-memory resource client to be used for testing
pub mod in_memory_client {
    use std::{
        collections::{BTreeMap, BTreeSet},
        sync::{Arc, RwLock},
    };

    use orgsnap_core::{
        ErrorKind, OrgSnapError, OrgSnapResult, ResourceClient,
        wire::{
            ApiProductRef, AppSummary, Credential, Developer, DeveloperApp, DeveloperSummary,
            NewApp, NewKey,
        },
    };

    /// Calls which fail on purpose
    #[derive(Debug, Default)]
    struct Failures {
        list_developers: bool,
        get_developer: BTreeSet<String>,
        list_apps: BTreeSet<String>,
        get_app: BTreeSet<String>,
        create_developer: BTreeSet<String>,
        create_key: BTreeSet<String>,
        grant: BTreeSet<String>,
    }

    #[derive(Debug, Default)]
    struct State {
        developers: Vec<Developer>,
        apps: BTreeMap<String, Vec<DeveloperApp>>,
        failures: Failures,
    }

    fn failed(call: &'static str, what: &str) -> Box<OrgSnapError> {
        OrgSnapError::new(ErrorKind::Client, "injected failure of `{call}` for `{what}`")
            .attach_context("call", call)
            .attach_context("what", what)
    }

    fn not_found(what: &str) -> Box<OrgSnapError> {
        OrgSnapError::new(ErrorKind::Client, "`{what}` not found (404)").attach_context("what", what)
    }

    fn conflict(what: &str) -> Box<OrgSnapError> {
        OrgSnapError::new(ErrorKind::Client, "`{what}` already exists (409)")
            .attach_context("what", what)
    }

    /// In-memory organization to be used for testing.
    ///
    /// Clones share the same state, so a clone handed to an `Organization` can be inspected
    /// afterwards. Developers and apps are kept in insertion order.
    #[derive(Clone, Debug, Default)]
    pub struct InMemoryClient(Arc<RwLock<State>>);

    impl InMemoryClient {
        /// Create a new (empty) `InMemoryClient`
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Add an active developer.
        #[must_use]
        pub fn with_developer(self, email: &str) -> Self {
            {
                let mut state = self.0.write().unwrap();
                let id = format!("dev-{}", state.developers.len() + 1);
                state.developers.push(Developer {
                    email: email.to_string(),
                    first_name: "First".to_string(),
                    last_name: "Last".to_string(),
                    user_name: email.split('@').next().unwrap_or(email).to_string(),
                    developer_id: id,
                    status: "active".to_string(),
                    ..Default::default()
                });
                _ = state.apps.entry(email.to_string()).or_default();
            }
            self
        }

        /// Add an app to an existing developer.
        #[must_use]
        pub fn with_app(self, email: &str, app: DeveloperApp) -> Self {
            {
                let mut state = self.0.write().unwrap();
                state
                    .apps
                    .get_mut(email)
                    .expect("developer must be added first")
                    .push(app);
            }
            self
        }

        /// Let listing the developers fail.
        #[must_use]
        pub fn failing_list_developers(self) -> Self {
            self.0.write().unwrap().failures.list_developers = true;
            self
        }

        /// Let getting the developer with the given email fail.
        #[must_use]
        pub fn failing_get_developer(self, email: &str) -> Self {
            _ = self.0.write().unwrap().failures.get_developer.insert(email.to_string());
            self
        }

        /// Let listing the apps of the developer with the given email fail.
        #[must_use]
        pub fn failing_list_apps(self, email: &str) -> Self {
            _ = self.0.write().unwrap().failures.list_apps.insert(email.to_string());
            self
        }

        /// Let getting the app with the given name fail.
        #[must_use]
        pub fn failing_get_app(self, name: &str) -> Self {
            _ = self.0.write().unwrap().failures.get_app.insert(name.to_string());
            self
        }

        /// Let creating the developer with the given email fail.
        #[must_use]
        pub fn failing_create_developer(self, email: &str) -> Self {
            _ = self.0.write().unwrap().failures.create_developer.insert(email.to_string());
            self
        }

        /// Let creating the given key fail.
        #[must_use]
        pub fn failing_create_key(self, consumer_key: &str) -> Self {
            _ = self.0.write().unwrap().failures.create_key.insert(consumer_key.to_string());
            self
        }

        /// Let granting products to the given key fail.
        #[must_use]
        pub fn failing_grant(self, consumer_key: &str) -> Self {
            _ = self.0.write().unwrap().failures.grant.insert(consumer_key.to_string());
            self
        }

        /// All developers, in insertion order.
        #[must_use]
        pub fn developers(&self) -> Vec<Developer> {
            self.0.read().unwrap().developers.clone()
        }

        /// All apps of a developer, in insertion order.
        #[must_use]
        pub fn apps(&self, email: &str) -> Vec<DeveloperApp> {
            self.0
                .read()
                .unwrap()
                .apps
                .get(email)
                .cloned()
                .unwrap_or_default()
        }

        /// A single app of a developer.
        #[must_use]
        pub fn app(&self, email: &str, name: &str) -> Option<DeveloperApp> {
            self.apps(email).into_iter().find(|app| app.name == name)
        }
    }

    impl ResourceClient for InMemoryClient {
        fn location(&self) -> String {
            "memory".to_string()
        }

        fn list_developers(&self, _org: &str) -> OrgSnapResult<Vec<DeveloperSummary>> {
            let state = self.0.read().unwrap();
            if state.failures.list_developers {
                return Err(failed("list_developers", "organization"));
            }
            Ok(state
                .developers
                .iter()
                .map(|developer| DeveloperSummary {
                    email: developer.email.clone(),
                })
                .collect())
        }

        fn get_developer(&self, _org: &str, email: &str) -> OrgSnapResult<Developer> {
            let state = self.0.read().unwrap();
            if state.failures.get_developer.contains(email) {
                return Err(failed("get_developer", email));
            }
            let mut developer = state
                .developers
                .iter()
                .find(|developer| developer.email == email)
                .cloned()
                .ok_or_else(|| not_found(email))?;
            developer.apps = state
                .apps
                .get(email)
                .map(|apps| apps.iter().map(|app| app.name.clone()).collect())
                .unwrap_or_default();
            Ok(developer)
        }

        fn list_apps(&self, _org: &str, email: &str) -> OrgSnapResult<Vec<AppSummary>> {
            let state = self.0.read().unwrap();
            if state.failures.list_apps.contains(email) {
                return Err(failed("list_apps", email));
            }
            let apps = state.apps.get(email).ok_or_else(|| not_found(email))?;
            Ok(apps
                .iter()
                .map(|app| AppSummary {
                    name: app.name.clone(),
                })
                .collect())
        }

        fn get_app(&self, _org: &str, email: &str, name: &str) -> OrgSnapResult<DeveloperApp> {
            let state = self.0.read().unwrap();
            if state.failures.get_app.contains(name) {
                return Err(failed("get_app", name));
            }
            state
                .apps
                .get(email)
                .and_then(|apps| apps.iter().find(|app| app.name == name))
                .cloned()
                .ok_or_else(|| not_found(name))
        }

        fn create_developer(&self, _org: &str, developer: &Developer) -> OrgSnapResult<Developer> {
            let mut state = self.0.write().unwrap();
            if state.failures.create_developer.contains(&developer.email) {
                return Err(failed("create_developer", &developer.email));
            }
            if state.developers.iter().any(|d| d.email == developer.email) {
                return Err(conflict(&developer.email));
            }
            state.developers.push(developer.clone());
            _ = state.apps.entry(developer.email.clone()).or_default();
            Ok(developer.clone())
        }

        fn create_app(&self, _org: &str, email: &str, app: &NewApp) -> OrgSnapResult<DeveloperApp> {
            let mut state = self.0.write().unwrap();
            let count = state.apps.values().map(Vec::len).sum::<usize>();
            let apps = state.apps.get_mut(email).ok_or_else(|| not_found(email))?;
            if apps.iter().any(|existing| existing.name == app.name) {
                return Err(conflict(&app.name));
            }
            let created = DeveloperApp {
                app_id: format!("app-{}", count + 1),
                name: app.name.clone(),
                status: "approved".to_string(),
                attributes: app.attributes.clone(),
                ..Default::default()
            };
            apps.push(created.clone());
            Ok(created)
        }

        fn create_key(
            &self,
            _org: &str,
            email: &str,
            app_name: &str,
            key: &NewKey,
        ) -> OrgSnapResult<Credential> {
            let mut state = self.0.write().unwrap();
            if state.failures.create_key.contains(&key.consumer_key) {
                return Err(failed("create_key", &key.consumer_key));
            }
            let exists = state
                .apps
                .values()
                .flatten()
                .flat_map(|app| &app.credentials)
                .any(|credential| credential.consumer_key == key.consumer_key);
            if exists {
                return Err(conflict(&key.consumer_key));
            }
            let app = state
                .apps
                .get_mut(email)
                .and_then(|apps| apps.iter_mut().find(|app| app.name == app_name))
                .ok_or_else(|| not_found(app_name))?;
            let credential = Credential {
                consumer_key: key.consumer_key.clone(),
                consumer_secret: key.consumer_secret.clone(),
                expires_at: -1,
                status: "approved".to_string(),
                ..Default::default()
            };
            app.credentials.push(credential.clone());
            Ok(credential)
        }

        fn grant_products(
            &self,
            _org: &str,
            email: &str,
            app_name: &str,
            consumer_key: &str,
            products: &[String],
        ) -> OrgSnapResult<()> {
            let mut state = self.0.write().unwrap();
            if state.failures.grant.contains(consumer_key) {
                return Err(failed("grant_products", consumer_key));
            }
            let credential = state
                .apps
                .get_mut(email)
                .and_then(|apps| apps.iter_mut().find(|app| app.name == app_name))
                .and_then(|app| {
                    app.credentials
                        .iter_mut()
                        .find(|credential| credential.consumer_key == consumer_key)
                })
                .ok_or_else(|| not_found(consumer_key))?;
            credential
                .api_products
                .extend(products.iter().map(|product| ApiProductRef {
                    apiproduct: product.clone(),
                    status: "approved".to_string(),
                }));
            Ok(())
        }
    }
}

pub use in_memory_client::InMemoryClient;
