use std::fs;

use anyhow::Result;
use pretty_assertions::assert_eq;
use rstest::rstest;

use orgsnap_core::{
    AppRecord, CredentialState, ErrorKind, GrantMode, RecordStore, RestoreOptions, RestoreStats,
    record::{Credential, GrantStatus, ProductGrant},
};
use orgsnap_testing::{client::InMemoryClient, write_json};

use crate::{TestDir, org, single_app_source, test_dir, three_developers};

fn app_with_keys(keys: &[&str]) -> AppRecord {
    keys.iter().fold(
        AppRecord::new("myapp", "dev@example.com"),
        |app, key| {
            app.with_credential(
                Credential::new(*key, format!("{key}-secret"))
                    .with_grant(ProductGrant::new("P1", GrantStatus::Approved)),
            )
        },
    )
}

#[rstest]
fn test_backup_then_restore_roundtrips_app(
    test_dir: Result<TestDir>,
    single_app_source: InMemoryClient,
) -> Result<()> {
    // uncomment for logging output
    // SimpleLogger::init(log::LevelFilter::Debug, Config::default())?;

    let dir = test_dir?;
    let store = dir.new_run("apps")?;
    _ = org("source", &single_app_source).backup_apps(&store)?;

    let target = InMemoryClient::new().with_developer("dev@example.com");
    let stats = org("target", &target).restore_apps(&store, RestoreOptions::default())?;
    assert_eq!(
        stats,
        RestoreStats {
            restored: 1,
            ..Default::default()
        }
    );

    let app = target
        .app("dev@example.com", "myapp")
        .ok_or_else(|| anyhow::anyhow!("app not restored"))?;
    assert_eq!(app.attributes, single_app_source.apps("dev@example.com")[0].attributes);
    assert_eq!(app.credentials.len(), 1);
    let credential = &app.credentials[0];
    assert_eq!(credential.consumer_key, "key1");
    assert_eq!(credential.consumer_secret, "secret1");
    assert_eq!(credential.status, "approved");
    assert_eq!(credential.api_products.len(), 1);
    assert_eq!(credential.api_products[0].apiproduct, "P1");
    Ok(())
}

#[rstest]
fn test_failing_key_restores_all_other_keys() -> Result<()> {
    let target = InMemoryClient::new()
        .with_developer("dev@example.com")
        .failing_create_key("k2");
    let app = app_with_keys(&["k1", "k2", "k3", "k4"]);

    let restore = org("target", &target).restore_app(&app, RestoreOptions::default())?;

    assert_eq!(restore.keyed(), 3);
    assert_eq!(restore.granted(), 3);
    assert!(matches!(
        restore.credentials[1].state,
        CredentialState::KeyFailed(_)
    ));
    let keys: Vec<_> = target
        .app("dev@example.com", "myapp")
        .map(|app| app.credentials)
        .unwrap_or_default()
        .into_iter()
        .map(|credential| credential.consumer_key)
        .collect();
    assert_eq!(keys, ["k1", "k3", "k4"]);
    Ok(())
}

#[rstest]
fn test_failing_grant_keeps_key_and_continues() -> Result<()> {
    let target = InMemoryClient::new()
        .with_developer("dev@example.com")
        .failing_grant("k1");
    let app = app_with_keys(&["k1", "k2"]);

    let restore = org("target", &target).restore_app(&app, RestoreOptions::default())?;

    assert!(matches!(
        restore.credentials[0].state,
        CredentialState::GrantFailed(_)
    ));
    assert_eq!(restore.credentials[1].state, CredentialState::Granted);
    assert_eq!(restore.keyed(), 2);
    assert!(!restore.is_complete());
    Ok(())
}

#[rstest]
fn test_credential_without_products_is_keyed_but_not_granted() -> Result<()> {
    let target = InMemoryClient::new().with_developer("dev@example.com");
    let app = AppRecord::new("myapp", "dev@example.com")
        .with_credential(Credential::new("bare", "secret"))
        .with_credential(
            Credential::new("k1", "secret").with_grant(ProductGrant::new("P1", GrantStatus::Approved)),
        );

    let restore = org("target", &target).restore_app(&app, RestoreOptions::default())?;

    assert_eq!(restore.credentials[0].state, CredentialState::GrantSkipped);
    assert_eq!(restore.credentials[1].state, CredentialState::Granted);
    assert!(restore.is_complete());
    Ok(())
}

#[rstest]
#[case(GrantMode::First, &["P1"])]
#[case(GrantMode::All, &["P1", "P2", "P3"])]
fn test_grant_mode_controls_restored_products(
    #[case] grants: GrantMode,
    #[case] expected: &[&str],
) -> Result<()> {
    let target = InMemoryClient::new().with_developer("dev@example.com");
    let credential = ["P1", "P2", "P3"].iter().fold(
        Credential::new("k1", "secret"),
        |credential, product| credential.with_grant(ProductGrant::new(*product, GrantStatus::Approved)),
    );
    let app = AppRecord::new("myapp", "dev@example.com").with_credential(credential);

    _ = org("target", &target).restore_app(&app, RestoreOptions::default().grants(grants))?;

    let products: Vec<_> = target
        .app("dev@example.com", "myapp")
        .map(|app| app.credentials)
        .unwrap_or_default()
        .into_iter()
        .flat_map(|credential| credential.api_products)
        .map(|product| product.apiproduct)
        .collect();
    assert_eq!(products, expected);
    Ok(())
}

#[rstest]
fn test_rerun_surfaces_creation_failure() -> Result<()> {
    let target = InMemoryClient::new().with_developer("dev@example.com");
    let target_org = org("target", &target);
    let app = app_with_keys(&["k1"]);

    _ = target_org.restore_app(&app, RestoreOptions::default())?;
    let err = target_org
        .restore_app(&app, RestoreOptions::default())
        .unwrap_err();

    assert!(err.is_kind(ErrorKind::Restore));
    assert_eq!(err.context("app"), Some("myapp"));
    Ok(())
}

#[rstest]
fn test_app_without_credentials_cannot_be_restored() {
    let target = InMemoryClient::new().with_developer("dev@example.com");
    let app = AppRecord::new("myapp", "dev@example.com");

    let err = org("target", &target)
        .restore_app(&app, RestoreOptions::default())
        .unwrap_err();

    assert!(err.is_kind(ErrorKind::InvalidInput));
    assert!(target.app("dev@example.com", "myapp").is_none());
}

#[rstest]
fn test_bulk_restore_continues_after_failed_app(
    test_dir: Result<TestDir>,
    three_developers: InMemoryClient,
) -> Result<()> {
    let dir = test_dir?;
    let store = dir.new_run("apps")?;
    _ = org("source", &three_developers).backup_apps(&store)?;
    fs::write(store.path().join("broken.yaml"), "credentials: 42\n")?;

    // dev2 does not exist in the target, so both of its apps fail
    let target = InMemoryClient::new()
        .with_developer("dev1@example.com")
        .with_developer("dev3@example.com")
        .failing_create_key("key31");

    let stats = org("target", &target).restore_apps(&store, RestoreOptions::default())?;

    assert_eq!(
        stats,
        RestoreStats {
            restored: 3,
            partial: 1,
            failed: 2,
            skipped: 1,
        }
    );
    assert_eq!(target.apps("dev1@example.com").len(), 2);
    assert_eq!(target.apps("dev3@example.com").len(), 2);
    Ok(())
}

#[rstest]
fn test_dry_run_creates_nothing(
    test_dir: Result<TestDir>,
    single_app_source: InMemoryClient,
) -> Result<()> {
    let dir = test_dir?;
    let store = dir.new_run("apps")?;
    _ = org("source", &single_app_source).backup_apps(&store)?;

    let target = InMemoryClient::new().with_developer("dev@example.com");
    let stats = org("target", &target)
        .restore_apps(&store, RestoreOptions::default().dry_run(true))?;

    assert_eq!(stats.restored, 1);
    assert!(target.apps("dev@example.com").is_empty());
    Ok(())
}

#[rstest]
fn test_restore_app_from_single_file(
    test_dir: Result<TestDir>,
    single_app_source: InMemoryClient,
) -> Result<()> {
    let dir = test_dir?;
    let store = dir.new_run("apps")?;
    _ = org("source", &single_app_source).backup_apps(&store)?;

    let target = InMemoryClient::new().with_developer("dev@example.com");
    let restore = org("target", &target)
        .restore_app_file(store.path().join("myapp.yaml"), RestoreOptions::default())?;

    assert_eq!(restore.name, "myapp");
    assert_eq!(restore.developer_email, "dev@example.com");
    assert_eq!(restore.granted(), 1);
    Ok(())
}

#[rstest]
fn test_restore_developers(test_dir: Result<TestDir>, three_developers: InMemoryClient) -> Result<()> {
    let dir = test_dir?;
    let store = dir.new_run("developers")?;
    _ = org("source", &three_developers).backup_developers(&store)?;
    write_json(store.path(), "garbage.json", &serde_json::json!({"email": 42}))?;

    let target = InMemoryClient::new().failing_create_developer("dev2@example.com");
    let stats = org("target", &target).restore_developers(&store, RestoreOptions::default())?;

    assert_eq!(
        stats,
        RestoreStats {
            restored: 2,
            failed: 1,
            skipped: 1,
            ..Default::default()
        }
    );
    let mut emails: Vec<_> = target.developers().into_iter().map(|d| d.email).collect();
    emails.sort();
    assert_eq!(emails, ["dev1@example.com", "dev3@example.com"]);
    // the app names are restored verbatim even though the apps do not exist yet
    let dev1 = target
        .developers()
        .into_iter()
        .find(|d| d.email == "dev1@example.com")
        .ok_or_else(|| anyhow::anyhow!("dev1 not restored"))?;
    assert_eq!(dev1.apps, ["app11", "app12"]);
    Ok(())
}

#[rstest]
fn test_restore_from_missing_directory_fails(test_dir: Result<TestDir>) -> Result<()> {
    let dir = test_dir?;
    assert!(RecordStore::open(dir.0.path().join("missing")).is_err());
    Ok(())
}
