use std::path::PathBuf;

use anyhow::Result;
use pretty_assertions::assert_eq;
use rstest::rstest;

use orgsnap_core::{
    AppRecord, BackupStats, DeveloperRecord, ErrorKind, RecordStore,
    record::{Attribute, DeveloperStatus, GrantStatus, ProductGrant},
};
use orgsnap_testing::{client::InMemoryClient, count_files, fixtures};

use crate::{TestDir, org, single_app_source, test_dir, three_developers};

#[rstest]
fn test_backup_apps_writes_complete_records(
    test_dir: Result<TestDir>,
    single_app_source: InMemoryClient,
) -> Result<()> {
    let dir = test_dir?;
    let store = dir.new_run("apps")?;
    assert_eq!(
        store.path(),
        dir.0.path().join("apps_02-01-2024_03-04-05")
    );

    let stats = org("source", &single_app_source).backup_apps(&store)?;
    assert_eq!(stats, BackupStats { written: 1, failed: 0 });

    let app: AppRecord = RecordStore::read_file(store.path().join("myapp.yaml"))?;
    assert_eq!(app.name, "myapp");
    assert_eq!(app.developer_email(), "dev@example.com");
    assert_eq!(app.attributes, [Attribute::new("DisplayName", "My App")]);
    assert_eq!(app.credentials.len(), 1);
    let credential = &app.credentials[0];
    assert_eq!(credential.consumer_key, "key1");
    assert_eq!(credential.consumer_secret, "secret1");
    assert!(credential.never_expires_at());
    assert_eq!(
        credential.api_products,
        [ProductGrant::new("P1", GrantStatus::Approved)]
    );
    Ok(())
}

#[rstest]
fn test_failing_app_listing_skips_only_that_developer(
    test_dir: Result<TestDir>,
    three_developers: InMemoryClient,
) -> Result<()> {
    let dir = test_dir?;
    let store = dir.new_run("apps")?;
    let source = three_developers.failing_list_apps("dev2@example.com");

    let stats = org("source", &source).backup_apps(&store)?;

    assert_eq!(stats, BackupStats { written: 4, failed: 1 });
    assert_eq!(count_files(store.path(), "yaml")?, 4);
    for name in ["app11", "app12", "app31", "app32"] {
        assert!(store.path().join(format!("{name}.yaml")).is_file());
    }
    assert!(!store.path().join("app21.yaml").exists());
    Ok(())
}

#[rstest]
fn test_failing_app_details_skip_only_that_app(
    test_dir: Result<TestDir>,
    three_developers: InMemoryClient,
) -> Result<()> {
    let dir = test_dir?;
    let store = dir.new_run("apps")?;
    let source = three_developers.failing_get_app("app12");

    let stats = org("source", &source).backup_apps(&store)?;

    assert_eq!(stats, BackupStats { written: 5, failed: 1 });
    assert!(!store.path().join("app12.yaml").exists());
    Ok(())
}

#[rstest]
fn test_developer_without_apps_yields_no_records(test_dir: Result<TestDir>) -> Result<()> {
    let dir = test_dir?;
    let store = dir.new_run("apps")?;
    let source = InMemoryClient::new().with_developer("lonely@example.com");

    let stats = org("source", &source).backup_apps(&store)?;

    assert_eq!(stats, BackupStats::default());
    assert_eq!(count_files(store.path(), "yaml")?, 0);
    Ok(())
}

#[rstest]
fn test_same_app_name_of_two_developers_is_not_overwritten(
    test_dir: Result<TestDir>,
) -> Result<()> {
    let dir = test_dir?;
    let store = dir.new_run("apps")?;
    let source = InMemoryClient::new()
        .with_developer("a@example.com")
        .with_app("a@example.com", fixtures::wire_app("shared", &[("ka", "sa", &["P1"])]))
        .with_developer("b@example.com")
        .with_app("b@example.com", fixtures::wire_app("shared", &[("kb", "sb", &["P1"])]));

    let stats = org("source", &source).backup_apps(&store)?;

    assert_eq!(stats, BackupStats { written: 1, failed: 1 });
    assert_eq!(count_files(store.path(), "yaml")?, 1);
    let app: AppRecord = RecordStore::read_file(store.path().join("shared.yaml"))?;
    assert_eq!(app.developer_email(), "a@example.com");
    assert_eq!(app.credentials[0].consumer_key, "ka");
    Ok(())
}

#[rstest]
fn test_failing_developer_list_aborts_backup(
    test_dir: Result<TestDir>,
    three_developers: InMemoryClient,
) -> Result<()> {
    let dir = test_dir?;
    let store = dir.new_run("apps")?;
    let source = three_developers.failing_list_developers();

    let err = org("source", &source).backup_apps(&store).unwrap_err();

    assert!(err.is_kind(ErrorKind::Client));
    assert_eq!(err.context("organization"), Some("source"));
    assert_eq!(count_files(store.path(), "yaml")?, 0);
    Ok(())
}

#[rstest]
fn test_backup_developers(
    test_dir: Result<TestDir>,
    three_developers: InMemoryClient,
) -> Result<()> {
    let dir = test_dir?;
    let store = dir.new_run("developers")?;
    let source = three_developers.failing_get_developer("dev3@example.com");

    let stats = org("source", &source).backup_developers(&store)?;
    assert_eq!(stats, BackupStats { written: 2, failed: 1 });

    let developer: DeveloperRecord =
        RecordStore::read_file(store.path().join("dev1@example.com.json"))?;
    assert_eq!(developer.email, "dev1@example.com");
    assert_eq!(developer.status, DeveloperStatus::Active);
    assert_eq!(developer.apps, ["app11", "app12"]);
    Ok(())
}

#[rstest]
fn test_app_walker_is_lazy_and_ordered(three_developers: InMemoryClient) -> Result<()> {
    let source = org("source", &three_developers);

    let names = source
        .app_records()?
        .map(|app| app.map(|app| app.name))
        .collect::<Result<Vec<_>, _>>()?;

    assert_eq!(names, ["app11", "app12", "app21", "app22", "app31", "app32"]);
    Ok(())
}

#[rstest]
fn test_second_run_at_same_time_fails(test_dir: Result<TestDir>) -> Result<()> {
    let dir = test_dir?;
    let first: PathBuf = dir.new_run("apps")?.path().to_path_buf();
    assert!(first.is_dir());
    assert!(dir.new_run("apps").is_err());
    Ok(())
}
