//! `orgsnap` - back up and restore developers, apps and credentials of an API management
//! organization.
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use log::{LevelFilter, error};
use simplelog::{ColorChoice, Config, SimpleLogger, TermLogger, TerminalMode};

use orgsnap_backend::{AccessToken, ClientOptions};
use orgsnap_core::{
    AppRestore, BackupStats, NoProgressBars, Organization, RecordStore, RestoreOptions,
    RestoreStats,
};

/// Back up and restore developers and apps of an API management organization
#[derive(Parser, Debug)]
#[command(name = "orgsnap", author, version, about, long_about = None)]
struct Cli {
    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", env = "ORGSNAP_LOG_LEVEL")]
    log_level: LevelFilter,

    #[command(flatten)]
    client: ClientOptions,

    /// The subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// The organization to work on
#[derive(Args, Debug)]
struct Target {
    /// JSON file containing the access token
    credential_file: PathBuf,

    /// Name of the organization
    organization: String,
}

impl Target {
    fn open(&self, opts: &ClientOptions) -> Result<Organization<NoProgressBars>> {
        let token = AccessToken::from_file(&self.credential_file)?;
        let client = opts.to_client(&token)?;
        Ok(Organization::new(&self.organization, client))
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Back up all apps into `<DIRECTORY>_<DD-MM-YYYY_HH-MM-SS>`
    BackupApps {
        #[command(flatten)]
        target: Target,

        /// Base name of the backup directory
        directory: PathBuf,
    },

    /// Back up all developers into `<DIRECTORY>_<DD-MM-YYYY_HH-MM-SS>`
    BackupDevelopers {
        #[command(flatten)]
        target: Target,

        /// Base name of the backup directory
        directory: PathBuf,
    },

    /// Restore apps from a single app file or from a backup directory
    RestoreApps {
        #[command(flatten)]
        target: Target,

        /// App file or backup directory
        path: PathBuf,

        #[command(flatten)]
        opts: RestoreOptions,
    },

    /// Restore developers from a backup directory
    RestoreDevelopers {
        #[command(flatten)]
        target: Target,

        /// Backup directory
        directory: PathBuf,

        #[command(flatten)]
        opts: RestoreOptions,
    },
}

fn init_logger(level: LevelFilter) {
    if TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .is_err()
    {
        _ = SimpleLogger::init(level, Config::default());
    }
}

fn print_backup(kind: &str, stats: BackupStats, store: &RecordStore) {
    println!(
        "Total {kind}: {} written to {}, {} failed",
        stats.written,
        store.path().display(),
        stats.failed
    );
}

fn print_restore(kind: &str, stats: RestoreStats) {
    println!(
        "Total {kind}: {} restored, {} partially restored, {} failed, {} unreadable files",
        stats.restored, stats.partial, stats.failed, stats.skipped
    );
}

fn print_app(restore: &AppRestore) {
    println!(
        "App `{}` of `{}`: {} of {} keys created, {} granted",
        restore.name,
        restore.developer_email,
        restore.keyed(),
        restore.credentials.len(),
        restore.granted()
    );
}

fn restore_apps(org: &Organization<NoProgressBars>, path: &Path, opts: RestoreOptions) -> Result<()> {
    if path.is_dir() {
        let store = RecordStore::open(path)?;
        print_restore("apps", org.restore_apps(&store, opts)?);
    } else {
        print_app(&org.restore_app_file(path, opts)?);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::BackupApps { target, directory } => {
            let org = target.open(&cli.client)?;
            let store = RecordStore::create_run(&directory, Local::now())?;
            print_backup("apps", org.backup_apps(&store)?, &store);
        }
        Command::BackupDevelopers { target, directory } => {
            let org = target.open(&cli.client)?;
            let store = RecordStore::create_run(&directory, Local::now())?;
            print_backup("developers", org.backup_developers(&store)?, &store);
        }
        Command::RestoreApps { target, path, opts } => {
            let org = target.open(&cli.client)?;
            restore_apps(&org, &path, opts)?;
        }
        Command::RestoreDevelopers {
            target,
            directory,
            opts,
        } => {
            let org = target.open(&cli.client)?;
            let store = RecordStore::open(directory)?;
            print_restore("developers", org.restore_developers(&store, opts)?);
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    if let Err(err) = run(cli) {
        error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;
    use orgsnap_core::GrantMode;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn positional_arguments_are_parsed() {
        let cli = Cli::try_parse_from([
            "orgsnap",
            "restore-apps",
            "creds.json",
            "my-org",
            "apps_01-02-2024_10-00-00",
            "--dry-run",
            "--grants",
            "all",
        ])
        .unwrap();

        let Command::RestoreApps { target, path, opts } = cli.command else {
            panic!("wrong command");
        };
        assert_eq!(target.credential_file, PathBuf::from("creds.json"));
        assert_eq!(target.organization, "my-org");
        assert_eq!(path, PathBuf::from("apps_01-02-2024_10-00-00"));
        assert_eq!(opts, RestoreOptions::default().dry_run(true).grants(GrantMode::All));
    }

    #[rstest]
    #[case(&["orgsnap", "backup-apps", "creds.json", "my-org"])]
    #[case(&["orgsnap", "backup-developers"])]
    #[case(&["orgsnap", "restore-developers", "creds.json"])]
    fn missing_arguments_are_rejected(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn client_options_have_defaults() {
        let cli =
            Cli::try_parse_from(["orgsnap", "backup-developers", "c.json", "org", "devs"]).unwrap();
        assert_eq!(cli.client, ClientOptions::default());
        assert_eq!(cli.log_level, LevelFilter::Info);
    }
}
