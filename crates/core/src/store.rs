//! Directory-of-files persistence for [`Record`]s.
use std::{
    ffi::OsString,
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use log::{debug, trace};

use crate::{
    error::{ErrorKind, OrgSnapError, OrgSnapResult},
    record::Record,
};

pub(crate) mod constants {
    /// Format of the timestamp appended to the directory of a backup run
    pub(crate) const RUN_TIMESTAMP_FORMAT: &str = "%d-%m-%Y_%H-%M-%S";
    /// Characters which are replaced when turning a record key into a file name
    pub(crate) const FORBIDDEN_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
}

/// A directory containing one file per record, named after the record key.
#[derive(Clone, Debug)]
pub struct RecordStore {
    /// The directory of the store.
    path: PathBuf,
}

impl RecordStore {
    /// Create the directory for a new backup run.
    ///
    /// The directory is `<base>_<DD-MM-YYYY_HH-MM-SS>`. It must not exist yet.
    ///
    /// # Arguments
    ///
    /// * `base` - The user-given base name of the directory
    /// * `time` - The time of the backup run
    ///
    /// # Errors
    ///
    /// * If the directory could not be created, e.g. because it already exists.
    pub fn create_run(base: impl AsRef<Path>, time: DateTime<Local>) -> OrgSnapResult<Self> {
        let path = Self::run_path(base.as_ref(), time);
        fs::create_dir(&path).map_err(|err| {
            OrgSnapError::with_source(
                ErrorKind::Io,
                "Creating the backup directory `{path}` failed. Please check that it does not exist yet and that the parent directory is writable.",
                err,
            )
            .attach_context("path", path.display().to_string())
        })?;
        debug!("created backup directory {}", path.display());
        Ok(Self { path })
    }

    /// The directory name of a backup run.
    ///
    /// # Arguments
    ///
    /// * `base` - The user-given base name of the directory
    /// * `time` - The time of the backup run
    #[must_use]
    pub fn run_path(base: &Path, time: DateTime<Local>) -> PathBuf {
        let mut name = OsString::from(base.as_os_str());
        name.push("_");
        name.push(time.format(constants::RUN_TIMESTAMP_FORMAT).to_string());
        PathBuf::from(name)
    }

    /// Open an existing store.
    ///
    /// # Errors
    ///
    /// * If `path` is not a directory.
    pub fn open(path: impl Into<PathBuf>) -> OrgSnapResult<Self> {
        let path = path.into();
        if !path.is_dir() {
            return Err(OrgSnapError::new(
                ErrorKind::InvalidInput,
                "`{path}` is not a directory. Please give the directory of a backup run.",
            )
            .attach_context("path", path.display().to_string()));
        }
        Ok(Self { path })
    }

    /// The directory of this store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the location of the store.
    ///
    /// This is `local:<path>`.
    #[must_use]
    pub fn location(&self) -> String {
        let mut location = "local:".to_string();
        location.push_str(&self.path.to_string_lossy());
        location
    }

    /// The file name of a record with the given key.
    ///
    /// Path separators and characters not allowed in file names on common platforms are
    /// replaced by `_`.
    #[must_use]
    pub fn file_name<R: Record>(key: &str) -> String {
        let mut name: String = key
            .chars()
            .map(|c| {
                if c.is_control() || constants::FORBIDDEN_CHARS.contains(&c) {
                    '_'
                } else {
                    c
                }
            })
            .collect();
        if name.is_empty() || name == "." || name == ".." {
            name = name.replace('.', "_");
            name.insert(0, '_');
        }
        name.push('.');
        name.push_str(R::KIND.extension());
        name
    }

    /// Path to the file of the given record.
    #[must_use]
    pub fn path_of<R: Record>(&self, record: &R) -> PathBuf {
        self.path.join(Self::file_name::<R>(record.key()))
    }

    /// Write a record into its own file. The file must not exist yet.
    ///
    /// # Errors
    ///
    /// * If the record could not be serialized.
    /// * If a file with the same name already exists, e.g. for two apps with the same name
    ///   owned by different developers.
    /// * If the file could not be written.
    ///
    /// # Returns
    ///
    /// The path of the written file.
    pub fn write<R: Record>(&self, record: &R) -> OrgSnapResult<PathBuf> {
        let path = self.path_of(record);
        trace!("writing {} {}", R::KIND, path.display());

        let data = R::KIND.format().to_vec(record).map_err(|err| {
            OrgSnapError::with_source(
                ErrorKind::Parsing,
                "Serializing {kind} `{key}` failed.",
                err,
            )
            .attach_context("kind", R::KIND.to_string())
            .attach_context("key", record.key())
        })?;

        let write_err = |err: io::Error| {
            OrgSnapError::with_source(ErrorKind::Io, "Writing record file `{path}` failed.", err)
                .attach_context("path", path.display().to_string())
        };
        // records are written once
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|err| {
                if err.kind() == io::ErrorKind::AlreadyExists {
                    OrgSnapError::with_source(
                        ErrorKind::Io,
                        "Record file `{path}` already exists. The {kind} `{key}` has the same file name as a record written before and is not stored.",
                        err,
                    )
                    .attach_context("path", path.display().to_string())
                    .attach_context("kind", R::KIND.to_string())
                    .attach_context("key", record.key())
                } else {
                    write_err(err)
                }
            })?;
        file.write_all(&data).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;

        Ok(path)
    }

    /// Read a single record file.
    ///
    /// # Errors
    ///
    /// * If the file could not be read.
    /// * If the file does not contain a valid record.
    pub fn read_file<R: Record>(path: impl AsRef<Path>) -> OrgSnapResult<R> {
        let path = path.as_ref();
        trace!("reading {} {}", R::KIND, path.display());

        let data = fs::read(path).map_err(|err| {
            OrgSnapError::with_source(ErrorKind::Io, "Reading record file `{path}` failed.", err)
                .attach_context("path", path.display().to_string())
        })?;

        R::KIND.format().from_slice(&data).map_err(|err| {
            OrgSnapError::with_source(
                ErrorKind::Parsing,
                "File `{path}` is not a valid {kind} record.",
                err,
            )
            .attach_context("path", path.display().to_string())
            .attach_context("kind", R::KIND.to_string())
        })
    }

    /// Lists all record files of the given kind, in directory-listing order.
    ///
    /// # Errors
    ///
    /// * If the directory could not be read.
    pub fn list<R: Record>(&self) -> OrgSnapResult<Vec<PathBuf>> {
        let list_err = |err: std::io::Error| {
            OrgSnapError::with_source(ErrorKind::Io, "Listing directory `{path}` failed.", err)
                .attach_context("path", self.path.display().to_string())
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.path).map_err(list_err)? {
            let path = entry.map_err(list_err)?.path();
            if path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext == R::KIND.extension())
            {
                files.push(path);
            }
        }
        Ok(files)
    }

    /// Read all records of the given kind.
    ///
    /// Files are read lazily, one per iteration step. A file which cannot be read or parsed
    /// yields an error item; iteration continues with the next file.
    ///
    /// # Errors
    ///
    /// * If the directory could not be listed.
    pub fn records<R: Record>(&self) -> OrgSnapResult<impl Iterator<Item = OrgSnapResult<R>>> {
        Ok(self.list::<R>()?.into_iter().map(Self::read_file))
    }
}
