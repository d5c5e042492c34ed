//! Error types and Result module.
#![allow(clippy::doc_markdown)]

use std::{
    error::Error as StdError,
    fmt::{self, Display},
};

/// Result type that is being returned from methods that can fail and thus have [`OrgSnapError`]s.
pub type OrgSnapResult<T, E = Box<OrgSnapError>> = Result<T, E>;

/// Errors that can result from orgsnap.
///
/// The guidance message may contain `{key}` placeholders which are filled in from
/// the attached context when the error is displayed.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub struct OrgSnapError {
    /// The kind of the error.
    kind: ErrorKind,

    /// Chain to the cause of the error.
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,

    /// The error message with guidance.
    guidance: String,

    /// The context of the error.
    context: Vec<(&'static str, String)>,
}

impl Display for OrgSnapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} occurred in `orgsnap`", self.kind)?;

        write!(f, "\n\nMessage:\n{}", self.display_guidance())?;

        if !self.context.is_empty() {
            write!(f, "\n\nContext:\n")?;
            let lines: Vec<String> = self
                .context
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect();
            write!(f, "{}", lines.join(",\n"))?;
        }

        if let Some(cause) = &self.source {
            write!(f, "\n\nCaused by: {cause}")?;
        }

        Ok(())
    }
}

impl OrgSnapError {
    /// Creates a new error with the given kind and guidance.
    pub fn new(kind: ErrorKind, guidance: impl Into<String>) -> Box<Self> {
        Box::new(Self {
            kind,
            guidance: guidance.into(),
            context: Vec::new(),
            source: None,
        })
    }

    /// Creates a new error with the given kind, guidance and source.
    pub fn with_source(
        kind: ErrorKind,
        guidance: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Box<Self> {
        Box::new(Self {
            kind,
            guidance: guidance.into(),
            context: Vec::new(),
            source: Some(source.into()),
        })
    }

    /// Attach a key/value pair to the error context.
    ///
    /// The value replaces the `{key}` placeholder in the guidance message.
    #[must_use]
    pub fn attach_context(mut self: Box<Self>, key: &'static str, value: impl Into<String>) -> Box<Self> {
        self.context.push((key, value.into()));
        self
    }

    /// The kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Checks if the error is of the given kind.
    #[must_use]
    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// The guidance message without the placeholders being filled in.
    #[must_use]
    pub fn guidance(&self) -> &str {
        &self.guidance
    }

    /// Get the value attached to the context under `key`, if any.
    #[must_use]
    pub fn context(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The guidance message with all known placeholders replaced by their context value.
    #[must_use]
    pub fn display_guidance(&self) -> String {
        self.context
            .iter()
            .fold(self.guidance.clone(), |guidance, (key, value)| {
                guidance.replace(&format!("{{{key}}}"), value)
            })
    }
}

/// [`ErrorKind`] describes the errors that can happen while backing up or restoring.
///
/// This is a non-exhaustive enum, so additional variants may be added in future. It is
/// recommended to match against the wildcard `_` instead of listing all possible variants,
/// to avoid problems when new variants are added.
#[derive(thiserror::Error, Debug, displaydoc::Display, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Resource Client Error
    Client,
    /// IO Error
    Io,
    /// Parsing Error
    Parsing,
    /// Input Error
    InvalidInput,
    /// Record Error
    Record,
    /// Restore Error
    Restore,
    /// Configuration Error
    Config,
    /// Internal Error
    Internal,
}
