//! Versioned JSON credential document
//!
//! On disk:
//!
//! ```json
//! {"Version":"1.0","Is Encrypted":false,"Headers":["Token"],"Details":[{"Token":"<token>"}]}
//! ```
//!
//! The document is always rewritten whole. Nothing is encrypted: the
//! `Is Encrypted` flag is written as `false` and a document claiming
//! otherwise is refused when a token is requested.

use crate::{RepoInitError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Current document format version
pub const CREDENTIALS_VERSION: &str = "1.0";

/// Header holding the access token
pub const TOKEN_HEADER: &str = "Token";

/// One named credential record (header name -> value), in header order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialRecord(Map<String, Value>);

impl CredentialRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(header, value);
        self
    }

    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.0.insert(header.into(), Value::String(value.into()));
    }

    /// Value for a header, if present and a string
    pub fn get(&self, header: &str) -> Option<&str> {
        self.0.get(header).and_then(Value::as_str)
    }

    /// Header names in insertion order
    pub fn headers(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Record holding only an access token
pub fn token_record(token: impl Into<String>) -> CredentialRecord {
    CredentialRecord::new().with(TOKEN_HEADER, token)
}

/// The persisted credential document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialDocument {
    #[serde(rename = "Version")]
    pub version: String,

    /// Always `false` when written by this crate
    #[serde(rename = "Is Encrypted")]
    pub is_encrypted: bool,

    #[serde(rename = "Headers")]
    pub headers: Vec<String>,

    #[serde(rename = "Details")]
    pub details: Vec<CredentialRecord>,
}

impl CredentialDocument {
    /// Wrap records, deriving headers from the first record's keys
    pub fn from_records(records: Vec<CredentialRecord>) -> Result<Self> {
        let first = records.first().ok_or_else(|| {
            RepoInitError::Credential("cannot write an empty credential list".to_string())
        })?;

        Ok(Self {
            version: CREDENTIALS_VERSION.to_string(),
            is_encrypted: false,
            headers: first.headers(),
            details: records,
        })
    }

    /// True when every record's key set equals `headers`.
    ///
    /// Not checked on read; externally edited files may violate it.
    pub fn is_consistent(&self) -> bool {
        let mut expected = self.headers.clone();
        expected.sort();
        self.details.iter().all(|record| {
            let mut keys = record.headers();
            keys.sort();
            keys == expected
        })
    }

    /// Access token from the first record
    pub fn token(&self) -> Result<&str> {
        if self.is_encrypted {
            return Err(RepoInitError::Credential(
                "encrypted credential documents are not supported".to_string(),
            ));
        }

        self.details
            .first()
            .and_then(|record| record.get(TOKEN_HEADER))
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                RepoInitError::Credential(format!(
                    "no '{}' value in the first credential record",
                    TOKEN_HEADER
                ))
            })
    }
}

/// Serialize `records` as a fresh document and overwrite `path` with it
pub fn write_credentials(
    records: Vec<CredentialRecord>,
    path: impl AsRef<Path>,
) -> Result<CredentialDocument> {
    let path = path.as_ref();
    let document = CredentialDocument::from_records(records)?;

    let file = create_private(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &document)?;
    writer.flush()?;

    tracing::info!(
        path = %path.display(),
        records = document.details.len(),
        "Credential document written"
    );

    Ok(document)
}

/// Parse the credential document at `path`
pub fn read_credentials(path: impl AsRef<Path>) -> Result<CredentialDocument> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let document: CredentialDocument = serde_json::from_reader(BufReader::new(file))?;

    if document.version != CREDENTIALS_VERSION {
        tracing::warn!(
            version = %document.version,
            "Unknown credential document version, attempting to use it anyway"
        );
    }

    tracing::debug!(
        path = %path.display(),
        records = document.details.len(),
        "Credential document read"
    );

    Ok(document)
}

#[cfg(unix)]
fn create_private(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    use std::os::unix::fs::PermissionsExt;

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies to newly created files
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
