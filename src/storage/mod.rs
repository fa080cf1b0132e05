//! Local state
//!
//! Resolves the per-user app data directory and reads/writes the credential
//! document kept inside it.

mod app_dir;
pub mod credentials;

pub use app_dir::AppDirectory;
pub use credentials::{
    read_credentials, token_record, write_credentials, CredentialDocument, CredentialRecord,
};
