//! Error types shared across the console.
//!
//! Validation errors are user-correctable and end up as notifications.
//! Transport errors collapse to a single generic message for the user while
//! the detailed form goes to the log. Selection errors indicate a caller bug.

use thiserror::Error;

use crate::auth::AuthField;

/// A SelectionTree operation was handed an id or index the tree does not have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Test group {0} does not exist")]
    GroupNotFound(u32),

    #[error("Sub-test index {index} is out of range for group {group_id} ({len} sub-tests)")]
    SubTestOutOfRange {
        group_id: u32,
        index: usize,
        len: usize,
    },
}

/// Input problems that abort a run (or an auth submit) before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Endpoint required: please fill the endpoint details")]
    MissingEndpoint,

    #[error("Please provide authentication details")]
    MissingCredentials,

    #[error("Choose one auth method: fill either token or basic auth details, not both")]
    ConflictingAuth,

    #[error("Please fill all authentication details (missing {})", join_fields(.missing))]
    IncompleteAuth { missing: Vec<AuthField> },

    #[error("Select at least one test case to proceed")]
    NothingSelected,

    #[error("A run is already in progress")]
    RunInFlight,
}

fn join_fields(fields: &[AuthField]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Anything that goes wrong between dispatching the run and decoding its report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Invalid test suite URL `{url}`: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Test suite responded with status {0}")]
    Status(u16),

    #[error("Failed to read response: {0}")]
    Body(String),

    #[error("Failed to decode test report: {0}")]
    Decode(String),
}

impl TransportError {
    /// The only text a user ever sees for a transport failure.
    pub fn user_message(&self) -> &'static str {
        "Please provide correct authentication details and ensure the service provider is up and running!"
    }
}

/// The payload key table no longer lines up with the test catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Payload key `{key}` refers to missing group {group_id}")]
    UnknownGroup { key: &'static str, group_id: u32 },

    #[error("Payload key `{key}` refers to missing sub-test {index} of group {group_id}")]
    UnknownSubTest {
        key: &'static str,
        group_id: u32,
        index: usize,
    },

    #[error("Payload key `{key}` expects `{expected}` but the catalog has `{found}`")]
    StateNameMismatch {
        key: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("Group-level key `{key}` requires group {group_id} to have exactly one sub-test")]
    GroupNotSingular { key: &'static str, group_id: u32 },

    #[error("Sub-test `{state_name}` has no payload key")]
    Unbound { state_name: String },

    #[error("Payload key `{0}` is bound more than once")]
    DuplicateKey(&'static str),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to access `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse `{path}`: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_auth_lists_missing_fields() {
        let err = ValidationError::IncompleteAuth {
            missing: vec![AuthField::UserName, AuthField::Password],
        };
        assert_eq!(
            err.to_string(),
            "Please fill all authentication details (missing userName, password)"
        );
    }

    #[test]
    fn transport_errors_share_one_user_message() {
        let a = TransportError::Status(401);
        let b = TransportError::Request("connection refused".into());
        assert_eq!(a.user_message(), b.user_message());
        assert!(a.user_message().contains("service provider is up and running"));
    }
}
