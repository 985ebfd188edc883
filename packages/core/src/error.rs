//! Form Error Types
//!
//! Validation faults are data attached to form nodes and never surface here.
//! `FormError` covers misuse of the form API: unknown paths, malformed schemas
//! or configuration, serialization failures, and saves refused by policy.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    /// No node exists at the given path
    #[error("Form path not found: {path}")]
    PathNotFound { path: String },

    /// Path string could not be parsed
    #[error("Invalid form path: {path}")]
    InvalidPath { path: String },

    /// Node exists but has a different kind than the operation needs
    #[error("Node at '{path}' is not a {expected}")]
    WrongNodeKind {
        path: String,
        expected: &'static str,
    },

    /// Pattern validator could not be compiled
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Schema is structurally inconsistent
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No reactive rule registered under this id
    #[error("Unknown reactive rule: {0}")]
    UnknownRule(usize),

    /// Save refused because the form holds faults and the policy blocks
    #[error("Save blocked by invalid form state: {}", .paths.join(", "))]
    SaveBlocked { paths: Vec<String> },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormError {
    pub fn path_not_found(path: impl Into<String>) -> Self {
        Self::PathNotFound { path: path.into() }
    }

    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath { path: path.into() }
    }

    pub fn wrong_node_kind(path: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongNodeKind {
            path: path.into(),
            expected,
        }
    }

    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }

    pub fn invalid_schema(msg: impl Into<String>) -> Self {
        Self::InvalidSchema(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn save_blocked(paths: Vec<String>) -> Self {
        Self::SaveBlocked { paths }
    }
}

pub type Result<T> = std::result::Result<T, FormError>;
