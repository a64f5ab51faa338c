//! Configuration errors: the only failures that halt a run.
//!
//! Everything that goes wrong while reading doc comments is reported as a
//! [`Diagnostic`](crate::diagnostic::Diagnostic) instead.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A pattern token references a kind outside `text|string|space|spaces`.
    #[error("tag @{tag}: unknown parameter kind '{kind}'")]
    UnknownKind { tag: String, kind: String },

    /// A pattern token does not have the `[?][name:]kind` shape.
    #[error("tag @{tag}: malformed pattern token '{token}'")]
    MalformedToken { tag: String, token: String },

    /// Two captured parameters of one tag share a name.
    #[error("tag @{tag}: duplicate parameter name '{name}'")]
    DuplicateParameter { tag: String, name: String },

    /// `space`/`spaces` are separators and cannot carry a name.
    #[error("tag @{tag}: structural kind '{kind}' cannot be named ('{name}')")]
    StructuralName {
        tag: String,
        name: String,
        kind: String,
    },

    /// A primary or multi-value tag is not part of the tag table.
    #[error("{role} tag @{tag} is not defined in the tag table")]
    UndefinedTag { role: &'static str, tag: String },

    #[error("failed to read grammar file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid grammar file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
