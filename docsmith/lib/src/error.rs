//! Error types for the docsmith library.

use std::path::PathBuf;

use thiserror::Error;

use crate::document::DocumentFormat;

/// Errors raised while reading or writing a JSON/YAML document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {format} document `{path}`: {message}")]
    Parse {
        path: PathBuf,
        format: DocumentFormat,
        message: String,
    },

    #[error("failed to serialize {format} document: {message}")]
    Serialize {
        format: DocumentFormat,
        message: String,
    },

    #[error("failed to write `{path}`: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{path}` does not contain a JSON/YAML object at its root")]
    NotAnObject { path: PathBuf },
}

/// Errors raised while loading an endpoint config.
#[derive(Debug, Error)]
pub enum EndpointConfigError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("endpoint config `{path}` is invalid: {message}")]
    Invalid { path: PathBuf, message: String },

    #[error("endpoint config `{path}` is missing required field `{field}`")]
    MissingField { path: PathBuf, field: &'static str },
}

/// Errors raised while splicing a new endpoint into an API spec.
#[derive(Debug, Error)]
pub enum SpliceError {
    #[error("template `{name}` not found in `{section}`")]
    MissingTemplate { section: String, name: String },

    #[error("template `{name}` in `{section}` has no `{field}`")]
    MalformedTemplate {
        section: String,
        name: String,
        field: String,
    },

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Config(#[from] EndpointConfigError),
}

/// Errors raised while copying security schemes between specs.
#[derive(Debug, Error)]
pub enum SecurityError {
    #[error("no security schemes found in base spec `{path}`")]
    NoSchemes { path: PathBuf },

    #[error("no spec named `{name}` found in `{dir}`")]
    BaseSpecNotFound { dir: PathBuf, name: String },

    #[error("failed to list `{dir}`: {source}")]
    ListDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Errors raised by the documentation site tooling.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("source file does not exist: {0}")]
    SourceMissing(PathBuf),

    #[error("destination file already exists: {0}")]
    DestinationExists(PathBuf),

    #[error("`{path}` is not inside the project root `{root}`")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("no site config found in `{0}` (looked for docs.json and mint.json)")]
    ConfigNotFound(PathBuf),

    #[error("site config field `{field}` has an unexpected shape")]
    Malformed { field: &'static str },

    #[error("failed to move `{from}` to `{to}`: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk `{path}`: {message}")]
    Walk { path: PathBuf, message: String },

    #[error(transparent)]
    Document(#[from] DocumentError),
}
