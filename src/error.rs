//! Error type shared by the library and the `multiplex` binary.

use std::fmt;

use thiserror::Error;

/// A single structural problem found while validating an input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Location of the offending value, e.g. `/sets/0/1/values`.
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "/: {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Newline-separated rendering of a violation list for error messages.
struct ViolationList<'a>(&'a [Violation]);

impl fmt::Display for ViolationList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for violation in self.0 {
            write!(f, "\n- {violation}")?;
        }
        Ok(())
    }
}

fn list(violations: &[Violation]) -> ViolationList<'_> {
    ViolationList(violations)
}

/// Errors returned by library functions.
#[derive(Error, Debug)]
#[allow(clippy::module_name_repetitions, reason = "crate-level error name mirrors the crate")]
pub enum MultiplexError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed input at {path}: {message}")]
    MalformedInput { path: String, message: String },
    #[error("the document is not valid:{}", list(.0))]
    Validation(Vec<Violation>),
    #[error("cannot expand an empty parameter collection")]
    EmptyCollection,
    #[error("parameter names must not be empty")]
    EmptyArg,
    #[error("parameter '{arg}' has no values")]
    EmptyValues { arg: String },
    #[error("set {index} has no parameters after merging with common parameters")]
    EmptyGroup { index: usize },
    #[error("set {index}: {source}")]
    Group {
        index: usize,
        #[source]
        source: Box<MultiplexError>,
    },
    #[error("set {index} includes unknown global options '{name}'")]
    UnknownInclude { index: usize, name: String },
    #[error("the expansion exceeds the limit of {limit} combinations")]
    TooManyCombinations { limit: usize },
    #[error("unable to serialize expanded parameters: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(#[from] ortho_config::OrthoError),
}

impl MultiplexError {
    /// Attach the index of the set whose expansion failed.
    #[must_use]
    pub fn in_group(self, index: usize) -> Self {
        match self {
            already @ (Self::EmptyGroup { .. } | Self::Group { .. }) => already,
            other => Self::Group {
                index,
                source: Box::new(other),
            },
        }
    }
}
