//! Parameter and assignment types shared by the expander and the merger.

use serde::{Deserialize, Serialize};

/// A named argument with every candidate value it may take.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Parameter {
    pub arg: String,
    // Older inputs spell the list `vals`.
    #[serde(alias = "vals")]
    pub values: Vec<String>,
    #[serde(default, skip_serializing)]
    pub enabled: Option<String>,
    /// Harness role the parameter applies to, e.g. `client` or `server`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Parameter {
    pub fn new<A, I, V>(arg: A, values: I) -> Self
    where
        A: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            arg: arg.into(),
            values: values.into_iter().map(Into::into).collect(),
            enabled: None,
            role: None,
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Bind this parameter to one of its values, carrying the role along.
    #[must_use]
    pub fn assign(&self, value: &str) -> Assignment {
        Assignment {
            arg: self.arg.clone(),
            value: value.to_string(),
            role: self.role.clone(),
        }
    }

    /// Returns `false` only when the input switched the parameter off with
    /// `"enabled": "no"`.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
            .as_deref()
            .is_none_or(|flag| !flag.trim().eq_ignore_ascii_case("no"))
    }
}

/// One parameter bound to one of its values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Assignment {
    pub arg: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Assignment {
    pub fn new(arg: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            arg: arg.into(),
            value: value.into(),
            role: None,
        }
    }
}

/// An ordered group of parameters expanded together.
pub type ParameterCollection = Vec<Parameter>;

/// One fully resolved run configuration.
pub type AssignmentSet = Vec<Assignment>;

/// Drop parameters switched off in the input, logging each one.
pub fn enabled_only(collection: ParameterCollection) -> ParameterCollection {
    collection
        .into_iter()
        .filter(|param| {
            let keep = param.is_enabled();
            if !keep {
                log::info!("skipping disabled parameter '{}'", param.arg);
            }
            keep
        })
        .collect()
}
