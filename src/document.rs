//! Input document shapes and their decoding.
//!
//! Three shapes are accepted:
//!
//! - a flat list of parameters, expanded as a single collection;
//! - `{"common": [...], "sets": [[...], ...]}`, where every set is merged
//!   with the common parameters;
//! - `{"global-options": [{"name", "params"}], "sets": [{"include", "params"}]}`,
//!   where each set merges with the named global options block it includes.
//!   A set may instead be a list mixing `{"include": name}` entries with
//!   parameters; its blocks are merged in the order they are listed.
//!
//! Decoding reports the path of the first offending field.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::MultiplexError;
use crate::expand::expand;
use crate::merge::{merge_and_expand, merge_group};
use crate::model::{AssignmentSet, ParameterCollection, enabled_only};

/// Key selecting the global-options shape.
pub const GLOBAL_OPTIONS_KEY: &str = "global-options";

#[derive(Debug, Deserialize)]
struct CommonSets {
    #[serde(default)]
    common: ParameterCollection,
    sets: Vec<ParameterCollection>,
}

#[derive(Debug, Deserialize)]
struct GlobalOptionsSets {
    #[serde(rename = "global-options", default)]
    global_options: Vec<GlobalOptions>,
    sets: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct GlobalOptions {
    name: String,
    #[serde(default)]
    params: ParameterCollection,
}

#[derive(Debug, Deserialize)]
struct IncludeSet {
    #[serde(default)]
    include: Option<String>,
    #[serde(default)]
    params: ParameterCollection,
}

#[derive(Debug, Deserialize)]
struct IncludeEntry {
    include: String,
}

/// A set after decoding either of its spellings.
#[derive(Debug, Default)]
struct ResolvedSet {
    includes: Vec<String>,
    params: ParameterCollection,
}

impl ResolvedSet {
    fn decode(index: usize, value: Value) -> Result<Self, MultiplexError> {
        let at = format!("sets[{index}]");
        let Value::Array(entries) = value else {
            let IncludeSet { include, params } = decode_at(value, &at)?;
            return Ok(Self {
                includes: include.into_iter().collect(),
                params,
            });
        };
        let mut set = Self::default();
        for (position, entry) in entries.into_iter().enumerate() {
            let at = format!("{at}[{position}]");
            if entry.get("include").is_some() {
                let IncludeEntry { include } = decode_at(entry, &at)?;
                set.includes.push(include);
            } else {
                set.params.push(decode_at(entry, &at)?);
            }
        }
        Ok(set)
    }
}

/// A decoded input document ready for expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    /// One collection expanded on its own.
    Flat(ParameterCollection),
    /// Groups merged with shared common parameters before expansion.
    Sets {
        common: ParameterCollection,
        groups: Vec<ParameterCollection>,
    },
}

impl Document {
    /// Decode the flat list shape.
    ///
    /// # Errors
    ///
    /// Returns [`MultiplexError::MalformedInput`] when `value` is not a list of
    /// parameters.
    pub fn flat_from_value(value: Value) -> Result<Self, MultiplexError> {
        let collection: ParameterCollection = decode(value)?;
        Ok(Self::Flat(enabled_only(collection)))
    }

    /// Decode either merge shape, selecting global options when the
    /// `global-options` key is present.
    ///
    /// # Errors
    ///
    /// Returns [`MultiplexError::MalformedInput`] for a document of the wrong
    /// shape or [`MultiplexError::UnknownInclude`] when a set includes a global
    /// options block that does not exist.
    pub fn sets_from_value(value: Value) -> Result<Self, MultiplexError> {
        if value.get(GLOBAL_OPTIONS_KEY).is_some() {
            return resolve_includes(decode(value)?);
        }
        let CommonSets { common, sets } = decode(value)?;
        Ok(Self::Sets {
            common: enabled_only(common),
            groups: sets.into_iter().map(enabled_only).collect(),
        })
    }

    /// Expand the document into its assignment sets.
    ///
    /// # Errors
    ///
    /// Propagates expansion and merge failures.
    pub fn expand(&self) -> Result<Vec<AssignmentSet>, MultiplexError> {
        match self {
            Self::Flat(collection) => expand(collection),
            Self::Sets { common, groups } => merge_and_expand(common, groups),
        }
    }
}

fn resolve_includes(doc: GlobalOptionsSets) -> Result<Document, MultiplexError> {
    let GlobalOptionsSets {
        global_options,
        sets,
    } = doc;
    let groups = sets
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let set = ResolvedSet::decode(index, value)?;
            let mut included = ParameterCollection::new();
            for name in set.includes {
                let block = global_options
                    .iter()
                    .find(|block| block.name == name)
                    .ok_or(MultiplexError::UnknownInclude { index, name })?;
                included = merge_group(&included, &enabled_only(block.params.clone()));
            }
            Ok(merge_group(&included, &enabled_only(set.params)))
        })
        .collect::<Result<Vec<_>, MultiplexError>>()?;
    Ok(Document::Sets {
        common: Vec::new(),
        groups,
    })
}

/// Parse raw input text as JSON.
///
/// # Errors
///
/// Returns [`MultiplexError::MalformedInput`] locating the syntax error.
pub fn parse_json(text: &str) -> Result<Value, MultiplexError> {
    serde_json::from_str(text).map_err(|e| MultiplexError::MalformedInput {
        path: format!("line {} column {}", e.line(), e.column()),
        message: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, MultiplexError> {
    serde_path_to_error::deserialize(value).map_err(|e| {
        let path = e.path().to_string();
        MultiplexError::MalformedInput {
            path,
            message: e.into_inner().to_string(),
        }
    })
}

/// Decode a value nested at `at`, prefixing error paths with it.
fn decode_at<T: DeserializeOwned>(value: Value, at: &str) -> Result<T, MultiplexError> {
    decode(value).map_err(|e| match e {
        MultiplexError::MalformedInput { path, message } => {
            let path = match path.as_str() {
                "." => at.to_string(),
                nested if nested.starts_with('[') => format!("{at}{nested}"),
                nested => format!("{at}.{nested}"),
            };
            MultiplexError::MalformedInput { path, message }
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Parameter;
    use serde_json::json;

    #[test]
    fn flat_document_drops_disabled_parameters() {
        let doc = Document::flat_from_value(json!([
            { "arg": "rw", "values": ["read"] },
            { "arg": "bs", "vals": ["4k"], "enabled": "no" },
        ]))
        .expect("decode");
        assert_eq!(doc, Document::Flat(vec![Parameter::new("rw", ["read"])]));
    }

    #[test]
    fn malformed_field_reports_path() {
        let err = Document::flat_from_value(json!([
            { "arg": "rw", "values": ["read"] },
            { "arg": "bs", "values": [4] },
        ]))
        .expect_err("numeric value");
        match err {
            MultiplexError::MalformedInput { path, .. } => assert_eq!(path, "[1].values[0]"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_values_is_malformed() {
        let err = Document::flat_from_value(json!([{ "arg": "rw" }])).expect_err("no values");
        assert!(matches!(err, MultiplexError::MalformedInput { .. }));
    }

    #[test]
    fn common_defaults_to_empty() {
        let doc = Document::sets_from_value(json!({ "sets": [[{ "arg": "bs", "vals": ["4k"] }]] }))
            .expect("decode");
        assert_eq!(
            doc,
            Document::Sets {
                common: Vec::new(),
                groups: vec![vec![Parameter::new("bs", ["4k"])]],
            }
        );
    }

    #[test]
    fn sets_are_required() {
        let err = Document::sets_from_value(json!({ "common": [] })).expect_err("no sets");
        assert!(matches!(err, MultiplexError::MalformedInput { .. }));
    }

    #[test]
    fn global_options_are_included_by_name() {
        let doc = Document::sets_from_value(json!({
            "global-options": [
                { "name": "base", "params": [
                    { "arg": "runtime", "vals": ["60s"] },
                    { "arg": "debug", "vals": ["1"], "enabled": "no" },
                ] },
            ],
            "sets": [
                { "include": "base", "params": [{ "arg": "runtime", "vals": ["30s"] }] },
                { "params": [{ "arg": "bs", "vals": ["4k"] }] },
            ],
        }))
        .expect("decode");
        assert_eq!(
            doc,
            Document::Sets {
                common: Vec::new(),
                groups: vec![
                    vec![Parameter::new("runtime", ["30s"])],
                    vec![Parameter::new("bs", ["4k"])],
                ],
            }
        );
    }

    #[test]
    fn list_sets_mix_includes_and_parameters() {
        let doc = Document::sets_from_value(json!({
            "global-options": [
                { "name": "common-params", "params": [
                    { "arg": "bs", "vals": ["4k", "8k"], "role": "client" },
                    { "arg": "rw", "vals": ["read", "write"] },
                ] },
                { "name": "long", "params": [{ "arg": "runtime", "vals": ["600s"] }] },
            ],
            "sets": [
                [{ "include": "common-params" }, { "arg": "ioengine", "vals": ["sync"] }],
                [{ "include": "common-params" }, { "include": "long" }, { "arg": "rw", "vals": ["trim"] }],
            ],
        }))
        .expect("decode");
        let Document::Sets { groups, .. } = doc else {
            panic!("expected a sets document");
        };
        assert_eq!(
            groups,
            vec![
                vec![
                    Parameter::new("bs", ["4k", "8k"]).with_role("client"),
                    Parameter::new("rw", ["read", "write"]),
                    Parameter::new("ioengine", ["sync"]),
                ],
                vec![
                    Parameter::new("bs", ["4k", "8k"]).with_role("client"),
                    Parameter::new("rw", ["trim"]),
                    Parameter::new("runtime", ["600s"]),
                ],
            ]
        );
    }

    #[test]
    fn list_set_errors_carry_their_position() {
        let err = Document::sets_from_value(json!({
            "global-options": [],
            "sets": [[{ "arg": "bs", "vals": [4] }]],
        }))
        .expect_err("numeric value");
        match err {
            MultiplexError::MalformedInput { path, .. } => {
                assert_eq!(path, "sets[0][0].vals[0]");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_include_is_reported() {
        let err = Document::sets_from_value(json!({
            "global-options": [],
            "sets": [{ "include": "missing" }],
        }))
        .expect_err("unknown include");
        assert!(
            matches!(err, MultiplexError::UnknownInclude { index: 0, ref name } if name == "missing")
        );
    }

    #[test]
    fn syntax_errors_carry_location() {
        let err = parse_json("[{").expect_err("syntax error");
        assert!(err.to_string().starts_with("malformed input at line 1 column"));
    }
}
