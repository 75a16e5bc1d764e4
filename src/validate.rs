//! Structural validation of input documents.
//!
//! Validation runs on the raw JSON value before decoding and collects every
//! problem it finds, so a user can fix the whole document at once. Other
//! schema engines can be plugged in by implementing [`Validator`].

use serde_json::{Map, Value};

use crate::document::GLOBAL_OPTIONS_KEY;
use crate::error::Violation;

const PARAMETER_KEYS: &[&str] = &["arg", "values", "vals", "enabled", "role"];

/// Optional parameter keys whose value must be a string.
const STRING_KEYS: &[&str] = &["enabled", "role"];

/// Checks a document and reports every violation found.
pub trait Validator {
    fn validate(&self, document: &Value) -> Vec<Violation>;
}

/// Which document shape a [`ShapeValidator`] expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Flat,
    Sets,
}

/// Built-in validator for the accepted document shapes.
#[derive(Debug, Clone, Copy)]
pub struct ShapeValidator {
    shape: Shape,
}

impl ShapeValidator {
    /// Validator for a flat list of parameters.
    #[must_use]
    pub const fn flat() -> Self {
        Self { shape: Shape::Flat }
    }

    /// Validator for the common+sets and global-options shapes.
    #[must_use]
    pub const fn sets() -> Self {
        Self { shape: Shape::Sets }
    }
}

impl Validator for ShapeValidator {
    fn validate(&self, document: &Value) -> Vec<Violation> {
        let mut found = Violations::default();
        match self.shape {
            Shape::Flat => found.collection("", document),
            Shape::Sets => found.sets_document(document),
        }
        found.0
    }
}

#[derive(Default)]
struct Violations(Vec<Violation>);

impl Violations {
    fn push(&mut self, path: &str, message: impl Into<String>) {
        self.0.push(Violation::new(path, message));
    }

    fn object<'a>(&mut self, path: &str, value: &'a Value) -> Option<&'a Map<String, Value>> {
        let map = value.as_object();
        if map.is_none() {
            self.push(path, format!("expected an object, found {}", kind(value)));
        }
        map
    }

    fn array<'a>(&mut self, path: &str, value: &'a Value) -> Option<&'a Vec<Value>> {
        let items = value.as_array();
        if items.is_none() {
            self.push(path, format!("expected an array, found {}", kind(value)));
        }
        items
    }

    fn collection(&mut self, path: &str, value: &Value) {
        let Some(items) = self.array(path, value) else {
            return;
        };
        for (i, item) in items.iter().enumerate() {
            self.parameter(&format!("{path}/{i}"), item);
        }
    }

    fn parameter(&mut self, path: &str, value: &Value) {
        let Some(map) = self.object(path, value) else {
            return;
        };
        match map.get("arg") {
            None => self.push(path, "missing required key 'arg'"),
            Some(Value::String(arg)) if arg.is_empty() => {
                self.push(&format!("{path}/arg"), "must not be empty");
            }
            Some(Value::String(_)) => {}
            Some(other) => self.push(
                &format!("{path}/arg"),
                format!("expected a string, found {}", kind(other)),
            ),
        }
        match (map.get("values"), map.get("vals")) {
            (None, None) => self.push(path, "missing required key 'values'"),
            (Some(_), Some(_)) => self.push(path, "'values' and 'vals' are mutually exclusive"),
            (Some(values), None) => self.values(&format!("{path}/values"), values),
            (None, Some(values)) => self.values(&format!("{path}/vals"), values),
        }
        for key in STRING_KEYS {
            if let Some(value) = map.get(*key).filter(|v| !v.is_string()) {
                self.push(
                    &format!("{path}/{key}"),
                    format!("expected a string, found {}", kind(value)),
                );
            }
        }
        for key in map.keys() {
            if !PARAMETER_KEYS.contains(&key.as_str()) {
                self.push(path, format!("unknown key '{key}'"));
            }
        }
    }

    fn values(&mut self, path: &str, value: &Value) {
        let Some(items) = self.array(path, value) else {
            return;
        };
        if items.is_empty() {
            self.push(path, "must contain at least one value");
        }
        for (i, item) in items.iter().enumerate() {
            if !item.is_string() {
                self.push(
                    &format!("{path}/{i}"),
                    format!("expected a string, found {}", kind(item)),
                );
            }
        }
    }

    fn sets_document(&mut self, value: &Value) {
        let Some(map) = self.object("", value) else {
            return;
        };
        if map.contains_key(GLOBAL_OPTIONS_KEY) {
            self.global_options_document(map);
            return;
        }
        if let Some(common) = map.get("common") {
            self.collection("/common", common);
        }
        match map.get("sets") {
            None => self.push("", "missing required key 'sets'"),
            Some(sets) => {
                if let Some(groups) = self.array("/sets", sets) {
                    for (i, group) in groups.iter().enumerate() {
                        self.collection(&format!("/sets/{i}"), group);
                    }
                }
            }
        }
        self.unknown_keys("", map, &["common", "sets"]);
    }

    fn global_options_document(&mut self, map: &Map<String, Value>) {
        let mut names = Vec::new();
        if let Some(blocks) = map
            .get(GLOBAL_OPTIONS_KEY)
            .and_then(|v| self.array("/global-options", v))
        {
            for (i, block) in blocks.iter().enumerate() {
                let path = format!("/global-options/{i}");
                let Some(block) = self.object(&path, block) else {
                    continue;
                };
                match block.get("name").and_then(Value::as_str) {
                    Some(name) => names.push(name),
                    None => self.push(&path, "missing string key 'name'"),
                }
                if let Some(params) = block.get("params") {
                    self.collection(&format!("{path}/params"), params);
                }
                self.unknown_keys(&path, block, &["name", "params"]);
            }
        }
        let Some(sets) = map.get("sets") else {
            self.push("", "missing required key 'sets'");
            return;
        };
        let Some(sets) = self.array("/sets", sets) else {
            return;
        };
        for (i, set) in sets.iter().enumerate() {
            let path = format!("/sets/{i}");
            if let Some(entries) = set.as_array() {
                self.include_list(&path, entries, &names);
                continue;
            }
            let Some(set) = self.object(&path, set) else {
                continue;
            };
            if let Some(include) = set.get("include") {
                self.include(&format!("{path}/include"), include, &names);
            }
            if let Some(params) = set.get("params") {
                self.collection(&format!("{path}/params"), params);
            }
            self.unknown_keys(&path, set, &["include", "params"]);
        }
        self.unknown_keys("", map, &[GLOBAL_OPTIONS_KEY, "sets"]);
    }

    /// A set spelled as a list of `{"include": name}` entries and parameters.
    fn include_list(&mut self, path: &str, entries: &[Value], names: &[&str]) {
        for (i, entry) in entries.iter().enumerate() {
            let path = format!("{path}/{i}");
            match entry
                .as_object()
                .and_then(|map| Some((map, map.get("include")?)))
            {
                Some((map, include)) => {
                    self.include(&format!("{path}/include"), include, names);
                    self.unknown_keys(&path, map, &["include"]);
                }
                None => self.parameter(&path, entry),
            }
        }
    }

    fn include(&mut self, path: &str, value: &Value, names: &[&str]) {
        match value {
            Value::String(name) if names.contains(&name.as_str()) => {}
            Value::String(name) => self.push(path, format!("no global options named '{name}'")),
            other => self.push(path, format!("expected a string, found {}", kind(other))),
        }
    }

    fn unknown_keys(&mut self, path: &str, map: &Map<String, Value>, allowed: &[&str]) {
        for key in map.keys() {
            if !allowed.contains(&key.as_str()) {
                self.push(path, format!("unknown key '{key}'"));
            }
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
