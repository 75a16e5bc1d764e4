//! Rendering of expanded assignment sets as JSON.

use std::io::Write;

use clap::ValueEnum;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::ser::PrettyFormatter;

use crate::MultiplexError;
use crate::model::{Assignment, AssignmentSet};

/// Whitespace layout of the emitted JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented with four spaces.
    #[default]
    Pretty,
    /// A single line.
    Compact,
}

/// Key naming the chosen value in each assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStyle {
    /// `{"arg": .., "value": ..}`
    #[default]
    Standard,
    /// `{"arg": .., "val": ..}`, as read by older consumers.
    Legacy,
}

impl KeyStyle {
    const fn value_key(self) -> &'static str {
        match self {
            Self::Standard => "value",
            Self::Legacy => "val",
        }
    }
}

/// Order of assignments within each emitted set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldOrder {
    /// Last declared parameter first, as produced by the expander.
    #[default]
    Reversed,
    /// Declaration order.
    Declared,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub keys: KeyStyle,
    pub order: FieldOrder,
}

struct Entry<'a> {
    assignment: &'a Assignment,
    key: &'static str,
}

impl Serialize for Entry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let role = self.assignment.role.as_ref();
        let mut map = serializer.serialize_map(Some(2 + usize::from(role.is_some())))?;
        map.serialize_entry("arg", &self.assignment.arg)?;
        map.serialize_entry(self.key, &self.assignment.value)?;
        if let Some(role) = role {
            map.serialize_entry("role", role)?;
        }
        map.end()
    }
}

struct Set<'a> {
    set: &'a AssignmentSet,
    options: OutputOptions,
}

impl Serialize for Set<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let key = self.options.keys.value_key();
        let mut seq = serializer.serialize_seq(Some(self.set.len()))?;
        match self.options.order {
            FieldOrder::Reversed => {
                for assignment in self.set {
                    seq.serialize_element(&Entry { assignment, key })?;
                }
            }
            FieldOrder::Declared => {
                for assignment in self.set.iter().rev() {
                    seq.serialize_element(&Entry { assignment, key })?;
                }
            }
        }
        seq.end()
    }
}

struct Sets<'a> {
    sets: &'a [AssignmentSet],
    options: OutputOptions,
}

impl Serialize for Sets<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.sets.iter().map(|set| Set {
            set,
            options: self.options,
        }))
    }
}

/// Serialise `sets` to a newline-terminated JSON document.
///
/// # Errors
///
/// Returns [`MultiplexError::Serialize`] if serialisation fails.
pub fn render(sets: &[AssignmentSet], options: OutputOptions) -> Result<String, MultiplexError> {
    let doc = Sets { sets, options };
    let mut buf = Vec::new();
    match options.format {
        OutputFormat::Pretty => {
            let formatter = PrettyFormatter::with_indent(b"    ");
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            doc.serialize(&mut ser).map_err(MultiplexError::Serialize)?;
        }
        OutputFormat::Compact => {
            serde_json::to_writer(&mut buf, &doc).map_err(MultiplexError::Serialize)?;
        }
    }
    buf.push(b'\n');
    // serde_json only emits UTF-8.
    String::from_utf8(buf).map_err(|e| {
        MultiplexError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

/// Render `sets` and write them to `out`.
///
/// # Errors
///
/// Returns serialisation failures or the I/O error raised by `out`.
pub fn write_result<W: Write>(
    mut out: W,
    sets: &[AssignmentSet],
    options: OutputOptions,
) -> Result<(), MultiplexError> {
    let text = render(sets, options)?;
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn sample() -> Vec<AssignmentSet> {
        vec![
            vec![Assignment::new("bs", "4k"), Assignment::new("rw", "read")],
            vec![Assignment::new("bs", "8k"), Assignment::new("rw", "read")],
        ]
    }

    #[test]
    fn compact_standard_reversed() {
        let options = OutputOptions {
            format: OutputFormat::Compact,
            ..OutputOptions::default()
        };
        let out = render(&sample(), options).expect("render");
        assert_snapshot!(
            out.trim_end(),
            @r#"[[{"arg":"bs","value":"4k"},{"arg":"rw","value":"read"}],[{"arg":"bs","value":"8k"},{"arg":"rw","value":"read"}]]"#
        );
    }

    #[test]
    fn legacy_keys_in_declared_order() {
        let options = OutputOptions {
            format: OutputFormat::Compact,
            keys: KeyStyle::Legacy,
            order: FieldOrder::Declared,
        };
        let out = render(&sample(), options).expect("render");
        assert_eq!(
            out,
            "[[{\"arg\":\"rw\",\"val\":\"read\"},{\"arg\":\"bs\",\"val\":\"4k\"}],\
             [{\"arg\":\"rw\",\"val\":\"read\"},{\"arg\":\"bs\",\"val\":\"8k\"}]]\n"
        );
    }

    #[test]
    fn pretty_uses_four_space_indent() {
        let sets = vec![vec![Assignment::new("rw", "read")]];
        let out = render(&sets, OutputOptions::default()).expect("render");
        assert_eq!(
            out,
            "[\n    [\n        {\n            \"arg\": \"rw\",\n            \"value\": \"read\"\n        }\n    ]\n]\n"
        );
    }

    #[test]
    fn role_follows_the_value_when_present() {
        let sets = vec![vec![
            Assignment {
                role: Some("client".into()),
                ..Assignment::new("bs", "4k")
            },
            Assignment::new("rw", "read"),
        ]];
        let options = OutputOptions {
            format: OutputFormat::Compact,
            keys: KeyStyle::Legacy,
            ..OutputOptions::default()
        };
        let out = render(&sets, options).expect("render");
        assert_snapshot!(
            out.trim_end(),
            @r#"[[{"arg":"bs","val":"4k","role":"client"},{"arg":"rw","val":"read"}]]"#
        );
    }

    #[test]
    fn empty_result_is_an_empty_array() {
        let out = render(&[], OutputOptions::default()).expect("render");
        assert_eq!(out, "[]\n");
    }

    #[test]
    fn write_result_writes_rendered_text() {
        let mut buf = Vec::new();
        write_result(&mut buf, &sample(), OutputOptions::default()).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(text, render(&sample(), OutputOptions::default()).expect("render"));
    }
}
