//! Command execution helpers for `multiplex`.
//!
//! Each subcommand reads one document, optionally validates it, expands it
//! and writes the result to standard output.

use std::io::{ErrorKind, Read};
use std::path::Path;

use log::{debug, info};
use serde_json::Value;

use crate::MultiplexError;
use crate::cli_args::{ExpandArgs, MergeArgs, RunOptions};
use crate::document::{Document, parse_json};
use crate::model::AssignmentSet;
use crate::printer::write_result;
use crate::validate::{ShapeValidator, Validator};

type Decoder = fn(Value) -> Result<Document, MultiplexError>;

/// Read the whole input document from `path`, or standard input for `None`.
///
/// # Errors
///
/// Returns [`MultiplexError::Io`] when the source cannot be read.
pub fn read_input(path: Option<&Path>) -> Result<String, MultiplexError> {
    if let Some(path) = path {
        debug!("reading parameters from {}", path.display());
        return Ok(std::fs::read_to_string(path)?);
    }
    debug!("reading parameters from standard input");
    let mut text = String::new();
    std::io::stdin().lock().read_to_string(&mut text)?;
    Ok(text)
}

/// Parse, optionally validate, decode and expand one document.
///
/// # Errors
///
/// Returns the first failure of any stage; validation failures carry every
/// violation found.
pub fn expand_text(
    text: &str,
    validator: Option<&dyn Validator>,
    decode: Decoder,
) -> Result<Vec<AssignmentSet>, MultiplexError> {
    let value = parse_json(text)?;
    if let Some(validator) = validator {
        let violations = validator.validate(&value);
        if !violations.is_empty() {
            return Err(MultiplexError::Validation(violations));
        }
        debug!("document passed validation");
    }
    let document = decode(value)?;
    let sets = document.expand()?;
    info!("expanded {} configurations", sets.len());
    Ok(sets)
}

fn run(
    options: &RunOptions,
    validator: ShapeValidator,
    decode: Decoder,
) -> Result<(), MultiplexError> {
    let text = read_input(options.input.as_deref())?;
    let validator = options.validate.then_some(&validator as &dyn Validator);
    let sets = expand_text(&text, validator, decode)?;
    match write_result(std::io::stdout().lock(), &sets, options.output) {
        Err(MultiplexError::Io(e)) if e.kind() == ErrorKind::BrokenPipe => {
            debug!("standard output closed before all configurations were written");
            Ok(())
        }
        other => other,
    }
}

/// Run the `expand` subcommand.
///
/// # Errors
///
/// Propagates input, validation, expansion and output failures.
pub fn run_expand(args: &ExpandArgs) -> Result<(), MultiplexError> {
    run(
        &RunOptions::from(args),
        ShapeValidator::flat(),
        Document::flat_from_value,
    )
}

/// Run the `merge` subcommand.
///
/// # Errors
///
/// Propagates input, validation, merge, expansion and output failures.
pub fn run_merge(args: &MergeArgs) -> Result<(), MultiplexError> {
    run(
        &RunOptions::from(args),
        ShapeValidator::sets(),
        Document::sets_from_value,
    )
}
