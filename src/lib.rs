//! Expand multi-value parameter descriptions into every single-value
//! combination.
//!
//! [`expand`] computes the Cartesian product of one parameter collection;
//! [`merge_and_expand`] first overlays each set on a shared baseline. The
//! remaining modules decode input documents, validate their shape, render the
//! result and back the `multiplex` binary.
#![allow(
    clippy::result_large_err,
    reason = "configuration errors embed the full OrthoError"
)]

pub mod cli_args;
pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod expand;
pub mod merge;
pub mod model;
pub mod printer;
pub mod validate;

pub use cli_args::{Cli, Commands, ExpandArgs, MergeArgs};
pub use document::Document;
pub use error::{MultiplexError, Violation};
pub use expand::{MAX_COMBINATIONS, combination_count, expand};
pub use merge::{merge_and_expand, merge_group};
pub use model::{Assignment, AssignmentSet, Parameter, ParameterCollection};
pub use validate::{ShapeValidator, Validator};
