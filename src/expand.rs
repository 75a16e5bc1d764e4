//! Cartesian expansion of a parameter collection.
//!
//! The first declared parameter changes slowest across the output and the
//! last declared changes fastest. Inside each assignment set the assignments
//! appear in reverse declaration order, so the first declared parameter is the
//! last entry of every set. Callers wanting declaration order can reverse each
//! set; see [`crate::printer::FieldOrder`].

use crate::MultiplexError;
use crate::model::{AssignmentSet, Parameter};

/// Largest number of assignment sets one run may produce.
///
/// Applies to a single expansion and to the concatenated output of
/// [`crate::merge_and_expand`].
pub const MAX_COMBINATIONS: usize = 1 << 20;

/// Number of assignment sets [`expand`] would produce for `collection`.
///
/// # Errors
///
/// Returns [`MultiplexError::EmptyCollection`] for an empty collection,
/// [`MultiplexError::EmptyArg`] for a parameter without a name,
/// [`MultiplexError::EmptyValues`] naming the first parameter without values,
/// or [`MultiplexError::TooManyCombinations`] when the product exceeds
/// [`MAX_COMBINATIONS`].
pub fn combination_count(collection: &[Parameter]) -> Result<usize, MultiplexError> {
    if collection.is_empty() {
        return Err(MultiplexError::EmptyCollection);
    }
    collection.iter().try_fold(1_usize, |total, param| {
        if param.arg.is_empty() {
            return Err(MultiplexError::EmptyArg);
        }
        if param.values.is_empty() {
            return Err(MultiplexError::EmptyValues {
                arg: param.arg.clone(),
            });
        }
        total
            .checked_mul(param.values.len())
            .filter(|&count| count <= MAX_COMBINATIONS)
            .ok_or(MultiplexError::TooManyCombinations {
                limit: MAX_COMBINATIONS,
            })
    })
}

/// Expand `collection` into every combination of one value per parameter.
///
/// # Errors
///
/// Fails with the same errors as [`combination_count`]; an empty collection or
/// an empty value list never yields an empty result.
///
/// # Examples
///
/// ```
/// use multiplex::{Parameter, expand};
///
/// let sets = expand(&[
///     Parameter::new("rw", ["read", "randread"]),
///     Parameter::new("bs", ["4k", "8k"]),
/// ])
/// .expect("expand");
/// assert_eq!(sets.len(), 4);
/// assert_eq!(sets[0][0].arg, "bs");
/// assert_eq!(sets[0][1].arg, "rw");
/// ```
pub fn expand(collection: &[Parameter]) -> Result<Vec<AssignmentSet>, MultiplexError> {
    let total = combination_count(collection)?;
    log::debug!(
        "expanding {} parameters into {total} combinations",
        collection.len()
    );

    // Folding from the last parameter backwards makes each earlier parameter
    // the outer loop and appends its assignment after the later ones.
    let seed: Vec<AssignmentSet> = vec![Vec::with_capacity(collection.len())];
    let sets = collection.iter().rev().fold(seed, |partial, param| {
        let capacity = partial
            .len()
            .checked_mul(param.values.len())
            .unwrap_or_default();
        let mut next = Vec::with_capacity(capacity);
        for value in &param.values {
            for set in &partial {
                let mut extended = set.clone();
                extended.push(param.assign(value));
                next.push(extended);
            }
        }
        next
    });
    debug_assert_eq!(sets.len(), total);
    Ok(sets)
}
