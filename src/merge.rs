//! Combine common parameters with each set and expand the results.

use crate::MultiplexError;
use crate::expand::{MAX_COMBINATIONS, combination_count, expand};
use crate::model::{AssignmentSet, Parameter, ParameterCollection};

/// Overlay `group` on `common`, keeping one entry per parameter name.
///
/// Names keep the position where they were first seen: the common order comes
/// first, followed by names introduced by the group. A later entry for a name
/// replaces the earlier value list in place.
#[must_use]
pub fn merge_group(common: &[Parameter], group: &[Parameter]) -> ParameterCollection {
    let mut merged: ParameterCollection = Vec::with_capacity(common.len() + group.len());
    for param in common.iter().chain(group) {
        match merged.iter_mut().find(|existing| existing.arg == param.arg) {
            Some(existing) => {
                existing.values.clone_from(&param.values);
                existing.role.clone_from(&param.role);
            }
            None => merged.push(param.clone()),
        }
    }
    merged
}

/// Merge `common` into every group and concatenate the expansions in group
/// order.
///
/// # Errors
///
/// Returns [`MultiplexError::EmptyGroup`] when a group and `common` are both
/// empty, or [`MultiplexError::Group`] wrapping the expansion error of the
/// first failing group. A group that takes the total past
/// [`MAX_COMBINATIONS`] fails with a wrapped
/// [`MultiplexError::TooManyCombinations`] before any set is expanded.
///
/// # Examples
///
/// ```
/// use multiplex::{Parameter, merge_and_expand};
///
/// let common = [Parameter::new("runtime", ["60s"])];
/// let groups = [vec![
///     Parameter::new("runtime", ["30s"]),
///     Parameter::new("bs", ["4k"]),
/// ]];
/// let sets = merge_and_expand(&common, &groups).expect("merge");
/// assert!(sets[0].iter().any(|a| a.arg == "runtime" && a.value == "30s"));
/// ```
pub fn merge_and_expand<G>(
    common: &[Parameter],
    groups: &[G],
) -> Result<Vec<AssignmentSet>, MultiplexError>
where
    G: AsRef<[Parameter]>,
{
    log::debug!("merging {} common parameters into {} sets", common.len(), groups.len());
    let mut merged_groups = Vec::with_capacity(groups.len());
    let mut total = 0_usize;
    for (index, group) in groups.iter().enumerate() {
        let merged = merge_group(common, group.as_ref());
        if merged.is_empty() {
            return Err(MultiplexError::EmptyGroup { index });
        }
        let count = combination_count(&merged).map_err(|e| e.in_group(index))?;
        total = total
            .checked_add(count)
            .filter(|&sum| sum <= MAX_COMBINATIONS)
            .ok_or_else(|| {
                MultiplexError::TooManyCombinations {
                    limit: MAX_COMBINATIONS,
                }
                .in_group(index)
            })?;
        merged_groups.push(merged);
    }

    let mut sets = Vec::with_capacity(total);
    for (index, merged) in merged_groups.iter().enumerate() {
        let expanded = expand(merged).map_err(|e| e.in_group(index))?;
        log::debug!("set {index} expanded into {} combinations", expanded.len());
        sets.extend(expanded);
    }
    Ok(sets)
}
