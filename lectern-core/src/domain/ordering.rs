//! Sibling ordering rules for the content tree.
//!
//! Non-deleted siblings of one parent carry a zero-based `index`, dense
//! except across soft deletes. Creation always appends past the highest
//! active index; a bulk reorder must cover exactly the current active
//! sibling set and is applied all-or-nothing by the repository layer.

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

use crate::error::{CoreError, Result};

/// Validate a client-submitted ordering against the current active children.
///
/// Rejects duplicates, foreign ids, and missing ids; the caller only applies
/// the new indices when this returns `Ok`. Partial application is never
/// acceptable, so the check runs before any write.
pub fn validate_reorder<T>(current: &[T], submitted: &[T]) -> Result<()>
where
    T: Eq + Hash + Copy + Display,
{
    if submitted.is_empty() {
        return Err(CoreError::Validation("ordering must not be empty".into()));
    }

    let mut seen = HashSet::with_capacity(submitted.len());
    for id in submitted {
        if !seen.insert(*id) {
            return Err(CoreError::Validation(format!(
                "duplicate id in ordering: {id}"
            )));
        }
    }

    let current_set: HashSet<T> = current.iter().copied().collect();
    if submitted.len() != current_set.len() {
        return Err(CoreError::Validation(format!(
            "ordering covers {} items but parent has {} active children",
            submitted.len(),
            current_set.len()
        )));
    }
    for id in submitted {
        if !current_set.contains(id) {
            return Err(CoreError::Validation(format!(
                "id does not belong to this parent: {id}"
            )));
        }
    }

    Ok(())
}
