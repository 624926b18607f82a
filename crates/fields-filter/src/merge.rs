//! Combining two filters of the same polarity.
//!
//! Used whenever two paths share a prefix, e.g. `(a~b,a~c)` or `(a,a(b))`.
//! A terminal contributes nothing beyond "whole subtree", so the other
//! operand wins; two branches of the same kind take the union of their
//! children, merging shared keys recursively.

use crate::error::{FieldsFilterError, Result};
use crate::types::{Fields, FieldsFilter};

impl FieldsFilter {
    /// Merge `other` into `self`.
    ///
    /// Keys of `self` keep their position; keys only present in `other`
    /// are appended in their order.
    ///
    /// # Errors
    ///
    /// Returns [`FieldsFilterError::Construction`] if the two filters have
    /// opposite polarity.
    pub fn merge(self, other: FieldsFilter) -> Result<FieldsFilter> {
        if self.polarity() != other.polarity() {
            return Err(FieldsFilterError::Construction(format!(
                "cannot merge an {} filter with an {} filter",
                self.polarity(),
                other.polarity()
            )));
        }
        Ok(merge_same_polarity(self, other))
    }
}

/// Merge two nodes already known to share a polarity.
pub(crate) fn merge_same_polarity(left: FieldsFilter, right: FieldsFilter) -> FieldsFilter {
    match (left, right) {
        (FieldsFilter::IncludeFields(l), FieldsFilter::IncludeFields(r)) => {
            FieldsFilter::IncludeFields(union(l, r))
        }
        (FieldsFilter::ExcludeFields(l), FieldsFilter::ExcludeFields(r)) => {
            FieldsFilter::ExcludeFields(union(l, r))
        }
        (left, right) if left.is_terminal() => right,
        (left, _) => left,
    }
}

fn union(mut left: Fields, right: Fields) -> Fields {
    for (name, filter) in right.into_entries() {
        insert_merged(&mut left, name, filter);
    }
    left
}

/// Insert `filter` under `name`, merging with an existing entry of that name.
pub(crate) fn insert_merged(fields: &mut Fields, name: String, filter: FieldsFilter) {
    let entries = fields.entries_mut();
    match entries.iter().position(|(key, _)| *key == name) {
        Some(idx) => {
            tracing::trace!(field = %name, "merging duplicate field");
            let existing = std::mem::take(&mut entries[idx].1);
            entries[idx].1 = merge_same_polarity(existing, filter);
        }
        None => entries.push((name, filter)),
    }
}
