//! Building filter trees, from a parse tree or programmatically.
//!
//! Both paths go through the same checks, so a tree built with
//! [`make_filter`] obeys exactly the invariants a parsed one does.

use crate::error::{FieldsFilterError, Result};
use crate::merge::insert_merged;
use crate::parser::{FieldSpec, ParsedSpec};
use crate::types::{is_valid_field_name, Fields, FieldsFilter, Polarity};

/// Turn a parse tree into a filter.
pub fn build(parsed: &ParsedSpec) -> Result<FieldsFilter> {
    build_fields(parsed.polarity, &parsed.fields)
}

/// Build the branch node for one group of field specs.
///
/// Paths sharing a first segment are merged, so `(a~b,a~c)` and `(a(b,c))`
/// produce the same tree.
///
/// # Errors
///
/// Returns [`FieldsFilterError::Construction`] if `specs` (or any nested
/// group) is empty, or a path segment is not a valid field name.
pub fn build_fields(polarity: Polarity, specs: &[FieldSpec]) -> Result<FieldsFilter> {
    if specs.is_empty() {
        return Err(FieldsFilterError::Construction(format!(
            "an {polarity} filter needs at least one field"
        )));
    }

    let mut fields = Fields::new();
    for spec in specs {
        let (head, rest) = spec.path.split_first().ok_or_else(|| {
            FieldsFilterError::Construction("field path must not be empty".to_string())
        })?;
        validate_name(head)?;
        let child = build_path(polarity, rest, spec.fields.as_deref())?;
        insert_merged(&mut fields, head.clone(), child);
    }
    Ok(polarity.branch(fields))
}

/// Filter for whatever sits below the first segment of a path.
///
/// `rest = ["b", "c"]` wraps the leaf in single-child branches from the
/// inside out, giving `b(c)`.
fn build_path(
    polarity: Polarity,
    rest: &[String],
    nested: Option<&[FieldSpec]>,
) -> Result<FieldsFilter> {
    let mut node = match nested {
        Some(specs) => build_fields(polarity, specs)?,
        None => polarity.terminal(),
    };
    for name in rest.iter().rev() {
        validate_name(name)?;
        let mut fields = Fields::new();
        insert_merged(&mut fields, name.clone(), node);
        node = polarity.branch(fields);
    }
    Ok(node)
}

fn validate_name(name: &str) -> Result<()> {
    if is_valid_field_name(name) {
        Ok(())
    } else {
        Err(FieldsFilterError::Construction(format!(
            "invalid field name {name:?}: only letters, digits, '_' and '-' are allowed"
        )))
    }
}

/// Build a filter from exactly one of an include or exclude mapping.
///
/// Children are the nested filters for each field: use
/// `FieldsFilter::Included` / `FieldsFilter::Excluded` for a whole field,
/// or another `make_filter` result of the same polarity to descend.
///
/// # Errors
///
/// Returns [`FieldsFilterError::Construction`] if both or neither mapping
/// is given, a mapping is empty, a field name is invalid, or a child has
/// the opposite polarity.
///
/// # Examples
///
/// ```
/// use fields_filter::{make_filter, parse_fields_filter, FieldsFilter};
///
/// let nested = make_filter(Some(vec![("b".into(), FieldsFilter::Included)]), None).unwrap();
/// let filter = make_filter(Some(vec![("a".into(), nested)]), None).unwrap();
/// assert_eq!(filter, parse_fields_filter("(a(b))").unwrap());
/// ```
pub fn make_filter(
    include: Option<Vec<(String, FieldsFilter)>>,
    exclude: Option<Vec<(String, FieldsFilter)>>,
) -> Result<FieldsFilter> {
    match (include, exclude) {
        (Some(children), None) => from_children(Polarity::Include, children),
        (None, Some(children)) => from_children(Polarity::Exclude, children),
        (Some(_), Some(_)) => Err(FieldsFilterError::Construction(
            "specify either include or exclude, not both".to_string(),
        )),
        (None, None) => Err(FieldsFilterError::Construction(
            "specify one of include or exclude".to_string(),
        )),
    }
}

impl FieldsFilter {
    /// `IncludeFields` node over the given children. See [`make_filter`].
    pub fn include<K, I>(children: I) -> Result<FieldsFilter>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, FieldsFilter)>,
    {
        from_children(Polarity::Include, collect(children))
    }

    /// `ExcludeFields` node over the given children. See [`make_filter`].
    pub fn exclude<K, I>(children: I) -> Result<FieldsFilter>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, FieldsFilter)>,
    {
        from_children(Polarity::Exclude, collect(children))
    }
}

fn collect<K, I>(children: I) -> Vec<(String, FieldsFilter)>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, FieldsFilter)>,
{
    children
        .into_iter()
        .map(|(name, filter)| (name.into(), filter))
        .collect()
}

fn from_children(
    polarity: Polarity,
    children: Vec<(String, FieldsFilter)>,
) -> Result<FieldsFilter> {
    if children.is_empty() {
        return Err(FieldsFilterError::Construction(format!(
            "{polarity} mapping must not be empty"
        )));
    }

    let mut fields = Fields::new();
    for (name, child) in children {
        validate_name(&name)?;
        if child.polarity() != polarity {
            return Err(FieldsFilterError::Construction(format!(
                "field {name:?} has an {} filter inside an {polarity} filter",
                child.polarity()
            )));
        }
        insert_merged(&mut fields, name, child);
    }
    Ok(polarity.branch(fields))
}
