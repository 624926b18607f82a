//! Filter tree value types.
//!
//! A [`FieldsFilter`] is an immutable tree with exactly four node kinds. The
//! two branch kinds carry a [`Fields`] list whose invariants (non-empty,
//! unique keys, single polarity, valid names) are enforced by the
//! constructors in [`crate::builder`], so every tree reachable through the
//! public API is well formed.

use std::fmt;

/// Whether a filter keeps only what it names, or drops what it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// `(a,b)` keeps only `a` and `b`.
    Include,
    /// `!(a,b)` keeps everything except `a` and `b`.
    Exclude,
}

static INCLUDED: FieldsFilter = FieldsFilter::Included;
static EXCLUDED: FieldsFilter = FieldsFilter::Excluded;

impl Polarity {
    /// The terminal node a named leaf field turns into.
    pub fn terminal(self) -> FieldsFilter {
        match self {
            Polarity::Include => FieldsFilter::Included,
            Polarity::Exclude => FieldsFilter::Excluded,
        }
    }

    /// The filter that applies to a field a branch of this polarity does not name.
    pub fn unnamed(self) -> &'static FieldsFilter {
        match self {
            Polarity::Include => &EXCLUDED,
            Polarity::Exclude => &INCLUDED,
        }
    }

    /// Wrap already-validated children in the branch node of this polarity.
    pub(crate) fn branch(self, fields: Fields) -> FieldsFilter {
        match self {
            Polarity::Include => FieldsFilter::IncludeFields(fields),
            Polarity::Exclude => FieldsFilter::ExcludeFields(fields),
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Polarity::Include => "include",
            Polarity::Exclude => "exclude",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node of the field selection tree.
///
/// The default is `Included`, which is what the empty spec parses to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldsFilter {
    /// Keep everything below this point.
    #[default]
    Included,
    /// Drop everything below this point.
    Excluded,
    /// Keep only the named children, each filtered by its own node.
    IncludeFields(Fields),
    /// Keep everything, except that the named children are filtered by their node.
    ExcludeFields(Fields),
}

impl FieldsFilter {
    /// The polarity family this node belongs to.
    pub fn polarity(&self) -> Polarity {
        match self {
            FieldsFilter::Included | FieldsFilter::IncludeFields(_) => Polarity::Include,
            FieldsFilter::Excluded | FieldsFilter::ExcludeFields(_) => Polarity::Exclude,
        }
    }

    /// `true` for `Included` and `Excluded`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, FieldsFilter::Included | FieldsFilter::Excluded)
    }

    /// Named children of a branch node, `None` for terminals.
    pub fn fields(&self) -> Option<&Fields> {
        match self {
            FieldsFilter::IncludeFields(fields) | FieldsFilter::ExcludeFields(fields) => {
                Some(fields)
            }
            FieldsFilter::Included | FieldsFilter::Excluded => None,
        }
    }
}

/// Named children of a branch node, in first-seen order.
///
/// Uses `Vec<(String, FieldsFilter)>` to keep insertion order without
/// depending on `IndexMap`; branch widths are small enough that linear
/// lookup wins anyway.
#[derive(Clone)]
pub struct Fields {
    entries: Vec<(String, FieldsFilter)>,
}

impl Fields {
    /// Empty list; only valid as an intermediate while a builder fills it.
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Look up the child filter for an exact field name.
    pub fn get(&self, name: &str) -> Option<&FieldsFilter> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, filter)| filter)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false` for a `Fields` obtained from a filter tree.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldsFilter)> {
        self.entries
            .iter()
            .map(|(key, filter)| (key.as_str(), filter))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub(crate) fn entries_mut(&mut self) -> &mut Vec<(String, FieldsFilter)> {
        &mut self.entries
    }

    pub(crate) fn into_entries(self) -> Vec<(String, FieldsFilter)> {
        self.entries
    }
}

impl fmt::Debug for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Order-insensitive: keys are unique, so equal length plus a matching
/// child for every key means the same set of fields.
impl PartialEq for Fields {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, filter)| other.get(name) == Some(filter))
    }
}

impl Eq for Fields {}

/// Characters allowed in a field name segment: `[A-Za-z0-9_-]`.
pub(crate) fn is_field_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}

/// Whether `name` is a non-empty run of field characters.
pub fn is_valid_field_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(is_field_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(entries: Vec<(&str, FieldsFilter)>) -> Fields {
        Fields {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    #[test]
    fn polarity_of_each_variant() {
        assert_eq!(FieldsFilter::Included.polarity(), Polarity::Include);
        assert_eq!(FieldsFilter::Excluded.polarity(), Polarity::Exclude);
        let inc = FieldsFilter::IncludeFields(fields(vec![("a", FieldsFilter::Included)]));
        let exc = FieldsFilter::ExcludeFields(fields(vec![("a", FieldsFilter::Excluded)]));
        assert_eq!(inc.polarity(), Polarity::Include);
        assert_eq!(exc.polarity(), Polarity::Exclude);
    }

    #[test]
    fn unnamed_field_defaults_are_opposite_terminals() {
        assert_eq!(Polarity::Include.unnamed(), &FieldsFilter::Excluded);
        assert_eq!(Polarity::Exclude.unnamed(), &FieldsFilter::Included);
    }

    #[test]
    fn fields_equality_ignores_order() {
        let a = fields(vec![("x", FieldsFilter::Included), ("y", FieldsFilter::Included)]);
        let b = fields(vec![("y", FieldsFilter::Included), ("x", FieldsFilter::Included)]);
        assert_eq!(a, b);
    }

    #[test]
    fn fields_debug_keeps_insertion_order() {
        let a = fields(vec![("y", FieldsFilter::Included), ("x", FieldsFilter::Included)]);
        assert_eq!(format!("{a:?}"), r#"{"y": Included, "x": Included}"#);
    }

    #[test]
    fn field_name_character_class() {
        assert!(is_valid_field_name("host_name-2"));
        assert!(!is_valid_field_name(""));
        assert!(!is_valid_field_name("a.b"));
        assert!(!is_valid_field_name("a b"));
        assert!(!is_valid_field_name("näme"));
    }
}
