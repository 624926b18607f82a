//! Parsing entry points and the runtime operations of a filter tree.
//!
//! # Spec syntax
//!
//! - `"(a,b)"` -- keep only `a` and `b`
//! - `"(a(b,c))"` -- keep `a`, and inside it only `b` and `c`
//! - `"(a~b~c)"` -- shorthand for `"(a(b(c)))"`
//! - `"!(a,b(c))"` -- keep everything except `a` and `b.c`
//! - `""` -- keep everything
//!
//! Arrays are transparent: a filter applied to an array is applied to each
//! element, so `"(items(name))"` trims every object inside `items`.

use std::str::FromStr;

use serde::de::{self, Deserialize, Deserializer};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::builder;
use crate::error::Result;
use crate::parser::{self, ParseOptions};
use crate::types::{FieldsFilter, Polarity};

/// Separator for the dotted paths accepted by [`FieldsFilter::is_included`]
/// and [`FieldsFilter::get_nested_fields`].
pub const PATH_SEPARATOR: char = '.';

/// Parse a `fields` spec with default options.
///
/// The empty string means "keep everything" and yields
/// [`FieldsFilter::Included`] without touching the grammar.
///
/// No depth limit is applied. For specs from untrusted clients use
/// [`parse_fields_filter_with`] and a bound such as
/// [`DEFAULT_MAX_DEPTH`](crate::parser::DEFAULT_MAX_DEPTH).
///
/// # Errors
///
/// Returns [`crate::FieldsFilterError::InvalidFormat`] if the spec does not parse.
///
/// # Examples
///
/// ```
/// use fields_filter::parse_fields_filter;
/// use serde_json::json;
///
/// let filter = parse_fields_filter("(name,address(city))").unwrap();
/// let data = json!({"name": "srv01", "address": {"city": "Munich", "zip": "80331"}, "ip": "10.0.0.1"});
/// assert_eq!(filter.apply(&data), json!({"name": "srv01", "address": {"city": "Munich"}}));
/// ```
pub fn parse_fields_filter(spec: &str) -> Result<FieldsFilter> {
    parse_fields_filter_with(spec, &ParseOptions::default())
}

/// Parse a `fields` spec with explicit [`ParseOptions`].
pub fn parse_fields_filter_with(spec: &str, options: &ParseOptions) -> Result<FieldsFilter> {
    if spec.is_empty() {
        return Ok(FieldsFilter::Included);
    }
    let parsed = parser::parse(spec, options)?;
    let filter = builder::build(&parsed)?;
    tracing::debug!(spec, polarity = %parsed.polarity, "parsed fields filter");
    Ok(filter)
}

/// Parse `spec`, apply it to the JSON document `json`, and return compact JSON.
///
/// # Errors
///
/// Returns an error if the spec does not parse or `json` is not valid JSON.
pub fn filter_json(spec: &str, json: &str) -> Result<String> {
    let filter = parse_fields_filter(spec)?;
    let value: Value = serde_json::from_str(json)?;
    Ok(serde_json::to_string(&filter.apply_owned(value))?)
}

impl FieldsFilter {
    /// Whether anything at `path` survives this filter.
    ///
    /// With `None`, asks about this node itself: terminals answer for their
    /// whole subtree, branches always count as (partially) included.
    ///
    /// ```
    /// use fields_filter::parse_fields_filter;
    ///
    /// let filter = parse_fields_filter("(host(name),site)").unwrap();
    /// assert!(filter.is_included(Some("host")));
    /// assert!(filter.is_included(Some("host.name")));
    /// assert!(!filter.is_included(Some("host.ip")));
    /// assert!(!filter.is_included(Some("folder")));
    /// ```
    ///
    /// An empty path asks about this node, the same as `None`.
    pub fn is_included(&self, path: Option<&str>) -> bool {
        match path {
            Some(path) if !path.is_empty() => self.get_nested_fields(path).is_included(None),
            _ => !matches!(self, FieldsFilter::Excluded),
        }
    }

    /// The filter that governs the value at a dotted `path`.
    ///
    /// Terminals govern everything below them and return themselves. A
    /// branch that does not name the next segment falls back to its
    /// polarity default: `Excluded` for include filters, `Included` for
    /// exclude filters.
    pub fn get_nested_fields(&self, path: &str) -> &FieldsFilter {
        let (head, rest) = match path.split_once(PATH_SEPARATOR) {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let child = self.field(head);
        match rest {
            Some(rest) => child.get_nested_fields(rest),
            None => child,
        }
    }

    /// The filter for a single path segment.
    fn field(&self, name: &str) -> &FieldsFilter {
        match self.fields() {
            Some(fields) => fields
                .get(name)
                .unwrap_or_else(|| self.polarity().unnamed()),
            None => self,
        }
    }

    /// Return a filtered copy of `data`.
    ///
    /// Objects lose the keys this filter drops, arrays are filtered
    /// element by element (keeping their length), and scalars pass through.
    /// An `Excluded` node empties objects rather than removing them; the
    /// parent branch is what removes an excluded key.
    ///
    /// Each object key is resolved with [`get_nested_fields`](Self::get_nested_fields),
    /// so a key such as `"a.b"` is treated like the path `a.b`.
    pub fn apply(&self, data: &Value) -> Value {
        match (self, data) {
            (FieldsFilter::Included, data) => data.clone(),
            (_, Value::Array(items)) => Value::Array(items.iter().map(|v| self.apply(v)).collect()),
            (FieldsFilter::Excluded, Value::Object(_)) => Value::Object(Map::new()),
            (_, Value::Object(map)) => {
                let mut result = Map::new();
                for (key, value) in map {
                    let child = self.get_nested_fields(key);
                    if child.is_included(None) {
                        result.insert(key.clone(), child.apply(value));
                    }
                }
                Value::Object(result)
            }
            // Scalars reached directly (not through a parent key) pass through.
            (_, scalar) => scalar.clone(),
        }
    }

    /// Like [`apply`](Self::apply), but consumes `data` so kept subtrees
    /// are moved instead of cloned.
    pub fn apply_owned(&self, data: Value) -> Value {
        match (self, data) {
            (FieldsFilter::Included, data) => data,
            (_, Value::Array(items)) => Value::Array(
                items
                    .into_iter()
                    .map(|v| self.apply_owned(v))
                    .collect(),
            ),
            (FieldsFilter::Excluded, Value::Object(_)) => Value::Object(Map::new()),
            (_, Value::Object(map)) => Value::Object(
                map.into_iter()
                    .filter_map(|(key, value)| {
                        let child = self.get_nested_fields(&key);
                        child
                            .is_included(None)
                            .then(|| (key, child.apply_owned(value)))
                    })
                    .collect(),
            ),
            (_, scalar) => scalar,
        }
    }

    /// Serialize `value` to JSON and filter the result.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FieldsFilterError::JsonParse`] if serialization fails.
    pub fn apply_to<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value> {
        Ok(self.apply_owned(serde_json::to_value(value)?))
    }

    /// Canonical spec text for this filter.
    ///
    /// `Included` renders as the empty spec. A bare `Excluded` has no
    /// spelling in the grammar and yields `None`.
    ///
    /// ```
    /// use fields_filter::parse_fields_filter;
    ///
    /// let filter = parse_fields_filter("!(a~b,a~c,d)").unwrap();
    /// assert_eq!(filter.to_spec().as_deref(), Some("!(a(b,c),d)"));
    /// ```
    pub fn to_spec(&self) -> Option<String> {
        match self {
            FieldsFilter::Included => Some(String::new()),
            FieldsFilter::Excluded => None,
            FieldsFilter::IncludeFields(_) | FieldsFilter::ExcludeFields(_) => {
                let mut out = String::new();
                if self.polarity() == Polarity::Exclude {
                    out.push('!');
                }
                write_group(self, &mut out);
                Some(out)
            }
        }
    }
}

/// Append `(name,name(...),...)` for a branch node.
fn write_group(filter: &FieldsFilter, out: &mut String) {
    let Some(fields) = filter.fields() else {
        return;
    };
    out.push('(');
    for (i, (name, child)) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(name);
        write_group(child, out);
    }
    out.push(')');
}

impl FromStr for FieldsFilter {
    type Err = crate::error::FieldsFilterError;

    fn from_str(s: &str) -> Result<Self> {
        parse_fields_filter(s)
    }
}

/// Deserializes from a spec string, so a query struct can carry a
/// `fields: FieldsFilter` directly.
impl<'de> Deserialize<'de> for FieldsFilter {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let spec = String::deserialize(deserializer)?;
        parse_fields_filter(&spec).map_err(de::Error::custom)
    }
}
