//! # fields-filter
//!
//! Parser and evaluator for the `fields` selection mini-language that REST
//! API clients use to trim responses down to the parts they need.
//!
//! A spec such as `(name,attributes(site,tags))` keeps only the named
//! fields; a leading `!` flips it to exclusion, so `!(attributes(tags))`
//! keeps everything except `attributes.tags`. The parsed spec becomes an
//! immutable [`FieldsFilter`] tree that can be applied to any
//! `serde_json::Value`, or queried ahead of time to skip computing fields
//! the client will never see.
//!
//! ## Quick start
//!
//! ```rust
//! use fields_filter::parse_fields_filter;
//! use serde_json::json;
//!
//! let data = json!({"field1": 1, "field2": {"field21": 21, "field22": 22}, "field3": 3});
//!
//! let keep = parse_fields_filter("(field1,field2(field22))").unwrap();
//! assert_eq!(keep.apply(&data), json!({"field1": 1, "field2": {"field22": 22}}));
//!
//! let drop = parse_fields_filter("!(field1,field2(field22))").unwrap();
//! assert_eq!(drop.apply(&data), json!({"field2": {"field21": 21}, "field3": 3}));
//! ```
//!
//! ## Modules
//!
//! - [`parser`]: spec string → parse tree
//! - [`builder`]: parse tree or explicit mappings → filter tree (`make_filter`)
//! - [`merge`]: combining overlapping filters of one polarity
//! - [`filter`]: parse entry points, `is_included`, `get_nested_fields`, `apply`
//! - [`types`]: `FieldsFilter`, `Fields`, `Polarity`
//! - [`error`]: error types for parse and construction failures

pub mod builder;
pub mod error;
pub mod filter;
pub mod merge;
pub mod parser;
pub mod types;

pub use builder::make_filter;
pub use error::{FieldsFilterError, INVALID_FORMAT_MESSAGE};
pub use filter::{filter_json, parse_fields_filter, parse_fields_filter_with};
pub use parser::ParseOptions;
pub use types::{Fields, FieldsFilter, Polarity};
