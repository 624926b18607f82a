//! FilterSpec parser: turns a `fields` string into a parse tree.
//!
//! Grammar:
//!
//! ```text
//! spec       := [ "!" ] group
//! group      := "(" item { "," item } ")"
//! item       := segment { "~" segment } [ group ]
//! segment    := [A-Za-z0-9_-]+
//! ```
//!
//! The parser is a hand-written recursive descent over bytes. Every accepted
//! character is ASCII, so byte offsets double as character offsets for any
//! input that parses up to the point of failure.
//!
//! The empty string is not part of the grammar; callers that want "keep
//! everything" for an empty parameter go through
//! [`crate::parse_fields_filter`], which checks for it first.

use crate::error::{FieldsFilterError, Result};
use crate::types::{is_field_char, Polarity};

/// Depth bound suggested for specs that arrive from untrusted clients.
///
/// Not applied by default; pass it through [`ParseOptions::with_max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Knobs for parsing untrusted spec strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of field levels, counting every path segment
    /// (`a~b(c)` is three levels deep). `None` accepts any depth.
    pub max_depth: Option<usize>,
}

impl ParseOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// A parsed spec: polarity plus the top-level group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSpec {
    pub polarity: Polarity,
    pub fields: Vec<FieldSpec>,
}

/// One item of a group: a tilde path and an optional nested group.
///
/// `a~b(c,d)` becomes `path = ["a", "b"]`, `fields = Some([c, d])`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub path: Vec<String>,
    pub fields: Option<Vec<FieldSpec>>,
}

impl FieldSpec {
    /// Single-segment leaf, handy for building parse trees by hand.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            path: vec![name.into()],
            fields: None,
        }
    }
}

/// Parse a non-empty spec string.
///
/// # Errors
///
/// Returns [`FieldsFilterError::InvalidFormat`] for any grammar violation,
/// including the empty string and specs nested deeper than
/// `options.max_depth` when one is set.
pub fn parse(spec: &str, options: &ParseOptions) -> Result<ParsedSpec> {
    let mut parser = Parser {
        spec,
        bytes: spec.as_bytes(),
        pos: 0,
        max_depth: options.max_depth,
    };

    let polarity = if parser.eat(b'!') {
        Polarity::Exclude
    } else {
        Polarity::Include
    };
    let fields = parser.group(0)?;

    if parser.pos != parser.bytes.len() {
        return Err(parser.error("unexpected input after closing parenthesis"));
    }

    Ok(ParsedSpec { polarity, fields })
}

struct Parser<'a> {
    spec: &'a str,
    bytes: &'a [u8],
    pos: usize,
    max_depth: Option<usize>,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Consume `byte` if it is next.
    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}', found {}", byte as char, self.found())))
        }
    }

    /// `depth` is the number of field levels above this group.
    fn group(&mut self, depth: usize) -> Result<Vec<FieldSpec>> {
        self.expect(b'(')?;
        let mut items = vec![self.item(depth)?];
        while self.eat(b',') {
            items.push(self.item(depth)?);
        }
        self.expect(b')')?;
        Ok(items)
    }

    fn item(&mut self, depth: usize) -> Result<FieldSpec> {
        let start = self.pos;
        let mut path = vec![self.segment()?];
        while self.eat(b'~') {
            path.push(self.segment()?);
        }

        let item_depth = depth + path.len();
        if let Some(max_depth) = self.max_depth.filter(|&max| item_depth > max) {
            return Err(FieldsFilterError::InvalidFormat {
                spec: self.spec.to_string(),
                position: start,
                message: format!("nesting exceeds maximum depth of {max_depth}"),
            });
        }

        let fields = if self.peek() == Some(b'(') {
            Some(self.group(item_depth)?)
        } else {
            None
        };
        Ok(FieldSpec { path, fields })
    }

    fn segment(&mut self) -> Result<String> {
        let start = self.pos;
        while self.peek().is_some_and(is_field_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error(&format!("expected field name, found {}", self.found())));
        }
        Ok(self.spec[start..self.pos].to_string())
    }

    /// Human-readable description of the character at the cursor.
    fn found(&self) -> String {
        match self.spec[self.pos..].chars().next() {
            Some(c) => format!("{c:?}"),
            None => "end of input".to_string(),
        }
    }

    fn error(&self, message: &str) -> FieldsFilterError {
        FieldsFilterError::InvalidFormat {
            spec: self.spec.to_string(),
            position: self.pos,
            message: message.to_string(),
        }
    }
}
