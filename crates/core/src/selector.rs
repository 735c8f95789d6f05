//! Selector language shared by every storage collaborator
//!
//! A [`Selector`] is a conjunction of [`Condition`]s plus an optional
//! disjunction ("any of"). It is the one query shape both the index entry
//! store and the record store understand:
//!
//! ```text
//! model == "Article" AND field_name IN [title, body]
//!   AND (value == "whale" OR value =~ /whale/i OR metaphone =~ /^AL/i ...)
//! ```
//!
//! Stores may translate selectors into their native query language; the
//! in-memory stores evaluate them directly via [`Selector::matches`].

use crate::value::Value;
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;
use std::fmt;

/// Read access to named fields, the capability a selector evaluates against
pub trait FieldAccess {
    /// Current value of `name`, or `None` if the field is absent
    fn field_value(&self, name: &str) -> Option<Cow<'_, Value>>;
}

// ============================================================================
// Pattern
// ============================================================================

/// Case-insensitive literal pattern (contains or prefix-anchored)
///
/// The literal text is always escaped; queries are never interpreted as
/// regular expressions.
#[derive(Clone)]
pub struct Pattern {
    literal: String,
    anchored: bool,
    regex: Regex,
}

impl Pattern {
    /// Pattern matching any string that contains `literal`
    pub fn contains(literal: &str) -> crate::Result<Self> {
        Self::build(literal, false)
    }

    /// Pattern matching any string that starts with `literal`
    pub fn prefix(literal: &str) -> crate::Result<Self> {
        Self::build(literal, true)
    }

    fn build(literal: &str, anchored: bool) -> crate::Result<Self> {
        let escaped = regex::escape(literal);
        let source = if anchored {
            format!("^{}", escaped)
        } else {
            escaped
        };
        let regex = RegexBuilder::new(&source).case_insensitive(true).build()?;
        Ok(Pattern {
            literal: literal.to_string(),
            anchored,
            regex,
        })
    }

    /// The unescaped literal this pattern was built from
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Whether the pattern is anchored at the start
    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// Test a string against the pattern
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/i", self.regex.as_str())
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.anchored == other.anchored && self.literal == other.literal
    }
}

// ============================================================================
// Condition
// ============================================================================

/// A single predicate on one named field
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the value exactly (typed, case-sensitive)
    Eq {
        /// Field name
        field: String,
        /// Expected value
        value: Value,
    },
    /// Field is a string matching the pattern
    Matches {
        /// Field name
        field: String,
        /// Pattern to test
        pattern: Pattern,
    },
    /// Field equals one of the values
    In {
        /// Field name
        field: String,
        /// Accepted values
        values: Vec<Value>,
    },
}

impl Condition {
    /// `field == value`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// `field =~ pattern`
    pub fn matches(field: impl Into<String>, pattern: Pattern) -> Self {
        Condition::Matches {
            field: field.into(),
            pattern,
        }
    }

    /// `field IN values`
    pub fn is_in<V: Into<Value>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Condition::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Name of the field this condition reads
    pub fn field(&self) -> &str {
        match self {
            Condition::Eq { field, .. }
            | Condition::Matches { field, .. }
            | Condition::In { field, .. } => field,
        }
    }

    /// Evaluate against a field source; absent fields never match
    pub fn matches_fields(&self, source: &dyn FieldAccess) -> bool {
        let Some(actual) = source.field_value(self.field()) else {
            return false;
        };
        match self {
            Condition::Eq { value, .. } => actual.as_ref() == value,
            Condition::Matches { pattern, .. } => {
                actual.as_str().is_some_and(|text| pattern.is_match(text))
            }
            Condition::In { values, .. } => values.iter().any(|v| v == actual.as_ref()),
        }
    }
}

// ============================================================================
// Selector
// ============================================================================

/// Conjunction of conditions with an optional "any of" group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    /// Every condition must hold
    pub all: Vec<Condition>,
    /// At least one must hold; an empty group places no constraint
    pub any: Vec<Condition>,
}

impl Selector {
    /// Selector matching everything
    pub fn everything() -> Self {
        Self::default()
    }

    /// Builder: add a required condition
    pub fn with(mut self, condition: Condition) -> Self {
        self.all.push(condition);
        self
    }

    /// Builder: add several required conditions
    pub fn with_all(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.all.extend(conditions);
        self
    }

    /// Builder: add an alternative to the "any of" group
    pub fn or(mut self, condition: Condition) -> Self {
        self.any.push(condition);
        self
    }

    /// Evaluate the selector against a field source
    pub fn matches(&self, source: &dyn FieldAccess) -> bool {
        self.all.iter().all(|c| c.matches_fields(source))
            && (self.any.is_empty() || self.any.iter().any(|c| c.matches_fields(source)))
    }
}
