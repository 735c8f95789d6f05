//! Records as seen by the search layer
//!
//! The search layer never depends on a concrete record type. It needs two
//! capabilities: a stable identifier and lookup of named field values.
//! [`Document`] is the concrete record shipped with the crate; it also
//! carries the hidden relevance annotations (`__score`, `__hits`) that
//! search results attach.

use crate::selector::FieldAccess;
use crate::types::RecordId;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Name under which selectors address the primary identifier
pub const ID_FIELD: &str = "_id";

/// A record with a stable identifier and named field values
pub trait Record {
    /// Primary identifier
    fn id(&self) -> &RecordId;

    /// Current value of a field, `None` when the record has no such value
    fn get_field(&self, name: &str) -> Option<&Value>;
}

/// Concrete record plus hidden relevance annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Primary identifier
    pub id: RecordId,
    /// Field values
    pub fields: BTreeMap<String, Value>,
    /// Relevance score (`__score`), zero until a search attaches one
    #[serde(default, rename = "__score")]
    pub score: f64,
    /// Number of lookups that hit this record (`__hits`), simple scans only
    #[serde(default, rename = "__hits")]
    pub hits: u32,
}

impl Document {
    /// Create an empty document
    pub fn new(id: impl Into<RecordId>) -> Self {
        Document {
            id: id.into(),
            fields: BTreeMap::new(),
            score: 0.0,
            hits: 0,
        }
    }

    /// Builder: set a field value
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Builder: set the relevance score
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// Set a field value in place
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Copy of this document restricted to the listed fields
    pub fn project(&self, names: &[String]) -> Document {
        Document {
            id: self.id.clone(),
            fields: self
                .fields
                .iter()
                .filter(|(k, _)| names.iter().any(|n| n == *k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            score: self.score,
            hits: self.hits,
        }
    }

    /// Flatten into a plain field map with `_id` and `__score` included
    pub fn into_plain(self) -> BTreeMap<String, Value> {
        let mut plain = self.fields;
        plain.insert(ID_FIELD.to_string(), Value::String(self.id.to_string()));
        plain.insert("__score".to_string(), Value::Float(self.score));
        plain
    }

    /// Grouping key for `key`; `_id` means the primary identifier
    ///
    /// A record without the key field falls back to its primary identifier.
    pub fn key_for(&self, key: &str) -> String {
        if key == ID_FIELD {
            return self.id.to_string();
        }
        match self.fields.get(key) {
            Some(value) => value.key_string().into_owned(),
            None => self.id.to_string(),
        }
    }
}

impl Record for Document {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn get_field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl FieldAccess for Document {
    fn field_value(&self, name: &str) -> Option<Cow<'_, Value>> {
        if name == ID_FIELD {
            return Some(Cow::Owned(Value::String(self.id.to_string())));
        }
        self.fields.get(name).map(Cow::Borrowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::{Condition, Selector};

    fn whale() -> Document {
        Document::new("w1")
            .with_field("title", "Blue Whale")
            .with_field("legs", 0)
    }

    #[test]
    fn test_record_capability() {
        let doc = whale();
        assert_eq!(doc.id().as_str(), "w1");
        assert_eq!(doc.get_field("title"), Some(&Value::from("Blue Whale")));
        assert!(doc.get_field("missing").is_none());
    }

    #[test]
    fn test_id_is_addressable_by_selectors() {
        let doc = whale();
        assert!(Selector::everything()
            .with(Condition::is_in(ID_FIELD, ["w0", "w1"]))
            .matches(&doc));
    }

    #[test]
    fn test_project_keeps_annotations() {
        let doc = whale().with_score(12.0);
        let projected = doc.project(&["title".to_string()]);
        assert_eq!(projected.fields.len(), 1);
        assert_eq!(projected.score, 12.0);
        assert_eq!(projected.id, doc.id);
    }

    #[test]
    fn test_into_plain_exposes_score() {
        let plain = whale().with_score(3.5).into_plain();
        assert_eq!(plain.get("_id"), Some(&Value::from("w1")));
        assert_eq!(plain.get("__score"), Some(&Value::Float(3.5)));
        assert_eq!(plain.get("title"), Some(&Value::from("Blue Whale")));
    }

    #[test]
    fn test_key_for() {
        let doc = whale().with_field("slug", "blue-whale");
        assert_eq!(doc.key_for("_id"), "w1");
        assert_eq!(doc.key_for("slug"), "blue-whale");
        assert_eq!(doc.key_for("legs"), "0");
        assert_eq!(doc.key_for("absent"), "w1");
    }
}
