//! Persisted index entries and ephemeral scored records

use crate::selector::FieldAccess;
use crate::types::RecordId;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Field names of [`IndexEntry`] as addressed by selectors
pub mod fields {
    /// Owning record's model name
    pub const MODEL: &str = "model";
    /// Owning record's primary key
    pub const RECORD_ID: &str = "record_id";
    /// Source field name
    pub const FIELD_NAME: &str = "field_name";
    /// Configured field weight
    pub const WEIGHT: &str = "weight";
    /// Searchable value
    pub const VALUE: &str = "value";
    /// Space-joined phonetic codes
    pub const METAPHONE: &str = "metaphone";
    /// Language of a translatable variant
    pub const LANGUAGE: &str = "language";
}

/// One searchable value of one field of one record
///
/// For a given `(model, record_id)` the set of entries is always replaced
/// as a whole when the record is reindexed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Owning record's model name
    pub model: String,
    /// Owning record's primary key
    pub record_id: RecordId,
    /// Which field this entry represents
    pub field_name: String,
    /// Relative importance of the field for this model
    pub weight: f64,
    /// Searchable value (one language variant if translatable)
    pub value: Value,
    /// Space-joined phonetic codes of the value's long tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metaphone: Option<String>,
    /// Language code, translatable fields only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl IndexEntry {
    /// Create an entry without phonetic codes or language
    pub fn new(
        model: impl Into<String>,
        record_id: RecordId,
        field_name: impl Into<String>,
        weight: f64,
        value: impl Into<Value>,
    ) -> Self {
        IndexEntry {
            model: model.into(),
            record_id,
            field_name: field_name.into(),
            weight,
            value: value.into(),
            metaphone: None,
            language: None,
        }
    }

    /// Builder: set phonetic codes
    pub fn with_metaphone(mut self, metaphone: Option<String>) -> Self {
        self.metaphone = metaphone;
        self
    }

    /// Builder: set language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// The value as text, `None` for non-string values
    pub fn text(&self) -> Option<&str> {
        self.value.as_str()
    }
}

impl FieldAccess for IndexEntry {
    fn field_value(&self, name: &str) -> Option<Cow<'_, Value>> {
        let owned = |s: &str| Some(Cow::Owned(Value::String(s.to_string())));
        match name {
            fields::MODEL => owned(&self.model),
            fields::RECORD_ID => owned(self.record_id.as_str()),
            fields::FIELD_NAME => owned(&self.field_name),
            fields::WEIGHT => Some(Cow::Owned(Value::Float(self.weight))),
            fields::VALUE => Some(Cow::Borrowed(&self.value)),
            fields::METAPHONE => self.metaphone.as_deref().and_then(owned),
            fields::LANGUAGE => self.language.as_deref().and_then(owned),
            _ => None,
        }
    }
}

/// Summed relevance of one record for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    /// Record primary key
    pub record_id: RecordId,
    /// Sum of entry scores
    pub score: f64,
}

impl ScoredRecord {
    /// Create a scored record
    pub fn new(record_id: RecordId, score: f64) -> Self {
        ScoredRecord { record_id, score }
    }
}
