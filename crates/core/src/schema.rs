//! Schema collaborator: which fields a model has
//!
//! The indexer consults the schema for two facts only: whether a configured
//! field exists, and whether it is translatable (holds `{lang: text}`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Description of one schema field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name
    pub name: String,
    /// Field holds a mapping from language code to text
    #[serde(default)]
    pub translatable: bool,
}

impl FieldDescriptor {
    /// A plain single-value field
    pub fn plain(name: impl Into<String>) -> Self {
        FieldDescriptor {
            name: name.into(),
            translatable: false,
        }
    }

    /// A multi-language field
    pub fn translatable(name: impl Into<String>) -> Self {
        FieldDescriptor {
            name: name.into(),
            translatable: true,
        }
    }
}

/// Field lookup by name
pub trait Schema: Send + Sync {
    /// Descriptor for `name`, `None` if the model has no such field
    fn field(&self, name: &str) -> Option<FieldDescriptor>;
}

/// Schema backed by an in-memory field table
#[derive(Debug, Clone, Default)]
pub struct ModelSchema {
    fields: BTreeMap<String, FieldDescriptor>,
}

impl ModelSchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a field
    pub fn with_field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.insert(descriptor.name.clone(), descriptor);
        self
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Schema for ModelSchema {
    fn field(&self, name: &str) -> Option<FieldDescriptor> {
        self.fields.get(name).cloned()
    }
}
