//! Rule documents: the records a grammar description is made of

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::node::Node;

/// A whole rule document, usually loaded from TOML.
///
/// ```toml
/// title = "Arithmetic"
///
/// [[rules]]
/// name = "expr"
/// syntax = "term (('+' | '-') term)*"
/// description = "Sum of terms."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub rules: Vec<RuleRecord>,
    /// Any other top-level keys, kept for templating
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

/// One rule as written by the author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Notation source of the rule body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax: Option<String>,
    /// Prose fields (description, notes, ...), never interpreted
    #[serde(flatten)]
    pub fields: BTreeMap<String, toml::Value>,
}

impl RuleRecord {
    pub fn new(name: impl Into<String>, syntax: Option<&str>) -> Self {
        Self {
            name: name.into(),
            label: None,
            syntax: syntax.map(str::to_string),
            fields: BTreeMap::new(),
        }
    }

    /// Display label, falling back to the rule name.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// A rule whose notation has been read into a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRule {
    pub name: String,
    pub label: String,
    pub syntax: Option<Node>,
    pub fields: BTreeMap<String, toml::Value>,
}
