//! The compiled statement: the only artifact that crosses into the
//! execution layer.

use std::collections::BTreeMap;

use serde_json::Value;

/// An immutable `(text, params)` pair. Values are bound by name; statement
/// text never contains a literal entity value.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStatement {
    text: String,
    params: BTreeMap<String, Value>,
}

impl CompiledStatement {
    /// Assemble a statement from rendered pattern text and named parameters.
    ///
    /// The text must only ever interpolate validated identifiers (labels,
    /// node names, property keys); entity values belong in `params`.
    pub fn new(text: impl Into<String>, params: BTreeMap<String, Value>) -> Self {
        Self {
            text: text.into(),
            params,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn params(&self) -> &BTreeMap<String, Value> {
        &self.params
    }

    pub fn into_parts(self) -> (String, BTreeMap<String, Value>) {
        (self.text, self.params)
    }

    /// Append a fragment, merging its parameters. Fragment parameters win
    /// on name collision, so fragments use names no CRUD op generates.
    pub fn append(mut self, fragment: Fragment) -> Self {
        self.text.push(' ');
        self.text.push_str(&fragment.text);
        self.params.extend(fragment.params);
        self
    }
}

/// A reusable statement piece (pattern + its parameters) meant to be
/// appended onto a compiled statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub(crate) text: String,
    pub(crate) params: BTreeMap<String, Value>,
}

impl Fragment {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn params(&self) -> &BTreeMap<String, Value> {
        &self.params
    }
}
