//! Clause and pattern primitives: labels, nodes, relationships, paths.
//!
//! These are plain value objects with no behavior beyond composition and
//! rendering. Cypher cannot parameterize labels, relationship types, or
//! property keys, so every identifier that ends up in statement text is
//! validated at construction.

use std::fmt;

use crate::error::ConstructionError;

/// True for `[A-Za-z_][A-Za-z0-9_]*`.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub(crate) fn check_identifier(s: &str) -> Result<(), ConstructionError> {
    if is_identifier(s) {
        Ok(())
    } else {
        Err(ConstructionError::InvalidIdentifier(s.to_string()))
    }
}

/// The parameter name a node's bound property compiles to (`$user_uuid`).
pub(crate) fn param_name(node_name: &str, key: &str) -> String {
    format!("{node_name}_{key}")
}

/// A validated node label or relationship type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(String);

impl Label {
    pub fn new(name: impl Into<String>) -> Result<Self, ConstructionError> {
        let name = name.into();
        check_identifier(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Label {
    type Error = ConstructionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// How a multi-label set combines: every label, or at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelRelation {
    /// Node must carry every label; compiles to a `:A:B` pattern.
    #[default]
    And,
    /// Node must carry at least one label; compiles to an explicit
    /// `n:A OR n:B` disjunction, never a multi-label pattern.
    Or,
}

/// One or more labels plus their combination semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<Label>,
    relation: LabelRelation,
}

impl LabelSet {
    pub fn new<I, S>(labels: I, relation: LabelRelation) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels = labels
            .into_iter()
            .map(Label::new)
            .collect::<Result<Vec<_>, _>>()?;
        if labels.is_empty() {
            return Err(ConstructionError::EmptyLabelSet);
        }
        Ok(Self { labels, relation })
    }

    /// Every label must be present (exact-type queries).
    pub fn all<I, S>(labels: I) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(labels, LabelRelation::And)
    }

    /// At least one label must be present (polymorphic listings).
    pub fn any<I, S>(labels: I) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(labels, LabelRelation::Or)
    }

    pub fn single(label: impl Into<String>) -> Result<Self, ConstructionError> {
        Self::new([label.into()], LabelRelation::And)
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn relation(&self) -> LabelRelation {
        self.relation
    }

    /// `:A:B` — the pattern form, valid only for AND semantics.
    pub(crate) fn colon_form(&self) -> String {
        let mut out = String::new();
        for label in &self.labels {
            out.push(':');
            out.push_str(label.as_str());
        }
        out
    }

    /// `n:A OR n:B` — the predicate form used for OR semantics.
    pub(crate) fn disjunction(&self, node_name: &str) -> String {
        self.labels
            .iter()
            .map(|l| format!("{node_name}:{l}"))
            .collect::<Vec<_>>()
            .join(" OR ")
    }
}

/// A node in a pattern: `(name:A:B {key: $name_key})`.
///
/// Properties listed here render as parameter placeholders named after the
/// node; binding the values is the caller's job.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePattern {
    name: String,
    labels: Vec<Label>,
    props: Vec<String>,
}

impl NodePattern {
    pub fn new(name: impl Into<String>) -> Result<Self, ConstructionError> {
        let name = name.into();
        check_identifier(&name)?;
        Ok(Self {
            name,
            labels: Vec::new(),
            props: Vec::new(),
        })
    }

    pub fn labeled(
        name: impl Into<String>,
        label: impl Into<String>,
    ) -> Result<Self, ConstructionError> {
        Ok(Self::new(name)?.with_label(label)?)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Result<Self, ConstructionError> {
        self.labels.push(Label::new(label)?);
        Ok(self)
    }

    /// Bind a property to the `$<name>_<key>` placeholder.
    pub fn with_prop(mut self, key: impl Into<String>) -> Result<Self, ConstructionError> {
        let key = key.into();
        check_identifier(&key)?;
        self.props.push(key);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn render(&self) -> String {
        let mut out = String::from("(");
        out.push_str(&self.name);
        for label in &self.labels {
            out.push(':');
            out.push_str(label.as_str());
        }
        if !self.props.is_empty() {
            out.push_str(" {");
            let rendered: Vec<String> = self
                .props
                .iter()
                .map(|key| format!("{key}: ${}", param_name(&self.name, key)))
                .collect();
            out.push_str(&rendered.join(", "));
            out.push('}');
        }
        out.push(')');
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
}

/// A typed, directed relationship in a pattern: `-[r:MEMBER_OF]->`.
#[derive(Debug, Clone, PartialEq)]
pub struct RelPattern {
    name: Option<String>,
    typ: Label,
    direction: Direction,
}

impl RelPattern {
    pub fn outgoing(typ: impl Into<String>) -> Result<Self, ConstructionError> {
        Ok(Self {
            name: None,
            typ: Label::new(typ)?,
            direction: Direction::Outgoing,
        })
    }

    pub fn incoming(typ: impl Into<String>) -> Result<Self, ConstructionError> {
        Ok(Self {
            name: None,
            typ: Label::new(typ)?,
            direction: Direction::Incoming,
        })
    }

    /// Name the relationship so its properties can be returned.
    pub fn named(mut self, name: impl Into<String>) -> Result<Self, ConstructionError> {
        let name = name.into();
        check_identifier(&name)?;
        self.name = Some(name);
        Ok(self)
    }

    pub(crate) fn render(&self) -> String {
        let inner = match &self.name {
            Some(name) => format!("[{name}:{}]", self.typ),
            None => format!("[:{}]", self.typ),
        };
        match self.direction {
            Direction::Outgoing => format!("-{inner}->"),
            Direction::Incoming => format!("<-{inner}-"),
        }
    }
}

/// A path: a start node plus alternating relationship/node hops.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    start: NodePattern,
    hops: Vec<(RelPattern, NodePattern)>,
}

impl Path {
    pub fn from(start: NodePattern) -> Self {
        Self {
            start,
            hops: Vec::new(),
        }
    }

    pub fn hop(mut self, rel: RelPattern, node: NodePattern) -> Self {
        self.hops.push((rel, node));
        self
    }

    pub fn render(&self) -> String {
        let mut out = self.start.render();
        for (rel, node) in &self.hops {
            out.push_str(&rel.render());
            out.push_str(&node.render());
        }
        out
    }
}
