//! atrium-query: parameterized Cypher builder for the atrium backend.
//!
//! Compiles typed CRUD and relationship operations into `(text, params)`
//! statements. Entity values are always bound as named parameters; labels
//! and property keys — which Cypher cannot parameterize — only ever come
//! from validated identifiers. The builder never touches the store.

pub mod constraints;
pub mod crud;
pub mod error;
pub mod pattern;
pub mod relationships;
pub mod statement;

pub use constraints::{ConstraintDeclaration, ConstraintRegistry};
pub use crud::{MatchOptions, Page, Props};
pub use error::ConstructionError;
pub use pattern::{Direction, Label, LabelRelation, LabelSet, NodePattern, Path, RelPattern};
pub use relationships::RelTarget;
pub use statement::{CompiledStatement, Fragment};
