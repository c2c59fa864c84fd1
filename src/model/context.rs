//! Entities and the left/right column context.

use std::fmt;

/// Key used in the output for records attributed while a column has no
/// known entity.
pub const UNKNOWN_ENTITY: &str = "Unknown";

/// A species or product category heading a column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Entity {
    /// No header has named this column yet
    #[default]
    Unknown,
    /// A name taken from the species registry
    Named(String),
}

impl Entity {
    /// Create a named entity.
    pub fn named(name: impl Into<String>) -> Self {
        Entity::Named(name.into())
    }

    /// Build an entity back from an output key.
    pub fn from_key(key: &str) -> Self {
        if key == UNKNOWN_ENTITY {
            Entity::Unknown
        } else {
            Entity::Named(key.to_string())
        }
    }

    /// Check whether this is the unknown sentinel.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Entity::Unknown)
    }

    /// The key this entity is stored under in a [`ResultTable`](super::ResultTable).
    pub fn key(&self) -> &str {
        match self {
            Entity::Unknown => UNKNOWN_ENTITY,
            Entity::Named(name) => name,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The entities currently heading the left and right columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnContext {
    /// Entity of the left column
    pub left: Entity,
    /// Entity of the right column
    pub right: Entity,
}

impl ColumnContext {
    /// Create a context from both sides.
    pub fn new(left: Entity, right: Entity) -> Self {
        Self { left, right }
    }

    /// Check whether neither column has been named yet.
    pub fn is_unknown(&self) -> bool {
        self.left.is_unknown() && self.right.is_unknown()
    }
}

impl fmt::Display for ColumnContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} | {}]", self.left, self.right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_key() {
        assert_eq!(Entity::Unknown.key(), "Unknown");
        assert_eq!(Entity::named("Cod, Pacific").key(), "Cod, Pacific");
    }

    #[test]
    fn test_entity_from_key() {
        assert_eq!(Entity::from_key("Unknown"), Entity::Unknown);
        assert_eq!(Entity::from_key("Sablefish"), Entity::named("Sablefish"));
    }

    #[test]
    fn test_default_context_is_unknown() {
        let ctx = ColumnContext::default();
        assert!(ctx.is_unknown());
        assert_eq!(ctx.to_string(), "[Unknown | Unknown]");
    }
}
