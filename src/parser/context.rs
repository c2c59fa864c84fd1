//! Left/right column context tracking.

use crate::model::{ColumnContext, Entity};

/// Holds the entities currently heading the left and right columns.
///
/// Only header lines change it. Page breaks, blank lines and data lines
/// leave it as it is. There is no notion of nesting: a header naming a
/// species and then one of its varieties yields two unrelated entities.
#[derive(Debug, Clone, Default)]
pub struct ColumnTracker {
    context: ColumnContext,
    updates: usize,
}

impl ColumnTracker {
    /// Create a tracker with both columns unknown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite both sides from a header line, even when unchanged.
    pub fn update_from_header(&mut self, left: &str, right: &str) {
        let next = ColumnContext::new(Entity::named(left), Entity::named(right));
        log::debug!("Column context {} -> {}", self.context, next);
        self.context = next;
        self.updates += 1;
    }

    /// The live context.
    pub fn current(&self) -> &ColumnContext {
        &self.context
    }

    /// Number of header updates seen so far.
    pub fn updates(&self) -> usize {
        self.updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unknown() {
        let tracker = ColumnTracker::new();
        assert!(tracker.current().is_unknown());
        assert_eq!(tracker.updates(), 0);
    }

    #[test]
    fn test_update_overwrites_both_sides() {
        let mut tracker = ColumnTracker::new();
        tracker.update_from_header("Cod, Pacific", "Halibut, Pacific");
        assert_eq!(tracker.current().left, Entity::named("Cod, Pacific"));
        assert_eq!(tracker.current().right, Entity::named("Halibut, Pacific"));

        tracker.update_from_header("Cod, Pacific", "Sablefish");
        assert_eq!(tracker.current().left, Entity::named("Cod, Pacific"));
        assert_eq!(tracker.current().right, Entity::named("Sablefish"));
        assert_eq!(tracker.updates(), 2);
    }

    #[test]
    fn test_hierarchy_is_flat() {
        let mut tracker = ColumnTracker::new();
        tracker.update_from_header("Salmon", "Pink");
        assert_eq!(
            tracker.current(),
            &ColumnContext::new(Entity::named("Salmon"), Entity::named("Pink"))
        );
    }
}
