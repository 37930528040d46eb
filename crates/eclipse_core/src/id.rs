//! Entity identifiers

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use serde::{Deserialize, Serialize};

/// Opaque reference to an entity owned by the host.
///
/// The core never dereferences an id; it only compares, hashes and passes
/// ids back to the host through [`crate::ComponentLookup`] or a scene.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Create an id from its raw value
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Create a null/invalid id
    #[inline]
    pub const fn null() -> Self {
        Self(u64::MAX)
    }

    /// Check if this id is null
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.0 == u64::MAX
    }

    /// Get the raw value
    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "EntityId(null)")
        } else {
            write!(f, "EntityId({})", self.0)
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "null")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::null()
    }
}

impl From<u64> for EntityId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Thread-safe entity id generator
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    /// Create a generator starting at 1
    pub const fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create a generator starting at `first`
    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Generate the next unique id
    pub fn next(&self) -> EntityId {
        EntityId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Make sure future ids are strictly greater than `id`
    pub fn reserve_through(&self, id: EntityId) {
        self.next.fetch_max(id.raw().saturating_add(1), Ordering::Relaxed);
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generator() {
        let gen = IdGenerator::new();
        let id1 = gen.next();
        let id2 = gen.next();
        assert_ne!(id1, id2);
        assert_eq!(id1.raw(), 1);
        assert_eq!(id2.raw(), 2);
    }

    #[test]
    fn test_reserve_through() {
        let gen = IdGenerator::new();
        gen.reserve_through(EntityId::new(40));
        assert_eq!(gen.next().raw(), 41);

        // Never moves backwards
        gen.reserve_through(EntityId::new(3));
        assert_eq!(gen.next().raw(), 42);
    }

    #[test]
    fn test_display() {
        assert_eq!(EntityId::new(7).to_string(), "#7");
        assert_eq!(EntityId::null().to_string(), "null");
    }
}
