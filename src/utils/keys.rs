//! Small integer keys for engine list entries

use crate::types::EngineKey;
use rand::Rng;
use std::collections::HashSet;

/// Size of the key space; keys fall in `[0, KEY_SPACE)`
pub const KEY_SPACE: u32 = 100;

/// Hands out keys that are unique among live allocations.
///
/// Candidates are drawn uniformly and redrawn on collision, so the number
/// of held keys must stay well below [`KEY_SPACE`]. The registry cap keeps
/// it at four.
#[derive(Debug, Default)]
pub struct UniqueKeyAllocator {
    held: HashSet<EngineKey>,
}

impl UniqueKeyAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a key not currently held
    pub fn allocate(&mut self) -> EngineKey {
        let mut rng = rand::thread_rng();
        loop {
            let candidate = EngineKey(rng.gen_range(0..KEY_SPACE));
            if self.held.insert(candidate) {
                return candidate;
            }
        }
    }

    /// Return a key to the pool; no-op if it is not held
    pub fn release(&mut self, key: EngineKey) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: EngineKey) -> bool {
        self.held.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocated_keys_are_unique_and_in_range() {
        let mut allocator = UniqueKeyAllocator::new();
        let keys: Vec<_> = (0..50).map(|_| allocator.allocate()).collect();

        let distinct: HashSet<_> = keys.iter().copied().collect();
        assert_eq!(distinct.len(), 50);
        assert!(keys.iter().all(|k| k.0 < KEY_SPACE));
        assert_eq!(allocator.len(), 50);
    }

    #[test]
    fn test_release_makes_key_reusable() {
        let mut allocator = UniqueKeyAllocator::new();
        // Fill the whole space so the only free slot is the released one.
        let keys: Vec<_> = (0..KEY_SPACE).map(|_| allocator.allocate()).collect();
        let released = keys[17];

        allocator.release(released);
        assert!(!allocator.is_held(released));

        assert_eq!(allocator.allocate(), released);
    }

    #[test]
    fn test_release_unknown_key_is_noop() {
        let mut allocator = UniqueKeyAllocator::new();
        let held = allocator.allocate();
        let other = EngineKey((held.0 + 1) % KEY_SPACE);

        allocator.release(other);
        assert!(allocator.is_held(held));
        assert_eq!(allocator.len(), 1);
    }

    #[test]
    fn test_never_returns_held_key() {
        let mut allocator = UniqueKeyAllocator::new();
        let live: Vec<_> = (0..4).map(|_| allocator.allocate()).collect();

        for _ in 0..200 {
            let key = allocator.allocate();
            assert!(!live.contains(&key));
            allocator.release(key);
        }
    }
}
