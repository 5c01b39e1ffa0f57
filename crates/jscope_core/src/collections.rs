//! Collection aliases used throughout the analyzer.

/// A set that uses FxHash for fast hashing, suitable for analyzer internals
/// where DoS resistance is not needed.
pub type FxHashSet<T> = rustc_hash::FxHashSet<T>;

/// Re-export FxHashMap for convenience.
pub type FxMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// Build an empty [`FxMap`] with room for `capacity` entries.
pub fn fx_map_with_capacity<K, V>(capacity: usize) -> FxMap<K, V> {
    FxMap::with_capacity_and_hasher(capacity, Default::default())
}
