// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler registry: which key listeners are alive this frame.

use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

/// Per-listener bookkeeping.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct Handler {
    /// Seen in the current frame's declarations.
    active: bool,
}

/// Identities removed by [`HandlerRegistry::prune_dead`].
pub type Pruned<K> = SmallVec<[K; 4]>;

/// Liveness table for key listeners, keyed by listener identity.
///
/// Each frame follows the same cycle:
/// 1) [`reset_liveness`](Self::reset_liveness) marks every entry inactive.
/// 2) [`ensure`](Self::ensure) marks each declared identity active, inserting
///    it if this is its first appearance.
/// 3) [`prune_dead`](Self::prune_dead) drops whatever was not declared.
///
/// ```
/// use understory_key_focus::registry::HandlerRegistry;
///
/// let mut handlers = HandlerRegistry::new();
/// assert!(handlers.ensure(1_u32));
/// assert!(!handlers.ensure(1));
///
/// handlers.reset_liveness();
/// assert!(handlers.prune_dead().contains(&1));
/// assert!(handlers.is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct HandlerRegistry<K> {
    handlers: HashMap<K, Handler>,
}

impl<K> Default for HandlerRegistry<K> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> HandlerRegistry<K> {
    /// Create an empty registry. Does not allocate until the first insertion.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Returns `true` if `key` is registered.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.handlers.contains_key(key)
    }

    /// Returns `true` if `key` is registered and was declared this frame.
    #[must_use]
    pub fn is_active(&self, key: &K) -> bool {
        self.handlers.get(key).is_some_and(|h| h.active)
    }

    /// Iterate over registered identities, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.handlers.keys().copied()
    }

    /// Mark every listener as not yet seen this frame.
    pub fn reset_liveness(&mut self) {
        for h in self.handlers.values_mut() {
            h.active = false;
        }
    }

    /// Mark `key` as seen this frame.
    ///
    /// Returns `true` if `key` was not registered before, i.e. this is its
    /// first appearance and the caller should initialize it.
    pub fn ensure(&mut self, key: K) -> bool {
        let mut inserted = false;
        let h = self.handlers.entry(key).or_insert_with(|| {
            inserted = true;
            Handler::default()
        });
        h.active = true;
        inserted
    }

    /// Forget `key`. Returns `true` if it was registered.
    pub fn remove(&mut self, key: &K) -> bool {
        self.handlers.remove(key).is_some()
    }

    /// Remove every listener not seen since the last
    /// [`reset_liveness`](Self::reset_liveness), returning their identities.
    pub fn prune_dead(&mut self) -> Pruned<K> {
        let mut pruned = Pruned::new();
        self.handlers.retain(|&k, h| {
            if !h.active {
                pruned.push(k);
            }
            h.active
        });
        pruned
    }
}
