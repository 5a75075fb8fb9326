//! Component trait and typed component identities

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use slotmap::{DefaultKey, Key};

/// Marker trait for components
pub trait Component: 'static + Send + Sync {}

/// Stable, generation-checked identity of one component instance
///
/// Refers to a specific component, not to the entity that owns it. A stale
/// identity resolves to `None` instead of aliasing a newer component.
pub struct ComponentId<T> {
    key: DefaultKey,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> ComponentId<T> {
    pub(super) fn new(key: DefaultKey) -> Self {
        Self {
            key,
            _phantom: PhantomData,
        }
    }

    /// Get the underlying storage key
    pub(super) fn key(self) -> DefaultKey {
        self.key
    }
}

impl<T> Clone for ComponentId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ComponentId<T> {}

impl<T> PartialEq for ComponentId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> Eq for ComponentId<T> {}

impl<T> Hash for ComponentId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<T> fmt::Debug for ComponentId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = std::any::type_name::<T>().rsplit("::").next().unwrap_or("?");
        write!(f, "ComponentId<{}>({:?})", name, self.key.data())
    }
}
