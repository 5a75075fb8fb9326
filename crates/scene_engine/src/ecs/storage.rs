//! Per-type component storage
//!
//! One `ComponentStorage<T>` exists per component type. Components live in a
//! slot map so their identities survive other insertions; iteration follows
//! creation order because nothing is ever removed mid-run.

use std::collections::HashMap;

use slotmap::{DefaultKey, SecondaryMap, SlotMap};

use super::{Component, ComponentId, Entity};

/// Storage for every component of a single type
pub struct ComponentStorage<T: Component> {
    components: SlotMap<DefaultKey, T>,
    owners: SecondaryMap<DefaultKey, Entity>,
    by_entity: HashMap<Entity, DefaultKey>,
}

impl<T: Component> ComponentStorage<T> {
    /// Create an empty storage
    pub fn new() -> Self {
        Self {
            components: SlotMap::new(),
            owners: SecondaryMap::new(),
            by_entity: HashMap::new(),
        }
    }

    /// Attach `component` to `entity`
    ///
    /// An entity holds at most one component per type; inserting again
    /// overwrites the value in place and keeps the existing identity.
    pub fn insert(&mut self, entity: Entity, component: T) -> ComponentId<T> {
        if let Some(&key) = self.by_entity.get(&entity) {
            if let Some(slot) = self.components.get_mut(key) {
                *slot = component;
                return ComponentId::new(key);
            }
        }

        let key = self.components.insert(component);
        self.owners.insert(key, entity);
        self.by_entity.insert(entity, key);
        ComponentId::new(key)
    }

    /// Identity of the component attached to `entity`
    pub fn id_of(&self, entity: Entity) -> Option<ComponentId<T>> {
        self.by_entity.get(&entity).copied().map(ComponentId::new)
    }

    /// Resolve an identity
    pub fn get(&self, id: ComponentId<T>) -> Option<&T> {
        self.components.get(id.key())
    }

    /// Resolve an identity mutably
    pub fn get_mut(&mut self, id: ComponentId<T>) -> Option<&mut T> {
        self.components.get_mut(id.key())
    }

    /// Entity owning the identified component
    pub fn owner(&self, id: ComponentId<T>) -> Option<Entity> {
        self.owners.get(id.key()).copied()
    }

    /// Component attached to `entity`
    pub fn get_for(&self, entity: Entity) -> Option<&T> {
        self.id_of(entity).and_then(|id| self.get(id))
    }

    /// Component attached to `entity`, mutably
    pub fn get_for_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let id = self.id_of(entity)?;
        self.get_mut(id)
    }

    /// Iterate components together with their identity and owner
    pub fn iter(&self) -> impl Iterator<Item = (ComponentId<T>, Entity, &T)> {
        let owners = &self.owners;
        self.components
            .iter()
            .filter_map(move |(key, value)| owners.get(key).map(|&owner| (ComponentId::new(key), owner, value)))
    }

    /// Iterate components mutably together with their identity and owner
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ComponentId<T>, Entity, &mut T)> {
        let owners = &self.owners;
        self.components
            .iter_mut()
            .filter_map(move |(key, value)| owners.get(key).map(|&owner| (ComponentId::new(key), owner, value)))
    }

    /// Number of stored components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the storage is empty
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl<T: Component> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}
