//! ECS World implementation

use std::any::{Any, TypeId};
use std::collections::HashMap;

use super::components::{CameraComponent, TransformComponent};
use super::storage::ComponentStorage;
use super::{Component, ComponentId, EcsError, Entity};
use crate::foundation::math::Mat4;

/// Upper bound on parent chain length walked when composing world matrices
const MAX_HIERARCHY_DEPTH: usize = 64;

struct EntityRecord {
    name: String,
}

/// ECS World containing all entities and components
///
/// Every entity is born with a [`TransformComponent`]; the world also holds
/// the single "main camera" slot the renderer reads.
pub struct World {
    next_entity_id: u32,
    entities: Vec<EntityRecord>,
    component_storages: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    main_camera: Option<ComponentId<CameraComponent>>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self {
            next_entity_id: 0,
            entities: Vec::new(),
            component_storages: HashMap::new(),
            main_camera: None,
        }
    }

    /// Create a new entity with a label and a default transform
    pub fn create_entity(&mut self, name: impl Into<String>) -> Entity {
        let entity = Entity::new(self.next_entity_id);
        self.next_entity_id += 1;
        let name = name.into();
        log::debug!("Created entity {} '{}'", entity, name);
        self.entities.push(EntityRecord { name });
        if let Some(storage) = self.storage_mut::<TransformComponent>() {
            storage.insert(entity, TransformComponent::default());
        }
        entity
    }

    /// Whether `entity` was created by this world
    pub fn contains(&self, entity: Entity) -> bool {
        (entity.id() as usize) < self.entities.len()
    }

    /// Label given at creation
    pub fn entity_name(&self, entity: Entity) -> Option<&str> {
        self.entities.get(entity.id() as usize).map(|record| record.name.as_str())
    }

    /// First entity carrying `name`
    pub fn find_entity(&self, name: &str) -> Option<Entity> {
        self.entities
            .iter()
            .position(|record| record.name == name)
            .and_then(|index| u32::try_from(index).ok())
            .map(Entity::new)
    }

    /// Number of entities created so far
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Iterate over all entities in creation order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        (0..self.next_entity_id).map(Entity::new)
    }

    /// Add a component to an entity, returning its identity
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> Result<ComponentId<T>, EcsError> {
        if !self.contains(entity) {
            return Err(EcsError::UnknownEntity(entity));
        }
        self.storage_mut::<T>()
            .map(|storage| storage.insert(entity, component))
            .ok_or(EcsError::StorageMismatch(std::any::type_name::<T>()))
    }

    /// Get a component from an entity
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>()?.get_for(entity)
    }

    /// Get a mutable component from an entity
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.storage_mut_existing::<T>()?.get_for_mut(entity)
    }

    /// Identity of the `T` component attached to `entity`
    pub fn component_id<T: Component>(&self, entity: Entity) -> Option<ComponentId<T>> {
        self.storage::<T>()?.id_of(entity)
    }

    /// Identity of the `T` component attached to `entity`, or an error naming what is missing
    pub fn require_component_id<T: Component>(&self, entity: Entity) -> Result<ComponentId<T>, EcsError> {
        self.component_id::<T>(entity).ok_or(EcsError::MissingComponent {
            entity,
            component: short_type_name::<T>(),
        })
    }

    /// Resolve a component identity
    pub fn get<T: Component>(&self, id: ComponentId<T>) -> Option<&T> {
        self.storage::<T>()?.get(id)
    }

    /// Resolve a component identity mutably
    pub fn get_mut<T: Component>(&mut self, id: ComponentId<T>) -> Option<&mut T> {
        self.storage_mut_existing::<T>()?.get_mut(id)
    }

    /// Entity owning an identified component
    pub fn owner<T: Component>(&self, id: ComponentId<T>) -> Option<Entity> {
        self.storage::<T>()?.owner(id)
    }

    /// All components of type `T` in creation order
    pub fn components<T: Component>(&self) -> impl Iterator<Item = &T> {
        self.storage::<T>().into_iter().flat_map(|storage| storage.iter().map(|(_, _, value)| value))
    }

    /// All components of type `T`, mutably
    pub fn components_mut<T: Component>(&mut self) -> impl Iterator<Item = &mut T> {
        self.storage_mut_existing::<T>()
            .into_iter()
            .flat_map(|storage| storage.iter_mut().map(|(_, _, value)| value))
    }

    /// Owning entity and component for every `T`
    pub fn query<T: Component>(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.storage::<T>()
            .into_iter()
            .flat_map(|storage| storage.iter().map(|(_, owner, value)| (owner, value)))
    }

    /// Identity, owning entity and component for every `T`
    pub fn query_ids<T: Component>(&self) -> impl Iterator<Item = (ComponentId<T>, Entity, &T)> {
        self.storage::<T>().into_iter().flat_map(ComponentStorage::iter)
    }

    /// Number of `T` components
    pub fn count<T: Component>(&self) -> usize {
        self.storage::<T>().map_or(0, ComponentStorage::len)
    }

    /// Currently designated main camera
    pub fn main_camera(&self) -> Option<ComponentId<CameraComponent>> {
        self.main_camera
    }

    /// Designate a new main camera, superseding any previous one
    pub fn set_main_camera(&mut self, camera: ComponentId<CameraComponent>) {
        if let Some(previous) = self.main_camera.replace(camera) {
            if previous != camera {
                log::debug!("Main camera {:?} superseded by {:?}", previous, camera);
            }
        }
    }

    /// Parent `child`'s transform to a specific transform component
    ///
    /// The parent must already exist, must not be the child's own transform and
    /// must not have the child anywhere in its ancestor chain.
    pub fn set_parent(&mut self, child: Entity, parent: ComponentId<TransformComponent>) -> Result<(), EcsError> {
        let child_transform = self.require_component_id::<TransformComponent>(child)?;

        if self.get(parent).is_none() {
            return Err(EcsError::InvalidParent { child, reason: "parent transform does not exist" });
        }
        if child_transform == parent {
            return Err(EcsError::InvalidParent { child, reason: "transform cannot parent itself" });
        }
        if self.ancestors(parent).any(|ancestor| ancestor == child_transform) {
            return Err(EcsError::InvalidParent { child, reason: "assignment would create a cycle" });
        }

        if let Some(transform) = self.get_mut(child_transform) {
            transform.parent = Some(parent);
        }
        Ok(())
    }

    /// Walk the parent chain above `transform`, nearest first
    pub fn ancestors(&self, transform: ComponentId<TransformComponent>) -> impl Iterator<Item = ComponentId<TransformComponent>> + '_ {
        let mut current = self.get(transform).and_then(|t| t.parent);
        std::iter::from_fn(move || {
            let id = current?;
            current = self.get(id).and_then(|t| t.parent);
            Some(id)
        })
        .take(MAX_HIERARCHY_DEPTH)
    }

    /// World matrix of a transform, composed through its parents
    pub fn world_matrix(&self, transform: ComponentId<TransformComponent>) -> Option<Mat4> {
        let mut matrix = self.get(transform)?.to_matrix();
        for ancestor in self.ancestors(transform) {
            matrix = self.get(ancestor)?.to_matrix() * matrix;
        }
        Some(matrix)
    }

    /// World matrix of an entity's transform
    pub fn entity_world_matrix(&self, entity: Entity) -> Option<Mat4> {
        self.world_matrix(self.component_id::<TransformComponent>(entity)?)
    }

    fn storage<T: Component>(&self) -> Option<&ComponentStorage<T>> {
        self.component_storages
            .get(&TypeId::of::<T>())
            .and_then(|storage| storage.downcast_ref::<ComponentStorage<T>>())
    }

    fn storage_mut_existing<T: Component>(&mut self) -> Option<&mut ComponentStorage<T>> {
        self.component_storages
            .get_mut(&TypeId::of::<T>())
            .and_then(|storage| storage.downcast_mut::<ComponentStorage<T>>())
    }

    fn storage_mut<T: Component>(&mut self) -> Option<&mut ComponentStorage<T>> {
        self.component_storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ComponentStorage::<T>::new()))
            .downcast_mut::<ComponentStorage<T>>()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::ColliderComponent;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn test_entities_get_sequential_ids_and_transforms() {
        let mut world = World::new();
        let first = world.create_entity("first");
        let second = world.create_entity("second");

        assert_eq!(first.id(), 0);
        assert_eq!(second.id(), 1);
        assert_eq!(world.entity_name(second), Some("second"));
        assert_eq!(world.count::<TransformComponent>(), 2);
        assert!(world.get_component::<TransformComponent>(first).is_some());
    }

    #[test]
    fn test_add_component_to_unknown_entity_fails() {
        let mut world = World::new();
        let mut other = World::new();
        let stranger = other.create_entity("stranger");

        let result = world.add_component(stranger, ColliderComponent::ray(Vec3::y(), 1.0));
        assert_eq!(result, Err(EcsError::UnknownEntity(stranger)));
    }

    #[test]
    fn test_reinserting_keeps_identity() {
        let mut world = World::new();
        let entity = world.create_entity("probe");
        let first = world.add_component(entity, ColliderComponent::ray(Vec3::y(), 1.0)).unwrap();
        let second = world.add_component(entity, ColliderComponent::ray(Vec3::x(), 2.0)).unwrap();

        assert_eq!(first, second);
        assert_eq!(world.count::<ColliderComponent>(), 1);
        assert_relative_eq!(world.get(first).unwrap().max_distance, 2.0);
    }

    #[test]
    fn test_component_id_resolves_owner() {
        let mut world = World::new();
        world.create_entity("a");
        let b = world.create_entity("b");
        let id = world.component_id::<TransformComponent>(b).unwrap();

        assert_eq!(world.owner(id), Some(b));
    }

    #[test]
    fn test_missing_storage_iterates_empty() {
        let world = World::new();
        assert_eq!(world.count::<CameraComponent>(), 0);
        assert_eq!(world.components::<CameraComponent>().count(), 0);
        assert!(world.main_camera().is_none());
    }

    #[test]
    fn test_set_parent_rejects_self_and_cycles() {
        let mut world = World::new();
        let a = world.create_entity("a");
        let b = world.create_entity("b");
        let a_transform = world.component_id::<TransformComponent>(a).unwrap();
        let b_transform = world.component_id::<TransformComponent>(b).unwrap();

        assert!(matches!(world.set_parent(a, a_transform), Err(EcsError::InvalidParent { .. })));

        world.set_parent(b, a_transform).unwrap();
        assert!(matches!(world.set_parent(a, b_transform), Err(EcsError::InvalidParent { .. })));
        assert_eq!(world.get(b_transform).unwrap().parent, Some(a_transform));
    }

    #[test]
    fn test_world_matrix_composes_parent_chain() {
        let mut world = World::new();
        let parent = world.create_entity("parent");
        let child = world.create_entity("child");
        world.get_component_mut::<TransformComponent>(parent).unwrap().position = Vec3::new(1.0, 2.0, 3.0);
        world.get_component_mut::<TransformComponent>(child).unwrap().position = Vec3::new(0.0, 1.0, 0.0);
        let parent_id = world.component_id::<TransformComponent>(parent).unwrap();
        world.set_parent(child, parent_id).unwrap();

        let matrix = world.entity_world_matrix(child).unwrap();
        let origin = matrix.transform_point(&nalgebra::Point3::origin());
        assert_relative_eq!(origin.coords, Vec3::new(1.0, 3.0, 3.0), epsilon = 1e-6);
    }

    #[test]
    fn test_main_camera_slot_supersedes() {
        let mut world = World::new();
        let first = world.create_entity("first");
        let second = world.create_entity("second");
        let cam_a = world.add_component(first, CameraComponent::default()).unwrap();
        let cam_b = world.add_component(second, CameraComponent::default()).unwrap();

        world.set_main_camera(cam_a);
        world.set_main_camera(cam_b);
        assert_eq!(world.main_camera(), Some(cam_b));
    }
}
