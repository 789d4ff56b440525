//! Creation-ordered entity registry and the store contract on top of
//! `bevy_ecs::World`.
//!
//! The town never despawns entities, so the registry is append-only and its
//! order is the order systems use whenever "first" or "last" matters.

use bevy_ecs::prelude::*;

/// Every entity created through [`TownWorld::create_entity`], oldest first.
#[derive(Resource, Debug, Default, Clone)]
pub struct EntityRegistry {
    order: Vec<Entity>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entity: Entity) {
        self.order.push(entity);
    }

    pub fn entities(&self) -> &[Entity] {
        &self.order
    }
}

/// Entity/component store operations used by setup code and tests.
pub trait TownWorld {
    /// Issue a fresh entity and record it in the registry.
    fn create_entity(&mut self) -> Entity;
    /// Insert or overwrite a component.
    fn add<C: Component>(&mut self, entity: Entity, component: C);
    fn has<C: Component>(&self, entity: Entity) -> bool;
    /// Entities in creation order.
    fn entities_in_order(&self) -> Vec<Entity>;
}

impl TownWorld for World {
    fn create_entity(&mut self) -> Entity {
        let entity = self.spawn_empty().id();
        self.get_resource_or_insert_with(EntityRegistry::new)
            .push(entity);
        entity
    }

    fn add<C: Component>(&mut self, entity: Entity, component: C) {
        if let Ok(mut entity_mut) = self.get_entity_mut(entity) {
            entity_mut.insert(component);
        }
    }

    fn has<C: Component>(&self, entity: Entity) -> bool {
        self.get_entity(entity)
            .map(|e| e.contains::<C>())
            .unwrap_or(false)
    }

    fn entities_in_order(&self) -> Vec<Entity> {
        self.get_resource::<EntityRegistry>()
            .map(|r| r.entities().to_vec())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Component, Debug, PartialEq)]
    struct Marker(u8);

    #[test]
    fn test_ids_are_fresh_and_ordered() {
        let mut world = World::new();
        let a = world.create_entity();
        let b = world.create_entity();
        assert_ne!(a, b);
        assert_eq!(world.entities_in_order(), vec![a, b]);
    }

    #[test]
    fn test_add_overwrites() {
        let mut world = World::new();
        let e = world.create_entity();
        assert!(!world.has::<Marker>(e));
        world.add(e, Marker(1));
        world.add(e, Marker(2));
        assert!(world.has::<Marker>(e));
        assert_eq!(world.get::<Marker>(e), Some(&Marker(2)));
    }
}
