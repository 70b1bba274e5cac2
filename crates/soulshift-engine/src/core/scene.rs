use crate::api::types::EntityId;
use crate::components::entity::Entity;
use crate::controllers::{Controller, Neighbours};

/// Simple entity storage using a flat Vec. Insertion order is the order
/// controllers act in and input is dispatched in.
/// Designed for small-to-medium entity counts (hundreds, not millions).
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(64),
        }
    }

    /// Add an entity at the end of the collection.
    pub fn spawn(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Get a reference to an entity by ID.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Get a mutable reference to an entity by ID.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Remove every killed entity, keeping the survivors in order.
    /// Returns the removed entities in collection order.
    pub fn prune_killed(&mut self) -> Vec<Entity> {
        if !self.entities.iter().any(Entity::is_killed) {
            return Vec::new();
        }
        let (removed, kept) = std::mem::take(&mut self.entities)
            .into_iter()
            .partition(Entity::is_killed);
        self.entities = kept;
        removed
    }

    /// First entity, in collection order, whose bounds contain the point.
    pub fn first_with_point(&self, x: f32, y: f32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.bounding_rectangle().contains(x, y))
    }

    /// Borrow one entity mutably alongside a view of all the others.
    pub fn split_around(&mut self, id: EntityId) -> Option<(&mut Entity, Neighbours<'_>)> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Neighbours::split(&mut self.entities, index)
    }

    /// Offer an event to each entity's controller in order. Stops at the
    /// first handler that returns true.
    pub fn dispatch_first(&mut self, mut handler: impl FnMut(&mut Controller, &mut Entity) -> bool) -> bool {
        for entity in self.entities.iter_mut() {
            let Some(mut controller) = entity.controller.take() else {
                continue;
            };
            let claimed = handler(&mut controller, entity);
            entity.controller = Some(controller);
            if claimed {
                return true;
            }
        }
        false
    }

    /// Run `handler` on every entity that has a controller, in order.
    pub fn for_each_controller(&mut self, mut handler: impl FnMut(&mut Controller, &mut Entity)) {
        for entity in self.entities.iter_mut() {
            if let Some(mut controller) = entity.controller.take() {
                handler(&mut controller, entity);
                entity.controller = Some(controller);
            }
        }
    }

    /// Number of entities in the scene.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
