//! Per-entity behaviour. The set of behaviours is closed, so a controller is
//! an enum rather than a trait object; each variant holds its own state and
//! receives the entity it drives as a borrowed argument.

pub mod lamp;
pub mod player;

pub use lamp::LampController;
pub use player::PlayerController;

use crate::api::types::EntityId;
use crate::components::entity::Entity;
use crate::core::physics::PhysicsWorld;

/// A pointer press in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    pub x: f32,
    pub y: f32,
    pub pointer: u32,
    pub button: u32,
}

impl Touch {
    pub const PRIMARY_BUTTON: u32 = 0;

    pub fn new(x: f32, y: f32, pointer: u32, button: u32) -> Self {
        Self { x, y, pointer, button }
    }
}

#[derive(Debug, Clone)]
pub enum Controller {
    Player(PlayerController),
    /// Inert entities (boxes). Ignores every event.
    Static,
    Lamp(LampController),
}

impl Controller {
    /// Per-tick update, after physics has stepped.
    pub fn act(&mut self, entity: &mut Entity, physics: &mut PhysicsWorld, dt: f32) {
        match self {
            Controller::Player(c) => c.act(entity, physics, dt),
            Controller::Static => {}
            Controller::Lamp(c) => c.act(entity, dt),
        }
    }

    /// Returns true if the key was claimed.
    pub fn on_key_pressed(&mut self, entity: &mut Entity, physics: &mut PhysicsWorld, key_code: u32) -> bool {
        match self {
            Controller::Player(c) => c.on_key_pressed(entity, physics, key_code),
            Controller::Static | Controller::Lamp(_) => false,
        }
    }

    /// Returns true if the key was claimed.
    pub fn on_key_released(&mut self, entity: &mut Entity, physics: &mut PhysicsWorld, key_code: u32) -> bool {
        match self {
            Controller::Player(c) => c.on_key_released(entity, physics, key_code),
            Controller::Static | Controller::Lamp(_) => false,
        }
    }

    /// Returns true if the touch was claimed. `others` is every entity in the
    /// world except `entity`.
    pub fn on_touch_down(
        &mut self,
        entity: &mut Entity,
        others: &mut Neighbours<'_>,
        physics: &mut PhysicsWorld,
        touch: Touch,
    ) -> bool {
        match self {
            Controller::Player(c) => c.on_touch_down(entity, others, physics, touch),
            Controller::Static | Controller::Lamp(_) => false,
        }
    }
}

/// Mutable view of the entity collection with one entity carved out, so a
/// controller can act on other entities while its own is borrowed.
pub struct Neighbours<'a> {
    before: &'a mut [Entity],
    after: &'a mut [Entity],
}

impl<'a> Neighbours<'a> {
    /// Split `entities` around `index`. Returns `None` if out of range.
    pub fn split(entities: &'a mut [Entity], index: usize) -> Option<(&'a mut Entity, Neighbours<'a>)> {
        if index >= entities.len() {
            return None;
        }
        let (before, rest) = entities.split_at_mut(index);
        let (entity, after) = rest.split_first_mut()?;
        Some((entity, Neighbours { before, after }))
    }

    /// Collection order is preserved across the gap.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.before.iter().chain(self.after.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.before.iter_mut().chain(self.after.iter_mut())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.iter_mut().find(|e| e.id == id)
    }

    /// First entity, in collection order, whose bounds contain the point.
    pub fn first_with_point(&mut self, x: f32, y: f32) -> Option<&mut Entity> {
        self.iter_mut().find(|e| e.bounding_rectangle().contains(x, y))
    }

    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::EntityKind;
    use crate::components::sprite::SpriteComponent;
    use crate::components::visual::Visual;
    use glam::Vec2;

    fn boxed(id: u32, x: f32) -> Entity {
        let visual = Visual::new(SpriteComponent::default(), Vec2::splat(10.0)).with_position(Vec2::new(x, 0.0));
        Entity::new(EntityId(id), EntityKind::Box, visual)
    }

    #[test]
    fn split_excludes_the_carved_entity() {
        let mut entities = vec![boxed(1, 0.0), boxed(2, 0.0), boxed(3, 20.0)];
        let (me, mut others) = Neighbours::split(&mut entities, 1).unwrap();
        assert_eq!(me.id, EntityId(2));
        assert_eq!(others.len(), 2);
        assert!(others.get_mut(EntityId(2)).is_none());

        let ids: Vec<u32> = others.iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn first_with_point_skips_the_carved_entity() {
        let mut entities = vec![boxed(1, 0.0), boxed(2, 0.0), boxed(3, 0.0)];
        let (_, mut others) = Neighbours::split(&mut entities, 0).unwrap();
        assert_eq!(others.first_with_point(5.0, 5.0).map(|e| e.id), Some(EntityId(2)));
        assert!(others.first_with_point(50.0, 5.0).is_none());
    }

    #[test]
    fn split_out_of_range() {
        let mut entities = vec![boxed(1, 0.0)];
        assert!(Neighbours::split(&mut entities, 1).is_none());
    }

    #[test]
    fn static_controller_claims_nothing() {
        let mut physics = PhysicsWorld::new(Vec2::ZERO);
        let mut entity = boxed(1, 0.0);
        let mut controller = Controller::Static;
        assert!(!controller.on_key_pressed(&mut entity, &mut physics, 37));
        assert!(!controller.on_key_released(&mut entity, &mut physics, 37));

        let mut rest: Vec<Entity> = Vec::new();
        let mut others = Neighbours { before: &mut [], after: &mut rest };
        assert!(!controller.on_touch_down(&mut entity, &mut others, &mut physics, Touch::new(1.0, 1.0, 0, 0)));
    }
}
