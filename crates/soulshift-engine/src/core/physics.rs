use glam::Vec2;
use rapier2d::prelude::*;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

use crate::api::types::{category, EntityId};

fn to_vector(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

fn from_vector(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Build a rapier filter from a 16-bit category/mask pair.
/// Category 0 is promoted to [`category::DEFAULT`] so it still collides.
fn interaction_groups(category: u16, mask: u16) -> InteractionGroups {
    let membership = if category == 0 { category::DEFAULT } else { category };
    InteractionGroups::new(
        Group::from_bits_truncate(membership as u32),
        Group::from_bits_truncate(mask as u32),
    )
}

/// Shape description for a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderDesc {
    Cuboid { half_width: f32, half_height: f32 },
    CapsuleY { half_height: f32, radius: f32 },
}

impl ColliderDesc {
    fn shape(&self) -> SharedShape {
        match *self {
            ColliderDesc::Cuboid { half_width, half_height } => SharedShape::cuboid(half_width, half_height),
            ColliderDesc::CapsuleY { half_height, radius } => SharedShape::capsule_y(half_height, radius),
        }
    }

    /// Half extents of the shape's bounding box.
    pub fn half_extents(&self) -> Vec2 {
        match *self {
            ColliderDesc::Cuboid { half_width, half_height } => Vec2::new(half_width, half_height),
            ColliderDesc::CapsuleY { half_height, radius } => Vec2::new(radius, half_height + radius),
        }
    }
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.0,
            friction: 0.5,
            density: 1.0,
        }
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    /// Only `Dynamic` and `Fixed` are used by the level.
    pub body_type: RigidBodyType,
    /// Center of the body in world space.
    pub position: Vec2,
    pub velocity: Vec2,
    pub fixed_rotation: bool,
    pub collider: ColliderDesc,
    pub category: u16,
    pub collision_mask: u16,
}

impl BodyDesc {
    /// Create a dynamic body description with the given collider shape.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            fixed_rotation: false,
            collider,
            category: 0,
            collision_mask: category::ANY,
        }
    }

    /// Create a fixed (static) body description with the given collider shape.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            body_type: RigidBodyType::Fixed,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            fixed_rotation: true,
            collider,
            category: 0,
            collision_mask: category::ANY,
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.velocity = vel;
        self
    }

    pub fn with_fixed_rotation(mut self, fixed: bool) -> Self {
        self.fixed_rotation = fixed;
        self
    }

    /// Set the category bits (what this body is) and the mask (what it collides with).
    pub fn with_groups(mut self, category: u16, collision_mask: u16) -> Self {
        self.category = category;
        self.collision_mask = collision_mask;
        self
    }
}

/// Handle pair stored on an Entity, referencing Rapier internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// A contact between two entities began or ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    /// `true` when the contact just started, `false` when it ended.
    pub started: bool,
}

/// Contact begin/end edges reported during a step, by collider.
/// rapier calls the handler through `&self`, hence the lock.
#[derive(Default)]
struct ContactLog {
    edges: Mutex<Vec<(ColliderHandle, ColliderHandle, bool)>>,
}

impl ContactLog {
    fn take(&self) -> Vec<(ColliderHandle, ColliderHandle, bool)> {
        std::mem::take(&mut *self.edges.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl EventHandler for ContactLog {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        let edge = (event.collider1(), event.collider2(), event.started());
        self.edges.lock().unwrap_or_else(PoisonError::into_inner).push(edge);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

/// Wraps the Rapier2D pipeline and keeps an explicit collider → entity index
/// so contact events resolve back to entities.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    contacts: ContactLog,
    owners: HashMap<ColliderHandle, EntityId>,
    /// Colliders removed since the last step. Their index entries live until
    /// the step that reports their final contact events.
    retired: Vec<ColliderHandle>,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity vector.
    /// Coordinates are Y-up, so downward gravity has negative Y
    /// (e.g., `Vec2::new(0.0, -1000.0)` in pixels/s²).
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: to_vector(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            contacts: ContactLog::default(),
            owners: HashMap::new(),
            retired: Vec::new(),
        }
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    /// Set solver iteration counts (velocity and position/stabilization) and
    /// the length unit contact tolerances are scaled by.
    pub fn configure_solver(
        &mut self,
        velocity_iterations: usize,
        position_iterations: usize,
        length_unit: f32,
    ) {
        if let Some(iterations) = NonZeroUsize::new(velocity_iterations) {
            self.integration_parameters.num_solver_iterations = iterations;
        }
        self.integration_parameters.num_internal_stabilization_iterations = position_iterations;
        if length_unit > 0.0 {
            self.integration_parameters.length_unit = length_unit;
        }
    }

    pub fn gravity(&self) -> Vec2 {
        from_vector(&self.gravity)
    }

    /// Create a rigid body + collider, register the collider as owned by
    /// `entity_id`, and return the handles.
    pub fn create_body(
        &mut self,
        entity_id: EntityId,
        desc: &BodyDesc,
        material: ColliderMaterial,
    ) -> PhysicsBody {
        let rb = RigidBodyBuilder::new(desc.body_type)
            .translation(to_vector(desc.position))
            .linvel(to_vector(desc.velocity))
            .locked_axes(if desc.fixed_rotation {
                LockedAxes::ROTATION_LOCKED
            } else {
                LockedAxes::empty()
            })
            .build();

        let body_handle = self.bodies.insert(rb);

        let collider = ColliderBuilder::new(desc.collider.shape())
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .collision_groups(interaction_groups(desc.category, desc.collision_mask))
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();

        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);
        self.owners.insert(collider_handle, entity_id);

        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    /// Remove a body and its collider from the simulation.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        self.retired.push(body.collider_handle);
    }

    /// Advance the simulation by one fixed step and append the contact
    /// begin/end events it produced, resolved to entities.
    pub fn step_into(&mut self, collision_events: &mut Vec<CollisionPair>) {
        let retired = std::mem::take(&mut self.retired);

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &self.contacts,
        );

        // Pairs with an unindexed collider belong to nothing we track.
        collision_events.extend(self.contacts.take().into_iter().filter_map(|(c1, c2, started)| {
            Some(CollisionPair {
                entity_a: self.collider_owner(c1)?,
                entity_b: self.collider_owner(c2)?,
                started,
            })
        }));

        for handle in retired {
            self.owners.remove(&handle);
        }
    }

    /// Apply an instantaneous impulse to a body.
    pub fn apply_impulse(&mut self, body: &PhysicsBody, impulse: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.apply_impulse(to_vector(impulse), true);
        }
    }

    /// Set the linear velocity of a body directly.
    pub fn set_velocity(&mut self, body: &PhysicsBody, vel: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linvel(to_vector(vel), true);
        }
    }

    /// Get the current linear velocity of a body.
    pub fn velocity(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| from_vector(rb.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    /// Mass of a body (zero for fixed bodies or unknown handles).
    pub fn mass(&self, body: &PhysicsBody) -> f32 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.mass())
            .unwrap_or(0.0)
    }

    /// Teleport a body's center to `pos`.
    pub fn set_position(&mut self, body: &PhysicsBody, pos: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_translation(to_vector(pos), true);
        }
    }

    /// Get the current center position and rotation of a body.
    pub fn body_position(&self, body: &PhysicsBody) -> (Vec2, f32) {
        self.bodies
            .get(body.body_handle)
            .map(|rb| (from_vector(rb.translation()), rb.rotation().angle()))
            .unwrap_or((Vec2::ZERO, 0.0))
    }

    /// Enable or disable a body. Disabled bodies take no part in the
    /// simulation and produce no contacts.
    pub fn set_enabled(&mut self, body: &PhysicsBody, enabled: bool) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_enabled(enabled);
        }
    }

    pub fn is_enabled(&self, body: &PhysicsBody) -> bool {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.is_enabled())
            .unwrap_or(false)
    }

    /// Whether the body still exists in the simulation.
    pub fn contains(&self, body: &PhysicsBody) -> bool {
        self.bodies.contains(body.body_handle)
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// The entity owning a collider, if the collider is still indexed.
    pub fn collider_owner(&self, handle: ColliderHandle) -> Option<EntityId> {
        self.owners.get(&handle).copied()
    }

    /// Query the collider shape of a physics body.
    pub fn collider_shape(&self, body: &PhysicsBody) -> Option<ColliderDesc> {
        let collider = self.colliders.get(body.collider_handle)?;
        let shape = collider.shape();
        if let Some(cuboid) = shape.as_cuboid() {
            Some(ColliderDesc::Cuboid {
                half_width: cuboid.half_extents.x,
                half_height: cuboid.half_extents.y,
            })
        } else {
            shape.as_capsule().map(|capsule| ColliderDesc::CapsuleY {
                half_height: capsule.half_height(),
                radius: capsule.radius,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crate_desc() -> BodyDesc {
        BodyDesc::dynamic(ColliderDesc::Cuboid {
            half_width: 8.0,
            half_height: 8.0,
        })
    }

    fn floor_desc() -> BodyDesc {
        BodyDesc::fixed(ColliderDesc::Cuboid {
            half_width: 500.0,
            half_height: 8.0,
        })
        .with_position(Vec2::new(500.0, 8.0))
    }

    #[test]
    fn create_and_remove_body() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world.create_body(EntityId(1), &crate_desc(), ColliderMaterial::default());
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.collider_owner(body.collider_handle), Some(EntityId(1)));
        world.remove_body(&body);
        assert_eq!(world.body_count(), 0);
        assert!(!world.contains(&body));
    }

    #[test]
    fn removed_collider_leaves_index_after_next_step() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        world.set_dt(1.0 / 60.0);
        let body = world.create_body(EntityId(7), &crate_desc(), ColliderMaterial::default());
        world.remove_body(&body);
        assert_eq!(world.collider_owner(body.collider_handle), Some(EntityId(7)));

        let mut events = Vec::new();
        world.step_into(&mut events);
        assert_eq!(world.collider_owner(body.collider_handle), None);
    }

    #[test]
    fn impulse_changes_velocity_by_impulse_over_mass() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        world.set_dt(1.0 / 60.0);
        let body = world.create_body(EntityId(1), &crate_desc(), ColliderMaterial::default());

        let mut events = Vec::new();
        world.step_into(&mut events);
        let mass = world.mass(&body);
        assert!(mass > 0.0);

        world.apply_impulse(&body, Vec2::new(0.0, mass * 300.0));
        let vel = world.velocity(&body);
        assert!((vel.y - 300.0).abs() < 0.5, "vel={:?}", vel);
    }

    #[test]
    fn landing_reports_started_contact_with_both_entities() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -1000.0));
        world.set_dt(1.0 / 60.0);

        world.create_body(EntityId(1), &floor_desc(), ColliderMaterial::default());
        world.create_body(
            EntityId(2),
            &crate_desc().with_position(Vec2::new(100.0, 40.0)),
            ColliderMaterial::default(),
        );

        let mut all_events = Vec::new();
        for _ in 0..60 {
            world.step_into(&mut all_events);
        }

        let started: Vec<_> = all_events.iter().filter(|e| e.started).collect();
        assert!(!started.is_empty(), "Should have at least one contact start event");
        let ids = [started[0].entity_a, started[0].entity_b];
        assert!(ids.contains(&EntityId(1)));
        assert!(ids.contains(&EntityId(2)));
    }

    #[test]
    fn filtered_groups_do_not_collide() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -1000.0));
        world.set_dt(1.0 / 60.0);

        world.create_body(
            EntityId(1),
            &floor_desc().with_groups(category::OBSTACLE, category::ANY),
            ColliderMaterial::default(),
        );
        // A prop that only collides with other props falls through the floor.
        let ghost = world.create_body(
            EntityId(2),
            &crate_desc()
                .with_position(Vec2::new(100.0, 40.0))
                .with_groups(category::PROP, category::PROP),
            ColliderMaterial::default(),
        );

        let mut events = Vec::new();
        for _ in 0..60 {
            world.step_into(&mut events);
        }

        assert!(events.is_empty());
        let (pos, _) = world.body_position(&ghost);
        assert!(pos.y < 0.0, "ghost should fall through: y={}", pos.y);
    }

    #[test]
    fn category_zero_collides_with_everything() {
        let groups = interaction_groups(0, category::ANY);
        let obstacle = interaction_groups(category::OBSTACLE, category::ANY);
        assert!(groups.test(obstacle));
    }

    #[test]
    fn disabled_body_is_skipped_by_simulation() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -1000.0));
        world.set_dt(1.0 / 60.0);
        let body = world.create_body(
            EntityId(1),
            &crate_desc().with_position(Vec2::new(0.0, 100.0)),
            ColliderMaterial::default(),
        );
        world.set_enabled(&body, false);
        assert!(!world.is_enabled(&body));

        let mut events = Vec::new();
        for _ in 0..10 {
            world.step_into(&mut events);
        }
        let (pos, _) = world.body_position(&body);
        assert!((pos.y - 100.0).abs() < 0.001, "disabled body moved: y={}", pos.y);
    }

    #[test]
    fn category_zero_ground_blocks_default_only_props() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -1000.0));
        world.set_dt(1.0 / 60.0);

        world.create_body(EntityId(1), &floor_desc().with_groups(0, category::ANY), ColliderMaterial::default());
        let prop = world.create_body(
            EntityId(2),
            &crate_desc()
                .with_position(Vec2::new(100.0, 40.0))
                .with_groups(category::PROP, category::DEFAULT),
            ColliderMaterial::default(),
        );

        let mut events = Vec::new();
        for _ in 0..60 {
            world.step_into(&mut events);
        }

        let (pos, _) = world.body_position(&prop);
        assert!(pos.y > 16.0, "prop sank into the ground: y={}", pos.y);
        assert!(events.iter().any(|e| e.started));
    }

    #[test]
    fn re_enabled_body_falls_and_touches_ground() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -1000.0));
        world.set_dt(1.0 / 60.0);
        world.create_body(EntityId(1), &floor_desc(), ColliderMaterial::default());
        let held = world.create_body(
            EntityId(2),
            &crate_desc().with_position(Vec2::new(100.0, 40.0)),
            ColliderMaterial::default(),
        );
        world.set_enabled(&held, false);

        let mut events = Vec::new();
        for _ in 0..30 {
            world.step_into(&mut events);
        }
        assert!(events.is_empty());

        world.set_enabled(&held, true);
        for _ in 0..60 {
            world.step_into(&mut events);
        }
        let landed = events
            .iter()
            .any(|e| e.started && [e.entity_a, e.entity_b].contains(&EntityId(2)));
        assert!(landed);
    }

    #[test]
    fn solver_keeps_defaults_for_unusable_settings() {
        let defaults = IntegrationParameters::default();
        let mut world = PhysicsWorld::new(Vec2::ZERO);

        world.configure_solver(0, 3, 0.0);
        let params = &world.integration_parameters;
        assert_eq!(params.num_solver_iterations, defaults.num_solver_iterations);
        assert_eq!(params.num_internal_stabilization_iterations, 3);
        assert_eq!(params.length_unit, defaults.length_unit);

        world.configure_solver(6, 2, 32.0);
        let params = &world.integration_parameters;
        assert_eq!(params.num_solver_iterations.get(), 6);
        assert_eq!(params.num_internal_stabilization_iterations, 2);
        assert_eq!(params.length_unit, 32.0);
    }

    #[test]
    fn collider_shape_round_trips_capsule_and_cuboid() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let capsule = world.create_body(
            EntityId(1),
            &BodyDesc::dynamic(ColliderDesc::CapsuleY { half_height: 12.0, radius: 12.0 }),
            ColliderMaterial::default(),
        );
        let cuboid = world.create_body(EntityId(2), &floor_desc(), ColliderMaterial::default());

        assert_eq!(
            world.collider_shape(&capsule),
            Some(ColliderDesc::CapsuleY { half_height: 12.0, radius: 12.0 })
        );
        assert_eq!(
            world.collider_shape(&cuboid),
            Some(ColliderDesc::Cuboid { half_width: 500.0, half_height: 8.0 })
        );
    }

    #[test]
    fn capsule_half_extents_include_caps() {
        let shape = ColliderDesc::CapsuleY { half_height: 12.0, radius: 12.0 };
        assert_eq!(shape.half_extents(), Vec2::new(12.0, 24.0));
    }
}
