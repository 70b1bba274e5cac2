use glam::Vec2;

use crate::api::config::WorldConfig;
use crate::api::types::EntityId;
use crate::assets::level::{LevelMap, ENTITIES_LAYER, PHYSICS_LAYER};
use crate::assets::registry::SpriteRegistry;
use crate::components::entity::Entity;
use crate::core::bootstrap::{self, Blueprint};
use crate::core::contact::{ContactSubjects, GroundCheckListener, GroundSensor};
use crate::core::physics::{BodyDesc, ColliderMaterial, CollisionPair, PhysicsWorld};
use crate::core::scene::Scene;
use crate::core::time::FixedTimestep;
use crate::controllers::{Controller, Touch};
use crate::error::WorldError;
use crate::systems::lighting::PointLight;

/// The simulated level: physics, entities, the fixed-step clock and the map
/// they were built from.
pub struct World {
    config: WorldConfig,
    physics: PhysicsWorld,
    /// Live entities, in insertion order.
    scene: Scene,
    /// Ground and platforms. Never pruned, never drawn.
    statics: Vec<Entity>,
    map: LevelMap,
    timestep: FixedTimestep,
    ground_check: GroundCheckListener,
    collision_events: Vec<CollisionPair>,
    player_id: EntityId,
    next_id: u32,
    last_frame_dt: f32,
    step_count: u64,
}

impl World {
    /// Build a world from a parsed map: ground, platforms from the physics
    /// layer, the player at the spawn marker, then the entities layer.
    pub fn new(map: LevelMap, sprites: &SpriteRegistry, config: WorldConfig) -> Result<Self, WorldError> {
        config.validate()?;
        map.validate()?;
        let physics_layer = map.layer(PHYSICS_LAYER)?.clone();
        let entities_layer = map.layer(ENTITIES_LAYER)?.clone();
        let spawn = map.spawn()?.clone();

        let mut physics = PhysicsWorld::new(config.gravity());
        physics.set_dt(config.fixed_dt);
        physics.configure_solver(config.velocity_iterations, config.position_iterations, config.length_unit);

        let mut world = Self {
            timestep: FixedTimestep::new(config.fixed_dt, config.max_frame_dt),
            physics,
            scene: Scene::new(),
            statics: Vec::new(),
            map,
            ground_check: GroundCheckListener::new(),
            collision_events: Vec::new(),
            player_id: EntityId(0),
            next_id: 1,
            last_frame_dt: 0.0,
            step_count: 0,
            config,
        };

        let id = world.next_id();
        let ground = bootstrap::ground(id, &world.map);
        world.build_static(ground);

        for object in &physics_layer.objects {
            let id = world.next_id();
            world.build_static(bootstrap::platform(id, object));
        }

        let id = world.next_id();
        let player = bootstrap::player(id, &spawn, &world.config, sprites);
        world.player_id = world.build(player);

        for object in &entities_layer.objects {
            let id = world.next_id();
            if let Some(blueprint) = bootstrap::map_entity(id, object, &world.map, &world.config, sprites) {
                world.build(blueprint);
            }
        }

        log::info!(
            "world ready: {}x{} px, {} platforms, {} entities",
            world.width(),
            world.height(),
            world.statics.len() - 1,
            world.scene.len()
        );
        Ok(world)
    }

    /// Parse a map and a manifest and build a world from them.
    pub fn from_json(map_json: &str, manifest_json: &str, config: WorldConfig) -> Result<Self, WorldError> {
        let map = LevelMap::from_json(map_json)?;
        let manifest = crate::assets::manifest::AssetManifest::from_json(manifest_json)?;
        Self::new(map, &SpriteRegistry::from_manifest(&manifest), config)
    }

    fn build_static(&mut self, blueprint: Blueprint) {
        let Blueprint { mut entity, body } = blueprint;
        if let Some((desc, material)) = body {
            self.attach_body(&mut entity, desc, material);
        }
        self.statics.push(entity);
    }

    fn build(&mut self, blueprint: Blueprint) -> EntityId {
        let Blueprint { entity, body } = blueprint;
        match body {
            Some((desc, material)) => self.spawn_with_body(entity, desc, material),
            None => {
                let id = entity.id;
                self.add_entity(entity);
                id
            }
        }
    }

    fn attach_body(&mut self, entity: &mut Entity, desc: BodyDesc, material: ColliderMaterial) {
        let desc = desc.with_groups(entity.category(), entity.collision_mask());
        entity.body = Some(self.physics.create_body(entity.id, &desc, material));
        entity.visual.set_center(desc.position);
    }

    // -- Lifecycle --

    /// Allocate a fresh entity handle.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append an entity to the live collection. No uniqueness check.
    pub fn add_entity(&mut self, entity: Entity) {
        self.scene.spawn(entity);
    }

    /// Create the entity's body (with the entity's category and mask) and
    /// append the entity.
    pub fn spawn_with_body(&mut self, mut entity: Entity, desc: BodyDesc, material: ColliderMaterial) -> EntityId {
        self.attach_body(&mut entity, desc, material);
        let id = entity.id;
        self.scene.spawn(entity);
        id
    }

    /// Advance the world by one presentation frame.
    pub fn tick(&mut self, dt: f32) {
        let dt = self.timestep.clamp_frame(dt);
        self.last_frame_dt = dt;

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.collision_events.clear();
            self.physics.step_into(&mut self.collision_events);
            self.step_count += 1;

            let mut subjects = Subjects {
                scene: &mut self.scene,
                statics: &self.statics,
            };
            self.ground_check.resolve(&mut subjects, &self.collision_events);
        }

        self.prune_killed();
        self.sync_visuals();

        let physics = &mut self.physics;
        self.scene
            .for_each_controller(|controller, entity| controller.act(entity, physics, dt));
    }

    fn prune_killed(&mut self) {
        let removed = self.scene.prune_killed();
        if removed.is_empty() {
            return;
        }

        for entity in &removed {
            if let Some(body) = entity.body {
                self.physics.remove_body(&body);
            }
            log::debug!("removed {} {:?}", entity.kind.name(), entity.id);
        }

        if let Some(player) = self.scene.get_mut(self.player_id).and_then(Entity::player_mut) {
            if player.consumed.is_some_and(|held| removed.iter().any(|e| e.id == held)) {
                player.consumed = None;
            }
        }
    }

    /// Copy body positions onto visuals. A consumed entity is carried at the
    /// player's center instead.
    fn sync_visuals(&mut self) {
        let (player_center, held) = match self.scene.get(self.player_id) {
            Some(player) => (
                player
                    .body
                    .map(|b| self.physics.body_position(&b).0)
                    .unwrap_or_else(|| player.visual.center()),
                player.player().and_then(|p| p.consumed),
            ),
            None => (Vec2::ZERO, None),
        };

        for entity in self.scene.iter_mut() {
            if Some(entity.id) == held {
                if let Some(body) = entity.body {
                    self.physics.set_position(&body, player_center);
                }
                entity.visual.set_center(player_center);
                if let Some(light) = entity.light.as_mut() {
                    light.pos = player_center;
                }
                continue;
            }
            if let Some(body) = entity.body {
                let (pos, _) = self.physics.body_position(&body);
                entity.visual.set_center(pos);
            }
        }
    }

    // -- Input --

    /// Offer a key press to each controller in collection order. Returns true
    /// once one claims it; later controllers never see the event.
    pub fn on_key_pressed(&mut self, key_code: u32) -> bool {
        let physics = &mut self.physics;
        let claimed = self
            .scene
            .dispatch_first(|controller, entity| controller.on_key_pressed(entity, physics, key_code));
        log::trace!("key {key_code} pressed, claimed: {claimed}");
        claimed
    }

    pub fn on_key_released(&mut self, key_code: u32) -> bool {
        let physics = &mut self.physics;
        let claimed = self
            .scene
            .dispatch_first(|controller, entity| controller.on_key_released(entity, physics, key_code));
        log::trace!("key {key_code} released, claimed: {claimed}");
        claimed
    }

    /// Route a pointer press in world coordinates to the player's controller.
    pub fn touch_down(&mut self, x: f32, y: f32, pointer: u32, button: u32) -> bool {
        let Some((player, mut others)) = self.scene.split_around(self.player_id) else {
            log::error!("touch routed with no player in the world");
            debug_assert!(false, "world has no player");
            return false;
        };
        let Some(mut controller) = player.controller.take() else {
            log::error!("player {:?} has no controller", player.id);
            debug_assert!(false, "player has no controller");
            return false;
        };
        debug_assert!(matches!(controller, Controller::Player(_)));

        let claimed = controller.on_touch_down(player, &mut others, &mut self.physics, Touch::new(x, y, pointer, button));
        player.controller = Some(controller);
        log::trace!("touch ({x:.1}, {y:.1}) button {button}, claimed: {claimed}");
        claimed
    }

    // -- Queries --

    /// First live entity, in collection order, whose bounds contain the point.
    pub fn first_entity_with_point(&self, x: f32, y: f32) -> Option<&Entity> {
        self.scene.first_with_point(x, y)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.scene.iter()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.scene.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.scene.get_mut(id)
    }

    pub fn player(&self) -> Option<&Entity> {
        self.scene.get(self.player_id)
    }

    pub fn player_id(&self) -> EntityId {
        self.player_id
    }

    /// Ground and platforms.
    pub fn statics(&self) -> &[Entity] {
        &self.statics
    }

    /// Lights of visible entities.
    pub fn lights(&self) -> impl Iterator<Item = &PointLight> {
        self.scene
            .iter()
            .filter(|e| e.is_visible())
            .filter_map(|e| e.light.as_ref())
    }

    /// Map width in pixels.
    pub fn width(&self) -> f32 {
        self.map.pixel_width()
    }

    /// Map height in pixels.
    pub fn height(&self) -> f32 {
        self.map.pixel_height()
    }

    pub fn gravity(&self) -> Vec2 {
        self.physics.gravity()
    }

    pub fn map(&self) -> &LevelMap {
        &self.map
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// Physics steps taken since construction.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Fraction of a fixed step left in the accumulator, for interpolation.
    pub fn alpha(&self) -> f32 {
        self.timestep.alpha()
    }

    /// Lines for the debug overlay.
    pub fn debug_strings(&self) -> Vec<String> {
        let fps = if self.last_frame_dt > 0.0 { 1.0 / self.last_frame_dt } else { 0.0 };
        let mut lines = vec![format!("fps: {fps:.0}"), format!("entities count: {}", self.scene.len())];

        if let Some(entity) = self.player() {
            if let Some(player) = entity.player() {
                lines.push(format!("consumed soul: {}", player.consumed.is_some()));
                lines.push(format!("player x: {:.1}", entity.visual.pos.x));
                lines.push(format!("player y: {:.1}", entity.visual.pos.y));
                lines.push(format!("player grounded: {}", entity.is_on_ground()));
                lines.push(format!("player direction: {}", player.direction.sign()));
                lines.push(format!("player state: {}", player.state));
            }
        }
        lines
    }
}

/// Contact resolution's view of the world: statics are ground, live entities
/// carry the sensors.
struct Subjects<'a> {
    scene: &'a mut Scene,
    statics: &'a [Entity],
}

impl ContactSubjects for Subjects<'_> {
    fn is_ground(&self, id: EntityId) -> bool {
        match self.statics.iter().find(|e| e.id == id) {
            Some(entity) => entity.is_ground(),
            None => self.scene.get(id).is_some_and(Entity::is_ground),
        }
    }

    fn ground_sensor_mut(&mut self, id: EntityId) -> Option<&mut GroundSensor> {
        self.scene.get_mut(id)?.ground_sensor.as_mut()
    }
}
