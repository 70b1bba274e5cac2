use crate::api::types::{category, EntityId, Rect};
use crate::components::player::Player;
use crate::components::visual::Visual;
use crate::controllers::Controller;
use crate::core::contact::GroundSensor;
use crate::core::physics::PhysicsBody;
use crate::systems::lighting::PointLight;

/// The closed set of entity kinds a level can contain.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    /// The invisible floor spanning the level width.
    StaticGround,
    /// A rectangle from the map's "Physics" layer.
    Platform,
    Player(Player),
    Lamp,
    Box,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::StaticGround => "ground",
            EntityKind::Platform => "platform",
            EntityKind::Player(_) => "player",
            EntityKind::Lamp => "lamp",
            EntityKind::Box => "box",
        }
    }
}

/// Fat entity: one struct with optional parts. The world owns every entity;
/// controllers and contact resolution only borrow them.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Present iff the entity takes part in the simulation.
    pub body: Option<PhysicsBody>,
    pub visual: Visual,
    pub controller: Option<Controller>,
    /// Entities that care whether they stand on something.
    pub ground_sensor: Option<GroundSensor>,
    pub light: Option<PointLight>,
    category: u16,
    collision_mask: u16,
    visible: bool,
    killed: bool,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, visual: Visual) -> Self {
        Self {
            id,
            kind,
            body: None,
            visual,
            controller: None,
            ground_sensor: None,
            light: None,
            category: 0,
            collision_mask: category::ANY,
            visible: true,
            killed: false,
        }
    }

    // -- Builder pattern --

    pub fn with_controller(mut self, controller: Controller) -> Self {
        self.controller = Some(controller);
        self
    }

    pub fn with_ground_sensor(mut self) -> Self {
        self.ground_sensor = Some(GroundSensor::new());
        self
    }

    pub fn with_light(mut self, light: PointLight) -> Self {
        self.light = Some(light);
        self
    }

    /// Category bits (what this entity is) and mask (what it collides with).
    /// Applied to the body when the world creates it.
    pub fn with_groups(mut self, category: u16, collision_mask: u16) -> Self {
        self.category = category;
        self.collision_mask = collision_mask;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    // -- Accessors --

    /// Mark for removal at the start of the next world tick. Idempotent.
    /// The player cannot be killed.
    pub fn kill(&mut self) {
        if matches!(self.kind, EntityKind::Player(_)) {
            log::warn!("ignoring kill of player entity {:?}", self.id);
            return;
        }
        self.killed = true;
    }

    pub fn is_killed(&self) -> bool {
        self.killed
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// World-space bounds of the visual.
    pub fn bounding_rectangle(&self) -> Rect {
        self.visual.bounding_rectangle()
    }

    /// Whether other entities count this one as ground.
    pub fn is_ground(&self) -> bool {
        matches!(self.kind, EntityKind::StaticGround | EntityKind::Platform)
    }

    pub fn category(&self) -> u16 {
        self.category
    }

    pub fn collision_mask(&self) -> u16 {
        self.collision_mask
    }

    pub fn is_on_ground(&self) -> bool {
        self.ground_sensor.is_some_and(|s| s.is_grounded())
    }

    pub fn player(&self) -> Option<&Player> {
        match &self.kind {
            EntityKind::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        match &mut self.kind {
            EntityKind::Player(player) => Some(player),
            _ => None,
        }
    }
}
