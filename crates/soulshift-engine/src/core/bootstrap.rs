//! Entity factories used to populate a world from a level map.
//!
//! Each factory returns the entity together with the body it should get, and
//! leaves body creation to the world so the collider index stays in one place.

use glam::Vec2;

use crate::api::config::WorldConfig;
use crate::api::types::{category, EntityId};
use crate::assets::level::{LevelMap, MapObject, SPAWN_OBJECT};
use crate::assets::registry::{SpriteRegistry, PLAYER_IDLE, PLAYER_WALK, TORCH};
use crate::components::animation::AnimationComponent;
use crate::components::entity::{Entity, EntityKind};
use crate::components::player::Player;
use crate::components::sprite::SpriteComponent;
use crate::components::visual::Visual;
use crate::controllers::player::{IDLE_ANIMATION, WALK_ANIMATION};
use crate::controllers::{Controller, LampController, PlayerController};
use crate::core::physics::{BodyDesc, ColliderDesc, ColliderMaterial};
use crate::systems::lighting::PointLight;

pub const LAMP_OBJECT: &str = "Lamp";
pub const TORCH_OBJECT: &str = "Torch";

const GROUND_HALF_HEIGHT: f32 = 0.5;
const GROUND_CENTER_Y: f32 = 1.0;

/// An entity waiting to be added to the world, with the body to create for it.
pub struct Blueprint {
    pub entity: Entity,
    pub body: Option<(BodyDesc, ColliderMaterial)>,
}

impl Blueprint {
    fn visual_only(entity: Entity) -> Self {
        Self { entity, body: None }
    }

    fn with_body(entity: Entity, desc: BodyDesc, material: ColliderMaterial) -> Self {
        Self {
            entity,
            body: Some((desc, material)),
        }
    }
}

/// The floor spanning the full map width.
pub fn ground(id: EntityId, map: &LevelMap) -> Blueprint {
    let half = Vec2::new(map.pixel_width() / 2.0, GROUND_HALF_HEIGHT);
    let center = Vec2::new(half.x, GROUND_CENTER_Y);
    let visual = Visual::new(SpriteComponent::default(), half * 2.0).with_position(center - half);
    let entity = Entity::new(id, EntityKind::StaticGround, visual)
        .with_groups(0, category::ANY)
        .with_visible(false);
    let desc = BodyDesc::fixed(ColliderDesc::Cuboid {
        half_width: half.x,
        half_height: half.y,
    })
    .with_position(center);
    Blueprint::with_body(entity, desc, ColliderMaterial::default())
}

/// A static rectangle from the physics layer. Drawn by the tile map, not by
/// the entity renderer.
pub fn platform(id: EntityId, object: &MapObject) -> Blueprint {
    let rect = object.rect();
    let visual = Visual::new(SpriteComponent::default(), Vec2::new(rect.width, rect.height))
        .with_position(Vec2::new(rect.x, rect.y));
    let entity = Entity::new(id, EntityKind::Platform, visual)
        .with_groups(category::OBSTACLE, category::ANY)
        .with_visible(false);
    let half = rect.half_extents();
    let desc = BodyDesc::fixed(ColliderDesc::Cuboid {
        half_width: half.x,
        half_height: half.y,
    })
    .with_position(rect.center());
    Blueprint::with_body(entity, desc, ColliderMaterial::default())
}

/// The player, standing with the bottom-left of its visual at the spawn point.
pub fn player(id: EntityId, spawn: &MapObject, config: &WorldConfig, sprites: &SpriteRegistry) -> Blueprint {
    let pc = config.player;
    let half = Vec2::new(pc.half_width, pc.half_height);

    let mut animation = AnimationComponent::default();
    let mut sprite = SpriteComponent::default();
    if let Some(walk) = sprites.animation(PLAYER_WALK) {
        sprite.atlas = walk.atlas;
        animation.add(WALK_ANIMATION, walk.def);
    }
    if let Some(idle) = sprites.animation(PLAYER_IDLE) {
        animation.add(IDLE_ANIMATION, idle.def);
    }
    animation.play(IDLE_ANIMATION);

    let visual = Visual::new(sprite, half * 2.0)
        .with_position(Vec2::new(spawn.x, spawn.y))
        .with_animation(animation);
    let center = visual.center();

    let entity = Entity::new(id, EntityKind::Player(Player::new()), visual)
        .with_controller(Controller::Player(PlayerController::new(pc, config.keys.clone())))
        .with_ground_sensor()
        .with_groups(category::PLAYER, category::ANY);

    let radius = pc.half_width;
    let desc = BodyDesc::dynamic(ColliderDesc::CapsuleY {
        half_height: (pc.half_height - radius).max(0.0),
        radius,
    })
    .with_position(center)
    .with_fixed_rotation(true);
    let material = ColliderMaterial {
        restitution: 0.0,
        friction: pc.friction,
        density: pc.density,
    };
    Blueprint::with_body(entity, desc, material)
}

/// An object from the entities layer. Returns `None` for the spawn marker
/// and for objects that are not tiles.
pub fn map_entity(
    id: EntityId,
    object: &MapObject,
    map: &LevelMap,
    config: &WorldConfig,
    sprites: &SpriteRegistry,
) -> Option<Blueprint> {
    if object.name == SPAWN_OBJECT {
        return None;
    }
    let Some(tile) = object.tile else {
        log::warn!("skipping unknown map object '{}' at ({}, {})", object.name, object.x, object.y);
        return None;
    };

    let size = Vec2::new(
        if object.width > 0.0 { object.width } else { map.tile_width as f32 },
        if object.height > 0.0 { object.height } else { map.tile_height as f32 },
    );
    let pos = Vec2::new(object.x, object.y);
    let seed = config.seed.wrapping_add(u64::from(id.0));

    let blueprint = match object.name.as_str() {
        LAMP_OBJECT => {
            let visual = Visual::new(sprites.tile(tile), size).with_position(pos);
            let light = PointLight::new(visual.center(), [1.0, 0.9, 0.7], 1.0, 160.0);
            Blueprint::visual_only(
                Entity::new(id, EntityKind::Lamp, visual)
                    .with_light(light)
                    .with_controller(Controller::Lamp(LampController::new(seed, config.lamp_flicker))),
            )
        }
        TORCH_OBJECT => {
            let mut visual = Visual::new(sprites.tile(tile), size).with_position(pos);
            if let Some(clip) = sprites.animation(TORCH) {
                visual.sprite.atlas = clip.atlas;
                visual = visual.with_animation(AnimationComponent::single(TORCH, clip.def));
            }
            let light = PointLight::new(visual.center(), [1.0, 0.6, 0.3], 1.0, 200.0);
            Blueprint::visual_only(
                Entity::new(id, EntityKind::Lamp, visual)
                    .with_light(light)
                    .with_controller(Controller::Lamp(LampController::new(seed, config.lamp_flicker))),
            )
        }
        _ => {
            let visual = Visual::new(sprites.tile(tile), size).with_position(pos);
            let center = visual.center();
            let entity = Entity::new(id, EntityKind::Box, visual)
                .with_controller(Controller::Static)
                .with_groups(category::PROP, category::ANY);
            let desc = BodyDesc::dynamic(ColliderDesc::Cuboid {
                half_width: size.x / 2.0,
                half_height: size.y / 2.0,
            })
            .with_position(center);
            Blueprint::with_body(entity, desc, ColliderMaterial::default())
        }
    };

    log::debug!(
        "map object '{}' -> {} {:?} at ({}, {})",
        object.name,
        blueprint.entity.kind.name(),
        id,
        object.x,
        object.y
    );
    Some(blueprint)
}
