pub mod api;
pub mod assets;
pub mod components;
pub mod controllers;
pub mod core;
pub mod error;
pub mod input;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::{PlayerConfig, WorldConfig};
pub use api::types::{category, EntityId, Rect};
pub use assets::level::{LevelMap, MapObject, ObjectLayer, TileImage};
pub use assets::manifest::AssetManifest;
pub use assets::registry::SpriteRegistry;
pub use components::animation::{AnimationComponent, AnimationDef};
pub use components::entity::{Entity, EntityKind};
pub use components::player::{Direction, Player, PlayerState};
pub use components::sprite::{AtlasId, BlendMode, SpriteComponent};
pub use components::visual::Visual;
pub use controllers::{Controller, LampController, PlayerController, Touch};
pub use core::contact::{GroundCheckListener, GroundSensor};
pub use core::physics::{BodyDesc, ColliderDesc, ColliderMaterial, CollisionPair, PhysicsBody, PhysicsWorld};
pub use core::time::FixedTimestep;
pub use core::world::World;
pub use error::{LevelError, WorldError};
pub use input::keys::{codes, KeyBindings};
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::camera::Camera2D;
pub use renderer::instance::{RenderBuffer, RenderInstance};
pub use renderer::parallax::{ParallaxBackground, ParallaxLayer};
pub use systems::lighting::{pack_lights, PointLight};
pub use systems::render::build_render_buffer;
