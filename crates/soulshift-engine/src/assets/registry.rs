use std::collections::HashMap;

use crate::assets::level::TileImage;
use crate::assets::manifest::AssetManifest;
use crate::components::animation::AnimationDef;
use crate::components::sprite::{AtlasId, BlendMode, SpriteComponent};

pub const PLAYER_WALK: &str = "player_walk";
pub const PLAYER_IDLE: &str = "player_idle";
pub const TORCH: &str = "torch";

/// An animation strip together with the atlas it lives in.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub atlas: AtlasId,
    pub def: AnimationDef,
}

/// Registry of named sprites and animations, built from an AssetManifest.
/// Provides name-based lookup for world bootstrap.
pub struct SpriteRegistry {
    sprites: HashMap<String, SpriteComponent>,
    animations: HashMap<String, AnimationClip>,
}

impl SpriteRegistry {
    pub fn new() -> Self {
        Self {
            sprites: HashMap::new(),
            animations: HashMap::new(),
        }
    }

    /// Build a registry from a parsed AssetManifest.
    pub fn from_manifest(manifest: &AssetManifest) -> Self {
        let mut sprites = HashMap::with_capacity(manifest.sprites.len());
        for (name, desc) in &manifest.sprites {
            sprites.insert(
                name.clone(),
                SpriteComponent {
                    atlas: AtlasId(desc.atlas),
                    col: desc.col as f32,
                    row: desc.row as f32,
                    cell_span: desc.span as f32,
                    alpha: 1.0,
                    blend: BlendMode::Alpha,
                },
            );
        }

        let mut animations = HashMap::with_capacity(manifest.animations.len());
        for (name, desc) in &manifest.animations {
            let mut def =
                AnimationDef::horizontal_strip(desc.row as f32, desc.start_col as f32, desc.frames, desc.frame_duration);
            def.looping = desc.looping;
            animations.insert(
                name.clone(),
                AnimationClip {
                    atlas: AtlasId(desc.atlas),
                    def,
                },
            );
        }

        Self { sprites, animations }
    }

    /// Look up a sprite by name. Returns None if not found.
    pub fn get(&self, name: &str) -> Option<&SpriteComponent> {
        self.sprites.get(name)
    }

    /// Look up an animation by name, falling back to the built-in strip for
    /// the names the world bootstrap uses.
    pub fn animation(&self, name: &str) -> Option<AnimationClip> {
        if let Some(clip) = self.animations.get(name) {
            return Some(clip.clone());
        }
        let fallback = builtin_animation(name)?;
        log::debug!("animation '{name}' not in manifest, using built-in strip");
        Some(fallback)
    }

    /// The sprite a map tile object is drawn with.
    pub fn tile(&self, tile: TileImage) -> SpriteComponent {
        SpriteComponent::cell(AtlasId(tile.atlas), tile.col as f32, tile.row as f32)
    }
}

impl Default for SpriteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn builtin_animation(name: &str) -> Option<AnimationClip> {
    let (atlas, def) = match name {
        PLAYER_WALK => (0, AnimationDef::horizontal_strip(0.0, 0.0, 12, 0.05)),
        PLAYER_IDLE => (0, AnimationDef::still(0.0, 0.0)),
        TORCH => (1, AnimationDef::horizontal_strip(0.0, 0.0, 8, 0.06)),
        _ => return None,
    };
    Some(AnimationClip {
        atlas: AtlasId(atlas),
        def,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_from_manifest() {
        let json = r#"{
            "atlases": [
                { "name": "tiles", "cols": 16, "rows": 8, "path": "tiles.png" }
            ],
            "sprites": {
                "box": { "atlas": 0, "col": 3, "row": 5, "span": 2 }
            },
            "animations": {
                "torch": { "atlas": 2, "row": 4, "start_col": 1, "frames": 6, "frame_duration": 0.1 }
            }
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        let reg = SpriteRegistry::from_manifest(&manifest);

        let sprite = reg.get("box").expect("box should exist");
        assert_eq!(sprite.atlas, AtlasId(0));
        assert_eq!(sprite.col, 3.0);
        assert_eq!(sprite.row, 5.0);
        assert_eq!(sprite.cell_span, 2.0);
        assert_eq!(sprite.alpha, 1.0);

        let torch = reg.animation(TORCH).unwrap();
        assert_eq!(torch.atlas, AtlasId(2));
        assert_eq!(torch.def.frame_count(), 6);
        assert_eq!(torch.def.frames[0], (1.0, 4.0));
    }

    #[test]
    fn builtin_fallbacks() {
        let reg = SpriteRegistry::new();
        let torch = reg.animation(TORCH).unwrap();
        assert_eq!(torch.def.frame_count(), 8);
        assert!((torch.def.frame_duration - 0.06).abs() < 1e-6);
        assert_eq!(reg.animation(PLAYER_WALK).unwrap().def.frame_count(), 12);
        assert!(reg.animation("nonexistent").is_none());
    }

    #[test]
    fn tile_sprite() {
        let reg = SpriteRegistry::new();
        let sprite = reg.tile(TileImage { atlas: 3, col: 4, row: 1 });
        assert_eq!(sprite, SpriteComponent::cell(AtlasId(3), 4.0, 1.0));
    }
}
