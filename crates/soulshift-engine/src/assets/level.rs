//! Parsed level layout: map dimensions plus named object layers.
//!
//! Coordinates are Y-up with the origin at the bottom-left of the map.
//! An object's `(x, y)` is its bottom-left corner.

use serde::{Deserialize, Serialize};

use crate::api::types::Rect;
use crate::error::LevelError;

pub const PHYSICS_LAYER: &str = "Physics";
pub const ENTITIES_LAYER: &str = "Entities";
pub const SPAWN_OBJECT: &str = "Spawn";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelMap {
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    #[serde(default)]
    pub layers: Vec<ObjectLayer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectLayer {
    pub name: String,
    #[serde(default)]
    pub objects: Vec<MapObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    #[serde(default)]
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    /// Present on tile objects: the atlas cell the object is drawn with.
    #[serde(default)]
    pub tile: Option<TileImage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileImage {
    pub atlas: u32,
    pub col: u32,
    pub row: u32,
}

impl MapObject {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

impl LevelMap {
    /// Parse and validate a map from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let map: LevelMap = serde_json::from_str(json)?;
        map.validate()?;
        Ok(map)
    }

    /// Every dimension must be non-zero and the pixel size must fit in a `u32`.
    pub fn validate(&self) -> Result<(), LevelError> {
        let empty = self.width == 0 || self.height == 0 || self.tile_width == 0 || self.tile_height == 0;
        let overflows = self.width.checked_mul(self.tile_width).is_none()
            || self.height.checked_mul(self.tile_height).is_none();
        if empty || overflows {
            return Err(LevelError::InvalidDimensions {
                width: self.width,
                height: self.height,
                tile_width: self.tile_width,
                tile_height: self.tile_height,
            });
        }
        Ok(())
    }

    /// Map width in pixels.
    pub fn pixel_width(&self) -> f32 {
        self.width.saturating_mul(self.tile_width) as f32
    }

    /// Map height in pixels.
    pub fn pixel_height(&self) -> f32 {
        self.height.saturating_mul(self.tile_height) as f32
    }

    pub fn layer(&self, name: &str) -> Result<&ObjectLayer, LevelError> {
        self.layers
            .iter()
            .find(|l| l.name == name)
            .ok_or_else(|| LevelError::MissingLayer(name.to_string()))
    }

    /// The first `Spawn` object of the entities layer.
    pub fn spawn(&self) -> Result<&MapObject, LevelError> {
        self.layer(ENTITIES_LAYER)?
            .objects
            .iter()
            .find(|o| o.name == SPAWN_OBJECT)
            .ok_or(LevelError::MissingSpawn)
    }
}
