//! Background layers that scroll slower than the world.

use glam::Vec2;

use crate::components::sprite::AtlasId;

/// One background image. `ratio` is how much of the camera's motion the
/// layer follows: 0 stays fixed to the screen, 1 moves with the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxLayer {
    pub atlas: AtlasId,
    pub ratio: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxBackground {
    layers: Vec<ParallaxLayer>,
}

impl ParallaxBackground {
    pub const FLOATS_PER_LAYER: usize = 4;

    pub fn new(layers: Vec<ParallaxLayer>) -> Self {
        Self { layers }
    }

    /// Far, middle and near layers drawn from atlases 2, 3 and 4.
    pub fn three_layer() -> Self {
        Self::new(vec![
            ParallaxLayer { atlas: AtlasId(2), ratio: 0.1 },
            ParallaxLayer { atlas: AtlasId(3), ratio: 0.5 },
            ParallaxLayer { atlas: AtlasId(4), ratio: 0.9 },
        ])
    }

    pub fn layers(&self) -> &[ParallaxLayer] {
        &self.layers
    }

    /// World-space offset of each layer for a camera centered at `camera`.
    pub fn offsets(&self, camera: Vec2) -> impl Iterator<Item = Vec2> + '_ {
        self.layers.iter().map(move |layer| camera * layer.ratio)
    }

    /// `[atlas, ratio, offset_x, offset_y]` per layer, back to front.
    pub fn write_floats(&self, camera: Vec2, out: &mut Vec<f32>) {
        out.clear();
        for (layer, offset) in self.layers.iter().zip(self.offsets(camera)) {
            out.extend_from_slice(&[layer.atlas.0 as f32, layer.ratio, offset.x, offset.y]);
        }
    }
}
