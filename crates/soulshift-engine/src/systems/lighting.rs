//! Point lights carried by lamp entities.
//!
//! The simulation only owns light parameters; shading happens in the host.
//! Lights are packed as `[x, y, r, g, b, intensity, radius, pad]`.

use glam::Vec2;

/// A 2D point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub pos: Vec2,
    pub color: [f32; 3],
    /// Current intensity, after flicker.
    pub intensity: f32,
    /// Unflickered intensity.
    pub base_intensity: f32,
    /// Falloff distance in world units.
    pub radius: f32,
}

impl PointLight {
    pub const FLOATS: usize = 8;

    pub fn new(pos: Vec2, color: [f32; 3], intensity: f32, radius: f32) -> Self {
        Self {
            pos,
            color,
            intensity,
            base_intensity: intensity,
            radius,
        }
    }

    /// Dim the light by `amount` (0 = full base intensity, 1 = dark).
    pub fn dim(&mut self, amount: f32) {
        self.intensity = self.base_intensity * (1.0 - amount.clamp(0.0, 1.0));
    }

    pub fn to_floats(&self) -> [f32; Self::FLOATS] {
        [
            self.pos.x,
            self.pos.y,
            self.color[0],
            self.color[1],
            self.color[2],
            self.intensity,
            self.radius,
            0.0,
        ]
    }
}

/// Pack lights into a flat float buffer for the host renderer.
pub fn pack_lights<'a>(lights: impl Iterator<Item = &'a PointLight>, out: &mut Vec<f32>) {
    out.clear();
    for light in lights {
        out.extend_from_slice(&light.to_floats());
    }
}
