use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::input::keys::KeyBindings;

/// Configuration for a world. Every field has a default so a partial JSON
/// document only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Fixed physics timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Frame deltas above this are clamped before accumulation (default: 0.25).
    pub max_frame_dt: f32,
    /// Gravity in pixels/s². Y-up, so downward gravity is negative.
    pub gravity: [f32; 2],
    /// Constraint solver velocity iterations per step.
    pub velocity_iterations: usize,
    /// Constraint solver position (stabilization) iterations per step.
    pub position_iterations: usize,
    /// Approximate size of a typical dynamic object, in pixels.
    /// Scales the solver's contact tolerances to pixel units.
    pub length_unit: f32,
    pub player: PlayerConfig,
    pub keys: KeyBindings,
    /// Peak fraction of a lamp's base intensity removed by flicker.
    pub lamp_flicker: f32,
    /// Seed for lamp flicker noise.
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_frame_dt: 0.25,
            gravity: [0.0, -1000.0],
            velocity_iterations: 6,
            position_iterations: 2,
            length_unit: 32.0,
            player: PlayerConfig::default(),
            keys: KeyBindings::default(),
            lamp_flicker: 0.15,
            seed: 35,
        }
    }
}

impl WorldConfig {
    /// Parse a config from a JSON string. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, WorldError> {
        let config: Self = serde_json::from_str(json).map_err(WorldError::Config)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject timing values the fixed-step clock cannot run with: the step
    /// must be finite and positive, the frame clamp finite and non-negative.
    pub fn validate(&self) -> Result<(), WorldError> {
        if !self.fixed_dt.is_finite() || self.fixed_dt <= 0.0 {
            return Err(WorldError::InvalidConfig { field: "fixed_dt", value: self.fixed_dt });
        }
        if !self.max_frame_dt.is_finite() || self.max_frame_dt < 0.0 {
            return Err(WorldError::InvalidConfig { field: "max_frame_dt", value: self.max_frame_dt });
        }
        Ok(())
    }

    pub fn gravity(&self) -> Vec2 {
        Vec2::from(self.gravity)
    }
}

/// Player body size and movement tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub half_width: f32,
    pub half_height: f32,
    /// Horizontal speed cap in pixels/s.
    pub max_speed: f32,
    /// Upward velocity change from a jump. Applied as an impulse scaled by
    /// the body's mass.
    pub jump_speed: f32,
    /// Maximum distance from the player's center to a touched entity's center
    /// for it to be consumed.
    pub interaction_range: f32,
    pub density: f32,
    pub friction: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            half_width: 12.0,
            half_height: 24.0,
            max_speed: 200.0,
            jump_speed: 480.0,
            interaction_range: 160.0,
            density: 1.0,
            friction: 0.0,
        }
    }
}
