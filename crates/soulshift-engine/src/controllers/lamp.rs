use crate::components::entity::Entity;
use crate::core::rng::Rng;

/// Animates a lamp or torch and flickers its light. Claims no input.
#[derive(Debug, Clone)]
pub struct LampController {
    rng: Rng,
    /// Peak fraction of the base intensity removed per tick.
    flicker: f32,
}

impl LampController {
    pub fn new(seed: u64, flicker: f32) -> Self {
        Self {
            rng: Rng::new(seed),
            flicker: flicker.clamp(0.0, 1.0),
        }
    }

    pub fn act(&mut self, entity: &mut Entity, dt: f32) {
        entity.visual.advance(dt);

        let center = entity.visual.center();
        if let Some(light) = entity.light.as_mut() {
            light.pos = center;
            light.dim(self.flicker * self.rng.next_f32());
        }
    }
}
