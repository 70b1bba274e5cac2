use glam::Vec2;

use crate::api::types::Rect;
use crate::components::animation::AnimationComponent;
use crate::components::sprite::SpriteComponent;

/// What the presentation layer draws for an entity. For entities with a
/// physics body the position is rewritten from the body every tick.
#[derive(Debug, Clone)]
pub struct Visual {
    /// Bottom-left corner in world space.
    pub pos: Vec2,
    /// Drawn size in world units.
    pub size: Vec2,
    pub sprite: SpriteComponent,
    pub animation: Option<AnimationComponent>,
    /// Mirror horizontally (player facing left).
    pub flip_x: bool,
}

impl Visual {
    pub fn new(sprite: SpriteComponent, size: Vec2) -> Self {
        Self {
            pos: Vec2::ZERO,
            size,
            sprite,
            animation: None,
            flip_x: false,
        }
    }

    pub fn with_animation(mut self, animation: AnimationComponent) -> Self {
        self.animation = Some(animation);
        self.sync_frame();
        self
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    /// Axis-aligned bounds in world space.
    pub fn bounding_rectangle(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.pos = center - self.size / 2.0;
    }

    /// Advance the animation, if any, and point the sprite at its current frame.
    pub fn advance(&mut self, dt: f32) {
        if let Some(anim) = self.animation.as_mut() {
            anim.tick(dt);
        }
        self.sync_frame();
    }

    /// Select a named animation without restarting it if it is already playing.
    pub fn play(&mut self, name: &str) {
        if let Some(anim) = self.animation.as_mut() {
            anim.play_if_different(name);
        }
        self.sync_frame();
    }

    fn sync_frame(&mut self) {
        if let Some((col, row)) = self.animation.as_ref().and_then(|a| a.current_frame()) {
            self.sprite.col = col;
            self.sprite.row = row;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::animation::AnimationDef;

    #[test]
    fn center_round_trips_through_position() {
        let mut visual = Visual::new(SpriteComponent::default(), Vec2::new(24.0, 48.0));
        visual.set_center(Vec2::new(112.0, 74.0));
        assert_eq!(visual.pos, Vec2::new(100.0, 50.0));
        assert_eq!(visual.center(), Vec2::new(112.0, 74.0));
        assert_eq!(visual.bounding_rectangle(), Rect::new(100.0, 50.0, 24.0, 48.0));
    }

    #[test]
    fn advance_updates_sprite_cell() {
        let anim = AnimationComponent::single("torch", AnimationDef::horizontal_strip(1.0, 0.0, 8, 0.06));
        let mut visual = Visual::new(SpriteComponent::default(), Vec2::splat(32.0)).with_animation(anim);
        assert_eq!((visual.sprite.col, visual.sprite.row), (0.0, 1.0));

        visual.advance(0.07);
        assert_eq!((visual.sprite.col, visual.sprite.row), (1.0, 1.0));
    }

    #[test]
    fn advance_without_animation_is_a_no_op() {
        let mut visual = Visual::new(SpriteComponent::default(), Vec2::splat(16.0));
        visual.advance(1.0);
        assert_eq!(visual.sprite, SpriteComponent::default());
    }
}
