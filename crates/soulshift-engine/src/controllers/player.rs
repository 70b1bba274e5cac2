use glam::Vec2;

use crate::api::config::PlayerConfig;
use crate::components::entity::Entity;
use crate::components::player::{Direction, PlayerState};
use crate::controllers::{Neighbours, Touch};
use crate::core::physics::PhysicsWorld;
use crate::input::keys::{KeyAction, KeyBindings};

/// Vertical speed below which a grounded player may jump again.
const JUMP_REARM_SPEED: f32 = 1.0;

pub const WALK_ANIMATION: &str = "walk";
pub const IDLE_ANIMATION: &str = "idle";

/// Drives the player: run left/right, jump, consume and release souls.
#[derive(Debug, Clone)]
pub struct PlayerController {
    config: PlayerConfig,
    keys: KeyBindings,
    /// Bound key codes currently down, oldest first.
    held: Vec<u32>,
    /// Cleared by a jump; set again once the player leaves the ground or
    /// stops rising. Holding jump never re-triggers.
    jump_armed: bool,
}

impl PlayerController {
    pub fn new(config: PlayerConfig, keys: KeyBindings) -> Self {
        Self {
            config,
            keys,
            held: Vec::new(),
            jump_armed: true,
        }
    }

    pub fn act(&mut self, entity: &mut Entity, physics: &mut PhysicsWorld, dt: f32) {
        let grounded = entity.is_on_ground();
        let Some(body) = entity.body else {
            return;
        };

        let velocity = physics.velocity(&body);
        if !grounded || velocity.y <= JUMP_REARM_SPEED {
            self.jump_armed = true;
        }

        let Some(player) = entity.player() else {
            return;
        };
        let (direction, state) = (player.direction, player.state);

        if state == PlayerState::Move {
            self.run(physics, entity, direction);
        }

        entity.visual.flip_x = direction == Direction::Left;
        entity.visual.play(match state {
            PlayerState::Move => WALK_ANIMATION,
            PlayerState::Idle => IDLE_ANIMATION,
        });
        entity.visual.advance(dt);
    }

    pub fn on_key_pressed(&mut self, entity: &mut Entity, physics: &mut PhysicsWorld, key_code: u32) -> bool {
        let Some(action) = self.keys.action(key_code) else {
            return false;
        };

        // Auto-repeat delivers more presses without a release.
        let jump_was_held = self.is_held(KeyAction::Jump);
        if !self.held.contains(&key_code) {
            self.held.push(key_code);
        }

        match action {
            KeyAction::Left => self.start_moving(entity, physics, Direction::Left),
            KeyAction::Right => self.start_moving(entity, physics, Direction::Right),
            KeyAction::Jump => {
                if !jump_was_held {
                    self.try_jump(entity, physics);
                }
            }
        }
        true
    }

    pub fn on_key_released(&mut self, entity: &mut Entity, physics: &mut PhysicsWorld, key_code: u32) -> bool {
        let Some(action) = self.keys.action(key_code) else {
            return false;
        };

        self.held.retain(|&held| held != key_code);
        if action == KeyAction::Jump {
            return true;
        }

        match self.held_direction() {
            Some(direction) => self.start_moving(entity, physics, direction),
            None => self.stop(entity, physics),
        }
        true
    }

    fn is_held(&self, action: KeyAction) -> bool {
        self.held.iter().any(|&code| self.keys.action(code) == Some(action))
    }

    /// Direction of the most recently pressed directional key still down.
    fn held_direction(&self) -> Option<Direction> {
        self.held.iter().rev().find_map(|&code| match self.keys.action(code) {
            Some(KeyAction::Left) => Some(Direction::Left),
            Some(KeyAction::Right) => Some(Direction::Right),
            _ => None,
        })
    }

    /// Release the held soul next to the player, or consume the touched
    /// entity if it is close enough.
    pub fn on_touch_down(
        &mut self,
        entity: &mut Entity,
        others: &mut Neighbours<'_>,
        physics: &mut PhysicsWorld,
        touch: Touch,
    ) -> bool {
        if touch.button != Touch::PRIMARY_BUTTON {
            return false;
        }

        let center = match entity.body {
            Some(body) => physics.body_position(&body).0,
            None => entity.visual.center(),
        };
        let Some(player) = entity.player_mut() else {
            return false;
        };

        if let Some(held) = player.consumed.take() {
            match others.get_mut(held) {
                Some(target) => {
                    release(target, physics, center);
                    log::debug!("released {:?} at {:?}", held, center);
                }
                None => log::debug!("held entity {:?} no longer exists", held),
            }
            return true;
        }

        let Some(target) = others.first_with_point(touch.x, touch.y) else {
            return false;
        };
        if target.is_killed() {
            return false;
        }

        let distance = target.bounding_rectangle().center().distance(center);
        if distance > self.config.interaction_range {
            log::trace!("{:?} out of reach ({:.1} > {:.1})", target.id, distance, self.config.interaction_range);
            return false;
        }

        consume(target, physics);
        player.consumed = Some(target.id);
        log::debug!("consumed {} {:?}", target.kind.name(), target.id);
        true
    }

    fn start_moving(&mut self, entity: &mut Entity, physics: &mut PhysicsWorld, direction: Direction) {
        if let Some(player) = entity.player_mut() {
            player.direction = direction;
            player.state = PlayerState::Move;
        }
        self.run(physics, entity, direction);
    }

    fn stop(&mut self, entity: &mut Entity, physics: &mut PhysicsWorld) {
        if let Some(player) = entity.player_mut() {
            player.state = PlayerState::Idle;
        }
        if let Some(body) = entity.body {
            let velocity = physics.velocity(&body);
            physics.set_velocity(&body, Vec2::new(0.0, velocity.y));
        }
    }

    /// Horizontal velocity at the speed cap, vertical velocity untouched.
    fn run(&self, physics: &mut PhysicsWorld, entity: &Entity, direction: Direction) {
        if let Some(body) = entity.body {
            let velocity = physics.velocity(&body);
            let vx = (direction.sign() * self.config.max_speed).clamp(-self.config.max_speed, self.config.max_speed);
            physics.set_velocity(&body, Vec2::new(vx, velocity.y));
        }
    }

    fn try_jump(&mut self, entity: &Entity, physics: &mut PhysicsWorld) {
        let Some(body) = entity.body else {
            return;
        };
        if !entity.is_on_ground() || !self.jump_armed {
            log::trace!("jump ignored (grounded: {}, armed: {})", entity.is_on_ground(), self.jump_armed);
            return;
        }

        let impulse = physics.mass(&body) * self.config.jump_speed;
        physics.apply_impulse(&body, Vec2::new(0.0, impulse));
        self.jump_armed = false;
        log::debug!("jump impulse {:.1}", impulse);
    }
}

/// Take an entity out of the simulation and hide it.
fn consume(target: &mut Entity, physics: &mut PhysicsWorld) {
    if let Some(body) = target.body {
        physics.set_enabled(&body, false);
    }
    target.set_visible(false);
}

/// Put a consumed entity back into the simulation at `at`, at rest.
fn release(target: &mut Entity, physics: &mut PhysicsWorld, at: Vec2) {
    if let Some(body) = target.body {
        physics.set_position(&body, at);
        physics.set_velocity(&body, Vec2::ZERO);
        physics.set_enabled(&body, true);
    }
    target.visual.set_center(at);
    target.set_visible(true);
}
