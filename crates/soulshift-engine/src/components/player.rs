use std::fmt;

use crate::api::types::EntityId;

/// Facing direction. `Right` is +1, `Left` is -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Movement state of the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Idle,
    Move,
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerState::Idle => f.write_str("IDLE"),
            PlayerState::Move => f.write_str("MOVE"),
        }
    }
}

/// Player-specific entity data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Player {
    pub direction: Direction,
    pub state: PlayerState,
    /// The soul the player currently holds. Does not own it: the entity lives
    /// in the world's collection and may be killed independently.
    pub consumed: Option<EntityId>,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }
}
