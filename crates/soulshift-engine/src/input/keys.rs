use serde::{Deserialize, Serialize};

/// Browser `keyCode` values for the keys the game binds by default.
pub mod codes {
    pub const SPACE: u32 = 32;
    pub const LEFT: u32 = 37;
    pub const UP: u32 = 38;
    pub const RIGHT: u32 = 39;
    pub const A: u32 = 65;
    pub const D: u32 = 68;
    pub const W: u32 = 87;
    pub const F5: u32 = 116;
}

/// Which key codes drive the player. Each action accepts several keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<u32>,
    pub right: Vec<u32>,
    pub jump: Vec<u32>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: vec![codes::LEFT, codes::A],
            right: vec![codes::RIGHT, codes::D],
            jump: vec![codes::UP, codes::W, codes::SPACE],
        }
    }
}

/// A key resolved against the bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Left,
    Right,
    Jump,
}

impl KeyBindings {
    pub fn action(&self, key_code: u32) -> Option<KeyAction> {
        if self.left.contains(&key_code) {
            Some(KeyAction::Left)
        } else if self.right.contains(&key_code) {
            Some(KeyAction::Right)
        } else if self.jump.contains(&key_code) {
            Some(KeyAction::Jump)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_cover_arrows_and_wasd() {
        let keys = KeyBindings::default();
        assert_eq!(keys.action(codes::LEFT), Some(KeyAction::Left));
        assert_eq!(keys.action(codes::D), Some(KeyAction::Right));
        assert_eq!(keys.action(codes::SPACE), Some(KeyAction::Jump));
        assert_eq!(keys.action(codes::F5), None);
    }
}
