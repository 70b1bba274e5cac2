use glam::Vec2;

/// Unique identifier for an entity in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Collision category bits. An entity's category says what it *is*,
/// its mask says what it *collides with*.
pub mod category {
    /// Category 0 is promoted to this bit when the collider filter is built.
    pub const DEFAULT: u16 = 0x0001;
    pub const OBSTACLE: u16 = 0x0002;
    pub const PLAYER: u16 = 0x0004;
    pub const PROP: u16 = 0x0008;
    pub const ANY: u16 = 0xFFFF;
}

/// Axis-aligned rectangle in world space. `(x, y)` is the bottom-left corner
/// (Y-up coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Build a rectangle from its center and half extents.
    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self {
            x: center.x - half.x,
            y: center.y - half.y,
            width: half.x * 2.0,
            height: half.y * 2.0,
        }
    }

    /// Point containment. Edges are inclusive.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_edge_inclusive() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert!(r.contains(10.0, 20.0));
        assert!(r.contains(40.0, 60.0));
        assert!(r.contains(25.0, 35.0));
        assert!(!r.contains(9.9, 30.0));
        assert!(!r.contains(25.0, 60.1));
    }

    #[test]
    fn center_and_half_extents() {
        let r = Rect::from_center(Vec2::new(100.0, 50.0), Vec2::new(8.0, 16.0));
        assert_eq!(r, Rect::new(92.0, 34.0, 16.0, 32.0));
        assert_eq!(r.center(), Vec2::new(100.0, 50.0));
        assert_eq!(r.half_extents(), Vec2::new(8.0, 16.0));
    }
}
