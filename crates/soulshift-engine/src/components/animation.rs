//! Frame animation for sprites: named strips of atlas cells played back at a
//! fixed frame duration.

use std::collections::HashMap;

/// A sequence of atlas cells.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationDef {
    /// Frames as (col, row) in the owning sprite's atlas.
    pub frames: Vec<(f32, f32)>,
    /// Seconds per frame.
    pub frame_duration: f32,
    pub looping: bool,
}

impl AnimationDef {
    /// Consecutive columns on one atlas row, looping.
    pub fn horizontal_strip(row: f32, start_col: f32, frame_count: u32, frame_duration: f32) -> Self {
        Self {
            frames: (0..frame_count).map(|i| (start_col + i as f32, row)).collect(),
            frame_duration,
            looping: true,
        }
    }

    /// A single held frame.
    pub fn still(col: f32, row: f32) -> Self {
        Self {
            frames: vec![(col, row)],
            frame_duration: f32::INFINITY,
            looping: false,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// Playback state over a set of named animations.
#[derive(Debug, Clone, Default)]
pub struct AnimationComponent {
    pub animations: HashMap<String, AnimationDef>,
    pub current: String,
    pub frame_index: usize,
    /// Time spent on the current frame.
    pub frame_timer: f32,
}

impl AnimationComponent {
    /// A component with one animation, already playing.
    pub fn single(name: impl Into<String>, def: AnimationDef) -> Self {
        let name = name.into();
        let mut animations = HashMap::new();
        animations.insert(name.clone(), def);
        Self {
            animations,
            current: name,
            ..Default::default()
        }
    }

    pub fn add(&mut self, name: impl Into<String>, def: AnimationDef) {
        self.animations.insert(name.into(), def);
    }

    /// Restart the named animation. Unknown names are ignored.
    pub fn play(&mut self, name: &str) {
        if self.animations.contains_key(name) {
            self.current = name.to_string();
            self.frame_index = 0;
            self.frame_timer = 0.0;
        }
    }

    /// Switch animations without restarting one that is already playing.
    pub fn play_if_different(&mut self, name: &str) {
        if self.current != name {
            self.play(name);
        }
    }

    pub fn current_frame(&self) -> Option<(f32, f32)> {
        self.animations
            .get(&self.current)
            .and_then(|def| def.frames.get(self.frame_index).copied())
    }

    /// Advance by `dt` seconds. Returns true if the frame changed.
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(def) = self.animations.get(&self.current) else {
            return false;
        };
        if def.frames.len() < 2 {
            return false;
        }

        self.frame_timer += dt;
        let mut changed = false;
        while self.frame_timer >= def.frame_duration {
            self.frame_timer -= def.frame_duration;
            if self.frame_index + 1 < def.frames.len() {
                self.frame_index += 1;
            } else if def.looping {
                self.frame_index = 0;
            } else {
                self.frame_timer = 0.0;
                break;
            }
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn torch_strip_has_eight_frames() {
        let def = AnimationDef::horizontal_strip(0.0, 0.0, 8, 0.06);
        assert_eq!(def.frame_count(), 8);
        assert_eq!(def.frames[7], (7.0, 0.0));
    }

    #[test]
    fn ticks_through_frames_and_loops() {
        let mut anim = AnimationComponent::single("walk", AnimationDef::horizontal_strip(2.0, 0.0, 4, 0.1));
        assert_eq!(anim.current_frame(), Some((0.0, 2.0)));

        assert!(anim.tick(0.15));
        assert_eq!(anim.current_frame(), Some((1.0, 2.0)));

        anim.tick(0.3);
        assert_eq!(anim.frame_index, 0);
    }

    #[test]
    fn non_looping_holds_last_frame() {
        let mut def = AnimationDef::horizontal_strip(0.0, 0.0, 3, 0.1);
        def.looping = false;
        let mut anim = AnimationComponent::single("drop", def);
        anim.tick(1.0);
        assert_eq!(anim.frame_index, 2);
    }

    #[test]
    fn still_frame_never_advances() {
        let mut anim = AnimationComponent::single("idle", AnimationDef::still(3.0, 1.0));
        assert!(!anim.tick(100.0));
        assert_eq!(anim.current_frame(), Some((3.0, 1.0)));
    }

    #[test]
    fn play_if_different_keeps_running_animation() {
        let mut anim = AnimationComponent::default();
        anim.add("idle", AnimationDef::horizontal_strip(0.0, 0.0, 2, 0.2));
        anim.add("walk", AnimationDef::horizontal_strip(1.0, 0.0, 4, 0.1));

        anim.play("idle");
        anim.tick(0.25);
        let frame = anim.frame_index;
        anim.play_if_different("idle");
        assert_eq!(anim.frame_index, frame);

        anim.play_if_different("walk");
        assert_eq!(anim.current, "walk");
        assert_eq!(anim.frame_index, 0);
    }
}
