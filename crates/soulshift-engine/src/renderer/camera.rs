use glam::{Mat4, Vec2};

use crate::api::types::Rect;

/// Orthographic camera for the 2D world. One world unit is one screen pixel.
#[derive(Debug, Clone)]
pub struct Camera2D {
    /// Camera center in world space.
    pub center: Vec2,
    /// Visible size in world units.
    pub view: Vec2,
    /// World region the view must stay inside.
    bounds: Option<Rect>,
    /// Smoothing factor for follow (0.0 = instant, 0.99 = very slow).
    smoothing: f32,
}

impl Camera2D {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            center: Vec2::new(width / 2.0, height / 2.0),
            view: Vec2::new(width, height),
            bounds: None,
            smoothing: 0.0,
        }
    }

    /// Orthographic projection matrix. Y-up, Z in [0, 1].
    pub fn projection_matrix(&self) -> Mat4 {
        let half = self.view / 2.0;
        Mat4::orthographic_rh(
            self.center.x - half.x,
            self.center.x + half.x,
            self.center.y - half.y,
            self.center.y + half.y,
            0.0,
            1.0,
        )
    }

    /// Match the viewport size (e.g. on window resize).
    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        self.view = Vec2::new(viewport_width, viewport_height);
        self.clamp_to_bounds();
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = Some(bounds);
        self.clamp_to_bounds();
    }

    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.smoothing = smoothing.clamp(0.0, 0.99);
    }

    pub fn look_at(&mut self, target: Vec2) {
        self.center = target;
        self.clamp_to_bounds();
    }

    /// Move toward `target`, frame-rate independent.
    pub fn follow(&mut self, target: Vec2, dt: f32) {
        if self.smoothing <= 0.0 {
            self.look_at(target);
        } else {
            let lerp_factor = 1.0 - self.smoothing.powf(dt * 60.0);
            self.center += (target - self.center) * lerp_factor;
            self.clamp_to_bounds();
        }
    }

    fn clamp_to_bounds(&mut self) {
        let Some(bounds) = self.bounds else {
            return;
        };
        let half = self.view / 2.0;

        // A view wider than the bounds is centered on them.
        self.center.x = if self.view.x >= bounds.width {
            bounds.x + bounds.width / 2.0
        } else {
            self.center.x.clamp(bounds.x + half.x, bounds.x + bounds.width - half.x)
        };
        self.center.y = if self.view.y >= bounds.height {
            bounds.y + bounds.height / 2.0
        } else {
            self.center.y.clamp(bounds.y + half.y, bounds.y + bounds.height - half.y)
        };
    }

    /// Convert a pointer position in screen pixels (origin top-left, Y-down)
    /// to world coordinates.
    pub fn screen_to_world(&self, screen_x: f32, screen_y: f32) -> Vec2 {
        let bottom_left = self.center - self.view / 2.0;
        Vec2::new(bottom_left.x + screen_x, bottom_left.y + (self.view.y - screen_y))
    }

    /// The visible world region.
    pub fn visible_rect(&self) -> Rect {
        Rect::from_center(self.center, self.view / 2.0)
    }

    /// Whether a world-space rectangle overlaps the view.
    pub fn is_rect_visible(&self, rect: &Rect) -> bool {
        let view = self.visible_rect();
        rect.x <= view.x + view.width
            && rect.x + rect.width >= view.x
            && rect.y <= view.y + view.height
            && rect.y + rect.height >= view.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_matrix_is_orthographic() {
        let cam = Camera2D::new(800.0, 600.0);
        let cols = cam.projection_matrix().to_cols_array_2d();
        assert!((cols[3][3] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn bounds_clamp_camera() {
        let mut cam = Camera2D::new(100.0, 100.0);
        cam.set_bounds(Rect::new(0.0, 0.0, 500.0, 400.0));

        cam.look_at(Vec2::ZERO);
        assert_eq!(cam.center, Vec2::new(50.0, 50.0));

        cam.look_at(Vec2::new(1000.0, 1000.0));
        assert_eq!(cam.center, Vec2::new(450.0, 350.0));
    }

    #[test]
    fn view_larger_than_bounds_is_centered() {
        let mut cam = Camera2D::new(800.0, 600.0);
        cam.set_bounds(Rect::new(0.0, 0.0, 400.0, 1000.0));
        cam.look_at(Vec2::new(0.0, 0.0));
        assert_eq!(cam.center.x, 200.0);
        assert_eq!(cam.center.y, 300.0);
    }

    #[test]
    fn follow_with_smoothing_interpolates() {
        let mut cam = Camera2D::new(100.0, 100.0);
        cam.center = Vec2::ZERO;
        cam.set_smoothing(0.9);
        cam.follow(Vec2::new(100.0, 100.0), 0.016);
        assert!(cam.center.x > 0.0 && cam.center.x < 100.0);
        assert!(cam.center.y > 0.0 && cam.center.y < 100.0);
    }

    #[test]
    fn follow_without_smoothing_snaps() {
        let mut cam = Camera2D::new(100.0, 100.0);
        cam.follow(Vec2::new(200.0, 150.0), 0.016);
        assert_eq!(cam.center, Vec2::new(200.0, 150.0));
    }

    #[test]
    fn screen_to_world_flips_y() {
        let mut cam = Camera2D::new(800.0, 600.0);
        cam.look_at(Vec2::new(1000.0, 500.0));
        // Top-left of the screen.
        assert_eq!(cam.screen_to_world(0.0, 0.0), Vec2::new(600.0, 800.0));
        // Bottom-right of the screen.
        assert_eq!(cam.screen_to_world(800.0, 600.0), Vec2::new(1400.0, 200.0));
        assert_eq!(cam.screen_to_world(400.0, 300.0), cam.center);
    }

    #[test]
    fn rect_visibility() {
        let cam = Camera2D::new(100.0, 100.0);
        assert!(cam.is_rect_visible(&Rect::new(40.0, 40.0, 10.0, 10.0)));
        assert!(cam.is_rect_visible(&Rect::new(-5.0, 50.0, 10.0, 10.0)));
        assert!(!cam.is_rect_visible(&Rect::new(-50.0, 50.0, 10.0, 10.0)));
    }
}
