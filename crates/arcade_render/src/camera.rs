use arcade_core::Rect;
use glam::Vec2;

/// Scrolling view into a world larger than the frame.
///
/// `position` is the world coordinate of the frame's top-left corner. Scenes
/// subtract it from world positions before drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    pub position: Vec2,
    pub viewport: (u32, u32),
}

impl Camera2D {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            position: Vec2::ZERO,
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn viewport_size(&self) -> Vec2 {
        Vec2::new(self.viewport.0 as f32, self.viewport.1 as f32)
    }

    /// Center the view on `target`, then clamp so the view never leaves a
    /// world of `world_size` pixels. A world smaller than the viewport pins
    /// the view at the origin on that axis.
    pub fn follow(&mut self, target: Vec2, world_size: Vec2) {
        let max = (world_size - self.viewport_size()).max(Vec2::ZERO);
        self.position = (target - self.viewport_size() * 0.5).clamp(Vec2::ZERO, max);
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.position
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.position
    }

    /// The world-space rectangle currently on screen.
    pub fn view_rect(&self) -> Rect {
        Rect::from_position_size(self.position, self.viewport_size())
    }
}
