//! Entity motion model.
//!
//! A [`Body`] owns a position, the pixel extent of its current sprite, a
//! facing direction and one of three motion laws:
//!
//! - `Falling`: constant vertical acceleration, integrated with
//!   semi-implicit Euler. Velocity is updated first, then position uses the
//!   new velocity. The order is fixed; trajectories in tests depend on it.
//! - `Walking`: constant speed along the facing direction while `moving`.
//! - `Drifting`: constant 2D velocity (obstacles, projectiles).
//!
//! Positions are screen-space pixels with +y pointing down.

use glam::Vec2;

use crate::rect::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step in screen space.
    pub fn unit(self) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -1.0),
            Self::Down => Vec2::new(0.0, 1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Clockwise quarter turns needed to rotate an up-facing sprite.
    pub fn quarter_turns(self) -> u8 {
        match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Falling { velocity: f32, gravity: f32 },
    Walking { speed: f32, moving: bool },
    Drifting { velocity: Vec2 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub extent: Vec2,
    pub facing: Direction,
    pub motion: Motion,
    /// When set, position is confined to `[0, w] × [0, h]` after each update.
    pub clamp: Option<Vec2>,
}

impl Body {
    pub fn new(position: Vec2, extent: Vec2, motion: Motion) -> Self {
        Self {
            position,
            extent,
            facing: Direction::default(),
            motion,
            clamp: None,
        }
    }

    pub fn with_clamp(mut self, field: Vec2) -> Self {
        self.clamp = Some(field);
        self
    }

    pub fn update(&mut self, dt: f32) {
        match &mut self.motion {
            Motion::Falling { velocity, gravity } => {
                *velocity += *gravity * dt;
                self.position.y += *velocity * dt;
            }
            Motion::Walking { speed, moving } => {
                if *moving {
                    self.position += self.facing.unit() * *speed * dt;
                }
            }
            Motion::Drifting { velocity } => {
                self.position += *velocity * dt;
            }
        }

        if let Some(field) = self.clamp {
            self.position = self.position.clamp(Vec2::ZERO, field);
        }
    }

    pub fn set_facing(&mut self, facing: Direction) {
        self.facing = facing;
    }

    /// Track the extent of the sprite currently drawn for this body.
    pub fn set_extent(&mut self, extent: Vec2) {
        self.extent = extent;
    }

    /// Start or stop walking. No effect on other motion laws.
    pub fn set_moving(&mut self, value: bool) {
        if let Motion::Walking { moving, .. } = &mut self.motion {
            *moving = value;
        }
    }

    /// Replace the vertical velocity of a falling body (a jump impulse).
    pub fn set_vertical_velocity(&mut self, value: f32) {
        if let Motion::Falling { velocity, .. } = &mut self.motion {
            *velocity = value;
        }
    }

    /// Scalar speed for walking bodies, vertical velocity for falling ones,
    /// velocity magnitude for drifting ones.
    pub fn speed(&self) -> f32 {
        match self.motion {
            Motion::Falling { velocity, .. } => velocity,
            Motion::Walking { speed, .. } => speed,
            Motion::Drifting { velocity } => velocity.length(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_position_size(self.position, self.extent)
    }

    pub fn overlaps(&self, other: &Body) -> bool {
        self.rect().overlaps(&other.rect())
    }
}
