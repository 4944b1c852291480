//! Obstacle spawner for the side-scroller.
//!
//! Obstacles are columns of square blocks spanning the field height with a
//! gap a few blocks tall. The [`Environment`] spawns one at the right edge of
//! the field every `interval` seconds, scrolls them all at a constant
//! velocity, drops the ones that have moved past the left margin, and counts
//! each obstacle once when it passes the tracked x.

use std::ops::RangeInclusive;

use arcade_core::Rect;
use glam::Vec2;

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnerConfig {
    pub field: Vec2,
    pub block_size: f32,
    /// Horizontal velocity of every obstacle (negative scrolls left).
    pub velocity: f32,
    /// Seconds between spawns.
    pub interval: f32,
    pub gap_blocks: u32,
    /// Block row where the gap starts, drawn uniformly from this range.
    pub gap_rows: RangeInclusive<u32>,
    /// Obstacles with `x < -offscreen_margin` are removed.
    pub offscreen_margin: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    pub gap_row: u32,
    gap_blocks: u32,
    rows: u32,
    block_size: f32,
    passed: bool,
}

impl Obstacle {
    pub fn new(x: f32, gap_row: u32, config: &SpawnerConfig) -> Self {
        Self {
            x,
            gap_row,
            gap_blocks: config.gap_blocks,
            rows: column_rows(config.field.y, config.block_size),
            block_size: config.block_size,
            passed: false,
        }
    }

    pub fn is_gap(&self, row: u32) -> bool {
        (self.gap_row..self.gap_row + self.gap_blocks).contains(&row)
    }

    /// Rects of the solid blocks, top to bottom.
    pub fn blocks(&self) -> impl Iterator<Item = Rect> + '_ {
        (0..self.rows).filter(|&row| !self.is_gap(row)).map(move |row| {
            Rect::new(
                self.x,
                row as f32 * self.block_size,
                self.block_size,
                self.block_size,
            )
        })
    }

    pub fn block_count(&self) -> usize {
        self.blocks().count()
    }

    pub fn collides(&self, rect: &Rect) -> bool {
        self.blocks().any(|block| block.overlaps(rect))
    }
}

/// Blocks needed to cover a column `height` pixels tall, rounded to nearest.
pub fn column_rows(height: f32, block_size: f32) -> u32 {
    (height / block_size).round().max(0.0) as u32
}

pub struct Environment {
    config: SpawnerConfig,
    obstacles: Vec<Obstacle>,
    timer: f64,
    rng: fastrand::Rng,
    tracked_x: f32,
    passed: u32,
}

impl Environment {
    pub fn new(config: SpawnerConfig, rng: fastrand::Rng) -> Self {
        Self {
            config,
            obstacles: Vec::new(),
            timer: 0.0,
            rng,
            tracked_x: 0.0,
            passed: 0,
        }
    }

    /// Horizontal position an obstacle must move left of to count as passed.
    pub fn track(&mut self, x: f32) {
        self.tracked_x = x;
    }

    /// Advance by `dt` seconds. Returns how many obstacles were passed during
    /// this update.
    pub fn update(&mut self, dt: f32) -> u32 {
        self.timer += f64::from(dt);

        for obstacle in &mut self.obstacles {
            obstacle.x += self.config.velocity * dt;
        }

        let margin = self.config.offscreen_margin;
        self.obstacles.retain(|obstacle| obstacle.x >= -margin);

        if self.interval_elapsed() {
            self.spawn();
            self.timer = 0.0;
        }

        let mut newly_passed = 0;
        for obstacle in &mut self.obstacles {
            if !obstacle.passed && obstacle.x < self.tracked_x {
                obstacle.passed = true;
                newly_passed += 1;
            }
        }
        self.passed += newly_passed;
        newly_passed
    }

    /// The timer may land a rounding error short of the interval after
    /// summing a whole interval of frame deltas; that still counts.
    fn interval_elapsed(&self) -> bool {
        let interval = f64::from(self.config.interval);
        self.timer >= interval - interval * f64::from(f32::EPSILON)
    }

    fn spawn(&mut self) {
        let gap_row = self.rng.u32(self.config.gap_rows.clone());
        let obstacle = Obstacle::new(self.config.field.x, gap_row, &self.config);
        log::debug!(
            "Spawned obstacle at x={} with gap at row {} ({} live)",
            obstacle.x,
            gap_row,
            self.obstacles.len() + 1
        );
        self.obstacles.push(obstacle);
    }

    pub fn collides(&self, rect: &Rect) -> bool {
        self.obstacles.iter().any(|obstacle| obstacle.collides(rect))
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Total obstacles passed since creation.
    pub fn passed(&self) -> u32 {
        self.passed
    }

    pub fn config(&self) -> &SpawnerConfig {
        &self.config
    }
}
