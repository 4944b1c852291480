//! Grid of atlas tiles drawn through a camera.

use std::rc::Rc;

use arcade_core::Rect;
use arcade_render::{Camera2D, Canvas};
use glam::Vec2;

use crate::atlas::Atlas;

pub struct Tilemap {
    atlas: Rc<Atlas>,
    ids: Vec<u32>,
    map_width: u32,
    map_height: u32,
}

impl Tilemap {
    /// Build from rows of tile ids. Every row must have the same length and
    /// every id must exist in `atlas`.
    pub fn new(rows: &[&[u32]], atlas: Rc<Atlas>) -> Result<Tilemap, String> {
        let map_height = rows.len() as u32;
        let map_width = rows.first().map_or(0, |row| row.len()) as u32;
        if map_width == 0 {
            return Err("Tilemap validation failed: map has no tiles".to_string());
        }

        let mut ids = Vec::with_capacity((map_width * map_height) as usize);
        for (y, row) in rows.iter().enumerate() {
            if row.len() as u32 != map_width {
                return Err(format!(
                    "Tilemap validation failed: row {} has {} tiles, expected {}",
                    y,
                    row.len(),
                    map_width
                ));
            }
            for (x, &id) in row.iter().enumerate() {
                if !atlas.contains(id) {
                    return Err(format!(
                        "Tilemap validation failed: tile id {} at ({}, {}) is outside the {}-tile atlas",
                        id,
                        x,
                        y,
                        atlas.len()
                    ));
                }
                ids.push(id);
            }
        }

        Ok(Tilemap {
            atlas,
            ids,
            map_width,
            map_height,
        })
    }

    pub fn tile_size(&self) -> f32 {
        self.atlas.scaled_size() as f32
    }

    pub fn map_width(&self) -> u32 {
        self.map_width
    }

    pub fn map_height(&self) -> u32 {
        self.map_height
    }

    /// World size in pixels.
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.map_width as f32, self.map_height as f32) * self.tile_size()
    }

    pub fn id_at(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.map_width || y >= self.map_height {
            return None;
        }
        self.ids.get((y * self.map_width + x) as usize).copied()
    }

    /// Draw the tiles that intersect the camera view. Returns how many were
    /// drawn.
    pub fn render(&self, canvas: &mut dyn Canvas, camera: &Camera2D) -> usize {
        let size = self.tile_size();
        let view = camera.view_rect();
        let first_x = (view.x / size).floor().max(0.0) as u32;
        let first_y = (view.y / size).floor().max(0.0) as u32;
        let last_x = ((view.right() / size).ceil() as u32).min(self.map_width);
        let last_y = ((view.bottom() / size).ceil() as u32).min(self.map_height);

        let mut drawn = 0;
        for y in first_y..last_y {
            for x in first_x..last_x {
                let Some(id) = self.id_at(x, y) else {
                    continue;
                };
                let world = Vec2::new(x as f32, y as f32) * size;
                if !Rect::from_position_size(world, Vec2::splat(size)).overlaps(&view) {
                    continue;
                }
                let screen = camera.world_to_screen(world);
                canvas.draw(self.atlas.tile(id), screen.x, screen.y);
                drawn += 1;
            }
        }
        drawn
    }
}
