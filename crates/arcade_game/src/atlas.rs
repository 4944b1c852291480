//! Sprite atlas: a sprite sheet sliced into square tiles.
//!
//! Tiles are numbered row-major from the top-left, starting at 0. Each tile is
//! cropped to `tile_size × tile_size` and upscaled by an integer factor with
//! nearest-neighbour sampling, once, at load time. A partial row or column at
//! the right/bottom edge of the sheet is ignored.

use std::path::Path;

use arcade_core::{LoadError, LoadResult};
use arcade_render::{load_image, Sprite};
use image::RgbaImage;

#[derive(Debug, Clone)]
pub struct Atlas {
    tiles: Vec<Sprite>,
    tile_size: u32,
    scale: u32,
    columns: u32,
    rows: u32,
}

impl Atlas {
    pub fn load(path: &Path, tile_size: u32, scale: u32) -> LoadResult<Atlas> {
        let image = load_image(path)?;
        let atlas =
            Self::from_image(image, tile_size, scale).map_err(|e| LoadError::new(path, e))?;
        log::info!(
            "Loaded atlas {} ({}x{} tiles of {}px, x{})",
            path.display(),
            atlas.columns,
            atlas.rows,
            tile_size,
            scale
        );
        Ok(atlas)
    }

    /// Slice an already-decoded image.
    pub fn from_image(image: RgbaImage, tile_size: u32, scale: u32) -> Result<Atlas, String> {
        if tile_size == 0 {
            return Err("Atlas validation failed: tile size must be > 0".to_string());
        }
        if scale == 0 {
            return Err("Atlas validation failed: scale must be > 0".to_string());
        }
        let columns = image.width() / tile_size;
        let rows = image.height() / tile_size;
        if columns == 0 || rows == 0 {
            return Err(format!(
                "Atlas validation failed: {}x{} image is smaller than one {}px tile",
                image.width(),
                image.height(),
                tile_size
            ));
        }

        let sheet = Sprite::new(image);
        let mut tiles = Vec::with_capacity((columns * rows) as usize);
        for row in 0..rows {
            for column in 0..columns {
                let tile = sheet.crop(column * tile_size, row * tile_size, tile_size, tile_size);
                tiles.push(tile.scaled(scale));
            }
        }

        Ok(Atlas {
            tiles,
            tile_size,
            scale,
            columns,
            rows,
        })
    }

    pub fn get(&self, id: u32) -> Option<&Sprite> {
        self.tiles.get(id as usize)
    }

    /// Like [`Atlas::get`], for ids already validated against this atlas.
    ///
    /// # Panics
    /// If `id` is out of range.
    pub fn tile(&self, id: u32) -> &Sprite {
        match self.tiles.get(id as usize) {
            Some(tile) => tile,
            None => panic!(
                "tile id {id} out of range for atlas with {} tiles",
                self.tiles.len()
            ),
        }
    }

    pub fn contains(&self, id: u32) -> bool {
        (id as usize) < self.tiles.len()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Edge length of a tile after scaling.
    pub fn scaled_size(&self) -> u32 {
        self.tile_size * self.scale
    }

    /// A new atlas with every tile passed through `f`.
    pub fn map_tiles(&self, f: impl Fn(&Sprite) -> Sprite) -> Atlas {
        Atlas {
            tiles: self.tiles.iter().map(f).collect(),
            ..self.clone()
        }
    }
}
