//! Every image the games use, decoded once at startup.
//!
//! Missing or unreadable art is fatal: the binary reports the `LoadError` and
//! stops before opening a window. `arcade_assetgen` writes a placeholder set.

use std::path::Path;
use std::rc::Rc;

use arcade_core::LoadResult;
use arcade_render::Sprite;

use crate::atlas::Atlas;
use crate::config::GameConfig;

pub const ASSET_ROOT: &str = "assets/gfx";

/// Edge of one enemy animation frame in `enemy_idle.png`.
pub const ENEMY_FRAME_SIZE: u32 = 50;
/// Edge of one glyph cell in `font.png`.
pub const GLYPH_SIZE: u32 = 6;
/// Upscale applied to glyph cells.
pub const GLYPH_SCALE: u32 = 6;

pub struct Assets {
    pub ball: Sprite,
    pub block: Sprite,
    pub ship: Sprite,
    pub collectible: Sprite,
    pub background: Sprite,
    pub tileset: Rc<Atlas>,
    pub enemy_idle: Rc<Atlas>,
    pub hero: Rc<Atlas>,
    pub font: Rc<Atlas>,
}

impl Assets {
    pub fn load(root: &Path, config: &GameConfig) -> LoadResult<Assets> {
        let town = &config.town;
        let assets = Assets {
            ball: Sprite::load(&root.join("ball.png"))?,
            block: Sprite::load(&root.join("block.png"))?,
            ship: Sprite::load(&root.join("ship.png"))?,
            collectible: Sprite::load(&root.join("collectible.png"))?,
            background: Sprite::load(&root.join("background.png"))?,
            tileset: Rc::new(Atlas::load(
                &root.join("rpg_sprites.png"),
                town.tile_size,
                town.scale,
            )?),
            enemy_idle: Rc::new(Atlas::load(
                &root.join("enemy_idle.png"),
                ENEMY_FRAME_SIZE,
                town.scale,
            )?),
            hero: Rc::new(Atlas::load(
                &root.join("hero.png"),
                town.tile_size,
                town.scale,
            )?),
            font: Rc::new(Atlas::load(
                &root.join("font.png"),
                GLYPH_SIZE,
                GLYPH_SCALE,
            )?),
        };
        log::info!("Assets loaded from {}", root.display());
        Ok(assets)
    }

    /// Flat-colored stand-ins with the real sheet geometry, for tests.
    #[cfg(test)]
    pub fn synthetic() -> Assets {
        use image::{Rgba, RgbaImage};

        fn sheet(columns: u32, rows: u32, tile: u32, scale: u32) -> Rc<Atlas> {
            let image = RgbaImage::from_fn(columns * tile, rows * tile, |x, y| {
                let id = (y / tile) * columns + x / tile;
                Rgba([id as u8, 128, 255, 255])
            });
            Rc::new(Atlas::from_image(image, tile, scale).expect("synthetic atlas"))
        }

        Assets {
            ball: Sprite::solid(32, 32, [255, 220, 0, 255]),
            block: Sprite::solid(48, 48, [40, 200, 60, 255]),
            ship: Sprite::solid(64, 64, [200, 200, 220, 255]),
            collectible: Sprite::solid(24, 24, [255, 80, 200, 255]),
            background: Sprite::solid(320, 180, [10, 10, 40, 255]),
            tileset: sheet(16, 8, 16, 4),
            enemy_idle: sheet(5, 1, ENEMY_FRAME_SIZE, 1),
            hero: sheet(8, 4, 16, 1),
            font: sheet(10, 4, GLYPH_SIZE, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_fails_with_path_of_first_missing_file() {
        let root = std::env::temp_dir().join(format!(
            "arcade_assets_missing_{}",
            std::process::id()
        ));
        let err = match Assets::load(&root, &GameConfig::default()) {
            Ok(_) => panic!("empty directory should not load"),
            Err(err) => err,
        };
        assert_eq!(err.path, root.join("ball.png"));
    }

    #[test]
    fn synthetic_sheets_cover_town_ids() {
        let assets = Assets::synthetic();
        assert!(assets.tileset.contains(113));
        assert_eq!(assets.enemy_idle.len(), 5);
        assert_eq!(assets.hero.len(), 32);
        assert_eq!(assets.font.len(), 40);
    }
}
