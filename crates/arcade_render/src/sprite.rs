//! Decoded images and the handles that share them.
//!
//! A [`Sprite`] is a cheap, clonable handle to an immutable RGBA image. The
//! atlas owns the sub-images it slices; entities and animations hold clones
//! of the handle, so drawing never copies pixels.

use std::path::Path;
use std::rc::Rc;

use arcade_core::{LoadError, LoadResult};
use glam::Vec2;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Decode an image file into RGBA8.
pub fn load_image(path: &Path) -> LoadResult<RgbaImage> {
    let image = image::open(path).map_err(|e| LoadError::new(path, e.to_string()))?;
    Ok(image.to_rgba8())
}

#[derive(Debug, Clone)]
pub struct Sprite {
    image: Rc<RgbaImage>,
}

impl Sprite {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image: Rc::new(image),
        }
    }

    pub fn load(path: &Path) -> LoadResult<Self> {
        load_image(path).map(Self::new)
    }

    /// A 1×1 fully transparent image, drawn when there is nothing to show.
    pub fn empty() -> Self {
        Self::new(RgbaImage::new(1, 1))
    }

    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self::new(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }

    /// Copy out a sub-rectangle. The rectangle is clipped to the image.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Sprite {
        Sprite::new(imageops::crop_imm(self.image.as_ref(), x, y, width, height).to_image())
    }

    /// Uniform integer upscale with nearest-neighbour sampling.
    pub fn scaled(&self, factor: u32) -> Sprite {
        if factor == 1 {
            return self.clone();
        }
        self.resized(self.width() * factor, self.height() * factor)
    }

    pub fn resized(&self, width: u32, height: u32) -> Sprite {
        if (width, height) == self.image.dimensions() {
            return self.clone();
        }
        Sprite::new(imageops::resize(
            self.image.as_ref(),
            width,
            height,
            FilterType::Nearest,
        ))
    }

    /// Rotate clockwise by `quarter_turns × 90°`.
    pub fn rotated(&self, quarter_turns: u8) -> Sprite {
        match quarter_turns % 4 {
            0 => self.clone(),
            1 => Sprite::new(imageops::rotate90(self.image.as_ref())),
            2 => Sprite::new(imageops::rotate180(self.image.as_ref())),
            _ => Sprite::new(imageops::rotate270(self.image.as_ref())),
        }
    }

    /// Multiply every channel by `color / 255`. White art takes the color
    /// exactly; alpha is scaled the same way.
    pub fn tinted(&self, color: [u8; 4]) -> Sprite {
        let mut image = self.image.as_ref().clone();
        for pixel in image.pixels_mut() {
            for (channel, tint) in pixel.0.iter_mut().zip(color) {
                *channel = ((*channel as u16 * tint as u16) / 255) as u8;
            }
        }
        Sprite::new(image)
    }

    /// True when both handles point at the same pixel buffer.
    pub fn ptr_eq(&self, other: &Sprite) -> bool {
        Rc::ptr_eq(&self.image, &other.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn load_image_reports_missing_file() {
        let path = std::env::temp_dir().join(format!(
            "arcade_sprite_missing_{}.png",
            std::process::id()
        ));
        let err = load_image(&path).expect_err("missing file should fail");
        assert_eq!(err.path, path);
    }

    #[test]
    fn crop_copies_requested_region() {
        let sprite = Sprite::new(gradient(8, 8));
        let tile = sprite.crop(4, 2, 2, 3);
        assert_eq!(tile.image().dimensions(), (2, 3));
        assert_eq!(tile.image().get_pixel(0, 0).0, [4, 2, 0, 255]);
        assert_eq!(tile.image().get_pixel(1, 2).0, [5, 4, 0, 255]);
    }

    #[test]
    fn scaled_uses_nearest_neighbour() {
        let sprite = Sprite::new(gradient(2, 2));
        let big = sprite.scaled(3);
        assert_eq!(big.image().dimensions(), (6, 6));
        assert_eq!(big.image().get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(big.image().get_pixel(5, 5).0, [1, 1, 0, 255]);
    }

    #[test]
    fn scale_of_one_shares_pixels() {
        let sprite = Sprite::new(gradient(4, 4));
        assert!(sprite.scaled(1).ptr_eq(&sprite));
    }

    #[test]
    fn rotated_quarter_turn_swaps_dimensions() {
        let sprite = Sprite::new(gradient(4, 2));
        let turned = sprite.rotated(1);
        assert_eq!(turned.image().dimensions(), (2, 4));
        assert!(sprite.rotated(4).ptr_eq(&sprite));
    }

    #[test]
    fn tinted_white_takes_tint_color() {
        let sprite = Sprite::solid(2, 2, [255, 255, 255, 255]);
        let blue = sprite.tinted([0, 0, 255, 255]);
        assert_eq!(blue.image().get_pixel(1, 1).0, [0, 0, 255, 255]);
        assert!(!blue.ptr_eq(&sprite));
    }

    #[test]
    fn empty_sprite_is_transparent() {
        let sprite = Sprite::empty();
        assert_eq!(sprite.size(), Vec2::new(1.0, 1.0));
        assert_eq!(sprite.image().get_pixel(0, 0).0[3], 0);
    }
}
