//! Software drawing surface.
//!
//! Scenes draw into a [`Canvas`]. The shipped implementation is a CPU
//! [`FrameBuffer`] at the game's logical resolution; the presenter uploads it
//! to the GPU once per frame. Keeping scenes behind the trait lets tests
//! render without a window.

use arcade_core::Rect;
use image::{imageops, Pixel, Rgba, RgbaImage};

use crate::sprite::Sprite;

pub trait Canvas {
    fn size(&self) -> (u32, u32);
    fn clear(&mut self, color: [u8; 4]);
    /// Alpha-blend `sprite` with its top-left corner at `(x, y)`; off-canvas
    /// parts are clipped.
    fn draw(&mut self, sprite: &Sprite, x: f32, y: f32);
    fn fill_rect(&mut self, rect: Rect, color: [u8; 4]);
}

pub struct FrameBuffer {
    pixels: RgbaImage,
    draws_this_frame: u32,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width.max(1), height.max(1)),
            draws_this_frame: 0,
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels.get_pixel(x, y).0
    }

    /// Sprite and rect draws since the last `clear`.
    pub fn draws_this_frame(&self) -> u32 {
        self.draws_this_frame
    }
}

impl Canvas for FrameBuffer {
    fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    fn clear(&mut self, color: [u8; 4]) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = Rgba(color);
        }
        self.draws_this_frame = 0;
    }

    fn draw(&mut self, sprite: &Sprite, x: f32, y: f32) {
        imageops::overlay(
            &mut self.pixels,
            sprite.image(),
            x.floor() as i64,
            y.floor() as i64,
        );
        self.draws_this_frame += 1;
    }

    fn fill_rect(&mut self, rect: Rect, color: [u8; 4]) {
        let (width, height) = self.pixels.dimensions();
        let x0 = rect.x.floor().clamp(0.0, width as f32) as u32;
        let y0 = rect.y.floor().clamp(0.0, height as f32) as u32;
        let x1 = rect.right().floor().clamp(0.0, width as f32) as u32;
        let y1 = rect.bottom().floor().clamp(0.0, height as f32) as u32;

        let paint = Rgba(color);
        for y in y0..y1 {
            for x in x0..x1 {
                let pixel = self.pixels.get_pixel_mut(x, y);
                if color[3] == u8::MAX {
                    *pixel = paint;
                } else {
                    pixel.blend(&paint);
                }
            }
        }
        self.draws_this_frame += 1;
    }
}
