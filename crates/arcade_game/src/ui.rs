//! Bitmap text and menu buttons.
//!
//! Text is drawn glyph by glyph from the font atlas: digits at ids 0-9,
//! `A`-`Z` at 10-35, then space, `:`, `!` and `?`. Lower case is drawn as
//! upper case and anything else as `?`.

use std::rc::Rc;

use arcade_core::Rect;
use arcade_render::Canvas;
use glam::Vec2;

use crate::atlas::Atlas;
use crate::games::SceneId;

pub const WHITE: [u8; 4] = [255, 255, 255, 255];
pub const BLUE: [u8; 4] = [60, 110, 255, 255];

const SPACE_GLYPH: u32 = 36;
const UNKNOWN_GLYPH: u32 = 39;

pub fn glyph_id(c: char) -> u32 {
    match c.to_ascii_uppercase() {
        d @ '0'..='9' => d as u32 - '0' as u32,
        l @ 'A'..='Z' => 10 + (l as u32 - 'A' as u32),
        ' ' => SPACE_GLYPH,
        ':' => 37,
        '!' => 38,
        _ => UNKNOWN_GLYPH,
    }
}

#[derive(Clone)]
pub struct Font {
    glyphs: Rc<Atlas>,
}

impl Font {
    pub fn new(glyphs: Rc<Atlas>) -> Self {
        Self { glyphs }
    }

    /// Same glyphs multiplied by `color`.
    pub fn tinted(&self, color: [u8; 4]) -> Font {
        Font::new(Rc::new(self.glyphs.map_tiles(|glyph| glyph.tinted(color))))
    }

    pub fn cell(&self) -> f32 {
        self.glyphs.scaled_size() as f32
    }

    pub fn measure(&self, text: &str) -> Vec2 {
        Vec2::new(text.chars().count() as f32 * self.cell(), self.cell())
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, text: &str, position: Vec2) {
        let cell = self.cell();
        for (i, c) in text.chars().enumerate() {
            let id = glyph_id(c);
            if id == SPACE_GLYPH {
                continue;
            }
            if let Some(glyph) = self.glyphs.get(id) {
                canvas.draw(glyph, position.x + i as f32 * cell, position.y);
            }
        }
    }
}

pub struct TextLabel {
    pub position: Vec2,
    text: String,
    font: Font,
}

impl TextLabel {
    pub fn new(font: Font, position: Vec2, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
            font,
        }
    }

    /// A label horizontally centered in a field `width` pixels wide.
    pub fn centered(font: Font, width: f32, y: f32, text: impl Into<String>) -> Self {
        let mut label = Self::new(font, Vec2::new(0.0, y), text);
        label.position.x = ((width - label.size().x) * 0.5).max(0.0);
        label
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn size(&self) -> Vec2 {
        self.font.measure(&self.text)
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        self.font.draw(canvas, &self.text, self.position);
    }
}

/// What a menu button does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Open(SceneId),
    Quit,
}

pub struct Button {
    label: TextLabel,
    hover_font: Font,
    hovered: bool,
    command: MenuCommand,
}

impl Button {
    /// `font` is drawn normally and `hover_font` while the cursor is over the
    /// button.
    pub fn new(label: TextLabel, hover_font: Font, command: MenuCommand) -> Self {
        Self {
            label,
            hover_font,
            hovered: false,
            command,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_position_size(self.label.position, self.label.size())
    }

    pub fn set_hover(&mut self, mouse: Vec2) {
        self.hovered = self.rect().contains_point(mouse);
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn command(&self) -> MenuCommand {
        self.command
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        if self.hovered {
            self.hover_font
                .draw(canvas, self.label.text(), self.label.position);
        } else {
            self.label.render(canvas);
        }
    }
}
