//! Top-down collect-the-gem game and its pause screen.

use arcade_core::input::{InputEvent, InputState, Key};
use arcade_core::motion::{Body, Direction, Motion};
use arcade_core::Rect;
use arcade_render::{Canvas, Sprite};
use glam::Vec2;

use crate::assets::Assets;
use crate::audio::{AudioOut, MusicId, SoundId};
use crate::config::{FieldConfig, GameConfig, SpaceConfig};
use crate::games::SceneId;
use crate::scene::{Scene, SceneContext};
use crate::ui::{Font, TextLabel};

const SPACE_BACKGROUND: [u8; 4] = [0, 0, 0, 255];
const PAUSE_BACKGROUND: [u8; 4] = [0, 0, 20, 255];

fn steer(key: Key) -> Option<Direction> {
    match key {
        Key::W => Some(Direction::Up),
        Key::A => Some(Direction::Left),
        Key::S => Some(Direction::Down),
        Key::D => Some(Direction::Right),
        _ => None,
    }
}

/// Ship sprites pre-rotated for each facing.
struct ShipSprites {
    up: Sprite,
    down: Sprite,
    left: Sprite,
    right: Sprite,
}

impl ShipSprites {
    fn new(ship: &Sprite) -> Self {
        let turned = |direction: Direction| ship.rotated(direction.quarter_turns());
        Self {
            up: turned(Direction::Up),
            down: turned(Direction::Down),
            left: turned(Direction::Left),
            right: turned(Direction::Right),
        }
    }

    fn facing(&self, direction: Direction) -> &Sprite {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }
}

pub struct SpaceScene {
    ship: Body,
    sprites: ShipSprites,
    collectible: Sprite,
    collectible_position: Vec2,
    background: Sprite,
    field: Vec2,
    tuning: SpaceConfig,
    rng: fastrand::Rng,
    started: bool,
    score: u32,
    score_label: TextLabel,
    prompt: TextLabel,
}

impl SpaceScene {
    pub fn new(assets: &Assets, font: &Font, config: &GameConfig, rng: fastrand::Rng) -> Self {
        let tuning = config.space.clone();
        let field = config.field.size();
        let ship_sprite = assets.ship.resized(tuning.ship_size, tuning.ship_size);
        let extent = ship_sprite.size();

        let ship = Body::new(
            (field - extent) * 0.5,
            extent,
            Motion::Walking {
                speed: tuning.ship_speed,
                moving: false,
            },
        )
        .with_clamp(field - extent);

        let mut scene = Self {
            ship,
            sprites: ShipSprites::new(&ship_sprite),
            collectible: assets.collectible.clone(),
            collectible_position: Vec2::ZERO,
            background: assets.background.resized(config.field.width, config.field.height),
            field,
            tuning,
            rng,
            started: false,
            score: 0,
            score_label: TextLabel::new(font.clone(), Vec2::new(16.0, 16.0), "SCORE: 0"),
            prompt: TextLabel::centered(font.clone(), field.x, field.y * 0.75, "PRESS ANY KEY"),
        };
        scene.place_collectible();
        scene
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Uniform position in `[margin, size - margin]` on both axes.
    fn place_collectible(&mut self) {
        let margin = self.tuning.collectible_margin;
        let x = self.rng.u32(margin..=self.field.x as u32 - margin);
        let y = self.rng.u32(margin..=self.field.y as u32 - margin);
        self.collectible_position = Vec2::new(x as f32, y as f32);
    }

    fn collectible_rect(&self) -> Rect {
        Rect::from_position_size(self.collectible_position, self.collectible.size())
    }

    fn pick_up(&mut self, ctx: &mut SceneContext<SceneId>) {
        self.place_collectible();
        if let Motion::Walking { speed, .. } = &mut self.ship.motion {
            *speed += self.tuning.speed_bonus;
        }
        self.score += 1;
        self.score_label.set_text(format!("SCORE: {}", self.score));
        ctx.audio().play(SoundId::Collect);
        log::debug!(
            "Collected #{}; ship speed now {}",
            self.score,
            self.ship.speed()
        );
    }
}

impl Scene<SceneId> for SpaceScene {
    fn poll_input(&mut self, events: &[InputEvent], _input: &InputState, ctx: &mut SceneContext<SceneId>) {
        for event in events {
            match *event {
                InputEvent::KeyDown(Key::Escape) => ctx.switch_to(SceneId::Paused),
                InputEvent::KeyDown(key) => {
                    self.started = true;
                    if let Some(direction) = steer(key) {
                        self.ship.set_facing(direction);
                        self.ship.set_moving(true);
                    }
                }
                InputEvent::KeyUp(key) => {
                    if steer(key) == Some(self.ship.facing) {
                        self.ship.set_moving(false);
                    }
                }
                _ => {}
            }
        }
    }

    fn update(&mut self, dt: f32, ctx: &mut SceneContext<SceneId>) {
        if !self.started {
            return;
        }
        self.ship.update(dt);
        if self.ship.rect().overlaps(&self.collectible_rect()) {
            self.pick_up(ctx);
        }
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.clear(SPACE_BACKGROUND);
        canvas.draw(&self.background, 0.0, 0.0);
        canvas.draw(
            &self.collectible,
            self.collectible_position.x,
            self.collectible_position.y,
        );
        canvas.draw(
            self.sprites.facing(self.ship.facing),
            self.ship.position.x,
            self.ship.position.y,
        );
        self.score_label.render(canvas);
        if !self.started {
            self.prompt.render(canvas);
        }
    }

    fn on_enter(&mut self, audio: &mut dyn AudioOut) {
        audio.set_music_volume(self.tuning.music_volume);
        audio.play_music(MusicId::Space);
        audio.set_volume(SoundId::Collect, self.tuning.collect_volume);
    }

    fn label(&self) -> &'static str {
        "Space"
    }

    fn entity_count(&self) -> usize {
        2
    }
}

pub struct PausedScene {
    title: TextLabel,
    hint: TextLabel,
}

impl PausedScene {
    pub fn new(font: &Font, field: &FieldConfig) -> Self {
        let width = field.width as f32;
        let height = field.height as f32;
        Self {
            title: TextLabel::centered(font.clone(), width, height * 0.4, "PAUSED"),
            hint: TextLabel::centered(font.clone(), width, height * 0.55, "ESC RESUME  Q QUIT"),
        }
    }
}

impl Scene<SceneId> for PausedScene {
    fn poll_input(&mut self, events: &[InputEvent], _input: &InputState, ctx: &mut SceneContext<SceneId>) {
        for event in events {
            match event {
                InputEvent::KeyDown(Key::Escape) => ctx.switch_to(SceneId::Space),
                InputEvent::KeyDown(Key::Q) => ctx.quit(),
                _ => {}
            }
        }
    }

    fn update(&mut self, _dt: f32, _ctx: &mut SceneContext<SceneId>) {}

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.clear(PAUSE_BACKGROUND);
        self.title.render(canvas);
        self.hint.render(canvas);
    }

    fn label(&self) -> &'static str {
        "Paused"
    }
}
