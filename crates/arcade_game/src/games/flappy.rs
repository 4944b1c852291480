//! Side-scrolling "flap through the gaps" game and its death screen.

use arcade_core::input::{InputEvent, InputState, Key};
use arcade_core::motion::{Body, Motion};
use arcade_render::{Canvas, Sprite};
use glam::Vec2;

use crate::assets::Assets;
use crate::audio::{AudioOut, SoundId};
use crate::config::{FieldConfig, GameConfig};
use crate::games::{SceneId, Scoreboard};
use crate::scene::{Scene, SceneContext};
use crate::spawner::Environment;
use crate::ui::{Font, TextLabel};

const SKY: [u8; 4] = [90, 160, 220, 255];
const DEATH_BACKGROUND: [u8; 4] = [20, 0, 0, 255];

pub struct FlappyScene {
    player: Body,
    ball: Sprite,
    block: Sprite,
    environment: Environment,
    field: Vec2,
    jump_velocity: f32,
    score: u32,
    score_label: TextLabel,
    scoreboard: Scoreboard,
    dead: bool,
}

impl FlappyScene {
    pub fn new(
        assets: &Assets,
        font: &Font,
        config: &GameConfig,
        scoreboard: Scoreboard,
        rng: fastrand::Rng,
    ) -> Self {
        let flappy = &config.flappy;
        let field = config.field.size();
        let ball = assets.ball.clone();
        let block = assets.block.resized(flappy.block_size, flappy.block_size);

        let start = (field - ball.size()) * 0.5;
        let player = Body::new(
            start,
            ball.size(),
            Motion::Falling {
                velocity: flappy.initial_velocity,
                gravity: flappy.gravity,
            },
        );

        Self {
            player,
            ball,
            block,
            environment: Environment::new(flappy.spawner(&config.field), rng),
            field,
            jump_velocity: flappy.jump_velocity,
            score: 0,
            score_label: TextLabel::new(font.clone(), Vec2::new(16.0, 16.0), score_text(0)),
            scoreboard,
            dead: false,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    fn is_out_of_field(&self) -> bool {
        self.player.position.y > self.field.y
    }

    fn die(&mut self, ctx: &mut SceneContext<SceneId>) {
        self.dead = true;
        self.scoreboard.set(self.score);
        log::info!("Flappy run over with score {}", self.score);
        ctx.audio().play(SoundId::Hit);
        ctx.switch_to(SceneId::FlappyDeath);
    }
}

fn score_text(score: u32) -> String {
    format!("SCORE: {score}")
}

impl Scene<SceneId> for FlappyScene {
    fn poll_input(&mut self, events: &[InputEvent], _input: &InputState, ctx: &mut SceneContext<SceneId>) {
        for event in events {
            match event {
                InputEvent::KeyDown(Key::Space) if !self.dead => {
                    self.player.set_vertical_velocity(self.jump_velocity);
                    ctx.audio().play(SoundId::Jump);
                }
                InputEvent::KeyDown(Key::Escape) => ctx.switch_to(SceneId::Menu),
                _ => {}
            }
        }
    }

    fn update(&mut self, dt: f32, ctx: &mut SceneContext<SceneId>) {
        if self.dead {
            return;
        }

        self.player.update(dt);
        self.environment.track(self.player.position.x);
        let passed = self.environment.update(dt);
        if passed > 0 {
            self.score += passed;
            self.score_label.set_text(score_text(self.score));
        }

        if self.environment.collides(&self.player.rect()) || self.is_out_of_field() {
            self.die(ctx);
        }
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.clear(SKY);
        for obstacle in self.environment.obstacles() {
            for block in obstacle.blocks() {
                canvas.draw(&self.block, block.x, block.y);
            }
        }
        canvas.draw(&self.ball, self.player.position.x, self.player.position.y);
        self.score_label.render(canvas);
    }

    fn label(&self) -> &'static str {
        "Flappy"
    }

    fn entity_count(&self) -> usize {
        1 + self.environment.obstacles().len()
    }
}

/// Shown after a Flappy run ends. Space starts a fresh run.
pub struct DeathScene {
    title: TextLabel,
    score: TextLabel,
    hint: TextLabel,
    scoreboard: Scoreboard,
    width: f32,
}

impl DeathScene {
    pub fn new(font: &Font, field: &FieldConfig, scoreboard: Scoreboard) -> Self {
        let width = field.width as f32;
        let height = field.height as f32;
        Self {
            title: TextLabel::centered(font.clone(), width, height * 0.3, "GAME OVER"),
            score: TextLabel::centered(font.clone(), width, height * 0.45, score_text(scoreboard.get())),
            hint: TextLabel::centered(font.clone(), width, height * 0.6, "SPACE TO RETRY"),
            scoreboard,
            width,
        }
    }
}

impl Scene<SceneId> for DeathScene {
    fn poll_input(&mut self, events: &[InputEvent], _input: &InputState, ctx: &mut SceneContext<SceneId>) {
        for event in events {
            match event {
                InputEvent::KeyDown(Key::Space) => ctx.restart(SceneId::Flappy),
                InputEvent::KeyDown(Key::Escape) => ctx.switch_to(SceneId::Menu),
                _ => {}
            }
        }
    }

    fn update(&mut self, _dt: f32, _ctx: &mut SceneContext<SceneId>) {}

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.clear(DEATH_BACKGROUND);
        self.title.render(canvas);
        self.score.render(canvas);
        self.hint.render(canvas);
    }

    fn on_enter(&mut self, _audio: &mut dyn AudioOut) {
        self.score.set_text(score_text(self.scoreboard.get()));
        self.score.position.x = ((self.width - self.score.size().x) * 0.5).max(0.0);
    }

    fn label(&self) -> &'static str {
        "Flappy death"
    }
}
