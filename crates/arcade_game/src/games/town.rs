//! Top-down town: a scrolling tilemap, an idling enemy and a hero that walks
//! and attacks in four directions.

use std::rc::Rc;

use arcade_core::input::{InputEvent, InputState, Key};
use arcade_core::motion::{Body, Direction, Motion};
use arcade_core::ArenaKey;
use arcade_render::{Camera2D, Canvas};
use glam::Vec2;

use crate::animation::AnimationManager;
use crate::assets::Assets;
use crate::atlas::Atlas;
use crate::config::{FieldConfig, TownConfig};
use crate::games::SceneId;
use crate::scene::{Scene, SceneContext};
use crate::tilemap::Tilemap;

const MAP: [[u32; 25]; 12] = [
    [101, 91, 91, 91, 91, 91, 91, 91, 91, 91, 91, 91, 91, 91, 91, 91, 91, 91, 91, 91, 91, 91, 91, 91, 102],
    [81, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 79],
    [81, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 79],
    [81, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 71, 0, 0, 0, 0, 0, 0, 0, 0, 0, 79],
    [81, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 79],
    [81, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 79],
    [81, 0, 0, 0, 0, 0, 0, 0, 0, 71, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 79],
    [81, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 79],
    [81, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 79],
    [81, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 71, 0, 0, 0, 0, 0, 0, 0, 0, 0, 79],
    [81, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 79],
    [112, 69, 69, 69, 69, 69, 69, 69, 69, 69, 69, 69, 69, 69, 69, 69, 69, 69, 69, 69, 69, 69, 69, 69, 113],
];

const ENEMY_POSITION: Vec2 = Vec2::new(500.0, 500.0);
const BACKGROUND: [u8; 4] = [0, 0, 0, 255];

/// Frame layout of the hero sheet: one row per direction, idle frames in
/// columns 0-1, walk in 2-3, attack in 4-6.
const HERO_SHEET_COLUMNS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TownSheet {
    Hero,
    Enemy,
}

impl ArenaKey for TownSheet {
    const ALL: &'static [Self] = &[TownSheet::Hero, TownSheet::Enemy];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyAnim {
    Idle,
}

impl ArenaKey for EnemyAnim {
    const ALL: &'static [Self] = &[EnemyAnim::Idle];

    fn index(self) -> usize {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroAnim {
    Idle(Direction),
    Walk(Direction),
    Attack(Direction),
}

fn sheet_row(direction: Direction) -> u32 {
    match direction {
        Direction::Down => 0,
        Direction::Up => 1,
        Direction::Left => 2,
        Direction::Right => 3,
    }
}

impl HeroAnim {
    fn keyframes(self) -> Vec<u32> {
        let (direction, columns) = match self {
            HeroAnim::Idle(d) => (d, 0..2),
            HeroAnim::Walk(d) => (d, 2..4),
            HeroAnim::Attack(d) => (d, 4..7),
        };
        let row_start = sheet_row(direction) * HERO_SHEET_COLUMNS;
        columns.map(|column| row_start + column).collect()
    }
}

impl ArenaKey for HeroAnim {
    const ALL: &'static [Self] = &[
        HeroAnim::Idle(Direction::Down),
        HeroAnim::Idle(Direction::Up),
        HeroAnim::Idle(Direction::Left),
        HeroAnim::Idle(Direction::Right),
        HeroAnim::Walk(Direction::Down),
        HeroAnim::Walk(Direction::Up),
        HeroAnim::Walk(Direction::Left),
        HeroAnim::Walk(Direction::Right),
        HeroAnim::Attack(Direction::Down),
        HeroAnim::Attack(Direction::Up),
        HeroAnim::Attack(Direction::Left),
        HeroAnim::Attack(Direction::Right),
    ];

    fn index(self) -> usize {
        let (group, direction) = match self {
            HeroAnim::Idle(d) => (0, d),
            HeroAnim::Walk(d) => (1, d),
            HeroAnim::Attack(d) => (2, d),
        };
        group * 4 + sheet_row(direction) as usize
    }
}

struct Enemy {
    position: Vec2,
    animations: AnimationManager<EnemyAnim, TownSheet>,
}

impl Enemy {
    fn new(sheet: Rc<Atlas>, position: Vec2, frame_time: f32) -> Result<Self, String> {
        let mut animations = AnimationManager::new();
        animations.add_atlas(TownSheet::Enemy, sheet);
        animations
            .register(EnemyAnim::Idle, &[0, 1, 2, 3, 4], TownSheet::Enemy)
            .map_err(|e| format!("Enemy animation setup failed: {e}"))?;
        animations.activate(EnemyAnim::Idle, frame_time, true);
        Ok(Self {
            position,
            animations,
        })
    }
}

struct Hero {
    body: Body,
    animations: AnimationManager<HeroAnim, TownSheet>,
    attacking: bool,
    walk_frame_time: f32,
    idle_frame_time: f32,
    attack_frame_time: f32,
}

impl Hero {
    fn new(sheet: Rc<Atlas>, position: Vec2, world: Vec2, town: &TownConfig) -> Result<Self, String> {
        let extent = Vec2::splat(sheet.scaled_size() as f32);
        let mut animations = AnimationManager::new();
        animations.add_atlas(TownSheet::Hero, sheet);
        for &anim in HeroAnim::ALL {
            animations
                .register(anim, &anim.keyframes(), TownSheet::Hero)
                .map_err(|e| format!("Hero animation {anim:?} setup failed: {e}"))?;
        }
        animations.activate(HeroAnim::Idle(Direction::Down), town.idle_frame_time, true);

        let mut body = Body::new(
            position,
            extent,
            Motion::Walking {
                speed: town.hero_speed,
                moving: false,
            },
        )
        .with_clamp((world - extent).max(Vec2::ZERO));
        body.set_facing(Direction::Down);

        Ok(Self {
            body,
            animations,
            attacking: false,
            walk_frame_time: town.walk_frame_time,
            idle_frame_time: town.idle_frame_time,
            attack_frame_time: town.attack_frame_time,
        })
    }

    fn is_moving(&self) -> bool {
        matches!(self.body.motion, Motion::Walking { moving: true, .. })
    }

    fn attack(&mut self) {
        self.attacking = true;
        self.body.set_moving(false);
        self.animations
            .restart(HeroAnim::Attack(self.body.facing), self.attack_frame_time, false);
    }

    fn steer(&mut self, direction: Option<Direction>) {
        if self.attacking {
            return;
        }
        match direction {
            Some(direction) => {
                self.body.set_facing(direction);
                self.body.set_moving(true);
            }
            None => self.body.set_moving(false),
        }
    }

    fn update(&mut self, dt: f32) {
        if self.attacking {
            self.animations.update(dt);
            if !self.animations.is_playing() {
                self.attacking = false;
            }
            return;
        }

        self.body.update(dt);
        let facing = self.body.facing;
        if self.is_moving() {
            self.animations
                .activate(HeroAnim::Walk(facing), self.walk_frame_time, true);
        } else {
            self.animations
                .activate(HeroAnim::Idle(facing), self.idle_frame_time, true);
        }
        self.animations.update(dt);
    }

    fn center(&self) -> Vec2 {
        self.body.position + self.body.extent * 0.5
    }
}

/// First held direction in up, down, left, right order.
fn held_direction(input: &InputState) -> Option<Direction> {
    const BINDINGS: [(Key, Key, Direction); 4] = [
        (Key::W, Key::Up, Direction::Up),
        (Key::S, Key::Down, Direction::Down),
        (Key::A, Key::Left, Direction::Left),
        (Key::D, Key::Right, Direction::Right),
    ];
    BINDINGS
        .iter()
        .find(|(letter, arrow, _)| input.is_held(*letter) || input.is_held(*arrow))
        .map(|&(_, _, direction)| direction)
}

pub struct TownScene {
    map: Tilemap,
    camera: Camera2D,
    hero: Hero,
    enemy: Enemy,
}

impl TownScene {
    pub fn new(assets: &Assets, town: &TownConfig, field: &FieldConfig) -> Result<Self, String> {
        let rows: Vec<&[u32]> = MAP.iter().map(|row| row.as_slice()).collect();
        let map = Tilemap::new(&rows, assets.tileset.clone())?;
        let world = map.world_size();

        let hero_extent = Vec2::splat(assets.hero.scaled_size() as f32);
        let hero = Hero::new(assets.hero.clone(), (world - hero_extent) * 0.5, world, town)?;
        let enemy = Enemy::new(assets.enemy_idle.clone(), ENEMY_POSITION, town.enemy_frame_time)?;

        let mut camera = Camera2D::new(field.width, field.height);
        camera.follow(hero.center(), world);

        Ok(Self {
            map,
            camera,
            hero,
            enemy,
        })
    }
}

impl Scene<SceneId> for TownScene {
    fn poll_input(&mut self, events: &[InputEvent], input: &InputState, ctx: &mut SceneContext<SceneId>) {
        for event in events {
            match event {
                InputEvent::KeyDown(Key::Escape) => ctx.switch_to(SceneId::Menu),
                InputEvent::KeyDown(Key::Space) => self.hero.attack(),
                _ => {}
            }
        }
        self.hero.steer(held_direction(input));
    }

    fn update(&mut self, dt: f32, _ctx: &mut SceneContext<SceneId>) {
        self.hero.update(dt);
        self.enemy.animations.update(dt);
        self.camera.follow(self.hero.center(), self.map.world_size());
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.clear(BACKGROUND);
        self.map.render(canvas, &self.camera);

        let enemy = self.camera.world_to_screen(self.enemy.position);
        canvas.draw(self.enemy.animations.current_sprite(), enemy.x, enemy.y);

        let hero = self.camera.world_to_screen(self.hero.body.position);
        canvas.draw(self.hero.animations.current_sprite(), hero.x, hero.y);
    }

    fn label(&self) -> &'static str {
        "Town"
    }

    fn entity_count(&self) -> usize {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingAudio;
    use crate::scene::SceneRequest;

    fn scene() -> TownScene {
        TownScene::new(
            &Assets::synthetic(),
            &TownConfig::default(),
            &FieldConfig::default(),
        )
        .expect("town builds over synthetic assets")
    }

    fn frame(scene: &mut TownScene, input: &mut InputState, events: &[InputEvent], dt: f32) -> Vec<SceneRequest<SceneId>> {
        for &event in events {
            input.push(event);
        }
        let events = input.take_events();
        let mut audio = RecordingAudio::default();
        let mut ctx = SceneContext::new(&mut audio);
        scene.poll_input(&events, input, &mut ctx);
        scene.update(dt, &mut ctx);
        input.end_frame();
        ctx.into_requests()
    }

    #[test]
    fn hero_anim_indices_are_dense_and_unique() {
        let mut seen: Vec<usize> = HeroAnim::ALL.iter().map(|a| a.index()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..12).collect::<Vec<_>>());
        assert_eq!(HeroAnim::Attack(Direction::Left).keyframes(), vec![20, 21, 22]);
        assert_eq!(HeroAnim::Idle(Direction::Down).keyframes(), vec![0, 1]);
    }

    #[test]
    fn map_covers_a_world_larger_than_the_field() {
        let scene = scene();
        assert_eq!(scene.map.map_width(), 25);
        assert_eq!(scene.map.map_height(), 12);
        assert_eq!(scene.map.world_size(), Vec2::new(1600.0, 768.0));
        assert_eq!(scene.map.id_at(24, 11), Some(113));
    }

    #[test]
    fn map_rejects_a_tileset_too_small_for_its_ids() {
        let mut assets = Assets::synthetic();
        let image = image::RgbaImage::new(160, 16);
        assets.tileset = Rc::new(Atlas::from_image(image, 16, 4).expect("small atlas"));
        let err = match TownScene::new(&assets, &TownConfig::default(), &FieldConfig::default()) {
            Ok(_) => panic!("ten tiles cannot hold id 101"),
            Err(err) => err,
        };
        assert!(err.contains("Tilemap validation failed"));
    }

    #[test]
    fn enemy_idle_loops_over_five_frames() {
        let mut scene = scene();
        let mut input = InputState::new();
        for _ in 0..4 {
            frame(&mut scene, &mut input, &[], 0.1);
        }
        assert_eq!(scene.enemy.animations.cursor(EnemyAnim::Idle), Some(4));
        frame(&mut scene, &mut input, &[], 0.1);
        assert_eq!(scene.enemy.animations.cursor(EnemyAnim::Idle), Some(0));
        assert!(scene.enemy.animations.is_playing());
    }

    #[test]
    fn holding_a_key_walks_and_releasing_idles() {
        let mut scene = scene();
        let mut input = InputState::new();
        let start = scene.hero.body.position;

        frame(&mut scene, &mut input, &[InputEvent::KeyDown(Key::D)], 0.5);
        assert_eq!(scene.hero.body.position, start + Vec2::new(120.0, 0.0));
        assert_eq!(scene.hero.animations.active(), Some(HeroAnim::Walk(Direction::Right)));

        frame(&mut scene, &mut input, &[], 0.5);
        assert_eq!(scene.hero.body.position, start + Vec2::new(240.0, 0.0));

        frame(&mut scene, &mut input, &[InputEvent::KeyUp(Key::D)], 0.5);
        assert_eq!(scene.hero.body.position, start + Vec2::new(240.0, 0.0));
        assert_eq!(scene.hero.animations.active(), Some(HeroAnim::Idle(Direction::Right)));
    }

    #[test]
    fn arrow_keys_steer_too() {
        let mut scene = scene();
        let mut input = InputState::new();
        let start = scene.hero.body.position;
        frame(&mut scene, &mut input, &[InputEvent::KeyDown(Key::Up)], 0.25);
        assert_eq!(scene.hero.body.facing, Direction::Up);
        assert_eq!(scene.hero.body.position, start + Vec2::new(0.0, -60.0));
    }

    #[test]
    fn attack_plays_once_and_freezes_movement() {
        let mut scene = scene();
        let mut input = InputState::new();
        frame(&mut scene, &mut input, &[InputEvent::KeyDown(Key::A)], 0.0);
        let start = scene.hero.body.position;

        frame(&mut scene, &mut input, &[InputEvent::KeyDown(Key::Space)], 0.08);
        assert_eq!(scene.hero.animations.active(), Some(HeroAnim::Attack(Direction::Left)));
        assert!(scene.hero.attacking);
        assert_eq!(scene.hero.body.position, start);

        frame(&mut scene, &mut input, &[], 0.08);
        assert!(!scene.hero.attacking);
        assert_eq!(scene.hero.animations.cursor(HeroAnim::Attack(Direction::Left)), Some(2));

        frame(&mut scene, &mut input, &[], 0.5);
        assert_eq!(scene.hero.animations.active(), Some(HeroAnim::Walk(Direction::Left)));
        assert!(scene.hero.body.position.x < start.x);
    }

    #[test]
    fn hero_is_clamped_to_the_map_and_camera_follows() {
        let mut scene = scene();
        let mut input = InputState::new();
        frame(&mut scene, &mut input, &[InputEvent::KeyDown(Key::D)], 30.0);
        assert_eq!(scene.hero.body.position.x, 1600.0 - 16.0);
        assert_eq!(scene.camera.position.x, 1600.0 - 1280.0);

        frame(&mut scene, &mut input, &[InputEvent::KeyUp(Key::D), InputEvent::KeyDown(Key::W)], 30.0);
        assert_eq!(scene.hero.body.position.y, 0.0);
        assert_eq!(scene.camera.position.y, 0.0);
    }

    #[test]
    fn escape_returns_to_menu() {
        let mut scene = scene();
        let mut input = InputState::new();
        let requests = frame(&mut scene, &mut input, &[InputEvent::KeyDown(Key::Escape)], 0.0);
        assert_eq!(requests, vec![SceneRequest::Switch(SceneId::Menu)]);
    }

    #[test]
    fn render_draws_visible_tiles_and_both_characters() {
        let scene = scene();
        let mut canvas = arcade_render::FrameBuffer::new(1280, 720);
        scene.render(&mut canvas);
        assert!(canvas.draws_this_frame() >= 20 * 11 + 2);
    }
}
