//! The playable scenes and the factory that builds them.

pub mod flappy;
pub mod menu;
pub mod space;
pub mod town;

use std::cell::Cell;
use std::rc::Rc;

use arcade_core::ArenaKey;

use crate::assets::Assets;
use crate::config::GameConfig;
use crate::scene::{Scene, SceneFactory};
use crate::ui::{Font, BLUE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneId {
    Menu,
    Town,
    Flappy,
    FlappyDeath,
    Space,
    Paused,
}

impl ArenaKey for SceneId {
    const ALL: &'static [Self] = &[
        SceneId::Menu,
        SceneId::Town,
        SceneId::Flappy,
        SceneId::FlappyDeath,
        SceneId::Space,
        SceneId::Paused,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Final score of the last Flappy run, written by the game and read by the
/// death screen.
#[derive(Debug, Clone, Default)]
pub struct Scoreboard(Rc<Cell<u32>>);

impl Scoreboard {
    pub fn set(&self, score: u32) {
        self.0.set(score);
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

pub struct GameFactory {
    assets: Rc<Assets>,
    config: GameConfig,
    font: Font,
    hover_font: Font,
    scoreboard: Scoreboard,
    rng: fastrand::Rng,
}

impl GameFactory {
    pub fn new(assets: Rc<Assets>, config: GameConfig, rng: fastrand::Rng) -> Self {
        let font = Font::new(assets.font.clone());
        let hover_font = font.tinted(BLUE);
        Self {
            assets,
            config,
            font,
            hover_font,
            scoreboard: Scoreboard::default(),
            rng,
        }
    }

    /// Replace the tuning used for scenes built from now on.
    pub fn set_config(&mut self, config: GameConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

impl SceneFactory<SceneId> for GameFactory {
    fn build(&mut self, scene: SceneId) -> Box<dyn Scene<SceneId>> {
        let config = &self.config;
        match scene {
            SceneId::Menu => Box::new(menu::MenuScene::new(
                &self.font,
                &self.hover_font,
                &config.field,
            )),
            SceneId::Town => match town::TownScene::new(&self.assets, &config.town, &config.field) {
                Ok(scene) => Box::new(scene),
                Err(err) => {
                    log::error!("Town scene build failed: {err}");
                    panic!("Town scene could not be built from the loaded assets: {err}");
                }
            },
            SceneId::Flappy => Box::new(flappy::FlappyScene::new(
                &self.assets,
                &self.font,
                config,
                self.scoreboard.clone(),
                self.rng.fork(),
            )),
            SceneId::FlappyDeath => Box::new(flappy::DeathScene::new(
                &self.font,
                &config.field,
                self.scoreboard.clone(),
            )),
            SceneId::Space => Box::new(space::SpaceScene::new(
                &self.assets,
                &self.font,
                config,
                self.rng.fork(),
            )),
            SceneId::Paused => Box::new(space::PausedScene::new(&self.font, &config.field)),
        }
    }
}

/// Factory over synthetic assets with a fixed seed.
#[cfg(test)]
pub(crate) fn test_factory() -> GameFactory {
    GameFactory::new(
        Rc::new(Assets::synthetic()),
        GameConfig::default(),
        fastrand::Rng::with_seed(42),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingAudio;
    use crate::scene::SceneManager;

    #[test]
    fn factory_builds_every_scene() {
        let mut factory = test_factory();
        for &id in SceneId::ALL {
            let scene = factory.build(id);
            assert!(!scene.label().is_empty());
        }
    }

    #[test]
    fn manager_starts_in_menu() {
        let mut audio = RecordingAudio::default();
        let manager = SceneManager::new(test_factory(), SceneId::Menu, &mut audio);
        assert_eq!(manager.active(), SceneId::Menu);
        assert_eq!(manager.active_scene().label(), "Menu");
    }

    #[test]
    fn scoreboard_is_shared_between_clones() {
        let board = Scoreboard::default();
        let other = board.clone();
        board.set(7);
        assert_eq!(other.get(), 7);
    }

    #[test]
    fn reloaded_config_builds_every_scene_on_running_field() {
        let path = std::env::temp_dir().join(format!(
            "arcade_factory_test_reload_{}.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"{ "field": { "width": 4000, "height": 4000 }, "space": { "collectible_margin": 300 } }"#,
        )
        .expect("failed to write temp config file");

        let running = crate::config::FieldConfig::default();
        let config = crate::config::reload_config_from_path(&path, &running)
            .expect("margin 300 fits the running field");
        let mut factory = test_factory();
        factory.set_config(config);
        for &id in SceneId::ALL {
            factory.build(id);
        }
        assert_eq!(factory.config().field, running);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn set_config_applies_to_later_builds() {
        let mut factory = test_factory();
        let mut config = GameConfig::default();
        config.flappy.gravity = 10.0;
        factory.set_config(config);
        assert_eq!(factory.config().flappy.gravity, 10.0);
    }
}
