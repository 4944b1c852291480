use arcade_core::input::{InputEvent, InputState, Key, MouseBtn};
use arcade_render::Canvas;
use glam::Vec2;

use crate::audio::AudioOut;
use crate::config::FieldConfig;
use crate::games::SceneId;
use crate::scene::{Scene, SceneContext};
use crate::ui::{Button, Font, MenuCommand, TextLabel};

const BACKGROUND: [u8; 4] = [0, 0, 0, 255];

/// Title screen. Each game is rebuilt when opened from here, so a run always
/// starts fresh and picks up reloaded config.
pub struct MenuScene {
    title: TextLabel,
    buttons: Vec<Button>,
}

impl MenuScene {
    pub fn new(font: &Font, hover_font: &Font, field: &FieldConfig) -> Self {
        let width = field.width as f32;
        let entries = [
            ("FLAPPY", MenuCommand::Open(SceneId::Flappy)),
            ("SPACE", MenuCommand::Open(SceneId::Space)),
            ("TOWN", MenuCommand::Open(SceneId::Town)),
            ("QUIT", MenuCommand::Quit),
        ];
        let top = field.height as f32 * 0.35;
        let step = font.cell() * 2.0;
        let buttons = entries
            .into_iter()
            .enumerate()
            .map(|(i, (text, command))| {
                let label = TextLabel::centered(font.clone(), width, top + i as f32 * step, text);
                Button::new(label, hover_font.clone(), command)
            })
            .collect();

        Self {
            title: TextLabel::centered(font.clone(), width, field.height as f32 * 0.15, "ARCADE"),
            buttons,
        }
    }

    fn hover(&mut self, mouse: Vec2) {
        for button in &mut self.buttons {
            button.set_hover(mouse);
        }
    }

    fn run(command: MenuCommand, ctx: &mut SceneContext<SceneId>) {
        match command {
            MenuCommand::Open(scene) => ctx.restart(scene),
            MenuCommand::Quit => ctx.quit(),
        }
    }
}

impl Scene<SceneId> for MenuScene {
    fn poll_input(&mut self, events: &[InputEvent], _input: &InputState, ctx: &mut SceneContext<SceneId>) {
        for event in events {
            match *event {
                InputEvent::MouseMoved(position) => self.hover(position),
                InputEvent::MouseDown(MouseBtn::Left, position) => {
                    self.hover(position);
                    if let Some(button) = self.buttons.iter().find(|b| b.is_hovered()) {
                        Self::run(button.command(), ctx);
                    }
                }
                InputEvent::KeyDown(Key::Num1) => ctx.restart(SceneId::Flappy),
                InputEvent::KeyDown(Key::Num2) => ctx.restart(SceneId::Space),
                InputEvent::KeyDown(Key::Num3) => ctx.restart(SceneId::Town),
                _ => {}
            }
        }
    }

    fn update(&mut self, _dt: f32, _ctx: &mut SceneContext<SceneId>) {}

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.clear(BACKGROUND);
        self.title.render(canvas);
        for button in &self.buttons {
            button.render(canvas);
        }
    }

    fn on_enter(&mut self, audio: &mut dyn AudioOut) {
        audio.stop_music();
    }

    fn label(&self) -> &'static str {
        "Menu"
    }

    fn entity_count(&self) -> usize {
        self.buttons.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingAudio;
    use crate::games::test_factory;
    use crate::scene::{SceneFactory, SceneRequest};
    use crate::ui::BLUE;

    fn menu() -> MenuScene {
        let font = Font::new(crate::assets::Assets::synthetic().font);
        MenuScene::new(&font, &font.tinted(BLUE), &FieldConfig::default())
    }

    fn poll(scene: &mut MenuScene, events: &[InputEvent]) -> Vec<SceneRequest<SceneId>> {
        let mut audio = RecordingAudio::default();
        let mut ctx = SceneContext::new(&mut audio);
        scene.poll_input(events, &InputState::new(), &mut ctx);
        ctx.into_requests()
    }

    fn center_of(scene: &MenuScene, index: usize) -> Vec2 {
        let rect = scene.buttons[index].rect();
        Vec2::new(rect.x + rect.w * 0.5, rect.y + rect.h * 0.5)
    }

    #[test]
    fn clicking_a_button_runs_its_command() {
        let mut scene = menu();
        let quit = center_of(&scene, 3);
        let requests = poll(&mut scene, &[InputEvent::MouseDown(MouseBtn::Left, quit)]);
        assert_eq!(requests, vec![SceneRequest::Quit]);

        let flappy = center_of(&scene, 0);
        let requests = poll(&mut scene, &[InputEvent::MouseDown(MouseBtn::Left, flappy)]);
        assert_eq!(requests, vec![SceneRequest::Restart(SceneId::Flappy)]);
    }

    #[test]
    fn hover_tracks_mouse_movement() {
        let mut scene = menu();
        let space = center_of(&scene, 1);
        poll(&mut scene, &[InputEvent::MouseMoved(space)]);
        assert!(scene.buttons[1].is_hovered());
        assert!(!scene.buttons[0].is_hovered());

        poll(&mut scene, &[InputEvent::MouseMoved(Vec2::ZERO)]);
        assert!(scene.buttons.iter().all(|b| !b.is_hovered()));
    }

    #[test]
    fn clicking_empty_space_does_nothing() {
        let mut scene = menu();
        let requests = poll(
            &mut scene,
            &[InputEvent::MouseDown(MouseBtn::Left, Vec2::new(1.0, 1.0))],
        );
        assert!(requests.is_empty());
    }

    #[test]
    fn number_keys_open_games() {
        let mut scene = menu();
        let requests = poll(
            &mut scene,
            &[
                InputEvent::KeyDown(Key::Num2),
                InputEvent::KeyDown(Key::Num3),
            ],
        );
        assert_eq!(
            requests,
            vec![
                SceneRequest::Restart(SceneId::Space),
                SceneRequest::Restart(SceneId::Town)
            ]
        );
    }

    #[test]
    fn factory_menu_renders_title_and_buttons() {
        let mut factory = test_factory();
        let scene = factory.build(SceneId::Menu);
        let mut frame = arcade_render::FrameBuffer::new(1280, 720);
        scene.render(&mut frame);
        assert!(frame.draws_this_frame() > 4);
        assert_eq!(scene.entity_count(), 4);
    }
}
