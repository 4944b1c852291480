//! Arcade -- main loop and application entry point.
//!
//! winit drives the event loop via `ApplicationHandler`. Window events are
//! translated into engine `InputEvent`s as they arrive and buffered in
//! `InputState`. Each `RedrawRequested` then runs one frame:
//!
//!   1. `begin_frame()` -- measure the wall-clock delta (capped)
//!   2. poll the config file and apply a changed one to future scene builds
//!   3. drain the buffered events into the active scene: poll, update, render
//!      into the CPU frame buffer
//!   4. upload the frame, draw it letterboxed, composite the egui overlay
//!
//! The loop ends when a scene (or a window close) sets the quit flag.

mod animation;
mod assets;
mod atlas;
mod audio;
mod config;
mod games;
mod scene;
mod spawner;
mod tilemap;
mod ui;

use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use arcade_core::input::{InputEvent, InputState, Key, MouseBtn};
use arcade_core::time::FrameClock;
use arcade_devtools::{DebugOverlay, OverlayStats};
use arcade_platform::PlatformConfig;
use arcade_render::{window_to_frame, Canvas, FrameBuffer, GpuContext, Presenter};

use assets::{Assets, ASSET_ROOT};
use audio::LogAudio;
use config::{
    load_config_or_default, reload_config_from_path, ConfigWatcher, GameConfig, CONFIG_PATH,
};
use games::{GameFactory, SceneId};
use scene::{SceneManager, SceneRequest};

/// All mutable engine state. Constructed lazily in `ApplicationHandler::resumed`
/// once the window and GPU surface are available.
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    presenter: Presenter,
    debug_overlay: DebugOverlay,
    clock: FrameClock,
    input: InputState,
    /// Last cursor position in frame pixels, for mouse button events.
    cursor: Vec2,
    frame: FrameBuffer,
    scenes: SceneManager<SceneId, GameFactory>,
    audio: LogAudio,
    config_watcher: ConfigWatcher,
}

impl EngineState {
    fn new(window: Arc<Window>, config: GameConfig, assets: Rc<Assets>) -> Result<Self, String> {
        let gpu = GpuContext::new(window.clone())?;
        let presenter = Presenter::new(&gpu);
        let debug_overlay = DebugOverlay::new(&gpu.device, gpu.surface_format, &window);

        let frame = FrameBuffer::new(config.field.width, config.field.height);
        let mut audio = LogAudio::new();
        let factory = GameFactory::new(assets, config, fastrand::Rng::new());
        let scenes = SceneManager::new(factory, SceneId::Menu, &mut audio);

        Ok(Self {
            window,
            gpu,
            presenter,
            debug_overlay,
            clock: FrameClock::new(),
            input: InputState::new(),
            cursor: Vec2::ZERO,
            frame,
            scenes,
            audio,
            config_watcher: ConfigWatcher::new(PathBuf::from(CONFIG_PATH)),
        })
    }

    fn frame_size(&self) -> (u32, u32) {
        self.frame.size()
    }

    /// Reload the config when the file changed. The frame buffer is sized
    /// once at startup, so a changed field size is ignored until restart.
    fn reload_config(&mut self) {
        if !self.config_watcher.should_reload() {
            return;
        }
        let path = self.config_watcher.path().display().to_string();
        let running_field = self.scenes.factory_mut().config().field.clone();
        match reload_config_from_path(self.config_watcher.path(), &running_field) {
            Ok(config) => {
                self.scenes.factory_mut().set_config(config);
                log::info!("Config reloaded from {path}; applies to scenes started from now on");
            }
            Err(err) => {
                log::error!("Config reload failed ({path}), keeping previous values: {err}");
            }
        }
    }

    fn overlay_stats(&self) -> OverlayStats {
        let scene = self.scenes.active_scene();
        OverlayStats {
            scene_label: scene.label().to_string(),
            entity_count: scene.entity_count(),
            draw_count: self.frame.draws_this_frame(),
            transitions: self.scenes.transitions(),
            frame_size: self.frame_size(),
        }
    }
}

struct App {
    platform: PlatformConfig,
    state: Option<EngineState>,
}

impl App {
    fn new() -> Self {
        Self {
            platform: PlatformConfig::default(),
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let config = match load_config_or_default(Path::new(CONFIG_PATH)) {
            Ok(config) => config,
            Err(err) => {
                log::error!("Startup config load failed: {err}");
                event_loop.exit();
                return;
            }
        };

        let assets = match Assets::load(Path::new(ASSET_ROOT), &config) {
            Ok(assets) => Rc::new(assets),
            Err(err) => {
                log::error!("Startup asset load failed: {err}");
                panic!(
                    "Startup assets could not be loaded ({err}); run arcade_assetgen to create placeholders"
                );
            }
        };

        self.platform.width = config.field.width;
        self.platform.height = config.field.height;
        let window = arcade_platform::create_window(event_loop, &self.platform);

        match EngineState::new(window, config, assets) {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                log::error!("Engine startup failed: {err}");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state
            .debug_overlay
            .handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                state.input.push(InputEvent::WindowClose);
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    match (map_key(key_code), event.state) {
                        (Some(Key::F3), ElementState::Pressed) if !event.repeat => {
                            state.debug_overlay.toggle();
                        }
                        (Some(Key::F3), _) => {}
                        (Some(key), ElementState::Pressed) => {
                            state.input.push(InputEvent::KeyDown(key));
                        }
                        (Some(key), ElementState::Released) => {
                            state.input.push(InputEvent::KeyUp(key));
                        }
                        (None, _) => {}
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let point = Vec2::new(position.x as f32, position.y as f32);
                let frame_size = state.frame_size();
                if let Some(mapped) = window_to_frame(point, frame_size, state.gpu.size) {
                    state.cursor = mapped;
                    state.input.push(InputEvent::MouseMoved(mapped));
                }
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } if !egui_consumed => {
                if let Some(btn) = map_mouse_button(button) {
                    let event = match button_state {
                        ElementState::Pressed => InputEvent::MouseDown(btn, state.cursor),
                        ElementState::Released => InputEvent::MouseUp(btn, state.cursor),
                    };
                    state.input.push(event);
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                let dt = state.clock.begin_frame() as f32;
                state.reload_config();

                // Scene phase: every buffered event is consumed exactly once.
                let events = state.input.take_events();
                state.scenes.frame(
                    &events,
                    &state.input,
                    dt,
                    &mut state.frame,
                    &mut state.audio,
                );
                state.input.end_frame();

                // The frame that requested quit is still presented.
                let quitting = state.scenes.quit_requested();
                if quitting {
                    log::info!(
                        "Quitting after {} frames and {} scene transitions",
                        state.clock.frame_count,
                        state.scenes.transitions()
                    );
                }

                state.presenter.upload(&state.gpu, &state.frame);

                let Some((output, view)) = state.gpu.begin_frame() else {
                    if quitting {
                        event_loop.exit();
                    }
                    return;
                };

                let stats = state.overlay_stats();
                let (egui_primitives, egui_textures_delta, overlay_actions) =
                    state
                        .debug_overlay
                        .prepare(&state.window, &state.clock, &stats);

                // Overlay buttons act on the next frame.
                if overlay_actions.restart_scene {
                    let active = state.scenes.active();
                    state
                        .scenes
                        .request(SceneRequest::Restart(active), &mut state.audio);
                }
                if overlay_actions.return_to_menu {
                    state
                        .scenes
                        .request(SceneRequest::Switch(SceneId::Menu), &mut state.audio);
                }

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [state.gpu.size.0, state.gpu.size.1],
                    pixels_per_point: state.window.scale_factor() as f32,
                };

                let mut encoder =
                    state
                        .gpu
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Frame Encoder"),
                        });

                state.presenter.draw(&state.gpu, &mut encoder, &view);

                state.debug_overlay.upload(
                    &state.gpu.device,
                    &state.gpu.queue,
                    &mut encoder,
                    &egui_primitives,
                    &egui_textures_delta,
                    &screen_descriptor,
                );

                {
                    let mut egui_pass = encoder
                        .begin_render_pass(&wgpu::RenderPassDescriptor {
                            label: Some("egui Render Pass"),
                            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view: &view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                    load: wgpu::LoadOp::Load,
                                    store: wgpu::StoreOp::Store,
                                },
                            })],
                            depth_stencil_attachment: None,
                            ..Default::default()
                        })
                        .forget_lifetime();

                    state
                        .debug_overlay
                        .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
                }

                state.debug_overlay.cleanup(&egui_textures_delta);

                state.gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();

                if quitting {
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Space => Some(Key::Space),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::F3 => Some(Key::F3),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::KeyQ => Some(Key::Q),
        KeyCode::Digit1 => Some(Key::Num1),
        KeyCode::Digit2 => Some(Key::Num2),
        KeyCode::Digit3 => Some(Key::Num3),
        _ => None,
    }
}

fn map_mouse_button(button: MouseButton) -> Option<MouseBtn> {
    match button {
        MouseButton::Left => Some(MouseBtn::Left),
        MouseButton::Right => Some(MouseBtn::Right),
        MouseButton::Middle => Some(MouseBtn::Middle),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Arcade starting...");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_keys_are_mapped() {
        assert_eq!(map_key(KeyCode::KeyQ), Some(Key::Q));
        assert_eq!(map_key(KeyCode::Digit2), Some(Key::Num2));
        assert_eq!(map_key(KeyCode::ArrowUp), Some(Key::Up));
        assert_eq!(map_key(KeyCode::KeyZ), None);
    }

    #[test]
    fn extra_mouse_buttons_are_ignored() {
        assert_eq!(map_mouse_button(MouseButton::Left), Some(MouseBtn::Left));
        assert_eq!(map_mouse_button(MouseButton::Back), None);
    }
}
