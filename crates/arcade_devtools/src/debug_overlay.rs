//! Debug overlay rendered via egui on top of the presented frame.
//!
//! egui needs a split render because `egui_wgpu::Renderer::render()` takes a
//! `RenderPass<'static>` while `begin_render_pass` borrows the encoder:
//!
//!   1. `prepare()` -- run the UI, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers
//!   3. `paint()`   -- render into a pass made with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references
//!
//! The window only draws while `visible` (F3), but events always go through
//! egui so the overlay can take clicks when shown.

use arcade_core::time::FrameClock;
use winit::window::Window;

#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    /// Name of the running scene.
    pub scene_label: String,
    pub entity_count: usize,
    /// Sprite and rect draws into the frame buffer this frame.
    pub draw_count: u32,
    /// Scene switches since startup.
    pub transitions: u64,
    pub frame_size: (u32, u32),
}

#[derive(Debug, Clone, Default)]
pub struct OverlayActions {
    pub restart_scene: bool,
    pub return_to_menu: bool,
}

/// Text rows shown in the overlay window.
pub fn stat_lines(clock: &FrameClock, stats: &OverlayStats) -> Vec<String> {
    vec![
        format!("FPS: {:.1}", clock.smoothed_fps),
        format!("Frame time: {:.2} ms", clock.smoothed_frame_time_ms),
        format!("Frame: {}", clock.frame_count),
        format!("Scene: {}", stats.scene_label),
        format!("Entities: {}", stats.entity_count),
        format!("Draws: {}", stats.draw_count),
        format!("Transitions: {}", stats.transitions),
        format!("Resolution: {}x{}", stats.frame_size.0, stats.frame_size.1),
    ]
}

pub struct DebugOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub visible: bool,
}

impl DebugOverlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            visible: false,
        }
    }

    /// Returns true when egui consumed the event and the game should not
    /// see it.
    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        self.visible && response.consumed
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::info!("Debug overlay: {}", if self.visible { "ON" } else { "OFF" });
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        clock: &FrameClock,
        stats: &OverlayStats,
    ) -> (
        Vec<egui::ClippedPrimitive>,
        egui::TexturesDelta,
        OverlayActions,
    ) {
        let mut actions = OverlayActions::default();
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let visible = self.visible;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if !visible {
                return;
            }
            egui::Window::new("Debug")
                .default_pos([10.0, 10.0])
                .show(ctx, |ui| {
                    for line in stat_lines(clock, stats) {
                        ui.label(line);
                    }
                    ui.separator();
                    ui.horizontal(|ui| {
                        if ui.button("Restart scene").clicked() {
                            actions.restart_scene = true;
                        }
                        if ui.button("Menu").clicked() {
                            actions.return_to_menu = true;
                        }
                    });
                });
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta, actions)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_lines_include_scene_and_counters() {
        let clock = FrameClock::new();
        let stats = OverlayStats {
            scene_label: "Flappy".to_string(),
            entity_count: 12,
            draw_count: 40,
            transitions: 3,
            frame_size: (1280, 720),
        };
        let lines = stat_lines(&clock, &stats);
        assert!(lines.contains(&"Scene: Flappy".to_string()));
        assert!(lines.contains(&"Entities: 12".to_string()));
        assert!(lines.contains(&"Transitions: 3".to_string()));
        assert!(lines.contains(&"Resolution: 1280x720".to_string()));
    }
}
