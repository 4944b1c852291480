//! Scene state machine.
//!
//! Every scene is built once at startup and kept in an arena keyed by a
//! closed scene-id enum, so leaving a scene and coming back resumes it. A
//! scene never touches another scene or the manager: it records
//! [`SceneRequest`]s on the [`SceneContext`] it is handed, and the manager
//! applies them between phases.
//!
//! Frame order is fixed: input, apply requests, update, apply requests,
//! render. The quit flag, once set, is never cleared.

use arcade_core::input::{InputEvent, InputState};
use arcade_core::{Arena, ArenaKey};
use arcade_render::Canvas;

use crate::audio::AudioOut;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneRequest<K> {
    /// Make `K` active, keeping its state.
    Switch(K),
    /// Rebuild `K` from scratch, then make it active.
    Restart(K),
    Quit,
}

pub struct SceneContext<'a, K> {
    requests: Vec<SceneRequest<K>>,
    audio: &'a mut dyn AudioOut,
}

impl<'a, K: Copy> SceneContext<'a, K> {
    pub fn new(audio: &'a mut dyn AudioOut) -> Self {
        Self {
            requests: Vec::new(),
            audio,
        }
    }

    pub fn switch_to(&mut self, scene: K) {
        self.requests.push(SceneRequest::Switch(scene));
    }

    pub fn restart(&mut self, scene: K) {
        self.requests.push(SceneRequest::Restart(scene));
    }

    pub fn quit(&mut self) {
        self.requests.push(SceneRequest::Quit);
    }

    pub fn audio(&mut self) -> &mut dyn AudioOut {
        &mut *self.audio
    }

    pub fn requests(&self) -> &[SceneRequest<K>] {
        &self.requests
    }

    pub fn into_requests(self) -> Vec<SceneRequest<K>> {
        self.requests
    }
}

pub trait Scene<K> {
    /// Handle this frame's events. `input` reflects key and mouse state after
    /// all of them.
    fn poll_input(&mut self, events: &[InputEvent], input: &InputState, ctx: &mut SceneContext<K>);

    fn update(&mut self, dt: f32, ctx: &mut SceneContext<K>);

    fn render(&self, canvas: &mut dyn Canvas);

    /// Called each time the scene becomes active.
    fn on_enter(&mut self, _audio: &mut dyn AudioOut) {}

    fn label(&self) -> &'static str;

    fn entity_count(&self) -> usize {
        0
    }
}

/// Builds scenes on demand: every key at startup, one key on restart.
pub trait SceneFactory<K> {
    fn build(&mut self, scene: K) -> Box<dyn Scene<K>>;
}

pub struct SceneManager<K: ArenaKey, F: SceneFactory<K>> {
    scenes: Arena<K, Box<dyn Scene<K>>>,
    factory: F,
    active: K,
    quit: bool,
    transitions: u64,
}

impl<K: ArenaKey, F: SceneFactory<K>> SceneManager<K, F> {
    pub fn new(mut factory: F, initial: K, audio: &mut dyn AudioOut) -> Self {
        let mut scenes = Arena::new();
        for &key in K::ALL {
            scenes.insert(key, factory.build(key));
        }
        log::info!("Scene manager ready with {} scenes, starting in {:?}", scenes.len(), initial);

        let mut manager = Self {
            scenes,
            factory,
            active: initial,
            quit: false,
            transitions: 0,
        };
        if let Some(scene) = manager.scenes.get_mut(initial) {
            scene.on_enter(audio);
        }
        manager
    }

    /// Run one frame of the active scene. A `WindowClose` event quits from
    /// any scene.
    pub fn frame(
        &mut self,
        events: &[InputEvent],
        input: &InputState,
        dt: f32,
        canvas: &mut dyn Canvas,
        audio: &mut dyn AudioOut,
    ) {
        if self.quit {
            return;
        }
        if events.contains(&InputEvent::WindowClose) {
            log::info!("Close requested, exiting.");
            self.apply(SceneRequest::Quit, audio);
        }

        let requests = {
            let mut ctx = SceneContext::new(&mut *audio);
            self.active_scene_mut().poll_input(events, input, &mut ctx);
            ctx.into_requests()
        };
        self.apply_all(requests, audio);

        let requests = {
            let mut ctx = SceneContext::new(&mut *audio);
            self.active_scene_mut().update(dt, &mut ctx);
            ctx.into_requests()
        };
        self.apply_all(requests, audio);

        self.active_scene().render(canvas);
    }

    /// Apply a request from outside the scenes (debug overlay, window).
    pub fn request(&mut self, request: SceneRequest<K>, audio: &mut dyn AudioOut) {
        self.apply(request, audio);
    }

    pub fn active(&self) -> K {
        self.active
    }

    pub fn active_scene(&self) -> &dyn Scene<K> {
        match self.scenes.get(self.active) {
            Some(scene) => scene.as_ref(),
            None => unreachable!("every scene key is built at startup"),
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Scene switches and restarts applied since startup.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    fn active_scene_mut(&mut self) -> &mut dyn Scene<K> {
        match self.scenes.get_mut(self.active) {
            Some(scene) => scene.as_mut(),
            None => unreachable!("every scene key is built at startup"),
        }
    }

    fn apply_all(&mut self, requests: Vec<SceneRequest<K>>, audio: &mut dyn AudioOut) {
        for request in requests {
            self.apply(request, audio);
        }
    }

    fn apply(&mut self, request: SceneRequest<K>, audio: &mut dyn AudioOut) {
        if self.quit {
            return;
        }
        match request {
            SceneRequest::Switch(next) => {
                if next == self.active {
                    return;
                }
                self.enter(next, audio);
            }
            SceneRequest::Restart(next) => {
                log::info!("Rebuilding scene {:?}", next);
                let fresh = self.factory.build(next);
                self.scenes.insert(next, fresh);
                self.enter(next, audio);
            }
            SceneRequest::Quit => {
                log::info!("Quit requested from {:?}", self.active);
                self.quit = true;
            }
        }
    }

    fn enter(&mut self, next: K, audio: &mut dyn AudioOut) {
        log::info!("Scene transition: {:?} -> {:?}", self.active, next);
        self.active = next;
        self.transitions += 1;
        self.active_scene_mut().on_enter(audio);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingAudio;
    use arcade_core::input::Key;
    use arcade_render::FrameBuffer;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Id {
        Title,
        Play,
    }

    impl ArenaKey for Id {
        const ALL: &'static [Self] = &[Id::Title, Id::Play];

        fn index(self) -> usize {
            self as usize
        }
    }

    /// Shared log of which scene did what, in order.
    type Trace = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        id: Id,
        updates: u32,
        trace: Trace,
    }

    impl Scene<Id> for Recorder {
        fn poll_input(&mut self, events: &[InputEvent], _input: &InputState, ctx: &mut SceneContext<Id>) {
            self.trace.borrow_mut().push(format!("{:?}.poll", self.id));
            for event in events {
                match event {
                    InputEvent::KeyDown(Key::Enter) => ctx.switch_to(Id::Play),
                    InputEvent::KeyDown(Key::Escape) => ctx.switch_to(Id::Title),
                    InputEvent::KeyDown(Key::Space) => ctx.restart(Id::Play),
                    InputEvent::KeyDown(Key::Q) => ctx.quit(),
                    _ => {}
                }
            }
        }

        fn update(&mut self, _dt: f32, _ctx: &mut SceneContext<Id>) {
            self.updates += 1;
            self.trace.borrow_mut().push(format!("{:?}.update", self.id));
        }

        fn render(&self, _canvas: &mut dyn Canvas) {
            self.trace.borrow_mut().push(format!("{:?}.render", self.id));
        }

        fn on_enter(&mut self, _audio: &mut dyn AudioOut) {
            self.trace.borrow_mut().push(format!("{:?}.enter", self.id));
        }

        fn label(&self) -> &'static str {
            "recorder"
        }

        fn entity_count(&self) -> usize {
            self.updates as usize
        }
    }

    struct RecorderFactory {
        builds: u32,
        trace: Trace,
    }

    impl SceneFactory<Id> for RecorderFactory {
        fn build(&mut self, id: Id) -> Box<dyn Scene<Id>> {
            self.builds += 1;
            Box::new(Recorder {
                id,
                updates: 0,
                trace: self.trace.clone(),
            })
        }
    }

    struct Harness {
        manager: SceneManager<Id, RecorderFactory>,
        input: InputState,
        canvas: FrameBuffer,
        audio: RecordingAudio,
        trace: Trace,
    }

    impl Harness {
        fn new() -> Self {
            let trace: Trace = Rc::default();
            let mut audio = RecordingAudio::default();
            let factory = RecorderFactory {
                builds: 0,
                trace: trace.clone(),
            };
            let manager = SceneManager::new(factory, Id::Title, &mut audio);
            trace.borrow_mut().clear();
            Self {
                manager,
                input: InputState::new(),
                canvas: FrameBuffer::new(4, 4),
                audio,
                trace,
            }
        }

        fn frame(&mut self, events: &[InputEvent]) {
            for &event in events {
                self.input.push(event);
            }
            let events = self.input.take_events();
            self.manager
                .frame(&events, &self.input, 1.0 / 60.0, &mut self.canvas, &mut self.audio);
            self.input.end_frame();
        }

        fn trace(&self) -> Vec<String> {
            self.trace.borrow_mut().drain(..).collect()
        }
    }

    #[test]
    fn builds_every_scene_and_enters_initial() {
        let trace: Trace = Rc::default();
        let mut audio = RecordingAudio::default();
        let factory = RecorderFactory {
            builds: 0,
            trace: trace.clone(),
        };
        let manager = SceneManager::new(factory, Id::Title, &mut audio);
        assert_eq!(manager.active(), Id::Title);
        assert_eq!(manager.transitions(), 0);
        assert_eq!(trace.borrow().as_slice(), ["Title.enter"]);
    }

    #[test]
    fn frame_runs_poll_update_render_in_order() {
        let mut h = Harness::new();
        h.frame(&[]);
        assert_eq!(h.trace(), ["Title.poll", "Title.update", "Title.render"]);
    }

    #[test]
    fn switch_applies_before_update() {
        let mut h = Harness::new();
        h.frame(&[InputEvent::KeyDown(Key::Enter)]);
        assert_eq!(
            h.trace(),
            ["Title.poll", "Play.enter", "Play.update", "Play.render"]
        );
        assert_eq!(h.manager.active(), Id::Play);
        assert_eq!(h.manager.transitions(), 1);
    }

    #[test]
    fn switching_back_keeps_scene_state() {
        let mut h = Harness::new();
        h.frame(&[InputEvent::KeyDown(Key::Enter)]);
        h.frame(&[]);
        assert_eq!(h.manager.active_scene().entity_count(), 2);
        h.frame(&[InputEvent::KeyDown(Key::Escape)]);
        h.frame(&[InputEvent::KeyUp(Key::Enter), InputEvent::KeyDown(Key::Enter)]);
        // Two earlier updates plus this frame's.
        assert_eq!(h.manager.active_scene().entity_count(), 3);
    }

    #[test]
    fn switch_to_active_scene_is_ignored() {
        let mut h = Harness::new();
        h.frame(&[InputEvent::KeyDown(Key::Escape)]);
        assert_eq!(h.manager.transitions(), 0);
    }

    #[test]
    fn restart_rebuilds_scene() {
        let mut h = Harness::new();
        h.frame(&[InputEvent::KeyDown(Key::Enter)]);
        h.frame(&[]);
        h.frame(&[InputEvent::KeyDown(Key::Space)]);
        assert_eq!(h.manager.active_scene().entity_count(), 1);
        assert_eq!(h.manager.factory_mut().builds, 3);
        assert_eq!(h.manager.transitions(), 2);
    }

    #[test]
    fn quit_is_permanent_and_stops_frames() {
        let mut h = Harness::new();
        h.frame(&[InputEvent::KeyDown(Key::Q)]);
        assert!(h.manager.quit_requested());
        h.trace();

        h.manager.request(SceneRequest::Switch(Id::Play), &mut h.audio);
        assert!(h.manager.quit_requested());
        assert_eq!(h.manager.active(), Id::Title);
        h.frame(&[]);
        assert!(h.trace().is_empty());
    }

    #[test]
    fn quitting_frame_still_updates_and_renders() {
        let mut h = Harness::new();
        h.frame(&[InputEvent::KeyDown(Key::Q)]);
        assert!(h.manager.quit_requested());
        assert_eq!(h.trace(), ["Title.poll", "Title.update", "Title.render"]);
    }

    #[test]
    fn window_close_quits_from_any_scene() {
        let mut h = Harness::new();
        h.frame(&[InputEvent::KeyDown(Key::Enter)]);
        h.frame(&[InputEvent::WindowClose]);
        assert!(h.manager.quit_requested());
    }

    #[test]
    fn every_key_is_built_once_at_startup() {
        let h = Harness::new();
        assert_eq!(h.manager.scenes.len(), 2);
        assert_eq!(h.manager.factory.builds, 2);
    }
}
