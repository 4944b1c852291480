//! Per-entity animation manager.
//!
//! An entity registers named keyframe sequences over one or more atlases and
//! activates at most one of them at a time. Animations and atlases are keyed
//! by small closed enums (see `arcade_core::arena`), so every lookup is an
//! array index.
//!
//! Activation never resets a cursor. Switching back to an animation resumes
//! it where it stopped, and re-activating the current animation only changes
//! its frequency and loop flag. Use [`AnimationManager::restart`] to play a
//! sequence from its first keyframe.

use std::fmt;
use std::rc::Rc;

use arcade_core::animation::Keyframes;
use arcade_core::{Arena, ArenaKey};
use arcade_render::Sprite;

use crate::atlas::Atlas;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationError {
    UnknownAtlas,
    Empty,
    KeyframeOutOfRange { id: u32, tiles: usize },
}

impl fmt::Display for AnimationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAtlas => write!(f, "animation references an atlas that was not added"),
            Self::Empty => write!(f, "animation has no keyframes"),
            Self::KeyframeOutOfRange { id, tiles } => {
                write!(f, "keyframe id {id} out of range for atlas with {tiles} tiles")
            }
        }
    }
}

impl std::error::Error for AnimationError {}

struct Animation<S> {
    atlas: S,
    keyframes: Keyframes,
}

pub struct AnimationManager<A: ArenaKey, S: ArenaKey> {
    atlases: Arena<S, Rc<Atlas>>,
    animations: Arena<A, Animation<S>>,
    active: Option<A>,
    placeholder: Sprite,
}

impl<A: ArenaKey, S: ArenaKey> AnimationManager<A, S> {
    pub fn new() -> Self {
        Self {
            atlases: Arena::new(),
            animations: Arena::new(),
            active: None,
            placeholder: Sprite::empty(),
        }
    }

    pub fn add_atlas(&mut self, key: S, atlas: Rc<Atlas>) {
        self.atlases.insert(key, atlas);
    }

    /// Register (or replace) `anim` as a keyframe sequence over atlas `sheet`.
    /// Every id is checked against the atlas here so playback never has to.
    pub fn register(&mut self, anim: A, keyframe_ids: &[u32], sheet: S) -> Result<(), AnimationError> {
        let atlas = self.atlases.get(sheet).ok_or(AnimationError::UnknownAtlas)?;
        if keyframe_ids.is_empty() {
            return Err(AnimationError::Empty);
        }
        if let Some(&id) = keyframe_ids.iter().find(|&&id| !atlas.contains(id)) {
            return Err(AnimationError::KeyframeOutOfRange {
                id,
                tiles: atlas.len(),
            });
        }

        self.animations.insert(
            anim,
            Animation {
                atlas: sheet,
                keyframes: Keyframes::new(keyframe_ids.to_vec()),
            },
        );
        Ok(())
    }

    /// Make `anim` current and play it at `frequency` seconds per keyframe.
    ///
    /// # Panics
    /// If `anim` was never registered.
    pub fn activate(&mut self, anim: A, frequency: f32, looping: bool) {
        let Some(animation) = self.animations.get_mut(anim) else {
            panic!("animation {anim:?} is not registered");
        };
        animation.keyframes.play(frequency, looping);
        if self.active != Some(anim) {
            log::trace!("Animation switched to {:?}", anim);
            self.active = Some(anim);
        }
    }

    /// Rewind `anim` to its first keyframe, then activate it.
    pub fn restart(&mut self, anim: A, frequency: f32, looping: bool) {
        if let Some(animation) = self.animations.get_mut(anim) {
            animation.keyframes.rewind();
        }
        self.activate(anim, frequency, looping);
    }

    pub fn deactivate(&mut self) {
        self.active = None;
    }

    pub fn update(&mut self, dt: f32) {
        if let Some(animation) = self.active.and_then(|key| self.animations.get_mut(key)) {
            animation.keyframes.update(dt);
        }
    }

    pub fn active(&self) -> Option<A> {
        self.active
    }

    /// True while the current animation is still advancing. A non-looping
    /// animation that reached its last keyframe reports false.
    pub fn is_playing(&self) -> bool {
        self.active_animation()
            .is_some_and(|animation| animation.keyframes.is_playing())
    }

    /// Cursor position of `anim`, whether or not it is current.
    pub fn cursor(&self, anim: A) -> Option<usize> {
        self.animations.get(anim).map(|a| a.keyframes.cursor())
    }

    /// Sprite under the current animation's cursor, or a 1×1 transparent
    /// placeholder when nothing is active.
    pub fn current_sprite(&self) -> &Sprite {
        match self.active_animation() {
            Some(animation) => match self.atlases.get(animation.atlas) {
                Some(atlas) => atlas.tile(animation.keyframes.current()),
                None => &self.placeholder,
            },
            None => &self.placeholder,
        }
    }

    fn active_animation(&self) -> Option<&Animation<S>> {
        self.active.and_then(|key| self.animations.get(key))
    }
}

impl<A: ArenaKey, S: ArenaKey> Default for AnimationManager<A, S> {
    fn default() -> Self {
        Self::new()
    }
}
