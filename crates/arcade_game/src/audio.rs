//! Sound requests.
//!
//! Scenes ask for sounds through [`AudioOut`]; they never hold a device. The
//! shipped [`LogAudio`] backend records volumes and the current music track
//! and logs every request, so the games run on machines without audio.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundId {
    Jump,
    Collect,
    Hit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MusicId {
    Space,
}

pub trait AudioOut {
    fn play(&mut self, sound: SoundId);
    /// Volume in `[0, 1]` for every later `play` of `sound`.
    fn set_volume(&mut self, sound: SoundId, volume: f32);
    /// Start `music` looping. Requesting the track already playing is a no-op.
    fn play_music(&mut self, music: MusicId);
    fn stop_music(&mut self);
    fn set_music_volume(&mut self, volume: f32);
}

pub struct LogAudio {
    volumes: HashMap<SoundId, f32>,
    music: Option<MusicId>,
    music_volume: f32,
    plays: u64,
}

impl LogAudio {
    pub fn new() -> Self {
        Self {
            volumes: HashMap::new(),
            music: None,
            music_volume: 1.0,
            plays: 0,
        }
    }

    pub fn volume(&self, sound: SoundId) -> f32 {
        self.volumes.get(&sound).copied().unwrap_or(1.0)
    }

    pub fn music(&self) -> Option<MusicId> {
        self.music
    }

    pub fn music_volume(&self) -> f32 {
        self.music_volume
    }

    /// Sounds played since startup.
    pub fn plays(&self) -> u64 {
        self.plays
    }
}

impl Default for LogAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOut for LogAudio {
    fn play(&mut self, sound: SoundId) {
        self.plays += 1;
        log::debug!("Sound {:?} at volume {:.2}", sound, self.volume(sound));
    }

    fn set_volume(&mut self, sound: SoundId, volume: f32) {
        self.volumes.insert(sound, volume.clamp(0.0, 1.0));
    }

    fn play_music(&mut self, music: MusicId) {
        if self.music == Some(music) {
            return;
        }
        log::info!("Music {:?} started at volume {:.2}", music, self.music_volume);
        self.music = Some(music);
    }

    fn stop_music(&mut self) {
        if let Some(music) = self.music.take() {
            log::info!("Music {:?} stopped", music);
        }
    }

    fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = volume.clamp(0.0, 1.0);
    }
}

/// Backend that keeps every request, for scene tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub played: Vec<SoundId>,
    pub volumes: Vec<(SoundId, f32)>,
    pub music: Option<MusicId>,
    pub music_volume: Option<f32>,
}

#[cfg(test)]
impl AudioOut for RecordingAudio {
    fn play(&mut self, sound: SoundId) {
        self.played.push(sound);
    }

    fn set_volume(&mut self, sound: SoundId, volume: f32) {
        self.volumes.push((sound, volume));
    }

    fn play_music(&mut self, music: MusicId) {
        self.music = Some(music);
    }

    fn stop_music(&mut self) {
        self.music = None;
    }

    fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = Some(volume);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volumes_default_to_full_and_clamp() {
        let mut audio = LogAudio::new();
        assert_eq!(audio.volume(SoundId::Collect), 1.0);
        audio.set_volume(SoundId::Collect, 0.5);
        audio.set_volume(SoundId::Jump, 3.0);
        assert_eq!(audio.volume(SoundId::Collect), 0.5);
        assert_eq!(audio.volume(SoundId::Jump), 1.0);
    }

    #[test]
    fn music_tracks_current_song() {
        let mut audio = LogAudio::new();
        audio.set_music_volume(0.25);
        audio.play_music(MusicId::Space);
        audio.play_music(MusicId::Space);
        assert_eq!(audio.music(), Some(MusicId::Space));
        assert_eq!(audio.music_volume(), 0.25);
        audio.stop_music();
        assert_eq!(audio.music(), None);
    }

    #[test]
    fn play_counts_requests() {
        let mut audio = LogAudio::new();
        audio.play(SoundId::Jump);
        audio.play(SoundId::Jump);
        assert_eq!(audio.plays(), 2);
    }
}
