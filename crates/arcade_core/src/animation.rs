//! Keyframe playback cursor.
//!
//! An animation is an ordered list of atlas tile ids played at a fixed
//! frequency (seconds per advance). Playback is a small state machine:
//!
//!   Stopped --play--> Playing{looping} --last keyframe, !looping--> Stopped
//!                     Playing{looping} --last keyframe, looping--> Playing (wraps to 0)
//!
//! `update` advances at most one keyframe per call and resets the accumulator
//! to zero on every advance; leftover time is not carried over. Stopping sets
//! the frequency to zero and clears the loop flag.

/// Playback state reported by [`Keyframes::playback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Stopped,
    Playing { looping: bool },
}

/// A tile-id sequence plus its playback cursor.
#[derive(Debug, Clone)]
pub struct Keyframes {
    ids: Vec<u32>,
    cursor: usize,
    elapsed: f32,
    frequency: f32,
    looping: bool,
    playing: bool,
}

impl Keyframes {
    /// Create a stopped sequence positioned on its first keyframe.
    ///
    /// Panics if `ids` is empty; the cursor must always point at a keyframe.
    pub fn new(ids: Vec<u32>) -> Self {
        assert!(!ids.is_empty(), "keyframe sequence must not be empty");
        Self {
            ids,
            cursor: 0,
            elapsed: 0.0,
            frequency: 0.0,
            looping: false,
            playing: false,
        }
    }

    /// Start (or continue) playback with a new frequency and loop flag.
    /// The cursor is left where it is.
    pub fn play(&mut self, frequency: f32, looping: bool) {
        self.frequency = frequency.max(0.0);
        self.looping = looping;
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.frequency = 0.0;
        self.looping = false;
        self.playing = false;
    }

    /// Jump back to the first keyframe and clear accumulated time.
    pub fn rewind(&mut self) {
        self.cursor = 0;
        self.elapsed = 0.0;
    }

    pub fn update(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        if self.is_last() && !self.looping {
            self.stop();
            return;
        }

        self.elapsed += dt;
        if self.elapsed < self.frequency {
            return;
        }
        self.elapsed = 0.0;

        if self.is_last() {
            // Only reachable while looping.
            self.cursor = 0;
        } else {
            self.cursor += 1;
            if self.is_last() && !self.looping {
                self.stop();
            }
        }
    }

    /// Tile id under the cursor.
    pub fn current(&self) -> u32 {
        self.ids[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn playback(&self) -> Playback {
        if self.playing {
            Playback::Playing {
                looping: self.looping,
            }
        } else {
            Playback::Stopped
        }
    }

    fn is_last(&self) -> bool {
        self.cursor + 1 >= self.ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sequence_is_stopped_on_first_keyframe() {
        let keys = Keyframes::new(vec![7, 8, 9]);
        assert_eq!(keys.current(), 7);
        assert_eq!(keys.playback(), Playback::Stopped);
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn empty_sequence_panics() {
        let _ = Keyframes::new(Vec::new());
    }

    #[test]
    fn stopped_sequence_does_not_advance() {
        let mut keys = Keyframes::new(vec![0, 1, 2]);
        for _ in 0..10 {
            keys.update(1.0);
        }
        assert_eq!(keys.cursor(), 0);
    }

    #[test]
    fn advances_once_accumulator_reaches_frequency() {
        let mut keys = Keyframes::new(vec![10, 11, 12]);
        keys.play(0.5, true);

        keys.update(0.25);
        assert_eq!(keys.current(), 10);

        keys.update(0.25);
        assert_eq!(keys.current(), 11);
        assert_eq!(keys.elapsed(), 0.0);
    }

    #[test]
    fn advances_at_most_one_keyframe_per_update() {
        let mut keys = Keyframes::new(vec![0, 1, 2, 3]);
        keys.play(0.1, true);
        keys.update(5.0);
        assert_eq!(keys.cursor(), 1);
    }

    #[test]
    fn non_looping_stops_on_last_keyframe() {
        let k = 5;
        let frequency = 0.25;
        let mut keys = Keyframes::new((0..k).collect());
        keys.play(frequency, false);

        for _ in 0..(k - 1) {
            keys.update(frequency);
        }
        assert_eq!(keys.cursor(), (k - 1) as usize);
        assert!(!keys.is_playing());
        assert_eq!(keys.frequency(), 0.0);

        for _ in 0..20 {
            keys.update(frequency);
        }
        assert_eq!(keys.current(), k - 1);
        assert_eq!(keys.playback(), Playback::Stopped);
    }

    #[test]
    fn single_keyframe_non_looping_stops_on_first_update() {
        let mut keys = Keyframes::new(vec![4]);
        keys.play(0.1, false);
        keys.update(0.0);
        assert!(!keys.is_playing());
        assert_eq!(keys.current(), 4);
    }

    #[test]
    fn looping_cursor_has_period_k() {
        let k = 4;
        let mut keys = Keyframes::new(vec![3, 1, 4, 1]);
        keys.play(0.1, true);

        let mut seen = Vec::new();
        for _ in 0..k {
            keys.update(0.1);
            seen.push(keys.cursor());
        }
        assert_eq!(seen, vec![1, 2, 3, 0]);
        assert!(keys.is_playing());

        for _ in 0..k {
            keys.update(0.1);
        }
        assert_eq!(keys.cursor(), 0);
    }

    #[test]
    fn repeated_ids_are_distinct_keyframes() {
        let mut keys = Keyframes::new(vec![2, 2, 5]);
        keys.play(1.0, false);
        keys.update(1.0);
        assert_eq!(keys.cursor(), 1);
        assert_eq!(keys.current(), 2);
        keys.update(1.0);
        assert_eq!(keys.current(), 5);
    }

    #[test]
    fn play_keeps_cursor_and_rewind_resets_it() {
        let mut keys = Keyframes::new(vec![0, 1, 2]);
        keys.play(0.1, true);
        keys.update(0.1);
        keys.update(0.1);
        assert_eq!(keys.cursor(), 2);

        keys.play(0.2, false);
        assert_eq!(keys.cursor(), 2);

        keys.rewind();
        assert_eq!(keys.cursor(), 0);
        assert_eq!(keys.elapsed(), 0.0);
    }

    #[test]
    fn identical_inputs_give_identical_cursors() {
        let mut a = Keyframes::new(vec![0, 1, 2, 3, 4]);
        let mut b = a.clone();
        a.play(0.05, true);
        b.play(0.05, true);
        for _ in 0..200 {
            a.update(1.0 / 60.0);
            b.update(1.0 / 60.0);
            assert_eq!(a.cursor(), b.cursor());
        }
    }
}
