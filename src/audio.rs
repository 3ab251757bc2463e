//! Sound boundary
//!
//! Playback belongs to the host. The shipped backend is silent: it only keeps
//! track of what would be playing so hosts and tests can observe it.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Charge input went down
    Charge,
    /// Jump launched
    Jump,
    /// Successful landing
    Land,
    /// Run ended
    GameOver,
}

impl SoundEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Charge => "charge",
            SoundEffect::Jump => "jump",
            SoundEffect::Land => "land",
            SoundEffect::GameOver => "gameover",
        }
    }
}

/// Audio output collaborator
pub trait Audio {
    fn play(&mut self, effect: SoundEffect);
    fn play_music(&mut self);
    fn pause_music(&mut self);
    fn set_sound_enabled(&mut self, enabled: bool);
    fn set_music_enabled(&mut self, enabled: bool);
}

/// Audio manager that never makes a sound
#[derive(Debug, Default)]
pub struct SilentAudio {
    sound_enabled: bool,
    music_enabled: bool,
    music_playing: bool,
    /// Effects requested while sound was enabled
    pub played: Vec<SoundEffect>,
}

impl SilentAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }
}

impl Audio for SilentAudio {
    fn play(&mut self, effect: SoundEffect) {
        if self.sound_enabled {
            log::trace!("sound: {}", effect.as_str());
            self.played.push(effect);
        }
    }

    fn play_music(&mut self) {
        self.music_playing = self.music_enabled;
    }

    fn pause_music(&mut self) {
        self.music_playing = false;
    }

    fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
    }

    fn set_music_enabled(&mut self, enabled: bool) {
        self.music_enabled = enabled;
        if !enabled {
            self.music_playing = false;
        }
    }
}
