//! Sound contract
//!
//! Playback is fire-and-forget: the game never reads anything back from the
//! sound collaborator.

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

/// Sound clips the game knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clip {
    /// Fruit eaten
    Munch,
    /// Collision
    Oof,
    /// Board filled
    Fanfare,
    /// Looping drone used by later scenes
    Ambient,
}

/// Audio playback collaborator
pub trait Sound {
    fn play(&self, clip: Clip);

    /// Volume for a looping clip (0.0 - 1.0)
    fn set_volume(&self, _clip: Clip, _level: f32) {}

    /// Playback rate for a looping clip (1.0 = normal)
    fn set_playback_rate(&self, _clip: Clip, _rate: f32) {}

    fn stop(&self, _clip: Clip) {}
}

/// Sound that plays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct Silence;

impl Sound for Silence {
    fn play(&self, clip: Clip) {
        log::debug!("(silent) {clip:?}");
    }
}

/// Ambient volume for a head at `distance` cells from the fruit: full when
/// adjacent, fading to `floor` at `reach` cells and beyond
pub fn proximity_volume(distance: f32, reach: f32, floor: f32) -> f32 {
    if reach <= 0.0 {
        return 1.0;
    }
    let closeness = 1.0 - (distance / reach).clamp(0.0, 1.0);
    floor + (1.0 - floor) * closeness
}
