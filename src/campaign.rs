//! Built-in scene progression
//!
//! - Classic: munch and oof sound cues on the base game
//! - Rush: golden fruit, every fruit speeds the snake up, an ambient drone
//!   gets louder as the head closes in on the fruit
//! - Fever: neon skins, the drone's pitch climbs with each fruit, and an
//!   optional external image is fetched and put on display
//!
//! Each scene installs its effects as subscriptions on entry; leaving the
//! scene releases them.

use std::rc::Rc;

use crate::audio::{Clip, Sound, proximity_volume};
use crate::platform::{MediaFetch, MediaSurface, media_request_url};
use crate::settings::ScenarioSettings;
use crate::sim::{
    EventKind, FruitSkin, GameEvent, GameState, Scene, SceneHandles, SnakeSkin, Theme,
    euclidean_distance,
};

/// Quietest the ambient drone gets
const AMBIENT_FLOOR: f32 = 0.05;

/// Outside capabilities the scenes drive
#[derive(Clone)]
pub struct Collaborators {
    pub sound: Rc<dyn Sound>,
    pub fetch: Option<Rc<dyn MediaFetch>>,
    pub surface: Option<Rc<dyn MediaSurface>>,
}

impl Collaborators {
    pub fn new(sound: Rc<dyn Sound>) -> Self {
        Self {
            sound,
            fetch: None,
            surface: None,
        }
    }

    pub fn with_media(mut self, fetch: Rc<dyn MediaFetch>, surface: Rc<dyn MediaSurface>) -> Self {
        self.fetch = Some(fetch);
        self.surface = Some(surface);
        self
    }
}

/// Scenes for a session: Classic alone, or the full progression
pub fn build(settings: &ScenarioSettings, collaborators: &Collaborators) -> Vec<Box<dyn Scene>> {
    let mut scenes: Vec<Box<dyn Scene>> = vec![Box::new(Classic {
        sound: collaborators.sound.clone(),
    })];
    if settings.enabled {
        scenes.push(Box::new(Rush {
            settings: settings.clone(),
            sound: collaborators.sound.clone(),
        }));
        scenes.push(Box::new(Fever {
            settings: settings.clone(),
            collaborators: collaborators.clone(),
        }));
    }
    scenes
}

/// Munch on fruit; oof (or fanfare on a win) at the end, silencing the drone
fn sound_cues(handles: &mut SceneHandles, state: &mut GameState, sound: &Rc<dyn Sound>) {
    let munch = sound.clone();
    handles.subscribe(state, EventKind::FruitEaten, move |_, _| {
        munch.play(Clip::Munch)
    });

    let end = sound.clone();
    handles.subscribe(state, EventKind::GameOver, move |_, event| {
        end.stop(Clip::Ambient);
        match event {
            GameEvent::GameOver { outcome } if outcome.is_win() => end.play(Clip::Fanfare),
            _ => end.play(Clip::Oof),
        }
    });
}

/// Multiply the snake's speed on every fruit, up to the ceiling
fn speed_curve(handles: &mut SceneHandles, state: &mut GameState, step: f64, max_speed: f64) {
    handles.subscribe(state, EventKind::FruitEaten, move |state, _| {
        let speed = (state.snake.speed * step).min(max_speed);
        if speed != state.snake.speed {
            log::debug!("Snake speed {:.2} -> {speed:.2}", state.snake.speed);
        }
        state.snake.speed = speed;
    });
}

/// Start the drone and tie its volume to head-to-fruit distance
fn ambient_drone(handles: &mut SceneHandles, state: &mut GameState, sound: &Rc<dyn Sound>) {
    let reach = state.board.size as f32 / 2.0;
    let initial = euclidean_distance(state.snake.head, state.fruit.position);
    sound.play(Clip::Ambient);
    sound.set_volume(Clip::Ambient, proximity_volume(initial, reach, AMBIENT_FLOOR));

    let drone = sound.clone();
    handles.subscribe(state, EventKind::PositionUpdated, move |state, event| {
        if let GameEvent::PositionUpdated { head } = *event {
            let distance = euclidean_distance(head, state.fruit.position);
            drone.set_volume(Clip::Ambient, proximity_volume(distance, reach, AMBIENT_FLOOR));
        }
    });
}

struct Classic {
    sound: Rc<dyn Sound>,
}

impl Scene for Classic {
    fn name(&self) -> &str {
        "classic"
    }

    fn is_ready(&self, _state: &GameState) -> bool {
        true
    }

    fn enter(&mut self, state: &mut GameState) -> SceneHandles {
        let mut handles = SceneHandles::new();
        state.theme = Theme::default();
        sound_cues(&mut handles, state, &self.sound);
        handles
    }
}

struct Rush {
    settings: ScenarioSettings,
    sound: Rc<dyn Sound>,
}

impl Scene for Rush {
    fn name(&self) -> &str {
        "rush"
    }

    fn is_ready(&self, state: &GameState) -> bool {
        state.score() >= self.settings.rush_score
    }

    fn enter(&mut self, state: &mut GameState) -> SceneHandles {
        let mut handles = SceneHandles::new();
        state.theme.fruit = FruitSkin::Golden;
        sound_cues(&mut handles, state, &self.sound);
        speed_curve(
            &mut handles,
            state,
            self.settings.rush_speed_step,
            self.settings.max_speed,
        );
        ambient_drone(&mut handles, state, &self.sound);
        handles
    }

    fn exit(&mut self, state: &mut GameState, handles: SceneHandles) {
        handles.release(state);
        self.sound.stop(Clip::Ambient);
    }
}

struct Fever {
    settings: ScenarioSettings,
    collaborators: Collaborators,
}

impl Fever {
    /// Ask for the themed image; failures are only logged
    fn request_media(&self) {
        let (Some(template), Some(fetch), Some(surface)) = (
            self.settings.media_url.as_deref(),
            self.collaborators.fetch.as_ref(),
            self.collaborators.surface.clone(),
        ) else {
            return;
        };
        let url = media_request_url(template, &self.settings.media_query);
        log::info!("Requesting media from {url}");
        fetch.fetch(
            &url,
            &self.settings.media_pointer,
            Box::new(move |result| match result {
                Ok(media) => surface.attach(&media),
                Err(e) => log::warn!("Media request failed: {e}"),
            }),
        );
    }
}

impl Scene for Fever {
    fn name(&self) -> &str {
        "fever"
    }

    fn is_ready(&self, state: &GameState) -> bool {
        state.score() >= self.settings.fever_score
    }

    fn enter(&mut self, state: &mut GameState) -> SceneHandles {
        let mut handles = SceneHandles::new();
        let sound = &self.collaborators.sound;
        state.theme = Theme {
            fruit: FruitSkin::Neon,
            snake: SnakeSkin::Neon,
        };
        sound_cues(&mut handles, state, sound);
        speed_curve(
            &mut handles,
            state,
            self.settings.rush_speed_step,
            self.settings.max_speed,
        );
        ambient_drone(&mut handles, state, sound);

        let pitch = sound.clone();
        let step = self.settings.fever_playback_step;
        let mut rate = 1.0_f32;
        handles.subscribe(state, EventKind::FruitEaten, move |_, _| {
            rate += step;
            pitch.set_playback_rate(Clip::Ambient, rate);
        });

        self.request_media();
        handles
    }

    fn exit(&mut self, state: &mut GameState, handles: SceneHandles) {
        handles.release(state);
        self.collaborators.sound.stop(Clip::Ambient);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use glam::IVec2;

    use super::*;
    use crate::platform::{FetchError, MediaCallback};
    use crate::settings::GameConfig;
    use crate::sim::{Direction, Fruit, Scenario, tick};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Play(Clip),
        Volume(f32),
        Rate(f32),
        Stop(Clip),
    }

    #[derive(Default)]
    struct RecordingSound(RefCell<Vec<Call>>);

    impl RecordingSound {
        fn take(&self) -> Vec<Call> {
            std::mem::take(&mut *self.0.borrow_mut())
        }
    }

    impl Sound for RecordingSound {
        fn play(&self, clip: Clip) {
            self.0.borrow_mut().push(Call::Play(clip));
        }

        fn set_volume(&self, _clip: Clip, level: f32) {
            self.0.borrow_mut().push(Call::Volume(level));
        }

        fn set_playback_rate(&self, _clip: Clip, rate: f32) {
            self.0.borrow_mut().push(Call::Rate(rate));
        }

        fn stop(&self, clip: Clip) {
            self.0.borrow_mut().push(Call::Stop(clip));
        }
    }

    struct ReplyWith(Result<&'static str, &'static str>);

    impl MediaFetch for ReplyWith {
        fn fetch(&self, url: &str, _pointer: &str, on_done: MediaCallback) {
            assert!(url.ends_with("tag=snake"));
            on_done(match self.0 {
                Ok(media) => Ok(media.to_string()),
                Err(reason) => Err(FetchError::Request(reason.to_string())),
            });
        }
    }

    #[derive(Default)]
    struct Shown(RefCell<Vec<String>>);

    impl MediaSurface for Shown {
        fn attach(&self, media: &str) {
            self.0.borrow_mut().push(media.to_string());
        }
    }

    fn settings() -> ScenarioSettings {
        ScenarioSettings {
            rush_score: 1,
            fever_score: 2,
            media_url: Some("https://media.test/random?tag={query}".to_string()),
            ..ScenarioSettings::default()
        }
    }

    /// Put the fruit right in front of the head and tick twice
    fn eat_one(state: &mut GameState, scenario: &mut Scenario) {
        state.fruit = Fruit::new(state.snake.head + state.snake.direction.vector());
        for _ in 0..2 {
            tick(state);
            scenario.check_transition(state);
        }
    }

    fn setup(
        reply: Result<&'static str, &'static str>,
    ) -> (GameState, Scenario, Rc<RecordingSound>, Rc<Shown>) {
        let sound = Rc::new(RecordingSound::default());
        let shown = Rc::new(Shown::default());
        let collaborators = Collaborators::new(sound.clone())
            .with_media(Rc::new(ReplyWith(reply)), shown.clone());
        let mut state = GameState::new(&GameConfig::default(), 8);
        state.snake.set_direction(Direction::Down);
        let scenario = Scenario::new(build(&settings(), &collaborators), &mut state);
        (state, scenario, sound, shown)
    }

    #[test]
    fn test_disabled_progression_is_classic_only() {
        let sound: Rc<dyn Sound> = Rc::new(RecordingSound::default());
        let settings = ScenarioSettings {
            enabled: false,
            ..ScenarioSettings::default()
        };
        let scenes = build(&settings, &Collaborators::new(sound));
        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].name(), "classic");
    }

    #[test]
    fn test_classic_munches() {
        let (mut state, scenario, sound, _) = setup(Ok("x"));
        state.fruit = Fruit::new(state.snake.head + IVec2::new(0, 1));
        tick(&mut state);
        assert!(sound.take().is_empty());
        tick(&mut state);
        assert_eq!(sound.take(), vec![Call::Play(Clip::Munch)]);
        assert_eq!(scenario.active_name(), Some("classic"));
        assert_eq!(state.theme, Theme::default());
    }

    #[test]
    fn test_rush_speeds_up_and_hums() {
        let (mut state, mut scenario, sound, _) = setup(Ok("x"));
        let base_speed = state.snake.speed;

        eat_one(&mut state, &mut scenario);
        assert_eq!(scenario.active_name(), Some("rush"));
        assert_eq!(state.theme.fruit, FruitSkin::Golden);
        let calls = sound.take();
        assert!(calls.contains(&Call::Play(Clip::Ambient)));
        assert!(calls.iter().any(|c| matches!(c, Call::Volume(_))));
        // Speed-up only applies to fruit eaten during Rush
        assert_eq!(state.snake.speed, base_speed);

        // Drone volume follows the head every tick
        state.fruit = Fruit::new(IVec2::new(24, 24));
        tick(&mut state);
        assert!(matches!(sound.take().as_slice(), [Call::Volume(_)]));
    }

    #[test]
    fn test_fever_escalates_and_shows_media() {
        let (mut state, mut scenario, sound, shown) = setup(Ok("https://media.test/a.gif"));
        eat_one(&mut state, &mut scenario);
        sound.take();

        eat_one(&mut state, &mut scenario);
        assert_eq!(scenario.active_name(), Some("fever"));
        assert!(scenario.is_final());
        assert_eq!(state.theme.snake, SnakeSkin::Neon);
        assert_eq!(*shown.0.borrow(), vec!["https://media.test/a.gif".to_string()]);
        // Second fruit was eaten in Rush: sped up once
        let rush_speed = state.snake.speed;
        assert!((rush_speed - 5.0 * 1.08).abs() < 1e-9);
        // Leaving Rush stopped its drone before Fever restarted it
        let calls = sound.take();
        let stop = calls.iter().position(|c| *c == Call::Stop(Clip::Ambient));
        let play = calls.iter().rposition(|c| *c == Call::Play(Clip::Ambient));
        assert!(stop < play);

        eat_one(&mut state, &mut scenario);
        let rates: Vec<f32> = sound
            .take()
            .into_iter()
            .filter_map(|c| match c {
                Call::Rate(rate) => Some(rate),
                _ => None,
            })
            .collect();
        assert_eq!(rates.len(), 1);
        assert!((rates[0] - 1.05).abs() < 1e-6);
        assert!(state.snake.speed > rush_speed);
    }

    #[test]
    fn test_media_failure_is_not_fatal() {
        let (mut state, mut scenario, _, shown) = setup(Err("offline"));
        eat_one(&mut state, &mut scenario);
        eat_one(&mut state, &mut scenario);
        assert_eq!(scenario.active_name(), Some("fever"));
        assert!(shown.0.borrow().is_empty());
        assert!(!state.is_game_over());
    }

    #[test]
    fn test_game_over_cue() {
        let (mut state, _scenario, sound, _) = setup(Ok("x"));
        state.snake.set_direction(Direction::Up);
        state.fruit = Fruit::new(IVec2::new(20, 20));
        tick(&mut state);
        assert!(state.is_game_over());
        assert_eq!(
            sound.take(),
            vec![Call::Stop(Clip::Ambient), Call::Play(Clip::Oof)]
        );
    }
}
