//! Audio system using Web Audio API
//!
//! Procedurally generated clips - no external files needed.

use std::cell::{Cell, RefCell};

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use super::{Clip, Sound};

/// Base pitch of the ambient drone (Hz)
const DRONE_FREQ: f32 = 110.0;

/// Running ambient drone
struct Drone {
    osc: OscillatorNode,
    gain: GainNode,
}

/// Web Audio playback for the game's clips
pub struct WebAudio {
    ctx: Option<AudioContext>,
    volume: f32,
    drone: RefCell<Option<Drone>>,
    drone_level: Cell<f32>,
    drone_rate: Cell<f32>,
}

impl WebAudio {
    /// `volume` is the effective master × sfx level
    pub fn new(volume: f32) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: volume.clamp(0.0, 1.0),
            drone: RefCell::new(None),
            drone_level: Cell::new(0.3),
            drone_rate: Cell::new(1.0),
        }
    }

    /// Context ready for playback, resumed if the browser suspended it
    fn context(&self) -> Option<&AudioContext> {
        let ctx = self.ctx.as_ref()?;
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some(ctx)
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Munch - two quick bites
    fn play_munch(&self, ctx: &AudioContext) {
        for i in 0..2 {
            let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time() + i as f64 * 0.07;
            gain.gain().set_value_at_time(self.volume * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.05)
                .ok();
            osc.frequency().set_value_at_time(260.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(120.0, t + 0.05)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.06).ok();
        }
    }

    /// Oof - low descending grunt
    fn play_oof(&self, ctx: &AudioContext) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(self.volume * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.4)
            .ok();
        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(60.0, t + 0.4)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.45).ok();
    }

    /// Fanfare - rising arpeggio
    fn play_fanfare(&self, ctx: &AudioContext) {
        for (i, freq) in [400.0, 500.0, 600.0, 800.0].iter().enumerate() {
            let delay = i as f64 * 0.1;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(self.volume * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.5).ok();
            }
        }
    }

    /// Start the drone if it is not already running
    fn start_drone(&self, ctx: &AudioContext) {
        let mut drone = self.drone.borrow_mut();
        if drone.is_some() {
            return;
        }
        let Some((osc, gain)) = self.create_osc(ctx, DRONE_FREQ, OscillatorType::Triangle) else {
            return;
        };
        gain.gain().set_value(self.volume * self.drone_level.get());
        osc.frequency().set_value(DRONE_FREQ * self.drone_rate.get());
        osc.start().ok();
        *drone = Some(Drone { osc, gain });
    }
}

impl Sound for WebAudio {
    fn play(&self, clip: Clip) {
        if self.volume <= 0.0 {
            return;
        }
        let Some(ctx) = self.context() else { return };

        match clip {
            Clip::Munch => self.play_munch(ctx),
            Clip::Oof => self.play_oof(ctx),
            Clip::Fanfare => self.play_fanfare(ctx),
            Clip::Ambient => self.start_drone(ctx),
        }
    }

    fn set_volume(&self, clip: Clip, level: f32) {
        if clip != Clip::Ambient {
            return;
        }
        self.drone_level.set(level.clamp(0.0, 1.0));
        if let Some(drone) = self.drone.borrow().as_ref() {
            drone
                .gain
                .gain()
                .set_value(self.volume * self.drone_level.get());
        }
    }

    fn set_playback_rate(&self, clip: Clip, rate: f32) {
        if clip != Clip::Ambient {
            return;
        }
        self.drone_rate.set(rate.max(0.1));
        if let Some(drone) = self.drone.borrow().as_ref() {
            drone
                .osc
                .frequency()
                .set_value(DRONE_FREQ * self.drone_rate.get());
        }
    }

    fn stop(&self, clip: Clip) {
        if clip != Clip::Ambient {
            return;
        }
        if let Some(drone) = self.drone.borrow_mut().take() {
            drone.osc.stop().ok();
        }
    }
}
