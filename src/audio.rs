//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects, no external files needed. Natively
//! the manager is silent.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::{GameEvent, GameMode, Side};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Menu button press
    Button,
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits top or bottom wall
    WallHit,
    WinPoint,
    LosePoint,
    Win,
    Lose,
}

/// Sound for a game event. Point and match outcomes are heard from the left
/// player's side in single player; in two player mode every point is a win.
pub fn sound_for_event(event: &GameEvent, mode: GameMode) -> Option<SoundEffect> {
    let local_won = |side: &Side| mode == GameMode::TwoPlayers || *side == Side::Left;
    match event {
        GameEvent::PaddleHit { .. } => Some(SoundEffect::PaddleHit),
        GameEvent::WallHit { .. } => Some(SoundEffect::WallHit),
        GameEvent::PointScored { scorer } if local_won(scorer) => Some(SoundEffect::WinPoint),
        GameEvent::PointScored { .. } => Some(SoundEffect::LosePoint),
        GameEvent::MatchEnded { winner } if local_won(winner) => Some(SoundEffect::Win),
        GameEvent::MatchEnded { .. } => Some(SoundEffect::Lose),
        GameEvent::BallServed { .. } => None,
    }
}

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Take volumes from saved settings
    pub fn configure(&mut self, settings: &crate::settings::Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play the sound for each event, if any
    pub fn play_events(&self, events: &[GameEvent], mode: GameMode) {
        for event in events {
            if let Some(effect) = sound_for_event(event, mode) {
                self.play(effect);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn play(&self, effect: SoundEffect) {
        if self.effective_volume() > 0.0 {
            log::trace!("Sound: {:?}", effect);
        }
    }

    /// Resume audio context (required after user gesture)
    #[cfg(target_arch = "wasm32")]
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Browsers keep the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Button => self.play_button(ctx, vol),
            SoundEffect::PaddleHit => self.play_paddle_hit(ctx, vol),
            SoundEffect::WallHit => self.play_wall_hit(ctx, vol),
            SoundEffect::WinPoint => self.play_notes(ctx, vol, &[600.0, 900.0], 0.07, OscillatorType::Sine),
            SoundEffect::LosePoint => self.play_notes(ctx, vol, &[300.0, 200.0], 0.1, OscillatorType::Sine),
            SoundEffect::Win => {
                self.play_notes(ctx, vol, &[400.0, 500.0, 600.0, 800.0], 0.1, OscillatorType::Triangle)
            }
            SoundEffect::Lose => {
                self.play_notes(ctx, vol, &[400.0, 350.0, 300.0, 200.0], 0.2, OscillatorType::Sine)
            }
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    #[cfg(target_arch = "wasm32")]
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

    /// Button - soft tap
    #[cfg(target_arch = "wasm32")]
    fn play_button(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.05)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.08).ok();
    }

    /// Paddle hit - solid thump
    #[cfg(target_arch = "wasm32")]
    fn play_paddle_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.6, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();
        osc.frequency().set_value_at_time(150.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(60.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Wall hit - higher ping
    #[cfg(target_arch = "wasm32")]
    fn play_wall_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// A short run of notes, `spacing` seconds apart
    #[cfg(target_arch = "wasm32")]
    fn play_notes(
        &self,
        ctx: &AudioContext,
        vol: f32,
        freqs: &[f32],
        spacing: f64,
        osc_type: OscillatorType,
    ) {
        for (i, freq) in freqs.iter().enumerate() {
            let delay = i as f64 * spacing;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, osc_type) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + spacing + 0.2)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + spacing + 0.3).ok();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::BoundaryHit;

    #[test]
    fn test_single_player_outcomes() {
        let mode = GameMode::SinglePlayer;
        assert_eq!(
            sound_for_event(&GameEvent::PointScored { scorer: Side::Left }, mode),
            Some(SoundEffect::WinPoint)
        );
        assert_eq!(
            sound_for_event(&GameEvent::PointScored { scorer: Side::Right }, mode),
            Some(SoundEffect::LosePoint)
        );
        assert_eq!(
            sound_for_event(&GameEvent::MatchEnded { winner: Side::Right }, mode),
            Some(SoundEffect::Lose)
        );
    }

    #[test]
    fn test_two_player_always_wins() {
        let mode = GameMode::TwoPlayers;
        assert_eq!(
            sound_for_event(&GameEvent::PointScored { scorer: Side::Right }, mode),
            Some(SoundEffect::WinPoint)
        );
        assert_eq!(
            sound_for_event(&GameEvent::MatchEnded { winner: Side::Right }, mode),
            Some(SoundEffect::Win)
        );
    }

    #[test]
    fn test_collision_sounds() {
        let mode = GameMode::TwoPlayers;
        assert_eq!(
            sound_for_event(&GameEvent::PaddleHit { side: Side::Left }, mode),
            Some(SoundEffect::PaddleHit)
        );
        assert_eq!(
            sound_for_event(&GameEvent::WallHit { edge: BoundaryHit::Top }, mode),
            Some(SoundEffect::WallHit)
        );
        assert_eq!(
            sound_for_event(&GameEvent::BallServed { toward: Side::Left }, mode),
            None
        );
    }

    #[test]
    fn test_volume_controls() {
        let mut audio = AudioManager::new();
        audio.set_master_volume(2.0);
        audio.set_sfx_volume(0.5);
        assert!((audio.effective_volume() - 0.5).abs() < 1e-6);
        audio.set_muted(true);
        assert_eq!(audio.effective_volume(), 0.0);
    }
}
