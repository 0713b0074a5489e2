/*
    Copyright (C) 2024  ZERK developers

    This file is part of ZERK, a Rust library for emulating Berzerk-style arcade boards.

    For the full copyright notice, see the lib.rs file.
*/
//! An emulator of the sound board trigger logic.
//!
//! The sound board is programmed through 8 consecutive I/O ports. [SoundTriggerDecoder] turns
//! the writes into commands for a [SamplePlayer] provided by the host:
//!
//! * offset 4 - the speech board: starts voice samples and changes the voice pitch and volume,
//! * offset 6 - the current noise code: starts shot, explosion and death effects,
//! * offsets 3 and 5 - two write confirmation sequences following the laser noise codes.
//!
//! The remaining offsets are not wired to anything.
use core::ops::RangeInclusive;

use log::{debug, trace};

#[cfg(feature = "snapshot")]
use serde::{Serialize, Deserialize};

use zerk_core::audio::{AudioChannel, Effect, SampleId, SamplePlayer};
use zerk_core::chip::VoiceCtrlFlags;

/// The voice sample rates selected by the pitch presets.
pub const PITCH_PRESETS: [u32;8] = [3200, 3600, 4400, 5200, 5600, 6000, 6400, 6800];
/// The highest voice volume level.
pub const VOICE_VOLUME_MAX: u8 = 7;

/// The noise codes accepted at offset 6.
pub const NOISE_CODES: RangeInclusive<u8> = 64..=70;
/// The quiet noise code, also set after a completed confirmation sequence.
pub const NOISE_RESET: u8 = 64;
pub const NOISE_PLAYER_SHOT: u8 = 66;
pub const NOISE_ROBOT_KILL: u8 = 68;
pub const NOISE_ROBOT_SHOT: u8 = 69;
pub const NOISE_LASER_DEATH: u8 = 70;

/// Written at offset 3 after [NOISE_LASER_DEATH] to arm the death confirmation.
pub const DEATH_ARM_DATA: u8 = 172;
/// Written at offset 3 after [NOISE_ROBOT_SHOT] to arm the laser reset confirmation.
pub const LASER_RESET_ARM_DATA: u8 = 50;
/// Written at offset 5 to complete an armed confirmation.
pub const CONFIRM_DATA: u8 = 25;

/// The voice status port value while the speech board is idle.
pub const VOICE_IDLE: u8 = 0x40;

/// The state of the two write confirmation sequences.
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Confirmation {
    /// Nothing is armed.
    Idle,
    /// Awaits [CONFIRM_DATA] at offset 5 to start the player's death sound.
    AwaitingDeath,
    /// Awaits [CONFIRM_DATA] at offset 5 to rearm the robot shot noise.
    AwaitingLaserReset,
}

/// The phase of the player's death sound.
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeathSoundPhase {
    /// No death effect.
    None,
    /// The electrocution effect was requested.
    ArmedFake,
    /// The confirmed death effect was requested.
    ArmedReal,
    /// A death effect is being played, ordinary voice samples are muted.
    Playing,
}

/// The sound board trigger decoder.
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "snapshot", serde(rename_all = "camelCase"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SoundTriggerDecoder {
    last_noise_code: u8,
    last_voice_code: u8,
    confirmation: Confirmation,
    death_sound: DeathSoundPhase,
    voice_frequency_hz: u32,
    voice_volume: u8,
    voice_busy: bool,
}

impl Default for Confirmation {
    fn default() -> Self {
        Confirmation::Idle
    }
}

impl Default for DeathSoundPhase {
    fn default() -> Self {
        DeathSoundPhase::None
    }
}

impl Confirmation {
    /// Returns the byte expected at offset 5 if a confirmation is armed.
    #[inline]
    pub fn expected(self) -> Option<u8> {
        match self {
            Confirmation::Idle => None,
            Confirmation::AwaitingDeath|Confirmation::AwaitingLaserReset => Some(CONFIRM_DATA)
        }
    }
}

impl Default for SoundTriggerDecoder {
    fn default() -> Self {
        SoundTriggerDecoder {
            last_noise_code: 0,
            last_voice_code: 0,
            confirmation: Confirmation::Idle,
            death_sound: DeathSoundPhase::None,
            voice_frequency_hz: PITCH_PRESETS[0],
            voice_volume: VOICE_VOLUME_MAX,
            voice_busy: false,
        }
    }
}

impl SoundTriggerDecoder {
    /// Handles a CPU write of `data` to the sound board port at `offset`: [0, 7].
    pub fn control_write<P: SamplePlayer + ?Sized>(&mut self, player: &mut P, offset: u8, data: u8) {
        match offset & 7 {
            3 => self.arm_confirmation(data),
            4 => self.voice_write(player, data),
            5 => self.confirm(player, data),
            6 => self.noise_write(player, data),
            offset => trace!("sound offset {} ignored: {:02x}", offset, data)
        }
    }
    /// Should be called periodically by the host to follow the state of the sample player.
    pub fn audio_update<P: SamplePlayer + ?Sized>(&mut self, player: &P) {
        if self.voice_busy && !player.is_playing(AudioChannel::Voice) {
            self.voice_busy = false;
        }
        let effect_playing = player.is_playing(AudioChannel::Effect);
        self.death_sound = match self.death_sound {
            DeathSoundPhase::ArmedFake|DeathSoundPhase::ArmedReal if effect_playing => {
                DeathSoundPhase::Playing
            }
            DeathSoundPhase::None => DeathSoundPhase::None,
            _ if !effect_playing && self.last_noise_code != NOISE_LASER_DEATH => {
                debug!("death sound finished");
                DeathSoundPhase::None
            }
            phase => phase
        };
    }
    /// Returns the voice status port value: [VOICE_IDLE] when the speech board is idle.
    #[inline]
    pub fn voice_status_read(&self) -> u8 {
        if self.voice_busy { 0x00 } else { VOICE_IDLE }
    }
    #[inline]
    pub fn last_noise_code(&self) -> u8 {
        self.last_noise_code
    }
    #[inline]
    pub fn last_voice_code(&self) -> u8 {
        self.last_voice_code
    }
    #[inline]
    pub fn confirmation(&self) -> Confirmation {
        self.confirmation
    }
    #[inline]
    pub fn death_sound(&self) -> DeathSoundPhase {
        self.death_sound
    }
    /// Returns the sample rate of the voice samples.
    #[inline]
    pub fn voice_frequency_hz(&self) -> u32 {
        self.voice_frequency_hz
    }
    /// Returns the voice volume level: [0, 7].
    #[inline]
    pub fn voice_volume(&self) -> u8 {
        self.voice_volume
    }
    #[inline]
    pub fn is_voice_busy(&self) -> bool {
        self.voice_busy
    }
    /// Resets the decoder to its power on state.
    pub fn reset(&mut self) {
        *self = SoundTriggerDecoder::default();
    }

    fn voice_write<P: SamplePlayer + ?Sized>(&mut self, player: &mut P, data: u8) {
        let flags = VoiceCtrlFlags::from(data);
        if flags.is_params() {
            self.voice_frequency_hz = PITCH_PRESETS[flags.pitch_preset() as usize];
            self.voice_volume = flags.volume();
            player.set_frequency(AudioChannel::Voice, self.voice_frequency_hz);
            player.set_volume(AudioChannel::Voice, volume_level(self.voice_volume));
            return
        }
        let voice = flags.voice();
        self.last_voice_code = voice;
        if self.death_sound == DeathSoundPhase::Playing {
            trace!("voice {} muted", voice);
        }
        else {
            player.start_sample(AudioChannel::Voice, SampleId::Voice(voice));
        }
        self.voice_busy = true;
    }

    fn arm_confirmation(&mut self, data: u8) {
        match (self.last_noise_code, data) {
            (NOISE_LASER_DEATH, DEATH_ARM_DATA) => {
                debug!("death confirmation armed");
                self.confirmation = Confirmation::AwaitingDeath;
            }
            (NOISE_ROBOT_SHOT, LASER_RESET_ARM_DATA) => {
                debug!("laser reset confirmation armed");
                self.confirmation = Confirmation::AwaitingLaserReset;
            }
            _ => trace!("sound offset 3 ignored: {:02x}", data)
        }
    }

    fn confirm<P: SamplePlayer + ?Sized>(&mut self, player: &mut P, data: u8) {
        let confirmation = core::mem::replace(&mut self.confirmation, Confirmation::Idle);
        if confirmation.expected() != Some(data) {
            return
        }
        match confirmation {
            Confirmation::AwaitingDeath => {
                debug!("death confirmed");
                self.death_sound = DeathSoundPhase::ArmedReal;
                player.start_sample(AudioChannel::Effect, SampleId::Effect(Effect::RealDeath));
            }
            Confirmation::AwaitingLaserReset => {
                debug!("laser reset confirmed");
            }
            Confirmation::Idle => return
        }
        self.last_noise_code = NOISE_RESET;
    }

    fn noise_write<P: SamplePlayer + ?Sized>(&mut self, player: &mut P, data: u8) {
        if !NOISE_CODES.contains(&data) {
            trace!("noise code ignored: {}", data);
            return
        }
        if data == self.last_noise_code {
            return
        }
        self.last_noise_code = data;
        let effect = match data {
            NOISE_PLAYER_SHOT => Effect::PlayerShot,
            NOISE_ROBOT_KILL => Effect::RobotKill,
            NOISE_ROBOT_SHOT if self.death_sound == DeathSoundPhase::None => Effect::RobotShot,
            NOISE_ROBOT_SHOT => Effect::RobotShotEcho,
            NOISE_LASER_DEATH => {
                self.death_sound = DeathSoundPhase::ArmedFake;
                player.start_sample(AudioChannel::Effect, SampleId::Effect(Effect::FakeDeath));
                return
            }
            _ => return
        };
        player.start_sample(AudioChannel::Shot, SampleId::Effect(effect));
    }
}

/// Converts a voice volume level [0, 7] to a sample player volume level [0, 100].
#[inline]
pub fn volume_level(volume: u8) -> u8 {
    (volume.min(VOICE_VOLUME_MAX) as u32 * 100 / VOICE_VOLUME_MAX as u32) as u8
}

#[cfg(test)]
mod tests {
    use zerk_core::audio::{SampleCommand, SampleCommandRecorder};
    use super::*;

    fn effect(effect: Effect) -> SampleId {
        SampleId::Effect(effect)
    }

    #[test]
    fn sound_death_sequence_works() {
        let mut player = SampleCommandRecorder::default();
        let mut sound = SoundTriggerDecoder::default();
        sound.control_write(&mut player, 6, 70);
        assert_eq!(sound.death_sound(), DeathSoundPhase::ArmedFake);
        assert_eq!(player.started_on(AudioChannel::Effect).collect::<Vec<_>>(),
                   [effect(Effect::FakeDeath)]);
        sound.control_write(&mut player, 3, 172);
        assert_eq!(sound.confirmation(), Confirmation::AwaitingDeath);
        assert_eq!(sound.confirmation().expected(), Some(25));
        sound.control_write(&mut player, 5, 25);
        assert_eq!(sound.last_noise_code(), 64);
        assert_eq!(sound.confirmation(), Confirmation::Idle);
        assert_eq!(sound.death_sound(), DeathSoundPhase::ArmedReal);
        assert_eq!(player.started_on(AudioChannel::Effect).collect::<Vec<_>>(),
                   [effect(Effect::FakeDeath), effect(Effect::RealDeath)]);
        assert_eq!(player.started_on(AudioChannel::Voice).count(), 0);
        assert_eq!(player.len(), 2);
        // effect is playing
        sound.audio_update(&player);
        assert_eq!(sound.death_sound(), DeathSoundPhase::Playing);
        sound.control_write(&mut player, 4, 0x12);
        assert_eq!(sound.last_voice_code(), 0x12);
        assert_eq!(player.started_on(AudioChannel::Voice).count(), 0);
        // robots keep shooting
        sound.control_write(&mut player, 6, 69);
        assert_eq!(player.last(), Some(&SampleCommand::Start {
            channel: AudioChannel::Shot, sample: effect(Effect::RobotShotEcho)
        }));
        player.finish(AudioChannel::Effect);
        sound.audio_update(&player);
        assert_eq!(sound.death_sound(), DeathSoundPhase::None);
        sound.control_write(&mut player, 4, 0x12);
        assert_eq!(player.started_on(AudioChannel::Voice).collect::<Vec<_>>(),
                   [SampleId::Voice(0x12)]);
    }

    #[test]
    fn sound_fake_death_lasts_while_laser_noise() {
        let mut player = SampleCommandRecorder::default();
        let mut sound = SoundTriggerDecoder::default();
        sound.control_write(&mut player, 6, 70);
        sound.audio_update(&player);
        assert_eq!(sound.death_sound(), DeathSoundPhase::Playing);
        player.finish_all();
        sound.audio_update(&player);
        assert_eq!(sound.death_sound(), DeathSoundPhase::Playing);
        // same code does not retrigger
        sound.control_write(&mut player, 6, 70);
        assert_eq!(player.len(), 1);
        sound.control_write(&mut player, 6, 64);
        assert_eq!(player.len(), 1);
        sound.audio_update(&player);
        assert_eq!(sound.death_sound(), DeathSoundPhase::None);
    }

    #[test]
    fn sound_armed_phase_returns_to_none_when_idle() {
        let mut player = SampleCommandRecorder::default();
        let mut sound = SoundTriggerDecoder::default();
        sound.control_write(&mut player, 6, 70);
        sound.control_write(&mut player, 3, 172);
        sound.control_write(&mut player, 5, 25);
        player.finish_all();
        sound.audio_update(&player);
        assert_eq!(sound.death_sound(), DeathSoundPhase::None);
    }

    #[test]
    fn sound_laser_reset_works() {
        let mut player = SampleCommandRecorder::default();
        let mut sound = SoundTriggerDecoder::default();
        sound.control_write(&mut player, 6, 69);
        assert_eq!(player.started_on(AudioChannel::Shot).collect::<Vec<_>>(),
                   [effect(Effect::RobotShot)]);
        sound.control_write(&mut player, 6, 69);
        assert_eq!(player.len(), 1);
        sound.control_write(&mut player, 3, 50);
        assert_eq!(sound.confirmation(), Confirmation::AwaitingLaserReset);
        sound.control_write(&mut player, 5, 25);
        assert_eq!(sound.confirmation(), Confirmation::Idle);
        assert_eq!(sound.last_noise_code(), 64);
        assert_eq!(sound.death_sound(), DeathSoundPhase::None);
        assert_eq!(player.len(), 1);
        // the next laser code retriggers
        sound.control_write(&mut player, 6, 69);
        assert_eq!(player.started_on(AudioChannel::Shot).count(), 2);
    }

    #[test]
    fn sound_confirmation_mismatch_works() {
        let mut player = SampleCommandRecorder::default();
        let mut sound = SoundTriggerDecoder::default();
        sound.control_write(&mut player, 6, 70);
        sound.control_write(&mut player, 3, 172);
        sound.control_write(&mut player, 5, 24);
        assert_eq!(sound.confirmation(), Confirmation::Idle);
        assert_eq!(sound.last_noise_code(), 70);
        assert_eq!(sound.death_sound(), DeathSoundPhase::ArmedFake);
        sound.control_write(&mut player, 5, 25);
        assert_eq!(sound.last_noise_code(), 70);
        assert_eq!(player.len(), 1);
        // wrong arming data for the current noise code
        sound.control_write(&mut player, 3, 50);
        assert_eq!(sound.confirmation(), Confirmation::Idle);
        sound.control_write(&mut player, 6, 69);
        sound.control_write(&mut player, 3, 172);
        assert_eq!(sound.confirmation(), Confirmation::Idle);
        // confirmation offsets never reach the noise dispatch
        sound.control_write(&mut player, 3, 66);
        sound.control_write(&mut player, 5, 66);
        assert_eq!(sound.last_noise_code(), 69);
    }

    #[test]
    fn sound_noise_codes_work() {
        let mut player = SampleCommandRecorder::default();
        let mut sound = SoundTriggerDecoder::default();
        for code in [64, 65, 67, 63, 71, 0, 255].iter().copied() {
            sound.control_write(&mut player, 6, code);
        }
        assert!(player.is_empty());
        assert_eq!(sound.last_noise_code(), 67);
        sound.control_write(&mut player, 6, 66);
        sound.control_write(&mut player, 6, 68);
        sound.control_write(&mut player, 6, 99);
        sound.control_write(&mut player, 6, 68);
        sound.control_write(&mut player, 6 | 8, 66);
        assert_eq!(player.started_on(AudioChannel::Shot).collect::<Vec<_>>(),
                   [effect(Effect::PlayerShot), effect(Effect::RobotKill), effect(Effect::PlayerShot)]);
        for offset in [0, 1, 2, 7].iter().copied() {
            sound.control_write(&mut player, offset, 68);
        }
        assert_eq!(player.len(), 3);
        assert_eq!(sound.last_noise_code(), 66);
    }

    #[test]
    fn sound_voice_works() {
        let mut player = SampleCommandRecorder::default();
        let mut sound = SoundTriggerDecoder::default();
        assert_eq!(sound.voice_status_read(), 0x40);
        sound.control_write(&mut player, 4, 0x40 | 0b011_101);
        assert_eq!(sound.voice_frequency_hz(), 6000);
        assert_eq!(sound.voice_volume(), 3);
        assert!(!sound.is_voice_busy());
        assert_eq!(&player[..], &[
            SampleCommand::Frequency { channel: AudioChannel::Voice, hz: 6000 },
            SampleCommand::Volume { channel: AudioChannel::Voice, level: 42 }
        ]);
        player.clear();
        sound.control_write(&mut player, 4, 0x80 | 0x2A);
        assert_eq!(sound.last_voice_code(), 0x2A);
        assert_eq!(&player[..], &[
            SampleCommand::Start { channel: AudioChannel::Voice, sample: SampleId::Voice(0x2A) }
        ]);
        assert_eq!(sound.voice_status_read(), 0x00);
        sound.audio_update(&player);
        assert_eq!(sound.voice_status_read(), 0x00);
        player.finish(AudioChannel::Voice);
        sound.audio_update(&player);
        assert_eq!(sound.voice_status_read(), 0x40);
        for (preset, &hz) in PITCH_PRESETS.iter().enumerate() {
            sound.control_write(&mut player, 4, 0x40 | preset as u8);
            assert_eq!(sound.voice_frequency_hz(), hz);
            assert_eq!(sound.voice_volume(), 0);
        }
        sound.reset();
        assert_eq!(sound, SoundTriggerDecoder::default());
    }

    #[test]
    fn volume_level_works() {
        assert_eq!(volume_level(0), 0);
        assert_eq!(volume_level(7), 100);
        assert_eq!(volume_level(3), 42);
        assert_eq!(volume_level(200), 100);
    }
}
