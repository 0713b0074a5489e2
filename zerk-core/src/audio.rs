/*
    Copyright (C) 2024  ZERK developers

    This file is part of ZERK, a Rust library for emulating Berzerk-style arcade boards.

    For the full copyright notice, see the lib.rs file.
*/
//! # Audio API.
//!
//! The board does not synthesize sound by itself. Its sound trigger logic issues commands
//! to an implementation of [SamplePlayer] provided by the host, which owns the recorded
//! samples and does the mixing.
use core::fmt;
use core::ops::{Deref, DerefMut};

#[cfg(feature = "snapshot")]
use serde::{Serialize, Deserialize};

/// The number of [AudioChannel]s.
pub const NUM_CHANNELS: usize = 3;

/// An enumeration of the sample player channels.
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum AudioChannel {
    /// The speech synthesizer output.
    Voice  = 0,
    /// Long special effects, e.g. the player's death.
    Effect = 1,
    /// Short shots and explosions.
    Shot   = 2,
}

/// An enumeration of the sound effects recorded from the noise board.
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Effect {
    /// The player fired a shot.
    PlayerShot     = 0,
    /// A robot fired a shot.
    RobotShot      = 1,
    /// A robot fired a shot while the player is dying.
    RobotShotEcho  = 2,
    /// A robot has been destroyed.
    RobotKill      = 3,
    /// The electrocution noise heard when the laser death code is latched.
    FakeDeath      = 4,
    /// The player's death sound, confirmed by the two-write pattern.
    RealDeath      = 5,
}

/// Identifies a sample to be played by a [SamplePlayer].
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SampleId {
    /// One of the 64 voice samples (words) of the speech board.
    Voice(u8),
    /// A sound effect.
    Effect(Effect)
}

/// An interface to the sample player provided by the host.
///
/// Implementations are driven by the sound trigger decoder: one call per decoded command.
pub trait SamplePlayer {
    /// Should start playing the `sample` on the `channel`, replacing whatever is playing there.
    fn start_sample(&mut self, channel: AudioChannel, sample: SampleId);
    /// Should change the playback rate of the `channel` to `hz` samples per second.
    fn set_frequency(&mut self, channel: AudioChannel, hz: u32);
    /// Should change the volume of the `channel`: [0, 100] percent.
    fn set_volume(&mut self, channel: AudioChannel, level: u8);
    /// Should return `true` if the `channel` is still playing a sample.
    fn is_playing(&self, channel: AudioChannel) -> bool;
}

/// A [SamplePlayer] that plays nothing.
///
/// Useful when no sound will be generated.
#[derive(Clone, Copy, Default, Debug)]
pub struct NullSamplePlayer;

/// A single command issued to a [SamplePlayer].
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SampleCommand {
    Start { channel: AudioChannel, sample: SampleId },
    Frequency { channel: AudioChannel, hz: u32 },
    Volume { channel: AudioChannel, level: u8 },
}

/// A convenient [SamplePlayer] that records commands in a [Vec] and tracks which channels
/// are busy.
///
/// A channel becomes busy when a sample is started on it and stays busy until
/// [SampleCommandRecorder::finish] is called for it, e.g. by a host mixer reaching the end
/// of the sample.
#[derive(Clone, Default, Debug)]
pub struct SampleCommandRecorder {
    commands: Vec<SampleCommand>,
    playing: [bool;NUM_CHANNELS]
}

impl AudioChannel {
    /// Returns an iterator of all [AudioChannel] values in an ascending order.
    pub fn enumerate() -> impl Iterator<Item=AudioChannel> {
        [AudioChannel::Voice, AudioChannel::Effect, AudioChannel::Shot].iter().copied()
    }
}

impl From<AudioChannel> for usize {
    #[inline(always)]
    fn from(channel: AudioChannel) -> usize {
        channel as usize
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleId::Voice(index) => write!(f, "voice #{}", index),
            SampleId::Effect(effect) => write!(f, "{:?}", effect)
        }
    }
}

impl SamplePlayer for NullSamplePlayer {
    #[inline]
    fn start_sample(&mut self, _channel: AudioChannel, _sample: SampleId) {}
    #[inline]
    fn set_frequency(&mut self, _channel: AudioChannel, _hz: u32) {}
    #[inline]
    fn set_volume(&mut self, _channel: AudioChannel, _level: u8) {}
    #[inline]
    fn is_playing(&self, _channel: AudioChannel) -> bool { false }
}

impl<P: SamplePlayer + ?Sized> SamplePlayer for &mut P {
    #[inline]
    fn start_sample(&mut self, channel: AudioChannel, sample: SampleId) {
        (**self).start_sample(channel, sample)
    }
    #[inline]
    fn set_frequency(&mut self, channel: AudioChannel, hz: u32) {
        (**self).set_frequency(channel, hz)
    }
    #[inline]
    fn set_volume(&mut self, channel: AudioChannel, level: u8) {
        (**self).set_volume(channel, level)
    }
    #[inline]
    fn is_playing(&self, channel: AudioChannel) -> bool {
        (**self).is_playing(channel)
    }
}

impl SampleCommandRecorder {
    /// Marks the `channel` as no longer playing.
    #[inline]
    pub fn finish(&mut self, channel: AudioChannel) {
        self.playing[usize::from(channel)] = false;
    }
    /// Marks all channels as no longer playing.
    pub fn finish_all(&mut self) {
        self.playing = [false;NUM_CHANNELS];
    }
    /// Returns an iterator of the recorded samples started on the `channel`.
    pub fn started_on(&'_ self, channel: AudioChannel) -> impl Iterator<Item=SampleId> + '_ {
        self.commands.iter().filter_map(move |cmd| match *cmd {
            SampleCommand::Start { channel: ch, sample } if ch == channel => Some(sample),
            _ => None
        })
    }
    /// Constructs a draining iterator of the recorded commands.
    pub fn drain_commands(&'_ mut self) -> impl Iterator<Item=SampleCommand> + '_ {
        self.commands.drain(..)
    }
}

impl SamplePlayer for SampleCommandRecorder {
    fn start_sample(&mut self, channel: AudioChannel, sample: SampleId) {
        self.playing[usize::from(channel)] = true;
        self.commands.push(SampleCommand::Start { channel, sample });
    }

    fn set_frequency(&mut self, channel: AudioChannel, hz: u32) {
        self.commands.push(SampleCommand::Frequency { channel, hz });
    }

    fn set_volume(&mut self, channel: AudioChannel, level: u8) {
        self.commands.push(SampleCommand::Volume { channel, level });
    }

    #[inline]
    fn is_playing(&self, channel: AudioChannel) -> bool {
        self.playing[usize::from(channel)]
    }
}

impl Deref for SampleCommandRecorder {
    type Target = Vec<SampleCommand>;
    fn deref(&self) -> &Self::Target {
        &self.commands
    }
}

impl DerefMut for SampleCommandRecorder {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.commands
    }
}
