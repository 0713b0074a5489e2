/*
    Copyright (C) 2024  ZERK developers

    This file is part of ZERK, a Rust library for emulating Berzerk-style arcade boards.

    For the full copyright notice, see the lib.rs file.
*/
//! The Berzerk-style board chipset.
mod io;

use core::fmt;
use core::ops::RangeInclusive;
use core::time::Duration;
use std::io::{Read, Write};

#[allow(unused_imports)]
use log::{error, warn, info, debug, trace};

#[cfg(feature = "snapshot")]
use serde::{Serialize, Deserialize};

use crate::audio::{NullSamplePlayer, SamplePlayer};
use crate::chip::{BerzerkTiming, BoardTiming, InterruptRequest};
use crate::memory::{NvRam, Result};
use crate::peripherals::interrupt::{InterruptSequencer, PHASES};
use crate::peripherals::magic::MagicRam;
use crate::peripherals::sound::SoundTriggerDecoder;
use crate::video::{FrameStore, Palette, PixelBuffer, Video};

pub use io::*;

/// The battery backed RAM address range.
pub const NVRAM_RANGE: RangeInclusive<u16> = 0x0800..=0x0BFF;
/// The address range of the direct access window to the pixel plane.
pub const VIDEO_RAM_RANGE: RangeInclusive<u16> = 0x4000..=0x5FFF;
/// The address range of the magic RAM window to the pixel plane.
pub const MAGIC_RAM_RANGE: RangeInclusive<u16> = 0x6000..=0x7FFF;
/// The color plane address range.
pub const COLOR_RAM_RANGE: RangeInclusive<u16> = 0x8000..=0x87FF;

/// The chipset of a Berzerk-style arcade board.
///
/// Owns the video planes, the custom logic blocks, the battery backed RAM and the host's
/// [SamplePlayer] implementation. The host CPU emulator forwards its memory and I/O accesses
/// to [BerzerkBoard::read_mem], [BerzerkBoard::write_mem], [BerzerkBoard::read_io] and
/// [BerzerkBoard::write_io], and clocks the interrupt sequencer with [BerzerkBoard::tick]
/// every [BoardTiming::TICK_TSTATES].
///
/// The sample player is not a part of the snapshot.
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "snapshot", serde(rename_all = "camelCase"))]
#[derive(Clone)]
pub struct BerzerkBoard<P=NullSamplePlayer> {
    frames: u64,
    frame_store: FrameStore,
    magic: MagicRam,
    interrupt: InterruptSequencer,
    sound: SoundTriggerDecoder,
    nvram: NvRam,
    #[cfg_attr(feature = "snapshot", serde(skip))]
    player: P,
}

/// A type of [BoardTiming] used by [BerzerkBoard].
pub type BerzerkBoardTiming = BerzerkTiming;

impl<P: Default> Default for BerzerkBoard<P> {
    fn default() -> Self {
        BerzerkBoard::new(P::default())
    }
}

impl<P> fmt::Debug for BerzerkBoard<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BerzerkBoard")
            .field("frames", &self.frames)
            .field("frame_store", &self.frame_store)
            .field("magic", &self.magic)
            .field("interrupt", &self.interrupt)
            .field("sound", &self.sound)
            .field("nvram", &self.nvram)
            .finish()
    }
}

impl<P> BerzerkBoard<P> {
    /// Creates a new board in its power on state with the given sample `player`.
    pub fn new(player: P) -> Self {
        BerzerkBoard {
            frames: 0,
            frame_store: FrameStore::default(),
            magic: MagicRam::default(),
            interrupt: InterruptSequencer::default(),
            sound: SoundTriggerDecoder::default(),
            nvram: NvRam::default(),
            player
        }
    }
    /// Returns the number of completed interrupt sequencer cycles (video frames).
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }
    /// Advances the interrupt sequencer by a single raster tick.
    ///
    /// Should be called [BoardTiming::INTERRUPTS_PER_FRAME] times per video frame.
    /// The returned request should be delivered to the CPU.
    pub fn tick(&mut self) -> InterruptRequest {
        let request = self.interrupt.tick();
        if self.interrupt.phase() == 0 {
            self.frames = self.frames.wrapping_add(1);
        }
        request
    }
    /// Resets the board.
    ///
    /// Clears the video planes and resets the custom logic blocks. A `hard` reset also
    /// clears the battery backed RAM.
    pub fn reset(&mut self, hard: bool) {
        debug!("board reset, hard: {}", hard);
        self.frame_store.reset();
        self.magic.reset();
        self.interrupt.reset();
        self.sound.reset();
        if hard {
            self.nvram.clear();
        }
    }
    /// Loads the battery backed RAM content from the reader.
    pub fn load_nvram<R: Read>(&mut self, rd: R) -> Result<()> {
        self.nvram.load(rd)?;
        debug!("nvram loaded");
        Ok(())
    }
    /// Saves the battery backed RAM content to the writer.
    pub fn save_nvram<W: Write>(&self, wr: W) -> Result<()> {
        self.nvram.save(wr)
    }
    #[inline]
    pub fn nvram(&self) -> &NvRam {
        &self.nvram
    }
    #[inline]
    pub fn nvram_mut(&mut self) -> &mut NvRam {
        &mut self.nvram
    }
    #[inline]
    pub fn frame_store(&self) -> &FrameStore {
        &self.frame_store
    }
    #[inline]
    pub fn magic(&self) -> &MagicRam {
        &self.magic
    }
    #[inline]
    pub fn interrupt(&self) -> &InterruptSequencer {
        &self.interrupt
    }
    #[inline]
    pub fn sound(&self) -> &SoundTriggerDecoder {
        &self.sound
    }
    #[inline]
    pub fn player(&self) -> &P {
        &self.player
    }
    #[inline]
    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }
    /// Replaces the sample player, returning the previous one.
    pub fn set_player(&mut self, player: P) -> P {
        core::mem::replace(&mut self.player, player)
    }
    /// Renders the current framebuffer into the provided pixel `buffer`.
    ///
    /// A convenient shortcut for [Video::render_video_frame].
    pub fn render_frame<'a, B: PixelBuffer<'a>, C: Palette<Pixel=B::Pixel>>(
            &self,
            buffer: &'a mut [u8],
            pitch: usize
        )
    {
        self.frame_store.render_video_frame::<B, C>(buffer, pitch)
    }
    /// Returns the number of CPU T-states between two sequencer ticks.
    #[inline]
    pub fn tick_tstates() -> u32 {
        BerzerkBoardTiming::TICK_TSTATES
    }
    /// Returns the number of sequencer ticks per frame.
    #[inline]
    pub fn ticks_per_frame() -> u32 {
        PHASES as u32
    }
    /// Returns the real time duration of a single video frame.
    ///
    /// Hosts pace the emulation loop with it.
    #[inline]
    pub fn frame_duration() -> Duration {
        BerzerkBoardTiming::frame_duration()
    }
}

impl<P: SamplePlayer> BerzerkBoard<P> {
    /// Lets the sound trigger decoder follow the state of the sample player.
    ///
    /// Should be called once per audio buffer period.
    pub fn audio_update(&mut self) {
        self.sound.audio_update(&self.player);
    }
}

impl<P> Video for BerzerkBoard<P> {
    fn render_video_frame<'a, B: PixelBuffer<'a>, C: Palette<Pixel=B::Pixel>>(
            &self,
            buffer: &'a mut [u8],
            pitch: usize
        )
    {
        self.frame_store.render_video_frame::<B, C>(buffer, pitch)
    }
}

#[cfg(test)]
mod tests {
    use crate::audio::SampleCommandRecorder;
    use super::*;

    #[test]
    fn board_frames_work() {
        let mut board = BerzerkBoard::<NullSamplePlayer>::default();
        assert_eq!(BerzerkBoard::<NullSamplePlayer>::ticks_per_frame(),
                   BerzerkBoardTiming::INTERRUPTS_PER_FRAME);
        assert_eq!(BerzerkBoard::<NullSamplePlayer>::tick_tstates(), 5208);
        assert_eq!(BerzerkBoard::<NullSamplePlayer>::frame_duration(),
                   Duration::from_nanos(16_666_400));
        for _ in 0..8*3 + 5 {
            board.tick();
        }
        assert_eq!(board.frames(), 3);
        assert_eq!(board.interrupt().phase(), 5);
    }

    #[test]
    fn board_reset_works() {
        let mut board = BerzerkBoard::new(SampleCommandRecorder::default());
        board.nvram_mut().write(0x0123, 0x42);
        board.write_mem(0x4400, 0xFF);
        board.write_mem(0x8100, 0x77);
        board.write_io(0x4F, 1);
        board.reset(false);
        assert_eq!(board.read_mem(0x4400), Some(0));
        assert_eq!(board.read_mem(0x8100), Some(0));
        assert!(!board.interrupt().is_irq_enabled());
        assert_eq!(board.nvram().read(0x0123), 0x42);
        assert!(board.frame_store().framebuffer().iter().all(|&p| p == 0));
        board.reset(true);
        assert_eq!(board.nvram().read(0x0123), 0);
    }
}
