/*
    Copyright (C) 2024  ZERK developers

    This file is part of ZERK, a Rust library for emulating Berzerk-style arcade boards.

    For the full copyright notice, see the lib.rs file.
*/
//! An emulator of the **magic RAM** write path blitter.
//!
//! Bytes written by the CPU to the magic RAM window pass through a 9-bit barrel shifter,
//! an optional bit order reversal and one of 16 logic operations combining them with
//! the current content of the pixel plane before being stored there.
//!
//! Every write also tests the shifted source against the destination byte. The first
//! overlap of set bits latches the collision flag, which stays set until the next write
//! to the control register.
use core::fmt;

use log::{debug, trace};

#[cfg(feature = "snapshot")]
use serde::{Serialize, Deserialize};

#[cfg(feature = "snapshot")]
use zerk_core::memory::serde::{serialize_mem, deserialize_mem};
use zerk_core::chip::MagicControlFlags;
use zerk_core::memory::{VideoRamArray, VIDEO_RAM_MASK, VIDEO_RAM_SIZE};
use zerk_core::video::FrameStore;

/// The collision bit of the collision status port.
pub const COLLISION_BIT: u8 = 0x80;
/// The end of screen bit of the collision status port.
pub const END_OF_SCREEN_BIT: u8 = 0x01;

/// The logic operations of the blitter.
///
/// `S` is the shifted source byte, `D` is the current destination byte.
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LogicOp {
    /// `S`
    Source             = 0x0,
    /// `S | D`
    SourceOrDest       = 0x1,
    /// `S | !D`
    SourceOrNotDest    = 0x2,
    /// `0xFF`
    Set                = 0x3,
    /// `S & D`
    SourceAndDest      = 0x4,
    /// `D`
    Dest               = 0x5,
    /// `!(S ^ D)`
    Xnor               = 0x6,
    /// `!S | D`
    NotSourceOrDest    = 0x7,
    /// `S & !D`
    SourceAndNotDest   = 0x8,
    /// `S ^ D`
    Xor                = 0x9,
    /// `!D`
    NotDest            = 0xA,
    /// `!(S & D)`
    Nand               = 0xB,
    /// `0x00`
    Clear              = 0xC,
    /// `!S & D`
    NotSourceAndDest   = 0xD,
    /// `!(S | D)`
    Nor                = 0xE,
    /// `!S`
    NotSource          = 0xF,
}

impl LogicOp {
    /// Returns the logic operation selected by the lowest 4 bits of `code`.
    pub fn from_code(code: u8) -> Self {
        use LogicOp::*;
        match code & 0x0F {
            0x0 => Source,
            0x1 => SourceOrDest,
            0x2 => SourceOrNotDest,
            0x3 => Set,
            0x4 => SourceAndDest,
            0x5 => Dest,
            0x6 => Xnor,
            0x7 => NotSourceOrDest,
            0x8 => SourceAndNotDest,
            0x9 => Xor,
            0xA => NotDest,
            0xB => Nand,
            0xC => Clear,
            0xD => NotSourceAndDest,
            0xE => Nor,
            0xF => NotSource,
            _ => unreachable!()
        }
    }
    /// Combines the `source` byte with the `dest` byte.
    #[inline]
    pub fn apply(self, source: u8, dest: u8) -> u8 {
        use LogicOp::*;
        match self {
            Source           => source,
            SourceOrDest     => source | dest,
            SourceOrNotDest  => source | !dest,
            Set              => 0xFF,
            SourceAndDest    => source & dest,
            Dest             => dest,
            Xnor             => !(source ^ dest),
            NotSourceOrDest  => !source | dest,
            SourceAndNotDest => source & !dest,
            Xor              => source ^ dest,
            NotDest          => !dest,
            Nand             => !(source & dest),
            Clear            => 0x00,
            NotSourceAndDest => !source & dest,
            Nor              => !(source | dest),
            NotSource        => !source,
        }
    }
}

impl From<MagicControlFlags> for LogicOp {
    fn from(flags: MagicControlFlags) -> Self {
        LogicOp::from_code(flags.op_code())
    }
}

/// The magic RAM blitter state.
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "snapshot", serde(rename_all = "camelCase"))]
#[derive(Clone)]
pub struct MagicRam {
    control: MagicControlFlags,
    latch: u8,
    collision: bool,
    #[cfg_attr(feature = "snapshot", serde(
        serialize_with = "serialize_mem",
        deserialize_with = "deserialize_mem"))]
    shadow: Box<VideoRamArray>,
}

impl Default for MagicRam {
    fn default() -> Self {
        MagicRam {
            control: MagicControlFlags::empty(),
            latch: 0,
            collision: false,
            shadow: Box::new([0;VIDEO_RAM_SIZE])
        }
    }
}

impl fmt::Debug for MagicRam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MagicRam")
            .field("control", &self.control)
            .field("latch", &self.latch)
            .field("collision", &self.collision)
            .finish()
    }
}

impl MagicRam {
    /// Writes the control register.
    ///
    /// Resets the shifter latch and the collision flag.
    pub fn control_write(&mut self, value: u8) {
        self.control = MagicControlFlags::from(value);
        self.latch = 0;
        self.collision = false;
        trace!("magic control: {:?}", self.control);
    }
    /// Returns the current content of the control register.
    #[inline]
    pub fn control(&self) -> MagicControlFlags {
        self.control
    }
    /// Returns the logic operation selected by the control register.
    #[inline]
    pub fn logic_op(&self) -> LogicOp {
        self.control.into()
    }
    /// Returns the previous raw byte written through the magic window.
    #[inline]
    pub fn latch(&self) -> u8 {
        self.latch
    }
    /// Returns `true` if a collision was detected since the last control write.
    #[inline]
    pub fn is_collision(&self) -> bool {
        self.collision
    }
    /// Returns the `input` byte passed through the shifter and the flip stage.
    ///
    /// The shifter sees the 16-bit value `latch:input`. It outputs 9 bits starting at the shift
    /// amount, drops the lowest of them if requested and keeps the lowest 8 bits of the result.
    pub fn shift_and_flip(&self, input: u8) -> u8 {
        let shift = self.control.shift();
        let wide = ((input as u16) >> shift | (self.latch as u16) << (8 - shift)) & 0x1FF;
        let output = (wide >> self.control.is_drop_bit() as u8) as u8;
        if self.control.is_flip() {
            output.reverse_bits()
        }
        else {
            output
        }
    }
    /// Performs a blitter write of `input` at `addr` of the pixel plane owned by `frame`.
    ///
    /// Returns the combined byte, which is also stored in the magic RAM shadow plane.
    pub fn blit_write(&mut self, frame: &mut FrameStore, addr: u16, input: u8) -> u8 {
        let addr = addr & VIDEO_RAM_MASK;
        let source = self.shift_and_flip(input);
        self.latch = input;
        let dest = frame.pixel_byte(addr);
        if !self.collision && source & dest != 0 {
            debug!("collision at {:04x}: {:02x} & {:02x}", addr, source, dest);
            self.collision = true;
        }
        let combined = self.logic_op().apply(source, dest);
        self.shadow[addr as usize] = combined;
        frame.write_pixel_byte(addr, combined);
        combined
    }
    /// Returns the last byte stored through the magic window at `addr`.
    #[inline]
    pub fn magic_read(&self, addr: u16) -> u8 {
        self.shadow[(addr & VIDEO_RAM_MASK) as usize]
    }
    /// Returns the collision status port value.
    ///
    /// Bit 7 is the collision flag, bit 0 is the `end_of_screen` signal of the interrupt sequencer.
    #[inline]
    pub fn collision_read(&self, end_of_screen: bool) -> u8 {
        (if self.collision { COLLISION_BIT } else { 0 }) | end_of_screen as u8
    }
    /// Resets the blitter to its power on state and clears the shadow plane.
    pub fn reset(&mut self) {
        self.control = MagicControlFlags::empty();
        self.latch = 0;
        self.collision = false;
        self.shadow.iter_mut().for_each(|p| *p = 0);
    }
}
