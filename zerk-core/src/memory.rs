/*
    Copyright (C) 2024  ZERK developers

    This file is part of ZERK, a Rust library for emulating Berzerk-style arcade boards.

    For the full copyright notice, see the lib.rs file.
*/
//! Memory API.
use core::fmt;
use std::io::{self, Read, Write};

#[cfg(feature = "snapshot")]
use ::serde::{Serialize, Deserialize};

#[cfg(feature = "snapshot")] pub mod serde;

/// The size of the pixel plane: 32 bytes per line, 256 lines.
pub const VIDEO_RAM_SIZE: usize = 0x2000;
/// The size of the color plane: 32 bytes per each group of 4 lines.
pub const COLOR_RAM_SIZE: usize = 0x0800;
/// The size of the battery-backed RAM.
pub const NVRAM_SIZE: usize = 0x0400;

/// The address mask applied to the pixel plane addresses.
pub const VIDEO_RAM_MASK: u16 = (VIDEO_RAM_SIZE - 1) as u16;
/// The address mask applied to the color plane addresses.
pub const COLOR_RAM_MASK: u16 = (COLOR_RAM_SIZE - 1) as u16;
/// The address mask applied to the battery-backed RAM addresses.
pub const NVRAM_MASK: u16 = (NVRAM_SIZE - 1) as u16;

/// Represents the pixel plane memory.
pub type VideoRamArray = [u8;VIDEO_RAM_SIZE];
/// Represents the color plane memory.
pub type ColorRamArray = [u8;COLOR_RAM_SIZE];
/// Represents the battery-backed memory.
pub type NvRamArray = [u8;NVRAM_SIZE];

#[non_exhaustive]
#[derive(Debug)]
pub enum NvRamError {
    /// The provided data is not the size of the battery-backed RAM.
    InvalidSize(usize),
    Io(io::Error)
}

pub type Result<T> = core::result::Result<T, NvRamError>;

impl std::error::Error for NvRamError {}

impl fmt::Display for NvRamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NvRamError::InvalidSize(size) => write!(f,
                "NVRAM data size mismatch: {} bytes required, received: {}", NVRAM_SIZE, size),
            NvRamError::Io(err) => err.fmt(f)
        }
    }
}

impl From<io::Error> for NvRamError {
    fn from(err: io::Error) -> Self {
        NvRamError::Io(err)
    }
}

impl From<NvRamError> for io::Error {
    fn from(err: NvRamError) -> Self {
        match err {
            NvRamError::Io(err) => err,
            e => io::Error::new(io::ErrorKind::InvalidData, e)
        }
    }
}

/// The battery-backed CMOS RAM holding the high score table and the operator settings.
///
/// The content is opaque to the emulated hardware and is preserved verbatim between
/// sessions with [NvRam::load] and [NvRam::save].
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "snapshot", serde(transparent))]
pub struct NvRam {
    #[cfg_attr(feature = "snapshot", serde(
        serialize_with = "self::serde::serialize_mem",
        deserialize_with = "self::serde::deserialize_mem"))]
    mem: Box<NvRamArray>
}

impl Default for NvRam {
    fn default() -> Self {
        NvRam { mem: Box::new([0u8;NVRAM_SIZE]) }
    }
}

impl fmt::Debug for NvRam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NvRam")
         .field("mem", &format_args!("[u8;{}]", NVRAM_SIZE))
         .finish()
    }
}

impl NvRam {
    /// Reads a byte from the memory at the given `addr`, masked to the memory size.
    #[inline]
    pub fn read(&self, addr: u16) -> u8 {
        self.mem[usize::from(addr & NVRAM_MASK)]
    }
    /// Writes a byte to the memory at the given `addr`, masked to the memory size.
    #[inline]
    pub fn write(&mut self, addr: u16, data: u8) {
        self.mem[usize::from(addr & NVRAM_MASK)] = data;
    }
    /// Returns a reference to the memory content.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.mem[..]
    }
    /// Returns a mutable reference to the memory content.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.mem[..]
    }
    /// Clears the memory content. Used when the battery is "removed" on a hard reset.
    pub fn clear(&mut self) {
        self.mem.iter_mut().for_each(|p| *p = 0);
    }
    /// Replaces the memory content with bytes from the `slice`.
    ///
    /// # Errors
    /// Returns [NvRamError::InvalidSize] if the size of `slice` is not exactly [NVRAM_SIZE].
    pub fn load_from_slice(&mut self, slice: &[u8]) -> Result<()> {
        if slice.len() != NVRAM_SIZE {
            return Err(NvRamError::InvalidSize(slice.len()))
        }
        self.mem.copy_from_slice(slice);
        Ok(())
    }
    /// Replaces the memory content with exactly [NVRAM_SIZE] bytes read from `rd`.
    ///
    /// # Errors
    /// Returns [NvRamError::Io] if the reader fails or ends prematurely. The memory content
    /// is left unmodified in this instance.
    pub fn load<R: Read>(&mut self, mut rd: R) -> Result<()> {
        let mut buf = [0u8;NVRAM_SIZE];
        rd.read_exact(&mut buf)?;
        self.mem.copy_from_slice(&buf);
        Ok(())
    }
    /// Writes the whole memory content to `wr`.
    pub fn save<W: Write>(&self, mut wr: W) -> Result<()> {
        wr.write_all(&self.mem[..])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nvram_works() {
        let mut nvram = NvRam::default();
        assert!(nvram.as_slice().iter().all(|&b| b == 0));
        nvram.write(0x0801, 0xA5);
        assert_eq!(nvram.read(0x0001), 0xA5);
        assert_eq!(nvram.read(0x0801), 0xA5);
        let mut saved = Vec::new();
        nvram.save(&mut saved).unwrap();
        assert_eq!(saved.len(), NVRAM_SIZE);
        assert_eq!(saved[1], 0xA5);
        let mut restored = NvRam::default();
        restored.load(&saved[..]).unwrap();
        assert_eq!(restored, nvram);
        restored.clear();
        assert_eq!(restored.read(1), 0);
    }

    #[test]
    fn nvram_errors_work() {
        let mut nvram = NvRam::default();
        nvram.write(7, 42);
        let err = nvram.load(&[1u8, 2, 3][..]).unwrap_err();
        match err {
            NvRamError::Io(ref e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            _ => panic!("unexpected error: {}", err)
        }
        assert_eq!(nvram.read(7), 42);
        let err = nvram.load_from_slice(&[0u8;10]).unwrap_err();
        assert_eq!(err.to_string(), "NVRAM data size mismatch: 1024 bytes required, received: 10");
        let err: io::Error = err.into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(nvram.load_from_slice(&[0x11u8;NVRAM_SIZE]).is_ok());
        assert_eq!(nvram.read(0x3ff), 0x11);
    }
}
