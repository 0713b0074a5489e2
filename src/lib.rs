/*
    Copyright (C) 2024  ZERK developers

    This file is part of ZERK, a Rust library for emulating Berzerk-style arcade boards.

    ZERK is free software: you can redistribute it and/or modify it under
    the terms of the GNU Lesser General Public License (LGPL) as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    ZERK is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Lesser General Public License for more details.

    You should have received a copy of the GNU Lesser General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.

    Author contact information: see Cargo.toml file, section [package.authors].
*/
//! **ZERK** is a library for building emulators of Berzerk-style arcade boards.
//!
//! The library emulates the custom logic of the board:
//!
//! * the magic RAM blitter with its logic operations, the barrel shifter and the collision detector,
//! * the video compositor of the 1bpp pixel plane and the nibble packed color plane,
//! * the interrupt sequencer alternating NMI and IRQ requests in lockstep with the raster,
//! * the sound board trigger decoder driving a host provided sample player.
//!
//! The CPU, the ROM and the input ports are left to the host. [chip::BerzerkBoard] ties
//! the blocks together and exposes handlers for the board's memory map and I/O port map.
//!
//! ```
//! use zerk::chip::BerzerkBoard;
//! use zerk::audio::SampleCommandRecorder;
//!
//! let mut board = BerzerkBoard::new(SampleCommandRecorder::default());
//! board.write_io(0x4B, 0x00); // magic control: plain copy
//! board.write_mem(0x8400, 0x9F); // color RAM
//! assert!(board.write_mem(0x6400, 0xF0)); // magic RAM
//! assert_eq!(board.read_mem(0x4400), Some(0xF0));
//! board.write_io(0x4F, 1); // IRQ enable
//! let irqs = (0..8).filter(|_| board.tick().is_irq()).count();
//! assert_eq!(irqs, 2);
//! ```
pub mod audio;
pub mod chip;
pub mod memory;
pub mod peripherals;
pub mod video;
