/*
    Copyright (C) 2024  ZERK developers

    This file is part of ZERK, a Rust library for emulating Berzerk-style arcade boards.

    For the full copyright notice, see the lib.rs file.
*/
use log::trace;

use crate::audio::SamplePlayer;
use super::{
    BerzerkBoard,
    NVRAM_RANGE, VIDEO_RAM_RANGE, MAGIC_RAM_RANGE, COLOR_RAM_RANGE
};

/// The first of the sound board ports.
pub const SOUND_PORT_FIRST: u8 = 0x40;
/// The last of the sound board ports.
pub const SOUND_PORT_LAST: u8 = 0x46;
/// The voice status port (read).
pub const VOICE_STATUS_PORT: u8 = 0x44;
/// The magic RAM control port (write).
pub const MAGIC_CONTROL_PORT: u8 = 0x4B;
/// The NMI enable port (read or write).
pub const NMI_ENABLE_PORT: u8 = 0x4C;
/// The NMI disable port (read or write).
pub const NMI_DISABLE_PORT: u8 = 0x4D;
/// The collision status port (read).
pub const COLLISION_PORT: u8 = 0x4E;
/// The IRQ enable port (write).
pub const IRQ_ENABLE_PORT: u8 = 0x4F;

impl<P> BerzerkBoard<P> {
    /// Handles a CPU memory read.
    ///
    /// Returns `None` if `addr` is not mapped to the board's RAM.
    pub fn read_mem(&self, addr: u16) -> Option<u8> {
        if NVRAM_RANGE.contains(&addr) {
            Some(self.nvram.read(addr))
        }
        else if VIDEO_RAM_RANGE.contains(&addr) {
            Some(self.frame_store.pixel_byte(addr))
        }
        else if MAGIC_RAM_RANGE.contains(&addr) {
            Some(self.magic.magic_read(addr))
        }
        else if COLOR_RAM_RANGE.contains(&addr) {
            Some(self.frame_store.color_byte(addr))
        }
        else {
            None
        }
    }
    /// Handles a CPU memory write.
    ///
    /// Returns `false` if `addr` is not mapped to the board's RAM.
    pub fn write_mem(&mut self, addr: u16, data: u8) -> bool {
        if NVRAM_RANGE.contains(&addr) {
            self.nvram.write(addr, data);
        }
        else if VIDEO_RAM_RANGE.contains(&addr) {
            self.frame_store.write_pixel_byte(addr, data);
        }
        else if MAGIC_RAM_RANGE.contains(&addr) {
            self.magic.blit_write(&mut self.frame_store, addr, data);
        }
        else if COLOR_RAM_RANGE.contains(&addr) {
            self.frame_store.write_color_byte(addr, data);
        }
        else {
            return false
        }
        true
    }
    /// Handles a CPU I/O read. Only the lowest 8 bits of the `port` are decoded.
    ///
    /// Reading the NMI enable or disable port changes the NMI enable latch.
    ///
    /// Returns `None` if the port is not handled by the board.
    pub fn read_io(&mut self, port: u16) -> Option<u8> {
        match port as u8 {
            VOICE_STATUS_PORT => Some(self.sound.voice_status_read()),
            NMI_ENABLE_PORT => Some(self.interrupt.nmi_enable_read().0),
            NMI_DISABLE_PORT => Some(self.interrupt.nmi_disable_read().0),
            COLLISION_PORT => Some(self.magic.collision_read(self.interrupt.end_of_screen())),
            port => {
                trace!("unhandled port read: {:02x}", port);
                None
            }
        }
    }
}

impl<P: SamplePlayer> BerzerkBoard<P> {
    /// Handles a CPU I/O write. Only the lowest 8 bits of the `port` are decoded.
    ///
    /// Returns `false` if the port is not handled by the board.
    pub fn write_io(&mut self, port: u16, data: u8) -> bool {
        match port as u8 {
            port@SOUND_PORT_FIRST..=SOUND_PORT_LAST => {
                self.sound.control_write(&mut self.player, port - SOUND_PORT_FIRST, data);
            }
            MAGIC_CONTROL_PORT => self.magic.control_write(data),
            NMI_ENABLE_PORT => self.interrupt.nmi_enable_write(),
            NMI_DISABLE_PORT => self.interrupt.nmi_disable_write(),
            IRQ_ENABLE_PORT => self.interrupt.irq_enable_write(data),
            port => {
                trace!("unhandled port write: {:02x} <- {:02x}", port, data);
                return false
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::audio::{AudioChannel, Effect, SampleId, SampleCommandRecorder};
    use crate::chip::InterruptRequest;
    use super::*;

    #[test]
    fn board_memory_map_works() {
        let mut board = BerzerkBoard::new(SampleCommandRecorder::default());
        for addr in [0x0000, 0x07FF, 0x0C00, 0x3FFF, 0x8800, 0xFFFF].iter().copied() {
            assert_eq!(board.read_mem(addr), None);
            assert!(!board.write_mem(addr, 0x55));
        }
        assert!(board.write_mem(0x0800, 0x11));
        assert!(board.write_mem(0x0BFF, 0x22));
        assert_eq!(board.read_mem(0x0800), Some(0x11));
        assert_eq!(board.nvram().read(0x3FF), 0x22);
        assert!(board.write_mem(0x5FFF, 0x81));
        assert_eq!(board.frame_store().pixel_byte(0x1FFF), 0x81);
        assert!(board.write_mem(0x87FF, 0x4C));
        assert_eq!(board.read_mem(0x87FF), Some(0x4C));
        assert_eq!(board.frame_store().framebuffer_pixel(0, 223), 0);
        assert_eq!(board.frame_store().framebuffer_pixel(248, 223), 4);
        assert_eq!(board.frame_store().framebuffer_pixel(255, 223), 12);
    }

    #[test]
    fn board_magic_ram_works() {
        let mut board = BerzerkBoard::new(SampleCommandRecorder::default());
        assert!(board.write_mem(0x4800, 0x0F));
        // shift by 4, OR
        assert!(board.write_io(0x4B, 0x14));
        assert!(board.write_mem(0x6800, 0xAB));
        assert_eq!(board.read_mem(0x4800), Some(0x0F | 0x0A));
        assert_eq!(board.read_mem(0x6800), Some(0x0F));
        assert_eq!(board.read_io(0x4E), Some(0x80));
        assert!(board.write_mem(0x6801, 0x00));
        assert_eq!(board.read_mem(0x4801), Some(0xB0));
        assert_eq!(board.read_mem(0x6801), Some(0xB0));
        assert!(board.write_io(0x4B, 0x14));
        assert_eq!(board.read_io(0x4E), Some(0x00));
    }

    #[test]
    fn board_interrupt_ports_work() {
        let mut board = BerzerkBoard::new(SampleCommandRecorder::default());
        assert_eq!(board.read_io(0x4C), Some(0x00));
        assert!(board.interrupt().is_nmi_enabled());
        assert_eq!(board.tick(), InterruptRequest::Nmi);
        assert_eq!(board.read_io(0xFF4D), Some(0x00));
        assert!(!board.interrupt().is_nmi_enabled());
        assert!(board.write_io(0x4C, 0));
        assert!(board.interrupt().is_nmi_enabled());
        assert!(board.write_io(0x4D, 0xFF));
        assert!(!board.interrupt().is_nmi_enabled());
        assert!(board.write_io(0x4F, 0x01));
        assert_eq!(board.tick(), InterruptRequest::None);
        assert_eq!(board.tick(), InterruptRequest::None);
        assert_eq!(board.tick(), InterruptRequest::Irq(0xFC));
        assert_eq!(board.read_io(0x4E), Some(0x01));
        assert!(board.write_mem(0x4000, 0xFF));
        board.write_io(0x4B, 0x00);
        board.write_mem(0x6000, 0x01);
        assert_eq!(board.read_io(0x4E), Some(0x81));
        assert_eq!(board.tick(), InterruptRequest::None);
        assert_eq!(board.read_io(0x4E), Some(0x80));
    }

    #[test]
    fn board_sound_ports_work() {
        let mut board = BerzerkBoard::new(SampleCommandRecorder::default());
        assert_eq!(board.read_io(0x44), Some(0x40));
        assert!(board.write_io(0x44, 0x05));
        assert_eq!(board.read_io(0x44), Some(0x00));
        assert!(board.write_io(0x46, 66));
        assert!(board.write_io(0x40, 66));
        assert!(!board.write_io(0x47, 66));
        assert_eq!(board.player().started_on(AudioChannel::Voice).collect::<Vec<_>>(),
                   [SampleId::Voice(5)]);
        assert_eq!(board.player().started_on(AudioChannel::Shot).collect::<Vec<_>>(),
                   [SampleId::Effect(Effect::PlayerShot)]);
        board.audio_update();
        assert_eq!(board.read_io(0x44), Some(0x00));
        board.player_mut().finish(AudioChannel::Voice);
        board.audio_update();
        assert_eq!(board.read_io(0x44), Some(0x40));
        assert_eq!(board.read_io(0x45), None);
        assert!(!board.write_io(0x4A, 0));
    }
}
