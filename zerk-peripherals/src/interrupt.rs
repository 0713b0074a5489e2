/*
    Copyright (C) 2024  ZERK developers

    This file is part of ZERK, a Rust library for emulating Berzerk-style arcade boards.

    For the full copyright notice, see the lib.rs file.
*/
//! An emulator of the raster driven interrupt sequencer.
//!
//! The sequencer is clocked 8 times per video frame. Each tick produces an interrupt candidate:
//!
//! | tick | 1   | 2   | 3   | 4   | 5   | 6   | 7   | 8   |
//! |------|-----|-----|-----|-----|-----|-----|-----|-----|
//! | kind | NMI | NMI | NMI | IRQ | NMI | NMI | NMI | IRQ |
//! | EOS  | 0   | 0   | 0   | 1   | 0   | 0   | 1   | 0   |
//!
//! A candidate is delivered only while its enable latch is set. The end of screen (EOS) signal
//! is exposed to the CPU via the collision status port.
use log::debug;

#[cfg(feature = "snapshot")]
use serde::{Serialize, Deserialize, Deserializer, de::{self, Unexpected}};

use zerk_core::chip::{InterruptRequest, IRQ_VECTOR};

/// The number of sequencer ticks in a full cycle.
pub const PHASES: u8 = 8;

/// The value placed on the data bus by the read triggered NMI latch ports.
pub const NMI_PORT_DATA: u8 = 0x00;

/// The interrupt sequencer state.
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "snapshot", serde(rename_all = "camelCase"))]
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct InterruptSequencer {
    #[cfg_attr(feature = "snapshot", serde(deserialize_with = "deserialize_phase"))]
    phase: u8,
    irq_enabled: bool,
    nmi_enabled: bool,
    end_of_screen: bool,
}

#[cfg(feature = "snapshot")]
fn deserialize_phase<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let phase = u8::deserialize(deserializer)?;
    if phase < PHASES {
        Ok(phase)
    }
    else {
        Err(de::Error::invalid_value(Unexpected::Unsigned(phase.into()), &"a sequencer phase in [0, 7]"))
    }
}

impl InterruptSequencer {
    /// Advances the sequencer by a single raster tick and returns the interrupt request
    /// to be delivered to the CPU.
    pub fn tick(&mut self) -> InterruptRequest {
        self.phase += 1;
        match self.phase {
            4 => {
                self.end_of_screen = true;
                self.irq_request()
            }
            phase if phase >= PHASES => {
                self.end_of_screen = false;
                self.phase = 0;
                self.irq_request()
            }
            phase => {
                self.end_of_screen = phase == 7;
                if self.nmi_enabled {
                    InterruptRequest::Nmi
                }
                else {
                    InterruptRequest::None
                }
            }
        }
    }
    /// Returns the number of ticks since the beginning of the current cycle: [0, 7].
    #[inline]
    pub fn phase(&self) -> u8 {
        self.phase
    }
    /// Returns the state of the end of screen signal.
    #[inline]
    pub fn end_of_screen(&self) -> bool {
        self.end_of_screen
    }
    #[inline]
    pub fn is_irq_enabled(&self) -> bool {
        self.irq_enabled
    }
    #[inline]
    pub fn is_nmi_enabled(&self) -> bool {
        self.nmi_enabled
    }
    /// Writes the IRQ enable latch: any non-zero `value` enables maskable interrupts.
    pub fn irq_enable_write(&mut self, value: u8) {
        self.irq_enabled = value != 0;
        debug!("irq enabled: {}", self.irq_enabled);
    }
    /// Enables non-maskable interrupts.
    #[inline]
    pub fn nmi_enable_write(&mut self) {
        self.nmi_enabled = true;
    }
    /// Disables non-maskable interrupts.
    #[inline]
    pub fn nmi_disable_write(&mut self) {
        self.nmi_enabled = false;
    }
    /// Handles a CPU read of the NMI enable port.
    ///
    /// The hardware toggles the latch on reads as well as on writes. Returns the byte read by
    /// the CPU together with the new state of the NMI enable latch.
    #[inline]
    pub fn nmi_enable_read(&mut self) -> (u8, bool) {
        self.nmi_enable_write();
        (NMI_PORT_DATA, self.nmi_enabled)
    }
    /// Handles a CPU read of the NMI disable port.
    ///
    /// Returns the byte read by the CPU together with the new state of the NMI enable latch.
    #[inline]
    pub fn nmi_disable_read(&mut self) -> (u8, bool) {
        self.nmi_disable_write();
        (NMI_PORT_DATA, self.nmi_enabled)
    }
    /// Resets the sequencer to its power on state.
    pub fn reset(&mut self) {
        *self = InterruptSequencer::default();
    }

    #[inline]
    fn irq_request(&self) -> InterruptRequest {
        if self.irq_enabled {
            InterruptRequest::Irq(IRQ_VECTOR)
        }
        else {
            InterruptRequest::None
        }
    }
}
