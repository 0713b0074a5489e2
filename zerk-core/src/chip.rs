/*
    Copyright (C) 2024  ZERK developers

    This file is part of ZERK, a Rust library for emulating Berzerk-style arcade boards.

    For the full copyright notice, see the lib.rs file.
*/
//! Chipset emulation building blocks.
use core::time::Duration;

#[cfg(feature = "snapshot")]
use serde::{Serialize, Deserialize};

mod flags;
pub use flags::*;

/// The data bus vector supplied by the board together with a maskable interrupt request.
pub const IRQ_VECTOR: u8 = 0xFC;

/// An interrupt request the host should deliver to the emulated `CPU` after a raster tick.
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InterruptRequest {
    /// No interrupt is requested for this tick.
    None,
    /// A non-maskable interrupt.
    Nmi,
    /// A maskable interrupt with the vector placed on the data bus.
    Irq(u8)
}

impl Default for InterruptRequest {
    fn default() -> Self {
        InterruptRequest::None
    }
}

impl InterruptRequest {
    /// Returns `true` if this is [InterruptRequest::None].
    #[inline]
    pub fn is_none(self) -> bool {
        self == InterruptRequest::None
    }
    /// Returns `true` if this is a non-maskable interrupt request.
    #[inline]
    pub fn is_nmi(self) -> bool {
        self == InterruptRequest::Nmi
    }
    /// Returns `true` if this is a maskable interrupt request.
    #[inline]
    pub fn is_irq(self) -> bool {
        matches!(self, InterruptRequest::Irq(..))
    }
}

/// A helper trait for accessing timing parameters of well known board configurations.
pub trait BoardTiming {
    /// The number of CPU cycles (T-states) per second.
    const CPU_HZ: u32;
    /// The number of video frames per second.
    const FRAME_RATE_HZ: u32;
    /// How many times per frame the interrupt sequencer is clocked.
    const INTERRUPTS_PER_FRAME: u32;
    /// The number of CPU cycles (T-states) in a single video frame.
    const FRAME_TSTATES: u32 = Self::CPU_HZ / Self::FRAME_RATE_HZ;
    /// The number of CPU cycles (T-states) between two interrupt sequencer ticks.
    const TICK_TSTATES: u32 = Self::FRAME_TSTATES / Self::INTERRUPTS_PER_FRAME;
    /// Returns the duration of a single video frame in nanoseconds.
    #[inline]
    fn frame_duration_nanos() -> u32 {
        nanos_from_frame_tc_cpu_hz(Self::FRAME_TSTATES, Self::CPU_HZ) as u32
    }
    /// Returns the duration of a single video frame.
    #[inline]
    fn frame_duration() -> Duration {
        duration_from_frame_tc_cpu_hz(Self::FRAME_TSTATES, Self::CPU_HZ)
    }
}

/// Timing of the Berzerk board: Z80 clocked at 2.5 MHz, 60 frames per second and the
/// interrupt sequencer stepped 8 times per frame.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct BerzerkTiming;

impl BoardTiming for BerzerkTiming {
    const CPU_HZ: u32 = 2_500_000;
    const FRAME_RATE_HZ: u32 = 60;
    const INTERRUPTS_PER_FRAME: u32 = 8;
}

/// Returns a number of nanoseconds from the number of T-states in a single frame and a cpu clock rate.
pub const fn nanos_from_frame_tc_cpu_hz(frame_ts_count: u32, cpu_hz: u32) -> u64 {
    const NANOS_PER_SEC: u64 = 1_000_000_000;
    frame_ts_count as u64 * NANOS_PER_SEC / cpu_hz as u64
}

/// Returns a duration from the number of T-states in a single frame and a cpu clock rate.
pub const fn duration_from_frame_tc_cpu_hz(frame_ts_count: u32, cpu_hz: u32) -> Duration {
    let nanos = nanos_from_frame_tc_cpu_hz(frame_ts_count, cpu_hz);
    Duration::from_nanos(nanos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn berzerk_timing_works() {
        assert_eq!(BerzerkTiming::FRAME_TSTATES, 41666);
        assert_eq!(BerzerkTiming::TICK_TSTATES, 5208);
        assert_eq!(BerzerkTiming::frame_duration_nanos(), 16_666_400);
        assert_eq!(BerzerkTiming::frame_duration(), Duration::from_nanos(16_666_400));
    }

    #[test]
    fn interrupt_request_works() {
        assert!(InterruptRequest::default().is_none());
        assert!(InterruptRequest::Nmi.is_nmi());
        assert!(!InterruptRequest::Nmi.is_irq());
        assert!(InterruptRequest::Irq(IRQ_VECTOR).is_irq());
        assert!(!InterruptRequest::Irq(IRQ_VECTOR).is_none());
    }
}
