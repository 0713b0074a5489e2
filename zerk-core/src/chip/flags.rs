/*
    Copyright (C) 2024  ZERK developers

    This file is part of ZERK, a Rust library for emulating Berzerk-style arcade boards.

    For the full copyright notice, see the lib.rs file.
*/
use bitflags::bitflags;

#[cfg(feature = "snapshot")]
use serde::{Serialize, Deserialize};

/// Creates `fn from_data(data: u8) -> Self` method for a [::bitflags] type.
///
/// The created function will avoid using `from_bits_truncate()` which can be pretty slow.
#[macro_export]
macro_rules! bitflags_from_data {
    ($bitflags:ty) => {
        impl $bitflags {
            /// Create flags from raw bits in `data` by truncating unused bits.
            #[inline]
            pub fn from_data(data: u8) -> Self {
                <$bitflags>::from_bits_retain(data) & <$bitflags>::all()
            }
        }
    };
}
pub use bitflags_from_data;

/// A macro for creating complex mask constants that won't get in the way of bitflags.
#[macro_export]
macro_rules! bitflags_masks {
    (@ pub const $mask:ident = $($flag:ident)|*;) => {
        pub const $mask: Self = Self::from_bits_retain($(Self::$flag.bits())|*);
    };
    (@#[doc = $doc:expr] pub const $mask:ident = $($flag:ident)|*;) => {
        #[doc = $doc] pub const $mask: Self = Self::from_bits_retain($(Self::$flag.bits())|*);
    };
    ($bitflags:ty {$($(#[doc = $doc:expr])? pub const $mask:ident = $($flag:ident)|*;)*}) => {
        impl $bitflags {$(
            bitflags_masks!(@$(#[doc = $doc])? pub const $mask = $($flag)|*;);
        )*}
    };
}
pub use bitflags_masks;

/// A macro for testing created flags, whether all bits up to `$nbits` are defined
/// and if all bitflags are a single bit-flags.
#[macro_export]
macro_rules! test_bitflags_all_bits_defined_no_masks {
    ($ty:ty, $nbits:expr) => {{
        type BITS = <$ty as bitflags::Flags>::Bits;
        let flags = <$ty as bitflags::Flags>::FLAGS;
        let mut last = 0;
        for f in flags.into_iter() {
            let bits = f.value().bits();
            assert!(bits == 0 || bits.is_power_of_two());
            assert!(bits >= last);
            last = bits;
        }
        let all: BITS = 1;
        let all = all.checked_shl($nbits - 1).expect("overflowed");
        let all = all | (all - 1);
        assert_eq!(<$ty>::all().bits(), all);
        for bit in 0..$nbits {
            assert_eq!(<$ty>::from_bits_truncate(1 << bit).bits(), 1 << bit);
        }
    }};
}
pub use test_bitflags_all_bits_defined_no_masks;

bitflags! {
    /// The magic RAM control register flags.
    ///
    /// I/O port `0x4B`, write only:
    ///
    /// | b7  | b6  | b5  | b4  | b3   | b2  | b1  | b0   |
    /// |-----|-----|-----|-----|------|-----|-----|------|
    /// | OP3 | OP2 | OP1 | OP0 | FLIP | SH2 | SH1 | DROP |
    ///
    /// Shift amount: `SH2 * 4 + SH1 * 2`, one of 0, 2, 4 or 6 bits.
    ///
    /// DROP: the 9-bit shifter output is shifted right once more.
    ///
    /// FLIP: the bit order of the shifter output is reversed.
    ///
    /// Logic operation: `OP3 * 8 + OP2 * 4 + OP1 * 2 + OP0`.
    #[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
    #[cfg_attr(feature = "snapshot", serde(from = "u8", into = "u8"))]
    #[derive(Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
    pub struct MagicControlFlags: u8 {
        const DROP_BIT = 0b0000_0001;
        const SHIFT1   = 0b0000_0010;
        const SHIFT2   = 0b0000_0100;
        const FLIP     = 0b0000_1000;
        const OP0      = 0b0001_0000;
        const OP1      = 0b0010_0000;
        const OP2      = 0b0100_0000;
        const OP3      = 0b1000_0000;
    }
}
bitflags_from_data!(MagicControlFlags);
bitflags_masks!(MagicControlFlags {
    pub const SHIFT_MASK = SHIFT2|SHIFT1;
    pub const OP_MASK = OP3|OP2|OP1|OP0;
});

bitflags! {
    /// The voice board control flags.
    ///
    /// Sound board offset 4, write only:
    ///
    /// | b7 | b6  | b5  | b4  | b3  | b2 | b1 | b0 |
    /// |----|-----|-----|-----|-----|----|----|----|
    /// |    | PAR | VO2 | VO1 | VO0 | F2 | F1 | F0 |
    ///
    /// With `PAR` reset, bits `b0-b5` select a voice sample to be spoken.
    ///
    /// With `PAR` set: pitch preset `F2 * 4 + F1 * 2 + F0`, volume `VO2 * 4 + VO1 * 2 + VO0`.
    #[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
    #[cfg_attr(feature = "snapshot", serde(from = "u8", into = "u8"))]
    #[derive(Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
    pub struct VoiceCtrlFlags: u8 {
        const FREQ0   = 0b0000_0001;
        const FREQ1   = 0b0000_0010;
        const FREQ2   = 0b0000_0100;
        const VOLUME0 = 0b0000_1000;
        const VOLUME1 = 0b0001_0000;
        const VOLUME2 = 0b0010_0000;
        const PARAMS  = 0b0100_0000;
        const UNUSED7 = 0b1000_0000;
    }
}
bitflags_from_data!(VoiceCtrlFlags);
bitflags_masks!(VoiceCtrlFlags {
    pub const FREQ_MASK = FREQ2|FREQ1|FREQ0;
    pub const VOLUME_MASK = VOLUME2|VOLUME1|VOLUME0;
    pub const VOICE_MASK = VOLUME_MASK|FREQ_MASK;
});

impl MagicControlFlags {
    /// Returns the shift amount: 0, 2, 4 or 6.
    #[inline]
    pub fn shift(self) -> u8 {
        (self & MagicControlFlags::SHIFT_MASK).bits()
    }
    /// Returns `true` if the shifter output is shifted right one more bit.
    #[inline]
    pub fn is_drop_bit(self) -> bool {
        self.intersects(MagicControlFlags::DROP_BIT)
    }
    /// Returns `true` if the shifter output bit order is reversed.
    #[inline]
    pub fn is_flip(self) -> bool {
        self.intersects(MagicControlFlags::FLIP)
    }
    /// Returns the logic operation code: [0, 15].
    #[inline]
    pub fn op_code(self) -> u8 {
        (self & MagicControlFlags::OP_MASK).bits() >> 4
    }
}

impl VoiceCtrlFlags {
    /// Returns `true` if the write carries voice parameters instead of a voice sample index.
    #[inline]
    pub fn is_params(self) -> bool {
        self.intersects(VoiceCtrlFlags::PARAMS)
    }
    /// Returns the voice sample index: [0, 63].
    #[inline]
    pub fn voice(self) -> u8 {
        (self & VoiceCtrlFlags::VOICE_MASK).bits()
    }
    /// Returns the pitch preset index: [0, 7].
    #[inline]
    pub fn pitch_preset(self) -> u8 {
        (self & VoiceCtrlFlags::FREQ_MASK).bits()
    }
    /// Returns the voice volume: [0, 7].
    #[inline]
    pub fn volume(self) -> u8 {
        (self & VoiceCtrlFlags::VOLUME_MASK).bits() >> 3
    }
}

impl From<u8> for MagicControlFlags {
    #[inline]
    fn from(data: u8) -> Self {
        MagicControlFlags::from_data(data)
    }
}

impl From<MagicControlFlags> for u8 {
    #[inline]
    fn from(flags: MagicControlFlags) -> u8 {
        flags.bits()
    }
}

impl From<u8> for VoiceCtrlFlags {
    #[inline]
    fn from(data: u8) -> Self {
        VoiceCtrlFlags::from_data(data)
    }
}

impl From<VoiceCtrlFlags> for u8 {
    #[inline]
    fn from(flags: VoiceCtrlFlags) -> u8 {
        flags.bits()
    }
}
