/*
    Copyright (C) 2024  ZERK developers

    This file is part of ZERK, a Rust library for emulating Berzerk-style arcade boards.

    For the full copyright notice, see the lib.rs file.
*/
//! Building blocks for rendering pixel surfaces.
use core::slice::IterMut;

/// A trait for providing a way for placing pixels into byte buffers.
pub trait PixelBuffer<'a> {
    /// Specifies the type used for pixels.
    type Pixel: Copy;
    /// Should return a new instance of `PixelBuffer` implementation from the mutable slice of bytes
    /// representing a single line of pixels of the target buffer.
    fn from_line(line_buffer: &'a mut [u8]) -> Self;
    /// Puts the next `pixel` into the line buffer and advances an internal cursor by a single pixel.
    ///
    /// Must not panic when the line buffer is exhausted, excess pixels are silently dropped.
    fn put_pixel(&mut self, pixel: Self::Pixel);
    /// Puts `count` copies of `pixel` into the line buffer and advances an internal cursor accordingly.
    ///
    /// Must not panic when the line buffer is exhausted, excess pixels are silently dropped.
    #[inline]
    fn put_pixels(&mut self, pixel: Self::Pixel, count: usize) {
        for _ in 0..count {
            self.put_pixel(pixel);
        }
    }
    /// Returns the size of a single pixel in bytes.
    #[inline]
    fn pixel_stride() -> usize {
        core::mem::size_of::<Self::Pixel>()
    }
}

/// A trait used for obtaining pixel colors.
pub trait Palette {
    /// Specifies the type used for pixels.
    type Pixel: Copy;
    /// Should return one of the 16 RGBI pixel colors:
    /// ```text
    /// index color         index color
    ///   0 - black           8 - black (intensity only)
    ///   1 - red             9 - bright red
    ///   2 - green          10 - bright green
    ///   3 - yellow         11 - bright yellow
    ///   4 - blue           12 - bright blue
    ///   5 - magenta        13 - bright magenta
    ///   6 - cyan           14 - bright cyan
    ///   7 - white          15 - bright white
    /// ```
    /// Only the lowest 4 bits of `index` are taken into account.
    fn get_pixel(index: u8) -> Self::Pixel;
    /// Should return a grayscale pixel (0 - black, 255 - full intensity white).
    fn get_pixel_gray8(value: u8) -> Self::Pixel;
}

/// A [PixelBuffer] tool for placing pixels into byte buffers using 3 `u8` element arrays of color channels
/// (3 bytes per pixel).
pub struct PixelBufA24<'a> {
    iter: IterMut<'a, [u8;3]>
}

/// A [PixelBuffer] tool for placing pixels into byte buffers using 4 `u8` element arrays of color channels
/// (4 bytes per pixel).
pub struct PixelBufA32<'a> {
    iter: IterMut<'a, [u8;4]>
}

/// A [PixelBuffer] tool for placing pixels into byte buffers using `u32` packed color channels.
pub struct PixelBufP32<'a> {
    iter: IterMut<'a, u32>
}

/// A [PixelBuffer] tool for placing pixels into byte buffers using `u16` packed color channels.
pub struct PixelBufP16<'a> {
    iter: IterMut<'a, u16>
}

/// A [PixelBuffer] tool for placing pixels into byte buffers using `u8` packed color channels.
pub struct PixelBufP8<'a> {
    iter: IterMut<'a, u8>
}

/// An RGBI color [Palette] to be used with [PixelBufA24].
pub struct RgbiPalRGB24;
/// An RGBI color [Palette] to be used with [PixelBufA32].
pub struct RgbiPalRGBA32;
/// An RGBI color [Palette] to be used with [PixelBufA32].
pub struct RgbiPalARGB32;
/// An RGBI color [Palette] to be used with [PixelBufP32].
pub struct RgbiPalA8R8G8B8;
/// An RGBI color [Palette] to be used with [PixelBufP32].
pub struct RgbiPalR8G8B8A8;
/// An RGBI color [Palette] to be used with [PixelBufP16].
pub struct RgbiPalR5G6B5;
/// An RGBI color [Palette] to be used with [PixelBufP8].
pub struct RgbiPalR3G3B2;

/// A grayscale RGBI [Palette] to be used with [PixelBufA24].
pub struct GrayscalePalRGB24;
/// A grayscale RGBI [Palette] to be used with [PixelBufA32].
pub struct GrayscalePalRGBA32;
/// A grayscale RGBI [Palette] to be used with [PixelBufA32].
pub struct GrayscalePalARGB32;
/// A grayscale RGBI [Palette] to be used with [PixelBufP32].
pub struct GrayscalePalA8R8G8B8;
/// A grayscale RGBI [Palette] to be used with [PixelBufP32].
pub struct GrayscalePalR8G8B8A8;
/// A grayscale RGBI [Palette] to be used with [PixelBufP16].
pub struct GrayscalePalR5G6B5;
/// A grayscale RGBI [Palette] to be used with [PixelBufP8].
pub struct GrayscalePalR3G3B2;

/// The channel level of a lit color without the intensity bit.
pub const LEVEL_NORMAL: u8 = 0xaa;
/// The channel level of a lit color with the intensity bit.
pub const LEVEL_BRIGHT: u8 = 0xff;

const RED: u8       = 0b0001;
const GREEN: u8     = 0b0010;
const BLUE: u8      = 0b0100;
const INTENSITY: u8 = 0b1000;

const ALPHA_MAX: u8 = u8::max_value();

const fn rgbi_level(index: u8, channel: u8) -> u8 {
    if index & channel == 0 {
        0
    }
    else if index & INTENSITY == 0 {
        LEVEL_NORMAL
    }
    else {
        LEVEL_BRIGHT
    }
}

const fn grayscale(r: u8, g: u8, b: u8) -> u8 {
    ((13933 * r as u32 + 46871 * g as u32 + 4732 * b as u32) >> 16) as u8
}

const GRAYSCALE: [u8;16] = {
    let mut gray = [0u8;16];
    let mut index = 0;
    while index < 16 {
        let i = index as u8;
        gray[index] = grayscale(rgbi_level(i, RED), rgbi_level(i, GREEN), rgbi_level(i, BLUE));
        index += 1;
    }
    gray
};

#[inline(always)]
const fn pack_rgb24(r: u8, g: u8, b: u8) -> [u8;3] {
    [r, g, b]
}

#[inline(always)]
const fn pack_rgba32(r: u8, g: u8, b: u8) -> [u8;4] {
    [r, g, b, ALPHA_MAX]
}

#[inline(always)]
const fn pack_argb32(r: u8, g: u8, b: u8) -> [u8;4] {
    [ALPHA_MAX, r, g, b]
}

#[inline(always)]
const fn pack_a8r8g8b8(r: u8, g: u8, b: u8) -> u32 {
    ((ALPHA_MAX as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

#[inline(always)]
const fn pack_r8g8b8a8(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (ALPHA_MAX as u32)
}

#[inline(always)]
const fn pack_565(r: u8, g: u8, b: u8) -> u16 {
    (((r as u16) >> 3) << 11) | (((g as u16) >> 2) << 5) | ((b as u16) >> 3)
}

#[inline(always)]
const fn pack_332(r: u8, g: u8, b: u8) -> u8 {
    ((r >> 5) << 5) | ((g >> 5) << 2) | (b >> 6)
}

macro_rules! impl_pixel_buffer {
    ($pixel_buf:ty, $pixel:ty) => {
        impl<'a> PixelBuffer<'a> for $pixel_buf {
            type Pixel = $pixel;

            fn from_line(line_buffer: &'a mut [u8]) -> Self {
                let (_, pixels, _) = unsafe { line_buffer.align_to_mut::<Self::Pixel>() };
                let iter = pixels.iter_mut();
                Self { iter }
            }

            #[inline]
            fn put_pixel(&mut self, pixel: Self::Pixel) {
                if let Some(dest) = self.iter.next() {
                    *dest = pixel;
                }
            }

            #[inline]
            fn put_pixels(&mut self, pixel: Self::Pixel, count: usize) {
                for dest in self.iter.by_ref().take(count) {
                    *dest = pixel;
                }
            }
        }
    };
}

impl_pixel_buffer!(PixelBufA24<'a>, [u8;3]);
impl_pixel_buffer!(PixelBufA32<'a>, [u8;4]);
impl_pixel_buffer!(PixelBufP32<'a>, u32);
impl_pixel_buffer!(PixelBufP16<'a>, u16);
impl_pixel_buffer!(PixelBufP8<'a>,  u8);

macro_rules! impl_palette {
    ($color:ident, $gray:ident, $pixel:ty, $pack:ident) => {
        impl $color {
            const COLORS: [$pixel;16] = {
                let mut colors = [$pack(0, 0, 0);16];
                let mut index = 0;
                while index < 16 {
                    let i = index as u8;
                    colors[index] = $pack(rgbi_level(i, RED), rgbi_level(i, GREEN), rgbi_level(i, BLUE));
                    index += 1;
                }
                colors
            };
        }

        impl Palette for $color {
            type Pixel = $pixel;

            #[inline(always)]
            fn get_pixel(index: u8) -> Self::Pixel {
                Self::COLORS[(index & 15) as usize]
            }
            #[inline(always)]
            fn get_pixel_gray8(value: u8) -> Self::Pixel {
                $pack(value, value, value)
            }
        }

        impl Palette for $gray {
            type Pixel = $pixel;

            #[inline(always)]
            fn get_pixel(index: u8) -> Self::Pixel {
                let v = GRAYSCALE[(index & 15) as usize];
                $pack(v, v, v)
            }
            #[inline(always)]
            fn get_pixel_gray8(value: u8) -> Self::Pixel {
                $pack(value, value, value)
            }
        }
    };
}

impl_palette!(RgbiPalRGB24,    GrayscalePalRGB24,    [u8;3], pack_rgb24);
impl_palette!(RgbiPalRGBA32,   GrayscalePalRGBA32,   [u8;4], pack_rgba32);
impl_palette!(RgbiPalARGB32,   GrayscalePalARGB32,   [u8;4], pack_argb32);
impl_palette!(RgbiPalA8R8G8B8, GrayscalePalA8R8G8B8, u32,    pack_a8r8g8b8);
impl_palette!(RgbiPalR8G8B8A8, GrayscalePalR8G8B8A8, u32,    pack_r8g8b8a8);
impl_palette!(RgbiPalR5G6B5,   GrayscalePalR5G6B5,   u16,    pack_565);
impl_palette!(RgbiPalR3G3B2,   GrayscalePalR3G3B2,   u8,     pack_332);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_palette_works() {
        const N: u8 = LEVEL_NORMAL;
        const B: u8 = LEVEL_BRIGHT;
        for i in (0..=255).step_by(16) {
            assert_eq!(RgbiPalRGB24::get_pixel(i + 0),  [0, 0, 0]);
            assert_eq!(RgbiPalRGB24::get_pixel(i + 1),  [N, 0, 0]);
            assert_eq!(RgbiPalRGB24::get_pixel(i + 2),  [0, N, 0]);
            assert_eq!(RgbiPalRGB24::get_pixel(i + 3),  [N, N, 0]);
            assert_eq!(RgbiPalRGB24::get_pixel(i + 4),  [0, 0, N]);
            assert_eq!(RgbiPalRGB24::get_pixel(i + 5),  [N, 0, N]);
            assert_eq!(RgbiPalRGB24::get_pixel(i + 6),  [0, N, N]);
            assert_eq!(RgbiPalRGB24::get_pixel(i + 7),  [N, N, N]);
            assert_eq!(RgbiPalRGB24::get_pixel(i + 8),  [0, 0, 0]);
            assert_eq!(RgbiPalRGB24::get_pixel(i + 9),  [B, 0, 0]);
            assert_eq!(RgbiPalRGB24::get_pixel(i + 10), [0, B, 0]);
            assert_eq!(RgbiPalRGB24::get_pixel(i + 11), [B, B, 0]);
            assert_eq!(RgbiPalRGB24::get_pixel(i + 12), [0, 0, B]);
            assert_eq!(RgbiPalRGB24::get_pixel(i + 13), [B, 0, B]);
            assert_eq!(RgbiPalRGB24::get_pixel(i + 14), [0, B, B]);
            assert_eq!(RgbiPalRGB24::get_pixel(i + 15), [B, B, B]);
        }
        assert_eq!(RgbiPalRGBA32::get_pixel(9), [255, 0, 0, 255]);
        assert_eq!(RgbiPalARGB32::get_pixel(9), [255, 255, 0, 0]);
        assert_eq!(RgbiPalA8R8G8B8::get_pixel(0), 0xff00_0000);
        assert_eq!(RgbiPalA8R8G8B8::get_pixel(10), 0xff00_ff00);
        assert_eq!(RgbiPalA8R8G8B8::get_pixel(4), 0xff00_00aa);
        assert_eq!(RgbiPalR8G8B8A8::get_pixel(12), 0x0000_ffff);
        assert_eq!(RgbiPalR8G8B8A8::get_pixel(15), 0xffff_ffff);
        assert_eq!(RgbiPalR5G6B5::get_pixel(15), 0xffff);
        assert_eq!(RgbiPalR5G6B5::get_pixel(9), 0b11111_000000_00000);
        assert_eq!(RgbiPalR3G3B2::get_pixel(15), 0xff);
        assert_eq!(RgbiPalR3G3B2::get_pixel(12), 0b000_000_11);
        assert_eq!(RgbiPalR3G3B2::get_pixel(0), 0);
    }

    #[test]
    fn pixel_palette_gray_works() {
        assert_eq!(GRAYSCALE[0], 0);
        assert_eq!(GRAYSCALE[8], 0);
        assert_eq!(GRAYSCALE[15], 255);
        assert!(GRAYSCALE[7] < GRAYSCALE[15]);
        assert!(GRAYSCALE[4] < GRAYSCALE[1] && GRAYSCALE[1] < GRAYSCALE[2]);
        for i in 0..16u8 {
            let v = GRAYSCALE[i as usize];
            assert_eq!(GrayscalePalRGB24::get_pixel(i), [v, v, v]);
            assert_eq!(GrayscalePalRGBA32::get_pixel(i | 0x70), [v, v, v, 255]);
            assert_eq!(GrayscalePalA8R8G8B8::get_pixel(i), u32::from_be_bytes([255, v, v, v]));
            assert_eq!(GrayscalePalR8G8B8A8::get_pixel(i), u32::from_be_bytes([v, v, v, 255]));
        }
        for i in 0..=255u8 {
            assert_eq!(RgbiPalRGB24::get_pixel_gray8(i), [i, i, i]);
            assert_eq!(GrayscalePalARGB32::get_pixel_gray8(i), [255, i, i, i]);
            assert_eq!(RgbiPalR5G6B5::get_pixel_gray8(i), pack_565(i, i, i));
            assert_eq!(GrayscalePalR3G3B2::get_pixel_gray8(i), pack_332(i, i, i));
        }
    }

    #[test]
    fn pixel_buffer_works() {
        let mut line = [0u8;4*3];
        let mut buf = PixelBufA24::from_line(&mut line);
        buf.put_pixel([1, 2, 3]);
        buf.put_pixels([7, 8, 9], 5);
        assert_eq!(line, [1, 2, 3, 7, 8, 9, 7, 8, 9, 7, 8, 9]);
        assert_eq!(PixelBufA24::pixel_stride(), 3);
        assert_eq!(PixelBufP16::pixel_stride(), 2);
        let mut line = [0u8;3];
        let mut buf = PixelBufP8::from_line(&mut line);
        for p in 1..=4 {
            buf.put_pixel(p);
        }
        assert_eq!(line, [1, 2, 3]);
    }
}
