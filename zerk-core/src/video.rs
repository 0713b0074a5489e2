/*
    Copyright (C) 2024  ZERK developers

    This file is part of ZERK, a Rust library for emulating Berzerk-style arcade boards.

    For the full copyright notice, see the lib.rs file.
*/
//! # Video API
mod frame_store;
pub mod pixel;

pub use frame_store::*;
pub use pixel::{Palette, PixelBuffer};

/// The number of bytes in a single line of the pixel plane.
pub const PIXEL_LINE_BYTES: usize = 32;
/// The number of lines in the pixel plane, including the ones hidden in the vertical blank.
pub const PLANE_LINES: usize = 256;
/// The first pixel plane line visible on screen.
pub const VISIBLE_TOP: usize = 32;
/// The width of the visible screen in pixels.
pub const SCREEN_WIDTH: usize = PIXEL_LINE_BYTES * 8;
/// The height of the visible screen in pixels.
pub const SCREEN_HEIGHT: usize = PLANE_LINES - VISIBLE_TOP;
/// The number of color indices in the framebuffer.
pub const FRAMEBUFFER_SIZE: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

/// An interface for rendering the board's video output into host frame buffers.
pub trait Video {
    /// Renders the current content of the framebuffer into the provided pixel `buffer`.
    ///
    /// * `pitch` is the number of bytes in a single row of pixel data, including padding between lines.
    /// * [PixelBuffer] implementation is used to write pixels into the `buffer`.
    /// * [Palette] implementation is used to create colors from the RGBI color indices.
    ///
    /// Rendering does not change the emulated state and may be repeated.
    fn render_video_frame<'a, B: PixelBuffer<'a>, P: Palette<Pixel=B::Pixel>>(
        &self,
        buffer: &'a mut [u8],
        pitch: usize
    );
    /// Returns the rendered screen size in pixels (horizontal, vertical).
    fn render_size_pixels() -> (u32, u32) {
        (SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32)
    }
}

/// Returns the color plane address of the color byte governing the pixel plane byte at `pixel_addr`.
///
/// A single color byte covers a group of 8 pixels across 4 consecutive lines.
#[inline]
pub fn color_addr_of(pixel_addr: u16) -> u16 {
    ((pixel_addr & 0xFF80) >> 2) | (pixel_addr & 0x1F)
}

/// Returns the address of the first pixel plane byte covered by the color byte at `color_addr`.
///
/// The remaining 3 bytes follow at every [PIXEL_LINE_BYTES].
#[inline]
pub fn pixel_addr_of(color_addr: u16) -> u16 {
    ((color_addr & 0x07E0) << 2) | (color_addr & 0x1F)
}

/// Returns the pixel plane address of the byte covering the pixel at `x` on the plane `line`.
#[inline]
pub fn pixel_line_offset(x: u8, line: u8) -> u16 {
    (line as u16) << 5 | (x as u16) >> 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_offsets_works() {
        assert_eq!(color_addr_of(0x0000), 0x000);
        assert_eq!(color_addr_of(0x001F), 0x01F);
        assert_eq!(color_addr_of(0x0020), 0x000);
        assert_eq!(color_addr_of(0x0060), 0x000);
        assert_eq!(color_addr_of(0x0080), 0x020);
        assert_eq!(color_addr_of(0x1FFF), 0x7FF);
        for addr in 0..0x2000u16 {
            assert_eq!(color_addr_of(addr), ((addr & 0xFF80) >> 2) | (addr & 0x1F));
            let base = pixel_addr_of(color_addr_of(addr));
            assert!(addr >= base && addr < base + 4 * PIXEL_LINE_BYTES as u16);
            assert_eq!((addr - base) % PIXEL_LINE_BYTES as u16, 0);
        }
        for color_addr in 0..0x800u16 {
            for row in 0..4 {
                let addr = pixel_addr_of(color_addr) + row * PIXEL_LINE_BYTES as u16;
                assert_eq!(color_addr_of(addr), color_addr);
            }
        }
        assert_eq!(pixel_line_offset(0, 0), 0);
        assert_eq!(pixel_line_offset(255, 255), 0x1FFF);
        assert_eq!(pixel_line_offset(17, 32), 0x0402);
    }

    #[test]
    fn render_size_works() {
        assert_eq!(FrameStore::render_size_pixels(), (256, 224));
        assert_eq!(FRAMEBUFFER_SIZE, 256 * 224);
    }
}
