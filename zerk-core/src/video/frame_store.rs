/*
    Copyright (C) 2024  ZERK developers

    This file is part of ZERK, a Rust library for emulating Berzerk-style arcade boards.

    For the full copyright notice, see the lib.rs file.
*/
use core::fmt;

#[cfg(feature = "snapshot")]
use serde::{Serialize, Deserialize};

#[cfg(feature = "snapshot")]
use crate::memory::serde::{serialize_mem, deserialize_mem};
use crate::memory::{
    VideoRamArray, ColorRamArray,
    VIDEO_RAM_MASK, COLOR_RAM_MASK, VIDEO_RAM_SIZE, COLOR_RAM_SIZE
};
use super::{
    Palette, PixelBuffer, Video,
    color_addr_of, pixel_addr_of,
    FRAMEBUFFER_SIZE, PIXEL_LINE_BYTES, SCREEN_HEIGHT, SCREEN_WIDTH, VISIBLE_TOP
};

/// The type of the framebuffer: one RGBI color index per visible pixel.
pub type FrameBufferArray = [u8;FRAMEBUFFER_SIZE];

/// The video compositor.
///
/// Holds the 1bpp pixel plane, the nibble packed color plane and the framebuffer of RGBI color
/// indices derived from both planes. Every plane write immediately recomposites the affected
/// framebuffer pixels, so the framebuffer is always in sync with the planes.
///
/// Only the pixel and color planes are serialized. The framebuffer is regenerated when
/// a `FrameStore` is deserialized.
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "snapshot", serde(from = "FrameStorePlanes"))]
#[derive(Clone)]
pub struct FrameStore {
    #[cfg_attr(feature = "snapshot", serde(serialize_with = "serialize_mem"))]
    video_ram: Box<VideoRamArray>,
    #[cfg_attr(feature = "snapshot", serde(serialize_with = "serialize_mem"))]
    color_ram: Box<ColorRamArray>,
    #[cfg_attr(feature = "snapshot", serde(skip_serializing))]
    framebuffer: Box<FrameBufferArray>,
}

#[cfg(feature = "snapshot")]
#[derive(Deserialize)]
struct FrameStorePlanes {
    #[serde(deserialize_with = "deserialize_mem")]
    video_ram: Box<VideoRamArray>,
    #[serde(deserialize_with = "deserialize_mem")]
    color_ram: Box<ColorRamArray>,
}

/// Returns the 8 color indices of the pixels represented by `pixel_byte`, leftmost first.
///
/// Set bits take the high nibble of `color_byte` in the left half and the low nibble in
/// the right half. Clear bits are always color 0.
#[inline]
pub fn composite_pixels(pixel_byte: u8, color_byte: u8) -> [u8;8] {
    let mut pixels = [0u8;8];
    for (i, pixel) in pixels.iter_mut().enumerate() {
        if pixel_byte & (0x80 >> i) != 0 {
            *pixel = if i < 4 { color_byte >> 4 } else { color_byte & 0x0F };
        }
    }
    pixels
}

impl Default for FrameStore {
    fn default() -> Self {
        FrameStore {
            video_ram: Box::new([0;VIDEO_RAM_SIZE]),
            color_ram: Box::new([0;COLOR_RAM_SIZE]),
            framebuffer: Box::new([0;FRAMEBUFFER_SIZE])
        }
    }
}

impl fmt::Debug for FrameStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameStore")
            .field("video_ram", &self.video_ram.len())
            .field("color_ram", &self.color_ram.len())
            .field("framebuffer", &self.framebuffer.len())
            .finish()
    }
}

#[cfg(feature = "snapshot")]
impl From<FrameStorePlanes> for FrameStore {
    fn from(FrameStorePlanes { video_ram, color_ram }: FrameStorePlanes) -> Self {
        let mut frame_store = FrameStore {
            video_ram,
            color_ram,
            framebuffer: Box::new([0;FRAMEBUFFER_SIZE])
        };
        frame_store.full_refresh();
        frame_store
    }
}

impl FrameStore {
    /// Returns the pixel plane byte at `addr`.
    #[inline]
    pub fn pixel_byte(&self, addr: u16) -> u8 {
        self.video_ram[(addr & VIDEO_RAM_MASK) as usize]
    }
    /// Returns the color plane byte at `addr`.
    #[inline]
    pub fn color_byte(&self, addr: u16) -> u8 {
        self.color_ram[(addr & COLOR_RAM_MASK) as usize]
    }
    /// Stores `value` in the pixel plane at `addr` and recomposites the 8 pixels it covers.
    pub fn write_pixel_byte(&mut self, addr: u16, value: u8) {
        let addr = addr & VIDEO_RAM_MASK;
        self.video_ram[addr as usize] = value;
        self.recomposite(addr);
    }
    /// Stores `value` in the color plane at `addr` and recomposites the 4 pixel lines it governs.
    pub fn write_color_byte(&mut self, addr: u16, value: u8) {
        let addr = addr & COLOR_RAM_MASK;
        self.color_ram[addr as usize] = value;
        let base = pixel_addr_of(addr);
        for row in 0..4 {
            self.recomposite(base + row * PIXEL_LINE_BYTES as u16);
        }
    }
    /// Writes 8 color indices derived from `pixel_byte` and `color_byte` into the framebuffer,
    /// starting at the pixel (`x`, `y`).
    ///
    /// `x` is aligned down to a multiple of 8. Rows outside of the visible screen are ignored.
    pub fn composite_byte(&mut self, x: u8, y: u8, pixel_byte: u8, color_byte: u8) {
        let y = y as usize;
        if y >= SCREEN_HEIGHT {
            return
        }
        let offset = y * SCREEN_WIDTH + (x & !7) as usize;
        self.framebuffer[offset..offset + 8]
            .copy_from_slice(&composite_pixels(pixel_byte, color_byte));
    }
    /// Recomposites the whole framebuffer from the current content of both planes.
    ///
    /// Calling it again without any intervening writes renders the same framebuffer.
    pub fn full_refresh(&mut self) {
        for addr in (VISIBLE_TOP * PIXEL_LINE_BYTES) as u16..=VIDEO_RAM_MASK {
            self.recomposite(addr);
        }
    }
    /// Clears both planes and the framebuffer.
    pub fn reset(&mut self) {
        self.video_ram.iter_mut().for_each(|p| *p = 0);
        self.color_ram.iter_mut().for_each(|p| *p = 0);
        self.framebuffer.iter_mut().for_each(|p| *p = 0);
    }
    /// Returns a reference to the framebuffer: [SCREEN_HEIGHT] lines of [SCREEN_WIDTH] color indices.
    #[inline]
    pub fn framebuffer(&self) -> &[u8] {
        &self.framebuffer[..]
    }
    /// Returns the color index of the visible pixel at (`x`, `y`).
    ///
    /// # Panics
    /// Panics if `y` is not lower than [SCREEN_HEIGHT].
    #[inline]
    pub fn framebuffer_pixel(&self, x: u8, y: u8) -> u8 {
        self.framebuffer[y as usize * SCREEN_WIDTH + x as usize]
    }
    /// Returns a reference to the pixel plane.
    #[inline]
    pub fn video_ram(&self) -> &[u8] {
        &self.video_ram[..]
    }
    /// Returns a reference to the color plane.
    #[inline]
    pub fn color_ram(&self) -> &[u8] {
        &self.color_ram[..]
    }

    #[inline]
    fn recomposite(&mut self, addr: u16) {
        let line = (addr >> 5) as usize;
        if line < VISIBLE_TOP {
            return
        }
        let x = ((addr & 0x1F) << 3) as u8;
        let pixel_byte = self.video_ram[addr as usize];
        let color_byte = self.color_ram[color_addr_of(addr) as usize];
        self.composite_byte(x, (line - VISIBLE_TOP) as u8, pixel_byte, color_byte);
    }
}

impl Video for FrameStore {
    fn render_video_frame<'a, B: PixelBuffer<'a>, P: Palette<Pixel=B::Pixel>>(
            &self,
            buffer: &'a mut [u8],
            pitch: usize
        )
    {
        for (line, row) in buffer.chunks_mut(pitch)
                                 .zip(self.framebuffer.chunks(SCREEN_WIDTH))
        {
            let mut writer = B::from_line(line);
            for &index in row {
                writer.put_pixel(P::get_pixel(index));
            }
        }
    }
}
