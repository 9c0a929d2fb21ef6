// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Format-aware pixel access
//!
//! Three views of a pixel are provided:
//!
//! - **raw**: exactly the bits stored for the format (16 bits for PSMCT16,
//!   the index for CLUT formats, 24 bits for PSMCT24)
//! - **color**: a 32-bit RGBA value; 16-bit formats are converted to and from
//!   RGBA5551 with the alpha bit mapped to 0x80
//! - **texel**: like color, but the missing alpha of 16-bit and 24-bit
//!   formats is synthesized from TEXA
//!
//! All accesses go through the swizzle functions in [`super::addressing`].

use super::addressing::{
    address_16, address_16s, address_16sz, address_16z, address_32, address_32z, address_4,
    address_8,
};
use super::format::{rgba16_to_32, rgba32_to_16, PixelFormat};
use super::registers::Texa;
use super::vram::Vram;

/// Bits of a 32-bit word owned by the high-index formats
const MASK_24: u32 = 0x00FF_FFFF;
const MASK_8H: u32 = 0xFF00_0000;
const MASK_4HL: u32 = 0x0F00_0000;
const MASK_4HH: u32 = 0xF000_0000;

impl Vram {
    /// Read the stored bits of a pixel
    ///
    /// # Arguments
    ///
    /// * `format` - Pixel storage mode
    /// * `x` - X coordinate in pixels
    /// * `y` - Y coordinate in pixels
    /// * `bp` - Base pointer in blocks
    /// * `bw` - Buffer width in 64-pixel units
    ///
    /// # Returns
    ///
    /// The pixel bits, zero-extended to 32 bits
    pub fn read_raw(&self, format: PixelFormat, x: u32, y: u32, bp: u32, bw: u32) -> u32 {
        match format {
            PixelFormat::Ct32 => self.read32(address_32(x, y, bp, bw)),
            PixelFormat::Ct24 => self.read32(address_32(x, y, bp, bw)) & MASK_24,
            PixelFormat::Ct16 => self.read16(address_16(x, y, bp, bw)) as u32,
            PixelFormat::Ct16S => self.read16(address_16s(x, y, bp, bw)) as u32,
            PixelFormat::T8 => self.read8(address_8(x, y, bp, bw)) as u32,
            PixelFormat::T4 => self.read4(address_4(x, y, bp, bw)) as u32,
            PixelFormat::T8H => self.read32(address_32(x, y, bp, bw)) >> 24,
            PixelFormat::T4HL => (self.read32(address_32(x, y, bp, bw)) >> 24) & 0xF,
            PixelFormat::T4HH => self.read32(address_32(x, y, bp, bw)) >> 28,
            PixelFormat::Z32 => self.read32(address_32z(x, y, bp, bw)),
            PixelFormat::Z24 => self.read32(address_32z(x, y, bp, bw)) & MASK_24,
            PixelFormat::Z16 => self.read16(address_16z(x, y, bp, bw)) as u32,
            PixelFormat::Z16S => self.read16(address_16sz(x, y, bp, bw)) as u32,
        }
    }

    /// Store the low bits of `value` as a pixel
    ///
    /// Bits of the containing word that belong to other pixels, or to the
    /// unused upper byte of 24-bit formats, are preserved.
    pub fn write_raw(&mut self, format: PixelFormat, x: u32, y: u32, bp: u32, bw: u32, value: u32) {
        match format {
            PixelFormat::Ct32 => self.write32(address_32(x, y, bp, bw), value),
            PixelFormat::Ct24 => self.write32_masked(address_32(x, y, bp, bw), value, MASK_24),
            PixelFormat::Ct16 => self.write16(address_16(x, y, bp, bw), value as u16),
            PixelFormat::Ct16S => self.write16(address_16s(x, y, bp, bw), value as u16),
            PixelFormat::T8 => self.write8(address_8(x, y, bp, bw), value as u8),
            PixelFormat::T4 => self.write4(address_4(x, y, bp, bw), value as u8),
            PixelFormat::T8H => {
                self.write32_masked(address_32(x, y, bp, bw), value << 24, MASK_8H)
            }
            PixelFormat::T4HL => {
                self.write32_masked(address_32(x, y, bp, bw), (value & 0xF) << 24, MASK_4HL)
            }
            PixelFormat::T4HH => {
                self.write32_masked(address_32(x, y, bp, bw), (value & 0xF) << 28, MASK_4HH)
            }
            PixelFormat::Z32 => self.write32(address_32z(x, y, bp, bw), value),
            PixelFormat::Z24 => self.write32_masked(address_32z(x, y, bp, bw), value, MASK_24),
            PixelFormat::Z16 => self.write16(address_16z(x, y, bp, bw), value as u16),
            PixelFormat::Z16S => self.write16(address_16sz(x, y, bp, bw), value as u16),
        }
    }

    /// Read a pixel as a 32-bit color
    ///
    /// 16-bit color formats are expanded from RGBA5551. Every other format
    /// returns its raw bits.
    ///
    /// # Examples
    ///
    /// ```
    /// use gsrx::core::gs::{PixelFormat, Vram};
    ///
    /// let mut vram = Vram::new();
    /// vram.write_pixel(PixelFormat::Ct16, 3, 4, 0, 1, 0x80FF_00FF);
    /// assert_eq!(vram.read_pixel(PixelFormat::Ct16, 3, 4, 0, 1), 0x80F8_00F8);
    /// ```
    pub fn read_pixel(&self, format: PixelFormat, x: u32, y: u32, bp: u32, bw: u32) -> u32 {
        let raw = self.read_raw(format, x, y, bp, bw);
        match format {
            PixelFormat::Ct16 | PixelFormat::Ct16S => rgba16_to_32(raw as u16),
            _ => raw,
        }
    }

    /// Write a 32-bit color as a pixel, converting to the storage format
    pub fn write_pixel(&mut self, format: PixelFormat, x: u32, y: u32, bp: u32, bw: u32, color: u32) {
        let raw = match format {
            PixelFormat::Ct16 | PixelFormat::Ct16S => rgba32_to_16(color) as u32,
            _ => color,
        };
        self.write_raw(format, x, y, bp, bw, raw);
    }

    /// Read a pixel as a texture source
    ///
    /// Direct color formats come back as RGBA8 with alpha synthesized from
    /// TEXA where the format has none. Indexed formats return the index.
    pub fn read_texel(
        &self,
        format: PixelFormat,
        x: u32,
        y: u32,
        bp: u32,
        bw: u32,
        texa: &Texa,
    ) -> u32 {
        let raw = self.read_raw(format, x, y, bp, bw);
        match format {
            PixelFormat::Ct24 | PixelFormat::Z24 => expand_alpha_24(raw, texa),
            PixelFormat::Ct16 | PixelFormat::Ct16S | PixelFormat::Z16 | PixelFormat::Z16S => {
                expand_alpha_16(raw as u16, texa)
            }
            _ => raw,
        }
    }
}

/// Expand an RGBA5551 texel to RGBA8 using TEXA
///
/// The alpha bit selects TA1 when set. When clear, TA0 is used, except that
/// with AEM enabled a black texel becomes fully transparent.
///
/// # Examples
///
/// ```
/// use gsrx::core::gs::pixel::expand_alpha_16;
/// use gsrx::core::gs::registers::Texa;
///
/// let texa = Texa { ta0: 0x20, aem: true, ta1: 0x90 };
/// assert_eq!(expand_alpha_16(0x8000, &texa) >> 24, 0x90);
/// assert_eq!(expand_alpha_16(0x001F, &texa) >> 24, 0x20);
/// assert_eq!(expand_alpha_16(0x0000, &texa) >> 24, 0x00);
/// ```
#[inline(always)]
pub fn expand_alpha_16(texel: u16, texa: &Texa) -> u32 {
    let rgb = rgba16_to_32(texel) & MASK_24;
    let alpha = if texel & 0x8000 != 0 {
        texa.ta1
    } else if texa.aem && rgb == 0 {
        0
    } else {
        texa.ta0
    };
    rgb | ((alpha as u32) << 24)
}

/// Give a 24-bit texel its TEXA alpha
#[inline(always)]
pub fn expand_alpha_24(texel: u32, texa: &Texa) -> u32 {
    let rgb = texel & MASK_24;
    let alpha = if texa.aem && rgb == 0 { 0 } else { texa.ta0 };
    rgb | ((alpha as u32) << 24)
}
