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

//! Pixel storage modes
//!
//! Registers carry the raw 6-bit PSM code. Everything that touches memory
//! resolves it once into a [`PixelFormat`] and dispatches on the enum.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Pixel storage mode (PSM)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
pub enum PixelFormat {
    /// 32-bit RGBA
    #[default]
    Ct32,
    /// 24-bit RGB, upper byte of the word untouched
    Ct24,
    /// 16-bit RGBA5551
    Ct16,
    /// 16-bit RGBA5551, alternate block order
    Ct16S,
    /// 8-bit CLUT index
    T8,
    /// 4-bit CLUT index
    T4,
    /// 8-bit CLUT index stored in bits 24-31 of a 32-bit word
    T8H,
    /// 4-bit CLUT index stored in bits 24-27 of a 32-bit word
    T4HL,
    /// 4-bit CLUT index stored in bits 28-31 of a 32-bit word
    T4HH,
    /// 32-bit depth
    Z32,
    /// 24-bit depth
    Z24,
    /// 16-bit depth
    Z16,
    /// 16-bit depth, alternate block order
    Z16S,
}

impl PixelFormat {
    pub const PSMCT32: u8 = 0x00;
    pub const PSMCT24: u8 = 0x01;
    pub const PSMCT16: u8 = 0x02;
    pub const PSMCT16S: u8 = 0x0A;
    pub const PSMT8: u8 = 0x13;
    pub const PSMT4: u8 = 0x14;
    pub const PSMT8H: u8 = 0x1B;
    pub const PSMT4HL: u8 = 0x24;
    pub const PSMT4HH: u8 = 0x2C;
    pub const PSMZ32: u8 = 0x30;
    pub const PSMZ24: u8 = 0x31;
    pub const PSMZ16: u8 = 0x32;
    pub const PSMZ16S: u8 = 0x3A;

    /// Decode a PSM code
    ///
    /// Unknown codes fall back to PSMCT32, which is what the hardware
    /// addressing logic degrades to as well.
    ///
    /// # Examples
    ///
    /// ```
    /// use gsrx::core::gs::PixelFormat;
    ///
    /// assert_eq!(PixelFormat::from_psm(0x13), PixelFormat::T8);
    /// assert_eq!(PixelFormat::from_psm(0x3F), PixelFormat::Ct32);
    /// ```
    pub fn from_psm(psm: u8) -> Self {
        match Self::try_from_psm(psm) {
            Some(format) => format,
            None => {
                log::warn!("Unknown pixel storage mode 0x{:02X}, using PSMCT32", psm);
                PixelFormat::Ct32
            }
        }
    }

    /// Decode a PSM code without the PSMCT32 fallback
    pub fn try_from_psm(psm: u8) -> Option<Self> {
        Some(match psm {
            Self::PSMCT32 => PixelFormat::Ct32,
            Self::PSMCT24 => PixelFormat::Ct24,
            Self::PSMCT16 => PixelFormat::Ct16,
            Self::PSMCT16S => PixelFormat::Ct16S,
            Self::PSMT8 => PixelFormat::T8,
            Self::PSMT4 => PixelFormat::T4,
            Self::PSMT8H => PixelFormat::T8H,
            Self::PSMT4HL => PixelFormat::T4HL,
            Self::PSMT4HH => PixelFormat::T4HH,
            Self::PSMZ32 => PixelFormat::Z32,
            Self::PSMZ24 => PixelFormat::Z24,
            Self::PSMZ16 => PixelFormat::Z16,
            Self::PSMZ16S => PixelFormat::Z16S,
            _ => return None,
        })
    }

    /// Raw PSM code
    pub fn psm(self) -> u8 {
        match self {
            PixelFormat::Ct32 => Self::PSMCT32,
            PixelFormat::Ct24 => Self::PSMCT24,
            PixelFormat::Ct16 => Self::PSMCT16,
            PixelFormat::Ct16S => Self::PSMCT16S,
            PixelFormat::T8 => Self::PSMT8,
            PixelFormat::T4 => Self::PSMT4,
            PixelFormat::T8H => Self::PSMT8H,
            PixelFormat::T4HL => Self::PSMT4HL,
            PixelFormat::T4HH => Self::PSMT4HH,
            PixelFormat::Z32 => Self::PSMZ32,
            PixelFormat::Z24 => Self::PSMZ24,
            PixelFormat::Z16 => Self::PSMZ16,
            PixelFormat::Z16S => Self::PSMZ16S,
        }
    }

    /// Bits consumed per pixel in a host transfer stream
    pub fn transfer_bits(self) -> u32 {
        match self {
            PixelFormat::Ct32 | PixelFormat::Z32 => 32,
            PixelFormat::Ct24 | PixelFormat::Z24 => 24,
            PixelFormat::Ct16 | PixelFormat::Ct16S | PixelFormat::Z16 | PixelFormat::Z16S => 16,
            PixelFormat::T8 | PixelFormat::T8H => 8,
            PixelFormat::T4 | PixelFormat::T4HL | PixelFormat::T4HH => 4,
        }
    }

    /// True for the 16-bit color and depth formats
    pub fn is_16bit(self) -> bool {
        matches!(
            self,
            PixelFormat::Ct16 | PixelFormat::Ct16S | PixelFormat::Z16 | PixelFormat::Z16S
        )
    }

    /// True for the 24-bit color and depth formats
    pub fn is_24bit(self) -> bool {
        matches!(self, PixelFormat::Ct24 | PixelFormat::Z24)
    }

    /// True for formats holding CLUT indices
    pub fn is_indexed(self) -> bool {
        matches!(
            self,
            PixelFormat::T8
                | PixelFormat::T4
                | PixelFormat::T8H
                | PixelFormat::T4HL
                | PixelFormat::T4HH
        )
    }

    /// True for 4-bit indexed formats
    pub fn is_4bit(self) -> bool {
        matches!(self, PixelFormat::T4 | PixelFormat::T4HL | PixelFormat::T4HH)
    }

    /// True for the depth formats
    pub fn is_depth(self) -> bool {
        matches!(
            self,
            PixelFormat::Z32 | PixelFormat::Z24 | PixelFormat::Z16 | PixelFormat::Z16S
        )
    }

    /// Largest value a depth buffer of this format can hold
    pub fn depth_max(self) -> u32 {
        match self {
            PixelFormat::Z24 | PixelFormat::Ct24 => 0x00FF_FFFF,
            f if f.is_16bit() => 0xFFFF,
            _ => 0xFFFF_FFFF,
        }
    }
}

/// Convert a 32-bit RGBA color to RGBA5551
///
/// # Examples
///
/// ```
/// use gsrx::core::gs::format::rgba32_to_16;
///
/// assert_eq!(rgba32_to_16(0xFFFF_FFFF), 0xFFFF);
/// assert_eq!(rgba32_to_16(0x8000_00FF), 0x801F);
/// ```
#[inline(always)]
pub fn rgba32_to_16(color: u32) -> u16 {
    (((color >> 3) & 0x001F)
        | ((color >> 6) & 0x03E0)
        | ((color >> 9) & 0x7C00)
        | ((color >> 16) & 0x8000)) as u16
}

/// Expand RGBA5551 to 32-bit RGBA with the alpha bit mapped to 0x80
#[inline(always)]
pub fn rgba16_to_32(color: u16) -> u32 {
    let c = color as u32;
    ((c & 0x001F) << 3)
        | ((c & 0x03E0) << 6)
        | ((c & 0x7C00) << 9)
        | if c & 0x8000 != 0 { 0x8000_0000 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_psm_roundtrip() {
        for psm in 0u8..0x40 {
            if let Some(format) = PixelFormat::try_from_psm(psm) {
                assert_eq!(format.psm(), psm);
            }
        }
    }

    #[test]
    fn test_unknown_psm_falls_back_to_ct32() {
        assert_eq!(PixelFormat::from_psm(0x05), PixelFormat::Ct32);
        assert_eq!(PixelFormat::from_psm(0x3B), PixelFormat::Ct32);
    }

    #[test]
    fn test_16bit_conversion_quantizes() {
        let color = 0xC0F8_7C3F;
        let back = rgba16_to_32(rgba32_to_16(color));
        assert_eq!(back, color & 0x80F8_F8F8);
    }
}
