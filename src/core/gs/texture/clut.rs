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

//! CLUT buffer
//!
//! The GS copies palette data from local memory into an internal buffer when
//! TEX0 or TEX2 is written, according to TEX0.CLD. Indexed textures look up
//! this buffer, not local memory, so a palette change in memory is only seen
//! after the next load.
//!
//! Two storage modes are supported:
//!
//! - **CSM1**: the palette is a small swizzled image at CBP (16x16 for 8-bit
//!   indices with bits 3 and 4 of the index swapped, 8x2 for 4-bit indices)
//! - **CSM2**: the palette is a single row at (COU * 16, COV) of a buffer of
//!   width CBW

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::core::error::{GsError, Result};
use crate::core::gs::context::DrawingEnv;
use crate::core::gs::format::PixelFormat;
use crate::core::gs::pixel::expand_alpha_16;
use crate::core::gs::registers::{Tex0, TexClut, Texa};
use crate::core::gs::vram::Vram;

/// Internal palette memory
///
/// Entries hold the raw CLUT pixel (32-bit color or a 16-bit value in the
/// low half); conversion to RGBA8 happens on lookup so TEXA applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ClutBuffer {
    entries: Vec<u32>,
}

impl ClutBuffer {
    /// Buffer capacity in entries
    pub const ENTRIES: usize = 512;

    pub fn new() -> Self {
        Self {
            entries: vec![0; Self::ENTRIES],
        }
    }

    /// Rebuild from snapshot data
    pub fn from_entries(entries: Vec<u32>) -> Result<Self> {
        if entries.len() != Self::ENTRIES {
            return Err(GsError::SnapshotClutSize {
                expected: Self::ENTRIES,
                got: entries.len(),
            }
            .into());
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[u32] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.fill(0);
    }

    /// First buffer entry used by a texture
    ///
    /// 4-bit palettes are placed at CSA * 16; 8-bit palettes start at 0.
    fn offset(tex0: &Tex0) -> usize {
        if tex0.format().is_4bit() {
            tex0.csa as usize * 16
        } else {
            0
        }
    }

    /// Copy a palette from local memory into the buffer
    pub fn load(&mut self, vram: &Vram, tex0: &Tex0, texclut: &TexClut) {
        let format = tex0.clut_format();
        let count: u32 = if tex0.format().is_4bit() { 16 } else { 256 };
        let offset = Self::offset(tex0);

        log::debug!(
            "CLUT load: cbp=0x{:04X} cpsm={:?} csm={} entries={} offset={}",
            tex0.cbp,
            format,
            tex0.csm as u8 + 1,
            count,
            offset
        );

        for i in 0..count {
            let (x, y, bw) = if tex0.csm {
                (texclut.cou * 16 + i, texclut.cov, texclut.cbw)
            } else if count == 16 {
                (i & 7, i >> 3, 1)
            } else {
                let p = csm1_position(i);
                (p & 15, p >> 4, 1)
            };
            let raw = vram.read_raw(format, x, y, tex0.cbp, bw);
            self.entries[(offset + i as usize) % Self::ENTRIES] = raw;
        }
    }

    /// Look up a texel index as RGBA8
    #[inline(always)]
    pub fn lookup(&self, tex0: &Tex0, index: u32, texa: &Texa) -> u32 {
        let raw = self.entries[(Self::offset(tex0) + index as usize) % Self::ENTRIES];
        match tex0.clut_format() {
            PixelFormat::Ct16 | PixelFormat::Ct16S => expand_alpha_16(raw as u16, texa),
            _ => raw,
        }
    }
}

impl Default for ClutBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Position of an 8-bit index inside a CSM1 palette image
///
/// Index bits 3 and 4 are swapped.
#[inline(always)]
pub fn csm1_position(index: u32) -> u32 {
    (index & 0xE7) | ((index & 0x08) << 1) | ((index & 0x10) >> 1)
}

/// Apply TEX0.CLD and report whether the palette must be reloaded
///
/// Modes 2-5 also latch CBP into CBP0 or CBP1.
pub fn clut_load_required(tex0: &Tex0, env: &mut DrawingEnv) -> bool {
    if !tex0.format().is_indexed() {
        return false;
    }

    match tex0.cld {
        0 => false,
        1 => true,
        2 => {
            env.cbp0 = tex0.cbp;
            true
        }
        3 => {
            env.cbp1 = tex0.cbp;
            true
        }
        4 => {
            if env.cbp0 == tex0.cbp {
                false
            } else {
                env.cbp0 = tex0.cbp;
                true
            }
        }
        5 => {
            if env.cbp1 == tex0.cbp {
                false
            } else {
                env.cbp1 = tex0.cbp;
                true
            }
        }
        _ => {
            log::warn!("Reserved CLD value {}", tex0.cld);
            false
        }
    }
}
