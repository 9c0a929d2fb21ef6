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

//! GIF packet parsing
//!
//! Data reaches the GS as 128-bit quad-words on three lanes (PATH1-3). Each
//! packet starts with a GIF tag:
//!
//! ```text
//! bits   0-14   NLOOP   loop count
//! bit    15     EOP     last packet of the transfer
//! bit    46     PRE     write the PRIM field to PRIM first
//! bits  47-57   PRIM
//! bits  58-59   FLG     0 PACKED, 1 REGLIST, 2 IMAGE (3 behaves as IMAGE)
//! bits  60-63   NREG    descriptors per loop (0 means 16)
//! bits 64-127   REGS    4-bit register descriptors
//! ```
//!
//! A lane remembers how far it got through its current tag, so a packet
//! may be split across any number of [`GS::transfer`] calls.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use super::registers::{self, bits};
use super::GS;

/// One of the three GIF input lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GifPathId {
    Path1,
    Path2,
    Path3,
}

impl GifPathId {
    pub fn index(self) -> usize {
        match self {
            GifPathId::Path1 => 0,
            GifPathId::Path2 => 1,
            GifPathId::Path3 => 2,
        }
    }
}

/// Data format of a GIF packet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum GifMode {
    #[default]
    Packed,
    RegList,
    Image,
}

impl GifMode {
    pub fn from_bits(flg: u8) -> Self {
        match flg & 3 {
            0 => GifMode::Packed,
            1 => GifMode::RegList,
            _ => GifMode::Image,
        }
    }
}

/// PACKED register descriptors
pub mod desc {
    pub const PRIM: u8 = 0x0;
    pub const RGBAQ: u8 = 0x1;
    pub const ST: u8 = 0x2;
    pub const UV: u8 = 0x3;
    pub const XYZF2: u8 = 0x4;
    pub const XYZ2: u8 = 0x5;
    pub const TEX0_1: u8 = 0x6;
    pub const TEX0_2: u8 = 0x7;
    pub const CLAMP_1: u8 = 0x8;
    pub const CLAMP_2: u8 = 0x9;
    pub const FOG: u8 = 0xA;
    pub const XYZF3: u8 = 0xC;
    pub const XYZ3: u8 = 0xD;
    pub const A_D: u8 = 0xE;
    pub const NOP: u8 = 0xF;
}

/// Decoded GIF tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct GifTag {
    pub nloop: u32,
    pub eop: bool,
    pub pre: bool,
    pub prim: u64,
    pub mode: GifMode,
    /// Descriptors per loop, 1-16
    pub nreg: u32,
    pub regs: u64,
}

impl GifTag {
    /// Decode a tag quad-word
    ///
    /// # Examples
    ///
    /// ```
    /// use gsrx::core::gs::gif::{GifMode, GifTag};
    ///
    /// let tag = GifTag::from_u128((1 << 15) | 3 | (1u128 << 58) | (0xEu128 << 64));
    /// assert_eq!(tag.nloop, 3);
    /// assert!(tag.eop);
    /// assert_eq!(tag.mode, GifMode::RegList);
    /// assert_eq!(tag.nreg, 16);
    /// assert_eq!(tag.register(0), 0xE);
    /// ```
    pub fn from_u128(qword: u128) -> Self {
        let lo = qword as u64;
        let nreg = bits(lo, 60, 4) as u32;
        Self {
            nloop: bits(lo, 0, 15) as u32,
            eop: bits(lo, 15, 1) != 0,
            pre: bits(lo, 46, 1) != 0,
            prim: bits(lo, 47, 11),
            mode: GifMode::from_bits(bits(lo, 58, 2) as u8),
            nreg: if nreg == 0 { 16 } else { nreg },
            regs: (qword >> 64) as u64,
        }
    }

    /// Descriptor number `index` of the register list
    pub fn register(&self, index: u32) -> u8 {
        ((self.regs >> (index * 4)) & 0xF) as u8
    }
}

/// Parsing state of one lane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct GifPath {
    /// Tag being processed, `None` while waiting for a tag
    pub tag: Option<GifTag>,
    /// Loops left in the current tag
    pub loops: u32,
    /// Next descriptor within the current loop
    pub reg_index: u32,
    /// Q latched by the last PACKED ST
    pub q: f32,
}

impl Default for GifPath {
    fn default() -> Self {
        Self {
            tag: None,
            loops: 0,
            reg_index: 0,
            q: 1.0,
        }
    }
}

impl GifPath {
    fn start(&mut self, tag: GifTag) {
        self.q = 1.0;
        self.loops = tag.nloop;
        self.reg_index = 0;
        self.tag = (tag.nloop > 0).then_some(tag);
    }

    /// Move to the next descriptor, ending the tag after the last loop
    fn step_register(&mut self, nreg: u32) {
        self.reg_index += 1;
        if self.reg_index >= nreg {
            self.reg_index = 0;
            self.step_loop();
        }
    }

    fn step_loop(&mut self) {
        self.loops = self.loops.saturating_sub(1);
        if self.loops == 0 {
            if self.tag.is_some_and(|tag| tag.eop) {
                log::trace!("GIF: end of packet");
            }
            self.tag = None;
        }
    }
}

impl GS {
    /// Feed quad-words into a GIF lane
    ///
    /// # Examples
    ///
    /// ```
    /// use gsrx::core::gs::{GifPathId, GS};
    ///
    /// let mut gs = GS::new();
    /// // REGLIST tag with one NOP descriptor, then its payload
    /// let tag = 1 | (1u128 << 15) | (1u128 << 58) | (1u128 << 60) | (0xFu128 << 64);
    /// gs.transfer(GifPathId::Path3, &[tag, 0]);
    /// assert!(gs.gif_path(GifPathId::Path3).tag.is_none());
    /// ```
    pub fn transfer(&mut self, path: GifPathId, data: &[u128]) {
        let lane = path.index();
        let mut state = self.paths[lane];

        for &qword in data {
            let Some(tag) = state.tag else {
                let tag = GifTag::from_u128(qword);
                log::debug!(
                    "GIF {:?} tag: {:?} nloop {} nreg {} eop {} pre {}",
                    path,
                    tag.mode,
                    tag.nloop,
                    tag.nreg,
                    tag.eop,
                    tag.pre
                );
                state.start(tag);
                if tag.pre && tag.mode == GifMode::Packed {
                    self.write_register(registers::PRIM, tag.prim);
                }
                continue;
            };

            match tag.mode {
                GifMode::Packed => {
                    let reg = tag.register(state.reg_index);
                    self.write_packed(reg, qword, &mut state.q);
                    state.step_register(tag.nreg);
                }
                GifMode::RegList => {
                    for half in [qword as u64, (qword >> 64) as u64] {
                        if state.tag.is_none() {
                            break;
                        }
                        let reg = tag.register(state.reg_index);
                        // A+D has no meaning without the PACKED address field
                        if reg != desc::NOP && reg != desc::A_D {
                            self.write_register(reg, half);
                        }
                        state.step_register(tag.nreg);
                    }
                }
                GifMode::Image => {
                    if self.env.trxdir != 0 {
                        log::warn!("GIF IMAGE data with TRXDIR = {}", self.env.trxdir);
                    }
                    self.write_image_data(&qword.to_le_bytes());
                    state.step_loop();
                }
            }
        }

        self.paths[lane] = state;
    }

    /// Parsing state of a lane
    pub fn gif_path(&self, path: GifPathId) -> &GifPath {
        &self.paths[path.index()]
    }

    /// Decode one PACKED quad-word
    fn write_packed(&mut self, reg: u8, qword: u128, q: &mut f32) {
        let lo = qword as u64;
        let hi = (qword >> 64) as u64;
        let adc = bits(hi, 47, 1) != 0;

        match reg {
            desc::PRIM => self.write_register(registers::PRIM, bits(lo, 0, 11)),
            desc::RGBAQ => {
                let rgba = bits(lo, 0, 8)
                    | bits(lo, 32, 8) << 8
                    | bits(hi, 0, 8) << 16
                    | bits(hi, 32, 8) << 24;
                let value = rgba | (q.to_bits() as u64) << 32;
                self.write_register(registers::RGBAQ, value);
            }
            desc::ST => {
                *q = f32::from_bits(hi as u32);
                self.write_register(registers::ST, lo);
            }
            desc::UV => {
                let value = bits(lo, 0, 14) | bits(lo, 32, 14) << 16;
                self.write_register(registers::UV, value);
            }
            desc::XYZF2 | desc::XYZF3 => {
                let value = bits(lo, 0, 16)
                    | bits(lo, 32, 16) << 16
                    | bits(hi, 4, 24) << 32
                    | bits(hi, 36, 8) << 56;
                let target = if reg == desc::XYZF3 || adc {
                    registers::XYZF3
                } else {
                    registers::XYZF2
                };
                self.write_register(target, value);
            }
            desc::XYZ2 | desc::XYZ3 => {
                let value = bits(lo, 0, 16) | bits(lo, 32, 16) << 16 | bits(hi, 0, 32) << 32;
                let target = if reg == desc::XYZ3 || adc {
                    registers::XYZ3
                } else {
                    registers::XYZ2
                };
                self.write_register(target, value);
            }
            desc::TEX0_1 => self.write_register(registers::TEX0_1, lo),
            desc::TEX0_2 => self.write_register(registers::TEX0_2, lo),
            desc::CLAMP_1 => self.write_register(registers::CLAMP_1, lo),
            desc::CLAMP_2 => self.write_register(registers::CLAMP_2, lo),
            desc::FOG => self.write_register(registers::FOG, bits(hi, 36, 8) << 56),
            desc::A_D => self.write_register(bits(hi, 0, 8) as u8, lo),
            _ => log::trace!("GIF: PACKED descriptor 0x{:X} ignored", reg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_nreg_zero_means_sixteen() {
        let tag = GifTag::from_u128(1);
        assert_eq!(tag.nreg, 16);
        assert_eq!(tag.mode, GifMode::Packed);
    }

    #[test]
    fn test_flg_three_is_image() {
        assert_eq!(GifMode::from_bits(3), GifMode::Image);
    }

    #[test]
    fn test_empty_tag_carries_no_data() {
        let mut path = GifPath::default();
        path.start(GifTag::from_u128(1 << 15));
        assert!(path.tag.is_none());
    }

    #[test]
    fn test_new_tag_resets_q() {
        let mut path = GifPath {
            q: 0.25,
            ..Default::default()
        };
        path.start(GifTag::from_u128(2));
        assert_eq!(path.q, 1.0);
        assert_eq!(path.loops, 2);
    }
}
