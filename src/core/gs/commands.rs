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

//! Drawing register writes
//!
//! Decodes writes to the A+D address space into [`DrawingEnv`] and starts
//! the side effects some registers carry: vertex kicks, CLUT loads, image
//! transfers and host events.
//!
//! [`DrawingEnv`]: super::context::DrawingEnv

use super::privileged::GsInterrupt;
use super::registers::*;
use super::texture::clut::clut_load_required;
use super::GS;

impl GS {
    /// Write a drawing register
    ///
    /// Unknown addresses are logged and ignored.
    ///
    /// # Arguments
    ///
    /// * `reg` - Register address (0x00-0x62)
    /// * `value` - 64-bit register value
    ///
    /// # Examples
    ///
    /// ```
    /// use gsrx::core::gs::{registers, GS};
    ///
    /// let mut gs = GS::new();
    /// gs.write_register(registers::RGBAQ, 0x3F80_0000_FF00_00FF);
    /// assert_eq!(gs.env().rgbaq.rgba, 0xFF00_00FF);
    /// assert_eq!(gs.env().rgbaq.q, 1.0);
    /// ```
    pub fn write_register(&mut self, reg: u8, value: u64) {
        log::trace!("GS register 0x{:02X} <- 0x{:016X}", reg, value);

        match reg {
            PRIM => {
                self.env.prim = Prim::from_u64(value);
                self.queue.clear();
            }
            RGBAQ => self.env.rgbaq = Rgbaq::from_u64(value),
            ST => self.env.st = St::from_u64(value),
            UV => self.env.uv = Uv::from_u64(value),
            XYZF2 => self.vertex_kick(Xyz::from_xyzf(value), true),
            XYZ2 => self.vertex_kick(Xyz::from_xyz(value), true),
            XYZF3 => self.vertex_kick(Xyz::from_xyzf(value), false),
            XYZ3 => self.vertex_kick(Xyz::from_xyz(value), false),
            TEX0_1 | TEX0_2 => {
                let ctx = (reg - TEX0_1) as usize;
                self.write_tex0(ctx, Tex0::from_u64(value));
            }
            TEX2_1 | TEX2_2 => {
                let ctx = (reg - TEX2_1) as usize;
                let current = self.env.contexts[ctx].tex0.to_u64();
                let merged = (current & !Tex0::TEX2_MASK) | (value & Tex0::TEX2_MASK);
                self.write_tex0(ctx, Tex0::from_u64(merged));
            }
            CLAMP_1 | CLAMP_2 => {
                self.env.contexts[(reg - CLAMP_1) as usize].clamp = Clamp::from_u64(value)
            }
            FOG => self.env.fog = (value >> 56) as u8,
            TEX1_1 | TEX1_2 => {
                self.env.contexts[(reg - TEX1_1) as usize].tex1 = Tex1::from_u64(value)
            }
            XYOFFSET_1 | XYOFFSET_2 => {
                self.env.contexts[(reg - XYOFFSET_1) as usize].xyoffset = XyOffset::from_u64(value)
            }
            PRMODECONT => self.env.use_prim_attributes = value & 1 != 0,
            PRMODE => self.env.prmode = Prim::from_u64(value),
            TEXCLUT => self.env.texclut = TexClut::from_u64(value),
            SCANMSK => self.env.scanmsk = (value & 3) as u8,
            MIPTBP1_1 | MIPTBP1_2 => self.env.contexts[(reg - MIPTBP1_1) as usize].miptbp1 = value,
            MIPTBP2_1 | MIPTBP2_2 => self.env.contexts[(reg - MIPTBP2_1) as usize].miptbp2 = value,
            TEXA => self.env.texa = Texa::from_u64(value),
            FOGCOL => self.env.fogcol = (value & 0xFF_FFFF) as u32,
            TEXFLUSH => log::trace!("TEXFLUSH"),
            SCISSOR_1 | SCISSOR_2 => {
                self.env.contexts[(reg - SCISSOR_1) as usize].scissor = Scissor::from_u64(value)
            }
            ALPHA_1 | ALPHA_2 => {
                self.env.contexts[(reg - ALPHA_1) as usize].alpha = Alpha::from_u64(value)
            }
            DIMX => self.env.dimx = Dimx::from_u64(value),
            DTHE => self.env.dthe = value & 1 != 0,
            COLCLAMP => self.env.colclamp = value & 1 != 0,
            TEST_1 | TEST_2 => {
                self.env.contexts[(reg - TEST_1) as usize].test = Test::from_u64(value)
            }
            PABE => self.env.pabe = value & 1 != 0,
            FBA_1 | FBA_2 => self.env.contexts[(reg - FBA_1) as usize].fba = value & 1 != 0,
            FRAME_1 | FRAME_2 => {
                self.env.contexts[(reg - FRAME_1) as usize].frame = Frame::from_u64(value)
            }
            ZBUF_1 | ZBUF_2 => {
                self.env.contexts[(reg - ZBUF_1) as usize].zbuf = Zbuf::from_u64(value)
            }
            BITBLTBUF => self.env.bitbltbuf = BitBltBuf::from_u64(value),
            TRXPOS => self.env.trxpos = TrxPos::from_u64(value),
            TRXREG => self.env.trxreg = TrxReg::from_u64(value),
            TRXDIR => {
                self.env.trxdir = (value & 3) as u8;
                self.start_transfer(self.env.trxdir);
            }
            HWREG => self.write_image_data(&value.to_le_bytes()),
            SIGNAL => {
                let update = IdUpdate::from_u64(value);
                let current = self.privileged.siglblid();
                let id = update.apply(current as u32) as u64;
                self.privileged.set_siglblid((current & !0xFFFF_FFFF) | id);
                log::debug!("SIGNAL id 0x{:08X}", id);
                self.raise_interrupt(GsInterrupt::Signal);
            }
            FINISH => {
                log::debug!("FINISH");
                self.raise_interrupt(GsInterrupt::Finish);
            }
            LABEL => {
                let update = IdUpdate::from_u64(value);
                let current = self.privileged.siglblid();
                let label = update.apply((current >> 32) as u32) as u64;
                self.privileged.set_siglblid((current & 0xFFFF_FFFF) | (label << 32));
                log::debug!("LABEL id 0x{:08X}", label);
            }
            _ => log::warn!(
                "Unimplemented GS register 0x{:02X} (value 0x{:016X})",
                reg,
                value
            ),
        }
    }

    /// TEX0 / TEX2: store the descriptor and reload the CLUT if CLD asks for it
    fn write_tex0(&mut self, ctx: usize, tex0: Tex0) {
        self.env.contexts[ctx].tex0 = tex0;
        if clut_load_required(&tex0, &mut self.env) {
            log::trace!(
                "CLUT load from 0x{:04X} (cpsm {}, csm {}, csa {})",
                tex0.cbp,
                tex0.cpsm,
                tex0.csm as u8,
                tex0.csa
            );
            self.clut.load(&self.vram, &tex0, &self.env.texclut);
            self.texture_cache.invalidate_clut();
        }
    }
}
