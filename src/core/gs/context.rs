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

//! Drawing state
//!
//! The GS keeps two banks of per-context registers (selected per primitive
//! by PRIM.CTXT) next to a set of registers shared by both contexts.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use super::registers::{
    Alpha, BitBltBuf, Clamp, Dimx, Frame, Prim, Rgbaq, Scissor, St, Test, Tex0, Tex1, TexClut,
    Texa, TrxPos, TrxReg, Uv, XyOffset, Zbuf,
};

/// One bank of context registers
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct DrawingContext {
    pub xyoffset: XyOffset,
    pub tex0: Tex0,
    pub tex1: Tex1,
    pub clamp: Clamp,
    /// MIPTBP1 raw value (mipmap levels 1-3)
    pub miptbp1: u64,
    /// MIPTBP2 raw value (mipmap levels 4-6)
    pub miptbp2: u64,
    pub scissor: Scissor,
    pub alpha: Alpha,
    pub test: Test,
    /// FBA: force the alpha MSB on every write
    pub fba: bool,
    pub frame: Frame,
    pub zbuf: Zbuf,
}

/// Full register state written through the A+D address space
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct DrawingEnv {
    pub prim: Prim,
    pub prmode: Prim,
    /// PRMODECONT.AC: attributes come from PRIM (true) or PRMODE (false)
    pub use_prim_attributes: bool,
    pub rgbaq: Rgbaq,
    pub st: St,
    pub uv: Uv,
    /// Latched fog coefficient from FOG or XYZF
    pub fog: u8,
    pub texclut: TexClut,
    pub scanmsk: u8,
    pub texa: Texa,
    /// FOGCOL packed as R, G, B bytes
    pub fogcol: u32,
    pub dimx: Dimx,
    pub dthe: bool,
    /// COLCLAMP: clamp (true) or wrap (false) colors
    pub colclamp: bool,
    pub pabe: bool,
    pub bitbltbuf: BitBltBuf,
    pub trxpos: TrxPos,
    pub trxreg: TrxReg,
    pub trxdir: u8,
    /// CLUT base pointers remembered by CLD modes 2-5
    pub cbp0: u32,
    pub cbp1: u32,
    pub contexts: [DrawingContext; 2],
}

impl DrawingEnv {
    /// State after a device reset
    ///
    /// Everything is zero except the power-on defaults: attributes from PRIM,
    /// color clamping on, and Q at 1.0.
    pub fn new() -> Self {
        Self {
            use_prim_attributes: true,
            colclamp: true,
            ..Default::default()
        }
    }

    /// Attribute bits in effect for the next primitive
    ///
    /// The primitive type always comes from PRIM.
    pub fn attributes(&self) -> Prim {
        if self.use_prim_attributes {
            self.prim
        } else {
            Prim {
                prim: self.prim.prim,
                ..self.prmode
            }
        }
    }

    /// Context bank selected by the current attributes
    pub fn active_context(&self) -> &DrawingContext {
        &self.contexts[self.attributes().context()]
    }
}
