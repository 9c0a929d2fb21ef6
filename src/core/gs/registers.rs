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

//! GS drawing register definitions
//!
//! Every general-purpose register is a 64-bit value written through the A+D
//! address space. This module holds the register addresses and one plain
//! struct per register with a `from_u64` decoder.
//!
//! # References
//!
//! - GS User's Manual, chapter 7 "Register details"

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use super::format::PixelFormat;

pub const PRIM: u8 = 0x00;
pub const RGBAQ: u8 = 0x01;
pub const ST: u8 = 0x02;
pub const UV: u8 = 0x03;
pub const XYZF2: u8 = 0x04;
pub const XYZ2: u8 = 0x05;
pub const TEX0_1: u8 = 0x06;
pub const TEX0_2: u8 = 0x07;
pub const CLAMP_1: u8 = 0x08;
pub const CLAMP_2: u8 = 0x09;
pub const FOG: u8 = 0x0A;
pub const XYZF3: u8 = 0x0C;
pub const XYZ3: u8 = 0x0D;
pub const TEX1_1: u8 = 0x14;
pub const TEX1_2: u8 = 0x15;
pub const TEX2_1: u8 = 0x16;
pub const TEX2_2: u8 = 0x17;
pub const XYOFFSET_1: u8 = 0x18;
pub const XYOFFSET_2: u8 = 0x19;
pub const PRMODECONT: u8 = 0x1A;
pub const PRMODE: u8 = 0x1B;
pub const TEXCLUT: u8 = 0x1C;
pub const SCANMSK: u8 = 0x22;
pub const MIPTBP1_1: u8 = 0x34;
pub const MIPTBP1_2: u8 = 0x35;
pub const MIPTBP2_1: u8 = 0x36;
pub const MIPTBP2_2: u8 = 0x37;
pub const TEXA: u8 = 0x3B;
pub const FOGCOL: u8 = 0x3D;
pub const TEXFLUSH: u8 = 0x3F;
pub const SCISSOR_1: u8 = 0x40;
pub const SCISSOR_2: u8 = 0x41;
pub const ALPHA_1: u8 = 0x42;
pub const ALPHA_2: u8 = 0x43;
pub const DIMX: u8 = 0x44;
pub const DTHE: u8 = 0x45;
pub const COLCLAMP: u8 = 0x46;
pub const TEST_1: u8 = 0x47;
pub const TEST_2: u8 = 0x48;
pub const PABE: u8 = 0x49;
pub const FBA_1: u8 = 0x4A;
pub const FBA_2: u8 = 0x4B;
pub const FRAME_1: u8 = 0x4C;
pub const FRAME_2: u8 = 0x4D;
pub const ZBUF_1: u8 = 0x4E;
pub const ZBUF_2: u8 = 0x4F;
pub const BITBLTBUF: u8 = 0x50;
pub const TRXPOS: u8 = 0x51;
pub const TRXREG: u8 = 0x52;
pub const TRXDIR: u8 = 0x53;
pub const HWREG: u8 = 0x54;
pub const SIGNAL: u8 = 0x60;
pub const FINISH: u8 = 0x61;
pub const LABEL: u8 = 0x62;

/// Extract `width` bits of `value` starting at `shift`
#[inline(always)]
pub(crate) fn bits(value: u64, shift: u32, width: u32) -> u64 {
    (value >> shift) & ((1u64 << width) - 1)
}

#[inline(always)]
fn bit(value: u64, shift: u32) -> bool {
    (value >> shift) & 1 != 0
}

/// Primitive kind selected by PRIM bits 0-2
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Point,
    Line,
    LineStrip,
    Triangle,
    TriangleStrip,
    TriangleFan,
    Sprite,
    /// Code 7, prohibited by the hardware
    Prohibited,
}

impl PrimitiveKind {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 7 {
            0 => PrimitiveKind::Point,
            1 => PrimitiveKind::Line,
            2 => PrimitiveKind::LineStrip,
            3 => PrimitiveKind::Triangle,
            4 => PrimitiveKind::TriangleStrip,
            5 => PrimitiveKind::TriangleFan,
            6 => PrimitiveKind::Sprite,
            _ => PrimitiveKind::Prohibited,
        }
    }

    /// Number of vertices required before a draw is issued
    pub fn vertex_count(self) -> usize {
        match self {
            PrimitiveKind::Point => 1,
            PrimitiveKind::Line | PrimitiveKind::LineStrip | PrimitiveKind::Sprite => 2,
            PrimitiveKind::Triangle | PrimitiveKind::TriangleStrip | PrimitiveKind::TriangleFan => 3,
            PrimitiveKind::Prohibited => 0,
        }
    }
}

/// PRIM / PRMODE: primitive type and attributes
///
/// PRMODE shares the attribute bits (3-10) and ignores the type field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Prim {
    /// Primitive type (0-7)
    pub prim: u8,
    /// Gouraud shading
    pub iip: bool,
    /// Texture mapping
    pub tme: bool,
    /// Fogging
    pub fge: bool,
    /// Alpha blending
    pub abe: bool,
    /// Antialiasing (accepted, not emulated)
    pub aa1: bool,
    /// UV (true) or STQ (false) texture coordinates
    pub fst: bool,
    /// Drawing context selector
    pub ctxt: bool,
    /// Fragment value control (accepted, not emulated)
    pub fix: bool,
}

impl Prim {
    pub fn from_u64(value: u64) -> Self {
        Self {
            prim: bits(value, 0, 3) as u8,
            iip: bit(value, 3),
            tme: bit(value, 4),
            fge: bit(value, 5),
            abe: bit(value, 6),
            aa1: bit(value, 7),
            fst: bit(value, 8),
            ctxt: bit(value, 9),
            fix: bit(value, 10),
        }
    }

    pub fn to_u64(&self) -> u64 {
        (self.prim as u64 & 7)
            | (self.iip as u64) << 3
            | (self.tme as u64) << 4
            | (self.fge as u64) << 5
            | (self.abe as u64) << 6
            | (self.aa1 as u64) << 7
            | (self.fst as u64) << 8
            | (self.ctxt as u64) << 9
            | (self.fix as u64) << 10
    }

    pub fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::from_bits(self.prim)
    }

    /// Context index (0 or 1)
    pub fn context(&self) -> usize {
        self.ctxt as usize
    }
}

/// RGBAQ: vertex color and the Q used for STQ division
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Rgbaq {
    /// Packed color, R in bits 0-7 through A in bits 24-31
    pub rgba: u32,
    pub q: f32,
}

impl Default for Rgbaq {
    fn default() -> Self {
        Self { rgba: 0, q: 1.0 }
    }
}

impl Rgbaq {
    pub fn from_u64(value: u64) -> Self {
        Self {
            rgba: value as u32,
            q: f32::from_bits((value >> 32) as u32),
        }
    }
}

/// ST: perspective texture coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct St {
    pub s: f32,
    pub t: f32,
}

impl St {
    pub fn from_u64(value: u64) -> Self {
        Self {
            s: f32::from_bits(value as u32),
            t: f32::from_bits((value >> 32) as u32),
        }
    }
}

/// UV: texel coordinates in 12.4 fixed point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Uv {
    pub u: u16,
    pub v: u16,
}

impl Uv {
    pub fn from_u64(value: u64) -> Self {
        Self {
            u: bits(value, 0, 14) as u16,
            v: bits(value, 16, 14) as u16,
        }
    }
}

/// XYZ2 / XYZF2 / XYZ3 / XYZF3 payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Xyz {
    /// X in 12.4 fixed point, primitive coordinate space
    pub x: u16,
    /// Y in 12.4 fixed point, primitive coordinate space
    pub y: u16,
    pub z: u32,
    /// Fog coefficient, only present in the XYZF forms
    pub f: Option<u8>,
}

impl Xyz {
    /// Decode XYZ2 / XYZ3 (32-bit Z)
    pub fn from_xyz(value: u64) -> Self {
        Self {
            x: bits(value, 0, 16) as u16,
            y: bits(value, 16, 16) as u16,
            z: (value >> 32) as u32,
            f: None,
        }
    }

    /// Decode XYZF2 / XYZF3 (24-bit Z, 8-bit fog)
    pub fn from_xyzf(value: u64) -> Self {
        Self {
            x: bits(value, 0, 16) as u16,
            y: bits(value, 16, 16) as u16,
            z: bits(value, 32, 24) as u32,
            f: Some(bits(value, 56, 8) as u8),
        }
    }
}

/// TEX0: texture buffer and CLUT description
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Tex0 {
    /// Texture base pointer in blocks
    pub tbp0: u32,
    /// Texture buffer width in 64-pixel units
    pub tbw: u32,
    pub psm: u8,
    /// Log2 of the texture width
    pub tw: u8,
    /// Log2 of the texture height
    pub th: u8,
    /// Use texel alpha (true) or vertex alpha only (false)
    pub tcc: bool,
    /// Texture function (MODULATE, DECAL, HIGHLIGHT, HIGHLIGHT2)
    pub tfx: u8,
    /// CLUT base pointer in blocks
    pub cbp: u32,
    pub cpsm: u8,
    /// CLUT storage mode: false = CSM1 (swizzled), true = CSM2 (linear)
    pub csm: bool,
    /// CLUT entry offset in units of 16 entries
    pub csa: u8,
    /// CLUT buffer load control
    pub cld: u8,
}

impl Tex0 {
    /// Bits of TEX0 rewritten by TEX2 (PSM and CLUT fields)
    pub const TEX2_MASK: u64 = (0x3F << 20) | (0x7FF_FFFF << 37);

    pub fn from_u64(value: u64) -> Self {
        Self {
            tbp0: bits(value, 0, 14) as u32,
            tbw: bits(value, 14, 6) as u32,
            psm: bits(value, 20, 6) as u8,
            tw: bits(value, 26, 4) as u8,
            th: bits(value, 30, 4) as u8,
            tcc: bit(value, 34),
            tfx: bits(value, 35, 2) as u8,
            cbp: bits(value, 37, 14) as u32,
            cpsm: bits(value, 51, 4) as u8,
            csm: bit(value, 55),
            csa: bits(value, 56, 5) as u8,
            cld: bits(value, 61, 3) as u8,
        }
    }

    pub fn to_u64(&self) -> u64 {
        (self.tbp0 as u64 & 0x3FFF)
            | (self.tbw as u64 & 0x3F) << 14
            | (self.psm as u64 & 0x3F) << 20
            | (self.tw as u64 & 0xF) << 26
            | (self.th as u64 & 0xF) << 30
            | (self.tcc as u64) << 34
            | (self.tfx as u64 & 3) << 35
            | (self.cbp as u64 & 0x3FFF) << 37
            | (self.cpsm as u64 & 0xF) << 51
            | (self.csm as u64) << 55
            | (self.csa as u64 & 0x1F) << 56
            | (self.cld as u64 & 7) << 61
    }

    pub fn format(&self) -> PixelFormat {
        PixelFormat::from_psm(self.psm)
    }

    pub fn clut_format(&self) -> PixelFormat {
        PixelFormat::from_psm(self.cpsm)
    }

    pub fn width(&self) -> u32 {
        1 << self.tw.min(10)
    }

    pub fn height(&self) -> u32 {
        1 << self.th.min(10)
    }

    /// Texture sizes above 1024 are prohibited
    pub fn has_valid_size(&self) -> bool {
        self.tw <= 10 && self.th <= 10
    }
}

/// CLAMP: texture wrap modes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Clamp {
    /// Horizontal wrap mode
    pub wms: u8,
    /// Vertical wrap mode
    pub wmt: u8,
    pub minu: u32,
    pub maxu: u32,
    pub minv: u32,
    pub maxv: u32,
}

impl Clamp {
    pub const REPEAT: u8 = 0;
    pub const CLAMP: u8 = 1;
    pub const REGION_CLAMP: u8 = 2;
    pub const REGION_REPEAT: u8 = 3;

    pub fn from_u64(value: u64) -> Self {
        Self {
            wms: bits(value, 0, 2) as u8,
            wmt: bits(value, 2, 2) as u8,
            minu: bits(value, 4, 10) as u32,
            maxu: bits(value, 14, 10) as u32,
            minv: bits(value, 24, 10) as u32,
            maxv: bits(value, 34, 10) as u32,
        }
    }
}

/// TEX1: LOD and filtering parameters
///
/// Stored for completeness; sampling is always point sampled at LOD 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Tex1 {
    pub lcm: bool,
    pub mxl: u8,
    pub mmag: bool,
    pub mmin: u8,
    pub mtba: bool,
    pub l: u8,
    pub k: u16,
}

impl Tex1 {
    pub fn from_u64(value: u64) -> Self {
        Self {
            lcm: bit(value, 0),
            mxl: bits(value, 2, 3) as u8,
            mmag: bit(value, 5),
            mmin: bits(value, 6, 3) as u8,
            mtba: bit(value, 9),
            l: bits(value, 19, 2) as u8,
            k: bits(value, 32, 12) as u16,
        }
    }
}

/// XYOFFSET: primitive-to-window coordinate offset (12.4 fixed point)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct XyOffset {
    pub ofx: u16,
    pub ofy: u16,
}

impl XyOffset {
    pub fn from_u64(value: u64) -> Self {
        Self {
            ofx: bits(value, 0, 16) as u16,
            ofy: bits(value, 32, 16) as u16,
        }
    }
}

/// TEXCLUT: CSM2 CLUT position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub struct TexClut {
    /// Buffer width in 64-pixel units
    pub cbw: u32,
    /// U offset in units of 16 pixels
    pub cou: u32,
    /// V offset in pixels
    pub cov: u32,
}

impl TexClut {
    pub fn from_u64(value: u64) -> Self {
        Self {
            cbw: bits(value, 0, 6) as u32,
            cou: bits(value, 6, 6) as u32,
            cov: bits(value, 12, 10) as u32,
        }
    }
}

/// TEXA: alpha expansion for 16-bit and 24-bit texels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub struct Texa {
    /// Alpha used when the texel alpha bit is 0 (and for 24-bit texels)
    pub ta0: u8,
    /// Black texels become transparent
    pub aem: bool,
    /// Alpha used when the texel alpha bit is 1
    pub ta1: u8,
}

impl Texa {
    pub fn from_u64(value: u64) -> Self {
        Self {
            ta0: bits(value, 0, 8) as u8,
            aem: bit(value, 15),
            ta1: bits(value, 32, 8) as u8,
        }
    }
}

/// SCISSOR: inclusive drawing rectangle in window coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Scissor {
    pub x0: u32,
    pub x1: u32,
    pub y0: u32,
    pub y1: u32,
}

impl Scissor {
    pub fn from_u64(value: u64) -> Self {
        Self {
            x0: bits(value, 0, 11) as u32,
            x1: bits(value, 16, 11) as u32,
            y0: bits(value, 32, 11) as u32,
            y1: bits(value, 48, 11) as u32,
        }
    }

    #[inline(always)]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 as i32 && x <= self.x1 as i32 && y >= self.y0 as i32 && y <= self.y1 as i32
    }
}

/// ALPHA: blend equation term selectors
///
/// Output = ((A - B) * C >> 7) + D
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Alpha {
    /// 0 = Cs, 1 = Cd, 2 = 0
    pub a: u8,
    /// 0 = Cs, 1 = Cd, 2 = 0
    pub b: u8,
    /// 0 = As, 1 = Ad, 2 = FIX
    pub c: u8,
    /// 0 = Cs, 1 = Cd, 2 = 0
    pub d: u8,
    pub fix: u8,
}

impl Alpha {
    pub fn from_u64(value: u64) -> Self {
        Self {
            a: bits(value, 0, 2) as u8,
            b: bits(value, 2, 2) as u8,
            c: bits(value, 4, 2) as u8,
            d: bits(value, 6, 2) as u8,
            fix: bits(value, 32, 8) as u8,
        }
    }
}

/// DIMX: 4x4 signed dither matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Dimx {
    pub matrix: [[i8; 4]; 4],
}

impl Dimx {
    pub fn from_u64(value: u64) -> Self {
        let mut matrix = [[0i8; 4]; 4];
        for (row, entries) in matrix.iter_mut().enumerate() {
            for (col, entry) in entries.iter_mut().enumerate() {
                let raw = bits(value, (row * 16 + col * 4) as u32, 3) as i8;
                // 3-bit two's complement
                *entry = (raw << 5) >> 5;
            }
        }
        Self { matrix }
    }

    #[inline(always)]
    pub fn at(&self, x: i32, y: i32) -> i32 {
        self.matrix[(y & 3) as usize][(x & 3) as usize] as i32
    }
}

/// TEST: alpha, destination alpha and depth test configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Test {
    /// Alpha test enable
    pub ate: bool,
    /// Alpha test method
    pub atst: u8,
    /// Alpha reference value
    pub aref: u8,
    /// Processing when the alpha test fails
    pub afail: u8,
    /// Destination alpha test enable
    pub date: bool,
    /// Destination alpha bit required to pass
    pub datm: bool,
    /// Depth test enable
    pub zte: bool,
    /// Depth test method
    pub ztst: u8,
}

impl Test {
    pub const ATST_NEVER: u8 = 0;
    pub const ATST_ALWAYS: u8 = 1;
    pub const ATST_LESS: u8 = 2;
    pub const ATST_LEQUAL: u8 = 3;
    pub const ATST_EQUAL: u8 = 4;
    pub const ATST_GEQUAL: u8 = 5;
    pub const ATST_GREATER: u8 = 6;
    pub const ATST_NOTEQUAL: u8 = 7;

    pub const AFAIL_KEEP: u8 = 0;
    pub const AFAIL_FB_ONLY: u8 = 1;
    pub const AFAIL_ZB_ONLY: u8 = 2;
    pub const AFAIL_RGB_ONLY: u8 = 3;

    pub const ZTST_NEVER: u8 = 0;
    pub const ZTST_ALWAYS: u8 = 1;
    pub const ZTST_GEQUAL: u8 = 2;
    pub const ZTST_GREATER: u8 = 3;

    pub fn from_u64(value: u64) -> Self {
        Self {
            ate: bit(value, 0),
            atst: bits(value, 1, 3) as u8,
            aref: bits(value, 4, 8) as u8,
            afail: bits(value, 12, 2) as u8,
            date: bit(value, 14),
            datm: bit(value, 15),
            zte: bit(value, 16),
            ztst: bits(value, 17, 2) as u8,
        }
    }
}

/// FRAME: color buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Frame {
    /// Base pointer in units of 2048 words
    pub fbp: u32,
    /// Buffer width in 64-pixel units
    pub fbw: u32,
    pub psm: u8,
    /// Bits set here are never written
    pub fbmsk: u32,
}

impl Frame {
    pub fn from_u64(value: u64) -> Self {
        Self {
            fbp: bits(value, 0, 9) as u32,
            fbw: bits(value, 16, 6) as u32,
            psm: bits(value, 24, 6) as u8,
            fbmsk: (value >> 32) as u32,
        }
    }

    /// Base pointer in blocks
    pub fn base(&self) -> u32 {
        self.fbp * 32
    }

    pub fn format(&self) -> PixelFormat {
        PixelFormat::from_psm(self.psm)
    }
}

/// ZBUF: depth buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Zbuf {
    /// Base pointer in units of 2048 words
    pub zbp: u32,
    /// Depth PSM, always in the 0x30 range
    pub psm: u8,
    /// Depth writes disabled
    pub zmsk: bool,
}

impl Zbuf {
    pub fn from_u64(value: u64) -> Self {
        Self {
            zbp: bits(value, 0, 9) as u32,
            psm: (bits(value, 24, 4) as u8) | 0x30,
            zmsk: bit(value, 32),
        }
    }

    /// Base pointer in blocks
    pub fn base(&self) -> u32 {
        self.zbp * 32
    }

    pub fn format(&self) -> PixelFormat {
        PixelFormat::from_psm(self.psm)
    }
}

/// BITBLTBUF: transfer source and destination buffers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct BitBltBuf {
    pub sbp: u32,
    pub sbw: u32,
    pub spsm: u8,
    pub dbp: u32,
    pub dbw: u32,
    pub dpsm: u8,
}

impl BitBltBuf {
    pub fn from_u64(value: u64) -> Self {
        Self {
            sbp: bits(value, 0, 14) as u32,
            sbw: bits(value, 16, 6) as u32,
            spsm: bits(value, 24, 6) as u8,
            dbp: bits(value, 32, 14) as u32,
            dbw: bits(value, 48, 6) as u32,
            dpsm: bits(value, 56, 6) as u8,
        }
    }
}

/// TRXPOS: transfer rectangle origins
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct TrxPos {
    pub ssax: u32,
    pub ssay: u32,
    pub dsax: u32,
    pub dsay: u32,
    /// Pixel transmission order for local-to-local moves
    pub dir: u8,
}

impl TrxPos {
    pub fn from_u64(value: u64) -> Self {
        Self {
            ssax: bits(value, 0, 11) as u32,
            ssay: bits(value, 16, 11) as u32,
            dsax: bits(value, 32, 11) as u32,
            dsay: bits(value, 48, 11) as u32,
            dir: bits(value, 59, 2) as u8,
        }
    }
}

/// TRXREG: transfer rectangle size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct TrxReg {
    pub rrw: u32,
    pub rrh: u32,
}

impl TrxReg {
    pub fn from_u64(value: u64) -> Self {
        Self {
            rrw: bits(value, 0, 12) as u32,
            rrh: bits(value, 32, 12) as u32,
        }
    }
}

/// SIGNAL / LABEL: masked ID update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdUpdate {
    pub id: u32,
    pub mask: u32,
}

impl IdUpdate {
    pub fn from_u64(value: u64) -> Self {
        Self {
            id: value as u32,
            mask: (value >> 32) as u32,
        }
    }

    /// Replace the bits of `current` selected by the mask
    pub fn apply(&self, current: u32) -> u32 {
        (current & !self.mask) | (self.id & self.mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tex0_fields() {
        let value = 0x1234
            | (4 << 14)
            | (0x13u64 << 20)
            | (3 << 26)
            | (5u64 << 30)
            | (1u64 << 34)
            | (2u64 << 35)
            | (0x200u64 << 37)
            | (1u64 << 55)
            | (7u64 << 56)
            | (4u64 << 61);
        let tex0 = Tex0::from_u64(value);
        assert_eq!(tex0.tbp0, 0x1234);
        assert_eq!(tex0.tbw, 4);
        assert_eq!(tex0.format(), PixelFormat::T8);
        assert_eq!((tex0.width(), tex0.height()), (8, 32));
        assert!(tex0.tcc);
        assert_eq!(tex0.tfx, 2);
        assert_eq!(tex0.cbp, 0x200);
        assert!(tex0.csm);
        assert_eq!(tex0.csa, 7);
        assert_eq!(tex0.cld, 4);
        assert_eq!(tex0.to_u64(), value);
    }

    #[test]
    fn test_dimx_sign_extension() {
        // Row 0: 4 (-4), 3, 7 (-1), 0
        let dimx = Dimx::from_u64(0x0734);
        assert_eq!(dimx.matrix[0], [-4, 3, -1, 0]);
        assert_eq!(dimx.at(4, 4), -4);
    }

    #[test]
    fn test_zbuf_psm_is_depth() {
        let zbuf = Zbuf::from_u64((1 << 24) | (1u64 << 32) | 5);
        assert_eq!(zbuf.format(), PixelFormat::Z24);
        assert_eq!(zbuf.base(), 160);
        assert!(zbuf.zmsk);
    }

    #[test]
    fn test_xyzf_layout() {
        let xyz = Xyz::from_xyzf(0xAB12_3456_0020_0010);
        assert_eq!((xyz.x, xyz.y), (0x10, 0x20));
        assert_eq!(xyz.z, 0x12_3456);
        assert_eq!(xyz.f, Some(0xAB));
    }
}
