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

//! Per-pixel test and blend pipeline
//!
//! Every fragment produced by the rasterizer passes through
//! [`PixelPipeline::draw_pixel`], which applies in order:
//!
//! 1. Scissor and scan mask rejection
//! 2. Destination alpha test
//! 3. Alpha test with its fail policy
//! 4. Depth test
//! 5. Fog
//! 6. Alpha blending
//! 7. Dithering (16-bit targets only)
//! 8. Color clamp or wrap
//! 9. FBA and the frame write mask
//!
//! The pipeline is resolved once per primitive from the drawing registers,
//! so the per-pixel path only branches on already decoded fields.
//!
//! # References
//!
//! - GS User's Manual, section 3.4 "Pixel test" and 3.5 "Alpha blending"

use super::context::DrawingEnv;
use super::format::{rgba32_to_16, PixelFormat};
use super::registers::{Alpha, Dimx, Prim, Scissor, Test};
use super::vram::Vram;

/// A single rasterized pixel on its way to memory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fragment {
    /// Window X coordinate
    pub x: i32,
    /// Window Y coordinate
    pub y: i32,
    pub z: u32,
    /// Fog coefficient (255 = no fog)
    pub fog: u8,
    /// RGBA color, R in bits 0-7
    pub color: u32,
}

/// Resolved drawing state for one primitive
#[derive(Debug, Clone, Copy)]
pub struct PixelPipeline {
    frame_format: PixelFormat,
    frame_base: u32,
    frame_width: u32,
    fbmsk: u32,
    depth_format: PixelFormat,
    depth_base: u32,
    zmsk: bool,
    scissor: Scissor,
    scanmsk: u8,
    test: Test,
    blend: Option<Alpha>,
    pabe: bool,
    fog: Option<u32>,
    dither: Option<Dimx>,
    colclamp: bool,
    fba: bool,
}

impl PixelPipeline {
    /// Resolve the pipeline for a primitive with the given attributes
    pub fn new(env: &DrawingEnv, attributes: &Prim) -> Self {
        let ctx = &env.contexts[attributes.context()];
        let frame_format = ctx.frame.format();
        let dither = if env.dthe && is_16bit_color(frame_format) {
            Some(env.dimx)
        } else {
            None
        };

        Self {
            frame_format,
            frame_base: ctx.frame.base(),
            frame_width: ctx.frame.fbw,
            fbmsk: ctx.frame.fbmsk,
            depth_format: ctx.zbuf.format(),
            depth_base: ctx.zbuf.base(),
            zmsk: ctx.zbuf.zmsk,
            scissor: ctx.scissor,
            scanmsk: env.scanmsk,
            test: ctx.test,
            blend: attributes.abe.then_some(ctx.alpha),
            pabe: env.pabe,
            fog: attributes.fge.then_some(env.fogcol),
            dither,
            colclamp: env.colclamp,
            fba: ctx.fba,
        }
    }

    /// Frame buffer base pointer in blocks
    pub fn frame_base(&self) -> u32 {
        self.frame_base
    }

    /// Depth buffer base pointer in blocks
    pub fn depth_base(&self) -> u32 {
        self.depth_base
    }

    /// True when the depth buffer can be written by this primitive
    pub fn writes_depth(&self) -> bool {
        self.test.zte && !self.zmsk
    }

    /// Run one fragment through the pipeline and write the result
    ///
    /// # Arguments
    ///
    /// * `vram` - Local memory holding the frame and depth buffers
    /// * `frag` - Fragment produced by the rasterizer
    pub fn draw_pixel(&self, vram: &mut Vram, frag: Fragment) {
        if !self.scissor.contains(frag.x, frag.y) {
            return;
        }
        match self.scanmsk {
            2 if frag.y & 1 == 0 => return,
            3 if frag.y & 1 == 1 => return,
            _ => {}
        }

        let x = frag.x as u32;
        let y = frag.y as u32;

        if self.test.date && !self.frame_format.is_24bit() {
            let raw = vram.read_raw(self.frame_format, x, y, self.frame_base, self.frame_width);
            let alpha_bit = if self.frame_format.is_16bit() {
                raw & 0x8000 != 0
            } else {
                raw & 0x8000_0000 != 0
            };
            if alpha_bit != self.test.datm {
                return;
            }
        }

        let mut write_color = true;
        let mut write_depth = true;
        let mut alpha_mask = 0;
        if self.test.ate && !alpha_test(self.test.atst, (frag.color >> 24) as u8, self.test.aref)
        {
            match self.test.afail {
                Test::AFAIL_KEEP => return,
                Test::AFAIL_FB_ONLY => write_depth = false,
                Test::AFAIL_ZB_ONLY => write_color = false,
                _ => {
                    write_depth = false;
                    alpha_mask = 0xFF00_0000;
                }
            }
        }

        let z = frag.z.min(self.depth_format.depth_max());
        if self.test.zte {
            let current = vram.read_raw(self.depth_format, x, y, self.depth_base, self.frame_width);
            let pass = match self.test.ztst {
                Test::ZTST_NEVER => false,
                Test::ZTST_ALWAYS => true,
                Test::ZTST_GEQUAL => z >= current,
                _ => z > current,
            };
            if !pass {
                return;
            }
        }

        if write_color {
            let color = self.shade(vram, frag, x, y);
            self.write_frame(vram, x, y, color, self.fbmsk | alpha_mask);
        }

        if write_depth && self.writes_depth() {
            vram.write_raw(self.depth_format, x, y, self.depth_base, self.frame_width, z);
        }
    }

    /// Fog, blend, dither, clamp and FBA
    fn shade(&self, vram: &Vram, frag: Fragment, x: u32, y: u32) -> u32 {
        let mut color = frag.color;
        if let Some(fogcol) = self.fog {
            color = apply_fog(color, frag.fog, fogcol);
        }

        let mut alpha = color >> 24;
        let mut rgb = [
            (color & 0xFF) as i32,
            ((color >> 8) & 0xFF) as i32,
            ((color >> 16) & 0xFF) as i32,
        ];

        if let Some(blend) = self.blend {
            if !self.pabe || alpha & 0x80 != 0 {
                let dest = self.read_destination(vram, x, y);
                rgb = blend_rgb(&blend, color, dest);
            }
        }

        if let Some(dimx) = self.dither {
            let offset = dimx.at(frag.x, frag.y);
            for channel in rgb.iter_mut() {
                *channel += offset;
            }
        }

        for channel in rgb.iter_mut() {
            *channel = if self.colclamp {
                (*channel).clamp(0, 255)
            } else {
                *channel & 0xFF
            };
        }

        if self.fba {
            alpha |= 0x80;
        }

        (rgb[0] as u32) | (rgb[1] as u32) << 8 | (rgb[2] as u32) << 16 | alpha << 24
    }

    /// Destination color as seen by the blender
    ///
    /// 24-bit targets have no stored alpha and report 0x80.
    fn read_destination(&self, vram: &Vram, x: u32, y: u32) -> u32 {
        let dest = vram.read_pixel(self.frame_format, x, y, self.frame_base, self.frame_width);
        if self.frame_format.is_24bit() {
            dest | 0x8000_0000
        } else {
            dest
        }
    }

    fn write_frame(&self, vram: &mut Vram, x: u32, y: u32, color: u32, mask: u32) {
        let (format, base, width) = (self.frame_format, self.frame_base, self.frame_width);
        if mask == 0 {
            vram.write_pixel(format, x, y, base, width, color);
            return;
        }

        let (new, mask) = if is_16bit_color(format) {
            (rgba32_to_16(color) as u32, rgba32_to_16(mask) as u32)
        } else {
            (color, mask)
        };
        let old = vram.read_raw(format, x, y, base, width);
        vram.write_raw(format, x, y, base, width, (new & !mask) | (old & mask));
    }
}

#[inline(always)]
fn is_16bit_color(format: PixelFormat) -> bool {
    matches!(format, PixelFormat::Ct16 | PixelFormat::Ct16S)
}

/// Evaluate the alpha test
///
/// # Examples
///
/// ```
/// use gsrx::core::gs::pipeline::alpha_test;
/// use gsrx::core::gs::registers::Test;
///
/// assert!(alpha_test(Test::ATST_GEQUAL, 0x80, 0x80));
/// assert!(!alpha_test(Test::ATST_LESS, 0x80, 0x80));
/// ```
#[inline(always)]
pub fn alpha_test(method: u8, alpha: u8, reference: u8) -> bool {
    match method & 7 {
        Test::ATST_NEVER => false,
        Test::ATST_ALWAYS => true,
        Test::ATST_LESS => alpha < reference,
        Test::ATST_LEQUAL => alpha <= reference,
        Test::ATST_EQUAL => alpha == reference,
        Test::ATST_GEQUAL => alpha >= reference,
        Test::ATST_GREATER => alpha > reference,
        _ => alpha != reference,
    }
}

/// Mix a color towards FOGCOL: `(F * C + (255 - F) * FOGCOL) >> 8`
///
/// Alpha is left untouched.
#[inline(always)]
pub fn apply_fog(color: u32, fog: u8, fogcol: u32) -> u32 {
    let f = fog as u32;
    let mut out = color & 0xFF00_0000;
    for shift in [0, 8, 16] {
        let c = (color >> shift) & 0xFF;
        let fc = (fogcol >> shift) & 0xFF;
        out |= (((f * c + (255 - f) * fc) >> 8) & 0xFF) << shift;
    }
    out
}

/// Apply `((A - B) * C >> 7) + D` to each RGB channel
///
/// The result is unclamped; clamping is a separate stage.
///
/// # Examples
///
/// ```
/// use gsrx::core::gs::pipeline::blend_rgb;
/// use gsrx::core::gs::registers::Alpha;
///
/// // Cs * As + Cd * (1 - As) with As = 0x40 (half)
/// let alpha = Alpha { a: 0, b: 1, c: 0, d: 1, fix: 0 };
/// let rgb = blend_rgb(&alpha, 0x4000_00FF, 0x0000_0000);
/// assert_eq!(rgb, [0x7F, 0, 0]);
/// ```
#[inline(always)]
pub fn blend_rgb(alpha: &Alpha, source: u32, dest: u32) -> [i32; 3] {
    let factor = match alpha.c {
        0 => (source >> 24) as i32,
        1 => (dest >> 24) as i32,
        _ => alpha.fix as i32,
    };

    let select = |sel: u8, shift: u32| -> i32 {
        match sel {
            0 => ((source >> shift) & 0xFF) as i32,
            1 => ((dest >> shift) & 0xFF) as i32,
            _ => 0,
        }
    };

    let mut out = [0i32; 3];
    for (i, shift) in [0u32, 8, 16].into_iter().enumerate() {
        let a = select(alpha.a, shift);
        let b = select(alpha.b, shift);
        let d = select(alpha.d, shift);
        out[i] = (((a - b) * factor) >> 7) + d;
    }
    out
}
