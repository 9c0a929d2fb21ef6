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

//! GS module tests
//!
//! Tests are organized into the following modules:
//! - `basic`: Construction, reset, configuration and accessors
//! - `addressing`: Swizzle properties of the color and depth schemes
//! - `pixel`: Per-format pixel round trips
//! - `pipeline`: Alpha, depth, blend and write-mask behaviour
//! - `rendering`: Points, lines, triangles and sprites through register writes
//! - `texture`: Texturing, CLUT loads and the texture cache
//! - `primitive`: Vertex queue, strips, fans and XYOFFSET
//! - `transfer`: Image transfers in every direction
//! - `gif`: GIF packet parsing on the three lanes
//! - `privileged`: Privileged registers, interrupts and vsync
//! - `snapshot`: Save state capture and restore

mod pipeline;
mod texture;

use super::registers;
use super::{PixelFormat, GS};

/// GS drawing into a 64-pixel wide PSMCT32 frame at base 0 with a 64x64
/// scissor
pub(super) fn gs_with_frame() -> GS {
    gs_with_frame_format(PixelFormat::PSMCT32)
}

pub(super) fn gs_with_frame_format(psm: u8) -> GS {
    let mut gs = GS::new();
    gs.write_register(registers::FRAME_1, (1 << 16) | (psm as u64) << 24);
    gs.write_register(registers::SCISSOR_1, scissor(0, 63, 0, 63));
    gs
}

pub(super) fn scissor(x0: u64, x1: u64, y0: u64, y1: u64) -> u64 {
    x0 | x1 << 16 | y0 << 32 | y1 << 48
}

/// XYZ2 value for whole-pixel window coordinates
pub(super) fn xyz(x: u32, y: u32) -> u64 {
    ((x as u64) << 4) | ((y as u64) << 4) << 16
}

/// XYZ2 value with a depth
pub(super) fn xyz_z(x: u32, y: u32, z: u32) -> u64 {
    xyz(x, y) | (z as u64) << 32
}

/// Read a PSMCT32 pixel of the 64-pixel wide frame at base 0
pub(super) fn frame_pixel(gs: &GS, x: u32, y: u32) -> u32 {
    gs.vram.read_pixel(PixelFormat::Ct32, x, y, 0, 1)
}

/// Fill the 64x64 frame with a color
pub(super) fn fill_frame(gs: &mut GS, color: u32) {
    for y in 0..64 {
        for x in 0..64 {
            gs.vram.write_pixel(PixelFormat::Ct32, x, y, 0, 1, color);
        }
    }
}

/// Draw a flat sprite covering `[x0, x1) x [y0, y1)`
pub(super) fn draw_sprite(gs: &mut GS, x0: u32, y0: u32, x1: u32, y1: u32, rgba: u32) {
    gs.write_register(registers::PRIM, 6);
    gs.write_register(registers::RGBAQ, rgba as u64);
    gs.write_register(registers::XYZ2, xyz(x0, y0));
    gs.write_register(registers::XYZ2, xyz(x1, y1));
}

/// Start a host to local transfer of a `width` x `height` rectangle at the
/// origin of a buffer
pub(super) fn start_host_transfer(gs: &mut GS, dbp: u32, dbw: u32, dpsm: u8, width: u32, height: u32) {
    let blit = (dbp as u64) << 32 | (dbw as u64) << 48 | (dpsm as u64) << 56;
    gs.write_register(registers::BITBLTBUF, blit);
    gs.write_register(registers::TRXPOS, 0);
    gs.write_register(registers::TRXREG, width as u64 | (height as u64) << 32);
    gs.write_register(registers::TRXDIR, 0);
}
