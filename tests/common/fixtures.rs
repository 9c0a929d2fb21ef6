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

//! GIF packet builders

use gsrx::core::gs::{registers, GS};

/// PACKED descriptor for A+D
pub const A_D: u8 = 0xE;

/// Build a GIF tag
///
/// `flg` is 0 for PACKED, 1 for REGLIST and 2 for IMAGE.
#[allow(dead_code)]
pub fn gif_tag(nloop: u32, eop: bool, flg: u8, regs: &[u8]) -> u128 {
    let mut lo = nloop as u64 & 0x7FFF;
    if eop {
        lo |= 1 << 15;
    }
    lo |= (flg as u64 & 3) << 58;
    lo |= (regs.len() as u64 & 0xF) << 60;

    let mut hi = 0u64;
    for (i, &reg) in regs.iter().enumerate() {
        hi |= (reg as u64 & 0xF) << (i * 4);
    }
    lo as u128 | (hi as u128) << 64
}

/// One A+D quad-word
#[allow(dead_code)]
pub fn a_d(reg: u8, value: u64) -> u128 {
    value as u128 | (reg as u128) << 64
}

/// A PACKED packet of A+D writes
#[allow(dead_code)]
pub fn register_packet(writes: &[(u8, u64)]) -> Vec<u128> {
    let mut packet = vec![gif_tag(writes.len() as u32, true, 0, &[A_D])];
    packet.extend(writes.iter().map(|&(reg, value)| a_d(reg, value)));
    packet
}

/// Integer pixel position in XYZ2 layout
#[allow(dead_code)]
pub fn xyz(x: u32, y: u32) -> u64 {
    (x << 4) as u64 | ((y << 4) as u64) << 16
}

/// Drawing setup for a PSMCT32 frame at `fbp` pages, `width` pixels wide
#[allow(dead_code)]
pub fn frame_setup(fbp: u32, width: u32, height: u32) -> Vec<(u8, u64)> {
    let fbw = width.div_ceil(64) as u64;
    vec![
        (registers::FRAME_1, fbp as u64 | fbw << 16),
        (
            registers::SCISSOR_1,
            (width as u64 - 1) << 16 | (height as u64 - 1) << 48,
        ),
        (registers::TEST_1, 0),
    ]
}

/// Flat sprite covering [x0, x1) x [y0, y1)
#[allow(dead_code)]
pub fn sprite(color: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> Vec<(u8, u64)> {
    vec![
        (registers::PRIM, 6),
        (registers::RGBAQ, color as u64),
        (registers::XYZ2, xyz(x0, y0)),
        (registers::XYZ2, xyz(x1, y1)),
    ]
}

/// Host to local upload of a PSMCT32 rectangle
///
/// Returns the register setup packet followed by the IMAGE packet. `pixels`
/// must hold `width * height` entries with `width * height` a multiple of 4.
#[allow(dead_code)]
pub fn upload_packet(dbp: u32, dbw: u32, width: u32, height: u32, pixels: &[u32]) -> Vec<u128> {
    let mut packet = register_packet(&[
        (registers::BITBLTBUF, (dbp as u64) << 32 | (dbw as u64) << 48),
        (registers::TRXPOS, 0),
        (registers::TRXREG, width as u64 | (height as u64) << 32),
        (registers::TRXDIR, 0),
    ]);
    let qwords: Vec<u128> = pixels
        .chunks_exact(4)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u128, |acc, (i, &p)| acc | (p as u128) << (i * 32))
        })
        .collect();
    packet.push(gif_tag(qwords.len() as u32, true, 2, &[]));
    packet.extend(qwords);
    packet
}

/// Enable read circuit 1 on a PSMCT32 buffer at `fbp` pages
#[allow(dead_code)]
pub fn enable_display(gs: &mut GS, fbp: u32, width: u32, height: u32) {
    use gsrx::core::gs::privileged::{DISPFB1, DISPLAY1, PMODE};

    let fbw = width.div_ceil(64) as u64;
    gs.write_privileged64(PMODE, 1).unwrap();
    gs.write_privileged64(DISPFB1, fbp as u64 | fbw << 9).unwrap();
    gs.write_privileged64(
        DISPLAY1,
        (width as u64 - 1) << 32 | (height as u64 - 1) << 44,
    )
    .unwrap();
}
