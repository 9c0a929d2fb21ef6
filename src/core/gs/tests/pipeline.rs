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

//! Pixel pipeline tests
//! Alpha test, depth test, blending and write masks driven through the
//! drawing registers

use super::super::registers::{self, Test};
use super::super::GS;
use super::{fill_frame, frame_pixel, gs_with_frame, xyz_z};
use crate::core::gs::PixelFormat;
use proptest::prelude::*;

const PRIM_POINT: u64 = 0;
const PRIM_ABE: u64 = 1 << 6;

/// Depth buffer four pages above the frame
const ZBP: u64 = 4;

fn test_register(test: Test) -> u64 {
    (test.ate as u64)
        | (test.atst as u64) << 1
        | (test.aref as u64) << 4
        | (test.afail as u64) << 12
        | (test.date as u64) << 14
        | (test.datm as u64) << 15
        | (test.zte as u64) << 16
        | (test.ztst as u64) << 17
}

fn draw_point(gs: &mut GS, prim: u64, x: u32, y: u32, z: u32, rgba: u32) {
    gs.write_register(registers::PRIM, prim);
    gs.write_register(registers::RGBAQ, rgba as u64);
    gs.write_register(registers::XYZ2, xyz_z(x, y, z));
}

fn depth_pixel(gs: &GS, x: u32, y: u32) -> u32 {
    gs.vram
        .read_pixel(PixelFormat::Z32, x, y, (ZBP * 32) as u32, 1)
}

fn gs_with_depth(test: Test) -> GS {
    let mut gs = gs_with_frame();
    gs.write_register(registers::ZBUF_1, ZBP);
    gs.write_register(registers::TEST_1, test_register(test));
    gs
}

#[test]
fn test_point_writes_color() {
    let mut gs = gs_with_frame();
    draw_point(&mut gs, PRIM_POINT, 7, 9, 0, 0x1234_5678);
    assert_eq!(frame_pixel(&gs, 7, 9), 0x1234_5678);
    assert_eq!(frame_pixel(&gs, 8, 9), 0);
}

#[test]
fn test_scissor_rejects_outside_pixels() {
    let mut gs = gs_with_frame();
    gs.write_register(registers::SCISSOR_1, super::scissor(4, 8, 4, 8));
    draw_point(&mut gs, PRIM_POINT, 3, 5, 0, 0xFFFF_FFFF);
    draw_point(&mut gs, PRIM_POINT, 8, 8, 0, 0xFFFF_FFFF);
    assert_eq!(frame_pixel(&gs, 3, 5), 0);
    assert_eq!(frame_pixel(&gs, 8, 8), 0xFFFF_FFFF);
}

#[test]
fn test_scanmsk_skips_even_rows() {
    let mut gs = gs_with_frame();
    gs.write_register(registers::SCANMSK, 2);
    draw_point(&mut gs, PRIM_POINT, 1, 2, 0, 0xFFFF_FFFF);
    draw_point(&mut gs, PRIM_POINT, 1, 3, 0, 0xFFFF_FFFF);
    assert_eq!(frame_pixel(&gs, 1, 2), 0);
    assert_eq!(frame_pixel(&gs, 1, 3), 0xFFFF_FFFF);
}

#[test]
fn test_degenerate_blend_produces_black() {
    let mut gs = gs_with_frame();
    fill_frame(&mut gs, 0x00FF_FFFF);
    // (0 - 0) * FIX + 0
    gs.write_register(registers::ALPHA_1, 2 | 2 << 2 | 2 << 4 | 2 << 6);
    draw_point(&mut gs, PRIM_POINT | PRIM_ABE, 5, 5, 0, 0x40AB_CDEF);
    assert_eq!(frame_pixel(&gs, 5, 5), 0x4000_0000);
}

#[test]
fn test_standard_blend_mixes_with_destination() {
    let mut gs = gs_with_frame();
    fill_frame(&mut gs, 0x0000_00FF);
    // (Cs - Cd) * As + Cd with As = 0x40
    gs.write_register(registers::ALPHA_1, 1 << 2 | 1 << 6);
    draw_point(&mut gs, PRIM_POINT | PRIM_ABE, 2, 2, 0, 0x4000_FF00);
    let out = frame_pixel(&gs, 2, 2);
    // Red and green both land halfway
    assert_eq!(out & 0xFF, 0x7F);
    assert_eq!((out >> 8) & 0xFF, 0x7F);
}

#[test]
fn test_pabe_skips_blending_for_low_alpha() {
    let mut gs = gs_with_frame();
    fill_frame(&mut gs, 0x0000_00FF);
    gs.write_register(registers::ALPHA_1, 2 | 2 << 2 | 2 << 4 | 2 << 6);
    gs.write_register(registers::PABE, 1);

    draw_point(&mut gs, PRIM_POINT | PRIM_ABE, 1, 1, 0, 0x7F00_FF00);
    draw_point(&mut gs, PRIM_POINT | PRIM_ABE, 2, 1, 0, 0x8000_FF00);
    assert_eq!(frame_pixel(&gs, 1, 1), 0x7F00_FF00);
    assert_eq!(frame_pixel(&gs, 2, 1), 0x8000_0000);
}

#[test]
fn test_colclamp_off_wraps_channels() {
    let mut gs = gs_with_frame();
    fill_frame(&mut gs, 0x0000_00F0);
    // (Cs - 0) * 0x80 + Cd
    gs.write_register(registers::ALPHA_1, 2 << 2 | 2 << 4 | 1 << 6 | 0x80 << 32);
    gs.write_register(registers::COLCLAMP, 0);
    draw_point(&mut gs, PRIM_POINT | PRIM_ABE, 0, 0, 0, 0x0000_0020);
    assert_eq!(frame_pixel(&gs, 0, 0) & 0xFF, 0x10);

    gs.write_register(registers::COLCLAMP, 1);
    draw_point(&mut gs, PRIM_POINT | PRIM_ABE, 1, 0, 0, 0x0000_0020);
    assert_eq!(frame_pixel(&gs, 1, 0) & 0xFF, 0xFF);
}

#[test]
fn test_depth_greater_equal() {
    let mut gs = gs_with_depth(Test {
        zte: true,
        ztst: Test::ZTST_GEQUAL,
        ..Default::default()
    });
    draw_point(&mut gs, PRIM_POINT, 3, 3, 100, 0xFF00_00FF);
    draw_point(&mut gs, PRIM_POINT, 3, 3, 50, 0xFF00_FF00);
    assert_eq!(frame_pixel(&gs, 3, 3), 0xFF00_00FF);
    assert_eq!(depth_pixel(&gs, 3, 3), 100);

    draw_point(&mut gs, PRIM_POINT, 3, 3, 100, 0xFFFF_0000);
    assert_eq!(frame_pixel(&gs, 3, 3), 0xFFFF_0000);
}

#[test]
fn test_zmsk_keeps_depth() {
    let mut gs = gs_with_depth(Test {
        zte: true,
        ztst: Test::ZTST_ALWAYS,
        ..Default::default()
    });
    gs.write_register(registers::ZBUF_1, ZBP | 1 << 32);
    draw_point(&mut gs, PRIM_POINT, 3, 3, 77, 0xFFFF_FFFF);
    assert_eq!(frame_pixel(&gs, 3, 3), 0xFFFF_FFFF);
    assert_eq!(depth_pixel(&gs, 3, 3), 0);
}

#[test]
fn test_depth_is_clamped_to_format() {
    let mut gs = gs_with_depth(Test {
        zte: true,
        ztst: Test::ZTST_ALWAYS,
        ..Default::default()
    });
    // PSMZ24
    gs.write_register(registers::ZBUF_1, ZBP | 1 << 24);
    draw_point(&mut gs, PRIM_POINT, 0, 0, 0x0200_0000, 0xFFFF_FFFF);
    let z = gs
        .vram
        .read_pixel(PixelFormat::Z24, 0, 0, (ZBP * 32) as u32, 1);
    assert_eq!(z, 0x00FF_FFFF);
}

fn failing_alpha(afail: u8) -> Test {
    Test {
        ate: true,
        atst: Test::ATST_NEVER,
        afail,
        zte: true,
        ztst: Test::ZTST_ALWAYS,
        ..Default::default()
    }
}

#[test]
fn test_afail_keep() {
    let mut gs = gs_with_depth(failing_alpha(Test::AFAIL_KEEP));
    draw_point(&mut gs, PRIM_POINT, 1, 1, 9, 0x8012_3456);
    assert_eq!(frame_pixel(&gs, 1, 1), 0);
    assert_eq!(depth_pixel(&gs, 1, 1), 0);
}

#[test]
fn test_afail_frame_only() {
    let mut gs = gs_with_depth(failing_alpha(Test::AFAIL_FB_ONLY));
    draw_point(&mut gs, PRIM_POINT, 1, 1, 9, 0x8012_3456);
    assert_eq!(frame_pixel(&gs, 1, 1), 0x8012_3456);
    assert_eq!(depth_pixel(&gs, 1, 1), 0);
}

#[test]
fn test_afail_depth_only() {
    let mut gs = gs_with_depth(failing_alpha(Test::AFAIL_ZB_ONLY));
    draw_point(&mut gs, PRIM_POINT, 1, 1, 9, 0x8012_3456);
    assert_eq!(frame_pixel(&gs, 1, 1), 0);
    assert_eq!(depth_pixel(&gs, 1, 1), 9);
}

#[test]
fn test_afail_rgb_only() {
    let mut gs = gs_with_depth(failing_alpha(Test::AFAIL_RGB_ONLY));
    fill_frame(&mut gs, 0x5500_0000);
    draw_point(&mut gs, PRIM_POINT, 1, 1, 9, 0x8012_3456);
    assert_eq!(frame_pixel(&gs, 1, 1), 0x5512_3456);
    assert_eq!(depth_pixel(&gs, 1, 1), 0);
}

#[test]
fn test_fbmsk_preserves_masked_bits() {
    let mut gs = gs_with_frame();
    fill_frame(&mut gs, 0x1122_3344);
    gs.write_register(registers::FRAME_1, 1 << 16 | 0xFF00_FF00 << 32);
    draw_point(&mut gs, PRIM_POINT, 6, 6, 0, 0xAABB_CCDD);
    assert_eq!(frame_pixel(&gs, 6, 6), 0x11BB_33DD);
}

#[test]
fn test_destination_alpha_test() {
    let mut gs = gs_with_depth(Test {
        date: true,
        datm: false,
        ..Default::default()
    });
    fill_frame(&mut gs, 0x8000_0000);
    gs.vram.write_pixel(PixelFormat::Ct32, 2, 0, 0, 1, 0x0000_0000);

    draw_point(&mut gs, PRIM_POINT, 1, 0, 0, 0xFFFF_FFFF);
    draw_point(&mut gs, PRIM_POINT, 2, 0, 0, 0xFFFF_FFFF);
    assert_eq!(frame_pixel(&gs, 1, 0), 0x8000_0000);
    assert_eq!(frame_pixel(&gs, 2, 0), 0xFFFF_FFFF);
}

#[test]
fn test_fba_sets_alpha_msb() {
    let mut gs = gs_with_frame();
    gs.write_register(registers::FBA_1, 1);
    draw_point(&mut gs, PRIM_POINT, 0, 0, 0, 0x0100_0000);
    assert_eq!(frame_pixel(&gs, 0, 0), 0x8100_0000);
}

#[test]
fn test_fog_blends_towards_fogcol() {
    let mut gs = gs_with_frame();
    gs.write_register(registers::FOGCOL, 0x00FF_FFFF);
    // PRIM point with FGE, XYZF2 carrying F = 0
    gs.write_register(registers::PRIM, PRIM_POINT | 1 << 5);
    gs.write_register(registers::RGBAQ, 0x8000_0000);
    gs.write_register(registers::XYZF2, 3 << 4 | (3 << 4) << 16);
    assert_eq!(frame_pixel(&gs, 3, 3), 0x80FE_FEFE);
}

#[test]
fn test_dither_only_applies_to_16bit_targets() {
    let mut gs = super::gs_with_frame_format(PixelFormat::PSMCT16);
    // Every matrix entry +3
    let dimx = (0..16).fold(0u64, |acc, i| acc | 3 << (i * 4));
    gs.write_register(registers::DIMX, dimx);
    gs.write_register(registers::DTHE, 1);
    draw_point(&mut gs, PRIM_POINT, 0, 0, 0, 0x0000_0005);
    let red = gs.vram.read_pixel(PixelFormat::Ct16, 0, 0, 0, 1) & 0xFF;
    assert_eq!(red, 0x08);
}

proptest! {
    #[test]
    fn prop_alpha_always_passes(alpha in any::<u8>(), aref in any::<u8>()) {
        let mut gs = gs_with_depth(Test {
            ate: true,
            atst: Test::ATST_ALWAYS,
            aref,
            ..Default::default()
        });
        let color = (alpha as u32) << 24 | 0x00_1234;
        draw_point(&mut gs, PRIM_POINT, 4, 4, 0, color);
        prop_assert_eq!(frame_pixel(&gs, 4, 4), color);
    }

    #[test]
    fn prop_alpha_never_keeps_frame(alpha in any::<u8>(), aref in any::<u8>()) {
        let mut gs = gs_with_depth(Test {
            ate: true,
            atst: Test::ATST_NEVER,
            aref,
            afail: Test::AFAIL_KEEP,
            ..Default::default()
        });
        draw_point(&mut gs, PRIM_POINT, 4, 4, 0, (alpha as u32) << 24 | 0xFF);
        prop_assert_eq!(frame_pixel(&gs, 4, 4), 0);
    }
}
