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

//! Texture tests
//! Texture mapping through CLUT lookups, wrap modes and the decoded
//! texture cache

use std::cell::Cell;
use std::rc::Rc;

use super::super::registers::{self, Tex0};
use super::super::texture::TextureKey;
use super::super::render::shading::{TFX_DECAL, TFX_MODULATE};
use super::super::{PixelFormat, GS};
use super::{frame_pixel, gs_with_frame, start_host_transfer, xyz};

const TBP: u32 = 0x100;
const CBP: u32 = 0x200;

const PRIM_TEXTURED_SPRITE: u64 = 6 | 1 << 4 | 1 << 8;

fn uv(u: u32, v: u32) -> u64 {
    ((u as u64) << 4) | ((v as u64) << 4) << 16
}

/// 8x8 PSMT8 texture with a PSMCT32 CSM1 palette, loaded on every TEX0 write
fn indexed_tex0() -> Tex0 {
    Tex0 {
        tbp0: TBP,
        tbw: 1,
        psm: PixelFormat::PSMT8,
        tw: 3,
        th: 3,
        tcc: true,
        tfx: TFX_DECAL,
        cbp: CBP,
        cpsm: PixelFormat::PSMCT32,
        cld: 1,
        ..Default::default()
    }
}

fn fill_indices(gs: &mut GS, index: u32) {
    for y in 0..8 {
        for x in 0..8 {
            gs.vram.write_pixel(PixelFormat::T8, x, y, TBP, 1, index);
        }
    }
}

/// Palette entry `index` of a CSM1 PSMCT32 palette at CBP
fn set_palette_entry(gs: &mut GS, index: u32, color: u32) {
    set_palette_entry_at(gs, CBP, index, color);
}

fn set_palette_entry_at(gs: &mut GS, cbp: u32, index: u32, color: u32) {
    let p = super::super::texture::clut::csm1_position(index);
    gs.vram
        .write_pixel(PixelFormat::Ct32, p & 15, p >> 4, cbp, 1, color);
}

fn draw_textured_sprite(gs: &mut GS, x1: u32, y1: u32, uv1: u64) {
    gs.write_register(registers::PRIM, PRIM_TEXTURED_SPRITE);
    gs.write_register(registers::RGBAQ, 0x8080_8080);
    gs.write_register(registers::UV, uv(0, 0));
    gs.write_register(registers::XYZ2, xyz(0, 0));
    gs.write_register(registers::UV, uv1);
    gs.write_register(registers::XYZ2, xyz(x1, y1));
}

fn clamp_both() -> u64 {
    1 | 1 << 2
}

#[test]
fn test_indexed_texture_through_clut() {
    let mut gs = gs_with_frame();
    fill_indices(&mut gs, 3);
    set_palette_entry(&mut gs, 3, 0x8080_8080);
    gs.write_register(registers::TEX0_1, indexed_tex0().to_u64());
    gs.write_register(registers::CLAMP_1, clamp_both());

    draw_textured_sprite(&mut gs, 16, 16, uv(1000, 1000));

    for y in 0..16 {
        for x in 0..16 {
            assert_eq!(frame_pixel(&gs, x, y), 0x8080_8080, "pixel ({}, {})", x, y);
        }
    }
    assert_eq!(frame_pixel(&gs, 16, 16), 0);
}

#[test]
fn test_palette_is_only_seen_after_reload() {
    let mut gs = gs_with_frame();
    fill_indices(&mut gs, 3);
    set_palette_entry(&mut gs, 3, 0x8000_00FF);
    gs.write_register(registers::TEX0_1, indexed_tex0().to_u64());

    // Changing memory does not touch the loaded palette
    set_palette_entry(&mut gs, 3, 0x8000_FF00);
    draw_textured_sprite(&mut gs, 2, 2, uv(2, 2));
    assert_eq!(frame_pixel(&gs, 0, 0), 0x8000_00FF);

    gs.write_register(registers::TEX0_1, indexed_tex0().to_u64());
    draw_textured_sprite(&mut gs, 2, 2, uv(2, 2));
    assert_eq!(frame_pixel(&gs, 0, 0), 0x8000_FF00);
}

#[test]
fn test_cld_zero_keeps_palette() {
    let mut gs = gs_with_frame();
    set_palette_entry(&mut gs, 3, 0x8000_00FF);
    let tex0 = Tex0 {
        cld: 0,
        ..indexed_tex0()
    };
    gs.write_register(registers::TEX0_1, tex0.to_u64());
    assert!(gs.clut().entries().iter().all(|&entry| entry == 0));
}

#[test]
fn test_repeat_wrap_and_modulate() {
    let mut gs = gs_with_frame();
    // 4x4 PSMCT32 texture, texel (x, y) = x
    for y in 0..4 {
        for x in 0..4 {
            gs.vram
                .write_pixel(PixelFormat::Ct32, x, y, TBP, 1, 0x8000_0000 | (x * 0x40));
        }
    }
    let tex0 = Tex0 {
        tbp0: TBP,
        tbw: 1,
        psm: PixelFormat::PSMCT32,
        tw: 2,
        th: 2,
        tcc: true,
        tfx: TFX_MODULATE,
        ..Default::default()
    };
    gs.write_register(registers::TEX0_1, tex0.to_u64());
    draw_textured_sprite(&mut gs, 8, 1, uv(8, 1));

    // Vertex color 0x80 leaves the texel unchanged; U wraps at 4
    assert_eq!(frame_pixel(&gs, 1, 0) & 0xFF, 0x40);
    assert_eq!(frame_pixel(&gs, 5, 0) & 0xFF, 0x40);
    assert_eq!(frame_pixel(&gs, 7, 0) & 0xFF, 0xC0);
}

#[test]
fn test_invalid_texture_size_skips_primitive() {
    let mut gs = gs_with_frame();
    let tex0 = Tex0 {
        tw: 11,
        ..indexed_tex0()
    };
    gs.write_register(registers::TEX0_1, tex0.to_u64());
    draw_textured_sprite(&mut gs, 4, 4, uv(4, 4));
    assert_eq!(frame_pixel(&gs, 0, 0), 0);
}

#[test]
fn test_stq_coordinates() {
    let mut gs = gs_with_frame();
    fill_indices(&mut gs, 1);
    gs.vram.write_pixel(PixelFormat::T8, 3, 3, TBP, 1, 2);
    set_palette_entry(&mut gs, 1, 0x8000_00FF);
    set_palette_entry(&mut gs, 2, 0x80FF_0000);
    gs.write_register(registers::TEX0_1, indexed_tex0().to_u64());

    // S = T = 0.5 with Q = 1 lands on texel (3, 3) of an 8x8 texture
    let half = 0.5f32.to_bits() as u64;
    gs.write_register(registers::PRIM, 6 | 1 << 4);
    gs.write_register(registers::RGBAQ, 0x3F80_0000 << 32 | 0x8080_8080);
    gs.write_register(registers::ST, half | half << 32);
    gs.write_register(registers::XYZ2, xyz(0, 0));
    gs.write_register(registers::XYZ2, xyz(2, 2));
    assert_eq!(frame_pixel(&gs, 1, 1), 0x80FF_0000);
}

#[test]
fn test_texture_cache_reuses_decoded_texture() {
    let mut gs = gs_with_frame();
    let expansions = Rc::new(Cell::new(0));
    let counter = Rc::clone(&expansions);
    gs.texture_cache_mut()
        .set_expansion_hook(Box::new(move |_: &TextureKey| counter.set(counter.get() + 1)));

    fill_indices(&mut gs, 3);
    set_palette_entry(&mut gs, 3, 0x8080_8080);
    gs.write_register(registers::TEX0_1, indexed_tex0().to_u64());

    draw_textured_sprite(&mut gs, 4, 4, uv(4, 4));
    draw_textured_sprite(&mut gs, 8, 8, uv(8, 8));
    assert_eq!(expansions.get(), 1);
    assert_eq!(gs.texture_cache().len(), 1);
}

#[test]
fn test_upload_to_texture_forces_decode() {
    let mut gs = gs_with_frame();
    let expansions = Rc::new(Cell::new(0));
    let counter = Rc::clone(&expansions);
    gs.texture_cache_mut()
        .set_expansion_hook(Box::new(move |_: &TextureKey| counter.set(counter.get() + 1)));

    fill_indices(&mut gs, 3);
    set_palette_entry(&mut gs, 3, 0x8080_8080);
    set_palette_entry(&mut gs, 5, 0x8000_FF00);
    gs.write_register(registers::TEX0_1, indexed_tex0().to_u64());
    draw_textured_sprite(&mut gs, 4, 4, uv(4, 4));
    assert_eq!(expansions.get(), 1);

    // Replace every index with 5 through an image transfer
    start_host_transfer(&mut gs, TBP, 1, PixelFormat::PSMT8, 8, 8);
    for _ in 0..8 {
        gs.write_register(registers::HWREG, 0x0505_0505_0505_0505);
    }
    assert!(gs.active_transfer().is_none());

    draw_textured_sprite(&mut gs, 4, 4, uv(4, 4));
    assert_eq!(expansions.get(), 2);
    assert_eq!(frame_pixel(&gs, 1, 1), 0x8000_FF00);
}

#[test]
fn test_disabled_cache_decodes_every_primitive() {
    let mut gs = gs_with_frame();
    gs.texture_cache = crate::core::gs::texture::TextureCache::try_new(4, false).unwrap();
    fill_indices(&mut gs, 3);
    gs.write_register(registers::TEX0_1, indexed_tex0().to_u64());

    draw_textured_sprite(&mut gs, 4, 4, uv(4, 4));
    draw_textured_sprite(&mut gs, 4, 4, uv(4, 4));
    assert_eq!(gs.texture_cache().expansions(), 2);
    assert!(gs.texture_cache().is_empty());
}

/// Draw with palette A, reload palette B elsewhere, then rebind A's
/// descriptor without a reload
fn draw_after_palette_switch(cache_enabled: bool) -> u32 {
    const OTHER_CBP: u32 = 0x300;

    let mut gs = gs_with_frame();
    gs.texture_cache =
        crate::core::gs::texture::TextureCache::try_new(4, cache_enabled).unwrap();
    fill_indices(&mut gs, 3);
    set_palette_entry(&mut gs, 3, 0x8000_00FF);
    set_palette_entry_at(&mut gs, OTHER_CBP, 3, 0x8000_FF00);

    gs.write_register(registers::TEX0_1, indexed_tex0().to_u64());
    draw_textured_sprite(&mut gs, 2, 2, uv(2, 2));
    assert_eq!(frame_pixel(&gs, 0, 0), 0x8000_00FF);

    let other = Tex0 {
        cbp: OTHER_CBP,
        ..indexed_tex0()
    };
    gs.write_register(registers::TEX0_1, other.to_u64());
    let rebound = Tex0 {
        cld: 0,
        ..indexed_tex0()
    };
    gs.write_register(registers::TEX0_1, rebound.to_u64());
    draw_textured_sprite(&mut gs, 2, 2, uv(2, 2));
    frame_pixel(&gs, 0, 0)
}

#[test]
fn test_clut_reload_is_seen_by_cached_textures() {
    let cached = draw_after_palette_switch(true);
    let uncached = draw_after_palette_switch(false);
    assert_eq!(uncached, 0x8000_FF00);
    assert_eq!(cached, uncached);
}
