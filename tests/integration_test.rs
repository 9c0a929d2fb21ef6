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

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::assertions::{assert_frame_pixel, assert_same_vram, assert_vram_pixel};
use common::fixtures::{
    a_d, enable_display, frame_setup, gif_tag, register_packet, sprite, upload_packet, xyz, A_D,
};
use gsrx::core::config::GsConfig;
use gsrx::core::error::Result;
use gsrx::core::gs::{registers, DisplaySink, Frame, GifPathId, GsInterrupt, PixelFormat, GS};
use gsrx::core::loader::PacketDump;
use gsrx::core::save_state::SaveState;

/// Display that keeps every presented frame
struct Capture {
    frames: Rc<RefCell<Vec<Frame>>>,
}

impl DisplaySink for Capture {
    fn present(&mut self, frame: &Frame) {
        self.frames.borrow_mut().push(frame.clone());
    }
}

fn scene() -> Vec<u128> {
    let mut writes = frame_setup(0, 64, 64);
    writes.extend(sprite(0x8000_0000, 0, 0, 64, 64));
    writes.extend(sprite(0x4000_FF00, 8, 8, 24, 24));
    writes.push((registers::FINISH, 0));
    register_packet(&writes)
}

#[test]
fn test_basic_initialization() -> Result<()> {
    let gs = GS::try_new(GsConfig::default())?;
    assert_eq!(gs.frame_count(), 0);
    assert!(gs.vram().words().iter().all(|&w| w == 0));
    Ok(())
}

#[test]
fn test_packet_to_display() {
    let frames = Rc::new(RefCell::new(Vec::new()));
    let mut gs = GS::new();
    gs.open(
        Box::new(Capture {
            frames: Rc::clone(&frames),
        }),
        Default::default(),
    );

    gs.transfer(GifPathId::Path3, &scene());
    enable_display(&mut gs, 0, 64, 64);
    gs.vsync();

    let frames = frames.borrow();
    assert_eq!(frames.len(), 1);
    let frame = &frames[0];
    assert_eq!((frame.width, frame.height), (64, 64));
    // Displayed alpha is always opaque
    assert_frame_pixel(frame, 0, 0, 0xFF00_0000);
    assert_frame_pixel(frame, 10, 10, 0xFF00_FF00);
    assert_frame_pixel(frame, 24, 24, 0xFF00_0000);
}

#[test]
fn test_finish_interrupt_from_packet() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut gs = GS::new();
    let sink = Rc::clone(&events);
    gs.set_interrupt_handler(Box::new(move |interrupt| sink.borrow_mut().push(interrupt)));
    gs.write_privileged64(gsrx::core::gs::privileged::IMR, 0)
        .unwrap();

    gs.transfer(GifPathId::Path1, &scene());

    assert_eq!(events.borrow().as_slice(), &[GsInterrupt::Finish]);
}

#[test]
fn test_textured_scene() {
    let mut gs = GS::new();

    // 4x4 checkerboard uploaded to block 0x200
    let texels: Vec<u32> = (0..16)
        .map(|i| if (i % 4 + i / 4) % 2 == 0 { 0x80FF_FFFF } else { 0x8000_00FF })
        .collect();
    gs.transfer(GifPathId::Path3, &upload_packet(0x200, 1, 4, 4, &texels));

    let mut writes = frame_setup(0, 64, 64);
    writes.extend([
        // PSMCT32 4x4, TCC, DECAL
        (
            registers::TEX0_1,
            0x200 | 1 << 14 | 2 << 26 | 2 << 30 | 1 << 34 | 1 << 35,
        ),
        // Sprite, TME, FST
        (registers::PRIM, 6 | 1 << 4 | 1 << 8),
        (registers::UV, 0),
        (registers::XYZ2, xyz(0, 0)),
        (registers::UV, (4 << 4) | (4 << 4) << 16),
        (registers::XYZ2, xyz(4, 4)),
    ]);
    gs.transfer(GifPathId::Path3, &register_packet(&writes));

    for y in 0..4 {
        for x in 0..4 {
            assert_vram_pixel(&gs, PixelFormat::Ct32, x, y, 0, 1, texels[(y * 4 + x) as usize]);
        }
    }
}

#[test]
fn test_upload_and_readback() {
    let mut gs = GS::new();
    let pixels: Vec<u32> = (0..64).map(|i| 0x0101_0101 * i).collect();
    gs.transfer(GifPathId::Path3, &upload_packet(0x80, 1, 8, 8, &pixels));
    assert!(gs.active_transfer().is_none());

    gs.transfer(
        GifPathId::Path3,
        &register_packet(&[
            (registers::BITBLTBUF, 0x80 | 1 << 16),
            (registers::TRXPOS, 0),
            (registers::TRXREG, 8 | 8 << 32),
            (registers::TRXDIR, 1),
        ]),
    );

    let mut out = [0u128; 16];
    assert_eq!(gs.read_fifo(&mut out), 16);
    let read: Vec<u32> = out
        .iter()
        .flat_map(|q| (0..4).map(move |i| (q >> (i * 32)) as u32))
        .collect();
    assert_eq!(read, pixels);
    assert!(gs.active_transfer().is_none());
}

#[test]
fn test_packet_dump_replay() {
    let dump = PacketDump::new(scene());
    let file = tempfile::NamedTempFile::new().unwrap();
    dump.save(file.path()).unwrap();

    let mut replayed = GS::new();
    let loaded = PacketDump::load(file.path()).unwrap();
    replayed.transfer(GifPathId::Path3, loaded.qwords());

    let mut direct = GS::new();
    direct.transfer(GifPathId::Path3, &scene());

    assert_same_vram(&replayed, &direct);
}

#[test]
fn test_save_state_mid_packet() {
    let packet = scene();
    let split = packet.len() / 2;

    let mut reference = GS::new();
    reference.transfer(GifPathId::Path2, &packet);

    let mut first = GS::new();
    first.transfer(GifPathId::Path2, &packet[..split]);
    let file = tempfile::NamedTempFile::new().unwrap();
    SaveState::from_gs(&first).save_to_file(file.path()).unwrap();

    let mut resumed = GS::new();
    SaveState::load_from_file(file.path())
        .unwrap()
        .apply_to(&mut resumed)
        .unwrap();
    resumed.transfer(GifPathId::Path2, &packet[split..]);

    assert_same_vram(&resumed, &reference);
    assert_eq!(resumed.env(), reference.env());
}

#[test]
fn test_render_disabled_from_config() {
    let config: GsConfig = toml::from_str("render_disabled = true\n").unwrap();
    let mut gs = GS::try_new(config).unwrap();

    gs.transfer(GifPathId::Path3, &scene());

    assert!(gs.vram().words().iter().all(|&w| w == 0));
    assert_eq!(gs.env().contexts[0].frame.fbw, 1);
}

#[test]
fn test_lanes_interleave() {
    let mut gs = GS::new();

    let mut setup = frame_setup(0, 64, 64);
    setup.push((registers::PRIM, 6));
    gs.transfer(GifPathId::Path3, &register_packet(&setup));

    // PATH3 stops halfway through a sprite while PATH1 changes the color
    let tag = gif_tag(3, true, 0, &[A_D]);
    gs.transfer(
        GifPathId::Path3,
        &[tag, a_d(registers::RGBAQ, 0x8011_2233), a_d(registers::XYZ2, xyz(0, 0))],
    );
    gs.transfer(
        GifPathId::Path1,
        &register_packet(&[(registers::RGBAQ, 0x8044_5566)]),
    );
    gs.transfer(GifPathId::Path3, &[a_d(registers::XYZ2, xyz(4, 4))]);

    // Sprites take their color from the second vertex
    assert_vram_pixel(&gs, PixelFormat::Ct32, 1, 1, 0, 1, 0x8044_5566);
    assert!(gs.gif_path(GifPathId::Path3).tag.is_none());
}

#[test]
fn test_frame_written_as_pam() {
    let mut gs = GS::new();
    gs.transfer(GifPathId::Path3, &scene());
    enable_display(&mut gs, 0, 64, 64);

    let frame = gs.framebuffer();
    let file = tempfile::NamedTempFile::new().unwrap();
    frame.save_pam(file.path()).unwrap();

    let bytes = std::fs::read(file.path()).unwrap();
    assert!(bytes.starts_with(b"P7\nWIDTH 64\nHEIGHT 64\n"));
    assert!(bytes.len() > 64 * 64 * 4);
}
