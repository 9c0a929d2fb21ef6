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

use gsrx::core::gs::{Frame, PixelFormat, GS};

#[allow(dead_code)]
pub fn assert_vram_pixel(gs: &GS, format: PixelFormat, x: u32, y: u32, bp: u32, bw: u32, expected: u32) {
    let actual = gs.vram().read_pixel(format, x, y, bp, bw);
    assert_eq!(
        actual, expected,
        "VRAM {:?} at ({}, {}) mismatch: expected 0x{:08X}, got 0x{:08X}",
        format, x, y, expected, actual
    );
}

#[allow(dead_code)]
pub fn assert_frame_pixel(frame: &Frame, x: u32, y: u32, expected: u32) {
    let actual = frame.pixel(x, y);
    assert_eq!(
        actual,
        Some(expected),
        "Frame at ({}, {}) mismatch: expected 0x{:08X}, got {:X?}",
        x,
        y,
        expected,
        actual
    );
}

/// Compare two devices' local memory word by word
#[allow(dead_code)]
pub fn assert_same_vram(left: &GS, right: &GS) {
    let mismatch = left
        .vram()
        .words()
        .iter()
        .zip(right.vram().words())
        .position(|(a, b)| a != b);
    if let Some(word) = mismatch {
        panic!(
            "VRAM differs at word 0x{:05X}: 0x{:08X} vs 0x{:08X}",
            word,
            left.vram().words()[word],
            right.vram().words()[word]
        );
    }
}
