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

//! Display output
//!
//! The GS does not own a window. On every vsync it builds a [`Frame`] from
//! the enabled read circuit and hands it to whatever [`DisplaySink`] the host
//! bound with `open`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::format::PixelFormat;
use super::privileged::PrivilegedRegisters;
use super::registers::bits;
use super::vram::Vram;
use crate::core::error::Result;

/// Video timing standard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VideoMode {
    #[default]
    Ntsc,
    Pal,
}

impl VideoMode {
    /// Field rate in Hz
    pub fn refresh_rate(self) -> f64 {
        match self {
            VideoMode::Ntsc => 59.94,
            VideoMode::Pal => 50.0,
        }
    }
}

/// A presented image, RGBA8 with R in bits 0-7
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl Frame {
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            self.pixels.get((y * self.width + x) as usize).copied()
        } else {
            None
        }
    }

    /// Write the frame as a PAM image
    pub fn save_pam(&self, path: &Path) -> Result<()> {
        save_pam(path, self.width, self.height, &self.pixels)
    }
}

/// Consumer of presented frames
///
/// Implemented by the host's window or recorder.
pub trait DisplaySink {
    /// Show one frame
    fn present(&mut self, frame: &Frame);
}

/// Largest frame dimension produced by the read circuits
const MAX_FRAME_DIMENSION: u32 = 2048;

/// Build the frame shown by the read circuits
///
/// Circuit 1 is used when enabled in PMODE, otherwise circuit 2. With both
/// circuits disabled an empty frame is returned. Displayed pixels are opaque.
pub fn build_frame(vram: &Vram, regs: &PrivilegedRegisters) -> Frame {
    let pmode = regs.pmode();
    let circuit = if pmode & 1 != 0 {
        0
    } else if pmode & 2 != 0 {
        1
    } else {
        return Frame::default();
    };

    let dispfb = regs.dispfb(circuit);
    let display = regs.display(circuit);

    let base = bits(dispfb, 0, 9) as u32 * 32;
    let fbw = bits(dispfb, 9, 6) as u32;
    let format = PixelFormat::from_psm(bits(dispfb, 15, 5) as u8);
    let dbx = bits(dispfb, 32, 11) as u32;
    let dby = bits(dispfb, 43, 11) as u32;

    let magh = bits(display, 23, 4) as u32 + 1;
    let magv = bits(display, 27, 2) as u32 + 1;
    let width = ((bits(display, 32, 12) as u32 + 1) / magh).min(MAX_FRAME_DIMENSION);
    let height = ((bits(display, 44, 11) as u32 + 1) / magv).min(MAX_FRAME_DIMENSION);

    let mut pixels = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let color = vram.read_pixel(format, dbx + x, dby + y, base, fbw);
            pixels.push(color | 0xFF00_0000);
        }
    }

    Frame {
        width,
        height,
        pixels,
    }
}

/// The whole local memory viewed as a 1024x1024 32-bit image
pub fn vram_dump_frame(vram: &Vram) -> Frame {
    Frame {
        width: 1024,
        height: 1024,
        pixels: vram.words().to_vec(),
    }
}

/// Encode RGBA8 pixels as a PAM (P7) image
///
/// # Examples
///
/// ```
/// use gsrx::core::gs::display::write_pam;
///
/// let mut out = Vec::new();
/// write_pam(&mut out, 1, 1, &[0xFF00_00FF]).unwrap();
/// assert!(out.starts_with(b"P7\n"));
/// assert_eq!(&out[out.len() - 4..], &[0xFF, 0x00, 0x00, 0xFF]);
/// ```
pub fn write_pam<W: Write>(writer: &mut W, width: u32, height: u32, pixels: &[u32]) -> Result<()> {
    write!(
        writer,
        "P7\nWIDTH {}\nHEIGHT {}\nDEPTH 4\nMAXVAL 255\nTUPLTYPE RGB_ALPHA\nENDHDR\n",
        width, height
    )?;
    for pixel in pixels.iter().take((width * height) as usize) {
        writer.write_all(&pixel.to_le_bytes())?;
    }
    Ok(())
}

/// Write a PAM image to a file
pub fn save_pam(path: &Path, width: u32, height: u32, pixels: &[u32]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_pam(&mut writer, width, height, pixels)?;
    writer.flush()?;
    Ok(())
}
