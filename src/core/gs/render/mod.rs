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

//! Software rasterization
//!
//! The rasterizers turn assembled vertices into fragments and feed them to
//! the [`PixelPipeline`]:
//!
//! - Points: a single fragment
//! - Lines: Bresenham, end pixel excluded
//! - Triangles: edge-table scan conversion with 16.16 interpolation
//! - Sprites: axis-aligned rectangle fill
//!
//! Flat, Gouraud, textured and untextured variants share one code path per
//! primitive; the [`DrawCall`] decides per fragment whether the color is
//! interpolated and whether a texel is combined in.

pub mod line;
pub mod rasterizer;
pub mod shading;
pub mod sprite;
pub mod triangle;

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

pub use rasterizer::Rasterizer;

use super::pipeline::{Fragment, PixelPipeline};
use super::texture::TextureUnit;
use super::vram::Vram;
use shading::texture_function;

/// An assembled vertex in window coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Vertex {
    /// Window X in whole pixels
    pub x: i32,
    /// Window Y in whole pixels
    pub y: i32,
    pub z: u32,
    /// Fog coefficient
    pub f: u8,
    /// Texel U coordinate
    pub u: i32,
    /// Texel V coordinate
    pub v: i32,
    /// Packed RGBA, R in bits 0-7
    pub rgba: u32,
}

/// Per-primitive rasterization parameters
pub struct DrawCall<'a> {
    pub pipeline: &'a PixelPipeline,
    pub texture: Option<&'a TextureUnit>,
    /// Interpolate vertex colors (IIP)
    pub gouraud: bool,
}

impl DrawCall<'_> {
    /// Shade and emit one fragment
    #[inline(always)]
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn plot(&self, vram: &mut Vram, x: i32, y: i32, z: u32, fog: u8, color: u32, u: i32, v: i32) {
        let color = match self.texture {
            Some(unit) => texture_function(unit.fetch(u, v), color, unit.tfx, unit.tcc),
            None => color,
        };
        self.pipeline.draw_pixel(
            vram,
            Fragment {
                x,
                y,
                z,
                fog,
                color,
            },
        );
    }
}
