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

//! Rasterizer state
//!
//! The triangle filler records both boundary chains of a triangle into
//! per-scanline tables before filling spans. The tables are owned here and
//! reused across primitives.

use super::shading::Interpolant;
use super::{DrawCall, Vertex};
use crate::core::gs::vram::Vram;

/// Software rasterizer
///
/// # Examples
///
/// ```
/// use gsrx::core::gs::context::DrawingEnv;
/// use gsrx::core::gs::pipeline::PixelPipeline;
/// use gsrx::core::gs::registers::{Frame, Prim, Scissor};
/// use gsrx::core::gs::render::{DrawCall, Rasterizer, Vertex};
/// use gsrx::core::gs::{PixelFormat, Vram};
///
/// let mut env = DrawingEnv::new();
/// env.contexts[0].frame = Frame { fbp: 0, fbw: 1, psm: 0, fbmsk: 0 };
/// env.contexts[0].scissor = Scissor { x0: 0, x1: 63, y0: 0, y1: 63 };
/// let pipeline = PixelPipeline::new(&env, &Prim::default());
///
/// let mut vram = Vram::new();
/// let mut rasterizer = Rasterizer::new();
/// let call = DrawCall { pipeline: &pipeline, texture: None, gouraud: false };
/// let v = Vertex { x: 5, y: 7, rgba: 0xFF00_00FF, ..Default::default() };
/// rasterizer.draw_point(&mut vram, &call, &v);
///
/// assert_eq!(vram.read_pixel(PixelFormat::Ct32, 5, 7, 0, 1), 0xFF00_00FF);
/// ```
pub struct Rasterizer {
    /// Edge samples of the chain walking forward through vertex order
    pub(super) forward: Vec<Interpolant>,
    /// Edge samples of the chain walking backward through vertex order
    pub(super) backward: Vec<Interpolant>,
}

impl Rasterizer {
    /// Number of scanlines an edge table can hold
    pub const EDGE_ROWS: usize = 4096;

    pub fn new() -> Self {
        Self {
            forward: vec![Interpolant::default(); Self::EDGE_ROWS],
            backward: vec![Interpolant::default(); Self::EDGE_ROWS],
        }
    }

    /// Draw a single point
    pub fn draw_point(&mut self, vram: &mut Vram, call: &DrawCall, v: &Vertex) {
        call.plot(vram, v.x, v.y, v.z, v.f, v.rgba, v.u, v.v);
    }

    /// Draw the outline of a triangle
    pub fn draw_triangle_wireframe(&mut self, vram: &mut Vram, call: &DrawCall, v: &[Vertex; 3]) {
        self.draw_line(vram, call, &v[0], &v[1]);
        self.draw_line(vram, call, &v[1], &v[2]);
        self.draw_line(vram, call, &v[2], &v[0]);
    }

    /// Draw the outline of a sprite
    pub fn draw_sprite_wireframe(&mut self, vram: &mut Vram, call: &DrawCall, v0: &Vertex, v1: &Vertex) {
        let top_right = Vertex { x: v1.x, u: v1.u, ..*v0 };
        let bottom_left = Vertex { x: v0.x, u: v0.u, ..*v1 };
        self.draw_line(vram, call, v0, &top_right);
        self.draw_line(vram, call, &top_right, v1);
        self.draw_line(vram, call, v1, &bottom_left);
        self.draw_line(vram, call, &bottom_left, v0);
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}
