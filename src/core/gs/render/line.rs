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

//! Line rasterization
//!
//! Integer Bresenham from the first vertex towards the second. The end pixel
//! is not drawn, so consecutive strip segments never overwrite their shared
//! vertex twice. Depth and fog are flat, taken from the end vertex; color
//! and texture coordinates advance one step per major-axis pixel.

use super::shading::Interpolant;
use super::{DrawCall, Rasterizer, Vertex};
use crate::core::gs::vram::Vram;

impl Rasterizer {
    /// Draw a line from `v0` to `v1`
    ///
    /// A zero-length line produces no pixels.
    pub fn draw_line(&mut self, vram: &mut Vram, call: &DrawCall, v0: &Vertex, v1: &Vertex) {
        let dx = v1.x - v0.x;
        let dy = v1.y - v0.y;
        let steps = dx.abs().max(dy.abs()) as i64;
        if steps == 0 {
            return;
        }

        let mut attr = Interpolant::from_vertex(v0);
        let inc = Interpolant::step(&attr, &Interpolant::from_vertex(v1), steps);

        let sx = if dx < 0 { -1 } else { 1 };
        let sy = if dy < 0 { -1 } else { 1 };
        let ax = dx.abs() << 1;
        let ay = dy.abs() << 1;

        let mut x = v0.x;
        let mut y = v0.y;

        let emit = |vram: &mut Vram, x: i32, y: i32, attr: &Interpolant| {
            let color = if call.gouraud { attr.color() } else { v1.rgba };
            call.plot(vram, x, y, v1.z, v1.f, color, attr.texel_u(), attr.texel_v());
        };

        if ax >= ay {
            let mut d = ay - (ax >> 1);
            while x != v1.x {
                emit(vram, x, y, &attr);
                if d > 0 || (d == 0 && sx == 1) {
                    y += sy;
                    d -= ax;
                }
                x += sx;
                d += ay;
                attr.advance(&inc);
            }
        } else {
            let mut d = ax - (ay >> 1);
            while y != v1.y {
                emit(vram, x, y, &attr);
                if d > 0 || (d == 0 && sy == 1) {
                    x += sx;
                    d -= ay;
                }
                y += sy;
                d += ax;
                attr.advance(&inc);
            }
        }

        log::trace!(
            "Line ({}, {}) -> ({}, {}), {} pixels",
            v0.x,
            v0.y,
            v1.x,
            v1.y,
            steps
        );
    }
}
