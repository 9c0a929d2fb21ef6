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

//! Sprite rasterization
//!
//! A sprite is the axis-aligned rectangle spanned by two corner vertices.
//! The right column and bottom row are excluded. Color, depth and fog are
//! flat from the second vertex; texture coordinates are stepped linearly.

use super::{DrawCall, Rasterizer, Vertex};
use crate::core::gs::vram::Vram;

impl Rasterizer {
    /// Fill a sprite
    pub fn draw_sprite(&mut self, vram: &mut Vram, call: &DrawCall, v0: &Vertex, v1: &Vertex) {
        let mut a = *v0;
        let mut b = *v1;
        if a.x > b.x {
            std::mem::swap(&mut a.x, &mut b.x);
            std::mem::swap(&mut a.u, &mut b.u);
        }
        if a.y > b.y {
            std::mem::swap(&mut a.y, &mut b.y);
            std::mem::swap(&mut a.v, &mut b.v);
        }

        let width = (b.x - a.x) as i64;
        let height = (b.y - a.y) as i64;
        if width == 0 || height == 0 {
            return;
        }

        let uinc = (((b.u - a.u) as i64) << 16) / width;
        let vinc = (((b.v - a.v) as i64) << 16) / height;

        let mut v = (a.v as i64) << 16;
        for y in a.y..b.y {
            let mut u = (a.u as i64) << 16;
            for x in a.x..b.x {
                call.plot(
                    vram,
                    x,
                    y,
                    v1.z,
                    v1.f,
                    v1.rgba,
                    (u >> 16) as i32,
                    (v >> 16) as i32,
                );
                u += uinc;
            }
            v += vinc;
        }

        log::trace!("Sprite ({}, {}) - ({}, {})", a.x, a.y, b.x, b.y);
    }
}
