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

//! Triangle rasterization
//!
//! # Algorithm
//!
//! 1. Find the topmost and bottommost vertices
//! 2. Walk the chain of edges going forward through vertex order from top to
//!    bottom, recording the interpolated attributes of each scanline into the
//!    forward table
//! 3. Do the same for the chain going backward into the backward table
//! 4. For every scanline, the table with the smaller X is the left end of
//!    the span; attributes are interpolated across the span
//!
//! Scanlines cover `[top, bottom)`. Horizontal edges contribute nothing and
//! a triangle with zero height draws nothing.

use super::shading::Interpolant;
use super::{DrawCall, Rasterizer, Vertex};
use crate::core::gs::vram::Vram;

impl Rasterizer {
    /// Fill a triangle
    pub fn draw_triangle(&mut self, vram: &mut Vram, call: &DrawCall, v: &[Vertex; 3]) {
        let top = (0..3).min_by_key(|&i| v[i].y).unwrap_or(0);
        let bottom = (0..3).max_by_key(|&i| v[i].y).unwrap_or(0);
        let (ymin, ymax) = (v[top].y, v[bottom].y);
        if ymin == ymax {
            return;
        }

        // Forward chain: top, top + 1, ... until bottom
        let mut i = top;
        while i != bottom {
            let next = (i + 1) % 3;
            scan_edge(&mut self.forward, &v[i], &v[next]);
            i = next;
        }

        // Backward chain: top, top - 1, ... until bottom
        let mut i = top;
        while i != bottom {
            let next = (i + 2) % 3;
            scan_edge(&mut self.backward, &v[i], &v[next]);
            i = next;
        }

        // Flat attributes come from the last vertex
        let flat = &v[2];
        let start = ymin.max(0);
        let end = ymax.min(Self::EDGE_ROWS as i32);
        for y in start..end {
            let a = self.forward[y as usize];
            let b = self.backward[y as usize];
            if a.x <= b.x {
                draw_span(vram, call, y, &a, &b, flat);
            } else {
                draw_span(vram, call, y, &b, &a, flat);
            }
        }

        log::trace!(
            "Triangle ({}, {}) ({}, {}) ({}, {}), rows {}..{}",
            v[0].x,
            v[0].y,
            v[1].x,
            v[1].y,
            v[2].x,
            v[2].y,
            start,
            end
        );
    }
}

/// Record one edge into an edge table, one sample per scanline in `[y1, y2)`
///
/// Rows above the top of the table are stepped through but not stored.
fn scan_edge(table: &mut [Interpolant], from: &Vertex, to: &Vertex) {
    let (y1, y2) = (from.y, to.y);
    if y1 == y2 {
        return;
    }

    let mut attr = Interpolant::from_vertex(from);
    let inc = Interpolant::step(&attr, &Interpolant::from_vertex(to), (y2 - y1) as i64);

    let mut y = y1;
    if y < 0 {
        let skip = (y2.min(0) - y) as i64;
        attr.advance_by(&inc, skip);
        y += skip as i32;
    }

    while y < y2 && (y as usize) < table.len() {
        table[y as usize] = attr;
        attr.advance(&inc);
        y += 1;
    }
}

/// Fill one scanline from `left` to `right` inclusive
///
/// Spans whose right end does not lie strictly right of the left end are
/// empty.
fn draw_span(
    vram: &mut Vram,
    call: &DrawCall,
    y: i32,
    left: &Interpolant,
    right: &Interpolant,
    flat: &Vertex,
) {
    let x0 = (left.x >> 16) as i32;
    let x1 = (right.x >> 16) as i32;
    if x1 <= x0 {
        return;
    }

    let mut attr = *left;
    let inc = Interpolant::step(left, right, (x1 - x0) as i64);
    for x in x0..=x1 {
        let color = if call.gouraud { attr.color() } else { flat.rgba };
        call.plot(vram, x, y, attr.depth(), flat.f, color, attr.texel_u(), attr.texel_v());
        attr.advance(&inc);
    }
}
