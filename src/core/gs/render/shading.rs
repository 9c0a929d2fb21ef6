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

//! Shading helpers shared by the rasterizers
//!
//! - [`Interpolant`]: 16.16 fixed-point vertex attributes stepped along
//!   edges and spans
//! - [`texture_function`]: the TFX combination of texel and vertex color

use super::Vertex;

pub const TFX_MODULATE: u8 = 0;
pub const TFX_DECAL: u8 = 1;
pub const TFX_HIGHLIGHT: u8 = 2;
pub const TFX_HIGHLIGHT2: u8 = 3;

/// Vertex attributes in 16.16 fixed point
///
/// Division when computing steps truncates towards zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interpolant {
    pub x: i64,
    pub z: i64,
    pub r: i64,
    pub g: i64,
    pub b: i64,
    pub a: i64,
    pub u: i64,
    pub v: i64,
}

impl Interpolant {
    pub fn from_vertex(vertex: &Vertex) -> Self {
        let c = vertex.rgba;
        Self {
            x: (vertex.x as i64) << 16,
            z: (vertex.z as i64) << 16,
            r: ((c & 0xFF) as i64) << 16,
            g: (((c >> 8) & 0xFF) as i64) << 16,
            b: (((c >> 16) & 0xFF) as i64) << 16,
            a: ((c >> 24) as i64) << 16,
            u: (vertex.u as i64) << 16,
            v: (vertex.v as i64) << 16,
        }
    }

    /// Per-step increment taking `from` to `to` in `steps` steps
    pub fn step(from: &Self, to: &Self, steps: i64) -> Self {
        if steps == 0 {
            return Self::default();
        }
        Self {
            x: (to.x - from.x) / steps,
            z: (to.z - from.z) / steps,
            r: (to.r - from.r) / steps,
            g: (to.g - from.g) / steps,
            b: (to.b - from.b) / steps,
            a: (to.a - from.a) / steps,
            u: (to.u - from.u) / steps,
            v: (to.v - from.v) / steps,
        }
    }

    #[inline(always)]
    pub fn advance(&mut self, inc: &Self) {
        self.x += inc.x;
        self.z += inc.z;
        self.r += inc.r;
        self.g += inc.g;
        self.b += inc.b;
        self.a += inc.a;
        self.u += inc.u;
        self.v += inc.v;
    }

    /// Advance by `n` steps at once
    #[inline(always)]
    pub fn advance_by(&mut self, inc: &Self, n: i64) {
        self.x += inc.x * n;
        self.z += inc.z * n;
        self.r += inc.r * n;
        self.g += inc.g * n;
        self.b += inc.b * n;
        self.a += inc.a * n;
        self.u += inc.u * n;
        self.v += inc.v * n;
    }

    /// Integer part of the interpolated color
    #[inline(always)]
    pub fn color(&self) -> u32 {
        let channel = |value: i64| ((value >> 16).clamp(0, 255)) as u32;
        channel(self.r) | channel(self.g) << 8 | channel(self.b) << 16 | channel(self.a) << 24
    }

    #[inline(always)]
    pub fn depth(&self) -> u32 {
        (self.z >> 16).clamp(0, u32::MAX as i64) as u32
    }

    #[inline(always)]
    pub fn texel_u(&self) -> i32 {
        (self.u >> 16) as i32
    }

    #[inline(always)]
    pub fn texel_v(&self) -> i32 {
        (self.v >> 16) as i32
    }
}

/// Combine a texel with the vertex color
///
/// | TFX        | RGB                    | Alpha (TCC = 1)    |
/// |------------|------------------------|--------------------|
/// | MODULATE   | `Ct * Cf >> 7`         | `At * Af >> 7`     |
/// | DECAL      | `Ct`                   | `At`               |
/// | HIGHLIGHT  | `(Ct * Cf >> 7) + Af`  | `At + Af`          |
/// | HIGHLIGHT2 | `(Ct * Cf >> 7) + Af`  | `At`               |
///
/// Every result saturates at 255. With TCC = 0 the alpha is `Af`.
///
/// # Examples
///
/// ```
/// use gsrx::core::gs::render::shading::{texture_function, TFX_MODULATE};
///
/// // A vertex color of 0x80 leaves the texel unchanged
/// let texel = 0x40C0_2010;
/// assert_eq!(texture_function(texel, 0x8080_8080, TFX_MODULATE, true), 0x40C0_2010);
/// ```
#[inline(always)]
pub fn texture_function(texel: u32, vertex: u32, tfx: u8, tcc: bool) -> u32 {
    let channel = |c: u32, shift: u32| (c >> shift) & 0xFF;
    let vertex_alpha = channel(vertex, 24);
    let texel_alpha = channel(texel, 24);

    let mut rgb = 0;
    for shift in [0, 8, 16] {
        let t = channel(texel, shift);
        let f = channel(vertex, shift);
        let value = match tfx {
            TFX_MODULATE => (t * f) >> 7,
            TFX_DECAL => t,
            _ => ((t * f) >> 7) + vertex_alpha,
        };
        rgb |= value.min(255) << shift;
    }

    let alpha = if !tcc {
        vertex_alpha
    } else {
        match tfx {
            TFX_MODULATE => ((texel_alpha * vertex_alpha) >> 7).min(255),
            TFX_HIGHLIGHT => (texel_alpha + vertex_alpha).min(255),
            _ => texel_alpha,
        }
    };

    rgb | alpha << 24
}
