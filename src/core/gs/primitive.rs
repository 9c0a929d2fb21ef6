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

//! Primitive assembly
//!
//! Every XYZ write completes a vertex from the latched RGBAQ, ST, UV and FOG
//! values. Once the primitive type has enough vertices the primitive is
//! drawn (XYZ2 / XYZF2) or skipped (XYZ3 / XYZF3), and the queue keeps what
//! the next primitive reuses:
//!
//! | Type           | Vertices | Kept after the kick |
//! |----------------|----------|---------------------|
//! | Point          | 1        | none                |
//! | Line           | 2        | none                |
//! | Line strip     | 2        | last                |
//! | Triangle       | 3        | none                |
//! | Triangle strip | 3        | last two            |
//! | Triangle fan   | 3        | first and last      |
//! | Sprite         | 2        | none                |

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use super::context::DrawingContext;
use super::pipeline::PixelPipeline;
use super::registers::{Prim, PrimitiveKind, Tex0, Xyz};
use super::render::{DrawCall, Vertex};
use super::texture::{Texture, TextureKey, TextureUnit};
use super::GS;

/// A vertex together with its perspective texture coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct QueuedVertex {
    pub vertex: Vertex,
    pub s: f32,
    pub t: f32,
    pub q: f32,
}

/// Vertices waiting for the primitive to complete
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct VertexQueue {
    vertices: Vec<QueuedVertex>,
}

impl VertexQueue {
    /// Most vertices any primitive needs
    pub const CAPACITY: usize = 3;

    pub fn new() -> Self {
        Self {
            vertices: Vec::with_capacity(Self::CAPACITY),
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[QueuedVertex] {
        &self.vertices
    }

    pub fn push(&mut self, vertex: QueuedVertex) {
        if self.vertices.len() == Self::CAPACITY {
            self.vertices.remove(0);
        }
        self.vertices.push(vertex);
    }

    /// Drop the vertices the next primitive of `kind` does not reuse
    pub fn advance(&mut self, kind: PrimitiveKind) {
        match kind {
            PrimitiveKind::LineStrip => {
                let keep = self.vertices.len().saturating_sub(1);
                self.vertices.drain(..keep);
            }
            PrimitiveKind::TriangleStrip => {
                let keep = self.vertices.len().saturating_sub(2);
                self.vertices.drain(..keep);
            }
            PrimitiveKind::TriangleFan => {
                if self.vertices.len() >= 3 {
                    self.vertices.remove(1);
                }
            }
            _ => self.vertices.clear(),
        }
    }
}

/// Texel coordinates from ST and Q
///
/// A Q of zero skips the division.
pub fn stq_to_uv(s: f32, t: f32, q: f32, tex0: &Tex0) -> (i32, i32) {
    let (s, t) = if q != 0.0 { (s / q, t / q) } else { (s, t) };
    let u = s * (tex0.width() - 1) as f32;
    let v = t * (tex0.height() - 1) as f32;
    (u as i32, v as i32)
}

impl GS {
    /// XYZ2 / XYZF2 / XYZ3 / XYZF3: complete a vertex
    ///
    /// # Arguments
    ///
    /// * `xyz` - Decoded coordinates, with a fog value for the XYZF forms
    /// * `draw` - Draw the primitive when the vertex completes it
    pub(in crate::core::gs) fn vertex_kick(&mut self, xyz: Xyz, draw: bool) {
        if let Some(f) = xyz.f {
            self.env.fog = f;
        }

        let attributes = self.env.attributes();
        let kind = attributes.kind();
        if kind == PrimitiveKind::Prohibited {
            log::warn!("Vertex kick with prohibited primitive type {}", attributes.prim);
            self.queue.clear();
            return;
        }

        let offset = self.env.contexts[attributes.context()].xyoffset;
        let vertex = Vertex {
            x: (xyz.x as i32 - offset.ofx as i32) >> 4,
            y: (xyz.y as i32 - offset.ofy as i32) >> 4,
            z: xyz.z,
            f: self.env.fog,
            u: (self.env.uv.u >> 4) as i32,
            v: (self.env.uv.v >> 4) as i32,
            rgba: self.env.rgbaq.rgba,
        };
        self.queue.push(QueuedVertex {
            vertex,
            s: self.env.st.s,
            t: self.env.st.t,
            q: self.env.rgbaq.q,
        });

        if self.queue.len() < kind.vertex_count() {
            return;
        }

        if draw {
            log::debug!(
                "Kick {:?} (ctx {}, iip {}, tme {}, abe {})",
                kind,
                attributes.context(),
                attributes.iip,
                attributes.tme,
                attributes.abe
            );
            self.draw_primitive(kind, &attributes);
        }
        self.queue.advance(kind);
    }

    /// Rasterize the primitive held in the queue
    fn draw_primitive(&mut self, kind: PrimitiveKind, attributes: &Prim) {
        if self.config.render_disabled {
            return;
        }

        let ctx = self.env.contexts[attributes.context()];
        let texture = if attributes.tme {
            match self.bind_texture(&ctx) {
                Some(unit) => Some(unit),
                None => return,
            }
        } else {
            None
        };

        let v = self.resolve_vertices(attributes, &ctx.tex0);
        let pipeline = PixelPipeline::new(&self.env, attributes);
        let call = DrawCall {
            pipeline: &pipeline,
            texture: texture.as_ref(),
            gouraud: attributes.iip,
        };
        let vram = &mut self.vram;
        let rasterizer = &mut self.rasterizer;
        let wireframe = self.config.wireframe;

        match kind {
            PrimitiveKind::Point => rasterizer.draw_point(vram, &call, &v[0]),
            PrimitiveKind::Line | PrimitiveKind::LineStrip => {
                rasterizer.draw_line(vram, &call, &v[0], &v[1])
            }
            PrimitiveKind::Triangle | PrimitiveKind::TriangleStrip | PrimitiveKind::TriangleFan => {
                let tri = [v[0], v[1], v[2]];
                if wireframe {
                    rasterizer.draw_triangle_wireframe(vram, &call, &tri);
                } else {
                    rasterizer.draw_triangle(vram, &call, &tri);
                }
            }
            PrimitiveKind::Sprite => {
                if wireframe {
                    rasterizer.draw_sprite_wireframe(vram, &call, &v[0], &v[1]);
                } else {
                    rasterizer.draw_sprite(vram, &call, &v[0], &v[1]);
                }
            }
            PrimitiveKind::Prohibited => {}
        }

        self.texture_cache.invalidate(pipeline.frame_base());
        if pipeline.writes_depth() {
            self.texture_cache.invalidate(pipeline.depth_base());
        }
    }

    /// Queued vertices with final texel coordinates
    ///
    /// STQ coordinates divide by each vertex's own Q when shading is
    /// interpolated and by the Q of the last vertex for flat primitives.
    fn resolve_vertices(&self, attributes: &Prim, tex0: &Tex0) -> [Vertex; VertexQueue::CAPACITY] {
        let queued = self.queue.vertices();
        let mut out = [Vertex::default(); VertexQueue::CAPACITY];
        let flat_q = queued.last().map_or(1.0, |qv| qv.q);

        for (slot, qv) in out.iter_mut().zip(queued) {
            *slot = qv.vertex;
            if attributes.tme && !attributes.fst {
                let q = if attributes.iip { qv.q } else { flat_q };
                let (u, v) = stq_to_uv(qv.s, qv.t, q, tex0);
                slot.u = u;
                slot.v = v;
            }
        }
        out
    }

    /// Decode (or fetch from the cache) the texture of a context
    ///
    /// Returns `None` for texture sizes the hardware cannot address, in
    /// which case the primitive is not drawn.
    fn bind_texture(&mut self, ctx: &DrawingContext) -> Option<TextureUnit> {
        let tex0 = ctx.tex0;
        if !tex0.has_valid_size() {
            log::warn!("Invalid texture size 2^{} x 2^{}, primitive skipped", tex0.tw, tex0.th);
            return None;
        }

        let texa = self.env.texa;
        let key = TextureKey::new(&tex0, &texa, &self.env.texclut);
        let vram = &self.vram;
        let clut = &self.clut;
        let texture = self
            .texture_cache
            .get_or_decode(key, || Texture::decode(vram, &tex0, &texa, clut));

        Some(TextureUnit {
            texture,
            clamp: ctx.clamp,
            tfx: tex0.tfx,
            tcc: tex0.tcc,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queued(x: i32) -> QueuedVertex {
        QueuedVertex {
            vertex: Vertex {
                x,
                ..Default::default()
            },
            s: 0.0,
            t: 0.0,
            q: 1.0,
        }
    }

    fn xs(queue: &VertexQueue) -> Vec<i32> {
        queue.vertices().iter().map(|qv| qv.vertex.x).collect()
    }

    #[test]
    fn test_strip_keeps_last_two() {
        let mut queue = VertexQueue::new();
        for x in 0..3 {
            queue.push(queued(x));
        }
        queue.advance(PrimitiveKind::TriangleStrip);
        assert_eq!(xs(&queue), vec![1, 2]);
    }

    #[test]
    fn test_fan_keeps_first_and_last() {
        let mut queue = VertexQueue::new();
        for x in 0..3 {
            queue.push(queued(x));
        }
        queue.advance(PrimitiveKind::TriangleFan);
        assert_eq!(xs(&queue), vec![0, 2]);
    }

    #[test]
    fn test_line_strip_keeps_last() {
        let mut queue = VertexQueue::new();
        queue.push(queued(4));
        queue.push(queued(5));
        queue.advance(PrimitiveKind::LineStrip);
        assert_eq!(xs(&queue), vec![5]);
    }

    #[test]
    fn test_stq_zero_q_skips_division() {
        let tex0 = Tex0 {
            tw: 4,
            th: 4,
            ..Default::default()
        };
        assert_eq!(stq_to_uv(0.5, 1.0, 0.0, &tex0), (7, 15));
        assert_eq!(stq_to_uv(0.5, 1.0, 2.0, &tex0), (3, 7));
    }
}
