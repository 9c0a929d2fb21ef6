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

//! Texture subsystem
//!
//! - [`clut`]: the internal palette buffer and its load rules
//! - [`sampler`]: texture decoding to RGBA8 and wrap modes
//! - [`cache`]: the decoded texture cache

pub mod cache;
pub mod clut;
pub mod sampler;

use std::rc::Rc;

pub use cache::{TextureCache, TextureKey};
pub use clut::ClutBuffer;
pub use sampler::Texture;

use super::registers::Clamp;

/// Texture binding used while rasterizing one primitive
#[derive(Debug, Clone)]
pub struct TextureUnit {
    pub texture: Rc<Texture>,
    pub clamp: Clamp,
    /// Texture function
    pub tfx: u8,
    /// Take alpha from the texel
    pub tcc: bool,
}

impl TextureUnit {
    #[inline(always)]
    pub fn fetch(&self, u: i32, v: i32) -> u32 {
        self.texture.sample(u, v, &self.clamp)
    }
}
