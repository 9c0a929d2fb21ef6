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

//! Texture decoding and sampling
//!
//! A texture is decoded in full into an RGBA8 array the first time it is
//! used, so sampling is a wrap computation followed by an array lookup.

use crate::core::gs::registers::{Clamp, Tex0, Texa};
use crate::core::gs::vram::Vram;

use super::clut::ClutBuffer;

/// Decoded texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    width: u32,
    height: u32,
    texels: Vec<u32>,
}

impl Texture {
    /// Decode the texture described by `tex0` to RGBA8
    ///
    /// Direct color formats take their missing alpha from TEXA; indexed
    /// formats go through the CLUT buffer.
    pub fn decode(vram: &Vram, tex0: &Tex0, texa: &Texa, clut: &ClutBuffer) -> Self {
        let width = tex0.width();
        let height = tex0.height();
        let format = tex0.format();

        let mut texels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let texel = vram.read_texel(format, x, y, tex0.tbp0, tex0.tbw, texa);
                texels.push(if format.is_indexed() {
                    clut.lookup(tex0, texel, texa)
                } else {
                    texel
                });
            }
        }

        Self {
            width,
            height,
            texels,
        }
    }

    /// Build a texture from already decoded texels
    pub fn from_texels(width: u32, height: u32, texels: Vec<u32>) -> Self {
        debug_assert_eq!(texels.len(), (width * height) as usize);
        Self {
            width,
            height,
            texels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn texels(&self) -> &[u32] {
        &self.texels
    }

    /// Sample the texel at integer texture coordinates
    ///
    /// # Arguments
    ///
    /// * `u` - Horizontal texel coordinate, any range
    /// * `v` - Vertical texel coordinate, any range
    /// * `clamp` - Wrap modes for both axes
    ///
    /// # Examples
    ///
    /// ```
    /// use gsrx::core::gs::registers::Clamp;
    /// use gsrx::core::gs::texture::Texture;
    ///
    /// let texture = Texture::from_texels(2, 2, vec![1, 2, 3, 4]);
    /// let repeat = Clamp::default();
    /// assert_eq!(texture.sample(3, 0, &repeat), 2);
    ///
    /// let clamp = Clamp { wms: Clamp::CLAMP, wmt: Clamp::CLAMP, ..Default::default() };
    /// assert_eq!(texture.sample(-5, 9, &clamp), 3);
    /// ```
    #[inline(always)]
    pub fn sample(&self, u: i32, v: i32, clamp: &Clamp) -> u32 {
        let x = wrap_coordinate(u, self.width, clamp.wms, clamp.minu, clamp.maxu);
        let y = wrap_coordinate(v, self.height, clamp.wmt, clamp.minv, clamp.maxv);
        self.texels[(y * self.width + x) as usize]
    }
}

/// Apply one wrap mode to a texel coordinate
///
/// The result is always masked into `[0, size)`, including the region
/// modes whose MIN/MAX may lie outside the texture.
#[inline(always)]
pub fn wrap_coordinate(coord: i32, size: u32, mode: u8, min: u32, max: u32) -> u32 {
    let mask = size as i32 - 1;
    let wrapped = match mode {
        Clamp::REPEAT => coord & mask,
        Clamp::CLAMP => coord.clamp(0, mask),
        Clamp::REGION_CLAMP => coord.max(min as i32).min(max as i32),
        _ => (coord & min as i32) | max as i32,
    };
    (wrapped & mask) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_repeat_masks() {
        // UMSK = 0x3, UFIX = 0x4: coordinates cycle through 4..=7
        assert_eq!(wrap_coordinate(0, 16, Clamp::REGION_REPEAT, 3, 4), 4);
        assert_eq!(wrap_coordinate(5, 16, Clamp::REGION_REPEAT, 3, 4), 5);
        assert_eq!(wrap_coordinate(10, 16, Clamp::REGION_REPEAT, 3, 4), 6);
    }

    #[test]
    fn test_region_clamp() {
        assert_eq!(wrap_coordinate(-3, 16, Clamp::REGION_CLAMP, 2, 9), 2);
        assert_eq!(wrap_coordinate(12, 16, Clamp::REGION_CLAMP, 2, 9), 9);
        assert_eq!(wrap_coordinate(5, 16, Clamp::REGION_CLAMP, 2, 9), 5);
    }

    #[test]
    fn test_repeat_handles_negative() {
        assert_eq!(wrap_coordinate(-1, 8, Clamp::REPEAT, 0, 0), 7);
    }
}
