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

//! GS local memory
//!
//! 4 MiB of memory shared by every frame buffer, depth buffer, texture and
//! CLUT. It is stored as 32-bit words; narrower accesses pick the matching
//! little-endian lane of the containing word.

use crate::core::error::{GsError, Result};

/// Owned GS local memory
///
/// All accessors take offsets in their natural unit (word, halfword, byte
/// or nibble) and mask them into range, so any offset is valid.
///
/// # Examples
///
/// ```
/// use gsrx::core::gs::Vram;
///
/// let mut vram = Vram::new();
/// vram.write32(0x10, 0x1122_3344);
/// assert_eq!(vram.read16(0x20), 0x3344);
/// assert_eq!(vram.read8(0x43), 0x11);
/// assert_eq!(vram.read4(0x80), 0x4);
/// ```
#[derive(Clone)]
pub struct Vram {
    words: Vec<u32>,
}

impl Vram {
    /// Local memory size in bytes
    pub const SIZE: usize = 4 * 1024 * 1024;

    /// Local memory size in 32-bit words
    pub const WORDS: usize = Self::SIZE / 4;

    /// Allocate zeroed local memory
    pub fn new() -> Self {
        Self {
            words: vec![0; Self::WORDS],
        }
    }

    /// Allocate zeroed local memory, reporting allocation failure
    ///
    /// # Errors
    ///
    /// Returns `GsError::VramAllocation` if the 4 MiB buffer cannot be reserved.
    pub fn try_new() -> Result<Self> {
        let mut words = Vec::new();
        words
            .try_reserve_exact(Self::WORDS)
            .map_err(|_| GsError::VramAllocation { size: Self::SIZE })?;
        words.resize(Self::WORDS, 0);
        Ok(Self { words })
    }

    /// Rebuild local memory from a word snapshot
    ///
    /// # Errors
    ///
    /// Returns `GsError::SnapshotVramSize` if `words` is not exactly 1M words.
    pub fn from_words(words: Vec<u32>) -> Result<Self> {
        if words.len() != Self::WORDS {
            return Err(GsError::SnapshotVramSize {
                expected: Self::WORDS,
                got: words.len(),
            }
            .into());
        }
        Ok(Self { words })
    }

    /// Raw word view
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Zero the whole memory
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    #[inline(always)]
    pub fn read32(&self, addr: u32) -> u32 {
        self.words[(addr as usize) & (Self::WORDS - 1)]
    }

    #[inline(always)]
    pub fn write32(&mut self, addr: u32, value: u32) {
        self.words[(addr as usize) & (Self::WORDS - 1)] = value;
    }

    /// Read-modify-write of the bits selected by `mask`
    #[inline(always)]
    pub fn write32_masked(&mut self, addr: u32, value: u32, mask: u32) {
        let slot = &mut self.words[(addr as usize) & (Self::WORDS - 1)];
        *slot = (*slot & !mask) | (value & mask);
    }

    #[inline(always)]
    pub fn read16(&self, addr: u32) -> u16 {
        let word = self.read32(addr >> 1);
        (word >> ((addr & 1) * 16)) as u16
    }

    #[inline(always)]
    pub fn write16(&mut self, addr: u32, value: u16) {
        let shift = (addr & 1) * 16;
        self.write32_masked(addr >> 1, (value as u32) << shift, 0xFFFF << shift);
    }

    #[inline(always)]
    pub fn read8(&self, addr: u32) -> u8 {
        let word = self.read32(addr >> 2);
        (word >> ((addr & 3) * 8)) as u8
    }

    #[inline(always)]
    pub fn write8(&mut self, addr: u32, value: u8) {
        let shift = (addr & 3) * 8;
        self.write32_masked(addr >> 2, (value as u32) << shift, 0xFF << shift);
    }

    /// Read a nibble; even nibble addresses select the low half of a byte
    #[inline(always)]
    pub fn read4(&self, addr: u32) -> u8 {
        let word = self.read32(addr >> 3);
        ((word >> ((addr & 7) * 4)) & 0xF) as u8
    }

    #[inline(always)]
    pub fn write4(&mut self, addr: u32, value: u8) {
        let shift = (addr & 7) * 4;
        self.write32_masked(addr >> 3, ((value & 0xF) as u32) << shift, 0xF << shift);
    }

    /// Little-endian byte copy of the whole memory
    pub fn to_bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }
}

impl Default for Vram {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vram_size() {
        let vram = Vram::new();
        assert_eq!(vram.words().len(), 1024 * 1024);
        assert!(vram.words().iter().all(|&w| w == 0));
    }

    #[test]
    fn test_narrow_writes_preserve_neighbours() {
        let mut vram = Vram::new();
        vram.write32(5, 0xAABB_CCDD);
        vram.write16(11, 0x1234);
        assert_eq!(vram.read32(5), 0x1234_CCDD);
        vram.write8(20, 0x99);
        assert_eq!(vram.read32(5), 0x1234_CC99);
        vram.write4(41, 0x7);
        assert_eq!(vram.read32(5), 0x1234_CC79);
    }

    #[test]
    fn test_addresses_are_masked() {
        let mut vram = Vram::new();
        vram.write32(Vram::WORDS as u32 + 3, 0xDEAD_BEEF);
        assert_eq!(vram.read32(3), 0xDEAD_BEEF);
    }

    #[test]
    fn test_from_words_rejects_wrong_size() {
        assert!(Vram::from_words(vec![0; 16]).is_err());
        assert!(Vram::from_words(vec![0; Vram::WORDS]).is_ok());
    }
}
