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

//! Decoded texture cache
//!
//! Decoding a texture (and expanding its palette) is far more expensive than
//! sampling it, so decoded textures are kept in a fixed number of slots keyed
//! by the exact texture description.
//!
//! Replacement picks the first free slot, otherwise the slot that was filled
//! longest ago. An entry is invalidated when a transfer or a draw writes to a
//! buffer whose base pointer equals the entry's texture base pointer, or its
//! CLUT base pointer for indexed textures. Partial overlaps with a different
//! base are not detected. Indexed textures are expanded through the CLUT
//! buffer, so every CLUT load drops all of them.

use std::path::PathBuf;
use std::rc::Rc;

use crate::core::error::{GsError, Result};
use crate::core::gs::display::save_pam;
use crate::core::gs::format::PixelFormat;
use crate::core::gs::registers::{Tex0, TexClut, Texa};

use super::sampler::Texture;

/// Everything that determines the decoded texels of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureKey {
    pub tbp0: u32,
    pub tbw: u32,
    pub psm: u8,
    pub tw: u8,
    pub th: u8,
    pub cbp: u32,
    pub cpsm: u8,
    pub csm: bool,
    pub csa: u8,
    pub texa: Texa,
    pub texclut: TexClut,
}

impl TextureKey {
    pub fn new(tex0: &Tex0, texa: &Texa, texclut: &TexClut) -> Self {
        Self {
            tbp0: tex0.tbp0,
            tbw: tex0.tbw,
            psm: tex0.psm,
            tw: tex0.tw,
            th: tex0.th,
            cbp: tex0.cbp,
            cpsm: tex0.cpsm,
            csm: tex0.csm,
            csa: tex0.csa,
            texa: *texa,
            texclut: *texclut,
        }
    }

    /// True if the texels depend on the CLUT
    pub fn uses_clut(&self) -> bool {
        PixelFormat::try_from_psm(self.psm).is_some_and(PixelFormat::is_indexed)
    }
}

struct CacheEntry {
    key: TextureKey,
    texture: Rc<Texture>,
    /// Fill order, used to find the oldest slot
    stamp: u64,
}

/// Hook invoked every time a texture is decoded
pub type ExpansionHook = Box<dyn FnMut(&TextureKey)>;

/// Fixed-size decoded texture cache
pub struct TextureCache {
    slots: Vec<Option<CacheEntry>>,
    enabled: bool,
    clock: u64,
    expansions: u64,
    on_expand: Option<ExpansionHook>,
    dump_dir: Option<PathBuf>,
}

impl TextureCache {
    /// Default number of slots
    pub const DEFAULT_SLOTS: usize = 64;

    /// Create a cache with `slots` entries
    ///
    /// # Errors
    ///
    /// Returns `GsError::CacheAllocation` if the slot table cannot be
    /// allocated or `slots` is zero while the cache is enabled.
    pub fn try_new(slots: usize, enabled: bool) -> Result<Self> {
        if enabled && slots == 0 {
            return Err(GsError::CacheAllocation { slots }.into());
        }

        let mut table = Vec::new();
        table
            .try_reserve_exact(slots)
            .map_err(|_| GsError::CacheAllocation { slots })?;
        table.resize_with(slots, || None);

        Ok(Self {
            slots: table,
            enabled,
            clock: 0,
            expansions: 0,
            on_expand: None,
            dump_dir: None,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of slots in the table
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of texture decodes performed
    pub fn expansions(&self) -> u64 {
        self.expansions
    }

    /// Install a callback invoked on every decode
    pub fn set_expansion_hook(&mut self, hook: ExpansionHook) {
        self.on_expand = Some(hook);
    }

    /// Write every decoded texture as a PAM file into `dir`
    pub fn set_dump_dir(&mut self, dir: Option<PathBuf>) {
        self.dump_dir = dir;
    }

    /// Return the cached texture for `key`, decoding it on a miss
    ///
    /// With the cache disabled every call decodes.
    pub fn get_or_decode<F>(&mut self, key: TextureKey, decode: F) -> Rc<Texture>
    where
        F: FnOnce() -> Texture,
    {
        if self.enabled {
            let hit = self
                .slots
                .iter()
                .flatten()
                .find(|entry| entry.key == key)
                .map(|entry| Rc::clone(&entry.texture));
            if let Some(texture) = hit {
                return texture;
            }
        }

        let texture = Rc::new(decode());
        self.expansions += 1;
        if let Some(hook) = self.on_expand.as_mut() {
            hook(&key);
        }
        self.dump(&key, &texture);

        if self.enabled {
            let slot = self.victim();
            self.clock += 1;
            self.slots[slot] = Some(CacheEntry {
                key,
                texture: Rc::clone(&texture),
                stamp: self.clock,
            });
        }

        texture
    }

    /// Drop every entry whose texture or CLUT lives at `base`
    pub fn invalidate(&mut self, base: u32) {
        for slot in self.slots.iter_mut() {
            if slot
                .as_ref()
                .is_some_and(|entry| {
                    entry.key.tbp0 == base || (entry.key.uses_clut() && entry.key.cbp == base)
                })
            {
                log::trace!("Texture cache: invalidate entry at base 0x{:04X}", base);
                *slot = None;
            }
        }
    }

    /// Drop every entry decoded through the CLUT buffer
    pub fn invalidate_clut(&mut self) {
        for slot in self.slots.iter_mut() {
            if slot.as_ref().is_some_and(|entry| entry.key.uses_clut()) {
                *slot = None;
            }
        }
        log::trace!("Texture cache: CLUT reloaded, indexed entries dropped");
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
    }

    /// First free slot, otherwise the oldest one
    fn victim(&self) -> usize {
        if let Some(free) = self.slots.iter().position(|slot| slot.is_none()) {
            return free;
        }
        self.slots
            .iter()
            .enumerate()
            .min_by_key(|(_, slot)| slot.as_ref().map_or(0, |entry| entry.stamp))
            .map_or(0, |(index, _)| index)
    }

    fn dump(&self, key: &TextureKey, texture: &Texture) {
        let Some(dir) = &self.dump_dir else {
            return;
        };

        let path = dir.join(format!(
            "tex_{:04x}_{:02x}_{}x{}_{:05}.pam",
            key.tbp0,
            key.psm,
            texture.width(),
            texture.height(),
            self.expansions
        ));
        if let Err(e) = save_pam(&path, texture.width(), texture.height(), texture.texels()) {
            log::warn!("Failed to dump texture to {}: {}", path.display(), e);
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self {
            slots: (0..Self::DEFAULT_SLOTS).map(|_| None).collect(),
            enabled: true,
            clock: 0,
            expansions: 0,
            on_expand: None,
            dump_dir: None,
        }
    }
}
