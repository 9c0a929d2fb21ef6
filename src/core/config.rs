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

//! GS configuration
//!
//! The debug toggles that sit outside the hardware model: render disable,
//! wireframe, full-VRAM display, the texture cache and texture dumping.
//!
//! Settings come from an optional TOML file, then from `GSRX_*` environment
//! variables (a `.env` file is honoured through `dotenvy`).
//!
//! ```toml
//! render_disabled = false
//! wireframe = false
//! vram_dump = false
//! texture_dump_dir = "dumps"
//!
//! [texture_cache]
//! enabled = true
//! slots = 64
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{EmulatorError, Result};
use crate::core::gs::texture::TextureCache;

/// Texture cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureCacheConfig {
    /// Keep decoded textures between primitives
    pub enabled: bool,
    /// Number of cache slots
    pub slots: usize,
}

impl Default for TextureCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            slots: TextureCache::DEFAULT_SLOTS,
        }
    }
}

/// Runtime switches consumed by the rasterizer, sampler and display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GsConfig {
    /// Process every register write but draw nothing
    pub render_disabled: bool,
    /// Draw triangles and sprites as outlines
    pub wireframe: bool,
    /// Present the whole local memory instead of the display circuit
    pub vram_dump: bool,
    pub texture_cache: TextureCacheConfig,
    /// Write every decoded texture as a PAM file into this directory
    pub texture_dump_dir: Option<PathBuf>,
}

impl GsConfig {
    pub const ENV_RENDER_DISABLED: &'static str = "GSRX_RENDER_DISABLED";
    pub const ENV_WIREFRAME: &'static str = "GSRX_WIREFRAME";
    pub const ENV_VRAM_DUMP: &'static str = "GSRX_VRAM_DUMP";
    pub const ENV_TEXTURE_CACHE: &'static str = "GSRX_TEXTURE_CACHE";
    pub const ENV_TEXTURE_CACHE_SLOTS: &'static str = "GSRX_TEXTURE_CACHE_SLOTS";
    pub const ENV_TEXTURE_DUMP_DIR: &'static str = "GSRX_TEXTURE_DUMP_DIR";

    /// Load configuration from a TOML file
    ///
    /// Missing keys take their default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Defaults, optionally overlaid with a file, then the environment
    pub fn from_env(path: Option<&Path>) -> Result<Self> {
        // A missing .env file is not an error
        let _ = dotenvy::dotenv();

        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `GSRX_*` overrides from an arbitrary variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(Self::ENV_RENDER_DISABLED) {
            self.render_disabled = parse_flag(Self::ENV_RENDER_DISABLED, &value)?;
        }
        if let Some(value) = lookup(Self::ENV_WIREFRAME) {
            self.wireframe = parse_flag(Self::ENV_WIREFRAME, &value)?;
        }
        if let Some(value) = lookup(Self::ENV_VRAM_DUMP) {
            self.vram_dump = parse_flag(Self::ENV_VRAM_DUMP, &value)?;
        }
        if let Some(value) = lookup(Self::ENV_TEXTURE_CACHE) {
            self.texture_cache.enabled = parse_flag(Self::ENV_TEXTURE_CACHE, &value)?;
        }
        if let Some(value) = lookup(Self::ENV_TEXTURE_CACHE_SLOTS) {
            self.texture_cache.slots = value.trim().parse().map_err(|_| {
                EmulatorError::Config(format!(
                    "{} must be a slot count, got {:?}",
                    Self::ENV_TEXTURE_CACHE_SLOTS,
                    value
                ))
            })?;
        }
        if let Some(value) = lookup(Self::ENV_TEXTURE_DUMP_DIR) {
            self.texture_dump_dir = if value.is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            };
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(EmulatorError::Config(format!(
            "{} must be a boolean, got {:?}",
            key, value
        ))),
    }
}
