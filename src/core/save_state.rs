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

//! Save state serialization for the GS
//!
//! A save state captures everything needed to resume drawing exactly where
//! it stopped:
//! - Metadata (timestamp, frame count)
//! - Local memory (all 4 MiB)
//! - Drawing registers of both contexts and the shared registers
//! - Privileged registers
//! - The CLUT buffer
//! - The partially assembled primitive
//! - The active image transfer, including buffered partial pixels
//! - The three GIF lanes
//!
//! Decoded textures are not saved; the texture cache is emptied on restore.
//!
//! # Version Compatibility
//!
//! States are encoded with bincode and carry a version number. Only a state
//! with exactly the current version can be loaded.
//!
//! # Example
//!
//! ```no_run
//! use gsrx::core::gs::GS;
//! use gsrx::core::save_state::SaveState;
//!
//! let mut gs = GS::new();
//! // ... feed packets ...
//!
//! SaveState::from_gs(&gs).save_to_file("frame.state").unwrap();
//!
//! // Later
//! let state = SaveState::load_from_file("frame.state").unwrap();
//! state.apply_to(&mut gs).unwrap();
//! ```

use bincode::{config, Decode, Encode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::core::error::{EmulatorError, Result};
use crate::core::gs::context::DrawingEnv;
use crate::core::gs::primitive::VertexQueue;
use crate::core::gs::privileged::PrivilegedState;
use crate::core::gs::transfer::ImageTransfer;
use crate::core::gs::{GifPath, Vram, GS};

/// Save state version for compatibility checking
///
/// Bump whenever the encoded layout changes.
pub const SAVE_STATE_VERSION: u32 = 1;

/// Complete GS save state
#[derive(Serialize, Deserialize, Encode, Decode)]
pub struct SaveState {
    /// Version number for compatibility checking
    pub version: u32,

    /// Save state metadata
    pub metadata: SaveStateMetadata,

    /// Device state
    pub gs: GsState,
}

/// Save state metadata
#[derive(Serialize, Deserialize, Encode, Decode)]
#[bincode(encode_bounds = "", decode_bounds = "")]
pub struct SaveStateMetadata {
    /// Timestamp when the save state was created
    #[bincode(with_serde)]
    pub timestamp: DateTime<Utc>,

    /// Vsyncs since the last reset at save time
    pub frame_count: u64,
}

/// GS device state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct GsState {
    /// Local memory as little-endian words
    pub vram: Vec<u32>,

    /// Drawing registers
    pub env: DrawingEnv,

    /// Privileged registers
    pub privileged: PrivilegedState,

    /// CLUT buffer entries
    pub clut: Vec<u32>,

    /// Vertices of the primitive being assembled
    pub queue: VertexQueue,

    /// Active image transfer
    pub transfer: Option<ImageTransfer>,

    /// GIF lanes
    pub paths: [GifPath; 3],

    pub frame_count: u64,
}

impl SaveState {
    /// Capture the current state of a GS
    pub fn from_gs(gs: &GS) -> Self {
        let state = gs.to_state();
        Self {
            version: SAVE_STATE_VERSION,
            metadata: SaveStateMetadata {
                timestamp: Utc::now(),
                frame_count: state.frame_count,
            },
            gs: state,
        }
    }

    /// Restore a GS from this state
    ///
    /// # Errors
    ///
    /// Returns an error if the state's buffers have the wrong size.
    pub fn apply_to(&self, gs: &mut GS) -> Result<()> {
        gs.restore_from_state(&self.gs)?;
        log::info!(
            "Save state restored (saved {}, frame {})",
            self.metadata.timestamp,
            self.metadata.frame_count
        );
        Ok(())
    }

    /// Encode the state to bytes
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::encode_to_vec(self, config::standard())?)
    }

    /// Decode a state from bytes and check its version
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails or the version does not match.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (state, _): (SaveState, usize) =
            bincode::decode_from_slice(bytes, config::standard())?;

        if state.version != SAVE_STATE_VERSION {
            return Err(EmulatorError::IncompatibleSaveState {
                expected: SAVE_STATE_VERSION,
                got: state.version,
            });
        }

        Ok(state)
    }

    /// Save state to file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be created
    /// - Serialization fails
    /// - Write operation fails
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let encoded = self.to_bytes()?;
        let mut file = File::create(path.as_ref())?;
        file.write_all(&encoded)?;
        log::info!(
            "Save state written to {} ({} bytes)",
            path.as_ref().display(),
            encoded.len()
        );
        Ok(())
    }

    /// Load state from file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be opened or read
    /// - Deserialization fails
    /// - Version is incompatible
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        Self::from_bytes(&buffer)
    }

    /// Approximate encoded size in bytes
    pub fn estimated_size(&self) -> usize {
        // Varint-encoded VRAM words dominate; everything else is a few KiB
        Vram::SIZE + 16 * 1024
    }
}

/// Trait for components that can be saved and restored
///
/// # Example
///
/// ```
/// use gsrx::core::error::Result;
/// use gsrx::core::save_state::StateSave;
///
/// struct Counter {
///     value: u64,
/// }
///
/// impl StateSave for Counter {
///     type State = u64;
///
///     fn to_state(&self) -> Self::State {
///         self.value
///     }
///
///     fn restore_from_state(&mut self, state: &Self::State) -> Result<()> {
///         self.value = *state;
///         Ok(())
///     }
/// }
/// ```
pub trait StateSave {
    /// The state type for this component
    type State: Serialize + for<'de> Deserialize<'de>;

    /// Convert this component to a saveable state
    fn to_state(&self) -> Self::State;

    /// Restore this component from a saved state
    ///
    /// # Errors
    ///
    /// Returns an error if the state does not fit the component.
    fn restore_from_state(&mut self, state: &Self::State) -> Result<()>;
}
