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

//! Emulator error types
use thiserror::Error;

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, EmulatorError>;

/// Main error type for the emulator
#[derive(Error, Debug)]
pub enum EmulatorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GS error: {0}")]
    Gs(#[from] GsError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Incompatible save state version: expected {expected}, got {got}")]
    IncompatibleSaveState { expected: u32, got: u32 },

    #[error("Save state encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("Save state decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("Config parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Register dump error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Packet file error: {0}")]
    Packet(String),
}

/// GS-specific error types
#[derive(Error, Debug)]
pub enum GsError {
    #[error("Failed to allocate {size} bytes of local memory")]
    VramAllocation { size: usize },

    #[error("Failed to allocate a texture cache with {slots} slots")]
    CacheAllocation { slots: usize },

    #[error("Invalid privileged register access at 0x{address:08X}")]
    InvalidPrivilegedRegister { address: u32 },

    #[error("Snapshot local memory has {got} words (expected {expected})")]
    SnapshotVramSize { expected: usize, got: usize },

    #[error("Snapshot CLUT buffer has {got} entries (expected {expected})")]
    SnapshotClutSize { expected: usize, got: usize },
}
