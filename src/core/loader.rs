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

//! GIF packet dump loading
//!
//! A packet dump is the raw data a host sent down one GIF lane: a sequence
//! of 128-bit quad-words stored little-endian, back to back, with no header.
//!
//! ```text
//! 0x00-0x0F: quad-word 0 (usually a GIF tag)
//! 0x10-0x1F: quad-word 1
//! ...
//! ```
//!
//! # Example
//!
//! ```
//! use gsrx::core::loader::PacketDump;
//!
//! let dump = PacketDump::parse(&[0u8; 32]).unwrap();
//! assert_eq!(dump.qwords().len(), 2);
//! assert!(PacketDump::parse(&[0u8; 17]).is_err());
//! ```

use std::path::Path;

use super::error::{EmulatorError, Result};

/// Size of one quad-word in bytes
pub const QWORD_SIZE: usize = 16;

/// Quad-words read from a packet dump
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacketDump {
    qwords: Vec<u128>,
}

impl PacketDump {
    pub fn new(qwords: Vec<u128>) -> Self {
        Self { qwords }
    }

    /// Parse dump bytes
    ///
    /// # Errors
    ///
    /// Returns `EmulatorError::Packet` if the length is not a whole number
    /// of quad-words.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() % QWORD_SIZE != 0 {
            return Err(EmulatorError::Packet(format!(
                "dump length {} is not a multiple of {}",
                data.len(),
                QWORD_SIZE
            )));
        }

        let qwords = data
            .chunks_exact(QWORD_SIZE)
            .map(|chunk| {
                let mut bytes = [0u8; QWORD_SIZE];
                bytes.copy_from_slice(chunk);
                u128::from_le_bytes(bytes)
            })
            .collect();
        Ok(Self { qwords })
    }

    /// Read and parse a dump file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is malformed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        let dump = Self::parse(&data)?;
        log::info!(
            "Loaded {} quad-words from {}",
            dump.qwords.len(),
            path.as_ref().display()
        );
        Ok(dump)
    }

    /// Encode back to dump bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        self.qwords.iter().flat_map(|q| q.to_le_bytes()).collect()
    }

    /// Write the dump to a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_bytes())?;
        Ok(())
    }

    pub fn qwords(&self) -> &[u128] {
        &self.qwords
    }
}
