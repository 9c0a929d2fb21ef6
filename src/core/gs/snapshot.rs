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

//! Snapshot support

use super::texture::ClutBuffer;
use super::vram::Vram;
use super::GS;
use crate::core::error::Result;
use crate::core::save_state::{GsState, StateSave};

impl StateSave for GS {
    type State = GsState;

    fn to_state(&self) -> GsState {
        GsState {
            vram: self.vram.words().to_vec(),
            env: self.env.clone(),
            privileged: self.privileged.to_state(),
            clut: self.clut.entries().to_vec(),
            queue: self.queue.clone(),
            transfer: self.transfer.clone(),
            paths: self.paths,
            frame_count: self.frame_count,
        }
    }

    /// Restore the device, leaving it untouched if the state is malformed
    fn restore_from_state(&mut self, state: &GsState) -> Result<()> {
        let vram = Vram::from_words(state.vram.clone())?;
        let clut = ClutBuffer::from_entries(state.clut.clone())?;

        self.vram = vram;
        self.clut = clut;
        self.env = state.env.clone();
        self.privileged.restore_from_state(&state.privileged);
        self.queue = state.queue.clone();
        self.transfer = state.transfer.clone();
        self.paths = state.paths;
        self.frame_count = state.frame_count;
        self.texture_cache.clear();
        Ok(())
    }
}
