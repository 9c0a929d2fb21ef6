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

//! GS (Graphics Synthesizer) implementation
//!
//! A software model of the GS rendering backend. The host feeds it drawing
//! register writes, GIF packets on three lanes, privileged register
//! accesses and vsync notifications; in response it draws into a 4 MiB
//! local memory that holds every frame buffer, depth buffer, texture and
//! palette.
//!
//! # Data flow
//!
//! ```text
//! GIF packets ──> gif ──> commands ──> primitive ──> render ──> pipeline ──> VRAM
//!                            │                          │
//!                            └──> transfer ──> VRAM     └──> texture (cache, CLUT)
//! ```
//!
//! # Local memory
//!
//! Memory is organised in 8 KiB pages of 32 blocks of 256 bytes. Buffers
//! are described by a base pointer in blocks, a width in 64-pixel units and
//! a pixel storage mode; the mode decides how pixels are swizzled inside
//! pages and blocks (see [`addressing`]). Color and depth buffers alias the
//! same memory with different block orders.
//!
//! # Colors
//!
//! Colors are 32-bit values with R in bits 0-7, G in 8-15, B in 16-23 and
//! A in 24-31. 16-bit pixels are RGBA5551.

pub mod addressing;
mod commands;
pub mod context;
pub mod display;
pub mod format;
pub mod gif;
pub mod pipeline;
pub mod pixel;
pub mod primitive;
pub mod privileged;
pub mod registers;
pub mod render;
mod snapshot;
#[cfg(test)]
mod tests;
pub mod texture;
pub mod transfer;
pub mod vram;

pub use display::{DisplaySink, Frame, VideoMode};
pub use format::PixelFormat;
pub use gif::{GifPath, GifPathId};
pub use privileged::{GsInterrupt, PrivilegedRegisters};
pub use vram::Vram;

use crate::core::config::GsConfig;
use crate::core::error::Result;
use context::DrawingEnv;
use primitive::VertexQueue;
use privileged::Csr;
use render::Rasterizer;
use texture::{ClutBuffer, TextureCache};
use transfer::ImageTransfer;

/// Callback invoked for unmasked SIGNAL, FINISH and VSync events
pub type InterruptHandler = Box<dyn FnMut(GsInterrupt)>;

/// Graphics Synthesizer state
///
/// # Examples
///
/// ```
/// use gsrx::core::gs::{registers, PixelFormat, GS};
///
/// let mut gs = GS::new();
/// gs.write_register(registers::FRAME_1, 1 << 16); // FBW = 1, PSMCT32
/// gs.write_register(registers::SCISSOR_1, 63 << 16 | 63 << 48);
/// gs.write_register(registers::PRIM, 0); // point
/// gs.write_register(registers::RGBAQ, 0xFF00_FF00);
/// gs.write_register(registers::XYZ2, (4 << 4) | (2 << 4) << 16);
///
/// assert_eq!(gs.vram().read_pixel(PixelFormat::Ct32, 4, 2, 0, 1), 0xFF00_FF00);
/// ```
pub struct GS {
    /// Local memory shared by every buffer, texture and palette
    pub(in crate::core::gs) vram: Vram,

    /// Drawing registers, both contexts included
    pub(in crate::core::gs) env: DrawingEnv,

    /// Privileged (memory mapped) registers
    pub(in crate::core::gs) privileged: PrivilegedRegisters,

    /// Palette loaded from local memory by TEX0.CLD
    pub(in crate::core::gs) clut: ClutBuffer,

    /// Vertices of the primitive being assembled
    pub(in crate::core::gs) queue: VertexQueue,

    /// Active image transfer
    pub(in crate::core::gs) transfer: Option<ImageTransfer>,

    /// Per-lane GIF parsing state
    pub(in crate::core::gs) paths: [GifPath; 3],

    pub(in crate::core::gs) rasterizer: Rasterizer,

    /// Decoded textures keyed by their descriptor
    pub(in crate::core::gs) texture_cache: TextureCache,

    pub(in crate::core::gs) config: GsConfig,

    /// Bound display collaborator
    display: Option<Box<dyn DisplaySink>>,

    video_mode: VideoMode,

    interrupt_handler: Option<InterruptHandler>,

    /// Number of vsyncs since the last reset
    pub(in crate::core::gs) frame_count: u64,
}

impl GS {
    /// Create a GS with the default configuration
    ///
    /// Allocation failures abort like any other `Vec` allocation; use
    /// [`GS::try_new`] to handle them.
    pub fn new() -> Self {
        Self::with_parts(Vram::new(), GsConfig::default(), TextureCache::default())
    }

    /// Create a GS for a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if local memory cannot be allocated or the texture
    /// cache is enabled with zero slots.
    pub fn try_new(config: GsConfig) -> Result<Self> {
        let vram = Vram::try_new()?;
        let mut cache =
            TextureCache::try_new(config.texture_cache.slots, config.texture_cache.enabled)?;
        cache.set_dump_dir(config.texture_dump_dir.clone());
        log::info!(
            "GS initialized (texture cache {} with {} slots)",
            if cache.is_enabled() { "on" } else { "off" },
            cache.capacity()
        );
        Ok(Self::with_parts(vram, config, cache))
    }

    fn with_parts(vram: Vram, config: GsConfig, texture_cache: TextureCache) -> Self {
        Self {
            vram,
            env: DrawingEnv::new(),
            privileged: PrivilegedRegisters::new(),
            clut: ClutBuffer::new(),
            queue: VertexQueue::new(),
            transfer: None,
            paths: [GifPath::default(); 3],
            rasterizer: Rasterizer::new(),
            texture_cache,
            config,
            display: None,
            video_mode: VideoMode::default(),
            interrupt_handler: None,
            frame_count: 0,
        }
    }

    /// Reset every register and clear local memory
    pub fn reset(&mut self) {
        self.reset_state_preserving_vram();
        self.vram.clear();
        log::info!("GS reset");
    }

    /// Reset every register, keeping local memory (CSR.RESET)
    pub(in crate::core::gs) fn reset_state_preserving_vram(&mut self) {
        self.env = DrawingEnv::new();
        self.privileged = PrivilegedRegisters::new();
        self.clut.clear();
        self.queue.clear();
        self.transfer = None;
        self.paths = [GifPath::default(); 3];
        self.texture_cache.clear();
        self.frame_count = 0;
    }

    /// Bind a display and the video timing it runs at
    pub fn open(&mut self, display: Box<dyn DisplaySink>, mode: VideoMode) {
        log::info!("GS display opened ({:?}, {} Hz)", mode, mode.refresh_rate());
        self.display = Some(display);
        self.video_mode = mode;
    }

    /// Unbind the display
    pub fn close(&mut self) {
        if self.display.take().is_some() {
            log::info!("GS display closed");
        }
    }

    pub fn is_open(&self) -> bool {
        self.display.is_some()
    }

    pub fn video_mode(&self) -> VideoMode {
        self.video_mode
    }

    /// Install the host interrupt callback
    pub fn set_interrupt_handler(&mut self, handler: InterruptHandler) {
        self.interrupt_handler = Some(handler);
    }

    /// Latch an event in CSR and call the host unless IMR masks it
    pub(in crate::core::gs) fn raise_interrupt(&mut self, interrupt: GsInterrupt) {
        if self.privileged.raise(interrupt) {
            if let Some(handler) = self.interrupt_handler.as_mut() {
                handler(interrupt);
            }
        }
    }

    /// Vertical blank: advance the frame and present it
    pub fn vsync(&mut self) {
        self.frame_count += 1;
        self.privileged.toggle_field();
        self.raise_interrupt(GsInterrupt::VSync);

        if self.display.is_some() {
            let frame = self.framebuffer();
            if let Some(display) = self.display.as_mut() {
                display.present(&frame);
            }
        }
        log::trace!("VSync, frame {}", self.frame_count);
    }

    /// The frame the display would show now
    pub fn framebuffer(&self) -> Frame {
        if self.config.vram_dump {
            display::vram_dump_frame(&self.vram)
        } else {
            display::build_frame(&self.vram, &self.privileged)
        }
    }

    /// Read a 64-bit privileged register
    ///
    /// # Errors
    ///
    /// Returns an error for unmapped addresses.
    pub fn read_privileged64(&self, address: u32) -> Result<u64> {
        self.privileged.read64(address)
    }

    /// Write a 64-bit privileged register
    ///
    /// # Errors
    ///
    /// Returns an error for unmapped addresses.
    pub fn write_privileged64(&mut self, address: u32, value: u64) -> Result<()> {
        log::trace!("GS privileged 0x{:08X} <- 0x{:016X}", address, value);
        self.privileged.write64(address, value)?;
        self.check_csr_reset(address, value);
        Ok(())
    }

    /// Read a 32-bit half of a privileged register
    ///
    /// # Errors
    ///
    /// Returns an error for unmapped addresses.
    pub fn read_privileged32(&self, address: u32) -> Result<u32> {
        self.privileged.read32(address)
    }

    /// Write a 32-bit half of a privileged register
    ///
    /// # Errors
    ///
    /// Returns an error for unmapped addresses.
    pub fn write_privileged32(&mut self, address: u32, value: u32) -> Result<()> {
        log::trace!("GS privileged 0x{:08X} <- 0x{:08X}", address, value);
        self.privileged.write32(address, value)?;
        self.check_csr_reset(address, value as u64);
        Ok(())
    }

    fn check_csr_reset(&mut self, address: u32, value: u64) {
        if address == privileged::CSR && Csr::from_bits_truncate(value).contains(Csr::RESET) {
            log::info!("GS reset through CSR");
            self.reset_state_preserving_vram();
        }
    }

    pub fn vram(&self) -> &Vram {
        &self.vram
    }

    pub fn vram_mut(&mut self) -> &mut Vram {
        &mut self.vram
    }

    pub fn env(&self) -> &DrawingEnv {
        &self.env
    }

    pub fn privileged(&self) -> &PrivilegedRegisters {
        &self.privileged
    }

    pub fn clut(&self) -> &ClutBuffer {
        &self.clut
    }

    pub fn config(&self) -> &GsConfig {
        &self.config
    }

    /// Replace the debug switches
    ///
    /// Texture cache sizing only takes effect through [`GS::try_new`].
    pub fn set_config(&mut self, config: GsConfig) {
        self.texture_cache.set_dump_dir(config.texture_dump_dir.clone());
        self.config = config;
    }

    pub fn texture_cache(&self) -> &TextureCache {
        &self.texture_cache
    }

    pub fn texture_cache_mut(&mut self) -> &mut TextureCache {
        &mut self.texture_cache
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for GS {
    fn default() -> Self {
        Self::new()
    }
}
