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

//! Image transfers
//!
//! Writing TRXDIR starts a transfer described by BITBLTBUF, TRXPOS and
//! TRXREG:
//!
//! - 0: host to local, fed by IMAGE packets or HWREG writes
//! - 1: local to host, drained through [`GS::read_fifo`]
//! - 2: local to local, completed immediately
//! - 3: deactivated
//!
//! Pixels move in raster order inside the transfer rectangle. On the host
//! side they are packed back to back in little-endian order: 4 bytes for
//! 32-bit formats, 3 for 24-bit, 2 for 16-bit, 1 for 8-bit and one nibble
//! (low nibble first) for 4-bit formats. A pixel may straddle two
//! quad-words, so partial pixels are buffered between calls.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use super::format::PixelFormat;
use super::registers::{BitBltBuf, TrxPos, TrxReg};
use super::vram::Vram;
use super::GS;

/// Direction of an image transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum TransferDirection {
    HostToLocal,
    LocalToHost,
    LocalToLocal,
}

/// An image transfer waiting for, or producing, host data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ImageTransfer {
    pub direction: TransferDirection,
    /// Pixel format of the local buffer
    pub format: PixelFormat,
    /// Local buffer base pointer in blocks
    pub base: u32,
    /// Local buffer width in 64-pixel units
    pub bw: u32,
    pub origin_x: u32,
    pub origin_y: u32,
    pub width: u32,
    pub height: u32,
    /// Cursor position of the next pixel
    pub x: u32,
    pub y: u32,
    /// Pixels left to move
    pub remaining: u32,
    /// Bytes of a partial pixel (host to local) or not yet delivered
    /// (local to host)
    pending: Vec<u8>,
}

impl ImageTransfer {
    pub fn new(
        direction: TransferDirection,
        format: PixelFormat,
        base: u32,
        bw: u32,
        origin: (u32, u32),
        size: (u32, u32),
    ) -> Self {
        Self {
            direction,
            format,
            base,
            bw,
            origin_x: origin.0,
            origin_y: origin.1,
            width: size.0,
            height: size.1,
            x: origin.0,
            y: origin.1,
            remaining: size.0 * size.1,
            pending: Vec::new(),
        }
    }

    /// True once every pixel has been moved and no bytes are pending
    pub fn is_finished(&self) -> bool {
        self.remaining == 0 && self.pending.is_empty()
    }

    /// Bytes held back between calls
    pub fn pending_bytes(&self) -> usize {
        self.pending.len()
    }

    /// Claim the cursor position and step to the next pixel
    ///
    /// The cursor returns to the origin column at the end of every row.
    pub fn next_position(&mut self) -> (u32, u32) {
        let position = (self.x, self.y);
        self.x += 1;
        if self.x >= self.origin_x + self.width {
            self.x = self.origin_x;
            self.y += 1;
        }
        self.remaining = self.remaining.saturating_sub(1);
        position
    }

    fn store(&mut self, vram: &mut Vram, value: u32) {
        let (x, y) = self.next_position();
        vram.write_raw(self.format, x, y, self.base, self.bw, value);
    }

    fn load(&mut self, vram: &Vram) -> u32 {
        let (x, y) = self.next_position();
        vram.read_raw(self.format, x, y, self.base, self.bw)
    }

    /// Unpack host bytes into local memory
    ///
    /// # Returns
    ///
    /// Number of trailing bytes that did not fit in the transfer
    pub fn write_host_data(&mut self, vram: &mut Vram, data: &[u8]) -> usize {
        let bits = self.format.transfer_bits();
        let mut used = 0;

        if bits == 4 {
            for &byte in data {
                if self.remaining == 0 {
                    break;
                }
                self.store(vram, (byte & 0xF) as u32);
                if self.remaining > 0 {
                    self.store(vram, (byte >> 4) as u32);
                }
                used += 1;
            }
            return data.len() - used;
        }

        let size = (bits / 8) as usize;
        for &byte in data {
            if self.remaining == 0 {
                break;
            }
            self.pending.push(byte);
            used += 1;
            if self.pending.len() == size {
                let value = self
                    .pending
                    .iter()
                    .rev()
                    .fold(0u32, |acc, &b| (acc << 8) | b as u32);
                self.pending.clear();
                self.store(vram, value);
            }
        }
        data.len() - used
    }

    /// Pack local pixels into host bytes
    ///
    /// # Returns
    ///
    /// Number of bytes written to `out`
    pub fn read_host_data(&mut self, vram: &Vram, out: &mut [u8]) -> usize {
        let mut written = 0;
        while written < out.len() {
            if self.pending.is_empty() {
                if self.remaining == 0 {
                    break;
                }
                self.fetch(vram);
            }
            let n = self.pending.len().min(out.len() - written);
            out[written..written + n].copy_from_slice(&self.pending[..n]);
            self.pending.drain(..n);
            written += n;
        }
        written
    }

    fn fetch(&mut self, vram: &Vram) {
        let bits = self.format.transfer_bits();
        if bits == 4 {
            let low = self.load(vram) & 0xF;
            let high = if self.remaining > 0 {
                self.load(vram) & 0xF
            } else {
                0
            };
            self.pending.push((low | (high << 4)) as u8);
        } else {
            let value = self.load(vram);
            let size = (bits / 8) as usize;
            self.pending.extend_from_slice(&value.to_le_bytes()[..size]);
        }
    }
}

/// Copy a rectangle between two local buffers
///
/// Rows run top to bottom. Columns run right to left when the source lies
/// left of the destination so that overlapping shifts to the right read
/// every pixel before it is overwritten.
pub fn local_to_local(vram: &mut Vram, blit: &BitBltBuf, pos: &TrxPos, size: &TrxReg) {
    let src_format = PixelFormat::from_psm(blit.spsm);
    let dst_format = PixelFormat::from_psm(blit.dpsm);
    let reverse = pos.ssax < pos.dsax;

    for row in 0..size.rrh {
        for i in 0..size.rrw {
            let col = if reverse { size.rrw - 1 - i } else { i };
            let value = vram.read_raw(
                src_format,
                pos.ssax + col,
                pos.ssay + row,
                blit.sbp,
                blit.sbw,
            );
            vram.write_raw(
                dst_format,
                pos.dsax + col,
                pos.dsay + row,
                blit.dbp,
                blit.dbw,
                value,
            );
        }
    }
}

impl GS {
    /// TRXDIR: start or cancel a transfer
    pub(in crate::core::gs) fn start_transfer(&mut self, dir: u8) {
        let blit = self.env.bitbltbuf;
        let pos = self.env.trxpos;
        let size = self.env.trxreg;
        self.transfer = None;

        if dir == 3 {
            log::debug!("Transfer deactivated");
            return;
        }
        if size.rrw == 0 || size.rrh == 0 {
            log::debug!("Empty transfer rectangle {}x{}", size.rrw, size.rrh);
            return;
        }

        match dir {
            0 => {
                let format = PixelFormat::from_psm(blit.dpsm);
                log::debug!(
                    "Host->local transfer: {:?} base 0x{:04X} width {} at ({}, {}) size {}x{}",
                    format,
                    blit.dbp,
                    blit.dbw,
                    pos.dsax,
                    pos.dsay,
                    size.rrw,
                    size.rrh
                );
                self.transfer = Some(ImageTransfer::new(
                    TransferDirection::HostToLocal,
                    format,
                    blit.dbp,
                    blit.dbw,
                    (pos.dsax, pos.dsay),
                    (size.rrw, size.rrh),
                ));
            }
            1 => {
                let format = PixelFormat::from_psm(blit.spsm);
                log::debug!(
                    "Local->host transfer: {:?} base 0x{:04X} width {} at ({}, {}) size {}x{}",
                    format,
                    blit.sbp,
                    blit.sbw,
                    pos.ssax,
                    pos.ssay,
                    size.rrw,
                    size.rrh
                );
                self.transfer = Some(ImageTransfer::new(
                    TransferDirection::LocalToHost,
                    format,
                    blit.sbp,
                    blit.sbw,
                    (pos.ssax, pos.ssay),
                    (size.rrw, size.rrh),
                ));
            }
            _ => {
                log::debug!(
                    "Local->local transfer: 0x{:04X} ({}, {}) -> 0x{:04X} ({}, {}) size {}x{}",
                    blit.sbp,
                    pos.ssax,
                    pos.ssay,
                    blit.dbp,
                    pos.dsax,
                    pos.dsay,
                    size.rrw,
                    size.rrh
                );
                local_to_local(&mut self.vram, &blit, &pos, &size);
                self.texture_cache.invalidate(blit.dbp);
            }
        }
    }

    /// Feed host bytes into the active host-to-local transfer
    pub(in crate::core::gs) fn write_image_data(&mut self, data: &[u8]) {
        let Some(mut transfer) = self.transfer.take() else {
            log::warn!("Image data without an active transfer ({} bytes)", data.len());
            return;
        };
        if transfer.direction != TransferDirection::HostToLocal {
            log::warn!("Image data during a {:?} transfer", transfer.direction);
            self.transfer = Some(transfer);
            return;
        }

        let extra = transfer.write_host_data(&mut self.vram, data);
        if transfer.remaining == 0 {
            if extra > 0 {
                log::warn!("Ignoring {} bytes past the end of the transfer", extra);
            }
            log::debug!("Host->local transfer complete");
            self.texture_cache.invalidate(transfer.base);
        } else {
            self.transfer = Some(transfer);
        }
    }

    /// Drain the active local-to-host transfer into `out`
    ///
    /// The last quad-word of a transfer is zero padded.
    ///
    /// # Returns
    ///
    /// Number of quad-words written
    ///
    /// # Examples
    ///
    /// ```
    /// use gsrx::core::gs::{registers, GS};
    ///
    /// let mut gs = GS::new();
    /// gs.write_register(registers::BITBLTBUF, 1 << 16);
    /// gs.write_register(registers::TRXREG, 4 | (1 << 32));
    /// gs.write_register(registers::TRXDIR, 1);
    ///
    /// let mut out = [0u128; 2];
    /// assert_eq!(gs.read_fifo(&mut out), 1);
    /// assert_eq!(gs.read_fifo(&mut out), 0);
    /// ```
    pub fn read_fifo(&mut self, out: &mut [u128]) -> usize {
        let Some(mut transfer) = self.transfer.take() else {
            log::warn!("Local->host read without an active transfer");
            return 0;
        };
        if transfer.direction != TransferDirection::LocalToHost {
            log::warn!("Local->host read during a {:?} transfer", transfer.direction);
            self.transfer = Some(transfer);
            return 0;
        }

        let mut count = 0;
        for slot in out.iter_mut() {
            let mut bytes = [0u8; 16];
            if transfer.read_host_data(&self.vram, &mut bytes) == 0 {
                break;
            }
            *slot = u128::from_le_bytes(bytes);
            count += 1;
        }

        if transfer.is_finished() {
            log::debug!("Local->host transfer complete");
        } else {
            self.transfer = Some(transfer);
        }
        count
    }

    /// Active transfer, if any
    pub fn active_transfer(&self) -> Option<&ImageTransfer> {
        self.transfer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_wraps_at_rectangle_width() {
        let mut t = ImageTransfer::new(
            TransferDirection::HostToLocal,
            PixelFormat::Ct32,
            0,
            1,
            (2, 3),
            (2, 2),
        );
        assert_eq!(t.next_position(), (2, 3));
        assert_eq!(t.next_position(), (3, 3));
        assert_eq!(t.next_position(), (2, 4));
        assert_eq!(t.next_position(), (3, 4));
        assert_eq!(t.remaining, 0);
    }

    #[test]
    fn test_24bit_pixels_straddle_calls() {
        let mut vram = Vram::new();
        let mut t = ImageTransfer::new(
            TransferDirection::HostToLocal,
            PixelFormat::Ct24,
            0,
            1,
            (0, 0),
            (2, 1),
        );
        assert_eq!(t.write_host_data(&mut vram, &[0x11, 0x22, 0x33, 0x44]), 0);
        assert_eq!(t.pending_bytes(), 1);
        assert_eq!(t.write_host_data(&mut vram, &[0x55, 0x66, 0x77]), 1);
        assert_eq!(vram.read_raw(PixelFormat::Ct24, 0, 0, 0, 1), 0x33_2211);
        assert_eq!(vram.read_raw(PixelFormat::Ct24, 1, 0, 0, 1), 0x66_5544);
    }

    #[test]
    fn test_4bit_low_nibble_first() {
        let mut vram = Vram::new();
        let mut t = ImageTransfer::new(
            TransferDirection::HostToLocal,
            PixelFormat::T4,
            0,
            1,
            (0, 0),
            (3, 1),
        );
        t.write_host_data(&mut vram, &[0x21, 0x43]);
        assert_eq!(vram.read_raw(PixelFormat::T4, 0, 0, 0, 1), 1);
        assert_eq!(vram.read_raw(PixelFormat::T4, 1, 0, 0, 1), 2);
        assert_eq!(vram.read_raw(PixelFormat::T4, 2, 0, 0, 1), 3);
        assert_eq!(t.remaining, 0);
    }

    #[test]
    fn test_read_packs_16bit_pixels() {
        let mut vram = Vram::new();
        vram.write_raw(PixelFormat::Ct16, 0, 0, 0, 1, 0xBEEF);
        vram.write_raw(PixelFormat::Ct16, 1, 0, 0, 1, 0x1234);
        let mut t = ImageTransfer::new(
            TransferDirection::LocalToHost,
            PixelFormat::Ct16,
            0,
            1,
            (0, 0),
            (2, 1),
        );
        let mut out = [0u8; 8];
        assert_eq!(t.read_host_data(&vram, &mut out), 4);
        assert_eq!(&out[..4], &[0xEF, 0xBE, 0x34, 0x12]);
        assert!(t.is_finished());
    }

    #[test]
    fn test_local_shift_right_overlapping() {
        let mut vram = Vram::new();
        for x in 0..4 {
            vram.write_raw(PixelFormat::Ct32, x, 0, 0, 1, x + 1);
        }
        let blit = BitBltBuf {
            sbw: 1,
            dbw: 1,
            ..Default::default()
        };
        let pos = TrxPos {
            ssax: 0,
            dsax: 1,
            ..Default::default()
        };
        local_to_local(&mut vram, &blit, &pos, &TrxReg { rrw: 3, rrh: 1 });
        let row: Vec<u32> = (0..4)
            .map(|x| vram.read_raw(PixelFormat::Ct32, x, 0, 0, 1))
            .collect();
        assert_eq!(row, vec![1, 1, 2, 3]);
    }
}
