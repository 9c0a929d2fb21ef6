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

//! Privileged (memory-mapped) GS registers
//!
//! These registers are accessed by the host directly rather than through the
//! GIF: display circuit setup, the CSR status/control register, the
//! interrupt mask and the SIGNAL/LABEL ID register.
//!
//! | Address      | Register   |
//! |--------------|------------|
//! | 0x1200_0000  | PMODE      |
//! | 0x1200_0070  | DISPFB1    |
//! | 0x1200_0080  | DISPLAY1   |
//! | 0x1200_0090  | DISPFB2    |
//! | 0x1200_00A0  | DISPLAY2   |
//! | 0x1200_00E0  | BGCOLOR    |
//! | 0x1200_1000  | CSR        |
//! | 0x1200_1010  | IMR        |
//! | 0x1200_1080  | SIGLBLID   |

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::core::error::{GsError, Result};

pub const PMODE: u32 = 0x1200_0000;
pub const SMODE1: u32 = 0x1200_0010;
pub const SMODE2: u32 = 0x1200_0020;
pub const SRFSH: u32 = 0x1200_0030;
pub const SYNCH1: u32 = 0x1200_0040;
pub const SYNCH2: u32 = 0x1200_0050;
pub const SYNCV: u32 = 0x1200_0060;
pub const DISPFB1: u32 = 0x1200_0070;
pub const DISPLAY1: u32 = 0x1200_0080;
pub const DISPFB2: u32 = 0x1200_0090;
pub const DISPLAY2: u32 = 0x1200_00A0;
pub const EXTBUF: u32 = 0x1200_00B0;
pub const EXTDATA: u32 = 0x1200_00C0;
pub const EXTWRITE: u32 = 0x1200_00D0;
pub const BGCOLOR: u32 = 0x1200_00E0;
pub const CSR: u32 = 0x1200_1000;
pub const IMR: u32 = 0x1200_1010;
pub const BUSDIR: u32 = 0x1200_1040;
pub const SIGLBLID: u32 = 0x1200_1080;

bitflags::bitflags! {
    /// CSR: system status and control
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct Csr: u64 {
        const SIGNAL = 1 << 0;
        const FINISH = 1 << 1;
        const HSINT = 1 << 2;
        const VSINT = 1 << 3;
        const EDWINT = 1 << 4;
        const FLUSH = 1 << 8;
        const RESET = 1 << 9;
        const NFIELD = 1 << 12;
        const FIELD = 1 << 13;
    }
}

impl Csr {
    /// Event bits, cleared by writing 1
    pub const EVENTS: Csr = Csr::SIGNAL
        .union(Csr::FINISH)
        .union(Csr::HSINT)
        .union(Csr::VSINT)
        .union(Csr::EDWINT);

    /// FIFO status "empty" as reported in bits 14-15
    const FIFO_EMPTY: u64 = 1 << 14;

    /// Revision (bits 16-23) and ID (bits 24-31) reported on read
    const REV_ID: u64 = (0x1B << 16) | (0x55 << 24);
}

bitflags::bitflags! {
    /// IMR: interrupt mask (1 = masked)
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct Imr: u64 {
        const SIGMSK = 1 << 8;
        const FINISHMSK = 1 << 9;
        const HSMSK = 1 << 10;
        const VSMSK = 1 << 11;
        const EDWMSK = 1 << 12;
    }
}

/// Interrupt raised towards the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GsInterrupt {
    /// SIGNAL register written
    Signal,
    /// FINISH register written
    Finish,
    /// Vertical blank start
    VSync,
}

impl GsInterrupt {
    fn flags(self) -> (Csr, Imr) {
        match self {
            GsInterrupt::Signal => (Csr::SIGNAL, Imr::SIGMSK),
            GsInterrupt::Finish => (Csr::FINISH, Imr::FINISHMSK),
            GsInterrupt::VSync => (Csr::VSINT, Imr::VSMSK),
        }
    }
}

/// Privileged register file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivilegedRegisters {
    /// Plain registers PMODE..BGCOLOR, BUSDIR and SIGLBLID
    values: [u64; Self::PLAIN_COUNT],
    pub csr: Csr,
    pub imr: Imr,
}

impl PrivilegedRegisters {
    const PLAIN_COUNT: usize = 17;

    pub fn new() -> Self {
        Self {
            values: [0; Self::PLAIN_COUNT],
            csr: Csr::empty(),
            imr: Imr::all(),
        }
    }

    /// Index of a plain register in `values`
    fn index(address: u32) -> Option<usize> {
        match address {
            PMODE..=BGCOLOR if address & 0xF == 0 => Some(((address - PMODE) >> 4) as usize),
            BUSDIR => Some(15),
            SIGLBLID => Some(16),
            _ => None,
        }
    }

    fn get(&self, address: u32) -> u64 {
        Self::index(address).map_or(0, |i| self.values[i])
    }

    pub fn pmode(&self) -> u64 {
        self.get(PMODE)
    }

    pub fn dispfb(&self, circuit: usize) -> u64 {
        self.get(if circuit == 0 { DISPFB1 } else { DISPFB2 })
    }

    pub fn display(&self, circuit: usize) -> u64 {
        self.get(if circuit == 0 { DISPLAY1 } else { DISPLAY2 })
    }

    pub fn bgcolor(&self) -> u64 {
        self.get(BGCOLOR)
    }

    pub fn siglblid(&self) -> u64 {
        self.get(SIGLBLID)
    }

    pub fn set_siglblid(&mut self, value: u64) {
        self.values[16] = value;
    }

    /// Read a 64-bit register
    ///
    /// # Errors
    ///
    /// Returns `GsError::InvalidPrivilegedRegister` for unmapped addresses.
    pub fn read64(&self, address: u32) -> Result<u64> {
        match address {
            CSR => Ok(self.csr.bits() | Csr::FIFO_EMPTY | Csr::REV_ID),
            IMR => Ok(self.imr.bits()),
            _ => Self::index(address)
                .map(|i| self.values[i])
                .ok_or_else(|| GsError::InvalidPrivilegedRegister { address }.into()),
        }
    }

    /// Write a 64-bit register
    ///
    /// CSR event bits are acknowledged by writing 1; the RESET bit is
    /// handled by the caller.
    ///
    /// # Errors
    ///
    /// Returns `GsError::InvalidPrivilegedRegister` for unmapped addresses.
    pub fn write64(&mut self, address: u32, value: u64) -> Result<()> {
        match address {
            CSR => {
                let acknowledged = Csr::from_bits_truncate(value) & Csr::EVENTS;
                self.csr.remove(acknowledged);
            }
            IMR => self.imr = Imr::from_bits_truncate(value),
            _ => {
                let i = Self::index(address)
                    .ok_or(GsError::InvalidPrivilegedRegister { address })?;
                self.values[i] = value;
            }
        }
        Ok(())
    }

    /// Read one 32-bit half of a register
    pub fn read32(&self, address: u32) -> Result<u32> {
        let value = self.read64(address & !7)?;
        Ok(if address & 4 != 0 {
            (value >> 32) as u32
        } else {
            value as u32
        })
    }

    /// Write one 32-bit half of a register, keeping the other half
    pub fn write32(&mut self, address: u32, value: u32) -> Result<()> {
        let base = address & !7;
        if matches!(base, CSR | IMR) {
            // Flag registers only have meaningful bits in the low half
            return if address & 4 == 0 {
                self.write64(base, value as u64)
            } else {
                Ok(())
            };
        }

        let current = self.read64(base)?;
        let merged = if address & 4 != 0 {
            (current & 0xFFFF_FFFF) | ((value as u64) << 32)
        } else {
            (current & !0xFFFF_FFFF) | value as u64
        };
        self.write64(base, merged)
    }

    /// Latch an event in CSR
    ///
    /// # Returns
    ///
    /// `true` if the event is not masked by IMR and the host should be
    /// interrupted.
    pub fn raise(&mut self, interrupt: GsInterrupt) -> bool {
        let (event, mask) = interrupt.flags();
        self.csr.insert(event);
        !self.imr.contains(mask)
    }

    /// Toggle the interlace field bit on vsync
    pub fn toggle_field(&mut self) {
        self.csr.toggle(Csr::FIELD);
        self.csr.set(Csr::NFIELD, self.csr.contains(Csr::FIELD));
    }

    pub fn to_state(&self) -> PrivilegedState {
        PrivilegedState {
            values: self.values,
            csr: self.csr.bits(),
            imr: self.imr.bits(),
        }
    }

    pub fn restore_from_state(&mut self, state: &PrivilegedState) {
        self.values = state.values;
        self.csr = Csr::from_bits_truncate(state.csr);
        self.imr = Imr::from_bits_truncate(state.imr);
    }
}

impl Default for PrivilegedRegisters {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable form of [`PrivilegedRegisters`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct PrivilegedState {
    /// Plain registers in address order, BUSDIR and SIGLBLID last
    pub values: [u64; 17],
    pub csr: u64,
    pub imr: u64,
}
