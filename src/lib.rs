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

//! PS2 Graphics Synthesizer emulator core library
//!
//! This library provides a software model of the GS: local memory with
//! every pixel storage mode, the drawing register state machine, GIF packet
//! parsing, primitive assembly, rasterization, the per-pixel test and blend
//! pipeline, texturing with CLUTs, and image transfers.
//!
//! # Example
//!
//! ```
//! use gsrx::core::gs::{registers, PixelFormat, GS};
//!
//! let mut gs = GS::new();
//! gs.write_register(registers::FRAME_1, 1 << 16);
//! gs.write_register(registers::SCISSOR_1, 63 << 16 | 63 << 48);
//! gs.write_register(registers::PRIM, 6); // sprite
//! gs.write_register(registers::RGBAQ, 0xFF00_00FF);
//! gs.write_register(registers::XYZ2, 0);
//! gs.write_register(registers::XYZ2, (16 << 4) | (16 << 4) << 16);
//!
//! assert_eq!(gs.vram().read_pixel(PixelFormat::Ct32, 15, 15, 0, 1), 0xFF00_00FF);
//! ```

pub mod core;
