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

//! Local memory swizzle addressing
//!
//! The GS does not store surfaces row-major. Local memory is split into 8 KiB
//! pages, each page into 32 blocks of 256 bytes, and each block into 4
//! columns. The order in which blocks appear inside a page and the order in
//! which pixels appear inside a block both depend on the pixel storage mode.
//!
//! # Units
//!
//! - Base pointers (`bp`) are expressed in blocks (64 words)
//! - Buffer widths (`bw`) are expressed in units of 64 pixels
//!
//! # Return values
//!
//! Each function returns an offset in the natural unit of its format:
//!
//! | Function       | Unit      | Page size   | Block size |
//! |----------------|-----------|-------------|------------|
//! | `address_32`   | word      | 64×32       | 8×8        |
//! | `address_16`   | halfword  | 64×64       | 16×8       |
//! | `address_8`    | byte      | 128×64      | 16×16      |
//! | `address_4`    | nibble    | 128×128     | 32×16      |
//!
//! The depth variants share the page geometry of their color counterparts but
//! use their own block tables and a linear in-block pixel order, so the same
//! (x, y) lands on a different offset depending on whether the memory is
//! treated as a color or a depth buffer.
//!
//! No bounds checking is performed on the coordinates. The returned offset is
//! masked so that it always stays inside the 4 MiB local memory.
//!
//! # References
//!
//! - GS User's Manual, section 8 "Local Memory"

/// Number of 32-bit words in local memory
const WORD_MASK: u32 = (1 << 20) - 1;

/// Number of 16-bit halfwords in local memory
const HALF_MASK: u32 = (1 << 21) - 1;

/// Number of bytes in local memory
const BYTE_MASK: u32 = (1 << 22) - 1;

/// Number of nibbles in local memory
const NIBBLE_MASK: u32 = (1 << 23) - 1;

/// Block order inside a PSMCT32 page (also used by PSMT8)
pub const BLOCK_TABLE_32: [[u8; 8]; 4] = [
    [0, 1, 4, 5, 16, 17, 20, 21],
    [2, 3, 6, 7, 18, 19, 22, 23],
    [8, 9, 12, 13, 24, 25, 28, 29],
    [10, 11, 14, 15, 26, 27, 30, 31],
];

/// Block order inside a PSMZ32 page
pub const BLOCK_TABLE_32Z: [[u8; 8]; 4] = [
    [24, 25, 28, 29, 8, 9, 12, 13],
    [26, 27, 30, 31, 10, 11, 14, 15],
    [16, 17, 20, 21, 0, 1, 4, 5],
    [18, 19, 22, 23, 2, 3, 6, 7],
];

/// Block order inside a PSMCT16 page (also used by PSMT4)
pub const BLOCK_TABLE_16: [[u8; 4]; 8] = [
    [0, 2, 8, 10],
    [1, 3, 9, 11],
    [4, 6, 12, 14],
    [5, 7, 13, 15],
    [16, 18, 24, 26],
    [17, 19, 25, 27],
    [20, 22, 28, 30],
    [21, 23, 29, 31],
];

/// Block order inside a PSMCT16S page
pub const BLOCK_TABLE_16S: [[u8; 4]; 8] = [
    [0, 2, 16, 18],
    [1, 3, 17, 19],
    [8, 10, 24, 26],
    [9, 11, 25, 27],
    [4, 6, 20, 22],
    [5, 7, 21, 23],
    [12, 14, 28, 30],
    [13, 15, 29, 31],
];

/// Block order inside a PSMZ16 page
pub const BLOCK_TABLE_16Z: [[u8; 4]; 8] = [
    [24, 26, 16, 18],
    [25, 27, 17, 19],
    [28, 30, 20, 22],
    [29, 31, 21, 23],
    [8, 10, 0, 2],
    [9, 11, 1, 3],
    [12, 14, 4, 6],
    [13, 15, 5, 7],
];

/// Block order inside a PSMZ16S page
pub const BLOCK_TABLE_16SZ: [[u8; 4]; 8] = [
    [24, 26, 8, 10],
    [25, 27, 9, 11],
    [16, 18, 0, 2],
    [17, 19, 1, 3],
    [28, 30, 12, 14],
    [29, 31, 13, 15],
    [20, 22, 4, 6],
    [21, 23, 5, 7],
];

/// Word order inside a PSMCT32 block
pub const COLUMN_TABLE_32: [[u8; 8]; 8] = [
    [0, 1, 4, 5, 8, 9, 12, 13],
    [2, 3, 6, 7, 10, 11, 14, 15],
    [16, 17, 20, 21, 24, 25, 28, 29],
    [18, 19, 22, 23, 26, 27, 30, 31],
    [32, 33, 36, 37, 40, 41, 44, 45],
    [34, 35, 38, 39, 42, 43, 46, 47],
    [48, 49, 52, 53, 56, 57, 60, 61],
    [50, 51, 54, 55, 58, 59, 62, 63],
];

/// Halfword order inside a PSMCT16 block
pub const COLUMN_TABLE_16: [[u8; 16]; 8] = [
    [0, 2, 8, 10, 16, 18, 24, 26, 1, 3, 9, 11, 17, 19, 25, 27],
    [4, 6, 12, 14, 20, 22, 28, 30, 5, 7, 13, 15, 21, 23, 29, 31],
    [32, 34, 40, 42, 48, 50, 56, 58, 33, 35, 41, 43, 49, 51, 57, 59],
    [36, 38, 44, 46, 52, 54, 60, 62, 37, 39, 45, 47, 53, 55, 61, 63],
    [64, 66, 72, 74, 80, 82, 88, 90, 65, 67, 73, 75, 81, 83, 89, 91],
    [68, 70, 76, 78, 84, 86, 92, 94, 69, 71, 77, 79, 85, 87, 93, 95],
    [96, 98, 104, 106, 112, 114, 120, 122, 97, 99, 105, 107, 113, 115, 121, 123],
    [100, 102, 108, 110, 116, 118, 124, 126, 101, 103, 109, 111, 117, 119, 125, 127],
];

/// First two columns of a PSMT8 block; the last two repeat them 128 bytes later
const COLUMN_TABLE_8_HALF: [[u8; 16]; 8] = [
    [0, 4, 16, 20, 32, 36, 48, 52, 2, 6, 18, 22, 34, 38, 50, 54],
    [8, 12, 24, 28, 40, 44, 56, 60, 10, 14, 26, 30, 42, 46, 58, 62],
    [33, 37, 49, 53, 1, 5, 17, 21, 35, 39, 51, 55, 3, 7, 19, 23],
    [41, 45, 57, 61, 9, 13, 25, 29, 43, 47, 59, 63, 11, 15, 27, 31],
    [96, 100, 112, 116, 64, 68, 80, 84, 98, 102, 114, 118, 66, 70, 82, 86],
    [104, 108, 120, 124, 72, 76, 88, 92, 106, 110, 122, 126, 74, 78, 90, 94],
    [65, 69, 81, 85, 97, 101, 113, 117, 67, 71, 83, 87, 99, 103, 115, 119],
    [73, 77, 89, 93, 105, 109, 121, 125, 75, 79, 91, 95, 107, 111, 123, 127],
];

/// First two columns of a PSMT4 block; the last two repeat them 256 nibbles later
const COLUMN_TABLE_4_HALF: [[u16; 32]; 8] = [
    [
        0, 8, 32, 40, 64, 72, 96, 104, 2, 10, 34, 42, 66, 74, 98, 106, 4, 12, 36, 44, 68, 76, 100,
        108, 6, 14, 38, 46, 70, 78, 102, 110,
    ],
    [
        16, 24, 48, 56, 80, 88, 112, 120, 18, 26, 50, 58, 82, 90, 114, 122, 20, 28, 52, 60, 84, 92,
        116, 124, 22, 30, 54, 62, 86, 94, 118, 126,
    ],
    [
        65, 73, 97, 105, 1, 9, 33, 41, 67, 75, 99, 107, 3, 11, 35, 43, 69, 77, 101, 109, 5, 13, 37,
        45, 71, 79, 103, 111, 7, 15, 39, 47,
    ],
    [
        81, 89, 113, 121, 17, 25, 49, 57, 83, 91, 115, 123, 19, 27, 51, 59, 85, 93, 117, 125, 21,
        29, 53, 61, 87, 95, 119, 127, 23, 31, 55, 63,
    ],
    [
        192, 200, 224, 232, 128, 136, 160, 168, 194, 202, 226, 234, 130, 138, 162, 170, 196, 204,
        228, 236, 132, 140, 164, 172, 198, 206, 230, 238, 134, 142, 166, 174,
    ],
    [
        208, 216, 240, 248, 144, 152, 176, 184, 210, 218, 242, 250, 146, 154, 178, 186, 212, 220,
        244, 252, 148, 156, 180, 188, 214, 222, 246, 254, 150, 158, 182, 190,
    ],
    [
        129, 137, 161, 169, 193, 201, 225, 233, 131, 139, 163, 171, 195, 203, 227, 235, 133, 141,
        165, 173, 197, 205, 229, 237, 135, 143, 167, 175, 199, 207, 231, 239,
    ],
    [
        145, 153, 177, 185, 209, 217, 241, 249, 147, 155, 179, 187, 211, 219, 243, 251, 149, 157,
        181, 189, 213, 221, 245, 253, 151, 159, 183, 191, 215, 223, 247, 255,
    ],
];

/// Byte order inside a PSMT8 block
pub const COLUMN_TABLE_8: [[u8; 16]; 16] = expand_column_table_8();

/// Nibble order inside a PSMT4 block
pub const COLUMN_TABLE_4: [[u16; 32]; 16] = expand_column_table_4();

const fn expand_column_table_8() -> [[u8; 16]; 16] {
    let mut table = [[0u8; 16]; 16];
    let mut y = 0;
    while y < 16 {
        let mut x = 0;
        while x < 16 {
            let base = COLUMN_TABLE_8_HALF[y & 7][x];
            table[y][x] = if y < 8 { base } else { base + 128 };
            x += 1;
        }
        y += 1;
    }
    table
}

const fn expand_column_table_4() -> [[u16; 32]; 16] {
    let mut table = [[0u16; 32]; 16];
    let mut y = 0;
    while y < 16 {
        let mut x = 0;
        while x < 32 {
            let base = COLUMN_TABLE_4_HALF[y & 7][x];
            table[y][x] = if y < 8 { base } else { base + 256 };
            x += 1;
        }
        y += 1;
    }
    table
}

/// Block index of the page containing (x, y) for 32-bit layouts
#[inline(always)]
fn page_32(x: u32, y: u32, bp: u32, bw: u32) -> u32 {
    bp.wrapping_add((y & !0x1f).wrapping_mul(bw))
        .wrapping_add((x >> 1) & !0x1f)
}

/// Block index of the page containing (x, y) for 16-bit layouts
#[inline(always)]
fn page_16(x: u32, y: u32, bp: u32, bw: u32) -> u32 {
    bp.wrapping_add(((y >> 1) & !0x1f).wrapping_mul(bw))
        .wrapping_add((x >> 1) & !0x1f)
}

/// PSMCT32 / PSMCT24 / PSMT8H / PSMT4HL / PSMT4HH word address
///
/// # Arguments
///
/// * `x` - X coordinate in pixels
/// * `y` - Y coordinate in pixels
/// * `bp` - Base pointer in blocks
/// * `bw` - Buffer width in 64-pixel units
///
/// # Returns
///
/// Word offset into local memory
///
/// # Examples
///
/// ```
/// use gsrx::core::gs::addressing::address_32;
///
/// assert_eq!(address_32(0, 0, 0, 1), 0);
/// assert_eq!(address_32(1, 0, 0, 1), 1);
/// assert_eq!(address_32(0, 1, 0, 1), 2);
/// // Second block of the page starts at word 64
/// assert_eq!(address_32(8, 0, 0, 1), 64);
/// ```
#[inline(always)]
pub fn address_32(x: u32, y: u32, bp: u32, bw: u32) -> u32 {
    let page = page_32(x, y, bp, bw);
    let block = BLOCK_TABLE_32[((y >> 3) & 3) as usize][((x >> 3) & 7) as usize] as u32;
    let column = COLUMN_TABLE_32[(y & 7) as usize][(x & 7) as usize] as u32;
    ((page.wrapping_add(block) << 6) + column) & WORD_MASK
}

/// PSMZ32 / PSMZ24 word address
#[inline(always)]
pub fn address_32z(x: u32, y: u32, bp: u32, bw: u32) -> u32 {
    let page = page_32(x, y, bp, bw);
    let block = BLOCK_TABLE_32Z[((y >> 3) & 3) as usize][((x >> 3) & 7) as usize] as u32;
    ((page.wrapping_add(block) << 6) + ((y & 7) << 3) + (x & 7)) & WORD_MASK
}

/// PSMCT16 halfword address
#[inline(always)]
pub fn address_16(x: u32, y: u32, bp: u32, bw: u32) -> u32 {
    let page = page_16(x, y, bp, bw);
    let block = BLOCK_TABLE_16[((y >> 3) & 7) as usize][((x >> 4) & 3) as usize] as u32;
    let column = COLUMN_TABLE_16[(y & 7) as usize][(x & 15) as usize] as u32;
    ((page.wrapping_add(block) << 7) + column) & HALF_MASK
}

/// PSMCT16S halfword address
#[inline(always)]
pub fn address_16s(x: u32, y: u32, bp: u32, bw: u32) -> u32 {
    let page = page_16(x, y, bp, bw);
    let block = BLOCK_TABLE_16S[((y >> 3) & 7) as usize][((x >> 4) & 3) as usize] as u32;
    let column = COLUMN_TABLE_16[(y & 7) as usize][(x & 15) as usize] as u32;
    ((page.wrapping_add(block) << 7) + column) & HALF_MASK
}

/// PSMZ16 halfword address
#[inline(always)]
pub fn address_16z(x: u32, y: u32, bp: u32, bw: u32) -> u32 {
    let page = page_16(x, y, bp, bw);
    let block = BLOCK_TABLE_16Z[((y >> 3) & 7) as usize][((x >> 4) & 3) as usize] as u32;
    ((page.wrapping_add(block) << 7) + ((y & 7) << 4) + (x & 15)) & HALF_MASK
}

/// PSMZ16S halfword address
#[inline(always)]
pub fn address_16sz(x: u32, y: u32, bp: u32, bw: u32) -> u32 {
    let page = page_16(x, y, bp, bw);
    let block = BLOCK_TABLE_16SZ[((y >> 3) & 7) as usize][((x >> 4) & 3) as usize] as u32;
    ((page.wrapping_add(block) << 7) + ((y & 7) << 4) + (x & 15)) & HALF_MASK
}

/// PSMT8 byte address
///
/// 8-bit pages are 128 pixels wide, so a buffer width given in 64-pixel
/// units is rounded up to whole pages.
#[inline(always)]
pub fn address_8(x: u32, y: u32, bp: u32, bw: u32) -> u32 {
    let page = bp
        .wrapping_add(((y >> 1) & !0x1f).wrapping_mul((bw + 1) >> 1))
        .wrapping_add((x >> 2) & !0x1f);
    let block = BLOCK_TABLE_32[((y >> 4) & 3) as usize][((x >> 4) & 7) as usize] as u32;
    let column = COLUMN_TABLE_8[(y & 15) as usize][(x & 15) as usize] as u32;
    ((page.wrapping_add(block) << 8) + column) & BYTE_MASK
}

/// PSMT4 nibble address
#[inline(always)]
pub fn address_4(x: u32, y: u32, bp: u32, bw: u32) -> u32 {
    let page = bp
        .wrapping_add(((y >> 2) & !0x1f).wrapping_mul((bw + 1) >> 1))
        .wrapping_add((x >> 2) & !0x1f);
    let block = BLOCK_TABLE_16[((y >> 4) & 7) as usize][((x >> 5) & 3) as usize] as u32;
    let column = COLUMN_TABLE_4[(y & 15) as usize][(x & 31) as usize] as u32;
    ((page.wrapping_add(block) << 9) + column) & NIBBLE_MASK
}
