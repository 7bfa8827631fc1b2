//  _____       ______   ____
// |_   _|     |  ____|/ ____|  Institute of Embedded Systems
//   | |  _ __ | |__  | (___    Zurich University of Applied Sciences
//   | | | '_ \|  __|  \___ \   8401 Winterthur, Switzerland
//  _| |_| | | | |____ ____) |
// |_____|_| |_|______|_____/
//
// Copyright 2025 Institute of Embedded Systems at Zurich University of Applied Sciences.
// All rights reserved.
// SPDX-License-Identifier: MIT

//! Calculate CRC32 like the stm32 CRC peripheral
//!
//! The peripheral is fed 32 bit words (written by the little endian CPU) and shifts them in MSB
//! first with polynomial `0x04C1_1DB7`, initial value `0xFFFF_FFFF` and no reflection or final
//! XOR. The table driven implementation below works in the bit-reversed domain: every word is
//! bit-reversed on the way in, divided byte-wise by the reflected polynomial, and the result is
//! reversed back out.

/// Size of the words the peripheral consumes
pub const WORD_SIZE: usize = core::mem::size_of::<u32>();

/// `0x04C1_1DB7` with its bits reversed
const POLY_REFLECTED: u32 = 0xEDB8_8320;
/// Reset value of the peripheral's data register. Equal to its own bit reversal.
const INIT: u32 = 0xFFFF_FFFF;

static ENGINE: Stm32Crc = Stm32Crc::new();

/// Returns the shared engine. The tables are built at compile time so this never allocates.
pub fn init() -> &'static Stm32Crc {
    &ENGINE
}

pub struct Stm32Crc {
    /// bit-reversed value of every byte
    reversed: [u8; 256],
    /// remainder of every byte divided by the reflected polynomial
    table: [u32; 256],
}

impl Stm32Crc {
    pub const fn new() -> Self {
        let mut reversed = [0; 256];
        let mut table = [0; 256];

        let mut i = 0;
        while i < 256 {
            reversed[i] = reverse_byte(i as u8);

            let mut remainder = i as u32;
            let mut bit = 0;
            while bit < 8 {
                remainder = if remainder & 1 != 0 {
                    (remainder >> 1) ^ POLY_REFLECTED
                } else {
                    remainder >> 1
                };
                bit += 1;
            }
            table[i] = remainder;

            i += 1;
        }

        Self { reversed, table }
    }

    /// Calculates the CRC the peripheral reports after a reset and writing every word of `buffer`.
    ///
    /// The length of `buffer` must be a multiple of [`WORD_SIZE`]. This is only checked in debug
    /// builds; trailing bytes are otherwise ignored.
    pub fn crc32(&self, buffer: &[u8]) -> u32 {
        let words = buffer.chunks_exact(WORD_SIZE);

        debug_assert!(
            words.remainder().is_empty(),
            "length of buffer is not a multiple of {WORD_SIZE} bytes"
        );

        let mut crc = INIT;

        for word in words {
            crc ^= self.reverse_word([word[0], word[1], word[2], word[3]]);
            for _ in 0..WORD_SIZE {
                crc = (crc >> 8) ^ self.table[(crc & 0xff) as usize];
            }
        }

        self.reverse_word(crc.to_le_bytes())
    }

    /// Reverses all 32 bits of the little endian word stored in `bytes`
    fn reverse_word(&self, bytes: [u8; WORD_SIZE]) -> u32 {
        u32::from_be_bytes(bytes.map(|b| self.reversed[b as usize]))
    }
}

impl Default for Stm32Crc {
    fn default() -> Self {
        Self::new()
    }
}

const fn reverse_byte(mut byte: u8) -> u8 {
    let mut reversed = 0;
    let mut bit = 0;
    while bit < 8 {
        reversed = (reversed << 1) | (byte & 1);
        byte >>= 1;
        bit += 1;
    }
    reversed
}
