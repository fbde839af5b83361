// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Fixed-size word memory with sequential append and patched writes.

use crate::core::error::{AsmError, AsmErrorKind};
use crate::core::word::zero_word;

/// Number of addressable words in each memory space.
pub const MEMORY_WORDS: usize = 512;

/// One fixed-size addressable word space (instruction or data memory).
///
/// Constructed fresh per compile invocation and owned by the engine; slots
/// are pre-filled with the zero word. `store` appends at the sequential
/// cursor, `store_at` writes at an explicit address without moving the
/// cursor. Last write wins.
#[derive(Debug, Clone)]
pub struct MemorySpace {
    words: Vec<String>,
    cursor: usize,
}

impl MemorySpace {
    pub fn new(start_cursor: usize) -> Self {
        Self {
            words: vec![zero_word(); MEMORY_WORDS],
            cursor: start_cursor,
        }
    }

    /// Next free sequential slot.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word(&self, addr: usize) -> Option<&str> {
        self.words.get(addr).map(String::as_str)
    }

    /// Append a word at the sequential cursor.
    pub fn store(&mut self, word: String) -> Result<(), AsmError> {
        let addr = self.cursor;
        self.store_at(addr, word)?;
        self.cursor += 1;
        Ok(())
    }

    /// Write a word at an explicit address, leaving the cursor unchanged.
    pub fn store_at(&mut self, addr: usize, word: String) -> Result<(), AsmError> {
        debug_assert_eq!(word.len(), 16);
        match self.words.get_mut(addr) {
            Some(slot) => {
                *slot = word;
                Ok(())
            }
            None => Err(AsmError::new(
                AsmErrorKind::Memory,
                &format!("Address {addr} outside {MEMORY_WORDS}-word memory"),
                None,
            )),
        }
    }
}
