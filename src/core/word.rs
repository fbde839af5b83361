// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Bit-field formatting for machine words.
//!
//! Every binary string the assembler emits goes through these helpers, which
//! validate magnitude against the field width before formatting. A value
//! that needs more bits than the field fails with an Overflow error instead
//! of producing an oversized string.

use crate::core::error::{AsmError, AsmErrorKind};

/// Width of one machine word in bits.
pub const WORD_BITS: u32 = 16;
/// Width of the opcode field.
pub const OPCODE_BITS: u32 = 5;
/// Width of one register field.
pub const REG_BITS: u32 = 3;

/// Register field value for an absent operand.
pub const NO_REG: &str = "000";
/// The unused trailing bits of every opcode word.
pub const UNUSED_BITS: &str = "00000";

/// The all-zero word both memory spaces are initialized with.
pub fn zero_word() -> String {
    "0".repeat(WORD_BITS as usize)
}

fn field(value: u32, bits: u32) -> Result<String, AsmError> {
    if value >= 1u32 << bits {
        return Err(AsmError::new(
            AsmErrorKind::Overflow,
            &format!("Value {value} does not fit in {bits} bits"),
            None,
        ));
    }
    Ok(format!("{:0width$b}", value, width = bits as usize))
}

/// Render a full 16-bit word.
pub fn word16(value: u32) -> Result<String, AsmError> {
    field(value, WORD_BITS)
}

/// Render a 5-bit opcode field.
pub fn field5(value: u32) -> Result<String, AsmError> {
    field(value, OPCODE_BITS)
}

/// Render a 3-bit register field.
pub fn field3(value: u32) -> Result<String, AsmError> {
    field(value, REG_BITS)
}
