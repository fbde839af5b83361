// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! The fixed operation table of the target CPU.
//!
//! Table position is the 5-bit opcode value; lookups are case-insensitive.

/// All recognized mnemonics, in opcode order.
pub static OPERATIONS: [&str; 30] = [
    "NOP", "ADD", "SUB", "AND", "OR", "RLC", "RRC", "SHL", "SHR", "SETC", "CLRC", "NOT", "INC",
    "DEC", "MOV", "MUL", "PUSH", "POP", "OUT", "IN", "JZ", "JN", "JC", "JMP", "CALL", "RET",
    "RTI", "LDM", "LDD", "STD",
];

/// Operand-shape category of an instruction.
///
/// The shape determines how many operand tokens the encoder consumes, which
/// register fields they land in, and whether a second immediate word is
/// emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpShape {
    /// No operands (NOP, SETC, CLRC, RET, RTI).
    Implied,
    /// One register operand in the src field (RLC .. CALL).
    DstReg,
    /// One register operand in the src field plus an immediate word (LDM, LDD).
    DstRegImm,
    /// One register operand in the dst field (PUSH).
    SrcReg,
    /// One register operand in the dst field plus an immediate word (STD).
    SrcRegImm,
    /// Two register operands (MOV, ADD, SUB, MUL, OR, AND).
    DstSrc,
    /// Two register operands plus an immediate word; source syntax is
    /// `MNEM dst, imm, src` (SHL, SHR).
    DstSrcImm,
}

/// Look up a mnemonic's opcode value (its table position).
pub fn opcode_of(mnemonic: &str) -> Option<u8> {
    OPERATIONS
        .iter()
        .position(|op| op.eq_ignore_ascii_case(mnemonic))
        .map(|ix| ix as u8)
}

/// Map a mnemonic to its operand-shape category.
pub fn shape_of(mnemonic: &str) -> Option<OpShape> {
    let upper = mnemonic.to_ascii_uppercase();
    let shape = match upper.as_str() {
        "NOP" | "SETC" | "CLRC" | "RET" | "RTI" => OpShape::Implied,
        "RLC" | "RRC" | "POP" | "OUT" | "IN" | "NOT" | "INC" | "DEC" | "JZ" | "JN" | "JC"
        | "JMP" | "CALL" => OpShape::DstReg,
        "LDM" | "LDD" => OpShape::DstRegImm,
        "PUSH" => OpShape::SrcReg,
        "STD" => OpShape::SrcRegImm,
        "MOV" | "ADD" | "SUB" | "MUL" | "OR" | "AND" => OpShape::DstSrc,
        "SHL" | "SHR" => OpShape::DstSrcImm,
        _ => return None,
    };
    Some(shape)
}
