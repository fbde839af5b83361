// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Instruction and operand encoding.
//!
//! One parsed source line encodes to one opcode word, optionally followed by
//! a 16-bit immediate word. The opcode word layout is
//! `[5-bit opcode][3-bit dst][3-bit src][5 unused bits]`; register fields
//! for absent operands hold `000`.

use crate::core::error::{AsmError, AsmErrorKind};
use crate::core::optable::{opcode_of, shape_of, OpShape};
use crate::core::scanner::{leading_int, register_number};
use crate::core::word::{field3, field5, word16, NO_REG, UNUSED_BITS};

/// Highest valid register number.
const MAX_REG: u32 = 5;

/// Encode one register operand token as a 3-bit field.
pub fn encode_operand(token: &str) -> Result<String, AsmError> {
    let reg = register_number(token)?;
    if reg > MAX_REG {
        return Err(AsmError::new(
            AsmErrorKind::Operand,
            "Illegal operand",
            Some(token.trim()),
        ));
    }
    field3(reg)
}

/// Encode one instruction into its word sequence.
///
/// Shape dispatch is exhaustive over [`OpShape`]; a mnemonic outside the
/// operation table is an illegal instruction, and a missing operand token is
/// a compilation error rather than a panic.
pub fn encode_instruction(mnemonic: &str, operands: &[String]) -> Result<Vec<String>, AsmError> {
    let shape = shape_of(mnemonic).ok_or_else(|| {
        AsmError::new(AsmErrorKind::Instruction, "Illegal instruction", Some(mnemonic))
    })?;
    // shape_of and opcode_of cover the same fixed mnemonic set.
    let opcode = opcode_of(mnemonic).ok_or_else(|| {
        AsmError::new(AsmErrorKind::Instruction, "Illegal instruction", Some(mnemonic))
    })?;
    let opcode = field5(opcode as u32)?;

    let words = match shape {
        OpShape::Implied => {
            vec![opcode_word(&opcode, NO_REG, NO_REG)]
        }
        OpShape::DstReg => {
            let src = encode_operand(operand(mnemonic, operands, 0)?)?;
            vec![opcode_word(&opcode, NO_REG, &src)]
        }
        OpShape::DstRegImm => {
            let src = encode_operand(operand(mnemonic, operands, 0)?)?;
            let imm = immediate_word(operand(mnemonic, operands, 1)?)?;
            vec![opcode_word(&opcode, NO_REG, &src), imm]
        }
        OpShape::SrcReg => {
            let dst = encode_operand(operand(mnemonic, operands, 0)?)?;
            vec![opcode_word(&opcode, &dst, NO_REG)]
        }
        OpShape::SrcRegImm => {
            let dst = encode_operand(operand(mnemonic, operands, 0)?)?;
            let imm = immediate_word(operand(mnemonic, operands, 1)?)?;
            vec![opcode_word(&opcode, &dst, NO_REG), imm]
        }
        OpShape::DstSrc => {
            let dst = encode_operand(operand(mnemonic, operands, 0)?)?;
            let src = encode_operand(operand(mnemonic, operands, 1)?)?;
            vec![opcode_word(&opcode, &dst, &src)]
        }
        OpShape::DstSrcImm => {
            // Source syntax is `MNEM dst, imm, src`: operand 1 is the
            // immediate, operand 2 the second register.
            let dst = encode_operand(operand(mnemonic, operands, 0)?)?;
            let imm = immediate_word(operand(mnemonic, operands, 1)?)?;
            let src = encode_operand(operand(mnemonic, operands, 2)?)?;
            vec![opcode_word(&opcode, &dst, &src), imm]
        }
    };
    Ok(words)
}

fn opcode_word(opcode: &str, dst: &str, src: &str) -> String {
    format!("{opcode}{dst}{src}{UNUSED_BITS}")
}

fn operand<'a>(mnemonic: &str, operands: &'a [String], ix: usize) -> Result<&'a str, AsmError> {
    operands.get(ix).map(String::as_str).ok_or_else(|| {
        AsmError::new(
            AsmErrorKind::Operand,
            &format!("Missing operand {} for {}", ix + 1, mnemonic.to_ascii_uppercase()),
            None,
        )
    })
}

fn immediate_word(token: &str) -> Result<String, AsmError> {
    word16(leading_int(token)?)
}
