// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Line-level lexical helpers: comment stripping, mnemonic/operand
//! splitting, and numeric scanning.

use crate::core::error::{AsmError, AsmErrorKind};

/// One source line split into mnemonic and operand tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub mnemonic: String,
    pub operands: Vec<String>,
}

/// Split a raw source line into mnemonic and comma-separated operand tokens.
///
/// Everything from the first `;` onward is a comment. Returns `None` when
/// the line is empty (or whitespace-only) after comment stripping. Operand
/// tokens are trimmed so `MOV R1, R2` assembles the same as `MOV R1,R2`.
pub fn split_line(line: &str) -> Option<SourceLine> {
    let code = match line.find(';') {
        Some(ix) => &line[..ix],
        None => line,
    };
    let code = code.trim();
    if code.is_empty() {
        return None;
    }

    let (mnemonic, rest) = match code.split_once(' ') {
        Some((mnemonic, rest)) => (mnemonic, Some(rest)),
        None => (code, None),
    };
    let operands = match rest {
        Some(rest) => rest.split(',').map(|op| op.trim().to_string()).collect(),
        None => Vec::new(),
    };
    Some(SourceLine {
        mnemonic: mnemonic.to_string(),
        operands,
    })
}

/// Parse a decimal integer from the leading digits of `text`.
///
/// Trailing non-digit junk is discarded (`128abc` scans as 128). A line with
/// no leading digits is a malformed numeric literal.
pub fn leading_int(text: &str) -> Result<u32, AsmError> {
    let digits: &str = {
        let end = text
            .char_indices()
            .find(|(_, ch)| !ch.is_ascii_digit())
            .map(|(ix, _)| ix)
            .unwrap_or(text.len());
        &text[..end]
    };
    digits.parse::<u32>().map_err(|_| {
        AsmError::new(AsmErrorKind::Number, "Malformed numeric literal", Some(text.trim()))
    })
}

/// Extract the register number from an operand token by collecting its
/// decimal digits (`R3`, `r3`, and `3` all scan as 3).
pub fn register_number(token: &str) -> Result<u32, AsmError> {
    let digits: String = token.chars().filter(|ch| ch.is_ascii_digit()).collect();
    digits.parse::<u32>().map_err(|_| {
        AsmError::new(AsmErrorKind::Operand, "Illegal operand", Some(token.trim()))
    })
}
