// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

use super::*;

/// Data-space slot holding the PC start address.
const PC_SLOT: usize = 0;
/// Data-space slot holding the interrupt vector address.
const INT_SLOT: usize = 1;
/// First data-space slot available to the data segment.
const DATA_START_SLOT: usize = INT_SLOT + 1;

/// Section state machine driving source lines into the two memory spaces.
///
/// Both spaces are constructed fresh per compile invocation and owned here;
/// nothing survives between invocations except the static operation table.
pub(crate) struct Assembler {
    pub(crate) instructions: MemorySpace,
    pub(crate) data: MemorySpace,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) pc_start: u16,
    pub(crate) int_vector: u16,
}

impl Assembler {
    pub(crate) fn new() -> Self {
        Self {
            instructions: MemorySpace::new(0),
            data: MemorySpace::new(DATA_START_SLOT),
            diagnostics: Vec::new(),
            pc_start: 0,
            int_vector: 0,
        }
    }

    pub(crate) fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Drive all source sections into the memory spaces.
    ///
    /// Section order is fixed: PC line, interrupt-vector line, blank lines,
    /// data segment, code segment, then any number of `.N` address-patch
    /// segments. The first fatal error aborts with a line-located
    /// diagnostic; patch overwrites of already-placed code only warn.
    pub(crate) fn assemble(&mut self, lines: &[String]) -> Result<(), Diagnostic> {
        self.pc_start = header_value(lines, 0, "PC start address")?;
        self.store_data_at(PC_SLOT, self.pc_start as u32, 1)?;
        self.int_vector = header_value(lines, 1, "interrupt vector")?;
        self.store_data_at(INT_SLOT, self.int_vector as u32, 2)?;

        let mut pos = 2;
        while pos < lines.len() && lines[pos].trim().is_empty() {
            pos += 1;
        }

        pos = self.data_segment(lines, pos)?;
        pos = self.code_segment(lines, pos)?;
        self.patch_segments(lines, pos)
    }

    fn store_data_at(&mut self, slot: usize, value: u32, line_no: u32) -> Result<(), Diagnostic> {
        let word = word16(value).map_err(|err| fail(line_no, err))?;
        self.data.store_at(slot, word).map_err(|err| fail(line_no, err))
    }

    /// Consume lines whose first character is a digit, appending each value
    /// at the data cursor. The terminating line is left for the code
    /// segment.
    fn data_segment(&mut self, lines: &[String], mut pos: usize) -> Result<usize, Diagnostic> {
        while pos < lines.len() {
            let text = lines[pos].trim();
            if text.is_empty() {
                pos += 1;
                continue;
            }
            if !text.starts_with(|ch: char| ch.is_ascii_digit()) {
                break;
            }
            let line_no = pos as u32 + 1;
            let value = leading_int(text).map_err(|err| fail(line_no, err))?;
            let word = word16(value).map_err(|err| fail(line_no, err))?;
            self.data.store(word).map_err(|err| fail(line_no, err))?;
            pos += 1;
        }
        Ok(pos)
    }

    /// Consume lines until a `.`-prefixed one, appending encoded words at
    /// the instruction cursor.
    fn code_segment(&mut self, lines: &[String], mut pos: usize) -> Result<usize, Diagnostic> {
        while pos < lines.len() {
            let text = lines[pos].trim();
            if text.is_empty() {
                pos += 1;
                continue;
            }
            if text.starts_with('.') {
                break;
            }
            let line_no = pos as u32 + 1;
            for word in encode_line(&lines[pos], line_no)? {
                self.instructions.store(word).map_err(|err| fail(line_no, err))?;
            }
            pos += 1;
        }
        Ok(pos)
    }

    /// Process `.N` sections: encoded words land at absolute index N and
    /// upward, without moving the sequential cursor. Writing below the
    /// cursor warns and proceeds; last write wins.
    fn patch_segments(&mut self, lines: &[String], mut pos: usize) -> Result<(), Diagnostic> {
        while pos < lines.len() {
            let text = lines[pos].trim();
            if text.is_empty() {
                pos += 1;
                continue;
            }
            let line_no = pos as u32 + 1;
            let Some(addr_text) = text.strip_prefix('.') else {
                return Err(fail(
                    line_no,
                    AsmError::new(
                        AsmErrorKind::Assembler,
                        "Expected address-patch directive",
                        Some(text),
                    ),
                ));
            };
            let mut index = leading_int(addr_text).map_err(|err| fail(line_no, err))? as usize;
            pos += 1;

            while pos < lines.len() {
                let text = lines[pos].trim();
                if text.is_empty() {
                    pos += 1;
                    continue;
                }
                if text.starts_with('.') {
                    break;
                }
                let line_no = pos as u32 + 1;
                let words = encode_line(&lines[pos], line_no)?;
                if !words.is_empty() && index < self.instructions.cursor() {
                    self.diagnostics.push(
                        Diagnostic::new(
                            line_no,
                            Severity::Warning,
                            AsmError::new(
                                AsmErrorKind::Memory,
                                &format!(
                                    "Address patch at {index} overwrites sequentially placed instructions (cursor at {})",
                                    self.instructions.cursor()
                                ),
                                None,
                            ),
                        )
                        .with_code("mfw001"),
                    );
                }
                for word in words {
                    self.instructions
                        .store_at(index, word)
                        .map_err(|err| fail(line_no, err))?;
                    index += 1;
                }
                pos += 1;
            }
        }
        Ok(())
    }
}

fn header_value(lines: &[String], pos: usize, what: &str) -> Result<u16, Diagnostic> {
    let line_no = pos as u32 + 1;
    let line = lines.get(pos).ok_or_else(|| {
        fail(
            line_no,
            AsmError::new(AsmErrorKind::Assembler, "Missing header line", Some(what)),
        )
    })?;
    let value = leading_int(line).map_err(|err| fail(line_no, err))?;
    if value > u16::MAX as u32 {
        return Err(fail(
            line_no,
            AsmError::new(
                AsmErrorKind::Overflow,
                &format!("Value {value} does not fit in 16 bits"),
                Some(what),
            ),
        ));
    }
    Ok(value as u16)
}

fn encode_line(line: &str, line_no: u32) -> Result<Vec<String>, Diagnostic> {
    match split_line(line) {
        Some(parsed) => {
            encode_instruction(&parsed.mnemonic, &parsed.operands).map_err(|err| fail(line_no, err))
        }
        None => Ok(Vec::new()),
    }
}

fn fail(line_no: u32, err: AsmError) -> Diagnostic {
    Diagnostic::new(line_no, Severity::Error, err)
}
