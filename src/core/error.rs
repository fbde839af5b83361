// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Error types, diagnostics, and reporting for the assembler.

use std::fmt;
use std::sync::Arc;

/// Categories of assembler errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsmErrorKind {
    Assembler,
    Cli,
    Instruction,
    Io,
    Memory,
    Number,
    Operand,
    Overflow,
}

/// An assembler error with a kind and message.
#[derive(Debug, Clone)]
pub struct AsmError {
    kind: AsmErrorKind,
    message: String,
}

impl AsmError {
    pub fn new(kind: AsmErrorKind, msg: &str, param: Option<&str>) -> Self {
        Self {
            kind,
            message: format_error(msg, param),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> AsmErrorKind {
        self.kind
    }
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AsmError {}

fn format_error(msg: &str, param: Option<&str>) -> String {
    match param {
        Some(param) => format!("{msg}: {param}"),
        None => msg.to_string(),
    }
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

pub fn default_diagnostic_code(kind: AsmErrorKind) -> &'static str {
    match kind {
        AsmErrorKind::Assembler => "mfe000",
        AsmErrorKind::Cli => "mfe001",
        AsmErrorKind::Instruction => "mfe002",
        AsmErrorKind::Io => "mfe003",
        AsmErrorKind::Memory => "mfe004",
        AsmErrorKind::Number => "mfe005",
        AsmErrorKind::Operand => "mfe006",
        AsmErrorKind::Overflow => "mfe007",
    }
}

/// A diagnostic message with source-line location and context.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub(crate) line: u32,
    pub(crate) code: String,
    pub(crate) severity: Severity,
    pub(crate) error: AsmError,
}

impl Diagnostic {
    pub fn new(line: u32, severity: Severity, error: AsmError) -> Self {
        Self {
            line,
            code: default_diagnostic_code(error.kind()).to_string(),
            severity,
            error,
        }
    }

    pub fn with_code(mut self, code: &str) -> Self {
        self.code = code.to_string();
        self
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        self.error.message()
    }

    pub fn kind(&self) -> AsmErrorKind {
        self.error.kind()
    }

    pub fn error(&self) -> &AsmError {
        &self.error
    }

    /// Render the diagnostic with the offending source line, when available.
    ///
    /// Line numbers are 1-based; line 0 means no source location (CLI and
    /// I/O errors).
    pub fn format_with_context(&self, source_lines: Option<&[String]>, use_color: bool) -> String {
        let sev = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        let sev_colored = if use_color {
            match self.severity {
                Severity::Warning => format!("\x1b[33m{sev}\x1b[0m"),
                Severity::Error => format!("\x1b[31m{sev}\x1b[0m"),
            }
        } else {
            sev.to_string()
        };

        let mut out = String::new();
        if self.line > 0 {
            out.push_str(&format!("line {}: {sev_colored} [{}]\n", self.line, self.code));
            if let Some(lines) = source_lines {
                if let Some(src) = lines.get(self.line as usize - 1) {
                    out.push_str(&format!("    {src}\n"));
                }
            }
        }
        out.push_str(&format!("{sev_colored}: {}", self.error.message()));
        out
    }
}

/// Successful run report: diagnostics plus assembly summary data.
#[derive(Debug, Clone)]
pub struct AsmRunReport {
    diagnostics: Vec<Diagnostic>,
    source_lines: Arc<Vec<String>>,
    pc_start: u16,
    int_vector: u16,
    instruction_words: usize,
    data_words: usize,
    outputs: Vec<std::path::PathBuf>,
}

impl AsmRunReport {
    pub fn new(
        diagnostics: Vec<Diagnostic>,
        source_lines: Arc<Vec<String>>,
        pc_start: u16,
        int_vector: u16,
        instruction_words: usize,
        data_words: usize,
        outputs: Vec<std::path::PathBuf>,
    ) -> Self {
        Self {
            diagnostics,
            source_lines,
            pc_start,
            int_vector,
            instruction_words,
            data_words,
            outputs,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn source_lines(&self) -> &[String] {
        &self.source_lines
    }

    pub fn pc_start(&self) -> u16 {
        self.pc_start
    }

    pub fn int_vector(&self) -> u16 {
        self.int_vector
    }

    pub fn instruction_words(&self) -> usize {
        self.instruction_words
    }

    pub fn data_words(&self) -> usize {
        self.data_words
    }

    pub fn outputs(&self) -> &[std::path::PathBuf] {
        &self.outputs
    }
}

/// Fatal run error: the triggering error plus all diagnostics gathered
/// before the abort.
#[derive(Debug)]
pub struct AsmRunError {
    error: AsmError,
    diagnostics: Vec<Diagnostic>,
    source_lines: Arc<Vec<String>>,
}

impl AsmRunError {
    pub fn new(error: AsmError, diagnostics: Vec<Diagnostic>, source_lines: Arc<Vec<String>>) -> Self {
        Self {
            error,
            diagnostics,
            source_lines,
        }
    }

    pub fn error(&self) -> &AsmError {
        &self.error
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn source_lines(&self) -> &[String] {
        &self.source_lines
    }
}

impl fmt::Display for AsmRunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Compilation failed: {}", self.error)
    }
}

impl std::error::Error for AsmRunError {}
