// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Assembler run orchestration.
//!
//! Ties the CPU-agnostic core (scanner, encoder, memory spaces) to the CLI:
//! reads the source file, opens both output images before encoding starts,
//! drives the section engine, and serializes the memory spaces.

pub mod cli;
mod engine;
mod output;
#[cfg(test)]
mod tests;

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;

use cli::{validate_cli, Cli, CliConfig};
use engine::Assembler;
use output::{
    write_mem_file, DATA_FILE_IDENTIFIER, INSTRUCTION_FILE_IDENTIFIER, MEMORY_FILE_EXTENSION,
};

use crate::core::encoder::encode_instruction;
use crate::core::error::{
    AsmError, AsmErrorKind, AsmRunError, AsmRunReport, Diagnostic, Severity,
};
use crate::core::memspace::MemorySpace;
use crate::core::scanner::{leading_int, split_line};
use crate::core::word::word16;

/// Run the assembler with command-line arguments.
pub fn run() -> Result<AsmRunReport, AsmRunError> {
    let cli = Cli::parse();
    run_with_cli(&cli)
}

pub fn run_with_cli(cli: &Cli) -> Result<AsmRunReport, AsmRunError> {
    let config = validate_cli(cli)
        .map_err(|err| AsmRunError::new(err, Vec::new(), Arc::new(Vec::new())))?;
    run_with_config(&config)
}

pub fn run_with_config(config: &CliConfig) -> Result<AsmRunReport, AsmRunError> {
    let report = run_one(config)?;

    if config.warning_policy.treat_warnings_as_errors {
        let mut warning_diags = Vec::new();
        for diag in report.diagnostics() {
            if diag.severity() == Severity::Warning {
                let mut warning = diag.clone();
                warning.severity = Severity::Error;
                warning_diags.push(warning);
            }
        }
        if !warning_diags.is_empty() {
            return Err(AsmRunError::new(
                AsmError::new(
                    AsmErrorKind::Assembler,
                    "Warnings treated as errors (--Werror)",
                    None,
                ),
                warning_diags,
                Arc::new(report.source_lines().to_vec()),
            ));
        }
    }

    Ok(report)
}

fn run_one(config: &CliConfig) -> Result<AsmRunReport, AsmRunError> {
    let source = fs::read_to_string(&config.input_path).map_err(|err| {
        AsmRunError::new(
            AsmError::new(
                AsmErrorKind::Io,
                &format!("Cannot open input file: {err}"),
                Some(config.input_path.to_string_lossy().as_ref()),
            ),
            Vec::new(),
            Arc::new(Vec::new()),
        )
    })?;
    let source_lines: Arc<Vec<String>> =
        Arc::new(source.lines().map(|line| line.to_string()).collect());

    let (instructions_path, data_path) = output_paths(config, &source_lines)?;
    // Output files are created before any encoding so a missing or
    // unwritable output directory fails fast.
    let instructions_file = create_output(&instructions_path, &source_lines)?;
    let data_file = create_output(&data_path, &source_lines)?;

    let mut asm = Assembler::new();
    if let Err(diag) = asm.assemble(&source_lines) {
        let error = diag.error().clone();
        let mut diagnostics = asm.take_diagnostics();
        diagnostics.push(diag);
        return Err(AsmRunError::new(error, diagnostics, source_lines));
    }
    let diagnostics = asm.take_diagnostics();

    write_image(instructions_file, &asm.instructions, &instructions_path, &source_lines)?;
    write_image(data_file, &asm.data, &data_path, &source_lines)?;

    Ok(AsmRunReport::new(
        diagnostics,
        source_lines,
        asm.pc_start,
        asm.int_vector,
        asm.instructions.cursor(),
        asm.data.cursor(),
        vec![instructions_path, data_path],
    ))
}

fn output_paths(
    config: &CliConfig,
    source_lines: &Arc<Vec<String>>,
) -> Result<(PathBuf, PathBuf), AsmRunError> {
    let stem = config
        .input_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| {
            AsmRunError::new(
                AsmError::new(
                    AsmErrorKind::Cli,
                    "Input path has no usable file name",
                    Some(config.input_path.to_string_lossy().as_ref()),
                ),
                Vec::new(),
                Arc::clone(source_lines),
            )
        })?;
    let instructions = config
        .output_dir
        .join(format!("{stem}{INSTRUCTION_FILE_IDENTIFIER}{MEMORY_FILE_EXTENSION}"));
    let data = config
        .output_dir
        .join(format!("{stem}{DATA_FILE_IDENTIFIER}{MEMORY_FILE_EXTENSION}"));
    Ok((instructions, data))
}

fn create_output(
    path: &Path,
    source_lines: &Arc<Vec<String>>,
) -> Result<fs::File, AsmRunError> {
    fs::File::create(path).map_err(|err| {
        AsmRunError::new(
            AsmError::new(
                AsmErrorKind::Io,
                &format!("Cannot create output file: {err}"),
                Some(path.to_string_lossy().as_ref()),
            ),
            Vec::new(),
            Arc::clone(source_lines),
        )
    })
}

fn write_image(
    file: fs::File,
    space: &MemorySpace,
    path: &Path,
    source_lines: &Arc<Vec<String>>,
) -> Result<(), AsmRunError> {
    let mut writer = BufWriter::new(file);
    write_mem_file(&mut writer, space)
        .and_then(|()| writer.flush())
        .map_err(|err| {
            AsmRunError::new(
                AsmError::new(
                    AsmErrorKind::Io,
                    &format!("Error writing memory image: {err}"),
                    Some(path.to_string_lossy().as_ref()),
                ),
                Vec::new(),
                Arc::clone(source_lines),
            )
        })
}
