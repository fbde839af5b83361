// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line interface parsing and argument validation.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::core::error::{AsmError, AsmErrorKind};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const USAGE: &str = "Usage: assemble <input-file> <output-directory>";

const LONG_ABOUT: &str = "Assembler for a 16-bit educational CPU.

Reads one assembly source file and writes two ModelSim .mem memory images
into the output directory: <basename>_instructions.mem holding the encoded
instruction words and <basename>_data.mem holding the PC start address,
interrupt vector, and data segment. Both images cover the full 512-word
address space, highest address first.";

#[derive(Parser, Debug)]
#[command(
    name = "assemble",
    version = VERSION,
    about = "16-bit CPU assembler emitting .mem memory images",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    #[arg(
        value_name = "INPUT",
        long_help = "Assembly source file to compile."
    )]
    pub input: Option<PathBuf>,
    #[arg(
        value_name = "OUTDIR",
        long_help = "Directory the two .mem memory images are written into. Must already exist."
    )]
    pub output_dir: Option<PathBuf>,
    #[arg(
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Text,
        long_help = "Select CLI output format. text is default; json emits machine-readable diagnostics and summary lines."
    )]
    pub format: OutputFormat,
    #[arg(
        short = 'q',
        long = "quiet",
        action = ArgAction::SetTrue,
        long_help = "Suppress the run summary and diagnostic output for successful runs. Errors are still reported unless --no-error is set."
    )]
    pub quiet: bool,
    #[arg(
        short = 'E',
        long = "error",
        value_name = "FILE",
        long_help = "Write diagnostics to FILE instead of stderr."
    )]
    pub error_file: Option<PathBuf>,
    #[arg(
        long = "error-append",
        action = ArgAction::SetTrue,
        requires = "error_file",
        long_help = "Append diagnostics to --error FILE instead of truncating it."
    )]
    pub error_append: bool,
    #[arg(
        long = "no-error",
        action = ArgAction::SetTrue,
        conflicts_with_all = ["error_file", "error_append"],
        long_help = "Disable all diagnostic output routing."
    )]
    pub no_error: bool,
    #[arg(
        short = 'w',
        long = "no-warn",
        action = ArgAction::SetTrue,
        conflicts_with = "warn_error",
        long_help = "Suppress warning diagnostics (address-patch overwrites)."
    )]
    pub no_warn: bool,
    #[arg(
        long = "Werror",
        action = ArgAction::SetTrue,
        long_help = "Treat warnings as errors (non-zero exit status)."
    )]
    pub warn_error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticsSinkConfig {
    Disabled,
    Stderr,
    File { path: PathBuf, append: bool },
}

#[derive(Debug, Clone, Copy)]
pub struct WarningPolicy {
    pub emit_warnings: bool,
    pub treat_warnings_as_errors: bool,
}

/// Validated CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub warning_policy: WarningPolicy,
    pub diagnostics_sink: DiagnosticsSinkConfig,
}

pub fn validate_cli(cli: &Cli) -> Result<CliConfig, AsmError> {
    let (Some(input), Some(output_dir)) = (cli.input.clone(), cli.output_dir.clone()) else {
        return Err(AsmError::new(AsmErrorKind::Cli, USAGE, None));
    };

    let diagnostics_sink = if cli.no_error {
        DiagnosticsSinkConfig::Disabled
    } else if let Some(path) = cli.error_file.clone() {
        DiagnosticsSinkConfig::File {
            path,
            append: cli.error_append,
        }
    } else {
        DiagnosticsSinkConfig::Stderr
    };

    Ok(CliConfig {
        input_path: input,
        output_dir,
        output_format: cli.format,
        quiet: cli.quiet,
        warning_policy: WarningPolicy {
            emit_warnings: !cli.no_warn,
            treat_warnings_as_errors: cli.warn_error,
        },
        diagnostics_sink,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("cli parses")
    }

    #[test]
    fn missing_positionals_yield_usage_error() {
        let cli = parse(&["assemble"]);
        let err = validate_cli(&cli).unwrap_err();
        assert_eq!(err.kind(), AsmErrorKind::Cli);
        assert_eq!(err.message(), USAGE);

        let cli = parse(&["assemble", "prog.asm"]);
        assert!(validate_cli(&cli).is_err());
    }

    #[test]
    fn two_positionals_validate() {
        let cli = parse(&["assemble", "prog.asm", "out"]);
        let config = validate_cli(&cli).unwrap();
        assert_eq!(config.input_path, PathBuf::from("prog.asm"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.output_format, OutputFormat::Text);
        assert!(config.warning_policy.emit_warnings);
        assert!(!config.warning_policy.treat_warnings_as_errors);
        assert_eq!(config.diagnostics_sink, DiagnosticsSinkConfig::Stderr);
    }

    #[test]
    fn error_file_routes_diagnostics() {
        let cli = parse(&["assemble", "prog.asm", "out", "-E", "diag.log", "--error-append"]);
        let config = validate_cli(&cli).unwrap();
        assert_eq!(
            config.diagnostics_sink,
            DiagnosticsSinkConfig::File {
                path: PathBuf::from("diag.log"),
                append: true
            }
        );
    }

    #[test]
    fn no_error_disables_the_sink() {
        let cli = parse(&["assemble", "prog.asm", "out", "--no-error"]);
        let config = validate_cli(&cli).unwrap();
        assert_eq!(config.diagnostics_sink, DiagnosticsSinkConfig::Disabled);
    }

    #[test]
    fn warning_flags_set_the_policy() {
        let cli = parse(&["assemble", "prog.asm", "out", "-w"]);
        let config = validate_cli(&cli).unwrap();
        assert!(!config.warning_policy.emit_warnings);

        let cli = parse(&["assemble", "prog.asm", "out", "--Werror"]);
        let config = validate_cli(&cli).unwrap();
        assert!(config.warning_policy.treat_warnings_as_errors);
    }

    #[test]
    fn no_warn_conflicts_with_werror() {
        assert!(Cli::try_parse_from(["assemble", "prog.asm", "out", "-w", "--Werror"]).is_err());
    }
}
