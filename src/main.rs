// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for memForge.

use std::fs::OpenOptions;
use std::io::{self, Write};

use clap::Parser;
use serde_json::json;

use memforge::assembler::cli::{validate_cli, Cli, DiagnosticsSinkConfig, OutputFormat};
use memforge::core::error::{AsmRunReport, Diagnostic, Severity};

struct DiagnosticsSink {
    writer: Option<Box<dyn Write>>,
}

impl DiagnosticsSink {
    fn from_config(config: &DiagnosticsSinkConfig) -> io::Result<Self> {
        match config {
            DiagnosticsSinkConfig::Disabled => Ok(Self { writer: None }),
            DiagnosticsSinkConfig::Stderr => Ok(Self {
                writer: Some(Box::new(io::stderr())),
            }),
            DiagnosticsSinkConfig::File { path, append } => {
                let mut opts = OpenOptions::new();
                opts.create(true).write(true);
                if *append {
                    opts.append(true);
                } else {
                    opts.truncate(true);
                }
                let file = opts.open(path)?;
                Ok(Self {
                    writer: Some(Box::new(file)),
                })
            }
        }
    }

    fn emit_line(&mut self, line: &str) {
        if let Some(writer) = &mut self.writer {
            let _ = writeln!(writer, "{line}");
        }
    }

    fn emit_diagnostics(
        &mut self,
        diagnostics: &[Diagnostic],
        source_lines: &[String],
        use_color: bool,
        format: OutputFormat,
    ) {
        for diag in diagnostics {
            self.emit_line(&format_diagnostic_line(
                diag,
                Some(source_lines),
                use_color,
                format,
            ));
        }
    }
}

fn severity_to_str(severity: Severity) -> &'static str {
    match severity {
        Severity::Warning => "warning",
        Severity::Error => "error",
    }
}

fn format_diagnostic_line(
    diag: &Diagnostic,
    source_lines: Option<&[String]>,
    use_color: bool,
    format: OutputFormat,
) -> String {
    if format == OutputFormat::Json {
        json!({
            "code": diag.code(),
            "severity": severity_to_str(diag.severity()),
            "message": diag.message(),
            "line": diag.line(),
        })
        .to_string()
    } else {
        diag.format_with_context(source_lines, use_color)
    }
}

fn print_summary(report: &AsmRunReport, format: OutputFormat) {
    if format == OutputFormat::Json {
        let outputs: Vec<String> = report
            .outputs()
            .iter()
            .map(|path| path.to_string_lossy().to_string())
            .collect();
        println!(
            "{}",
            json!({
                "pc_start": report.pc_start(),
                "int_vector": report.int_vector(),
                "instruction_words": report.instruction_words(),
                "data_words": report.data_words(),
                "outputs": outputs,
            })
        );
        return;
    }
    println!(
        "PC start address: {:016b} ({})",
        report.pc_start(),
        report.pc_start()
    );
    println!(
        "Interrupt vector: {:016b} ({})",
        report.int_vector(),
        report.int_vector()
    );
    println!(
        "Assembled {} instruction word(s), {} data word(s)",
        report.instruction_words(),
        report.data_words()
    );
    for path in report.outputs() {
        println!("Wrote {}", path.display());
    }
}

fn filtered_diagnostics(diagnostics: &[Diagnostic], emit_warnings: bool) -> Vec<Diagnostic> {
    diagnostics
        .iter()
        .filter(|diag| emit_warnings || diag.severity() != Severity::Warning)
        .cloned()
        .collect()
}

fn main() {
    let cli = Cli::parse();
    let cli_config = match validate_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let mut sink = match DiagnosticsSink::from_config(&cli_config.diagnostics_sink) {
        Ok(sink) => sink,
        Err(err) => {
            eprintln!("Failed to open diagnostics sink: {err}");
            std::process::exit(1);
        }
    };

    let use_color = std::env::var("NO_COLOR").is_err();
    match memforge::assembler::run_with_config(&cli_config) {
        Ok(report) => {
            let diagnostics = filtered_diagnostics(
                report.diagnostics(),
                cli_config.warning_policy.emit_warnings,
            );
            sink.emit_diagnostics(
                &diagnostics,
                report.source_lines(),
                use_color,
                cli_config.output_format,
            );
            if !cli_config.quiet {
                print_summary(&report, cli_config.output_format);
            }
        }
        Err(err) => {
            let diagnostics = filtered_diagnostics(
                err.diagnostics(),
                cli_config.warning_policy.emit_warnings,
            );
            sink.emit_diagnostics(
                &diagnostics,
                err.source_lines(),
                use_color,
                cli_config.output_format,
            );
            if cli_config.output_format != OutputFormat::Json {
                sink.emit_line(&err.to_string());
            }
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memforge::core::error::{AsmError, AsmErrorKind};

    #[test]
    fn format_diagnostic_line_json_has_expected_keys() {
        let diag = Diagnostic::new(
            7,
            Severity::Error,
            AsmError::new(AsmErrorKind::Instruction, "Illegal instruction", Some("FOO")),
        );
        let line = format_diagnostic_line(&diag, None, false, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&line).expect("valid json");
        assert_eq!(value["code"], "mfe002");
        assert_eq!(value["severity"], "error");
        assert_eq!(value["message"], "Illegal instruction: FOO");
        assert_eq!(value["line"], 7);
    }

    #[test]
    fn format_diagnostic_line_text_includes_source_context() {
        let diag = Diagnostic::new(
            1,
            Severity::Warning,
            AsmError::new(AsmErrorKind::Memory, "Address patch at 0 overwrites sequentially placed instructions (cursor at 1)", None),
        );
        let lines = vec!["NOP".to_string()];
        let text = format_diagnostic_line(&diag, Some(&lines), false, OutputFormat::Text);
        assert!(text.contains("line 1: warning"));
        assert!(text.contains("NOP"));
    }

    #[test]
    fn warning_filter_drops_warnings_only() {
        let warning = Diagnostic::new(
            1,
            Severity::Warning,
            AsmError::new(AsmErrorKind::Memory, "overwrite", None),
        );
        let error = Diagnostic::new(
            2,
            Severity::Error,
            AsmError::new(AsmErrorKind::Operand, "Illegal operand", Some("R8")),
        );
        let kept = filtered_diagnostics(&[warning.clone(), error.clone()], false);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].severity(), Severity::Error);
        let kept = filtered_diagnostics(&[warning, error], true);
        assert_eq!(kept.len(), 2);
    }
}
