use super::cli::{validate_cli, Cli};
use super::engine::Assembler;
use super::run_with_config;
use crate::core::error::{AsmErrorKind, Severity};
use crate::core::memspace::MEMORY_WORDS;

use clap::Parser;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_workspace(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let pid = std::process::id();
    let dir = env::temp_dir().join(format!("memforge-test-{tag}-{pid}-{nanos}"));
    fs::create_dir_all(&dir).expect("create temp workspace");
    dir
}

fn to_lines(source: &str) -> Vec<String> {
    source.lines().map(|line| line.to_string()).collect()
}

fn assemble(source: &str) -> Assembler {
    let mut asm = Assembler::new();
    asm.assemble(&to_lines(source)).expect("source assembles");
    asm
}

const SAMPLE_SOURCE: &str = "\
40 ; PC start
1 ; interrupt vector

30
20

MOV R1,R2
INC R3
NOP
";

#[test]
fn header_lines_land_in_data_slots_0_and_1() {
    let asm = assemble(SAMPLE_SOURCE);
    assert_eq!(asm.pc_start, 40);
    assert_eq!(asm.int_vector, 1);
    assert_eq!(asm.data.word(0), Some("0000000000101000"));
    assert_eq!(asm.data.word(1), Some("0000000000000001"));
}

#[test]
fn data_segment_appends_from_slot_2() {
    let asm = assemble(SAMPLE_SOURCE);
    assert_eq!(asm.data.word(2), Some("0000000000011110"));
    assert_eq!(asm.data.word(3), Some("0000000000010100"));
    assert_eq!(asm.data.cursor(), 4);
}

#[test]
fn code_segment_appends_from_slot_0() {
    let asm = assemble(SAMPLE_SOURCE);
    assert_eq!(asm.instructions.word(0), Some("0111000101000000")); // MOV R1,R2
    assert_eq!(asm.instructions.word(1), Some("0110000001100000")); // INC R3
    assert_eq!(asm.instructions.word(2), Some("0000000000000000")); // NOP
    assert_eq!(asm.instructions.cursor(), 3);
}

#[test]
fn data_segment_ends_at_first_non_digit_line_without_dropping_it() {
    // The MOV line terminates the data segment and must itself assemble.
    let source = "0\n0\n\n5\nMOV R1,R2\n";
    let asm = assemble(source);
    assert_eq!(asm.data.word(2), Some("0000000000000101"));
    assert_eq!(asm.instructions.word(0), Some("0111000101000000"));
    assert_eq!(asm.instructions.cursor(), 1);
}

#[test]
fn comment_and_blank_lines_are_skipped_in_the_code_segment() {
    let source = "0\n0\n\n; setup\n\nNOP\n; middle\nRET\n";
    let asm = assemble(source);
    assert_eq!(asm.instructions.cursor(), 2);
    assert_eq!(asm.instructions.word(1), Some("1100100000000000"));
}

#[test]
fn address_patch_places_words_at_absolute_index() {
    let source = format!("{SAMPLE_SOURCE}.10\nRET\n");
    let asm = assemble(&source);
    // Sequential cursor stays at 3; 3..=9 keep the zero word.
    assert_eq!(asm.instructions.cursor(), 3);
    for addr in 3..10 {
        assert_eq!(asm.instructions.word(addr), Some("0000000000000000"));
    }
    assert_eq!(asm.instructions.word(10), Some("1100100000000000"));
    assert!(asm.diagnostics.is_empty());
}

#[test]
fn two_word_instructions_span_patch_indices() {
    let source = format!("{SAMPLE_SOURCE}.20\nLDM R1,300\nRET\n");
    let asm = assemble(&source);
    assert_eq!(asm.instructions.word(20), Some("1101100000100000"));
    assert_eq!(asm.instructions.word(21), Some("0000000100101100")); // 300
    assert_eq!(asm.instructions.word(22), Some("1100100000000000"));
}

#[test]
fn multiple_patch_sections_run_in_source_order() {
    let source = format!("{SAMPLE_SOURCE}.10\nRET\n.12\nRTI\n");
    let asm = assemble(&source);
    assert_eq!(asm.instructions.word(10), Some("1100100000000000"));
    assert_eq!(asm.instructions.word(12), Some("1101000000000000"));
}

#[test]
fn patch_below_cursor_warns_and_overwrites() {
    let source = format!("{SAMPLE_SOURCE}.1\nRET\n");
    let asm = assemble(&source);
    assert_eq!(asm.instructions.word(1), Some("1100100000000000"));
    assert_eq!(asm.diagnostics.len(), 1);
    let warning = &asm.diagnostics[0];
    assert_eq!(warning.severity(), Severity::Warning);
    assert_eq!(warning.code(), "mfw001");
    assert_eq!(warning.kind(), AsmErrorKind::Memory);
}

#[test]
fn patch_past_memory_end_is_fatal() {
    let source = format!("{SAMPLE_SOURCE}.{MEMORY_WORDS}\nRET\n");
    let mut asm = Assembler::new();
    let diag = asm.assemble(&to_lines(&source)).unwrap_err();
    assert_eq!(diag.kind(), AsmErrorKind::Memory);
}

#[test]
fn unknown_mnemonic_reports_line_number() {
    let source = "0\n0\n\nNOP\nFOO R1\n";
    let mut asm = Assembler::new();
    let diag = asm.assemble(&to_lines(source)).unwrap_err();
    assert_eq!(diag.kind(), AsmErrorKind::Instruction);
    assert_eq!(diag.line(), 5);
}

#[test]
fn out_of_range_register_is_illegal_operand() {
    let source = "0\n0\n\nINC R7\n";
    let mut asm = Assembler::new();
    let diag = asm.assemble(&to_lines(source)).unwrap_err();
    assert_eq!(diag.kind(), AsmErrorKind::Operand);
}

#[test]
fn malformed_header_line_is_a_number_error() {
    let source = "start\n0\n\nNOP\n";
    let mut asm = Assembler::new();
    let diag = asm.assemble(&to_lines(source)).unwrap_err();
    assert_eq!(diag.kind(), AsmErrorKind::Number);
    assert_eq!(diag.line(), 1);
}

#[test]
fn missing_interrupt_vector_line_is_reported() {
    let mut asm = Assembler::new();
    let diag = asm.assemble(&to_lines("40\n")).unwrap_err();
    assert_eq!(diag.kind(), AsmErrorKind::Assembler);
    assert_eq!(diag.line(), 2);
}

fn run_in_workspace(tag: &str, source: &str, extra_args: &[&str]) -> (PathBuf, PathBuf, Result<super::AsmRunReport, super::AsmRunError>) {
    let dir = temp_workspace(tag);
    let input = dir.join("prog.asm");
    let outdir = dir.join("mem");
    fs::create_dir_all(&outdir).unwrap();
    fs::write(&input, source).unwrap();

    let mut args = vec![
        "assemble".to_string(),
        input.to_string_lossy().to_string(),
        outdir.to_string_lossy().to_string(),
    ];
    args.extend(extra_args.iter().map(|arg| arg.to_string()));
    let cli = Cli::try_parse_from(&args).expect("cli parses");
    let config = validate_cli(&cli).expect("cli validates");
    let result = run_with_config(&config);
    (input, outdir, result)
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("output readable")
        .lines()
        .map(|line| line.to_string())
        .collect()
}

#[test]
fn run_writes_both_images_with_full_address_space() {
    let (_, outdir, result) = run_in_workspace("images", SAMPLE_SOURCE, &[]);
    let report = result.expect("run succeeds");
    assert_eq!(report.pc_start(), 40);
    assert_eq!(report.instruction_words(), 3);
    assert_eq!(report.data_words(), 4);

    let instructions = read_lines(&outdir.join("prog_instructions.mem"));
    let data = read_lines(&outdir.join("prog_data.mem"));
    assert_eq!(instructions.len(), 3 + MEMORY_WORDS);
    assert_eq!(data.len(), 3 + MEMORY_WORDS);
    assert_eq!(instructions[3], " 511: 0000000000000000");
    assert_eq!(
        instructions.last().map(String::as_str),
        Some("   0: 0111000101000000")
    );
    assert_eq!(data.last().map(String::as_str), Some("   0: 0000000000101000"));
    assert_eq!(data[3 + MEMORY_WORDS - 2], "   1: 0000000000000001");
}

#[test]
fn repeated_runs_are_byte_identical() {
    let (input, outdir, result) = run_in_workspace("idempotent", SAMPLE_SOURCE, &[]);
    result.expect("first run succeeds");
    let first_instructions = fs::read(outdir.join("prog_instructions.mem")).unwrap();
    let first_data = fs::read(outdir.join("prog_data.mem")).unwrap();

    let cli = Cli::try_parse_from([
        "assemble",
        input.to_string_lossy().as_ref(),
        outdir.to_string_lossy().as_ref(),
    ])
    .unwrap();
    run_with_config(&validate_cli(&cli).unwrap()).expect("second run succeeds");

    assert_eq!(fs::read(outdir.join("prog_instructions.mem")).unwrap(), first_instructions);
    assert_eq!(fs::read(outdir.join("prog_data.mem")).unwrap(), first_data);
}

#[test]
fn werror_turns_patch_overwrite_warning_fatal() {
    let source = format!("{SAMPLE_SOURCE}.1\nRET\n");
    let (_, _, result) = run_in_workspace("werror", &source, &["--Werror"]);
    let err = result.expect_err("warnings upgraded");
    assert_eq!(err.error().kind(), AsmErrorKind::Assembler);
    assert!(err.diagnostics().iter().all(|diag| diag.severity() == Severity::Error));
}

#[test]
fn without_werror_patch_overwrite_only_warns() {
    let source = format!("{SAMPLE_SOURCE}.1\nRET\n");
    let (_, _, result) = run_in_workspace("warn-only", &source, &[]);
    let report = result.expect("run succeeds");
    assert_eq!(report.diagnostics().len(), 1);
    assert_eq!(report.diagnostics()[0].severity(), Severity::Warning);
}

#[test]
fn missing_input_file_fails_with_io_error() {
    let dir = temp_workspace("no-input");
    let cli = Cli::try_parse_from([
        "assemble",
        dir.join("absent.asm").to_string_lossy().as_ref(),
        dir.to_string_lossy().as_ref(),
    ])
    .unwrap();
    let err = run_with_config(&validate_cli(&cli).unwrap()).unwrap_err();
    assert_eq!(err.error().kind(), AsmErrorKind::Io);
}

#[test]
fn missing_output_directory_fails_before_encoding() {
    let dir = temp_workspace("no-outdir");
    let input = dir.join("prog.asm");
    // Source with an encoding error after the missing-directory failure
    // point; the I/O error must win because outputs open first.
    fs::write(&input, "0\n0\n\nFOO R1\n").unwrap();
    let cli = Cli::try_parse_from([
        "assemble",
        input.to_string_lossy().as_ref(),
        dir.join("absent").to_string_lossy().as_ref(),
    ])
    .unwrap();
    let err = run_with_config(&validate_cli(&cli).unwrap()).unwrap_err();
    assert_eq!(err.error().kind(), AsmErrorKind::Io);
}

#[test]
fn failed_run_reports_diagnostics_with_source_lines() {
    let (_, _, result) = run_in_workspace("diag", "0\n0\n\nINC R9\n", &[]);
    let err = result.unwrap_err();
    assert_eq!(err.error().kind(), AsmErrorKind::Operand);
    assert_eq!(err.diagnostics().len(), 1);
    assert_eq!(err.diagnostics()[0].line(), 4);
    assert_eq!(err.source_lines()[3], "INC R9");
}
