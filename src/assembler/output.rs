use std::io::{self, Write};

use crate::core::memspace::MemorySpace;

const FORMAT: &str = "mti";
const ADDR_RADIX: char = 'd';
const DATA_RADIX: char = 'b';
const VERSION: &str = "1.0";
const WORDS_PER_LINE: u32 = 1;

pub(super) const MEMORY_FILE_EXTENSION: &str = ".mem";
pub(super) const INSTRUCTION_FILE_IDENTIFIER: &str = "_instructions";
pub(super) const DATA_FILE_IDENTIFIER: &str = "_data";

/// The fixed three-line header of every memory image (two comment lines
/// plus a separating blank line).
pub(super) fn memory_file_header() -> String {
    format!(
        "// memory data file (do not edit the following line - required for mem load use)\n\
         // format={FORMAT} addressradix={ADDR_RADIX} dataradix={DATA_RADIX} \
         version={VERSION} wordsperline={WORDS_PER_LINE}\n\n"
    )
}

/// Serialize one memory space, highest address first, one word per line:
/// a 4-character right-justified decimal address, `": "`, and the 16-bit
/// word. Purely a serialization step; no validation.
pub(super) fn write_mem_file<W: Write>(mut out: W, space: &MemorySpace) -> io::Result<()> {
    out.write_all(memory_file_header().as_bytes())?;
    for addr in (0..space.words().len()).rev() {
        writeln!(out, "{:4}: {}", addr, space.words()[addr])?;
    }
    Ok(())
}
