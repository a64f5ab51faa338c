//! Parser: lines → tags → doc blocks, one file at a time.

pub mod docblock;
pub mod line;
pub mod tag;

use crate::diagnostic::Diagnostic;
use crate::grammar::TagGrammar;
use crate::model::DocBlock;
use crate::source::SourceFile;

pub use docblock::assemble_blocks;
pub use line::{classify_line, LineKind, SourceLine};
pub use tag::{parse_tag, ParsedTag};

/// Parse one source file into its doc blocks and diagnostics.
pub fn parse_file(source: &SourceFile, grammar: &TagGrammar) -> (Vec<DocBlock>, Vec<Diagnostic>) {
    assemble_blocks(&source.id, source.lines(), grammar)
}
