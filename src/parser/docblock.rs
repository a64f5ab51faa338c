//! DocBlock assembler: line-by-line state machine over one file.
//!
//! Groups classified lines into doc comments, hands `@tag` lines to the tag
//! parser and accumulates everything else as free text. Blocks without a
//! primary tag are not symbols: their text is merged into the previous block
//! as supplementary comments.

use crate::diagnostic::{Diagnostic, DiagnosticKind, Location};
use crate::grammar::TagGrammar;
use crate::model::{DocBlock, LineBound, Tag, TagEntry};
use crate::parser::line::{LineKind, SourceLine};
use crate::parser::tag::{parse_tag, split_tag_line};
use std::sync::Arc;

enum State {
    Outside,
    InBlock(DocBlock),
}

struct Assembler<'g> {
    grammar: &'g TagGrammar,
    file: Arc<str>,
    state: State,
    blocks: Vec<DocBlock>,
    diagnostics: Vec<Diagnostic>,
}

/// Assemble the doc blocks of one file from its numbered lines.
pub fn assemble_blocks<'a, I>(
    file: &str,
    lines: I,
    grammar: &TagGrammar,
) -> (Vec<DocBlock>, Vec<Diagnostic>)
where
    I: IntoIterator<Item = (usize, &'a str)>,
{
    let mut asm = Assembler {
        grammar,
        file: Arc::from(file),
        state: State::Outside,
        blocks: Vec::new(),
        diagnostics: Vec::new(),
    };

    let mut in_comment = false;
    let mut last_line = 0;
    for (number, raw) in lines {
        let line = SourceLine::classify(number, raw, &mut in_comment);
        asm.process_line(line);
        last_line = number;
    }

    // Unterminated comment: close it on the last line.
    if let State::InBlock(mut block) = std::mem::replace(&mut asm.state, State::Outside) {
        tracing::debug!(file, from = block.from_line, "unterminated doc comment");
        block.set_line(LineBound::To, last_line);
        asm.finalize(block);
    }

    tracing::debug!(
        file,
        blocks = asm.blocks.len(),
        diagnostics = asm.diagnostics.len(),
        "assembled doc blocks"
    );
    (asm.blocks, asm.diagnostics)
}

impl Assembler<'_> {
    fn process_line(&mut self, line: SourceLine) {
        match line.kind {
            LineKind::CommentStart => {
                self.state = State::InBlock(DocBlock::new(self.file.clone(), line.number));
            }
            LineKind::CommentBody => {
                if let State::InBlock(mut block) =
                    std::mem::replace(&mut self.state, State::Outside)
                {
                    self.body_line(&mut block, &line);
                    self.state = State::InBlock(block);
                }
            }
            LineKind::CommentEnd => {
                if let State::InBlock(mut block) =
                    std::mem::replace(&mut self.state, State::Outside)
                {
                    block.set_line(LineBound::To, line.number);
                    self.finalize(block);
                }
            }
            LineKind::LineComment => {
                if let (State::Outside, Some(last)) = (&self.state, self.blocks.last_mut()) {
                    last.comments.push(line.text);
                }
            }
            LineKind::PlainData => {}
        }
    }

    fn body_line(&mut self, block: &mut DocBlock, line: &SourceLine) {
        let Some((name, remainder)) = split_tag_line(&line.text) else {
            block.text.push_str(&line.text);
            block.text.push('\n');
            return;
        };

        let location = Location::new(&*self.file, line.number);
        let primary = self.grammar.is_primary(name);

        if primary && block.is_typed() {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::PrimaryTagRedefinition,
                &location,
                &[name, block.kind.as_str()],
            ));
            return;
        }

        match parse_tag(name, remainder, self.grammar, &location) {
            Ok(parsed) => {
                self.diagnostics.extend(parsed.diagnostic);
                if primary {
                    block.kind = name.to_string();
                }
                self.store(block, parsed.tag);
            }
            Err(diagnostic) => self.diagnostics.push(diagnostic),
        }
    }

    fn store(&self, block: &mut DocBlock, tag: Tag) {
        if self.grammar.is_multi(&tag.name) {
            match block
                .tags
                .entry(tag.name.clone())
                .or_insert_with(|| TagEntry::Multi(Vec::new()))
            {
                TagEntry::Multi(tags) => tags.push(tag),
                single => *single = TagEntry::Multi(vec![tag]),
            }
        } else {
            block.tags.insert(tag.name.clone(), TagEntry::Single(tag));
        }
    }

    fn finalize(&mut self, mut block: DocBlock) {
        block.text = block.text.trim().to_string();

        if block.is_typed() {
            self.blocks.push(block);
            return;
        }

        match self.blocks.last_mut() {
            Some(previous) => previous.comments.extend(
                block
                    .text
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string),
            ),
            None => tracing::trace!(
                file = &*self.file,
                line = block.from_line,
                "untyped block without a previous block, text dropped"
            ),
        }
    }
}
