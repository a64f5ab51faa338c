#![forbid(unsafe_code)]

//! # ladoc (language agnostic documentor)
//!
//! Reads `/** ... */` doc comments out of source files and folds them into a
//! symbol tree: namespaces → classes → methods and properties.
//!
//! - [`parser`] classifies lines, parses `@tags` and assembles doc blocks,
//!   one file at a time.
//! - [`tree`] folds the blocks of every file, in order, into a [`SymbolTree`].
//! - [`grammar`] holds the tag table the parser checks tags against.
//!
//! Which files are read and how the tree is rendered is up to the caller.
//!
//! ```rust,no_run
//! use ladoc::{Documentor, SourceFile, TagGrammar};
//!
//! let files = vec![SourceFile::new("src/a.php", "/**\n * @class A\n */\nclass A {}\n")];
//! let doc = Documentor::new(TagGrammar::default()).document(&files);
//! for diagnostic in &doc.diagnostics {
//!     eprintln!("warning: {diagnostic}");
//! }
//! assert!(doc.tree.class("", "A").is_some());
//! ```

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod grammar;
pub mod model;
pub mod parser;
pub mod source;
pub mod tree;

pub use config::{load_grammar, GrammarConfig};
pub use diagnostic::{Diagnostic, DiagnosticKind, Location};
pub use error::{ConfigError, Result};
pub use grammar::TagGrammar;
pub use model::{ClassEntry, DocBlock, Member, SymbolTree, Tag, TagEntry, TagValue};
pub use source::SourceFile;
pub use tree::build_symbol_tree;

use rayon::prelude::*;
use serde::Serialize;

/// Result of documenting a set of files.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Documentation {
    pub tree: SymbolTree,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip)]
    pub blocks: Vec<DocBlock>,
}

/// Runs the whole pipeline with one compiled grammar.
#[derive(Debug, Clone, Default)]
pub struct Documentor {
    grammar: TagGrammar,
}

impl Documentor {
    pub fn new(grammar: TagGrammar) -> Self {
        Self { grammar }
    }

    pub fn grammar(&self) -> &TagGrammar {
        &self.grammar
    }

    /// Parse every file (in parallel), then fold all blocks in the order the
    /// files were given.
    pub fn document(&self, files: &[SourceFile]) -> Documentation {
        let parsed: Vec<_> = files
            .par_iter()
            .map(|file| parser::parse_file(file, &self.grammar))
            .collect();

        let mut blocks = Vec::new();
        let mut diagnostics = Vec::new();
        for (file_blocks, file_diagnostics) in parsed {
            blocks.extend(file_blocks);
            diagnostics.extend(file_diagnostics);
        }

        let (tree, tree_diagnostics) = build_symbol_tree(&blocks);
        diagnostics.extend(tree_diagnostics);

        tracing::debug!(
            files = files.len(),
            blocks = blocks.len(),
            diagnostics = diagnostics.len(),
            "documentation built"
        );

        Documentation {
            tree,
            diagnostics,
            blocks,
        }
    }
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
