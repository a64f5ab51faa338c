//! Symbol tree builder: folds the ordered block sequence into
//! namespace → class → {methods, properties}.
//!
//! Blocks never name their owner. A method or property belongs to the most
//! recent `@class` block in fold order, and a class to the most recent
//! `@namespace`. Both pieces of context carry across file boundaries.

use crate::diagnostic::{Diagnostic, DiagnosticKind, Location};
use crate::model::{ClassEntry, DocBlock, Member, SymbolTree, TagMap};
use std::collections::BTreeMap;

/// Class currently receiving members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRef {
    pub namespace: String,
    pub name: String,
}

/// Context threaded through the fold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldState {
    /// Empty string is the root namespace.
    pub namespace: String,
    pub class: Option<ClassRef>,
}

#[derive(Debug, Clone, Copy)]
enum MemberKind {
    Method,
    Constructor,
    Property,
}

impl MemberKind {
    fn label(&self) -> &'static str {
        match self {
            MemberKind::Method => "Method",
            MemberKind::Constructor => "Constructor",
            MemberKind::Property => "Property",
        }
    }
}

/// Build a symbol tree from blocks in global file order.
///
/// Each call starts from an empty tree and an empty fold state.
pub fn build_symbol_tree<'a, I>(blocks: I) -> (SymbolTree, Vec<Diagnostic>)
where
    I: IntoIterator<Item = &'a DocBlock>,
{
    let mut tree = SymbolTree::default();
    let mut diagnostics = Vec::new();

    let state = blocks.into_iter().fold(FoldState::default(), |state, block| {
        fold_block(state, block, &mut tree, &mut diagnostics)
    });

    tracing::debug!(
        classes = tree.class_count(),
        namespace = %state.namespace,
        "symbol tree built"
    );
    (tree, diagnostics)
}

/// Fold one block into the tree and return the next state.
pub fn fold_block(
    state: FoldState,
    block: &DocBlock,
    tree: &mut SymbolTree,
    diagnostics: &mut Vec<Diagnostic>,
) -> FoldState {
    match block.kind.as_str() {
        "namespace" => match symbol_name(block, "namespace") {
            Some(name) => FoldState {
                namespace: name.to_string(),
                ..state
            },
            None => state,
        },
        "class" => match symbol_name(block, "class") {
            Some(name) => add_class(state, name, block, tree),
            None => state,
        },
        "method" => add_member(state, MemberKind::Method, block, tree, diagnostics),
        "constructor" => add_member(state, MemberKind::Constructor, block, tree, diagnostics),
        "property" => add_member(state, MemberKind::Property, block, tree, diagnostics),
        other => {
            tracing::trace!(kind = other, file = &*block.file, "block type not part of the tree");
            state
        }
    }
}

/// Name parameter of the block's primary tag. A block whose name failed to
/// bind already produced a parser diagnostic and is skipped.
fn symbol_name<'b>(block: &'b DocBlock, tag: &str) -> Option<&'b str> {
    let name = block.tag(tag).and_then(|t| t.param("name"));
    if name.is_none() {
        tracing::debug!(
            file = &*block.file,
            line = block.from_line,
            "@{} block without a name skipped",
            tag
        );
    }
    name
}

fn add_class(state: FoldState, name: &str, block: &DocBlock, tree: &mut SymbolTree) -> FoldState {
    let entry = ClassEntry {
        file: block.file.clone(),
        line: block.to_line + 1,
        text: block.text.clone(),
        comments: block.comments.clone(),
        tags: tags_without(block, "class"),
        methods: BTreeMap::new(),
        properties: BTreeMap::new(),
    };

    let classes = tree.namespaces.entry(state.namespace.clone()).or_default();
    if classes.insert(name.to_string(), entry).is_some() {
        tracing::debug!(namespace = %state.namespace, class = name, "class redefined, last one wins");
    }

    FoldState {
        class: Some(ClassRef {
            namespace: state.namespace.clone(),
            name: name.to_string(),
        }),
        ..state
    }
}

fn add_member(
    state: FoldState,
    kind: MemberKind,
    block: &DocBlock,
    tree: &mut SymbolTree,
    diagnostics: &mut Vec<Diagnostic>,
) -> FoldState {
    let (tag, name) = match kind {
        MemberKind::Constructor => ("constructor", "constructor"),
        MemberKind::Method => match symbol_name(block, "method") {
            Some(name) => ("method", name),
            None => return state,
        },
        MemberKind::Property => match symbol_name(block, "property") {
            Some(name) => ("property", name),
            None => return state,
        },
    };

    let entry = state.class.as_ref().and_then(|class| {
        tree.namespaces
            .get_mut(&class.namespace)
            .and_then(|classes| classes.get_mut(&class.name))
    });

    let Some(entry) = entry else {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::OutsideClass,
            &Location::new(&*block.file, block.from_line),
            &[kind.label(), name],
        ));
        return state;
    };

    let member = Member {
        line: block.to_line + 1,
        text: block.text.clone(),
        comments: block.comments.clone(),
        tags: tags_without(block, tag),
    };

    let members = match kind {
        MemberKind::Property => &mut entry.properties,
        MemberKind::Method | MemberKind::Constructor => &mut entry.methods,
    };
    members.insert(name.to_string(), member);

    state
}

fn tags_without(block: &DocBlock, tag: &str) -> TagMap {
    let mut tags = block.tags.clone();
    tags.remove(tag);
    tags
}
