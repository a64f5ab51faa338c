//! Tag parser: turns `@name remainder` into a [`Tag`].

use crate::diagnostic::{Diagnostic, DiagnosticKind, Location};
use crate::grammar::{TagGrammar, TagRule};
use crate::model::{Params, Tag, TagValue};
use regex::Regex;
use std::sync::LazyLock;

static RE_TAG_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@(\S*)\s*(.*)$").unwrap());

/// A tag that was recognized, possibly with a non-fatal warning attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTag {
    pub tag: Tag,
    /// Missing argument or too many parameters; the tag is kept either way.
    pub diagnostic: Option<Diagnostic>,
}

/// Split a comment body line starting with `@` into tag name and remainder.
pub fn split_tag_line(text: &str) -> Option<(&str, &str)> {
    let caps = RE_TAG_LINE.captures(text)?;
    let name = caps.get(1).map_or("", |m| m.as_str());
    let rest = caps.get(2).map_or("", |m| m.as_str());
    Some((name, rest))
}

/// Parse one tag against the grammar.
///
/// Unknown tags are the only hard failure; they are reported and dropped by
/// the caller.
pub fn parse_tag(
    name: &str,
    remainder: &str,
    grammar: &TagGrammar,
    location: &Location,
) -> Result<ParsedTag, Diagnostic> {
    let rule = grammar
        .rule(name)
        .ok_or_else(|| Diagnostic::new(DiagnosticKind::UnknownTag, location, &[name]))?;

    let pattern = match rule {
        // Trailing text after a flag tag is ignored.
        TagRule::Flag => {
            return Ok(ParsedTag {
                tag: Tag {
                    name: name.to_string(),
                    value: TagValue::Flag,
                    location: location.clone(),
                },
                diagnostic: None,
            })
        }
        TagRule::Pattern(pattern) => pattern,
    };

    let binding = pattern.bind(remainder);

    let diagnostic = if let Some(ref missing) = binding.missing {
        Some(Diagnostic::new(
            DiagnosticKind::MissingArgument,
            location,
            &[missing.as_str(), name],
        ))
    } else {
        binding.overflow.as_deref().map(|extra| {
            Diagnostic::new(DiagnosticKind::TooManyParameters, location, &[name, extra])
        })
    };

    Ok(ParsedTag {
        tag: Tag {
            name: name.to_string(),
            value: TagValue::Params(Params::new(binding.params)),
            location: location.clone(),
        },
        diagnostic,
    })
}
