//! Non-fatal warnings collected while reading doc comments.

use serde::Serialize;
use std::fmt;

/// What went wrong; each kind owns a printf-style message template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    UnknownTag,
    MissingArgument,
    TooManyParameters,
    PrimaryTagRedefinition,
    OutsideClass,
}

impl DiagnosticKind {
    pub fn template(&self) -> &'static str {
        match self {
            DiagnosticKind::UnknownTag => "Unknown tag @%s.",
            DiagnosticKind::MissingArgument => "Missing argument '%s' for tag @%s.",
            DiagnosticKind::TooManyParameters => "Too many parameters for tag @%s: '%s'.",
            DiagnosticKind::PrimaryTagRedefinition => {
                "Primary tag @%s ignored, block is already a '%s'."
            }
            DiagnosticKind::OutsideClass => "%s '%s' declared outside any class.",
        }
    }
}

/// Where a diagnostic (or a tag) comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: String,
    pub line: usize,
}

impl Location {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub line: usize,
    pub kind: DiagnosticKind,
    pub template: &'static str,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, location: &Location, args: &[&str]) -> Self {
        let template = kind.template();
        Self {
            file: location.file.clone(),
            line: location.line,
            kind,
            template,
            message: format_template(template, args),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.line, self.message)
    }
}

/// Substitute each `%s` with the next argument. Missing arguments leave the
/// placeholder in place; surplus arguments are ignored.
fn format_template(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut rest = template;
    while let Some(pos) = rest.find("%s") {
        out.push_str(&rest[..pos]);
        match args.next() {
            Some(arg) => out.push_str(arg),
            None => out.push_str("%s"),
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}
