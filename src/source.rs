//! Source files as handed over by a file provider.

/// Tab stops are expanded to this many spaces.
pub const TAB_WIDTH: usize = 4;

/// One input file: a stable identifier and its normalized content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub id: String,
    pub content: String,
}

impl SourceFile {
    /// Normalize `content`: CRLF (and lone CR) become LF, tabs become
    /// spaces, trailing whitespace is trimmed. Leading blank lines are kept
    /// so line numbers match the file on disk.
    pub fn new(id: impl Into<String>, content: &str) -> Self {
        let content = content
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .replace('\t', &" ".repeat(TAB_WIDTH));
        Self {
            id: id.into(),
            content: content.trim_end().to_string(),
        }
    }

    /// Lines numbered from 1.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.content.split('\n').enumerate().map(|(i, l)| (i + 1, l))
    }
}
