//! Line classifier: one physical line at a time, one bit of carried state.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `/**` or `/*` alone on the line.
    CommentStart,
    /// `*/` alone on the line.
    CommentEnd,
    /// Any other line inside a comment.
    CommentBody,
    /// `// ...` outside a comment.
    LineComment,
    PlainData,
}

/// A classified source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based.
    pub number: usize,
    pub raw: String,
    /// Trimmed text with comment markers removed.
    pub text: String,
    pub kind: LineKind,
}

impl SourceLine {
    /// Classify `raw` and advance `in_comment`.
    pub fn classify(number: usize, raw: &str, in_comment: &mut bool) -> Self {
        let (kind, state, text) = classify_line(*in_comment, raw);
        *in_comment = state;
        Self {
            number,
            raw: raw.to_string(),
            text,
            kind,
        }
    }
}

/// Classify a line given whether we are inside a comment.
///
/// Returns the kind, the state for the next line, and the normalized text.
pub fn classify_line(in_comment: bool, raw: &str) -> (LineKind, bool, String) {
    let text = raw.trim();

    if !in_comment && (text == "/**" || text == "/*") {
        return (LineKind::CommentStart, true, String::new());
    }

    if in_comment && text == "*/" {
        return (LineKind::CommentEnd, false, String::new());
    }

    if in_comment {
        let body = text.strip_prefix('*').unwrap_or(text);
        let body = body.strip_prefix(' ').unwrap_or(body);
        return (LineKind::CommentBody, true, body.to_string());
    }

    if let Some(rest) = text.strip_prefix("//") {
        return (LineKind::LineComment, false, rest.trim().to_string());
    }

    (LineKind::PlainData, false, text.to_string())
}
