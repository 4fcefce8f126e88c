//! Decoding of the line-prefix notation the model uses inside file blocks.
//!
//! Every line keeps its place in the output. Known two-character prefixes
//! (`"+ "`, `"- "`, `"  "`) are stripped, anything else passes through as-is.

const ADDED_PREFIX: &str = "+ ";
const REMOVED_PREFIX: &str = "- ";
const CONTEXT_PREFIX: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineKind {
    Added,
    Removed,
    Context,
}

impl DiffLineKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Added => "diff-add",
            Self::Removed => "diff-remove",
            Self::Context => "diff-context",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffLine<'a> {
    pub kind: DiffLineKind,
    pub text: &'a str,
}

pub fn classify_line(line: &str) -> DiffLine<'_> {
    if let Some(text) = line.strip_prefix(ADDED_PREFIX) {
        return DiffLine {
            kind: DiffLineKind::Added,
            text,
        };
    }
    if let Some(text) = line.strip_prefix(REMOVED_PREFIX) {
        return DiffLine {
            kind: DiffLineKind::Removed,
            text,
        };
    }
    let text = line.strip_prefix(CONTEXT_PREFIX).unwrap_or(line);
    DiffLine {
        kind: DiffLineKind::Context,
        text,
    }
}

pub fn diff_lines(body: &str) -> impl Iterator<Item = DiffLine<'_>> {
    body.split('\n').map(classify_line)
}

pub fn decode(body: &str) -> String {
    diff_lines(body)
        .map(|line| line.text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Removes one leading fence line (```` ```lang ```` with a lowercase or
/// empty tag, followed by a newline) and one trailing ```` ``` ````.
pub fn strip_fences(body: &str) -> &str {
    let mut inner = body;
    if let Some(rest) = inner.strip_prefix("```") {
        let tag_len = rest
            .bytes()
            .take_while(|byte| byte.is_ascii_lowercase())
            .count();
        if rest[tag_len..].starts_with('\n') {
            inner = &rest[tag_len + 1..];
        }
    }
    inner.strip_suffix("```").unwrap_or(inner)
}

pub fn file_content(raw_body: &str) -> String {
    decode(strip_fences(raw_body.trim()))
}
