//! Markdown-ish rendering of model output to an HTML fragment.
//!
//! Text is escaped before any markdown pass runs, so the only tags in the
//! output are the ones emitted here. File blocks are replaced by file cards
//! and are not seen by the markdown passes.

use crate::engine::diff;
use crate::engine::extract::FileBlock;
use regex::{Captures, Regex};
use std::sync::OnceLock;

struct Patterns {
    fence: Regex,
    bullet: Regex,
    bold: Regex,
    inline_code: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        fence: Regex::new(r"(?s)```(.*?)```").expect("valid fence pattern"),
        bullet: Regex::new(r"(?m)^\* (.*)$").expect("valid bullet pattern"),
        bold: Regex::new(r"\*\*(.*?)\*\*").expect("valid bold pattern"),
        inline_code: Regex::new(r"`([^`]+)`").expect("valid inline code pattern"),
    })
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn render_fence(captures: &Captures<'_>) -> String {
    let mut lines: Vec<&str> = captures[1].split('\n').collect();
    if lines.first().is_some_and(|first| !first.contains(' ')) {
        lines.remove(0);
    }
    let body: String = lines
        .iter()
        .map(|line| format!("<span>{line}</span>"))
        .collect();
    format!("<pre><code>{body}</code></pre>")
}

/// Markdown passes run after escaping.
pub fn render_text(text: &str) -> String {
    let patterns = patterns();
    let escaped = escape_html(text);
    let fenced = patterns.fence.replace_all(&escaped, render_fence);
    let bulleted = patterns
        .bullet
        .replace_all(&fenced, "<div class=\"log-ai-thought\">• ${1}</div>");
    let bold = patterns.bold.replace_all(&bulleted, "<strong>${1}</strong>");
    patterns
        .inline_code
        .replace_all(&bold, "<code>${1}</code>")
        .into_owned()
}

pub fn render_file_card(block: &FileBlock) -> String {
    let status_class = if block.is_new { "new" } else { "updated" };
    let body = diff::strip_fences(block.raw_content.trim());
    let lines: String = diff::diff_lines(body)
        .map(|line| {
            format!(
                "<span class=\"{}\">{}</span>",
                line.kind.css_class(),
                escape_html(line.text)
            )
        })
        .collect();
    format!(
        "<details class=\"file-card\"><summary><div class=\"file-card-header\">\
         <span class=\"file-status {status_class}\">{status}</span>\
         <span class=\"file-name\">{name}</span></div>\
         <span class=\"file-expand-hint\">Click to expand</span></summary>\
         <div class=\"file-card-content\"><pre><code>{lines}</code></pre></div></details>",
        status = block.status_label(),
        name = escape_html(&block.file_name),
    )
}

/// Renders a whole response buffer. `blocks` must be the blocks found in
/// `buffer`, in buffer order.
pub fn render_response(buffer: &str, blocks: &[FileBlock]) -> String {
    let mut html = String::with_capacity(buffer.len() * 2);
    let mut cursor = 0;
    for block in blocks {
        if block.span.start < cursor || block.span.end > buffer.len() {
            continue;
        }
        html.push_str(&render_text(&buffer[cursor..block.span.start]));
        html.push_str(&render_file_card(block));
        cursor = block.span.end;
    }
    html.push_str(&render_text(&buffer[cursor..]));
    html
}
