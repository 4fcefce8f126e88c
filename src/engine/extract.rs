//! File-block detection over a growing response buffer.
//!
//! A block is `[start of file: NAME]\n` … `[end of file: NAME]`, closed by
//! the nearest end marker carrying the byte-identical raw name.

use crate::engine::diff;
use crate::project::ProjectFiles;
use std::collections::HashMap;
use std::ops::Range;

pub const START_MARKER: &str = "[start of file: ";
pub const END_MARKER: &str = "[end of file: ";

/// Byte offsets of a complete block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMatch {
    pub raw_name: Range<usize>,
    pub body: Range<usize>,
    pub span: Range<usize>,
}

impl BlockMatch {
    pub fn file_name<'a>(&self, text: &'a str) -> &'a str {
        text[self.raw_name.clone()].trim()
    }

    pub fn body<'a>(&self, text: &'a str) -> &'a str {
        &text[self.body.clone()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlock {
    pub file_name: String,
    pub raw_content: String,
    pub is_new: bool,
    pub span: Range<usize>,
}

impl FileBlock {
    pub fn status_label(&self) -> &'static str {
        if self.is_new {
            "Created"
        } else {
            "Updated"
        }
    }
}

/// Tries the start marker at `marker_start`. The raw name runs to the first
/// `]` on the marker line that is directly followed by `\n`.
pub fn match_block(text: &str, marker_start: usize) -> Option<BlockMatch> {
    let name_start = marker_start + START_MARKER.len();
    let line = text.get(name_start..)?;
    let line = &line[..line.find('\n').map_or(line.len(), |end| end + 1)];
    let name_end = name_start + line.find("]\n")?;

    let body_start = name_end + 2;
    let end_marker = format!("{END_MARKER}{}]", &text[name_start..name_end]);
    let body_end = body_start + text[body_start..].find(&end_marker)?;
    Some(BlockMatch {
        raw_name: name_start..name_end,
        body: body_start..body_end,
        span: marker_start..body_end + end_marker.len(),
    })
}

/// Incremental extractor for one model turn.
///
/// Every scan yields the same block set as scanning the whole buffer from
/// the start. Decisions before the first start marker that is still open
/// can no longer change, so scanning resumes there. Blocks found after an
/// open marker stay provisional: when that marker closes, the block it
/// swallows drops out of the set. Each block is applied to the table once,
/// when first seen.
#[derive(Debug, Default)]
pub struct BlockScanner {
    resume: usize,
    settled: usize,
    blocks: Vec<FileBlock>,
    seen: HashMap<usize, bool>,
}

impl BlockScanner {
    pub fn blocks(&self) -> &[FileBlock] {
        &self.blocks
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Scans `buffer` (a prefix-extension of earlier calls within the turn)
    /// and returns the blocks newly applied to `files`.
    pub fn scan(&mut self, buffer: &str, files: &mut ProjectFiles) -> Vec<FileBlock> {
        if buffer.len() < self.resume || !buffer.is_char_boundary(self.resume) {
            tracing::warn!(
                resume = self.resume,
                len = buffer.len(),
                "response buffer shrank mid-turn, rescanning from start"
            );
            self.reset();
        }

        self.blocks.truncate(self.settled);
        let mut applied = Vec::new();
        let mut open_marker = false;
        let mut cursor = self.resume;
        while let Some(offset) = buffer[cursor..].find(START_MARKER) {
            let marker_start = cursor + offset;
            let Some(found) = match_block(buffer, marker_start) else {
                open_marker = true;
                cursor = marker_start + START_MARKER.len();
                continue;
            };
            cursor = found.span.end;

            let file_name = found.file_name(buffer).to_string();
            let raw_content = found.body(buffer).to_string();
            let is_new = match self.seen.get(&found.span.start) {
                Some(&is_new) => is_new,
                None => {
                    let is_new = files.insert(file_name.clone(), diff::file_content(&raw_content));
                    tracing::debug!(file = %file_name, is_new, "wrote file from response");
                    self.seen.insert(found.span.start, is_new);
                    applied.push(self.blocks.len());
                    is_new
                }
            };
            self.blocks.push(FileBlock {
                file_name,
                raw_content,
                is_new,
                span: found.span,
            });
            if !open_marker {
                self.resume = cursor;
                self.settled = self.blocks.len();
            }
        }
        applied
            .into_iter()
            .map(|index| self.blocks[index].clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn block(name: &str, body: &str) -> String {
        format!("[start of file: {name}]\n{body}[end of file: {name}]")
    }

    fn names(blocks: &[FileBlock]) -> Vec<(&str, Range<usize>)> {
        blocks
            .iter()
            .map(|block| (block.file_name.as_str(), block.span.clone()))
            .collect()
    }

    #[test]
    fn finds_single_block_with_trimmed_name() {
        let text = "intro\n[start of file:  a.html ]\n<p>hi</p>\n[end of file:  a.html ]\ntail";
        let found = match_block(text, 6).expect("block should be found");
        assert_eq!(found.file_name(text), "a.html");
        assert_eq!(found.body(text), "<p>hi</p>\n");
        assert_eq!(&text[found.span.clone()], &text[6..text.len() - 5]);
    }

    #[test]
    fn end_marker_for_other_name_does_not_close_block() {
        let text = "[start of file: a.html]\nx\n[end of file: b.html]\ny\n[end of file: a.html]";
        let found = match_block(text, 0).expect("block should close on its own name");
        assert_eq!(found.body(text), "x\n[end of file: b.html]\ny\n");
    }

    #[test]
    fn nearest_matching_end_marker_wins() {
        let text = format!("{}\n[end of file: a.js]", block("a.js", "one\n"));
        let found = match_block(&text, 0).expect("block should be found");
        assert_eq!(found.body(&text), "one\n");
    }

    #[test]
    fn start_marker_requires_newline_after_bracket() {
        assert!(match_block("[start of file: a.js] x\n[end of file: a.js]", 0).is_none());
    }

    #[test]
    fn name_runs_to_the_bracket_ending_the_line() {
        let text = "[start of file: a]b.js]\nx\n[end of file: a]b.js]";
        let found = match_block(text, 0).expect("bracket inside the name is allowed");
        assert_eq!(found.file_name(text), "a]b.js");
        assert_eq!(found.body(text), "x\n");
    }

    #[test]
    fn unmatched_start_marker_yields_nothing() {
        let mut files = ProjectFiles::new();
        let mut scanner = BlockScanner::default();
        let applied = scanner.scan("[start of file: x.js]\nconsole.log(1)", &mut files);
        assert!(applied.is_empty());
        assert!(scanner.blocks().is_empty());
        assert!(files.is_empty());
    }

    #[test]
    fn open_block_does_not_hide_later_complete_block() {
        let text = format!("[start of file: a.js]\npending\n{}", block("b.css", "p{}\n"));
        let mut files = ProjectFiles::new();
        let mut scanner = BlockScanner::default();
        scanner.scan(&text, &mut files);
        assert_eq!(scanner.blocks().len(), 1);
        assert_eq!(scanner.blocks()[0].file_name, "b.css");
    }

    #[test]
    fn rescanning_unchanged_buffer_is_idempotent() {
        let buffer = format!(
            "{}\nsome text\n{}",
            block("index.html", "<h1>x</h1>\n"),
            block("style.css", "h1{}\n")
        );
        let mut files = ProjectFiles::new();
        let mut scanner = BlockScanner::default();

        assert_eq!(scanner.scan(&buffer, &mut files).len(), 2);
        let first = files.clone();
        assert!(scanner.scan(&buffer, &mut files).is_empty());
        assert_eq!(files, first);
        assert_eq!(scanner.blocks().len(), 2);
    }

    #[test]
    fn growing_prefixes_apply_each_block_once() {
        let full = format!(
            "Sure.\n{}\nand\n{}",
            block("index.html", "```html\n<p>a</p>\n```\n"),
            block("script.js", "+ go();\n")
        );
        let mut files = ProjectFiles::new();
        let mut scanner = BlockScanner::default();
        let mut applied = 0;
        for end in (1..=full.len()).filter(|end| full.is_char_boundary(*end)) {
            applied += scanner.scan(&full[..end], &mut files).len();
        }
        assert_eq!(applied, 2);
        assert_eq!(files.get("index.html"), Some("<p>a</p>\n"));
        assert_eq!(files.get("script.js"), Some("go();"));
    }

    #[test]
    fn outer_block_closing_after_inner_matches_whole_buffer_scan() {
        let full = "[start of file: a.md]\nsee\n[start of file: b.js]\nx()\n[end of file: b.js]\nmore\n[end of file: a.md]\n";

        let mut streamed = ProjectFiles::new();
        let mut scanner = BlockScanner::default();
        let mut applied = Vec::new();
        for end in (1..=full.len()).filter(|end| full.is_char_boundary(*end)) {
            applied.extend(scanner.scan(&full[..end], &mut streamed));
        }

        let mut whole = ProjectFiles::new();
        let mut reference = BlockScanner::default();
        reference.scan(full, &mut whole);

        assert_eq!(names(scanner.blocks()), names(reference.blocks()));
        assert_eq!(names(scanner.blocks())[0].0, "a.md");
        for (name, content) in whole.iter() {
            assert_eq!(streamed.get(name), Some(content), "{name}");
        }
        assert_eq!(
            streamed.get("a.md"),
            Some("see\n[start of file: b.js]\nx()\n[end of file: b.js]\nmore")
        );
        // b.js looked complete before a.md closed, so it was written too.
        assert_eq!(streamed.get("b.js"), Some("x()"));
        let order: Vec<_> = applied.iter().map(|block| block.file_name.as_str()).collect();
        assert_eq!(order, vec!["b.js", "a.md"]);
    }

    #[test]
    fn provisional_block_is_not_applied_twice() {
        let prefix = format!("[start of file: a.md]\nsee\n{}\n", block("b.js", "x()\n"));
        let mut files = ProjectFiles::new();
        let mut scanner = BlockScanner::default();

        assert_eq!(scanner.scan(&prefix, &mut files).len(), 1);
        let grown = format!("{prefix}still open\n");
        assert!(scanner.scan(&grown, &mut files).is_empty());
        assert_eq!(scanner.blocks().len(), 1);
        assert!(scanner.blocks()[0].is_new);
    }

    #[test]
    fn later_block_for_same_name_overwrites_earlier() {
        let buffer = format!("{}\n{}", block("a.js", "one\n"), block("a.js", "two\n"));
        let mut files = ProjectFiles::new();
        let mut scanner = BlockScanner::default();
        scanner.scan(&buffer, &mut files);

        assert_eq!(files.get("a.js"), Some("two"));
        let statuses: Vec<_> = scanner.blocks().iter().map(|b| b.is_new).collect();
        assert_eq!(statuses, vec![true, false]);
    }

    #[test]
    fn new_versus_updated_follows_table_state() {
        let mut files = ProjectFiles::new();
        let mut first = BlockScanner::default();
        first.scan(&block("index.html", "<p>1</p>\n"), &mut files);
        assert_eq!(first.blocks()[0].status_label(), "Created");

        let mut second = BlockScanner::default();
        second.scan(&block("index.html", "<p>2</p>\n"), &mut files);
        assert_eq!(second.blocks()[0].status_label(), "Updated");
    }

    #[test]
    fn shrunk_buffer_resets_scanner() {
        let mut files = ProjectFiles::new();
        let mut scanner = BlockScanner::default();
        scanner.scan(&block("a.js", "x\n"), &mut files);
        assert!(scanner.scan("", &mut files).is_empty());
        assert!(scanner.blocks().is_empty());
    }
}
