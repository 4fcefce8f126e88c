//! Turns the HTML fragment produced by `engine::render` into egui widgets.
//!
//! Only the closed tag set the renderer emits is understood. Every `<` in
//! the fragment starts one of those tags because text content is escaped.

use crate::engine::diff::DiffLineKind;
use crate::theme::Theme;
use eframe::egui::{self, text::LayoutJob, Color32, FontId, RichText, TextFormat};
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub code: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileCardView {
    pub status: String,
    pub is_new: bool,
    pub name: String,
    pub lines: Vec<(DiffLineKind, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Text(Vec<Span>),
    Thought(Vec<Span>),
    Code(Vec<String>),
    FileCard(FileCardView),
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<(/?)([a-z]+)([^>]*)>").expect("valid tag pattern"))
}

fn class_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"class="([^"]*)""#).expect("valid class pattern"))
}

pub fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpanRole {
    CodeLine,
    Status,
    Name,
    Hint,
    Diff(DiffLineKind),
}

#[derive(Default)]
struct Parser {
    blocks: Vec<Block>,
    inline: Vec<Span>,
    bold: bool,
    inline_code: bool,
    thought: Option<Vec<Span>>,
    code: Option<Vec<String>>,
    card: Option<FileCardView>,
    span_role: Option<SpanRole>,
    span_text: String,
}

impl Parser {
    fn text(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        let text = unescape(raw);
        if self.span_role.is_some() {
            self.span_text.push_str(&text);
            return;
        }
        if self.card.is_some() || self.code.is_some() {
            return;
        }
        let span = Span {
            text,
            bold: self.bold,
            code: self.inline_code,
        };
        match self.thought.as_mut() {
            Some(thought) => thought.push(span),
            None => self.inline.push(span),
        }
    }

    fn flush_inline(&mut self) {
        let mut spans = std::mem::take(&mut self.inline);
        if let Some(first) = spans.first_mut() {
            first.text = first.text.trim_start_matches('\n').to_string();
        }
        if let Some(last) = spans.last_mut() {
            last.text = last.text.trim_end_matches('\n').to_string();
        }
        spans.retain(|span| !span.text.is_empty());
        if spans.iter().any(|span| !span.text.trim().is_empty()) {
            self.blocks.push(Block::Text(spans));
        }
    }

    fn span_role(&self, class: &str) -> Option<SpanRole> {
        if self.card.is_some() {
            return match class {
                "file-status new" | "file-status updated" => Some(SpanRole::Status),
                "file-name" => Some(SpanRole::Name),
                "file-expand-hint" => Some(SpanRole::Hint),
                "diff-add" => Some(SpanRole::Diff(DiffLineKind::Added)),
                "diff-remove" => Some(SpanRole::Diff(DiffLineKind::Removed)),
                "diff-context" => Some(SpanRole::Diff(DiffLineKind::Context)),
                _ => None,
            };
        }
        self.code.is_some().then_some(SpanRole::CodeLine)
    }

    fn open(&mut self, name: &str, class: &str) {
        match name {
            "details" => {
                self.flush_inline();
                self.card = Some(FileCardView::default());
            }
            "pre" if self.card.is_none() => {
                self.flush_inline();
                self.code = Some(Vec::new());
            }
            "code" if self.card.is_none() && self.code.is_none() => self.inline_code = true,
            "strong" => self.bold = true,
            "div" if class == "log-ai-thought" && self.card.is_none() => {
                self.flush_inline();
                self.thought = Some(Vec::new());
            }
            "span" => {
                self.span_role = self.span_role(class);
                self.span_text.clear();
                if let (Some(SpanRole::Status), Some(card)) = (self.span_role, self.card.as_mut()) {
                    card.is_new = class.ends_with("new");
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &str) {
        match name {
            "details" => {
                if let Some(card) = self.card.take() {
                    self.blocks.push(Block::FileCard(card));
                }
            }
            "pre" if self.card.is_none() => {
                if let Some(lines) = self.code.take() {
                    self.blocks.push(Block::Code(lines));
                }
            }
            "code" if self.card.is_none() && self.code.is_none() => self.inline_code = false,
            "strong" => self.bold = false,
            "div" if self.card.is_none() => {
                if let Some(spans) = self.thought.take() {
                    self.blocks.push(Block::Thought(spans));
                }
            }
            "span" => {
                let text = std::mem::take(&mut self.span_text);
                match (self.span_role.take(), self.card.as_mut(), self.code.as_mut()) {
                    (Some(SpanRole::Status), Some(card), _) => card.status = text,
                    (Some(SpanRole::Name), Some(card), _) => card.name = text,
                    (Some(SpanRole::Diff(kind)), Some(card), _) => card.lines.push((kind, text)),
                    (Some(SpanRole::CodeLine), _, Some(lines)) => lines.push(text),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush_inline();
        self.blocks
    }
}

pub fn parse(html: &str) -> Vec<Block> {
    let mut parser = Parser::default();
    let mut cursor = 0;
    for captures in tag_pattern().captures_iter(html) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        parser.text(&html[cursor..whole.start()]);
        let class = class_pattern()
            .captures(&captures[3])
            .map(|class| class[1].to_string())
            .unwrap_or_default();
        if captures[1].is_empty() {
            parser.open(&captures[2], &class);
        } else {
            parser.close(&captures[2]);
        }
        cursor = whole.end();
    }
    parser.text(&html[cursor..]);
    parser.finish()
}

fn spans_job(spans: &[Span], theme: &Theme, base_color: Color32) -> LayoutJob {
    let mut job = LayoutJob::default();
    for span in spans {
        let mut format = TextFormat {
            font_id: FontId::monospace(14.0),
            color: base_color,
            ..Default::default()
        };
        if span.bold {
            format.color = Color32::WHITE;
        }
        if span.code {
            format.color = theme.accent;
            format.background = theme.inline_code_bg;
        }
        job.append(&span.text, 0.0, format);
    }
    job
}

fn render_card(ui: &mut egui::Ui, theme: &Theme, card: &FileCardView, id: egui::Id) {
    theme.card_frame().show(ui, |ui| {
        let header = RichText::new(format!("{}  {}", card.status, card.name))
            .color(theme.status_color(card.is_new))
            .monospace();
        egui::CollapsingHeader::new(header)
            .id_salt(id)
            .default_open(false)
            .show(ui, |ui| {
                for (kind, text) in &card.lines {
                    let fill = match kind {
                        DiffLineKind::Added => theme.diff_added_tint,
                        DiffLineKind::Removed => theme.diff_removed_tint,
                        DiffLineKind::Context => Color32::TRANSPARENT,
                    };
                    egui::Frame::new().fill(fill).show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(RichText::new(text).monospace().color(theme.text_primary));
                    });
                }
            });
    });
}

pub fn render_blocks(ui: &mut egui::Ui, theme: &Theme, blocks: &[Block], id: egui::Id) {
    for (index, block) in blocks.iter().enumerate() {
        match block {
            Block::Text(spans) => {
                ui.label(spans_job(spans, theme, theme.text_primary));
            }
            Block::Thought(spans) => {
                ui.label(spans_job(spans, theme, theme.thought));
            }
            Block::Code(lines) => {
                theme.code_frame().show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    for line in lines {
                        ui.label(RichText::new(line).monospace());
                    }
                });
            }
            Block::FileCard(card) => render_card(ui, theme, card, id.with(index)),
        }
    }
}
