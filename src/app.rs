use crate::commands::suggest::SuggestionState;
use crate::commands::{classify, Command, Input};
use crate::engine::status::StreamStatus;
use crate::event::AppEvent;
use crate::gemini::types::GenerationConfig;
use crate::gemini::GeminiClient;
use crate::project::bundle;
use crate::session::store::Store;
use crate::session::{Session, TurnEnd};
use crate::theme::Theme;
use crate::ui::markup::{self, Block};
use crate::ui::settings::{self, AgentSettings, SettingsAction};
use crate::ui::viewer::{self, FileViewer};
use crate::ui::panels;
use eframe::egui::{self, Key, Modifiers, RichText, ScrollArea};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const CONFIRM_PROMPT: &str = "yes";
const STREAM_REPAINT_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug)]
enum HistoryItem {
    Prompt(String),
    Response {
        blocks: Vec<Block>,
        status: Option<StreamStatus>,
        error: Option<String>,
    },
    System(String),
    Error(String),
    FileList(Vec<String>),
    Welcome,
    Help,
    Agents,
    Publish,
}

const PREVIEW_OPENED: &str = "✔ Project is running in a new browser tab.";

fn preview_notice(written: &std::io::Result<PathBuf>) -> HistoryItem {
    match written {
        Ok(_) => HistoryItem::System(PREVIEW_OPENED.to_string()),
        Err(err) => HistoryItem::Error(format!("Failed to open preview: {err}")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Landing,
    Terminal,
}

pub struct CodeWrapApp {
    rx: Receiver<AppEvent>,
    client: GeminiClient,
    session: Session,
    store: Store,
    theme: Theme,
    view: View,
    history: Vec<HistoryItem>,
    active_response: Option<usize>,
    input_buffer: String,
    suggestions: SuggestionState,
    diagnostics_log: Vec<String>,
    settings: Option<AgentSettings>,
    viewer: Option<FileViewer>,
    scroll_to_bottom: bool,
    focus_input: bool,
}

impl CodeWrapApp {
    pub fn new(
        rx: Receiver<AppEvent>,
        client: GeminiClient,
        session: Session,
        store: Store,
        restored_project: bool,
        warnings: Vec<String>,
    ) -> Self {
        let mut app = Self {
            rx,
            client,
            session,
            store,
            theme: Theme::default(),
            view: View::Landing,
            history: Vec::new(),
            active_response: None,
            input_buffer: String::new(),
            suggestions: SuggestionState::default(),
            diagnostics_log: Vec::new(),
            settings: None,
            viewer: None,
            scroll_to_bottom: false,
            focus_input: false,
        };

        if restored_project && !app.session.files.is_empty() {
            app.history.push(HistoryItem::System(
                "Loaded project from a previous session.".to_string(),
            ));
        }
        for warning in warnings {
            app.log_diagnostic(warning.clone());
            app.history.push(HistoryItem::Error(warning));
        }

        app
    }

    fn timestamp() -> String {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(duration) => duration.as_secs().to_string(),
            Err(_) => "0".to_string(),
        }
    }

    fn log_diagnostic(&mut self, message: impl Into<String>) {
        self.diagnostics_log
            .push(format!("[{}] {}", Self::timestamp(), message.into()));
    }

    fn push_item(&mut self, item: HistoryItem) {
        self.history.push(item);
        self.scroll_to_bottom = true;
    }

    fn launch(&mut self) {
        self.view = View::Terminal;
        let started = self
            .history
            .iter()
            .any(|item| matches!(item, HistoryItem::Welcome | HistoryItem::Prompt(_)));
        if !started {
            self.push_item(HistoryItem::Welcome);
        }
        self.focus_input = true;
    }

    fn submit_input(&mut self, ctx: &egui::Context) {
        if let Some(completion) = self.suggestions.select_active() {
            self.input_buffer = completion;
            self.focus_input = true;
            return;
        }
        if !self.session.accepts_input() {
            return;
        }

        let raw = std::mem::take(&mut self.input_buffer);
        let Some(input) = classify(&raw, &self.session.agents) else {
            return;
        };
        self.suggestions.hide();
        self.focus_input = true;

        match input {
            Input::Command(command) => {
                tracing::debug!(?command, "client command");
                self.push_item(HistoryItem::Prompt(raw.trim().to_string()));
                self.handle_command(command, ctx);
            }
            Input::Prompt { text, agent } => {
                if let Some(agent) = agent {
                    self.log_diagnostic(format!("prompt addressed to @{agent}"));
                }
                self.start_turn(text);
            }
        }
        ctx.request_repaint();
    }

    fn start_turn(&mut self, prompt: String) {
        self.push_item(HistoryItem::Prompt(prompt.clone()));
        let Some(turns) = self.session.begin_turn(prompt) else {
            return;
        };
        self.push_item(HistoryItem::Response {
            blocks: Vec::new(),
            status: Some(StreamStatus::Thinking),
            error: None,
        });
        self.active_response = Some(self.history.len() - 1);
        self.client
            .send(turns, GenerationConfig::new(self.session.system_instruction()));
    }

    fn handle_command(&mut self, command: Command, ctx: &egui::Context) {
        match command {
            Command::Run => self.open_preview(ctx),
            Command::Files => {
                if self.session.files.is_empty() {
                    self.push_item(HistoryItem::System("No files in the project.".to_string()));
                } else {
                    let names = self.session.files.names().map(str::to_string).collect();
                    self.push_item(HistoryItem::FileList(names));
                }
            }
            Command::Save => match self.store.save_project(&self.session.files) {
                Ok(()) => self.push_item(HistoryItem::System(
                    "✔ Project files saved to local storage.".to_string(),
                )),
                Err(err) => {
                    tracing::error!(error = %err, "failed to save project");
                    self.push_item(HistoryItem::Error(format!("Failed to save project: {err}")));
                }
            },
            Command::Download => self.download_bundle(),
            Command::Publish => self.push_item(HistoryItem::Publish),
            Command::Clear => {
                self.session.clear();
                self.active_response = None;
                if let Err(err) = self.store.clear_project() {
                    self.log_diagnostic(format!("failed to clear saved project: {err}"));
                }
                self.history.clear();
                self.push_item(HistoryItem::Welcome);
            }
            Command::Settings => self.settings = Some(AgentSettings::open(&self.session.agents)),
            Command::Agents => self.push_item(HistoryItem::Agents),
            Command::Help => self.push_item(HistoryItem::Help),
            Command::Exit => {
                self.suggestions.hide();
                self.view = View::Landing;
            }
            Command::Unknown(word) => {
                self.push_item(HistoryItem::Error(format!("Unknown command: {word}")))
            }
        }
    }

    fn open_preview(&mut self, ctx: &egui::Context) {
        let written = bundle::write_preview(&self.session.files, &std::env::temp_dir());
        match &written {
            Ok(path) => {
                tracing::info!(path = %path.display(), "opening preview");
                ctx.open_url(egui::OpenUrl::new_tab(format!("file://{}", path.display())));
                self.log_diagnostic(format!("preview written to {}", path.display()));
            }
            Err(err) => tracing::error!(error = %err, "failed to write preview"),
        }
        self.push_item(preview_notice(&written));
    }

    fn download_dir() -> PathBuf {
        dirs::download_dir()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn download_bundle(&mut self) {
        if self.session.files.is_empty() {
            self.push_item(HistoryItem::System(
                "No files to download. Create some files first!".to_string(),
            ));
            return;
        }
        match bundle::write_bundle(&self.session.files, &Self::download_dir()) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "project bundle written");
                self.push_item(HistoryItem::System(format!(
                    "✔ Project downloaded as {}",
                    path.display()
                )));
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to write bundle");
                self.push_item(HistoryItem::Error(format!("Failed to download project: {err}")));
            }
        }
    }

    fn confirm_plan(&mut self) {
        self.start_turn(CONFIRM_PROMPT.to_string());
    }

    fn decline_plan(&mut self) {
        self.session.decline_plan();
        self.push_item(HistoryItem::System("Plan cancelled.".to_string()));
        self.focus_input = true;
    }

    fn save_agent_settings(&mut self, agents: Vec<crate::session::agents::Agent>) {
        self.session.agents = agents;
        if let Err(err) = self.store.save_agents(&self.session.agents) {
            tracing::error!(error = %err, "failed to save agents");
            self.log_diagnostic(format!("failed to persist agents: {err}"));
        }
        self.session.reset_history();
        self.push_item(HistoryItem::System(
            "AI reloaded with new agent settings.".to_string(),
        ));
    }

    fn active_response_mut(&mut self) -> Option<&mut HistoryItem> {
        let index = self.active_response?;
        self.history.get_mut(index)
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.log_diagnostic("event channel disconnected");
                    break;
                }
            }
        }
        if self.session.is_streaming() {
            ctx.request_repaint_after(STREAM_REPAINT_INTERVAL);
        }
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::StreamStarted => {
                if let Some(HistoryItem::Response { status, .. }) = self.active_response_mut() {
                    *status = Some(StreamStatus::Receiving);
                }
            }
            AppEvent::StreamDelta(text) => {
                let Some(outcome) = self.session.apply_fragment(&text) else {
                    return;
                };
                for block in &outcome.new_blocks {
                    self.log_diagnostic(format!(
                        "{} {}",
                        block.status_label(),
                        block.file_name
                    ));
                }
                if let Some(HistoryItem::Response { blocks, status, .. }) =
                    self.active_response_mut()
                {
                    *blocks = markup::parse(&outcome.html);
                    if let Some(next) = outcome.status {
                        *status = Some(next);
                    }
                }
                self.scroll_to_bottom = true;
            }
            AppEvent::StreamEnd => {
                if let Some(TurnEnd::Completed {
                    awaiting_confirmation,
                }) = self.session.end_turn(false)
                {
                    tracing::info!(awaiting_confirmation, "turn completed");
                    if let Err(err) = self.store.save_project(&self.session.files) {
                        tracing::error!(error = %err, "failed to save project");
                        self.log_diagnostic(format!("failed to persist project: {err}"));
                    }
                }
                if let Some(HistoryItem::Response { status, .. }) = self.active_response_mut() {
                    *status = Some(StreamStatus::Done);
                }
                self.active_response = None;
                self.scroll_to_bottom = true;
                self.focus_input = true;
            }
            AppEvent::StreamFailed(message) => {
                self.session.end_turn(true);
                self.log_diagnostic(format!("stream failed: {message}"));
                if let Some(HistoryItem::Response {
                    blocks,
                    status,
                    error,
                }) = self.active_response_mut()
                {
                    blocks.clear();
                    *status = None;
                    *error = Some(message);
                }
                self.active_response = None;
                self.scroll_to_bottom = true;
            }
        }
    }

    fn status_line(&self) -> (&'static str, egui::Color32) {
        if self.session.is_streaming() {
            ("Streaming", self.theme.warning)
        } else if self.session.awaiting_confirmation() {
            ("Awaiting confirmation", self.theme.accent)
        } else {
            ("Ready", self.theme.success)
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let (status_label, status_color) = self.status_line();
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("CodeWrap");
                ui.separator();
                ui.label(RichText::new(self.client.model()).color(self.theme.text_muted));
                ui.separator();
                ui.label(RichText::new(status_label).color(status_color));
                ui.separator();
                ui.label(
                    RichText::new(format!(
                        "{} files · {} turns",
                        self.session.files.len(),
                        self.session.history().len()
                    ))
                    .color(self.theme.text_muted),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Settings").clicked() {
                        self.settings = Some(AgentSettings::open(&self.session.agents));
                    }
                });
            });
        });
    }

    fn render_history(&mut self, ui: &mut egui::Ui) {
        let theme = self.theme.clone();
        let mut open_file: Option<String> = None;
        for (index, item) in self.history.iter().enumerate() {
            match item {
                HistoryItem::Prompt(text) => {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(RichText::new(">").color(theme.prompt).strong());
                        ui.label(RichText::new(text).color(theme.text_primary));
                    });
                }
                HistoryItem::Response {
                    blocks,
                    status,
                    error,
                } => {
                    markup::render_blocks(ui, &theme, blocks, egui::Id::new(("response", index)));
                    if let Some(status) = status.as_ref().filter(|status| !status.is_done()) {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(RichText::new(status.label()).color(theme.text_muted));
                        });
                    }
                    if let Some(error) = error {
                        ui.label(RichText::new(format!("Error: {error}")).color(theme.danger));
                    }
                }
                HistoryItem::System(text) => {
                    ui.label(RichText::new(text).color(theme.success));
                }
                HistoryItem::Error(text) => {
                    ui.label(RichText::new(text).color(theme.danger));
                }
                HistoryItem::FileList(names) => {
                    for name in names {
                        if ui.link(RichText::new(name).monospace()).clicked() {
                            open_file = Some(name.clone());
                        }
                    }
                }
                HistoryItem::Welcome => panels::welcome(ui, &theme),
                HistoryItem::Help => panels::help(ui, &theme),
                HistoryItem::Agents => panels::agents(ui, &theme, &self.session.agents),
                HistoryItem::Publish => panels::publish(ui, &theme),
            }
            ui.add_space(theme.spacing_8);
        }

        if let Some(name) = open_file {
            match self.session.files.get(&name) {
                Some(content) => {
                    self.viewer = Some(FileViewer {
                        name,
                        content: content.to_string(),
                    });
                }
                None => self.log_diagnostic(format!("file no longer in project: {name}")),
            }
        }
    }

    fn render_confirmation(&mut self, ui: &mut egui::Ui) {
        let mut confirm = false;
        let mut decline = false;
        ui.horizontal(|ui| {
            confirm = ui
                .add(egui::Button::new("Yes, proceed").fill(self.theme.status_new))
                .clicked();
            decline = ui.button("No, cancel").clicked();
        });
        if confirm {
            self.confirm_plan();
        } else if decline {
            self.decline_plan();
        }
    }

    fn render_suggestions(&mut self, ui: &mut egui::Ui) {
        let mut picked: Option<usize> = None;
        self.theme.card_frame().show(ui, |ui| {
            for (index, item) in self.suggestions.items().iter().enumerate() {
                let selected = self.suggestions.active() == Some(index);
                let response = ui.selectable_label(
                    selected,
                    RichText::new(format!("{}  {}", item.name, item.description)).monospace(),
                );
                if response.clicked() {
                    picked = Some(index);
                }
            }
        });
        if let Some(completion) = picked.and_then(|index| self.suggestions.select(index)) {
            self.input_buffer = completion;
            self.focus_input = true;
        }
    }

    fn handle_suggestion_keys(&mut self, ui: &mut egui::Ui) {
        if !self.suggestions.is_visible() {
            return;
        }
        let (down, up, tab, escape) = ui.input_mut(|input| {
            (
                input.consume_key(Modifiers::NONE, Key::ArrowDown),
                input.consume_key(Modifiers::NONE, Key::ArrowUp),
                input.consume_key(Modifiers::NONE, Key::Tab),
                input.consume_key(Modifiers::NONE, Key::Escape),
            )
        });
        if down {
            self.suggestions.move_down();
        }
        if up {
            self.suggestions.move_up();
        }
        if tab {
            if self.suggestions.active().is_none() {
                self.suggestions.move_down();
            }
            if let Some(completion) = self.suggestions.select_active() {
                self.input_buffer = completion;
            }
        }
        if escape {
            self.suggestions.hide();
        }
    }

    fn render_composer(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        if self.suggestions.is_visible() {
            self.render_suggestions(ui);
        }
        self.handle_suggestion_keys(ui);

        let input_enabled = self.session.accepts_input();
        let hint = if self.session.is_streaming() {
            "Waiting for response..."
        } else if self.session.awaiting_confirmation() {
            "Answer the plan above..."
        } else {
            "Type a prompt or /help..."
        };

        let mut send_now = false;
        self.theme.composer_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(">").color(self.theme.prompt).strong());
                let response = ui.add_enabled(
                    input_enabled,
                    egui::TextEdit::singleline(&mut self.input_buffer)
                        .desired_width(f32::INFINITY)
                        .hint_text(hint),
                );
                if response.changed() {
                    self.suggestions
                        .update(&self.input_buffer, &self.session.agents);
                }
                if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                    send_now = true;
                }
                if self.focus_input && input_enabled {
                    response.request_focus();
                    self.focus_input = false;
                }
            });
        });

        if send_now && input_enabled {
            self.submit_input(ctx);
        }
    }

    fn render_terminal(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let transcript_height = (ui.available_height() - 150.0).max(120.0);
            ScrollArea::vertical()
                .id_salt("terminal_history")
                .max_height(transcript_height)
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.render_history(ui);
                    if self.session.awaiting_confirmation() {
                        self.render_confirmation(ui);
                    }
                    if self.scroll_to_bottom {
                        ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                    }
                });
            self.scroll_to_bottom = false;

            ui.separator();
            egui::CollapsingHeader::new("Diagnostics")
                .default_open(false)
                .show(ui, |ui| {
                    ScrollArea::vertical()
                        .id_salt("diagnostics_log")
                        .max_height(90.0)
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for entry in &self.diagnostics_log {
                                ui.label(RichText::new(entry).small());
                            }
                        });
                });

            ui.separator();
            self.render_composer(ui, ctx);
        });
    }

    fn render_modals(&mut self, ctx: &egui::Context) {
        if let Some(settings_state) = self.settings.as_mut() {
            match settings::show(ctx, &self.theme, settings_state) {
                SettingsAction::None => {}
                SettingsAction::Cancel => self.settings = None,
                SettingsAction::Save(agents) => {
                    self.settings = None;
                    self.save_agent_settings(agents);
                }
            }
        }
        if let Some(file) = self.viewer.as_ref() {
            if !viewer::show(ctx, &self.theme, file) {
                self.viewer = None;
            }
        }
    }
}

impl eframe::App for CodeWrapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events(ctx);
        match self.view {
            View::Landing => {
                let mut launch = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    launch = panels::landing(ui, &self.theme);
                });
                if launch {
                    self.launch();
                }
            }
            View::Terminal => {
                self.render_top_bar(ctx);
                self.render_terminal(ctx);
                self.render_modals(ctx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectFiles;
    use pretty_assertions::assert_eq;

    #[test]
    fn written_preview_is_announced_in_transcript() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let written = bundle::write_preview(&ProjectFiles::new(), dir.path());
        match preview_notice(&written) {
            HistoryItem::System(text) => {
                assert_eq!(text, "✔ Project is running in a new browser tab.")
            }
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn failed_preview_is_reported_as_error() {
        let written = Err(std::io::Error::other("disk full"));
        assert!(matches!(
            preview_notice(&written),
            HistoryItem::Error(text) if text == "Failed to open preview: disk full"
        ));
    }
}
