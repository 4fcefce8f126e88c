use crate::session::agents::{add_agent, remove_agent, Agent};
use crate::theme::Theme;
use eframe::egui::{self, RichText, ScrollArea};

/// Editable copy of the persona list. Nothing reaches the session until
/// the user saves.
#[derive(Debug, Clone, Default)]
pub struct AgentSettings {
    draft: Vec<Agent>,
    new_name: String,
    new_description: String,
    error: Option<String>,
}

impl AgentSettings {
    pub fn open(agents: &[Agent]) -> Self {
        Self {
            draft: agents.to_vec(),
            ..Self::default()
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn add(&mut self) {
        match add_agent(&mut self.draft, &self.new_name, &self.new_description) {
            Ok(()) => {
                self.new_name.clear();
                self.new_description.clear();
                self.error = None;
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    pub fn remove(&mut self, index: usize) {
        remove_agent(&mut self.draft, index);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsAction {
    None,
    Cancel,
    Save(Vec<Agent>),
}

pub fn show(ctx: &egui::Context, theme: &Theme, settings: &mut AgentSettings) -> SettingsAction {
    let mut action = SettingsAction::None;
    let mut open = true;
    egui::Window::new("Agent Settings")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_width(560.0)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            let mut delete: Option<usize> = None;
            ScrollArea::vertical()
                .id_salt("agent_settings_list")
                .max_height(280.0)
                .show(ui, |ui| {
                    for (index, agent) in settings.draft.iter().enumerate() {
                        ui.horizontal(|ui| {
                            if ui.small_button("Delete").clicked() {
                                delete = Some(index);
                            }
                            ui.label(RichText::new(&agent.name).strong().color(theme.accent));
                        });
                        ui.label(RichText::new(&agent.description).color(theme.text_muted));
                        ui.add_space(theme.spacing_4);
                    }
                });
            if let Some(index) = delete {
                settings.remove(index);
            }

            ui.separator();
            ui.label(RichText::new("Add agent").strong());
            ui.add(
                egui::TextEdit::singleline(&mut settings.new_name)
                    .hint_text("Name")
                    .desired_width(f32::INFINITY),
            );
            ui.add(
                egui::TextEdit::multiline(&mut settings.new_description)
                    .hint_text("Description")
                    .desired_rows(2)
                    .desired_width(f32::INFINITY),
            );
            if ui.button("Add").clicked() {
                settings.add();
            }
            if let Some(error) = settings.error() {
                ui.label(RichText::new(error).color(theme.danger));
            }

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    action = SettingsAction::Save(settings.draft.clone());
                }
                if ui.button("Cancel").clicked() {
                    action = SettingsAction::Cancel;
                }
            });
        });
    if !open {
        action = SettingsAction::Cancel;
    }
    action
}
