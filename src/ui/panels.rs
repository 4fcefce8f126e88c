//! Static panels shown in the terminal history: welcome, help, personas,
//! publishing instructions and the landing view.

use crate::commands::CommandInfo;
use crate::session::agents::Agent;
use crate::theme::Theme;
use eframe::egui::{self, RichText};

struct HelpGroup {
    title: &'static str,
    entries: &'static [CommandInfo],
}

const HELP_GROUPS: &[HelpGroup] = &[
    HelpGroup {
        title: "Core Actions",
        entries: &[
            CommandInfo {
                name: "/run",
                description: "Renders your project in a new tab.",
            },
            CommandInfo {
                name: "/save",
                description: "Saves your project to local storage.",
            },
            CommandInfo {
                name: "/download",
                description: "Downloads project as a single HTML file.",
            },
            CommandInfo {
                name: "/publish",
                description: "Shows instructions on how to deploy.",
            },
            CommandInfo {
                name: "/clear",
                description: "Clears terminal and all project files.",
            },
            CommandInfo {
                name: "/exit",
                description: "Returns to the main landing page.",
            },
        ],
    },
    HelpGroup {
        title: "File Management",
        entries: &[CommandInfo {
            name: "/files",
            description: "Lists all files to view their code.",
        }],
    },
    HelpGroup {
        title: "AI Interaction",
        entries: &[
            CommandInfo {
                name: "@AgentName",
                description: "Directly invoke a specific AI agent.",
            },
            CommandInfo {
                name: "/agents",
                description: "Learn about the AI agent system.",
            },
            CommandInfo {
                name: "/settings",
                description: "Customize the AI agents.",
            },
        ],
    },
];

fn entry_row(ui: &mut egui::Ui, theme: &Theme, name: &str, description: &str) {
    ui.horizontal_wrapped(|ui| {
        ui.label(RichText::new(name).strong().color(theme.accent));
        ui.label(RichText::new("-").color(theme.text_muted));
        ui.label(description);
    });
}

pub fn welcome(ui: &mut egui::Ui, theme: &Theme) {
    ui.label(RichText::new("CodeWrap_").heading().color(theme.prompt));
    theme.card_frame().show(ui, |ui| {
        ui.label(RichText::new("Welcome to CodeWrap!").strong());
        ui.label("Type a prompt like \"Create a simple clock\" to start.");
        ui.horizontal(|ui| {
            ui.label("Use");
            ui.label(RichText::new("/help").code());
            ui.label("for a list of all commands.");
        });
    });
}

pub fn help(ui: &mut egui::Ui, theme: &Theme) {
    theme.card_frame().show(ui, |ui| {
        ui.label(RichText::new("CodeWrap Commands").heading());
        for group in HELP_GROUPS {
            ui.add_space(theme.spacing_8);
            ui.label(RichText::new(group.title).strong().color(theme.text_muted));
            for entry in group.entries {
                entry_row(ui, theme, entry.name, entry.description);
            }
        }
    });
}

pub fn agents(ui: &mut egui::Ui, theme: &Theme, agents: &[Agent]) {
    theme.card_frame().show(ui, |ui| {
        ui.label(RichText::new("CodeWrap AI Agents").heading());
        ui.horizontal_wrapped(|ui| {
            ui.label("You can directly command an agent by starting your prompt with");
            ui.label(RichText::new("@AgentName").strong());
            ui.label("for example:");
            ui.label(RichText::new("@CodeGenerator create a blue button").code());
            ui.label("Or you can customize them via");
            ui.label(RichText::new("/settings").strong());
        });
        ui.add_space(theme.spacing_8);
        ui.label(RichText::new("The Agents").strong().color(theme.text_muted));
        for agent in agents {
            entry_row(ui, theme, &format!("[{}]", agent.name), &agent.description);
        }
    });
}

pub fn publish(ui: &mut egui::Ui, theme: &Theme) {
    theme.card_frame().show(ui, |ui| {
        ui.label(RichText::new("How to Deploy Your Project").heading());
        ui.label("CodeWrap cannot publish code automatically. Here's how to do it manually:");
        ui.add_space(theme.spacing_4);
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new("1. Download:").strong());
            ui.label("Use the");
            ui.label(RichText::new("/download").code());
            ui.label("command to get your project as a single index.html file.");
        });
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new("2. Create a Repo:").strong());
            ui.label("Go to");
            ui.hyperlink_to("github.new", "https://github.new");
            ui.label("to create a new repository.");
        });
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new("3. Upload File:").strong());
            ui.label("In the new repo, click \"Add file\" > \"Upload files\" and select your index.html file.");
        });
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new("4. Deploy:").strong());
            ui.label("Sign up on a service like");
            ui.hyperlink_to("Netlify", "https://netlify.com");
            ui.label("or");
            ui.hyperlink_to("Vercel", "https://vercel.com");
            ui.label("connect your GitHub account, select the new repository, and deploy!");
        });
    });
}

/// Returns true when the launch button was pressed.
pub fn landing(ui: &mut egui::Ui, theme: &Theme) -> bool {
    let mut launch = false;
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.25);
        ui.label(RichText::new("CodeWrap").size(42.0).color(theme.prompt));
        ui.add_space(theme.spacing_8);
        ui.label(
            RichText::new("Describe a web app. Watch it get planned, written and patched in place.")
                .color(theme.text_muted),
        );
        ui.add_space(theme.spacing_12 * 2.0);
        launch = ui
            .add(egui::Button::new(RichText::new("Launch terminal").size(16.0)).fill(theme.surface_raised))
            .clicked();
    });
    launch
}
