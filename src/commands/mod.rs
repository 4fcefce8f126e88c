//! Client-side handling of prompt text before anything reaches the model.

pub mod suggest;

use crate::session::agents::{find_agent, Agent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: &'static str,
    pub description: &'static str,
}

pub const CLIENT_COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "/run",
        description: "Renders your project in a new tab.",
    },
    CommandInfo {
        name: "/files",
        description: "Lists all files in the project.",
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
        description: "Shows instructions on how to deploy your app.",
    },
    CommandInfo {
        name: "/clear",
        description: "Clears the terminal and all project files.",
    },
    CommandInfo {
        name: "/settings",
        description: "Customize the AI agents.",
    },
    CommandInfo {
        name: "/agents",
        description: "Learn about the AI agent system.",
    },
    CommandInfo {
        name: "/help",
        description: "Shows all available commands.",
    },
    CommandInfo {
        name: "/exit",
        description: "Returns to the main landing page.",
    },
];

const RUN_PHRASES: &[&str] = &[
    "run the app",
    "run it",
    "run the project",
    "launch the app",
    "launch it",
    "start the app",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run,
    Files,
    Save,
    Download,
    Publish,
    Clear,
    Settings,
    Agents,
    Help,
    Exit,
    Unknown(String),
}

impl Command {
    /// Parses the first word of a `/`-prefixed prompt.
    pub fn parse(prompt: &str) -> Option<Self> {
        if !prompt.starts_with('/') {
            return None;
        }
        let word = prompt.split(' ').next().unwrap_or(prompt);
        Some(match word {
            "/run" => Self::Run,
            "/files" => Self::Files,
            "/save" => Self::Save,
            "/download" => Self::Download,
            "/publish" | "/deploy" => Self::Publish,
            "/clear" => Self::Clear,
            "/settings" => Self::Settings,
            "/agents" => Self::Agents,
            "/help" | "/commands" => Self::Help,
            "/exit" => Self::Exit,
            other => Self::Unknown(other.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    /// Text for the model; `agent` is set when it opens with a known
    /// `@Persona`.
    Prompt {
        text: String,
        agent: Option<String>,
    },
}

/// Classifies trimmed prompt text. Returns `None` for empty input.
pub fn classify(raw: &str, agents: &[Agent]) -> Option<Input> {
    let prompt = raw.trim();
    if prompt.is_empty() {
        return None;
    }
    if RUN_PHRASES.contains(&prompt.to_lowercase().as_str()) {
        return Some(Input::Command(Command::Run));
    }
    if let Some(command) = Command::parse(prompt) {
        return Some(Input::Command(command));
    }
    Some(Input::Prompt {
        text: prompt.to_string(),
        agent: addressed_agent(prompt, agents),
    })
}

fn addressed_agent(prompt: &str, agents: &[Agent]) -> Option<String> {
    let handle = prompt.strip_prefix('@')?;
    let name = handle.split_whitespace().next()?;
    find_agent(agents, name).map(|agent| agent.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::agents::default_agents;

    #[test]
    fn parses_commands_and_aliases() {
        assert_eq!(Command::parse("/run"), Some(Command::Run));
        assert_eq!(Command::parse("/deploy now"), Some(Command::Publish));
        assert_eq!(Command::parse("/commands"), Some(Command::Help));
        assert_eq!(Command::parse("hello"), None);
    }

    #[test]
    fn commands_are_case_sensitive() {
        assert_eq!(
            Command::parse("/RUN"),
            Some(Command::Unknown("/RUN".to_string()))
        );
    }

    #[test]
    fn unknown_command_keeps_its_word() {
        assert_eq!(
            Command::parse("/frobnicate all the things"),
            Some(Command::Unknown("/frobnicate".to_string()))
        );
    }

    #[test]
    fn run_phrases_map_to_run() {
        let agents = default_agents();
        assert_eq!(
            classify("  Run The App ", &agents),
            Some(Input::Command(Command::Run))
        );
        assert_eq!(
            classify("run the app please", &agents),
            Some(Input::Prompt {
                text: "run the app please".to_string(),
                agent: None
            })
        );
    }

    #[test]
    fn agent_address_is_recognized() {
        let agents = default_agents();
        assert_eq!(
            classify("@codegenerator create a blue button", &agents),
            Some(Input::Prompt {
                text: "@codegenerator create a blue button".to_string(),
                agent: Some("CodeGenerator".to_string())
            })
        );
        assert_eq!(
            classify("@Nobody hi", &agents),
            Some(Input::Prompt {
                text: "@Nobody hi".to_string(),
                agent: None
            })
        );
    }

    #[test]
    fn blank_input_is_ignored() {
        assert_eq!(classify("   ", &default_agents()), None);
    }

    #[test]
    fn every_listed_command_parses_to_a_known_command() {
        for info in CLIENT_COMMANDS {
            let command = Command::parse(info.name).expect("listed command should parse");
            assert!(!matches!(command, Command::Unknown(_)), "{}", info.name);
        }
    }
}
