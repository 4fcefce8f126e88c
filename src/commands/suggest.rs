use crate::commands::CLIENT_COMMANDS;
use crate::session::agents::Agent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub name: String,
    pub description: String,
}

/// Completions for the current input: commands after `/`, personas after
/// `@`, nothing otherwise. Matching is a case-insensitive prefix test.
pub fn suggestions_for(input: &str, agents: &[Agent]) -> Vec<Suggestion> {
    let lowered = input.to_lowercase();
    if input.starts_with('/') {
        CLIENT_COMMANDS
            .iter()
            .filter(|command| command.name.to_lowercase().starts_with(&lowered))
            .map(|command| Suggestion {
                name: command.name.to_string(),
                description: command.description.to_string(),
            })
            .collect()
    } else if input.starts_with('@') {
        agents
            .iter()
            .map(|agent| Suggestion {
                name: format!("@{}", agent.name),
                description: agent.description.clone(),
            })
            .filter(|suggestion| suggestion.name.to_lowercase().starts_with(&lowered))
            .collect()
    } else {
        Vec::new()
    }
}

/// Popover state: the visible items and the highlighted one.
#[derive(Debug, Clone, Default)]
pub struct SuggestionState {
    items: Vec<Suggestion>,
    active: Option<usize>,
}

impl SuggestionState {
    pub fn items(&self) -> &[Suggestion] {
        &self.items
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn is_visible(&self) -> bool {
        !self.items.is_empty()
    }

    /// Recomputes items for new input; clears the highlight.
    pub fn update(&mut self, input: &str, agents: &[Agent]) {
        self.items = suggestions_for(input, agents);
        self.active = None;
    }

    pub fn hide(&mut self) {
        self.items.clear();
        self.active = None;
    }

    pub fn move_down(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        self.active = Some(self.active.map_or(0, |index| (index + 1) % len));
    }

    pub fn move_up(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        self.active = Some(self.active.map_or(len - 1, |index| (index + len - 1) % len));
    }

    /// Text to put in the input for `index`; hides the popover.
    pub fn select(&mut self, index: usize) -> Option<String> {
        let completion = self.items.get(index).map(|item| format!("{} ", item.name))?;
        self.hide();
        Some(completion)
    }

    pub fn select_active(&mut self) -> Option<String> {
        self.select(self.active?)
    }
}
