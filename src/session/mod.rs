use crate::engine::{ScanOutcome, TurnEngine};
use crate::project::ProjectFiles;
use serde::{Deserialize, Serialize};

pub mod agents;
pub mod store;

use agents::Agent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEnd {
    Completed { awaiting_confirmation: bool },
    Failed,
}

/// Owned by the shell and passed explicitly.
#[derive(Debug)]
pub struct Session {
    pub files: ProjectFiles,
    pub agents: Vec<Agent>,
    history: Vec<Turn>,
    active_turn: Option<TurnEngine>,
    awaiting_confirmation: bool,
}

impl Session {
    pub fn new(files: ProjectFiles, agents: Vec<Agent>) -> Self {
        Self {
            files,
            agents,
            history: Vec::new(),
            active_turn: None,
            awaiting_confirmation: false,
        }
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn is_streaming(&self) -> bool {
        self.active_turn.is_some()
    }

    pub fn awaiting_confirmation(&self) -> bool {
        self.awaiting_confirmation
    }

    /// New prompts are accepted only when nothing streams and no plan
    /// waits for an answer.
    pub fn accepts_input(&self) -> bool {
        !self.is_streaming() && !self.awaiting_confirmation
    }

    pub fn system_instruction(&self) -> String {
        agents::system_instruction(&self.agents)
    }

    /// Records the user turn and opens a response buffer. Returns the
    /// history to send, or `None` when a turn is already in flight.
    pub fn begin_turn(&mut self, prompt: impl Into<String>) -> Option<Vec<Turn>> {
        if self.is_streaming() {
            return None;
        }
        self.awaiting_confirmation = false;
        self.history.push(Turn::user(prompt));
        self.active_turn = Some(TurnEngine::new());
        Some(self.history.clone())
    }

    pub fn apply_fragment(&mut self, fragment: &str) -> Option<ScanOutcome> {
        let engine = self.active_turn.as_mut()?;
        engine.push(fragment, &mut self.files)
    }

    /// Closes the active turn. A successful turn lands in the history;
    /// a failed one is dropped, but files it already wrote stay.
    pub fn end_turn(&mut self, failed: bool) -> Option<TurnEnd> {
        let engine = self.active_turn.take()?;
        if failed {
            return Some(TurnEnd::Failed);
        }
        let awaiting_confirmation = engine.awaiting_confirmation();
        self.history.push(Turn::model(engine.finish()));
        self.awaiting_confirmation = awaiting_confirmation;
        Some(TurnEnd::Completed {
            awaiting_confirmation,
        })
    }

    pub fn decline_plan(&mut self) {
        self.awaiting_confirmation = false;
    }

    pub fn reset_history(&mut self) {
        self.history.clear();
        self.awaiting_confirmation = false;
    }

    pub fn clear(&mut self) {
        self.reset_history();
        self.files.clear();
        self.active_turn = None;
    }
}
