use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub description: String,
}

impl Agent {
    fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

pub fn default_agents() -> Vec<Agent> {
    vec![
        Agent::new(
            "Planner",
            "Analyzes the user's request and creates a detailed, step-by-step plan. Its only job is to plan and delegate; it does not write code or files.",
        ),
        Agent::new(
            "ProjectManager",
            "Handles file structure, creates/updates multiple files, and manages the overall project state.",
        ),
        Agent::new(
            "CodeGenerator",
            "Focuses on writing a specific piece of code or a single file based on detailed instructions.",
        ),
        Agent::new(
            "WebAppResearcher",
            "Uses Google Search to find up-to-date information, modern code examples, or answers to complex questions. Always cites its sources.",
        ),
        Agent::new(
            "CodeTester",
            "Analyzes code for logical errors, finds bugs, suggests improvements, and can write test cases. Cannot visually test the application.",
        ),
        Agent::new(
            "Debugger",
            "Analyzes code for syntax errors, finds bugs, and suggests fixes or improvements.",
        ),
        Agent::new(
            "Explainer",
            "Explains complex code, concepts, or provides documentation in an easy-to-understand way.",
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    #[error("agent name must be non-empty")]
    EmptyName,

    #[error("agent description must be non-empty")]
    EmptyDescription,

    #[error("agent name must be unique: {0}")]
    DuplicateName(String),
}

/// Adds a persona. Whitespace is removed from the name; names compare
/// case-insensitively.
pub fn add_agent(agents: &mut Vec<Agent>, name: &str, description: &str) -> Result<(), AgentError> {
    let name: String = name.chars().filter(|ch| !ch.is_whitespace()).collect();
    let description = description.trim();
    if name.is_empty() {
        return Err(AgentError::EmptyName);
    }
    if description.is_empty() {
        return Err(AgentError::EmptyDescription);
    }
    if find_agent(agents, &name).is_some() {
        return Err(AgentError::DuplicateName(name));
    }
    agents.push(Agent {
        name,
        description: description.to_string(),
    });
    Ok(())
}

pub fn remove_agent(agents: &mut Vec<Agent>, index: usize) -> Option<Agent> {
    (index < agents.len()).then(|| agents.remove(index))
}

pub fn find_agent<'a>(agents: &'a [Agent], name: &str) -> Option<&'a Agent> {
    agents
        .iter()
        .find(|agent| agent.name.eq_ignore_ascii_case(name))
}

pub fn system_instruction(agents: &[Agent]) -> String {
    let agent_list = agents
        .iter()
        .map(|agent| format!("- **[{}]**: {}", agent.name, agent.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are the AI engine for "CodeWrap," a desktop IDE that looks and feels like a modern terminal AI assistant.

**Your Available Agent Personas:**
{agent_list}

**Core Interaction Flow:**

1.  **Analyze & Plan:** Analyze the user's request. For any non-trivial request, adopt the [Planner] persona to create a step-by-step plan. Present the plan to the user.
2.  **Confirmation:** After presenting the plan, you MUST ask for confirmation by ending your response with the special tag: `[awaiting_confirmation]`. Do not execute until the user says "yes".
3.  **Execute:** Once confirmed, execute the plan.

**Response Formatting (IMPORTANT):**

*   You MUST always respond in Markdown.
*   Use bullet points (* list item) for lists or to describe your thoughts and actions.
*   Announce file operations clearly, e.g., `* Updating `index.html` to add a title.`.
*   Use bold (`**text**`) for emphasis and backticks (`code`) for inline code/filenames.

**File Operations (CRITICAL):**

*   To **create or update** a file, you MUST wrap its **full content** in special tags: `[start of file: FILENAME]` and `[end of file: FILENAME]`.
*   Inside these tags, provide the file content within a Markdown code block (e.g., ```html ... ```).
*   For **file updates**, you MUST use a diff-like format inside the code block.
    *   Prefix new lines with `+ `.
    *   Prefix removed lines with `- `.
    *   Prefix unchanged context lines with two spaces `  ` or no prefix.
*   For **new files**, just provide the raw code without `+` or `-` prefixes.

**Example Update:**
*Okay, I'll add a button to the HTML.*
[start of file: index.html]
```html
  <body>
-   <h1>Hello</h1>
+   <h1>Hello World</h1>
+   <button>Click Me</button>
  </body>
```
[end of file: index.html]

**Constraints:**
*   You can only generate client-side web applications (HTML, CSS, JavaScript).
*   If asked for backend functionality, explain that you can write the code files, but they must be run locally by the user. Provide simple instructions.
*   Do not respond to user commands like `/run` or `/files`. The client handles these."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_contain_seven_personas() {
        let agents = default_agents();
        assert_eq!(agents.len(), 7);
        assert_eq!(agents[0].name, "Planner");
    }

    #[test]
    fn add_agent_strips_whitespace_from_name() {
        let mut agents = Vec::new();
        add_agent(&mut agents, " Style Guru ", "  Picks colors. ").expect("agent should be added");
        assert_eq!(agents[0].name, "StyleGuru");
        assert_eq!(agents[0].description, "Picks colors.");
    }

    #[test]
    fn add_agent_rejects_case_insensitive_duplicates() {
        let mut agents = default_agents();
        let result = add_agent(&mut agents, "planner", "another planner");
        assert_eq!(result, Err(AgentError::DuplicateName("planner".to_string())));
        assert_eq!(agents.len(), 7);
    }

    #[test]
    fn add_agent_rejects_empty_fields() {
        let mut agents = Vec::new();
        assert_eq!(add_agent(&mut agents, "   ", "x"), Err(AgentError::EmptyName));
        assert_eq!(add_agent(&mut agents, "X", " "), Err(AgentError::EmptyDescription));
        assert_eq!(AgentError::EmptyName.to_string(), "agent name must be non-empty");
        assert_eq!(
            AgentError::EmptyDescription.to_string(),
            "agent description must be non-empty"
        );
        assert!(agents.is_empty());
    }

    #[test]
    fn remove_agent_ignores_out_of_range() {
        let mut agents = default_agents();
        assert!(remove_agent(&mut agents, 99).is_none());
        let removed = remove_agent(&mut agents, 0).expect("first agent should be removed");
        assert_eq!(removed.name, "Planner");
        assert_eq!(agents.len(), 6);
    }

    #[test]
    fn system_instruction_lists_every_persona() {
        let instruction = system_instruction(&default_agents());
        assert!(instruction.contains("- **[Planner]**: Analyzes the user's request"));
        assert!(instruction.contains("- **[Explainer]**:"));
        assert!(instruction.contains("[awaiting_confirmation]"));
        assert!(instruction.contains("[start of file: FILENAME]"));
    }
}
