use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Advisory progress label shown while a turn streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamStatus {
    Thinking,
    Receiving,
    Planning,
    GeneratingCode,
    Searching,
    WritingFile(String),
    Done,
}

impl StreamStatus {
    pub fn label(&self) -> String {
        match self {
            Self::Thinking => "Thinking...".to_string(),
            Self::Receiving => "Receiving response...".to_string(),
            Self::Planning => "Planning...".to_string(),
            Self::GeneratingCode => "Generating code...".to_string(),
            Self::Searching => "Searching the web...".to_string(),
            Self::WritingFile(name) => format!("Writing file: {name}"),
            Self::Done => "Done".to_string(),
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

type Rule = fn(&str) -> Option<StreamStatus>;

// Agent tags come first; the first rule that yields a status wins.
const RULES: &[Rule] = &[planner, code_generator, researcher, updating, creating];

fn planner(fragment: &str) -> Option<StreamStatus> {
    agent_tag(fragment, "[Planner]", StreamStatus::Planning)
}

fn code_generator(fragment: &str) -> Option<StreamStatus> {
    agent_tag(fragment, "[CodeGenerator]", StreamStatus::GeneratingCode)
}

fn researcher(fragment: &str) -> Option<StreamStatus> {
    agent_tag(fragment, "[WebAppResearcher]", StreamStatus::Searching)
}

fn updating(fragment: &str) -> Option<StreamStatus> {
    file_change(fragment, updating_pattern())
}

fn creating(fragment: &str) -> Option<StreamStatus> {
    file_change(fragment, creating_pattern())
}

fn agent_tag(fragment: &str, tag: &str, status: StreamStatus) -> Option<StreamStatus> {
    fragment.contains(tag).then_some(status)
}

fn file_change(fragment: &str, pattern: &Regex) -> Option<StreamStatus> {
    let captures = pattern.captures(fragment)?;
    Some(StreamStatus::WritingFile(captures[1].to_string()))
}

fn updating_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Updating `(.*?)`").expect("valid updating pattern"))
}

fn creating_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Creating `(.*?)`").expect("valid creating pattern"))
}

/// Inspects one newly arrived fragment. `None` leaves the current label.
pub fn classify(fragment: &str) -> Option<StreamStatus> {
    RULES.iter().find_map(|rule| rule(fragment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_tags_select_status() {
        assert_eq!(classify("[Planner] here is"), Some(StreamStatus::Planning));
        assert_eq!(
            classify("as [CodeGenerator]"),
            Some(StreamStatus::GeneratingCode)
        );
        assert_eq!(
            classify("[WebAppResearcher]: looking"),
            Some(StreamStatus::Searching)
        );
    }

    #[test]
    fn file_change_extracts_name() {
        assert_eq!(
            classify("* Updating `index.html` to add a title."),
            Some(StreamStatus::WritingFile("index.html".to_string()))
        );
        assert_eq!(
            classify("Creating `style.css`"),
            Some(StreamStatus::WritingFile("style.css".to_string()))
        );
    }

    #[test]
    fn agent_tag_outranks_file_change() {
        assert_eq!(
            classify("Updating `a.js` [Planner]"),
            Some(StreamStatus::Planning)
        );
    }

    #[test]
    fn updating_outranks_creating() {
        assert_eq!(
            classify("Creating `new.js` after Updating `old.js`"),
            Some(StreamStatus::WritingFile("old.js".to_string()))
        );
    }

    #[test]
    fn unterminated_file_name_is_ignored() {
        assert_eq!(classify("Updating `index.ht"), None);
        assert_eq!(classify("plain words"), None);
    }

    #[test]
    fn labels_match_indicator_text() {
        assert_eq!(StreamStatus::Thinking.label(), "Thinking...");
        assert_eq!(
            StreamStatus::WritingFile("a.js".to_string()).to_string(),
            "Writing file: a.js"
        );
    }
}
