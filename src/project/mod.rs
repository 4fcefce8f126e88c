use indexmap::IndexMap;

pub mod bundle;

/// In-memory project: file name to full text. Names are used verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFiles {
    files: IndexMap<String, String>,
}

impl ProjectFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            files: pairs.into_iter().collect(),
        }
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.files
            .iter()
            .map(|(name, content)| (name.clone(), content.clone()))
            .collect()
    }

    /// Inserts or overwrites; returns `true` when the name was not present.
    pub fn insert(&mut self, name: String, content: String) -> bool {
        self.files.insert(name, content).is_none()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files
            .iter()
            .map(|(name, content)| (name.as_str(), content.as_str()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// First of `names` present in the project.
    pub fn first_of(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::ProjectFiles;

    #[test]
    fn insert_reports_new_then_overwrite() {
        let mut files = ProjectFiles::new();
        assert!(files.insert("index.html".to_string(), "a".to_string()));
        assert!(!files.insert("index.html".to_string(), "b".to_string()));
        assert_eq!(files.get("index.html"), Some("b"));
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut files = ProjectFiles::new();
        files.insert("Index.html".to_string(), "a".to_string());
        assert_eq!(files.get("index.html"), None);
    }

    #[test]
    fn pairs_keep_insertion_order() {
        let pairs = vec![
            ("b.js".to_string(), "2".to_string()),
            ("a.css".to_string(), "1".to_string()),
        ];
        let files = ProjectFiles::from_pairs(pairs.clone());
        assert_eq!(files.to_pairs(), pairs);
        assert_eq!(files.names().collect::<Vec<_>>(), vec!["b.js", "a.css"]);
    }

    #[test]
    fn first_of_prefers_earlier_candidates() {
        let mut files = ProjectFiles::new();
        files.insert("index.css".to_string(), "fallback".to_string());
        assert_eq!(files.first_of(&["style.css", "index.css"]), Some("fallback"));
        files.insert("style.css".to_string(), "main".to_string());
        assert_eq!(files.first_of(&["style.css", "index.css"]), Some("main"));
        assert_eq!(files.first_of(&["script.js"]), None);
    }
}
