//! Single-document views of the project: the live preview and the
//! downloadable bundle.

use crate::project::ProjectFiles;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const EMPTY_BODY: &str = "<body></body>";
const PLACEHOLDER_PAGE: &str = "<!DOCTYPE html><html><head><title>CodeWrap Project</title></head><body><p>Project started without an index.html file.</p></body></html>";
pub const BUNDLE_FILE_NAME: &str = "index.html";

/// Page used by `/run`: `index.html` with the main stylesheet and script
/// inlined.
pub fn preview_document(files: &ProjectFiles) -> String {
    let html = files.get("index.html").unwrap_or(EMPTY_BODY);
    let css = files.first_of(&["style.css", "index.css"]).unwrap_or("");
    let js = files.first_of(&["script.js", "index.js"]).unwrap_or("");
    format!("<html><head><style>{css}</style></head>{html}<script>{js}</script></html>")
}

/// Page used by `/download`: every `.css` and `.js` file folded into
/// `index.html`.
pub fn bundle_document(files: &ProjectFiles) -> String {
    let mut html = files
        .get("index.html")
        .unwrap_or(PLACEHOLDER_PAGE)
        .to_string();
    let mut css = String::new();
    let mut js = String::new();

    for (name, content) in files.iter() {
        if name.ends_with(".css") {
            css.push_str(&format!("\n/* --- {name} --- */\n{content}"));
        } else if name.ends_with(".js") {
            js.push_str(&format!("\n// --- {name} --- \n{content}\n"));
        }
    }

    if !css.is_empty() {
        html = inject_before(&html, "</head>", &format!("<style>{css}</style>\n"));
    }
    if !js.is_empty() {
        html = inject_before(&html, "</body>", &format!("<script>{js}</script>\n"));
    }
    html
}

fn inject_before(html: &str, anchor: &str, snippet: &str) -> String {
    match html.find(anchor) {
        Some(index) => format!("{}{snippet}{}", &html[..index], &html[index..]),
        None => format!("{html}{}", snippet.trim_end_matches('\n')),
    }
}

/// `dir/name`, or `dir/stem (n).ext` for the first free `n`.
pub fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) => (stem, format!(".{ext}")),
        None => (name, String::new()),
    };
    (1..)
        .map(|n| dir.join(format!("{stem} ({n}){ext}")))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

pub fn write_preview(files: &ProjectFiles, dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("codewrap-preview-{}.html", std::process::id()));
    fs::write(&path, preview_document(files))?;
    Ok(path)
}

pub fn write_bundle(files: &ProjectFiles, dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = unique_path(dir, BUNDLE_FILE_NAME);
    fs::write(&path, bundle_document(files))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn project(pairs: &[(&str, &str)]) -> ProjectFiles {
        ProjectFiles::from_pairs(
            pairs
                .iter()
                .map(|(name, content)| (name.to_string(), content.to_string()))
                .collect(),
        )
    }

    #[test]
    fn preview_of_empty_project_has_empty_body() {
        assert_eq!(
            preview_document(&ProjectFiles::new()),
            "<html><head><style></style></head><body></body><script></script></html>"
        );
    }

    #[test]
    fn preview_uses_fallback_names() {
        let files = project(&[
            ("index.html", "<body>x</body>"),
            ("index.css", "p{}"),
            ("index.js", "go()"),
        ]);
        assert_eq!(
            preview_document(&files),
            "<html><head><style>p{}</style></head><body>x</body><script>go()</script></html>"
        );
    }

    #[test]
    fn bundle_injects_before_closing_tags() {
        let files = project(&[
            ("index.html", "<html><head></head><body></body></html>"),
            ("a.css", "a{}"),
            ("b.js", "b()"),
        ]);
        assert_eq!(
            bundle_document(&files),
            "<html><head><style>\n/* --- a.css --- */\na{}</style>\n</head><body><script>\n// --- b.js --- \nb()\n</script>\n</body></html>"
        );
    }

    #[test]
    fn bundle_appends_when_tags_missing() {
        let files = project(&[("index.html", "<p>hi</p>"), ("s.css", "p{}")]);
        assert_eq!(
            bundle_document(&files),
            "<p>hi</p><style>\n/* --- s.css --- */\np{}</style>"
        );
    }

    #[test]
    fn bundle_without_index_uses_placeholder() {
        let files = project(&[("notes.txt", "ignored")]);
        assert_eq!(bundle_document(&files), PLACEHOLDER_PAGE);
    }

    #[test]
    fn unique_path_never_overwrites() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let files = project(&[("index.html", "<p>1</p>")]);

        let first = write_bundle(&files, dir.path()).expect("first bundle should write");
        let second = write_bundle(&files, dir.path()).expect("second bundle should write");

        assert_eq!(first, dir.path().join("index.html"));
        assert_eq!(second, dir.path().join("index (1).html"));
    }
}
