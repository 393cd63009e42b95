//! Source document and system prompt loading.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::error::AppError;
use crate::utils::debug_enabled;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// The article being analyzed, with where it came from
#[derive(Debug, Clone)]
pub(crate) struct SourceDocument {
    /// File path or URL, for the output metadata header
    pub(crate) origin: String,
    pub(crate) content: String,
}

impl SourceDocument {
    fn from_raw(origin: String, raw: &str) -> Result<Self, AppError> {
        let content = raw.trim();
        if content.is_empty() {
            return Err(AppError::EmptyDocument { path: origin });
        }
        if debug_enabled() {
            eprintln!(
                "Document {}: {} bytes, {} lines",
                origin,
                content.len(),
                content.lines().count()
            );
        }
        Ok(Self {
            origin,
            content: content.to_string(),
        })
    }
}

pub(crate) fn load_html_file(path: &Path) -> Result<SourceDocument, AppError> {
    let raw = fs::read_to_string(path).map_err(|source| AppError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    SourceDocument::from_raw(path.display().to_string(), &raw)
}

pub(crate) fn fetch_url(url: &str) -> Result<SourceDocument, AppError> {
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(FETCH_TIMEOUT))
        .build()
        .into();

    let response = agent.get(url).call().map_err(|e| AppError::Http {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let raw = response
        .into_body()
        .read_to_string()
        .map_err(|e| AppError::Http {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    SourceDocument::from_raw(url.to_string(), &raw)
}

/// Pick the most recently modified `*.html` file in the cache directory.
/// Used when no explicit input is given; the fetch step that fills the
/// cache directory runs separately.
pub(crate) fn newest_cached_html(dir: &Path) -> Result<PathBuf, AppError> {
    let pattern = dir.join("*.html").display().to_string();
    let mut newest: Option<(SystemTime, PathBuf)> = None;

    for entry in glob::glob(&pattern).into_iter().flatten().flatten() {
        let modified = fs::metadata(&entry)
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        if newest.as_ref().is_none_or(|(ts, _)| modified > *ts) {
            newest = Some((modified, entry));
        }
    }

    newest
        .map(|(_, path)| path)
        .ok_or_else(|| AppError::NoCachedDocuments {
            dir: dir.to_path_buf(),
        })
}

pub(crate) fn load_system_prompt(path: &Path) -> Result<String, AppError> {
    let raw = fs::read_to_string(path).map_err(|source| AppError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let content = raw.trim();
    if content.is_empty() {
        return Err(AppError::EmptySystemPrompt {
            path: path.to_path_buf(),
        });
    }
    if debug_enabled() {
        eprintln!(
            "System prompt {}: {} bytes, {} lines",
            path.display(),
            content.len(),
            content.lines().count()
        );
    }
    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    #[test]
    fn load_html_file_trims_and_keeps_origin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("article.html");
        fs::write(&path, "  <html>body</html>\n\n").unwrap();

        let doc = load_html_file(&path).unwrap();
        assert_eq!(doc.content, "<html>body</html>");
        assert!(doc.origin.ends_with("article.html"));
    }

    #[test]
    fn empty_html_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.html");
        fs::write(&path, "   \n").unwrap();

        let err = load_html_file(&path).unwrap_err();
        assert!(err.to_string().starts_with("Document is empty"));
    }

    #[test]
    fn missing_html_file_is_read_error() {
        let err = load_html_file(Path::new("/nonexistent/file.html")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read"));
    }

    #[test]
    fn newest_cached_html_picks_latest_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let older = dir.path().join("older.html");
        let newer = dir.path().join("newer.html");

        fs::write(&older, "<html>old</html>").unwrap();
        fs::write(&newer, "<html>new</html>").unwrap();
        // Push the first file's mtime clearly into the past
        let past = SystemTime::now() - Duration::from_secs(3600);
        File::options()
            .write(true)
            .open(&older)
            .unwrap()
            .set_modified(past)
            .expect("set mtime");

        let picked = newest_cached_html(dir.path()).unwrap();
        assert_eq!(picked, newer);
    }

    #[test]
    fn newest_cached_html_ignores_non_html() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = File::create(dir.path().join("notes.txt")).unwrap();
        writeln!(f, "not html").unwrap();

        let err = newest_cached_html(dir.path()).unwrap_err();
        assert!(err.to_string().starts_with("No HTML documents found"));
    }

    #[test]
    fn system_prompt_must_be_non_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("system_prompt.md");
        fs::write(&path, "\n \n").unwrap();

        let err = load_system_prompt(&path).unwrap_err();
        assert!(err.to_string().starts_with("System prompt is empty"));

        fs::write(&path, "You are a social media editor.").unwrap();
        assert_eq!(
            load_system_prompt(&path).unwrap(),
            "You are a social media editor."
        );
    }
}
