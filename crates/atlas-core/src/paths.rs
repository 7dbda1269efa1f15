use crate::types::ItemType;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const ATLAS_DIR: &str = ".atlas";
pub const METADATA_FILE: &str = ".atlas/backlog_metadata.json";
pub const CONFIG_FILE: &str = ".atlas/config.yaml";

pub const DEFAULT_BACKLOG_DIR: &str = "backlog";

/// Leading marker on an artifact file name for items in a done state.
pub const DONE_MARKER: char = '_';

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn metadata_path(root: &Path) -> PathBuf {
    root.join(METADATA_FILE)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Directory for one item type, relative to the project root.
pub fn type_dir(backlog_dir: &str, item_type: ItemType) -> PathBuf {
    Path::new(backlog_dir).join(item_type.dir_name())
}

/// Resolve a stored `file_path` against the project root.
pub fn resolve(root: &Path, file_path: &str) -> PathBuf {
    root.join(file_path)
}

// ---------------------------------------------------------------------------
// Artifact file names
// ---------------------------------------------------------------------------

/// Lowercase the title, drop anything that is not ASCII alphanumeric or whitespace,
/// join the words with `_` and cut to `max_len` characters.
pub fn slugify(title: &str, max_len: usize) -> String {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    let joined = cleaned.split_whitespace().collect::<Vec<_>>().join("_");
    let cut: String = joined.chars().take(max_len).collect();
    cut.trim_end_matches('_').to_string()
}

/// `<ID>_<slug>.md`, or `<ID>.md` when the slug is empty.
pub fn artifact_file_name(id: &str, slug: &str) -> String {
    if slug.is_empty() {
        format!("{id}.md")
    } else {
        format!("{id}_{slug}.md")
    }
}

pub fn is_marked_done(file_path: &str) -> bool {
    Path::new(file_path)
        .file_name()
        .map(|n| n.to_string_lossy().starts_with(DONE_MARKER))
        .unwrap_or(false)
}

/// Prefix the file name with the done marker, keeping directory and slug.
/// Already-marked paths are returned unchanged.
pub fn mark_done(file_path: &str) -> String {
    rewrite_file_name(file_path, |name| {
        if name.starts_with(DONE_MARKER) {
            name.to_string()
        } else {
            format!("{DONE_MARKER}{name}")
        }
    })
}

/// Strip the done marker from the file name, keeping directory and slug.
pub fn unmark_done(file_path: &str) -> String {
    rewrite_file_name(file_path, |name| {
        name.strip_prefix(DONE_MARKER).unwrap_or(name).to_string()
    })
}

fn rewrite_file_name(file_path: &str, f: impl FnOnce(&str) -> String) -> String {
    let path = Path::new(file_path);
    let Some(name) = path.file_name() else {
        return file_path.to_string();
    };
    let renamed = f(&name.to_string_lossy());
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            parent.join(renamed).to_string_lossy().into_owned()
        }
        _ => renamed,
    }
}

// ---------------------------------------------------------------------------
// Naming convention
// ---------------------------------------------------------------------------

static ARTIFACT_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn artifact_name_re() -> &'static Regex {
    ARTIFACT_NAME_RE
        .get_or_init(|| Regex::new(r"^_?([FBTE])\d{4,}(_[a-z0-9_]+)?\.md$").unwrap())
}

/// True if `file_name` follows `[_]<P>####[_slug].md` (four or more digits)
/// for the given type.
pub fn follows_naming_convention(file_name: &str, item_type: ItemType) -> bool {
    artifact_name_re()
        .captures(file_name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str() == item_type.prefix())
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
