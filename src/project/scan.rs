//! Builds the path map from a project directory.

use anyhow::Context;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::project::file::FileEntry;
use crate::server::path_map::PathMap;

const INDEX_FILE: &str = "index.html";

/// A servable file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub uri: String,
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

/// Scans `root` and maps every servable file to its URI.
///
/// Runs on a blocking thread. Hidden entries and symlinks are skipped.
pub async fn scan_directory(root: impl AsRef<Path>) -> anyhow::Result<PathMap> {
    let files = collect_files(root).await?;
    Ok(build_path_map(files))
}

/// Lists the servable files under `root` without reading them.
pub async fn collect_files(root: impl AsRef<Path>) -> anyhow::Result<Vec<ScannedFile>> {
    let root = root.as_ref().to_path_buf();

    tokio::task::spawn_blocking(move || -> anyhow::Result<Vec<ScannedFile>> {
        let meta = std::fs::metadata(&root)
            .with_context(|| format!("Project directory {} not found", root.display()))?;
        if !meta.is_dir() {
            anyhow::bail!("{} is not a directory", root.display());
        }

        let mut files = Vec::new();
        walk_dir(&root, &root, &mut files)?;
        files.sort_by(|a, b| a.uri.cmp(&b.uri));
        Ok(files)
    })
    .await
    .context("Directory scan task failed")?
}

/// Turns scanned files into a path map.
///
/// A directory holding `index.html` is also reachable through its own URI
/// (`/`, `/docs/`).
pub fn build_path_map(files: Vec<ScannedFile>) -> PathMap {
    let mut map = PathMap::with_capacity(files.len());

    for file in files {
        let entry = FileEntry::new(&file.path, guess_content_type(&file.path));

        if let Some(dir_uri) = file.uri.strip_suffix(INDEX_FILE) {
            if dir_uri.ends_with('/') {
                map.insert(dir_uri.to_string(), entry.clone());
            }
        }

        map.insert(file.uri, entry);
    }

    map
}

/// MIME type for a file, or `None` when the extension is unknown.
pub fn guess_content_type(path: &Path) -> Option<String> {
    mime_guess::from_path(path).first_raw().map(str::to_string)
}

fn walk_dir(dir: &Path, root: &Path, files: &mut Vec<ScannedFile>) -> anyhow::Result<()> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?;

    for entry in entries {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        let file_type = entry.file_type()?;
        let path = entry.path();

        if file_type.is_symlink() {
            continue;
        }
        if file_type.is_dir() {
            walk_dir(&path, root, files)?;
        } else if file_type.is_file() {
            let meta = entry.metadata()?;
            files.push(ScannedFile {
                uri: web_path(root, &path)?,
                len: meta.len(),
                modified: meta.modified().ok(),
                path,
            });
        }
    }

    Ok(())
}

fn web_path(root: &Path, path: &Path) -> anyhow::Result<String> {
    let relative = path.strip_prefix(root)?;
    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(format!("/{}", segments.join("/")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanned(uri: &str) -> ScannedFile {
        ScannedFile {
            uri: uri.to_string(),
            path: PathBuf::from(format!("/project{}", uri)),
            len: 0,
            modified: None,
        }
    }

    #[test]
    fn index_files_get_directory_alias() {
        let map = build_path_map(vec![scanned("/index.html"), scanned("/docs/index.html")]);

        assert_eq!(map["/"].source, PathBuf::from("/project/index.html"));
        assert_eq!(map["/docs/"].source, PathBuf::from("/project/docs/index.html"));
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn similarly_named_file_is_not_an_index() {
        let map = build_path_map(vec![scanned("/myindex.html")]);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn unknown_extension_has_no_type() {
        assert_eq!(guess_content_type(Path::new("a.html")).as_deref(), Some("text/html"));
        assert_eq!(guess_content_type(Path::new("noext")), None);
    }
}
