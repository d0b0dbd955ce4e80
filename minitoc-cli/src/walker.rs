//! Directory walker for discovering markdown files to render

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Errors that can occur while walking an input directory
#[derive(Error, Debug)]
pub enum WalkerError {
    /// Directory traversal failed
    #[error("Failed to walk {path}: {source}", path = .path.display())]
    Walk {
        /// Root being walked
        path: PathBuf,
        /// Underlying walkdir error
        #[source]
        source: walkdir::Error,
    },
}

/// A markdown file and where its page goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    /// Source markdown file
    pub input: PathBuf,
    /// Destination HTML file
    pub output: PathBuf,
}

/// Find every `.md` file under `root`, mirroring the tree into `output_root`
///
/// Files are returned sorted by path so output is stable across runs.
pub fn find_markdown_files(root: &Path, output_root: &Path) -> Result<Vec<RenderJob>, WalkerError> {
    let mut jobs = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|source| WalkerError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if !entry.file_type().is_file() || !is_markdown(path) {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        jobs.push(RenderJob {
            input: path.to_path_buf(),
            output: output_root.join(relative).with_extension("html"),
        });
    }

    log::info!("Found {} markdown files under {}", jobs.len(), root.display());
    Ok(jobs)
}

fn is_markdown(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("md") | Some("markdown")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_is_markdown() {
        assert!(is_markdown(Path::new("guide.md")));
        assert!(is_markdown(Path::new("docs/notes.markdown")));
        assert!(!is_markdown(Path::new("image.png")));
        assert!(!is_markdown(Path::new("README")));
    }

    #[test]
    fn test_find_markdown_files_mirrors_tree() {
        let root = std::env::temp_dir().join(format!("minitoc-walker-{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("guide")).unwrap();
        fs::write(root.join("index.md"), "## Home\n").unwrap();
        fs::write(root.join("guide/setup.md"), "## Setup\n").unwrap();
        fs::write(root.join("guide/diagram.svg"), "<svg/>").unwrap();

        let jobs = find_markdown_files(&root, Path::new("out")).unwrap();

        let outputs: Vec<PathBuf> = jobs.iter().map(|job| job.output.clone()).collect();
        assert_eq!(
            outputs,
            vec![
                PathBuf::from("out/guide/setup.html"),
                PathBuf::from("out/index.html"),
            ]
        );

        fs::remove_dir_all(&root).unwrap();
    }
}
