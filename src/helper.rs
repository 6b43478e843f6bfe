//! Local filesystem helpers used by folder uploads.

use async_recursion::async_recursion;
use chrono::Local;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

const TIMESTAMP_FORMAT: &str = "%b %d, %Y %l:%M%p";

/// Lists every non-directory entry below `dir`.
///
/// Each directory contributes its files in listing order before its subdirectories are
/// visited, also in listing order. Symlinks to directories are not followed. Directories
/// that cannot be read are skipped with a warning, as are entries whose type cannot be
/// determined.
pub async fn collect_files(dir: impl AsRef<Path>) -> Vec<PathBuf> {
    let mut files = vec![];
    walk(dir.as_ref().to_path_buf(), &mut files).await;
    files
}

#[async_recursion]
async fn walk(dir: PathBuf, files: &mut Vec<PathBuf>) {
    let mut entries = match fs::read_dir(&dir).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "skipping unreadable directory");
            return;
        }
    };
    let mut sub_dirs = vec![];

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "stopped listing directory");
                break;
            }
        };
        let file_type = match entry.file_type().await {
            Ok(file_type) => file_type,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "skipping entry");
                continue;
            }
        };

        if file_type.is_dir() {
            sub_dirs.push(entry.path());
        } else if file_type.is_symlink() && points_to_dir(&entry.path()).await {
            continue;
        } else {
            files.push(entry.path());
        }
    }

    for sub_dir in sub_dirs {
        walk(sub_dir, files).await;
    }
}

async fn points_to_dir(path: &Path) -> bool {
    fs::metadata(path).await.map_or(false, |m| m.is_dir())
}

/// Name of a folder created for a batch upload, e.g. `Gofile2 - Created in Oct 19, 2026  3:04PM`.
pub fn batch_folder_name(label: &str) -> String {
    format!(
        "{} - Created in {}",
        label,
        Local::now().format(TIMESTAMP_FORMAT)
    )
}
