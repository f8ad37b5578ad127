use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use crate::errors::MatchError;
use tracing::info;

/// Where the copy for `left` lands: `copy_dest` plus `left` relative to its tree.
///
/// A `left` outside `left_root` has no relative path and fails the copy.
pub fn destination_for(copy_dest: &Path, left_root: &Path, left: &Path) -> Result<PathBuf, MatchError> {
    let relative = left.strip_prefix(left_root).map_err(|_| MatchError::CopyFailed {
        src: left.to_path_buf(),
        dest: copy_dest.to_path_buf(),
        reason: format!("not under left tree {}", left_root.display()),
    })?;
    Ok(copy_dest.join(relative))
}

/// Copy `src` to `dest`, creating parent directories.
///
/// Bytes go to a temporary file beside `dest` that is renamed into place,
/// so `dest` is either absent or complete.
pub async fn copy_atomically(src: &Path, dest: &Path) -> Result<(), MatchError> {
    let (src_owned, dest_owned) = (src.to_path_buf(), dest.to_path_buf());
    tokio::task::spawn_blocking(move || copy_blocking(&src_owned, &dest_owned))
        .await
        .map_err(|e| MatchError::CopyFailed {
            src: src.to_path_buf(),
            dest: dest.to_path_buf(),
            reason: e.to_string(),
        })??;

    info!(src = %src.display(), dest = %dest.display(), "Copied match");
    Ok(())
}

fn copy_blocking(src: &Path, dest: &Path) -> Result<(), MatchError> {
    let failed = |reason: String| MatchError::CopyFailed {
        src: src.to_path_buf(),
        dest: dest.to_path_buf(),
        reason,
    };

    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| failed(format!("creating {}: {}", dir.display(), e)))?;

    let mut input = File::open(src).map_err(|e| failed(e.to_string()))?;
    let mut staged = NamedTempFile::new_in(dir).map_err(|e| failed(e.to_string()))?;
    std::io::copy(&mut input, &mut staged).map_err(|e| failed(e.to_string()))?;
    staged.as_file().sync_all().map_err(|e| failed(e.to_string()))?;

    let permissions = input.metadata().map_err(|e| failed(e.to_string()))?.permissions();
    std::fs::set_permissions(staged.path(), permissions).map_err(|e| failed(e.to_string()))?;

    staged.persist(dest).map_err(|e| failed(e.error.to_string()))?;
    Ok(())
}
