//! Path utilities for finding the target directory

use std::{
    env,
    fs,
    path::{
        Path,
        PathBuf,
    },
};

/// Walk up from `start` to the first directory whose `Cargo.toml` declares a workspace
fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .skip(1)
        .find(|dir| {
            fs::read_to_string(dir.join("Cargo.toml"))
                .is_ok_and(|contents| contents.contains("[workspace]"))
        })
        .map(Path::to_path_buf)
}

/// Get the target directory used by Cargo
///
/// 1. `CARGO_TARGET_DIR`, if set
/// 2. `target` under the workspace root above `CARGO_MANIFEST_DIR`
/// 3. `target` under `CARGO_MANIFEST_DIR`
/// 4. `target` relative to the current directory
pub(super) fn get_target_dir() -> PathBuf {
    if let Ok(target_dir) = env::var("CARGO_TARGET_DIR") {
        return PathBuf::from(target_dir);
    }
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        let manifest_path = PathBuf::from(manifest_dir);
        return find_workspace_root(&manifest_path)
            .unwrap_or(manifest_path)
            .join("target");
    }
    PathBuf::from("target")
}
