pub mod check;
pub mod deploy;
pub mod destroy;
pub mod render;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Write the rendered manifest into the terraform working directory.
///
/// Creates the directory if needed; the file handle is opened, written
/// and closed within this call. Returns the manifest path.
pub fn write_manifest(terraform_dir: &Path, manifest: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(terraform_dir)
        .with_context(|| format!("creating {}", terraform_dir.display()))?;

    let path = terraform_dir.join("main.tf");
    std::fs::write(&path, manifest).with_context(|| format!("writing {}", path.display()))?;

    Ok(path)
}
