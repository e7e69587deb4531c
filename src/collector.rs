//! Terraform file collection.
//!
//! Reads a single directory (never recursing), keeps the `.tf` files and
//! turns each one into a [`SourceFile`] addressed by a `file://` URI.
//!
//! # Example
//!
//! ```rust,no_run
//! use tf_eraser::collector;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let files = collector::collect_directory("./terraform".as_ref()).await?;
//!     println!("Collected {} files", files.len());
//!     Ok(())
//! }
//! ```

use crate::error::Result;
use crate::types::SourceFile;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// Extension (without the dot) of the files that are collected.
pub const TERRAFORM_EXTENSION: &str = "tf";

/// URI scheme prefix for collected files.
pub const FILE_URI_PREFIX: &str = "file://";

/// Collect every `.tf` file directly inside `dir`, in directory-listing order.
///
/// Subdirectories are skipped. Any failure aborts the whole collection.
///
/// # Errors
///
/// Returns `DirectoryRead` if the directory cannot be listed, `FileRead` if a
/// matching file cannot be read, and `PathResolution` if a path cannot be
/// made absolute.
pub async fn collect_directory(dir: &Path) -> Result<Vec<SourceFile>> {
    let dir_err = |e| crate::err!(DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    });

    let mut entries = tokio::fs::read_dir(dir).await.map_err(dir_err)?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(dir_err)? {
        let file_type = entry.file_type().await.map_err(dir_err)?;
        if file_type.is_dir() {
            continue;
        }

        let path = dir.join(entry.file_name());
        if !is_terraform_file(&path) {
            tracing::trace!(file = %path.display(), "Skipping non-Terraform file");
            continue;
        }

        tracing::debug!(file = %path.display(), "Reading file");
        files.push(read_source_file(&path).await?);
    }

    tracing::info!(
        directory = %dir.display(),
        files = files.len(),
        "Collection complete"
    );

    Ok(files)
}

/// Read one file and address it by its absolute `file://` URI.
///
/// Invalid UTF-8 is replaced rather than rejected.
///
/// # Errors
///
/// Returns `FileRead` or `PathResolution` naming the file.
pub async fn read_source_file(path: &Path) -> Result<SourceFile> {
    let bytes = tokio::fs::read(path).await.map_err(|e| crate::err!(FileRead {
        path: path.to_path_buf(),
        source: e,
    }))?;

    let absolute = absolute_path(path)?;

    Ok(SourceFile {
        uri: file_uri(&absolute),
        content: String::from_utf8_lossy(&bytes).into_owned(),
    })
}

/// Resolve `path` against the current directory.
///
/// # Errors
///
/// Returns `PathResolution` if the current directory is unavailable.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| crate::err!(PathResolution {
        path: path.to_path_buf(),
        source: e,
    }))
}

/// Render an absolute path as a `file://` URI with `/` separators.
#[must_use]
pub fn file_uri(absolute: &Path) -> String {
    format!(
        "{FILE_URI_PREFIX}{}",
        to_slash(&absolute.to_string_lossy(), MAIN_SEPARATOR)
    )
}

fn to_slash(path: &str, separator: char) -> String {
    if separator == '/' {
        path.to_string()
    } else {
        path.replace(separator, "/")
    }
}

/// Check whether the final extension of the file name is exactly `tf`.
///
/// `main.tf.json` and `vars.tfvars` do not qualify.
#[must_use]
pub fn is_terraform_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext == TERRAFORM_EXTENSION))
        .unwrap_or(false)
}
