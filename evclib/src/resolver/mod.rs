use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::CompileOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveErrorKind {
    MissingModule,
    Io,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ResolveError {
    pub kind: ResolveErrorKind,
    pub message: String,
    pub path: Option<PathBuf>,
}

impl ResolveError {
    pub fn new(kind: ResolveErrorKind, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self {
            kind,
            message: message.into(),
            path,
        }
    }
}

pub fn import_candidates(importer: &Path, name: &str, options: &CompileOptions) -> [PathBuf; 2] {
    let dir = importer.parent().unwrap_or_else(|| Path::new(""));
    let sibling = dir.join(name).with_extension(&options.source_extension);
    let library = options
        .library_root
        .join(name)
        .join("lib")
        .with_extension(&options.source_extension);
    [sibling, library]
}

pub fn resolve_import(
    importer: &Path,
    name: &str,
    options: &CompileOptions,
) -> Result<PathBuf, ResolveError> {
    let candidates = import_candidates(importer, name, options);
    for candidate in &candidates {
        if is_file(candidate)? {
            return Ok(candidate.clone());
        }
    }
    Err(ResolveError::new(
        ResolveErrorKind::MissingModule,
        format!(
            "Module not found for import `{name}` (tried {} and {})",
            candidates[0].display(),
            candidates[1].display()
        ),
        Some(importer.to_path_buf()),
    ))
}

fn is_file(path: &Path) -> Result<bool, ResolveError> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.is_file()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(ResolveError::new(
            ResolveErrorKind::Io,
            format!("Failed to read metadata for {}: {}", path.display(), e),
            Some(path.to_path_buf()),
        )),
    }
}

pub fn collect_sources(root: &Path, options: &CompileOptions) -> Result<Vec<PathBuf>, ResolveError> {
    let mut out = Vec::new();
    collect_sources_inner(root, options, &mut out)?;
    out.sort();
    Ok(out)
}

fn collect_sources_inner(
    dir: &Path,
    options: &CompileOptions,
    out: &mut Vec<PathBuf>,
) -> Result<(), ResolveError> {
    let entries = fs::read_dir(dir).map_err(|e| {
        ResolveError::new(
            ResolveErrorKind::Io,
            format!("Failed to read directory {}: {}", dir.display(), e),
            Some(dir.to_path_buf()),
        )
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| {
            ResolveError::new(
                ResolveErrorKind::Io,
                format!("Failed to read directory entry in {}: {}", dir.display(), e),
                Some(dir.to_path_buf()),
            )
        })?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| {
            ResolveError::new(
                ResolveErrorKind::Io,
                format!("Failed to read file type for {}: {}", path.display(), e),
                Some(path.clone()),
            )
        })?;
        if file_type.is_dir() {
            collect_sources_inner(&path, options, out)?;
        } else if file_type.is_file() && options.is_source_file(&path) {
            out.push(path);
        }
    }
    Ok(())
}
