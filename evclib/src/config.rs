use std::path::{Path, PathBuf};

pub const DEFAULT_LIBRARY_ROOT: &str = "scripts/lib";
pub const DEFAULT_SOURCE_EXTENSION: &str = "evc";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    pub library_root: PathBuf,
    pub source_extension: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            library_root: PathBuf::from(DEFAULT_LIBRARY_ROOT),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
        }
    }
}

impl CompileOptions {
    pub fn with_library_root(mut self, root: impl AsRef<Path>) -> Self {
        self.library_root = root.as_ref().to_path_buf();
        self
    }

    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == self.source_extension)
    }
}
