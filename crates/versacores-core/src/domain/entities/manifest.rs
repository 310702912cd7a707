//! The per-core file manifest.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{
    error::DomainError,
    value_objects::{FileCategory, UsageContext},
};

/// One registered file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub path: PathBuf,
    pub category: FileCategory,
    pub usage: UsageContext,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>, category: FileCategory, usage: UsageContext) -> Self {
        Self {
            path: path.into(),
            category,
            usage,
        }
    }
}

/// Files registered for one core, in registration order.
///
/// Entries are unique by resolved path; at most one of them is the top entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileManifest {
    entries: Vec<FileEntry>,
    top: Option<PathBuf>,
}

impl FileManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: FileEntry) -> Result<(), DomainError> {
        if self.contains(&entry.path) {
            return Err(DomainError::DuplicateFile { path: entry.path });
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Designate the top entry. The path must already be registered and the
    /// top may only be set once.
    pub fn set_top(&mut self, core: &str, path: &Path) -> Result<(), DomainError> {
        if let Some(existing) = &self.top {
            return Err(DomainError::TopAlreadySet {
                core: core.to_string(),
                existing: existing.clone(),
            });
        }
        if !self.contains(path) {
            return Err(DomainError::TopNotRegistered {
                path: path.to_path_buf(),
            });
        }
        self.top = Some(path.to_path_buf());
        Ok(())
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.iter().any(|e| e.path == path)
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn top(&self) -> Option<&Path> {
        self.top.as_deref()
    }

    pub fn by_category(&self, category: FileCategory) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hdl(path: &str) -> FileEntry {
        FileEntry::new(path, FileCategory::HdlSource, UsageContext::All)
    }

    #[test]
    fn rejects_duplicate_path() {
        let mut manifest = FileManifest::new();
        manifest.add(hdl("/cores/a/a.sv")).unwrap();
        let err = manifest.add(hdl("/cores/a/a.sv")).unwrap_err();
        assert_eq!(
            err,
            DomainError::DuplicateFile {
                path: PathBuf::from("/cores/a/a.sv")
            }
        );
        assert_eq!(manifest.len(), 1);
    }

    #[test]
    fn top_must_be_registered() {
        let mut manifest = FileManifest::new();
        let err = manifest
            .set_top("a", Path::new("/cores/a/a.sv"))
            .unwrap_err();
        assert!(matches!(err, DomainError::TopNotRegistered { .. }));
        assert!(manifest.top().is_none());
    }

    #[test]
    fn top_can_only_be_set_once() {
        let mut manifest = FileManifest::new();
        manifest.add(hdl("/cores/a/a.sv")).unwrap();
        manifest.add(hdl("/cores/a/b.sv")).unwrap();
        manifest.set_top("a", Path::new("/cores/a/a.sv")).unwrap();

        let err = manifest
            .set_top("a", Path::new("/cores/a/b.sv"))
            .unwrap_err();
        assert!(matches!(err, DomainError::TopAlreadySet { .. }));
        assert_eq!(manifest.top(), Some(Path::new("/cores/a/a.sv")));
    }

    #[test]
    fn filters_by_category() {
        let mut manifest = FileManifest::new();
        manifest.add(hdl("/a.sv")).unwrap();
        manifest
            .add(FileEntry::new(
                "/pins.xdc",
                FileCategory::Constraint,
                UsageContext::Implementation,
            ))
            .unwrap();

        assert_eq!(manifest.by_category(FileCategory::HdlSource).count(), 1);
        assert_eq!(manifest.by_category(FileCategory::Constraint).count(), 1);
        assert_eq!(manifest.by_category(FileCategory::Script).count(), 0);
    }
}
