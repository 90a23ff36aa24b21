//! Tree definitions read from JSON files: `<root>/<realm>/<tree>.json`.

use std::path::{Path, PathBuf};

use authtree::{LoaderError, TreeDefinition, TreeLoader};

/// [`TreeLoader`] over a directory of JSON tree definitions.
///
/// A missing file is "no such tree"; unreadable or malformed files are loader errors.
/// Files are re-read on every load, so edits show up once the cached tree is dropped.
#[derive(Clone, Debug)]
pub struct DirectoryTreeLoader {
    root: PathBuf,
}

impl DirectoryTreeLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the definition file for `name` in `realm`.
    pub fn path_for(&self, realm: &str, name: &str) -> Result<PathBuf, LoaderError> {
        for part in [realm, name] {
            if part.is_empty() || part == "." || part == ".." || part.contains(['/', '\\']) {
                return Err(LoaderError::Parse(format!("invalid tree path segment {:?}", part)));
            }
        }
        Ok(self.root.join(realm).join(format!("{}.json", name)))
    }

    /// Names of the trees defined in `realm`, sorted.
    pub fn tree_names(&self, realm: &str) -> Result<Vec<String>, LoaderError> {
        let dir = self.root.join(realm);
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| LoaderError::Io(format!("{}: {}", dir.display(), e)))?;
        let mut names = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| LoaderError::Io(format!("{}: {}", dir.display(), e)))?
                .path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

impl TreeLoader for DirectoryTreeLoader {
    fn load(&self, realm: &str, name: &str) -> Result<Option<TreeDefinition>, LoaderError> {
        let path = self.path_for(realm, name)?;
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LoaderError::Io(format!("{}: {}", path.display(), e))),
        };
        let definition: TreeDefinition = serde_json::from_slice(&bytes)
            .map_err(|e| LoaderError::Parse(format!("{}: {}", path.display(), e)))?;
        if definition.realm != realm || definition.name != name {
            return Err(LoaderError::Parse(format!(
                "{} defines {}/{}, expected {}/{}",
                path.display(),
                definition.realm,
                definition.name,
                realm,
                name
            )));
        }
        Ok(Some(definition))
    }
}
