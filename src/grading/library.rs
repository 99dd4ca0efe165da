use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::{error::LutError, grading::{cube, Lut3D}};

/// Name that disables color grading
pub const NO_LUT: &str = "none";

/// Named LUTs resolved from a resource directory
///
/// A LUT called `warm` lives at `<dir>/warm.cube`. Parsed tables are cached,
/// so repeated compositions with the same look only read the file once.
pub struct LutLibrary {
    dir: PathBuf,
    cache: RwLock<HashMap<String, Arc<Lut3D>>>,
}

impl LutLibrary {
    /// Create a library rooted at `dir`
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a LUT name resolves to
    pub fn path_for(&self, name: &str) -> Result<PathBuf, LutError> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(LutError::InvalidName { name: name.to_string() });
        }
        Ok(self.dir.join(format!("{}.cube", name)))
    }

    /// Load a LUT by name, reading and parsing it on first use
    pub fn load(&self, name: &str) -> Result<Arc<Lut3D>, LutError> {
        if let Some(lut) = self.cache.read().ok().and_then(|cache| cache.get(name).cloned()) {
            return Ok(lut);
        }

        let path = self.path_for(name)?;
        debug!("Loading LUT {} from {:?}", name, path);
        let lut = Arc::new(cube::read_cube(&path)?);

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(name.to_string(), Arc::clone(&lut));
        }
        Ok(lut)
    }

    /// Check if a LUT file exists for this name
    pub fn has_lut(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Get all available LUT names (file stems of `*.cube`), sorted
    pub fn available_luts(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("cube"))
            })
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        names.sort();
        names
    }

    /// Number of LUTs currently cached
    pub fn cached_len(&self) -> usize {
        self.cache.read().map(|cache| cache.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_identity_cube(dir: &Path, name: &str) {
        let mut cube = String::from("TITLE \"identity\"\nLUT_3D_SIZE 2\n");
        for b in 0..2 {
            for g in 0..2 {
                for r in 0..2 {
                    cube.push_str(&format!("{} {} {}\n", r, g, b));
                }
            }
        }
        std::fs::write(dir.join(format!("{}.cube", name)), cube).unwrap();
    }

    #[test]
    fn test_available_luts_sorted() {
        let dir = tempdir().unwrap();
        write_identity_cube(dir.path(), "warm");
        write_identity_cube(dir.path(), "cool");
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let library = LutLibrary::new(dir.path());
        assert_eq!(library.available_luts(), vec!["cool".to_string(), "warm".to_string()]);
        assert!(library.has_lut("warm"));
        assert!(!library.has_lut("notes"));
    }

    #[test]
    fn test_load_caches() {
        let dir = tempdir().unwrap();
        write_identity_cube(dir.path(), "warm");

        let library = LutLibrary::new(dir.path());
        let first = library.load("warm").unwrap();
        std::fs::remove_file(dir.path().join("warm.cube")).unwrap();
        let second = library.load("warm").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(library.cached_len(), 1);
    }

    #[test]
    fn test_missing_lut() {
        let dir = tempdir().unwrap();
        let library = LutLibrary::new(dir.path());
        assert!(matches!(library.load("ghost"), Err(LutError::NotFound { .. })));
    }

    #[test]
    fn test_rejects_path_names() {
        let library = LutLibrary::new("luts");
        assert!(matches!(library.load("../etc/passwd"), Err(LutError::InvalidName { .. })));
        assert!(library.path_for("").is_err());
    }

    #[test]
    fn test_missing_directory_lists_nothing() {
        let library = LutLibrary::new("/definitely/not/here");
        assert!(library.available_luts().is_empty());
    }
}
