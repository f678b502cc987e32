//! Path resolution for memory files

use std::path::{Path, PathBuf};

const INDEX_FILE: &str = "operative.json";
const RECORD_PREFIX: &str = "memory_";
const RECORD_SUFFIX: &str = ".json";

/// Resolves the files that make up one memory directory
#[derive(Debug, Clone)]
pub struct MemoryPaths {
    pub base_dir: PathBuf,
}

impl MemoryPaths {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Default memory directory (`~/.strata/memory`)
    pub fn default_base_dir() -> std::io::Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;
        Ok(home.join(".strata").join("memory"))
    }

    /// Get operative.json path
    pub fn index_file(&self) -> PathBuf {
        self.base_dir.join(INDEX_FILE)
    }

    /// Get the path of one record file
    pub fn record_file(&self, level: u32, id: &str) -> PathBuf {
        self.base_dir.join(record_filename(level, id))
    }

    /// Resolve a `reference` value, tolerating legacy path-qualified forms
    pub fn reference_file(&self, reference: &str) -> PathBuf {
        self.base_dir.join(reference_basename(reference))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// `memory_{level}_{id}.json`
pub fn record_filename(level: u32, id: &str) -> String {
    format!("{RECORD_PREFIX}{level}_{id}{RECORD_SUFFIX}")
}

/// Split a record filename into level and id
pub fn parse_record_filename(name: &str) -> Option<(u32, String)> {
    let stem = name
        .strip_prefix(RECORD_PREFIX)?
        .strip_suffix(RECORD_SUFFIX)?;
    let (level, id) = stem.split_once('_')?;
    if id.is_empty() || id.contains(['_', '/', '\\']) {
        return None;
    }
    let level = level.parse().ok()?;
    Some((level, id.to_string()))
}

/// Strip any directory components, accepting both separator styles
pub fn reference_basename(reference: &str) -> &str {
    reference.rsplit(['/', '\\']).next().unwrap_or(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_file() {
        let paths = MemoryPaths::new("/tmp/mem");
        assert!(paths.index_file().ends_with("operative.json"));
    }

    #[test]
    fn test_record_file() {
        let paths = MemoryPaths::new("/tmp/mem");
        assert_eq!(
            paths.record_file(2, "1700000000000001"),
            PathBuf::from("/tmp/mem/memory_2_1700000000000001.json")
        );
    }

    #[test]
    fn test_parse_record_filename() {
        assert_eq!(
            parse_record_filename("memory_0_1712345678901.json"),
            Some((0, "1712345678901".to_string()))
        );
        assert_eq!(
            parse_record_filename("memory_12_abc.json"),
            Some((12, "abc".to_string()))
        );
        assert_eq!(parse_record_filename("operative.json"), None);
        assert_eq!(parse_record_filename("memory_0_123.tmp"), None);
        assert_eq!(parse_record_filename("memory_x_123.json"), None);
        assert_eq!(parse_record_filename("memory_1_.json"), None);
    }

    #[test]
    fn test_reference_basename() {
        assert_eq!(reference_basename("memory_1_5.json"), "memory_1_5.json");
        assert_eq!(
            reference_basename("server/memory/memory_1_5.json"),
            "memory_1_5.json"
        );
        assert_eq!(
            reference_basename("C:\\data\\memory\\memory_0_7.json"),
            "memory_0_7.json"
        );
    }

    #[test]
    fn test_default_base_dir() {
        match dirs::home_dir() {
            Some(home) => {
                let dir = MemoryPaths::default_base_dir().unwrap();
                assert_eq!(dir, home.join(".strata").join("memory"));
            }
            None => assert!(MemoryPaths::default_base_dir().is_err()),
        }
    }
}
