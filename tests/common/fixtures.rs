use std::fs;
use std::path::{Path, PathBuf};

/// Discover all .fql files in tests/fixtures/<dir>/
pub fn discover_fixtures(dir: &str) -> Vec<PathBuf> {
    let fixtures_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(dir);

    let mut paths: Vec<_> = fs::read_dir(&fixtures_dir)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", fixtures_dir.display(), e))
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("fql"))
        .collect();
    paths.sort();
    paths
}

/// Load a fixture, dropping `#` comment lines and the trailing newline
pub fn load_fixture(path: &Path) -> String {
    let text = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", path.display(), e));
    text.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Expected failure written as `# error: <line>:<column>` or `# error: eof`.
/// Lines count from the first non-comment line.
pub fn expected_error(path: &Path) -> Option<ExpectedError> {
    let text = fs::read_to_string(path).ok()?;
    let location = text
        .lines()
        .find_map(|line| line.trim_start().strip_prefix("# error:"))?
        .trim();
    if location == "eof" {
        return Some(ExpectedError::Eof);
    }
    let (line, column) = location.split_once(':')?;
    Some(ExpectedError::At(line.parse().ok()?, column.parse().ok()?))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedError {
    Eof,
    At(usize, usize),
}
