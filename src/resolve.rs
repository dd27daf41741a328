use std::path::Path;

use crate::error::{Error, Result};

/// Line in a generated test source that names the content test it was
/// generated from, e.g.
/// `private static final String TEST_PATH = "foo/bar/baz.html";`
const SENTINEL: &str = "private static final String TEST_PATH =";

/// Extension of generated test sources.
const GENERATED_EXT: &str = "java";

/// Resolve the content-test name embedded in a generated test's source.
///
/// Opens `<generated_dir>/<generated_name>.java` and scans for the first
/// sentinel line, returning the last path segment of its quoted literal.
/// Missing file or missing sentinel is `NameNotFound`; callers record it on
/// the individual record and keep going.
pub fn resolve_content_test_name(generated_dir: &Path, generated_name: &str) -> Result<String> {
    let source_path = generated_dir.join(format!("{generated_name}.{GENERATED_EXT}"));
    let source = std::fs::read_to_string(&source_path)
        .map_err(|e| Error::NameNotFound(format!("{}: {e}", source_path.display())))?;

    extract_content_test_name(&source)
        .ok_or_else(|| Error::NameNotFound(format!("no TEST_PATH line in {}", source_path.display())))
}

/// Scan generated source text for the sentinel line and pull out the content
/// test's base name. Tolerant of leading whitespace and of whitespace around
/// the quoted literal; the literal itself must be double-quoted.
pub fn extract_content_test_name(source: &str) -> Option<String> {
    for line in source.lines() {
        let trimmed = line.trim_start();
        let Some(rest) = trimmed.strip_prefix(SENTINEL) else {
            continue;
        };
        let quoted = extract_quoted(rest)?;
        let base = quoted.rsplit('/').next()?;
        if base.is_empty() {
            return None;
        }
        return Some(base.to_string());
    }
    None
}

fn extract_quoted(text: &str) -> Option<&str> {
    let start = text.find('"')? + 1;
    let end = start + text[start..].find('"')?;
    Some(&text[start..end])
}
