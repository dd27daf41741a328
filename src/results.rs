use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::record::FailureRecord;

/// File name the test harness writes its structured results under.
pub const RESULT_FILE_NAME: &str = "testResult.xml";

/// Naming convention for generated test classes.
pub const GENERATED_PREFIX: &str = "Webkit";
pub const GENERATED_SUFFIX: &str = "Test";

/// Timestamp embedded in result-set paths, e.g. `2014.03.01_00.00.00`.
const TIMESTAMP_FORMAT: &str = "%Y.%m.%d_%H.%M.%S";

static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{4}\.\d{2}\.\d{2}_\d{2}\.\d{2}\.\d{2}").expect("timestamp regex")
});

/// Find the most recent result set under `root`.
///
/// A single candidate is returned as-is. With multiple candidates, every
/// path must embed a parseable run timestamp; a candidate without one is a
/// hard `AmbiguousTimestamp` error rather than a silent skip.
pub fn locate_result_set(root: &Path) -> Result<PathBuf> {
    let mut candidates = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Process(format!("walk {}: {e}", root.display())))?;
        if entry.file_type().is_file() && entry.file_name() == RESULT_FILE_NAME {
            candidates.push(entry.into_path());
        }
    }

    match candidates.len() {
        0 => Err(Error::NoResultsFound(root.to_path_buf())),
        1 => Ok(candidates.remove(0)),
        n => {
            debug!(count = n, "multiple result sets, selecting newest");
            let mut newest: Option<(NaiveDateTime, PathBuf)> = None;
            for path in candidates {
                let stamp = embedded_timestamp(&path)
                    .ok_or_else(|| Error::AmbiguousTimestamp(path.clone()))?;
                if newest.as_ref().is_none_or(|(best, _)| stamp > *best) {
                    newest = Some((stamp, path));
                }
            }
            let (stamp, path) = newest.expect("n > 1 candidates");
            info!(%stamp, path = %path.display(), "selected result set");
            Ok(path)
        }
    }
}

fn embedded_timestamp(path: &Path) -> Option<NaiveDateTime> {
    let text = path.to_string_lossy();
    let m = TIMESTAMP_RE.find(&text)?;
    NaiveDateTime::parse_from_str(m.as_str(), TIMESTAMP_FORMAT).ok()
}

/// Parse a result file and yield one `FailureRecord` per failing generated
/// test case, in document order.
pub fn extract_failures(path: &Path) -> Result<Vec<FailureRecord>> {
    let content = std::fs::read_to_string(path)?;
    parse_failures(&content)
}

/// Extract failing test cases from result XML.
///
/// Every `TestCase` element must carry a `name` attribute and every nested
/// `Test` element a `result` attribute; a document violating either shape
/// fails fast with `ResultParse`.
pub fn parse_failures(xml: &str) -> Result<Vec<FailureRecord>> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| Error::ResultParse(format!("malformed result document: {e}")))?;

    let mut records = Vec::new();
    for node in doc.descendants().filter(|n| n.has_tag_name("TestCase")) {
        let name = node
            .attribute("name")
            .ok_or_else(|| Error::ResultParse("TestCase element without name".to_string()))?;
        if !(name.starts_with(GENERATED_PREFIX) && name.ends_with(GENERATED_SUFFIX)) {
            continue;
        }
        for test in node.children().filter(|n| n.has_tag_name("Test")) {
            let result = test.attribute("result").ok_or_else(|| {
                Error::ResultParse(format!("Test element without result in {name}"))
            })?;
            if result == "fail" {
                records.push(FailureRecord::new(name));
            }
        }
    }
    Ok(records)
}
