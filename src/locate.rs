use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::record::FailureRecord;

/// Version-control metadata directories skipped during traversal.
const VCS_DIRS: &[&str] = &[".svn", ".git"];

/// Walk the content-test tree once and attach `local_path` / `case_text` to
/// every record whose resolved name matches a file's base name.
///
/// The walk is sorted, so with duplicate base names in the tree the first
/// match deterministically wins; later duplicates are logged and ignored.
/// Records whose name is never found are left unresolved and carried forward.
pub fn locate_files(records: &mut [FailureRecord], content_tree: &Path) -> Result<()> {
    // One-time map from base name to the records that want it. Distinct
    // records may share a content-test name.
    let mut wanted: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, record) in records.iter().enumerate() {
        if let Some(name) = &record.content_test_name {
            wanted.entry(name.clone()).or_default().push(idx);
        }
    }
    if wanted.is_empty() {
        return Ok(());
    }

    let walker = WalkDir::new(content_tree)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            !(e.file_type().is_dir()
                && e.file_name()
                    .to_str()
                    .is_some_and(|n| VCS_DIRS.contains(&n)))
        });

    for entry in walker {
        let entry =
            entry.map_err(|e| Error::Process(format!("walk {}: {e}", content_tree.display())))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(base) = entry.file_name().to_str() else {
            continue;
        };
        let Some(indices) = wanted.get(base) else {
            continue;
        };

        let path = std::fs::canonicalize(entry.path())?;
        for &idx in indices {
            if records[idx].local_path.is_some() {
                warn!(
                    base,
                    path = %path.display(),
                    "duplicate base name in content tree, keeping first match"
                );
                continue;
            }
            let case_text = std::fs::read_to_string(&path)?;
            debug!(base, path = %path.display(), "located content test");
            records[idx].local_path = Some(path.clone());
            records[idx].case_text = Some(case_text);
        }
    }

    Ok(())
}
