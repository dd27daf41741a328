use std::path::PathBuf;

/// Outcome of the revision-history lookup for one record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HistoryStatus {
    /// Not attempted, either because the stage has not run yet or because
    /// the content-test file was never located.
    #[default]
    Pending,
    Fetched,
    /// The history command failed after the configured retry budget.
    Failed,
}

/// One failing generated test, threaded through every pipeline stage.
///
/// `generated_name` is fixed at construction; each later stage fills in its
/// own fields and never touches another stage's. `local_path` and `case_text`
/// are set together or not at all.
#[derive(Debug, Clone, Default)]
pub struct FailureRecord {
    pub generated_name: String,
    pub content_test_name: Option<String>,
    pub local_path: Option<PathBuf>,
    pub case_text: Option<String>,
    /// Revision ids implicating this file, newest first (the order the
    /// history tool emits them).
    pub revisions: Vec<String>,
    pub history: HistoryStatus,
}

impl FailureRecord {
    pub fn new(generated_name: impl Into<String>) -> Self {
        Self {
            generated_name: generated_name.into(),
            ..Self::default()
        }
    }
}
