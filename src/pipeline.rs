use tracing::{info, warn};

use crate::config::Config;
use crate::diagnostics;
use crate::error::Result;
use crate::history::{self, HistoryConfig};
use crate::locate;
use crate::record::FailureRecord;
use crate::report;
use crate::resolve;
use crate::results;

/// Runs the stages in order, each to completion before the next.
///
/// Structural failures (no result set, ambiguous timestamps, unparseable
/// XML) abort the run. Per-record failures are recorded on the individual
/// record and surface as markers in the rendered report. Diagnostics capture
/// degrades to a marker instead of aborting.
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> Result<String> {
        let result_set = results::locate_result_set(&self.config.results_dir)?;
        info!(path = %result_set.display(), "using result set");

        let mut records = results::extract_failures(&result_set)?;
        info!(count = records.len(), "failing generated tests");

        self.resolve_names(&mut records);

        locate::locate_files(&mut records, &self.config.layout_tests_dir)?;
        let located = records.iter().filter(|r| r.local_path.is_some()).count();
        info!(located, total = records.len(), "content tests located");

        let history_config = HistoryConfig::from_config(&self.config);
        history::fetch_all(&mut records, &history_config).await?;

        let diagnostics = self.collect_diagnostics().await;

        Ok(report::render(
            &records,
            &diagnostics,
            &self.config.changeset_url,
        ))
    }

    fn resolve_names(&self, records: &mut [FailureRecord]) {
        for record in records.iter_mut() {
            match resolve::resolve_content_test_name(
                &self.config.generated_dir,
                &record.generated_name,
            ) {
                Ok(name) => record.content_test_name = Some(name),
                Err(e) => {
                    warn!(name = record.generated_name, error = %e, "name resolution failed");
                }
            }
        }
    }

    async fn collect_diagnostics(&self) -> String {
        if self.config.skip_diagnostics {
            info!("diagnostics capture disabled");
            return diagnostics::UNAVAILABLE_MARKER.to_string();
        }
        match diagnostics::collect(&self.config).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "diagnostics capture failed, rendering without trace");
                diagnostics::UNAVAILABLE_MARKER.to_string()
            }
        }
    }
}
