use std::collections::BTreeMap;

use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::parser::{self, SkipReason};
use crate::record::CanonicalJobRecord;
use crate::source::PageSource;

pub struct SkippedFile {
    pub identifier: String,
    pub reason: SkipReason,
}

/// Result of one sequential pass over a batch of saved pages.
pub struct BatchOutcome {
    pub attempted: usize,
    pub records: Vec<CanonicalJobRecord>,
    pub skipped: Vec<SkippedFile>,
}

impl BatchOutcome {
    pub fn extracted(&self) -> usize {
        self.records.len()
    }

    pub fn summary(&self) -> String {
        format!("Extracted {} of {} files", self.extracted(), self.attempted)
    }

    pub fn skip_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for s in &self.skipped {
            *counts.entry(s.reason.label()).or_insert(0) += 1;
        }
        counts
    }

    pub fn print(&self) {
        println!("{}", self.summary());
        for (label, count) in self.skip_counts() {
            println!("  {:<22} {}", label, count);
        }
        for s in &self.skipped {
            println!("  - {}: {}", s.identifier, s.reason);
        }
    }
}

/// Load and extract each page in order. Per-file failures are recorded
/// and skipped; nothing here aborts the batch.
pub fn run_batch<S: PageSource + ?Sized>(
    source: &S,
    identifiers: &[String],
    role_code: &str,
    pb: &ProgressBar,
) -> BatchOutcome {
    let mut outcome = BatchOutcome {
        attempted: identifiers.len(),
        records: Vec::new(),
        skipped: Vec::new(),
    };

    for id in identifiers {
        debug!(file = %id, "reading");
        match parser::process_file(source, id, role_code) {
            Ok(record) => {
                debug!(file = %id, role = %record.role, company = %record.company, "extracted");
                outcome.records.push(record);
            }
            Err(reason) => {
                warn!(file = %id, kind = reason.label(), "skipping: {}", reason);
                outcome.skipped.push(SkippedFile {
                    identifier: id.clone(),
                    reason,
                });
            }
        }
        pb.inc(1);
    }

    info!(
        extracted = outcome.extracted(),
        attempted = outcome.attempted,
        "batch complete"
    );
    outcome
}
