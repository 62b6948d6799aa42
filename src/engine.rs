// src/engine.rs
//! The corpus engine: parses a file list (in parallel above a size
//! threshold), then runs the analyzers sequentially over the immutable
//! feature list. Output ordering is deterministic regardless of which
//! worker finished first.

use crate::analysis::{antipattern, concordance, tag_quality};
use crate::config::WarningConfig;
use crate::model::Feature;
use crate::parser::Parser;
use crate::types::{CorpusReport, ParseFailure, Warning};
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use std::path::PathBuf;

/// The main analysis engine. One instance per run; the caller may not
/// invoke it again until `analyze_paths` returns.
pub struct Engine {
    config: WarningConfig,
}

impl Engine {
    #[must_use]
    pub fn new(config: WarningConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &WarningConfig {
        &self.config
    }

    /// Parses and analyzes a corpus. Individual file failures are
    /// captured and reported; they never abort the batch.
    #[must_use]
    pub fn analyze_paths(&self, paths: &[PathBuf]) -> CorpusReport {
        let start = std::time::Instant::now();

        let (mut features, mut failures) =
            if paths.len() >= self.config.thresholds.parallel_threshold {
                self.parse_parallel(paths)
            } else {
                self.parse_sequential(paths)
            };

        // Completion order is non-deterministic under the parallel path;
        // sort by source path before any analysis or reporting.
        features.sort_by(|a, b| a.path().cmp(b.path()));
        failures.sort_by(|a, b| a.path.cmp(&b.path));

        let stats = concordance::analyze(&features);
        let mut tag_warnings = tag_quality::analyze(&features, &stats, &self.config);
        let mut antipattern_warnings = antipattern::analyze(&features, &self.config);
        sort_warnings(&mut tag_warnings);
        sort_warnings(&mut antipattern_warnings);

        CorpusReport {
            features,
            stats,
            tag_warnings,
            antipattern_warnings,
            failures,
            duration_ms: start.elapsed().as_millis(),
        }
    }

    /// Parses the same corpus on a dedicated bounded pool. A pool that
    /// cannot be built falls back to sequential parsing of the same list.
    fn parse_parallel(&self, paths: &[PathBuf]) -> (Vec<Feature>, Vec<ParseFailure>) {
        let threads = std::thread::available_parallelism().map_or(4, std::num::NonZeroUsize::get);
        let pool = match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool,
            Err(e) => {
                if self.config.verbose {
                    eprintln!("WARN: worker pool unavailable ({e}), parsing sequentially");
                }
                return self.parse_sequential(paths);
            }
        };

        let results: Vec<Result<Feature, ParseFailure>> = pool.install(|| {
            paths
                .par_iter()
                .map(|path| parse_one(path))
                .collect()
        });
        self.partition(results)
    }

    fn parse_sequential(&self, paths: &[PathBuf]) -> (Vec<Feature>, Vec<ParseFailure>) {
        let results: Vec<Result<Feature, ParseFailure>> =
            paths.iter().map(|path| parse_one(path)).collect();
        self.partition(results)
    }

    fn partition(
        &self,
        results: Vec<Result<Feature, ParseFailure>>,
    ) -> (Vec<Feature>, Vec<ParseFailure>) {
        let mut features = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(feature) => features.push(feature),
                Err(failure) => {
                    if self.config.verbose {
                        eprintln!(
                            "WARN: skipping {}: {}",
                            failure.path.display(),
                            failure.error
                        );
                    }
                    failures.push(failure);
                }
            }
        }
        (features, failures)
    }
}

/// Each invocation owns its own parser; no state is shared across files.
fn parse_one(path: &PathBuf) -> Result<Feature, ParseFailure> {
    Parser::new().parse_file(path).map_err(|e| ParseFailure {
        path: path.clone(),
        error: e.to_string(),
    })
}

/// Deterministic warning order: path, then line, then kind name, then
/// message. Corpus-level warnings (no path) sort first.
fn sort_warnings(warnings: &mut [Warning]) {
    warnings.sort_by(|a, b| {
        a.path
            .cmp(&b.path)
            .then_with(|| a.line.cmp(&b.line))
            .then_with(|| a.kind.name().cmp(b.kind.name()))
            .then_with(|| a.message.cmp(&b.message))
    });
}
