use crate::config::Config;
use crate::error::{GitContextError, Result};
use crate::filter::{PathFilter, Verdict};
use crate::template::TemplateRenderer;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// Outcome counts for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    /// Files rendered and handed to the sink
    pub processed: usize,
    /// Files excluded by pattern or detected as binary
    pub skipped: usize,
    /// Entries that could not be visited, inspected or read
    pub failed: usize,
}

/// Walks a directory and renders every eligible file.
#[derive(Debug, Clone)]
pub struct ContextProcessor {
    filter: PathFilter,
    renderer: TemplateRenderer,
    ignored: Vec<PathBuf>,
}

impl ContextProcessor {
    /// Builds the filter and renderer from `config`
    ///
    /// # Errors
    ///
    /// - `GitContextError::ConfigurationMissing` if the template is blank.
    /// - `GitContextError::InvalidPattern` if an exclusion pattern can't be compiled.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            filter: PathFilter::new(&config.exclude_patterns)?,
            renderer: TemplateRenderer::new(config.template.as_str())?,
            ignored: Vec::new(),
        })
    }

    /// Never visit `path`, e.g. the output file when it lives inside the walked tree.
    ///
    /// Compared against canonical walk paths, so pass a canonical path.
    #[must_use]
    pub fn ignoring(mut self, path: impl Into<PathBuf>) -> Self {
        self.ignored.push(path.into());
        self
    }

    /// Renders every eligible file under `root`, in traversal order.
    ///
    /// # Errors
    ///
    /// Returns `GitContextError::RootNotFound` if `root` does not exist. Per-file
    /// failures are logged and never returned.
    pub fn process_directory(&self, root: &Path) -> Result<Vec<String>> {
        let mut results = Vec::new();
        self.process_each(root, |unit| {
            results.push(unit.to_string());
            Ok(())
        })?;
        Ok(results)
    }

    /// Renders every eligible file under `root`, handing each unit to `sink`
    /// as soon as it is produced.
    ///
    /// # Errors
    ///
    /// - `GitContextError::RootNotFound` if `root` does not exist.
    /// - Any error returned by `sink`, which stops the walk.
    pub fn process_each<F>(&self, root: &Path, mut sink: F) -> Result<ProcessSummary>
    where
        F: FnMut(&str) -> Result<()>,
    {
        let mut summary = ProcessSummary::default();
        self.visit(root, &mut summary, |path, summary| {
            match self.renderer.render(path) {
                Ok(unit) => {
                    sink(&unit)?;
                    summary.processed += 1;
                }
                Err(e) => {
                    warn!("Failed to process file {}: {}", path.display(), e);
                    summary.failed += 1;
                }
            }
            Ok(())
        })?;

        debug!(
            "Processed {} files, skipped {}, failed {}",
            summary.processed, summary.skipped, summary.failed
        );
        Ok(summary)
    }

    /// Lists the files a run would render, without rendering them.
    ///
    /// # Errors
    ///
    /// Returns `GitContextError::RootNotFound` if `root` does not exist.
    pub fn eligible_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut summary = ProcessSummary::default();
        self.visit(root, &mut summary, |path, _| {
            files.push(path.to_path_buf());
            Ok(())
        })?;
        Ok(files)
    }

    /// Depth-first walk calling `on_eligible` for every file the filter accepts.
    fn visit<F>(
        &self,
        root: &Path,
        summary: &mut ProcessSummary,
        mut on_eligible: F,
    ) -> Result<()>
    where
        F: FnMut(&Path, &mut ProcessSummary) -> Result<()>,
    {
        if !root.exists() {
            return Err(GitContextError::RootNotFound {
                path: root.to_path_buf(),
            });
        }
        let root = root.canonicalize()?;
        let filter = self.filter.clone().with_base(&root);

        let walker = WalkDir::new(&root).follow_links(false).sort_by_file_name();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("{}", GitContextError::from(e));
                    summary.failed += 1;
                    continue;
                }
            };

            let path = entry.path();
            if entry.path_is_symlink() {
                // Links are not followed during the walk, but a link to a file is still a file
                match fs::metadata(path) {
                    Ok(target) if target.is_file() => {}
                    Ok(_) => {
                        trace!("Skipping symlink to non-file {}", path.display());
                        summary.skipped += 1;
                        continue;
                    }
                    Err(e) => {
                        warn!("Failed to resolve symlink {}: {}", path.display(), e);
                        summary.failed += 1;
                        continue;
                    }
                }
            } else if !entry.file_type().is_file() {
                continue;
            }

            if self.ignored.iter().any(|ignored| ignored == path) {
                trace!("Skipping ignored path {}", path.display());
                continue;
            }

            match filter.evaluate(path) {
                Ok(Verdict::Eligible) => on_eligible(path, summary)?,
                Ok(verdict) => {
                    trace!("Skipping {}: {:?}", path.display(), verdict);
                    summary.skipped += 1;
                }
                Err(e) => {
                    warn!("Error processing file {}: {}", path.display(), e);
                    summary.failed += 1;
                }
            }
        }

        Ok(())
    }
}
