//! Path eligibility: wildcard exclusion over a file and all of its ancestors,
//! plus null-byte binary detection.

use crate::error::{GitContextError, Result};
use crate::fs_utils::{is_binary_content, read_file_bytes};
use regex::Regex;
use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};
use tracing::{trace, warn};

/// Translates a wildcard pattern into an anchored regular expression.
///
/// - `**` matches any run of characters, path separators included
/// - `*` matches any run of characters except the path separator
/// - `?` matches exactly one character
/// - everything else, `.` included, matches itself literally
pub fn wildcard_to_regex(pattern: &str) -> String {
    let any_but_separator = format!("[^{}]*", regex::escape(MAIN_SEPARATOR_STR));
    let mut expr = String::with_capacity(pattern.len() * 2 + 2);
    expr.push('^');

    let mut chars = pattern.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                expr.push_str(".*");
            }
            '*' => expr.push_str(&any_but_separator),
            '?' => expr.push('.'),
            other => expr.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }

    expr.push('$');
    expr
}

/// A single compiled exclusion pattern
#[derive(Debug, Clone)]
pub struct ExclusionPattern {
    source: String,
    matcher: Regex,
}

impl ExclusionPattern {
    /// Compiles a wildcard pattern
    ///
    /// # Errors
    ///
    /// Returns `GitContextError::InvalidPattern` if the translated expression is rejected.
    pub fn new(pattern: &str) -> Result<Self> {
        let matcher = Regex::new(&wildcard_to_regex(pattern)).map_err(|source| {
            GitContextError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        Ok(Self {
            source: pattern.to_string(),
            matcher,
        })
    }

    /// The wildcard text this pattern was compiled from
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Full-string match against `candidate`
    pub fn is_match(&self, candidate: &str) -> bool {
        self.matcher.is_match(candidate)
    }
}

/// Outcome of evaluating one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The file should be rendered
    Eligible,
    /// `candidate` (the file or one of its ancestors) matched `pattern`
    Excluded { pattern: String, candidate: PathBuf },
    /// The file contains a zero byte
    Binary,
}

/// Decides which files take part in the rendered context.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    patterns: Vec<ExclusionPattern>,
    base: Option<PathBuf>,
}

impl PathFilter {
    /// Compiles every exclusion pattern once, up front.
    ///
    /// # Errors
    ///
    /// Returns `GitContextError::InvalidPattern` for the first pattern that fails to compile.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| ExclusionPattern::new(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            patterns,
            base: None,
        })
    }

    /// Also match candidates by their path relative to `base`.
    ///
    /// `base` should already be canonical, since candidates are.
    #[must_use]
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn patterns(&self) -> &[ExclusionPattern] {
        &self.patterns
    }

    /// Boolean form of [`PathFilter::evaluate`].
    ///
    /// Failures while inspecting the file are logged and the file is skipped.
    pub fn should_process(&self, path: &Path) -> bool {
        match self.evaluate(path) {
            Ok(Verdict::Eligible) => true,
            Ok(Verdict::Binary) => {
                trace!("Skipping binary file: {}", path.display());
                false
            }
            Ok(Verdict::Excluded { pattern, candidate }) => {
                trace!(
                    "Skipping {}: '{}' matches exclude pattern '{}'",
                    path.display(),
                    candidate.display(),
                    pattern
                );
                false
            }
            Err(e) => {
                warn!("Error processing file {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Explains whether `path` is eligible.
    ///
    /// Ancestors are checked first so that an excluded directory never has its
    /// files read. The file's own path is checked after the binary sniff.
    ///
    /// # Errors
    ///
    /// - `GitContextError::Io` if the path cannot be canonicalized or read.
    /// - `GitContextError::FileNotFound` if the path is not a regular file.
    pub fn evaluate(&self, path: &Path) -> Result<Verdict> {
        let canonical = path.canonicalize()?;

        for ancestor in canonical.ancestors().skip(1) {
            if let Some(verdict) = self.match_candidate(ancestor) {
                return Ok(verdict);
            }
        }

        let bytes = read_file_bytes(&canonical)?;
        if is_binary_content(&bytes) {
            return Ok(Verdict::Binary);
        }

        Ok(self
            .match_candidate(&canonical)
            .unwrap_or(Verdict::Eligible))
    }

    fn match_candidate(&self, candidate: &Path) -> Option<Verdict> {
        if self.patterns.is_empty() {
            return None;
        }

        let mut forms = vec![candidate.to_string_lossy()];
        if let Some(relative) = self
            .base
            .as_deref()
            .and_then(|base| candidate.strip_prefix(base).ok())
            .filter(|relative| !relative.as_os_str().is_empty())
        {
            forms.push(relative.to_string_lossy());
        }

        self.patterns
            .iter()
            .find(|pattern| forms.iter().any(|form| pattern.is_match(form)))
            .map(|pattern| Verdict::Excluded {
                pattern: pattern.as_str().to_string(),
                candidate: candidate.to_path_buf(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn matches(pattern: &str, candidate: &str) -> bool {
        ExclusionPattern::new(pattern).unwrap().is_match(candidate)
    }

    fn create_test_env() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        (temp_dir, root)
    }

    #[test]
    fn test_wildcard_to_regex() {
        let sep = regex::escape(MAIN_SEPARATOR_STR);
        assert_eq!(wildcard_to_regex("*.log"), format!("^[^{sep}]*\\.log$"));
        assert_eq!(wildcard_to_regex("**"), "^.*$");
        assert_eq!(wildcard_to_regex("a?c"), "^a.c$");
        assert_eq!(wildcard_to_regex(""), "^$");
    }

    #[test]
    fn test_pattern_is_anchored() {
        assert!(matches("*.log", "app.log"));
        assert!(!matches("*.log", "app.log.bak"));
        assert!(!matches("app", "my-app-dir"));
    }

    #[test]
    fn test_literal_dot() {
        assert!(matches("a.txt", "a.txt"));
        assert!(!matches("a.txt", "abtxt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_double_star_crosses_separators() {
        assert!(matches("src/**/*.tmp", "src/a/b/c.tmp"));
        assert!(matches("src/*/*.tmp", "src/a/c.tmp"));
        assert!(!matches("src/*/*.tmp", "src/a/b/c.tmp"));
        assert!(matches("**/node_modules/**", "project/node_modules/pkg/index.js"));
        assert!(!matches("*", "a/b"));
    }

    #[test]
    fn test_question_mark_single_char() {
        assert!(matches("file?.rs", "file1.rs"));
        assert!(!matches("file?.rs", "file.rs"));
        assert!(!matches("file?.rs", "file12.rs"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        assert!(matches("notes (1)+[draft].md", "notes (1)+[draft].md"));
        assert!(!matches("a+b", "aab"));
        assert!(matches("^$", "^$"));
    }

    #[test]
    fn test_eligible_text_file() {
        let (_temp_dir, root) = create_test_env();
        let file = root.join("a.txt");
        fs::write(&file, "hello").unwrap();

        let filter = PathFilter::new::<&str>(&[]).unwrap();
        assert_eq!(filter.evaluate(&file).unwrap(), Verdict::Eligible);
        assert!(filter.should_process(&file));
    }

    #[test]
    fn test_binary_file_always_excluded() {
        let (_temp_dir, root) = create_test_env();
        let file = root.join("bin.dat");
        fs::write(&file, [0u8, 1]).unwrap();

        let filter = PathFilter::new::<&str>(&[]).unwrap();
        assert_eq!(filter.evaluate(&file).unwrap(), Verdict::Binary);
        assert!(!filter.should_process(&file));

        // Null byte at the very end of a large file
        let late = root.join("late.txt");
        let mut content = vec![b'x'; 100_000];
        content.push(0);
        fs::write(&late, content).unwrap();
        assert!(!filter.should_process(&late));
    }

    #[test]
    fn test_directory_exclusion_covers_descendants() {
        let (_temp_dir, root) = create_test_env();
        let pkg = root.join("project").join("node_modules").join("pkg");
        fs::create_dir_all(&pkg).unwrap();
        let index = pkg.join("index.js");
        fs::write(&index, "module.exports = {};").unwrap();
        let main = root.join("project").join("main.js");
        fs::write(&main, "require('pkg');").unwrap();

        let filter = PathFilter::new(&["**/node_modules/**"]).unwrap();
        match filter.evaluate(&index).unwrap() {
            Verdict::Excluded { pattern, candidate } => {
                assert_eq!(pattern, "**/node_modules/**");
                assert_eq!(candidate, pkg);
            }
            other => panic!("expected exclusion, got {other:?}"),
        }
        assert!(filter.should_process(&main));
    }

    #[test]
    fn test_excluded_directory_files_are_not_read() {
        let (_temp_dir, root) = create_test_env();
        let target = root.join("target");
        fs::create_dir(&target).unwrap();
        let artifact = target.join("app.bin");
        fs::write(&artifact, [0u8; 4]).unwrap();

        let filter = PathFilter::new(&["**/target"]).unwrap();
        assert!(matches!(
            filter.evaluate(&artifact).unwrap(),
            Verdict::Excluded { .. }
        ));
    }

    #[test]
    fn test_relative_form_with_base() {
        let (_temp_dir, root) = create_test_env();
        let keep = root.join("keep.txt");
        let drop = root.join("drop.tmp");
        fs::write(&keep, "keep").unwrap();
        fs::write(&drop, "drop").unwrap();

        // Without a base only the absolute form is tested
        let absolute_only = PathFilter::new(&["*.tmp"]).unwrap();
        assert!(absolute_only.should_process(&drop));

        let filter = PathFilter::new(&["*.tmp"]).unwrap().with_base(&root);
        assert!(filter.should_process(&keep));
        assert!(!filter.should_process(&drop));
    }

    #[test]
    fn test_single_star_does_not_reach_nested_files() {
        let (_temp_dir, root) = create_test_env();
        fs::create_dir(root.join("sub")).unwrap();
        let nested = root.join("sub").join("deep.tmp");
        fs::write(&nested, "tmp").unwrap();

        let filter = PathFilter::new(&["*.tmp"]).unwrap().with_base(&root);
        assert!(filter.should_process(&nested));

        let filter = PathFilter::new(&["**.tmp"]).unwrap().with_base(&root);
        assert!(!filter.should_process(&nested));
    }

    #[cfg(unix)]
    #[test]
    fn test_absolute_pattern() {
        let (_temp_dir, root) = create_test_env();
        let file = root.join("secret.env");
        fs::write(&file, "TOKEN=1").unwrap();

        let pattern = format!("{}/*.env", root.display());
        let filter = PathFilter::new(&[pattern]).unwrap();
        assert!(!filter.should_process(&file));
    }

    #[test]
    fn test_missing_file_fails_closed() {
        let (_temp_dir, root) = create_test_env();
        let missing = root.join("gone.txt");

        let filter = PathFilter::new::<&str>(&[]).unwrap();
        assert!(filter.evaluate(&missing).is_err());
        assert!(!filter.should_process(&missing));
    }

    #[test]
    fn test_patterns_accessor() {
        let filter = PathFilter::new(&["*.log", "**/build/**"]).unwrap();
        let sources: Vec<&str> = filter.patterns().iter().map(ExclusionPattern::as_str).collect();
        assert_eq!(sources, vec!["*.log", "**/build/**"]);
    }
}
