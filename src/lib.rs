//! # gitcontext
//!
//! Flattens a source tree into one text artifact for LLM tooling. Every eligible
//! file is rendered through a template carrying its metadata and content, and the
//! renderings are concatenated in traversal order.
//!
//! ## Features
//!
//! - Wildcard exclusion patterns (`**`, `*`, `?`) applied to a file and every ancestor directory
//! - Binary files (any zero byte) are skipped
//! - Templates with `#file_name`, `#file_path`, `#file_size`, `#file_extension`,
//!   `#file_creation_date`, `#file_modification_date` and `#file_content`
//! - Per-file failures are logged and never abort the run
//!
//! ## Usage
//!
//! ### As a Library
//!
//! ```no_run
//! use gitcontext::{Config, ContextProcessor};
//!
//! let config = Config {
//!     template: "## #file_path\n#file_content".to_string(),
//!     exclude_patterns: vec!["**/target".to_string(), "*.lock".to_string()],
//!     ..Config::default()
//! };
//! let processor = ContextProcessor::new(&config)?;
//! for unit in processor.process_directory(std::path::Path::new("."))? {
//!     println!("{unit}");
//! }
//! # Ok::<(), gitcontext::GitContextError>(())
//! ```
//!
//! ### As a CLI Tool
//!
//! ```bash
//! # Print the context of the current repository
//! gitcontext .
//!
//! # Save it to a file, skipping logs
//! gitcontext . -x '*.log' -o context.txt
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod fs_utils;
pub mod output;
pub mod processor;
pub mod template;

// Re-export main types and functions for convenience
pub use config::{Config, OutputConfig};
pub use error::{GitContextError, Result};
pub use filter::{ExclusionPattern, PathFilter, Verdict};
pub use output::ContextWriter;
pub use processor::{ContextProcessor, ProcessSummary};
pub use template::{FileDescriptor, Placeholder, TemplateRenderer, find_placeholders};
