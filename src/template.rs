use crate::error::Result;
use crate::fs_utils::{file_extension, format_timestamp, read_file_contents};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Metadata fields a template can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    FileName,
    FilePath,
    FileSize,
    FileExtension,
    FileCreationDate,
    FileModificationDate,
    FileContent,
}

impl Placeholder {
    pub const ALL: [Self; 7] = [
        Self::FileName,
        Self::FilePath,
        Self::FileSize,
        Self::FileExtension,
        Self::FileCreationDate,
        Self::FileModificationDate,
        Self::FileContent,
    ];

    /// The literal token as written in a template
    pub fn token(self) -> &'static str {
        match self {
            Self::FileName => "#file_name",
            Self::FilePath => "#file_path",
            Self::FileSize => "#file_size",
            Self::FileExtension => "#file_extension",
            Self::FileCreationDate => "#file_creation_date",
            Self::FileModificationDate => "#file_modification_date",
            Self::FileContent => "#file_content",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.token() == token)
    }
}

/// A placeholder occurrence found in a template
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderRef {
    pub placeholder: Placeholder,
    /// Starting byte position in the template
    pub start: usize,
    /// Ending byte position in the template
    pub end: usize,
}

/// Finds every placeholder occurrence in the given template, in order
///
/// # Errors
///
/// Returns `GitContextError::Regex` if there's an error compiling the regex pattern.
pub fn find_placeholders(template: &str) -> Result<Vec<PlaceholderRef>> {
    let alternatives = Placeholder::ALL
        .iter()
        .map(|p| regex::escape(p.token()))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = Regex::new(&alternatives)?;

    Ok(pattern
        .find_iter(template)
        .filter_map(|m| {
            Placeholder::from_token(m.as_str()).map(|placeholder| PlaceholderRef {
                placeholder,
                start: m.start(),
                end: m.end(),
            })
        })
        .collect())
}

/// Everything a template can say about one file, read at processing time
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    pub name: String,
    /// Absolute, canonical path
    pub path: PathBuf,
    pub size: u64,
    pub extension: String,
    pub created: SystemTime,
    pub modified: SystemTime,
    pub content: String,
}

impl FileDescriptor {
    /// Gathers metadata and content for `path`.
    ///
    /// The name is the one `path` was visited under, so a symlink keeps its own
    /// name while `path` and the metadata describe its target. Filesystems that
    /// do not record a birth time report the modification time as the creation time.
    ///
    /// # Errors
    ///
    /// - `GitContextError::FileNotFound` if the path is not a regular file.
    /// - `GitContextError::Io` if metadata or content cannot be read.
    pub fn read(path: &Path) -> Result<Self> {
        let canonical = path.canonicalize()?;
        let metadata = fs::metadata(&canonical)?;
        let content = read_file_contents(&canonical)?;

        let name = path
            .file_name()
            .or_else(|| canonical.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = file_extension(&name).to_string();
        let modified = metadata.modified()?;
        let created = metadata.created().unwrap_or(modified);

        Ok(Self {
            name,
            size: metadata.len(),
            extension,
            created,
            modified,
            content,
            path: canonical,
        })
    }

    fn value(&self, placeholder: Placeholder) -> String {
        match placeholder {
            Placeholder::FileName => self.name.clone(),
            Placeholder::FilePath => self.path.display().to_string(),
            Placeholder::FileSize => self.size.to_string(),
            Placeholder::FileExtension => self.extension.clone(),
            Placeholder::FileCreationDate => format_timestamp(self.created),
            Placeholder::FileModificationDate => format_timestamp(self.modified),
            Placeholder::FileContent => self.content.clone(),
        }
    }
}

/// Renders one file at a time against a template fixed for the whole run.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    template: String,
    placeholders: Vec<PlaceholderRef>,
}

impl TemplateRenderer {
    /// Scans `template` for placeholders once.
    ///
    /// # Errors
    ///
    /// Returns errors from `find_placeholders`.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        let placeholders = find_placeholders(&template)?;
        Ok(Self {
            template,
            placeholders,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Reads `path` and renders it.
    ///
    /// # Errors
    ///
    /// Returns errors from `FileDescriptor::read`.
    pub fn render(&self, path: &Path) -> Result<String> {
        let descriptor = FileDescriptor::read(path)?;
        Ok(self.render_descriptor(&descriptor))
    }

    /// Substitutes every placeholder occurrence in a single left-to-right pass,
    /// so substituted values are never scanned for tokens themselves.
    pub fn render_descriptor(&self, descriptor: &FileDescriptor) -> String {
        let mut result = String::with_capacity(self.template.len() + descriptor.content.len());
        let mut cursor = 0;

        for reference in &self.placeholders {
            result.push_str(&self.template[cursor..reference.start]);
            result.push_str(&descriptor.value(reference.placeholder));
            cursor = reference.end;
        }
        result.push_str(&self.template[cursor..]);

        result
    }
}
