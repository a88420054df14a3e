use ignore::WalkBuilder;
use std::path::{Component, Path, PathBuf};

/// Extensions indexed when none are given
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "java", "kt", "js", "ts", "py", "go", "rs", "cpp", "c", "h", "cs", "rb", "php", "swift",
    "scala",
];

const IGNORED_SCOPES: &[&str] = &[".git", "node_modules", "build", "target", ".gradle"];

/// Which files a build pass picks up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Lowercase, without the leading dot
    pub extensions: Vec<String>,

    /// Directory levels below the root; `None` is unlimited
    pub max_depth: Option<usize>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            max_depth: None,
        }
    }
}

impl ScanOptions {
    /// Replace the extension list. Entries are trimmed, lowercased and
    /// stripped of a leading dot; an empty list keeps the defaults.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized: Vec<String> = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        if !normalized.is_empty() {
            self.extensions = normalized;
        }
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|candidate| candidate == &ext)
            })
    }
}

/// Scanner for finding source files in a project
pub struct FileScanner {
    root: PathBuf,
    options: ScanOptions,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>, options: ScanOptions) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            options,
        }
    }

    /// Scan for matching files (.gitignore aware), sorted by path
    pub fn scan(&self) -> Vec<PathBuf> {
        if self.root.is_file() {
            let accepted = self.options.matches(&self.root) && !Self::is_hidden(&self.root);
            return if accepted {
                vec![self.root.clone()]
            } else {
                Vec::new()
            };
        }

        let mut files = Vec::new();

        let root = self.root.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .max_depth(self.options.max_depth);
        builder.filter_entry(move |entry| !Self::is_ignored_scope(entry.path(), &root));

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if file_type.is_file() && self.options.matches(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort();
        log::info!("Found {} source files", files.len());
        files
    }

    fn is_hidden(path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('.'))
    }

    fn is_ignored_scope(path: &Path, root: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(root) else {
            return false;
        };
        relative.components().any(|component| match component {
            Component::Normal(name) => {
                let name = name.to_string_lossy();
                IGNORED_SCOPES.iter().any(|ignored| *ignored == name)
            }
            _ => false,
        })
    }
}
