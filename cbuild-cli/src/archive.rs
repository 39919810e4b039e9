//! Source archive
//!
//! Packs a source directory into a temporary zip file, skipping anything
//! matched by the ignore file.
//!
//! Ignore file syntax, one rule per line:
//! - blank lines and lines starting with `#` are skipped
//! - `!rule` re-includes paths matched by an earlier rule; the last matching
//!   rule wins
//! - `rule/` matches directories only
//! - `/rule` or any rule containing `/` matches the path relative to the
//!   source root, otherwise the rule matches the base name at any depth
//! - `*` and `?` never cross a `/`; `**` does

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};
use std::fs::File;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Ignore file looked up in the source directory by default
pub const DEFAULT_IGNORE_FILE: &str = ".cbuildignore";

#[derive(Debug)]
struct IgnoreRule {
    matcher: GlobMatcher,
    negated: bool,
    dir_only: bool,
    basename: bool,
}

impl IgnoreRule {
    fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (negated, rest) = match line.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, line),
        };
        let (dir_only, rest) = match rest.strip_suffix('/') {
            Some(rest) => (true, rest),
            None => (false, rest),
        };
        let anchored = rest.starts_with('/');
        let pattern = rest.trim_start_matches('/');
        if pattern.is_empty() {
            return Ok(None);
        }

        let matcher = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .with_context(|| format!("Invalid ignore rule {:?}", line))?
            .compile_matcher();

        Ok(Some(Self {
            matcher,
            negated,
            dir_only,
            basename: !anchored && !pattern.contains('/'),
        }))
    }

    fn matches(&self, rel_path: &str, is_dir: bool) -> bool {
        if self.dir_only && !is_dir {
            return false;
        }

        if self.basename {
            let name = rel_path.rsplit('/').next().unwrap_or(rel_path);
            self.matcher.is_match(name)
        } else {
            self.matcher.is_match(rel_path)
        }
    }
}

/// Parsed ignore file
#[derive(Debug, Default)]
pub struct IgnoreRules {
    rules: Vec<IgnoreRule>,
}

impl IgnoreRules {
    pub fn parse(content: &str) -> Result<Self> {
        let mut rules = Vec::new();
        for line in content.lines() {
            if let Some(rule) = IgnoreRule::parse(line)? {
                rules.push(rule);
            }
        }

        Ok(Self { rules })
    }

    /// Loads rules from `path`; a missing file means nothing is ignored
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No ignore file at {:?}", path);
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read ignore file {:?}", path)),
        }
    }

    /// Whether `rel_path` (relative, `/`-separated) is excluded
    pub fn is_ignored(&self, rel_path: &str, is_dir: bool) -> bool {
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.matches(rel_path, is_dir))
            .is_some_and(|rule| !rule.negated)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Zip file holding the packaged sources
///
/// The file lives in the system temp directory and is removed on
/// [`SourceArchive::cleanup`] or when dropped.
#[derive(Debug)]
pub struct SourceArchive {
    file: NamedTempFile,
    size: u64,
    entries: usize,
}

impl SourceArchive {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Uncompressed bytes of all packaged files
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Opens the archive for streaming from the start
    pub async fn open(&self) -> Result<tokio::fs::File> {
        let file = self
            .file
            .reopen()
            .with_context(|| format!("Failed to open archive {:?}", self.path()))?;

        Ok(tokio::fs::File::from_std(file))
    }

    pub fn cleanup(self) -> Result<()> {
        self.file.close().context("Failed to remove temporary archive")
    }
}

/// Packs `root` into a temporary zip, honoring the ignore file
///
/// `ignore_file` is resolved against `root` unless it is absolute.
pub fn build(root: &Path, ignore_file: &Path) -> Result<SourceArchive> {
    let rules = IgnoreRules::load(&root.join(ignore_file))?;
    debug!("Loaded {} ignore rule(s)", rules.len());

    let mut file = tempfile::Builder::new()
        .prefix("cbuild.")
        .suffix(".zip")
        .tempfile()
        .context("Failed to create temporary archive")?;
    debug!("Created temporary archive {:?}", file.path());

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(file.as_file_mut());
    let mut size = 0u64;
    let mut entries = 0usize;

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| match relative_name(root, entry.path()) {
            Some(rel) => !rules.is_ignored(&rel, entry.file_type().is_dir()),
            None => true,
        });

    for entry in walker {
        let entry = entry.context("Failed to walk source directory")?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = relative_name(root, entry.path()) else {
            continue;
        };

        debug!("Adding {}", name);
        writer
            .start_file(name.as_str(), options)
            .with_context(|| format!("Failed to add {} to archive", name))?;

        let mut source =
            File::open(entry.path()).with_context(|| format!("Failed to open {}", name))?;
        size += std::io::copy(&mut source, &mut writer)
            .with_context(|| format!("Failed to write {} to archive", name))?;
        entries += 1;
    }

    writer.finish().context("Failed to finish archive")?;

    Ok(SourceArchive {
        file,
        size,
        entries,
    })
}

/// `/`-separated path of `path` below `root`; `None` for the root itself
fn relative_name(root: &Path, path: &Path) -> Option<String> {
    let parts: Vec<String> = path
        .strip_prefix(root)
        .ok()?
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
