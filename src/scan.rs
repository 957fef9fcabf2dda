//! Content discovery.
//!
//! First stage of the build pipeline. Walks the content directories named
//! by the registry and produces a [`SiteContent`] snapshot that the page
//! builders consume:
//!
//! ```text
//! content/
//! ├── sections.json        # Section registry (required)
//! ├── blog/                # One directory per content section
//! │   ├── 2023-05-ideas.md
//! │   └── notes.md
//! └── downloads/           # Downloadable artifacts (any file type)
//!     └── termsite-0.3.tar.gz
//! ```
//!
//! Only `.md` files count as section content; anything else in a section
//! directory is ignored. A section whose directory is missing is skipped
//! silently and contributes no page, so one absent directory never takes
//! down the rest of the site. The downloads directory is the exception to
//! the markdown rule: every regular file in it is listed and copied
//! verbatim.
//!
//! Scanning also collects the cat whitelist: the sorted, deduplicated set
//! of every discovered content filename. The generated pages embed it and
//! the client-side resolver refuses to fetch anything outside it.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::config::SiteConfig;
use crate::frontmatter;
use crate::registry::{Registry, SectionDescriptor};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One markdown file discovered in a section directory.
#[derive(Debug, Clone)]
pub struct ContentFile {
    pub name: String,
    /// On-disk size in bytes, front matter included.
    pub size: u64,
    pub modified: DateTime<Local>,
    pub meta: std::collections::BTreeMap<String, String>,
    /// Text after the front-matter block.
    pub body: String,
}

/// A registry section together with its discovered files.
#[derive(Debug, Clone)]
pub struct SectionContent {
    pub section: SectionDescriptor,
    pub files: Vec<ContentFile>,
}

/// One artifact in the downloads directory.
#[derive(Debug, Clone)]
pub struct DownloadFile {
    pub name: String,
    pub size: u64,
    pub modified: DateTime<Local>,
}

/// Everything the scan found, ready for page generation.
#[derive(Debug, Clone)]
pub struct SiteContent {
    /// Content sections in registry order. A section whose directory does
    /// not exist is absent here: it contributes no page at all. A section
    /// whose directory exists but holds no markdown is present with an
    /// empty file list and still gets its (bare) index page.
    pub sections: Vec<SectionContent>,
    pub downloads: Vec<DownloadFile>,
    /// Sorted, deduplicated names of every content file on the site.
    pub cat_whitelist: Vec<String>,
}

pub fn scan(
    content_root: &Path,
    registry: &Registry,
    config: &SiteConfig,
) -> Result<SiteContent, ScanError> {
    let mut sections = Vec::new();
    let mut whitelist = BTreeSet::new();

    for section in registry.content_sections() {
        let Some(dir_name) = &section.content_dir else {
            continue;
        };
        let dir = content_root.join(dir_name);
        if !dir.is_dir() {
            continue;
        }
        let files = scan_section_dir(&dir)?;
        for file in &files {
            whitelist.insert(file.name.clone());
        }
        sections.push(SectionContent {
            section: section.clone(),
            files,
        });
    }

    let downloads = scan_downloads_dir(&content_root.join(&config.downloads_dir))?;

    Ok(SiteContent {
        sections,
        downloads,
        cat_whitelist: whitelist.into_iter().collect(),
    })
}

/// Markdown files in one section directory, sorted by name.
fn scan_section_dir(dir: &Path) -> Result<Vec<ContentFile>, ScanError> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| is_markdown(name))
        .collect();
    names.sort();

    let mut files = Vec::new();
    for name in names {
        let path = dir.join(&name);
        let stat = fs::metadata(&path)?;
        let modified = stat
            .modified()
            .map(DateTime::<Local>::from)
            .unwrap_or_else(|_| Local::now());
        let raw = fs::read_to_string(&path)?;
        let (meta, body) = frontmatter::parse(&raw);
        files.push(ContentFile {
            name,
            size: stat.len(),
            modified,
            meta,
            body: body.to_string(),
        });
    }
    Ok(files)
}

/// Every regular file in the downloads directory, sorted by name.
fn scan_downloads_dir(dir: &Path) -> Result<Vec<DownloadFile>, ScanError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut downloads: Vec<DownloadFile> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let stat = fs::metadata(&path)?;
        let modified = stat
            .modified()
            .map(DateTime::<Local>::from)
            .unwrap_or_else(|_| Local::now());
        downloads.push(DownloadFile {
            name: entry.file_name().to_string_lossy().to_string(),
            size: stat.len(),
            modified,
        });
    }
    downloads.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(downloads)
}

fn is_markdown(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}
