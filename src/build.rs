//! Site assembly.
//!
//! Drives one full generation pass: section registry and content tree in,
//! self-contained page tree out. Rendering itself lives in
//! [`terminal`](crate::terminal) and [`page`](crate::page); this module only
//! decides what to render and where to write it.
//!
//! ## Pipeline
//!
//! 1. Destructive reset of the output directory.
//! 2. Version string from `deployment.json` (missing or malformed reads as
//!    an empty version, never as a failure).
//! 3. Section registry from `sections.json` in the content root. A missing
//!    or invalid registry aborts the build.
//! 4. Content scan: section files, download artifacts, cat whitelist.
//! 5. Directory skeleton, asset copy, stylesheet fallback, generated
//!    client script.
//! 6. Pages: home, downloads, contact, then one per content section, with
//!    content and download files copied next to their pages.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html             # home: login banner + section listing
//! ├── css/style.css          # user stylesheet, or the embedded default
//! ├── js/main.js             # generated cat-view resolver
//! ├── blog/
//! │   ├── index.html         # section listing
//! │   └── notes.md           # source copied verbatim, fetched by ?cat=
//! ├── downloads/
//! │   ├── index.html
//! │   └── files/             # artifacts, linked directly
//! └── contact/
//!     └── index.html
//! ```

use crate::catview;
use crate::config::SiteConfig;
use crate::page::{self, PageContext, PageDescriptor};
use crate::registry::{self, Registry, RegistryError};
use crate::scan::{self, DownloadFile, ScanError, SectionContent};
use crate::terminal::{self, Entry, EntryDate};
use chrono::Utc;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const REGISTRY_FILE: &str = "sections.json";
const DEPLOYMENT_FILE: &str = "deployment.json";
const TEMPLATES_DIR: &str = "templates";
const LAYOUT_FILE: &str = "layout.html";
const ASSETS_DIR: &str = "assets";
/// Asset subdirectories copied into the output tree, shallow.
const ASSET_KINDS: [&str; 4] = ["css", "js", "fonts", "images"];
const STYLESHEET_PATH: &str = "css/style.css";
const CLIENT_SCRIPT_PATH: &str = "js/main.js";
/// Subdirectory of the downloads page holding the artifacts themselves.
const DOWNLOAD_FILES_DIR: &str = "files";

const DEFAULT_LAYOUT: &str = include_str!("../static/layout.html");
const DEFAULT_STYLESHEET: &str = include_str!("../static/style.css");

/// Filesystem layout of one site project. Paths come straight from the
/// command line and are used as given.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub content_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Project {
    pub fn new(
        root: impl Into<PathBuf>,
        content_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Project {
            root: root.into(),
            content_dir: content_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// `sections.json` lives inside the content root.
    pub fn registry_path(&self) -> PathBuf {
        self.content_dir.join(REGISTRY_FILE)
    }

    pub fn deployment_path(&self) -> PathBuf {
        self.root.join(DEPLOYMENT_FILE)
    }

    pub fn layout_path(&self) -> PathBuf {
        self.root.join(TEMPLATES_DIR).join(LAYOUT_FILE)
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join(ASSETS_DIR)
    }
}

/// One page written to the output tree.
#[derive(Debug, Clone)]
pub struct WrittenPage {
    pub title: String,
    pub path: String,
}

/// What a build produced, for reporting.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Deployed version string, empty when unknown.
    pub version: String,
    /// Pages in emission order: home, downloads, contact, content sections.
    pub pages: Vec<WrittenPage>,
    pub content_files: usize,
    pub download_files: usize,
    pub assets: usize,
}

#[derive(Debug, Deserialize)]
struct DeploymentInfo {
    #[serde(default)]
    version: String,
}

/// Runs one full build. The output directory is removed and regenerated
/// from scratch, so a rebuild never leaves stale pages behind.
pub fn build(project: &Project, config: &SiteConfig) -> Result<BuildReport, BuildError> {
    if project.output_dir.exists() {
        fs::remove_dir_all(&project.output_dir)?;
    }
    fs::create_dir_all(&project.output_dir)?;

    let version = read_version(&project.deployment_path());
    let registry = Registry::load(&project.registry_path())?;
    let content = scan::scan(&project.content_dir, &registry, config)?;

    // Output skeleton. Page writes create parents as needed, but empty
    // sections still deserve their directory.
    for section in registry.sections() {
        if !section.output_path.is_empty() {
            fs::create_dir_all(project.output_dir.join(&section.output_path))?;
        }
    }
    let download_files_dir = project
        .output_dir
        .join(registry::DOWNLOADS_ID)
        .join(DOWNLOAD_FILES_DIR);
    fs::create_dir_all(&download_files_dir)?;
    fs::create_dir_all(project.output_dir.join(registry::CONTACT_ID))?;

    let assets = copy_assets(&project.assets_dir(), &project.output_dir)?;

    // A site may ship its own stylesheet through assets/css; fall back to
    // the embedded one only when it did not.
    let stylesheet = project.output_dir.join(STYLESHEET_PATH);
    if !stylesheet.exists() {
        write_file(&stylesheet, DEFAULT_STYLESHEET)?;
    }
    // The client resolver is always generated so its rendering constants
    // stay in lockstep with this binary.
    write_file(
        &project.output_dir.join(CLIENT_SCRIPT_PATH),
        &catview::client_script(config),
    )?;

    let layout_path = project.layout_path();
    let layout = if layout_path.exists() {
        fs::read_to_string(&layout_path)?
    } else {
        DEFAULT_LAYOUT.to_string()
    };

    let whitelist_json = serde_json::to_string(&content.cat_whitelist)?;
    let last_refreshed = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let ctx = PageContext {
        registry: &registry,
        site: config,
        version: &version,
        last_refreshed: &last_refreshed,
        whitelist_json: &whitelist_json,
    };

    let mut pages = Vec::new();
    let mut content_files = 0;

    let home = home_page(&registry, config);
    pages.push(write_page(project, &layout, &ctx, &home)?);

    let downloads = downloads_page(&registry, config, &content.downloads);
    pages.push(write_page(project, &layout, &ctx, &downloads)?);
    let downloads_src = project.content_dir.join(&config.downloads_dir);
    for file in &content.downloads {
        fs::copy(
            downloads_src.join(&file.name),
            download_files_dir.join(&file.name),
        )?;
    }

    let contact = contact_page(&registry, config);
    pages.push(write_page(project, &layout, &ctx, &contact)?);

    for sc in &content.sections {
        let page = section_page(sc, config);
        pages.push(write_page(project, &layout, &ctx, &page)?);

        // Publish the sources next to their page so the client resolver
        // can fetch them by bare filename.
        let Some(dir_name) = &sc.section.content_dir else {
            continue;
        };
        let src_dir = project.content_dir.join(dir_name);
        let dest_dir = project.output_dir.join(&sc.section.output_path);
        for file in &sc.files {
            fs::copy(src_dir.join(&file.name), dest_dir.join(&file.name))?;
            content_files += 1;
        }
    }

    Ok(BuildReport {
        version,
        pages,
        content_files,
        download_files: content.downloads.len(),
        assets,
    })
}

/// Version string from `deployment.json`, written by the deploy pipeline.
/// The file is absent on dev machines; any problem reading or parsing it
/// degrades to an empty string.
fn read_version(path: &Path) -> String {
    let Ok(text) = fs::read_to_string(path) else {
        return String::new();
    };
    match serde_json::from_str::<DeploymentInfo>(&text) {
        Ok(info) => info.version,
        Err(_) => String::new(),
    }
}

fn copy_assets(assets_dir: &Path, output_dir: &Path) -> std::io::Result<usize> {
    let mut copied = 0;
    for kind in ASSET_KINDS {
        let src = assets_dir.join(kind);
        if !src.is_dir() {
            continue;
        }
        let dest = output_dir.join(kind);
        fs::create_dir_all(&dest)?;
        for entry in fs::read_dir(&src)? {
            let entry = entry?;
            if entry.path().is_file() {
                fs::copy(entry.path(), dest.join(entry.file_name()))?;
                copied += 1;
            }
        }
    }
    Ok(copied)
}

fn write_file(path: &Path, text: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)
}

fn write_page(
    project: &Project,
    layout: &str,
    ctx: &PageContext,
    page: &PageDescriptor,
) -> Result<WrittenPage, BuildError> {
    write_file(
        &project.output_dir.join(&page.output_path),
        &page::compose(layout, ctx, page),
    )?;
    Ok(WrittenPage {
        title: page.title.clone(),
        path: page.output_path.clone(),
    })
}

/// Home: the login banner above a synthetic listing of every non-home
/// section as a directory. Dates here are placeholders from config, so an
/// unchanged site rebuilds to identical bytes.
fn home_page(registry: &Registry, config: &SiteConfig) -> PageDescriptor {
    let dates = &config.dates;
    let mut entries = vec![
        Entry::dir(".", EntryDate::fixed(&dates.dot)),
        Entry::dir("..", EntryDate::fixed(&dates.dotdot)),
    ];
    for section in registry.sections() {
        if section.id == registry::HOME_ID {
            continue;
        }
        let name = if section.output_path.is_empty() {
            section.id.as_str()
        } else {
            section.output_path.as_str()
        };
        let href = if section.output_path.is_empty() {
            "index.html".to_string()
        } else {
            format!("{}/index.html", section.output_path)
        };
        entries.push(Entry::dir(name, EntryDate::fixed(&dates.dot)).with_href(href));
    }

    let prompt = terminal::prompt_for(&config.user, &config.host, "");
    let pwd = terminal::working_dir(&config.user, "");
    let listing = terminal::render_listing(&prompt, &pwd, &config.user, &entries);
    let body = format!("{}\n{}", terminal::render_banner(&config.banner), listing);

    PageDescriptor::terminal(
        "index.html",
        registry.label_or(registry::HOME_ID, "Home"),
        registry::HOME_ID,
        body,
    )
}

/// One content section: its files as rows whose hrefs hand the filename to
/// the cat-view resolver via the query string.
fn section_page(content: &SectionContent, config: &SiteConfig) -> PageDescriptor {
    let section = &content.section;
    let dates = &config.dates;
    let mut entries = vec![
        Entry::dir(".", EntryDate::fixed(&dates.dot)),
        Entry::dir("..", EntryDate::fixed(&dates.dotdot)),
    ];
    for file in &content.files {
        entries.push(
            Entry::file(&file.name, file.size, EntryDate::Stamp(file.modified)).with_href(
                format!(
                    "?{}={}",
                    catview::QUERY_PARAM,
                    urlencoding::encode(&file.name)
                ),
            ),
        );
    }

    let prompt = terminal::prompt_for(&config.user, &config.host, &section.output_path);
    let pwd = terminal::working_dir(&config.user, &section.output_path);
    let body = terminal::render_listing(&prompt, &pwd, &config.user, &entries);

    PageDescriptor::terminal(
        format!("{}/index.html", section.output_path),
        section.label.clone(),
        section.id.clone(),
        body,
    )
}

/// Downloads: real artifacts with real sizes and mtimes, linked straight to
/// the copied file rather than through the resolver.
fn downloads_page(
    registry: &Registry,
    config: &SiteConfig,
    downloads: &[DownloadFile],
) -> PageDescriptor {
    let dates = &config.dates;
    let mut entries = vec![
        Entry::dir(".", EntryDate::fixed(&dates.dot)),
        Entry::dir("..", EntryDate::fixed(&dates.dotdot)),
    ];
    for file in downloads {
        entries.push(
            Entry::file(&file.name, file.size, EntryDate::Stamp(file.modified))
                .with_href(format!("{DOWNLOAD_FILES_DIR}/{}", file.name)),
        );
    }

    let prompt = terminal::prompt_for(&config.user, &config.host, registry::DOWNLOADS_ID);
    let pwd = terminal::working_dir(&config.user, registry::DOWNLOADS_ID);
    let body = terminal::render_listing(&prompt, &pwd, &config.user, &entries);

    PageDescriptor::terminal(
        format!("{}/index.html", registry::DOWNLOADS_ID),
        registry.label_or(registry::DOWNLOADS_ID, "Downloads"),
        registry::DOWNLOADS_ID,
        body,
    )
}

/// Contact: a fixed listing of symlink-styled profile links from config.
fn contact_page(registry: &Registry, config: &SiteConfig) -> PageDescriptor {
    let dates = &config.dates;
    let mut entries = vec![
        Entry::dir(".", EntryDate::fixed(&dates.dot)),
        Entry::dir("..", EntryDate::fixed(&dates.dotdot)),
    ];
    for link in &config.contact {
        entries.push(Entry::symlink(
            &link.name,
            &link.target,
            EntryDate::fixed(&dates.contact),
        ));
    }

    let prompt = terminal::prompt_for(&config.user, &config.host, registry::CONTACT_ID);
    let pwd = terminal::working_dir(&config.user, registry::CONTACT_ID);
    let body = terminal::render_listing(&prompt, &pwd, &config.user, &entries);

    PageDescriptor::terminal(
        format!("{}/index.html", registry::CONTACT_ID),
        registry.label_or(registry::CONTACT_ID, "Contact"),
        registry::CONTACT_ID,
        body,
    )
}

// ============================================================================
// Tests
// ============================================================================
