//! Shared test utilities for the termsite test suite.
//!
//! Builds throwaway site projects in temp directories so scan and build
//! tests can exercise real filesystem trees without shipping fixtures.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (tmp, project) = project_fixture();
//! write(&project.content_dir.join("blog/extra.md"), "---\ntitle: X\n---\nbody");
//! let report = build(&project, &SiteConfig::default()).unwrap();
//! ```

use crate::build::Project;
use std::path::Path;
use tempfile::TempDir;

/// A minimal complete project: registry with home/blog/downloads/contact,
/// two blog posts, one download artifact, no site.toml (defaults apply).
///
/// The `TempDir` guard must stay alive for the duration of the test;
/// dropping it deletes the tree.
pub fn project_fixture() -> (TempDir, Project) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    let content = root.join("content");

    write(
        &content.join("sections.json"),
        r#"{
  "sections": [
    { "id": "home", "label": "Home", "order": 0 },
    { "id": "blog", "label": "Blog", "order": 1, "contentDir": "blog", "outputPath": "blog" },
    { "id": "downloads", "label": "Downloads", "order": 2, "outputPath": "downloads" },
    { "id": "contact", "label": "Contact", "order": 3, "outputPath": "contact" }
  ]
}"#,
    );
    write(
        &content.join("blog/hello.md"),
        "---\ntitle: Hello World\n---\nfirst post\n",
    );
    write(&content.join("blog/notes.md"), "no front matter here\n");
    write(&content.join("downloads/resume.pdf"), "%PDF-1.4 stub\n");

    let project = Project::new(root, &content, root.join("dist"));
    (tmp, project)
}

/// Write `text` to `path`, creating parent directories as needed.
pub fn write(path: &Path, text: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, text).unwrap();
}
